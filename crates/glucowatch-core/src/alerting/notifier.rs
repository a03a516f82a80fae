//! Notification delivery for alerts

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::info;

use crate::config::NotifierConfig;
use crate::error::{DispatchError, Error, Result};

/// Seam for the external notification channel.
///
/// One call is one dispatch attempt; retry policy, if any, belongs to the
/// channel itself.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Publish one message to the channel.
    async fn send(
        &self,
        topic: &str,
        subject: &str,
        message: &str,
    ) -> std::result::Result<(), DispatchError>;
}

#[async_trait::async_trait]
impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    async fn send(
        &self,
        topic: &str,
        subject: &str,
        message: &str,
    ) -> std::result::Result<(), DispatchError> {
        (**self).send(topic, subject, message).await
    }
}

/// Notifier that posts alerts to an HTTP webhook
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    /// Create a new webhook notifier with a bounded request timeout
    pub fn new(config: &NotifierConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        Ok(Self {
            client,
            url: config.webhook_url.clone(),
        })
    }
}

#[async_trait::async_trait]
impl Notifier for WebhookNotifier {
    async fn send(
        &self,
        topic: &str,
        subject: &str,
        message: &str,
    ) -> std::result::Result<(), DispatchError> {
        let payload = WebhookPayload {
            topic,
            subject,
            message,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    DispatchError::Unavailable(e.to_string())
                } else {
                    DispatchError::Rejected(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::Rejected(format!(
                "webhook returned {}: {}",
                status, body
            )));
        }

        info!(topic, "notification sent");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    topic: &'a str,
    subject: &'a str,
    message: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn notifier_for(server: &MockServer) -> WebhookNotifier {
        WebhookNotifier::new(&NotifierConfig {
            webhook_url: format!("{}/alerts", server.uri()),
            timeout_secs: 5,
        })
        .expect("client builds")
    }

    #[tokio::test]
    async fn posts_topic_subject_and_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/alerts"))
            .and(body_json(serde_json::json!({
                "topic": "GlucoseAlerts",
                "subject": "Abnormal Glucose Levels Alert",
                "message": "ALERT: device dev-1 reported glucose level 200 mg/dL",
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = notifier_for(&server);
        let result = notifier
            .send(
                "GlucoseAlerts",
                "Abnormal Glucose Levels Alert",
                "ALERT: device dev-1 reported glucose level 200 mg/dL",
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn non_success_status_is_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/alerts"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let notifier = notifier_for(&server);
        let result = notifier.send("GlucoseAlerts", "subject", "message").await;

        assert!(matches!(result, Err(DispatchError::Rejected(_))));
    }
}
