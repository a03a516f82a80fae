//! Threshold rule evaluation

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::AlertingConfig;
use crate::error::DispatchError;
use crate::models::{AlertEvent, Reading};

use super::notifier::Notifier;

/// Evaluates readings against the clinical threshold and dispatches
/// notifications for breaches.
///
/// Stateless with respect to a single reading; safe to share across any
/// number of concurrent ingestions.
pub struct ThresholdAlerter<N> {
    threshold_mg_dl: f64,
    topic: String,
    subject: String,
    notifier: N,
}

impl<N: Notifier> ThresholdAlerter<N> {
    /// Create a new alerter from configuration
    pub fn new(config: &AlertingConfig, notifier: N) -> Self {
        Self {
            threshold_mg_dl: config.threshold_mg_dl,
            topic: config.topic.clone(),
            subject: config.subject.clone(),
            notifier,
        }
    }

    /// Evaluate the threshold rule against one reading.
    ///
    /// Returns an event iff the level strictly exceeds the threshold; a
    /// reading at exactly the threshold does not alert.
    pub fn evaluate(&self, reading: &Reading) -> Option<AlertEvent> {
        let is_breached = reading.glucose_mg_dl > self.threshold_mg_dl;

        debug!(
            device_id = %reading.device_id,
            glucose_mg_dl = reading.glucose_mg_dl,
            threshold_mg_dl = self.threshold_mg_dl,
            breached = is_breached,
            "evaluated reading"
        );

        if !is_breached {
            return None;
        }

        Some(AlertEvent {
            device_id: reading.device_id.clone(),
            glucose_mg_dl: reading.glucose_mg_dl,
            message: format_alert_message(reading),
            triggered_at: Utc::now(),
        })
    }

    /// Dispatch an alert through the notification channel.
    ///
    /// Exactly one attempt; failures are surfaced to the caller to record,
    /// never retried here.
    pub async fn dispatch(&self, event: &AlertEvent) -> Result<(), DispatchError> {
        match self
            .notifier
            .send(&self.topic, &self.subject, &event.message)
            .await
        {
            Ok(()) => {
                info!(device_id = %event.device_id, "alert dispatched");
                Ok(())
            }
            Err(e) => {
                warn!(device_id = %event.device_id, error = %e, "alert dispatch failed");
                Err(e)
            }
        }
    }
}

/// Deterministic alert message: names the device and the numeric level with
/// fixed units.
fn format_alert_message(reading: &Reading) -> String {
    format!(
        "ALERT: device {} reported glucose level {} mg/dL",
        reading.device_id, reading.glucose_mg_dl
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DispatchError;
    use proptest::prelude::*;

    struct NullNotifier;

    #[async_trait::async_trait]
    impl Notifier for NullNotifier {
        async fn send(&self, _: &str, _: &str, _: &str) -> Result<(), DispatchError> {
            Ok(())
        }
    }

    fn alerter() -> ThresholdAlerter<NullNotifier> {
        ThresholdAlerter::new(&AlertingConfig::default(), NullNotifier)
    }

    fn reading(glucose_mg_dl: f64) -> Reading {
        Reading {
            device_id: "dev-1".to_string(),
            recorded_at: Utc::now(),
            glucose_mg_dl,
        }
    }

    #[test]
    fn exactly_threshold_does_not_alert() {
        assert!(alerter().evaluate(&reading(180.0)).is_none());
    }

    #[test]
    fn just_above_threshold_alerts() {
        let event = alerter().evaluate(&reading(180.1)).expect("alert");
        assert_eq!(event.device_id, "dev-1");
        assert_eq!(event.glucose_mg_dl, 180.1);
    }

    #[test]
    fn message_names_device_and_level_with_units() {
        let event = alerter().evaluate(&reading(200.0)).expect("alert");
        assert_eq!(
            event.message,
            "ALERT: device dev-1 reported glucose level 200 mg/dL"
        );
    }

    proptest! {
        #[test]
        fn at_or_below_threshold_never_alerts(level in 0.0f64..=180.0) {
            prop_assert!(alerter().evaluate(&reading(level)).is_none());
        }

        #[test]
        fn above_threshold_always_alerts(level in 180.0f64..1000.0) {
            prop_assume!(level > 180.0);
            let event = alerter().evaluate(&reading(level));
            prop_assert!(event.is_some());
            prop_assert_eq!(event.unwrap().glucose_mg_dl, level);
        }
    }
}
