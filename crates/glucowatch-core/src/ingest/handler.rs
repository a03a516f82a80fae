//! Ingestion orchestration

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::alerting::{Notifier, ThresholdAlerter};
use crate::error::Result;
use crate::models::StoredRecord;
use crate::store::ReadingStore;

use super::validator;

/// Echo of a successfully stored reading, letting the caller confirm
/// exactly what was persisted.
#[derive(Debug, Clone)]
pub struct IngestReceipt {
    /// Identifier of the stored record
    pub record_id: Uuid,
    /// Device that reported the reading
    pub device_id: String,
    /// The resolved timestamp, caller-supplied or server-assigned
    pub recorded_at: DateTime<Utc>,
    /// The stored glucose level in mg/dL
    pub glucose_mg_dl: f64,
}

impl From<StoredRecord> for IngestReceipt {
    fn from(record: StoredRecord) -> Self {
        Self {
            record_id: record.receipt.record_id,
            device_id: record.reading.device_id,
            recorded_at: record.reading.recorded_at,
            glucose_mg_dl: record.reading.glucose_mg_dl,
        }
    }
}

/// Orchestrates one ingestion: validate → store → alert → respond.
///
/// The store and notifier are injected through their trait seams, so the
/// handler carries no global resource handles and each ingestion is an
/// independent unit of work.
pub struct Ingestor<S, N> {
    store: S,
    alerter: ThresholdAlerter<N>,
}

impl<S: ReadingStore, N: Notifier> Ingestor<S, N> {
    /// Create a new ingestor over a store and an alerter
    pub fn new(store: S, alerter: ThresholdAlerter<N>) -> Self {
        Self { store, alerter }
    }

    /// Process one raw reading event.
    ///
    /// Validation and store failures abort before any later stage runs.
    /// Once the store write is acknowledged the ingestion has succeeded:
    /// the rule is evaluated unconditionally, and a failed dispatch is
    /// logged without changing the verdict.
    #[instrument(name = "ingest", skip(self, payload))]
    pub async fn ingest(&self, payload: &Value) -> Result<IngestReceipt> {
        let reading = validator::validate(payload)?;

        debug!(device_id = %reading.device_id, "reading validated");

        let receipt = self.store.put(&reading).await?;

        debug!(record_id = %receipt.record_id, "reading stored");

        let record = StoredRecord { receipt, reading };

        if let Some(event) = self.alerter.evaluate(&record.reading) {
            // One attempt; the write is already durable and stays that way.
            if let Err(e) = self.alerter.dispatch(&event).await {
                warn!(
                    device_id = %event.device_id,
                    error = %e,
                    "alert dispatch failed, ingestion unaffected"
                );
            }
        }

        Ok(IngestReceipt::from(record))
    }
}
