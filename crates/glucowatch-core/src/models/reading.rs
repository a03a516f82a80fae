//! Reading data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One validated telemetry sample from a device.
///
/// Immutable once stored; `recorded_at` is always populated, either from the
/// caller's payload or assigned during validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Identifies the reporting device; unique per physical sensor
    pub device_id: String,

    /// When the sample was taken, caller-supplied or server-assigned
    pub recorded_at: DateTime<Utc>,

    /// Blood glucose level in mg/dL
    pub glucose_mg_dl: f64,
}

/// Acknowledgement returned by the store for a durable write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreReceipt {
    /// Server-assigned identifier of the stored row
    pub record_id: Uuid,

    /// When the write was acknowledged
    pub stored_at: DateTime<Utc>,
}

/// A reading together with its storage metadata.
///
/// Created once per successful ingestion, never updated or deleted by this
/// subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    /// The write acknowledgement
    pub receipt: StoreReceipt,

    /// The reading as persisted
    pub reading: Reading,
}
