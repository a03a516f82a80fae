//! Alert data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A triggered alert, derived from a reading that crossed the threshold.
///
/// Transient: owned by the alerter for the duration of dispatch, never
/// persisted by this subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Device whose reading triggered the alert
    pub device_id: String,

    /// The glucose level that triggered the alert, in mg/dL
    pub glucose_mg_dl: f64,

    /// Deterministic, human-readable description of the breach
    pub message: String,

    /// When the alert was raised
    pub triggered_at: DateTime<Utc>,
}
