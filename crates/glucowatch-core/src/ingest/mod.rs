//! Telemetry ingestion
//!
//! One reading event flows validate → store → alert; validation and store
//! failures short-circuit to an error result before the alerter is reached.

mod handler;
mod validator;

pub use handler::{IngestReceipt, Ingestor};
pub use validator::validate;
