//! Durable persistence for readings
//!
//! The store is append-only: a second put with the same
//! `(device_id, recorded_at)` key is a distinct record, never an overwrite.

mod postgres;

pub use postgres::{PgReadingStore, PostgresPool};

use std::sync::Arc;

use crate::error::StoreError;
use crate::models::{Reading, StoreReceipt};

/// Seam for the durable reading store.
///
/// Implementations must surface infrastructure failures as [`StoreError`]
/// rather than retrying silently, and must never block past their own
/// connection timeout.
#[async_trait::async_trait]
pub trait ReadingStore: Send + Sync {
    /// Persist one reading as a new record and acknowledge the write.
    async fn put(&self, reading: &Reading) -> Result<StoreReceipt, StoreError>;
}

#[async_trait::async_trait]
impl<T: ReadingStore + ?Sized> ReadingStore for Arc<T> {
    async fn put(&self, reading: &Reading) -> Result<StoreReceipt, StoreError> {
        (**self).put(reading).await
    }
}
