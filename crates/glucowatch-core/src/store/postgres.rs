//! PostgreSQL connection pool and reading persistence
//!
//! The `readings` table is provisioned externally; schema management is out
//! of scope for this service. Expected shape:
//!
//! ```sql
//! CREATE TABLE readings (
//!     id            UUID PRIMARY KEY,
//!     device_id     TEXT NOT NULL,
//!     recorded_at   TIMESTAMPTZ NOT NULL,
//!     glucose_mg_dl DOUBLE PRECISION NOT NULL,
//!     stored_at     TIMESTAMPTZ NOT NULL
//! );
//! ```

use std::time::Duration;

use chrono::Utc;
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::error::{Error, Result, StoreError};
use crate::models::{Reading, StoreReceipt};
use crate::store::ReadingStore;

/// PostgreSQL connection pool
#[derive(Clone)]
pub struct PostgresPool {
    pool: PgPool,
}

impl PostgresPool {
    /// Create a new PostgreSQL connection pool
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| Error::Store(StoreError::Unavailable(e.to_string())))?;

        Ok(Self { pool })
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Store(classify_sqlx_error(e)))?;
        Ok(())
    }

    /// Get the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Append-only reading store backed by PostgreSQL
#[derive(Clone)]
pub struct PgReadingStore {
    pool: PgPool,
}

impl PgReadingStore {
    /// Create a new reading store over an existing pool
    pub fn new(pool: &PostgresPool) -> Self {
        Self {
            pool: pool.pool.clone(),
        }
    }
}

#[async_trait::async_trait]
impl ReadingStore for PgReadingStore {
    async fn put(&self, reading: &Reading) -> std::result::Result<StoreReceipt, StoreError> {
        let record_id = Uuid::new_v4();
        let stored_at = Utc::now();

        // Plain insert, no ON CONFLICT clause: readings sharing a
        // (device_id, recorded_at) key land as independent rows.
        sqlx::query(
            r#"
            INSERT INTO readings (id, device_id, recorded_at, glucose_mg_dl, stored_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record_id)
        .bind(&reading.device_id)
        .bind(reading.recorded_at)
        .bind(reading.glucose_mg_dl)
        .bind(stored_at)
        .execute(&self.pool)
        .await
        .map_err(classify_sqlx_error)?;

        Ok(StoreReceipt {
            record_id,
            stored_at,
        })
    }
}

/// Map a sqlx failure onto the store error taxonomy: connectivity and
/// timeout problems are `Unavailable`, everything the server actively
/// refused is `Rejected`.
fn classify_sqlx_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_) => StoreError::Unavailable(e.to_string()),
        _ => StoreError::Rejected(e.to_string()),
    }
}
