//! Durable prompt/response log.
//!
//! Every generated record is appended to a single JSON array file. The
//! read-modify-write sequence runs under a lock so concurrent requests
//! cannot drop each other's records.

use crate::models::ResponseRecord;
use async_trait::async_trait;
use service_core::error::AppError;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Trait for record persistence backends.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Append a record to the log.
    async fn append(&self, record: ResponseRecord) -> Result<(), AppError>;

    /// Read every record currently in the log.
    async fn read_all(&self) -> Result<Vec<ResponseRecord>, AppError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), AppError>;
}

/// Record store backed by a pretty-printed JSON array file.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store at the given path, creating an empty log when the
    /// file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();

        let exists = tokio::fs::try_exists(&path).await.map_err(|e| {
            tracing::error!("Failed to stat log file {}: {}", path.display(), e);
            AppError::InternalError(anyhow::anyhow!("failed to stat log file: {}", e))
        })?;

        if !exists {
            write_records(&path, &[]).await?;
            tracing::info!(path = %path.display(), "Created empty prompt log");
        }

        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn append(&self, record: ResponseRecord) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;

        let mut records = load_records(&self.path).await?;
        records.push(record);
        write_records(&self.path, &records).await?;

        tracing::debug!(
            path = %self.path.display(),
            total = records.len(),
            "Appended record to prompt log"
        );

        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<ResponseRecord>, AppError> {
        let _guard = self.lock.lock().await;
        load_records(&self.path).await
    }

    async fn health_check(&self) -> Result<(), AppError> {
        match tokio::fs::metadata(&self.path).await {
            Ok(_) => Ok(()),
            // A removed log is recreated on the next append.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                tracing::error!("Prompt log health check failed: {}", e);
                Err(AppError::InternalError(anyhow::anyhow!(
                    "prompt log is not accessible: {}",
                    e
                )))
            }
        }
    }
}

/// Parse the log file. A missing, empty, or corrupt file counts as an empty
/// log rather than an error.
async fn load_records(path: &Path) -> Result<Vec<ResponseRecord>, AppError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            tracing::error!("Failed to read log file {}: {}", path.display(), e);
            return Err(AppError::InternalError(anyhow::anyhow!(
                "failed to read log file: {}",
                e
            )));
        }
    };

    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str(&raw) {
        Ok(records) => Ok(records),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Log file is corrupt, treating it as empty"
            );
            Ok(Vec::new())
        }
    }
}

/// Rewrite the log atomically via a temp file in the same directory.
async fn write_records(path: &Path, records: &[ResponseRecord]) -> Result<(), AppError> {
    let payload = serde_json::to_string_pretty(records).map_err(|e| {
        tracing::error!("Failed to serialize log records: {}", e);
        AppError::InternalError(anyhow::anyhow!("failed to serialize log records: {}", e))
    })?;

    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, payload).await.map_err(|e| {
        tracing::error!("Failed to write log file {}: {}", tmp.display(), e);
        AppError::InternalError(anyhow::anyhow!("failed to write log file: {}", e))
    })?;

    tokio::fs::rename(&tmp, path).await.map_err(|e| {
        tracing::error!("Failed to replace log file {}: {}", path.display(), e);
        AppError::InternalError(anyhow::anyhow!("failed to replace log file: {}", e))
    })?;

    Ok(())
}
