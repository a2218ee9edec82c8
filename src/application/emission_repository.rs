// Repository trait for the emission time series
use crate::domain::emission::{EmissionRecord, EmissionSeries};
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("time series file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
}

#[async_trait]
pub trait EmissionRepository: Send + Sync {
    /// Append one record; existing records are never rewritten.
    async fn append(&self, record: &EmissionRecord) -> Result<(), StoreError>;

    /// Read the latest `n` records in chronological order.
    /// Reading stops at the first blank line inside that window.
    async fn read_latest(&self, n: usize) -> Result<EmissionSeries, StoreError>;

    /// Copy the current contents to a backup next to the live file, then empty it.
    /// Returns the backup path.
    async fn archive(&self) -> Result<PathBuf, StoreError>;
}
