//! JSON persistence for record files.
//!
//! Each analysis stage reads and writes whole files: a record file is
//! one pretty-printed JSON array, loaded fully and replaced fully.
//! There is no partial update.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur reading or writing record files.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open, read, or write the record file.
    #[error("Failed to access record file: {0}")]
    Io(#[from] std::io::Error),
    /// The record file is not the expected JSON shape.
    #[error("Failed to parse record file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load a whole record file.
pub fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let file = File::open(path)?;
    let records = serde_json::from_reader(BufReader::new(file))?;
    Ok(records)
}

/// Write a whole record file, replacing any previous contents.
pub fn save_records<T: Serialize>(path: &Path, records: &[T]) -> Result<(), StoreError> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, records)?;
    Ok(())
}
