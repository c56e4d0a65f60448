//! Data export
//!
//! Dumps the full key-value store as indented JSON into a file named with
//! the current date, so users can take their data with them.

use crate::error::Result;
use crate::host::StorageHost;
use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

/// Export filename for a given date
pub fn export_filename(date: NaiveDate) -> String {
    format!("argus-export-{}.json", date.format("%Y-%m-%d"))
}

/// Where exports land when no directory is given
pub fn default_export_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Serialize the entire store into `dir`, returning the written path
pub async fn export_store(storage: &dyn StorageHost, dir: &Path) -> Result<PathBuf> {
    let data = storage.get_all().await?;
    let body = serde_json::to_string_pretty(&serde_json::Value::Object(data))?;
    let path = dir.join(export_filename(Utc::now().date_naive()));
    std::fs::write(&path, body)?;
    info!("exported store to {}", path.display());
    Ok(path)
}
