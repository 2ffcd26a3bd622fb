//! Shared storage plumbing for the JSON-file domain stores.
//!
//! Every store keeps its data as a pretty-printed JSON file inside the
//! data directory and rewrites the whole file on mutation. That is cheap
//! at personal-vocabulary scale and keeps the on-disk state inspectable.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Word not found: {0}")]
    WordNotFound(Uuid),

    #[error("Word \"{word}\" already exists in category \"{category}\"")]
    DuplicateWord { word: String, category: String },

    #[error("Data directory not found")]
    DataDirNotFound,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Get the default data directory (`~/.local/share/lexis` on Linux)
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|p| p.join("lexis"))
        .ok_or(StorageError::DataDirNotFound)
}

/// Read a JSON file into `T`, returning `T::default()` when the file
/// does not exist yet (stores are created lazily).
pub fn read_json_or_default<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        return Ok(T::default());
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write `value` as pretty JSON, creating parent directories as needed.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
