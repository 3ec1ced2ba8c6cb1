//! File persistence helpers
//!
//! Writes go to a sibling `.tmp` file first and are then renamed over the
//! target, so a crash mid-write leaves the previous file intact. Callers
//! above this layer absorb every [`StoreError`] and fall back to defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed integer: {0}")]
    Parse(#[from] std::num::ParseIntError),
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

pub fn read_text(path: &Path) -> Result<String, StoreError> {
    Ok(fs::read_to_string(path)?)
}

/// Replace `path` with `contents` via tmp file and rename
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let text = read_text(path)?;
    Ok(serde_json::from_str(&text)?)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(value)?;
    write_atomic(path, &json)
}
