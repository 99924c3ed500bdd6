//! JSON array files on local disk.
//!
//! Each file holds a single array of objects. Reading is tolerant: elements
//! that fail to deserialize are skipped and counted, never fatal. Writing
//! always replaces the whole file.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{DealerError, Result};

/// Records read from a file plus the number of elements that were dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

impl<T> LoadOutcome<T> {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
        }
    }
}

/// Reads a JSON array from `path`, deserializing each element on its own.
///
/// A missing file yields an empty outcome. A file that cannot be read or is
/// not a JSON array is an error; the caller decides how to recover.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<LoadOutcome<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "data file not found, starting empty");
            return Ok(LoadOutcome::empty());
        }
        Err(source) => {
            return Err(DealerError::Persistence {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let elements: Vec<Value> =
        serde_json::from_str(&content).map_err(|source| DealerError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;

    let mut outcome = LoadOutcome {
        records: Vec::with_capacity(elements.len()),
        skipped: 0,
    };

    for (index, element) in elements.into_iter().enumerate() {
        match serde_json::from_value::<T>(element) {
            Ok(record) => outcome.records.push(record),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    index,
                    error = %e,
                    "skipping malformed record"
                );
                outcome.skipped += 1;
            }
        }
    }

    Ok(outcome)
}

/// Serializes `records` as a pretty-printed JSON array and overwrites `path`.
///
/// Missing parent directories are created.
pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;

    let io_err = |source| DealerError::Persistence {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, json).map_err(io_err)?;

    tracing::debug!(path = %path.display(), count = records.len(), "wrote records");
    Ok(())
}
