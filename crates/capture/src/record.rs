// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Stored capture records and read access to them.

use crate::exit::ExitDescriptor;
use crate::fingerprint::Fingerprint;
use crate::invocation::Invocation;
use crate::layout;
use crate::sink::StreamName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid record metadata in {path}: {source}")]
    Meta {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("no record matches '{0}'")]
    NotFound(String),

    #[error("'{prefix}' is ambiguous ({count} records match)")]
    Ambiguous { prefix: String, count: usize },
}

/// Metadata written next to the captured streams.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMeta {
    pub fingerprint: Fingerprint,
    pub invocation: Invocation,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub exit: ExitDescriptor,
    /// The exit code the wrapper reported for this run.
    pub exit_code: i32,
    pub stdin_bytes: u64,
    pub stdout_bytes: u64,
    pub stderr_bytes: u64,
    /// False when a stream could not be fully persisted.
    pub capture_complete: bool,
    /// Stdin was not read to EOF; see [`Completion`](crate::Completion).
    #[serde(default)]
    pub stdin_truncated: bool,
}

/// A finalized record on disk.
#[derive(Clone, Debug)]
pub struct StoredRecord {
    dir: PathBuf,
    meta: RecordMeta,
}

impl StoredRecord {
    pub fn load(dir: &Path) -> Result<Self, RecordError> {
        let path = dir.join(layout::META_FILE);
        let content = std::fs::read_to_string(&path).map_err(|source| RecordError::Io {
            path: path.clone(),
            source,
        })?;
        let meta =
            serde_json::from_str(&content).map_err(|source| RecordError::Meta { path, source })?;
        Ok(Self {
            dir: dir.to_path_buf(),
            meta,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    /// Raw captured bytes for one stream.
    pub fn stream(&self, stream: StreamName) -> Result<Vec<u8>, RecordError> {
        let path = layout::stream_path(&self.dir, stream);
        std::fs::read(&path).map_err(|source| RecordError::Io { path, source })
    }
}

/// All readable records under `root`, ordered by fingerprint.
///
/// Records whose metadata cannot be read are skipped with a warning. A
/// missing `records/` directory yields an empty list.
pub fn list_records(root: &Path) -> Vec<StoredRecord> {
    let mut records: Vec<StoredRecord> = std::fs::read_dir(layout::records_dir(root))
        .into_iter()
        .flatten()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .filter_map(|dir| match StoredRecord::load(&dir) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(path = %dir.display(), error = %e, "skipping unreadable record");
                None
            }
        })
        .collect();
    records.sort_by(|a, b| a.meta.fingerprint.cmp(&b.meta.fingerprint));
    records
}

/// Resolve a full fingerprint or an unambiguous hex prefix.
pub fn find_record(root: &Path, prefix: &str) -> Result<StoredRecord, RecordError> {
    let prefix = prefix.to_ascii_lowercase();
    let mut matches: Vec<StoredRecord> = list_records(root)
        .into_iter()
        .filter(|r| r.meta.fingerprint.to_hex().starts_with(&prefix))
        .collect();
    match matches.len() {
        0 => Err(RecordError::NotFound(prefix)),
        1 => Ok(matches.remove(0)),
        count => Err(RecordError::Ambiguous { prefix, count }),
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
