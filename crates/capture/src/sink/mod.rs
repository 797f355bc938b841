// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence boundary for capture records.
//!
//! The runner only talks to [`CaptureSink`] and [`RecordWriter`]; where and
//! how bytes land is up to the implementation.

mod directory;
mod memory;

pub use directory::DirectorySink;
pub use memory::{MemoryRecord, MemorySink};

use crate::exit::ExitDescriptor;
use crate::fingerprint::Fingerprint;
use crate::invocation::Invocation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize record metadata: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("record metadata missing: append_meta was never called")]
    MissingMeta,
}

/// One of the three captured standard streams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamName {
    Stdin,
    Stdout,
    Stderr,
}

impl StreamName {
    pub const ALL: [StreamName; 3] = [Self::Stdin, Self::Stdout, Self::Stderr];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stdin => "stdin",
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

impl fmt::Display for StreamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bytes that crossed the live path for each stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteCounts {
    pub stdin: u64,
    pub stdout: u64,
    pub stderr: u64,
}

/// Everything known once the child has exited and all streams drained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    pub fingerprint: Fingerprint,
    pub exit: ExitDescriptor,
    pub counts: ByteCounts,
    /// False when any stream writer failed mid-run.
    pub capture_complete: bool,
    /// Stdin was abandoned before EOF because the child had exited. The
    /// fingerprint and captured stdin cover only what was read.
    pub stdin_truncated: bool,
}

/// Factory for per-run record writers.
///
/// `open` must tolerate a missing root directory and concurrent callers.
pub trait CaptureSink: Send + Sync {
    fn open(&self) -> Result<Box<dyn RecordWriter>, SinkError>;
}

/// A record being written for a single run.
///
/// The record stays pending until [`finalize`](RecordWriter::finalize),
/// which keys it by the fingerprint. Dropping a writer without finalizing
/// discards the pending record.
pub trait RecordWriter: Send {
    fn append_meta(
        &mut self,
        invocation: &Invocation,
        started_at: DateTime<Utc>,
    ) -> Result<(), SinkError>;

    /// Byte sink for one stream. Called at most once per stream.
    fn stream_writer(&mut self, stream: StreamName) -> Result<Box<dyn Write + Send>, SinkError>;

    fn finalize(self: Box<Self>, completion: Completion) -> Result<(), SinkError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
