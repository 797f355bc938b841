// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory capture sink.

use super::{ByteCounts, CaptureSink, Completion, RecordWriter, SinkError, StreamName};
use crate::exit::ExitDescriptor;
use crate::fingerprint::Fingerprint;
use crate::invocation::Invocation;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// A finalized run held in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryRecord {
    pub fingerprint: Fingerprint,
    pub invocation: Invocation,
    pub started_at: DateTime<Utc>,
    pub stdin: Vec<u8>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit: ExitDescriptor,
    pub counts: ByteCounts,
    pub capture_complete: bool,
    pub stdin_truncated: bool,
}

/// Capture sink that keeps every finalized run, in finalize order.
///
/// Clones share the same storage.
#[derive(Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<MemoryRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All finalized runs, oldest first.
    pub fn records(&self) -> Vec<MemoryRecord> {
        self.records.lock().clone()
    }

    /// Latest run for a fingerprint.
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<MemoryRecord> {
        self.records
            .lock()
            .iter()
            .rev()
            .find(|r| &r.fingerprint == fingerprint)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl CaptureSink for MemorySink {
    fn open(&self) -> Result<Box<dyn RecordWriter>, SinkError> {
        Ok(Box::new(MemoryRecordWriter {
            records: Arc::clone(&self.records),
            meta: None,
            streams: Default::default(),
        }))
    }
}

struct MemoryRecordWriter {
    records: Arc<Mutex<Vec<MemoryRecord>>>,
    meta: Option<(Invocation, DateTime<Utc>)>,
    streams: [SharedBuffer; 3],
}

impl MemoryRecordWriter {
    fn buffer(&self, stream: StreamName) -> &SharedBuffer {
        match stream {
            StreamName::Stdin => &self.streams[0],
            StreamName::Stdout => &self.streams[1],
            StreamName::Stderr => &self.streams[2],
        }
    }
}

impl RecordWriter for MemoryRecordWriter {
    fn append_meta(
        &mut self,
        invocation: &Invocation,
        started_at: DateTime<Utc>,
    ) -> Result<(), SinkError> {
        self.meta = Some((invocation.clone(), started_at));
        Ok(())
    }

    fn stream_writer(&mut self, stream: StreamName) -> Result<Box<dyn Write + Send>, SinkError> {
        Ok(Box::new(self.buffer(stream).clone()))
    }

    fn finalize(self: Box<Self>, completion: Completion) -> Result<(), SinkError> {
        let (invocation, started_at) = self.meta.clone().ok_or(SinkError::MissingMeta)?;
        let record = MemoryRecord {
            fingerprint: completion.fingerprint,
            invocation,
            started_at,
            stdin: self.buffer(StreamName::Stdin).take(),
            stdout: self.buffer(StreamName::Stdout).take(),
            stderr: self.buffer(StreamName::Stderr).take(),
            exit: completion.exit,
            counts: completion.counts,
            capture_complete: completion.capture_complete,
            stdin_truncated: completion.stdin_truncated,
        };
        self.records.lock().push(record);
        Ok(())
    }
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.0.lock())
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
