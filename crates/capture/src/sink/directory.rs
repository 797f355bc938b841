// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem-backed capture sink.
//!
//! Each run streams into a private staging directory. Finalizing renames
//! it to `records/<fingerprint>`, replacing any earlier run with the same
//! fingerprint (last writer wins), and appends one summary line to
//! `history/<fingerprint>.log`.

use super::{CaptureSink, Completion, RecordWriter, SinkError, StreamName};
use crate::exit::ExitDescriptor;
use crate::invocation::Invocation;
use crate::layout;
use crate::record::RecordMeta;
use crate::summary::{flatten_stdin, RunSummary, SUMMARY_STDIN_LIMIT};
use chrono::{DateTime, Utc};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Attempts at moving a record into place while other runs race for it.
const COMMIT_ATTEMPTS: usize = 32;

#[derive(Clone, Debug)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CaptureSink for DirectorySink {
    fn open(&self) -> Result<Box<dyn RecordWriter>, SinkError> {
        let staging = layout::staging_dir(&self.root).join(Uuid::new_v4().to_string());
        fs::create_dir_all(&staging).map_err(|source| SinkError::Create {
            path: staging.clone(),
            source,
        })?;
        tracing::debug!(staging = %staging.display(), "opened pending record");
        Ok(Box::new(DirectoryRecord {
            root: self.root.clone(),
            staging,
            meta: None,
        }))
    }
}

struct DirectoryRecord {
    root: PathBuf,
    staging: PathBuf,
    meta: Option<(Invocation, DateTime<Utc>)>,
}

impl RecordWriter for DirectoryRecord {
    fn append_meta(
        &mut self,
        invocation: &Invocation,
        started_at: DateTime<Utc>,
    ) -> Result<(), SinkError> {
        fs::write(
            self.staging.join(layout::CMD_FILE),
            format!("{}\n", invocation.text()),
        )?;
        self.meta = Some((invocation.clone(), started_at));
        Ok(())
    }

    fn stream_writer(&mut self, stream: StreamName) -> Result<Box<dyn Write + Send>, SinkError> {
        let file = File::create(layout::stream_path(&self.staging, stream))?;
        Ok(Box::new(BufWriter::new(file)))
    }

    fn finalize(self: Box<Self>, completion: Completion) -> Result<(), SinkError> {
        let (invocation, started_at) = self.meta.clone().ok_or(SinkError::MissingMeta)?;
        let finished_at = Utc::now();

        let meta = RecordMeta {
            fingerprint: completion.fingerprint,
            invocation: invocation.clone(),
            started_at,
            finished_at,
            exit: completion.exit,
            exit_code: completion.exit.exit_code(),
            stdin_bytes: completion.counts.stdin,
            stdout_bytes: completion.counts.stdout,
            stderr_bytes: completion.counts.stderr,
            capture_complete: completion.capture_complete,
            stdin_truncated: completion.stdin_truncated,
        };
        fs::write(
            self.staging.join(layout::META_FILE),
            serde_json::to_string_pretty(&meta)?,
        )?;

        // Read stdin before the rename: afterwards the directory may
        // already belong to a concurrent run.
        let stdin_path = layout::stream_path(&self.staging, StreamName::Stdin);
        let stdin = read_prefix(&stdin_path, SUMMARY_STDIN_LIMIT).unwrap_or_else(|e| {
            tracing::warn!(
                path = %stdin_path.display(),
                error = %e,
                "cannot read captured stdin for summary"
            );
            Vec::new()
        });

        let records = layout::records_dir(&self.root);
        fs::create_dir_all(&records).map_err(|source| SinkError::Create {
            path: records.clone(),
            source,
        })?;
        let target = layout::record_dir(&self.root, &completion.fingerprint);
        commit(&self.staging, &target, &layout::staging_dir(&self.root))?;

        let summary = RunSummary {
            started_at,
            finished_at,
            invocation: invocation.text(),
            stdin: flatten_stdin(&stdin),
            stdin_bytes: completion.counts.stdin,
            stdout_bytes: completion.counts.stdout,
            stderr_bytes: completion.counts.stderr,
            exit_code: match completion.exit {
                ExitDescriptor::Unknown => None,
                exit => Some(exit.exit_code()),
            },
        };
        append_history(
            &layout::history_path(&self.root, &completion.fingerprint),
            &summary,
        )?;

        tracing::debug!(
            fingerprint = %completion.fingerprint,
            record = %target.display(),
            "record finalized"
        );
        Ok(())
    }
}

impl Drop for DirectoryRecord {
    fn drop(&mut self) {
        // Gone already when finalize committed it.
        let _ = fs::remove_dir_all(&self.staging);
    }
}

/// Move `staging` to `target`, replacing an existing record.
fn commit(staging: &Path, target: &Path, trash: &Path) -> io::Result<()> {
    for _ in 0..COMMIT_ATTEMPTS {
        match fs::rename(staging, target) {
            Ok(()) => return Ok(()),
            Err(_) if target.exists() => {
                let aside = trash.join(format!("replaced-{}", Uuid::new_v4()));
                match fs::rename(target, &aside) {
                    Ok(()) => {
                        let _ = fs::remove_dir_all(&aside);
                    }
                    // Another run moved it first.
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e),
                }
            }
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::other(format!(
        "could not replace {} after {} attempts",
        target.display(),
        COMMIT_ATTEMPTS
    )))
}

/// At most `limit` leading bytes of a file.
fn read_prefix(path: &Path, limit: usize) -> io::Result<Vec<u8>> {
    let mut prefix = Vec::with_capacity(limit);
    File::open(path)?
        .take(limit as u64)
        .read_to_end(&mut prefix)?;
    Ok(prefix)
}

/// Append one summary line with a single write on an append-mode file.
fn append_history(path: &Path, summary: &RunSummary) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(format!("{}\n", summary).as_bytes())
}

#[cfg(test)]
#[path = "directory_tests.rs"]
mod tests;
