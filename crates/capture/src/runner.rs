// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Child process execution with pass-through and capture.
//!
//! Three tees run concurrently: caller stdin to the child, child stdout to
//! the caller, child stderr to the caller. Sequential copying could
//! deadlock as soon as the child fills a pipe buffer before it has read
//! all of its input.

use crate::exit::ExitDescriptor;
use crate::fingerprint::{Fingerprint, Fingerprinter};
use crate::invocation::Invocation;
use crate::sink::{ByteCounts, CaptureSink, Completion, RecordWriter, StreamName};
use crate::tee::{DrainLimit, Spool, SpoolHandle, StreamTee, Tap, DEFAULT_CHUNK_SIZE};
use chrono::Utc;
use std::io::Write;
use std::process::{ExitStatus, Stdio};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::Command;
use tokio::sync::oneshot;
use tokio::task::JoinError;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to execute {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("child {0} pipe was not created")]
    Pipe(StreamName),

    #[error("stream copy task failed: {0}")]
    Join(#[from] JoinError),
}

impl RunError {
    /// True when the child never started.
    pub fn is_start_failure(&self) -> bool {
        matches!(self, Self::Spawn { .. })
    }
}

/// Runner settings, fixed at construction.
#[derive(Clone, Debug)]
pub struct RunnerConfig {
    /// Read size for every stream copy.
    pub chunk_size: usize,
    /// How much caller stdin is still read once the child has exited.
    pub stdin_drain: DrainLimit,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            stdin_drain: DrainLimit::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunnerState {
    Created,
    Started,
    Running,
    Exited(ExitDescriptor),
    FailedToStart,
}

/// Result of a run in which the child started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    pub exit: ExitDescriptor,
    pub fingerprint: Fingerprint,
    pub counts: ByteCounts,
    /// False when the record could not be fully persisted.
    pub capture_complete: bool,
    /// Stdin was abandoned before EOF after the child exited.
    pub stdin_truncated: bool,
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        self.exit.exit_code()
    }
}

type CaptureSpool = SpoolHandle<Box<dyn Write + Send>>;

pub struct ProcessRunner {
    config: RunnerConfig,
    state: RunnerState,
}

impl ProcessRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            state: RunnerState::Created,
        }
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    fn transition(&mut self, next: RunnerState) {
        tracing::debug!(from = ?self.state, to = ?next, "runner state");
        self.state = next;
    }

    /// Run `invocation` to completion.
    ///
    /// Errors only when the child could not be started or its pipes could
    /// not be set up. Any completion of the child, including a non-zero
    /// exit or a signal, is an `Ok` outcome. Persistence problems are
    /// logged and reported through [`RunOutcome::capture_complete`].
    ///
    /// Caller stdin is read to EOF while the child runs. Once the child has
    /// exited, at most [`RunnerConfig::stdin_drain`] more is read, so an
    /// endless producer cannot keep the run alive; cutting it short sets
    /// [`RunOutcome::stdin_truncated`].
    ///
    /// The child is not killed if this future is dropped; it is left to
    /// finish on its own, as it would without the wrapper.
    pub async fn run<I, O, E>(
        &mut self,
        invocation: &Invocation,
        stdin: I,
        stdout: O,
        stderr: E,
        sink: &dyn CaptureSink,
    ) -> Result<RunOutcome, RunError>
    where
        I: AsyncRead + Send + Unpin + 'static,
        O: AsyncWrite + Send + Unpin + 'static,
        E: AsyncWrite + Send + Unpin + 'static,
    {
        self.transition(RunnerState::Created);

        let mut command = Command::new(invocation.program());
        command
            .args(invocation.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(false);

        let started_at = Utc::now();
        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(source) => {
                self.transition(RunnerState::FailedToStart);
                return Err(RunError::Spawn {
                    program: invocation.program().to_string(),
                    source,
                });
            }
        };
        self.transition(RunnerState::Started);

        let pipes = (child.stdin.take(), child.stdout.take(), child.stderr.take());
        let (child_stdin, child_stdout, child_stderr) = match pipes {
            (Some(i), Some(o), Some(e)) => (i, o, e),
            (i, o, _) => {
                let _ = child.start_kill();
                let missing = if i.is_none() {
                    StreamName::Stdin
                } else if o.is_none() {
                    StreamName::Stdout
                } else {
                    StreamName::Stderr
                };
                return Err(RunError::Pipe(missing));
            }
        };

        let mut record = open_record(sink, invocation, started_at);
        let mut capture_spools: Vec<CaptureSpool> = Vec::new();
        let mut capture_tap = |stream: StreamName| -> Option<Tap> {
            let writer = record.as_mut()?.stream_writer(stream);
            match writer {
                Ok(writer) => {
                    let (tap, spool) = Spool::spawn(stream.as_str(), writer);
                    capture_spools.push(spool);
                    Some(tap)
                }
                Err(e) => {
                    tracing::warn!(stream = %stream, error = %e, "cannot capture stream");
                    None
                }
            }
        };

        let (fingerprint_tap, fingerprint_spool) =
            Spool::spawn("fingerprint", Fingerprinter::new(invocation));
        let (stop_stdin, stdin_stop) = oneshot::channel();

        let stdin_tee = StreamTee::new(StreamName::Stdin)
            .chunk_size(self.config.chunk_size)
            .stop_on(stdin_stop, self.config.stdin_drain)
            .live(child_stdin)
            .tap(fingerprint_tap)
            .taps(capture_tap(StreamName::Stdin));
        let stdout_tee = StreamTee::new(StreamName::Stdout)
            .chunk_size(self.config.chunk_size)
            .live(stdout)
            .taps(capture_tap(StreamName::Stdout));
        let stderr_tee = StreamTee::new(StreamName::Stderr)
            .chunk_size(self.config.chunk_size)
            .live(stderr)
            .taps(capture_tap(StreamName::Stderr));
        let streams_captured = capture_spools.len() == StreamName::ALL.len();

        let stdin_task = tokio::spawn(stdin_tee.run(stdin));
        let stdout_task = tokio::spawn(stdout_tee.run(child_stdout));
        let stderr_task = tokio::spawn(stderr_tee.run(child_stderr));
        self.transition(RunnerState::Running);

        let exit = exit_descriptor(child.wait().await);
        // Nobody reads stdin any more; stop once what is pending is drained.
        let _ = stop_stdin.send(());

        // Exit is only reported once trailing output has been forwarded.
        let stdout_outcome = stdout_task.await?;
        let stderr_outcome = stderr_task.await?;
        let stdin_outcome = stdin_task.await?;

        let fingerprint = fingerprint_spool.finish().await?.writer.finish();

        let mut capture_complete = record.is_some() && streams_captured;
        for spool in capture_spools {
            let outcome = spool.finish().await?;
            capture_complete &= outcome.error.is_none();
        }

        let counts = ByteCounts {
            stdin: stdin_outcome.bytes,
            stdout: stdout_outcome.bytes,
            stderr: stderr_outcome.bytes,
        };

        if let Some(record) = record {
            let completion = Completion {
                fingerprint,
                exit,
                counts,
                capture_complete,
                stdin_truncated: stdin_outcome.truncated,
            };
            if let Err(e) = record.finalize(completion) {
                tracing::warn!(fingerprint = %fingerprint, error = %e, "failed to finalize record");
                capture_complete = false;
            }
        }

        self.transition(RunnerState::Exited(exit));
        tracing::debug!(
            fingerprint = %fingerprint,
            exit = %exit,
            stdin = counts.stdin,
            stdout = counts.stdout,
            stderr = counts.stderr,
            stdin_truncated = stdin_outcome.truncated,
            "run complete"
        );

        Ok(RunOutcome {
            exit,
            fingerprint,
            counts,
            capture_complete,
            stdin_truncated: stdin_outcome.truncated,
        })
    }
}

/// A failed wait leaves the exit unknown; the streams are still drained.
fn exit_descriptor(waited: std::io::Result<ExitStatus>) -> ExitDescriptor {
    match waited {
        Ok(status) => ExitDescriptor::from(status),
        Err(e) => {
            tracing::warn!(error = %e, "cannot observe child exit");
            ExitDescriptor::Unknown
        }
    }
}

/// Open a record for this run; capture is best effort.
fn open_record(
    sink: &dyn CaptureSink,
    invocation: &Invocation,
    started_at: chrono::DateTime<Utc>,
) -> Option<Box<dyn RecordWriter>> {
    let mut record = match sink.open() {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(error = %e, "cannot open capture record");
            return None;
        }
    };
    if let Err(e) = record.append_meta(invocation, started_at) {
        tracing::warn!(error = %e, "cannot write capture metadata");
        return None;
    }
    Some(record)
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
