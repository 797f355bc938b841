// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Byte stream duplication.
//!
//! A [`StreamTee`] copies one source to a single live destination, written
//! inline, and to any number of [`Tap`]s. Each tap feeds a [`Spool`]: a
//! blocking worker that drains an unbounded channel into a `Write`. The
//! live path therefore never waits on a tap, and a failed tap only stops
//! itself.

use crate::sink::StreamName;
use std::io::{self, Write};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinError, JoinHandle};

pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// How far a tee keeps reading once it has been told to stop.
///
/// Reading ends at EOF, after `bytes` more bytes, or when a single read
/// waits longer than `idle`, whichever comes first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrainLimit {
    pub bytes: u64,
    pub idle: Duration,
}

impl Default for DrainLimit {
    fn default() -> Self {
        Self {
            bytes: 1024 * 1024,
            idle: Duration::from_millis(200),
        }
    }
}

/// Sending half of a spool.
pub struct Tap {
    tx: mpsc::UnboundedSender<Vec<u8>>,
}

impl Tap {
    fn send(&self, chunk: &[u8]) {
        // A closed channel means the worker is gone; the handle reports why.
        let _ = self.tx.send(chunk.to_vec());
    }
}

/// Result of draining a spool.
pub struct SpoolOutcome<W> {
    pub label: String,
    pub writer: W,
    pub bytes_written: u64,
    /// First write error; nothing was written after it.
    pub error: Option<io::Error>,
}

pub struct SpoolHandle<W> {
    join: JoinHandle<SpoolOutcome<W>>,
}

impl<W> SpoolHandle<W> {
    /// Wait until every chunk sent before the tap was dropped is written.
    pub async fn finish(self) -> Result<SpoolOutcome<W>, JoinError> {
        self.join.await
    }
}

pub struct Spool;

impl Spool {
    /// Start a worker writing every chunk received by the returned tap.
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn<W>(label: impl Into<String>, writer: W) -> (Tap, SpoolHandle<W>)
    where
        W: Write + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>();
        let worker_label = label.into();

        let join = tokio::task::spawn_blocking(move || {
            let mut outcome = SpoolOutcome {
                label: worker_label,
                writer,
                bytes_written: 0,
                error: None,
            };
            while let Some(chunk) = rx.blocking_recv() {
                if outcome.error.is_some() {
                    continue;
                }
                match outcome.writer.write_all(&chunk) {
                    Ok(()) => outcome.bytes_written += chunk.len() as u64,
                    Err(e) => {
                        tracing::warn!(sink = %outcome.label, error = %e, "capture sink write failed");
                        outcome.error = Some(e);
                    }
                }
            }
            if outcome.error.is_none() {
                if let Err(e) = outcome.writer.flush() {
                    tracing::warn!(sink = %outcome.label, error = %e, "capture sink flush failed");
                    outcome.error = Some(e);
                }
            }
            outcome
        });

        (Tap { tx }, SpoolHandle { join })
    }
}

/// What a tee observed once its source ended.
#[derive(Debug)]
pub struct TeeOutcome {
    pub stream: StreamName,
    /// Bytes read from the source (and handed to every tap).
    pub bytes: u64,
    /// Bytes accepted by the live destination.
    pub live_bytes: u64,
    pub live_error: Option<io::Error>,
    pub source_error: Option<io::Error>,
    /// Reading stopped before the source reached EOF.
    pub truncated: bool,
}

/// Copies one stream to a live destination and its taps.
pub struct StreamTee {
    stream: StreamName,
    live: Option<Box<dyn AsyncWrite + Send + Unpin>>,
    taps: Vec<Tap>,
    chunk_size: usize,
    stop: Option<(oneshot::Receiver<()>, DrainLimit)>,
}

impl StreamTee {
    pub fn new(stream: StreamName) -> Self {
        Self {
            stream,
            live: None,
            taps: Vec::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            stop: None,
        }
    }

    /// Set the pass-through destination.
    pub fn live<W>(mut self, writer: W) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        self.live = Some(Box::new(writer));
        self
    }

    pub fn tap(mut self, tap: Tap) -> Self {
        self.taps.push(tap);
        self
    }

    pub fn taps(mut self, taps: impl IntoIterator<Item = Tap>) -> Self {
        self.taps.extend(taps);
        self
    }

    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Stop reading once `signal` fires (or its sender is dropped), after
    /// draining at most `limit` more into the taps. The live destination
    /// is released when the signal fires. A failed live destination
    /// starts the same drain without waiting for the signal.
    pub fn stop_on(mut self, signal: oneshot::Receiver<()>, limit: DrainLimit) -> Self {
        self.stop = Some((signal, limit));
        self
    }

    /// Copy `source` until it ends or the stop signal's drain runs out.
    ///
    /// Live write failures drop the live destination and copying continues
    /// into the taps, so they see every byte that was read. The live
    /// destination is shut down at the end (for a child's stdin this is
    /// what delivers EOF).
    pub async fn run<R>(self, mut source: R) -> TeeOutcome
    where
        R: AsyncRead + Unpin,
    {
        let Self {
            stream,
            mut live,
            taps,
            chunk_size,
            stop,
        } = self;
        let mut outcome = TeeOutcome {
            stream,
            bytes: 0,
            live_bytes: 0,
            live_error: None,
            source_error: None,
            truncated: false,
        };
        let mut buf = vec![0u8; chunk_size];
        let (mut signal, limit) = match stop {
            Some((signal, limit)) => (Some(signal), limit),
            None => (None, DrainLimit::default()),
        };
        // Bytes read since the stop signal fired.
        let mut drained: Option<u64> = None;

        loop {
            let read = match (drained, signal.as_mut()) {
                (Some(n), _) if n >= limit.bytes => {
                    outcome.truncated = true;
                    break;
                }
                (Some(_), _) => {
                    match tokio::time::timeout(limit.idle, source.read(&mut buf)).await {
                        Ok(read) => read,
                        Err(_) => {
                            outcome.truncated = true;
                            break;
                        }
                    }
                }
                (None, Some(signal)) => {
                    tokio::select! {
                        biased;
                        _ = signal => {
                            // Whoever read the live side is gone.
                            tracing::debug!(stream = %stream, "stop requested, draining");
                            live = None;
                            drained = Some(0);
                            continue;
                        }
                        read = source.read(&mut buf) => read,
                    }
                }
                (None, None) => source.read(&mut buf).await,
            };
            let n = match read {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::warn!(stream = %stream, error = %e, "read failed, ending stream");
                    outcome.source_error = Some(e);
                    break;
                }
            };
            let chunk = &buf[..n];
            outcome.bytes += n as u64;
            if let Some(drained) = drained.as_mut() {
                *drained += n as u64;
            }

            for tap in &taps {
                tap.send(chunk);
            }

            if let Some(writer) = live.as_mut() {
                match forward(writer, chunk).await {
                    Ok(()) => outcome.live_bytes += n as u64,
                    Err(e) => {
                        log_live_failure(stream, &e);
                        outcome.live_error = Some(e);
                        live = None;
                        // With nobody reading, a stoppable tee only drains.
                        if signal.is_some() && drained.is_none() {
                            drained = Some(0);
                        }
                    }
                }
            }
        }

        if let Some(mut writer) = live {
            if let Err(e) = writer.shutdown().await {
                log_live_failure(stream, &e);
            }
        }
        drop(taps);

        tracing::debug!(
            stream = %stream,
            bytes = outcome.bytes,
            live_bytes = outcome.live_bytes,
            truncated = outcome.truncated,
            "stream drained"
        );
        outcome
    }
}

async fn forward(writer: &mut (dyn AsyncWrite + Send + Unpin), chunk: &[u8]) -> io::Result<()> {
    writer.write_all(chunk).await?;
    writer.flush().await
}

fn log_live_failure(stream: StreamName, error: &io::Error) {
    // The child closing its stdin early is ordinary.
    if stream == StreamName::Stdin && error.kind() == io::ErrorKind::BrokenPipe {
        tracing::debug!(stream = %stream, "child closed stdin");
    } else {
        tracing::warn!(stream = %stream, error = %error, "live forwarding failed");
    }
}

#[cfg(test)]
#[path = "tee_tests.rs"]
mod tests;
