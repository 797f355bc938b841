// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transparent subprocess capture.
//!
//! Runs a child command with its standard streams passed through unchanged
//! while a copy of the whole interaction (invocation, stdin, stdout, stderr,
//! exit status) is persisted under a deterministic fingerprint.

mod exit;
mod fingerprint;
mod invocation;
pub mod layout;
pub mod record;
mod runner;
pub mod sink;
pub mod summary;
mod tee;

#[cfg(test)]
mod test_support;

pub use exit::{ExitDescriptor, UNKNOWN_EXIT_CODE};
pub use fingerprint::{Fingerprint, FingerprintComputer, Fingerprinter};
pub use invocation::Invocation;
pub use runner::{ProcessRunner, RunError, RunOutcome, RunnerConfig, RunnerState};
pub use sink::{ByteCounts, CaptureSink, Completion, RecordWriter, SinkError, StreamName};
pub use tee::{DrainLimit, Spool, SpoolHandle, SpoolOutcome, StreamTee, Tap, TeeOutcome};
