// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Golden command wrapper
//!
//! Runs `golden <program> [args...]` exactly as the program would run on
//! its own, while recording its stdin, stdout, stderr and exit status
//! under `$CAPTURED_DIR` keyed by a fingerprint of the invocation and its
//! input.

pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod logging;
pub mod output_diagnostic;
pub mod wrapper;
