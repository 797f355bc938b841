// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables used by golden are defined here.
//! Use these accessors instead of calling `std::env::var()` directly.

/// Generated env var name constants.
mod names {
    include!(concat!(env!("OUT_DIR"), "/env_names.rs"));
}

// Re-export name constants for callers that need the raw name string.
pub use names::*;

use std::path::PathBuf;

/// `CAPTURED_DIR`: Root directory for capture records. Required.
pub fn captured_dir() -> Option<PathBuf> {
    std::env::var_os(names::CAPTURED_DIR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// `GOLDEN_LOG`: Log filter directive for the wrapper's own log file.
pub fn log_filter() -> Option<String> {
    std::env::var(names::GOLDEN_LOG)
        .ok()
        .filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
