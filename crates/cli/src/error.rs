// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wrapper error taxonomy and its mapping to process exit codes.

use golden_capture::RunError;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes used by the wrapper itself.
///
/// Whenever the child runs to completion the wrapper exits with the
/// child's code instead.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    /// Missing environment or unusable capture directory.
    pub const CONFIG: i32 = 1;
    /// The child binary could not be started.
    pub const START_FAILURE: i32 = 1;
    /// The child ran but its exit status could not be observed.
    pub const UNKNOWN: i32 = golden_capture::UNKNOWN_EXIT_CODE;
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No command to execute.")]
    NoCommand,

    #[error("CAPTURED_DIR not set.")]
    MissingCapturedDir,

    #[error("cannot create capture directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Every failure that ends a wrapper run without a child exit code.
#[derive(Debug, Error)]
pub enum WrapperError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Run(#[from] RunError),
}

impl WrapperError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => exit_codes::CONFIG,
            Self::Run(e) if e.is_start_failure() => exit_codes::START_FAILURE,
            Self::Run(_) => exit_codes::UNKNOWN,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
