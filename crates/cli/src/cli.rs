// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command line: `golden <program> [args...]`.
//!
//! The wrapper has no flags of its own. Every token, including ones that
//! look like flags, belongs to the child.

use clap::Parser;
use golden_capture::Invocation;

use crate::error::ConfigError;

/// Run a command transparently and record a golden capture of it
#[derive(Parser, Debug, Clone)]
#[command(
    name = "golden",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Program to run, followed by its arguments
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

impl Cli {
    pub fn invocation(&self) -> Result<Invocation, ConfigError> {
        Invocation::new(self.command.iter().cloned()).ok_or(ConfigError::NoCommand)
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
