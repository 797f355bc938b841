// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inspect golden captures
#[derive(Parser, Debug)]
#[command(name = "golden-report", version)]
#[command(about = "Statistics, listing and diffing over a golden capture directory")]
pub struct Cli {
    /// Capture directory
    #[arg(long, global = true, env = "CAPTURED_DIR", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Aggregate statistics over every run history
    Stats {
        /// Count successful runs with more stdin bytes than this as filtered
        #[arg(long, value_name = "N")]
        stdin_limit: Option<usize>,
    },

    /// List stored records
    List,

    /// Print one record's metadata and captured stdout
    Show {
        /// Fingerprint or unambiguous prefix
        fingerprint: String,
    },

    /// Diff the captured stdout of two records
    Diff {
        a: String,
        b: String,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
