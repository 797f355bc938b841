// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reporting over golden capture directories.
//!
//! Reads the records and history logs the `golden` wrapper writes and
//! summarizes, lists, shows or diffs them.

pub mod cli;
pub mod diff;
pub mod error;
pub mod inspect;
pub mod stats;
#[cfg(test)]
mod test_support;

use cli::{Cli, Command};
use error::ReportError;
use golden_capture::record::{find_record, list_records};
use stats::Stats;
use std::io::Write;

/// Exit code for `diff` when the records differ.
pub const DIFF_FOUND: i32 = 1;

/// Execute a parsed command line, writing the report to `out`.
///
/// Returns the process exit code.
pub fn run<W: Write>(cli: Cli, out: &mut W) -> Result<i32, ReportError> {
    let root = cli.dir.ok_or(ReportError::MissingDir)?;

    match cli.command {
        Command::Stats { stdin_limit } => {
            let stats = Stats::collect(&root, stdin_limit)?;
            write!(out, "{}", stats)?;
        }
        Command::List => inspect::write_list(out, &list_records(&root))?,
        Command::Show { fingerprint } => {
            inspect::write_show(out, &find_record(&root, &fingerprint)?)?;
        }
        Command::Diff { a, b } => {
            let a = find_record(&root, &a)?;
            let b = find_record(&root, &b)?;
            if let Some(diff) = diff::stdout_diff(&a, &b)? {
                write!(out, "{}", diff)?;
                return Ok(DIFF_FOUND);
            }
        }
    }
    Ok(0)
}
