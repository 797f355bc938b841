// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One-line run summaries appended to a fingerprint's history log.
//!
//! Format:
//!
//! ```text
//! <started> <finished> <invocation> | <stdin> in=<n> out=<n> err=<n> exit=<code|?>
//! ```
//!
//! Timestamps are UTC with second precision. Newlines in stdin are
//! flattened to spaces so every run stays on a single line, and the stdin
//! column holds at most [`SUMMARY_STDIN_LIMIT`] bytes of it; `in=` is the
//! full length. In the invocation, `\` and `|` are escaped with a
//! backslash so the separator stays unambiguous.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt;
use thiserror::Error;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Most stdin bytes shown in a summary line.
pub const SUMMARY_STDIN_LIMIT: usize = 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SummaryError {
    #[error("summary line is truncated")]
    Truncated,

    #[error("invalid timestamp '{0}'")]
    Timestamp(String),

    #[error("invalid field '{0}'")]
    Field(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub invocation: String,
    /// Leading stdin as lossy UTF-8 with newlines flattened.
    pub stdin: String,
    pub stdin_bytes: u64,
    pub stdout_bytes: u64,
    pub stderr_bytes: u64,
    /// `None` when the child's exit status was unknown.
    pub exit_code: Option<i32>,
}

/// Render raw stdin for the summary column.
pub fn flatten_stdin(stdin: &[u8]) -> String {
    String::from_utf8_lossy(stdin).replace('\n', " ")
}

fn escape_invocation(invocation: &str) -> String {
    invocation.replace('\\', "\\\\").replace('|', "\\|")
}

/// Split `<escaped invocation> | <stdin>` at the first unescaped separator.
fn split_invocation(middle: &str) -> Option<(String, &str)> {
    let mut invocation = String::new();
    let mut chars = middle.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => invocation.push(chars.next()?.1),
            ' ' if middle[i..].starts_with(" | ") => return Some((invocation, &middle[i + 3..])),
            c => invocation.push(c),
        }
    }
    None
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, SummaryError> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| SummaryError::Timestamp(s.to_string()))
}

fn parse_field<T: std::str::FromStr>(token: &str, key: &str) -> Result<T, SummaryError> {
    token
        .strip_prefix(key)
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| SummaryError::Field(token.to_string()))
}

impl RunSummary {
    pub fn parse(line: &str) -> Result<Self, SummaryError> {
        let line = line.trim_end_matches(['\n', '\r']);

        // Counters are the last four space-separated tokens.
        let mut tail = line.rsplitn(5, ' ');
        let exit = tail.next().ok_or(SummaryError::Truncated)?;
        let err = tail.next().ok_or(SummaryError::Truncated)?;
        let out = tail.next().ok_or(SummaryError::Truncated)?;
        let input = tail.next().ok_or(SummaryError::Truncated)?;
        let rest = tail.next().ok_or(SummaryError::Truncated)?;

        let exit_code = match exit.strip_prefix("exit=") {
            Some("?") => None,
            Some(_) => Some(parse_field(exit, "exit=")?),
            None => return Err(SummaryError::Field(exit.to_string())),
        };
        let stdin_bytes = parse_field(input, "in=")?;
        let stdout_bytes = parse_field(out, "out=")?;
        let stderr_bytes = parse_field(err, "err=")?;

        let mut head = rest.splitn(3, ' ');
        let started_at = parse_timestamp(head.next().ok_or(SummaryError::Truncated)?)?;
        let finished_at = parse_timestamp(head.next().ok_or(SummaryError::Truncated)?)?;
        let middle = head.next().ok_or(SummaryError::Truncated)?;

        let (invocation, stdin) = split_invocation(middle).ok_or(SummaryError::Truncated)?;

        Ok(Self {
            started_at,
            finished_at,
            invocation,
            stdin: stdin.to_string(),
            stdin_bytes,
            stdout_bytes,
            stderr_bytes,
            exit_code,
        })
    }

    /// Wall-clock run time in whole seconds.
    pub fn duration_secs(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let exit = self
            .exit_code
            .map_or_else(|| "?".to_string(), |c| c.to_string());
        write!(
            f,
            "{} {} {} | {} in={} out={} err={} exit={}",
            format_timestamp(&self.started_at),
            format_timestamp(&self.finished_at),
            escape_invocation(&self.invocation),
            self.stdin,
            self.stdin_bytes,
            self.stdout_bytes,
            self.stderr_bytes,
            exit
        )
    }
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod tests;
