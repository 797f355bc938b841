// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Aggregate statistics over every history log in a capture directory.
//!
//! Only successful runs count as requests. Within one fingerprint's
//! history the first successful run is the reference and is neither a
//! hit nor a miss: a later run that started after the reference finished
//! could have been served from the capture (a cache hit), anything else
//! is a miss.

use crate::error::ReportError;
use golden_capture::layout;
use golden_capture::summary::RunSummary;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// Successful runs with more stdin than this are filtered out.
    pub stdin_limit: Option<usize>,
    pub total_requests: u64,
    pub filtered_requests: u64,
    pub exit_nonzeroes: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub largest_stdout: u64,
    /// Seconds.
    pub longest_duration: i64,
    /// Distinct stderr sizes seen on counted runs.
    pub stderr_lengths: BTreeSet<u64>,
    /// Fingerprints whose stdout size drifted from their reference run.
    pub stdout_variations: BTreeSet<String>,
}

impl Stats {
    pub fn new(stdin_limit: Option<usize>) -> Self {
        Self {
            stdin_limit,
            ..Self::default()
        }
    }

    /// Scan `<root>/history/*.log` in name order.
    ///
    /// A missing history directory yields empty statistics. Lines that do
    /// not parse are skipped with a warning.
    pub fn collect(root: &Path, stdin_limit: Option<usize>) -> Result<Self, ReportError> {
        let mut stats = Self::new(stdin_limit);
        let history = layout::history_dir(root);
        let entries = match std::fs::read_dir(&history) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(stats),
            Err(source) => {
                return Err(ReportError::Io {
                    path: history,
                    source,
                })
            }
        };

        let mut logs: Vec<_> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "log"))
            .collect();
        logs.sort();

        for path in logs {
            let content = std::fs::read_to_string(&path).map_err(|source| ReportError::Io {
                path: path.clone(),
                source,
            })?;
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let runs = content
                .lines()
                .filter(|line| !line.trim().is_empty())
                .filter_map(|line| match RunSummary::parse(line) {
                    Ok(summary) => Some(summary),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping history line");
                        None
                    }
                });
            stats.add_history(&name, runs);
        }
        Ok(stats)
    }

    /// Fold one fingerprint's runs, oldest first.
    pub fn add_history(&mut self, name: &str, runs: impl IntoIterator<Item = RunSummary>) {
        let mut reference: Option<RunSummary> = None;

        for run in runs {
            if run.exit_code != Some(0) {
                self.exit_nonzeroes += 1;
                continue;
            }
            if self
                .stdin_limit
                .is_some_and(|limit| run.stdin_bytes > limit as u64)
            {
                self.filtered_requests += 1;
                continue;
            }

            self.total_requests += 1;
            self.largest_stdout = self.largest_stdout.max(run.stdout_bytes);
            self.longest_duration = self.longest_duration.max(run.duration_secs());
            self.stderr_lengths.insert(run.stderr_bytes);

            match &reference {
                None => reference = Some(run),
                Some(first) => {
                    if run.started_at > first.finished_at {
                        self.cache_hits += 1;
                    } else {
                        self.cache_misses += 1;
                    }
                    if stdout_varies(first.stdout_bytes, run.stdout_bytes) {
                        self.stdout_variations.insert(name.to_string());
                    }
                }
            }
        }
    }
}

/// More than 10% away from the reference size.
fn stdout_varies(reference: u64, observed: u64) -> bool {
    if reference == 0 {
        return observed != 0;
    }
    reference.abs_diff(observed) * 10 > reference
}

/// `n` as a share of `total`, one decimal place.
pub fn percent(n: u64, total: u64) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", n as f64 * 100.0 / total as f64)
}

fn join<T: ToString>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(limit) = self.stdin_limit {
            writeln!(f, "stdin_limit {}", limit)?;
            writeln!(
                f,
                "filtered_requests {} {}",
                self.filtered_requests,
                percent(
                    self.filtered_requests,
                    self.total_requests + self.filtered_requests
                )
            )?;
        }
        writeln!(f, "total_requests {}", self.total_requests)?;
        writeln!(
            f,
            "cache_hits {} {}",
            self.cache_hits,
            percent(self.cache_hits, self.total_requests)
        )?;
        writeln!(
            f,
            "cache_misses {} {}",
            self.cache_misses,
            percent(self.cache_misses, self.total_requests)
        )?;
        writeln!(
            f,
            "exit_nonzeroes {} {}",
            self.exit_nonzeroes,
            percent(
                self.exit_nonzeroes,
                self.total_requests + self.filtered_requests + self.exit_nonzeroes
            )
        )?;
        writeln!(f, "largest_stdout {}", self.largest_stdout)?;
        writeln!(f, "longest_duration {}", self.longest_duration)?;
        writeln!(
            f,
            "{}",
            format!("stderr patterns {}", join(&self.stderr_lengths)).trim_end()
        )?;
        writeln!(
            f,
            "{}",
            format!("stdout_variations {}", join(&self.stdout_variations)).trim_end()
        )
    }
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
