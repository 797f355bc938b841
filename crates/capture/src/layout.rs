// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Path computation for a capture directory. No I/O.

use crate::fingerprint::Fingerprint;
use crate::sink::StreamName;
use std::path::{Path, PathBuf};

pub const META_FILE: &str = "meta.json";
pub const CMD_FILE: &str = "cmd";
pub const LOG_FILE: &str = "golden.log";

pub fn records_dir(root: &Path) -> PathBuf {
    root.join("records")
}

pub fn history_dir(root: &Path) -> PathBuf {
    root.join("history")
}

pub fn staging_dir(root: &Path) -> PathBuf {
    root.join(".staging")
}

pub fn record_dir(root: &Path, fingerprint: &Fingerprint) -> PathBuf {
    records_dir(root).join(fingerprint.to_hex())
}

pub fn history_path(root: &Path, fingerprint: &Fingerprint) -> PathBuf {
    history_dir(root).join(format!("{}.log", fingerprint.to_hex()))
}

pub fn stream_path(record_dir: &Path, stream: StreamName) -> PathBuf {
    record_dir.join(stream.as_str())
}

pub fn log_path(root: &Path) -> PathBuf {
    root.join(LOG_FILE)
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
