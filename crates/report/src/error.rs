// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use golden_capture::record::RecordError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CAPTURED_DIR not set. Pass --dir or set CAPTURED_DIR.")]
    MissingDir,

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("invalid record metadata: {0}")]
    Meta(#[from] serde_json::Error),

    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}
