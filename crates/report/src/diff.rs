// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Line diff of the stdout captured by two records.

use crate::error::ReportError;
use golden_capture::record::StoredRecord;
use golden_capture::StreamName;
use similar::TextDiff;

/// Unified diff of the two captured stdout streams, or `None` when they
/// are byte-identical.
pub fn stdout_diff(a: &StoredRecord, b: &StoredRecord) -> Result<Option<String>, ReportError> {
    let old = a.stream(StreamName::Stdout)?;
    let new = b.stream(StreamName::Stdout)?;
    if old == new {
        return Ok(None);
    }

    let old = String::from_utf8_lossy(&old);
    let new = String::from_utf8_lossy(&new);
    let old_name = a.meta().fingerprint.to_hex();
    let new_name = b.meta().fingerprint.to_hex();

    let diff = TextDiff::from_lines(old.as_ref(), new.as_ref());
    let rendered = diff
        .unified_diff()
        .context_radius(3)
        .header(&old_name, &new_name)
        .to_string();
    Ok(Some(rendered))
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;
