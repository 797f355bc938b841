// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Listing and showing stored records.

use crate::error::ReportError;
use golden_capture::record::StoredRecord;
use golden_capture::StreamName;
use std::io::Write;

/// One line per record: fingerprint, exit code, stream sizes, invocation.
pub fn write_list<W: Write>(out: &mut W, records: &[StoredRecord]) -> Result<(), ReportError> {
    for record in records {
        let meta = record.meta();
        writeln!(
            out,
            "{}  exit={:<3} out={:<8} err={:<8} {}",
            meta.fingerprint, meta.exit_code, meta.stdout_bytes, meta.stderr_bytes, meta.invocation
        )?;
    }
    Ok(())
}

/// Record metadata as JSON, followed by the raw captured stdout.
pub fn write_show<W: Write>(out: &mut W, record: &StoredRecord) -> Result<(), ReportError> {
    let meta = serde_json::to_string_pretty(record.meta())?;
    writeln!(out, "{}", meta)?;
    writeln!(out, "--- stdout ---")?;
    out.write_all(&record.stream(StreamName::Stdout)?)?;
    Ok(())
}

#[cfg(test)]
#[path = "inspect_tests.rs"]
mod tests;
