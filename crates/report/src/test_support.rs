// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Records written through the real directory sink.

use golden_capture::record::StoredRecord;
use golden_capture::sink::DirectorySink;
use golden_capture::{
    layout, ByteCounts, CaptureSink, Completion, ExitDescriptor, FingerprintComputer, Invocation,
    StreamName,
};
use chrono::Utc;
use std::io::Write;
use std::path::Path;

pub fn store(root: &Path, argv: &[&str], stdin: &[u8], stdout: &[u8], code: i32) -> StoredRecord {
    let invocation = Invocation::new(argv.iter().copied()).unwrap();
    let sink = DirectorySink::new(root);
    let mut record = sink.open().unwrap();
    record.append_meta(&invocation, Utc::now()).unwrap();
    for (stream, data) in [
        (StreamName::Stdin, stdin),
        (StreamName::Stdout, stdout),
        (StreamName::Stderr, &b""[..]),
    ] {
        let mut w = record.stream_writer(stream).unwrap();
        w.write_all(data).unwrap();
        w.flush().unwrap();
    }
    let fingerprint = FingerprintComputer::compute_bytes(&invocation, stdin);
    record
        .finalize(Completion {
            fingerprint,
            exit: ExitDescriptor::Exited { code },
            counts: ByteCounts {
                stdin: stdin.len() as u64,
                stdout: stdout.len() as u64,
                stderr: 0,
            },
            capture_complete: true,
            stdin_truncated: false,
        })
        .unwrap();
    StoredRecord::load(&layout::record_dir(root, &fingerprint)).unwrap()
}
