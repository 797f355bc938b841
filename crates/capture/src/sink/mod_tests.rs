// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;

#[test]
fn stream_names_are_file_names() {
    let names: Vec<&str> = StreamName::ALL.iter().map(StreamName::as_str).collect();
    assert_eq!(names, ["stdin", "stdout", "stderr"]);
    assert_eq!(StreamName::Stderr.to_string(), "stderr");
}

#[test]
fn byte_counts_default_to_zero() {
    let counts = ByteCounts::default();
    assert_eq!((counts.stdin, counts.stdout, counts.stderr), (0, 0, 0));
}
