// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use chrono::TimeZone;
use yare::parameterized;

fn sample() -> RunSummary {
    RunSummary {
        started_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        finished_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 2).unwrap(),
        invocation: "sed -e s/world/git/g".to_string(),
        stdin: "hello world".to_string(),
        stdin_bytes: 11,
        stdout_bytes: 9,
        stderr_bytes: 0,
        exit_code: Some(0),
    }
}

#[test]
fn renders_single_line() {
    assert_eq!(
        sample().to_string(),
        "2026-03-01T12:00:00Z 2026-03-01T12:00:02Z sed -e s/world/git/g | hello world in=11 out=9 err=0 exit=0"
    );
}

#[test]
fn parses_rendered_line() {
    let line = sample().to_string();
    assert_eq!(RunSummary::parse(&line).unwrap(), sample());
    assert_eq!(RunSummary::parse(&format!("{line}\n")).unwrap(), sample());
}

#[test]
fn unknown_exit_renders_question_mark() {
    let summary = RunSummary {
        exit_code: None,
        ..sample()
    };
    let line = summary.to_string();
    assert!(line.ends_with("exit=?"));
    assert_eq!(RunSummary::parse(&line).unwrap().exit_code, None);
}

#[test]
fn empty_stdin_parses() {
    let summary = RunSummary {
        stdin: String::new(),
        ..sample()
    };
    let parsed = RunSummary::parse(&summary.to_string()).unwrap();
    assert_eq!(parsed.stdin, "");
    assert_eq!(parsed.invocation, "sed -e s/world/git/g");
}

#[test]
fn stdin_containing_pipes_and_counters_is_kept() {
    let summary = RunSummary {
        stdin: "a | b out=1".to_string(),
        ..sample()
    };
    let parsed = RunSummary::parse(&summary.to_string()).unwrap();
    assert_eq!(parsed.stdin, "a | b out=1");
    assert_eq!(parsed.stdout_bytes, 9);
}

#[test]
fn pipe_in_invocation_round_trips() {
    let summary = RunSummary {
        invocation: "sh -c ls | wc -l".to_string(),
        stdin: "in".to_string(),
        stdin_bytes: 2,
        ..sample()
    };
    let line = summary.to_string();
    assert!(line.contains(" sh -c ls \\| wc -l | in in=2 "));

    let parsed = RunSummary::parse(&line).unwrap();
    assert_eq!(parsed.invocation, "sh -c ls | wc -l");
    assert_eq!(parsed.stdin, "in");
    assert_eq!(parsed, summary);
}

#[parameterized(
    backslash = { r"printf a\nb" },
    trailing_backslash = { r"echo \" },
    escaped_pipe_lookalike = { r"echo \| x" },
    separator_lookalike = { "echo a | b | c" },
)]
fn escaped_invocations_round_trip(invocation: &str) {
    let summary = RunSummary {
        invocation: invocation.to_string(),
        ..sample()
    };
    assert_eq!(RunSummary::parse(&summary.to_string()).unwrap(), summary);
}

#[test]
fn stdin_length_is_kept_apart_from_the_column() {
    let summary = RunSummary {
        stdin: "abc".to_string(),
        stdin_bytes: 1_000_000,
        ..sample()
    };
    let parsed = RunSummary::parse(&summary.to_string()).unwrap();
    assert_eq!(parsed.stdin, "abc");
    assert_eq!(parsed.stdin_bytes, 1_000_000);
}

#[test]
fn duration_is_in_seconds() {
    assert_eq!(sample().duration_secs(), 2);
}

#[test]
fn flattens_newlines() {
    assert_eq!(flatten_stdin(b"a\nb\n"), "a b ");
    assert_eq!(flatten_stdin(&[0xff, b'x']), "\u{fffd}x");
}

#[parameterized(
    empty = { "" },
    no_counters = { "2026-03-01T12:00:00Z 2026-03-01T12:00:02Z ls | " },
    bad_timestamp = { "yesterday 2026-03-01T12:00:02Z ls |  in=0 out=0 err=0 exit=0" },
    bad_counter = { "2026-03-01T12:00:00Z 2026-03-01T12:00:02Z ls |  in=0 out=x err=0 exit=0" },
    missing_stdin_length = { "2026-03-01T12:00:00Z 2026-03-01T12:00:02Z ls |  out=0 err=0 exit=0" },
    no_separator = { "2026-03-01T12:00:00Z 2026-03-01T12:00:02Z ls in=0 out=0 err=0 exit=0" },
    escaped_separator_only = { r"2026-03-01T12:00:00Z 2026-03-01T12:00:02Z ls \| x in=0 out=0 err=0 exit=0" },
)]
fn rejects_malformed_lines(line: &str) {
    assert!(RunSummary::parse(line).is_err());
}
