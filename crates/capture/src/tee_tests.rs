// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::test_support::{BrokenPipeWriter, Endless, FullDiskWriter, SharedWriter};
use proptest::prelude::*;
use rstest::rstest;
use std::sync::mpsc as std_mpsc;

/// Blocks its first write until the gate opens.
struct GatedWriter {
    gate: std_mpsc::Receiver<()>,
    opened: bool,
    inner: Vec<u8>,
}

impl Write for GatedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.opened {
            self.gate.recv().map_err(io::Error::other)?;
            self.opened = true;
        }
        self.inner.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn copies_to_live_and_taps() {
    let live = SharedWriter::default();
    let (tap, spool) = Spool::spawn("copy", Vec::new());

    let outcome = StreamTee::new(StreamName::Stdout)
        .live(live.clone())
        .tap(tap)
        .run(&b"hello git"[..])
        .await;

    assert_eq!(outcome.bytes, 9);
    assert_eq!(outcome.live_bytes, 9);
    assert!(outcome.live_error.is_none());
    assert_eq!(live.contents(), b"hello git");

    let spooled = spool.finish().await.unwrap();
    assert_eq!(spooled.label, "copy");
    assert_eq!(spooled.writer, b"hello git");
    assert_eq!(spooled.bytes_written, 9);
    assert!(spooled.error.is_none());
}

#[tokio::test]
async fn empty_source_finishes_immediately() {
    let live = SharedWriter::default();
    let (tap, spool) = Spool::spawn("empty", Vec::new());

    let outcome = StreamTee::new(StreamName::Stdin)
        .live(live.clone())
        .tap(tap)
        .run(&b""[..])
        .await;

    assert_eq!(outcome.bytes, 0);
    assert!(live.contents().is_empty());
    assert!(spool.finish().await.unwrap().writer.is_empty());
}

#[rstest]
#[case(1)]
#[case(3)]
#[case(4096)]
#[tokio::test]
async fn small_chunks_preserve_order(#[case] chunk_size: usize) {
    let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
    let live = SharedWriter::default();
    let (tap, spool) = Spool::spawn("order", Vec::new());

    StreamTee::new(StreamName::Stdout)
        .chunk_size(chunk_size)
        .live(live.clone())
        .tap(tap)
        .run(&data[..])
        .await;

    assert_eq!(live.contents(), data);
    assert_eq!(spool.finish().await.unwrap().writer, data);
}

#[tokio::test]
async fn broken_live_destination_keeps_feeding_taps() {
    let (tap, spool) = Spool::spawn("stdin", Vec::new());

    let outcome = StreamTee::new(StreamName::Stdin)
        .live(BrokenPipeWriter)
        .tap(tap)
        .run(&b"never read by the child"[..])
        .await;

    assert_eq!(outcome.live_bytes, 0);
    assert_eq!(
        outcome.live_error.map(|e| e.kind()),
        Some(io::ErrorKind::BrokenPipe)
    );
    assert_eq!(outcome.bytes, 23);
    assert_eq!(spool.finish().await.unwrap().writer, b"never read by the child");
}

#[tokio::test]
async fn failing_tap_does_not_affect_live_or_other_taps() {
    let live = SharedWriter::default();
    let (bad_tap, bad_spool) = Spool::spawn("full-disk", FullDiskWriter);
    let (good_tap, good_spool) = Spool::spawn("good", Vec::new());

    let outcome = StreamTee::new(StreamName::Stderr)
        .live(live.clone())
        .taps([bad_tap, good_tap])
        .chunk_size(2)
        .run(&b"warning: x"[..])
        .await;

    assert!(outcome.live_error.is_none());
    assert_eq!(live.contents(), b"warning: x");

    let bad = bad_spool.finish().await.unwrap();
    assert!(bad.error.is_some());
    assert_eq!(bad.bytes_written, 0);

    let good = good_spool.finish().await.unwrap();
    assert_eq!(good.writer, b"warning: x");
}

#[tokio::test]
async fn stalled_tap_does_not_hold_up_live_path() {
    let (gate_tx, gate_rx) = std_mpsc::channel();
    let gated = GatedWriter {
        gate: gate_rx,
        opened: false,
        inner: Vec::new(),
    };
    let live = SharedWriter::default();
    let (tap, spool) = Spool::spawn("slow", gated);
    let data = vec![b'x'; 256 * 1024];

    let outcome = StreamTee::new(StreamName::Stdout)
        .live(live.clone())
        .tap(tap)
        .run(&data[..])
        .await;

    // The tee finished while the tap is still blocked on its first write.
    assert_eq!(outcome.live_bytes, data.len() as u64);
    assert_eq!(live.contents().len(), data.len());

    gate_tx.send(()).unwrap();
    let spooled = spool.finish().await.unwrap();
    assert_eq!(spooled.writer.inner, data);
}

#[tokio::test]
async fn tee_without_live_destination_still_counts() {
    let (tap, spool) = Spool::spawn("only", Vec::new());
    let outcome = StreamTee::new(StreamName::Stdout)
        .tap(tap)
        .run(&b"abc"[..])
        .await;
    assert_eq!(outcome.bytes, 3);
    assert_eq!(outcome.live_bytes, 0);
    assert_eq!(spool.finish().await.unwrap().writer, b"abc");
}

fn small_drain() -> DrainLimit {
    DrainLimit {
        bytes: 16 * 1024,
        idle: Duration::from_millis(50),
    }
}

#[tokio::test]
async fn stop_signal_bounds_an_endless_source() {
    let (stop_tx, stop_rx) = oneshot::channel();
    let (tap, spool) = Spool::spawn("stdin", Vec::new());
    stop_tx.send(()).unwrap();

    let outcome = StreamTee::new(StreamName::Stdin)
        .chunk_size(1024)
        .stop_on(stop_rx, small_drain())
        .live(SharedWriter::default())
        .tap(tap)
        .run(Endless(b'y'))
        .await;

    assert!(outcome.truncated);
    assert_eq!(outcome.bytes, 16 * 1024);
    assert_eq!(outcome.live_bytes, 0);
    assert_eq!(spool.finish().await.unwrap().writer.len(), 16 * 1024);
}

#[tokio::test]
async fn stop_signal_still_reads_a_short_source_to_eof() {
    let (stop_tx, stop_rx) = oneshot::channel();
    let (tap, spool) = Spool::spawn("stdin", Vec::new());
    stop_tx.send(()).unwrap();

    let outcome = StreamTee::new(StreamName::Stdin)
        .stop_on(stop_rx, small_drain())
        .tap(tap)
        .run(&b"left over"[..])
        .await;

    assert!(!outcome.truncated);
    assert_eq!(spool.finish().await.unwrap().writer, b"left over");
}

#[tokio::test]
async fn dropped_stop_sender_counts_as_stop() {
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    drop(stop_tx);

    let outcome = StreamTee::new(StreamName::Stdin)
        .stop_on(stop_rx, small_drain())
        .run(Endless(b'n'))
        .await;

    assert!(outcome.truncated);
}

#[tokio::test]
async fn broken_live_destination_starts_the_drain() {
    let (_stop_tx, stop_rx) = oneshot::channel();
    let (tap, spool) = Spool::spawn("stdin", Vec::new());

    let outcome = tokio::time::timeout(
        Duration::from_secs(10),
        StreamTee::new(StreamName::Stdin)
            .chunk_size(1024)
            .stop_on(stop_rx, small_drain())
            .live(BrokenPipeWriter)
            .tap(tap)
            .run(Endless(b'y')),
    )
    .await
    .unwrap();

    assert!(outcome.truncated);
    assert_eq!(outcome.bytes, 1024 + 16 * 1024);
    assert_eq!(
        outcome.live_error.map(|e| e.kind()),
        Some(io::ErrorKind::BrokenPipe)
    );
    assert_eq!(spool.finish().await.unwrap().bytes_written, 1024 + 16 * 1024);
}

#[tokio::test]
async fn idle_source_after_stop_is_abandoned() {
    let (stop_tx, stop_rx) = oneshot::channel();
    let (_writer, reader) = tokio::io::duplex(64);
    stop_tx.send(()).unwrap();

    let outcome = tokio::time::timeout(
        Duration::from_secs(10),
        StreamTee::new(StreamName::Stdin)
            .stop_on(stop_rx, small_drain())
            .run(reader),
    )
    .await
    .unwrap();

    assert!(outcome.truncated);
    assert_eq!(outcome.bytes, 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn live_and_tap_receive_identical_bytes(
        data in proptest::collection::vec(any::<u8>(), 0..20_000),
        chunk_size in 1usize..9000,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (live, spooled) = rt.block_on(async {
            let live = SharedWriter::default();
            let (tap, spool) = Spool::spawn("prop", Vec::new());
            StreamTee::new(StreamName::Stdout)
                .chunk_size(chunk_size)
                .live(live.clone())
                .tap(tap)
                .run(&data[..])
                .await;
            (live.contents(), spool.finish().await.unwrap().writer)
        });
        prop_assert_eq!(&live, &data);
        prop_assert_eq!(&spooled, &data);
    }
}
