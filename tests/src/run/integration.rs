#![cfg(test)]

use std::net::Ipv4Addr;
use std::sync::Arc;

use sniscan_common::error::ScanError;
use sniscan_core::runner;
use sniscan_core::scanner::NoopObserver;
use sniscan_core::signal::StopSignal;

use crate::util::{StubProber, Workspace, stub_response};

const HIT: Ipv4Addr = Ipv4Addr::new(203, 0, 113, 2);

async fn run_in(ws: &Workspace, hits: &[Ipv4Addr]) -> Result<sniscan_common::models::summary::RunSummary, ScanError> {
    runner::run_with_config(
        &ws.config(),
        Arc::new(StubProber::matching(hits)),
        Arc::new(NoopObserver),
        StopSignal::never(),
    )
    .await
}

#[tokio::test]
async fn single_range_single_match() {
    let ws = Workspace::new();
    ws.write_ranges("203.0.113.0/30\n");

    let summary = run_in(&ws, &[HIT]).await.unwrap();

    assert_eq!(summary.total_matched, 1);
    assert_eq!(summary.ranges_scanned, 1);
    assert!(!summary.interrupted);
    assert_eq!(ws.read("candidates.txt"), "203.0.113.2\n");

    let expected_block = format!(
        "{}\nIP: 203.0.113.2\nResponse:\n{}\n{}\n\n",
        "=".repeat(21),
        stub_response(HIT),
        "=".repeat(20)
    );
    assert_eq!(ws.read("response_log.txt"), expected_block);
}

#[tokio::test]
async fn missing_range_list_touches_nothing() {
    let ws = Workspace::new();

    let err = run_in(&ws, &[HIT]).await.unwrap_err();

    assert!(matches!(err, ScanError::Config { .. }));
    assert!(!ws.path("candidates.txt").exists());
    assert!(!ws.path("response_log.txt").exists());
}

#[tokio::test]
async fn empty_range_list_is_fatal() {
    let ws = Workspace::new();
    ws.write_ranges("\n  \n");

    let err = run_in(&ws, &[HIT]).await.unwrap_err();

    assert!(matches!(err, ScanError::NoRanges { .. }));
    assert!(!ws.path("candidates.txt").exists());
}

#[tokio::test]
async fn malformed_line_is_skipped() {
    let ws = Workspace::new();
    ws.write_ranges("not-a-cidr\n  203.0.113.0/30  \n");

    let summary = run_in(&ws, &[HIT]).await.unwrap();

    assert_eq!(summary.ranges_total, 2);
    assert_eq!(summary.ranges_skipped, 1);
    assert_eq!(summary.ranges_scanned, 1);
    assert_eq!(summary.total_matched, 1);
    assert_eq!(ws.read("candidates.txt"), "203.0.113.2\n");
}

#[tokio::test]
async fn overlapping_ranges_are_not_deduplicated() {
    let ws = Workspace::new();
    ws.write_ranges("203.0.113.0/30\n203.0.113.0/29\n");

    let summary = run_in(&ws, &[HIT]).await.unwrap();

    assert_eq!(summary.total_matched, 2);
    assert_eq!(ws.read("candidates.txt"), "203.0.113.2\n203.0.113.2\n");
}

#[tokio::test]
async fn previous_results_are_kept() {
    let ws = Workspace::new();
    ws.write_ranges("203.0.113.0/30\n");
    std::fs::write(ws.path("candidates.txt"), "198.51.100.7\n").unwrap();

    run_in(&ws, &[HIT]).await.unwrap();

    assert_eq!(ws.read("candidates.txt"), "198.51.100.7\n203.0.113.2\n");
}

#[tokio::test]
async fn slash_31_yields_no_targets() {
    let ws = Workspace::new();
    ws.write_ranges("203.0.113.2/31\n");

    let summary = run_in(&ws, &[HIT]).await.unwrap();

    assert_eq!(summary.ranges_scanned, 1);
    assert_eq!(summary.total_matched, 0);
    assert_eq!(ws.read("candidates.txt"), "");
}

#[tokio::test]
async fn many_matches_in_one_range() {
    let ws = Workspace::new();
    ws.write_ranges("10.20.0.0/24\n");
    let hits: Vec<Ipv4Addr> = (1..=254).map(|n| Ipv4Addr::new(10, 20, 0, n)).collect();

    let summary = run_in(&ws, &hits).await.unwrap();

    assert_eq!(summary.total_matched, 254);
    let candidates = ws.read("candidates.txt");
    let mut found: Vec<Ipv4Addr> = candidates.lines().map(|l| l.parse().unwrap()).collect();
    found.sort();
    assert_eq!(found, hits);
    assert_eq!(ws.read("response_log.txt").matches("Response:\n").count(), 254);
}
