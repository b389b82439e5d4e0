#![cfg(test)]

use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sniscan_common::config::Config;
use sniscan_common::models::outcome::{FailureReason, ProbeOutcome};
use sniscan_common::network::target::ScanTarget;
use sniscan_core::probe::Prober;
use tempfile::TempDir;

/// Matches a fixed set of addresses. Everything else fails to connect.
pub struct StubProber {
    hits: HashSet<Ipv4Addr>,
}

impl StubProber {
    pub fn matching(hits: &[Ipv4Addr]) -> Self {
        Self {
            hits: hits.iter().copied().collect(),
        }
    }
}

pub fn stub_response(addr: Ipv4Addr) -> String {
    format!("HTTP/1.1 200 OK\r\nServer: stub\r\n\r\nworkercheck from {addr}")
}

#[async_trait]
impl Prober for StubProber {
    async fn probe(&self, target: ScanTarget) -> ProbeOutcome {
        let addr = target.addr;
        if self.hits.contains(&addr) {
            ProbeOutcome::Matched {
                addr,
                response: stub_response(addr),
            }
        } else {
            ProbeOutcome::Failed {
                addr,
                reason: FailureReason::Connect,
            }
        }
    }
}

/// A scratch directory with the three files a run touches.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write_ranges(&self, content: &str) {
        std::fs::write(self.path("ranges.txt"), content).expect("write ranges");
    }

    pub fn config(&self) -> Config {
        Config {
            range_file: self.path("ranges.txt"),
            candidates_file: self.path("candidates.txt"),
            log_file: self.path("response_log.txt"),
            concurrency: 16,
            quiet: true,
            ..Config::default()
        }
    }

    pub fn read(&self, name: &str) -> String {
        read_or_empty(&self.path(name))
    }
}

fn read_or_empty(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}
