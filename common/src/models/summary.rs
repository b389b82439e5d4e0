use std::net::Ipv4Addr;
use std::time::Duration;

use crate::models::progress::ProgressSnapshot;
use crate::network::range::AddressRange;

/// What one range's scan produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeReport {
    pub range: AddressRange,
    /// Matched addresses in completion order.
    pub matched: Vec<Ipv4Addr>,
    pub progress: ProgressSnapshot,
    /// The scan was stopped before every target finished.
    pub interrupted: bool,
}

impl RangeReport {
    pub fn empty(range: AddressRange) -> Self {
        Self {
            range,
            matched: Vec::new(),
            progress: ProgressSnapshot::default(),
            interrupted: false,
        }
    }
}

/// Totals for a whole run, reported once at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Non-blank lines in the range list.
    pub ranges_total: usize,
    /// Ranges whose scan ran, fully or until interrupted.
    pub ranges_scanned: usize,
    /// Ranges that failed to parse or were abandoned after an error.
    pub ranges_skipped: usize,
    pub total_matched: usize,
    pub interrupted: bool,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn new(ranges_total: usize) -> Self {
        Self {
            ranges_total,
            ..Self::default()
        }
    }

    pub fn absorb(&mut self, report: &RangeReport) {
        self.ranges_scanned += 1;
        self.total_matched += report.matched.len();
        self.interrupted |= report.interrupted;
    }

    pub fn skip(&mut self) {
        self.ranges_skipped += 1;
    }
}
