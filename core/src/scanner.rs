//! Scan coordinator for a single range.
//!
//! Targets are expanded lazily and fed into a [`JoinSet`] that never holds
//! more than `concurrency` probes, so memory and open sockets are bounded by
//! the limit rather than by the size of the range. Outcomes are handled in
//! completion order by this loop alone, which makes it the single writer of
//! the progress counters, the match list and the result sink.

use std::net::Ipv4Addr;
use std::sync::Arc;

use sniscan_common::config::LARGE_RANGE_WARNING;
use sniscan_common::error::ScanError;
use sniscan_common::models::outcome::ProbeOutcome;
use sniscan_common::models::progress::{ProgressSnapshot, ProgressState};
use sniscan_common::models::summary::RangeReport;
use sniscan_common::network::range::AddressRange;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::probe::Prober;
use crate::signal::StopSignal;
use crate::sink::ResultSink;

/// Hooks for live progress display. All methods default to doing nothing.
pub trait ScanObserver: Send + Sync {
    fn range_started(&self, _range: &AddressRange, _total: u64) {}

    /// Called after every completed probe, matched or not.
    fn progress(&self, _snapshot: ProgressSnapshot) {}

    /// Called once per match, after it has been written to the sink.
    fn matched(&self, _addr: Ipv4Addr) {}

    fn range_finished(&self, _report: &RangeReport) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ScanObserver for NoopObserver {}

/// Everything a range scan needs, shared across all ranges of a run.
#[derive(Clone)]
pub struct ScanContext {
    pub prober: Arc<dyn Prober>,
    pub sink: Arc<dyn ResultSink>,
    pub observer: Arc<dyn ScanObserver>,
    pub port: u16,
    /// Maximum number of probes in flight. Values below 1 are treated as 1.
    pub concurrency: usize,
    pub stop: StopSignal,
}

impl ScanContext {
    pub fn new(
        prober: Arc<dyn Prober>,
        sink: Arc<dyn ResultSink>,
        port: u16,
        concurrency: usize,
    ) -> Self {
        Self {
            prober,
            sink,
            observer: Arc::new(NoopObserver),
            port,
            concurrency,
            stop: StopSignal::never(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ScanObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_stop(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }
}

/// Probes every usable host of `range`.
///
/// Returns the matched addresses in completion order. On a stop request the
/// in-flight probes are aborted and the partial report is returned with
/// `interrupted` set. A sink failure abandons the range with an error.
pub async fn scan_range(range: AddressRange, ctx: &ScanContext) -> Result<RangeReport, ScanError> {
    let total = range.host_count();
    if total == 0 {
        warn!("No scannable addresses in {range}");
        return Ok(RangeReport::empty(range));
    }
    if total > LARGE_RANGE_WARNING {
        warn!("{range} holds {total} addresses, this will take a while");
    }

    ctx.observer.range_started(&range, total);

    let progress = ProgressState::new(total);
    let mut matched: Vec<Ipv4Addr> = Vec::new();
    let result = drive(&range, ctx, &progress, &mut matched).await;

    let report = RangeReport {
        range,
        matched,
        progress: progress.snapshot(),
        interrupted: matches!(result, Ok(Drained::Interrupted)),
    };
    ctx.observer.range_finished(&report);

    result.map(|_| report)
}

enum Drained {
    Completed,
    Interrupted,
}

async fn drive(
    range: &AddressRange,
    ctx: &ScanContext,
    progress: &ProgressState,
    matched: &mut Vec<Ipv4Addr>,
) -> Result<Drained, ScanError> {
    let limit = ctx.concurrency.max(1);
    let mut pending = range.targets(ctx.port);
    let mut in_flight: JoinSet<ProbeOutcome> = JoinSet::new();
    let mut stop = ctx.stop.clone();

    loop {
        if stop.is_stopped() {
            in_flight.abort_all();
            return Ok(Drained::Interrupted);
        }

        while in_flight.len() < limit {
            let Some(target) = pending.next() else { break };
            let prober = Arc::clone(&ctx.prober);
            in_flight.spawn(async move { prober.probe(target).await });
        }

        let joined = tokio::select! {
            biased;
            _ = stop.stopped() => {
                in_flight.abort_all();
                return Ok(Drained::Interrupted);
            }
            joined = in_flight.join_next() => joined,
        };

        let Some(joined) = joined else {
            return Ok(Drained::Completed);
        };

        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!("probe task in {range} ended abnormally: {err}");
                ctx.observer.progress(progress.record(false));
                continue;
            }
        };

        let snapshot = progress.record(outcome.is_match());
        if let ProbeOutcome::Matched { addr, response } = outcome {
            info!("Found candidate {addr}");
            matched.push(addr);
            ctx.sink
                .record_match(addr, &response)
                .await
                .map_err(|source| ScanError::Sink { addr, source })?;
            ctx.observer.matched(addr);
        }
        ctx.observer.progress(snapshot);
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
