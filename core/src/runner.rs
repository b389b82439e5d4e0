//! Run driver: reads the range list and scans the ranges one after another.
//!
//! Range N+1 never starts before range N's pool has drained. A line that
//! does not parse, or a range whose scan fails, is reported and skipped.
//! A stop request ends the run after the current range.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use sniscan_common::config::Config;
use sniscan_common::error::ScanError;
use sniscan_common::models::summary::RunSummary;
use sniscan_common::network::range::AddressRange;
use sniscan_common::utils::input;
use tracing::{error, info, warn};

use crate::probe::Prober;
use crate::scanner::{self, ScanContext, ScanObserver};
use crate::signal::StopSignal;
use crate::sink::FileSink;

/// Reads the range list. A missing or unreadable file, or one without any
/// non-blank line, is fatal.
pub fn load_ranges(path: &Path) -> Result<Vec<String>, ScanError> {
    let lines = input::read_range_lines(path).map_err(|source| ScanError::Config {
        path: path.to_path_buf(),
        source,
    })?;

    if lines.is_empty() {
        return Err(ScanError::NoRanges {
            path: path.to_path_buf(),
        });
    }
    Ok(lines)
}

/// Scans every line of `lines` in order.
pub async fn run(lines: &[String], ctx: &ScanContext) -> RunSummary {
    let started = Instant::now();
    let mut summary = RunSummary::new(lines.len());

    for line in lines {
        if ctx.stop.is_stopped() {
            summary.interrupted = true;
            break;
        }

        let range = match line.parse::<AddressRange>() {
            Ok(range) => range,
            Err(err) => {
                warn!("Skipping range: {err}");
                summary.skip();
                continue;
            }
        };

        info!("Scanning {range} ({} hosts)", range.host_count());
        match scanner::scan_range(range, ctx).await {
            Ok(report) => {
                info!(
                    "Finished {range}: {} candidate(s) found",
                    report.matched.len()
                );
                summary.absorb(&report);
                if report.interrupted {
                    warn!("Scan of {range} interrupted");
                    break;
                }
            }
            Err(err) => {
                error!("Scan of {range} abandoned, {}", error_chain(&err));
                summary.skip();
            }
        }
    }

    summary.elapsed = started.elapsed();
    summary
}

/// `outer: inner: innermost`
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

/// Full run against file-backed stores.
///
/// The range list is read before the stores are opened, so a fatal
/// configuration error leaves no files behind.
pub async fn run_with_config(
    cfg: &Config,
    prober: Arc<dyn Prober>,
    observer: Arc<dyn ScanObserver>,
    stop: StopSignal,
) -> Result<RunSummary, ScanError> {
    let lines = load_ranges(&cfg.range_file)?;
    info!(
        "Loaded {} range(s) from {}",
        lines.len(),
        cfg.range_file.display()
    );

    let sink = FileSink::open(&cfg.candidates_file, &cfg.log_file).await?;
    let ctx = ScanContext::new(prober, Arc::new(sink), cfg.probe.port, cfg.concurrency)
        .with_observer(observer)
        .with_stop(stop);

    Ok(run(&lines, &ctx).await)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
