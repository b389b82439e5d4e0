use std::sync::Arc;

use anyhow::Context;
use colored::*;
use sniscan_common::config::Config;
use sniscan_common::models::summary::RunSummary;
use sniscan_core::probe::TlsProber;
use sniscan_core::runner;
use sniscan_core::scanner::{NoopObserver, ScanObserver};
use sniscan_core::signal::{self, StopHandle};
use tracing::{info, warn};

use crate::terminal::progress::RangeProgress;
use crate::terminal::{colors, format, print};

/// Exit status after a forced interrupt, as shells report SIGINT.
const INTERRUPTED_EXIT_CODE: i32 = 130;

pub async fn scan(cfg: &Config) -> anyhow::Result<RunSummary> {
    print_settings(cfg);
    print::header("starting scanner");

    let prober = TlsProber::new(&cfg.probe).context("invalid probe configuration")?;

    let (handle, stop) = signal::stop_signal();
    listen_for_interrupt(handle);

    let observer: Arc<dyn ScanObserver> = if cfg.quiet {
        Arc::new(NoopObserver)
    } else {
        Arc::new(RangeProgress::new())
    };

    let summary = runner::run_with_config(cfg, Arc::new(prober), observer, stop).await?;

    print_summary(&summary, cfg);
    Ok(summary)
}

/// First Ctrl-C stops the scan gracefully, a second one exits at once.
fn listen_for_interrupt(handle: StopHandle) {
    tokio::spawn(async move {
        let mut interrupts = Interrupts::default();
        while tokio::signal::ctrl_c().await.is_ok() {
            match interrupts.record() {
                InterruptAction::Stop => {
                    warn!("Interrupt received, stopping scan... (Ctrl-C again to force)");
                    handle.stop();
                }
                InterruptAction::Exit => {
                    warn!("Second interrupt, exiting");
                    std::process::exit(INTERRUPTED_EXIT_CODE);
                }
            }
        }
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InterruptAction {
    Stop,
    Exit,
}

#[derive(Debug, Default)]
struct Interrupts {
    seen: u32,
}

impl Interrupts {
    fn record(&mut self) -> InterruptAction {
        self.seen = self.seen.saturating_add(1);
        if self.seen == 1 {
            InterruptAction::Stop
        } else {
            InterruptAction::Exit
        }
    }
}

fn print_settings(cfg: &Config) {
    let probe = &cfg.probe;
    let target = format!("https://{}:{}{}", probe.sni_host, probe.port, probe.path);
    let expect = format!("'{}' + '{}'", probe.status_prefix, probe.keyword);
    let timeout = format!("{}s", probe.timeout.as_secs());
    let concurrency = cfg.concurrency.to_string();
    let ranges = cfg.range_file.display().to_string();
    let candidates = cfg.candidates_file.display().to_string();
    let log = cfg.log_file.display().to_string();

    let rows: [(&str, &str); 7] = [
        ("Ranges", &ranges),
        ("Target", &target),
        ("Expect", &expect),
        ("Timeout", &timeout),
        ("Workers", &concurrency),
        ("Output", &candidates),
        ("Log", &log),
    ];
    let key_width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);

    print::banner();
    for (key, value) in rows {
        print::aligned_line(key, value, key_width);
    }
}

fn print_summary(summary: &RunSummary, cfg: &Config) {
    crate::sprint!();
    if summary.interrupted {
        print::header("scan stopped");
    } else {
        print::header("all ranges done");
    }

    info!(
        "Scanned {} of {}, skipped {}",
        format::plural(summary.ranges_scanned, "range", "ranges"),
        summary.ranges_total,
        summary.ranges_skipped
    );

    let found: ColoredString = format::plural(summary.total_matched, "candidate", "candidates")
        .bold()
        .green();
    let file: ColoredString = cfg.candidates_file.display().to_string().color(colors::ACCENT);
    let took: ColoredString = format::elapsed(summary.elapsed).bold().yellow();

    print::fat_separator();
    print::centerln(&format!("{found} recorded in {file} after {took}"));
    print::fat_separator();
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
