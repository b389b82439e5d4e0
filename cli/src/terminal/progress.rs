use std::sync::Mutex;

use colored::*;
use indicatif::ProgressStyle;
use sniscan_common::models::progress::ProgressSnapshot;
use sniscan_common::models::summary::RangeReport;
use sniscan_common::network::range::AddressRange;
use sniscan_core::scanner::ScanObserver;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TEMPLATE: &str =
    "{spinner:.blue} [{bar:32.cyan/blue}] {pos}/{len} ({percent}%) {msg}";

/// One progress bar per range, rendered by the indicatif tracing layer.
pub struct RangeProgress {
    style: ProgressStyle,
    current: Mutex<Option<(Span, AddressRange)>>,
}

impl RangeProgress {
    pub fn new() -> Self {
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░")
            .tick_strings(&[
                "▁▁▁▁▁",
                "▁▂▂▂▁",
                "▁▄▂▄▁",
                "▂▄▆▄▂",
                "▄▆█▆▄",
                "▂▄▆▄▂",
                "▁▄▂▄▁",
                "▁▂▂▂▁",
            ]);

        Self {
            style,
            current: Mutex::new(None),
        }
    }

    fn with_span(&self, f: impl FnOnce(&Span, &AddressRange)) {
        if let Ok(guard) = self.current.lock() {
            if let Some((span, range)) = guard.as_ref() {
                f(span, range);
            }
        }
    }
}

impl ScanObserver for RangeProgress {
    fn range_started(&self, range: &AddressRange, total: u64) {
        let span = info_span!("range", indicatif.pb_show = true);
        span.pb_set_style(&self.style);
        span.pb_set_length(total);
        span.pb_set_message(&found_message(range, 0));
        span.pb_start();

        if let Ok(mut guard) = self.current.lock() {
            *guard = Some((span, *range));
        }
    }

    fn progress(&self, snapshot: ProgressSnapshot) {
        self.with_span(|span, range| {
            span.pb_set_position(snapshot.completed);
            span.pb_set_message(&found_message(range, snapshot.matched));
        });
    }

    fn range_finished(&self, _report: &RangeReport) {
        if let Ok(mut guard) = self.current.lock() {
            guard.take();
        }
    }
}

fn found_message(range: &AddressRange, matched: u64) -> String {
    format!(
        "{} {} found",
        range.to_string().bright_blue(),
        matched.to_string().green().bold()
    )
}
