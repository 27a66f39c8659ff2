use colored::*;
use indicatif::ProgressStyle;
use subprobe_common::network::{Host, Outcome};
use subprobe_core::scanner::BatchObserver;
use tracing::{Span, debug};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::terminal::format;

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

const TEMPLATE: &str = "{spinner:.blue} Processed {pos}/{len} [{bar:32.green/bright_black}] {msg}";

/// Drives the progress bar attached to the probing span.
pub struct ProgressObserver {
    span: Span,
}

impl ProgressObserver {
    pub fn new(span: Span) -> anyhow::Result<Self> {
        let style = ProgressStyle::with_template(TEMPLATE)?
            .tick_strings(TICK_STRINGS)
            .progress_chars("━╸ ");
        span.pb_set_style(&style);
        Ok(Self { span })
    }
}

impl BatchObserver for ProgressObserver {
    fn on_batch_started(&self, total: usize) {
        self.span.pb_set_length(total as u64);
        self.span.pb_set_message("press Ctrl-C to stop early");
    }

    fn on_retry(&self, host: &Host, attempt: u32, max_retries: u32) {
        debug!("Retrying {host} ({attempt}/{max_retries})...");
    }

    fn on_host_done(&self, outcome: &Outcome, _done: usize, _total: usize) {
        self.span.pb_inc(1);
        self.span.pb_set_message(&format!(
            "{} {}",
            outcome.host().as_str().dimmed(),
            format::classification_to_colored(outcome.classification())
        ));
    }

    fn on_batch_finished(&self, done: usize, total: usize) {
        debug!("Processed {done} / {total} hosts");
    }
}
