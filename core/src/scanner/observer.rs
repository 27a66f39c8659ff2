use subprobe_common::network::{Host, Outcome};
use tracing::{debug, info};

/// Receives progress events from a running batch.
///
/// Passed into the coordinator explicitly; the engine never writes to the
/// terminal on its own. Every method has an empty default.
pub trait BatchObserver: Send + Sync {
    fn on_batch_started(&self, _total: usize) {}

    /// An http attempt for `host` failed to connect and will be retried.
    fn on_retry(&self, _host: &Host, _attempt: u32, _max_retries: u32) {}

    /// `done` is the number of outcomes collected so far, this one included.
    fn on_host_done(&self, _outcome: &Outcome, _done: usize, _total: usize) {}

    fn on_batch_finished(&self, _done: usize, _total: usize) {}
}

/// Reports progress through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl BatchObserver for TracingObserver {
    fn on_batch_started(&self, total: usize) {
        info!("Probing {total} hosts");
    }

    fn on_retry(&self, host: &Host, attempt: u32, max_retries: u32) {
        debug!("Retrying {host} ({attempt}/{max_retries})");
    }

    fn on_host_done(&self, outcome: &Outcome, done: usize, total: usize) {
        debug!(
            "[{done}/{total}] {} -> {}",
            outcome.host(),
            outcome.classification()
        );
    }

    fn on_batch_finished(&self, done: usize, total: usize) {
        info!("Processed {done} / {total} hosts");
    }
}
