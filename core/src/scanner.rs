//! # Batch Coordination
//!
//! Fans a host list out into one tokio task per host. Every task waits on the
//! [`ConcurrencyGate`], resolves its host through the [`HostProber`], appends
//! the outcome to the shared [`ResultSet`], gives its permit back and finally
//! runs the optional [`OutcomeHook`].
//!
//! [`BatchCoordinator::run`] is a join point: it returns once every host has
//! exactly one outcome, or once the cancellation token fires.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use subprobe_common::config::{ConfigError, ProbeConfig};
use subprobe_common::network::{Classification, Host, Method, Outcome};
use thiserror::Error;
use tokio::task::{self, JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::gate::{ConcurrencyGate, GateClosed, SemaphoreGate};
use crate::hooks::OutcomeHook;
use crate::probe::Probe;
use crate::prober::{HostProber, RetryPolicy};

pub mod observer;
mod results;

pub use observer::{BatchObserver, TracingObserver};
pub use results::ResultSet;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("invalid probe configuration: {0}")]
    Config(#[from] ConfigError),
    /// Carries whatever finished before the token fired.
    #[error("batch cancelled after {} of {total} hosts", .results.len())]
    Cancelled { results: ResultSet, total: usize },
    #[error(transparent)]
    GateClosed(#[from] GateClosed),
    #[error("batch task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub struct BatchCoordinator {
    probe: Arc<dyn Probe>,
    gate: Arc<dyn ConcurrencyGate>,
    observer: Arc<dyn BatchObserver>,
    hook: Option<Arc<dyn OutcomeHook>>,
    policy: RetryPolicy,
    method: Method,
    timeout: Duration,
}

impl BatchCoordinator {
    /// Validates `cfg` up front; nothing is scheduled on a bad configuration.
    pub fn new(cfg: &ProbeConfig, probe: Arc<dyn Probe>) -> Result<Self, BatchError> {
        cfg.validate()?;
        Ok(Self {
            probe,
            gate: Arc::new(SemaphoreGate::new(cfg.concurrency)),
            observer: Arc::new(TracingObserver),
            hook: None,
            policy: RetryPolicy::from(cfg),
            method: cfg.method,
            timeout: cfg.timeout,
        })
    }

    /// Replaces the default [`SemaphoreGate`] sized from the configuration.
    pub fn with_gate(mut self, gate: Arc<dyn ConcurrencyGate>) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn BatchObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_hook(mut self, hook: Arc<dyn OutcomeHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    pub async fn run(&self, hosts: Vec<Host>, cancel: &CancellationToken) -> Result<ResultSet, BatchError> {
        let results = ResultSet::with_capacity(hosts.len());
        self.drive(hosts, results, cancel).await
    }

    /// Starts the batch in the background. The returned handle exposes live
    /// progress and joins the batch.
    pub fn spawn(self: Arc<Self>, hosts: Vec<Host>, cancel: CancellationToken) -> BatchHandle {
        let total = hosts.len();
        let results = ResultSet::with_capacity(total);
        let task = {
            let results = results.clone();
            tokio::spawn(async move { self.drive(hosts, results, &cancel).await })
        };

        BatchHandle {
            results,
            total,
            task,
        }
    }

    async fn drive(
        &self,
        hosts: Vec<Host>,
        results: ResultSet,
        cancel: &CancellationToken,
    ) -> Result<ResultSet, BatchError> {
        let total = hosts.len();
        let prober = Arc::new(HostProber::new(
            self.probe.clone(),
            self.policy,
            self.observer.clone(),
        ));
        self.observer.on_batch_started(total);

        let mut tasks = JoinSet::new();
        let mut pending: HashMap<task::Id, (Host, Arc<AtomicBool>)> = HashMap::with_capacity(total);
        for host in hosts {
            let recorded = Arc::new(AtomicBool::new(false));
            let unit = ProbeUnit {
                prober: prober.clone(),
                gate: self.gate.clone(),
                observer: self.observer.clone(),
                hook: self.hook.clone(),
                results: results.clone(),
                recorded: recorded.clone(),
                method: self.method,
                timeout: self.timeout,
                total,
            };
            let cancel = cancel.clone();
            let task_host = host.clone();

            let handle = tasks.spawn(async move {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Ok(()),
                    res = unit.execute(task_host) => res,
                }
            });
            pending.insert(handle.id(), (host, recorded));
        }

        let mut gate_error = None;
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((_, Ok(()))) => {}
                Ok((_, Err(e))) => gate_error = Some(e),
                Err(e) => {
                    error!("Probe task failed: {e}");
                    // A host whose task died before recording anything still
                    // gets an outcome.
                    if let Some((host, recorded)) = pending.remove(&e.id())
                        && !recorded.load(Ordering::SeqCst)
                    {
                        let outcome = Outcome::new(host, Classification::ConnectionError);
                        let done = results.push(outcome.clone());
                        self.observer.on_host_done(&outcome, done, total);
                    }
                }
            }
        }

        let done = results.len();
        self.observer.on_batch_finished(done, total);

        if let Some(e) = gate_error {
            return Err(e.into());
        }
        if cancel.is_cancelled() && done < total {
            return Err(BatchError::Cancelled { results, total });
        }
        Ok(results)
    }
}

/// Everything one host's task needs, owned so the task is `'static`.
struct ProbeUnit {
    prober: Arc<HostProber>,
    gate: Arc<dyn ConcurrencyGate>,
    observer: Arc<dyn BatchObserver>,
    hook: Option<Arc<dyn OutcomeHook>>,
    results: ResultSet,
    recorded: Arc<AtomicBool>,
    method: Method,
    timeout: Duration,
    total: usize,
}

impl ProbeUnit {
    async fn execute(self, host: Host) -> Result<(), GateClosed> {
        let permit = self.gate.acquire().await?;
        let outcome = self.prober.resolve(host, self.method, self.timeout).await;
        let done = self.results.push(outcome.clone());
        self.recorded.store(true, Ordering::SeqCst);
        permit.release();

        self.observer.on_host_done(&outcome, done, self.total);

        if let Some(hook) = &self.hook
            && let Err(e) = hook.on_host_done(&outcome).await
        {
            warn!("Hook failed for {}: {e:#}", outcome.host());
        }
        Ok(())
    }
}

pub struct BatchHandle {
    results: ResultSet,
    total: usize,
    task: JoinHandle<Result<ResultSet, BatchError>>,
}

impl BatchHandle {
    /// `(done, total)`; readable at any time while the batch runs.
    pub fn progress(&self) -> (usize, usize) {
        (self.results.len(), self.total)
    }

    pub async fn join(self) -> Result<ResultSet, BatchError> {
        self.task.await?
    }
}
