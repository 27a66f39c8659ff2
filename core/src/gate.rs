//! # Admission Control
//!
//! A [`ConcurrencyGate`] bounds how many hosts are being probed at once. It is
//! the only backpressure in a batch: without it every host of a large
//! enumeration would open sockets at the same time.
//!
//! Permits are RAII tokens. Dropping a [`Permit`] releases its slot, so a
//! slot is given back exactly once on every path, including panics and
//! cancellation.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Semaphore;

#[derive(Debug, Error)]
#[error("concurrency gate is closed")]
pub struct GateClosed;

/// A granted slot. The slot is held until this value is dropped.
pub struct Permit {
    _guard: Box<dyn Send + Sync>,
}

impl Permit {
    /// Wraps whatever value gives the slot back when dropped.
    pub fn new<G: Send + Sync + 'static>(guard: G) -> Self {
        Self {
            _guard: Box::new(guard),
        }
    }

    pub fn release(self) {
        drop(self);
    }
}

impl fmt::Debug for Permit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Permit")
    }
}

#[async_trait]
pub trait ConcurrencyGate: Send + Sync {
    /// Suspends until fewer than [`ceiling`](Self::ceiling) permits are out.
    async fn acquire(&self) -> Result<Permit, GateClosed>;

    fn ceiling(&self) -> usize;
}

/// FIFO gate over a tokio [`Semaphore`].
#[derive(Debug, Clone)]
pub struct SemaphoreGate {
    semaphore: Arc<Semaphore>,
    ceiling: usize,
}

impl SemaphoreGate {
    /// `ceiling` is clamped to `1..=Semaphore::MAX_PERMITS`.
    pub fn new(ceiling: usize) -> Self {
        let ceiling = ceiling.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            semaphore: Arc::new(Semaphore::new(ceiling)),
            ceiling,
        }
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

#[async_trait]
impl ConcurrencyGate for SemaphoreGate {
    async fn acquire(&self) -> Result<Permit, GateClosed> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| GateClosed)?;
        Ok(Permit::new(permit))
    }

    fn ceiling(&self) -> usize {
        self.ceiling
    }
}

#[derive(Debug, Default)]
struct Gauge {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

struct InFlight(Arc<Gauge>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Wraps a gate and records how many permits are out, and the most that
/// ever were.
pub struct MeteredGate<G> {
    inner: G,
    gauge: Arc<Gauge>,
}

impl<G: ConcurrencyGate> MeteredGate<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            gauge: Arc::new(Gauge::default()),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.gauge.in_flight.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.gauge.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<G: ConcurrencyGate> ConcurrencyGate for MeteredGate<G> {
    async fn acquire(&self) -> Result<Permit, GateClosed> {
        let permit = self.inner.acquire().await?;
        let now = self.gauge.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.gauge.peak.fetch_max(now, Ordering::SeqCst);

        // The counter must drop before the inner slot is handed back;
        // tuple fields drop in order.
        Ok(Permit::new((InFlight(self.gauge.clone()), permit)))
    }

    fn ceiling(&self) -> usize {
        self.inner.ceiling()
    }
}
