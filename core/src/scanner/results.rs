use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use subprobe_common::network::Outcome;

use crate::ranker;

/// Append-only collection of the outcomes of one batch.
///
/// Cloning shares the same storage, so a clone can be kept aside to watch
/// [`len`](Self::len) grow while the batch runs.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    outcomes: Arc<Mutex<Vec<Outcome>>>,
}

impl ResultSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(Vec::with_capacity(capacity))),
        }
    }

    /// Appends an outcome and returns the new length.
    pub(crate) fn push(&self, outcome: Outcome) -> usize {
        let mut outcomes = self.lock();
        outcomes.push(outcome);
        outcomes.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the outcomes in completion order.
    pub fn snapshot(&self) -> Vec<Outcome> {
        self.lock().clone()
    }

    /// Outcomes in the deterministic display order, see [`ranker::rank`].
    pub fn ranked(&self) -> Vec<Outcome> {
        ranker::rank(&self.lock())
    }

    pub fn into_outcomes(self) -> Vec<Outcome> {
        match Arc::try_unwrap(self.outcomes) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
            Err(shared) => shared.lock().unwrap_or_else(PoisonError::into_inner).clone(),
        }
    }

    // A panic while holding the lock cannot leave a half-written entry
    // behind, so a poisoned lock is still safe to read.
    fn lock(&self) -> MutexGuard<'_, Vec<Outcome>> {
        self.outcomes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
