//! Single-owner execution slot.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Process-wide mutual-exclusion token guarding appliance interactions.
///
/// Holds exactly one permit and never queues: [`try_acquire`](Self::try_acquire)
/// either hands out the permit immediately or returns `None`. Clones share
/// the same permit, so the composition root creates one slot and injects it.
#[derive(Debug, Clone)]
pub struct ExecutionSlot {
    permit: Arc<Semaphore>,
}

/// Proof of holding the [`ExecutionSlot`]. Dropping it frees the slot.
#[derive(Debug)]
pub struct SlotGuard {
    _permit: OwnedSemaphorePermit,
}

impl Default for ExecutionSlot {
    fn default() -> Self {
        Self {
            permit: Arc::new(Semaphore::new(1)),
        }
    }
}

impl ExecutionSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the slot without waiting.
    #[must_use]
    pub fn try_acquire(&self) -> Option<SlotGuard> {
        Arc::clone(&self.permit)
            .try_acquire_owned()
            .ok()
            .map(|permit| SlotGuard { _permit: permit })
    }

    /// Whether a command currently holds the slot.
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.permit.available_permits() == 0
    }
}
