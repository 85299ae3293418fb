//! Monotonic request generations for stale-result suppression.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A shared, monotonically increasing counter. Each user-visible resolution
/// request advances it and captures the new value; any async resumption
/// point compares its captured value before committing results, so an older
/// request can never overwrite a newer one. There is no network-level abort
/// — stale responses are simply discarded on arrival.
#[derive(Clone, Debug, Default)]
pub struct RequestGeneration {
    counter: Arc<AtomicU64>,
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation and returns its value.
    pub fn advance(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }

    /// True while no newer request has started since `generation` was
    /// captured.
    pub fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }
}
