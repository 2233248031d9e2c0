//! Monotonic time source.
//!
//! Reading freshness is judged in milliseconds since boot. The clock is
//! injected rather than read from a global so that staleness tests can
//! step time deterministically.

use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Millisecond monotonic clock.
pub trait Clock: Send + Sync {
    /// Milliseconds since some fixed origin (boot). Never decreases.
    fn now_ms(&self) -> u64;
}

/// Host clock backed by `std::time::Instant`, origin at construction.
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Manually stepped clock for tests and simulation.
///
/// Clones share the same underlying counter, so one handle can be given
/// to the registry while the test keeps another to advance time.
#[derive(Clone, Default)]
pub struct SimClock {
    ms: Arc<AtomicU64>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to an absolute time. Tests are expected to only move forward.
    pub fn set(&self, ms: u64) {
        self.ms.store(ms, Ordering::Release);
    }

    /// Advance by `delta_ms`.
    pub fn advance(&self, delta_ms: u64) {
        self.ms.fetch_add(delta_ms, Ordering::AcqRel);
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> u64 {
        self.ms.load(Ordering::Acquire)
    }
}
