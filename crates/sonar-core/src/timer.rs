//! Restartable interval timer with pause support.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Monotonic millisecond clock.
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed epoch. Never decreases.
    fn now_ms(&self) -> u64;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Manually advanced clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `ms`.
    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::Relaxed);
    }

    /// Jump to an absolute time. Earlier values are ignored.
    pub fn set(&self, ms: u64) {
        self.now.fetch_max(ms, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }
}

/// Elapsed-time counter measured from its last restart.
///
/// Paused intervals do not count towards [`elapsed`](Self::elapsed).
#[derive(Debug, Clone)]
pub struct Timer<C: Clock = SystemClock> {
    clock: C,
    start_tick: u64,
    paused_elapsed: u64,
    paused: bool,
}

impl Timer<SystemClock> {
    /// Create a running timer on the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl Default for Timer<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Timer<C> {
    /// Create a running timer on the given clock.
    pub fn with_clock(clock: C) -> Self {
        let start_tick = clock.now_ms();
        Self {
            clock,
            start_tick,
            paused_elapsed: 0,
            paused: false,
        }
    }

    /// Reset elapsed time to zero.
    ///
    /// A paused timer stays paused and keeps reporting zero until resumed.
    pub fn restart(&mut self) {
        self.paused_elapsed = 0;
        self.start_tick = self.clock.now_ms();
    }

    /// Milliseconds since the last restart, excluding paused intervals.
    pub fn elapsed(&self) -> u64 {
        if self.paused {
            return self.paused_elapsed;
        }
        self.paused_elapsed + self.clock.now_ms().saturating_sub(self.start_tick)
    }

    /// Pause or resume. Setting the current state again does nothing.
    pub fn set_paused(&mut self, paused: bool) {
        if paused == self.paused {
            return;
        }
        if paused {
            self.paused_elapsed = self.elapsed();
        } else {
            self.start_tick = self.clock.now_ms();
        }
        self.paused = paused;
    }

    pub const fn is_paused(&self) -> bool {
        self.paused
    }
}
