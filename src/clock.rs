//! Millisecond tick counter shared between the tick interrupt and the
//! main loop.
//!
//! The counter wraps silently at `u32::MAX`. Every duration is computed
//! with [`elapsed`], which stays correct across the wrap.

use core::sync::atomic::{AtomicU32, Ordering};

/// One clock tick (1 ms).
pub type Tick = u32;

/// Source of the current tick.
pub trait Clock {
    fn now(&self) -> Tick;
}

/// Ticks elapsed from `start` to `now`, wraparound-safe.
#[inline]
pub const fn elapsed(now: Tick, start: Tick) -> Tick {
    now.wrapping_sub(start)
}

/// Monotonic tick counter.
///
/// Single writer (the tick handler calls [`TickCounter::advance`]),
/// any number of readers. A 32-bit atomic is a single load on the
/// Cortex-M4, so readers never observe a torn value.
pub struct TickCounter {
    ticks: AtomicU32,
}

impl TickCounter {
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Counter starting at an arbitrary tick (used to exercise the wrap).
    pub const fn starting_at(tick: Tick) -> Self {
        Self {
            ticks: AtomicU32::new(tick),
        }
    }

    /// Advance by one tick and return the new value.
    pub fn advance(&self) -> Tick {
        self.ticks.fetch_add(1, Ordering::Release).wrapping_add(1)
    }
}

impl Clock for TickCounter {
    fn now(&self) -> Tick {
        self.ticks.load(Ordering::Acquire)
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_increments_by_one() {
        let clock = TickCounter::new();
        assert_eq!(clock.now(), 0);
        assert_eq!(clock.advance(), 1);
        assert_eq!(clock.advance(), 2);
        assert_eq!(clock.now(), 2);
    }

    #[test]
    fn counter_wraps_silently() {
        let clock = TickCounter::starting_at(u32::MAX);
        assert_eq!(clock.advance(), 0);
        assert_eq!(clock.now(), 0);
    }

    #[test]
    fn elapsed_across_wrap() {
        let start = u32::MAX - 9;
        assert_eq!(elapsed(start.wrapping_add(30), start), 30);
        assert_eq!(elapsed(5, u32::MAX), 6);
        assert_eq!(elapsed(1234, 1234), 0);
    }
}
