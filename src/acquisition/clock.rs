use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Monotonic microsecond time base.
///
/// Implementations must never go backwards. Wrap-around is tolerated by the
/// samplers, which only ever look at differences.
pub trait Clock {
    fn now_micros(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_micros(&self) -> u64 {
        (**self).now_micros()
    }
}

/// Host clock backed by [`Instant`].
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
    fn now_micros(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }
}

/// Virtual microsecond clock for replay and simulation.
///
/// Time only moves when something observes it: every poll advances it by
/// `poll_step_us`, and peripherals sharing the clock charge their conversion
/// time with [`advance`](Self::advance). Busy-wait loops stay finite and
/// runs are deterministic. Clones share the same time.
#[derive(Debug, Clone)]
pub struct VirtualClock {
    now: Arc<AtomicU64>,
    poll_step_us: u64,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::with_poll_step(1)
    }

    pub fn with_poll_step(poll_step_us: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(0)),
            poll_step_us: poll_step_us.max(1),
        }
    }

    /// Current time without advancing it.
    pub fn peek(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }

    pub fn advance(&self, us: u64) {
        self.now.fetch_add(us, Ordering::Relaxed);
    }

    pub fn seconds(&self) -> f64 {
        self.peek() as f64 * 1e-6
    }
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for VirtualClock {
    fn now_micros(&self) -> u64 {
        self.now.fetch_add(self.poll_step_us, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_micros();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = clock.now_micros();
        assert!(b >= a + 1000, "expected >= 1ms to elapse, got {}us", b - a);
    }

    #[test]
    fn test_virtual_clock_advances_per_poll() {
        let clock = VirtualClock::with_poll_step(3);
        assert_eq!(clock.now_micros(), 0);
        assert_eq!(clock.now_micros(), 3);
        clock.advance(10);
        assert_eq!(clock.peek(), 16);
    }

    #[test]
    fn test_virtual_clock_clones_share_time() {
        let clock = VirtualClock::new();
        let other = clock.clone();
        other.advance(500);
        assert_eq!(clock.peek(), 500);
        assert!((clock.seconds() - 0.0005).abs() < 1e-12);
    }
}
