use super::Clock;

/// Busy-wait sampler taking a fixed number of uniformly spaced samples.
///
/// Each sample is taken only once `interval_us` microseconds have passed
/// since the previous one (the first waits one interval from the start of
/// acquisition). The whole block runs inside a critical section so nothing
/// interrupt-driven can stretch an interval; the section is released as
/// soon as the last sample is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformSampler {
    interval_us: u64,
    count: usize,
}

impl UniformSampler {
    pub fn new(interval_us: u64, count: usize) -> Self {
        Self { interval_us, count }
    }

    /// Sampler for `rate_hz` samples per second.
    ///
    /// The interval is truncated to whole microseconds, so rates that do not
    /// divide 1 MHz evenly run slightly fast.
    pub fn from_rate(rate_hz: u32, count: usize) -> Self {
        Self::new(1_000_000 / u64::from(rate_hz.max(1)), count)
    }

    pub fn interval_us(&self) -> u64 {
        self.interval_us
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Rate actually achieved after interval truncation.
    pub fn effective_rate_hz(&self) -> f64 {
        1_000_000.0 / self.interval_us.max(1) as f64
    }

    /// Run one acquisition, calling `take(i)` for sample `i` at each tick.
    pub fn acquire<C, F>(&self, clock: &C, mut take: F)
    where
        C: Clock + ?Sized,
        F: FnMut(usize),
    {
        critical_section::with(|_cs| {
            let mut last = clock.now_micros();
            for i in 0..self.count {
                loop {
                    let now = clock.now_micros();
                    if now.wrapping_sub(last) >= self.interval_us {
                        last = now;
                        break;
                    }
                    std::hint::spin_loop();
                }
                take(i);
            }
        });
    }
}

/// Time-boxed burst: sample as fast as possible until a fixed window elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedBurst {
    window_us: u64,
}

impl TimedBurst {
    pub fn new(window_us: u64) -> Self {
        Self { window_us }
    }

    pub fn from_millis(window_ms: u32) -> Self {
        Self::new(u64::from(window_ms) * 1000)
    }

    pub fn window_us(&self) -> u64 {
        self.window_us
    }

    /// Call `sample` repeatedly until the window has elapsed.
    ///
    /// Returns the number of calls made, which may be zero.
    pub fn run<C, F>(&self, clock: &C, mut sample: F) -> usize
    where
        C: Clock + ?Sized,
        F: FnMut(),
    {
        let start = clock.now_micros();
        let mut taken = 0;
        while clock.now_micros().wrapping_sub(start) < self.window_us {
            sample();
            taken += 1;
        }
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Advances by a fixed step every time it is read.
    struct SteppingClock {
        now: Cell<u64>,
        step: u64,
    }

    impl SteppingClock {
        fn new(start: u64, step: u64) -> Self {
            Self {
                now: Cell::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now_micros(&self) -> u64 {
            let t = self.now.get();
            self.now.set(t.wrapping_add(self.step));
            t
        }
    }

    #[test]
    fn test_from_rate_truncates_interval() {
        let sampler = UniformSampler::from_rate(8192, 2048);
        assert_eq!(sampler.interval_us(), 122);
        assert_eq!(sampler.count(), 2048);
        assert!((sampler.effective_rate_hz() - 8196.72).abs() < 0.01);

        assert_eq!(UniformSampler::from_rate(8000, 16).interval_us(), 125);
    }

    #[test]
    fn test_uniform_spacing() {
        let clock = SteppingClock::new(0, 1);
        let sampler = UniformSampler::new(125, 32);
        let mut stamps = Vec::new();
        sampler.acquire(&clock, |i| {
            assert_eq!(i, stamps.len());
            stamps.push(clock.now.get());
        });

        assert_eq!(stamps.len(), 32);
        for pair in stamps.windows(2) {
            assert_eq!(pair[1] - pair[0], 125);
        }
    }

    #[test]
    fn test_first_sample_waits_one_interval() {
        let clock = SteppingClock::new(1000, 1);
        let sampler = UniformSampler::new(100, 1);
        let mut at = 0;
        sampler.acquire(&clock, |_| at = clock.now.get());
        // started at 1000, released once 1100 was observed
        assert_eq!(at, 1101);
    }

    #[test]
    fn test_spacing_survives_clock_wrap() {
        let clock = SteppingClock::new(u64::MAX - 300, 1);
        let sampler = UniformSampler::new(100, 8);
        let mut stamps = Vec::new();
        sampler.acquire(&clock, |_| stamps.push(clock.now.get()));
        for pair in stamps.windows(2) {
            assert_eq!(pair[1].wrapping_sub(pair[0]), 100);
        }
    }

    #[test]
    fn test_timed_burst_is_time_boxed() {
        let clock = SteppingClock::new(0, 10);
        let burst = TimedBurst::from_millis(20);
        let taken = burst.run(&clock, || {});
        // each loop polls the clock once: 20ms / 10us
        assert_eq!(taken, 1999);
    }

    #[test]
    fn test_timed_burst_zero_window() {
        let clock = SteppingClock::new(0, 1);
        let burst = TimedBurst::new(0);
        let mut calls = 0;
        assert_eq!(burst.run(&clock, || calls += 1), 0);
        assert_eq!(calls, 0);
    }
}
