//! Timing source abstraction
//!
//! Blocking delays plus a monotonic microsecond counter. The transport uses
//! the counter to bound its busy-wait and the delays for reset pulses.

/// Monotonic clock with blocking delays
///
/// The counter may wrap; callers compare instants with [`Clock::elapsed_us`].
pub trait Clock {
    /// Current monotonic time in microseconds
    fn now_us(&self) -> u64;

    /// Block for at least `us` microseconds
    fn delay_us(&mut self, us: u32);

    /// Block for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.delay_us(1000);
        }
    }

    /// Microseconds elapsed since `start`
    fn elapsed_us(&self, start: u64) -> u64 {
        self.now_us().wrapping_sub(start)
    }
}

impl<T: Clock + ?Sized> Clock for &mut T {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }

    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Clock that only advances when asked to delay
    struct StepClock {
        now: u64,
    }

    impl Clock for StepClock {
        fn now_us(&self) -> u64 {
            self.now
        }

        fn delay_us(&mut self, us: u32) {
            self.now += us as u64;
        }
    }

    #[test]
    fn test_delay_ms_uses_microsecond_delay() {
        let mut clock = StepClock { now: 0 };
        clock.delay_ms(3);
        assert_eq!(clock.now_us(), 3000);
    }

    #[test]
    fn test_elapsed_wraps() {
        let clock = StepClock { now: 5 };
        assert_eq!(clock.elapsed_us(u64::MAX - 4), 10);
    }

    #[test]
    fn test_mut_ref_forwards() {
        fn settle<C: Clock>(mut clock: C) {
            clock.delay_us(42);
        }

        let mut clock = StepClock { now: 0 };
        settle(&mut clock);
        assert_eq!(clock.now, 42);
    }
}
