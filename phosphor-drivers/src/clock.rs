//! [`Clock`] built from an `embedded-hal` delay
//!
//! Most boards hand out a `DelayNs` long before they offer a monotonic
//! timer. `DelayClock` keeps time by adding up the delays it performs, which
//! is all the busy-wait and reset sequencing need: the only time that passes
//! between their reads is time they spent delaying.

use embedded_hal::delay::DelayNs;
use phosphor_hal::Clock;

/// A clock that advances by exactly the delays it performs
pub struct DelayClock<D> {
    delay: D,
    elapsed_us: u64,
}

impl<D: DelayNs> DelayClock<D> {
    /// Wrap a delay provider, starting at zero
    pub fn new(delay: D) -> Self {
        Self {
            delay,
            elapsed_us: 0,
        }
    }

    /// Borrow the underlying delay
    pub fn delay_mut(&mut self) -> &mut D {
        &mut self.delay
    }

    /// Release the delay provider
    pub fn release(self) -> D {
        self.delay
    }
}

impl<D: DelayNs> Clock for DelayClock<D> {
    fn now_us(&self) -> u64 {
        self.elapsed_us
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
        self.elapsed_us = self.elapsed_us.wrapping_add(us as u64);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
        self.elapsed_us = self.elapsed_us.wrapping_add(ms as u64 * 1000);
    }
}
