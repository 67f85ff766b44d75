//! Bit-banged serial link
//!
//! Drives SIN and SCK directly. Bits go out LSB first, which is the
//! module's own order, so no reversal is needed. Each bit is:
//!
//! ```text
//! SIN  ══╳════ bit n ════════╳══
//! SCK  ______/‾‾‾‾‾‾‾\_______
//!        1 µs   1 µs    1 µs
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use super::{BitOrder, Link};
use crate::error::{pin_error, VfdError};

/// Length of each bit phase in microseconds
pub const BIT_PHASE_US: u32 = 1;

/// [`Link`] that toggles SIN/SCK with blocking delays
pub struct GpioLink<SIN, SCK, D> {
    sin: SIN,
    sck: SCK,
    delay: D,
}

impl<SIN, SCK, D> GpioLink<SIN, SCK, D>
where
    SIN: OutputPin,
    SCK: OutputPin,
    D: DelayNs,
{
    /// Create the link and park SIN and SCK low
    pub fn new(mut sin: SIN, mut sck: SCK, delay: D) -> Result<Self, VfdError> {
        sin.set_low().map_err(pin_error)?;
        sck.set_low().map_err(pin_error)?;
        Ok(Self { sin, sck, delay })
    }

    /// Release the pins and delay
    pub fn release(self) -> (SIN, SCK, D) {
        (self.sin, self.sck, self.delay)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), VfdError> {
        for bit in 0..8 {
            if (byte >> bit) & 1 == 1 {
                self.sin.set_high().map_err(pin_error)?;
            } else {
                self.sin.set_low().map_err(pin_error)?;
            }
            self.delay.delay_us(BIT_PHASE_US);
            self.sck.set_high().map_err(pin_error)?;
            self.delay.delay_us(BIT_PHASE_US);
            self.sck.set_low().map_err(pin_error)?;
            self.delay.delay_us(BIT_PHASE_US);
        }
        Ok(())
    }
}

impl<SIN, SCK, D> Link for GpioLink<SIN, SCK, D>
where
    SIN: OutputPin,
    SCK: OutputPin,
    D: DelayNs,
{
    const BIT_ORDER: BitOrder = BitOrder::LsbFirst;

    fn write(&mut self, bytes: &[u8]) -> Result<(), VfdError> {
        bytes.iter().try_for_each(|&byte| self.write_byte(byte))
    }
}
