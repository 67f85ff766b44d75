//! Hardware SPI link
//!
//! SPI peripherals shift MSB first, so the transport reverses every byte
//! before it gets here. Configure the bus for mode 0 (clock idles low,
//! data sampled on the rising edge) at up to 1 MHz, matching [`super::GpioLink`].

use embedded_hal::spi::SpiBus;

use super::{BitOrder, Link};
use crate::error::{bus_error, VfdError};

/// [`Link`] over an `embedded-hal` SPI bus
pub struct SpiLink<S> {
    spi: S,
}

impl<S: SpiBus> SpiLink<S> {
    pub fn new(spi: S) -> Self {
        Self { spi }
    }

    /// Release the bus
    pub fn release(self) -> S {
        self.spi
    }
}

impl<S: SpiBus> Link for SpiLink<S> {
    const BIT_ORDER: BitOrder = BitOrder::MsbFirst;

    fn write(&mut self, bytes: &[u8]) -> Result<(), VfdError> {
        self.spi.write(bytes).map_err(bus_error)?;
        // SBUSY is only meaningful once the last bit is out
        self.spi.flush().map_err(bus_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::spi::{ErrorKind, ErrorType};
    use heapless::Vec;

    use crate::transport::tests::StepClock;
    use crate::transport::Transport;
    use phosphor_protocol::CommandFramer;

    struct MockSpi {
        sent: Vec<u8, 64>,
        flushes: usize,
    }

    impl ErrorType for MockSpi {
        type Error = Infallible;
    }

    impl SpiBus for MockSpi {
        fn read(&mut self, _words: &mut [u8]) -> Result<(), Infallible> {
            Ok(())
        }

        fn write(&mut self, words: &[u8]) -> Result<(), Infallible> {
            let _ = self.sent.extend_from_slice(words);
            Ok(())
        }

        fn transfer(&mut self, _read: &mut [u8], write: &[u8]) -> Result<(), Infallible> {
            self.write(write)
        }

        fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Infallible> {
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Infallible> {
            self.flushes += 1;
            Ok(())
        }
    }

    /// Bus that always fails
    struct BrokenSpi;

    #[derive(Debug)]
    struct Overrun;

    impl embedded_hal::spi::Error for Overrun {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Overrun
        }
    }

    impl ErrorType for BrokenSpi {
        type Error = Overrun;
    }

    impl SpiBus for BrokenSpi {
        fn read(&mut self, _words: &mut [u8]) -> Result<(), Overrun> {
            Err(Overrun)
        }

        fn write(&mut self, _words: &[u8]) -> Result<(), Overrun> {
            Err(Overrun)
        }

        fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), Overrun> {
            Err(Overrun)
        }

        fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Overrun> {
            Err(Overrun)
        }

        fn flush(&mut self) -> Result<(), Overrun> {
            Err(Overrun)
        }
    }

    #[test]
    fn test_spi_sends_reversed_frame() {
        let spi = MockSpi {
            sent: Vec::new(),
            flushes: 0,
        };
        let mut transport = Transport::new(SpiLink::new(spi), StepClock::default());
        let frame = CommandFramer::new().cursor_position(1, 3).unwrap();
        transport.send(&frame).unwrap();

        let (link, _, _) = transport.release();
        let spi = link.release();
        // 1F 24 01 00 03 00, each byte mirrored
        assert_eq!(&spi.sent[..], &[0xF8, 0x24, 0x80, 0x00, 0xC0, 0x00]);
        assert_eq!(spi.flushes, 1);
    }

    #[test]
    fn test_spi_error_kind_is_kept() {
        let mut link = SpiLink::new(BrokenSpi);
        assert_eq!(link.write(&[0x00]), Err(VfdError::Bus(ErrorKind::Overrun)));
    }
}
