//! Byte transport to the display
//!
//! A [`Link`] moves raw bytes over one physical interface. [`Transport`]
//! sits on top of a link and turns frames into wire bytes: it applies the
//! bit-order correction the link needs and, when an SBUSY pin is wired,
//! waits for the module to finish processing each frame.
//!
//! ```text
//!  Idle ──send──▶ Sending ──all bytes out──▶ WaitingBusy ──SBUSY low / timeout──▶ Idle
//! ```

mod gpio;
mod spi;

pub use gpio::{GpioLink, BIT_PHASE_US};
pub use spi::SpiLink;

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use phosphor_hal::Clock;
use phosphor_protocol::{bitrev, Frame};

use crate::error::{pin_error, VfdError};

/// Default SBUSY timeout in microseconds
pub const DEFAULT_BUSY_TIMEOUT_US: u32 = 10_000;

/// Interval between SBUSY polls in microseconds
pub const BUSY_POLL_US: u32 = 10;

/// Bytes staged per link write
const CHUNK_LEN: usize = 32;

/// Order in which a link shifts the bits of each byte onto SIN
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Bit 0 first, as the module samples
    LsbFirst,
    /// Bit 7 first; bytes must be reversed before writing
    MsbFirst,
}

/// A physical byte link to the module
pub trait Link {
    /// Native bit order of this link
    const BIT_ORDER: BitOrder;

    /// Write bytes exactly as given
    fn write(&mut self, bytes: &[u8]) -> Result<(), VfdError>;
}

/// Placeholder for an optional pin that is not wired
///
/// Reads as idle (low) and ignores writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoPin;

impl ErrorType for NoPin {
    type Error = Infallible;
}

impl InputPin for NoPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(false)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(true)
    }
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Where the transport is in sending a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportState {
    #[default]
    Idle,
    Sending,
    WaitingBusy,
}

/// Outcome of the SBUSY handshake after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusyWait {
    /// No SBUSY pin, or the caller asked not to wait
    Skipped,
    /// The module reported ready
    Ready,
    /// SBUSY stayed high past the timeout; the module may drop bytes
    TimedOut,
}

/// Frame transport over a [`Link`]
pub struct Transport<L, B, C> {
    link: L,
    busy: Option<B>,
    clock: C,
    busy_timeout_us: u32,
    state: TransportState,
    busy_timeouts: u32,
}

impl<L: Link, C: Clock> Transport<L, NoPin, C> {
    /// Create a transport without an SBUSY pin
    pub fn new(link: L, clock: C) -> Self {
        Self {
            link,
            busy: None,
            clock,
            busy_timeout_us: DEFAULT_BUSY_TIMEOUT_US,
            state: TransportState::Idle,
            busy_timeouts: 0,
        }
    }
}

impl<L, B, C> Transport<L, B, C>
where
    L: Link,
    B: InputPin,
    C: Clock,
{
    /// Create a transport that waits on SBUSY after every frame
    pub fn with_busy(link: L, busy: B, clock: C) -> Self {
        Self {
            link,
            busy: Some(busy),
            clock,
            busy_timeout_us: DEFAULT_BUSY_TIMEOUT_US,
            state: TransportState::Idle,
            busy_timeouts: 0,
        }
    }

    /// Change how long to wait for SBUSY to drop
    pub fn set_busy_timeout_us(&mut self, timeout_us: u32) {
        self.busy_timeout_us = timeout_us;
    }

    pub fn busy_timeout_us(&self) -> u32 {
        self.busy_timeout_us
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    /// Number of SBUSY timeouts seen so far
    pub fn busy_timeouts(&self) -> u32 {
        self.busy_timeouts
    }

    pub fn has_busy_pin(&self) -> bool {
        self.busy.is_some()
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Take the transport apart
    pub fn release(self) -> (L, Option<B>, C) {
        (self.link, self.busy, self.clock)
    }

    /// Send a frame, then wait for the module to become ready
    pub fn send(&mut self, frame: &Frame<'_>) -> Result<BusyWait, VfdError> {
        self.transmit(frame)?;
        self.wait_busy()
    }

    /// Send a frame without the SBUSY handshake
    pub fn send_unchecked(&mut self, frame: &Frame<'_>) -> Result<(), VfdError> {
        self.transmit(frame)?;
        self.state = TransportState::Idle;
        Ok(())
    }

    /// Poll SBUSY until it drops or the timeout passes
    pub fn wait_busy(&mut self) -> Result<BusyWait, VfdError> {
        let Some(busy) = self.busy.as_mut() else {
            self.state = TransportState::Idle;
            return Ok(BusyWait::Skipped);
        };

        self.state = TransportState::WaitingBusy;
        let start = self.clock.now_us();
        let outcome = loop {
            match busy.is_high() {
                Ok(false) => break Ok(BusyWait::Ready),
                Ok(true) => {}
                Err(e) => break Err(pin_error(e)),
            }
            if self.clock.elapsed_us(start) > self.busy_timeout_us as u64 {
                self.busy_timeouts = self.busy_timeouts.saturating_add(1);
                warn!("SBUSY timeout after {} us", self.busy_timeout_us);
                break Ok(BusyWait::TimedOut);
            }
            self.clock.delay_us(BUSY_POLL_US);
        };

        self.state = TransportState::Idle;
        outcome
    }

    fn transmit(&mut self, frame: &Frame<'_>) -> Result<(), VfdError> {
        self.state = TransportState::Sending;

        let mut chunk = [0u8; CHUNK_LEN];
        let mut len = 0;
        for byte in frame.bytes() {
            chunk[len] = byte;
            len += 1;
            if len == CHUNK_LEN {
                self.flush(&mut chunk[..len])?;
                len = 0;
            }
        }
        if len > 0 {
            self.flush(&mut chunk[..len])?;
        }
        Ok(())
    }

    fn flush(&mut self, chunk: &mut [u8]) -> Result<(), VfdError> {
        if L::BIT_ORDER == BitOrder::MsbFirst {
            bitrev::reverse_in_place(chunk);
        }
        self.link.write(chunk).inspect_err(|_| {
            self.state = TransportState::Idle;
        })
    }
}
