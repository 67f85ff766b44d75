//! Driver error type

use embedded_hal::{digital, spi};
use phosphor_graphics::GraphicsError;
use phosphor_hal::SourceError;
use phosphor_protocol::CommandError;

use crate::config::ConfigError;

/// Errors raised by the driver
///
/// Validation failures surface before any byte is sent. A busy timeout is
/// not an error; see [`crate::BusyWait::TimedOut`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VfdError {
    /// A command parameter was rejected
    Command(CommandError),
    /// The pixel buffer could not be packed
    Graphics(GraphicsError),
    /// A GPIO operation failed
    Pin(digital::ErrorKind),
    /// The SPI bus failed
    Bus(spi::ErrorKind),
    /// A pin or bus could not be resolved
    Source(SourceError),
    /// The configuration is invalid or unreadable
    Config(ConfigError),
}

impl From<CommandError> for VfdError {
    fn from(e: CommandError) -> Self {
        VfdError::Command(e)
    }
}

impl From<GraphicsError> for VfdError {
    fn from(e: GraphicsError) -> Self {
        VfdError::Graphics(e)
    }
}

impl From<SourceError> for VfdError {
    fn from(e: SourceError) -> Self {
        VfdError::Source(e)
    }
}

impl From<ConfigError> for VfdError {
    fn from(e: ConfigError) -> Self {
        VfdError::Config(e)
    }
}

/// Map a pin error into [`VfdError::Pin`]
pub(crate) fn pin_error<E: digital::Error>(e: E) -> VfdError {
    VfdError::Pin(e.kind())
}

/// Map a bus error into [`VfdError::Bus`]
pub(crate) fn bus_error<E: spi::Error>(e: E) -> VfdError {
    VfdError::Bus(e.kind())
}
