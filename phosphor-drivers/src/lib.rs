//! NAGP1250 device driver
//!
//! This crate puts the protocol and graphics crates on real hardware:
//!
//! - Links that move bytes over hardware SPI or bit-banged GPIO
//! - A transport that corrects bit order and honours the SBUSY handshake
//! - The [`Vfd`] facade that validates, frames and sends every operation
//! - Persistent driver configuration
//!
//! Everything is blocking and single-threaded; the only waits are the
//! delays performed through [`phosphor_hal::Clock`].

#![no_std]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to later modules
#[macro_use]
mod fmt;

pub mod clock;
pub mod config;
pub mod error;
pub mod pins;
pub mod transport;
pub mod vfd;

pub use clock::DelayClock;
pub use config::{ConfigError, PinAssignment, VfdConfig};
pub use error::VfdError;
pub use pins::{resolve_pins, VfdPins};
pub use transport::{BitOrder, BusyWait, GpioLink, Link, NoPin, SpiLink, Transport, TransportState};
pub use vfd::Vfd;
