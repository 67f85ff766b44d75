//! Phosphor Hardware Abstraction Layer
//!
//! The driver talks to pins and buses through `embedded-hal` 1.0. This crate
//! fills the two gaps `embedded-hal` leaves open for a display driver:
//!
//! - a monotonic time source the busy-wait can measure against
//!   ([`timing::Clock`]), and
//! - a way to accept either a ready-made peripheral handle or a bare
//!   identifier and resolve it once at construction ([`source::Source`]).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application / phosphor-drivers         │
//! └─────────────────────────────────────────┘
//!          │                     │
//!          ▼                     ▼
//! ┌─────────────────┐   ┌─────────────────────┐
//! │  embedded-hal   │   │ phosphor-hal        │
//! │  pins, SPI,     │   │ Clock, Source,      │
//! │  DelayNs        │   │ PinRegistry         │
//! └─────────────────┘   └─────────────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod source;
pub mod timing;

// Re-export key types at crate root for convenience
pub use source::{PinRegistry, Source, SourceError, PIN_COUNT};
pub use timing::Clock;
