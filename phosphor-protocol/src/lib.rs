//! NAGP1250 Command Protocol
//!
//! This crate turns high-level display operations into the byte sequences
//! the Futaba NAGP1250 VFD module understands. It validates every
//! parameter before anything is framed, so an out-of-range value never
//! reaches the wire.
//!
//! # Protocol Overview
//!
//! Commands are a prefix byte followed by sub-opcodes and parameters.
//! 16-bit parameters travel little-endian:
//! ```text
//! ┌──────────┬─────────────┬──────────────────┬──────────────┐
//! │ PREFIX   │ SUB-OPCODES │ PARAMETERS       │ PAYLOAD      │
//! │ 1F / 1B  │ 0–3B        │ u8 or (lo, hi)   │ image / text │
//! └──────────┴─────────────┴──────────────────┴──────────────┘
//! ```
//!
//! The protocol itself is bit-order agnostic. The device expects each byte
//! LSB first; transports that shift MSB first reverse bytes through
//! [`bitrev::BIT_REVERSE`].

#![no_std]
#![deny(unsafe_code)]

pub mod bitrev;
pub mod commands;
pub mod frame;
pub mod window;

pub use commands::{
    BaseWindowMode, BlinkPattern, CharacterCode, CommandFramer, CursorAddressing, FontSet,
    ScreenSaver, WriteLogic, WriteMode, IMAGE_MAX_HEIGHT, IMAGE_MAX_WIDTH,
};
pub use frame::{CommandError, Frame, FrameBytes, Payload, MAX_HEADER_LEN};
pub use window::{Window, BASE_WINDOW, MAX_USER_WINDOWS};
