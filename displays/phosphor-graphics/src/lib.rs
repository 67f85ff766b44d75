//! Monochrome graphics for the NAGP1250 VFD
//!
//! This crate provides:
//! - [`PixelBuffer`], a fixed-size binary canvas with silent clipping
//! - Rasterizer primitives: lines, circles and rounded boxes
//! - The packer that turns a buffer into the module's image byte layout
//!
//! # Architecture
//!
//! ```text
//! PixelBuffer ──draw_*──▶ PixelBuffer ──pack──▶ PackedImage ──▶ realtime image frame
//! ```
//!
//! Drawing functions take the buffer by value and hand it back, so a scene
//! reads as a chain of calls. Nothing here talks to hardware; the packed
//! bytes are handed to the protocol layer by the driver.

#![no_std]
#![deny(unsafe_code)]

pub mod buffer;
pub mod pack;
pub mod raster;

// Re-export key types
pub use buffer::PixelBuffer;
pub use pack::{pack, pack_into, packed_len, unpack, GraphicsError, PackedImage, MAX_PACKED_LEN};
pub use raster::{
    draw_box, draw_circle, draw_circle_filled, draw_circles, draw_lines, CircleSpec, LineSpec,
};
