//! Column-major bitmap packing
//!
//! The module's image commands take pixels column by column. Each column is
//! split into 8-row bands and every band becomes one byte, top row in bit 7:
//!
//! ```text
//!  column 0        column 1
//! ┌────────┐      ┌────────┐
//! │ byte 0 │ rows 0-7    byte n   (n = bands per column)
//! │ byte 1 │ rows 8-15   byte n+1
//! │  ...   │
//! └────────┘      └────────┘
//! ```
//!
//! A partial last band is padded with zero bits.

use heapless::Vec;

use crate::buffer::PixelBuffer;

/// Widest packable image in columns (the panel's full width)
pub const MAX_PACKED_WIDTH: usize = 280;

/// Most 8-row bands per column (32 rows)
pub const MAX_PACKED_BANDS: usize = 4;

/// Capacity of a [`PackedImage`] in bytes
pub const MAX_PACKED_LEN: usize = MAX_PACKED_WIDTH * MAX_PACKED_BANDS;

/// Packing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GraphicsError {
    /// Image exceeds 280 columns or 32 rows
    TooLarge,
    /// Byte count does not match the image dimensions
    LengthMismatch {
        /// Bytes required
        expected: usize,
        /// Bytes available
        actual: usize,
    },
}

/// Bytes needed to pack a `width` x `height` image
pub const fn packed_len(width: usize, height: usize) -> usize {
    width * height.div_ceil(8)
}

/// Packed image bytes with their pixel dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedImage {
    width: u16,
    height: u16,
    bytes: Vec<u8, MAX_PACKED_LEN>,
}

impl PackedImage {
    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Bytes per column
    pub fn bands(&self) -> usize {
        (self.height as usize).div_ceil(8)
    }

    /// The packed payload
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn ensure_fits<const W: usize, const H: usize>() -> Result<(), GraphicsError> {
    if W > MAX_PACKED_WIDTH || H.div_ceil(8) > MAX_PACKED_BANDS {
        return Err(GraphicsError::TooLarge);
    }
    Ok(())
}

fn band_byte<const W: usize, const H: usize>(
    buffer: &PixelBuffer<W, H>,
    x: usize,
    band: usize,
) -> u8 {
    let top = band * 8;
    let rows = (H - top).min(8);
    let mut byte = 0u8;
    for bit in 0..rows {
        if buffer.get(x as i32, (top + bit) as i32) {
            byte |= 0x80 >> bit;
        }
    }
    byte
}

/// Pack a buffer into the column-major image layout
pub fn pack<const W: usize, const H: usize>(
    buffer: &PixelBuffer<W, H>,
) -> Result<PackedImage, GraphicsError> {
    ensure_fits::<W, H>()?;

    let mut bytes = Vec::new();
    for x in 0..W {
        for band in 0..H.div_ceil(8) {
            bytes
                .push(band_byte(buffer, x, band))
                .map_err(|_| GraphicsError::TooLarge)?;
        }
    }

    Ok(PackedImage {
        width: W as u16,
        height: H as u16,
        bytes,
    })
}

/// Pack a buffer into a caller-provided slice
///
/// Returns the number of bytes written. Unlike [`pack`] this has no size
/// ceiling beyond the length of `out`.
pub fn pack_into<const W: usize, const H: usize>(
    buffer: &PixelBuffer<W, H>,
    out: &mut [u8],
) -> Result<usize, GraphicsError> {
    let len = packed_len(W, H);
    if out.len() < len {
        return Err(GraphicsError::LengthMismatch {
            expected: len,
            actual: out.len(),
        });
    }

    let bands = H.div_ceil(8);
    for (i, slot) in out[..len].iter_mut().enumerate() {
        *slot = band_byte(buffer, i / bands, i % bands);
    }
    Ok(len)
}

/// Rebuild a buffer from packed bytes
///
/// Padding bits of a partial last band are ignored.
pub fn unpack<const W: usize, const H: usize>(
    bytes: &[u8],
) -> Result<PixelBuffer<W, H>, GraphicsError> {
    let expected = packed_len(W, H);
    if bytes.len() != expected {
        return Err(GraphicsError::LengthMismatch {
            expected,
            actual: bytes.len(),
        });
    }

    let bands = H.div_ceil(8);
    let mut buffer = PixelBuffer::new();
    for (i, &byte) in bytes.iter().enumerate() {
        let x = (i / bands) as i32;
        let top = (i % bands) * 8;
        for bit in 0..8 {
            if byte & (0x80 >> bit) != 0 {
                buffer.set(x, (top + bit) as i32);
            }
        }
    }
    Ok(buffer)
}
