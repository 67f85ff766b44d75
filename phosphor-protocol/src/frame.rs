//! Command frames for the NAGP1250 serial protocol.
//!
//! Frame layout:
//! - HEADER (1-4 bytes): command prefix (`0x1F`, `0x1B`) and sub-opcodes
//! - PARAMETERS: single bytes, or 16-bit values as (low, high) byte pairs
//! - PAYLOAD (0-n bytes): image data or character codes
//!
//! There is no start byte, length or checksum on the wire; the device
//! decodes the stream purely from the command prefix.

use heapless::Vec;

/// Maximum header + parameter size in bytes
///
/// The longest fixed command (user window definition) is 14 bytes.
pub const MAX_HEADER_LEN: usize = 16;

/// Errors raised while building or encoding a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// A parameter is outside the range the device documents
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Rejected value
        value: u32,
    },
    /// Payload length disagrees with the declared dimensions
    PayloadLengthMismatch {
        /// Bytes implied by the dimensions
        expected: usize,
        /// Bytes supplied
        actual: usize,
    },
    /// Destination buffer too small for the encoded frame
    BufferTooSmall,
}

/// Check that `value` lies in `lo..=hi`
pub(crate) fn ensure_range(
    name: &'static str,
    value: u32,
    lo: u32,
    hi: u32,
) -> Result<(), CommandError> {
    if value < lo || value > hi {
        return Err(CommandError::InvalidParameter { name, value });
    }
    Ok(())
}

/// Bytes that follow the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    /// Command has no payload
    Empty,
    /// Raw bytes sent verbatim (image data, control codes)
    Bytes(&'a [u8]),
    /// Text; every char is sent as its code point, which is known to fit a byte
    Text(&'a str),
}

impl<'a> Payload<'a> {
    /// Number of bytes on the wire
    pub fn len(&self) -> usize {
        match self {
            Payload::Empty => 0,
            Payload::Bytes(bytes) => bytes.len(),
            Payload::Text(text) => text.chars().count(),
        }
    }

    /// Check if the payload is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A complete command ready for transmission
///
/// Frames are built by [`crate::CommandFramer`] and never change afterwards.
/// Payloads are borrowed, so building an image frame does not copy pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<'a> {
    header: Vec<u8, MAX_HEADER_LEN>,
    payload: Payload<'a>,
}

impl<'a> Frame<'a> {
    /// Create a frame from fixed command bytes
    pub fn command(bytes: &[u8]) -> Result<Self, CommandError> {
        let header = Vec::from_slice(bytes).map_err(|_| CommandError::BufferTooSmall)?;
        Ok(Self {
            header,
            payload: Payload::Empty,
        })
    }

    /// Create a frame that carries raw bytes only
    pub fn raw(bytes: &'a [u8]) -> Self {
        Self {
            header: Vec::new(),
            payload: Payload::Bytes(bytes),
        }
    }

    /// Create a text frame
    ///
    /// Each char maps to one byte equal to its code point, so only chars up
    /// to U+00FF can be represented.
    pub fn text(text: &'a str) -> Result<Self, CommandError> {
        if let Some(c) = text.chars().find(|c| (*c as u32) > 0xFF) {
            return Err(CommandError::InvalidParameter {
                name: "text",
                value: c as u32,
            });
        }
        Ok(Self {
            header: Vec::new(),
            payload: Payload::Text(text),
        })
    }

    /// Append a single-byte parameter
    pub(crate) fn with_u8(mut self, value: u8) -> Result<Self, CommandError> {
        self.header
            .push(value)
            .map_err(|_| CommandError::BufferTooSmall)?;
        Ok(self)
    }

    /// Append a 16-bit parameter as (low, high)
    pub(crate) fn with_u16(mut self, value: u16) -> Result<Self, CommandError> {
        self.header
            .extend_from_slice(&value.to_le_bytes())
            .map_err(|_| CommandError::BufferTooSmall)?;
        Ok(self)
    }

    /// Attach a byte payload
    pub(crate) fn with_payload(mut self, payload: &'a [u8]) -> Self {
        self.payload = Payload::Bytes(payload);
        self
    }

    /// Header and parameter bytes
    pub fn header(&self) -> &[u8] {
        &self.header
    }

    /// The payload
    pub fn payload(&self) -> Payload<'a> {
        self.payload
    }

    /// Total encoded length in bytes
    pub fn len(&self) -> usize {
        self.header.len() + self.payload.len()
    }

    /// Check if the frame has no bytes at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over every byte of the frame in wire order
    pub fn bytes(&self) -> FrameBytes<'_> {
        FrameBytes {
            header: self.header.iter(),
            payload: match self.payload {
                Payload::Empty => PayloadIter::Bytes(<&[u8]>::default().iter()),
                Payload::Bytes(bytes) => PayloadIter::Bytes(bytes.iter()),
                Payload::Text(text) => PayloadIter::Text(text.chars()),
            },
        }
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, CommandError> {
        let len = self.len();
        if buffer.len() < len {
            return Err(CommandError::BufferTooSmall);
        }

        for (slot, byte) in buffer.iter_mut().zip(self.bytes()) {
            *slot = byte;
        }

        Ok(len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec<const N: usize>(&self) -> Result<Vec<u8, N>, CommandError> {
        let mut vec = Vec::new();
        for byte in self.bytes() {
            vec.push(byte).map_err(|_| CommandError::BufferTooSmall)?;
        }
        Ok(vec)
    }
}

/// Iterator over the bytes of a [`Frame`]
pub struct FrameBytes<'f> {
    header: core::slice::Iter<'f, u8>,
    payload: PayloadIter<'f>,
}

enum PayloadIter<'f> {
    Bytes(core::slice::Iter<'f, u8>),
    Text(core::str::Chars<'f>),
}

impl Iterator for FrameBytes<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if let Some(&byte) = self.header.next() {
            return Some(byte);
        }
        match &mut self.payload {
            PayloadIter::Bytes(iter) => iter.next().copied(),
            PayloadIter::Text(chars) => chars.next().map(|c| c as u32 as u8),
        }
    }
}
