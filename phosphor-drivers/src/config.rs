//! Driver configuration
//!
//! [`VfdConfig`] carries everything [`crate::Vfd::init`] sends plus the
//! wiring and timing of the link. It can be persisted with postcard; a
//! magic number and version guard against loading foreign or stale data.

use phosphor_hal::{PinRegistry, Source, SourceError};
use phosphor_protocol::{
    BaseWindowMode, CommandError, CommandFramer, CursorAddressing, WriteMode,
};
use serde::{Deserialize, Serialize};

/// Magic number to identify stored driver configuration
pub const CONFIG_MAGIC: u32 = 0x5646_4431; // "VFD1"

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Upper bound on the serialized size of [`VfdConfig`]
pub const MAX_CONFIG_SIZE: usize = 64;

/// Shortest reset phase the module accepts, in milliseconds
pub const MIN_RESET_PULSE_MS: u32 = 100;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Serialization failed (buffer too small)
    Serialize,
    /// Stored bytes could not be decoded
    Deserialize,
    /// Magic number or version mismatch
    InvalidFormat,
    /// A display setting is out of range
    Invalid(CommandError),
    /// A pin name could not be parsed
    InvalidPinName,
    /// Pin assignment is out of range or reuses a pin
    Pins(SourceError),
    /// Busy timeout of zero
    ZeroTimeout,
    /// Reset phase shorter than [`MIN_RESET_PULSE_MS`]
    ResetPulseTooShort(u32),
}

impl From<CommandError> for ConfigError {
    fn from(e: CommandError) -> Self {
        ConfigError::Invalid(e)
    }
}

impl From<SourceError> for ConfigError {
    fn from(e: SourceError) -> Self {
        ConfigError::Pins(e)
    }
}

/// GPIO numbers the display is wired to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinAssignment {
    /// Serial data in
    pub sin: u8,
    /// Serial clock
    pub sck: u8,
    /// Active-low reset, if wired
    pub reset: Option<u8>,
    /// SBUSY output of the module, if wired
    pub busy: Option<u8>,
}

impl Default for PinAssignment {
    fn default() -> Self {
        Self {
            sin: 33,
            sck: 37,
            reset: Some(39),
            busy: Some(35),
        }
    }
}

impl PinAssignment {
    /// Build an assignment from pin names such as `"gpio33"` or `"33"`
    pub fn from_names(
        sin: &str,
        sck: &str,
        reset: Option<&str>,
        busy: Option<&str>,
    ) -> Result<Self, ConfigError> {
        fn id(name: &str) -> Result<u8, ConfigError> {
            Source::parse(name)
                .and_then(|s| s.id())
                .ok_or(ConfigError::InvalidPinName)
        }

        Ok(Self {
            sin: id(sin)?,
            sck: id(sck)?,
            reset: reset.map(id).transpose()?,
            busy: busy.map(id).transpose()?,
        })
    }

    /// Check that every pin exists and none is used twice
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut registry = PinRegistry::new();
        registry.claim(self.sin)?;
        registry.claim(self.sck)?;
        if let Some(reset) = self.reset {
            registry.claim(reset)?;
        }
        if let Some(busy) = self.busy {
            registry.claim(busy)?;
        }
        Ok(())
    }
}

/// Complete driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VfdConfig {
    /// Magic number for validation
    pub magic: u32,
    /// Data format version
    pub version: u8,
    /// Brightness sent at init (1-8)
    pub luminance: u8,
    /// Cursor blink sent at init, if any
    pub cursor_blink: Option<bool>,
    /// Write mode sent at init, if any
    pub write_mode: Option<WriteMode>,
    /// Base window size applied at init
    pub base_window: BaseWindowMode,
    /// Unit of cursor Y coordinates
    pub addressing: CursorAddressing,
    /// Longest wait for SBUSY after a frame
    pub busy_timeout_us: u32,
    /// Width of each reset phase (at least [`MIN_RESET_PULSE_MS`])
    pub reset_pulse_ms: u32,
    /// Wiring
    pub pins: PinAssignment,
}

impl Default for VfdConfig {
    fn default() -> Self {
        Self {
            magic: CONFIG_MAGIC,
            version: CONFIG_VERSION,
            luminance: 4,
            cursor_blink: None,
            write_mode: None,
            base_window: BaseWindowMode::Base,
            addressing: CursorAddressing::Rows,
            busy_timeout_us: 10_000,
            reset_pulse_ms: MIN_RESET_PULSE_MS,
            pins: PinAssignment::default(),
        }
    }
}

impl VfdConfig {
    /// Check if magic and version match
    pub fn is_valid(&self) -> bool {
        self.magic == CONFIG_MAGIC && self.version == CONFIG_VERSION
    }

    /// Run every setting through the same checks the commands use
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.is_valid() {
            return Err(ConfigError::InvalidFormat);
        }

        let framer = CommandFramer::with_addressing(self.addressing);
        framer.luminance(self.luminance)?;
        if let Some(blink) = self.cursor_blink {
            framer.cursor_blink(blink as u8)?;
        }
        if let Some(mode) = self.write_mode {
            framer.write_mode(mode)?;
        }
        if self.busy_timeout_us == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.reset_pulse_ms < MIN_RESET_PULSE_MS {
            return Err(ConfigError::ResetPulseTooShort(self.reset_pulse_ms));
        }
        self.pins.validate()
    }

    /// Serialize into `buffer`, returning the used part
    pub fn to_slice<'b>(&self, buffer: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buffer).map_err(|_| ConfigError::Serialize)
    }

    /// Deserialize and validate stored configuration
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: VfdConfig =
            postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }
}
