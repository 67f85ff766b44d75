//! Command builders for the NAGP1250
//!
//! [`CommandFramer`] has one builder per device operation. Every builder
//! checks its arguments against the ranges the module documents and only
//! then assembles a [`Frame`]; nothing here touches a transport.

use crate::frame::{ensure_range, CommandError, Frame};
use crate::window::{ensure_user_window, ensure_window, Window};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Command prefixes, sub-opcodes and control codes
pub mod cmd {
    /// Prefix of the `US` (unit separator) command family
    pub const US: u8 = 0x1F;
    /// Prefix of the `ESC` command family
    pub const ESC: u8 = 0x1B;
    /// Second byte of the `US (` extended commands
    pub const EXTENDED: u8 = 0x28;

    pub const INITIALIZE: u8 = 0x40;
    pub const FONT_SET: u8 = 0x52;
    pub const CHARACTER_CODE: u8 = 0x74;

    pub const MODE_OVERWRITE: u8 = 0x01;
    pub const MODE_VERTICAL_SCROLL: u8 = 0x02;
    pub const MODE_HORIZONTAL_SCROLL: u8 = 0x03;
    pub const CURSOR_POSITION: u8 = 0x24;
    pub const CURSOR_BLINK: u8 = 0x43;
    pub const LUMINANCE: u8 = 0x58;
    pub const REVERSE_DISPLAY: u8 = 0x72;
    pub const HORIZONTAL_SCROLL_SPEED: u8 = 0x73;
    pub const WRITE_LOGIC: u8 = 0x77;

    /// `US ( a` group: waits, scrolls, blinking, screen saver
    pub const GROUP_ACTION: u8 = 0x61;
    pub const ACTION_WAIT: u8 = 0x01;
    pub const ACTION_SCROLL: u8 = 0x10;
    pub const ACTION_BLINK: u8 = 0x11;
    pub const ACTION_SCREEN_SAVER: u8 = 0x40;

    /// `US ( f` group: bit images
    pub const GROUP_IMAGE: u8 = 0x66;
    pub const IMAGE_REALTIME: u8 = 0x11;
    /// Fixed image format byte
    pub const IMAGE_FORMAT: u8 = 0x01;

    /// `US ( g` group: font attributes
    pub const GROUP_FONT: u8 = 0x67;
    pub const FONT_SPACING: u8 = 0x03;
    pub const FONT_MAGNIFY: u8 = 0x40;

    /// `US ( w` group: windows
    pub const GROUP_WINDOW: u8 = 0x77;
    pub const WINDOW_SELECT: u8 = 0x01;
    pub const WINDOW_DEFINE: u8 = 0x02;
    pub const WINDOW_BASE: u8 = 0x10;

    // Single-byte control codes
    pub const BACKSPACE: u8 = 0x08;
    pub const HORIZONTAL_TAB: u8 = 0x09;
    pub const LINE_FEED: u8 = 0x0A;
    pub const HOME: u8 = 0x0B;
    pub const CLEAR: u8 = 0x0C;
    pub const CARRIAGE_RETURN: u8 = 0x0D;
}

/// Widest realtime image in dots
pub const IMAGE_MAX_WIDTH: u16 = 256;

/// Tallest realtime image in dots
pub const IMAGE_MAX_HEIGHT: u16 = 32;

/// Size of the base window (window 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum BaseWindowMode {
    /// 140 x 32 dots
    #[default]
    Base = 0,
    /// 256 x 32 dots
    Extended = 1,
}

impl BaseWindowMode {
    /// Base window width in dots
    pub const fn width(self) -> u16 {
        match self {
            BaseWindowMode::Base => 140,
            BaseWindowMode::Extended => 256,
        }
    }

    /// Largest cursor column accepted in this mode
    pub const fn max_cursor_x(self) -> u16 {
        match self {
            BaseWindowMode::Base => 255,
            BaseWindowMode::Extended => 280,
        }
    }
}

impl TryFrom<u8> for BaseWindowMode {
    type Error = CommandError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(BaseWindowMode::Base),
            1 => Ok(BaseWindowMode::Extended),
            _ => Err(CommandError::InvalidParameter {
                name: "base_window_mode",
                value: value as u32,
            }),
        }
    }
}

/// Unit of the cursor Y coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CursorAddressing {
    /// Y counts 8-dot character rows (0-3)
    #[default]
    Rows,
    /// Y counts single dots (0-31), as older firmware expects
    Dots,
}

impl CursorAddressing {
    /// Largest cursor row accepted
    pub const fn max_y(self) -> u16 {
        match self {
            CursorAddressing::Rows => 3,
            CursorAddressing::Dots => 31,
        }
    }
}

/// How new dots combine with what is already displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum WriteLogic {
    #[default]
    Normal = 0,
    Or = 1,
    And = 2,
    Xor = 3,
}

impl From<WriteLogic> for u8 {
    fn from(mode: WriteLogic) -> u8 {
        mode as u8
    }
}

/// Text write mode (MD1-MD3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WriteMode {
    /// MD1: overwrite at the end of a line
    #[default]
    Overwrite,
    /// MD2: scroll up at the end of the last line
    VerticalScroll,
    /// MD3: scroll left at the end of a line
    HorizontalScroll,
}

impl WriteMode {
    fn opcode(self) -> u8 {
        match self {
            WriteMode::Overwrite => cmd::MODE_OVERWRITE,
            WriteMode::VerticalScroll => cmd::MODE_VERTICAL_SCROLL,
            WriteMode::HorizontalScroll => cmd::MODE_HORIZONTAL_SCROLL,
        }
    }
}

/// Blink display pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BlinkPattern {
    /// Stop blinking
    Normal = 0,
    /// Alternate normal and blank
    Blank = 1,
    /// Alternate normal and reversed
    Reverse = 2,
}

impl From<BlinkPattern> for u8 {
    fn from(pattern: BlinkPattern) -> u8 {
        pattern as u8
    }
}

/// Screen saver action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ScreenSaver {
    /// Switch the module's internal power supply off
    PowerOff = 0,
    /// Switch the module's internal power supply on
    PowerOn = 1,
    /// All dots off; display memory kept
    AllDotsOff = 2,
    /// All dots on; display memory kept
    AllDotsOn = 3,
    /// Alternate all-on and reverse every 2 s
    Alternate = 4,
}

impl From<ScreenSaver> for u8 {
    fn from(pattern: ScreenSaver) -> u8 {
        pattern as u8
    }
}

/// International font set for characters 0x20-0x7F
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FontSet {
    America = 0x00,
    France = 0x01,
    Germany = 0x02,
    England = 0x03,
    Denmark1 = 0x04,
    Sweden = 0x05,
    Italy = 0x06,
    Spain1 = 0x07,
    Japan = 0x08,
    Norway = 0x09,
    Denmark2 = 0x0A,
    Spain2 = 0x0B,
    LatinAmerica = 0x0C,
    Korea = 0x0D,
}

impl From<FontSet> for u8 {
    fn from(font: FontSet) -> u8 {
        font as u8
    }
}

/// Character code table for characters 0x80-0xFF
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CharacterCode {
    Pc437 = 0x00,
    Katakana = 0x01,
    Pc850 = 0x02,
    Pc860 = 0x03,
    Pc863 = 0x04,
    Pc865 = 0x05,
    Wpc1252 = 0x10,
    Pc866 = 0x11,
    Pc852 = 0x12,
    Pc858 = 0x13,
}

impl From<CharacterCode> for u8 {
    fn from(code: CharacterCode) -> u8 {
        code as u8
    }
}

/// Builds validated command frames
///
/// The framer remembers the base window mode and the cursor addressing
/// scheme because both change which cursor coordinates are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandFramer {
    base_window: BaseWindowMode,
    addressing: CursorAddressing,
}

impl CommandFramer {
    /// Create a framer for a freshly initialized module
    pub const fn new() -> Self {
        Self {
            base_window: BaseWindowMode::Base,
            addressing: CursorAddressing::Rows,
        }
    }

    /// Create a framer with an explicit cursor addressing scheme
    pub const fn with_addressing(addressing: CursorAddressing) -> Self {
        Self {
            base_window: BaseWindowMode::Base,
            addressing,
        }
    }

    /// Current base window mode
    pub fn base_window_mode(&self) -> BaseWindowMode {
        self.base_window
    }

    /// Current cursor addressing scheme
    pub fn addressing(&self) -> CursorAddressing {
        self.addressing
    }

    /// Width of the base window in dots
    pub fn display_width(&self) -> u16 {
        self.base_window.width()
    }

    /// Initialize display (`ESC @`)
    pub fn initialize(&self) -> Result<Frame<'static>, CommandError> {
        Frame::command(&[cmd::ESC, cmd::INITIALIZE])
    }

    /// Move the cursor
    ///
    /// X is in dots; Y is in rows or dots depending on [`CursorAddressing`].
    pub fn cursor_position(&self, x: u16, y: u16) -> Result<Frame<'static>, CommandError> {
        ensure_range("cursor_x", x as u32, 0, self.base_window.max_cursor_x() as u32)?;
        ensure_range("cursor_y", y as u32, 0, self.addressing.max_y() as u32)?;

        Frame::command(&[cmd::US, cmd::CURSOR_POSITION])?
            .with_u16(x)?
            .with_u16(y)
    }

    /// Font magnification, horizontal and vertical factors 1-4
    pub fn font_magnification(&self, h: u8, v: u8) -> Result<Frame<'static>, CommandError> {
        ensure_range("magnification_h", h as u32, 1, 4)?;
        ensure_range("magnification_v", v as u32, 1, 4)?;
        Frame::command(&[cmd::US, cmd::EXTENDED, cmd::GROUP_FONT, cmd::FONT_MAGNIFY, h, v])
    }

    /// Brightness in eighths (1 = 12.5%, 8 = 100%)
    pub fn luminance(&self, level: u8) -> Result<Frame<'static>, CommandError> {
        ensure_range("luminance", level as u32, 1, 8)?;
        Frame::command(&[cmd::US, cmd::LUMINANCE, level])
    }

    /// Cursor blink off (0) or on (1, about 1 Hz)
    pub fn cursor_blink(&self, mode: u8) -> Result<Frame<'static>, CommandError> {
        ensure_range("cursor_blink", mode as u32, 0, 1)?;
        Frame::command(&[cmd::US, cmd::CURSOR_BLINK, mode])
    }

    /// Write logic used when new dots land on lit ones
    pub fn write_logic(&self, mode: impl Into<u8>) -> Result<Frame<'static>, CommandError> {
        let mode = mode.into();
        ensure_range("write_logic", mode as u32, 0, 3)?;
        Frame::command(&[cmd::US, cmd::WRITE_LOGIC, mode])
    }

    /// Reverse video for subsequently written data (0 = cancel, 1 = reverse)
    pub fn reverse_display(&self, mode: u8) -> Result<Frame<'static>, CommandError> {
        ensure_range("reverse_display", mode as u32, 0, 1)?;
        Frame::command(&[cmd::US, cmd::REVERSE_DISPLAY, mode])
    }

    /// Select the window that receives text and images
    pub fn select_window(&self, window: u8) -> Result<Frame<'static>, CommandError> {
        ensure_window(window)?;
        Frame::command(&[
            cmd::US,
            cmd::EXTENDED,
            cmd::GROUP_WINDOW,
            cmd::WINDOW_SELECT,
            window,
        ])
    }

    /// Select a window and clear it
    pub fn clear_window(&self, window: u8) -> Result<Frame<'static>, CommandError> {
        self.select_window(window)?.with_u8(cmd::CLEAR)
    }

    /// Define user window 1-4
    pub fn define_window(
        &self,
        window: u8,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    ) -> Result<Frame<'static>, CommandError> {
        ensure_user_window(window)?;
        let geometry = Window::new(x, y, width, height)?;

        Frame::command(&[
            cmd::US,
            cmd::EXTENDED,
            cmd::GROUP_WINDOW,
            cmd::WINDOW_DEFINE,
            window,
            0x01, // define
        ])?
        .with_u16(geometry.x)?
        .with_u16(geometry.y)?
        .with_u16(geometry.width)?
        .with_u16(geometry.height)
    }

    /// Delete user window 1-4
    ///
    /// Deleting leaves the window's contents on screen; send
    /// [`CommandFramer::clear_window`] first to erase them.
    pub fn delete_window(&self, window: u8) -> Result<Frame<'static>, CommandError> {
        ensure_user_window(window)?;
        Frame::command(&[
            cmd::US,
            cmd::EXTENDED,
            cmd::GROUP_WINDOW,
            cmd::WINDOW_DEFINE,
            window,
            0x00, // delete
        ])
    }

    /// Resize the base window and remember the new mode
    ///
    /// Later cursor positions are validated against the new width.
    pub fn base_window(&mut self, mode: u8) -> Result<Frame<'static>, CommandError> {
        let mode = BaseWindowMode::try_from(mode)?;
        let frame = Frame::command(&[
            cmd::US,
            cmd::EXTENDED,
            cmd::GROUP_WINDOW,
            cmd::WINDOW_BASE,
            mode as u8,
        ])?;
        self.base_window = mode;
        Ok(frame)
    }

    /// Blink the whole display
    ///
    /// Times are in units of roughly 14 ms.
    pub fn blink_display(
        &self,
        pattern: impl Into<u8>,
        normal_time: u8,
        blink_time: u8,
        repetition: u8,
    ) -> Result<Frame<'static>, CommandError> {
        let pattern = pattern.into();
        ensure_range("blink_pattern", pattern as u32, 0, 2)?;
        ensure_range("blink_normal_time", normal_time as u32, 1, 255)?;
        ensure_range("blink_time", blink_time as u32, 1, 255)?;
        ensure_range("blink_repetition", repetition as u32, 1, 255)?;

        Frame::command(&[
            cmd::US,
            cmd::EXTENDED,
            cmd::GROUP_ACTION,
            cmd::ACTION_BLINK,
            pattern,
            normal_time,
            blink_time,
            repetition,
        ])
    }

    /// MD3 horizontal scroll speed, about `speed * 14` ms per column
    pub fn horizontal_scroll_speed(&self, speed: u8) -> Result<Frame<'static>, CommandError> {
        ensure_range("scroll_speed", speed as u32, 0, 31)?;
        Frame::command(&[cmd::US, cmd::HORIZONTAL_SCROLL_SPEED, speed])
    }

    /// Scroll the display memory
    ///
    /// `shift_bytes` is the shift per step in display-memory bytes,
    /// `repeat_count` the number of steps and `speed` the delay between them.
    pub fn display_scroll(
        &self,
        shift_bytes: u16,
        repeat_count: u32,
        speed: u8,
    ) -> Result<Frame<'static>, CommandError> {
        ensure_range("scroll_shift", shift_bytes as u32, 0, 1023)?;
        ensure_range("scroll_repeat", repeat_count, 1, u16::MAX as u32)?;

        Frame::command(&[cmd::US, cmd::EXTENDED, cmd::GROUP_ACTION, cmd::ACTION_SCROLL])?
            .with_u16(shift_bytes)?
            .with_u16(repeat_count as u16)?
            .with_u8(speed)
    }

    /// Realtime bit image at the cursor
    ///
    /// `payload` is column-major, one byte per 8 vertical dots, MSB on top.
    /// Height is in dots and must be a multiple of 8.
    pub fn realtime_image<'a>(
        &self,
        width: u16,
        height: u16,
        payload: &'a [u8],
    ) -> Result<Frame<'a>, CommandError> {
        ensure_range("image_width", width as u32, 1, IMAGE_MAX_WIDTH as u32)?;
        ensure_range("image_height", height as u32, 1, IMAGE_MAX_HEIGHT as u32)?;
        if height % 8 != 0 {
            return Err(CommandError::InvalidParameter {
                name: "image_height",
                value: height as u32,
            });
        }

        let byte_rows = height / 8;
        let expected = width as usize * byte_rows as usize;
        if payload.len() != expected {
            return Err(CommandError::PayloadLengthMismatch {
                expected,
                actual: payload.len(),
            });
        }

        Ok(
            Frame::command(&[cmd::US, cmd::EXTENDED, cmd::GROUP_IMAGE, cmd::IMAGE_REALTIME])?
                .with_u16(width)?
                .with_u16(byte_rows)?
                .with_u8(cmd::IMAGE_FORMAT)?
                .with_payload(payload),
        )
    }

    /// Text at the cursor; each char is sent as its code point
    pub fn text<'a>(&self, text: &'a str) -> Result<Frame<'a>, CommandError> {
        Frame::text(text)
    }

    /// Raw character codes, passed through untouched
    pub fn raw<'a>(&self, bytes: &'a [u8]) -> Frame<'a> {
        Frame::raw(bytes)
    }

    /// International font set (0-13)
    pub fn font_set(&self, font: impl Into<u8>) -> Result<Frame<'static>, CommandError> {
        let font = font.into();
        ensure_range("font_set", font as u32, 0, 13)?;
        Frame::command(&[cmd::ESC, cmd::FONT_SET, font])
    }

    /// Character code table for the upper half of the character set
    pub fn character_code(&self, code: impl Into<u8>) -> Result<Frame<'static>, CommandError> {
        let code = code.into();
        if !matches!(code, 0x00..=0x05 | 0x10..=0x13) {
            return Err(CommandError::InvalidParameter {
                name: "character_code",
                value: code as u32,
            });
        }
        Frame::command(&[cmd::ESC, cmd::CHARACTER_CODE, code])
    }

    /// Character spacing (0-1 fixed width, 2-3 proportional)
    pub fn character_spacing(&self, mode: u8) -> Result<Frame<'static>, CommandError> {
        ensure_range("character_spacing", mode as u32, 0, 3)?;
        Frame::command(&[cmd::US, cmd::EXTENDED, cmd::GROUP_FONT, cmd::FONT_SPACING, mode])
    }

    /// Text write mode MD1-MD3
    pub fn write_mode(&self, mode: WriteMode) -> Result<Frame<'static>, CommandError> {
        Frame::command(&[cmd::US, mode.opcode()])
    }

    /// Make the module pause for about `duration * 0.5` s
    pub fn wait(&self, duration: u8) -> Result<Frame<'static>, CommandError> {
        Frame::command(&[cmd::US, cmd::EXTENDED, cmd::GROUP_ACTION, cmd::ACTION_WAIT, duration])
    }

    /// Screen saver / power control
    pub fn screen_saver(&self, pattern: impl Into<u8>) -> Result<Frame<'static>, CommandError> {
        let pattern = pattern.into();
        ensure_range("screen_saver", pattern as u32, 0, 4)?;
        Frame::command(&[
            cmd::US,
            cmd::EXTENDED,
            cmd::GROUP_ACTION,
            cmd::ACTION_SCREEN_SAVER,
            pattern,
        ])
    }

    /// Cursor to the top left of the current window
    pub fn home(&self) -> Result<Frame<'static>, CommandError> {
        Frame::command(&[cmd::HOME])
    }

    /// Cursor to the next line
    pub fn line_feed(&self) -> Result<Frame<'static>, CommandError> {
        Frame::command(&[cmd::LINE_FEED])
    }

    /// Cursor back one character
    pub fn backspace(&self) -> Result<Frame<'static>, CommandError> {
        Frame::command(&[cmd::BACKSPACE])
    }

    /// Cursor forward one tab stop
    pub fn horizontal_tab(&self) -> Result<Frame<'static>, CommandError> {
        Frame::command(&[cmd::HORIZONTAL_TAB])
    }

    /// Cursor to the start of the current line
    pub fn carriage_return(&self) -> Result<Frame<'static>, CommandError> {
        Frame::command(&[cmd::CARRIAGE_RETURN])
    }
}
