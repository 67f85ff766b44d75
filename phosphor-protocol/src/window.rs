//! Device-side windows
//!
//! Window 0 is the base window covering the whole panel. Windows 1-4 are
//! user-defined sub-regions; text and images sent while a window is
//! selected are confined to it, which lets a caller refresh one area
//! without resending the whole screen.

use crate::frame::{ensure_range, CommandError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Index of the base window
pub const BASE_WINDOW: u8 = 0;

/// Highest user window index
pub const MAX_USER_WINDOWS: u8 = 4;

/// Widest window in dots
pub const MAX_WINDOW_WIDTH: u16 = 280;

/// Tallest window in 8-dot rows
pub const MAX_WINDOW_ROWS: u16 = 4;

/// Geometry of a user window
///
/// `x` and `width` are in dots; `y` and `height` are in rows of 8 dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Window {
    /// Upper-left column (0-279)
    pub x: u16,
    /// Upper-left row (0-3)
    pub y: u16,
    /// Width in dots (1-280)
    pub width: u16,
    /// Height in rows (1-4)
    pub height: u16,
}

impl Window {
    /// Validate and create a window geometry
    ///
    /// Position and size must both be in range.
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Result<Self, CommandError> {
        ensure_range("window_x", x as u32, 0, MAX_WINDOW_WIDTH as u32 - 1)?;
        ensure_range("window_y", y as u32, 0, MAX_WINDOW_ROWS as u32 - 1)?;
        ensure_range("window_width", width as u32, 1, MAX_WINDOW_WIDTH as u32)?;
        ensure_range("window_height", height as u32, 1, MAX_WINDOW_ROWS as u32)?;
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Height in dots
    pub fn height_dots(&self) -> u16 {
        self.height * 8
    }
}

/// Check a user window index (1-4)
pub fn ensure_user_window(window: u8) -> Result<(), CommandError> {
    ensure_range("window", window as u32, 1, MAX_USER_WINDOWS as u32)
}

/// Check any window index (0-4)
pub fn ensure_window(window: u8) -> Result<(), CommandError> {
    ensure_range("window", window as u32, 0, MAX_USER_WINDOWS as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_bounds() {
        assert!(Window::new(0, 0, 1, 1).is_ok());
        assert!(Window::new(279, 3, 280, 4).is_ok());

        assert_eq!(
            Window::new(280, 0, 1, 1),
            Err(CommandError::InvalidParameter {
                name: "window_x",
                value: 280
            })
        );
        assert_eq!(
            Window::new(0, 4, 1, 1),
            Err(CommandError::InvalidParameter {
                name: "window_y",
                value: 4
            })
        );
        assert_eq!(
            Window::new(0, 0, 0, 1),
            Err(CommandError::InvalidParameter {
                name: "window_width",
                value: 0
            })
        );
        assert_eq!(
            Window::new(0, 0, 281, 1),
            Err(CommandError::InvalidParameter {
                name: "window_width",
                value: 281
            })
        );
        assert_eq!(
            Window::new(0, 0, 1, 5),
            Err(CommandError::InvalidParameter {
                name: "window_height",
                value: 5
            })
        );
    }

    #[test]
    fn test_position_and_size_both_checked() {
        // A valid x must not excuse a bad y, and vice versa
        assert!(Window::new(10, 9, 10, 1).is_err());
        assert!(Window::new(300, 1, 10, 1).is_err());
        // Same for the size pair
        assert!(Window::new(0, 0, 10, 0).is_err());
        assert!(Window::new(0, 0, 0, 2).is_err());
    }

    #[test]
    fn test_window_indices() {
        assert!(ensure_user_window(1).is_ok());
        assert!(ensure_user_window(4).is_ok());
        assert!(ensure_user_window(0).is_err());
        assert!(ensure_user_window(5).is_err());

        assert!(ensure_window(0).is_ok());
        assert!(ensure_window(4).is_ok());
        assert!(ensure_window(5).is_err());
    }

    #[test]
    fn test_height_dots() {
        let w = Window::new(0, 0, 45, 2).unwrap();
        assert_eq!(w.height_dots(), 16);
    }
}
