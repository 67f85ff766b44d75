//! NAGP1250 device facade
//!
//! [`Vfd`] owns the transport, the command framer and the reset pin, and
//! mirrors the module state the host cares about: which user windows are
//! defined and which window is selected. Every method validates and frames
//! before sending, so a rejected call never puts a byte on the wire.

use embedded_hal::digital::{InputPin, OutputPin};
use phosphor_graphics::{pack, PixelBuffer};
use phosphor_hal::Clock;
use phosphor_protocol::window::ensure_user_window;
use phosphor_protocol::{
    BaseWindowMode, CommandFramer, Frame, Window, WriteMode, BASE_WINDOW, MAX_USER_WINDOWS,
};

use crate::config::VfdConfig;
use crate::error::{pin_error, VfdError};
use crate::transport::{BusyWait, Link, NoPin, Transport};

/// Characters per text frame
///
/// Longer text goes out as consecutive frames, each followed by the
/// SBUSY handshake.
pub const TEXT_CHUNK_CHARS: usize = 64;

/// Futaba NAGP1250 VFD driver
pub struct Vfd<L, B, R, C> {
    transport: Transport<L, B, C>,
    reset: Option<R>,
    framer: CommandFramer,
    config: VfdConfig,
    windows: [Option<Window>; MAX_USER_WINDOWS as usize],
    selected: u8,
}

impl<L, B, C> Vfd<L, B, NoPin, C>
where
    L: Link,
    B: InputPin,
    C: Clock,
{
    /// Create a driver without a reset pin
    pub fn new(transport: Transport<L, B, C>, config: VfdConfig) -> Result<Self, VfdError> {
        Self::build(transport, None, config)
    }
}

impl<L, B, R, C> Vfd<L, B, R, C>
where
    L: Link,
    B: InputPin,
    R: OutputPin,
    C: Clock,
{
    /// Create a driver that pulses `reset` during [`Vfd::init`]
    pub fn with_reset(
        transport: Transport<L, B, C>,
        reset: R,
        config: VfdConfig,
    ) -> Result<Self, VfdError> {
        Self::build(transport, Some(reset), config)
    }

    fn build(
        mut transport: Transport<L, B, C>,
        reset: Option<R>,
        config: VfdConfig,
    ) -> Result<Self, VfdError> {
        config.validate()?;
        transport.set_busy_timeout_us(config.busy_timeout_us);

        Ok(Self {
            transport,
            reset,
            framer: CommandFramer::with_addressing(config.addressing),
            config,
            windows: [None; MAX_USER_WINDOWS as usize],
            selected: BASE_WINDOW,
        })
    }

    /// Reset and initialize the module, then apply the configuration
    pub fn init(&mut self) -> Result<(), VfdError> {
        self.hardware_reset()?;

        let frame = self.framer.initialize()?;
        self.send(&frame)?;
        self.forget_state();
        info!("VFD initialized");

        self.set_luminance(self.config.luminance)?;
        if let Some(blink) = self.config.cursor_blink {
            self.set_cursor_blink(blink as u8)?;
        }
        if let Some(mode) = self.config.write_mode {
            self.set_write_mode(mode)?;
        }
        if self.config.base_window != BaseWindowMode::Base {
            self.define_base_window(self.config.base_window as u8)?;
        }
        Ok(())
    }

    /// Pulse the reset line: high, low, high
    ///
    /// Does nothing without a reset pin.
    pub fn hardware_reset(&mut self) -> Result<(), VfdError> {
        let Some(pin) = self.reset.as_mut() else {
            return Ok(());
        };
        let pulse_ms = self.config.reset_pulse_ms;
        let clock = self.transport.clock_mut();

        pin.set_high().map_err(pin_error)?;
        pin.set_low().map_err(pin_error)?;
        clock.delay_ms(pulse_ms);
        pin.set_high().map_err(pin_error)?;
        clock.delay_ms(pulse_ms);

        self.forget_state();
        debug!("VFD reset pulse done");
        Ok(())
    }

    fn forget_state(&mut self) {
        self.framer = CommandFramer::with_addressing(self.config.addressing);
        self.windows = [None; MAX_USER_WINDOWS as usize];
        self.selected = BASE_WINDOW;
    }

    fn send(&mut self, frame: &Frame<'_>) -> Result<BusyWait, VfdError> {
        self.transport.send(frame)
    }

    // Accessors

    pub fn config(&self) -> &VfdConfig {
        &self.config
    }

    pub fn framer(&self) -> &CommandFramer {
        &self.framer
    }

    /// Geometry of user window `window` (1-4), if defined
    pub fn window(&self, window: u8) -> Option<Window> {
        let index = window.checked_sub(1)? as usize;
        self.windows.get(index).copied().flatten()
    }

    /// Currently selected window (0 = base)
    pub fn selected_window(&self) -> u8 {
        self.selected
    }

    pub fn transport(&self) -> &Transport<L, B, C> {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut Transport<L, B, C> {
        &mut self.transport
    }

    /// Take the driver apart
    pub fn release(self) -> (Transport<L, B, C>, Option<R>) {
        (self.transport, self.reset)
    }

    // Display settings

    pub fn set_luminance(&mut self, level: u8) -> Result<BusyWait, VfdError> {
        let frame = self.framer.luminance(level)?;
        self.send(&frame)
    }

    pub fn set_cursor_blink(&mut self, mode: u8) -> Result<BusyWait, VfdError> {
        let frame = self.framer.cursor_blink(mode)?;
        self.send(&frame)
    }

    pub fn set_cursor_position(&mut self, x: u16, y: u16) -> Result<BusyWait, VfdError> {
        let frame = self.framer.cursor_position(x, y)?;
        self.send(&frame)
    }

    pub fn set_font_magnification(&mut self, h: u8, v: u8) -> Result<BusyWait, VfdError> {
        let frame = self.framer.font_magnification(h, v)?;
        self.send(&frame)
    }

    pub fn set_write_logic(&mut self, mode: impl Into<u8>) -> Result<BusyWait, VfdError> {
        let frame = self.framer.write_logic(mode)?;
        self.send(&frame)
    }

    pub fn set_reverse_display(&mut self, mode: u8) -> Result<BusyWait, VfdError> {
        let frame = self.framer.reverse_display(mode)?;
        self.send(&frame)
    }

    pub fn set_write_mode(&mut self, mode: WriteMode) -> Result<BusyWait, VfdError> {
        let frame = self.framer.write_mode(mode)?;
        self.send(&frame)
    }

    pub fn set_horizontal_scroll_speed(&mut self, speed: u8) -> Result<BusyWait, VfdError> {
        let frame = self.framer.horizontal_scroll_speed(speed)?;
        self.send(&frame)
    }

    pub fn set_font_set(&mut self, font: impl Into<u8>) -> Result<BusyWait, VfdError> {
        let frame = self.framer.font_set(font)?;
        self.send(&frame)
    }

    pub fn set_character_code(&mut self, code: impl Into<u8>) -> Result<BusyWait, VfdError> {
        let frame = self.framer.character_code(code)?;
        self.send(&frame)
    }

    pub fn set_character_spacing(&mut self, mode: u8) -> Result<BusyWait, VfdError> {
        let frame = self.framer.character_spacing(mode)?;
        self.send(&frame)
    }

    // Windows

    /// Select the window that receives text and images
    pub fn select_window(&mut self, window: u8) -> Result<BusyWait, VfdError> {
        let frame = self.framer.select_window(window)?;
        let outcome = self.send(&frame)?;
        self.selected = window;
        Ok(outcome)
    }

    /// Select a window and clear it
    pub fn clear_window(&mut self, window: u8) -> Result<BusyWait, VfdError> {
        let frame = self.framer.clear_window(window)?;
        let outcome = self.send(&frame)?;
        self.selected = window;
        Ok(outcome)
    }

    /// Define user window 1-4; `y` and `height` are in 8-dot rows
    pub fn define_user_window(
        &mut self,
        window: u8,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    ) -> Result<BusyWait, VfdError> {
        let frame = self.framer.define_window(window, x, y, width, height)?;
        let outcome = self.send(&frame)?;

        self.windows[window as usize - 1] = Some(Window {
            x,
            y,
            width,
            height,
        });
        debug!("window {} defined", window);
        Ok(outcome)
    }

    /// Delete user window 1-4, optionally clearing its contents first
    ///
    /// Both frames are built before either is sent.
    pub fn delete_user_window(&mut self, window: u8, clear: bool) -> Result<BusyWait, VfdError> {
        ensure_user_window(window)?;
        let clear_frame = if clear {
            Some(self.framer.clear_window(window)?)
        } else {
            None
        };
        let delete_frame = self.framer.delete_window(window)?;

        if let Some(frame) = clear_frame {
            self.send(&frame)?;
            self.selected = window;
        }
        let outcome = self.send(&delete_frame)?;

        self.windows[window as usize - 1] = None;
        if self.selected == window {
            self.selected = BASE_WINDOW;
        }
        debug!("window {} deleted", window);
        Ok(outcome)
    }

    /// Resize the base window (0 = 140 dots, 1 = 256 dots)
    pub fn define_base_window(&mut self, mode: u8) -> Result<BusyWait, VfdError> {
        let mut framer = self.framer;
        let frame = framer.base_window(mode)?;
        let outcome = self.send(&frame)?;
        self.framer = framer;
        Ok(outcome)
    }

    // Effects

    pub fn blink_display(
        &mut self,
        pattern: impl Into<u8>,
        normal_time: u8,
        blink_time: u8,
        repetition: u8,
    ) -> Result<BusyWait, VfdError> {
        let frame = self
            .framer
            .blink_display(pattern, normal_time, blink_time, repetition)?;
        self.send(&frame)
    }

    pub fn display_scroll(
        &mut self,
        shift_bytes: u16,
        repeat_count: u32,
        speed: u8,
    ) -> Result<BusyWait, VfdError> {
        let frame = self.framer.display_scroll(shift_bytes, repeat_count, speed)?;
        self.send(&frame)
    }

    pub fn screen_saver(&mut self, pattern: impl Into<u8>) -> Result<BusyWait, VfdError> {
        let frame = self.framer.screen_saver(pattern)?;
        self.send(&frame)
    }

    pub fn wait(&mut self, duration: u8) -> Result<BusyWait, VfdError> {
        let frame = self.framer.wait(duration)?;
        self.send(&frame)
    }

    // Images

    /// Send packed image bytes at the cursor; `height` is in dots
    pub fn realtime_image(
        &mut self,
        width: u16,
        height: u16,
        payload: &[u8],
    ) -> Result<BusyWait, VfdError> {
        let frame = self.framer.realtime_image(width, height, payload)?;
        self.send(&frame)
    }

    /// Pack a pixel buffer and send it as a realtime image
    pub fn draw<const W: usize, const H: usize>(
        &mut self,
        buffer: &PixelBuffer<W, H>,
    ) -> Result<BusyWait, VfdError> {
        let image = pack(buffer)?;
        self.realtime_image(image.width(), image.height(), image.as_bytes())
    }

    // Text and control codes

    /// Write text at the cursor
    ///
    /// The whole string is checked before anything is sent. Long text is
    /// split into frames of [`TEXT_CHUNK_CHARS`] characters.
    pub fn write_text(&mut self, text: &str) -> Result<BusyWait, VfdError> {
        self.framer.text(text)?;

        let mut outcome = BusyWait::Skipped;
        let mut rest = text;
        while !rest.is_empty() {
            let split = rest
                .char_indices()
                .nth(TEXT_CHUNK_CHARS)
                .map_or(rest.len(), |(i, _)| i);
            let (chunk, tail) = rest.split_at(split);

            let frame = self.framer.text(chunk)?;
            match self.send(&frame)? {
                BusyWait::TimedOut => outcome = BusyWait::TimedOut,
                wait if outcome != BusyWait::TimedOut => outcome = wait,
                _ => {}
            }
            rest = tail;
        }
        Ok(outcome)
    }

    /// Send raw character codes
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<BusyWait, VfdError> {
        let frame = self.framer.raw(bytes);
        self.send(&frame)
    }

    pub fn home(&mut self) -> Result<BusyWait, VfdError> {
        let frame = self.framer.home()?;
        self.send(&frame)
    }

    pub fn line_feed(&mut self) -> Result<BusyWait, VfdError> {
        let frame = self.framer.line_feed()?;
        self.send(&frame)
    }

    pub fn backspace(&mut self) -> Result<BusyWait, VfdError> {
        let frame = self.framer.backspace()?;
        self.send(&frame)
    }

    pub fn horizontal_tab(&mut self) -> Result<BusyWait, VfdError> {
        let frame = self.framer.horizontal_tab()?;
        self.send(&frame)
    }

    /// Carriage return, sent without waiting on SBUSY
    pub fn carriage_return(&mut self) -> Result<(), VfdError> {
        let frame = self.framer.carriage_return()?;
        self.transport.send_unchecked(&frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use phosphor_graphics::{draw_box, draw_lines, LineSpec};
    use phosphor_protocol::{CommandError, CursorAddressing};

    use crate::config::ConfigError;
    use crate::transport::tests::{BusyPin, LsbLink, MsbLink, StepClock};

    type TestVfd = Vfd<LsbLink, NoPin, NoPin, StepClock>;

    fn vfd() -> TestVfd {
        Vfd::new(
            Transport::new(LsbLink::new(), StepClock::default()),
            VfdConfig::default(),
        )
        .unwrap()
    }

    fn written(vfd: &TestVfd) -> &[u8] {
        &vfd.transport().link().written
    }

    /// Reset pin that records its level and when it changed
    struct ResetPin {
        levels: heapless::Vec<bool, 8>,
    }

    impl ErrorType for ResetPin {
        type Error = Infallible;
    }

    impl OutputPin for ResetPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            let _ = self.levels.push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            let _ = self.levels.push(true);
            Ok(())
        }
    }

    #[test]
    fn test_init_sequence() {
        let mut vfd = vfd();
        vfd.init().unwrap();
        assert_eq!(written(&vfd), &[0x1B, 0x40, 0x1F, 0x58, 0x04]);
    }

    #[test]
    fn test_init_applies_config() {
        let config = VfdConfig {
            luminance: 8,
            cursor_blink: Some(true),
            write_mode: Some(WriteMode::VerticalScroll),
            base_window: BaseWindowMode::Extended,
            ..VfdConfig::default()
        };
        let mut vfd = Vfd::new(
            Transport::new(LsbLink::new(), StepClock::default()),
            config,
        )
        .unwrap();
        vfd.init().unwrap();

        assert_eq!(
            written(&vfd),
            &[
                0x1B, 0x40, // init
                0x1F, 0x58, 0x08, // luminance
                0x1F, 0x43, 0x01, // blink
                0x1F, 0x02, // MD2
                0x1F, 0x28, 0x77, 0x10, 0x01, // extended base window
            ]
        );
        assert_eq!(vfd.framer().base_window_mode(), BaseWindowMode::Extended);
    }

    #[test]
    fn test_reset_pulse() {
        let reset = ResetPin {
            levels: heapless::Vec::new(),
        };
        let mut vfd = Vfd::with_reset(
            Transport::new(LsbLink::new(), StepClock::default()),
            reset,
            VfdConfig::default(),
        )
        .unwrap();
        vfd.init().unwrap();

        let (mut transport, reset) = vfd.release();
        assert_eq!(
            reset.map(|r| r.levels),
            Some(heapless::Vec::from_slice(&[true, false, true]).unwrap())
        );
        // Two 100 ms phases
        assert_eq!(transport.clock_mut().now, 200_000);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = VfdConfig {
            luminance: 0,
            ..VfdConfig::default()
        };
        let result = Vfd::new(Transport::new(LsbLink::new(), StepClock::default()), config);
        assert!(matches!(result, Err(VfdError::Config(_))));
    }

    #[test]
    fn test_zero_reset_pulse_rejected() {
        let config = VfdConfig {
            reset_pulse_ms: 0,
            ..VfdConfig::default()
        };
        let result = Vfd::with_reset(
            Transport::new(LsbLink::new(), StepClock::default()),
            NoPin,
            config,
        );
        assert!(matches!(
            result,
            Err(VfdError::Config(ConfigError::ResetPulseTooShort(0)))
        ));
    }

    #[test]
    fn test_busy_timeout_from_config() {
        let config = VfdConfig {
            busy_timeout_us: 50,
            ..VfdConfig::default()
        };
        let transport =
            Transport::with_busy(LsbLink::new(), BusyPin::busy_for(u32::MAX), StepClock::default());
        let mut vfd = Vfd::new(transport, config).unwrap();

        assert_eq!(vfd.home(), Ok(BusyWait::TimedOut));
        assert_eq!(vfd.transport().busy_timeouts(), 1);
    }

    #[test]
    fn test_invalid_parameters_send_nothing() {
        let mut vfd = vfd();

        assert_eq!(
            vfd.set_cursor_position(300, 0),
            Err(VfdError::Command(CommandError::InvalidParameter {
                name: "cursor_x",
                value: 300
            }))
        );
        assert!(vfd.define_user_window(5, 0, 0, 10, 1).is_err());
        assert!(vfd.set_luminance(9).is_err());
        assert!(vfd.write_text("ok→").is_err());
        assert!(vfd.delete_user_window(0, true).is_err());
        assert!(written(&vfd).is_empty());
    }

    #[test]
    fn test_window_tracking() {
        let mut vfd = vfd();

        vfd.define_user_window(1, 0, 2, 45, 2).unwrap();
        assert_eq!(
            vfd.window(1),
            Some(Window {
                x: 0,
                y: 2,
                width: 45,
                height: 2
            })
        );
        assert_eq!(vfd.window(2), None);
        assert_eq!(vfd.window(0), None);

        vfd.select_window(1).unwrap();
        assert_eq!(vfd.selected_window(), 1);

        vfd.delete_user_window(1, false).unwrap();
        assert_eq!(vfd.window(1), None);
        assert_eq!(vfd.selected_window(), BASE_WINDOW);
    }

    #[test]
    fn test_delete_with_clear_order() {
        let mut vfd = vfd();
        vfd.delete_user_window(3, true).unwrap();
        assert_eq!(
            written(&vfd),
            &[
                0x1F, 0x28, 0x77, 0x01, 3, 0x0C, // clear
                0x1F, 0x28, 0x77, 0x02, 3, 0x00, // delete
            ]
        );
    }

    #[test]
    fn test_base_window_widens_cursor_range() {
        let mut vfd = vfd();
        assert!(vfd.set_cursor_position(280, 0).is_err());
        vfd.define_base_window(1).unwrap();
        assert!(vfd.set_cursor_position(280, 0).is_ok());

        // A rejected mode leaves the framer alone
        assert!(vfd.define_base_window(2).is_err());
        assert_eq!(vfd.framer().base_window_mode(), BaseWindowMode::Extended);
    }

    #[test]
    fn test_dot_addressing_from_config() {
        let config = VfdConfig {
            addressing: CursorAddressing::Dots,
            ..VfdConfig::default()
        };
        let mut vfd = Vfd::new(
            Transport::new(LsbLink::new(), StepClock::default()),
            config,
        )
        .unwrap();
        assert!(vfd.set_cursor_position(0, 31).is_ok());
    }

    #[test]
    fn test_draw_all_ones() {
        let mut buffer = PixelBuffer::<16, 8>::new();
        buffer.fill(true);

        let mut vfd = vfd();
        vfd.draw(&buffer).unwrap();

        let bytes = written(&vfd);
        assert_eq!(&bytes[..9], &[0x1F, 0x28, 0x66, 0x11, 16, 0, 1, 0, 0x01]);
        assert_eq!(&bytes[9..], &[0xFF; 16]);
    }

    #[test]
    fn test_draw_scene() {
        let buffer = draw_box(PixelBuffer::<45, 8>::new(), 0, 0, 45, 8, 5, true);
        let buffer = draw_lines(buffer, &[LineSpec::new(0, 0, 0.0, 45)]);

        let mut vfd = vfd();
        vfd.draw(&buffer).unwrap();
        assert_eq!(written(&vfd).len(), 9 + 45);
    }

    #[test]
    fn test_draw_rejects_odd_height() {
        let mut vfd = vfd();
        let result = vfd.draw(&PixelBuffer::<8, 12>::new());
        assert_eq!(
            result,
            Err(VfdError::Command(CommandError::InvalidParameter {
                name: "image_height",
                value: 12
            }))
        );
        assert!(written(&vfd).is_empty());
    }

    #[test]
    fn test_long_text_is_chunked() {
        let mut vfd = vfd();
        let bytes = [b'7'; 130];
        let text = core::str::from_utf8(&bytes).unwrap();
        vfd.write_text(text).unwrap();

        assert_eq!(written(&vfd), text.as_bytes());
        // 130 chars: 64 + 64 + 2, each chunk in one link write
        assert_eq!(vfd.transport().link().writes, 2 + 2 + 1);
    }

    #[test]
    fn test_text_latin1() {
        let mut vfd = vfd();
        vfd.write_text("Ä").unwrap();
        assert_eq!(written(&vfd), &[0xC4]);
    }

    #[test]
    fn test_carriage_return_skips_busy() {
        let transport =
            Transport::with_busy(LsbLink::new(), BusyPin::busy_for(u32::MAX), StepClock::default());
        let mut vfd = Vfd::new(transport, VfdConfig::default()).unwrap();

        vfd.carriage_return().unwrap();
        assert_eq!(vfd.transport().busy_timeouts(), 0);
        assert_eq!(&vfd.transport().link().written[..], &[0x0D]);
    }

    #[test]
    fn test_spi_order_end_to_end() {
        let mut vfd = Vfd::new(
            Transport::new(MsbLink::new(), StepClock::default()),
            VfdConfig::default(),
        )
        .unwrap();
        vfd.set_luminance(8).unwrap();
        assert_eq!(&vfd.transport().link().written[..], &[0xF8, 0x1A, 0x10]);
    }
}
