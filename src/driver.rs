//! HD44780 character LCD driver behind a PCF8574 I2C expander.
//!
//! The controller runs in 4-bit mode: every byte goes out as two nibbles,
//! each latched by pulsing the enable pin, with the backlight bit OR'd into
//! every transfer. Timing and the initialization sequence follow the
//! HD44780 datasheet requirements for 4-bit operation.

use embassy_time::Instant;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::warn;

use crate::config::LineConfig;
use crate::scheduler::AnimationScheduler;
use crate::text::{Align, split_for_width};
use crate::{MAX_ROWS, TextDisplay};

const RS_BIT: u8 = 0b0000_0001;
const ENABLE_BIT: u8 = 0b0000_0100;
const BACKLIGHT_BIT: u8 = 0b0000_1000;

const CLEAR_DISPLAY: u8 = 0x01;
const ENTRY_MODE_SET: u8 = 0x04;
const DISPLAY_CONTROL: u8 = 0x08;
const FUNCTION_SET: u8 = 0x20;
const SET_DDRAM_ADDR: u8 = 0x80;

// DL=0 (4-bit), N=1 (2-line base addressing), F=0 (5x8 font)
const FUNCTION_SET_4BIT_2LINE_5X8: u8 = FUNCTION_SET | 0x08;
// ID=1 (increment cursor), S=0 (no display shift)
const ENTRY_MODE_INCREMENT_NO_SHIFT: u8 = ENTRY_MODE_SET | 0x02;
const DISPLAY_ON: u8 = 0x04;
const CURSOR_ON: u8 = 0x02;
const BLINK_ON: u8 = 0x01;

// Magic two-step handshake that forces the controller into 4-bit mode.
const INIT_4BIT_PART1: u8 = 0x33;
const INIT_4BIT_PART2: u8 = 0x32;

/// DDRAM set-address commands for lines 1 through 4.
const LINE_ADDRESSES: [u8; MAX_ROWS] = [0x80, 0xC0, 0x94, 0xD4];

/// Settle time between enable-pin edges.
const PULSE_DELAY_US: u32 = 500;
/// Clearing the display takes the controller longer than other commands.
const CLEAR_DELAY_US: u32 = 1000;

/// Driver for an HD44780-compatible LCD on a PCF8574 I2C backpack.
///
/// Built in two steps: configure with the builder methods, then [`init`]
/// runs the 4-bit initialization sequence and returns the ready driver.
///
/// ```ignore
/// let mut lcd = Lcd::new(i2c, delay)
///     .address(0x27)
///     .geometry(16, 2)
///     .init()?;
/// lcd.text("hello", 1, Align::Center)?;
/// ```
///
/// [`init`]: Lcd::init
pub struct Lcd<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    width: u8,
    rows: u8,
    backlight: bool,
    cursor_on: bool,
    cursor_blink: bool,
    clear_on_init: bool,
}

impl<I2C, D> Lcd<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create an unconfigured driver. Defaults: address 0x27, 16x2,
    /// backlight on, cursor and blink off, clear on init.
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self {
            i2c,
            delay,
            address: 0x27,
            width: 16,
            rows: 2,
            backlight: true,
            cursor_on: false,
            cursor_blink: false,
            clear_on_init: true,
        }
    }

    /// Set the I2C address of the backpack.
    pub const fn address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Set the display geometry: columns and rows (rows capped at 4).
    pub fn geometry(mut self, width: u8, rows: u8) -> Self {
        self.width = width;
        self.rows = rows.min(MAX_ROWS as u8);
        self
    }

    /// Set the initial backlight state.
    pub const fn backlight(mut self, on: bool) -> Self {
        self.backlight = on;
        self
    }

    /// Show the cursor.
    pub const fn cursor_on(mut self, on: bool) -> Self {
        self.cursor_on = on;
        self
    }

    /// Blink the cursor.
    pub const fn cursor_blink(mut self, blink: bool) -> Self {
        self.cursor_blink = blink;
        self
    }

    /// Skip the clear during initialization.
    pub const fn clear_on_init(mut self, clear: bool) -> Self {
        self.clear_on_init = clear;
        self
    }

    /// Run the 4-bit initialization sequence and return the ready driver.
    pub fn init(mut self) -> Result<Self, I2C::Error> {
        self.command(INIT_4BIT_PART1)?;
        self.command(INIT_4BIT_PART2)?;
        self.command(FUNCTION_SET_4BIT_2LINE_5X8)?;
        self.command(ENTRY_MODE_INCREMENT_NO_SHIFT)?;
        let control = self.display_control();
        self.command(control)?;
        if self.clear_on_init {
            self.clear()?;
        }
        Ok(self)
    }

    /// Current backlight state.
    pub const fn backlight_on(&self) -> bool {
        self.backlight
    }

    /// Switch the backlight.
    ///
    /// The PCF8574 pins only change when a byte goes over the bus, so this
    /// re-sends the display control command to latch the new state.
    pub fn set_backlight(&mut self, on: bool) -> Result<(), I2C::Error> {
        self.backlight = on;
        let control = self.display_control();
        self.command(control)
    }

    /// Clear the whole display and return the cursor home.
    pub fn clear(&mut self) -> Result<(), I2C::Error> {
        self.command(CLEAR_DISPLAY)?;
        self.delay.delay_us(CLEAR_DELAY_US);
        Ok(())
    }

    /// Blank one line and leave the cursor at its start.
    ///
    /// Invalid line numbers are reported and ignored.
    pub fn clear_line(&mut self, line: u8) -> Result<(), I2C::Error> {
        let Some(address) = line_address(line, self.rows) else {
            warn!(
                "invalid line number {line} for {}-row display, cannot clear line",
                self.rows
            );
            return Ok(());
        };
        self.command(address)?;
        for _ in 0..self.width {
            self.write_data(b' ')?;
        }
        self.command(address)
    }

    /// Write text starting at the given 1-based line, wrapping word-aware
    /// onto following lines while both text and lines remain.
    ///
    /// Each written line is padded to the full width, overwriting previous
    /// content. An invalid starting line falls back to line 1.
    pub fn text(&mut self, text: &str, line: u8, align: Align) -> Result<(), I2C::Error> {
        let mut current_line = if line_address(line, self.rows).is_some() {
            line
        } else {
            1
        };
        let mut rest = text;
        loop {
            let (chunk, remaining) = split_for_width(rest, self.width as usize);
            self.write_aligned(chunk, current_line, align)?;
            if remaining.is_empty() || current_line >= self.rows {
                return Ok(());
            }
            current_line += 1;
            rest = remaining;
        }
    }

    /// Scroll a single line according to `config`, blocking until done.
    pub fn scroll_text(&mut self, config: LineConfig<'_>) -> Result<(), I2C::Error> {
        self.animated_display(&[config])
    }

    /// Animate multiple lines concurrently, blocking until every line has
    /// finished or timed out.
    pub fn animated_display(&mut self, configs: &[LineConfig<'_>]) -> Result<(), I2C::Error> {
        let mut scheduler = AnimationScheduler::<MAX_ROWS>::new(configs, self, Instant::now())?;
        scheduler.run(self)
    }

    /// Release the underlying bus and delay provider.
    pub fn free(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    const fn display_control(&self) -> u8 {
        let mut control = DISPLAY_CONTROL | DISPLAY_ON;
        if self.cursor_on {
            control |= CURSOR_ON;
        }
        if self.cursor_blink {
            control |= BLINK_ON;
        }
        control
    }

    fn write_aligned(&mut self, chunk: &str, line: u8, align: Align) -> Result<(), I2C::Error> {
        let Some(address) = line_address(line, self.rows) else {
            return Ok(());
        };
        self.command(address)?;

        let width = self.width as usize;
        let bytes = chunk.as_bytes();
        let visible = bytes.len().min(width);
        let (leading, trailing) = align.padding(visible, width);

        for _ in 0..leading {
            self.write_data(b' ')?;
        }
        for &byte in &bytes[..visible] {
            self.write_data(byte)?;
        }
        for _ in 0..trailing {
            self.write_data(b' ')?;
        }
        Ok(())
    }

    fn command(&mut self, byte: u8) -> Result<(), I2C::Error> {
        self.send(byte, 0)
    }

    fn write_data(&mut self, byte: u8) -> Result<(), I2C::Error> {
        self.send(byte, RS_BIT)
    }

    /// Send one byte as two nibbles over the 4-bit interface.
    fn send(&mut self, byte: u8, mode: u8) -> Result<(), I2C::Error> {
        let backlight = if self.backlight { BACKLIGHT_BIT } else { 0 };
        self.strobe(mode | (byte & 0xF0) | backlight)?;
        self.strobe(mode | (byte << 4) | backlight)
    }

    /// Latch one expander byte by pulsing the enable pin.
    fn strobe(&mut self, byte: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, &[byte])?;
        self.i2c.write(self.address, &[byte | ENABLE_BIT])?;
        self.delay.delay_us(PULSE_DELAY_US);
        self.i2c.write(self.address, &[byte & !ENABLE_BIT])?;
        self.delay.delay_us(PULSE_DELAY_US);
        Ok(())
    }
}

impl<I2C, D> TextDisplay for Lcd<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type Error = I2C::Error;

    fn width(&self) -> u8 {
        self.width
    }

    fn rows(&self) -> u8 {
        self.rows
    }

    fn render_line(&mut self, frame: &str, line: u8) -> Result<(), Self::Error> {
        self.write_aligned(frame, line, Align::Left)
    }

    fn clear_line(&mut self, line: u8) -> Result<(), Self::Error> {
        Lcd::clear_line(self, line)
    }
}

/// Set-DDRAM-address command for a 1-based line, `None` when the line is
/// outside the display.
fn line_address(line: u8, rows: u8) -> Option<u8> {
    if line == 0 || line > rows {
        return None;
    }
    LINE_ADDRESSES
        .get(line as usize - 1)
        .map(|&address| SET_DDRAM_ADDR | address)
}
