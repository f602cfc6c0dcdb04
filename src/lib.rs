#![no_std]

pub mod animator;
pub mod config;
pub mod driver;
pub mod plan;
pub mod scheduler;
pub mod text;

pub use config::{Direction, LineConfig};
pub use driver::Lcd;
pub use plan::{Phase, ScrollPlan};
pub use scheduler::{AnimationScheduler, TickResult};
pub use text::Align;

pub use embassy_time::{Duration, Instant};

/// Highest line number any supported HD44780 module exposes.
pub const MAX_ROWS: usize = 4;

/// Abstract character display trait
///
/// The animation scheduler is generic over this trait; it only ever asks the
/// display to paint one full line at a time. [`Lcd`] implements it for real
/// hardware, tests implement it with a recording mock.
pub trait TextDisplay {
    /// Bus or device error; any failure aborts the whole animation run.
    type Error;

    /// Number of columns on the display.
    fn width(&self) -> u8;

    /// Number of rows on the display.
    fn rows(&self) -> u8;

    /// Write `frame` to the given 1-based line, padded to the full width.
    fn render_line(&mut self, frame: &str, line: u8) -> Result<(), Self::Error>;

    /// Overwrite the given 1-based line with blanks.
    fn clear_line(&mut self, line: u8) -> Result<(), Self::Error>;
}
