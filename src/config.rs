//! Per-line animation configuration.

use embassy_time::Duration;
use log::warn;

const DIRECTION_NAME_LEFT: &str = "left";
const DIRECTION_NAME_RIGHT: &str = "right";
const DIRECTION_NAME_BOTH_LR: &str = "both_lr";
const DIRECTION_NAME_BOTH_RL: &str = "both_rl";

/// Scroll direction for a line animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Scroll from start to end (window offset ascending).
    #[default]
    Left,
    /// Scroll from end to start (window offset descending).
    Right,
    /// Scroll left, then back right without repeating the turnaround frame.
    BothLr,
    /// Scroll right, then back left without repeating the turnaround frame.
    BothRl,
}

impl Direction {
    /// Get the wire/config name of this direction.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => DIRECTION_NAME_LEFT,
            Self::Right => DIRECTION_NAME_RIGHT,
            Self::BothLr => DIRECTION_NAME_BOTH_LR,
            Self::BothRl => DIRECTION_NAME_BOTH_RL,
        }
    }

    /// Parse a direction name.
    pub fn parse_from_str(name: &str) -> Option<Self> {
        match name {
            DIRECTION_NAME_LEFT => Some(Self::Left),
            DIRECTION_NAME_RIGHT => Some(Self::Right),
            DIRECTION_NAME_BOTH_LR => Some(Self::BothLr),
            DIRECTION_NAME_BOTH_RL => Some(Self::BothRl),
            _ => None,
        }
    }

    /// Parse a direction name, falling back to [`Direction::Left`] with a
    /// warning when the name is not recognized.
    pub fn parse_lenient(name: &str) -> Self {
        Self::parse_from_str(name).unwrap_or_else(|| {
            warn!("invalid scroll direction '{name}', using 'left'");
            Self::Left
        })
    }
}

/// Configuration for one display line within an animation run.
///
/// A run takes an ordered slice of these; lines with text no longer than the
/// display width are rendered once and finish immediately, longer texts
/// scroll according to the timing fields below.
#[derive(Debug, Clone, Copy)]
pub struct LineConfig<'a> {
    /// Text to display. Treated as a sequence of 8-bit character codes.
    pub text: &'a str,
    /// Target line number, 1-based.
    pub line: u8,
    /// Delay between window shifts while scrolling.
    pub scroll_delay: Duration,
    /// Delay before scrolling starts, after the initial frame is shown.
    pub start_delay: Duration,
    /// Delay between scroll phases (for the two-phase directions).
    pub phase_delay: Duration,
    /// Delay after a full scroll loop completes.
    pub end_delay: Duration,
    /// Scroll direction.
    pub direction: Direction,
    /// Number of full animation cycles. 0 means loop until timeout.
    pub loops: u32,
    /// Maximum animation duration for this line. Zero means no timeout.
    pub timeout: Duration,
}

impl<'a> LineConfig<'a> {
    /// Create a configuration with the default timing (200 ms scroll step,
    /// 500 ms start/phase/end delays, one loop, no timeout).
    pub const fn new(text: &'a str, line: u8) -> Self {
        Self {
            text,
            line,
            scroll_delay: Duration::from_millis(200),
            start_delay: Duration::from_millis(500),
            phase_delay: Duration::from_millis(500),
            end_delay: Duration::from_millis(500),
            direction: Direction::Left,
            loops: 1,
            timeout: Duration::from_ticks(0),
        }
    }

    /// Set the delay between window shifts.
    pub const fn scroll_delay(mut self, delay: Duration) -> Self {
        self.scroll_delay = delay;
        self
    }

    /// Set the delay before scrolling starts.
    pub const fn start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = delay;
        self
    }

    /// Set the delay between scroll phases.
    pub const fn phase_delay(mut self, delay: Duration) -> Self {
        self.phase_delay = delay;
        self
    }

    /// Set the delay after a completed loop.
    pub const fn end_delay(mut self, delay: Duration) -> Self {
        self.end_delay = delay;
        self
    }

    /// Set the scroll direction.
    pub const fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the loop count. 0 loops forever (until a timeout fires).
    pub const fn loops(mut self, loops: u32) -> Self {
        self.loops = loops;
        self
    }

    /// Set the per-line timeout. Zero disables it.
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
