//! Multi-line animation scheduling.
//!
//! Drives an arbitrary set of [`LineAnimator`]s on a single timeline without
//! async/await or threads. `tick` performs one scheduling pass and returns
//! how long the caller should wait; the caller owns the suspension point.

use embassy_time::{Duration, Instant};
use heapless::Vec;
use log::warn;

use crate::TextDisplay;
use crate::animator::LineAnimator;
use crate::config::LineConfig;

/// Smallest sleep the scheduler will ever request, to avoid zero-length
/// waits when a deadline is only fractionally in the future.
pub const MIN_SLEEP: Duration = Duration::from_millis(1);

/// Result of one scheduling pass.
#[derive(Debug, Clone, Copy)]
pub struct TickResult {
    /// How long to wait before the next `tick` call. Zero when an action is
    /// already due (a pending pure state transition).
    pub sleep_duration: Duration,
    /// Whether every line has finished; no further ticks are needed.
    pub finished: bool,
}

impl TickResult {
    const fn finished() -> Self {
        Self {
            sleep_duration: Duration::from_ticks(0),
            finished: true,
        }
    }
}

/// Cooperative scheduler for concurrent line animations.
///
/// `MAX_LINES` bounds the number of simultaneously animated lines; the
/// display row count (at most [`crate::MAX_ROWS`]) is a natural choice.
///
/// All animation state lives inside one scheduler value and is discarded
/// when the run completes; a scheduler is not reusable across runs.
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = AnimationScheduler::<2>::new(&configs, &mut lcd, Instant::now())?;
/// scheduler.run(&mut lcd)?;
/// ```
///
/// or, driving the clock manually:
///
/// ```ignore
/// loop {
///     let result = scheduler.tick(Instant::now(), &mut lcd)?;
///     if result.finished {
///         break;
///     }
///     sleep(result.sleep_duration);
/// }
/// ```
pub struct AnimationScheduler<'a, const MAX_LINES: usize> {
    animators: Vec<LineAnimator<'a>, MAX_LINES>,
    overall_deadline: Option<Instant>,
}

impl<'a, const MAX_LINES: usize> AnimationScheduler<'a, MAX_LINES> {
    /// Validate the configurations, render every line's initial frame and
    /// register the scrollable ones for scheduling.
    ///
    /// Lines with invalid numbers are skipped with a warning. Lines whose
    /// text fits the display are rendered once, statically, and never enter
    /// the schedule. Dispatch order within a tick follows the order of
    /// `configs`.
    pub fn new<D: TextDisplay>(
        configs: &[LineConfig<'a>],
        display: &mut D,
        now: Instant,
    ) -> Result<Self, D::Error> {
        let rows = display.rows();
        let width = display.width() as usize;
        let mut animators: Vec<LineAnimator<'a>, MAX_LINES> = Vec::new();
        let mut overall_deadline: Option<Instant> = None;

        for config in configs {
            if config.line == 0 || config.line > rows {
                warn!(
                    "invalid line number {} for {rows}-row display, skipping",
                    config.line
                );
                continue;
            }
            if animators.iter().any(|a| a.line() == config.line) {
                warn!("line {} configured twice, skipping duplicate", config.line);
                continue;
            }

            display.clear_line(config.line)?;

            // Short text needs no scrolling: render once and finish.
            if config.text.len() <= width {
                display.render_line(config.text, config.line)?;
                continue;
            }

            if animators.is_full() {
                warn!(
                    "more than {MAX_LINES} scrollable lines configured, skipping line {}",
                    config.line
                );
                continue;
            }

            let Some(animator) = LineAnimator::start(*config, now, display)? else {
                continue;
            };
            if let Some(deadline) = animator.deadline() {
                overall_deadline = Some(overall_deadline.map_or(deadline, |d| d.min(deadline)));
            }
            // Capacity checked above.
            let _ = animators.push(animator);
        }

        Ok(Self {
            animators,
            overall_deadline,
        })
    }

    /// Impose an explicit overall deadline on the whole run; the earliest of
    /// this and the per-line deadlines wins.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.overall_deadline = Some(self.overall_deadline.map_or(deadline, |d| d.min(deadline)));
        self
    }

    /// Number of lines still animating.
    pub fn active_lines(&self) -> usize {
        self.animators.len()
    }

    /// Run one scheduling pass.
    ///
    /// 1. If the overall deadline has passed, every remaining line renders
    ///    its static fallback and the run ends.
    /// 2. Every line whose next action is due runs one state-machine step,
    ///    in configuration order.
    /// 3. The earliest next action across the remaining lines determines
    ///    the returned sleep duration.
    pub fn tick<D: TextDisplay>(
        &mut self,
        now: Instant,
        display: &mut D,
    ) -> Result<TickResult, D::Error> {
        if self.animators.is_empty() {
            return Ok(TickResult::finished());
        }

        if self.overall_deadline.is_some_and(|deadline| now >= deadline) {
            for animator in &mut self.animators {
                animator.force_finish(display)?;
            }
            self.animators.clear();
            return Ok(TickResult::finished());
        }

        for animator in &mut self.animators {
            if now >= animator.next_action() {
                animator.step(now, display)?;
            }
        }
        self.animators.retain(|animator| !animator.is_finished());

        let Some(next_wake) = self.animators.iter().map(LineAnimator::next_action).min() else {
            return Ok(TickResult::finished());
        };

        let sleep_duration = if next_wake > now {
            (next_wake - now).max(MIN_SLEEP)
        } else {
            Duration::from_ticks(0)
        };
        Ok(TickResult {
            sleep_duration,
            finished: false,
        })
    }

    /// Drive `tick` against the real clock until every line has finished.
    ///
    /// This is the blocking entry point; it suspends between passes with
    /// [`embassy_time::block_for`]. Display errors abort the run.
    pub fn run<D: TextDisplay>(&mut self, display: &mut D) -> Result<(), D::Error> {
        loop {
            let result = self.tick(Instant::now(), display)?;
            if result.finished {
                return Ok(());
            }
            if result.sleep_duration.as_ticks() > 0 {
                embassy_time::block_for(result.sleep_duration);
            }
        }
    }
}
