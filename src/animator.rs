//! Per-line animation state machine.
//!
//! A [`LineAnimator`] tracks one display line through its scroll loop:
//! start delay, frame advances, phase delays, end delay and loop counting.
//! It never sleeps itself; it reports the absolute time of its next action
//! and the scheduler wakes it when that time is due.

use embassy_time::Instant;
use log::error;

use crate::TextDisplay;
use crate::config::LineConfig;
use crate::plan::ScrollPlan;

/// Animation state of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    /// Initial frame shown, waiting out the start delay.
    AwaitingFirstScroll,
    /// Advancing through the current phase's frames.
    Scrolling,
    /// Phase exhausted, waiting out the phase delay before the next one.
    AwaitingPhaseDelay,
    /// All phases done, waiting out the end delay before loop accounting.
    AwaitingEndDelay,
    /// Terminal for this run.
    Finished,
}

/// State machine driving one line's scroll animation.
pub struct LineAnimator<'a> {
    config: LineConfig<'a>,
    plan: ScrollPlan,
    width: usize,
    state: LineState,
    next_action: Instant,
    deadline: Option<Instant>,
    current_loop: u32,
    phase_index: usize,
    frame_index: usize,
}

impl<'a> LineAnimator<'a> {
    /// Build the animator for a scrollable line and render its initial
    /// frame immediately.
    ///
    /// Returns `Ok(None)` when the computed plan has no scrollable phases;
    /// the line is then rendered statically and considered finished.
    pub fn start<D: TextDisplay>(
        config: LineConfig<'a>,
        now: Instant,
        display: &mut D,
    ) -> Result<Option<Self>, D::Error> {
        let width = display.width() as usize;
        let plan = ScrollPlan::compute(config.text.len(), width, config.direction);

        let Some(first_phase) = plan.first_non_empty_phase() else {
            error!(
                "no scrollable phases for '{}' on line {}, finished",
                config.text, config.line
            );
            display.render_line(truncated(config.text, width), config.line)?;
            return Ok(None);
        };

        let animator = Self {
            config,
            plan,
            width,
            state: LineState::AwaitingFirstScroll,
            next_action: now + config.start_delay,
            deadline: (config.timeout.as_ticks() > 0).then(|| now + config.timeout),
            current_loop: 0,
            phase_index: first_phase,
            // Offset 0 is rendered below, scrolling resumes at frame 1.
            frame_index: 1,
        };
        let first_frame = animator.frame_at_phase_start(first_phase);
        display.render_line(first_frame, config.line)?;
        Ok(Some(animator))
    }

    /// Target line number, 1-based.
    pub const fn line(&self) -> u8 {
        self.config.line
    }

    /// Current state.
    pub const fn state(&self) -> LineState {
        self.state
    }

    /// Whether this line has reached its terminal state.
    pub fn is_finished(&self) -> bool {
        self.state == LineState::Finished
    }

    /// Absolute time of the next due action.
    pub const fn next_action(&self) -> Instant {
        self.next_action
    }

    /// Absolute per-line deadline, if a timeout was configured.
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Render the static fallback frame and finish the line.
    ///
    /// Used on timeouts and on the defensive bookkeeping-fault path; also
    /// the normal exit once all loops are done.
    pub fn force_finish<D: TextDisplay>(&mut self, display: &mut D) -> Result<(), D::Error> {
        display.render_line(truncated(self.config.text, self.width), self.config.line)?;
        self.state = LineState::Finished;
        self.next_action = Instant::MAX;
        Ok(())
    }

    /// Run one state-machine step. Call only when `now >= next_action()`.
    pub fn step<D: TextDisplay>(
        &mut self,
        now: Instant,
        display: &mut D,
    ) -> Result<(), D::Error> {
        // The line's own deadline takes precedence over any transition.
        if self.deadline.is_some_and(|deadline| now >= deadline) {
            return self.force_finish(display);
        }

        match self.state {
            // Pure transitions: the frame render happens on the next tick,
            // in the Scrolling state.
            LineState::AwaitingFirstScroll | LineState::AwaitingPhaseDelay => {
                self.state = LineState::Scrolling;
                self.next_action = now;
                Ok(())
            }
            LineState::Scrolling => self.step_scrolling(now, display),
            LineState::AwaitingEndDelay => self.step_end_delay(now, display),
            LineState::Finished => Ok(()),
        }
    }

    fn step_scrolling<D: TextDisplay>(
        &mut self,
        now: Instant,
        display: &mut D,
    ) -> Result<(), D::Error> {
        let Some(offset) = self
            .plan
            .phase(self.phase_index)
            .and_then(|phase| phase.offset(self.frame_index))
        else {
            error!(
                "frame index {} out of bounds for phase {} on line {}, finished",
                self.frame_index, self.phase_index, self.config.line
            );
            return self.force_finish(display);
        };

        display.render_line(self.window(offset), self.config.line)?;
        self.frame_index += 1;

        let phase_len = self.plan.phase(self.phase_index).map_or(0, |p| p.len());
        if self.frame_index < phase_len {
            self.next_action = now + self.config.scroll_delay;
        } else if let Some(next_phase) = self.plan.next_non_empty_phase(self.phase_index + 1) {
            self.phase_index = next_phase;
            self.frame_index = 0;
            self.state = LineState::AwaitingPhaseDelay;
            self.next_action = now + self.config.phase_delay;
        } else {
            self.state = LineState::AwaitingEndDelay;
            self.next_action = now + self.config.end_delay;
        }
        Ok(())
    }

    fn step_end_delay<D: TextDisplay>(
        &mut self,
        now: Instant,
        display: &mut D,
    ) -> Result<(), D::Error> {
        // Loops count completed cycles, so the increment happens only after
        // the end delay has fully elapsed.
        self.current_loop += 1;

        let loops_done = self.config.loops != 0 && self.current_loop >= self.config.loops;
        let deadline_passed = self.deadline.is_some_and(|deadline| now >= deadline);
        if loops_done || deadline_passed {
            return self.force_finish(display);
        }

        let Some(first_phase) = self.plan.first_non_empty_phase() else {
            error!(
                "no non-empty phases for new loop on line {}, finished",
                self.config.line
            );
            return self.force_finish(display);
        };

        // The new loop's first frame shows before its start delay, the same
        // way the very first frame did at setup.
        self.phase_index = first_phase;
        let first_frame = self.frame_at_phase_start(first_phase);
        display.render_line(first_frame, self.config.line)?;
        self.frame_index = 1;
        self.state = LineState::AwaitingFirstScroll;
        self.next_action = now + self.config.start_delay;
        Ok(())
    }

    /// Visible window of the text starting at `offset`.
    fn window(&self, offset: usize) -> &'a str {
        let end = (offset + self.width).min(self.config.text.len());
        self.config.text.get(offset..end).unwrap_or(self.config.text)
    }

    fn frame_at_phase_start(&self, phase_index: usize) -> &'a str {
        let offset = self
            .plan
            .phase(phase_index)
            .and_then(|phase| phase.offset(0))
            .unwrap_or(0);
        self.window(offset)
    }
}

/// First `width` characters of `text`, the static fallback frame.
fn truncated(text: &str, width: usize) -> &str {
    text.get(..width.min(text.len())).unwrap_or(text)
}
