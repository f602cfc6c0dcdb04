//! Scroll plan computation.
//!
//! A plan describes, for one line, the ordered phases of a scroll loop and
//! the window offsets each phase steps through. Phases are stored as range
//! descriptors instead of materialized offset lists, so a plan is a few
//! words regardless of text length.

use heapless::Vec;

use crate::config::Direction;

/// One directional sweep of window offsets within a scroll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    first: usize,
    len: usize,
    ascending: bool,
}

impl Phase {
    const fn ascending(first: usize, len: usize) -> Self {
        Self {
            first,
            len,
            ascending: true,
        }
    }

    const fn descending(first: usize, len: usize) -> Self {
        Self {
            first,
            len,
            ascending: false,
        }
    }

    /// Number of frames in this phase.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether this phase contributes no frames at all.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Window offset of the `index`-th frame, or `None` past the end.
    pub fn offset(&self, index: usize) -> Option<usize> {
        if index >= self.len {
            return None;
        }
        if self.ascending {
            Some(self.first + index)
        } else {
            Some(self.first - index)
        }
    }
}

/// The full sequence of phases for one line's scroll loop.
///
/// Only meaningful for text longer than the display width; callers handle
/// the short-text case by rendering statically.
#[derive(Debug, Clone)]
pub struct ScrollPlan {
    phases: Vec<Phase, 2>,
    shifts: usize,
}

impl ScrollPlan {
    /// Compute the plan for text of `text_len` characters on a display
    /// `width` columns wide. Requires `text_len > width`.
    pub fn compute(text_len: usize, width: usize, direction: Direction) -> Self {
        let shifts = text_len.saturating_sub(width);
        let mut phases: Vec<Phase, 2> = Vec::new();

        // Capacity is exactly the maximum phase count, pushes cannot fail.
        let _ = match direction {
            Direction::Left => phases.push(Phase::ascending(0, shifts + 1)),
            Direction::Right => phases.push(Phase::descending(shifts, shifts + 1)),
            Direction::BothLr => {
                // Return sweep skips the turnaround offset already shown.
                let _ = phases.push(Phase::ascending(0, shifts + 1));
                phases.push(Phase::descending(shifts.saturating_sub(1), shifts))
            }
            Direction::BothRl => {
                let _ = phases.push(Phase::descending(shifts, shifts + 1));
                phases.push(Phase::ascending(1, shifts))
            }
        };

        Self { phases, shifts }
    }

    /// Number of distinct window offsets beyond the first.
    pub const fn shifts(&self) -> usize {
        self.shifts
    }

    /// Phase at `index`, if it exists.
    pub fn phase(&self, index: usize) -> Option<&Phase> {
        self.phases.get(index)
    }

    /// Index of the first non-empty phase, scanning from `start`.
    pub fn next_non_empty_phase(&self, start: usize) -> Option<usize> {
        self.phases
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, phase)| !phase.is_empty())
            .map(|(index, _)| index)
    }

    /// Index of the first non-empty phase, or `None` for a degenerate plan.
    pub fn first_non_empty_phase(&self) -> Option<usize> {
        self.next_non_empty_phase(0)
    }
}
