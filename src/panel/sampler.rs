//! Touch debounce — raw samples in, at most one logical press out.
//!
//! The touch surface reports a point on every poll for as long as a
//! finger stays down. A two-state latch turns that stream into discrete
//! activations: the first sample of a contact is hit-tested and
//! (possibly) reported, then everything is swallowed until the surface
//! reads empty again. Holding a pad can never repeat-fire, and a finger
//! that lands off-pad and slides onto one never fires at all.

use embedded_graphics::prelude::*;

use crate::panel::registry::ButtonRegistry;
use crate::panel::state::ButtonId;

/// Debounce latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatchState {
    /// Surface was last seen empty; the next contact may fire.
    Armed,
    /// A contact has been consumed (matched or not); ignore samples
    /// until a no-touch poll re-arms the latch.
    WaitingForRelease,
}

/// One debounced activation, as opposed to a raw surface sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalPress {
    pub button: ButtonId,
}

/// Converts the polled sample stream into logical presses.
#[derive(Debug)]
pub struct InputSampler {
    latch: LatchState,
}

impl InputSampler {
    pub fn new() -> Self {
        Self {
            latch: LatchState::Armed,
        }
    }

    pub fn latch(&self) -> LatchState {
        self.latch
    }

    /// Feed one raw sample. Returns a press only on the first sample of
    /// a contact, and only when that sample lands on a button.
    pub fn poll(
        &mut self,
        touch: Option<Point>,
        registry: &ButtonRegistry,
    ) -> Option<LogicalPress> {
        match (self.latch, touch) {
            (LatchState::Armed, Some(point)) => {
                // Latch unconditionally: hit testing happens once, here.
                self.latch = LatchState::WaitingForRelease;
                registry
                    .hit_test(point)
                    .map(|button| LogicalPress { button })
            }
            (LatchState::WaitingForRelease, None) => {
                self.latch = LatchState::Armed;
                None
            }
            _ => None,
        }
    }
}

impl Default for InputSampler {
    fn default() -> Self {
        Self::new()
    }
}
