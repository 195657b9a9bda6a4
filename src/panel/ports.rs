//! Port traits — the boundary between the panel core and the hardware.
//!
//! ```text
//!   TouchPort ──▶ ┌───────────────────────────┐ ──▶ RingPort
//!                 │        PanelService       │ ──▶ ScreenPort
//!                 │  sampler → dispatch → ... │ ──▶ AudioPort
//!                 └───────────────────────────┘ ──▶ EventSink
//! ```
//!
//! Adapters implement these traits; the service consumes them through
//! generics, so the core never touches a peripheral directly and the
//! whole loop runs against mocks on the host. Output methods return
//! typed errors, and none of them may block the touch loop — audio in
//! particular hands its cue off and returns.

use embedded_graphics::prelude::*;
use smart_leds::RGB8;

use crate::error::OutputError;
use crate::panel::dispatcher::SoundCue;
use crate::panel::events::PanelEvent;

/// Read side: one raw touch sample per call.
pub trait TouchPort {
    /// Current contact point, or `None` while the surface is untouched.
    fn read(&mut self) -> Option<Point>;
}

/// The addressable LED ring.
pub trait RingPort {
    /// Set every pixel to `color` at the current brightness.
    fn fill(&mut self, color: RGB8) -> Result<(), OutputError>;

    /// Rescale the ring output; the fill color is unaffected.
    fn set_brightness(&mut self, fraction: f32) -> Result<(), OutputError>;
}

/// The brightness-scale pointer on the panel LCD.
pub trait ScreenPort {
    /// Remove the previously drawn pointer, if any.
    fn clear_pointer(&mut self) -> Result<(), OutputError>;

    /// Draw the pointer at horizontal position `x`. A `None` fill means
    /// outline only.
    fn draw_pointer(&mut self, x: i32, fill: Option<RGB8>) -> Result<(), OutputError>;
}

/// One-shot audio feedback.
pub trait AudioPort {
    /// Start the cue and return; playback must not block the caller.
    fn play(&mut self, cue: SoundCue) -> Result<(), OutputError>;
}

/// Outbound channel for structured [`PanelEvent`]s.
pub trait EventSink {
    fn emit(&mut self, event: &PanelEvent);
}
