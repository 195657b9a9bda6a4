//! Outbound panel events.
//!
//! The service emits these through the [`EventSink`] port; adapters
//! decide what to do with them. The production sink writes one
//! structured log line per event.
//!
//! [`EventSink`]: crate::panel::ports::EventSink

use crate::error::OutputError;
use crate::panel::state::{BrightnessLevel, ButtonId, SpotColor};

/// Structured events emitted by the panel core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelEvent {
    /// The service finished its startup output sync.
    Started { level: BrightnessLevel },
    /// A debounced press landed on this button.
    Pressed(ButtonId),
    /// The active spot color moved.
    ColorChanged {
        from: Option<SpotColor>,
        to: SpotColor,
    },
    /// The active brightness stop moved.
    LevelChanged {
        from: BrightnessLevel,
        to: BrightnessLevel,
    },
    /// An output device failed; the state mutation already committed.
    OutputFault(OutputError),
}
