//! Side-effect application — the write half of the reconciliation loop.

use log::warn;

use crate::panel::dispatcher::{SideEffect, SideEffects};
use crate::panel::events::PanelEvent;
use crate::panel::ports::{AudioPort, EventSink, RingPort, ScreenPort};

/// Drive every queued side effect into the output ports.
///
/// Output faults are logged and reported through the sink but never
/// stop the batch: the state mutation behind these effects has already
/// committed, and the remaining outputs should still converge on it.
pub fn apply(
    effects: &SideEffects,
    io: &mut (impl RingPort + ScreenPort + AudioPort),
    sink: &mut impl EventSink,
) {
    for effect in effects {
        let outcome = match *effect {
            SideEffect::RingFill(color) => io.fill(color),
            SideEffect::RingBrightness(fraction) => io.set_brightness(fraction),
            // Stale geometry comes off before the new pointer lands; a
            // failed clear also skips the draw so shapes never stack.
            SideEffect::RepaintPointer { x, fill } => {
                io.clear_pointer().and_then(|()| io.draw_pointer(x, fill))
            }
            SideEffect::PlayCue(cue) => io.play(cue),
        };
        if let Err(fault) = outcome {
            warn!("output fault, continuing: {}", fault);
            sink.emit(&PanelEvent::OutputFault(fault));
        }
    }
}
