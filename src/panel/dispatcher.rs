//! Press-to-action dispatch.
//!
//! The dispatcher is the only writer of [`DeviceState`]. Each press
//! mutates exactly one field and yields the batch of output effects
//! needed to bring the ring, the pointer, and the speaker in line with
//! the new state. The batch is data, not I/O — the renderer drives it
//! into the ports afterwards, so dispatch itself cannot fail.

use smart_leds::RGB8;

use crate::config::Palette;
use crate::panel::sampler::LogicalPress;
use crate::panel::state::{BrightnessLevel, ButtonId, CalibrationTable, DeviceState};

/// Audio cue request, keyed by the brightness stop that triggered it.
/// The audio adapter owns the cue-to-file mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundCue(BrightnessLevel);

impl SoundCue {
    pub const fn for_level(level: BrightnessLevel) -> Self {
        Self(level)
    }

    pub const fn level(self) -> BrightnessLevel {
        self.0
    }
}

/// One queued output mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SideEffect {
    /// Set every ring pixel to this color.
    RingFill(RGB8),
    /// Rescale the ring output; the fill color is unaffected.
    RingBrightness(f32),
    /// Erase the previous pointer and draw it at `x` with `fill`
    /// (`None` = outline only, no color chosen yet).
    RepaintPointer { x: i32, fill: Option<RGB8> },
    /// Fire one audio cue.
    PlayCue(SoundCue),
}

/// The largest batch is a level press: brightness, pointer, cue.
pub const EFFECT_CAP: usize = 4;

/// Side-effect batch produced by one dispatch.
pub type SideEffects = heapless::Vec<SideEffect, EFFECT_CAP>;

/// Routes logical presses into state mutations and output effects.
#[derive(Debug)]
pub struct Dispatcher {
    palette: Palette,
    table: CalibrationTable,
    /// Pointer x position per stop index.
    pointer_slots: [i32; BrightnessLevel::COUNT],
}

impl Dispatcher {
    pub fn new(
        palette: Palette,
        table: CalibrationTable,
        pointer_slots: [i32; BrightnessLevel::COUNT],
    ) -> Self {
        Self {
            palette,
            table,
            pointer_slots,
        }
    }

    /// Output sync for a freshly booted panel: ring dark but preset to
    /// the default stop, pointer parked there with no fill.
    pub fn startup(&self, state: DeviceState) -> SideEffects {
        let mut effects = SideEffects::new();
        push(
            &mut effects,
            SideEffect::RingBrightness(self.table.fraction(state.level())),
        );
        push(&mut effects, SideEffect::RingFill(RGB8::new(0, 0, 0)));
        push(&mut effects, self.pointer_effect(state));
        effects
    }

    /// Apply one press to the state and produce the matching effects.
    pub fn dispatch(&self, press: LogicalPress, state: &mut DeviceState) -> SideEffects {
        let mut effects = SideEffects::new();
        match press.button {
            ButtonId::Spot(color) => {
                state.set_color(color);
                push(&mut effects, SideEffect::RingFill(self.palette.rgb(color)));
                // Brightness and pointer position stay put; only the
                // pointer fill tracks the new color.
                push(&mut effects, self.pointer_effect(*state));
            }
            ButtonId::Level(level) => {
                state.set_level(level);
                push(
                    &mut effects,
                    SideEffect::RingBrightness(self.table.fraction(level)),
                );
                push(&mut effects, self.pointer_effect(*state));
                push(&mut effects, SideEffect::PlayCue(SoundCue::for_level(level)));
            }
        }
        effects
    }

    fn pointer_effect(&self, state: DeviceState) -> SideEffect {
        SideEffect::RepaintPointer {
            x: self.pointer_slots[state.level().index()],
            fill: state.active_color().map(|color| self.palette.rgb(color)),
        }
    }
}

/// The batch capacity covers the largest dispatch; a push cannot fail.
fn push(effects: &mut SideEffects, effect: SideEffect) {
    let _ = effects.push(effect);
}
