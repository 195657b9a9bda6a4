//! Hardware adapter — bridges real peripherals to the panel port traits.
//!
//! Owns the touchscreen, LED ring, display, and audio drivers, exposing
//! them through [`TouchPort`], [`RingPort`], [`ScreenPort`], and
//! [`AudioPort`].  This is the only module in the system that touches
//! actual hardware.  On non-espidf targets, the underlying drivers use
//! cfg-gated simulation stubs.

use embedded_graphics::prelude::Point;
use smart_leds::RGB8;

use crate::config::PanelConfig;
use crate::drivers::audio::AudioPlayer;
use crate::drivers::display::Display;
use crate::drivers::lightring::LightRing;
use crate::drivers::touchscreen::Touchscreen;
use crate::error::OutputError;
use crate::panel::dispatcher::SoundCue;
use crate::panel::ports::{AudioPort, RingPort, ScreenPort, TouchPort};

/// Concrete adapter that combines all panel hardware behind port traits.
pub struct PanelIo {
    touch: Touchscreen,
    ring: LightRing,
    display: Display,
    audio: AudioPlayer,
}

impl PanelIo {
    pub fn new(config: &PanelConfig) -> Self {
        // Touch maps raw ADC counts into the layout's coordinate space,
        // so hit regions and touch samples always agree. Casts stay in
        // range: the startup gate bounds both dimensions.
        let layout = &config.layout;
        Self {
            touch: Touchscreen::new(layout.screen_width as i32, layout.screen_height as i32),
            ring: LightRing::new(usize::from(config.ring_pixel_count)),
            display: Display::new(config),
            audio: AudioPlayer::new(config.sound_dir.clone()),
        }
    }

    /// Display bring-up: controller init plus the static button layout.
    /// Runs after `hw_init::init_peripherals`.
    pub fn init_display(&mut self, config: &PanelConfig) -> Result<(), OutputError> {
        self.display.init(config)
    }
}

// ── TouchPort implementation ──────────────────────────────────

impl TouchPort for PanelIo {
    fn read(&mut self) -> Option<Point> {
        self.touch.read_point()
    }
}

// ── RingPort implementation ───────────────────────────────────

impl RingPort for PanelIo {
    fn fill(&mut self, color: RGB8) -> Result<(), OutputError> {
        self.ring.fill(color)
    }

    fn set_brightness(&mut self, scale: f32) -> Result<(), OutputError> {
        self.ring.set_brightness(scale)
    }
}

// ── ScreenPort implementation ─────────────────────────────────

impl ScreenPort for PanelIo {
    fn clear_pointer(&mut self) -> Result<(), OutputError> {
        self.display.clear_pointer()
    }

    fn draw_pointer(&mut self, x: i32, fill: Option<RGB8>) -> Result<(), OutputError> {
        self.display.draw_pointer(x, fill)
    }
}

// ── AudioPort implementation ──────────────────────────────────

impl AudioPort for PanelIo {
    fn play(&mut self, cue: SoundCue) -> Result<(), OutputError> {
        self.audio.play(cue.level().index() as u8)
    }
}
