//! Panel configuration parameters.
//!
//! Everything the core treats as data lives here: the screen layout, the
//! color palette, the brightness calibration table, and the loop timing.
//! Defaults reproduce the shipped panel exactly; a future provisioning
//! path can deserialize a replacement layout without touching code.
//!
//! Validation happens where the data is consumed — the button registry
//! and dispatcher reject a malformed config at startup (see
//! [`ConfigFault`](crate::error::ConfigFault)); nothing here is checked
//! lazily at runtime.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use serde::{Deserialize, Serialize};

use crate::panel::state::{rgb_from_hex, BrightnessLevel, SpotColor};
use smart_leds::RGB8;

/// Core panel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanelConfig {
    // --- LED ring ---
    /// Number of addressable pixels on the ring.
    pub ring_pixel_count: u16,

    // --- Brightness ---
    /// Brightness stop selected at boot (f-stops below full).
    pub default_level: u8,
    /// F-stops below full -> output fraction. Index 0 is full brightness.
    /// The shipped values are the original crew's estimates and are kept
    /// as data; only the mechanism (range, monotonic) is validated.
    pub calibration: [f32; BrightnessLevel::COUNT],

    // --- Timing ---
    /// Touch surface poll interval (milliseconds).
    pub poll_interval_ms: u32,

    // --- Appearance ---
    pub palette: Palette,
    pub layout: PanelLayout,

    // --- Audio ---
    /// Mount point holding the per-level cue files (`<dir>/<level>.wav`).
    pub sound_dir: heapless::String<64>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            ring_pixel_count: 60,
            default_level: 2,
            calibration: [1.0, 0.50, 0.25, 0.125, 0.0625],
            poll_interval_ms: 50,
            palette: Palette::default(),
            layout: PanelLayout::default(),
            sound_dir: default_sound_dir(),
        }
    }
}

fn default_sound_dir() -> heapless::String<64> {
    let mut dir = heapless::String::new();
    let _ = dir.push_str("/sounds");
    dir
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Hex colors (0xRRGGBB) for the five spot selections plus the screen
/// background. The ring and the on-screen button pads share these.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Palette {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
    pub white: u32,
    pub off: u32,
    pub background: u32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            red: 0xFF0000,
            green: 0x00FF00,
            blue: 0x0000FF,
            white: 0xFFFFFF,
            off: 0x000000,
            // Chosen to roughly match the brightness-scale artwork.
            background: 0x604470,
        }
    }
}

impl Palette {
    pub const fn hex(&self, color: SpotColor) -> u32 {
        match color {
            SpotColor::Red => self.red,
            SpotColor::Green => self.green,
            SpotColor::Blue => self.blue,
            SpotColor::White => self.white,
            SpotColor::Off => self.off,
        }
    }

    pub const fn rgb(&self, color: SpotColor) -> RGB8 {
        rgb_from_hex(self.hex(color))
    }

    pub const fn background_rgb(&self) -> RGB8 {
        rgb_from_hex(self.background)
    }
}

// ---------------------------------------------------------------------------
// Screen layout
// ---------------------------------------------------------------------------

/// One color-select button pad.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpotButton {
    pub color: SpotColor,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// One brightness-select button pad. `level` is validated against
/// [`BrightnessLevel`] when the registry is built.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelButton {
    pub level: u8,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl SpotButton {
    pub const fn region(&self) -> Rectangle {
        Rectangle::new(Point::new(self.x, self.y), Size::new(self.width, self.height))
    }
}

impl LevelButton {
    pub const fn region(&self) -> Rectangle {
        Rectangle::new(Point::new(self.x, self.y), Size::new(self.width, self.height))
    }

    const fn center_x(&self) -> i32 {
        self.x + self.width as i32 / 2
    }
}

/// Full screen geometry: button pads plus the brightness-scale pointer row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanelLayout {
    pub screen_width: u32,
    pub screen_height: u32,
    pub spot_buttons: [SpotButton; SpotColor::COUNT],
    pub level_buttons: [LevelButton; BrightnessLevel::COUNT],
    /// Top edge of the row the pointer triangle slides along.
    pub pointer_y: i32,
    /// Pointer triangle base width / height in pixels.
    pub pointer_width: u32,
    pub pointer_height: u32,
}

impl Default for PanelLayout {
    fn default() -> Self {
        const PAD: (u32, u32) = (60, 60);
        Self {
            screen_width: 320,
            screen_height: 240,
            spot_buttons: [
                spot(SpotColor::Red, 10, 10, PAD),
                spot(SpotColor::Green, 90, 10, PAD),
                spot(SpotColor::Blue, 170, 10, PAD),
                spot(SpotColor::White, 250, 10, PAD),
                spot(SpotColor::Off, 250, 170, PAD),
            ],
            // Dimmest stop on the left, full output on the right —
            // matching the printed scale artwork.
            level_buttons: [
                level(4, 10, 90, PAD),
                level(3, 70, 90, PAD),
                level(2, 130, 90, PAD),
                level(1, 190, 90, PAD),
                level(0, 250, 90, PAD),
            ],
            pointer_y: 152,
            pointer_width: 20,
            pointer_height: 15,
        }
    }
}

const fn spot(color: SpotColor, x: i32, y: i32, size: (u32, u32)) -> SpotButton {
    SpotButton {
        color,
        x,
        y,
        width: size.0,
        height: size.1,
    }
}

const fn level(level: u8, x: i32, y: i32, size: (u32, u32)) -> LevelButton {
    LevelButton {
        level,
        x,
        y,
        width: size.0,
        height: size.1,
    }
}

impl PanelLayout {
    /// Largest accepted screen dimension. The LCD window commands
    /// address pixels with 16-bit coordinates, and keeping every
    /// on-screen coordinate below this bound makes the i32 pixel math
    /// downstream overflow-free.
    pub const MAX_SCREEN_DIM: u32 = 0x7FFF;

    /// Reject a zero-sized or oversized screen before any region math.
    pub(crate) fn check_screen(&self) -> crate::error::Result<()> {
        for dim in [self.screen_width, self.screen_height] {
            if dim == 0 || dim > Self::MAX_SCREEN_DIM {
                return Err(crate::error::ConfigFault::ScreenOutOfRange(dim));
            }
        }
        Ok(())
    }

    /// Whether `region` sits fully on the declared screen. Widened to
    /// i64 so hostile coordinates cannot overflow the check itself.
    pub(crate) fn contains_region(&self, region: &Rectangle) -> bool {
        let Point { x, y } = region.top_left;
        x >= 0
            && y >= 0
            && i64::from(x) + i64::from(region.size.width) <= i64::from(self.screen_width)
            && i64::from(y) + i64::from(region.size.height) <= i64::from(self.screen_height)
    }

    /// Per-level pointer x positions: the triangle sits centred under the
    /// matching level button. Index = level.
    ///
    /// Fails on a bad screen, an out-of-range, duplicated, or off-screen
    /// level button; with five entries, five slots, and no duplicates,
    /// every slot is filled on success. Bounds are verified before the
    /// centring arithmetic so it stays in range.
    pub fn pointer_slots(&self) -> crate::error::Result<[i32; BrightnessLevel::COUNT]> {
        use crate::error::ConfigFault;
        use crate::panel::state::ButtonId;

        self.check_screen()?;
        let mut slots = [0i32; BrightnessLevel::COUNT];
        let mut seen = [false; BrightnessLevel::COUNT];
        for button in &self.level_buttons {
            let level = BrightnessLevel::new(button.level)
                .ok_or(ConfigFault::LevelOutOfRange(button.level))?;
            if seen[level.index()] {
                return Err(ConfigFault::DuplicateIdentity(ButtonId::Level(level)));
            }
            if !self.contains_region(&button.region()) {
                return Err(ConfigFault::OffScreenRegion(ButtonId::Level(level)));
            }
            seen[level.index()] = true;
            slots[level.index()] = button.center_x() - self.pointer_width as i32 / 2;
        }
        Ok(slots)
    }
}
