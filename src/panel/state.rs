//! Core panel data model: colors, brightness levels, calibration, and the
//! device state the whole loop revolves around.
//!
//! Everything here is plain data with total lookup functions. The only
//! mutation points are the two crate-private setters on [`DeviceState`],
//! called exclusively by the dispatcher — there are no module-level
//! globals anywhere in the firmware.

use core::fmt;

use serde::{Deserialize, Serialize};
use smart_leds::RGB8;

use crate::error::{ConfigFault, Result};

/// Convert a `0xRRGGBB` hex value into an [`RGB8`] pixel.
pub const fn rgb_from_hex(hex: u32) -> RGB8 {
    RGB8 {
        r: ((hex >> 16) & 0xFF) as u8,
        g: ((hex >> 8) & 0xFF) as u8,
        b: (hex & 0xFF) as u8,
    }
}

// ---------------------------------------------------------------------------
// Spot colors
// ---------------------------------------------------------------------------

/// The closed set of selectable ring colors.
///
/// `Off` is itself a selectable color — distinct from the pre-touch
/// "no color assigned yet" state, which is `Option::<SpotColor>::None`.
/// The RGB value of each variant comes from the configured palette, not
/// from the enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotColor {
    Red,
    Green,
    Blue,
    White,
    Off,
}

impl SpotColor {
    /// Number of spot selections.
    pub const COUNT: usize = 5;

    /// Single-letter tag, matching the printed button caps.
    pub const fn tag(self) -> char {
        match self {
            Self::Red => 'r',
            Self::Green => 'g',
            Self::Blue => 'b',
            Self::White => 'w',
            Self::Off => 'k',
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::White => "white",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for SpotColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Brightness levels
// ---------------------------------------------------------------------------

/// Index into the calibration table, expressed as photographic f-stops
/// below full output: 0 = brightest, 4 = dimmest.
///
/// Constructible only through [`new`](Self::new), so a value of this type
/// is always a valid table index — downstream lookups have no error path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BrightnessLevel(u8);

impl BrightnessLevel {
    /// Number of calibrated stops.
    pub const COUNT: usize = 5;

    pub fn new(index: u8) -> Option<Self> {
        (usize::from(index) < Self::COUNT).then_some(Self(index))
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BrightnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Button identity
// ---------------------------------------------------------------------------

/// Tagged identity of a hittable region. The variant *is* the button's
/// role: `Spot` buttons select a ring color, `Level` buttons select a
/// brightness stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    Spot(SpotColor),
    Level(BrightnessLevel),
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spot(color) => write!(f, "spot {}", color.tag()),
            Self::Level(level) => write!(f, "level {level}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Calibration table
// ---------------------------------------------------------------------------

/// Fixed table mapping f-stops below full to a brightness fraction.
///
/// Validated once at construction: every fraction in `[0.0, 1.0]` and
/// non-increasing from index 0 to 4. After that, [`fraction`](Self::fraction)
/// is a pure total function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationTable {
    fractions: [f32; BrightnessLevel::COUNT],
}

impl CalibrationTable {
    pub fn from_fractions(fractions: [f32; BrightnessLevel::COUNT]) -> Result<Self> {
        for (idx, fraction) in fractions.iter().enumerate() {
            if !(0.0..=1.0).contains(fraction) {
                return Err(ConfigFault::CalibrationOutOfRange(idx));
            }
        }
        for idx in 1..fractions.len() {
            if fractions[idx] > fractions[idx - 1] {
                return Err(ConfigFault::CalibrationNotMonotonic(idx));
            }
        }
        Ok(Self { fractions })
    }

    /// Brightness fraction for a level. Total — the level is a valid
    /// index by construction.
    pub fn fraction(&self, level: BrightnessLevel) -> f32 {
        self.fractions[level.index()]
    }
}

// ---------------------------------------------------------------------------
// Device state
// ---------------------------------------------------------------------------

/// The two pieces of mutable panel state: which spot color is active (if
/// any has ever been selected) and which brightness stop is active.
///
/// Lives for the whole process; mutated only by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceState {
    active_color: Option<SpotColor>,
    level: BrightnessLevel,
}

impl DeviceState {
    /// Fresh boot state: no color assigned yet, default brightness stop.
    pub fn new(default_level: BrightnessLevel) -> Self {
        Self {
            active_color: None,
            level: default_level,
        }
    }

    /// The active spot color, or `None` if the ring has never been
    /// assigned one since boot.
    pub fn active_color(&self) -> Option<SpotColor> {
        self.active_color
    }

    pub fn level(&self) -> BrightnessLevel {
        self.level
    }

    pub(crate) fn set_color(&mut self, color: SpotColor) {
        self.active_color = Some(color);
    }

    pub(crate) fn set_level(&mut self, level: BrightnessLevel) {
        self.level = level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_from_hex_splits_channels() {
        assert_eq!(rgb_from_hex(0xFF0000), RGB8::new(255, 0, 0));
        assert_eq!(rgb_from_hex(0x00FF00), RGB8::new(0, 255, 0));
        assert_eq!(rgb_from_hex(0x604470), RGB8::new(0x60, 0x44, 0x70));
        assert_eq!(rgb_from_hex(0x000000), RGB8::new(0, 0, 0));
    }

    #[test]
    fn level_constructor_rejects_out_of_range() {
        assert!(BrightnessLevel::new(0).is_some());
        assert!(BrightnessLevel::new(4).is_some());
        assert!(BrightnessLevel::new(5).is_none());
        assert!(BrightnessLevel::new(255).is_none());
    }

    #[test]
    fn calibration_accepts_the_shipped_table() {
        let table = CalibrationTable::from_fractions([1.0, 0.50, 0.25, 0.125, 0.0625]).unwrap();
        let full = BrightnessLevel::new(0).unwrap();
        let dimmest = BrightnessLevel::new(4).unwrap();
        assert!((table.fraction(full) - 1.0).abs() < f32::EPSILON);
        assert!((table.fraction(dimmest) - 0.0625).abs() < f32::EPSILON);
    }

    #[test]
    fn calibration_rejects_out_of_range_fraction() {
        let err = CalibrationTable::from_fractions([1.2, 0.5, 0.25, 0.125, 0.0625]).unwrap_err();
        assert_eq!(err, ConfigFault::CalibrationOutOfRange(0));

        let err = CalibrationTable::from_fractions([1.0, 0.5, 0.25, 0.125, -0.1]).unwrap_err();
        assert_eq!(err, ConfigFault::CalibrationOutOfRange(4));
    }

    #[test]
    fn calibration_rejects_increasing_step() {
        let err = CalibrationTable::from_fractions([1.0, 0.5, 0.75, 0.125, 0.0625]).unwrap_err();
        assert_eq!(err, ConfigFault::CalibrationNotMonotonic(2));
    }

    #[test]
    fn calibration_allows_equal_neighbours() {
        // Non-increasing, not strictly decreasing: a flat pair is legal.
        assert!(CalibrationTable::from_fractions([1.0, 1.0, 0.5, 0.5, 0.0]).is_ok());
    }

    #[test]
    fn fresh_state_has_no_color() {
        let state = DeviceState::new(BrightnessLevel::new(2).unwrap());
        assert_eq!(state.active_color(), None);
        assert_eq!(state.level().index(), 2);
    }

    #[test]
    fn off_is_a_color_not_the_absence_of_one() {
        let mut state = DeviceState::new(BrightnessLevel::new(2).unwrap());
        state.set_color(SpotColor::Off);
        assert_eq!(state.active_color(), Some(SpotColor::Off));
    }
}
