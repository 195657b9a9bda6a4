//! Unified error types for the ringlight firmware.
//!
//! Two disjoint failure families exist and they are deliberately kept as
//! separate enums: [`ConfigFault`] covers startup-time configuration
//! validation (always fatal, per the boot sequence in `main`), while
//! [`OutputError`] covers runtime output-device failures (never fatal —
//! the panel state has already been committed when an output is driven).
//! All variants are `Copy` so they travel through the render path without
//! allocation.

use core::fmt;

use crate::panel::state::ButtonId;

/// Firmware-wide `Result` alias.
///
/// Defaults to the startup fault type; runtime output paths name the
/// error explicitly as `Result<T, OutputError>`.
pub type Result<T, E = ConfigFault> = core::result::Result<T, E>;

// ---------------------------------------------------------------------------
// Startup configuration faults (fatal at init, never raised at runtime)
// ---------------------------------------------------------------------------

/// A malformed panel configuration detected while building the button
/// registry, calibration table, or dispatcher at boot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFault {
    /// Two buttons in the registry carry the same identity.
    DuplicateIdentity(ButtonId),
    /// Two hit regions overlap; first-match scanning would shadow the
    /// second button forever.
    OverlappingRegions(ButtonId, ButtonId),
    /// A level button (or the default level) names an index outside 0–4.
    LevelOutOfRange(u8),
    /// Calibration fraction at this index is outside `[0.0, 1.0]`.
    CalibrationOutOfRange(usize),
    /// Calibration fractions increase at this index; the table must be
    /// non-increasing from full brightness down.
    CalibrationNotMonotonic(usize),
    /// A button hit region has zero width or height and can never match.
    EmptyRegion(ButtonId),
    /// A screen dimension is zero or larger than the 16-bit pixel
    /// coordinate space the LCD window commands can address.
    ScreenOutOfRange(u32),
    /// A button hit region has a negative origin or extends past the
    /// declared screen edge.
    OffScreenRegion(ButtonId),
}

impl fmt::Display for ConfigFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateIdentity(id) => write!(f, "duplicate button identity: {id}"),
            Self::OverlappingRegions(a, b) => {
                write!(f, "hit regions overlap: {a} and {b}")
            }
            Self::LevelOutOfRange(raw) => {
                write!(f, "brightness level {raw} out of range (expected 0-4)")
            }
            Self::CalibrationOutOfRange(idx) => {
                write!(f, "calibration[{idx}] outside [0.0, 1.0]")
            }
            Self::CalibrationNotMonotonic(idx) => {
                write!(f, "calibration[{idx}] brighter than calibration[{}]", idx - 1)
            }
            Self::EmptyRegion(id) => write!(f, "empty hit region on button {id}"),
            Self::ScreenOutOfRange(dim) => {
                write!(f, "screen dimension {dim} out of range (expected 1-32767)")
            }
            Self::OffScreenRegion(id) => {
                write!(f, "hit region on button {id} extends off the screen")
            }
        }
    }
}

impl std::error::Error for ConfigFault {}

// ---------------------------------------------------------------------------
// Runtime output-device errors (non-fatal, logged and skipped)
// ---------------------------------------------------------------------------

/// A failure while driving one of the three output devices.
///
/// The state mutation that produced the output has already taken effect;
/// the renderer logs the fault and carries on with the rest of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputError {
    /// LED ring SPI bus write failed (ESP-IDF return code).
    Led(i32),
    /// LCD panel command or pixel push failed (ESP-IDF return code).
    Display(i32),
    /// Audio cue could not be started.
    Audio(&'static str),
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Led(rc) => write!(f, "LED ring write failed (rc={rc})"),
            Self::Display(rc) => write!(f, "display write failed (rc={rc})"),
            Self::Audio(msg) => write!(f, "audio: {msg}"),
        }
    }
}

impl std::error::Error for OutputError {}
