//! The set of hittable regions on the control surface.
//!
//! Built once from the configured layout and immutable afterwards. Hit
//! testing scans in declaration order (spot pads, then level pads) and
//! returns the first region containing the point. An overlapping pair
//! would let the earlier pad shadow the later one forever, so
//! construction rejects overlaps outright — a malformed layout never
//! reaches the touch loop.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::config::PanelLayout;
use crate::error::{ConfigFault, Result};
use crate::panel::state::{BrightnessLevel, ButtonId, SpotColor};

/// Exactly one slot per possible identity: five spots, five levels.
pub const BUTTON_CAP: usize = SpotColor::COUNT + BrightnessLevel::COUNT;

/// One registered button: identity plus its rectangle on the glass.
#[derive(Debug, Clone, Copy)]
pub struct Button {
    pub id: ButtonId,
    pub region: Rectangle,
}

/// Immutable registry of every hittable region.
#[derive(Debug)]
pub struct ButtonRegistry {
    buttons: heapless::Vec<Button, BUTTON_CAP>,
}

impl ButtonRegistry {
    /// Build and validate the registry from a layout.
    ///
    /// Rejects a bad screen, out-of-range level labels, duplicate
    /// identities, empty or off-screen regions, and any pairwise
    /// overlap. A layout that passes here cannot produce an ambiguous
    /// hit at runtime, and every region coordinate is small enough
    /// that the rectangle math below never leaves i32 range.
    pub fn from_layout(layout: &PanelLayout) -> Result<Self> {
        layout.check_screen()?;
        let mut registry = Self {
            buttons: heapless::Vec::new(),
        };
        for pad in &layout.spot_buttons {
            registry.insert(ButtonId::Spot(pad.color), pad.region(), layout)?;
        }
        for pad in &layout.level_buttons {
            let level = BrightnessLevel::new(pad.level)
                .ok_or(ConfigFault::LevelOutOfRange(pad.level))?;
            registry.insert(ButtonId::Level(level), pad.region(), layout)?;
        }
        Ok(registry)
    }

    fn insert(&mut self, id: ButtonId, region: Rectangle, layout: &PanelLayout) -> Result<()> {
        if region.is_zero_sized() {
            return Err(ConfigFault::EmptyRegion(id));
        }
        // Bounds come before the overlap scan: `intersection` computes
        // the corner as `top_left + size`, and only an on-screen region
        // keeps that sum inside i32.
        if !layout.contains_region(&region) {
            return Err(ConfigFault::OffScreenRegion(id));
        }
        for existing in &self.buttons {
            if existing.id == id {
                return Err(ConfigFault::DuplicateIdentity(id));
            }
            if !existing.region.intersection(&region).is_zero_sized() {
                return Err(ConfigFault::OverlappingRegions(existing.id, id));
            }
        }
        // Ten identities exist and duplicates were just rejected, so
        // the capacity cannot be exceeded.
        let _ = self.buttons.push(Button { id, region });
        Ok(())
    }

    /// First button whose region contains `point`, in declaration
    /// order. Regions are half-open, so pads meeting edge-to-edge stay
    /// disjoint.
    pub fn hit_test(&self, point: Point) -> Option<ButtonId> {
        self.buttons
            .iter()
            .find(|button| button.region.contains(point))
            .map(|button| button.id)
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }
}
