//! Startup-gate tests: a malformed configuration must be rejected by
//! [`PanelService::new`] before any hardware port is ever touched.
//!
//! The individual validators have their own unit tests; these cover
//! the public constructor boundary and the order faults surface in.

use ringlight::config::PanelConfig;
use ringlight::error::ConfigFault;
use ringlight::panel::service::PanelService;
use ringlight::panel::state::{BrightnessLevel, ButtonId, SpotColor};

fn stop(index: u8) -> BrightnessLevel {
    BrightnessLevel::new(index).unwrap()
}

fn gate(config: &PanelConfig) -> Result<PanelService, ConfigFault> {
    PanelService::new(config)
}

#[test]
fn default_config_passes_the_startup_gate() {
    let service = gate(&PanelConfig::default()).unwrap();
    assert_eq!(service.level(), stop(2));
    assert_eq!(service.active_color(), None);
}

#[test]
fn cross_row_overlap_is_caught_at_construction() {
    let mut config = PanelConfig::default();
    // Slide the off pad up into the brightness row; it now covers the
    // bottom half of the full-output pad.
    config.layout.spot_buttons[4].y = 120;

    assert_eq!(
        gate(&config).unwrap_err(),
        ConfigFault::OverlappingRegions(
            ButtonId::Spot(SpotColor::Off),
            ButtonId::Level(stop(0))
        )
    );
}

#[test]
fn duplicate_stop_label_is_fatal() {
    let mut config = PanelConfig::default();
    config.layout.level_buttons[3].level = 0;

    assert_eq!(
        gate(&config).unwrap_err(),
        ConfigFault::DuplicateIdentity(ButtonId::Level(stop(0)))
    );
}

#[test]
fn stop_label_beyond_the_scale_is_fatal() {
    let mut config = PanelConfig::default();
    config.layout.level_buttons[0].level = 5;

    assert_eq!(gate(&config).unwrap_err(), ConfigFault::LevelOutOfRange(5));
}

#[test]
fn zero_height_pad_is_fatal() {
    let mut config = PanelConfig::default();
    config.layout.spot_buttons[2].height = 0;

    assert_eq!(
        gate(&config).unwrap_err(),
        ConfigFault::EmptyRegion(ButtonId::Spot(SpotColor::Blue))
    );
}

#[test]
fn layout_faults_surface_before_the_default_level() {
    // Both the layout and the default level are broken; the registry
    // is built first, so its fault wins.
    let mut config = PanelConfig::default();
    config.layout.spot_buttons[0].width = 0;
    config.default_level = 9;

    assert_eq!(
        gate(&config).unwrap_err(),
        ConfigFault::EmptyRegion(ButtonId::Spot(SpotColor::Red))
    );
}

#[test]
fn calibration_fraction_above_full_is_fatal() {
    let mut config = PanelConfig::default();
    config.calibration[0] = 1.5;

    assert_eq!(
        gate(&config).unwrap_err(),
        ConfigFault::CalibrationOutOfRange(0)
    );
}

#[test]
fn calibration_that_brightens_down_the_scale_is_fatal() {
    let mut config = PanelConfig::default();
    config.calibration = [1.0, 0.5, 0.6, 0.125, 0.0625];

    assert_eq!(
        gate(&config).unwrap_err(),
        ConfigFault::CalibrationNotMonotonic(2)
    );
}

#[test]
fn out_of_range_default_level_is_fatal() {
    let mut config = PanelConfig::default();
    config.default_level = 200;

    assert_eq!(gate(&config).unwrap_err(), ConfigFault::LevelOutOfRange(200));
}

#[test]
fn coordinate_near_the_integer_limit_is_fatal_not_a_crash() {
    // A hostile provisioning payload can park a pad anywhere in i32;
    // the gate has to fault before any rectangle arithmetic wraps.
    let mut config = PanelConfig::default();
    config.layout.spot_buttons[0].x = i32::MAX - 5;

    assert_eq!(
        gate(&config).unwrap_err(),
        ConfigFault::OffScreenRegion(ButtonId::Spot(SpotColor::Red))
    );
}

#[test]
fn pad_hanging_off_the_right_edge_is_fatal() {
    let mut config = PanelConfig::default();
    // 300 + 60 wide runs 40px past the 320px screen.
    config.layout.spot_buttons[3].x = 300;

    assert_eq!(
        gate(&config).unwrap_err(),
        ConfigFault::OffScreenRegion(ButtonId::Spot(SpotColor::White))
    );
}

#[test]
fn negative_pad_origin_is_fatal() {
    let mut config = PanelConfig::default();
    config.layout.spot_buttons[1].y = -5;

    assert_eq!(
        gate(&config).unwrap_err(),
        ConfigFault::OffScreenRegion(ButtonId::Spot(SpotColor::Green))
    );
}

#[test]
fn zero_screen_dimension_is_fatal() {
    let mut config = PanelConfig::default();
    config.layout.screen_height = 0;

    assert_eq!(gate(&config).unwrap_err(), ConfigFault::ScreenOutOfRange(0));
}

#[test]
fn oversized_screen_dimension_is_fatal() {
    let mut config = PanelConfig::default();
    config.layout.screen_width = 40_000;

    assert_eq!(
        gate(&config).unwrap_err(),
        ConfigFault::ScreenOutOfRange(40_000)
    );
}

#[test]
fn shrunken_screen_rejects_the_stock_layout() {
    // The declared screen bounds the layout: halving the width strands
    // the blue pad (170..230) off-glass.
    let mut config = PanelConfig::default();
    config.layout.screen_width = 160;

    assert_eq!(
        gate(&config).unwrap_err(),
        ConfigFault::OffScreenRegion(ButtonId::Spot(SpotColor::Blue))
    );
}

#[test]
fn screen_faults_surface_before_any_pad_fault() {
    // Both the screen and a pad are broken; the screen is checked
    // before any region, so its fault wins.
    let mut config = PanelConfig::default();
    config.layout.screen_width = 0;
    config.layout.spot_buttons[0].width = 0;

    assert_eq!(gate(&config).unwrap_err(), ConfigFault::ScreenOutOfRange(0));
}
