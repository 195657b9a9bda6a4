//! Integration tests for the touch → dispatch → output pipeline.
//!
//! These run on the host (x86_64) and drive the full service through
//! scripted touch traces against mock ports, verifying the press
//! semantics, the output batches, and the fault policy end to end.

use embedded_graphics::prelude::Point;
use smart_leds::RGB8;

use crate::mock_hw::{IoCall, MockPanelIo, RecordingSink};
use ringlight::config::PanelConfig;
use ringlight::panel::events::PanelEvent;
use ringlight::panel::service::PanelService;
use ringlight::panel::state::{BrightnessLevel, ButtonId, SpotColor};

const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };
const GREEN: RGB8 = RGB8 { r: 0, g: 255, b: 0 };

/// Center of the `g` spot pad.
const GREEN_PAD: Point = Point::new(120, 40);
/// Center of the dimmest (level 4) pad.
const LEVEL4_PAD: Point = Point::new(40, 120);
/// Center of the full-output (level 0) pad.
const LEVEL0_PAD: Point = Point::new(280, 120);
/// Center of the `k` (off) spot pad.
const OFF_PAD: Point = Point::new(280, 200);
/// Background area, outside every button region.
const DEAD_ZONE: Point = Point::new(5, 230);

fn stop(index: u8) -> BrightnessLevel {
    BrightnessLevel::new(index).unwrap()
}

fn boot() -> (PanelService, MockPanelIo, RecordingSink) {
    let config = PanelConfig::default();
    let mut service = PanelService::new(&config).unwrap();
    let mut io = MockPanelIo::new();
    let mut sink = RecordingSink::new();
    service.start(&mut io, &mut sink);
    (service, io, sink)
}

/// Tick the service until the scripted touch trace is fully consumed.
fn run(service: &mut PanelService, io: &mut MockPanelIo, sink: &mut RecordingSink) {
    while !io.touches.is_empty() {
        service.tick(io, sink);
    }
}

// ── Startup output sync ───────────────────────────────────────

#[test]
fn startup_parks_a_dark_ring_and_an_unfilled_pointer() {
    let (service, io, sink) = boot();

    assert_eq!(
        io.calls,
        vec![
            IoCall::RingBrightness(0.25),
            IoCall::RingFill(BLACK),
            IoCall::ClearPointer,
            IoCall::DrawPointer {
                x: 150,
                fill: None
            },
        ]
    );
    assert_eq!(sink.events, vec![PanelEvent::Started { level: stop(2) }]);
    assert_eq!(service.active_color(), None);
    assert_eq!(service.level(), stop(2));
}

// ── The full user story ───────────────────────────────────────

#[test]
fn green_then_dim_then_dead_zone_walkthrough() {
    let (mut service, mut io, mut sink) = boot();

    io.press_and_release(GREEN_PAD);
    io.press_and_release(LEVEL4_PAD);
    io.press_and_release(DEAD_ZONE);
    run(&mut service, &mut io, &mut sink);

    assert_eq!(service.active_color(), Some(SpotColor::Green));
    assert_eq!(service.level(), stop(4));
    assert_eq!(service.press_count(), 2);

    // Color press fills the ring without touching brightness; level
    // press rescales without touching the fill.
    assert_eq!(io.fills(), vec![BLACK, GREEN]);
    assert_eq!(io.brightnesses(), vec![0.25, 0.0625]);
    assert_eq!(
        io.pointer_draws(),
        vec![(150, None), (150, Some(GREEN)), (30, Some(GREEN))]
    );
    assert_eq!(io.cues(), vec![4]);

    // The dead-zone contact left no trace beyond consuming its ticks.
    assert_eq!(
        sink.events,
        vec![
            PanelEvent::Started { level: stop(2) },
            PanelEvent::Pressed(ButtonId::Spot(SpotColor::Green)),
            PanelEvent::ColorChanged {
                from: None,
                to: SpotColor::Green
            },
            PanelEvent::Pressed(ButtonId::Level(stop(4))),
            PanelEvent::LevelChanged {
                from: stop(2),
                to: stop(4)
            },
        ]
    );
}

// ── Press semantics ───────────────────────────────────────────

#[test]
fn held_touch_fires_exactly_one_press() {
    let (mut service, mut io, mut sink) = boot();

    io.script(&[Some(GREEN_PAD); 10]);
    io.script(&[None]);
    run(&mut service, &mut io, &mut sink);

    assert_eq!(service.press_count(), 1);
    assert_eq!(io.fills(), vec![BLACK, GREEN]);
    assert_eq!(service.tick_count(), 11);
}

#[test]
fn sliding_from_background_onto_a_pad_never_fires() {
    let (mut service, mut io, mut sink) = boot();

    io.script(&[Some(DEAD_ZONE), Some(GREEN_PAD), Some(GREEN_PAD), None]);
    run(&mut service, &mut io, &mut sink);

    assert_eq!(service.press_count(), 0);
    assert_eq!(service.active_color(), None);
    assert_eq!(io.fills(), vec![BLACK]);
    assert_eq!(sink.events, vec![PanelEvent::Started { level: stop(2) }]);
}

#[test]
fn repeating_a_color_press_is_idempotent() {
    let (mut service, mut io, mut sink) = boot();

    io.press_and_release(GREEN_PAD);
    io.press_and_release(GREEN_PAD);
    run(&mut service, &mut io, &mut sink);

    assert_eq!(service.press_count(), 2);
    assert_eq!(io.fills(), vec![BLACK, GREEN, GREEN]);
    assert_eq!(service.active_color(), Some(SpotColor::Green));

    // Both presses announce, but only the first changes the color.
    let color_changes = sink
        .events
        .iter()
        .filter(|e| matches!(e, PanelEvent::ColorChanged { .. }))
        .count();
    assert_eq!(color_changes, 1);
}

#[test]
fn off_pad_selects_the_off_color_rather_than_resetting() {
    let (mut service, mut io, mut sink) = boot();

    io.press_and_release(OFF_PAD);
    run(&mut service, &mut io, &mut sink);

    assert_eq!(service.active_color(), Some(SpotColor::Off));
    assert_eq!(io.last_fill(), Some(BLACK));
    assert_eq!(io.brightnesses(), vec![0.25]);
    assert!(sink.events.contains(&PanelEvent::ColorChanged {
        from: None,
        to: SpotColor::Off
    }));
}

// ── Output fault policy ───────────────────────────────────────

#[test]
fn ring_fault_reports_but_the_state_change_stands() {
    let (mut service, mut io, mut sink) = boot();

    io.fail_ring = true;
    io.press_and_release(GREEN_PAD);
    run(&mut service, &mut io, &mut sink);

    assert_eq!(service.active_color(), Some(SpotColor::Green));
    assert_eq!(sink.fault_count(), 1);
    // The rest of the batch still ran: pointer recolored in place.
    assert!(io.pointer_draws().contains(&(150, Some(GREEN))));

    // Ring recovers on the next press.
    io.fail_ring = false;
    io.press_and_release(LEVEL0_PAD);
    run(&mut service, &mut io, &mut sink);
    assert_eq!(io.last_brightness(), Some(1.0));
}

#[test]
fn screen_fault_skips_the_draw_but_the_cue_still_plays() {
    let (mut service, mut io, mut sink) = boot();

    io.fail_screen = true;
    io.press_and_release(LEVEL4_PAD);
    run(&mut service, &mut io, &mut sink);

    assert_eq!(service.level(), stop(4));
    assert_eq!(io.cues(), vec![4]);
    assert_eq!(sink.fault_count(), 1);
    // Only the startup draw made it to the screen.
    assert_eq!(io.pointer_draws().len(), 1);
}

#[test]
fn audio_fault_does_not_roll_back_the_level() {
    let (mut service, mut io, mut sink) = boot();

    io.fail_audio = true;
    io.press_and_release(Point::new(100, 120)); // level 3 pad
    run(&mut service, &mut io, &mut sink);

    assert_eq!(service.level(), stop(3));
    assert_eq!(io.last_brightness(), Some(0.125));
    assert!(io.cues().is_empty());
    assert_eq!(sink.fault_count(), 1);
    assert!(sink.events.contains(&PanelEvent::LevelChanged {
        from: stop(2),
        to: stop(3)
    }));
}

// ── Pointer invariant ─────────────────────────────────────────

#[test]
fn pointer_is_always_exactly_one_shape() {
    let (mut service, mut io, mut sink) = boot();

    // Sweep every stop left to right: 4, 3, 2, 1, 0.
    for x in [40, 100, 160, 220, 280] {
        io.press_and_release(Point::new(x, 120));
    }
    run(&mut service, &mut io, &mut sink);

    assert_eq!(io.max_pointer_shapes(), 1);
    let draw_xs: Vec<i32> = io.pointer_draws().iter().map(|(x, _)| *x).collect();
    assert_eq!(draw_xs, vec![150, 30, 90, 150, 210, 270]);
}
