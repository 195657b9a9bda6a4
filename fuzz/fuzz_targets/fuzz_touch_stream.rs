//! Fuzz target: the touch sampling and dispatch loop
//!
//! Decodes arbitrary bytes into a touch trace (lift-offs plus contacts
//! at wild coordinates, on-glass and off) and runs the full service
//! loop over it against recording ports.
//!
//! Invariants checked:
//! - No panics under any trace
//! - Never more presses than discrete contacts
//! - The pointer is never drawn twice without an intervening clear
//!
//! cargo fuzz run fuzz_touch_stream

#![no_main]

use libfuzzer_sys::fuzz_target;

use embedded_graphics::prelude::Point;
use smart_leds::RGB8;

use ringlight::config::PanelConfig;
use ringlight::error::OutputError;
use ringlight::panel::dispatcher::SoundCue;
use ringlight::panel::events::PanelEvent;
use ringlight::panel::ports::{AudioPort, EventSink, RingPort, ScreenPort, TouchPort};
use ringlight::panel::service::PanelService;

#[derive(Default)]
struct FuzzIo {
    next: Option<Point>,
    shapes: usize,
    max_shapes: usize,
}

impl TouchPort for FuzzIo {
    fn read(&mut self) -> Option<Point> {
        self.next
    }
}

impl RingPort for FuzzIo {
    fn fill(&mut self, _color: RGB8) -> Result<(), OutputError> {
        Ok(())
    }

    fn set_brightness(&mut self, _fraction: f32) -> Result<(), OutputError> {
        Ok(())
    }
}

impl ScreenPort for FuzzIo {
    fn clear_pointer(&mut self) -> Result<(), OutputError> {
        self.shapes = 0;
        Ok(())
    }

    fn draw_pointer(&mut self, _x: i32, _fill: Option<RGB8>) -> Result<(), OutputError> {
        self.shapes += 1;
        self.max_shapes = self.max_shapes.max(self.shapes);
        Ok(())
    }
}

impl AudioPort for FuzzIo {
    fn play(&mut self, _cue: SoundCue) -> Result<(), OutputError> {
        Ok(())
    }
}

struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &PanelEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let config = PanelConfig::default();
    let mut service = PanelService::new(&config).unwrap();
    let mut io = FuzzIo::default();
    let mut sink = NullSink;
    service.start(&mut io, &mut sink);

    // 3 bytes per tick: [contact flag, x, y], with coordinates scaled
    // to straddle the screen edges so off-glass samples get exercised.
    let mut contacts = 0u64;
    let mut touching = false;
    for chunk in data.chunks_exact(3) {
        if chunk[0] & 1 == 1 {
            if !touching {
                contacts += 1;
            }
            touching = true;
            let x = i32::from(chunk[1]) * 2 - 40;
            let y = i32::from(chunk[2]) * 2 - 40;
            io.next = Some(Point::new(x, y));
        } else {
            touching = false;
            io.next = None;
        }
        service.tick(&mut io, &mut sink);
    }

    assert!(
        service.press_count() <= contacts,
        "more presses than contacts"
    );
    assert!(io.max_shapes <= 1, "pointer shapes stacked");
});
