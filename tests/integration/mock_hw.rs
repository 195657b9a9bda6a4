//! Mock panel hardware for integration tests.
//!
//! Records every output call so tests can assert on the full command
//! history without touching real SPI/I2S peripherals, and feeds the
//! service a scripted touch trace, one sample per tick.

use std::collections::VecDeque;

use embedded_graphics::prelude::Point;
use smart_leds::RGB8;

use ringlight::error::OutputError;
use ringlight::panel::dispatcher::SoundCue;
use ringlight::panel::events::PanelEvent;
use ringlight::panel::ports::{AudioPort, EventSink, RingPort, ScreenPort, TouchPort};

// ── Output call record ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IoCall {
    RingFill(RGB8),
    RingBrightness(f32),
    ClearPointer,
    DrawPointer { x: i32, fill: Option<RGB8> },
    PlayCue(u8),
}

// ── MockPanelIo ───────────────────────────────────────────────

pub struct MockPanelIo {
    /// Upcoming touch samples; each `tick` consumes one. Empty = no touch.
    pub touches: VecDeque<Option<Point>>,
    pub calls: Vec<IoCall>,
    pub fail_ring: bool,
    pub fail_screen: bool,
    pub fail_audio: bool,
}

#[allow(dead_code)]
impl MockPanelIo {
    pub fn new() -> Self {
        Self {
            touches: VecDeque::new(),
            calls: Vec::new(),
            fail_ring: false,
            fail_screen: false,
            fail_audio: false,
        }
    }

    /// Append a touch trace, one entry per upcoming tick.
    pub fn script(&mut self, samples: &[Option<Point>]) {
        self.touches.extend(samples.iter().copied());
    }

    /// One full press-and-release cycle at `point` (two ticks).
    pub fn press_and_release(&mut self, point: Point) {
        self.touches.push_back(Some(point));
        self.touches.push_back(None);
    }

    pub fn last_fill(&self) -> Option<RGB8> {
        self.calls.iter().rev().find_map(|c| match c {
            IoCall::RingFill(color) => Some(*color),
            _ => None,
        })
    }

    pub fn last_brightness(&self) -> Option<f32> {
        self.calls.iter().rev().find_map(|c| match c {
            IoCall::RingBrightness(fraction) => Some(*fraction),
            _ => None,
        })
    }

    pub fn fills(&self) -> Vec<RGB8> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                IoCall::RingFill(color) => Some(*color),
                _ => None,
            })
            .collect()
    }

    pub fn brightnesses(&self) -> Vec<f32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                IoCall::RingBrightness(fraction) => Some(*fraction),
                _ => None,
            })
            .collect()
    }

    pub fn pointer_draws(&self) -> Vec<(i32, Option<RGB8>)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                IoCall::DrawPointer { x, fill } => Some((*x, *fill)),
                _ => None,
            })
            .collect()
    }

    pub fn cues(&self) -> Vec<u8> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                IoCall::PlayCue(level) => Some(*level),
                _ => None,
            })
            .collect()
    }

    /// Largest number of pointer shapes ever on screen at once, replayed
    /// from the call history. Must never exceed one.
    pub fn max_pointer_shapes(&self) -> usize {
        let mut present = 0usize;
        let mut max = 0;
        for call in &self.calls {
            match call {
                IoCall::ClearPointer => present = 0,
                IoCall::DrawPointer { .. } => {
                    present += 1;
                    max = max.max(present);
                }
                _ => {}
            }
        }
        max
    }
}

impl Default for MockPanelIo {
    fn default() -> Self {
        Self::new()
    }
}

impl TouchPort for MockPanelIo {
    fn read(&mut self) -> Option<Point> {
        self.touches.pop_front().flatten()
    }
}

impl RingPort for MockPanelIo {
    fn fill(&mut self, color: RGB8) -> Result<(), OutputError> {
        if self.fail_ring {
            return Err(OutputError::Led(-1));
        }
        self.calls.push(IoCall::RingFill(color));
        Ok(())
    }

    fn set_brightness(&mut self, fraction: f32) -> Result<(), OutputError> {
        if self.fail_ring {
            return Err(OutputError::Led(-1));
        }
        self.calls.push(IoCall::RingBrightness(fraction));
        Ok(())
    }
}

impl ScreenPort for MockPanelIo {
    fn clear_pointer(&mut self) -> Result<(), OutputError> {
        if self.fail_screen {
            return Err(OutputError::Display(-1));
        }
        self.calls.push(IoCall::ClearPointer);
        Ok(())
    }

    fn draw_pointer(&mut self, x: i32, fill: Option<RGB8>) -> Result<(), OutputError> {
        if self.fail_screen {
            return Err(OutputError::Display(-1));
        }
        self.calls.push(IoCall::DrawPointer { x, fill });
        Ok(())
    }
}

impl AudioPort for MockPanelIo {
    fn play(&mut self, cue: SoundCue) -> Result<(), OutputError> {
        if self.fail_audio {
            return Err(OutputError::Audio("mock refusal"));
        }
        self.calls.push(IoCall::PlayCue(cue.level().index() as u8));
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<PanelEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn fault_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, PanelEvent::OutputFault(_)))
            .count()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &PanelEvent) {
        self.events.push(*event);
    }
}
