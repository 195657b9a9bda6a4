//! WS2812 LED ring driver over SPI.
//!
//! Encodes each WS2812 data bit as three SPI bits (`110` for one,
//! `100` for zero) clocked at 2.4 MHz, so the MOSI line reproduces the
//! 800 kHz single-wire waveform without bit-banging. Pixels take GRB
//! byte order; a run of zero bytes after the payload holds the line
//! low past the latch time.
//!
//! The ring shows one uniform color. The driver caches the last color
//! and brightness so either can change independently; brightness is a
//! linear scale applied per channel before encoding.

use smart_leds::RGB8;

use crate::drivers::hw_init;
use crate::error::OutputError;

/// Largest ring the frame buffer accommodates.
pub const MAX_PIXELS: usize = 144;

/// Encoded SPI bytes per pixel: 3 color bytes, 3x expansion.
const BYTES_PER_PIXEL: usize = 9;

/// Zero bytes after the payload; 128 bit times at 2.4 MHz is ~53 us,
/// past the WS2812 50 us latch threshold.
const RESET_BYTES: usize = 16;

const FRAME_CAP: usize = MAX_PIXELS * BYTES_PER_PIXEL + RESET_BYTES;

type Frame = heapless::Vec<u8, FRAME_CAP>;

pub struct LightRing {
    pixel_count: usize,
    color: RGB8,
    brightness: f32,
}

impl LightRing {
    pub fn new(pixel_count: usize) -> Self {
        Self {
            pixel_count: pixel_count.min(MAX_PIXELS),
            color: RGB8 { r: 0, g: 0, b: 0 },
            brightness: 1.0,
        }
    }

    /// Repaint every pixel with `color` at the cached brightness.
    pub fn fill(&mut self, color: RGB8) -> Result<(), OutputError> {
        self.color = color;
        self.push_frame()
    }

    /// Rescale the cached color and repaint. `scale` is clamped into
    /// `[0.0, 1.0]`.
    pub fn set_brightness(&mut self, scale: f32) -> Result<(), OutputError> {
        self.brightness = scale.clamp(0.0, 1.0);
        self.push_frame()
    }

    fn push_frame(&self) -> Result<(), OutputError> {
        let scaled = scale_color(self.color, self.brightness);
        let frame = encode_frame(scaled, self.pixel_count);
        let rc = hw_init::ring_spi_write(&frame);
        if rc != 0 {
            return Err(OutputError::Led(rc));
        }
        Ok(())
    }
}

/// Per-channel linear dim. Truncation keeps 1.0 lossless and maps any
/// positive channel to 0 only when the scale itself reaches 0.
fn scale_color(color: RGB8, scale: f32) -> RGB8 {
    RGB8 {
        r: (f32::from(color.r) * scale) as u8,
        g: (f32::from(color.g) * scale) as u8,
        b: (f32::from(color.b) * scale) as u8,
    }
}

fn encode_frame(color: RGB8, pixel_count: usize) -> Frame {
    let mut frame = Frame::new();
    for _ in 0..pixel_count {
        // GRB on the wire.
        encode_byte(color.g, &mut frame);
        encode_byte(color.r, &mut frame);
        encode_byte(color.b, &mut frame);
    }
    for _ in 0..RESET_BYTES {
        // Capacity: pixel_count is clamped to MAX_PIXELS in new().
        let _ = frame.push(0);
    }
    frame
}

/// Expand one color byte MSB-first into three SPI bytes.
fn encode_byte(byte: u8, out: &mut Frame) {
    let mut acc: u32 = 0;
    for i in (0..8).rev() {
        let pattern = if byte >> i & 1 == 1 { 0b110 } else { 0b100 };
        acc = acc << 3 | pattern;
    }
    // Capacity: see encode_frame.
    let _ = out.extend_from_slice(&[(acc >> 16) as u8, (acc >> 8) as u8, acc as u8]);
}
