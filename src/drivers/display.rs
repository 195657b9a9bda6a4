//! ILI9341 LCD driver over SPI.
//!
//! Drives the 320x240 panel in landscape through the raw command set:
//! window with CASET/PASET, stream big-endian RGB565 after RAMWR. The
//! static button layout is painted once at init; afterwards the only
//! repaint traffic is the brightness pointer triangle, which is cleared
//! back to background before it is redrawn at a new position so stale
//! shapes never stack up.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use smart_leds::RGB8;

use crate::config::PanelConfig;
use crate::drivers::hw_init;
use crate::error::OutputError;

pub const WIDTH: i32 = 320;
pub const HEIGHT: i32 = 240;

// ILI9341 command set (the slice of it we use).
const CMD_SLPOUT: u8 = 0x11;
const CMD_DISPON: u8 = 0x29;
const CMD_CASET: u8 = 0x2A;
const CMD_PASET: u8 = 0x2B;
const CMD_RAMWR: u8 = 0x2C;
const CMD_MADCTL: u8 = 0x36;
const CMD_COLMOD: u8 = 0x3A;

/// MADCTL row/column exchange + BGR panel order: 320x240 landscape.
const MADCTL_LANDSCAPE: u8 = 0x28;

/// 16 bits per pixel.
const COLMOD_RGB565: u8 = 0x55;

/// Thin dark border around the button pads.
const PAD_OUTLINE: u16 = rgb565(RGB8 { r: 0x22, g: 0x22, b: 0x22 });

/// The pointer triangle is outlined in black.
const POINTER_OUTLINE: u16 = 0x0000;

pub struct Display {
    background: u16,
    pointer_y: i32,
    pointer_w: u32,
    pointer_h: u32,
    last_pointer: Option<Rectangle>,
}

impl Display {
    pub fn new(config: &PanelConfig) -> Self {
        Self {
            background: rgb565(config.palette.background_rgb()),
            pointer_y: config.layout.pointer_y,
            pointer_w: config.layout.pointer_width,
            pointer_h: config.layout.pointer_height,
            last_pointer: None,
        }
    }

    /// Bring the controller out of sleep and paint the static layout.
    pub fn init(&mut self, config: &PanelConfig) -> Result<(), OutputError> {
        hw_init::lcd_reset_pulse();
        self.cmd(CMD_SLPOUT, &[])?;
        hw_init::delay_ms(120);
        self.cmd(CMD_COLMOD, &[COLMOD_RGB565])?;
        self.cmd(CMD_MADCTL, &[MADCTL_LANDSCAPE])?;
        self.cmd(CMD_DISPON, &[])?;
        hw_init::delay_ms(20);

        self.draw_layout(config)?;
        hw_init::lcd_backlight(true);
        Ok(())
    }

    fn draw_layout(&mut self, config: &PanelConfig) -> Result<(), OutputError> {
        self.fill_rect(&screen_rect(), self.background)?;

        // Spot pads carry their selection color.
        for b in &config.layout.spot_buttons {
            let region = b.region();
            self.fill_rect(&region, rgb565(config.palette.rgb(b.color)))?;
            self.outline_rect(&region, PAD_OUTLINE)?;
        }

        // Level pads render as a gray staircase, one step per f-stop.
        for b in &config.layout.level_buttons {
            let frac = config
                .calibration
                .get(usize::from(b.level))
                .copied()
                .unwrap_or(0.0);
            let g = (255.0 * frac) as u8;
            let region = b.region();
            self.fill_rect(&region, rgb565(RGB8 { r: g, g, b: g }))?;
            self.outline_rect(&region, PAD_OUTLINE)?;
        }
        Ok(())
    }

    /// Erase the previously drawn pointer, if any. On failure the
    /// recorded bounds are kept so the next call can retry the erase.
    pub fn clear_pointer(&mut self) -> Result<(), OutputError> {
        let Some(bounds) = self.last_pointer else {
            return Ok(());
        };
        self.fill_rect(&bounds, self.background)?;
        self.last_pointer = None;
        Ok(())
    }

    /// Draw the pointer triangle with its left edge at `x`. `fill` is
    /// the interior color; `None` renders the outline only.
    pub fn draw_pointer(&mut self, x: i32, fill: Option<RGB8>) -> Result<(), OutputError> {
        let bounds = Rectangle::new(
            Point::new(x, self.pointer_y),
            Size::new(self.pointer_w, self.pointer_h),
        );
        // Recorded before any pixels move so a partial draw still gets
        // erased by the next clear.
        self.last_pointer = Some(bounds);

        let inner = fill.map_or(self.background, rgb565);
        let w = self.pointer_w as i32;
        let h = self.pointer_h as i32;
        for row in 0..h {
            let span = triangle_span(row, w, h);
            let x0 = x + (w - span) / 2;
            let y = self.pointer_y + row;
            self.fill_rect(&row_rect(x0, y, span), POINTER_OUTLINE)?;
            // Leave the top rows and the base edge as solid outline.
            if span > 2 && row < h - 1 {
                self.fill_rect(&row_rect(x0 + 1, y, span - 2), inner)?;
            }
        }
        Ok(())
    }

    fn cmd(&self, cmd: u8, params: &[u8]) -> Result<(), OutputError> {
        let rc = hw_init::lcd_write_cmd(cmd, params);
        if rc != 0 {
            return Err(OutputError::Display(rc));
        }
        Ok(())
    }

    /// Window the controller to `rect` and flood it with one color.
    fn fill_rect(&self, rect: &Rectangle, color: u16) -> Result<(), OutputError> {
        let clipped = rect.intersection(&screen_rect());
        if clipped.is_zero_sized() {
            return Ok(());
        }
        let x0 = clipped.top_left.x as u16;
        let y0 = clipped.top_left.y as u16;
        let x1 = x0 + clipped.size.width as u16 - 1;
        let y1 = y0 + clipped.size.height as u16 - 1;

        self.cmd(
            CMD_CASET,
            &[(x0 >> 8) as u8, x0 as u8, (x1 >> 8) as u8, x1 as u8],
        )?;
        self.cmd(
            CMD_PASET,
            &[(y0 >> 8) as u8, y0 as u8, (y1 >> 8) as u8, y1 as u8],
        )?;
        self.cmd(CMD_RAMWR, &[])?;

        let rc = hw_init::lcd_push_pixels(color, clipped.size.width * clipped.size.height);
        if rc != 0 {
            return Err(OutputError::Display(rc));
        }
        Ok(())
    }

    fn outline_rect(&self, rect: &Rectangle, color: u16) -> Result<(), OutputError> {
        let w = rect.size.width;
        let h = rect.size.height;
        if w == 0 || h == 0 {
            return Ok(());
        }
        let Point { x, y } = rect.top_left;
        self.fill_rect(&row_rect(x, y, w as i32), color)?;
        self.fill_rect(&row_rect(x, y + h as i32 - 1, w as i32), color)?;
        self.fill_rect(&Rectangle::new(Point::new(x, y), Size::new(1, h)), color)?;
        self.fill_rect(
            &Rectangle::new(Point::new(x + w as i32 - 1, y), Size::new(1, h)),
            color,
        )?;
        Ok(())
    }
}

const fn screen_rect() -> Rectangle {
    Rectangle::new(
        Point::new(0, 0),
        Size::new(WIDTH as u32, HEIGHT as u32),
    )
}

fn row_rect(x: i32, y: i32, width: i32) -> Rectangle {
    Rectangle::new(Point::new(x, y), Size::new(width.max(0) as u32, 1))
}

/// RGB888 to RGB565, truncating the low bits per channel.
const fn rgb565(c: RGB8) -> u16 {
    ((c.r as u16 >> 3) << 11) | ((c.g as u16 >> 2) << 5) | (c.b as u16 >> 3)
}

/// Width of the apex-up triangle at `row` (0 = apex, `h - 1` = base).
fn triangle_span(row: i32, w: i32, h: i32) -> i32 {
    ((row + 1) * w / h).clamp(1, w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb565_known_colors() {
        assert_eq!(rgb565(RGB8 { r: 255, g: 0, b: 0 }), 0xF800);
        assert_eq!(rgb565(RGB8 { r: 0, g: 255, b: 0 }), 0x07E0);
        assert_eq!(rgb565(RGB8 { r: 0, g: 0, b: 255 }), 0x001F);
        assert_eq!(rgb565(RGB8 { r: 255, g: 255, b: 255 }), 0xFFFF);
        assert_eq!(rgb565(RGB8 { r: 0x60, g: 0x44, b: 0x70 }), 0x622E);
    }

    #[test]
    fn triangle_narrows_to_the_apex() {
        // 20x15 pointer: one pixel at the apex, full width at the base.
        assert_eq!(triangle_span(0, 20, 15), 1);
        assert_eq!(triangle_span(7, 20, 15), 10);
        assert_eq!(triangle_span(14, 20, 15), 20);
        // Monotonic growth, no overshoot.
        for row in 1..15 {
            assert!(triangle_span(row, 20, 15) >= triangle_span(row - 1, 20, 15));
            assert!(triangle_span(row, 20, 15) <= 20);
        }
    }

    #[test]
    fn pointer_bounds_track_last_draw() {
        let config = PanelConfig::default();
        let mut d = Display::new(&config);
        assert!(d.last_pointer.is_none());

        d.draw_pointer(150, None).unwrap();
        let bounds = d.last_pointer.unwrap();
        assert_eq!(bounds.top_left, Point::new(150, config.layout.pointer_y));
        assert_eq!(bounds.size, Size::new(20, 15));

        d.clear_pointer().unwrap();
        assert!(d.last_pointer.is_none());
    }
}
