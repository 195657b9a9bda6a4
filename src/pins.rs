//! GPIO / peripheral pin assignments for the ring light panel board.
//!
//! Single source of truth — every driver references this module rather
//! than hard-coding pin numbers.  Change a pin here and it propagates
//! everywhere.

// ---------------------------------------------------------------------------
// Touch surface (4-wire resistive, plates shared with ADC1)
// ---------------------------------------------------------------------------

/// X+ plate.  Driven HIGH for the horizontal measurement; sensed on
/// ADC1 channel 4 (GPIO 5 on ESP32-S3) for the vertical one.
pub const TOUCH_XP_GPIO: i32 = 5;
/// Y+ plate.  Sensed on ADC1 channel 5 (GPIO 6) for the horizontal
/// measurement; driven HIGH for the vertical one.
pub const TOUCH_YP_GPIO: i32 = 6;
/// X− plate.  Driven LOW during the horizontal measurement.
pub const TOUCH_XM_GPIO: i32 = 7;
/// Y− plate.  Driven LOW during the vertical measurement.
pub const TOUCH_YM_GPIO: i32 = 8;

// ---------------------------------------------------------------------------
// LCD panel (ILI9341-class, SPI2)
// ---------------------------------------------------------------------------

pub const LCD_CS_GPIO: i32 = 10;
pub const LCD_MOSI_GPIO: i32 = 11;
pub const LCD_SCK_GPIO: i32 = 12;
/// Data/command select: LOW = command byte, HIGH = parameters/pixels.
pub const LCD_DC_GPIO: i32 = 13;
/// Active-low hardware reset.
pub const LCD_RST_GPIO: i32 = 14;
/// Backlight enable (active HIGH).
pub const LCD_BACKLIGHT_GPIO: i32 = 21;

/// SPI clock for the panel.  ILI9341 tops out near 10 MHz for reads but
/// takes pixel writes at 40 MHz.
pub const LCD_SPI_HZ: u32 = 40_000_000;

// ---------------------------------------------------------------------------
// LED ring (WS2812B data over SPI3 MOSI)
// ---------------------------------------------------------------------------

/// Ring data line.  The SPI peripheral shapes the WS2812 waveform; no
/// clock or CS leaves the chip.
pub const RING_DATA_GPIO: i32 = 38;

/// 3 SPI bits encode one WS2812 bit, so 2.4 MHz yields the nominal
/// 800 kHz symbol rate.
pub const RING_SPI_HZ: u32 = 2_400_000;

// ---------------------------------------------------------------------------
// Audio (I²S class-D amplifier, MAX98357A-class)
// ---------------------------------------------------------------------------

pub const I2S_BCLK_GPIO: i32 = 15;
pub const I2S_LRCLK_GPIO: i32 = 16;
pub const I2S_DOUT_GPIO: i32 = 17;
