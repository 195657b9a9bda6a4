//! 4-wire resistive touchscreen driver.
//!
//! Measures touch position by biasing one plate and sampling the
//! opposite wiper through an ESP32-S3 ADC channel, with a pressure
//! check before each position read and a two-point linear calibration
//! from raw ADC counts to screen pixels.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: switches the plate GPIOs per axis and reads ADC1 via the
//! oneshot API (initialised by hw_init).
//! On host/test: reads an injected raw sample from statics, mapped
//! through the same calibration path.

use embedded_graphics::prelude::Point;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

#[cfg(not(target_os = "espidf"))]
static SIM_TOUCH_ACTIVE: AtomicBool = AtomicBool::new(false);
#[cfg(not(target_os = "espidf"))]
static SIM_TOUCH_RAW_X: AtomicU16 = AtomicU16::new(0);
#[cfg(not(target_os = "espidf"))]
static SIM_TOUCH_RAW_Y: AtomicU16 = AtomicU16::new(0);

/// Inject a raw touch sample (ADC counts, not pixels).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_touch(raw_x: u16, raw_y: u16) {
    SIM_TOUCH_RAW_X.store(raw_x, Ordering::Relaxed);
    SIM_TOUCH_RAW_Y.store(raw_y, Ordering::Relaxed);
    SIM_TOUCH_ACTIVE.store(true, Ordering::Relaxed);
}

/// Release the injected touch.
#[cfg(not(target_os = "espidf"))]
pub fn sim_clear_touch() {
    SIM_TOUCH_ACTIVE.store(false, Ordering::Relaxed);
}

/// The sim statics are process-wide; tests that drive them hold this
/// lock so parallel test threads cannot interleave injections.
#[cfg(all(test, not(target_os = "espidf")))]
pub(crate) fn sim_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Plate resistance divider must sag at least this much below full
/// scale before a contact counts as a press.
const PRESSURE_MIN: u16 = 300;

/// Microseconds for the plate bias to settle before sampling.
#[cfg(target_os = "espidf")]
const SETTLE_US: u32 = 20;

/// Two-point raw-to-pixel calibration, one pair of bounds per axis.
#[derive(Debug, Clone, Copy)]
pub struct TouchCalibration {
    pub raw_x_min: u16,
    pub raw_x_max: u16,
    pub raw_y_min: u16,
    pub raw_y_max: u16,
}

impl Default for TouchCalibration {
    fn default() -> Self {
        Self {
            raw_x_min: 200,
            raw_x_max: 3800,
            raw_y_min: 240,
            raw_y_max: 3640,
        }
    }
}

pub struct Touchscreen {
    cal: TouchCalibration,
    width: i32,
    height: i32,
}

impl Touchscreen {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            cal: TouchCalibration::default(),
            width,
            height,
        }
    }

    pub fn set_calibration(&mut self, cal: TouchCalibration) {
        self.cal = cal;
    }

    /// One touch sample: `Some(pixel)` while a finger presses hard
    /// enough, `None` otherwise.
    #[cfg(target_os = "espidf")]
    pub fn read_point(&mut self) -> Option<Point> {
        if !self.pressed() {
            return None;
        }
        let raw_x = self.sample_x();
        let raw_y = self.sample_y();
        self.release_plates();
        Some(self.map(raw_x, raw_y))
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read_point(&mut self) -> Option<Point> {
        if !SIM_TOUCH_ACTIVE.load(Ordering::Relaxed) {
            return None;
        }
        let raw_x = SIM_TOUCH_RAW_X.load(Ordering::Relaxed);
        let raw_y = SIM_TOUCH_RAW_Y.load(Ordering::Relaxed);
        Some(self.map(raw_x, raw_y))
    }

    /// Pressure check: X+ low and Y- high puts the plates in series, so
    /// the Y+ wiper reads near full scale until a touch bridges them.
    #[cfg(target_os = "espidf")]
    fn pressed(&self) -> bool {
        hw_init::gpio_mode_output(pins::TOUCH_XP_GPIO);
        hw_init::gpio_write(pins::TOUCH_XP_GPIO, false);
        hw_init::gpio_mode_output(pins::TOUCH_YM_GPIO);
        hw_init::gpio_write(pins::TOUCH_YM_GPIO, true);
        hw_init::gpio_mode_input(pins::TOUCH_XM_GPIO);
        hw_init::gpio_mode_input(pins::TOUCH_YP_GPIO);
        hw_init::settle_us(SETTLE_US);

        let z = hw_init::adc1_read(hw_init::ADC1_CH_TOUCH_YP);
        4095u16.saturating_sub(z) >= PRESSURE_MIN
    }

    /// Bias the X plate end to end and sample the Y+ wiper.
    #[cfg(target_os = "espidf")]
    fn sample_x(&self) -> u16 {
        hw_init::gpio_mode_output(pins::TOUCH_XP_GPIO);
        hw_init::gpio_write(pins::TOUCH_XP_GPIO, true);
        hw_init::gpio_mode_output(pins::TOUCH_XM_GPIO);
        hw_init::gpio_write(pins::TOUCH_XM_GPIO, false);
        hw_init::gpio_mode_input(pins::TOUCH_YP_GPIO);
        hw_init::gpio_mode_input(pins::TOUCH_YM_GPIO);
        hw_init::settle_us(SETTLE_US);

        Self::sample_pair(hw_init::ADC1_CH_TOUCH_YP)
    }

    /// Bias the Y plate end to end and sample the X+ wiper.
    #[cfg(target_os = "espidf")]
    fn sample_y(&self) -> u16 {
        hw_init::gpio_mode_output(pins::TOUCH_YP_GPIO);
        hw_init::gpio_write(pins::TOUCH_YP_GPIO, true);
        hw_init::gpio_mode_output(pins::TOUCH_YM_GPIO);
        hw_init::gpio_write(pins::TOUCH_YM_GPIO, false);
        hw_init::gpio_mode_input(pins::TOUCH_XP_GPIO);
        hw_init::gpio_mode_input(pins::TOUCH_XM_GPIO);
        hw_init::settle_us(SETTLE_US);

        Self::sample_pair(hw_init::ADC1_CH_TOUCH_XP)
    }

    /// Two back-to-back reads averaged to knock down ADC noise.
    #[cfg(target_os = "espidf")]
    fn sample_pair(channel: u32) -> u16 {
        let a = u32::from(hw_init::adc1_read(channel));
        let b = u32::from(hw_init::adc1_read(channel));
        ((a + b) / 2) as u16
    }

    /// Park all four plate pins as floating inputs between samples.
    #[cfg(target_os = "espidf")]
    fn release_plates(&self) {
        hw_init::gpio_mode_input(pins::TOUCH_XP_GPIO);
        hw_init::gpio_mode_input(pins::TOUCH_XM_GPIO);
        hw_init::gpio_mode_input(pins::TOUCH_YP_GPIO);
        hw_init::gpio_mode_input(pins::TOUCH_YM_GPIO);
    }

    fn map(&self, raw_x: u16, raw_y: u16) -> Point {
        let x = map_axis(raw_x, self.cal.raw_x_min, self.cal.raw_x_max, self.width);
        let y = map_axis(raw_y, self.cal.raw_y_min, self.cal.raw_y_max, self.height);
        Point::new(x, y)
    }
}

/// Linear raw-to-pixel mapping, clamped into `0..span`.
fn map_axis(raw: u16, raw_min: u16, raw_max: u16, span: i32) -> i32 {
    if raw_max <= raw_min {
        return 0;
    }
    let clamped = raw.clamp(raw_min, raw_max);
    let offset = i32::from(clamped - raw_min);
    let range = i32::from(raw_max - raw_min);
    (offset * span / range).min(span - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_axis_spans_the_screen() {
        assert_eq!(map_axis(200, 200, 3800, 320), 0);
        assert_eq!(map_axis(3800, 200, 3800, 320), 319);
        assert_eq!(map_axis(2000, 200, 3800, 320), 160);
    }

    #[test]
    fn map_axis_clamps_out_of_band_raw() {
        assert_eq!(map_axis(0, 200, 3800, 320), 0);
        assert_eq!(map_axis(4095, 200, 3800, 320), 319);
    }

    #[test]
    fn map_axis_rejects_degenerate_calibration() {
        assert_eq!(map_axis(2000, 3000, 3000, 320), 0);
        assert_eq!(map_axis(2000, 3000, 100, 320), 0);
    }

    #[test]
    fn injected_touch_maps_through_calibration() {
        let _guard = sim_lock();
        let mut ts = Touchscreen::new(320, 240);

        sim_set_touch(2000, 1940);
        assert_eq!(ts.read_point(), Some(Point::new(160, 120)));

        sim_clear_touch();
        assert_eq!(ts.read_point(), None);
    }
}
