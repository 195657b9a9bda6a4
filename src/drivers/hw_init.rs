//! One-shot hardware peripheral initialization.
//!
//! Configures the touch ADC channels and plate GPIOs, the LCD and LED
//! ring SPI devices, the I2S speaker channel, the SPIFFS sound
//! partition, and the task watchdog using raw ESP-IDF sys calls.
//! Called once from `main()` before the touch loop starts.

#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicBool, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    SpiInitFailed(i32),
    I2sInitFailed(i32),
    SpiffsMountFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::SpiInitFailed(rc) => write!(f, "SPI bus/device init failed (rc={})", rc),
            Self::I2sInitFailed(rc) => write!(f, "I2S channel init failed (rc={})", rc),
            Self::SpiffsMountFailed(rc) => write!(f, "SPIFFS mount failed (rc={})", rc),
        }
    }
}

/// VFS mount point for the cue WAV files.
pub const SPIFFS_BASE_PATH: &str = "/sounds";

/// ADC1 channels sensing the touch wipers (GPIO 5 / GPIO 6 on the S3).
pub const ADC1_CH_TOUCH_XP: u32 = 4;
pub const ADC1_CH_TOUCH_YP: u32 = 5;

/// Largest single SPI transaction the buses accept (bytes).
pub const SPI_MAX_TRANSFER: usize = 4096;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the touch loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio()?;
        init_spi()?;
        init_i2s()?;
        init_spiffs()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot, touch wipers) ───────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// touch-loop read path.  No concurrent access is possible because
/// `init_adc()` completes before the touch loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), ADC1_CH_TOUCH_XP, &chan_cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), ADC1_CH_TOUCH_YP, &chan_cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    info!("hw_init: ADC1 configured (CH4=X+ wiper, CH5=Y+ wiper)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract — single-threaded touch-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return 0;
    }
    raw.max(0) as u16
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(_channel: u32) -> u16 {
    0
}

// ── GPIO ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio() -> Result<(), HwInitError> {
    // Fixed-direction outputs: LCD control lines and backlight.
    let output_pins = [
        pins::LCD_DC_GPIO,
        pins::LCD_RST_GPIO,
        pins::LCD_BACKLIGHT_GPIO,
    ];

    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        unsafe { gpio_set_level(pin, 0) };
    }

    // Touch plate pins start as floating inputs; the touchscreen driver
    // re-biases them per axis measurement.
    let touch_pins = [
        pins::TOUCH_XP_GPIO,
        pins::TOUCH_XM_GPIO,
        pins::TOUCH_YP_GPIO,
        pins::TOUCH_YM_GPIO,
    ];

    for &pin in &touch_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }

    info!("hw_init: GPIO configured (LCD control + touch plates)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured pin;
    // touch-loop only.
    unsafe {
        gpio_set_level(pin, if high { 1 } else { 0 });
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

/// Re-point a touch plate pin as a push-pull output.
#[cfg(target_os = "espidf")]
pub fn gpio_mode_output(pin: i32) {
    // SAFETY: direction change on an already-initialized pin; touch-loop only.
    unsafe {
        gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_OUTPUT);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_mode_output(_pin: i32) {}

/// Re-point a touch plate pin as a floating input (sense / high-Z).
#[cfg(target_os = "espidf")]
pub fn gpio_mode_input(pin: i32) {
    // SAFETY: as gpio_mode_output.
    unsafe {
        gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_INPUT);
        gpio_set_pull_mode(pin, gpio_pull_mode_t_GPIO_FLOATING);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_mode_input(_pin: i32) {}

// ── Delays ────────────────────────────────────────────────────

/// Blocking millisecond delay for driver bring-up sequences.
pub fn delay_ms(ms: u32) {
    std::thread::sleep(core::time::Duration::from_millis(u64::from(ms)));
}

/// Microsecond settle delay between plate bias and ADC sample.
#[cfg(target_os = "espidf")]
pub fn settle_us(us: u32) {
    // SAFETY: busy-wait helper in ROM; no shared state.
    unsafe {
        esp_rom_delay_us(us);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn settle_us(_us: u32) {}

// ── SPI (LCD on SPI2, LED ring on SPI3) ───────────────────────

#[cfg(target_os = "espidf")]
static mut LCD_SPI: spi_device_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut RING_SPI: spi_device_handle_t = core::ptr::null_mut();

/// SAFETY: Written once in `init_spi()`; afterwards only read from the
/// touch loop (display writes) — no concurrent access.
#[cfg(target_os = "espidf")]
unsafe fn lcd_spi() -> spi_device_handle_t {
    unsafe { LCD_SPI }
}

/// SAFETY: As `lcd_spi()`, for the ring device on SPI3.
#[cfg(target_os = "espidf")]
unsafe fn ring_spi() -> spi_device_handle_t {
    unsafe { RING_SPI }
}

#[cfg(target_os = "espidf")]
unsafe fn init_spi() -> Result<(), HwInitError> {
    unsafe {
        // LCD bus: SCK + MOSI only, hardware CS.
        let mut bus = spi_bus_config_t::default();
        bus.__bindgen_anon_1.mosi_io_num = pins::LCD_MOSI_GPIO;
        bus.__bindgen_anon_2.miso_io_num = -1;
        bus.sclk_io_num = pins::LCD_SCK_GPIO;
        bus.__bindgen_anon_3.quadwp_io_num = -1;
        bus.__bindgen_anon_4.quadhd_io_num = -1;
        bus.max_transfer_sz = SPI_MAX_TRANSFER as i32;
        let ret = spi_bus_initialize(
            spi_host_device_t_SPI2_HOST,
            &bus,
            spi_common_dma_t_SPI_DMA_CH_AUTO,
        );
        if ret != ESP_OK as i32 {
            return Err(HwInitError::SpiInitFailed(ret));
        }

        let mut dev = spi_device_interface_config_t::default();
        dev.clock_speed_hz = pins::LCD_SPI_HZ as i32;
        dev.mode = 0;
        dev.spics_io_num = pins::LCD_CS_GPIO;
        dev.queue_size = 4;
        let ret = spi_bus_add_device(spi_host_device_t_SPI2_HOST, &dev, &raw mut LCD_SPI);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::SpiInitFailed(ret));
        }

        // Ring bus: MOSI alone carries the WS2812 waveform.
        let mut bus = spi_bus_config_t::default();
        bus.__bindgen_anon_1.mosi_io_num = pins::RING_DATA_GPIO;
        bus.__bindgen_anon_2.miso_io_num = -1;
        bus.sclk_io_num = -1;
        bus.__bindgen_anon_3.quadwp_io_num = -1;
        bus.__bindgen_anon_4.quadhd_io_num = -1;
        bus.max_transfer_sz = SPI_MAX_TRANSFER as i32;
        let ret = spi_bus_initialize(
            spi_host_device_t_SPI3_HOST,
            &bus,
            spi_common_dma_t_SPI_DMA_CH_AUTO,
        );
        if ret != ESP_OK as i32 {
            return Err(HwInitError::SpiInitFailed(ret));
        }

        let mut dev = spi_device_interface_config_t::default();
        dev.clock_speed_hz = pins::RING_SPI_HZ as i32;
        dev.mode = 0;
        dev.spics_io_num = -1;
        dev.queue_size = 2;
        let ret = spi_bus_add_device(spi_host_device_t_SPI3_HOST, &dev, &raw mut RING_SPI);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::SpiInitFailed(ret));
        }
    }

    info!(
        "hw_init: SPI configured (SPI2=LCD @ {} MHz, SPI3=ring)",
        pins::LCD_SPI_HZ / 1_000_000
    );
    Ok(())
}

#[cfg(target_os = "espidf")]
fn spi_write(handle: spi_device_handle_t, bytes: &[u8]) -> i32 {
    if bytes.is_empty() {
        return 0;
    }
    // Callers chunk under SPI_MAX_TRANSFER.
    let mut trans = spi_transaction_t::default();
    trans.length = bytes.len() * 8;
    trans.__bindgen_anon_1.tx_buffer = bytes.as_ptr().cast();
    // SAFETY: handle was created in init_spi(); the transaction borrows
    // `bytes` only for the duration of this blocking call.
    unsafe { spi_device_transmit(handle, &mut trans) }
}

/// Transmit one encoded ring frame.  Returns the ESP-IDF return code.
#[cfg(target_os = "espidf")]
pub fn ring_spi_write(frame: &[u8]) -> i32 {
    // SAFETY: ring_spi() contract — handle written once during init.
    spi_write(unsafe { ring_spi() }, frame)
}

#[cfg(not(target_os = "espidf"))]
pub fn ring_spi_write(_frame: &[u8]) -> i32 {
    0
}

/// Send one LCD command byte followed by its parameter bytes.
#[cfg(target_os = "espidf")]
pub fn lcd_write_cmd(cmd: u8, params: &[u8]) -> i32 {
    gpio_write(pins::LCD_DC_GPIO, false);
    // SAFETY: lcd_spi() contract — handle written once during init.
    let rc = spi_write(unsafe { lcd_spi() }, &[cmd]);
    if rc != 0 {
        return rc;
    }
    lcd_write_data(params)
}

#[cfg(not(target_os = "espidf"))]
pub fn lcd_write_cmd(_cmd: u8, _params: &[u8]) -> i32 {
    0
}

/// Send raw LCD data bytes (parameters or pixel payload).
#[cfg(target_os = "espidf")]
pub fn lcd_write_data(data: &[u8]) -> i32 {
    if data.is_empty() {
        return 0;
    }
    gpio_write(pins::LCD_DC_GPIO, true);
    let mut rc = 0;
    for chunk in data.chunks(SPI_MAX_TRANSFER) {
        // SAFETY: lcd_spi() contract — handle written once during init.
        rc = spi_write(unsafe { lcd_spi() }, chunk);
        if rc != 0 {
            break;
        }
    }
    rc
}

#[cfg(not(target_os = "espidf"))]
pub fn lcd_write_data(_data: &[u8]) -> i32 {
    0
}

/// Push `count` RGB565 pixels of one color into the current window
/// (big-endian byte pairs, chunked under the transfer cap).
#[cfg(target_os = "espidf")]
pub fn lcd_push_pixels(color: u16, count: u32) -> i32 {
    const CHUNK_PIXELS: usize = 1024;
    let mut chunk = [0u8; CHUNK_PIXELS * 2];
    for pair in chunk.chunks_exact_mut(2) {
        pair[0] = (color >> 8) as u8;
        pair[1] = color as u8;
    }
    let mut remaining = count as usize;
    while remaining > 0 {
        let n = remaining.min(CHUNK_PIXELS);
        let rc = lcd_write_data(&chunk[..n * 2]);
        if rc != 0 {
            return rc;
        }
        remaining -= n;
    }
    0
}

#[cfg(not(target_os = "espidf"))]
pub fn lcd_push_pixels(_color: u16, _count: u32) -> i32 {
    0
}

pub fn lcd_backlight(on: bool) {
    gpio_write(pins::LCD_BACKLIGHT_GPIO, on);
}

/// Hardware reset pulse: RST low 10 ms, then 120 ms for the controller
/// to reload its defaults.
pub fn lcd_reset_pulse() {
    gpio_write(pins::LCD_RST_GPIO, false);
    delay_ms(10);
    gpio_write(pins::LCD_RST_GPIO, true);
    delay_ms(120);
}

// ── I2S (speaker amplifier) ───────────────────────────────────

#[cfg(target_os = "espidf")]
static mut I2S_TX: i2s_chan_handle_t = core::ptr::null_mut();

/// SAFETY: Written once in `init_i2s()`; afterwards only used under the
/// audio playback lock, one cue thread at a time.
#[cfg(target_os = "espidf")]
unsafe fn i2s_tx() -> i2s_chan_handle_t {
    unsafe { I2S_TX }
}

/// Cue files ship at this rate; `i2s_set_rate` retunes per WAV header.
pub const I2S_DEFAULT_RATE_HZ: u32 = 22_050;

#[cfg(target_os = "espidf")]
fn i2s_std_cfg(rate_hz: u32) -> i2s_std_config_t {
    let mut cfg = i2s_std_config_t::default();
    cfg.clk_cfg.sample_rate_hz = rate_hz;
    cfg.clk_cfg.clk_src = soc_periph_i2s_clk_src_t_I2S_CLK_SRC_DEFAULT;
    cfg.clk_cfg.mclk_multiple = i2s_mclk_multiple_t_I2S_MCLK_MULTIPLE_256;
    cfg.slot_cfg.data_bit_width = i2s_data_bit_width_t_I2S_DATA_BIT_WIDTH_16BIT;
    cfg.slot_cfg.slot_bit_width = i2s_slot_bit_width_t_I2S_SLOT_BIT_WIDTH_AUTO;
    cfg.slot_cfg.slot_mode = i2s_slot_mode_t_I2S_SLOT_MODE_MONO;
    cfg.slot_cfg.slot_mask = i2s_std_slot_mask_t_I2S_STD_SLOT_LEFT;
    cfg.slot_cfg.ws_width = 16;
    cfg.slot_cfg.bit_shift = true;
    cfg.gpio_cfg.mclk = -1;
    cfg.gpio_cfg.bclk = pins::I2S_BCLK_GPIO;
    cfg.gpio_cfg.ws = pins::I2S_LRCLK_GPIO;
    cfg.gpio_cfg.dout = pins::I2S_DOUT_GPIO;
    cfg.gpio_cfg.din = -1;
    cfg
}

#[cfg(target_os = "espidf")]
unsafe fn init_i2s() -> Result<(), HwInitError> {
    unsafe {
        let mut chan_cfg = i2s_chan_config_t::default();
        chan_cfg.id = i2s_port_t_I2S_NUM_0;
        chan_cfg.role = i2s_role_t_I2S_ROLE_MASTER;
        chan_cfg.dma_desc_num = 4;
        chan_cfg.dma_frame_num = 240;
        chan_cfg.auto_clear = true;
        let ret = i2s_new_channel(&chan_cfg, &raw mut I2S_TX, core::ptr::null_mut());
        if ret != ESP_OK as i32 {
            return Err(HwInitError::I2sInitFailed(ret));
        }

        let std_cfg = i2s_std_cfg(I2S_DEFAULT_RATE_HZ);
        let ret = i2s_channel_init_std_mode(i2s_tx(), &std_cfg);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::I2sInitFailed(ret));
        }

        let ret = i2s_channel_enable(i2s_tx());
        if ret != ESP_OK as i32 {
            return Err(HwInitError::I2sInitFailed(ret));
        }
    }

    info!(
        "hw_init: I2S speaker channel up at {} Hz",
        I2S_DEFAULT_RATE_HZ
    );
    Ok(())
}

/// Retune the I2S clock for a cue's sample rate.  Returns the rc.
#[cfg(target_os = "espidf")]
pub fn i2s_set_rate(rate_hz: u32) -> i32 {
    // SAFETY: i2s_tx() contract — serialized by the audio playback lock.
    unsafe {
        let ret = i2s_channel_disable(i2s_tx());
        if ret != ESP_OK as i32 {
            return ret;
        }
        let clk = i2s_std_cfg(rate_hz).clk_cfg;
        let ret = i2s_channel_reconfig_std_clock(i2s_tx(), &clk);
        if ret != ESP_OK as i32 {
            return ret;
        }
        i2s_channel_enable(i2s_tx())
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn i2s_set_rate(_rate_hz: u32) -> i32 {
    0
}

/// Blocking PCM write into the I2S DMA queue.  Returns the rc.
#[cfg(target_os = "espidf")]
pub fn i2s_write(pcm: &[u8]) -> i32 {
    let mut written: usize = 0;
    // SAFETY: i2s_tx() contract — serialized by the audio playback lock.
    unsafe { i2s_channel_write(i2s_tx(), pcm.as_ptr().cast(), pcm.len(), &mut written, 1_000) }
}

#[cfg(not(target_os = "espidf"))]
pub fn i2s_write(_pcm: &[u8]) -> i32 {
    0
}

// ── SPIFFS (cue file storage) ─────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_spiffs() -> Result<(), HwInitError> {
    let conf = esp_vfs_spiffs_conf_t {
        base_path: c"/sounds".as_ptr(),
        partition_label: core::ptr::null(),
        max_files: 4,
        format_if_mount_failed: false,
    };
    // SAFETY: the conf struct and its path literal outlive the call.
    let ret = unsafe { esp_vfs_spiffs_register(&conf) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::SpiffsMountFailed(ret));
    }
    info!("hw_init: SPIFFS mounted at {}", SPIFFS_BASE_PATH);
    Ok(())
}

// ── Task watchdog ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static TWDT_SUBSCRIBED: AtomicBool = AtomicBool::new(false);

/// Subscribe the main task to the TWDT (10 s timeout, panic on trip).
/// A wedged touch loop reboots the panel instead of freezing it.
#[cfg(target_os = "espidf")]
pub fn watchdog_subscribe() {
    // SAFETY: TWDT reconfigure/add run once from main before the loop.
    unsafe {
        let cfg = esp_task_wdt_config_t {
            timeout_ms: 10_000,
            idle_core_mask: 0,
            trigger_panic: true,
        };
        let ret = esp_task_wdt_reconfigure(&cfg);
        if ret != ESP_OK as i32 {
            log::warn!("watchdog: reconfigure returned {}", ret);
        }
        let ret = esp_task_wdt_add(core::ptr::null_mut());
        if ret == ESP_OK as i32 {
            TWDT_SUBSCRIBED.store(true, Ordering::Relaxed);
            info!("watchdog: subscribed (10 s timeout, panic on trigger)");
        } else {
            log::warn!("watchdog: failed to subscribe ({})", ret);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn watchdog_subscribe() {
    log::info!("watchdog(sim): no-op");
}

/// Feed the watchdog.  The touch loop calls this every iteration.
#[cfg(target_os = "espidf")]
pub fn watchdog_feed() {
    if TWDT_SUBSCRIBED.load(Ordering::Relaxed) {
        // SAFETY: reset touches only the calling task's TWDT entry.
        unsafe {
            esp_task_wdt_reset();
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn watchdog_feed() {}
