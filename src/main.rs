//! RingLight Firmware — Main Entry Point
//!
//! Hexagonal architecture around a polled touch loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  PanelIo                               LogEventSink      │
//! │  (Touch + Ring + Screen + Audio)       (EventSink)       │
//! │                                                          │
//! │  ──────────────── Port Trait Boundary ───────────────    │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │             PanelService (pure logic)              │  │
//! │  │  Sampler · Registry · Dispatcher · State · Render  │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
mod error;
mod pins;

pub mod panel;

mod adapters;
mod drivers;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{info, warn};

use adapters::hardware::PanelIo;
use adapters::log_sink::LogEventSink;
use config::PanelConfig;
use panel::service::PanelService;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  RingLight v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    drivers::hw_init::watchdog_subscribe();

    // ── 3. Configuration ──────────────────────────────────────
    // Defaults reproduce the shipped panel; a provisioning path can
    // deserialize a replacement layout here without touching code.
    let config = PanelConfig::default();

    // ── 4. Construct the panel core ───────────────────────────
    // A malformed layout (overlapping pads, bad calibration) is a
    // build-time mistake, not a runtime condition — refuse to start.
    let mut service = match PanelService::new(&config) {
        Ok(service) => service,
        Err(fault) => {
            log::error!("config rejected: {} — halting", fault);
            #[allow(clippy::empty_loop)]
            loop {}
        }
    };

    // ── 5. Construct adapters ─────────────────────────────────
    let mut io = PanelIo::new(&config);
    if let Err(e) = io.init_display(&config) {
        // The panel still works blind: ring and audio keep running,
        // and touch regions are positional, not screen-dependent.
        warn!("display init failed ({}), continuing without screen", e);
    }
    let mut sink = LogEventSink::new();

    // ── 6. Initial output sync ────────────────────────────────
    service.start(&mut io, &mut sink);

    info!(
        "Panel ready. Entering touch loop ({} ms poll).",
        config.poll_interval_ms
    );

    // ── 7. Touch loop ─────────────────────────────────────────
    loop {
        service.tick(&mut io, &mut sink);
        drivers::hw_init::watchdog_feed();
        drivers::hw_init::delay_ms(config.poll_interval_ms);
    }
}
