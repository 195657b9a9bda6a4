//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured panel events to the
//! ESP-IDF logger (which goes to UART / USB-CDC in production).
//! A future provisioning or telemetry adapter would implement the same
//! trait.

use log::{info, warn};

use crate::panel::events::PanelEvent;
use crate::panel::ports::EventSink;

/// Adapter that logs every [`PanelEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &PanelEvent) {
        match *event {
            PanelEvent::Started { level } => {
                info!("START | level={} ring=dark pointer=parked", level);
            }
            PanelEvent::Pressed(button) => {
                info!("PRESS | {}", button);
            }
            PanelEvent::ColorChanged { from, to } => {
                info!(
                    "COLOR | {} -> {}",
                    from.map_or("none", |color| color.name()),
                    to,
                );
            }
            PanelEvent::LevelChanged { from, to } => {
                info!("LEVEL | stop {} -> {}", from, to);
            }
            PanelEvent::OutputFault(fault) => {
                warn!("FAULT | output degraded: {}", fault);
            }
        }
    }
}
