//! Panel service — the orchestration core.
//!
//! [`PanelService`] owns the registry, sampler, dispatcher, and device
//! state, and exposes exactly two entry points: [`start`] for the boot
//! output sync and [`tick`] for one polling-loop iteration. All I/O
//! flows through the port traits injected at the call sites, so the
//! whole service runs against mocks on the host.
//!
//! [`start`]: PanelService::start
//! [`tick`]: PanelService::tick

use log::info;

use crate::config::PanelConfig;
use crate::error::{ConfigFault, Result};
use crate::panel::dispatcher::Dispatcher;
use crate::panel::events::PanelEvent;
use crate::panel::ports::{AudioPort, EventSink, RingPort, ScreenPort, TouchPort};
use crate::panel::registry::ButtonRegistry;
use crate::panel::renderer;
use crate::panel::sampler::InputSampler;
use crate::panel::state::{BrightnessLevel, CalibrationTable, DeviceState, SpotColor};

#[derive(Debug)]
pub struct PanelService {
    registry: ButtonRegistry,
    sampler: InputSampler,
    dispatcher: Dispatcher,
    state: DeviceState,
    tick_count: u64,
    press_count: u64,
}

impl PanelService {
    /// Construct the service, validating the entire configuration.
    ///
    /// This is the single startup gate: a config that passes here
    /// cannot fault at runtime.
    pub fn new(config: &PanelConfig) -> Result<Self> {
        let registry = ButtonRegistry::from_layout(&config.layout)?;
        let table = CalibrationTable::from_fractions(config.calibration)?;
        let default_level = BrightnessLevel::new(config.default_level)
            .ok_or(ConfigFault::LevelOutOfRange(config.default_level))?;
        let dispatcher = Dispatcher::new(config.palette, table, config.layout.pointer_slots()?);

        Ok(Self {
            registry,
            sampler: InputSampler::new(),
            dispatcher,
            state: DeviceState::new(default_level),
            tick_count: 0,
            press_count: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the outputs into the boot appearance and announce startup.
    pub fn start(
        &mut self,
        io: &mut (impl RingPort + ScreenPort + AudioPort),
        sink: &mut impl EventSink,
    ) {
        let effects = self.dispatcher.startup(self.state);
        renderer::apply(&effects, io, sink);
        sink.emit(&PanelEvent::Started {
            level: self.state.level(),
        });
        info!(
            "PanelService started: {} buttons, stop {}",
            self.registry.len(),
            self.state.level()
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// One polling-loop iteration: sample, debounce, dispatch, render.
    ///
    /// The `io` parameter satisfies every hardware port at once — one
    /// borrow for the whole tick, with the port boundary still explicit
    /// in the bound.
    pub fn tick(
        &mut self,
        io: &mut (impl TouchPort + RingPort + ScreenPort + AudioPort),
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        // 1. One raw sample through the debounce latch.
        let touch = io.read();
        let Some(press) = self.sampler.poll(touch, &self.registry) else {
            return;
        };
        self.press_count += 1;
        sink.emit(&PanelEvent::Pressed(press.button));

        // 2. Mutate state and collect the output batch.
        let previous = self.state;
        let effects = self.dispatcher.dispatch(press, &mut self.state);

        // 3. Drive the batch into the outputs. Faults are non-fatal:
        //    the state change above stands regardless.
        renderer::apply(&effects, io, sink);

        // 4. Announce what actually moved.
        if previous.active_color() != self.state.active_color() {
            if let Some(to) = self.state.active_color() {
                sink.emit(&PanelEvent::ColorChanged {
                    from: previous.active_color(),
                    to,
                });
            }
        }
        if previous.level() != self.state.level() {
            sink.emit(&PanelEvent::LevelChanged {
                from: previous.level(),
                to: self.state.level(),
            });
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Active spot color; `None` until the first spot press.
    pub fn active_color(&self) -> Option<SpotColor> {
        self.state.active_color()
    }

    /// Active brightness stop.
    pub fn level(&self) -> BrightnessLevel {
        self.state.level()
    }

    /// Polling iterations since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Debounced presses accepted since startup.
    pub fn press_count(&self) -> u64 {
        self.press_count
    }
}
