//! Fuzz target: configuration deserialization and the startup gate
//!
//! Feeds arbitrary bytes through serde_json into `PanelConfig` and, when
//! they parse, pushes the result through `PanelService::new`. Whatever
//! geometry or calibration the bytes describe, the gate must either
//! accept the config or return a typed fault — never panic.
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use libfuzzer_sys::fuzz_target;
use ringlight::config::PanelConfig;
use ringlight::panel::service::PanelService;
use ringlight::panel::state::BrightnessLevel;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = serde_json::from_slice::<PanelConfig>(data) else {
        return;
    };

    match PanelService::new(&config) {
        Ok(service) => {
            // A config that passed the gate starts in a coherent state.
            assert!(service.active_color().is_none());
            assert!(service.level().index() < BrightnessLevel::COUNT);
            // And must re-serialize cleanly.
            let _ = serde_json::to_string(&config);
        }
        Err(fault) => {
            // Typed rejection; the Display impl must hold up too.
            let _ = fault.to_string();
        }
    }
});
