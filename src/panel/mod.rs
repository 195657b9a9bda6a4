//! Panel core — pure domain logic, zero I/O.
//!
//! The sample-to-output reconciliation loop lives here: raw touch
//! samples become debounced presses ([`sampler`]), presses become state
//! mutations plus a side-effect batch ([`dispatcher`]), and the batch is
//! driven into the output ports ([`renderer`]). Hardware access only
//! happens through the traits in [`ports`], so every module in this
//! tree builds and tests on the host.

pub mod dispatcher;
pub mod events;
pub mod ports;
pub mod registry;
pub mod renderer;
pub mod sampler;
pub mod service;
pub mod state;
