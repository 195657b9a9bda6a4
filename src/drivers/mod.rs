//! Peripheral drivers and hardware initialisation.

pub mod audio;
pub mod display;
pub mod hw_init;
pub mod lightring;
pub mod touchscreen;
