//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements | Connects to                       |
//! |------------|------------|-----------------------------------|
//! | `hardware` | TouchPort  | 4-wire resistive plates + ADC1    |
//! |            | RingPort   | WS2812 ring over SPI3             |
//! |            | ScreenPort | ILI9341 LCD over SPI2             |
//! |            | AudioPort  | I2S WAV cue playback              |
//! | `log_sink` | EventSink  | Serial log output                 |

pub mod hardware;
pub mod log_sink;
