//! WAV cue playback over the I2S speaker channel.
//!
//! Each brightness stop has a short cue file named `<sound_dir>/<level>.wav`.
//! Playback happens on a detached thread so the touch loop never blocks
//! on audio; a module-wide lock serializes the I2S channel when cues
//! overlap. Only canonical 44-byte-header WAV files (16-bit mono PCM)
//! are accepted; the I2S clock is retuned to each cue's sample rate.

use core::fmt::Write as _;
use std::io::Read;
use std::sync::{Mutex, PoisonError};

use log::warn;

use crate::drivers::hw_init;
use crate::error::OutputError;

const WAV_HEADER_LEN: usize = 44;

/// PCM streamed to the DMA queue in chunks this size.
const STREAM_CHUNK: usize = 2048;

pub struct AudioPlayer {
    sound_dir: heapless::String<64>,
}

impl AudioPlayer {
    pub fn new(sound_dir: heapless::String<64>) -> Self {
        Self { sound_dir }
    }

    /// Fire the cue for `level` and return immediately. The cue plays
    /// (or logs why it could not) on its own thread.
    pub fn play(&self, level: u8) -> Result<(), OutputError> {
        let mut path = heapless::String::<80>::new();
        if write!(path, "{}/{}.wav", self.sound_dir, level).is_err() {
            return Err(OutputError::Audio("cue path too long"));
        }

        let spawned = std::thread::Builder::new()
            .name("audio-cue".into())
            .stack_size(8192)
            .spawn(move || {
                let _guard = playback_lock()
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                if let Err(reason) = play_blocking(&path) {
                    warn!("audio: cue {} skipped: {}", path, reason);
                }
            });
        if spawned.is_err() {
            return Err(OutputError::Audio("cue thread spawn failed"));
        }
        Ok(())
    }
}

/// One cue at a time on the I2S channel; later cues wait their turn.
fn playback_lock() -> &'static Mutex<()> {
    static LOCK: Mutex<()> = Mutex::new(());
    &LOCK
}

fn play_blocking(path: &str) -> Result<(), &'static str> {
    let mut file = std::fs::File::open(path).map_err(|_| "cue file missing")?;

    let mut header = [0u8; WAV_HEADER_LEN];
    file.read_exact(&mut header).map_err(|_| "cue file truncated")?;
    let info = parse_header(&header)?;
    if info.channels != 1 || info.bits_per_sample != 16 {
        return Err("cue must be 16-bit mono PCM");
    }

    if hw_init::i2s_set_rate(info.sample_rate) != 0 {
        return Err("sample rate change rejected");
    }

    let mut chunk = [0u8; STREAM_CHUNK];
    loop {
        let n = file.read(&mut chunk).map_err(|_| "cue read failed")?;
        if n == 0 {
            break;
        }
        if hw_init::i2s_write(&chunk[..n]) != 0 {
            return Err("i2s write failed");
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WavInfo {
    sample_rate: u32,
    channels: u16,
    bits_per_sample: u16,
}

/// Parse a canonical 44-byte WAV header: RIFF/WAVE magics, a 16-byte
/// `fmt ` chunk, linear PCM, `data` chunk immediately after.
fn parse_header(h: &[u8; WAV_HEADER_LEN]) -> Result<WavInfo, &'static str> {
    if &h[0..4] != b"RIFF" || &h[8..12] != b"WAVE" || &h[12..16] != b"fmt " {
        return Err("not a RIFF/WAVE file");
    }
    let format = u16::from_le_bytes([h[20], h[21]]);
    if format != 1 {
        return Err("not linear PCM");
    }
    if &h[36..40] != b"data" {
        return Err("missing data chunk");
    }

    let sample_rate = u32::from_le_bytes([h[24], h[25], h[26], h[27]]);
    if !(8_000..=48_000).contains(&sample_rate) {
        return Err("implausible sample rate");
    }

    Ok(WavInfo {
        sample_rate,
        channels: u16::from_le_bytes([h[22], h[23]]),
        bits_per_sample: u16::from_le_bytes([h[34], h[35]]),
    })
}
