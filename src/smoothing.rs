//! Exponential smoothing of speed bars, mode progress and label size
//!
//! Every value is a single-pole low-pass filter stepped on a fixed tick.
//! The decay constants are per tick, so elapsed frame time is converted
//! into whole ticks by [`TickClock`] before stepping.

use std::time::Duration;

use crate::constants::font::BASE_SIZE;
use crate::constants::smoothing::{
    FONT_DECAY, MAX_TICKS_PER_ADVANCE, MODE_DECAY, SATURATION_KBPS, TICK_MS, TRAFFIC_DECAY,
};
use crate::network::SpeedReading;

/// One filter step: `previous*decay + target*(1-decay)`, kept between
/// `previous` and `target`.
pub fn smooth(previous: f32, target: f32, decay: f32) -> f32 {
    let blended = previous * decay + target * (1.0 - decay);
    let (low, high) = if previous <= target { (previous, target) } else { (target, previous) };
    blended.clamp(low, high)
}

/// Bar fill target for a rate; full at 512 KB/s
pub fn traffic_ratio(kbps: f64) -> f32 {
    if !kbps.is_finite() {
        return 0.0;
    }
    (kbps / SATURATION_KBPS).clamp(0.0, 1.0) as f32
}

/// Resting mode progress for a display mode
pub fn mode_target(compact: bool) -> f32 {
    if compact { 1.0 } else { 0.0 }
}

/// Values blended toward their targets on every tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedState {
    pub download_anim: f32,
    pub upload_anim: f32,
    pub mode_progress: f32,
    pub font_size: f32,
}

impl SmoothedState {
    pub fn new(compact: bool) -> Self {
        Self {
            download_anim: 0.0,
            upload_anim: 0.0,
            mode_progress: mode_target(compact),
            font_size: BASE_SIZE,
        }
    }

    /// One tick. `font_target` is `None` in compact mode, where the label
    /// size is left alone.
    pub fn step(&self, reading: SpeedReading, compact: bool, font_target: Option<f32>) -> Self {
        Self {
            download_anim: smooth(self.download_anim, traffic_ratio(reading.download_kbps), TRAFFIC_DECAY),
            upload_anim: smooth(self.upload_anim, traffic_ratio(reading.upload_kbps), TRAFFIC_DECAY),
            mode_progress: smooth(self.mode_progress, mode_target(compact), MODE_DECAY),
            font_size: match font_target {
                Some(target) => smooth(self.font_size, target, FONT_DECAY),
                None => self.font_size,
            },
        }
    }
}

/// Converts variable frame time into whole animation ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickClock {
    pending: Duration,
}

impl TickClock {
    /// Number of ticks due after `elapsed`, capped; the remainder carries
    /// over to the next call.
    pub fn advance(self, elapsed: Duration) -> (Self, u32) {
        let tick = Duration::from_millis(TICK_MS);
        let pending = self.pending + elapsed;
        let due = (pending.as_millis() / tick.as_millis()) as u64;

        if due > MAX_TICKS_PER_ADVANCE as u64 {
            return (Self::default(), MAX_TICKS_PER_ADVANCE);
        }

        let remainder = pending - tick * due as u32;
        (Self { pending: remainder }, due as u32)
    }
}
