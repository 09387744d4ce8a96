//! Compact/full mode transition sequencer
//!
//! A toggle resizes the window, re-snaps it to the edges it was flush
//! against before the resize, then plays a short upward bounce. Only one
//! transition may be resizing at a time.

use std::time::Duration;

use tracing::debug;

use crate::constants::mode::{BOUNCE_DURATION_MS, BOUNCE_HEIGHT, RESIZE_DURATION_MS};
use crate::snapping::{Adsorption, lerp, progress, realign};
use crate::types::{Position, ScreenRect, Size, WindowGeometry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModePhase {
    #[default]
    Idle,
    Resizing {
        from: Size,
        to: Size,
        elapsed: Duration,
        adsorption: Adsorption,
        origin: Position,
    },
    Snapping {
        size: Size,
        adsorption: Adsorption,
        origin: Position,
    },
    Bouncing {
        anchor: Position,
        elapsed: Duration,
    },
}

/// Geometry changes for the presentation layer to apply after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeometryUpdate {
    pub size: Option<Size>,
    pub position: Option<Position>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeSwitch {
    phase: ModePhase,
}

impl ModeSwitch {
    pub fn is_idle(&self) -> bool {
        matches!(self.phase, ModePhase::Idle)
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.phase, ModePhase::Resizing { .. })
    }

    /// Where the window settles once the transition finishes, `None` when idle
    pub fn resting_position(&self, screen: ScreenRect) -> Option<Position> {
        match self.phase {
            ModePhase::Idle => None,
            ModePhase::Resizing { to, adsorption, origin, .. } => Some(realign(adsorption, origin, to, screen)),
            ModePhase::Snapping { size, adsorption, origin } => Some(realign(adsorption, origin, size, screen)),
            ModePhase::Bouncing { anchor, .. } => Some(anchor),
        }
    }

    /// Start a transition toward `target`. Returns `None` while a resize is
    /// already in flight.
    pub fn request_toggle(&self, window: WindowGeometry, screen: ScreenRect, target: Size) -> Option<Self> {
        if self.is_resizing() {
            debug!("Mode toggle ignored, resize in flight");
            return None;
        }

        // A bounce in progress is displaced upwards; start from its anchor
        let origin = match self.phase {
            ModePhase::Bouncing { anchor, .. } => anchor,
            _ => window.position(),
        };
        let settled = window.with_position(origin);

        Some(Self {
            phase: ModePhase::Resizing {
                from: window.size(),
                to: target,
                elapsed: Duration::ZERO,
                adsorption: Adsorption::capture(settled, screen),
                origin,
            },
        })
    }

    /// Advance by `elapsed`, returning the next sequencer and the geometry
    /// to apply.
    pub fn step(&self, elapsed: Duration, screen: ScreenRect) -> (Self, GeometryUpdate) {
        match self.phase {
            ModePhase::Idle => (*self, GeometryUpdate::default()),
            ModePhase::Resizing { from, to, elapsed: so_far, adsorption, origin } => {
                let resize = Duration::from_millis(RESIZE_DURATION_MS);
                let elapsed = (so_far + elapsed).min(resize);
                let t = progress(elapsed, resize);
                let size = Size::new(lerp(from.width, to.width, t), lerp(from.height, to.height, t));

                let phase = if elapsed >= resize {
                    ModePhase::Snapping { size: to, adsorption, origin }
                } else {
                    ModePhase::Resizing { from, to, elapsed, adsorption, origin }
                };
                (Self { phase }, GeometryUpdate { size: Some(size), position: None })
            }
            ModePhase::Snapping { size, adsorption, origin } => {
                let anchor = realign(adsorption, origin, size, screen);
                let next = Self { phase: ModePhase::Bouncing { anchor, elapsed: Duration::ZERO } };
                (next, GeometryUpdate { size: None, position: Some(anchor) })
            }
            ModePhase::Bouncing { anchor, elapsed: so_far } => {
                let bounce = Duration::from_millis(BOUNCE_DURATION_MS);
                let elapsed = (so_far + elapsed).min(bounce);
                let position = anchor.offset(0, bounce_offset(progress(elapsed, bounce)));

                let phase = if elapsed >= bounce {
                    ModePhase::Idle
                } else {
                    ModePhase::Bouncing { anchor, elapsed }
                };
                (Self { phase }, GeometryUpdate { size: None, position: Some(position) })
            }
        }
    }
}

/// Vertical bounce displacement: keyframes 0 -> -8 -> 0 at t = 0, 0.5, 1
pub fn bounce_offset(t: f32) -> i32 {
    let t = t.clamp(0.0, 1.0);
    let rise = if t <= 0.5 { t * 2.0 } else { (1.0 - t) * 2.0 };
    -(BOUNCE_HEIGHT as f32 * rise).round() as i32
}
