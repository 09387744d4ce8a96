//! Widget application state
//!
//! `WidgetState` is a plain value. Every operation returns the next state
//! instead of mutating in place, and nothing here paints or touches the
//! filesystem; the GUI decides when to redraw and `Widget` decides what to
//! persist.

use std::time::Duration;

use crate::config::Preferences;
use crate::constants::font::{BASE_SIZE, LABEL_INSET};
use crate::constants::mode::{
    COMPACT_LAYOUT_THRESHOLD, COMPACT_SIZE, DRAG_OPACITY, FADE_DURATION_MS, FADE_START_OPACITY,
    FULL_SIZE,
};
use crate::font::{TextMetrics, fit_font};
use crate::mode_switch::ModeSwitch;
use crate::network::{SpeedReading, format_percent, format_speed};
use crate::smoothing::{SmoothedState, TickClock};
use crate::snapping::{PositionTween, compute_snap_target, initial_position, progress, right_center};
use crate::types::{Position, ScreenRect, Size, WindowGeometry};

pub fn mode_size(compact: bool) -> Size {
    if compact { COMPACT_SIZE } else { FULL_SIZE }
}

/// Everything the presentation surface needs for one repaint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub download_anim: f32,
    pub upload_anim: f32,
    pub mode_progress: f32,
    pub font_size: f32,
    pub show_percentage: bool,
    pub download_kbps: f64,
    pub upload_kbps: f64,
    pub opacity: f32,
    pub compact: bool,
}

impl Frame {
    /// Vertical bars are painted while compact or mid-transition
    pub fn uses_compact_layout(&self) -> bool {
        self.compact || self.mode_progress > COMPACT_LAYOUT_THRESHOLD
    }

    pub fn download_label(&self) -> String {
        if self.show_percentage {
            format!("↓ {}", format_percent(self.download_anim))
        } else {
            format!("↓ {}", format_speed(self.download_kbps))
        }
    }

    pub fn upload_label(&self) -> String {
        if self.show_percentage {
            format!("↑ {}", format_percent(self.upload_anim))
        } else {
            format!("↑ {}", format_speed(self.upload_kbps))
        }
    }

    /// Both labels as one line, the text the font fit is measured on
    pub fn label_text(&self) -> String {
        format!("{}  {}", self.download_label(), self.upload_label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drag {
    /// Pointer offset from the window origin at press time
    pub grab: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetState {
    pub show_percentage: bool,
    pub compact_mode: bool,
    pub visible: bool,
    pub speed: SpeedReading,
    pub smoothed: SmoothedState,
    pub geometry: WindowGeometry,
    pub mode_switch: ModeSwitch,
    pub snap: Option<PositionTween>,
    pub drag: Option<Drag>,
    pub fade: Option<Duration>,
    clock: TickClock,
}

impl WidgetState {
    pub fn new(prefs: &Preferences, screen: ScreenRect) -> Self {
        let size = mode_size(prefs.compact_mode);
        let position = initial_position(prefs.window_position, size, screen);

        Self {
            show_percentage: prefs.show_percentage,
            compact_mode: prefs.compact_mode,
            visible: true,
            speed: SpeedReading::ZERO,
            smoothed: SmoothedState::new(prefs.compact_mode),
            geometry: WindowGeometry::from_parts(position, size),
            mode_switch: ModeSwitch::default(),
            snap: None,
            drag: None,
            fade: None,
            clock: TickClock::default(),
        }
    }

    pub fn with_speed(&self, reading: SpeedReading) -> Self {
        Self { speed: reading, ..self.clone() }
    }

    pub fn frame(&self) -> Frame {
        Frame {
            download_anim: self.smoothed.download_anim,
            upload_anim: self.smoothed.upload_anim,
            mode_progress: self.smoothed.mode_progress,
            font_size: self.smoothed.font_size,
            show_percentage: self.show_percentage,
            download_kbps: self.speed.download_kbps,
            upload_kbps: self.speed.upload_kbps,
            opacity: self.opacity(),
            compact: self.compact_mode,
        }
    }

    pub fn opacity(&self) -> f32 {
        let drag = if self.drag.is_some() { DRAG_OPACITY } else { 1.0 };
        let fade = match self.fade {
            Some(elapsed) => {
                let t = progress(elapsed, Duration::from_millis(FADE_DURATION_MS));
                FADE_START_OPACITY + (1.0 - FADE_START_OPACITY) * t
            }
            None => 1.0,
        };
        drag * fade
    }

    /// Where the window comes to rest once running animations finish
    pub fn resting_position(&self, screen: ScreenRect) -> Position {
        if let Some(tween) = self.snap {
            return tween.to;
        }
        self.mode_switch.resting_position(screen).unwrap_or_else(|| self.geometry.position())
    }

    fn font_target(&self, metrics: &dyn TextMetrics) -> f32 {
        let text_width = metrics.measure(&self.frame().label_text(), BASE_SIZE);
        let available = (self.geometry.width - LABEL_INSET) as f32;
        fit_font(text_width, available, BASE_SIZE)
    }

    /// Advance all animations by `elapsed`
    pub fn advance(&self, elapsed: Duration, screen: ScreenRect, metrics: &dyn TextMetrics) -> Self {
        let mut next = self.clone();

        let (clock, ticks) = self.clock.advance(elapsed);
        next.clock = clock;
        for _ in 0..ticks {
            let font_target = (!next.compact_mode).then(|| next.font_target(metrics));
            next.smoothed = next.smoothed.step(next.speed, next.compact_mode, font_target);
        }

        let (mode_switch, update) = self.mode_switch.step(elapsed, screen);
        next.mode_switch = mode_switch;
        if let Some(size) = update.size {
            next.geometry = next.geometry.with_size(size);
        }
        if let Some(position) = update.position {
            next.geometry = next.geometry.with_position(position);
        }

        if let Some(tween) = self.snap {
            let tween = tween.advance(elapsed);
            next.geometry = next.geometry.with_position(tween.current());
            next.snap = (!tween.is_finished()).then_some(tween);
        }

        next.fade = self.fade.and_then(|so_far| {
            let so_far = so_far + elapsed;
            (so_far < Duration::from_millis(FADE_DURATION_MS)).then_some(so_far)
        });

        next
    }

    pub fn toggle_percentage(&self) -> Self {
        Self { show_percentage: !self.show_percentage, ..self.clone() }
    }

    /// Flip compact/full mode. `None` while a resize is still running.
    pub fn toggle_mode(&self, screen: ScreenRect) -> Option<Self> {
        // Finish a pending snap first so adsorption sees the final position
        let geometry = match self.snap {
            Some(tween) => self.geometry.with_position(tween.to),
            None => self.geometry,
        };
        let compact_mode = !self.compact_mode;
        let mode_switch = self.mode_switch.request_toggle(geometry, screen, mode_size(compact_mode))?;

        Some(Self {
            compact_mode,
            geometry,
            mode_switch,
            snap: None,
            fade: Some(Duration::ZERO),
            ..self.clone()
        })
    }

    /// Hide, or show again at the right-center position
    pub fn toggle_visible(&self, screen: ScreenRect) -> Self {
        if self.visible {
            return Self { visible: false, drag: None, ..self.clone() };
        }
        let position = right_center(self.geometry.size(), screen);
        Self {
            visible: true,
            snap: None,
            geometry: self.geometry.with_position(position),
            ..self.clone()
        }
    }

    /// Primary button pressed at `pointer` (screen coordinates). Ignored
    /// while a mode transition is moving the window.
    pub fn begin_drag(&self, pointer: Position) -> Self {
        if !self.mode_switch.is_idle() {
            return self.clone();
        }
        let origin = self.geometry.position();
        Self {
            drag: Some(Drag { grab: Position::new(pointer.x - origin.x, pointer.y - origin.y) }),
            snap: None,
            ..self.clone()
        }
    }

    pub fn drag_to(&self, pointer: Position) -> Self {
        match self.drag {
            Some(drag) => Self {
                geometry: self
                    .geometry
                    .with_position(Position::new(pointer.x - drag.grab.x, pointer.y - drag.grab.y)),
                ..self.clone()
            },
            None => self.clone(),
        }
    }

    /// Release: start the snap movement toward the nearest edge
    pub fn end_drag(&self, screen: ScreenRect) -> Self {
        if self.drag.is_none() {
            return self.clone();
        }
        let target = compute_snap_target(self.geometry, screen);
        Self {
            drag: None,
            snap: Some(PositionTween::snap(self.geometry.position(), target)),
            ..self.clone()
        }
    }
}
