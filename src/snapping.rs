use std::time::Duration;

use crate::constants::snap::{
    ADSORPTION_TOLERANCE, HORIZONTAL_THRESHOLD, SNAP_DURATION_MS, VERTICAL_THRESHOLD,
};
use crate::types::{Position, ScreenRect, Size, WindowGeometry};

/// Where a released window should settle
///
/// Horizontal snapping reaches 100px from the side edges, vertical only
/// 50px from the top and bottom. When both edges of an axis are in reach
/// the nearer one wins. A window whose horizontal center left the screen
/// is pulled back flush against that side.
pub fn compute_snap_target(window: WindowGeometry, screen: ScreenRect) -> Position {
    let left_distance = (window.left() - screen.left).abs();
    let right_distance = (screen.right - window.right()).abs();
    let top_distance = (window.top() - screen.top).abs();
    let bottom_distance = (screen.bottom - window.bottom()).abs();

    let x = if left_distance < right_distance && left_distance < HORIZONTAL_THRESHOLD {
        screen.left
    } else if right_distance < HORIZONTAL_THRESHOLD {
        screen.right - window.width
    } else if window.center_x() < screen.left as f32 {
        screen.left
    } else if window.center_x() > screen.right as f32 {
        screen.right - window.width
    } else {
        window.x
    };

    let y = if top_distance < bottom_distance && top_distance < VERTICAL_THRESHOLD {
        screen.top
    } else if bottom_distance < VERTICAL_THRESHOLD {
        screen.bottom - window.height
    } else {
        window.y
    };

    Position::new(x, y)
}

/// Which screen edges a window is flush against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Adsorption {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Adsorption {
    pub fn capture(window: WindowGeometry, screen: ScreenRect) -> Self {
        Self {
            left: (window.left() - screen.left).abs() < ADSORPTION_TOLERANCE,
            right: (window.right() - screen.right).abs() < ADSORPTION_TOLERANCE,
            top: (window.top() - screen.top).abs() < ADSORPTION_TOLERANCE,
            bottom: (window.bottom() - screen.bottom).abs() < ADSORPTION_TOLERANCE,
        }
    }
}

/// Position after a resize that keeps the window on the edges it was
/// flush against. Right wins over left, top over bottom.
pub fn realign(adsorption: Adsorption, origin: Position, new_size: Size, screen: ScreenRect) -> Position {
    let x = if adsorption.right {
        screen.right - new_size.width
    } else if adsorption.left {
        screen.left
    } else {
        origin.x
    };

    let y = if adsorption.top {
        screen.top
    } else if adsorption.bottom {
        screen.bottom - new_size.height
    } else {
        origin.y
    };

    Position::new(x, y)
}

/// Flush against the right edge, vertically centered
pub fn right_center(size: Size, screen: ScreenRect) -> Position {
    Position::new(
        screen.right - size.width,
        screen.top + (screen.height() - size.height) / 2,
    )
}

/// Saved position if the whole window fits there, otherwise right-center
pub fn initial_position(saved: Option<Position>, size: Size, screen: ScreenRect) -> Position {
    match saved {
        Some(pos)
            if (screen.left..=screen.right - size.width).contains(&pos.x)
                && (screen.top..=screen.bottom - size.height).contains(&pos.y) =>
        {
            pos
        }
        _ => right_center(size, screen),
    }
}

/// Linear position interpolation over a fixed duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionTween {
    pub from: Position,
    pub to: Position,
    elapsed: Duration,
    duration: Duration,
}

impl PositionTween {
    pub fn new(from: Position, to: Position, duration: Duration) -> Self {
        Self { from, to, elapsed: Duration::ZERO, duration }
    }

    /// The post-release snap movement
    pub fn snap(from: Position, to: Position) -> Self {
        Self::new(from, to, Duration::from_millis(SNAP_DURATION_MS))
    }

    pub fn advance(self, elapsed: Duration) -> Self {
        Self {
            elapsed: (self.elapsed + elapsed).min(self.duration),
            ..self
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn current(&self) -> Position {
        let t = progress(self.elapsed, self.duration);
        Position::new(lerp(self.from.x, self.to.x, t), lerp(self.from.y, self.to.y, t))
    }
}

/// Fraction of `duration` covered by `elapsed`, in [0,1]
pub(crate) fn progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
}

pub(crate) fn lerp(from: i32, to: i32, t: f32) -> i32 {
    from + ((to - from) as f32 * t).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SCREEN: ScreenRect = ScreenRect::new(0, 0, 1000, 800);

    #[test]
    fn test_snap_left_edge_boundary() {
        let target = compute_snap_target(WindowGeometry::new(0, 300, 220, 80), SCREEN);
        assert_eq!(target, Position::new(0, 300));
    }

    #[test]
    fn test_snap_right_edge_overhanging() {
        let target = compute_snap_target(WindowGeometry::new(790, 300, 220, 80), SCREEN);
        assert_eq!(target, Position::new(780, 300));
    }

    #[test]
    fn test_snap_left_within_threshold() {
        let target = compute_snap_target(WindowGeometry::new(99, 300, 220, 80), SCREEN);
        assert_eq!(target.x, 0);
        let target = compute_snap_target(WindowGeometry::new(100, 300, 220, 80), SCREEN);
        assert_eq!(target.x, 100);
    }

    #[test]
    fn test_snap_horizontal_and_vertical_thresholds_differ() {
        // 60px from the top: outside the 50px vertical reach
        let target = compute_snap_target(WindowGeometry::new(400, 60, 220, 80), SCREEN);
        assert_eq!(target, Position::new(400, 60));
        // 49px from the top snaps
        let target = compute_snap_target(WindowGeometry::new(400, 49, 220, 80), SCREEN);
        assert_eq!(target, Position::new(400, 0));
        // 49px from the bottom snaps down
        let target = compute_snap_target(WindowGeometry::new(400, 671, 220, 80), SCREEN);
        assert_eq!(target, Position::new(400, 720));
    }

    #[test]
    fn test_snap_tall_window_on_short_screen_picks_nearer_edge() {
        let screen = ScreenRect::new(0, 0, 1000, 100);
        let first = compute_snap_target(WindowGeometry::new(400, 55, 220, 60), screen);
        assert_eq!(first, Position::new(400, 40));
        let second = compute_snap_target(WindowGeometry::new(400, 40, 220, 60), screen);
        assert_eq!(second, first);
    }

    #[test]
    fn test_snap_center_off_screen_clamps() {
        let target = compute_snap_target(WindowGeometry::new(-150, 300, 220, 80), SCREEN);
        assert_eq!(target.x, 0);
        let target = compute_snap_target(WindowGeometry::new(1200, 300, 220, 80), SCREEN);
        assert_eq!(target.x, 780);
    }

    #[test]
    fn test_snap_window_in_middle_is_untouched() {
        let window = WindowGeometry::new(400, 300, 220, 80);
        assert_eq!(compute_snap_target(window, SCREEN), window.position());
    }

    #[test]
    fn test_snap_respects_screen_offset() {
        let screen = ScreenRect::new(1920, 32, 3840, 1080);
        let target = compute_snap_target(WindowGeometry::new(1950, 60, 220, 80), screen);
        assert_eq!(target, Position::new(1920, 32));
    }

    #[test]
    fn test_adsorption_capture() {
        let flush_right = WindowGeometry::new(775, 0, 220, 80);
        let flags = Adsorption::capture(flush_right, SCREEN);
        assert!(flags.right);
        assert!(flags.top);
        assert!(!flags.left);
        assert!(!flags.bottom);

        let floating = Adsorption::capture(WindowGeometry::new(400, 300, 220, 80), SCREEN);
        assert_eq!(floating, Adsorption::default());
    }

    #[test]
    fn test_realign_keeps_right_edge() {
        let flags = Adsorption { right: true, ..Default::default() };
        let pos = realign(flags, Position::new(780, 200), Size::new(60, 110), SCREEN);
        assert_eq!(pos, Position::new(940, 200));
    }

    #[test]
    fn test_realign_keeps_bottom_edge() {
        let flags = Adsorption { left: true, bottom: true, ..Default::default() };
        let pos = realign(flags, Position::new(0, 720), Size::new(60, 110), SCREEN);
        assert_eq!(pos, Position::new(0, 690));
    }

    #[test]
    fn test_realign_floating_keeps_origin() {
        let pos = realign(Adsorption::default(), Position::new(300, 200), Size::new(60, 110), SCREEN);
        assert_eq!(pos, Position::new(300, 200));
    }

    #[test]
    fn test_initial_position_uses_valid_saved() {
        let pos = initial_position(Some(Position::new(100, 100)), Size::new(220, 80), SCREEN);
        assert_eq!(pos, Position::new(100, 100));
    }

    #[test]
    fn test_initial_position_rejects_off_screen() {
        let size = Size::new(220, 80);
        assert_eq!(initial_position(Some(Position::new(900, 100)), size, SCREEN), Position::new(780, 360));
        assert_eq!(initial_position(Some(Position::new(-5, 100)), size, SCREEN), Position::new(780, 360));
        assert_eq!(initial_position(None, size, SCREEN), Position::new(780, 360));
    }

    #[test]
    fn test_tween_interpolates_linearly() {
        let tween = PositionTween::snap(Position::new(0, 0), Position::new(300, -30));
        assert_eq!(tween.current(), Position::new(0, 0));
        let half = tween.advance(Duration::from_millis(150));
        assert_eq!(half.current(), Position::new(150, -15));
        assert!(!half.is_finished());
        let done = half.advance(Duration::from_millis(500));
        assert!(done.is_finished());
        assert_eq!(done.current(), Position::new(300, -30));
    }

    proptest! {
        #[test]
        fn test_snap_target_is_idempotent(
            x in -400i32..1400,
            y in -300i32..1100,
            width in 40i32..300,
            height in 40i32..150,
        ) {
            let window = WindowGeometry::new(x, y, width, height);
            let first = compute_snap_target(window, SCREEN);
            let second = compute_snap_target(window.with_position(first), SCREEN);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn test_snap_target_is_idempotent_on_small_screens(
            screen_width in 60i32..400,
            screen_height in 40i32..200,
            x in -300i32..500,
            y in -200i32..300,
            width in 40i32..300,
            height in 40i32..150,
        ) {
            let screen = ScreenRect::from_origin_size(0, 0, screen_width, screen_height);
            let window = WindowGeometry::new(x, y, width, height);
            let first = compute_snap_target(window, screen);
            let second = compute_snap_target(window.with_position(first), screen);
            prop_assert_eq!(first, second);
        }
    }
}
