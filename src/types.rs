//! Geometry types shared by the snapping, mode-switch and GUI layers
//!
//! All coordinates are logical pixels. Screen rectangles carry explicit
//! right/bottom edges so that `right - width` is the flush-right x.

use serde::{Deserialize, Serialize};

/// Top-left corner of the widget window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Window rectangle as owned by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl WindowGeometry {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_parts(position: Position, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x as f32 + self.width as f32 / 2.0
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn with_position(self, position: Position) -> Self {
        Self { x: position.x, y: position.y, ..self }
    }

    pub fn with_size(self, size: Size) -> Self {
        Self { width: size.width, height: size.height, ..self }
    }
}

/// Available (work-area) rectangle of the active display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ScreenRect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_edges() {
        let window = WindowGeometry::new(790, 40, 220, 80);
        assert_eq!(window.left(), 790);
        assert_eq!(window.right(), 1010);
        assert_eq!(window.top(), 40);
        assert_eq!(window.bottom(), 120);
        assert_eq!(window.center_x(), 900.0);
    }

    #[test]
    fn test_screen_from_origin_size() {
        let screen = ScreenRect::from_origin_size(0, 24, 1920, 1056);
        assert_eq!(screen.right, 1920);
        assert_eq!(screen.bottom, 1080);
        assert_eq!(screen.width(), 1920);
        assert_eq!(screen.height(), 1056);
    }

    #[test]
    fn test_position_serializes_as_object() {
        let json = serde_json::to_string(&Position::new(12, -4)).unwrap();
        assert_eq!(json, r#"{"x":12,"y":-4}"#);
    }
}
