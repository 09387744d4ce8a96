//! GUI-specific constants for widget colors, bar layout and repaint pacing
//!
//! Translucent colors are stored premultiplied.

use egui::Color32;

/// Download bar gradient (dark to light)
pub const DOWNLOAD_DARK: Color32 = Color32::from_rgba_premultiplied(66, 151, 69, 220);
pub const DOWNLOAD_LIGHT: Color32 = Color32::from_rgba_premultiplied(111, 172, 114, 220);

/// Upload bar gradient (dark to light)
pub const UPLOAD_DARK: Color32 = Color32::from_rgba_premultiplied(220, 131, 0, 220);
pub const UPLOAD_LIGHT: Color32 = Color32::from_rgba_premultiplied(220, 158, 66, 220);

/// Label colors
pub const DOWNLOAD_TEXT: Color32 = Color32::from_rgb(76, 175, 80);
pub const UPLOAD_TEXT: Color32 = Color32::from_rgb(255, 152, 0);

/// Window chrome
pub const BACKGROUND: Color32 = Color32::from_rgba_premultiplied(9, 9, 9, 120);
pub const OUTLINE: Color32 = Color32::from_rgba_premultiplied(80, 80, 80, 80);
pub const BACKGROUND_RADIUS: u8 = 16;
pub const OUTLINE_WIDTH: f32 = 1.0;

/// Horizontal bars (full mode)
pub const FULL_BAR_INSET: f32 = 15.0;
pub const FULL_BAR_HEIGHT: f32 = 12.0;
pub const FULL_BAR_RADIUS: u8 = 6;
pub const DOWNLOAD_BAR_TOP: f32 = 35.0;
pub const UPLOAD_BAR_TOP: f32 = 55.0;
pub const LABEL_BASELINE: f32 = 25.0;
/// Label shrink at full transition progress
pub const LABEL_SHRINK: f32 = 0.3;

/// Vertical bars (compact mode)
pub const COMPACT_BAR_WIDTH: f32 = 12.0;
pub const COMPACT_BAR_SPACING: f32 = 8.0;
pub const COMPACT_BAR_RADIUS: u8 = 3;
/// Vertical padding around the bar track (top + bottom)
pub const COMPACT_BAR_PADDING: f32 = 20.0;
/// Distance from the window bottom to the bar base
pub const COMPACT_BAR_BASE_OFFSET: f32 = 10.0;

/// Animation frame pacing
pub const FRAME_INTERVAL_MS: u64 = 50;
