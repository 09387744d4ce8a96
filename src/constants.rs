//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// Byte-counter sampling
pub mod sampling {
    /// Default interval between counter reads
    pub const DEFAULT_INTERVAL_MS: u64 = 1000;

    /// Shortest interval accepted from the command line
    pub const MIN_INTERVAL_MS: u64 = 100;

    /// Bytes per kilobyte used for rate conversion
    pub const BYTES_PER_KB: f64 = 1024.0;

    /// Above this many KB/s labels switch to MB/s
    pub const MB_LABEL_THRESHOLD_KBPS: f64 = 1024.0;

    /// Loopback interface name excluded from totals by default
    pub const LOOPBACK_INTERFACE: &str = "lo";
}

/// Exponential smoothing of bars, mode progress and font size
pub mod smoothing {
    /// Fixed animation tick; decay constants below are per tick
    pub const TICK_MS: u64 = 50;

    /// Upper bound of ticks replayed by a single advance
    pub const MAX_TICKS_PER_ADVANCE: u32 = 20;

    /// Decay for the download/upload bar fill
    pub const TRAFFIC_DECAY: f32 = 0.7;

    /// Decay for compact/full mode progress
    pub const MODE_DECAY: f32 = 0.8;

    /// Decay for the auto-fit font size
    pub const FONT_DECAY: f32 = 0.8;

    /// Speed at which a bar is completely filled
    pub const SATURATION_KBPS: f64 = 512.0;
}

/// Edge snapping and adsorption
pub mod snap {
    /// Horizontal snap distance to the left/right screen edge
    pub const HORIZONTAL_THRESHOLD: i32 = 100;

    /// Vertical snap distance to the top/bottom screen edge
    pub const VERTICAL_THRESHOLD: i32 = 50;

    /// Distance under which a window counts as flush against an edge
    pub const ADSORPTION_TOLERANCE: i32 = 10;

    /// Duration of the post-release snap movement
    pub const SNAP_DURATION_MS: u64 = 300;
}

/// Compact/full mode switching
pub mod mode {
    use crate::types::Size;

    /// Window size in full mode (bars plus labels)
    pub const FULL_SIZE: Size = Size::new(220, 80);

    /// Window size in compact mode (vertical bars only)
    pub const COMPACT_SIZE: Size = Size::new(60, 110);

    /// Duration of the size interpolation
    pub const RESIZE_DURATION_MS: u64 = 300;

    /// Duration of the bounce after the resize
    pub const BOUNCE_DURATION_MS: u64 = 150;

    /// Peak upward displacement of the bounce
    pub const BOUNCE_HEIGHT: i32 = 8;

    /// Opacity the mode fade starts from
    pub const FADE_START_OPACITY: f32 = 0.7;

    /// Duration of the mode fade
    pub const FADE_DURATION_MS: u64 = 300;

    /// Window opacity while being dragged
    pub const DRAG_OPACITY: f32 = 0.7;

    /// Mode progress above which the compact layout is painted
    pub const COMPACT_LAYOUT_THRESHOLD: f32 = 0.1;
}

/// Label font fitting
pub mod font {
    /// Base label size and the size text is measured at
    pub const BASE_SIZE: f32 = 10.0;

    /// Smallest size the auto-fit may shrink to
    pub const MIN_SIZE: f32 = 8.0;

    /// Horizontal space not available to labels (left + right insets)
    pub const LABEL_INSET: i32 = 30;

    /// Font family used for the labels unless overridden
    pub const DEFAULT_FAMILY: &str = "DejaVu Sans Bold";
}

/// Configuration file location
pub mod config {
    /// Directory under the user config dir
    pub const APP_DIR: &str = "net-floater";

    /// Preferences file name
    pub const FILENAME: &str = "config.json";
}

/// XDG autostart entry
pub mod autostart {
    /// Directory under the user config dir holding autostart entries
    pub const AUTOSTART_DIR: &str = "autostart";

    /// Desktop entry file name
    pub const DESKTOP_FILE: &str = "net-floater.desktop";

    /// Name shown by session managers
    pub const ENTRY_NAME: &str = "NetFloater";
}
