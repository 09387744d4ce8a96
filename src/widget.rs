//! User commands and the single dispatcher that applies them
//!
//! Tray entries, pointer gestures and shutdown all end up here. The
//! dispatcher updates `WidgetState`, persists what changed and tells the
//! caller whether a redraw is needed.

use std::time::Duration;

use tracing::{error, info};

use crate::autostart::AutostartRegistry;
use crate::config::preferences::{AUTO_START, COMPACT_MODE, LANGUAGE, SHOW_PERCENTAGE, WINDOW_POSITION};
use crate::config::{JsonStore, Preferences};
use crate::font::TextMetrics;
use crate::i18n::Language;
use crate::network::SpeedReading;
use crate::state::WidgetState;
use crate::types::{Position, ScreenRect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleAutoStart,
    TogglePercentage,
    ToggleCompactMode,
    ToggleVisible,
    SetLanguage(Language),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// State changed; repaint and refresh the tray
    Redraw,
    /// Request ignored, nothing changed
    Unchanged,
    /// External call failed, nothing changed
    Failed,
    /// Preferences flushed, close the window
    Exit,
}

/// Checkable tray entries mirrored from the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrayState {
    pub auto_start: bool,
    pub show_percentage: bool,
    pub language: Language,
}

pub struct Widget<A: AutostartRegistry> {
    state: WidgetState,
    prefs: Preferences,
    store: JsonStore,
    autostart: A,
}

impl<A: AutostartRegistry> Widget<A> {
    pub fn new(store: JsonStore, autostart: A, screen: ScreenRect) -> Self {
        let mut prefs = Preferences::load(&store);
        // The registry is the source of truth for autostart
        prefs.auto_start = autostart.is_enabled();

        let state = WidgetState::new(&prefs, screen);
        info!(
            compact = prefs.compact_mode,
            show_percentage = prefs.show_percentage,
            x = state.geometry.x,
            y = state.geometry.y,
            "Widget initialized"
        );
        Self { state, prefs, store, autostart }
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    pub fn tray_state(&self) -> TrayState {
        TrayState {
            auto_start: self.prefs.auto_start,
            show_percentage: self.prefs.show_percentage,
            language: self.prefs.language,
        }
    }

    pub fn dispatch(&mut self, command: Command, screen: ScreenRect) -> Response {
        info!(command = ?command, "Dispatching command");
        match command {
            Command::ToggleAutoStart => self.toggle_auto_start(),
            Command::TogglePercentage => {
                self.state = self.state.toggle_percentage();
                self.prefs.show_percentage = self.state.show_percentage;
                self.store.set(SHOW_PERCENTAGE, self.prefs.show_percentage);
                Response::Redraw
            }
            Command::ToggleCompactMode => match self.state.toggle_mode(screen) {
                Some(next) => {
                    self.state = next;
                    self.prefs.compact_mode = self.state.compact_mode;
                    self.store.set(COMPACT_MODE, self.prefs.compact_mode);
                    Response::Redraw
                }
                None => Response::Unchanged,
            },
            Command::ToggleVisible => {
                self.state = self.state.toggle_visible(screen);
                Response::Redraw
            }
            Command::SetLanguage(language) => {
                if self.prefs.language == language {
                    return Response::Unchanged;
                }
                self.prefs.language = language;
                self.store.set(LANGUAGE, language);
                Response::Redraw
            }
            Command::Quit => {
                self.shutdown(screen);
                Response::Exit
            }
        }
    }

    fn toggle_auto_start(&mut self) -> Response {
        let enabled = self.autostart.is_enabled();
        let result = if enabled { self.autostart.disable() } else { self.autostart.enable() };

        match result {
            Ok(()) => {
                self.prefs.auto_start = !enabled;
                self.store.set(AUTO_START, self.prefs.auto_start);
                Response::Redraw
            }
            Err(e) => {
                error!(error = ?e, enable = !enabled, "Failed to change start on login");
                Response::Failed
            }
        }
    }

    pub fn set_speed(&mut self, reading: SpeedReading) {
        self.state = self.state.with_speed(reading);
    }

    pub fn tick(&mut self, elapsed: Duration, screen: ScreenRect, metrics: &dyn TextMetrics) {
        self.state = self.state.advance(elapsed, screen, metrics);
    }

    pub fn pointer_pressed(&mut self, pointer: Position) {
        self.state = self.state.begin_drag(pointer);
    }

    pub fn pointer_moved(&mut self, pointer: Position) {
        self.state = self.state.drag_to(pointer);
    }

    /// End a drag and remember where the window will settle
    pub fn pointer_released(&mut self, screen: ScreenRect) {
        if self.state.drag.is_none() {
            return;
        }
        self.state = self.state.end_drag(screen);
        let position = self.state.resting_position(screen);
        self.prefs.window_position = Some(position);
        self.store.set(WINDOW_POSITION, self.prefs.window_position);
    }

    pub fn double_clicked(&mut self, screen: ScreenRect) -> Response {
        self.dispatch(Command::ToggleCompactMode, screen)
    }

    /// Flush every preference, as on exit
    pub fn shutdown(&mut self, screen: ScreenRect) {
        self.prefs.window_position = Some(self.state.resting_position(screen));
        self.prefs.compact_mode = self.state.compact_mode;
        self.prefs.show_percentage = self.state.show_percentage;
        self.prefs.auto_start = self.autostart.is_enabled();
        self.prefs.save_all(&mut self.store);
        info!(path = ?self.store.path(), "Preferences saved on shutdown");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const SCREEN: ScreenRect = ScreenRect::new(0, 0, 1000, 800);

    #[derive(Default)]
    struct FakeAutostart {
        enabled: Cell<bool>,
        broken: bool,
    }

    impl AutostartRegistry for FakeAutostart {
        fn is_enabled(&self) -> bool {
            self.enabled.get()
        }

        fn enable(&self) -> anyhow::Result<()> {
            if self.broken {
                anyhow::bail!("permission denied");
            }
            self.enabled.set(true);
            Ok(())
        }

        fn disable(&self) -> anyhow::Result<()> {
            if self.broken {
                anyhow::bail!("permission denied");
            }
            self.enabled.set(false);
            Ok(())
        }
    }

    fn widget() -> Widget<FakeAutostart> {
        Widget::new(JsonStore::in_memory(), FakeAutostart::default(), SCREEN)
    }

    #[test]
    fn test_toggle_percentage_persists() {
        let mut widget = widget();
        assert_eq!(widget.dispatch(Command::TogglePercentage, SCREEN), Response::Redraw);
        assert!(widget.state().show_percentage);
        assert!(widget.store.get(SHOW_PERCENTAGE, false));
    }

    #[test]
    fn test_toggle_auto_start() {
        let mut widget = widget();
        assert_eq!(widget.dispatch(Command::ToggleAutoStart, SCREEN), Response::Redraw);
        assert!(widget.tray_state().auto_start);
        assert!(widget.store.get(AUTO_START, false));

        assert_eq!(widget.dispatch(Command::ToggleAutoStart, SCREEN), Response::Redraw);
        assert!(!widget.tray_state().auto_start);
    }

    #[test]
    fn test_auto_start_failure_leaves_toggle_unchanged() {
        let autostart = FakeAutostart { broken: true, ..Default::default() };
        let mut widget = Widget::new(JsonStore::in_memory(), autostart, SCREEN);
        assert_eq!(widget.dispatch(Command::ToggleAutoStart, SCREEN), Response::Failed);
        assert!(!widget.tray_state().auto_start);
        assert!(!widget.store.get(AUTO_START, false));
    }

    #[test]
    fn test_registry_overrides_stored_auto_start() {
        let mut store = JsonStore::in_memory();
        store.set(AUTO_START, true);
        let widget = Widget::new(store, FakeAutostart::default(), SCREEN);
        assert!(!widget.prefs().auto_start);
    }

    #[test]
    fn test_compact_toggle_ignored_while_resizing() {
        let mut widget = widget();
        assert_eq!(widget.double_clicked(SCREEN), Response::Redraw);
        assert!(widget.store.get(COMPACT_MODE, false));

        let before = widget.state().clone();
        assert_eq!(widget.dispatch(Command::ToggleCompactMode, SCREEN), Response::Unchanged);
        assert_eq!(widget.state(), &before);
        assert!(widget.store.get(COMPACT_MODE, false));
    }

    #[test]
    fn test_set_language() {
        let mut widget = widget();
        assert_eq!(widget.dispatch(Command::SetLanguage(Language::English), SCREEN), Response::Unchanged);
        assert_eq!(widget.dispatch(Command::SetLanguage(Language::Chinese), SCREEN), Response::Redraw);
        assert_eq!(widget.tray_state().language, Language::Chinese);
        assert_eq!(widget.store.get(LANGUAGE, Language::English), Language::Chinese);
    }

    #[test]
    fn test_release_persists_snap_target() {
        let mut widget = widget();
        widget.pointer_pressed(Position::new(790, 370));
        widget.pointer_moved(Position::new(100, 310));
        widget.pointer_released(SCREEN);
        assert_eq!(widget.prefs().window_position, Some(Position::new(0, 300)));
        assert_eq!(widget.store.get::<Option<Position>>(WINDOW_POSITION, None), Some(Position::new(0, 300)));
    }

    #[test]
    fn test_release_without_drag_does_nothing() {
        let mut widget = widget();
        widget.pointer_released(SCREEN);
        assert_eq!(widget.prefs().window_position, None);
    }

    #[test]
    fn test_quit_flushes_everything() {
        let mut widget = widget();
        widget.dispatch(Command::TogglePercentage, SCREEN);
        assert_eq!(widget.dispatch(Command::Quit, SCREEN), Response::Exit);
        let saved = Preferences::load(&widget.store);
        assert!(saved.show_percentage);
        assert_eq!(saved.window_position, Some(Position::new(780, 360)));
        assert!(!saved.compact_mode);
    }

    #[test]
    fn test_quit_mid_resize_saves_settled_position() {
        let mut widget = widget();
        widget.dispatch(Command::ToggleCompactMode, SCREEN);
        assert!(widget.state().mode_switch.is_resizing());
        assert_eq!(widget.dispatch(Command::Quit, SCREEN), Response::Exit);
        let saved = Preferences::load(&widget.store);
        assert!(saved.compact_mode);
        assert_eq!(saved.window_position, Some(Position::new(940, 360)));
    }

    #[test]
    fn test_show_hide_round_trip() {
        let mut widget = widget();
        let before = widget.tray_state();
        assert_eq!(widget.dispatch(Command::ToggleVisible, SCREEN), Response::Redraw);
        assert!(!widget.state().visible);
        // Visibility lives in the window, the tray entry is a plain toggle
        assert_eq!(widget.tray_state(), before);
        widget.dispatch(Command::ToggleVisible, SCREEN);
        assert!(widget.state().visible);
    }
}
