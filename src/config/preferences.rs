//! User preferences persisted between runs

use crate::config::store::JsonStore;
use crate::i18n::Language;
use crate::types::Position;

pub const SHOW_PERCENTAGE: &str = "show_percentage";
pub const WINDOW_POSITION: &str = "window_position";
pub const AUTO_START: &str = "auto_start";
pub const COMPACT_MODE: &str = "compact_mode";
pub const LANGUAGE: &str = "language";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub show_percentage: bool,
    pub window_position: Option<Position>,
    pub auto_start: bool,
    pub compact_mode: bool,
    pub language: Language,
}

impl Preferences {
    pub fn load(store: &JsonStore) -> Self {
        Self {
            show_percentage: store.get(SHOW_PERCENTAGE, false),
            window_position: store.get(WINDOW_POSITION, None),
            auto_start: store.get(AUTO_START, false),
            compact_mode: store.get(COMPACT_MODE, false),
            language: store.get(LANGUAGE, Language::default()),
        }
    }

    /// Write every key, e.g. at shutdown
    pub fn save_all(&self, store: &mut JsonStore) {
        store.set(SHOW_PERCENTAGE, self.show_percentage);
        store.set(WINDOW_POSITION, self.window_position);
        store.set(AUTO_START, self.auto_start);
        store.set(COMPACT_MODE, self.compact_mode);
        store.set(LANGUAGE, self.language);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_store() {
        let prefs = Preferences::load(&JsonStore::in_memory());
        assert_eq!(prefs, Preferences::default());
        assert_eq!(prefs.window_position, None);
    }

    #[test]
    fn test_save_all_roundtrip_through_store() {
        let mut store = JsonStore::in_memory();
        let prefs = Preferences {
            show_percentage: true,
            window_position: Some(Position::new(780, 360)),
            auto_start: true,
            compact_mode: true,
            language: Language::Chinese,
        };
        prefs.save_all(&mut store);
        assert_eq!(Preferences::load(&store), prefs);
    }

    #[test]
    fn test_null_window_position() {
        let mut store = JsonStore::in_memory();
        store.set(WINDOW_POSITION, Option::<Position>::None);
        assert_eq!(Preferences::load(&store).window_position, None);
    }
}
