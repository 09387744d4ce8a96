//! Configuration management for NetFloater
//!
//! - **store**: JsonStore, a key/value JSON file under the user config dir
//! - **preferences**: typed view of the persisted user preferences

pub mod preferences;
pub mod store;

// Re-export commonly used types
pub use preferences::Preferences;
pub use store::JsonStore;
