//! Configuration management for Koder
//!
//! - **preferences**: the persisted preference values
//! - **shared**: the committed snapshot every window reads from
//! - **session**: staging of edits made in the preferences panel

pub mod preferences;
pub mod session;
pub mod shared;

// Re-export commonly used types
pub use preferences::{IndentGuidesMode, LineLimitMode, Preferences, WindowRect};
pub use session::{PreferenceIntent, PreferencesForm, PreferencesSession};
pub use shared::SharedPreferences;
