//! Committed preferences shared by every window

use std::sync::{Arc, RwLock};
use tracing::debug;

use super::Preferences;

/// Handle to the committed preferences
///
/// Readers always get a copy; writers replace the whole snapshot. No caller
/// ever holds a reference into the shared value.
#[derive(Clone, Default)]
pub struct SharedPreferences {
    inner: Arc<RwLock<Preferences>>,
}

impl SharedPreferences {
    pub fn new(preferences: Preferences) -> Self {
        Self {
            inner: Arc::new(RwLock::new(preferences)),
        }
    }

    /// Copy of the committed snapshot as of now
    pub fn snapshot(&self) -> Preferences {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace the committed snapshot
    pub fn replace(&self, preferences: Preferences) {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = preferences;
        debug!("Committed preferences replaced");
    }

    /// Edit the committed snapshot outside a preferences session
    ///
    /// Used for bookkeeping values such as the last window frame that are
    /// never staged through the preferences panel.
    pub fn update(&self, edit: impl FnOnce(&mut Preferences)) {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        edit(&mut guard);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_a_copy() {
        let shared = SharedPreferences::new(Preferences::default());
        let mut copy = shared.snapshot();
        copy.tab_width = 12;

        assert_ne!(shared.snapshot().tab_width, 12);
    }

    #[test]
    fn test_replace_is_visible_to_all_handles() {
        let shared = SharedPreferences::new(Preferences::default());
        let other = shared.clone();

        let mut next = shared.snapshot();
        next.eol_visible = true;
        shared.replace(next.clone());

        assert_eq!(other.snapshot(), next);
    }
}
