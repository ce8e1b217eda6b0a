//! Application: shared context, open windows and the preferences panel

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::analyzer::MarginPolicy;
use crate::bus::{AppEvent, Broadcaster, Mailbox};
use crate::config::{Preferences, PreferencesSession, SharedPreferences};
use crate::constants;
use crate::error::ConfigError;
use crate::language::{KeywordTable, LanguageRegistry};
use crate::styler::{BuiltinThemes, StylerCatalog};
use crate::widget::TextWidget;
use crate::window::{EditorWindow, WindowIntent};

/// Everything a window needs from the process, handed over at construction
#[derive(Clone)]
pub struct AppContext {
    pub preferences: SharedPreferences,
    pub languages: Arc<LanguageRegistry>,
    pub stylers: Arc<dyn StylerCatalog>,
    pub keywords: Arc<KeywordTable>,
    pub bus: Broadcaster,
    pub margin_policy: MarginPolicy,
}

impl AppContext {
    /// Context over the built-in languages, themes and keywords
    pub fn new(preferences: Preferences) -> Self {
        let mut languages = LanguageRegistry::builtin();
        languages.sort_alphabetically();
        Self {
            preferences: SharedPreferences::new(preferences),
            languages: Arc::new(languages),
            stylers: Arc::new(BuiltinThemes),
            keywords: Arc::new(KeywordTable::builtin()),
            bus: Broadcaster::new(),
            margin_policy: MarginPolicy::default(),
        }
    }

    pub fn with_keywords(mut self, keywords: KeywordTable) -> Self {
        self.keywords = Arc::new(keywords);
        self
    }

    pub fn with_margin_policy(mut self, policy: MarginPolicy) -> Self {
        self.margin_policy = policy;
        self
    }
}

/// Built-in keywords overlaid with the optional user file
pub fn load_keywords(path: &Path) -> KeywordTable {
    let mut keywords = KeywordTable::builtin();
    match KeywordTable::load(path) {
        Ok(user) => keywords.merge(user),
        Err(ConfigError::NotFound(_)) => {}
        Err(err) => warn!(path = %path.display(), error = %err, "Ignoring keyword file"),
    }
    keywords
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u32);

pub struct Application<W: TextWidget> {
    context: AppContext,
    mailbox: Mailbox,
    windows: Vec<(WindowId, EditorWindow<W>)>,
    next_window: u32,
    session: Option<PreferencesSession>,
    /// Most recent persistence failure not yet shown to the user
    config_error: Option<ConfigError>,
}

impl<W: TextWidget> Application<W> {
    pub fn new(context: AppContext) -> Self {
        let mailbox = context.bus.subscribe();
        Self {
            context,
            mailbox,
            windows: Vec::new(),
            next_window: 0,
            session: None,
            config_error: None,
        }
    }

    /// Load preferences and keywords from `settings_path`
    ///
    /// Broken files never stop startup; the load error is kept for the user.
    pub fn from_settings(settings_path: &Path) -> Self {
        let (preferences, error) = Preferences::load_or_default(settings_path);
        let keywords_path = settings_path
            .parent()
            .map(|dir| dir.join(constants::config::KEYWORDS_FILENAME))
            .unwrap_or_else(|| PathBuf::from(constants::config::KEYWORDS_FILENAME));
        let context = AppContext::new(preferences).with_keywords(load_keywords(&keywords_path));

        let mut app = Self::new(context);
        app.config_error = error;
        app
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn open_window(&mut self, widget: W, path: Option<PathBuf>) -> WindowId {
        let id = WindowId(self.next_window);
        self.next_window += 1;
        let window = EditorWindow::new(widget, self.context.clone(), path);
        self.windows.push((id, window));
        id
    }

    pub fn window(&self, id: WindowId) -> Option<&EditorWindow<W>> {
        self.windows.iter().find(|(wid, _)| *wid == id).map(|(_, w)| w)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut EditorWindow<W>> {
        self.windows
            .iter_mut()
            .find(|(wid, _)| *wid == id)
            .map(|(_, w)| w)
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Forward an intent to one window and serve it right away
    pub fn send_to_window(&mut self, id: WindowId, intent: WindowIntent) {
        match self.window_mut(id) {
            Some(window) => window.handle_intent(intent),
            None => debug!(?id, "Intent for a window that is gone"),
        }
        self.pump();
    }

    /// Open the preferences panel, or bring back the one already open
    pub fn open_preferences(&mut self) -> &mut PreferencesSession {
        if self.session.is_some() {
            debug!("Preferences already open");
        }
        self.session.get_or_insert_with(|| {
            PreferencesSession::new(self.context.preferences.clone(), self.context.bus.clone())
        })
    }

    pub fn preferences_session(&mut self) -> Option<&mut PreferencesSession> {
        self.session.as_mut()
    }

    pub fn close_preferences(&mut self) {
        self.session = None;
    }

    /// Persistence failure to report, if any
    pub fn take_config_error(&mut self) -> Option<ConfigError> {
        self.config_error.take()
    }

    /// Serve the application mailbox and every window
    pub fn pump(&mut self) {
        for event in self.mailbox.drain() {
            if event == AppEvent::ConfigurationChanged {
                self.persist();
            }
        }

        let mut closed = Vec::new();
        for (id, window) in &mut self.windows {
            if !window.pump() {
                closed.push((*id, window.frame()));
            }
        }
        for (id, frame) in closed {
            self.context.preferences.update(|p| p.window_rect = frame);
            self.windows.retain(|(wid, _)| *wid != id);
            debug!(?id, "Window removed");
        }
    }

    /// Save the committed preferences; failures are kept, not raised
    fn persist(&mut self) {
        if let Err(err) = self.context.preferences.snapshot().save() {
            warn!(error = %err, "Failed to save preferences");
            self.config_error = Some(err);
        }
    }

    /// Close every window and write the preferences out
    pub fn quit(&mut self) -> Result<()> {
        info!(windows = self.windows.len(), "Quitting");
        self.close_preferences();
        self.context.bus.publish(AppEvent::EditorQuitting);
        self.pump();

        let preferences = self.context.preferences.snapshot();
        preferences.save().with_context(|| {
            format!(
                "Failed to save preferences to {}",
                preferences.settings_path.display()
            )
        })
    }
}
