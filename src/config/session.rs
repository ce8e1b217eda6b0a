//! Preferences editing session
//!
//! Stages edits from the preferences panel in a draft and only publishes them
//! on Apply. Three snapshots are kept:
//!
//! - **committed**: what every window currently uses
//! - **session start**: committed as of the moment the panel opened, the Revert target
//! - **draft**: what the controls currently show

use tracing::{debug, info};

use super::{IndentGuidesMode, LineLimitMode, Preferences, SharedPreferences};
use crate::bus::{AppEvent, Broadcaster};
use crate::error::IntentError;

/// One user interaction with the preferences panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceIntent {
    CompactLangMenu(bool),
    FullPathInTitle(bool),
    TabsToSpaces(bool),
    TabWidth(u8),
    LineHighlighting(bool),
    LineNumbers(bool),
    EolVisible(bool),
    WhitespaceVisible(bool),
    LineLimitShow(bool),
    LineLimitMode(LineLimitMode),
    LineLimitColumn(u32),
    IndentGuidesShow(bool),
    IndentGuidesMode(IndentGuidesMode),
    BracesHighlighting(bool),
    Style(String),
    Apply,
    Revert,
}

impl PreferenceIntent {
    /// Tab width typed into the text field
    pub fn tab_width_from_text(text: &str) -> Self {
        Self::TabWidth(u8::try_from(leading_number(text)).unwrap_or(u8::MAX))
    }

    /// Line limit column typed into the text field
    pub fn line_limit_column_from_text(text: &str) -> Self {
        Self::LineLimitColumn(u32::try_from(leading_number(text)).unwrap_or(u32::MAX))
    }

    /// Map a `key=value` pair onto an intent
    pub fn parse(key: &str, value: &str) -> Result<Self, IntentError> {
        let invalid = || IntentError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        let flag = || parse_flag(value).ok_or_else(invalid);

        let intent = match key {
            "compact_lang_menu" => Self::CompactLangMenu(flag()?),
            "full_path_in_title" => Self::FullPathInTitle(flag()?),
            "tabs_to_spaces" => Self::TabsToSpaces(flag()?),
            "tab_width" => Self::TabWidth(value.trim().parse().map_err(|_| invalid())?),
            "line_highlighting" => Self::LineHighlighting(flag()?),
            "line_numbers" => Self::LineNumbers(flag()?),
            "eol_visible" => Self::EolVisible(flag()?),
            "whitespace_visible" => Self::WhitespaceVisible(flag()?),
            "line_limit_show" => Self::LineLimitShow(flag()?),
            "line_limit_mode" => Self::LineLimitMode(match value.trim() {
                "background" => LineLimitMode::Background,
                "line" => LineLimitMode::Line,
                _ => return Err(invalid()),
            }),
            "line_limit_column" => {
                Self::LineLimitColumn(value.trim().parse().map_err(|_| invalid())?)
            }
            "indent_guides_show" => Self::IndentGuidesShow(flag()?),
            "indent_guides_mode" => Self::IndentGuidesMode(match value.trim() {
                "real" => IndentGuidesMode::Real,
                "look_forward" => IndentGuidesMode::LookForward,
                "look_both" => IndentGuidesMode::LookBoth,
                _ => return Err(invalid()),
            }),
            "braces_highlighting" => Self::BracesHighlighting(flag()?),
            "style" if !value.trim().is_empty() => Self::Style(value.trim().to_string()),
            "style" => return Err(invalid()),
            _ => return Err(IntentError::UnknownKey(key.to_string())),
        };
        Ok(intent)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Leading decimal digits of `text`, 0 when there are none
fn leading_number(text: &str) -> u64 {
    text.trim_start()
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(0u64, |acc, d| acc.saturating_mul(10).saturating_add(u64::from(d)))
}

/// Detail box governed by the line limit checkbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineLimitBox {
    pub show: bool,
    pub enabled: bool,
    pub column_text: String,
    pub mode: LineLimitMode,
}

/// Detail box governed by the indent guides checkbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentGuidesBox {
    pub show: bool,
    pub enabled: bool,
    pub mode: IndentGuidesMode,
}

/// State of every control on the preferences panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferencesForm {
    pub compact_lang_menu: bool,
    pub full_path_in_title: bool,
    pub tabs_to_spaces: bool,
    pub tab_width_text: String,
    pub line_highlighting: bool,
    pub line_numbers: bool,
    pub eol_visible: bool,
    pub whitespace_visible: bool,
    pub line_limit: LineLimitBox,
    pub indent_guides: IndentGuidesBox,
    pub braces_highlighting: bool,
    pub style: String,
    pub apply_enabled: bool,
    pub revert_enabled: bool,
}

impl PreferencesForm {
    /// Controls rendered from `preferences`, both buttons disabled
    pub fn from_preferences(preferences: &Preferences) -> Self {
        Self {
            compact_lang_menu: preferences.compact_lang_menu,
            full_path_in_title: preferences.full_path_in_title,
            tabs_to_spaces: preferences.tabs_to_spaces,
            tab_width_text: preferences.tab_width.to_string(),
            line_highlighting: preferences.line_highlighting,
            line_numbers: preferences.line_numbers,
            eol_visible: preferences.eol_visible,
            whitespace_visible: preferences.whitespace_visible,
            line_limit: LineLimitBox {
                show: preferences.line_limit_show,
                enabled: preferences.line_limit_show,
                column_text: preferences.line_limit_column.to_string(),
                mode: preferences.line_limit_mode,
            },
            indent_guides: IndentGuidesBox {
                show: preferences.indent_guides_show,
                enabled: preferences.indent_guides_show,
                mode: preferences.indent_guides_mode,
            },
            braces_highlighting: preferences.braces_highlighting,
            style: preferences.style.clone(),
            apply_enabled: false,
            revert_enabled: false,
        }
    }
}

/// Staging controller behind the preferences panel
pub struct PreferencesSession {
    committed: Preferences,
    session_start: Preferences,
    draft: Preferences,
    form: PreferencesForm,
    shared: SharedPreferences,
    bus: Broadcaster,
}

impl PreferencesSession {
    /// Open a session on the currently committed preferences
    pub fn new(shared: SharedPreferences, bus: Broadcaster) -> Self {
        let committed = shared.snapshot();
        let form = PreferencesForm::from_preferences(&committed);
        info!("Preferences session opened");
        Self {
            session_start: committed.clone(),
            draft: committed.clone(),
            committed,
            form,
            shared,
            bus,
        }
    }

    pub fn committed(&self) -> &Preferences {
        &self.committed
    }

    pub fn session_start(&self) -> &Preferences {
        &self.session_start
    }

    pub fn draft(&self) -> &Preferences {
        &self.draft
    }

    pub fn form(&self) -> &PreferencesForm {
        &self.form
    }

    pub fn can_apply(&self) -> bool {
        self.form.apply_enabled
    }

    pub fn can_revert(&self) -> bool {
        self.form.revert_enabled
    }

    /// Dispatch one panel interaction
    pub fn handle(&mut self, intent: PreferenceIntent) {
        debug!(?intent, "Preferences intent");
        match intent {
            PreferenceIntent::Apply => {
                self.apply();
            }
            PreferenceIntent::Revert => {
                self.revert();
            }
            PreferenceIntent::CompactLangMenu(on) => {
                self.draft.compact_lang_menu = on;
                self.form.compact_lang_menu = on;
                self.modified();
            }
            PreferenceIntent::FullPathInTitle(on) => {
                self.draft.full_path_in_title = on;
                self.form.full_path_in_title = on;
                self.modified();
            }
            PreferenceIntent::TabsToSpaces(on) => {
                self.draft.tabs_to_spaces = on;
                self.form.tabs_to_spaces = on;
                self.modified();
            }
            PreferenceIntent::TabWidth(width) => {
                self.draft.tab_width = width;
                self.form.tab_width_text = width.to_string();
                self.modified();
            }
            PreferenceIntent::LineHighlighting(on) => {
                self.draft.line_highlighting = on;
                self.form.line_highlighting = on;
                self.modified();
            }
            PreferenceIntent::LineNumbers(on) => {
                self.draft.line_numbers = on;
                self.form.line_numbers = on;
                self.modified();
            }
            PreferenceIntent::EolVisible(on) => {
                self.draft.eol_visible = on;
                self.form.eol_visible = on;
                self.modified();
            }
            PreferenceIntent::WhitespaceVisible(on) => {
                self.draft.whitespace_visible = on;
                self.form.whitespace_visible = on;
                self.modified();
            }
            PreferenceIntent::LineLimitShow(on) => {
                self.draft.line_limit_show = on;
                self.form.line_limit.show = on;
                self.set_line_limit_box_enabled(on);
                self.modified();
            }
            PreferenceIntent::LineLimitMode(mode) => {
                self.draft.line_limit_mode = mode;
                self.form.line_limit.mode = mode;
                self.modified();
            }
            PreferenceIntent::LineLimitColumn(column) => {
                self.draft.line_limit_column = column;
                self.form.line_limit.column_text = column.to_string();
                self.modified();
            }
            PreferenceIntent::IndentGuidesShow(on) => {
                self.draft.indent_guides_show = on;
                self.form.indent_guides.show = on;
                self.set_indent_guides_box_enabled(on);
                self.modified();
            }
            PreferenceIntent::IndentGuidesMode(mode) => {
                self.draft.indent_guides_mode = mode;
                self.form.indent_guides.mode = mode;
                self.modified();
            }
            PreferenceIntent::BracesHighlighting(on) => {
                self.draft.braces_highlighting = on;
                self.form.braces_highlighting = on;
                self.modified();
            }
            PreferenceIntent::Style(name) => {
                self.form.style = name.clone();
                self.draft.style = name;
                self.modified();
            }
        }
    }

    /// Publish the draft as the new committed preferences
    ///
    /// Returns `false` without doing anything when there is nothing to apply.
    pub fn apply(&mut self) -> bool {
        if !self.form.apply_enabled {
            debug!("Apply ignored, nothing staged");
            return false;
        }
        self.draft.validate_and_clamp();
        self.form.tab_width_text = self.draft.tab_width.to_string();
        self.form.line_limit.column_text = self.draft.line_limit_column.to_string();
        // Window frames are recorded outside the panel and never staged
        self.draft.window_rect = self.shared.snapshot().window_rect;
        self.committed = self.draft.clone();
        self.shared.replace(self.committed.clone());
        self.form.apply_enabled = false;

        let delivered = self.bus.publish(AppEvent::ConfigurationChanged);
        info!(delivered, "Preferences applied");
        true
    }

    /// Throw away the draft and go back to the session start
    ///
    /// Returns `false` when there is nothing to revert.
    pub fn revert(&mut self) -> bool {
        if !self.form.revert_enabled {
            debug!("Revert ignored, nothing staged");
            return false;
        }
        self.draft = self.session_start.clone();
        self.sync_form();
        self.form.revert_enabled = false;
        self.form.apply_enabled = true;
        info!("Preferences reverted to session start");
        true
    }

    fn modified(&mut self) {
        self.form.apply_enabled = true;
        self.form.revert_enabled = true;
    }

    /// Re-render every control from the draft, keeping the button states
    fn sync_form(&mut self) {
        let apply_enabled = self.form.apply_enabled;
        let revert_enabled = self.form.revert_enabled;
        self.form = PreferencesForm::from_preferences(&self.draft);
        self.set_line_limit_box_enabled(self.draft.line_limit_show);
        self.set_indent_guides_box_enabled(self.draft.indent_guides_show);
        self.form.apply_enabled = apply_enabled;
        self.form.revert_enabled = revert_enabled;
    }

    fn set_line_limit_box_enabled(&mut self, enabled: bool) {
        self.form.line_limit.enabled = enabled;
        self.form.line_limit.mode = self.draft.line_limit_mode;
    }

    fn set_indent_guides_box_enabled(&mut self, enabled: bool) {
        self.form.indent_guides.enabled = enabled;
        self.form.indent_guides.mode = self.draft.indent_guides_mode;
    }
}

impl Drop for PreferencesSession {
    fn drop(&mut self) {
        debug!(unapplied = self.form.apply_enabled, "Preferences session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WindowRect;

    fn session() -> (PreferencesSession, SharedPreferences, Broadcaster) {
        let shared = SharedPreferences::new(Preferences::default());
        let bus = Broadcaster::new();
        (PreferencesSession::new(shared.clone(), bus.clone()), shared, bus)
    }

    #[test]
    fn test_new_session_starts_clean() {
        let (session, shared, _bus) = session();
        assert!(!session.can_apply());
        assert!(!session.can_revert());
        assert_eq!(session.draft(), &shared.snapshot());
        assert_eq!(session.session_start(), &shared.snapshot());
    }

    #[test]
    fn test_mutations_do_not_touch_committed() {
        let (mut session, shared, _bus) = session();
        let before = shared.snapshot();

        session.handle(PreferenceIntent::TabWidth(8));
        session.handle(PreferenceIntent::LineNumbers(false));
        session.handle(PreferenceIntent::LineLimitMode(LineLimitMode::Line));
        session.handle(PreferenceIntent::Style("dark".to_string()));

        assert_eq!(shared.snapshot(), before);
        assert_eq!(session.committed(), &before);
        assert_eq!(session.draft().tab_width, 8);
    }

    #[test]
    fn test_same_value_still_marks_dirty() {
        let (mut session, shared, _bus) = session();
        let current = shared.snapshot().tabs_to_spaces;

        session.handle(PreferenceIntent::TabsToSpaces(current));
        assert!(session.can_apply());
        assert!(session.can_revert());
    }

    #[test]
    fn test_apply_commits_and_broadcasts_once() {
        let (mut session, shared, bus) = session();
        let mut mailbox = bus.subscribe();

        session.handle(PreferenceIntent::TabWidth(2));
        session.handle(PreferenceIntent::Apply);

        assert_eq!(shared.snapshot().tab_width, 2);
        assert_eq!(session.committed(), session.draft());
        assert!(!session.can_apply());
        assert!(session.can_revert());
        assert_eq!(mailbox.drain(), vec![AppEvent::ConfigurationChanged]);

        // Nothing staged since the last apply
        assert!(!session.apply());
        assert!(mailbox.drain().is_empty());
    }

    #[test]
    fn test_apply_without_changes_is_noop() {
        let (mut session, _shared, bus) = session();
        let mut mailbox = bus.subscribe();
        assert!(!session.apply());
        assert!(mailbox.drain().is_empty());
    }

    #[test]
    fn test_revert_goes_to_session_start_even_after_apply() {
        let (mut session, shared, _bus) = session();
        let start = shared.snapshot();

        session.handle(PreferenceIntent::TabWidth(2));
        session.handle(PreferenceIntent::Apply);
        session.handle(PreferenceIntent::BracesHighlighting(false));
        session.handle(PreferenceIntent::Revert);

        assert_eq!(session.draft(), &start);
        // Committed keeps the applied value until the next apply
        assert_eq!(shared.snapshot().tab_width, 2);
        assert!(!session.can_revert());
        assert!(session.can_apply());
        assert_eq!(session.form().tab_width_text, start.tab_width.to_string());

        session.handle(PreferenceIntent::Apply);
        assert_eq!(shared.snapshot(), start);
    }

    #[test]
    fn test_revert_without_changes_is_noop() {
        let (mut session, _shared, _bus) = session();
        assert!(!session.revert());
        assert!(!session.can_apply());
    }

    #[test]
    fn test_disabling_line_limit_keeps_mode() {
        let (mut session, _shared, _bus) = session();
        session.handle(PreferenceIntent::LineLimitMode(LineLimitMode::Line));
        session.handle(PreferenceIntent::LineLimitShow(false));

        assert!(!session.form().line_limit.enabled);
        assert_eq!(session.form().line_limit.mode, LineLimitMode::Line);
        assert_eq!(session.draft().line_limit_mode, LineLimitMode::Line);

        session.handle(PreferenceIntent::LineLimitShow(true));
        assert!(session.form().line_limit.enabled);
        assert_eq!(session.form().line_limit.mode, LineLimitMode::Line);
    }

    #[test]
    fn test_indent_guides_box_follows_flag() {
        let (mut session, _shared, _bus) = session();
        session.handle(PreferenceIntent::IndentGuidesMode(IndentGuidesMode::Real));
        session.handle(PreferenceIntent::IndentGuidesShow(false));

        assert!(!session.form().indent_guides.enabled);
        assert_eq!(session.form().indent_guides.mode, IndentGuidesMode::Real);
        assert_eq!(session.draft().effective_indent_guides(), None);
    }

    #[test]
    fn test_revert_resyncs_detail_boxes() {
        let (mut session, shared, _bus) = session();
        let start = shared.snapshot();

        session.handle(PreferenceIntent::LineLimitShow(!start.line_limit_show));
        session.handle(PreferenceIntent::IndentGuidesShow(!start.indent_guides_show));
        session.handle(PreferenceIntent::Revert);

        assert_eq!(session.form().line_limit.enabled, start.line_limit_show);
        assert_eq!(session.form().indent_guides.enabled, start.indent_guides_show);
    }

    #[test]
    fn test_zero_tab_width_clamped_on_apply() {
        let (mut session, shared, _bus) = session();
        session.handle(PreferenceIntent::tab_width_from_text("0"));
        session.handle(PreferenceIntent::Apply);
        assert_eq!(shared.snapshot().tab_width, 1);
        assert_eq!(session.form().tab_width_text, "1");
    }

    #[test]
    fn test_oversized_column_clamped_in_form() {
        let (mut session, shared, _bus) = session();
        session.handle(PreferenceIntent::line_limit_column_from_text("100000"));
        session.handle(PreferenceIntent::Apply);

        let column = shared.snapshot().line_limit_column;
        assert_eq!(session.form().line_limit.column_text, column.to_string());
        assert_eq!(
            session.form().line_limit.column_text,
            session.draft().line_limit_column.to_string()
        );
    }

    #[test]
    fn test_apply_keeps_recorded_window_frame() {
        let (mut session, shared, _bus) = session();
        let frame = WindowRect::new(10.0, 20.0, 410.0, 320.0);

        session.handle(PreferenceIntent::TabWidth(2));
        shared.update(|p| p.window_rect = frame);
        session.handle(PreferenceIntent::Apply);

        assert_eq!(shared.snapshot().window_rect, frame);
        assert_eq!(shared.snapshot().tab_width, 2);
    }

    #[test]
    fn test_field_text_parsing() {
        assert_eq!(
            PreferenceIntent::tab_width_from_text(" 8 spaces"),
            PreferenceIntent::TabWidth(8)
        );
        assert_eq!(
            PreferenceIntent::tab_width_from_text("abc"),
            PreferenceIntent::TabWidth(0)
        );
        assert_eq!(
            PreferenceIntent::tab_width_from_text("9999"),
            PreferenceIntent::TabWidth(u8::MAX)
        );
        assert_eq!(
            PreferenceIntent::line_limit_column_from_text("120"),
            PreferenceIntent::LineLimitColumn(120)
        );
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            PreferenceIntent::parse("line_numbers", "off").unwrap(),
            PreferenceIntent::LineNumbers(false)
        );
        assert_eq!(
            PreferenceIntent::parse("indent_guides_mode", "look_forward").unwrap(),
            PreferenceIntent::IndentGuidesMode(IndentGuidesMode::LookForward)
        );
        assert_eq!(
            PreferenceIntent::parse("tab_width", "3").unwrap(),
            PreferenceIntent::TabWidth(3)
        );
        assert!(matches!(
            PreferenceIntent::parse("font_size", "12"),
            Err(IntentError::UnknownKey(_))
        ));
        assert!(matches!(
            PreferenceIntent::parse("line_limit_mode", "dotted"),
            Err(IntentError::InvalidValue { .. })
        ));
    }
}
