//! Editor window
//!
//! Owns one widget and its analyzer. Committed preferences are re-read from
//! the shared handle whenever a configuration change arrives in the window's
//! mailbox; nothing is pushed into the window from outside.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::analyzer::{Reaction, TextAnalyzer};
use crate::app::AppContext;
use crate::bus::{AppEvent, Mailbox};
use crate::config::{LineLimitMode, Preferences, WindowRect};
use crate::constants::{margin, window};
use crate::language::{LanguageId, MenuEntry, menu};
use crate::styler::Styler;
use crate::widget::{EdgeMode, EditAction, MarginType, TextWidget, WidgetCommand};

/// User action aimed at one window
#[derive(Debug, Clone, PartialEq)]
pub enum WindowIntent {
    LanguageSelected(LanguageId),
    /// One based line number as typed by the user
    GoToLine(usize),
    Edit(EditAction),
    /// The buffer was written out, optionally under a new path
    Saved(Option<PathBuf>),
    Moved(WindowRect),
    Close,
}

pub struct EditorWindow<W: TextWidget> {
    widget: W,
    analyzer: TextAnalyzer,
    context: AppContext,
    mailbox: Mailbox,
    styler: Arc<dyn Styler + Send + Sync>,
    /// Snapshot of the committed preferences last applied here
    preferences: Preferences,
    path: Option<PathBuf>,
    title: String,
    language: Option<LanguageId>,
    frame: WindowRect,
    closed: bool,
}

impl<W: TextWidget> EditorWindow<W> {
    pub fn new(widget: W, context: AppContext, path: Option<PathBuf>) -> Self {
        let preferences = context.preferences.snapshot();
        let styler = context.stylers.styler(&preferences.style);
        let mailbox = context.bus.subscribe();

        let mut window = Self {
            widget,
            analyzer: TextAnalyzer::new(context.margin_policy),
            mailbox,
            styler,
            frame: preferences.window_rect,
            preferences,
            path,
            title: String::new(),
            language: None,
            closed: false,
            context,
        };
        window.setup_widget();
        window.apply_preferences();
        window.refresh_title();
        info!(title = %window.title, "Editor window opened");
        window
    }

    /// Settings that never change over the window's life
    fn setup_widget(&mut self) {
        let widget = &mut self.widget;
        widget.send(WidgetCommand::UsePopup(true));
        widget.send(WidgetCommand::SetMarginType {
            margin: margin::NUMBER,
            kind: MarginType::Number,
        });
        widget.send(WidgetCommand::SetMarginType {
            margin: margin::FOLD,
            kind: MarginType::Symbol,
        });
        widget.send(WidgetCommand::SetMarginWidth {
            margin: margin::FOLD,
            width: margin::FOLD_WIDTH,
        });
        widget.send(WidgetCommand::SetMarginSensitive {
            margin: margin::FOLD,
            sensitive: true,
        });
        self.styler.apply_global(widget);
    }

    /// Reconfigure the widget from the committed preferences
    pub fn apply_preferences(&mut self) {
        let preferences = self.context.preferences.snapshot();
        if preferences.style != self.preferences.style {
            self.styler = self.context.stylers.styler(&preferences.style);
            self.styler.apply_global(&mut self.widget);
        }

        let widget = &mut self.widget;
        widget.send(WidgetCommand::SetTabWidth(preferences.tab_width));
        widget.send(WidgetCommand::SetUseTabs(!preferences.tabs_to_spaces));
        widget.send(WidgetCommand::SetCaretLineVisible(preferences.line_highlighting));
        widget.send(WidgetCommand::SetViewEol(preferences.eol_visible));
        widget.send(WidgetCommand::SetViewWhitespace(preferences.whitespace_visible));
        widget.send(WidgetCommand::SetIndentationGuides(
            preferences.effective_indent_guides(),
        ));
        match preferences.effective_line_limit() {
            Some((mode, column)) => {
                widget.send(WidgetCommand::SetEdgeMode(match mode {
                    LineLimitMode::Background => EdgeMode::Background,
                    LineLimitMode::Line => EdgeMode::Line,
                }));
                widget.send(WidgetCommand::SetEdgeColumn(column));
            }
            None => widget.send(WidgetCommand::SetEdgeMode(EdgeMode::None)),
        }
        self.analyzer.apply_preferences(&preferences, widget);

        if let Some(language) = self.language {
            self.dispatch_language(language);
        }

        self.preferences = preferences;
        self.refresh_title();
        debug!(title = %self.title, "Preferences applied to window");
    }

    pub fn handle_intent(&mut self, intent: WindowIntent) {
        match intent {
            WindowIntent::LanguageSelected(id) => self.dispatch_language(id),
            WindowIntent::GoToLine(line) => {
                self.widget
                    .send(WidgetCommand::GotoLine(line.saturating_sub(1)));
            }
            WindowIntent::Edit(action) => self.widget.send(WidgetCommand::Edit(action)),
            WindowIntent::Saved(path) => {
                if let Some(path) = path {
                    self.path = Some(path);
                }
                self.widget.send(WidgetCommand::SetSavePoint);
                self.refresh_title();
            }
            WindowIntent::Moved(frame) => self.frame = frame,
            WindowIntent::Close => self.close(),
        }
        self.process_notifications();
    }

    fn dispatch_language(&mut self, id: LanguageId) {
        let result = self.context.languages.dispatch(
            id,
            &mut self.widget,
            &*self.styler,
            &self.context.keywords,
        );
        if let Ok(language) = result {
            self.analyzer.set_language(language);
            self.language = Some(id);
        }
    }

    /// Run every pending widget notification through the analyzer
    pub fn process_notifications(&mut self) {
        while let Some(notification) = self.widget.poll_notification() {
            let reaction = self
                .analyzer
                .notification_received(notification, &mut self.widget);
            if reaction == Reaction::RefreshTitle {
                self.refresh_title();
            }
        }
    }

    fn handle_event(&mut self, event: AppEvent) {
        debug!(?event, title = %self.title, "Window event");
        match event {
            AppEvent::ConfigurationChanged => self.apply_preferences(),
            AppEvent::EditorQuitting => self.close(),
        }
    }

    /// Handle everything queued so far; returns whether the window is still open
    pub fn pump(&mut self) -> bool {
        for event in self.mailbox.drain() {
            if self.closed {
                break;
            }
            self.handle_event(event);
        }
        self.process_notifications();
        !self.closed
    }

    /// Serve the mailbox until the window closes
    ///
    /// The window holds a bus handle of its own, so the mailbox stays open
    /// until `EditorQuitting` or a `Close` intent ends the loop.
    pub async fn run(mut self) -> Self {
        self.process_notifications();
        while !self.closed {
            let Some(event) = self.mailbox.recv().await else {
                break;
            };
            self.handle_event(event);
            self.process_notifications();
        }
        self
    }

    pub fn refresh_title(&mut self) {
        let name = match &self.path {
            Some(path) if self.preferences.full_path_in_title => path.display().to_string(),
            Some(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            None => window::UNTITLED.to_string(),
        };
        self.title = if self.widget.is_modified() {
            format!("{}{name}", window::MODIFIED_MARKER)
        } else {
            name
        };
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            info!(title = %self.title, "Editor window closed");
        }
    }

    /// Entries of the language menu under the current preferences
    pub fn language_menu(&self) -> Vec<MenuEntry> {
        menu::build(&self.context.languages, self.preferences.compact_lang_menu)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn language(&self) -> Option<LanguageId> {
        self.language
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn frame(&self) -> WindowRect {
        self.frame
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn analyzer(&self) -> &TextAnalyzer {
        &self.analyzer
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }
}
