//! Incremental text analysis
//!
//! Reacts to widget notifications one at a time, in the order they arrive:
//!
//! - a typed line break carries the previous line's indentation over
//! - caret moves and edits refresh the brace pair highlight
//! - margin clicks toggle folds
//! - line count changes resize the line number margin
//!
//! Commands issued here may make the widget post further notifications;
//! those are handled on a later call, never re-entrantly.

pub mod braces;
pub mod indent;
pub mod margin;

pub use braces::BraceHighlighter;
pub use margin::{LineNumberMargin, MarginKind, MarginPolicy};

use tracing::trace;

use crate::config::Preferences;
use crate::language::LanguageDefinition;
use crate::widget::{Notification, TextWidget};

/// What the owning window should do after a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    None,
    /// The modified state flipped; the title is stale
    RefreshTitle,
}

#[derive(Debug, Default)]
pub struct TextAnalyzer {
    braces: BraceHighlighter,
    margin: LineNumberMargin,
    brace_highlighting: bool,
    inert_styles: Vec<u32>,
}

impl TextAnalyzer {
    pub fn new(policy: MarginPolicy) -> Self {
        Self {
            margin: LineNumberMargin::new(policy),
            ..Self::default()
        }
    }

    /// Pick up the analysis related preferences
    pub fn apply_preferences(&mut self, preferences: &Preferences, widget: &mut dyn TextWidget) {
        self.brace_highlighting = preferences.braces_highlighting;
        if self.brace_highlighting {
            self.braces.update(widget, &self.inert_styles);
        } else {
            self.braces.clear(widget);
        }
        self.margin.set_enabled(widget, preferences.line_numbers);
    }

    /// Strings and comments of the new language stop taking part in brace matching
    pub fn set_language(&mut self, language: &LanguageDefinition) {
        self.inert_styles = language.inert_styles.clone();
    }

    pub fn brace_highlight(&self) -> Option<(usize, usize)> {
        self.braces.current()
    }

    pub fn notification_received(
        &mut self,
        notification: Notification,
        widget: &mut dyn TextWidget,
    ) -> Reaction {
        trace!(?notification, "Analyzer notification");
        match notification {
            Notification::CharAdded('\n') => {
                indent::maintain_indentation(widget);
            }
            Notification::CharAdded(_) => {}
            Notification::UpdateUi => {
                if self.brace_highlighting {
                    self.braces.update(widget, &self.inert_styles);
                }
            }
            Notification::Modified { lines_added } => {
                if lines_added != 0 {
                    self.margin.update(widget);
                }
            }
            Notification::MarginClicked { x, position } => {
                margin::margin_clicked(widget, x, position);
            }
            Notification::SavePointLeft | Notification::SavePointReached => {
                return Reaction::RefreshTitle;
            }
        }
        Reaction::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants;
    use crate::language::LanguageRegistry;
    use crate::widget::{MemoryWidget, WidgetCommand};

    /// Feed every queued notification through the analyzer
    fn settle(analyzer: &mut TextAnalyzer, widget: &mut MemoryWidget) -> Vec<Reaction> {
        let mut reactions = Vec::new();
        while let Some(notification) = widget.poll_notification() {
            reactions.push(analyzer.notification_received(notification, widget));
        }
        reactions
    }

    fn analyzer(widget: &mut MemoryWidget) -> TextAnalyzer {
        let mut analyzer = TextAnalyzer::new(MarginPolicy::GrowOnly);
        analyzer.apply_preferences(&Preferences::default(), widget);
        analyzer
    }

    #[test]
    fn test_typing_newline_keeps_indentation() {
        let mut widget = MemoryWidget::new();
        let mut analyzer = analyzer(&mut widget);

        widget.type_text("    if x:\n");
        settle(&mut analyzer, &mut widget);
        widget.type_text("y");
        settle(&mut analyzer, &mut widget);

        assert_eq!(widget.text(), "    if x:\n    y");
    }

    #[test]
    fn test_typing_closing_brace_highlights_pair() {
        let mut widget = MemoryWidget::new();
        let mut analyzer = analyzer(&mut widget);

        widget.type_text("f(a)");
        settle(&mut analyzer, &mut widget);
        assert_eq!(analyzer.brace_highlight(), Some((1, 3)));

        widget.type_text(" ");
        settle(&mut analyzer, &mut widget);
        assert_eq!(analyzer.brace_highlight(), None);
    }

    #[test]
    fn test_language_inert_styles_apply() {
        let mut widget = MemoryWidget::with_text("(\")\")");
        let mut analyzer = analyzer(&mut widget);
        let registry = LanguageRegistry::builtin();
        analyzer.set_language(registry.find_by_lexer("cpp").unwrap());

        widget.set_style_range(1, 4, 6);
        widget.move_caret(1);
        settle(&mut analyzer, &mut widget);
        assert_eq!(analyzer.brace_highlight(), Some((0, 4)));
    }

    #[test]
    fn test_brace_highlighting_off_clears() {
        let mut widget = MemoryWidget::with_text("(x)");
        let mut analyzer = analyzer(&mut widget);
        widget.move_caret(1);
        settle(&mut analyzer, &mut widget);
        assert!(analyzer.brace_highlight().is_some());

        let preferences = Preferences {
            braces_highlighting: false,
            ..Preferences::default()
        };
        analyzer.apply_preferences(&preferences, &mut widget);
        assert_eq!(widget.state().brace_highlight, None);

        widget.move_caret(0);
        settle(&mut analyzer, &mut widget);
        assert_eq!(analyzer.brace_highlight(), None);
    }

    #[test]
    fn test_new_lines_grow_margin() {
        let mut widget = MemoryWidget::with_text(&"x\n".repeat(8));
        let mut analyzer = analyzer(&mut widget);
        let narrow = widget.margin_width(constants::margin::NUMBER);

        widget.move_caret(widget.len_chars());
        widget.type_char('\n');
        settle(&mut analyzer, &mut widget);

        assert!(widget.margin_width(constants::margin::NUMBER) > narrow);
    }

    #[test]
    fn test_carriage_return_grows_margin() {
        let mut widget = MemoryWidget::with_text(&"x\n".repeat(8));
        let mut analyzer = analyzer(&mut widget);
        let narrow = widget.margin_width(constants::margin::NUMBER);

        widget.move_caret(widget.len_chars());
        widget.type_char('\r');
        settle(&mut analyzer, &mut widget);

        assert_eq!(widget.line_count(), 10);
        assert!(widget.margin_width(constants::margin::NUMBER) > narrow);
    }

    #[test]
    fn test_newline_in_empty_document() {
        let mut widget = MemoryWidget::new();
        let mut analyzer = analyzer(&mut widget);
        widget.take_sent();

        widget.type_char('\n');
        settle(&mut analyzer, &mut widget);

        assert_eq!(widget.text(), "\n");
        assert_eq!(widget.caret(), 1);
        assert!(!widget
            .sent()
            .iter()
            .any(|c| matches!(c, WidgetCommand::InsertText { .. })));
    }

    #[test]
    fn test_save_points_ask_for_title_refresh() {
        let mut widget = MemoryWidget::new();
        let mut analyzer = analyzer(&mut widget);

        widget.type_char('a');
        let reactions = settle(&mut analyzer, &mut widget);
        assert_eq!(reactions.iter().filter(|r| **r == Reaction::RefreshTitle).count(), 1);

        widget.send(WidgetCommand::SetSavePoint);
        assert_eq!(settle(&mut analyzer, &mut widget), vec![Reaction::RefreshTitle]);
    }

    #[test]
    fn test_fold_margin_click() {
        let mut widget = MemoryWidget::with_text("a {\n  b\n}\n");
        let mut analyzer = analyzer(&mut widget);
        widget.send(WidgetCommand::SetMarginWidth {
            margin: constants::margin::FOLD,
            width: constants::margin::FOLD_WIDTH,
        });
        let number = widget.margin_width(constants::margin::NUMBER);

        widget.click_margin(number + 1, 1);
        settle(&mut analyzer, &mut widget);
        assert!(widget.is_collapsed(0));
    }
}
