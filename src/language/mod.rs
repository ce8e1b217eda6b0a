//! Language registry
//!
//! Maps a stable [`LanguageId`] to its display name and lexer, keeps a
//! separate presentation order for menus and switches a widget to a
//! language.

mod builtin;
pub mod keywords;
pub mod menu;

pub use keywords::KeywordTable;
pub use menu::MenuEntry;

use std::fmt;
use tracing::{debug, error, warn};

use crate::error::LookupError;
use crate::styler::Styler;
use crate::widget::{TextWidget, WidgetCommand};

/// Stable language identifier, also the index into the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguageId(pub u32);

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lexer number understood by the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LexerId(pub i32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageDefinition {
    pub id: LanguageId,
    pub short_name: String,
    pub lexer_id: LexerId,
    pub lexer_name: String,
    /// Lexer styles of strings and comments, skipped by brace matching
    pub inert_styles: Vec<u32>,
}

/// Fixed collection of languages, built once at startup
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    /// Indexed by identifier
    definitions: Vec<LanguageDefinition>,
    /// Presentation order as identifiers
    order: Vec<LanguageId>,
}

impl LanguageRegistry {
    pub fn builtin() -> Self {
        Self::from_definitions(builtin::definitions())
    }

    /// Registry over `definitions`, reassigning identifiers by position
    pub fn from_definitions(mut definitions: Vec<LanguageDefinition>) -> Self {
        for (index, def) in definitions.iter_mut().enumerate() {
            def.id = LanguageId(index as u32);
        }
        let order = definitions.iter().map(|def| def.id).collect();
        Self { definitions, order }
    }

    pub fn count(&self) -> usize {
        self.definitions.len()
    }

    pub fn lookup(&self, id: LanguageId) -> Result<&LanguageDefinition, LookupError> {
        self.definitions
            .get(id.0 as usize)
            .ok_or(LookupError::UnknownLanguage(id))
    }

    /// Definition at `index` in presentation order
    pub fn at(&self, index: usize) -> Option<&LanguageDefinition> {
        self.order
            .get(index)
            .map(|id| &self.definitions[id.0 as usize])
    }

    /// Definitions in presentation order
    pub fn iter(&self) -> impl Iterator<Item = &LanguageDefinition> {
        self.order.iter().map(|id| &self.definitions[id.0 as usize])
    }

    /// Language whose display name or lexer name is `name`, ignoring case
    pub fn find_by_name(&self, name: &str) -> Option<&LanguageDefinition> {
        self.definitions
            .iter()
            .find(|def| def.short_name.eq_ignore_ascii_case(name))
            .or_else(|| self.find_by_lexer(&name.to_ascii_lowercase()))
    }

    /// First language using `lexer_name`
    pub fn find_by_lexer(&self, lexer_name: &str) -> Option<&LanguageDefinition> {
        self.definitions.iter().find(|def| def.lexer_name == lexer_name)
    }

    /// Reorder the presentation by display name, byte-wise and stable
    pub fn sort_alphabetically(&mut self) {
        let definitions = &self.definitions;
        self.order.sort_by_key(|id| definitions[id.0 as usize].short_name.as_str());
    }

    /// Switch `widget` to language `id`
    ///
    /// Selects the lexer, then applies the lexer's styles and keyword sets.
    /// A failed step is logged and the remaining ones still run.
    pub fn dispatch(
        &self,
        id: LanguageId,
        widget: &mut dyn TextWidget,
        styler: &dyn Styler,
        keywords: &KeywordTable,
    ) -> Result<&LanguageDefinition, LookupError> {
        let def = match self.lookup(id) {
            Ok(def) => def,
            Err(err) => {
                debug_assert!(false, "{err}");
                error!(language = %id, "Language dispatch for unknown id ignored");
                return Err(err);
            }
        };

        widget.send(WidgetCommand::SetLexer(def.lexer_id));
        if let Err(err) = styler.apply_language(widget, &def.lexer_name) {
            warn!(language = %def.short_name, error = %err, "Failed to style language");
        }
        keywords.apply(widget, &def.lexer_name);

        debug!(language = %def.short_name, lexer = %def.lexer_name, "Language applied");
        Ok(def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styler::ThemeStyler;
    use crate::widget::MemoryWidget;

    #[test]
    fn test_lookup_by_id() {
        let registry = LanguageRegistry::builtin();
        for index in 0..registry.count() {
            let id = LanguageId(index as u32);
            assert_eq!(registry.lookup(id).unwrap().id, id);
        }
        let past_end = LanguageId(registry.count() as u32);
        assert_eq!(
            registry.lookup(past_end).unwrap_err(),
            LookupError::UnknownLanguage(past_end)
        );
    }

    #[test]
    fn test_sort_preserves_lookup() {
        let mut registry = LanguageRegistry::builtin();
        let before: Vec<LanguageDefinition> = (0..registry.count())
            .map(|i| registry.lookup(LanguageId(i as u32)).unwrap().clone())
            .collect();

        registry.sort_alphabetically();

        for def in &before {
            assert_eq!(registry.lookup(def.id).unwrap(), def);
        }
        let names: Vec<&str> = (0..registry.count())
            .map(|i| registry.at(i).unwrap().short_name.as_str())
            .collect();
        assert!(names.windows(2).all(|w| w[0] <= w[1]));
        assert!(registry.at(registry.count()).is_none());
    }

    #[test]
    fn test_sort_is_stable_and_case_sensitive() {
        let def = |name: &str| LanguageDefinition {
            id: LanguageId(0),
            short_name: name.to_string(),
            lexer_id: LexerId(1),
            lexer_name: "null".to_string(),
            inert_styles: Vec::new(),
        };
        let mut registry = LanguageRegistry::from_definitions(vec![
            def("b"),
            def("B"),
            def("a"),
            def("B"),
        ]);
        registry.sort_alphabetically();

        let ids: Vec<u32> = registry.iter().map(|d| d.id.0).collect();
        assert_eq!(ids, [1, 3, 2, 0]);
    }

    #[test]
    fn test_find_by_name() {
        let registry = LanguageRegistry::builtin();
        assert_eq!(registry.find_by_name("python").unwrap().short_name, "Python");
        assert_eq!(registry.find_by_name("Plain Text").unwrap().lexer_name, "null");
        assert_eq!(registry.find_by_name("hypertext").unwrap().short_name, "HTML");
        assert!(registry.find_by_name("cobol").is_none());
    }

    #[test]
    fn test_dispatch_sends_lexer_styles_and_keywords() {
        let registry = LanguageRegistry::builtin();
        let rust = registry.find_by_lexer("rust").unwrap().id;
        let mut widget = MemoryWidget::new();

        let def = registry
            .dispatch(rust, &mut widget, &ThemeStyler::default(), &KeywordTable::builtin())
            .unwrap();

        assert_eq!(def.short_name, "Rust");
        assert_eq!(widget.sent()[0], WidgetCommand::SetLexer(LexerId(111)));
        assert_eq!(widget.state().lexer, Some(LexerId(111)));
        assert!(!widget.state().keywords.is_empty());
        assert!(widget
            .sent()
            .iter()
            .any(|c| matches!(c, WidgetCommand::SetStyle { .. })));
    }

    #[test]
    fn test_dispatch_without_lexer_styles_still_sets_lexer() {
        let registry = LanguageRegistry::builtin();
        let diff = registry.find_by_lexer("diff").unwrap().id;
        let mut widget = MemoryWidget::new();

        registry
            .dispatch(diff, &mut widget, &ThemeStyler::default(), &KeywordTable::default())
            .unwrap();
        assert_eq!(widget.state().lexer, Some(LexerId(16)));
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "unknown language id"))]
    fn test_dispatch_unknown_id() {
        let registry = LanguageRegistry::builtin();
        let mut widget = MemoryWidget::new();
        let result = registry.dispatch(
            LanguageId(999),
            &mut widget,
            &ThemeStyler::default(),
            &KeywordTable::default(),
        );
        assert!(result.is_err());
        assert!(widget.sent().is_empty());
    }
}
