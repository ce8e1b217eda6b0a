//! Theme driven styling
//!
//! A theme assigns colours to a small set of token classes; each supported
//! lexer maps its style numbers onto those classes.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::constants::{defaults, style};
use crate::error::StyleError;
use crate::widget::{StyleProperty, TextWidget, WidgetCommand};

/// Applies visual styles to a widget
pub trait Styler {
    /// Styles shared by every language
    fn apply_global(&self, widget: &mut dyn TextWidget);

    /// Styles of one lexer
    fn apply_language(
        &self,
        widget: &mut dyn TextWidget,
        lexer_name: &str,
    ) -> Result<(), StyleError>;
}

/// Hands out a styler for a theme name
pub trait StylerCatalog: Send + Sync {
    fn styler(&self, theme: &str) -> Arc<dyn Styler + Send + Sync>;
}

/// Catalog of the themes compiled into the editor
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinThemes;

impl StylerCatalog for BuiltinThemes {
    fn styler(&self, theme: &str) -> Arc<dyn Styler + Send + Sync> {
        Arc::new(ThemeStyler::builtin(theme))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenClass {
    Comment,
    String,
    Number,
    Keyword,
    Type,
    Preprocessor,
    Operator,
}

/// Colours of one theme, all 0xRRGGBB
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    pub foreground: u32,
    pub background: u32,
    pub margin_foreground: u32,
    pub margin_background: u32,
    pub brace_light: u32,
    pub brace_bad: u32,
    pub indent_guide: u32,
    pub comment: u32,
    pub string: u32,
    pub number: u32,
    pub keyword: u32,
    pub type_name: u32,
    pub preprocessor: u32,
    pub operator: u32,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "default".to_string(),
            foreground: 0x000000,
            background: 0xFFFFFF,
            margin_foreground: 0x808080,
            margin_background: 0xF0F0F0,
            brace_light: 0x0000FF,
            brace_bad: 0xFF0000,
            indent_guide: 0xC0C0C0,
            comment: 0x008000,
            string: 0xA31515,
            number: 0x098658,
            keyword: 0x0000FF,
            type_name: 0x267F99,
            preprocessor: 0x800080,
            operator: 0x000000,
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            foreground: 0xD4D4D4,
            background: 0x1E1E1E,
            margin_foreground: 0x858585,
            margin_background: 0x252526,
            brace_light: 0xFFD700,
            brace_bad: 0xF44747,
            indent_guide: 0x404040,
            comment: 0x6A9955,
            string: 0xCE9178,
            number: 0xB5CEA8,
            keyword: 0x569CD6,
            type_name: 0x4EC9B0,
            preprocessor: 0xC586C0,
            operator: 0xD4D4D4,
        }
    }

    fn colour(&self, class: TokenClass) -> u32 {
        match class {
            TokenClass::Comment => self.comment,
            TokenClass::String => self.string,
            TokenClass::Number => self.number,
            TokenClass::Keyword => self.keyword,
            TokenClass::Type => self.type_name,
            TokenClass::Preprocessor => self.preprocessor,
            TokenClass::Operator => self.operator,
        }
    }
}

/// Style numbers of each supported lexer, grouped by token class
fn lexer_styles(lexer_name: &str) -> Option<&'static [(TokenClass, &'static [u32])]> {
    use TokenClass::*;
    let styles: &'static [(TokenClass, &'static [u32])] = match lexer_name {
        "null" | "diff" | "markdown" => &[],
        "cpp" => &[
            (Comment, &[1, 2, 3, 15]),
            (String, &[6, 7, 13, 14, 20]),
            (Number, &[4]),
            (Keyword, &[5]),
            (Type, &[16]),
            (Preprocessor, &[9]),
            (Operator, &[10]),
        ],
        "python" => &[
            (Comment, &[1, 12]),
            (String, &[3, 4, 6, 7]),
            (Number, &[2]),
            (Keyword, &[5]),
            (Type, &[14]),
            (Preprocessor, &[15]),
            (Operator, &[10]),
        ],
        "rust" => &[
            (Comment, &[1, 2, 3, 4]),
            (String, &[13, 14, 15, 21, 22, 23]),
            (Number, &[5]),
            (Keyword, &[6]),
            (Type, &[7]),
            (Preprocessor, &[19]),
            (Operator, &[16]),
        ],
        "bash" => &[
            (Comment, &[2]),
            (String, &[5, 6, 13]),
            (Number, &[3]),
            (Keyword, &[4]),
            (Preprocessor, &[9]),
            (Operator, &[7]),
        ],
        "lua" => &[
            (Comment, &[1, 2, 3]),
            (String, &[6, 7, 8]),
            (Number, &[4]),
            (Keyword, &[5]),
            (Preprocessor, &[9]),
            (Operator, &[10]),
        ],
        "sql" => &[
            (Comment, &[1, 2, 3]),
            (String, &[6, 7]),
            (Number, &[4]),
            (Keyword, &[5]),
            (Operator, &[10]),
        ],
        "json" => &[
            (Comment, &[6, 7]),
            (String, &[2]),
            (Number, &[1]),
            (Keyword, &[11]),
            (Operator, &[9]),
        ],
        "css" => &[
            (Comment, &[9]),
            (String, &[13, 14]),
            (Keyword, &[6]),
            (Type, &[1]),
            (Operator, &[5]),
        ],
        "hypertext" | "xml" => &[
            (Comment, &[9]),
            (String, &[6, 7]),
            (Keyword, &[1]),
            (Type, &[3]),
            (Preprocessor, &[12]),
        ],
        "makefile" | "props" | "yaml" => &[
            (Comment, &[1]),
            (Keyword, &[2]),
            (Operator, &[3]),
        ],
        "perl" | "ruby" => &[
            (Comment, &[2, 3]),
            (String, &[6, 7]),
            (Number, &[4]),
            (Keyword, &[5]),
            (Operator, &[10]),
        ],
        "haskell" => &[
            (Comment, &[13, 14]),
            (String, &[5, 6]),
            (Number, &[2]),
            (Keyword, &[1]),
            (Operator, &[8]),
        ],
        _ => return None,
    };
    Some(styles)
}

/// Styler backed by a built-in [`Theme`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeStyler {
    theme: Theme,
    font: String,
    font_size: u32,
}

impl Default for ThemeStyler {
    fn default() -> Self {
        Self::with_theme(Theme::light())
    }
}

impl ThemeStyler {
    pub fn with_theme(theme: Theme) -> Self {
        Self {
            theme,
            font: defaults::FONT.to_string(),
            font_size: defaults::FONT_SIZE,
        }
    }

    /// Styler for the theme called `name`, falling back to the default theme
    pub fn builtin(name: &str) -> Self {
        match name {
            "default" | "light" => Self::with_theme(Theme::light()),
            "dark" => Self::with_theme(Theme::dark()),
            _ => {
                warn!(style = name, "Unknown style, using default");
                Self::default()
            }
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    fn set(widget: &mut dyn TextWidget, style: u32, property: StyleProperty) {
        widget.send(WidgetCommand::SetStyle { style, property });
    }
}

impl Styler for ThemeStyler {
    fn apply_global(&self, widget: &mut dyn TextWidget) {
        let theme = &self.theme;
        Self::set(widget, style::DEFAULT, StyleProperty::Font(self.font.clone()));
        Self::set(widget, style::DEFAULT, StyleProperty::Size(self.font_size));
        Self::set(widget, style::DEFAULT, StyleProperty::Foreground(theme.foreground));
        Self::set(widget, style::DEFAULT, StyleProperty::Background(theme.background));
        widget.send(WidgetCommand::StyleClearAll);

        Self::set(widget, style::LINE_NUMBER, StyleProperty::Foreground(theme.margin_foreground));
        Self::set(widget, style::LINE_NUMBER, StyleProperty::Background(theme.margin_background));
        Self::set(widget, style::BRACE_LIGHT, StyleProperty::Foreground(theme.brace_light));
        Self::set(widget, style::BRACE_LIGHT, StyleProperty::Bold(true));
        Self::set(widget, style::BRACE_BAD, StyleProperty::Foreground(theme.brace_bad));
        Self::set(widget, style::INDENT_GUIDE, StyleProperty::Foreground(theme.indent_guide));
        debug!(theme = %theme.name, "Applied global styles");
    }

    fn apply_language(
        &self,
        widget: &mut dyn TextWidget,
        lexer_name: &str,
    ) -> Result<(), StyleError> {
        let styles = lexer_styles(lexer_name)
            .ok_or_else(|| StyleError::UnknownLexer(lexer_name.to_string()))?;
        let mut count = 0;
        for &(class, numbers) in styles {
            let colour = self.theme.colour(class);
            for &number in numbers {
                Self::set(widget, number, StyleProperty::Foreground(colour));
                match class {
                    TokenClass::Keyword => Self::set(widget, number, StyleProperty::Bold(true)),
                    TokenClass::Comment => Self::set(widget, number, StyleProperty::Italic(true)),
                    _ => {}
                }
                count += 1;
            }
        }
        debug!(
            theme = %self.theme.name,
            lexer = lexer_name,
            styles = count,
            "Applied language styles"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::MemoryWidget;

    #[test]
    fn test_unknown_theme_falls_back_to_default() {
        assert_eq!(ThemeStyler::builtin("solarized"), ThemeStyler::default());
        assert_eq!(ThemeStyler::builtin("dark").theme().name, "dark");
    }

    #[test]
    fn test_apply_global_sets_default_font() {
        let mut widget = MemoryWidget::new();
        ThemeStyler::default().apply_global(&mut widget);

        assert!(widget.sent().contains(&WidgetCommand::SetStyle {
            style: style::DEFAULT,
            property: StyleProperty::Font(defaults::FONT.to_string()),
        }));
        assert!(widget.sent().contains(&WidgetCommand::StyleClearAll));
    }

    #[test]
    fn test_apply_language_uses_theme_colours() {
        let mut widget = MemoryWidget::new();
        let styler = ThemeStyler::builtin("dark");
        styler.apply_language(&mut widget, "python").unwrap();

        assert!(widget.sent().contains(&WidgetCommand::SetStyle {
            style: 1,
            property: StyleProperty::Foreground(Theme::dark().comment),
        }));
    }

    #[test]
    fn test_apply_language_unknown_lexer() {
        let mut widget = MemoryWidget::new();
        let err = ThemeStyler::default()
            .apply_language(&mut widget, "cobol")
            .unwrap_err();
        assert_eq!(err, StyleError::UnknownLexer("cobol".to_string()));
        assert!(widget.sent().is_empty());
    }
}
