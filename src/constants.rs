//! Application-wide constants
//!
//! Single source of truth for magic numbers shared between the analyzer,
//! the window and the configuration layer.

/// Settings location
pub mod config {
    /// Directory under the platform config dir
    pub const APP_DIR: &str = "Koder";

    /// Preferences file name
    pub const FILENAME: &str = "settings.json";

    /// Keyword table file name, looked up next to the preferences file
    pub const KEYWORDS_FILENAME: &str = "keywords.json";
}

/// Validation bounds applied after loading preferences
pub mod validation {
    pub const MIN_TAB_WIDTH: u8 = 1;
    pub const MAX_TAB_WIDTH: u8 = 32;
    pub const MAX_LINE_LIMIT_COLUMN: u32 = 4096;
}

/// Default preference values
pub mod defaults {
    pub const TAB_WIDTH: u8 = 4;
    pub const LINE_LIMIT_COLUMN: u32 = 80;
    pub const STYLE: &str = "default";
    pub const FONT: &str = "DejaVu Sans Mono";
    pub const FONT_SIZE: u32 = 10;
}

/// Widget margins
pub mod margin {
    /// Margin index showing line numbers
    pub const NUMBER: u32 = 0;

    /// Margin index showing fold markers
    pub const FOLD: u32 = 1;

    /// Fixed width of the fold margin in pixels
    pub const FOLD_WIDTH: u32 = 16;

    /// Extra pixels to the right of the widest line number
    pub const NUMBER_PADDING: u32 = 4;

    /// Line numbers are always measured with at least this many digits
    pub const MIN_NUMBER_DIGITS: usize = 1;
}

/// Widget style slots shared by every lexer
pub mod style {
    pub const DEFAULT: u32 = 32;
    pub const LINE_NUMBER: u32 = 33;
    pub const BRACE_LIGHT: u32 = 34;
    pub const BRACE_BAD: u32 = 35;
    pub const INDENT_GUIDE: u32 = 37;
}

/// Brace analysis
pub mod braces {
    /// Characters considered braces by the matcher
    pub const PAIRS: &[(char, char)] = &[('(', ')'), ('[', ']'), ('{', '}')];

    /// Upper bound on characters examined per brace search
    pub const MAX_SCAN: usize = 20_000;
}

/// Window chrome
pub mod window {
    pub const UNTITLED: &str = "Untitled";
    pub const MODIFIED_MARKER: &str = "*";
}
