//! Languages known to the editor out of the box

use super::{LanguageDefinition, LanguageId, LexerId};

struct Entry {
    short_name: &'static str,
    lexer_id: i32,
    lexer_name: &'static str,
    /// Lexer styles for strings and comments
    inert_styles: &'static [u32],
}

const CPP_INERT: &[u32] = &[1, 2, 3, 6, 7, 13, 14, 15, 17, 20, 21];
const MARKUP_INERT: &[u32] = &[6, 7, 9];

const ENTRIES: &[Entry] = &[
    Entry {
        short_name: "Plain text",
        lexer_id: 1,
        lexer_name: "null",
        inert_styles: &[],
    },
    Entry {
        short_name: "C",
        lexer_id: 3,
        lexer_name: "cpp",
        inert_styles: CPP_INERT,
    },
    Entry {
        short_name: "C++",
        lexer_id: 3,
        lexer_name: "cpp",
        inert_styles: CPP_INERT,
    },
    Entry {
        short_name: "Python",
        lexer_id: 2,
        lexer_name: "python",
        inert_styles: &[1, 3, 4, 6, 7, 12, 13, 16, 17, 18, 19],
    },
    Entry {
        short_name: "HTML",
        lexer_id: 4,
        lexer_name: "hypertext",
        inert_styles: MARKUP_INERT,
    },
    Entry {
        short_name: "XML",
        lexer_id: 5,
        lexer_name: "xml",
        inert_styles: MARKUP_INERT,
    },
    Entry {
        short_name: "CSS",
        lexer_id: 38,
        lexer_name: "css",
        inert_styles: &[9, 13, 14],
    },
    Entry {
        short_name: "JavaScript",
        lexer_id: 3,
        lexer_name: "cpp",
        inert_styles: CPP_INERT,
    },
    Entry {
        short_name: "Rust",
        lexer_id: 111,
        lexer_name: "rust",
        inert_styles: &[1, 2, 3, 4, 13, 14, 15, 21, 22, 23],
    },
    Entry {
        short_name: "Makefile",
        lexer_id: 11,
        lexer_name: "makefile",
        inert_styles: &[1],
    },
    Entry {
        short_name: "Bash",
        lexer_id: 62,
        lexer_name: "bash",
        inert_styles: &[2, 5, 6, 13],
    },
    Entry {
        short_name: "Lua",
        lexer_id: 15,
        lexer_name: "lua",
        inert_styles: &[1, 2, 3, 6, 7, 8],
    },
    Entry {
        short_name: "Ruby",
        lexer_id: 22,
        lexer_name: "ruby",
        inert_styles: &[2, 3, 6, 7],
    },
    Entry {
        short_name: "Perl",
        lexer_id: 6,
        lexer_name: "perl",
        inert_styles: &[2, 3, 6, 7],
    },
    Entry {
        short_name: "SQL",
        lexer_id: 7,
        lexer_name: "sql",
        inert_styles: &[1, 2, 3, 6, 7],
    },
    Entry {
        short_name: "Haskell",
        lexer_id: 68,
        lexer_name: "haskell",
        inert_styles: &[5, 6, 13, 14, 15, 16],
    },
    Entry {
        short_name: "Markdown",
        lexer_id: 98,
        lexer_name: "markdown",
        inert_styles: &[],
    },
    Entry {
        short_name: "YAML",
        lexer_id: 48,
        lexer_name: "yaml",
        inert_styles: &[1],
    },
    Entry {
        short_name: "JSON",
        lexer_id: 120,
        lexer_name: "json",
        inert_styles: &[2, 6, 7],
    },
    Entry {
        short_name: "Diff",
        lexer_id: 16,
        lexer_name: "diff",
        inert_styles: &[],
    },
    Entry {
        short_name: "Properties",
        lexer_id: 9,
        lexer_name: "props",
        inert_styles: &[1],
    },
];

/// Built-in definitions, identifiers assigned in table order
pub(super) fn definitions() -> Vec<LanguageDefinition> {
    ENTRIES
        .iter()
        .enumerate()
        .map(|(index, entry)| LanguageDefinition {
            id: LanguageId(index as u32),
            short_name: entry.short_name.to_string(),
            lexer_id: LexerId(entry.lexer_id),
            lexer_name: entry.lexer_name.to_string(),
            inert_styles: entry.inert_styles.to_vec(),
        })
        .collect()
}
