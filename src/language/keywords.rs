//! Keyword lists per lexer
//!
//! Loaded from a JSON object mapping a lexer name to its keyword sets:
//!
//! ```json
//! { "cpp": ["int char return", "size_t uint8_t"] }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::widget::{TextWidget, WidgetCommand};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordTable {
    lexers: HashMap<String, Vec<String>>,
}

impl KeywordTable {
    /// Keyword sets shipped with the editor
    pub fn builtin() -> Self {
        let mut table = Self::default();
        table.insert(
            "cpp",
            vec![
                "alignas auto bool break case catch char class const constexpr continue default \
                 delete do double else enum explicit extern false float for friend goto if \
                 inline int long namespace new noexcept nullptr operator private protected \
                 public return short signed sizeof static struct switch template this throw \
                 true try typedef typename union unsigned using virtual void volatile while \
                 function let var",
                "int8_t int16_t int32_t int64_t uint8_t uint16_t uint32_t uint64_t size_t",
            ],
        );
        table.insert(
            "python",
            vec![
                "False None True and as assert async await break class continue def del elif \
                 else except finally for from global if import in is lambda nonlocal not or \
                 pass raise return try while with yield",
            ],
        );
        table.insert(
            "rust",
            vec![
                "as async await break const continue crate dyn else enum extern false fn for \
                 if impl in let loop match mod move mut pub ref return self Self static struct \
                 super trait true type unsafe use where while",
                "bool char f32 f64 i8 i16 i32 i64 i128 isize str u8 u16 u32 u64 u128 usize",
            ],
        );
        table.insert(
            "bash",
            vec!["case do done elif else esac fi for function if in select then until while"],
        );
        table
    }

    /// Load a table from `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let table: KeywordTable =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        info!(path = %path.display(), lexers = table.lexers.len(), "Loaded keyword table");
        Ok(table)
    }

    pub fn insert(&mut self, lexer_name: &str, sets: Vec<&str>) {
        self.lexers.insert(
            lexer_name.to_string(),
            sets.into_iter().map(str::to_string).collect(),
        );
    }

    /// Entries from `other` replace ours lexer by lexer
    pub fn merge(&mut self, other: KeywordTable) {
        self.lexers.extend(other.lexers);
    }

    pub fn sets(&self, lexer_name: &str) -> Option<&[String]> {
        self.lexers.get(lexer_name).map(Vec::as_slice)
    }

    /// Send every keyword set for `lexer_name`; returns whether the lexer had any
    pub fn apply(&self, widget: &mut dyn TextWidget, lexer_name: &str) -> bool {
        let Some(sets) = self.sets(lexer_name) else {
            debug!(lexer = lexer_name, "No keywords for lexer");
            return false;
        };
        for (set, words) in sets.iter().enumerate() {
            widget.send(WidgetCommand::SetKeywords {
                set,
                words: words.clone(),
            });
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::MemoryWidget;

    #[test]
    fn test_load_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keywords.json");
        fs::write(&path, r#"{ "lua": ["local function end", "print"] }"#).unwrap();

        let table = KeywordTable::load(&path).unwrap();
        assert_eq!(table.sets("lua").unwrap().len(), 2);
        assert!(table.sets("cpp").is_none());
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = KeywordTable::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_merge_overrides_per_lexer() {
        let mut table = KeywordTable::builtin();
        let mut user = KeywordTable::default();
        user.insert("rust", vec!["fn"]);
        table.merge(user);

        assert_eq!(table.sets("rust").unwrap(), ["fn".to_string()]);
        assert!(table.sets("cpp").is_some());
    }

    #[test]
    fn test_apply_sends_each_set() {
        let table = KeywordTable::builtin();
        let mut widget = MemoryWidget::new();

        assert!(table.apply(&mut widget, "rust"));
        assert_eq!(widget.state().keywords.len(), 2);
        assert!(widget.state().keywords[&0].contains("fn"));

        assert!(!table.apply(&mut widget, "diff"));
    }
}
