//! Editor preferences
//!
//! A plain value object holding every editing/display option. Windows never
//! share a mutable instance: they copy the committed snapshot when they need
//! it and the staging session replaces it wholesale on Apply.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::constants::{defaults, validation};
use crate::error::ConfigError;

/// How indentation guides are drawn when enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndentGuidesMode {
    /// Only inside real indentation
    Real,
    /// Up to the next non-empty line
    LookForward,
    /// Up to the next or previous non-empty line
    #[default]
    LookBoth,
}

/// How lines exceeding the limit column are marked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineLimitMode {
    /// Colour the background past the limit column
    #[default]
    Background,
    /// Draw a vertical line at the limit column
    Line,
}

/// Last known editor window frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl WindowRect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }
}

impl Default for WindowRect {
    fn default() -> Self {
        Self::new(200.0, 200.0, 605.0, 605.0)
    }
}

/// Complete set of editor preferences
///
/// Enable flags and their sub-modes are stored independently: a mode is
/// ignored while its flag is off but survives toggling and save/load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Where this snapshot was loaded from and will be saved to
    #[serde(skip)]
    pub settings_path: PathBuf,

    // File specific
    #[serde(default = "default_tab_width")]
    pub tab_width: u8,
    #[serde(default)]
    pub tabs_to_spaces: bool,

    // Broadcast to all editors
    #[serde(default = "default_true")]
    pub line_highlighting: bool,
    #[serde(default = "default_true")]
    pub line_numbers: bool,
    #[serde(default)]
    pub eol_visible: bool,
    #[serde(default)]
    pub whitespace_visible: bool,
    #[serde(default = "default_true")]
    pub indent_guides_show: bool,
    #[serde(default)]
    pub indent_guides_mode: IndentGuidesMode,
    #[serde(default = "default_true")]
    pub line_limit_show: bool,
    #[serde(default)]
    pub line_limit_mode: LineLimitMode,
    #[serde(default = "default_line_limit_column")]
    pub line_limit_column: u32,
    #[serde(default = "default_true")]
    pub braces_highlighting: bool,
    #[serde(default)]
    pub full_path_in_title: bool,
    #[serde(default = "default_true")]
    pub compact_lang_menu: bool,
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default)]
    pub window_rect: WindowRect,
}

fn default_tab_width() -> u8 {
    defaults::TAB_WIDTH
}

fn default_line_limit_column() -> u32 {
    defaults::LINE_LIMIT_COLUMN
}

fn default_style() -> String {
    defaults::STYLE.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            settings_path: PathBuf::new(),
            tab_width: default_tab_width(),
            tabs_to_spaces: false,
            line_highlighting: true,
            line_numbers: true,
            eol_visible: false,
            whitespace_visible: false,
            indent_guides_show: true,
            indent_guides_mode: IndentGuidesMode::default(),
            line_limit_show: true,
            line_limit_mode: LineLimitMode::default(),
            line_limit_column: default_line_limit_column(),
            braces_highlighting: true,
            full_path_in_title: false,
            compact_lang_menu: true,
            style: default_style(),
            window_rect: WindowRect::default(),
        }
    }
}

impl Preferences {
    /// Default location of the settings file
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(crate::constants::config::APP_DIR);
        path.push(crate::constants::config::FILENAME);
        path
    }

    /// Load preferences from `path`
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

        let mut preferences: Preferences =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        preferences.settings_path = path.to_path_buf();
        preferences.validate_and_clamp();

        info!(path = %path.display(), "Loaded preferences");
        Ok(preferences)
    }

    /// Load preferences, falling back to defaults when the file is missing or broken
    ///
    /// Returns the error alongside the defaults so the caller can tell the
    /// user why their settings were not picked up.
    pub fn load_or_default(path: &Path) -> (Self, Option<ConfigError>) {
        match Self::load(path) {
            Ok(preferences) => (preferences, None),
            Err(ConfigError::NotFound(_)) => {
                info!(path = %path.display(), "No settings file, using defaults");
                (Self::with_path(path), None)
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "Failed to load settings, using defaults"
                );
                (Self::with_path(path), Some(err))
            }
        }
    }

    /// Defaults bound to a settings path
    pub fn with_path(path: &Path) -> Self {
        Self {
            settings_path: path.to_path_buf(),
            ..Self::default()
        }
    }

    /// Write preferences to their settings path
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&self.settings_path)
    }

    /// Write preferences to `path` as pretty JSON
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(path, json).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Saved preferences");
        Ok(())
    }

    /// Indent guide mode in effect, `None` when guides are off
    pub fn effective_indent_guides(&self) -> Option<IndentGuidesMode> {
        self.indent_guides_show.then_some(self.indent_guides_mode)
    }

    /// Line limit marking in effect, `None` when disabled
    pub fn effective_line_limit(&self) -> Option<(LineLimitMode, u32)> {
        self.line_limit_show
            .then_some((self.line_limit_mode, self.line_limit_column))
    }

    /// Clamp values that would confuse the widget
    pub(crate) fn validate_and_clamp(&mut self) {
        if self.tab_width < validation::MIN_TAB_WIDTH {
            warn!(
                tab_width = self.tab_width,
                min = validation::MIN_TAB_WIDTH,
                "tab_width below minimum, clamping"
            );
            self.tab_width = validation::MIN_TAB_WIDTH;
        } else if self.tab_width > validation::MAX_TAB_WIDTH {
            warn!(
                tab_width = self.tab_width,
                max = validation::MAX_TAB_WIDTH,
                "tab_width exceeds maximum, clamping"
            );
            self.tab_width = validation::MAX_TAB_WIDTH;
        }

        if self.line_limit_column > validation::MAX_LINE_LIMIT_COLUMN {
            warn!(
                line_limit_column = self.line_limit_column,
                max = validation::MAX_LINE_LIMIT_COLUMN,
                "line_limit_column exceeds maximum, clamping"
            );
            self.line_limit_column = validation::MAX_LINE_LIMIT_COLUMN;
        }

        if self.style.trim().is_empty() {
            warn!("empty style name, using default");
            self.style = default_style();
        }
    }
}
