//! Headless widget backed by a rope
//!
//! Applies the commands that affect buffer or caret state, remembers the
//! display settings it is given, and queues notifications the way a real
//! widget would post them. Rendering is reduced to a fixed character width.

use ropey::Rope;
use std::collections::{BTreeSet, HashMap, VecDeque};
use tracing::{debug, trace};

use super::{EdgeMode, EditAction, Notification, StyleProperty, TextWidget, WidgetCommand};
use crate::config::IndentGuidesMode;
use crate::language::LexerId;

/// Pixel width of every character
pub const CHAR_WIDTH: u32 = 8;

/// Display settings the widget has been told about
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetState {
    pub lexer: Option<LexerId>,
    pub keywords: HashMap<usize, String>,
    pub styles: HashMap<(u32, StylePropertyKind), StyleProperty>,
    pub tab_width: u8,
    pub use_tabs: bool,
    pub caret_line_visible: bool,
    pub margin_widths: HashMap<u32, u32>,
    pub view_eol: bool,
    pub view_whitespace: bool,
    pub indentation_guides: Option<IndentGuidesMode>,
    pub edge_mode: Option<EdgeMode>,
    pub edge_column: u32,
    pub brace_highlight: Option<(usize, usize)>,
    pub use_popup: bool,
}

/// Discriminant of [`StyleProperty`], so each slot keeps one value per property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StylePropertyKind {
    Font,
    Size,
    Foreground,
    Background,
    Bold,
    Italic,
}

impl From<&StyleProperty> for StylePropertyKind {
    fn from(property: &StyleProperty) -> Self {
        match property {
            StyleProperty::Font(_) => Self::Font,
            StyleProperty::Size(_) => Self::Size,
            StyleProperty::Foreground(_) => Self::Foreground,
            StyleProperty::Background(_) => Self::Background,
            StyleProperty::Bold(_) => Self::Bold,
            StyleProperty::Italic(_) => Self::Italic,
        }
    }
}

#[derive(Default)]
pub struct MemoryWidget {
    text: Rope,
    /// Lexer style per character
    char_styles: Vec<u32>,
    caret: usize,
    anchor: usize,
    modified: bool,
    clipboard: String,
    collapsed: BTreeSet<usize>,
    state: WidgetState,
    sent: Vec<WidgetCommand>,
    pending: VecDeque<Notification>,
}

impl MemoryWidget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Widget preloaded with `text`, unmodified, caret at the start
    pub fn with_text(text: &str) -> Self {
        let rope = Rope::from_str(text);
        Self {
            char_styles: vec![0; rope.len_chars()],
            text: rope,
            ..Self::default()
        }
    }

    pub fn text(&self) -> String {
        self.text.to_string()
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    /// Every command received so far
    pub fn sent(&self) -> &[WidgetCommand] {
        &self.sent
    }

    pub fn take_sent(&mut self) -> Vec<WidgetCommand> {
        std::mem::take(&mut self.sent)
    }

    pub fn selection(&self) -> (usize, usize) {
        (self.anchor.min(self.caret), self.anchor.max(self.caret))
    }

    pub fn is_collapsed(&self, line: usize) -> bool {
        self.collapsed.contains(&line)
    }

    /// Mark `start..end` with lexer style `style`
    pub fn set_style_range(&mut self, start: usize, end: usize, style: u32) {
        let end = end.min(self.char_styles.len());
        for slot in &mut self.char_styles[start.min(end)..end] {
            *slot = style;
        }
    }

    /// Type one character at the caret, replacing the selection
    pub fn type_char(&mut self, c: char) {
        self.delete_selection();
        let mut buf = [0u8; 4];
        self.insert(self.caret, c.encode_utf8(&mut buf));
        self.caret += 1;
        self.anchor = self.caret;
        self.pending.push_back(Notification::CharAdded(c));
        self.pending.push_back(Notification::UpdateUi);
    }

    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.type_char(c);
        }
    }

    /// Caret moved by the user
    pub fn move_caret(&mut self, pos: usize) {
        self.caret = pos.min(self.text.len_chars());
        self.anchor = self.caret;
        self.pending.push_back(Notification::UpdateUi);
    }

    /// Delete `start..end` as the user would with backspace
    pub fn delete_range(&mut self, start: usize, end: usize) {
        self.remove(start, end);
        self.caret = start.min(self.text.len_chars());
        self.anchor = self.caret;
        self.pending.push_back(Notification::UpdateUi);
    }

    /// Pointer pressed in the margin area at `x` on `line`
    pub fn click_margin(&mut self, x: u32, line: usize) {
        let position = self.line_start(line);
        self.pending.push_back(Notification::MarginClicked { x, position });
    }

    fn insert(&mut self, pos: usize, text: &str) {
        let pos = pos.min(self.text.len_chars());
        let chars = text.chars().count();
        if chars == 0 {
            return;
        }
        let lines_before = self.text.len_lines();
        self.text.insert(pos, text);
        self.char_styles.splice(pos..pos, std::iter::repeat_n(0, chars));

        self.changed(self.text.len_lines() as isize - lines_before as isize);
    }

    fn remove(&mut self, start: usize, end: usize) {
        let end = end.min(self.text.len_chars());
        let start = start.min(end);
        if start == end {
            return;
        }
        let lines_before = self.text.len_lines();
        self.text.remove(start..end);
        self.char_styles.drain(start..end);
        self.changed(self.text.len_lines() as isize - lines_before as isize);
    }

    fn changed(&mut self, lines_added: isize) {
        if !self.modified {
            self.modified = true;
            self.pending.push_back(Notification::SavePointLeft);
        }
        self.pending.push_back(Notification::Modified { lines_added });
    }

    fn delete_selection(&mut self) -> String {
        let (start, end) = self.selection();
        if start == end {
            return String::new();
        }
        let removed = self.text.slice(start..end).to_string();
        self.remove(start, end);
        self.caret = start;
        self.anchor = start;
        removed
    }

    fn indentation(&self, line: usize) -> Option<usize> {
        let tab_width = usize::from(self.state.tab_width.max(1));
        let mut columns = 0;
        for c in self.text.line(line).chars() {
            match c {
                ' ' => columns += 1,
                '\t' => columns += tab_width - columns % tab_width,
                '\n' | '\r' => return None,
                _ => return Some(columns),
            }
        }
        None
    }

    fn next_indented(&self, line: usize) -> Option<usize> {
        (line + 1..self.text.len_lines()).find_map(|l| self.indentation(l))
    }

    fn is_fold_header(&self, line: usize) -> bool {
        match (self.indentation(line), self.next_indented(line)) {
            (Some(own), Some(next)) => next > own,
            _ => false,
        }
    }

    fn fold_contains(&self, header: usize, line: usize) -> bool {
        let Some(own) = self.indentation(header) else {
            return false;
        };
        (header + 1..=line).all(|l| self.indentation(l).is_none_or(|indent| indent > own))
    }

    fn edit(&mut self, action: EditAction) {
        match action {
            EditAction::Copy => {
                let (start, end) = self.selection();
                self.clipboard = self.text.slice(start..end).to_string();
            }
            EditAction::Cut => {
                self.clipboard = self.delete_selection();
                self.pending.push_back(Notification::UpdateUi);
            }
            EditAction::Paste => {
                self.delete_selection();
                let text = self.clipboard.clone();
                self.insert(self.caret, &text);
                self.caret += text.chars().count();
                self.anchor = self.caret;
                self.pending.push_back(Notification::UpdateUi);
            }
            EditAction::SelectAll => {
                self.anchor = 0;
                self.caret = self.text.len_chars();
                self.pending.push_back(Notification::UpdateUi);
            }
            EditAction::Undo | EditAction::Redo => {
                debug!(?action, "No undo history in the headless widget");
            }
        }
    }
}

impl TextWidget for MemoryWidget {
    fn send(&mut self, command: WidgetCommand) {
        trace!(?command, "Widget command");
        match &command {
            WidgetCommand::SetLexer(lexer) => self.state.lexer = Some(*lexer),
            WidgetCommand::SetKeywords { set, words } => {
                self.state.keywords.insert(*set, words.clone());
            }
            WidgetCommand::SetStyle { style, property } => {
                self.state
                    .styles
                    .insert((*style, StylePropertyKind::from(property)), property.clone());
            }
            WidgetCommand::StyleClearAll => {}
            WidgetCommand::SetTabWidth(width) => self.state.tab_width = *width,
            WidgetCommand::SetUseTabs(on) => self.state.use_tabs = *on,
            WidgetCommand::SetCaretLineVisible(on) => self.state.caret_line_visible = *on,
            WidgetCommand::SetMarginType { .. } | WidgetCommand::SetMarginSensitive { .. } => {}
            WidgetCommand::SetMarginWidth { margin, width } => {
                self.state.margin_widths.insert(*margin, *width);
            }
            WidgetCommand::SetViewEol(on) => self.state.view_eol = *on,
            WidgetCommand::SetViewWhitespace(on) => self.state.view_whitespace = *on,
            WidgetCommand::SetIndentationGuides(mode) => self.state.indentation_guides = *mode,
            WidgetCommand::SetEdgeMode(mode) => self.state.edge_mode = Some(*mode),
            WidgetCommand::SetEdgeColumn(column) => self.state.edge_column = *column,
            WidgetCommand::UsePopup(on) => self.state.use_popup = *on,
            WidgetCommand::InsertText { pos, text } => {
                self.insert(*pos, text);
                if *pos < self.caret {
                    self.caret += text.chars().count();
                    self.anchor = self.caret;
                }
                self.pending.push_back(Notification::UpdateUi);
            }
            WidgetCommand::SetCaret(pos) => {
                self.caret = (*pos).min(self.text.len_chars());
                self.anchor = self.caret;
                self.pending.push_back(Notification::UpdateUi);
            }
            WidgetCommand::SetSelection { anchor, caret } => {
                self.anchor = (*anchor).min(self.text.len_chars());
                self.caret = (*caret).min(self.text.len_chars());
                self.pending.push_back(Notification::UpdateUi);
            }
            WidgetCommand::BraceHighlight(pair) => self.state.brace_highlight = *pair,
            WidgetCommand::ToggleFold(line) => {
                if self.is_fold_header(*line) && !self.collapsed.remove(line) {
                    self.collapsed.insert(*line);
                }
            }
            WidgetCommand::SetFoldExpanded { line, expanded } => {
                if *expanded {
                    self.collapsed.remove(line);
                } else if self.is_fold_header(*line) {
                    self.collapsed.insert(*line);
                }
            }
            WidgetCommand::SetSavePoint => {
                if self.modified {
                    self.modified = false;
                    self.pending.push_back(Notification::SavePointReached);
                }
            }
            WidgetCommand::GotoLine(line) => {
                let line = (*line).min(self.line_count().saturating_sub(1));
                self.caret = self.line_start(line);
                self.anchor = self.caret;
                self.pending.push_back(Notification::UpdateUi);
            }
            WidgetCommand::Edit(action) => self.edit(*action),
        }
        self.sent.push(command);
    }

    fn text_range(&self, start: usize, end: usize) -> String {
        let end = end.min(self.text.len_chars());
        self.text.slice(start.min(end)..end).to_string()
    }

    fn len_chars(&self) -> usize {
        self.text.len_chars()
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        (pos < self.text.len_chars()).then(|| self.text.char(pos))
    }

    fn style_at(&self, pos: usize) -> u32 {
        self.char_styles.get(pos).copied().unwrap_or(0)
    }

    fn caret(&self) -> usize {
        self.caret
    }

    fn line_count(&self) -> usize {
        self.text.len_lines()
    }

    fn line_from_position(&self, pos: usize) -> usize {
        self.text.char_to_line(pos.min(self.text.len_chars()))
    }

    fn line_start(&self, line: usize) -> usize {
        if line >= self.text.len_lines() {
            return self.text.len_chars();
        }
        self.text.line_to_char(line)
    }

    fn line_end(&self, line: usize) -> usize {
        if line >= self.text.len_lines() {
            return self.text.len_chars();
        }
        let content = self
            .text
            .line(line)
            .chars()
            .take_while(|&c| c != '\n' && c != '\r')
            .count();
        self.text.line_to_char(line) + content
    }

    fn fold_header(&self, line: usize) -> Option<usize> {
        if line >= self.text.len_lines() {
            return None;
        }
        if self.is_fold_header(line) {
            return Some(line);
        }
        (0..line)
            .rev()
            .find(|&h| self.is_fold_header(h) && self.fold_contains(h, line))
    }

    fn text_width(&self, _style: u32, text: &str) -> u32 {
        text.chars().count() as u32 * CHAR_WIDTH
    }

    fn margin_width(&self, margin: u32) -> u32 {
        self.state.margin_widths.get(&margin).copied().unwrap_or(0)
    }

    fn is_modified(&self) -> bool {
        self.modified
    }

    fn poll_notification(&mut self) -> Option<Notification> {
        self.pending.pop_front()
    }
}
