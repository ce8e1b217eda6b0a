//! Boundary to the styled text widget
//!
//! The core never touches buffer storage, rendering or undo directly. It sends
//! [`WidgetCommand`]s, asks a handful of read-only questions through
//! [`TextWidget`] and reacts to [`Notification`]s the widget emits.
//!
//! Positions are character offsets, lines are zero based.

pub mod memory;

pub use memory::MemoryWidget;

use crate::config::IndentGuidesMode;
use crate::language::LexerId;

/// Visual property of one style slot
#[derive(Debug, Clone, PartialEq)]
pub enum StyleProperty {
    Font(String),
    Size(u32),
    /// 0xRRGGBB
    Foreground(u32),
    /// 0xRRGGBB
    Background(u32),
    Bold(bool),
    Italic(bool),
}

/// What a margin displays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginType {
    Number,
    Symbol,
}

/// How the line limit column is drawn by the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeMode {
    None,
    Line,
    Background,
}

/// Edit actions forwarded from the window menus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Cut,
    Copy,
    Paste,
    Undo,
    Redo,
    SelectAll,
}

/// Command sent from the core to the widget
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetCommand {
    SetLexer(LexerId),
    SetKeywords { set: usize, words: String },
    SetStyle { style: u32, property: StyleProperty },
    /// Copy the default style onto every other slot
    StyleClearAll,
    SetTabWidth(u8),
    SetUseTabs(bool),
    SetCaretLineVisible(bool),
    SetMarginType { margin: u32, kind: MarginType },
    SetMarginWidth { margin: u32, width: u32 },
    SetMarginSensitive { margin: u32, sensitive: bool },
    SetViewEol(bool),
    SetViewWhitespace(bool),
    SetIndentationGuides(Option<IndentGuidesMode>),
    SetEdgeMode(EdgeMode),
    SetEdgeColumn(u32),
    /// Let the widget show its own context menu
    UsePopup(bool),
    InsertText { pos: usize, text: String },
    SetCaret(usize),
    SetSelection { anchor: usize, caret: usize },
    /// Highlight a matched brace pair, or clear with `None`
    BraceHighlight(Option<(usize, usize)>),
    ToggleFold(usize),
    SetFoldExpanded { line: usize, expanded: bool },
    SetSavePoint,
    GotoLine(usize),
    Edit(EditAction),
}

/// Notification emitted by the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// A character was typed; the caret is already past it
    CharAdded(char),
    /// Caret or selection moved, or text changed
    UpdateUi,
    /// Text was inserted or deleted
    Modified { lines_added: isize },
    /// Pointer pressed in the margin area at horizontal offset `x`
    MarginClicked { x: u32, position: usize },
    SavePointLeft,
    SavePointReached,
}

/// Read side of the widget plus the command sink
pub trait TextWidget {
    fn send(&mut self, command: WidgetCommand);

    /// Text between two positions, clamped to the buffer
    fn text_range(&self, start: usize, end: usize) -> String;
    fn len_chars(&self) -> usize;
    fn char_at(&self, pos: usize) -> Option<char>;
    /// Lexer style number at `pos`, 0 outside the buffer
    fn style_at(&self, pos: usize) -> u32;
    fn caret(&self) -> usize;

    fn line_count(&self) -> usize;
    fn line_from_position(&self, pos: usize) -> usize;
    fn line_start(&self, line: usize) -> usize;
    /// Position of the end of `line`, before its line break
    fn line_end(&self, line: usize) -> usize;

    /// Header line of the fold block containing `line`, if any
    fn fold_header(&self, line: usize) -> Option<usize>;

    /// Pixel width of `text` rendered in `style`
    fn text_width(&self, style: u32, text: &str) -> u32;
    fn margin_width(&self, margin: u32) -> u32;

    fn is_modified(&self) -> bool;

    /// Next notification the widget has posted, oldest first
    fn poll_notification(&mut self) -> Option<Notification>;
}
