//! Carry indentation over to a new line

use tracing::trace;

use crate::widget::{TextWidget, WidgetCommand};

/// Leading whitespace run of `line`
pub fn line_indentation(widget: &dyn TextWidget, line: usize) -> String {
    widget
        .text_range(widget.line_start(line), widget.line_end(line))
        .chars()
        .take_while(|&c| c == ' ' || c == '\t')
        .collect()
}

/// Copy the previous line's indentation onto the line holding the caret
///
/// Called right after a line break was typed. Returns the inserted run, or
/// `None` when there was nothing to copy.
pub fn maintain_indentation(widget: &mut dyn TextWidget) -> Option<String> {
    let line = widget.line_from_position(widget.caret());
    let previous = line.checked_sub(1)?;

    let indentation = line_indentation(widget, previous);
    if indentation.is_empty() {
        return None;
    }

    let start = widget.line_start(line);
    widget.send(WidgetCommand::InsertText {
        pos: start,
        text: indentation.clone(),
    });
    widget.send(WidgetCommand::SetCaret(start + indentation.chars().count()));
    trace!(line, width = indentation.len(), "Indentation carried over");
    Some(indentation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::MemoryWidget;

    #[test]
    fn test_newline_copies_spaces() {
        let mut widget = MemoryWidget::new();
        widget.type_text("    if x:\n");

        assert_eq!(maintain_indentation(&mut widget).as_deref(), Some("    "));
        assert_eq!(widget.text(), "    if x:\n    ");
        assert_eq!(widget.caret(), 14);
        assert_eq!(line_indentation(&widget, 1), "    ");
    }

    #[test]
    fn test_mixed_tabs_and_spaces_copied_verbatim() {
        let mut widget = MemoryWidget::new();
        widget.type_text("\t  x\n");
        maintain_indentation(&mut widget);
        assert_eq!(widget.text(), "\t  x\n\t  ");
    }

    #[test]
    fn test_split_line_keeps_rest_after_indent() {
        let mut widget = MemoryWidget::with_text("  ab");
        widget.move_caret(3);
        widget.type_char('\n');
        maintain_indentation(&mut widget);

        assert_eq!(widget.text(), "  a\n  b");
        assert_eq!(widget.caret(), 6);
    }

    #[test]
    fn test_start_of_document_has_no_indentation() {
        let mut widget = MemoryWidget::new();
        assert_eq!(maintain_indentation(&mut widget), None);
        assert!(widget.sent().is_empty());
    }

    #[test]
    fn test_unindented_line_inserts_nothing() {
        let mut widget = MemoryWidget::new();
        widget.type_text("x\n");
        assert_eq!(maintain_indentation(&mut widget), None);
        assert_eq!(widget.text(), "x\n");
    }

    #[test]
    fn test_whitespace_only_line_is_copied() {
        let mut widget = MemoryWidget::new();
        widget.type_text("  \n");
        maintain_indentation(&mut widget);
        assert_eq!(widget.text(), "  \n  ");
    }
}
