//! Brace pair highlighting

use tracing::trace;

use crate::constants::braces::{MAX_SCAN, PAIRS};
use crate::widget::{TextWidget, WidgetCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Complement of `c` and the direction to scan for it
fn complement(c: char) -> Option<(char, Direction)> {
    PAIRS.iter().find_map(|&(open, close)| {
        if c == open {
            Some((close, Direction::Forward))
        } else if c == close {
            Some((open, Direction::Backward))
        } else {
            None
        }
    })
}

/// Position of the brace matching the one at `pos`
///
/// Braces whose style is in `inert` (strings, comments) are ignored. Gives
/// up after [`MAX_SCAN`] characters or at the buffer boundary.
pub fn find_match(widget: &dyn TextWidget, pos: usize, inert: &[u32]) -> Option<usize> {
    let brace = widget.char_at(pos)?;
    let (target, direction) = complement(brace)?;
    if inert.contains(&widget.style_at(pos)) {
        return None;
    }

    let len = widget.len_chars();
    let mut depth = 1usize;
    let mut current = pos;
    for _ in 0..MAX_SCAN {
        current = match direction {
            Direction::Forward if current + 1 < len => current + 1,
            Direction::Backward if current > 0 => current - 1,
            _ => return None,
        };
        let Some(c) = widget.char_at(current) else {
            return None;
        };
        if c != brace && c != target {
            continue;
        }
        if inert.contains(&widget.style_at(current)) {
            continue;
        }
        if c == brace {
            depth += 1;
        } else {
            depth -= 1;
            if depth == 0 {
                return Some(current);
            }
        }
    }
    trace!(pos, "Brace scan limit reached");
    None
}

/// Brace next to the caret: the one before it wins over the one after it
fn brace_near_caret(widget: &dyn TextWidget, inert: &[u32]) -> Option<usize> {
    let caret = widget.caret();
    let is_live_brace = |pos: usize| {
        widget.char_at(pos).and_then(complement).is_some() && !inert.contains(&widget.style_at(pos))
    };
    caret
        .checked_sub(1)
        .filter(|&pos| is_live_brace(pos))
        .or_else(|| Some(caret).filter(|&pos| is_live_brace(pos)))
}

/// Highlight currently shown by the widget
#[derive(Debug, Default)]
pub struct BraceHighlighter {
    current: Option<(usize, usize)>,
}

impl BraceHighlighter {
    pub fn current(&self) -> Option<(usize, usize)> {
        self.current
    }

    /// Recompute the pair around the caret and tell the widget if it changed
    pub fn update(&mut self, widget: &mut dyn TextWidget, inert: &[u32]) {
        let view: &dyn TextWidget = &*widget;
        let next = brace_near_caret(view, inert).and_then(|brace| {
            find_match(view, brace, inert).map(|other| (brace.min(other), brace.max(other)))
        });
        self.show(widget, next);
    }

    pub fn clear(&mut self, widget: &mut dyn TextWidget) {
        self.show(widget, None);
    }

    fn show(&mut self, widget: &mut dyn TextWidget, pair: Option<(usize, usize)>) {
        if pair != self.current {
            self.current = pair;
            widget.send(WidgetCommand::BraceHighlight(pair));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::MemoryWidget;

    #[test]
    fn test_nested_match_forward() {
        let widget = MemoryWidget::with_text("foo(bar(baz))");
        assert_eq!(find_match(&widget, 3, &[]), Some(12));
        assert_eq!(find_match(&widget, 7, &[]), Some(11));
    }

    #[test]
    fn test_match_backward() {
        let widget = MemoryWidget::with_text("{ [x] }");
        assert_eq!(find_match(&widget, 6, &[]), Some(0));
        assert_eq!(find_match(&widget, 4, &[]), Some(2));
    }

    #[test]
    fn test_unbalanced_has_no_match() {
        let widget = MemoryWidget::with_text("foo(bar");
        assert_eq!(find_match(&widget, 3, &[]), None);
        let widget = MemoryWidget::with_text(")");
        assert_eq!(find_match(&widget, 0, &[]), None);
    }

    #[test]
    fn test_braces_in_strings_are_ignored() {
        let mut widget = MemoryWidget::with_text("f(\")\", x)");
        widget.set_style_range(2, 5, 6);
        assert_eq!(find_match(&widget, 1, &[6]), Some(8));
        assert_eq!(find_match(&widget, 1, &[]), Some(3));
        // A brace inside a string never starts a match
        assert_eq!(find_match(&widget, 3, &[6]), None);
    }

    #[test]
    fn test_scan_is_bounded() {
        let text = format!("({}", " ".repeat(MAX_SCAN + 10)) + ")";
        let widget = MemoryWidget::with_text(&text);
        assert_eq!(find_match(&widget, 0, &[]), None);
    }

    #[test]
    fn test_highlight_after_opening_brace() {
        let mut widget = MemoryWidget::with_text("foo(bar(baz))");
        widget.move_caret(4);
        let mut highlighter = BraceHighlighter::default();
        highlighter.update(&mut widget, &[]);
        assert_eq!(highlighter.current(), Some((3, 12)));
        assert_eq!(widget.state().brace_highlight, Some((3, 12)));
    }

    #[test]
    fn test_brace_before_caret_wins() {
        let mut widget = MemoryWidget::with_text("(a)(b)");
        widget.move_caret(3);
        let mut highlighter = BraceHighlighter::default();
        highlighter.update(&mut widget, &[]);
        assert_eq!(highlighter.current(), Some((0, 2)));
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut widget = MemoryWidget::with_text("(x)");
        widget.move_caret(1);
        let mut highlighter = BraceHighlighter::default();
        highlighter.update(&mut widget, &[]);
        highlighter.update(&mut widget, &[]);

        let highlights = widget
            .sent()
            .iter()
            .filter(|c| matches!(c, WidgetCommand::BraceHighlight(_)))
            .count();
        assert_eq!(highlights, 1);
    }

    #[test]
    fn test_moving_away_clears() {
        let mut widget = MemoryWidget::with_text("(x) y");
        widget.move_caret(1);
        let mut highlighter = BraceHighlighter::default();
        highlighter.update(&mut widget, &[]);

        widget.move_caret(5);
        highlighter.update(&mut widget, &[]);
        assert_eq!(highlighter.current(), None);
        assert_eq!(widget.state().brace_highlight, None);
    }

    #[test]
    fn test_unmatched_closing_brace_clears() {
        let mut widget = MemoryWidget::with_text("(x) y)");
        widget.move_caret(1);
        let mut highlighter = BraceHighlighter::default();
        highlighter.update(&mut widget, &[]);

        widget.move_caret(6);
        highlighter.update(&mut widget, &[]);
        assert_eq!(highlighter.current(), None);
    }
}
