//! Line number margin width and margin clicks

use tracing::{debug, trace};

use crate::constants::{margin, style};
use crate::widget::{TextWidget, WidgetCommand};

/// When the line number margin may get narrower
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarginPolicy {
    /// Only ever widen while line numbers stay on
    #[default]
    GrowOnly,
    /// Follow the digit count both ways
    Exact,
}

/// Margin under a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginKind {
    LineNumber,
    Fold,
}

/// Resolve a horizontal offset into the margin it falls in
pub fn margin_at(widget: &dyn TextWidget, x: u32) -> Option<MarginKind> {
    let number = widget.margin_width(margin::NUMBER);
    let fold = widget.margin_width(margin::FOLD);
    if x < number {
        Some(MarginKind::LineNumber)
    } else if x < number + fold {
        Some(MarginKind::Fold)
    } else {
        None
    }
}

/// React to a click in the margin area at `x`, on the line holding `position`
pub fn margin_clicked(widget: &mut dyn TextWidget, x: u32, position: usize) -> Option<MarginKind> {
    let kind = margin_at(widget, x)?;
    if kind == MarginKind::Fold {
        let line = widget.line_from_position(position);
        match widget.fold_header(line) {
            Some(header) => widget.send(WidgetCommand::ToggleFold(header)),
            None => trace!(line, "Fold click outside any fold block"),
        }
    }
    Some(kind)
}

fn digits(mut n: usize) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}

/// Pixels needed to show line numbers up to `line_count`
pub fn required_width(widget: &dyn TextWidget, line_count: usize) -> u32 {
    let digits = digits(line_count).max(margin::MIN_NUMBER_DIGITS);
    let sample = format!("_{}", "9".repeat(digits));
    widget.text_width(style::LINE_NUMBER, &sample) + margin::NUMBER_PADDING
}

/// Tracks the width last given to the line number margin
#[derive(Debug, Default)]
pub struct LineNumberMargin {
    policy: MarginPolicy,
    enabled: bool,
    width: Option<u32>,
}

impl LineNumberMargin {
    pub fn new(policy: MarginPolicy) -> Self {
        Self {
            policy,
            enabled: false,
            width: None,
        }
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    /// Show or hide line numbers
    pub fn set_enabled(&mut self, widget: &mut dyn TextWidget, enabled: bool) {
        self.enabled = enabled;
        if enabled {
            // Start over so a hidden margin does not pin the old width
            if self.width == Some(0) {
                self.width = None;
            }
            self.update(widget);
        } else {
            self.issue(widget, 0);
        }
    }

    /// Recompute after the line count changed; returns the new width if one was sent
    pub fn update(&mut self, widget: &mut dyn TextWidget) -> Option<u32> {
        if !self.enabled {
            return None;
        }
        let required = required_width(widget, widget.line_count());
        let next = match (self.policy, self.width) {
            (MarginPolicy::GrowOnly, Some(current)) => current.max(required),
            _ => required,
        };
        self.issue(widget, next)
    }

    fn issue(&mut self, widget: &mut dyn TextWidget, width: u32) -> Option<u32> {
        if self.width == Some(width) {
            return None;
        }
        debug!(from = ?self.width, to = width, "Line number margin resized");
        self.width = Some(width);
        widget.send(WidgetCommand::SetMarginWidth {
            margin: margin::NUMBER,
            width,
        });
        Some(width)
    }
}
