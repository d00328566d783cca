#![forbid(unsafe_code)]

//! Fixed-advance text metrics for measuring bubble content.
//!
//! Real presenters measure with their own font engine. [`MonospaceMetrics`]
//! approximates that with a fixed advance per display column and a fixed
//! line height, which is enough for headless hosts, tests and terminal-like
//! surfaces. Widths follow Unicode display width, so CJK takes two columns
//! and combining marks take none.

use tiptour_core::geometry::{Sides, Size};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width of `text` in terminal columns.
#[inline]
pub fn display_width(text: &str) -> usize {
    if text.is_ascii() && text.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
        return text.len();
    }
    text.graphemes(true).map(grapheme_width).sum()
}

#[inline]
fn grapheme_width(grapheme: &str) -> usize {
    UnicodeWidthStr::width(grapheme)
}

/// Word-wrap `text` to at most `max_columns` display columns per line.
///
/// Paragraph breaks (`\n`) are kept, runs of whitespace collapse to a single
/// space, and a word wider than a full line is split at grapheme boundaries.
/// Returns no lines when `max_columns` is zero.
pub fn wrap_text(text: &str, max_columns: usize) -> Vec<String> {
    if max_columns == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for paragraph in text.lines() {
        if paragraph.trim().is_empty() {
            if paragraph.is_empty() {
                lines.push(String::new());
            }
            continue;
        }

        let mut current = String::new();
        let mut current_width = 0usize;

        for word in paragraph.split_whitespace() {
            let word_width = display_width(word);

            if current_width > 0 && current_width + 1 + word_width <= max_columns {
                current.push(' ');
                current.push_str(word);
                current_width += 1 + word_width;
                continue;
            }

            if current_width > 0 {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }

            if word_width <= max_columns {
                current.push_str(word);
                current_width = word_width;
                continue;
            }

            // Hard-break an overlong word.
            for grapheme in word.graphemes(true) {
                let w = grapheme_width(grapheme);
                if current_width + w > max_columns && current_width > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push_str(grapheme);
                current_width += w;
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Fixed-advance text measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct MonospaceMetrics {
    /// Horizontal advance of one display column.
    pub column_width: f64,
    /// Height of one wrapped line.
    pub line_height: f64,
    /// Space between the bubble edge and the text.
    pub insets: Sides,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            column_width: 8.0,
            line_height: 18.0,
            insets: Sides::all(12.0),
        }
    }
}

impl MonospaceMetrics {
    /// Create metrics with the given column advance and line height.
    #[must_use]
    pub fn new(column_width: f64, line_height: f64) -> Self {
        Self {
            column_width,
            line_height,
            ..Self::default()
        }
    }

    /// Set the text insets.
    #[must_use]
    pub fn insets(mut self, insets: impl Into<Sides>) -> Self {
        self.insets = insets.into();
        self
    }

    /// Number of columns that fit in `max_width` once insets are removed.
    #[must_use]
    pub fn columns_for(&self, max_width: f64) -> usize {
        if self.column_width.is_nan() || self.column_width <= 0.0 {
            return 0;
        }
        let available = max_width - self.insets.horizontal_sum();
        if available.is_nan() || available <= 0.0 {
            return 0;
        }
        (available / self.column_width).floor().min(usize::MAX as f64) as usize
    }

    /// Wrap `text` for a bubble no wider than `max_width`.
    #[must_use]
    pub fn wrap(&self, text: &str, max_width: f64) -> Vec<String> {
        wrap_text(text, self.columns_for(max_width))
    }

    /// Content size of `text` wrapped to `max_width`, insets included.
    ///
    /// `footer` is extra height below the text, e.g. a button row.
    #[must_use]
    pub fn measure(&self, text: &str, max_width: f64, footer: f64) -> Size {
        let lines = self.wrap(text, max_width);
        let columns = lines.iter().map(|l| display_width(l)).max().unwrap_or(0);
        let width = columns as f64 * self.column_width + self.insets.horizontal_sum();
        let height = lines.len() as f64 * self.line_height
            + self.insets.vertical_sum()
            + footer.max(0.0);

        tiptour_core::trace!(
            lines = lines.len(),
            columns,
            width,
            height,
            "measured bubble content"
        );
        Size::new(width, height)
    }
}
