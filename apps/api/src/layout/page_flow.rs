//! Page Flow — explicit pagination for the resume template.
//!
//! A cursor walks down the page in top-down coordinates (0 = top edge). Every block
//! reports its height before it is placed; if `cursor_y + height` would cross the bottom
//! margin, a new page is started and the cursor resets to the top margin.
//!
//! A block taller than a whole page is placed at the top of a fresh page instead of
//! triggering another break, so the loop always makes progress.

use serde::{Deserialize, Serialize};

use crate::layout::color::Rgb;
use crate::layout::font_metrics::{get_metrics, Font, ASCENT_EM, LINE_HEIGHT_EM};

// ────────────────────────────────────────────────────────────────────────────
// Page geometry
// ────────────────────────────────────────────────────────────────────────────

/// Page size and margin in PostScript points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageConfig {
    pub width_pt: f32,
    pub height_pt: f32,
    pub margin_pt: f32,
}

impl PageConfig {
    pub fn content_width(&self) -> f32 {
        self.width_pt - 2.0 * self.margin_pt
    }

    pub fn content_bottom(&self) -> f32 {
        self.height_pt - self.margin_pt
    }
}

/// A4 portrait with a 40pt margin on every side.
pub fn a4_page_config() -> PageConfig {
    PageConfig {
        width_pt: 595.28,
        height_pt: 841.89,
        margin_pt: 40.0,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Draw operations
// ────────────────────────────────────────────────────────────────────────────

/// A run of text in a single font. `baseline_y` is measured from the top of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub x: f32,
    pub baseline_y: f32,
    pub font: Font,
    pub size: f32,
    pub color: Rgb,
    pub text: String,
    /// Extra space added to every space character, used for justification.
    pub word_spacing: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawOp {
    Text(TextRun),
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        thickness: f32,
        color: Rgb,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    #[cfg(test)]
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(run) => Some(run),
            DrawOp::Rule { .. } => None,
        })
    }
}

/// A styled fragment of a single line.
#[derive(Debug, Clone)]
pub struct Span {
    pub text: String,
    pub font: Font,
    pub size: f32,
    pub color: Rgb,
}

impl Span {
    pub fn new(text: impl Into<String>, font: Font, size: f32, color: Rgb) -> Self {
        Span {
            text: text.into(),
            font,
            size,
            color,
        }
    }

    pub fn width(&self) -> f32 {
        get_metrics(self.font).width_pt(&self.text, self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Justify,
}

pub fn line_height(size: f32) -> f32 {
    size * LINE_HEIGHT_EM
}

// ────────────────────────────────────────────────────────────────────────────
// Flow
// ────────────────────────────────────────────────────────────────────────────

pub struct PageFlow {
    config: PageConfig,
    cursor_y: f32,
    pages: Vec<Page>,
}

impl PageFlow {
    pub fn new(config: PageConfig) -> Self {
        PageFlow {
            config,
            cursor_y: config.margin_pt,
            pages: vec![Page::default()],
        }
    }

    #[cfg(test)]
    pub fn cursor_y(&self) -> f32 {
        self.cursor_y
    }

    #[cfg(test)]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Makes room for a block of `height` points, starting a new page when needed.
    pub fn reserve(&mut self, height: f32) {
        let at_top = self.cursor_y <= self.config.margin_pt;
        if !at_top && self.cursor_y + height > self.config.content_bottom() {
            self.break_page();
        }
    }

    pub fn break_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor_y = self.config.margin_pt;
    }

    /// Vertical gap. May run past the bottom margin; the next block then breaks.
    pub fn move_down(&mut self, dy: f32) {
        self.cursor_y += dy;
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    /// Places one line made of consecutive spans sharing a common baseline.
    ///
    /// Spans that together overflow the content width are laid out as separate
    /// left-aligned paragraphs instead, so text never crosses the right margin.
    pub fn line(&mut self, spans: &[Span]) {
        let total: f32 = spans.iter().map(Span::width).sum();
        if total <= self.config.content_width() {
            self.justified_line(spans, 0.0);
            return;
        }
        for span in spans {
            self.paragraph(span.text.trim_start(), span.font, span.size, span.color, Align::Left);
        }
    }

    fn justified_line(&mut self, spans: &[Span], word_spacing: f32) {
        let max_size = spans.iter().map(|s| s.size).fold(0.0_f32, f32::max);
        if max_size <= 0.0 {
            return;
        }
        let height = line_height(max_size);
        self.reserve(height);

        let baseline_y = self.cursor_y + max_size * ASCENT_EM;
        let mut x = self.config.margin_pt;
        for span in spans {
            let width = span.width();
            if !span.text.is_empty() {
                self.push(DrawOp::Text(TextRun {
                    x,
                    baseline_y,
                    font: span.font,
                    size: span.size,
                    color: span.color,
                    text: span.text.clone(),
                    word_spacing,
                }));
            }
            x += width;
        }
        self.cursor_y += height;
    }

    /// Wraps `text` to the content width and places it line by line. Each line is its
    /// own block, so long paragraphs continue on the next page.
    pub fn paragraph(&mut self, text: &str, font: Font, size: f32, color: Rgb, align: Align) {
        let metrics = get_metrics(font);
        let width = self.config.content_width();

        for source_line in text.lines() {
            let lines = metrics.wrap(source_line, size, width);
            let last = lines.len().saturating_sub(1);
            for (i, line) in lines.into_iter().enumerate() {
                let word_spacing = match align {
                    Align::Justify if i < last => {
                        let gaps = line.matches(' ').count();
                        if gaps == 0 {
                            0.0
                        } else {
                            ((width - metrics.width_pt(&line, size)) / gaps as f32).max(0.0)
                        }
                    }
                    _ => 0.0,
                };
                self.justified_line(&[Span::new(line, font, size, color)], word_spacing);
            }
        }
    }

    /// Horizontal rule across the content width at the current cursor.
    pub fn rule(&mut self, thickness: f32, color: Rgb) {
        self.reserve(thickness);
        let y = self.cursor_y;
        self.push(DrawOp::Rule {
            x1: self.config.margin_pt,
            x2: self.config.width_pt - self.config.margin_pt,
            y,
            thickness,
            color,
        });
    }

    pub fn finish(self) -> Vec<Page> {
        self.pages
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
