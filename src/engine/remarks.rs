//! Remark layout: pack segment remarks into rows below the grid
//!
//! Labels are anchored at their segment's end (`to_x`), nudged inward so they
//! stay inside the grid, then placed first-fit into the earliest row where
//! they clear every existing label by at least the configured pad. Candidates
//! are processed in ascending X (ties keep segment order), so the result is
//! deterministic for a given sequence and measurer.
//!
//! First-fit is an online interval-colouring heuristic. It never overlaps two
//! labels but may use more rows than an optimal colouring would.

use crate::config::GridConfig;
use crate::types::{RemarkLayout, RemarkPlacement, SegmentSequence, TextSize};

/// Text measurement supplied by the rendering surface
pub trait TextMeasure {
    /// Must return a finite, positive size for every input.
    fn measure(&self, text: &str) -> TextSize;
}

impl<F> TextMeasure for F
where
    F: Fn(&str) -> TextSize,
{
    fn measure(&self, text: &str) -> TextSize {
        self(text)
    }
}

/// Fixed advance per character; used when no real font metrics exist
#[derive(Debug, Clone, Copy)]
pub struct CharWidthMeasure {
    pub char_width: f64,
    pub line_height: f64,
}

impl CharWidthMeasure {
    /// Width used for an empty label
    const EMPTY_WIDTH: f64 = 8.0;

    pub fn new(char_width: f64, line_height: f64) -> Self {
        Self {
            char_width,
            line_height,
        }
    }

    /// 7px per character at the configured font size, line height = font + 2
    pub fn from_config(config: &GridConfig) -> Self {
        Self::new(7.0, config.remark_font_size + 2.0)
    }
}

impl TextMeasure for CharWidthMeasure {
    fn measure(&self, text: &str) -> TextSize {
        let chars = text.chars().count();
        let width = if chars == 0 {
            Self::EMPTY_WIDTH
        } else {
            chars as f64 * self.char_width
        };
        TextSize::new(width, self.line_height)
    }
}

/// Wraps a fallible measurer, substituting [`CharWidthMeasure`] when it
/// returns nothing or a non-positive/non-finite size.
pub struct FallbackMeasure<F> {
    primary: F,
    fallback: CharWidthMeasure,
}

impl<F> FallbackMeasure<F>
where
    F: Fn(&str) -> Option<TextSize>,
{
    pub fn new(primary: F, fallback: CharWidthMeasure) -> Self {
        Self { primary, fallback }
    }
}

impl<F> TextMeasure for FallbackMeasure<F>
where
    F: Fn(&str) -> Option<TextSize>,
{
    fn measure(&self, text: &str) -> TextSize {
        let guess = self.fallback.measure(text);
        match (self.primary)(text) {
            Some(size) => TextSize::new(
                usable(size.width).unwrap_or(guess.width),
                usable(size.height).unwrap_or(guess.height),
            ),
            None => guess,
        }
    }
}

fn usable(v: f64) -> Option<f64> {
    (v.is_finite() && v > 0.0).then_some(v)
}

/// Horizontal extent of a label already placed in a row
#[derive(Debug, Clone, Copy)]
struct Span {
    left: f64,
    right: f64,
}

#[derive(Debug, Clone)]
pub struct RemarkLayoutEngine {
    grid_width: f64,
    pad: f64,
    edge_inset: f64,
    base_y: f64,
    row_height: f64,
    bottom_margin: f64,
    include_zero_width: bool,
}

impl RemarkLayoutEngine {
    pub fn from_config(config: &GridConfig) -> Self {
        Self {
            grid_width: config.grid_width(),
            pad: config.remark_pad,
            edge_inset: config.edge_inset,
            base_y: config.remark_base_y(),
            row_height: config.remark_row_height,
            bottom_margin: config.bottom_margin,
            include_zero_width: config.include_zero_width_remarks,
        }
    }

    /// Override the grid width (e.g. a renderer drawing at another scale)
    pub fn with_grid_width(mut self, grid_width: f64) -> Self {
        self.grid_width = grid_width;
        self
    }

    pub fn layout(&self, sequence: &SegmentSequence, measure: &impl TextMeasure) -> RemarkLayout {
        let mut candidates: Vec<(f64, usize, &str)> = sequence
            .iter()
            .enumerate()
            .filter(|(_, seg)| !seg.remark.is_empty())
            .filter(|(_, seg)| self.include_zero_width || !seg.is_zero_width())
            .map(|(idx, seg)| (seg.to_x, idx, seg.remark.as_str()))
            .collect();

        // Stable: equal X keeps segment order
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut rows: Vec<Vec<Span>> = Vec::new();
        let mut placements = Vec::with_capacity(candidates.len());

        for (x, segment_index, text) in candidates {
            let size = measure.measure(text);
            let half = size.width / 2.0;

            // Lower bound wins when the label is wider than the grid
            let center_x = x
                .min(self.grid_width - self.edge_inset - half)
                .max(self.edge_inset + half);
            let span = Span {
                left: center_x - half,
                right: center_x + half,
            };

            let row_index = match rows.iter().position(|row| self.fits(row, span)) {
                Some(row) => row,
                None => {
                    rows.push(Vec::new());
                    rows.len() - 1
                }
            };
            rows[row_index].push(span);

            placements.push(RemarkPlacement {
                segment_index,
                row_index,
                anchor_x: x,
                text_left_x: span.left,
                text_baseline_y: self.base_y + row_index as f64 * self.row_height + size.height,
                width: size.width,
                height: size.height,
            });
        }

        let row_count = rows.len();
        RemarkLayout {
            placements,
            row_count,
            required_height: self.base_y + row_count as f64 * self.row_height + self.bottom_margin,
        }
    }

    fn fits(&self, row: &[Span], candidate: Span) -> bool {
        row.iter().all(|placed| {
            candidate.right + self.pad < placed.left || candidate.left - self.pad > placed.right
        })
    }
}

/// Lay out every remark in `sequence` using `config`'s grid geometry.
pub fn layout_remarks(
    sequence: &SegmentSequence,
    measure: &impl TextMeasure,
    config: &GridConfig,
) -> RemarkLayout {
    RemarkLayoutEngine::from_config(config).layout(sequence, measure)
}
