//! Log grid widget - duty-status bars, totals column and remark rows

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use crate::config::GridConfig;
use crate::engine::{format_hours_as_clock, CharWidthMeasure, TextMeasure};
use crate::types::{CategoryTotals, RemarkLayout, RemarkPlacement, Segment, TextSize};

/// "Sleeper Berth" plus a space
const LABEL_WIDTH: u16 = 14;
/// "│" + "HH:MM" + padding
const TOTALS_WIDTH: u16 = 8;
/// Bar line + spacer line per category
const SECTION_LINES: u16 = 2;
/// Narrowest grid that still shows every hour
pub const MIN_GRID_COLS: u16 = 24;

const BAR: &str = "━";
const CONNECTOR: &str = "┃";
const DOT: &str = "·";
const TICK: &str = "┊";
const ANCHOR: &str = "╵";

/// What a renderer receives: grid size, segments, remark layout and totals
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub grid_height: f64,
    pub segments: &'a [Segment],
    pub layout: &'a RemarkLayout,
    pub totals: &'a CategoryTotals,
}

pub struct LogGrid<'a> {
    config: &'a GridConfig,
    input: RenderInput<'a>,
}

impl<'a> LogGrid<'a> {
    pub fn new(config: &'a GridConfig, input: RenderInput<'a>) -> Self {
        Self { config, input }
    }

    /// Grid columns available inside a terminal `width`
    pub fn grid_cols(width: u16) -> u16 {
        width.saturating_sub(LABEL_WIDTH + TOTALS_WIDTH).max(MIN_GRID_COLS)
    }

    /// Terminal width needed for `grid_cols` grid columns
    pub fn total_width(grid_cols: u16) -> u16 {
        LABEL_WIDTH + grid_cols + TOTALS_WIDTH
    }

    /// Measures one cell per character (plus one cell of slack) in grid pixels,
    /// so a layout computed with it never overlaps once snapped to cells.
    pub fn cell_measure(config: &GridConfig, grid_cols: u16) -> impl Fn(&str) -> TextSize {
        let px_per_col = config.grid_width() / grid_cols.max(1) as f64;
        let chars = CharWidthMeasure::new(px_per_col, config.remark_row_height);
        move |text: &str| {
            let size = chars.measure(text);
            TextSize::new(size.width + px_per_col, size.height)
        }
    }

    /// Lines needed to draw the grid and `row_count` remark rows
    pub fn required_lines(&self) -> u16 {
        self.remark_top() + self.input.layout.row_count as u16
    }

    fn category_count(&self) -> u16 {
        self.config.categories.len() as u16
    }

    /// Ruler + sections + grand total + one blank line
    fn remark_top(&self) -> u16 {
        1 + self.category_count() * SECTION_LINES + 2
    }

    /// Remark row a placement's baseline falls on, counted down from the
    /// first row under the grid
    fn remark_line(&self, placement: &RemarkPlacement) -> u16 {
        let first_row_top = self.input.grid_height + self.config.remark_top_gap;
        let top = placement.text_baseline_y - placement.height;
        ((top - first_row_top) / self.config.remark_row_height)
            .round()
            .max(0.0) as u16
    }

    fn bar_line(&self, area: Rect, category: usize) -> u16 {
        area.y + 1 + category as u16 * SECTION_LINES
    }

    fn to_col(&self, x: f64, grid_cols: u16) -> u16 {
        let ratio = (x / self.config.grid_width()).clamp(0.0, 1.0);
        (ratio * grid_cols as f64).floor() as u16
    }

    fn render_ruler(&self, area: Rect, buf: &mut Buffer, grid_cols: u16) {
        let style = Style::default().fg(Color::DarkGray);
        let cols_per_hour = grid_cols as f64 / 24.0;
        let step = if cols_per_hour >= 3.0 {
            1
        } else if cols_per_hour >= 1.5 {
            2
        } else {
            3
        };
        for hour in (0..24).step_by(step) {
            let col = (hour as f64 * cols_per_hour).floor() as u16;
            buf.set_string(
                area.x + LABEL_WIDTH + col,
                area.y,
                hour.to_string(),
                style,
            );
        }
    }

    fn render_sections(&self, area: Rect, buf: &mut Buffer, grid_cols: u16) {
        let dim = Style::default().fg(Color::DarkGray);
        let cols_per_hour = grid_cols as f64 / 24.0;

        for (i, name) in self.config.categories.iter().enumerate() {
            let y = self.bar_line(area, i);
            let label: String = name.chars().take(LABEL_WIDTH as usize - 1).collect();
            buf.set_string(area.x, y, label, Style::default().fg(Color::Gray));

            for col in 0..grid_cols {
                buf.set_string(area.x + LABEL_WIDTH + col, y, DOT, dim);
            }
            for hour in 0..24u16 {
                let col = (hour as f64 * cols_per_hour).floor() as u16;
                buf.set_string(area.x + LABEL_WIDTH + col, y, TICK, dim);
            }
        }
    }

    fn render_segments(&self, area: Rect, buf: &mut Buffer, grid_cols: u16) {
        let style = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);
        let grid_x = area.x + LABEL_WIDTH;

        for seg in self.input.segments {
            if seg.category_index >= self.config.categories.len() {
                continue;
            }
            let y = self.bar_line(area, seg.category_index);
            let start = self.to_col(seg.from_x, grid_cols);
            let end = self.to_col(seg.to_x, grid_cols);
            for col in start..end {
                buf.set_string(grid_x + col, y, BAR, style);
            }
        }

        // Vertical connector wherever one segment ends exactly where another starts
        for a in self.input.segments {
            if a.is_zero_width() {
                continue;
            }
            for b in self.input.segments {
                if std::ptr::eq(a, b) || (a.to_x - b.from_x).abs() >= 1e-3 {
                    continue;
                }
                let col = self.to_col(a.to_x, grid_cols).min(grid_cols - 1);
                let (top, bottom) = if a.category_index <= b.category_index {
                    (a.category_index, b.category_index)
                } else {
                    (b.category_index, a.category_index)
                };
                let from = self.bar_line(area, top);
                let to = self.bar_line(area, bottom);
                for y in from..=to {
                    buf.set_string(grid_x + col, y, CONNECTOR, style);
                }
            }
        }
    }

    fn render_totals(&self, area: Rect, buf: &mut Buffer, grid_cols: u16) {
        let x = area.x + LABEL_WIDTH + grid_cols;
        let border = Style::default().fg(Color::DarkGray);
        let value = Style::default().add_modifier(Modifier::BOLD);

        let last = self.bar_line(area, self.config.categories.len());
        for y in area.y + 1..last {
            buf.set_string(x, y, "│", border);
        }
        for (i, hours) in self.input.totals.per_category_hours.iter().enumerate() {
            buf.set_string(x + 2, self.bar_line(area, i), format_hours_as_clock(*hours), value);
        }

        let grand = format!(
            "Total {}",
            format_hours_as_clock(self.input.totals.grand_total_hours)
        );
        let grand_x = (x + TOTALS_WIDTH).saturating_sub(grand.chars().count() as u16 + 1);
        buf.set_string(grand_x, last, grand, value);
    }

    fn render_remarks(&self, area: Rect, buf: &mut Buffer, grid_cols: u16) {
        let style = Style::default().fg(Color::Blue);
        let grid_x = area.x + LABEL_WIDTH;
        let top = area.y + self.remark_top();

        for placement in &self.input.layout.placements {
            let Some(seg) = self.input.segments.get(placement.segment_index) else {
                continue;
            };
            let y = top + self.remark_line(placement);
            if y >= area.y + area.height {
                continue;
            }
            let anchor = self.to_col(placement.anchor_x, grid_cols).min(grid_cols - 1);
            buf.set_string(grid_x + anchor, top - 1, ANCHOR, style);

            let col = self.to_col(placement.text_left_x, grid_cols);
            let room = grid_cols.saturating_sub(col) as usize;
            buf.set_stringn(grid_x + col, y, &seg.remark, room, style);
        }
    }
}

impl Widget for LogGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let grid_cols = area.width.saturating_sub(LABEL_WIDTH + TOTALS_WIDTH);
        if grid_cols < MIN_GRID_COLS || area.height < self.remark_top() {
            buf.set_string(
                area.x,
                area.y,
                "Terminal too small for log grid",
                Style::default().fg(Color::Red),
            );
            return;
        }

        self.render_ruler(area, buf, grid_cols);
        self.render_sections(area, buf, grid_cols);
        self.render_segments(area, buf, grid_cols);
        self.render_totals(area, buf, grid_cols);
        self.render_remarks(area, buf, grid_cols);
    }
}

/// Render into an off-screen buffer and return its rows, right-trimmed.
pub fn render_to_lines(grid: LogGrid<'_>, width: u16) -> Vec<String> {
    let height = grid.required_lines();
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    grid.render(area, &mut buf);

    buf.content()
        .chunks(width as usize)
        .map(|row| {
            let line: String = row.iter().map(|c| c.symbol()).collect();
            line.trim_end().to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Geometry, RemarkLayoutEngine, SegmentStore};
    use crate::types::{SegmentSequence, TimeOfDay};

    fn build(sequence: &SegmentSequence, config: &GridConfig, grid_cols: u16) -> (RemarkLayout, CategoryTotals) {
        let measure = LogGrid::cell_measure(config, grid_cols);
        let layout = RemarkLayoutEngine::from_config(config).layout(sequence, &measure);
        let totals = SegmentStore::new(Geometry::from_config(config)).compute_totals(sequence);
        (layout, totals)
    }

    fn day() -> SegmentSequence {
        let store = SegmentStore::new(Geometry::new(50.0));
        let seq = store
            .append(
                &SegmentSequence::new(),
                TimeOfDay::new(0, 0),
                TimeOfDay::new(6, 0),
                0,
                "",
            )
            .unwrap();
        let seq = store
            .append(&seq, TimeOfDay::new(0, 0), TimeOfDay::new(7, 0), 3, "Pre-trip")
            .unwrap();
        let seq = store
            .append(&seq, TimeOfDay::new(0, 0), TimeOfDay::new(12, 0), 2, "Fuel")
            .unwrap();
        store
            .append(&seq, TimeOfDay::new(0, 0), TimeOfDay::new(0, 0), 1, "Reno")
            .unwrap()
    }

    #[test]
    fn test_renders_labels_totals_and_remarks() {
        let config = GridConfig::default();
        let sequence = day();
        let (layout, totals) = build(&sequence, &config, 48);
        let input = RenderInput {
            grid_height: config.grid_height(),
            segments: sequence.segments(),
            layout: &layout,
            totals: &totals,
        };

        let lines = render_to_lines(LogGrid::new(&config, input), LogGrid::total_width(48));
        let content = lines.join("\n");

        assert!(content.contains("Off Duty"));
        assert!(content.contains("Sleeper Berth"));
        assert!(content.contains("06:00"));
        assert!(content.contains("12:00"));
        assert!(content.contains("Total 24:00"));
        assert!(content.contains("Pre-trip"));
        assert!(content.contains("Fuel"));
        assert!(content.contains("Reno"));
        assert!(content.contains(BAR));
        assert!(content.contains(CONNECTOR));
    }

    #[test]
    fn test_bar_spans_expected_columns() {
        let config = GridConfig::default();
        let sequence = SegmentSequence::from_segments(vec![Segment::new(0.0, 300.0, 2, "")]);
        let (layout, totals) = build(&sequence, &config, 24);
        let input = RenderInput {
            grid_height: config.grid_height(),
            segments: sequence.segments(),
            layout: &layout,
            totals: &totals,
        };

        let lines = render_to_lines(LogGrid::new(&config, input), LogGrid::total_width(24));

        // Driving is the third category: ruler + 2 sections of 2 lines
        let driving: Vec<char> = lines[5].chars().collect();
        let grid: String = driving[LABEL_WIDTH as usize..LABEL_WIDTH as usize + 7]
            .iter()
            .collect();
        assert_eq!(grid, "━━━━━━┊");
    }

    #[test]
    fn test_remark_rows_do_not_overlap_in_cells() {
        let config = GridConfig::default();
        let mut sequence = SegmentSequence::new();
        let store = SegmentStore::new(Geometry::from_config(&config));
        for (hour, remark) in [(1, "Load"), (2, "Scale"), (3, "Fuel"), (4, "Break")] {
            sequence = store
                .append(&sequence, TimeOfDay::new(0, 0), TimeOfDay::new(hour, 0), 2, remark)
                .unwrap();
        }
        let (layout, totals) = build(&sequence, &config, 48);
        assert!(layout.row_count >= 2);
        let input = RenderInput {
            grid_height: config.grid_height(),
            segments: sequence.segments(),
            layout: &layout,
            totals: &totals,
        };

        let content = render_to_lines(LogGrid::new(&config, input), LogGrid::total_width(48)).join("\n");

        for remark in ["Load", "Scale", "Fuel", "Break"] {
            assert!(content.contains(remark), "missing {}", remark);
        }
    }

    #[test]
    fn test_remark_line_follows_baseline() {
        let config = GridConfig::default();
        let sequence = SegmentSequence::from_segments(vec![
            Segment::new(0.0, 100.0, 2, "Load"),
            Segment::new(100.0, 110.0, 2, "Scale"),
        ]);
        let (layout, totals) = build(&sequence, &config, 48);
        assert_eq!(layout.row_count, 2);
        let mut input = RenderInput {
            grid_height: config.grid_height(),
            segments: sequence.segments(),
            layout: &layout,
            totals: &totals,
        };

        let grid = LogGrid::new(&config, input);
        for p in &layout.placements {
            assert_eq!(grid.remark_line(p), p.row_index as u16);
        }

        // Baselines measured against a grid one row shorter land one line lower
        input.grid_height -= config.remark_row_height;
        let grid = LogGrid::new(&config, input);
        for p in &layout.placements {
            assert_eq!(grid.remark_line(p), p.row_index as u16 + 1);
        }
    }

    #[test]
    fn test_too_small_area() {
        let config = GridConfig::default();
        let sequence = SegmentSequence::new();
        let (layout, totals) = build(&sequence, &config, 24);
        let input = RenderInput {
            grid_height: config.grid_height(),
            segments: sequence.segments(),
            layout: &layout,
            totals: &totals,
        };

        let area = Rect::new(0, 0, 30, 20);
        let mut buf = Buffer::empty(area);
        LogGrid::new(&config, input).render(area, &mut buf);

        let content: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(content.contains("too small"));
    }

    #[test]
    fn test_grid_cols_has_floor() {
        assert_eq!(LogGrid::grid_cols(10), MIN_GRID_COLS);
        assert_eq!(LogGrid::grid_cols(120), 120 - LABEL_WIDTH - TOTALS_WIDTH);
        assert_eq!(LogGrid::total_width(48), 48 + LABEL_WIDTH + TOTALS_WIDTH);
    }
}
