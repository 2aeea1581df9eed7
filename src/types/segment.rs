//! Segment and layout types for the log grid

use serde::{Deserialize, Serialize};

use super::CATEGORY_COUNT;

/// Clock time on the 24-hour ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    /// Saturates instead of overflowing on out-of-range hours.
    pub fn minutes_since_midnight(self) -> u32 {
        self.hour.saturating_mul(60).saturating_add(self.minute)
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// One stored duty-status interval, in grid pixel space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub from_x: f64,
    pub to_x: f64,
    #[serde(alias = "sectionIndex")]
    pub category_index: usize,
    #[serde(default)]
    pub remark: String,
}

impl Segment {
    pub fn new(from_x: f64, to_x: f64, category_index: usize, remark: impl Into<String>) -> Self {
        Self {
            from_x,
            to_x,
            category_index,
            remark: remark.into(),
        }
    }

    /// Pixel width of the segment (zero for degenerate segments)
    pub fn span(&self) -> f64 {
        self.to_x - self.from_x
    }

    pub fn is_zero_width(&self) -> bool {
        self.span().abs() < f64::EPSILON
    }
}

/// Ordered, append-only list of segments for one 24-hour log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentSequence {
    segments: Vec<Segment>,
}

impl SegmentSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub(crate) fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

}

impl<'a> IntoIterator for &'a SegmentSequence {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// Hours per category plus the grand total
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotals {
    pub per_category_hours: [f64; CATEGORY_COUNT],
    pub grand_total_hours: f64,
}

/// Measured extent of a rendered label
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextSize {
    pub width: f64,
    pub height: f64,
}

impl TextSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Where one segment's remark label goes below the grid
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemarkPlacement {
    pub segment_index: usize,
    pub row_index: usize,
    /// Segment boundary the label is anchored to (`to_x`)
    pub anchor_x: f64,
    pub text_left_x: f64,
    pub text_baseline_y: f64,
    pub width: f64,
    pub height: f64,
}

impl RemarkPlacement {
    pub fn right(&self) -> f64 {
        self.text_left_x + self.width
    }
}

/// Result of a remark layout pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemarkLayout {
    /// Placements in processing order (ascending anchor X)
    pub placements: Vec<RemarkPlacement>,
    pub row_count: usize,
    /// Total drawable height needed to show every row
    pub required_height: f64,
}
