//! Timeline segment engine: geometry, segment store and remark layout

pub mod geometry;
pub mod remarks;
pub mod segments;

pub use geometry::{format_hours_as_clock, snap_to_quarter_hour, Geometry};
pub use remarks::{
    layout_remarks, CharWidthMeasure, FallbackMeasure, RemarkLayoutEngine, TextMeasure,
};
pub use segments::SegmentStore;
