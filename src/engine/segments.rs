//! Segment store: append/split policy and per-category totals

use super::geometry::{snap_to_quarter_hour, Geometry};
use crate::types::{
    CategoryTotals, HoslogError, Result, Segment, SegmentSequence, TimeOfDay, CATEGORY_COUNT,
};

/// Appends segments to a log and totals them
#[derive(Debug, Clone, Copy)]
pub struct SegmentStore {
    geometry: Geometry,
}

impl SegmentStore {
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry }
    }

    /// Append an entry and return the new sequence.
    ///
    /// Both times are snapped to the quarter hour. A non-empty log ignores
    /// `from` and continues at the previous segment's end. Entries that cross
    /// midnight are stored as two segments: `[from, end of day]` and `[0, to]`.
    pub fn append(
        &self,
        sequence: &SegmentSequence,
        from: TimeOfDay,
        to: TimeOfDay,
        category_index: usize,
        remark: &str,
    ) -> Result<SegmentSequence> {
        if category_index >= CATEGORY_COUNT {
            return Err(HoslogError::Validation(format!(
                "category index {} out of range 0..{}",
                category_index, CATEGORY_COUNT
            )));
        }

        let mut from_x = self.geometry.time_to_x(snap_to_quarter_hour(from));
        let to_x = self.geometry.time_to_x(snap_to_quarter_hour(to));

        if let Some(last) = sequence.last() {
            from_x = last.to_x;
        }

        let mut next = sequence.clone();
        if to_x >= from_x {
            next.push(Segment::new(from_x, to_x, category_index, remark));
        } else {
            let end_of_day = self.geometry.grid_width();
            log::debug!(
                "splitting entry at midnight: {} -> {} becomes two segments",
                from_x,
                to_x
            );
            next.push(Segment::new(from_x, end_of_day, category_index, remark));
            next.push(Segment::new(0.0, to_x, category_index, remark));
        }
        Ok(next)
    }

    /// Hours per category. Each segment counts on its own, so out-of-order or
    /// overlapping data still totals; zero and negative spans add nothing.
    pub fn compute_totals(&self, sequence: &SegmentSequence) -> CategoryTotals {
        let mut totals = CategoryTotals::default();
        for segment in sequence {
            let hours = segment.span() / self.geometry.px_per_hour();
            if !hours.is_finite() || hours <= 0.0 {
                continue;
            }
            if let Some(slot) = totals.per_category_hours.get_mut(segment.category_index) {
                *slot += hours;
            }
        }
        totals.grand_total_hours = totals.per_category_hours.iter().sum();
        totals
    }

    pub fn clear(&self) -> SegmentSequence {
        SegmentSequence::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::geometry::format_hours_as_clock;

    fn store() -> SegmentStore {
        SegmentStore::new(Geometry::new(50.0))
    }

    fn t(hour: u32, minute: u32) -> TimeOfDay {
        TimeOfDay::new(hour, minute)
    }

    #[test]
    fn test_append_first_segment_keeps_own_start() {
        let seq = store()
            .append(&SegmentSequence::new(), t(6, 0), t(8, 30), 3, "Pre-trip")
            .unwrap();

        assert_eq!(seq.segments(), &[Segment::new(300.0, 425.0, 3, "Pre-trip")]);
    }

    #[test]
    fn test_append_snaps_times() {
        let seq = store()
            .append(&SegmentSequence::new(), t(6, 7), t(8, 38), 0, "")
            .unwrap();

        assert_eq!(seq.segments()[0].from_x, 300.0);
        assert_eq!(seq.segments()[0].to_x, 437.5);
    }

    #[test]
    fn test_append_chains_to_previous_end() {
        let s = store();
        let seq = s
            .append(&SegmentSequence::new(), t(0, 0), t(6, 0), 1, "")
            .unwrap();
        // Caller's from (3:00) is discarded
        let seq = s.append(&seq, t(3, 0), t(7, 0), 3, "").unwrap();

        assert_eq!(seq.segments()[1].from_x, 300.0);
        assert_eq!(seq.segments()[1].to_x, 350.0);
    }

    #[test]
    fn test_chaining_invariant_over_many_appends() {
        let s = store();
        let mut seq = SegmentSequence::new();
        for (i, hour) in [2u32, 5, 9, 12, 17, 21].into_iter().enumerate() {
            seq = s.append(&seq, t(0, 0), t(hour, 15), i % 4, "").unwrap();
        }

        assert_eq!(seq.len(), 6);
        for pair in seq.segments().windows(2) {
            assert_eq!(pair[1].from_x, pair[0].to_x);
        }
    }

    #[test]
    fn test_append_does_not_mutate_input() {
        let s = store();
        let seq = s
            .append(&SegmentSequence::new(), t(0, 0), t(1, 0), 0, "")
            .unwrap();
        let _ = s.append(&seq, t(0, 0), t(2, 0), 2, "").unwrap();
        assert_eq!(seq.len(), 1);
    }

    #[test]
    fn test_wraparound_scenario() {
        let s = store();
        let seq = s
            .append(&SegmentSequence::new(), t(22, 0), t(2, 0), 2, "x")
            .unwrap();

        assert_eq!(
            seq.segments(),
            &[
                Segment::new(1100.0, 1200.0, 2, "x"),
                Segment::new(0.0, 100.0, 2, "x"),
            ]
        );

        let totals = s.compute_totals(&seq);
        assert_eq!(format_hours_as_clock(totals.per_category_hours[2]), "04:00");
        assert_eq!(format_hours_as_clock(totals.grand_total_hours), "04:00");
    }

    #[test]
    fn test_wraparound_split_after_chaining() {
        let s = store();
        let seq = s
            .append(&SegmentSequence::new(), t(14, 0), t(20, 0), 2, "")
            .unwrap();
        let seq = s.append(&seq, t(0, 0), t(3, 30), 1, "Sleeper").unwrap();

        assert_eq!(seq.len(), 3);
        let first = &seq.segments()[1];
        let second = &seq.segments()[2];
        assert_eq!(first.to_x, 1200.0);
        assert_eq!(second.from_x, 0.0);
        assert_eq!(first.span() + second.span(), (1200.0 - 1000.0) + 175.0);
        assert_eq!(first.remark, second.remark);
        assert_eq!(first.category_index, second.category_index);
    }

    #[test]
    fn test_append_rejects_bad_category() {
        let result = store().append(&SegmentSequence::new(), t(0, 0), t(1, 0), 4, "");
        assert!(matches!(result, Err(HoslogError::Validation(_))));
    }

    #[test]
    fn test_append_zero_width() {
        let seq = store()
            .append(&SegmentSequence::new(), t(5, 0), t(5, 5), 0, "")
            .unwrap();
        assert_eq!(seq.len(), 1);
        assert!(seq.segments()[0].is_zero_width());
        assert_eq!(store().compute_totals(&seq).grand_total_hours, 0.0);
    }

    #[test]
    fn test_totals_additivity() {
        let s = store();
        let seq = SegmentSequence::from_segments(vec![
            Segment::new(0.0, 350.0, 0, ""),
            Segment::new(350.0, 500.0, 3, ""),
            Segment::new(500.0, 900.0, 2, ""),
            Segment::new(900.0, 900.0, 1, ""),
            Segment::new(900.0, 1200.0, 0, ""),
        ]);

        let totals = s.compute_totals(&seq);

        assert_eq!(totals.per_category_hours, [13.0, 0.0, 8.0, 3.0]);
        assert_eq!(totals.grand_total_hours, 24.0);
        assert_eq!(
            totals.grand_total_hours,
            totals.per_category_hours.iter().sum::<f64>()
        );
    }

    #[test]
    fn test_totals_do_not_assume_contiguity() {
        let seq = SegmentSequence::from_segments(vec![
            Segment::new(600.0, 700.0, 2, ""),
            Segment::new(100.0, 200.0, 2, ""),
            // hand-edited: reversed span contributes nothing
            Segment::new(800.0, 750.0, 1, ""),
            Segment::new(f64::NAN, 10.0, 0, ""),
        ]);

        let totals = store().compute_totals(&seq);

        assert_eq!(totals.per_category_hours, [0.0, 0.0, 4.0, 0.0]);
        assert!(totals.grand_total_hours.is_finite());
    }

    #[test]
    fn test_clear_returns_empty() {
        assert!(store().clear().is_empty());
    }
}
