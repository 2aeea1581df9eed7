//! End-to-end checks through the public API: append, persist, total, lay out

use hoslog::config::GridConfig;
use hoslog::engine::{format_hours_as_clock, layout_remarks, Geometry, SegmentStore, TextMeasure};
use hoslog::services::{JsonFileStorage, LogStorage};
use hoslog::types::{SegmentSequence, TextSize, TimeOfDay};
use tempfile::TempDir;

struct FixedWidth(f64);

impl TextMeasure for FixedWidth {
    fn measure(&self, _text: &str) -> TextSize {
        TextSize::new(self.0, 14.0)
    }
}

#[test]
fn test_overnight_entry_survives_storage() {
    let temp = TempDir::new().unwrap();
    let config = GridConfig::default();
    let storage = JsonFileStorage::with_data_dir(temp.path().to_path_buf(), config.grid_width());
    let store = SegmentStore::new(Geometry::from_config(&config));

    let sequence = store
        .append(
            &SegmentSequence::new(),
            TimeOfDay::new(22, 0),
            TimeOfDay::new(2, 0),
            2,
            "x",
        )
        .unwrap();
    storage.save(&sequence).unwrap();

    let (loaded, warning) = storage.load();
    assert!(warning.is_none());
    assert_eq!(loaded, sequence);

    let first = &loaded.segments()[0];
    let second = &loaded.segments()[1];
    assert_eq!((first.from_x, first.to_x), (1100.0, 1200.0));
    assert_eq!((second.from_x, second.to_x), (0.0, 100.0));

    let totals = store.compute_totals(&loaded);
    assert_eq!(totals.per_category_hours[2], totals.grand_total_hours);
    assert_eq!(format_hours_as_clock(totals.grand_total_hours), "04:00");
}

#[test]
fn test_full_day_layout() {
    let config = GridConfig::default();
    let store = SegmentStore::new(Geometry::from_config(&config));
    let entries = [
        (6, 0, 0, ""),
        (6, 30, 3, "Pre-trip, Sparks NV"),
        (11, 0, 2, "Lovelock"),
        (11, 30, 3, "Fuel"),
        (15, 0, 2, "Winnemucca"),
        (15, 15, 3, "Scale"),
        (20, 0, 2, "Elko"),
        (0, 0, 1, ""),
    ];

    let mut sequence = SegmentSequence::new();
    for (hour, minute, category, remark) in entries {
        sequence = store
            .append(
                &sequence,
                TimeOfDay::new(0, 0),
                TimeOfDay::new(hour, minute),
                category,
                remark,
            )
            .unwrap();
    }

    // last entry ends at midnight: 20:00 -> 24:00 plus a zero-width 00:00 piece
    assert_eq!(sequence.len(), 9);
    assert_eq!(
        format_hours_as_clock(store.compute_totals(&sequence).grand_total_hours),
        "24:00"
    );

    let layout = layout_remarks(&sequence, &FixedWidth(60.0), &config);
    assert_eq!(layout.placements.len(), 6);
    // 11:00 and 11:30 are 25px apart, 15:00 and 15:15 are 12.5px apart
    assert_eq!(layout.row_count, 2);
    assert_eq!(
        layout.required_height,
        config.remark_base_y() + 2.0 * config.remark_row_height + config.bottom_margin
    );
}
