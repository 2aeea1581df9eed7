//! Export a finished day as a JSON log document, then clear the saved log

use crate::config::GridConfig;
use crate::engine::{format_hours_as_clock, layout_remarks, Geometry, SegmentStore, TextMeasure};
use crate::services::storage::{write_atomic, LogStorage};
use crate::types::{HoslogError, LogMeta, RemarkLayout, Result, SegmentSequence};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryLine {
    pub name: String,
    pub hours: f64,
    pub clock: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentLine {
    pub from: String,
    pub to: String,
    pub from_x: f64,
    pub to_x: f64,
    pub category: String,
    pub remark: String,
}

/// Everything a renderer or archive needs for one day
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogDocument {
    pub meta: LogMeta,
    pub exported_at: i64,
    pub grid_width: f64,
    pub grid_height: f64,
    pub categories: Vec<CategoryLine>,
    pub grand_total: String,
    pub segments: Vec<SegmentLine>,
    pub remarks: RemarkLayout,
}

impl LogDocument {
    pub fn build(
        sequence: &SegmentSequence,
        config: &GridConfig,
        meta: LogMeta,
        measure: &impl TextMeasure,
    ) -> Self {
        let geometry = Geometry::from_config(config);
        let totals = SegmentStore::new(geometry).compute_totals(sequence);

        let categories = config
            .categories
            .iter()
            .zip(totals.per_category_hours)
            .map(|(name, hours)| CategoryLine {
                name: name.clone(),
                hours,
                clock: format_hours_as_clock(hours),
            })
            .collect();

        let segments = sequence
            .iter()
            .map(|seg| SegmentLine {
                from: geometry.x_to_time(seg.from_x).to_string(),
                to: geometry.end_label(seg.to_x),
                from_x: seg.from_x,
                to_x: seg.to_x,
                category: config
                    .categories
                    .get(seg.category_index)
                    .cloned()
                    .unwrap_or_default(),
                remark: seg.remark.clone(),
            })
            .collect();

        Self {
            meta,
            exported_at: chrono::Utc::now().timestamp(),
            grid_width: config.grid_width(),
            grid_height: config.grid_height(),
            categories,
            grand_total: format_hours_as_clock(totals.grand_total_hours),
            segments,
            remarks: layout_remarks(sequence, measure, config),
        }
    }
}

/// Write the document to `out`, then clear `storage`.
///
/// Storage is left untouched if the write fails or the saved log could not
/// be read. A log with dropped records is only exported when `force` is set,
/// since clearing it discards those records for good.
pub fn export_and_clear(
    storage: &impl LogStorage,
    config: &GridConfig,
    meta: LogMeta,
    measure: &impl TextMeasure,
    out: &Path,
    force: bool,
) -> Result<LogDocument> {
    let (sequence, warning) = storage.load_for_update()?;
    if let Some(warning) = warning {
        if !force {
            return Err(HoslogError::Storage(format!(
                "{}; nothing exported (use --force to export the rest and clear)",
                warning
            )));
        }
        log::warn!("exporting despite storage warning: {}", warning);
    }

    let document = LogDocument::build(&sequence, config, meta, measure);
    let content = serde_json::to_string_pretty(&document)
        .map_err(|e| HoslogError::Storage(format!("Serialization failed: {}", e)))?;

    if let Some(dir) = out.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    write_atomic(out, content.as_bytes())?;
    log::info!(
        "exported {} segment(s) to {}",
        sequence.len(),
        out.display()
    );

    storage.clear()?;
    Ok(document)
}

/// Default export file name: `drivers_daily_log_<date>_<unix seconds>.json`
pub fn default_export_name(meta: &LogMeta) -> String {
    format!(
        "drivers_daily_log_{}_{}.json",
        meta.date.format("%Y-%m-%d"),
        chrono::Utc::now().timestamp()
    )
}
