//! Saved-log persistence
//!
//! The engine never touches disk. Callers load a [`SegmentSequence`] at
//! session start and save it after each change through a [`LogStorage`].
//! Stored records are untrusted: numbers may arrive as strings, remarks may
//! be missing, and anything that cannot be coerced is dropped with a warning.

use crate::types::{
    HoslogError, Result, Segment, SegmentSequence, StorageWarning, CATEGORY_COUNT,
};
use directories::BaseDirs;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const STORAGE_VERSION: u32 = 1;

/// Load/save collaborator for one session's segments
pub trait LogStorage {
    /// Never fails on bad content; problems come back as a warning.
    fn load(&self) -> (SegmentSequence, Option<StorageWarning>);
    fn save(&self, sequence: &SegmentSequence) -> Result<()>;
    fn clear(&self) -> Result<()>;

    /// Load before a write-back. Fails when the saved log could not be read
    /// at all, so the caller cannot replace it with an empty one.
    fn load_for_update(&self) -> Result<(SegmentSequence, Option<StorageWarning>)> {
        match self.load() {
            (_, Some(warning)) if warning.is_unreadable() => Err(HoslogError::Storage(format!(
                "{}; saved log left untouched",
                warning
            ))),
            loaded => Ok(loaded),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedLog {
    version: u32,
    updated_at: i64,
    segments: SegmentSequence,
}

/// JSON file under `~/.hoslog/`, guarded by fs2 file locks
pub struct JsonFileStorage {
    path: PathBuf,
    grid_width: f64,
}

impl JsonFileStorage {
    pub fn new(grid_width: f64) -> Result<Self> {
        Ok(Self::with_data_dir(default_data_dir()?, grid_width))
    }

    pub fn with_data_dir(data_dir: PathBuf, grid_width: f64) -> Self {
        Self {
            path: data_dir.join("segments.json"),
            grid_width,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_locked(&self) -> std::result::Result<String, StorageWarning> {
        let file = File::open(&self.path).map_err(|e| {
            StorageWarning::LoadFailed(format!("Failed to open saved log: {}", e))
        })?;

        file.lock_shared().map_err(|e| {
            StorageWarning::LoadFailed(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut content = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut content);
        let _ = file.unlock();

        read.map_err(|e| StorageWarning::LoadFailed(format!("Failed to read saved log: {}", e)))?;
        Ok(content)
    }
}

impl LogStorage for JsonFileStorage {
    fn load(&self) -> (SegmentSequence, Option<StorageWarning>) {
        if !self.path.exists() {
            return (SegmentSequence::new(), None);
        }

        let content = match self.read_locked() {
            Ok(content) => content,
            Err(warning) => return (SegmentSequence::new(), Some(warning)),
        };

        match parse_saved_log(&content, self.grid_width) {
            Ok((sequence, 0)) => (sequence, None),
            Ok((sequence, skipped)) => {
                log::warn!(
                    "dropped {} unreadable record(s) from {}",
                    skipped,
                    self.path.display()
                );
                (sequence, Some(StorageWarning::SkippedRecords(skipped)))
            }
            Err(warning) => {
                log::warn!("{}: {}", self.path.display(), warning);
                (SegmentSequence::new(), Some(warning))
            }
        }
    }

    /// Atomic write (temp file + rename) under an exclusive lock.
    fn save(&self, sequence: &SegmentSequence) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let saved = SavedLog {
            version: STORAGE_VERSION,
            updated_at: chrono::Utc::now().timestamp(),
            segments: sequence.clone(),
        };
        let content = serde_json::to_string_pretty(&saved)
            .map_err(|e| HoslogError::Storage(format!("Serialization failed: {}", e)))?;

        write_atomic(&self.path, content.as_bytes())?;
        log::debug!(
            "saved {} segment(s) to {}",
            sequence.len(),
            self.path.display()
        );
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// In-process storage for embedding and tests
#[derive(Debug, Default)]
pub struct MemoryStorage {
    saved: RefCell<Option<SegmentSequence>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LogStorage for MemoryStorage {
    fn load(&self) -> (SegmentSequence, Option<StorageWarning>) {
        (self.saved.borrow().clone().unwrap_or_default(), None)
    }

    fn save(&self, sequence: &SegmentSequence) -> Result<()> {
        *self.saved.borrow_mut() = Some(sequence.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.saved.borrow_mut() = None;
        Ok(())
    }
}

pub fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new()
        .ok_or_else(|| HoslogError::Storage("Cannot determine home directory".into()))?;
    Ok(base_dirs.home_dir().join(".hoslog"))
}

/// Replace `path` with `bytes` in one rename, so readers see either the old
/// file or the new one and never a partial write.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("json.tmp");

    {
        let mut file = File::create(&temp_path)
            .map_err(|e| HoslogError::Storage(format!("Failed to create temp file: {}", e)))?;
        file.write_all(bytes)
            .map_err(|e| HoslogError::Storage(format!("Failed to write temp file: {}", e)))?;
        file.sync_all()
            .map_err(|e| HoslogError::Storage(format!("Failed to sync temp file: {}", e)))?;
    }

    let target = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?;

    target
        .lock_exclusive()
        .map_err(|e| HoslogError::Storage(format!("Failed to acquire write lock: {}", e)))?;

    fs::rename(&temp_path, path)
        .map_err(|e| HoslogError::Storage(format!("Failed to rename temp file: {}", e)))?;

    let _ = target.unlock();
    Ok(())
}

/// Accepts the versioned envelope or a bare array of records.
/// Returns the coerced sequence and how many records were dropped.
fn parse_saved_log(
    content: &str,
    grid_width: f64,
) -> std::result::Result<(SegmentSequence, usize), StorageWarning> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| StorageWarning::Corrupted(format!("Corrupted saved log: {}", e)))?;

    let records = match &value {
        Value::Array(records) => records,
        Value::Object(map) => match map.get("segments") {
            Some(Value::Array(records)) => records,
            _ => {
                return Err(StorageWarning::Corrupted(
                    "Saved log has no segments array".into(),
                ))
            }
        },
        _ => {
            return Err(StorageWarning::Corrupted(
                "Saved log is not an array or object".into(),
            ))
        }
    };

    let segments: Vec<Segment> = records
        .iter()
        .filter_map(|record| coerce_record(record, grid_width))
        .collect();
    let skipped = records.len() - segments.len();
    Ok((SegmentSequence::from_segments(segments), skipped))
}

fn coerce_record(record: &Value, grid_width: f64) -> Option<Segment> {
    let map = record.as_object()?;

    let from_x = map.get("fromX").and_then(coerce_number)?;
    let to_x = map.get("toX").and_then(coerce_number)?;
    let category = map
        .get("categoryIndex")
        .or_else(|| map.get("sectionIndex"))
        .and_then(coerce_number)?;

    if category.fract() != 0.0 || category < 0.0 || category >= CATEGORY_COUNT as f64 {
        return None;
    }

    let from_x = from_x.clamp(0.0, grid_width);
    let to_x = to_x.clamp(0.0, grid_width);
    if to_x < from_x {
        return None;
    }

    let remark = match map.get("remark") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    };

    Some(Segment::new(from_x, to_x, category as usize, remark))
}

fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}
