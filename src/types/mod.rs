//! Type definitions for hoslog

mod error;
mod meta;
mod segment;

use std::fmt;

pub use error::*;
pub use meta::*;
pub use segment::*;

/// Number of duty-status categories on a log grid
pub const CATEGORY_COUNT: usize = 4;

/// Saved-log loading warning types
#[derive(Debug, Clone, PartialEq)]
pub enum StorageWarning {
    /// Failed to open or read the saved log
    LoadFailed(String),
    /// Saved log was not valid JSON
    Corrupted(String),
    /// Some records could not be coerced and were dropped
    SkippedRecords(usize),
}

impl StorageWarning {
    /// True when nothing in the saved log could be read, so writing over it
    /// would lose data.
    pub fn is_unreadable(&self) -> bool {
        matches!(self, Self::LoadFailed(_) | Self::Corrupted(_))
    }
}

impl fmt::Display for StorageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadFailed(msg) | Self::Corrupted(msg) => f.write_str(msg),
            Self::SkippedRecords(n) => write!(f, "{} saved record(s) could not be read", n),
        }
    }
}
