//! Grid configuration
//!
//! Every size the engine and renderers need lives here and is injected once.

use crate::types::{HoslogError, Result, CATEGORY_COUNT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const HOURS_PER_DAY: u32 = 24;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub px_per_hour: f64,
    /// Category names, top to bottom
    pub categories: Vec<String>,
    pub section_height: f64,
    pub remark_font_size: f64,
    pub remark_row_height: f64,
    /// Gap between the bottom of the grid and the first remark row
    pub remark_top_gap: f64,
    /// Minimum buffer between two labels sharing a row
    pub remark_pad: f64,
    /// Labels never come closer than this to the grid's left/right edge
    pub edge_inset: f64,
    pub bottom_margin: f64,
    /// Give zero-width segments a remark label too
    pub include_zero_width_remarks: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            px_per_hour: 50.0,
            categories: vec![
                "Off Duty".to_string(),
                "Sleeper Berth".to_string(),
                "Driving".to_string(),
                "On Duty".to_string(),
            ],
            section_height: 80.0,
            remark_font_size: 12.0,
            remark_row_height: 18.0,
            remark_top_gap: 18.0,
            remark_pad: 6.0,
            edge_inset: 4.0,
            bottom_margin: 40.0,
            include_zero_width_remarks: true,
        }
    }
}

impl GridConfig {
    /// Load from a JSON file; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: GridConfig = serde_json::from_str(&content)
            .map_err(|e| HoslogError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("px_per_hour", self.px_per_hour),
            ("section_height", self.section_height),
            ("remark_font_size", self.remark_font_size),
            ("remark_row_height", self.remark_row_height),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(HoslogError::Config(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        let non_negative = [
            ("remark_top_gap", self.remark_top_gap),
            ("remark_pad", self.remark_pad),
            ("edge_inset", self.edge_inset),
            ("bottom_margin", self.bottom_margin),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(HoslogError::Config(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }
        if self.categories.len() != CATEGORY_COUNT {
            return Err(HoslogError::Config(format!(
                "expected {} categories, got {}",
                CATEGORY_COUNT,
                self.categories.len()
            )));
        }
        Ok(())
    }

    pub fn grid_width(&self) -> f64 {
        HOURS_PER_DAY as f64 * self.px_per_hour
    }

    pub fn grid_height(&self) -> f64 {
        self.categories.len() as f64 * self.section_height
    }

    /// Y of the first remark row's top edge
    pub fn remark_base_y(&self) -> f64 {
        self.grid_height() + self.remark_top_gap
    }

    /// Resolve a category from an index ("2") or a case-insensitive name or unique prefix
    pub fn category_index(&self, query: &str) -> Result<usize> {
        let query = query.trim();
        if let Ok(index) = query.parse::<usize>() {
            return if index < self.categories.len() {
                Ok(index)
            } else {
                Err(HoslogError::Validation(format!(
                    "category index {} out of range 0..{}",
                    index,
                    self.categories.len()
                )))
            };
        }

        let lower = query.to_lowercase();
        let normalized = |name: &str| name.to_lowercase().replace(['-', '_'], " ");
        let needle = lower.replace(['-', '_'], " ");
        if needle.is_empty() {
            return Err(HoslogError::Validation("empty category".into()));
        }
        if let Some(pos) = self.categories.iter().position(|c| normalized(c) == needle) {
            return Ok(pos);
        }
        let matches: Vec<usize> = self
            .categories
            .iter()
            .enumerate()
            .filter(|(_, c)| normalized(c).starts_with(&needle))
            .map(|(i, _)| i)
            .collect();
        match matches.as_slice() {
            [only] => Ok(*only),
            [] => Err(HoslogError::Validation(format!(
                "unknown category '{}' (expected one of: {})",
                query,
                self.categories.join(", ")
            ))),
            _ => Err(HoslogError::Validation(format!(
                "ambiguous category '{}'",
                query
            ))),
        }
    }
}
