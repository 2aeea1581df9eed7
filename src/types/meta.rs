//! Header fields printed above an exported daily log

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMeta {
    pub date: NaiveDate,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub miles_driving: Option<String>,
    #[serde(default)]
    pub total_mileage: Option<String>,
    #[serde(default)]
    pub carrier: Option<String>,
    /// Truck/tractor and trailer numbers
    #[serde(default)]
    pub truck: Option<String>,
    #[serde(default)]
    pub main_office: Option<String>,
    #[serde(default)]
    pub home_terminal: Option<String>,
    /// Free-text remarks written outside the grid
    #[serde(default)]
    pub remarks: Option<String>,
}

impl LogMeta {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date,
            from: None,
            to: None,
            miles_driving: None,
            total_mileage: None,
            carrier: None,
            truck: None,
            main_office: None,
            home_terminal: None,
            remarks: None,
        }
    }

    /// Header lines in display order, `(none)` for blank remarks
    pub fn header_lines(&self) -> Vec<String> {
        let field = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or("").to_string();
        let remarks = match self.remarks.as_deref().map(str::trim) {
            Some(r) if !r.is_empty() => r.to_string(),
            _ => "(none)".to_string(),
        };
        vec![
            format!("Date: {}", self.date.format("%Y-%m-%d")),
            format!("From: {}", field(&self.from)),
            format!("To: {}", field(&self.to)),
            format!("Miles Driving Today: {}", field(&self.miles_driving)),
            format!("Total Mileage Today: {}", field(&self.total_mileage)),
            format!("Carrier: {}", field(&self.carrier)),
            format!("Truck/Tractor & Trailer: {}", field(&self.truck)),
            format!("Main Office Address: {}", field(&self.main_office)),
            format!("Home Terminal Address: {}", field(&self.home_terminal)),
            format!("Remarks: {}", remarks),
        ]
    }
}
