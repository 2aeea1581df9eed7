//! `hoslog export` subcommand: write the day's log document and clear it

use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;

use super::Session;
use crate::engine::CharWidthMeasure;
use crate::services::export::{default_export_name, export_and_clear};
use crate::types::{LogMeta, Result};

/// Export the current log as JSON, then clear it
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file (default: drivers_daily_log_<date>_<ts>.json in the current directory)
    #[arg(long, short)]
    pub out: Option<PathBuf>,

    /// Log date (default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Starting location
    #[arg(long = "from-location")]
    pub from: Option<String>,

    /// Destination
    #[arg(long = "to-location")]
    pub to: Option<String>,

    #[arg(long)]
    pub miles_driving: Option<String>,

    #[arg(long)]
    pub total_mileage: Option<String>,

    #[arg(long)]
    pub carrier: Option<String>,

    /// Truck/tractor and trailer numbers
    #[arg(long)]
    pub truck: Option<String>,

    #[arg(long)]
    pub main_office: Option<String>,

    #[arg(long)]
    pub home_terminal: Option<String>,

    /// Remarks written outside the grid
    #[arg(long)]
    pub remarks: Option<String>,

    /// Export and clear even if some saved records could not be read
    #[arg(long)]
    pub force: bool,
}

impl ExportArgs {
    fn into_meta(self) -> (LogMeta, Option<PathBuf>, bool) {
        let meta = LogMeta {
            date: self.date.unwrap_or_else(|| Local::now().date_naive()),
            from: self.from,
            to: self.to,
            miles_driving: self.miles_driving,
            total_mileage: self.total_mileage,
            carrier: self.carrier,
            truck: self.truck,
            main_office: self.main_office,
            home_terminal: self.home_terminal,
            remarks: self.remarks,
        };
        (meta, self.out, self.force)
    }

    pub fn run(self, session: &Session) -> Result<()> {
        let (meta, out, force) = self.into_meta();
        let out = out.unwrap_or_else(|| PathBuf::from(default_export_name(&meta)));
        let measure = CharWidthMeasure::from_config(&session.config);

        let document = export_and_clear(
            &session.storage,
            &session.config,
            meta,
            &measure,
            &out,
            force,
        )?;

        for line in document.meta.header_lines() {
            println!("{}", line);
        }
        println!(
            "Exported {} segment(s), total {}, to {}",
            document.segments.len(),
            document.grand_total,
            out.display()
        );
        println!("Saved log cleared.");
        Ok(())
    }
}
