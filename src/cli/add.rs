//! `hoslog add` subcommand: append one duty-status entry

use clap::Args;
use regex::Regex;
use std::sync::OnceLock;

use super::Session;
use crate::engine::{format_hours_as_clock, Geometry, SegmentStore};
use crate::services::storage::LogStorage;
use crate::types::{HoslogError, Result, TimeOfDay};

/// Append a segment to today's log
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Start time (HH:MM, HHMM or HH). Ignored once the log has entries
    #[arg(long, value_parser = parse_time_arg, default_value = "00:00")]
    pub from: TimeOfDay,

    /// End time (HH:MM, HHMM or HH)
    #[arg(long, value_parser = parse_time_arg)]
    pub to: TimeOfDay,

    /// Duty status: index (0-3) or name (off, sleeper, driving, on-duty)
    #[arg(long, short)]
    pub category: String,

    /// Remark shown below the grid
    #[arg(long, short, default_value = "")]
    pub remark: String,
}

impl AddArgs {
    pub fn run(self, session: &Session) -> Result<()> {
        let category_index = session.config.category_index(&self.category)?;
        let geometry = Geometry::from_config(&session.config);
        let store = SegmentStore::new(geometry);

        let (sequence, warning) = session.storage.load_for_update()?;
        if let Some(warning) = warning {
            eprintln!("warning: {}", warning);
        }

        let before = sequence.len();
        let next = store.append(
            &sequence,
            self.from,
            self.to,
            category_index,
            self.remark.trim(),
        )?;
        session.storage.save(&next)?;

        for seg in &next.segments()[before..] {
            println!(
                "added {} {} -> {} ({})",
                session.config.categories[seg.category_index],
                geometry.x_to_time(seg.from_x),
                geometry.end_label(seg.to_x),
                format_hours_as_clock(seg.span() / geometry.px_per_hour()),
            );
        }
        Ok(())
    }
}

fn time_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,2})(?::?(\d{2}))?$").expect("valid regex"))
}

/// Parse a clock time and check its range (hour 0-23, minute 0-59).
pub fn parse_time(input: &str) -> Result<TimeOfDay> {
    let caps = time_regex()
        .captures(input.trim())
        .ok_or_else(|| HoslogError::Parse(format!("invalid time '{}', expected HH:MM", input)))?;

    let hour: u32 = caps[1]
        .parse()
        .map_err(|_| HoslogError::Parse(format!("invalid hour in '{}'", input)))?;
    let minute: u32 = match caps.get(2) {
        Some(m) => m
            .as_str()
            .parse()
            .map_err(|_| HoslogError::Parse(format!("invalid minute in '{}'", input)))?,
        None => 0,
    };

    if hour > 23 {
        return Err(HoslogError::Validation(format!(
            "hour {} out of range 0-23",
            hour
        )));
    }
    if minute > 59 {
        return Err(HoslogError::Validation(format!(
            "minute {} out of range 0-59",
            minute
        )));
    }
    Ok(TimeOfDay::new(hour, minute))
}

fn parse_time_arg(input: &str) -> std::result::Result<TimeOfDay, String> {
    parse_time(input).map_err(|e| e.to_string())
}
