//! hoslog - driver's daily log grid
//!
//! Records duty-status segments on a fixed 24-hour timeline, totals them per
//! category and lays out remark labels below the grid without overlap.

pub mod cli;
pub mod config;
pub mod engine;
pub mod services;
pub mod tui;
pub mod types;
