//! TUI widgets

pub mod log_grid;
