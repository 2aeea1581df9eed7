//! Terminal rendering

pub mod widgets;
