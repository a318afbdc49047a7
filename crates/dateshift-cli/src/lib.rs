//! CLI library components for the date shifting toolkit.

pub mod logging;
