//! CLI subcommand implementations.

pub mod chart;
pub mod complete;
pub mod export;
pub mod history;
pub mod import;
pub mod progress;
pub mod stats;
pub mod status;
pub mod util;
