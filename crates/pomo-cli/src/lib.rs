//! Pomodoro tracker CLI library.
//!
//! This crate provides the `pomo` command-line interface over the
//! gamification engine and its `SQLite` store.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
