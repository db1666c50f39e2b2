//! Turn pacing analyzer CLI library.
//!
//! This crate wraps the tp-core pipeline with log ingestion, configuration,
//! and report rendering.

mod cli;
mod config;
pub mod input;
pub mod report;

pub use cli::Cli;
pub use config::Config;
