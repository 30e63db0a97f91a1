//! Command-line driver for layer visibility and override management.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod settings;
pub mod summary;
