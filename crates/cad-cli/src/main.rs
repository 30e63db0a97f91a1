//! `cad` command-line entry point.

use std::io::{self, IsTerminal};

use cad_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use cad_cli::commands::{run_load, run_propagate, run_save, run_show};
use cad_cli::logging::{LogConfig, LogFormat, init_logging};
use cad_cli::settings::{Settings, load_settings};
use cad_cli::summary::{print_hierarchy, print_load_outcome, print_propagation, print_save_summary};
use cad_core::CoreError;
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let loaded = load_settings(cli.settings.as_deref());
    let log_config = log_config_from_cli(&cli, &loaded.settings);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    loaded.log();
    let layout = &loaded.settings.store;

    let result = match &cli.command {
        Command::Show(args) => run_show(args, layout).map(|containers| print_hierarchy(&containers)),
        Command::Save(args) => run_save(args, layout).map(|summary| print_save_summary(&summary)),
        Command::Load(args) => run_load(args, layout).map(|outcome| print_load_outcome(&outcome)),
        Command::Propagate(args) => {
            run_propagate(args, layout).map(|report| print_propagation(&report))
        }
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            report_error(&error);
            1
        }
    };
    std::process::exit(exit_code);
}

fn report_error(error: &anyhow::Error) {
    eprintln!("error: {error:#}");
    if let Some(core) = error.downcast_ref::<CoreError>() {
        eprintln!("{}", core.user_message());
        if let Some(hint) = core.suggestion() {
            eprintln!("hint: {hint}");
        }
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli, settings: &Settings) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        Some(LogFormatArg::Pretty) => LogFormat::Pretty,
        Some(LogFormatArg::Compact) => LogFormat::Compact,
        Some(LogFormatArg::Json) => LogFormat::Json,
        None => settings.logging.format.unwrap_or_default(),
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
