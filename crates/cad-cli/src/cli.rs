//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cad",
    version,
    about = "Manage layer visibility and graphic overrides of imported drawings",
    long_about = "Manage layer visibility and graphic overrides of imported drawings.\n\n\
                  Works against a JSON scene file describing views, drawings, their\n\
                  layers and the per-view state. Layer settings are saved as one JSON\n\
                  file per drawing in a LayerToggles folder next to the project."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (defaults to the settings file, then pretty).
    #[arg(long = "log-format", value_enum, global = true)]
    pub log_format: Option<LogFormatArg>,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file (default: settings.toml in the user config folder).
    #[arg(long = "settings", value_name = "PATH", global = true)]
    pub settings: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the drawings and layers of a view.
    Show(ShowArgs),

    /// Save the layer settings of a view.
    Save(SaveArgs),

    /// Load saved layer settings and apply them to a view.
    Load(LoadArgs),

    /// Copy the layer settings of a view onto other views.
    Propagate(PropagateArgs),
}

#[derive(Args)]
pub struct SceneArgs {
    /// Scene file describing the drawing model.
    #[arg(value_name = "SCENE")]
    pub scene: PathBuf,

    /// Name of the view to work on.
    #[arg(long = "view", value_name = "NAME")]
    pub view: String,
}

#[derive(Args)]
pub struct ProjectArgs {
    /// Project file; settings are saved next to it.
    #[arg(long = "project", value_name = "PATH")]
    pub project: Option<PathBuf>,

    /// Project title used for the per-user save folder (default: file name).
    #[arg(long = "title", value_name = "TITLE")]
    pub title: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub scene: SceneArgs,

    /// Only show drawings or layers whose name contains this text.
    #[arg(long = "query", value_name = "TEXT")]
    pub query: Option<String>,
}

#[derive(Args)]
pub struct SaveArgs {
    #[command(flatten)]
    pub scene: SceneArgs,

    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Args)]
pub struct LoadArgs {
    #[command(flatten)]
    pub scene: SceneArgs,

    #[command(flatten)]
    pub project: ProjectArgs,

    /// Load from this folder instead of the project save folder.
    #[arg(long = "from", value_name = "DIR")]
    pub from: Option<PathBuf>,
}

#[derive(Args)]
pub struct PropagateArgs {
    #[command(flatten)]
    pub scene: SceneArgs,

    /// Views to copy the settings onto.
    #[arg(long = "to", value_name = "NAME", required = true, num_args = 1..)]
    pub to: Vec<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
