use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "gallery",
    about = "Gallery walkthrough layout tool",
    version,
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a layout file and print what it builds
    Check {
        /// Path to the layout .toml
        layout: PathBuf,
    },
    /// Create a new gallery directory with the default layout
    New {
        /// Directory to create
        name: String,
        /// Overwrite an existing layout file
        #[arg(long)]
        force: bool,
    },
    /// Run the walkthrough headless and report where the player ends up
    Simulate {
        /// Path to the layout .toml
        layout: PathBuf,
        /// Keys held for the whole run, comma separated (e.g. "w,d" or "ArrowUp")
        #[arg(long, value_delimiter = ',')]
        hold: Vec<String>,
        /// Seconds of free roam after the intro
        #[arg(long, default_value_t = 2.0)]
        seconds: f32,
        /// Simulated frame rate
        #[arg(long, default_value_t = 60)]
        fps: u32,
        /// View yaw in degrees
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        yaw: f32,
        /// View pitch in degrees
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        pitch: f32,
        /// Press the interaction key on the last frame
        #[arg(long)]
        interact: bool,
        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
    /// Walk the gallery in the terminal (top-down view)
    Walk {
        /// Path to the layout .toml (default: discovered or built in)
        layout: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Toml,
}
