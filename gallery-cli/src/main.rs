mod cli;
mod commands;
mod project;
mod state;
mod ui;

use clap::Parser;

use crate::cli::{Cli, Command};
use crate::commands::simulate_cmd::SimOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Command::Walk { layout: None });

    // The walk view owns the terminal; anything it reports goes to its
    // event panel instead of stderr.
    if !matches!(command, Command::Walk { .. }) {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
            .try_init();
    }

    match command {
        Command::Check { layout } => commands::check_cmd::run(layout).await,
        Command::New { name, force } => commands::new_cmd::run(name, force).await,
        Command::Simulate {
            layout,
            hold,
            seconds,
            fps,
            yaw,
            pitch,
            interact,
            format,
        } => {
            let options = SimOptions {
                hold,
                seconds,
                fps,
                yaw_degrees: yaw,
                pitch_degrees: pitch,
                interact,
            };
            commands::simulate_cmd::run(layout, options, format).await
        }
        Command::Walk { layout } => commands::walk_cmd::run(layout).await,
    }
}
