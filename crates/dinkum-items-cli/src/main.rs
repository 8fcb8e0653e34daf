use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(format!("dinkum_items={}", level).parse()?),
        )
        .init();

    let profile = config::load_profile(cli.profile.as_deref())?;

    match cli.command {
        Command::Extract { game_dir, output } => commands::extract::run(&game_dir, &output, &profile),
        Command::Calibrate { game_dir } => commands::calibrate::run(&game_dir, &profile),
        Command::Inspect {
            game_dir,
            index,
            size,
        } => commands::inspect::run(&game_dir, index, size, &profile),
    }
}
