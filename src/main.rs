use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;

use crate::cli::{Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(mode) = cli.color {
        gitwp::set_color_mode(mode);
    }
    gitwp::telemetry_init(cli.verbose);

    match &cli.command {
        Command::Work { build, sync } => commands::run_work(&cli, *build, *sync),
        Command::Wp { args } => commands::run_wp(&cli, args),
        Command::Stop => commands::run_stop(&cli),
    }
}
