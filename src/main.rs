mod cli;
mod commands;
mod config;
mod dataset;
mod dates;
mod progress;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command, SeedArgs};
use config::SeedConfig;
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    match cli.command.unwrap_or(Command::Seed(SeedArgs::default())) {
        Command::Seed(args) => {
            let config = SeedConfig::load(&cli.connection)?;
            commands::seed::run(&ctx, &config, args)
        }
        Command::Verify => {
            let config = SeedConfig::load(&cli.connection)?;
            commands::verify::run(&config)
        }
        Command::Completions { shell } => {
            generate(shell, &mut Cli::command(), "factory-seed", &mut io::stdout());
            Ok(())
        }
    }
}
