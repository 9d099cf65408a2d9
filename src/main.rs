mod cli;
mod commands;
mod config;
mod paths;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use config::Config;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// Global context for the application
pub struct Context {
    pub quiet: bool,
    /// `--url` / `SEMAPHORE_URL`
    pub url: Option<String>,
    /// `--token` / `SEMAPHORE_TOKEN`
    pub token: Option<String>,
    /// `--config`
    pub config_path: Option<PathBuf>,
    pub config: Config,
}

impl Context {
    /// API base URL, flag/env first, then config file
    pub fn url(&self) -> String {
        self.config.url(self.url.as_deref())
    }

    /// Bearer token, flag/env first, then config file
    pub fn token(&self) -> String {
        self.config.token(self.token.as_deref())
    }
}

fn main() -> Result<ExitCode> {
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

    if let Command::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "semactl", &mut io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    let ctx = Context {
        quiet: cli.quiet,
        url: cli.url,
        token: cli.token,
        config: Config::load(cli.config.as_deref())?,
        config_path: cli.config,
    };

    match cli.command {
        Command::Inventory(args) => commands::inventory::run(&ctx, args),
        Command::Component(args) => commands::component::run(&ctx, args),
        Command::Config(cmd) => commands::config::run(&ctx, cmd),
        Command::Completions { .. } => Ok(ExitCode::SUCCESS),
    }
}
