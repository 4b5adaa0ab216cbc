//! jtemplate - Alpine.js page templates with hot recompilation.

mod cli;
mod config;
mod core;
mod embed;
mod logger;
mod store;
mod template;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::AppConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = AppConfig::load(&cli)?;

    match &cli.command {
        Commands::Serve { .. } => {
            let template = cli::common::load_template(&config)?;
            cli::serve::serve(&config, template)
        }
        Commands::Build { output, render } => {
            cli::build::build(&config, output.as_deref(), *render)
        }
    }
}
