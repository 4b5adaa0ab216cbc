//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Alpine.js template compiler and demo server
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: jtemplate.toml)
    #[arg(short = 'C', long, global = true, default_value = "jtemplate.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Root template file (overrides `template.root`)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub root: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the compiled template and the todo API
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Worker threads handling requests
        #[arg(short, long)]
        threads: Option<usize>,
    },

    /// Compile the root template once and print or save the result
    #[command(visible_alias = "b")]
    Build {
        /// Write the compiled document here instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Embed empty component data and the client helpers, as served
        #[arg(long)]
        render: bool,
    },
}
