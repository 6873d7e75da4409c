// chromashift/src/cli.rs
//! This file defines the command-line interface (CLI) for the chromashift
//! application, including all available commands and their arguments.
//! License: MIT OR APACHE 2.0

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "chromashift",
    version = env!("CARGO_PKG_VERSION"),
    about = "An output colorizer for your favorite commands",
    long_about = "ChromaShift runs a command and colorizes its output with the regex rules configured for that command. Overlapping rules nest correctly, progress lines redrawn with carriage returns stay intact, and commands without rules run untouched.",
    after_help = "Example:\n  chromashift -- ls -l\n  chromashift --color always -- ping -c 3 localhost",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Extra command map file, merged over the built-in one.
    #[arg(long, value_name = "FILE", global = true, help = "Path to a command map (TOML) merged over the defaults.")]
    pub config: Option<PathBuf>,

    /// Directory searched first for rules files.
    #[arg(long = "rules-dir", value_name = "DIR", global = true, help = "Directory searched first for rules files.")]
    pub rules_dir: Option<PathBuf>,

    /// When to colorize.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true, help = "When to colorize output.")]
    pub color: ColorMode,

    /// Enable debug logging (overrides RUST_LOG).
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// The command to run, after `--`.
    #[arg(last = true, value_name = "COMMAND", help = "Command to run and colorize, given after `--`.")]
    pub program: Vec<String>,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lists the configured commands and their rules files.
    #[command(about = "List the commands that have coloring rules.")]
    List,

    /// Prints shell wrapper functions for every configured command.
    #[command(about = "Generate the alias script for the given shell.")]
    Alias {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Colorize when writing to a terminal.
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Zsh,
    Bash,
    Fish,
    #[value(alias = "nushell")]
    Nu,
}
