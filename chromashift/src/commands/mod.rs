// chromashift/src/commands/mod.rs
//! Command implementations and dispatch.
//!
//! License: MIT OR APACHE 2.0

pub mod alias;
pub mod list;
pub mod run;

use anyhow::Result;
use is_terminal::IsTerminal;
use std::io;

use chromashift_core::SearchPaths;

use crate::cli::{Cli, ColorMode, Commands};

/// Runs whatever the command line asks for and returns the exit code.
pub fn dispatch(cli: Cli) -> Result<i32> {
    let paths = SearchPaths::from_env(cli.config.clone(), cli.rules_dir.clone());

    match cli.command {
        Some(Commands::List) => {
            let stdout = io::stdout();
            let styled = match cli.color {
                ColorMode::Always => true,
                ColorMode::Never => false,
                ColorMode::Auto => stdout.is_terminal(),
            };
            list::run_list(&paths, &mut stdout.lock(), styled)?;
            Ok(0)
        }
        Some(Commands::Alias { shell }) => {
            alias::run_alias(shell, &paths, &mut io::stdout().lock())?;
            Ok(0)
        }
        None => run::run_command(&run::RunOptions {
            program: cli.program,
            color: cli.color,
            paths,
        }),
    }
}
