// chromashift/src/main.rs
//! ChromaShift entry point.
//!
//! Parses arguments, sets up logging and hands over to the command
//! dispatcher. The process exits with the wrapped command's exit code.
//!
//! License: MIT OR APACHE 2.0

use clap::Parser;
use log::LevelFilter;

use chromashift::cli::Cli;
use chromashift::utils::terminal::error_line;
use chromashift::{dispatch, logger};

fn main() {
    let cli = Cli::parse();

    logger::init_logger(cli.debug.then_some(LevelFilter::Debug));

    let code = match dispatch(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", error_line(&format!("{:#}", e)));
            1
        }
    };
    std::process::exit(code);
}
