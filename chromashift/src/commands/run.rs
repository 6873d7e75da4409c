// chromashift/src/commands/run.rs
//! Runs the wrapped command, colorizing one of its output streams.
//!
//! When color is off, no rules apply or anything goes wrong while looking
//! them up, the command runs with inherited stdio and the wrapper stays out
//! of the way.
//!
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result, bail};
use log::{debug, info};
use std::io::{self, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};

use chromashift_core::{
    ColorizationEngine, RegexEngine, RuleSet, SearchPaths, config, copy_colorized,
};

use crate::cli::ColorMode;
use crate::utils::signals;
use crate::utils::terminal::{self, TerminalEnv};

/// Exit code when the command could not be started.
pub const EXIT_SPAWN_FAILED: i32 = 127;

/// Options for the ergonomic `run_command` API.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub program: Vec<String>,
    pub color: ColorMode,
    pub paths: SearchPaths,
}

/// Runs `opts.program` and returns the exit code to leave with.
pub fn run_command(opts: &RunOptions) -> Result<i32> {
    if opts.program.is_empty() {
        bail!("No command given. Usage: chromashift [OPTIONS] -- COMMAND [ARGS...]");
    }
    signals::install_relay();

    let env = TerminalEnv::detect();
    if !terminal::color_enabled(opts.color, &env) {
        debug!("Color disabled, running without colorization");
        return run_plain(&opts.program);
    }

    let Some(rule_set) = select_rules(&opts.program, &opts.paths) else {
        return run_plain(&opts.program);
    };

    if rule_set.pty {
        debug!("Rules request a pseudo-terminal; running through pipes instead");
    }
    if !terminal::destination_allows_color(opts.color, &env, rule_set.stderr) {
        debug!("Destination stream is not a terminal, running without colorization");
        return run_plain(&opts.program);
    }

    let engine = RegexEngine::new(rule_set);
    run_colorized(&opts.program, &engine)
}

/// Finds and loads the rules for a command line. Every failure is logged
/// and turns into "no rules".
pub fn select_rules(program: &[String], paths: &SearchPaths) -> Option<RuleSet> {
    let map = match config::load_command_map(paths) {
        Ok(map) => map,
        Err(e) => {
            debug!("Failed to load config: {:#}", e);
            return None;
        }
    };

    let file = match config::resolve_rule_file(&map, program) {
        Ok(file) => file,
        Err(e) => {
            debug!("{}", e);
            return None;
        }
    };
    debug!("Rules file name: {}", file);

    match config::load_rules(&file, paths) {
        Ok(set) if set.rules.is_empty() => {
            debug!("Rules file '{}' has no rules", file);
            None
        }
        Ok(set) => {
            info!("Using {} rule(s) from '{}'", set.rules.len(), file);
            Some(set)
        }
        Err(e) => {
            debug!("Failed to load rules for current command: {:#}", e);
            None
        }
    }
}

fn spawn(mut command: Command, program: &str) -> Result<Child> {
    let child = command
        .spawn()
        .with_context(|| format!("Failed to start '{}'", program))?;
    signals::track_child(child.id());
    Ok(child)
}

fn finish(mut child: Child) -> Result<i32> {
    let status = child.wait().context("Failed to wait for the command")?;
    signals::untrack_child();
    Ok(exit_code(status))
}

fn run_plain(program: &[String]) -> Result<i32> {
    let mut command = Command::new(&program[0]);
    command.args(&program[1..]);
    match spawn(command, &program[0]) {
        Ok(child) => finish(child),
        Err(e) => spawn_failed(e),
    }
}

fn run_colorized(program: &[String], engine: &RegexEngine) -> Result<i32> {
    let stderr = engine.rule_set().stderr;
    let mut command = Command::new(&program[0]);
    command.args(&program[1..]).stdin(Stdio::inherit());
    if stderr {
        command.stdout(Stdio::inherit()).stderr(Stdio::piped());
    } else {
        command.stdout(Stdio::piped()).stderr(Stdio::inherit());
    }

    let mut child = match spawn(command, &program[0]) {
        Ok(child) => child,
        Err(e) => return spawn_failed(e),
    };

    let pumped = if stderr {
        let pipe = child.stderr.take().context("Child stderr was not captured")?;
        pump(pipe, engine, io::stderr().lock())
    } else {
        let pipe = child.stdout.take().context("Child stdout was not captured")?;
        pump(pipe, engine, io::stdout().lock())
    };
    if let Err(e) = pumped {
        debug!("Stopped colorizing output: {}", e);
    }

    finish(child)
}

fn pump<R: Read, W: Write>(reader: R, engine: &dyn ColorizationEngine, sink: W) -> io::Result<()> {
    copy_colorized(reader, engine, sink).map(|_| ())
}

fn spawn_failed(e: anyhow::Error) -> Result<i32> {
    eprintln!("{}", terminal::error_line(&format!("{:#}", e)));
    Ok(EXIT_SPAWN_FAILED)
}

/// The child's exit code, or `128 + signal` when it was killed.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[cfg(unix)]
    #[test]
    fn test_exit_code_passthrough() {
        let status = Command::new("sh").args(["-c", "exit 3"]).status().unwrap();
        assert_eq!(exit_code(status), 3);
    }

    #[test]
    fn test_select_rules_from_rules_dir() {
        let home = tempfile::tempdir().unwrap();
        let rules = tempfile::tempdir().unwrap();
        let cfg = home.path().join("cfg.toml");
        fs::write(&cfg, "[greeter]\nfile = 'greeter.toml'\n").unwrap();
        fs::write(
            rules.path().join("greeter.toml"),
            "stderr = true\n[[rules]]\nregexp = 'hi'\ncolors = 'red'\n",
        )
        .unwrap();

        let paths = SearchPaths {
            config_file: Some(cfg),
            rules_dir: Some(rules.path().to_path_buf()),
            home: Some(home.path().to_path_buf()),
            ..Default::default()
        };
        let program = vec!["/usr/bin/greeter".to_string()];
        let set = select_rules(&program, &paths).unwrap();
        assert!(set.stderr);
        assert_eq!(set.rules.len(), 1);

        assert!(select_rules(&["unknown-tool".to_string()], &paths).is_none());
    }
}
