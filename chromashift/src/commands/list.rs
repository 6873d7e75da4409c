// chromashift/src/commands/list.rs
//! `chromashift list`: shows every configured command.
//!
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::io::Write;

use chromashift_core::{CommandMap, SearchPaths, config};

pub fn run_list<W: Write>(paths: &SearchPaths, out: &mut W, styled: bool) -> Result<()> {
    let map = config::load_command_map(paths)?;
    write_list(&map, out, styled).context("Failed to write command list")
}

/// One `[file] name = regexp` line per command, in name order.
pub fn write_list<W: Write>(map: &CommandMap, out: &mut W, styled: bool) -> std::io::Result<()> {
    for (name, entry) in map {
        if styled {
            writeln!(out, "[{}] {} = {}", entry.file.cyan(), name.green().bold(), entry.regexp)?;
        } else {
            writeln!(out, "[{}] {} = {}", entry.file, name, entry.regexp)?;
        }
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chromashift_core::CommandConfig;

    #[test]
    fn test_plain_listing() {
        let mut map = CommandMap::new();
        map.insert(
            "ping".to_string(),
            CommandConfig { regexp: "^ping ".to_string(), file: "ping.toml".to_string(), sub: None },
        );
        map.insert("df".to_string(), CommandConfig { file: "df.toml".to_string(), ..Default::default() });

        let mut out = Vec::new();
        write_list(&map, &mut out, false).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[df.toml] df = \n[ping.toml] ping = ^ping \n"
        );
    }
}
