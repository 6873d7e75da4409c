// chromashift/src/commands/alias.rs
//! `chromashift alias <shell>`: wrapper functions so that configured
//! commands are colorized without typing `chromashift --` each time.
//!
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use std::io::Write;

use chromashift_core::{SearchPaths, config};

use crate::cli::Shell;

/// Commands nushell ships as built-ins; wrapping them would shadow those.
const NU_BUILTINS: [&str; 6] = ["ps", "last", "find", "cp", "mv", "rm"];

const ZSH_HEADER: &str = r#"#!/bin/zsh
if ! tty -s || [ ! -n "$TERM" ] || [ "$TERM" = dumb ] || (( ! $+commands[chromashift] )); then
    return
fi

alias csudo="sudo $commands[chromashift] --"
"#;

const BASH_HEADER: &str = r#"#!/bin/bash

if ! tty -s || [ -z "$TERM" ] || [ "$TERM" = "dumb" ] || ! command -v chromashift >/dev/null; then
    return 1
fi

alias csudo="sudo $(command -v chromashift) --"
"#;

const NU_HEADER: &str = r#"#!/bin/nu

if ($env.TERM == "dumb") and (which chromashift | is-not-empty) {
    exit 1
}
"#;

pub fn run_alias<W: Write>(shell: Shell, paths: &SearchPaths, out: &mut W) -> Result<()> {
    let map = config::load_command_map(paths)?;
    if shell == Shell::Nu {
        eprintln!("The nushell alias script is experimental!");
    }
    let names: Vec<&str> = map.keys().map(String::as_str).collect();
    out.write_all(alias_script(shell, &names).as_bytes())
        .and_then(|_| out.flush())
        .context("Failed to write alias script")
}

/// Builds the script for `shell` wrapping every name in `names`.
pub fn alias_script(shell: Shell, names: &[&str]) -> String {
    let mut script = String::new();
    match shell {
        Shell::Zsh => {
            script.push_str(ZSH_HEADER);
            script.push('\n');
            for name in names {
                script.push_str(&format!(
                    "\nif (( $+commands[{name}] )) ; then\n    function {name} {{\n        chromashift -- {name} \"$@\"\n    }}\nfi\n"
                ));
            }
        }
        Shell::Bash => {
            script.push_str(BASH_HEADER);
            script.push('\n');
            for name in names {
                script.push_str(&format!(
                    "if command -v \"{name}\" >/dev/null ; then\n    function {name} {{\n        chromashift -- \"{name}\" \"$@\"\n    }}\nfi\n\n"
                ));
            }
        }
        Shell::Fish => {
            script.push_str(&format!(
                "#!/bin/fish\n\nset chromashift_cmd_list {}\n\n\
                 for executable in $chromashift_cmd_list\n\
                 \x20   if type -q $executable\n\
                 \x20       function $executable --inherit-variable executable --wraps=$executable\n\
                 \x20           if isatty 1\n\
                 \x20               chromashift -- $executable $argv\n\
                 \x20           else\n\
                 \x20               eval command $executable $argv\n\
                 \x20           end\n\
                 \x20       end\n\
                 \x20   end\n\
                 end\n",
                names.join(" ")
            ));
        }
        Shell::Nu => {
            script.push_str(NU_HEADER);
            script.push('\n');
            for name in names.iter().filter(|n| !NU_BUILTINS.contains(*n)) {
                script.push_str(&format!("def --wrapped {name} [...p] {{ chromashift -- {name} ...$p }}\n"));
            }
        }
    }
    script
}
