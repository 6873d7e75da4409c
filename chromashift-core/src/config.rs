//! Configuration management for `chromashift-core`.
//!
//! Two kinds of TOML documents drive colorization:
//!
//! * the command map (`config.toml`), which tells which rules file applies to
//!   a command line, optionally per subcommand;
//! * rules files (`<name>.toml`), which hold the coloring rules for one tool
//!   plus a couple of stream options.
//!
//! Both ship with embedded defaults and can be overridden from the user's
//! configuration directory, an environment variable, or explicit paths.
//!
//! License: MIT OR APACHE 2.0

use anyhow::{bail, Context, Result};
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ChromaError;

/// Environment variable naming an extra command map file.
pub const CONFIG_ENV: &str = "CHROMASHIFT_CONFIG";

/// Environment variable naming an extra rules directory.
pub const RULES_ENV: &str = "CHROMASHIFT_RULES";

/// Per-user configuration directory, relative to the home directory.
pub const USER_CONFIG_DIR: &str = ".config/ChromaShift";

const DEFAULT_CONFIG: &str = include_str!("../config/default_config.toml");

const EMBEDDED_RULES: &[(&str, &str)] = &[
    ("df.toml", include_str!("../config/rules/df.toml")),
    ("diff.toml", include_str!("../config/rules/diff.toml")),
    ("ls.toml", include_str!("../config/rules/ls.toml")),
    ("ping.toml", include_str!("../config/rules/ping.toml")),
];

/// A single coloring rule as written in a rules file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct CodingRule {
    /// Pattern applied to every unit of output.
    pub regexp: String,
    /// Comma-separated color entries, one per capture group (group 0 first).
    pub colors: String,
    /// When this rule matches, spans from every other rule are discarded.
    pub overwrite: bool,
    /// Lower priorities are evaluated first.
    pub priority: i64,
    /// Free-form tag, carried for rule authors.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// The content of one rules file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct RuleSet {
    pub rules: Vec<CodingRule>,
    /// Colorize the child's stderr instead of its stdout.
    pub stderr: bool,
    /// The tool wants a pseudo-terminal.
    pub pty: bool,
}

impl RuleSet {
    /// Decodes a rules document and puts its rules in evaluation order.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut set: RuleSet = toml::from_str(content).context("Failed to parse rules")?;
        sort_rules(&mut set.rules);
        Ok(set)
    }

    /// Loads and sorts a rules file from disk.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse rules file {}", path.display()))
    }
}

/// Puts rules in evaluation order: ascending priority, overwrite rules after
/// every normal rule. Equal keys keep their file order.
pub fn sort_rules(rules: &mut [CodingRule]) {
    rules.sort_by(|a, b| {
        a.overwrite
            .cmp(&b.overwrite)
            .then(a.priority.cmp(&b.priority))
    });
}

/// A subcommand entry of the command map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SubCommand {
    pub regexp: String,
    pub file: String,
}

/// A command entry of the command map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CommandConfig {
    /// Matched against the whole command line when the name does not match.
    pub regexp: String,
    /// Rules file name, looked up in the rules directories.
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<BTreeMap<String, SubCommand>>,
}

/// Command name to entry, iterated in name order.
pub type CommandMap = BTreeMap<String, CommandConfig>;

/// Where configuration is looked for.
///
/// Built once from the command line and environment, then passed to the
/// loaders so that tests can point them at temporary directories.
#[derive(Debug, Clone, Default)]
pub struct SearchPaths {
    /// `--config FILE`
    pub config_file: Option<PathBuf>,
    /// `--rules-dir DIR`
    pub rules_dir: Option<PathBuf>,
    /// `$CHROMASHIFT_CONFIG`
    pub env_config: Option<PathBuf>,
    /// `$CHROMASHIFT_RULES`
    pub env_rules: Option<PathBuf>,
    /// The user's home directory.
    pub home: Option<PathBuf>,
}

impl SearchPaths {
    /// Fills the environment-derived fields from the process environment.
    pub fn from_env(config_file: Option<PathBuf>, rules_dir: Option<PathBuf>) -> Self {
        let env_path = |name: &str| {
            std::env::var_os(name)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self {
            config_file,
            rules_dir,
            env_config: env_path(CONFIG_ENV),
            env_rules: env_path(RULES_ENV),
            home: dirs::home_dir(),
        }
    }

    fn user_dir(&self) -> Option<PathBuf> {
        self.home.as_ref().map(|h| h.join(USER_CONFIG_DIR))
    }

    /// Command map files, in override order.
    pub fn config_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = Vec::new();
        files.extend(self.config_file.clone());
        files.extend(self.env_config.clone());
        files.extend(self.user_dir().map(|d| d.join("config.toml")));
        files
    }

    /// Rules directories, in lookup order.
    pub fn rules_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        dirs.extend(self.rules_dir.clone());
        dirs.extend(self.env_rules.clone());
        dirs.extend(self.user_dir().map(|d| d.join("rules")));
        dirs
    }
}

/// Parses the embedded command map.
pub fn default_command_map() -> Result<CommandMap> {
    toml::from_str(DEFAULT_CONFIG).context("Failed to parse embedded command map")
}

/// Builds the command map from the embedded defaults and every readable
/// override file. Later files replace earlier entries with the same name.
pub fn load_command_map(paths: &SearchPaths) -> Result<CommandMap> {
    debug!("Loading embedded command map");
    let mut map = match default_command_map() {
        Ok(map) => map,
        Err(e) => {
            debug!("{:#}", e);
            CommandMap::new()
        }
    };

    for file in paths.config_files() {
        match load_command_map_file(&file) {
            Ok(extra) => {
                debug!("Merging {} command(s) from {}", extra.len(), file.display());
                map.extend(extra);
            }
            Err(e) => debug!("Skipping command map: {:#}", e),
        }
    }

    if map.is_empty() {
        bail!("No command configuration found");
    }
    Ok(map)
}

fn load_command_map_file(path: &Path) -> Result<CommandMap> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config file {}", path.display()))
}

/// Returns the embedded rules document with the given file name.
pub fn embedded_rules(file: &str) -> Option<&'static str> {
    EMBEDDED_RULES
        .iter()
        .find(|(name, _)| *name == file)
        .map(|(_, content)| *content)
}

/// Names of the embedded rules files.
pub fn embedded_rule_files() -> impl Iterator<Item = &'static str> {
    EMBEDDED_RULES.iter().map(|(name, _)| *name)
}

/// Loads the rules file `file`, trying each rules directory and then the
/// embedded library. The first document that decodes wins.
pub fn load_rules(file: &str, paths: &SearchPaths) -> Result<RuleSet> {
    for dir in paths.rules_dirs() {
        let candidate = dir.join(file);
        if !candidate.is_file() {
            debug!("No rules file at {}", candidate.display());
            continue;
        }
        match RuleSet::load_from_file(&candidate) {
            Ok(set) => {
                info!("Loaded {} rule(s) from {}", set.rules.len(), candidate.display());
                return Ok(set);
            }
            Err(e) => debug!("{:#}", e),
        }
    }

    debug!("Looking up embedded rules '{}'", file);
    match embedded_rules(file) {
        Some(content) => RuleSet::from_toml(content)
            .with_context(|| format!("Failed to parse embedded rules '{}'", file)),
        None => Err(ChromaError::RulesNotFound(file.to_string()).into()),
    }
}

fn regex_matches(pattern: &str, haystack: &str) -> bool {
    if pattern.is_empty() {
        return false;
    }
    match Regex::new(pattern) {
        Ok(re) => re.is_match(haystack),
        Err(e) => {
            debug!("Ignoring invalid command pattern '{}': {}", pattern, e);
            false
        }
    }
}

fn resolve_subcommand(subs: &BTreeMap<String, SubCommand>, args: &[String]) -> Option<String> {
    if let Some(name) = args.get(1) {
        if let Some(sub) = subs.get(name).filter(|s| !s.file.is_empty()) {
            return Some(sub.file.clone());
        }
    }

    let command_line = args.join(" ");
    subs.values()
        .find(|sub| regex_matches(&sub.regexp, &command_line))
        .map(|sub| sub.file.clone())
}

fn resolve_entry(name: &str, entry: &CommandConfig, args: &[String]) -> Option<String> {
    match &entry.sub {
        None => Some(entry.file.clone()),
        Some(subs) => {
            debug!("Looking up subcommands of '{}'", name);
            let found = resolve_subcommand(subs, args);
            if found.is_none() {
                debug!("No matching subcommand for '{}'", name);
            }
            found
        }
    }
}

/// Picks the rules file for a command line.
///
/// The entry named after the command's base name is tried first. Failing
/// that, every entry is tried in name order: by exact name, then by its
/// `regexp` against the space-joined command line.
pub fn resolve_rule_file(map: &CommandMap, args: &[String]) -> Result<String, ChromaError> {
    let command = args
        .first()
        .ok_or_else(|| ChromaError::NoMatchingCommand(String::new()))?;
    let base_name = Path::new(command)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(command.as_str());

    if let Some(entry) = map.get(base_name) {
        if let Some(file) = resolve_entry(base_name, entry, args) {
            return Ok(file);
        }
    }

    let command_line = args.join(" ");
    for (name, entry) in map {
        if name == command || name == base_name {
            if let Some(file) = resolve_entry(name, entry, args) {
                return Ok(file);
            }
        }
        if regex_matches(&entry.regexp, &command_line) {
            if let Some(file) = resolve_entry(name, entry, args) {
                return Ok(file);
            }
        }
    }

    Err(ChromaError::NoMatchingCommand(command.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn rule(regexp: &str, priority: i64, overwrite: bool) -> CodingRule {
        CodingRule {
            regexp: regexp.to_string(),
            colors: "red".to_string(),
            overwrite,
            priority,
            kind: None,
        }
    }

    #[test]
    fn test_sort_rules_puts_overwrite_last_and_is_stable() {
        let mut rules = vec![
            rule("o1", 0, true),
            rule("b", 2, false),
            rule("a", 1, false),
            rule("a2", 1, false),
            rule("o0", -1, true),
        ];
        sort_rules(&mut rules);
        let order: Vec<&str> = rules.iter().map(|r| r.regexp.as_str()).collect();
        assert_eq!(order, vec!["a", "a2", "b", "o0", "o1"]);
    }

    #[test]
    fn test_rule_set_decodes_type_field_and_defaults() {
        let set = RuleSet::from_toml(
            r#"
            stderr = true

            [[rules]]
            regexp = 'x'
            colors = 'bold'
            type = 'marker'
            "#,
        )
        .unwrap();
        assert!(set.stderr);
        assert!(!set.pty);
        assert_eq!(set.rules[0].kind.as_deref(), Some("marker"));
        assert_eq!(set.rules[0].priority, 0);
    }

    #[test]
    fn test_embedded_defaults_parse() {
        let map = default_command_map().unwrap();
        assert!(!map.is_empty());
        for name in embedded_rule_files() {
            let content = embedded_rules(name).unwrap();
            assert!(RuleSet::from_toml(content).is_ok(), "embedded rules {} must parse", name);
        }
        for entry in map.values() {
            assert!(embedded_rules(&entry.file).is_some(), "missing embedded {}", entry.file);
        }
    }

    #[test]
    fn test_resolve_by_base_name_and_regexp() {
        let map: CommandMap = toml::from_str(
            r#"
            [ls]
            file = "ls.toml"

            [ping]
            regexp = '^ping6? '
            file = "ping.toml"
            "#,
        )
        .unwrap();

        assert_eq!(resolve_rule_file(&map, &args(&["/bin/ls", "-l"])).unwrap(), "ls.toml");
        assert_eq!(resolve_rule_file(&map, &args(&["ping6", "-c", "1", "::1"])).unwrap(), "ping.toml");
        assert!(matches!(
            resolve_rule_file(&map, &args(&["cat", "x"])),
            Err(ChromaError::NoMatchingCommand(_))
        ));
        assert!(resolve_rule_file(&map, &[]).is_err());
    }

    #[test]
    fn test_resolve_subcommands() {
        let map: CommandMap = toml::from_str(
            r#"
            [git]
            file = "git.toml"

            [git.sub.diff]
            file = "diff.toml"

            [git.sub.log]
            regexp = 'log --oneline'
            file = "oneline.toml"
            "#,
        )
        .unwrap();

        assert_eq!(resolve_rule_file(&map, &args(&["git", "diff"])).unwrap(), "diff.toml");
        assert_eq!(
            resolve_rule_file(&map, &args(&["git", "--no-pager", "log", "--oneline"])).unwrap(),
            "oneline.toml"
        );
        assert!(resolve_rule_file(&map, &args(&["git", "status"])).is_err());
        assert!(resolve_rule_file(&map, &args(&["git"])).is_err());
    }
}
