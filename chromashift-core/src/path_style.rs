// chromashift-core/src/path_style.rs
//! Styles for file system paths found in command output.
//!
//! The `path` color token asks a [`PathStyler`] for the style of the matched
//! text. [`LsColorsStyler`] answers the way `ls` would, from the `LS_COLORS`
//! table and the file's metadata.
//!
//! License: MIT OR APACHE 2.0

use glob::Pattern;
use log::debug;
use std::collections::HashMap;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};

/// Table used when `LS_COLORS` is unset or empty.
pub const DEFAULT_LS_COLORS: &str = "di=1;34:ln=36:ex=1;32:ow=34;42:\
*.tar=31:*.tgz=31:*.gz=31:*.zip=31:*.xz=31:*.zst=31:\
*.jpg=35:*.jpeg=35:*.png=35:*.gif=35:*.svg=35:\
*.mp3=36:*.flac=36:*.mp4=35:\
*.md=33:*.toml=33:*.yaml=33:*.yml=33:*.json=33";

/// Resolves a style for a path.
pub trait PathStyler: Send + Sync {
    /// Raw SGR list for `path`, or `None` when no style applies.
    fn path_style(&self, path: &str) -> Option<String>;
}

/// A styler that never styles anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPathStyle;

impl PathStyler for NoPathStyle {
    fn path_style(&self, _path: &str) -> Option<String> {
        None
    }
}

/// `LS_COLORS`-driven path styling.
#[derive(Debug, Default)]
pub struct LsColorsStyler {
    types: HashMap<String, String>,
    globs: Vec<(Pattern, String)>,
}

impl LsColorsStyler {
    /// Reads `LS_COLORS`, falling back to [`DEFAULT_LS_COLORS`].
    pub fn from_env() -> Self {
        match std::env::var("LS_COLORS") {
            Ok(table) if !table.trim().is_empty() => Self::parse(&table),
            _ => Self::parse(DEFAULT_LS_COLORS),
        }
    }

    /// Parses a `key=codes:key=codes` table. Keys starting with `*` are
    /// file-name globs; other keys name file types.
    pub fn parse(table: &str) -> Self {
        let mut styler = Self::default();
        for entry in table.split(':').filter(|e| !e.is_empty()) {
            let Some((key, codes)) = entry.split_once('=') else {
                debug!("Ignoring LS_COLORS entry without '=': {}", entry);
                continue;
            };
            if key.starts_with('*') {
                match Pattern::new(key) {
                    Ok(pattern) => styler.globs.push((pattern, codes.to_string())),
                    Err(e) => debug!("Ignoring LS_COLORS glob '{}': {}", key, e),
                }
            } else {
                styler.types.insert(key.to_string(), codes.to_string());
            }
        }
        styler
    }

    fn type_style(&self, key: &str, fallback: Option<&str>) -> Option<String> {
        self.types
            .get(key)
            .map(String::as_str)
            .or(fallback)
            .filter(|codes| !codes.is_empty())
            .map(str::to_string)
    }

    fn glob_style(&self, path: &str) -> Option<String> {
        let trimmed = path.trim_end_matches('/');
        let name = Path::new(trimmed)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(trimmed);
        self.globs
            .iter()
            .find(|(pattern, _)| pattern.matches(name))
            .map(|(_, codes)| codes.clone())
    }

    fn metadata_style(&self, meta: &Metadata) -> Option<String> {
        if meta.file_type().is_symlink() {
            return self.type_style("ln", Some("36"));
        }
        if meta.is_dir() {
            if is_world_writable(meta) {
                return self.type_style("ow", Some("34;42"));
            }
            return self.type_style("di", Some("1;34"));
        }
        if is_executable(meta) {
            return self.type_style("ex", Some("1;32"));
        }
        None
    }
}

impl PathStyler for LsColorsStyler {
    fn path_style(&self, path: &str) -> Option<String> {
        let metadata = std::env::current_dir()
            .ok()
            .and_then(|cwd| find_path(&cwd, path))
            .and_then(|full| fs::symlink_metadata(full).ok());
        match metadata {
            Some(meta) => self
                .metadata_style(&meta)
                .or_else(|| self.glob_style(path))
                .or_else(|| self.type_style("fi", None)),
            None => self.glob_style(path),
        }
    }
}

/// Turns `input` into a path to look up, relative to `base` unless absolute.
///
/// A leading `~`, `$HOME`, `$XDG_CONFIG_HOME`, `$XDG_CACHE_HOME` or
/// `$XDG_DATA_HOME` component is replaced by the matching user directory.
/// Returns `None` for an empty input.
pub fn find_path(base: &Path, input: &str) -> Option<PathBuf> {
    if input.is_empty() {
        return None;
    }
    let candidate = Path::new(input);
    if candidate.is_absolute() {
        return Some(candidate.to_path_buf());
    }

    let Some((prefix, rest)) = input.split_once(['/', '\\']) else {
        return Some(base.join(input));
    };
    let rest = rest.trim_start_matches(['/', '\\']);
    let dir = match prefix {
        "~" | "$HOME" => dirs::home_dir(),
        "$XDG_CONFIG_HOME" => dirs::config_dir(),
        "$XDG_CACHE_HOME" => dirs::cache_dir(),
        "$XDG_DATA_HOME" => dirs::data_dir(),
        _ => None,
    };
    Some(match dir {
        Some(dir) => dir.join(rest),
        None => base.join(input),
    })
}

#[cfg(unix)]
fn is_executable(meta: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &Metadata) -> bool {
    false
}

#[cfg(unix)]
fn is_world_writable(meta: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o002 != 0
}

#[cfg(not(unix))]
fn is_world_writable(_meta: &Metadata) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn path_str(p: &Path) -> String {
        p.to_string_lossy().into_owned()
    }

    #[test]
    fn test_parse_types_and_globs() {
        let styler = LsColorsStyler::parse("di=01;34:fi=0:*.rs=38;5;208:bogus:");
        assert_eq!(styler.types.get("di").map(String::as_str), Some("01;34"));
        assert_eq!(styler.globs.len(), 1);
        assert_eq!(styler.glob_style("src/main.rs").as_deref(), Some("38;5;208"));
        assert_eq!(styler.glob_style("main.rsx"), None);
    }

    #[test]
    fn test_directory_and_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        File::create(&file).unwrap();

        let styler = LsColorsStyler::parse("di=1;34:*.md=33");
        assert_eq!(styler.path_style(&path_str(dir.path())).as_deref(), Some("1;34"));
        assert_eq!(styler.path_style(&path_str(&file)), None);

        let with_fi = LsColorsStyler::parse("fi=37");
        assert_eq!(with_fi.path_style(&path_str(&file)).as_deref(), Some("37"));
    }

    #[test]
    fn test_missing_file_still_uses_globs() {
        let styler = LsColorsStyler::parse("fi=37:*.md=33");
        assert_eq!(styler.path_style("/definitely/not/here.md").as_deref(), Some("33"));
        assert_eq!(styler.path_style("/definitely/not/here.txt"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_and_executable() {
        use std::os::unix::fs::{symlink, PermissionsExt};

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("run.sh");
        File::create(&script).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        let link = dir.path().join("link");
        symlink(&script, &link).unwrap();

        let styler = LsColorsStyler::parse("");
        assert_eq!(styler.path_style(&path_str(&script)).as_deref(), Some("1;32"));
        assert_eq!(styler.path_style(&path_str(&link)).as_deref(), Some("36"));
    }

    #[cfg(unix)]
    #[test]
    fn test_world_writable_directory() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let shared = dir.path().join("shared");
        fs::create_dir(&shared).unwrap();
        fs::set_permissions(&shared, fs::Permissions::from_mode(0o777)).unwrap();

        let styler = LsColorsStyler::parse("ow=30;42");
        assert_eq!(styler.path_style(&path_str(&shared)).as_deref(), Some("30;42"));
    }

    #[test]
    fn test_glob_literals_and_wildcards() {
        let styler = LsColorsStyler::parse("*.tar.gz=31:file?.txt=32");
        assert_eq!(styler.glob_style("a.tar.gz").as_deref(), Some("31"));
        assert_eq!(styler.glob_style("a.tarxgz"), None);
        assert_eq!(styler.glob_style("file1.txt").as_deref(), Some("32"));
    }

    #[test]
    fn test_glob_character_classes() {
        let styler = LsColorsStyler::parse("*.[ch]=33:*.[!a-z]=35");
        assert_eq!(styler.path_style("/nonexistent/main.c").as_deref(), Some("33"));
        assert_eq!(styler.path_style("/nonexistent/main.h").as_deref(), Some("33"));
        assert_eq!(styler.path_style("/nonexistent/main.7").as_deref(), Some("35"));
        assert_eq!(styler.path_style("/nonexistent/main.x"), None);
    }

    #[test]
    fn test_invalid_glob_is_skipped() {
        let styler = LsColorsStyler::parse("*.[=31:*.md=33");
        assert_eq!(styler.globs.len(), 1);
        assert_eq!(styler.glob_style("README.md").as_deref(), Some("33"));
    }

    #[test]
    fn test_find_path_absolute_and_relative() {
        let base = Path::new("/work/project");
        assert_eq!(find_path(base, ""), None);
        assert_eq!(find_path(base, "/etc/hosts"), Some(PathBuf::from("/etc/hosts")));
        assert_eq!(find_path(base, "Cargo.toml"), Some(base.join("Cargo.toml")));
        assert_eq!(find_path(base, "src/main.rs"), Some(base.join("src/main.rs")));
    }

    #[test]
    fn test_find_path_expands_user_directories() {
        let base = Path::new("/work");
        let cases = [
            ("~/notes.md", dirs::home_dir()),
            ("$HOME/notes.md", dirs::home_dir()),
            ("$XDG_CONFIG_HOME/notes.md", dirs::config_dir()),
            ("$XDG_CACHE_HOME/notes.md", dirs::cache_dir()),
            ("$XDG_DATA_HOME/notes.md", dirs::data_dir()),
        ];
        for (input, dir) in cases {
            let expected = match dir {
                Some(dir) => dir.join("notes.md"),
                None => base.join(input),
            };
            assert_eq!(find_path(base, input), Some(expected), "input: {}", input);
        }
    }

    #[test]
    fn test_find_path_leaves_other_variables_alone() {
        let base = Path::new("/work");
        assert_eq!(find_path(base, "$OTHER/x"), Some(base.join("$OTHER/x")));
        assert_eq!(find_path(base, "~user/x"), Some(base.join("~user/x")));
    }
}
