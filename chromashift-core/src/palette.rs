// chromashift-core/src/palette.rs
//! Named style vocabulary used in rule files.
//!
//! A rule's `colors` field holds one entry per capture group, separated by
//! commas. Each entry is a whitespace-separated list of tokens such as
//! `bold red`, `bg#202020 brightyellow` or a raw list like `1;38;5;208`. The
//! tokens of an entry are translated once, when the rule is compiled, into a
//! [`StyleSpec`]. Only the `path` token needs the matched text and is resolved
//! per match.
//!
//! License: MIT OR APACHE 2.0

use log::warn;
use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::path_style::PathStyler;

/// Token that defers the style of a match to the path styler.
pub const PATH_TOKEN: &str = "path";

// Attribute names and their SGR codes. Only attributes the style model
// tracks are listed; anything else would be lost when codes are coalesced.
static ATTRIBUTES: Lazy<HashMap<&'static str, u8>> = Lazy::new(|| {
    [
        ("reset", 0),
        ("bold", 1),
        ("italic", 3),
        ("underline", 4),
        ("inverse", 7),
        ("reverse", 7),
        ("nobold", 22),
        ("noitalic", 23),
        ("nounderline", 24),
        ("noinverse", 27),
        ("noreverse", 27),
    ]
    .into_iter()
    .collect()
});

const COLOR_NAMES: [&str; 8] = ["black", "red", "green", "yellow", "blue", "magenta", "cyan", "white"];

/// One translated token of a color entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleToken {
    /// A ready SGR code list.
    Code(String),
    /// Resolved against the matched text by a [`PathStyler`].
    Path,
}

/// The translated form of one comma-separated color entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSpec {
    tokens: Vec<StyleToken>,
}

impl StyleSpec {
    /// Translates a single color entry. Unknown tokens are logged and dropped.
    pub fn parse(entry: &str) -> Self {
        let tokens = entry
            .split_whitespace()
            .filter_map(|raw| {
                let token = raw.to_ascii_lowercase();
                if token == PATH_TOKEN {
                    return Some(StyleToken::Path);
                }
                match code_for(&token) {
                    Some(code) => Some(StyleToken::Code(code)),
                    None => {
                        warn!("Ignoring unknown style token '{}'", raw);
                        None
                    }
                }
            })
            .collect();
        Self { tokens }
    }

    /// Splits a full `colors` field on commas and translates every entry.
    /// Empty entries are kept so that group indices stay aligned.
    pub fn parse_list(colors: &str) -> Vec<StyleSpec> {
        colors.split(',').map(StyleSpec::parse).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn needs_path(&self) -> bool {
        self.tokens.contains(&StyleToken::Path)
    }

    /// Produces the raw SGR list for a match, or `None` when nothing applies.
    pub fn resolve(&self, matched: &str, styler: &dyn PathStyler) -> Option<String> {
        let parts: Vec<String> = self
            .tokens
            .iter()
            .filter_map(|token| match token {
                StyleToken::Code(code) => Some(code.clone()),
                StyleToken::Path => styler.path_style(matched),
            })
            .filter(|code| !code.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(";"))
        }
    }
}

/// Translates one lowercase token into an SGR code list.
pub fn code_for(token: &str) -> Option<String> {
    if let Some(hex) = token.strip_prefix("bg#") {
        return hex_rgb(hex).map(|(r, g, b)| format!("48;2;{};{};{}", r, g, b));
    }
    if let Some(hex) = token.strip_prefix('#') {
        return hex_rgb(hex).map(|(r, g, b)| format!("38;2;{};{};{}", r, g, b));
    }
    if is_raw_list(token) {
        return Some(token.to_string());
    }
    if let Some(attr) = attribute_code(token) {
        return Some(attr.to_string());
    }
    if let Some(name) = token.strip_prefix("bg") {
        return color_code(name, 40, 100, 49).map(|c| c.to_string());
    }
    color_code(token, 30, 90, 39).map(|c| c.to_string())
}

fn attribute_code(token: &str) -> Option<u8> {
    ATTRIBUTES.get(token).copied()
}

fn color_code(name: &str, base: u8, bright_base: u8, default: u8) -> Option<u8> {
    if name == "default" {
        return Some(default);
    }
    let (name, base) = match name.strip_prefix("bright") {
        Some(rest) => (rest, bright_base),
        None => (name, base),
    };
    COLOR_NAMES
        .iter()
        .position(|&c| c == name)
        .and_then(|i| u8::try_from(i).ok())
        .map(|i| base + i)
}

fn is_raw_list(token: &str) -> bool {
    !token.is_empty()
        && token.chars().all(|c| c.is_ascii_digit() || c == ';')
        && token.chars().any(|c| c.is_ascii_digit())
}

fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedStyler(Option<&'static str>);

    impl PathStyler for FixedStyler {
        fn path_style(&self, _path: &str) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    #[test]
    fn test_named_tokens() {
        assert_eq!(code_for("bold").as_deref(), Some("1"));
        assert_eq!(code_for("red").as_deref(), Some("31"));
        assert_eq!(code_for("brightcyan").as_deref(), Some("96"));
        assert_eq!(code_for("bgblue").as_deref(), Some("44"));
        assert_eq!(code_for("bgbrightwhite").as_deref(), Some("107"));
        assert_eq!(code_for("default").as_deref(), Some("39"));
        assert_eq!(code_for("bgdefault").as_deref(), Some("49"));
        assert_eq!(code_for("nounderline").as_deref(), Some("24"));
        assert_eq!(code_for("orange"), None);
    }

    #[test]
    fn test_hex_and_raw_tokens() {
        assert_eq!(code_for("#ff6400").as_deref(), Some("38;2;255;100;0"));
        assert_eq!(code_for("bg#000000").as_deref(), Some("48;2;0;0;0"));
        assert_eq!(code_for("#fff"), None);
        assert_eq!(code_for("1;38;5;208").as_deref(), Some("1;38;5;208"));
        assert_eq!(code_for(";"), None);
    }

    #[test]
    fn test_entry_joins_tokens_and_skips_unknown() {
        let spec = StyleSpec::parse("Bold  nonsense RED");
        assert_eq!(spec.resolve("x", &FixedStyler(None)).as_deref(), Some("1;31"));
    }

    #[test]
    fn test_list_keeps_empty_entries() {
        let specs = StyleSpec::parse_list("bold,,red");
        assert_eq!(specs.len(), 3);
        assert!(specs[1].is_empty());
        assert_eq!(specs[1].resolve("x", &FixedStyler(None)), None);
    }

    #[test]
    fn test_path_token_uses_styler() {
        let spec = StyleSpec::parse("underline path");
        assert!(spec.needs_path());
        assert_eq!(
            spec.resolve("/tmp", &FixedStyler(Some("1;34"))).as_deref(),
            Some("4;1;34")
        );
        assert_eq!(spec.resolve("/tmp", &FixedStyler(None)).as_deref(), Some("4"));
        assert_eq!(StyleSpec::parse("path").resolve("/nope", &FixedStyler(None)), None);
    }
}
