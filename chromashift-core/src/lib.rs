// chromashift-core/src/lib.rs
//! # ChromaShift Core Library
//!
//! `chromashift-core` holds the platform-independent logic for colorizing the
//! output of other programs: an SGR style model, a compositor that turns
//! possibly overlapping styled spans into minimal escape sequences, a rule
//! matcher, a segmenter for live output streams, and the TOML rule and
//! command-map model with its loaders.
//!
//! Nothing here touches a terminal or spawns a process. The `chromashift`
//! binary does that on top of this crate.
//!
//! ## Modules
//!
//! * `style`: `Style`, `Color` and `Toggle`, parsing and serialization of SGR codes.
//! * `stack`: the active-style stack and per-render style arena.
//! * `compositor`: `SpanSource`, `StyleSpan` and `render`.
//! * `palette`: the named color vocabulary of rule files.
//! * `config`: rules files, the command map, search paths and resolution.
//! * `rules`: compilation and caching of coloring rules.
//! * `matcher`: span production with the overwrite state machine.
//! * `segmenter`: splitting byte streams into line and redraw units.
//! * `path_style`: `LS_COLORS`-driven styling of paths.
//! * `engine` / `engines`: the `ColorizationEngine` trait and `RegexEngine`.
//! * `stream`: `ColorizingWriter`, the `io::Write` adapter used for child output.
//! * `headless`: one-shot colorization of complete strings.
//!
//! ## Usage Example
//!
//! ```rust
//! use chromashift_core::{headless_colorize_string, RuleSet};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let rules = RuleSet::from_toml(r#"
//!         [[rules]]
//!         regexp = 'error'
//!         colors = 'bold red'
//!     "#)?;
//!
//!     let out = headless_colorize_string(rules, "an error occurred\n");
//!     assert_eq!(out, "an \x1b[1;31merror\x1b[0m occurred\n");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Loaders return `anyhow::Result` with context; typed failures are
//! [`ChromaError`] variants. Colorization itself is fail-open: a unit that
//! cannot be rendered is passed through unchanged.
//!
//! ---
//! License: MIT OR APACHE 2.0

pub mod compositor;
pub mod config;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod headless;
pub mod matcher;
pub mod palette;
pub mod path_style;
pub mod rules;
pub mod segmenter;
pub mod stack;
pub mod stream;
pub mod style;

/// Re-exports the style model.
pub use style::{Color, Layer, Style, Toggle};

/// Re-exports the compositor entry points.
pub use compositor::{colorize, render, render_sources, SpanSource, StyleSpan};

/// Re-exports rule and command-map configuration.
pub use config::{
    load_command_map,
    load_rules,
    resolve_rule_file,
    sort_rules,
    CodingRule,
    CommandConfig,
    CommandMap,
    RuleSet,
    SearchPaths,
    SubCommand,
};

/// Re-exports the custom error type for clear error reporting.
pub use errors::ChromaError;

pub use engine::ColorizationEngine;
pub use engines::regex_engine::RegexEngine;
pub use headless::{headless_colorize_string, headless_colorize_with};
pub use matcher::{find_spans, MatchOutcome, MatchState};
pub use path_style::{LsColorsStyler, NoPathStyle, PathStyler};
pub use rules::{compile_rules, get_or_compile_rules, CompiledRule, CompiledRules};
pub use segmenter::{DisplayUnit, LineSegmenter, UnitKind};
pub use stream::{copy_colorized, ColorizingWriter};
