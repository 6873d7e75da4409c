// chromashift-core/src/style.rs
//! The SGR style model: tri-state attributes, colors and their serialization.
//!
//! A [`Style`] is parsed once from a raw, semicolon-separated list of SGR codes
//! (for example `"1;38;2;255;100;0"`) and never mutated afterwards. The only
//! derivation is [`Style::reset_of`], which builds the style that cancels
//! another one when it leaves the active stack.
//!
//! License: MIT OR APACHE 2.0

use std::fmt;

/// A tri-state attribute flag.
///
/// `Disabled` and `Unset` are observably different: a disabled attribute
/// serializes as its "off" code and resets to "on", an unset attribute
/// serializes to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Toggle {
    #[default]
    Unset,
    Enabled,
    Disabled,
}

impl Toggle {
    /// Returns the opposite state. `Unset` stays `Unset`.
    pub fn inverted(self) -> Self {
        match self {
            Toggle::Enabled => Toggle::Disabled,
            Toggle::Disabled => Toggle::Enabled,
            Toggle::Unset => Toggle::Unset,
        }
    }

    pub fn is_set(self) -> bool {
        self != Toggle::Unset
    }

    /// Picks `on` when enabled, `off` when disabled.
    fn code(self, on: &'static str, off: &'static str) -> Option<&'static str> {
        match self {
            Toggle::Enabled => Some(on),
            Toggle::Disabled => Some(off),
            Toggle::Unset => None,
        }
    }
}

/// Which color channel a [`Color`] is serialized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Foreground,
    Background,
}

/// A terminal color in one of the closed set of representations SGR knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// The channel's default color (`39` / `49`).
    Reset,
    /// One of the 16 standard colors; 0-7 normal, 8-15 bright.
    Indexed(u8),
    /// An entry of the 256-color palette.
    Ansi256(u8),
    /// A 24-bit truecolor value.
    Rgb(u8, u8, u8),
}

impl Color {
    /// Serializes the color for the given channel without the escape wrapper.
    pub fn sequence(&self, layer: Layer) -> String {
        let bg = layer == Layer::Background;
        match *self {
            Color::Reset => if bg { "49" } else { "39" }.to_string(),
            Color::Indexed(n) if n < 8 => (u16::from(n) + if bg { 40 } else { 30 }).to_string(),
            Color::Indexed(n) => (u16::from(n.min(15)) - 8 + if bg { 100 } else { 90 }).to_string(),
            Color::Ansi256(n) => format!("{};5;{}", if bg { 48 } else { 38 }, n),
            Color::Rgb(r, g, b) => format!("{};2;{};{};{}", if bg { 48 } else { 38 }, r, g, b),
        }
    }
}

/// A complete text style.
///
/// When `hard_reset` is set every other field is ignored on serialization:
/// the style always renders as the single code `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub hard_reset: bool,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: Toggle,
    pub italic: Toggle,
    pub underline: Toggle,
    pub inverse: Toggle,
}

impl Style {
    /// The style that clears everything.
    pub const RESET: Style = Style {
        hard_reset: true,
        fg: None,
        bg: None,
        bold: Toggle::Unset,
        italic: Toggle::Unset,
        underline: Toggle::Unset,
        inverse: Toggle::Unset,
    };

    /// Parses a raw SGR code list such as `"1;31"` into a style.
    ///
    /// An empty string means "reset", matching how terminals treat `ESC[m`.
    /// Tokens that are not numbers are ignored.
    pub fn parse(raw: &str) -> Self {
        Self::from_codes(&parse_codes(raw))
    }

    /// Builds a style by applying SGR codes in order; later codes win.
    ///
    /// Supports:
    ///   - attributes 1/3/4/7 and their disables 22/23/24/27
    ///   - standard colors 30-37/40-47 and bright colors 90-97/100-107
    ///   - 256 colors `38;5;N` / `48;5;N`
    ///   - truecolor `38;2;R;G;B` / `48;2;R;G;B`
    ///   - channel resets 39/49 and the full reset 0
    ///
    /// The hard-reset flag is only raised by a literal `0` code, never by a
    /// zero consumed as a color parameter.
    pub fn from_codes(codes: &[u32]) -> Self {
        let mut st = Style::default();
        let mut i = 0;
        while i < codes.len() {
            let c = codes[i];
            match c {
                0 => st.hard_reset = true,
                1 => st.bold = Toggle::Enabled,
                3 => st.italic = Toggle::Enabled,
                4 => st.underline = Toggle::Enabled,
                7 => st.inverse = Toggle::Enabled,
                22 => st.bold = Toggle::Disabled,
                23 => st.italic = Toggle::Disabled,
                24 => st.underline = Toggle::Disabled,
                27 => st.inverse = Toggle::Disabled,
                39 => st.fg = Some(Color::Reset),
                49 => st.bg = Some(Color::Reset),
                30..=37 => st.fg = Some(Color::Indexed((c - 30) as u8)),
                40..=47 => st.bg = Some(Color::Indexed((c - 40) as u8)),
                90..=97 => st.fg = Some(Color::Indexed((c - 82) as u8)),
                100..=107 => st.bg = Some(Color::Indexed((c - 92) as u8)),
                38 | 48 => {
                    let (color, consumed) = extended_color(&codes[i + 1..]);
                    if let Some(color) = color {
                        if c == 38 {
                            st.fg = Some(color);
                        } else {
                            st.bg = Some(color);
                        }
                    }
                    i += consumed;
                }
                _ => {}
            }
            i += 1;
        }
        st
    }

    /// Returns the SGR code list for this style, without `ESC[` and `m`.
    ///
    /// Attributes come first (bold, italic, underline, inverse), then the
    /// foreground and the background. A style with nothing set yields an
    /// empty string.
    pub fn sequence(&self) -> String {
        if self.hard_reset {
            return "0".to_string();
        }

        let mut parts: Vec<String> = [
            self.bold.code("1", "22"),
            self.italic.code("3", "23"),
            self.underline.code("4", "24"),
            self.inverse.code("7", "27"),
        ]
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();

        if let Some(fg) = self.fg {
            parts.push(fg.sequence(Layer::Foreground));
        }
        if let Some(bg) = self.bg {
            parts.push(bg.sequence(Layer::Background));
        }

        parts.join(";")
    }

    /// Builds the style that undoes this one.
    ///
    /// Toggles invert, set colors become the channel reset, unset fields stay
    /// unset. The reset of a hard reset is the empty style: everything was
    /// already cleared.
    pub fn reset_of(&self) -> Style {
        if self.hard_reset {
            return Style::default();
        }
        Style {
            hard_reset: false,
            fg: self.fg.map(|_| Color::Reset),
            bg: self.bg.map(|_| Color::Reset),
            bold: self.bold.inverted(),
            italic: self.italic.inverted(),
            underline: self.underline.inverted(),
            inverse: self.inverse.inverted(),
        }
    }

    /// True when serializing would produce nothing.
    pub fn is_empty(&self) -> bool {
        !self.hard_reset
            && self.fg.is_none()
            && self.bg.is_none()
            && !self.bold.is_set()
            && !self.italic.is_set()
            && !self.underline.is_set()
            && !self.inverse.is_set()
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sequence())
    }
}

/// Splits a raw SGR list into numeric codes. Empty input is `[0]`.
pub fn parse_codes(raw: &str) -> Vec<u32> {
    if raw.is_empty() {
        return vec![0];
    }
    raw.split(';')
        .filter_map(|part| part.trim().parse::<u32>().ok())
        .collect()
}

/// Decodes the parameters following a `38`/`48` introducer.
///
/// Returns the color (if well formed) and how many parameters were consumed.
fn extended_color(params: &[u32]) -> (Option<Color>, usize) {
    match params {
        [5, n, ..] => (u8::try_from(*n).ok().map(Color::Ansi256), 2),
        [2, r, g, b, ..] => {
            let rgb = (u8::try_from(*r), u8::try_from(*g), u8::try_from(*b));
            match rgb {
                (Ok(r), Ok(g), Ok(b)) => (Some(Color::Rgb(r, g, b)), 4),
                _ => (None, 4),
            }
        }
        _ => (None, 0),
    }
}
