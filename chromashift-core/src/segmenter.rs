// chromashift-core/src/segmenter.rs
//! Splits a live byte stream into displayable units.
//!
//! A newline ends a line unit; the line is trimmed of trailing whitespace
//! before it is styled. A carriage return ends a redraw unit, which keeps its
//! whitespace because the next write will paint over it. Bytes of a character
//! split across reads are held back until the rest arrives.
//!
//! License: MIT OR APACHE 2.0

/// What ended a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// Terminated by `\n`.
    Line,
    /// Terminated by `\r`.
    Redraw,
}

/// A unit of text ready to be styled, plus how it was terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayUnit {
    pub text: String,
    pub kind: UnitKind,
}

impl DisplayUnit {
    /// The character written after the styled text. It is never styled.
    pub fn terminator(&self) -> char {
        match self.kind {
            UnitKind::Line => '\n',
            UnitKind::Redraw => '\r',
        }
    }
}

/// Incremental segmenter. One instance per stream.
#[derive(Debug, Default)]
pub struct LineSegmenter {
    /// Trailing bytes of an incomplete character.
    partial: Vec<u8>,
    /// Decoded text of the unit in progress.
    buffer: String,
}

impl LineSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `bytes` and returns every unit completed by them.
    ///
    /// Invalid sequences decode as U+FFFD. An incomplete sequence at the end
    /// of `bytes` is kept for the next call.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<DisplayUnit> {
        let mut units = Vec::new();
        let mut data = std::mem::take(&mut self.partial);
        data.extend_from_slice(bytes);

        let mut rest = data.as_slice();
        while !rest.is_empty() {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    self.push_str(valid, &mut units);
                    rest = &[];
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    if let Ok(valid) = std::str::from_utf8(valid) {
                        self.push_str(valid, &mut units);
                    }
                    match e.error_len() {
                        Some(len) => {
                            self.push_char(char::REPLACEMENT_CHARACTER, &mut units);
                            rest = &after[len..];
                        }
                        None => {
                            self.partial = after.to_vec();
                            rest = &[];
                        }
                    }
                }
            }
        }

        units
    }

    fn push_str(&mut self, text: &str, units: &mut Vec<DisplayUnit>) {
        for c in text.chars() {
            self.push_char(c, units);
        }
    }

    /// Appends one decoded character, completing a unit on `\n` or `\r`.
    pub fn push_char(&mut self, c: char, units: &mut Vec<DisplayUnit>) {
        match c {
            '\n' => {
                let text = self.buffer.trim_end().to_string();
                self.buffer.clear();
                units.push(DisplayUnit { text, kind: UnitKind::Line });
            }
            '\r' => {
                units.push(DisplayUnit {
                    text: std::mem::take(&mut self.buffer),
                    kind: UnitKind::Redraw,
                });
            }
            _ => self.buffer.push(c),
        }
    }

    /// Text of the unit in progress.
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    /// Ends the stream and hands back whatever was never terminated,
    /// including a dangling incomplete character as U+FFFD.
    pub fn finish(&mut self) -> Option<String> {
        let mut rest = std::mem::take(&mut self.buffer);
        if !self.partial.is_empty() {
            rest.push_str(&String::from_utf8_lossy(&self.partial));
            self.partial.clear();
        }
        if rest.is_empty() {
            None
        } else {
            Some(rest)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> DisplayUnit {
        DisplayUnit { text: text.to_string(), kind: UnitKind::Line }
    }

    fn redraw(text: &str) -> DisplayUnit {
        DisplayUnit { text: text.to_string(), kind: UnitKind::Redraw }
    }

    #[test]
    fn test_lines_are_trimmed() {
        let mut seg = LineSegmenter::new();
        assert_eq!(seg.feed(b"one  \ntwo\t\n"), vec![line("one"), line("two")]);
        assert_eq!(seg.finish(), None);
    }

    #[test]
    fn test_redraw_then_line() {
        let mut seg = LineSegmenter::new();
        assert_eq!(seg.feed(b"progress \r"), vec![redraw("progress ")]);
        assert_eq!(seg.feed(b"done\n"), vec![line("done")]);
        assert_eq!(redraw("x").terminator(), '\r');
        assert_eq!(line("x").terminator(), '\n');
    }

    #[test]
    fn test_units_span_reads() {
        let mut seg = LineSegmenter::new();
        assert!(seg.feed(b"hel").is_empty());
        assert_eq!(seg.buffered(), "hel");
        assert_eq!(seg.feed(b"lo\nwor"), vec![line("hello")]);
        assert_eq!(seg.finish().as_deref(), Some("wor"));
    }

    #[test]
    fn test_split_multibyte_character() {
        let bytes = "héllo\n".as_bytes();
        let mut whole = LineSegmenter::new();
        let expected = whole.feed(bytes);

        for split in 0..bytes.len() {
            let mut seg = LineSegmenter::new();
            let mut units = seg.feed(&bytes[..split]);
            units.extend(seg.feed(&bytes[split..]));
            assert_eq!(units, expected, "split at {}", split);
        }
        assert_eq!(expected, vec![line("héllo")]);
    }

    #[test]
    fn test_four_byte_character_fed_bytewise() {
        let mut seg = LineSegmenter::new();
        let mut units = Vec::new();
        for b in "🦀\n".as_bytes() {
            units.extend(seg.feed(&[*b]));
        }
        assert_eq!(units, vec![line("🦀")]);
    }

    #[test]
    fn test_invalid_bytes_become_replacement() {
        let mut seg = LineSegmenter::new();
        assert_eq!(seg.feed(b"a\xffb\n"), vec![line("a\u{fffd}b")]);
    }

    #[test]
    fn test_crlf_yields_redraw_and_empty_line() {
        let mut seg = LineSegmenter::new();
        assert_eq!(seg.feed(b"text\r\n"), vec![redraw("text"), line("")]);
    }
}
