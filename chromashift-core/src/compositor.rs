// chromashift-core/src/compositor.rs
//! Composites styled spans into a single string with minimal SGR escapes.
//!
//! Spans may nest or partially overlap. Each admitted span gets a start and an
//! end event; events are walked left to right while an [`ActiveStyleStack`]
//! tracks which styles are open. When a span closes, its reset is emitted
//! together with the style that is now on top, so whatever was underneath is
//! reasserted instead of being lost. Codes destined for the same output
//! position are coalesced into one escape.
//!
//! License: MIT OR APACHE 2.0

use log::debug;

use crate::errors::ChromaError;
use crate::stack::{ActiveStyleStack, SpanId, StyleArena};
use crate::style::{parse_codes, Style};

/// Anything that can describe styled spans over a unit of text.
///
/// The compositor only needs to know how many spans there are and what span
/// `i` covers, so regex captures, fixed literals or external annotators can
/// all feed it without the compositor knowing where spans come from.
pub trait SpanSource {
    /// Number of spans this source holds.
    fn span_count(&self) -> usize;

    /// Start offset, end offset and raw SGR code list of span `index`.
    /// A span with `start == end` is ignored.
    fn span_at(&self, index: usize) -> (usize, usize, &str);
}

/// A half-open byte range `[start, end)` of a unit, styled by a raw SGR list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyleSpan {
    pub start: usize,
    pub end: usize,
    pub style: String,
}

impl StyleSpan {
    pub fn new(start: usize, end: usize, style: impl Into<String>) -> Self {
        Self { start, end, style: style.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl SpanSource for StyleSpan {
    fn span_count(&self) -> usize {
        1
    }

    fn span_at(&self, _index: usize) -> (usize, usize, &str) {
        (self.start, self.end, &self.style)
    }
}

impl SpanSource for [StyleSpan] {
    fn span_count(&self) -> usize {
        self.len()
    }

    fn span_at(&self, index: usize) -> (usize, usize, &str) {
        self[index].span_at(0)
    }
}

impl SpanSource for Vec<StyleSpan> {
    fn span_count(&self) -> usize {
        self.len()
    }

    fn span_at(&self, index: usize) -> (usize, usize, &str) {
        self[index].span_at(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    Start,
    End,
}

#[derive(Debug, Clone, Copy)]
struct Event<'a> {
    pos: usize,
    kind: EventKind,
    id: SpanId,
    /// Raw codes of the span; empty for end events.
    raw: &'a str,
}

/// Collects escape codes between text writes and emits them as one sequence.
#[derive(Debug, Default)]
struct SgrWriter {
    buf: String,
    pending: Vec<String>,
}

impl SgrWriter {
    fn with_capacity(capacity: usize) -> Self {
        Self { buf: String::with_capacity(capacity), pending: Vec::new() }
    }

    fn queue(&mut self, code: String) {
        if code.is_empty() || self.pending.last() == Some(&code) {
            return;
        }
        self.pending.push(code);
    }

    fn write_text(&mut self, text: &str) {
        self.flush();
        self.buf.push_str(text);
    }

    /// Folds all pending codes into one style so that, e.g., a bold-off and a
    /// reasserted color become `ESC[22;31m`.
    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let codes: Vec<u32> = self.pending.iter().flat_map(|c| parse_codes(c)).collect();
        self.pending.clear();

        let sequence = Style::from_codes(&codes).sequence();
        if !sequence.is_empty() {
            self.buf.push_str("\x1b[");
            self.buf.push_str(&sequence);
            self.buf.push('m');
        }
    }

    fn finish(mut self) -> String {
        self.flush();
        self.buf
    }
}

/// Renders `text` with the spans of `spans` applied.
///
/// Returns the text unchanged (and without a trailing reset) when no
/// non-empty span exists. Fails when a span reaches past the end of the text,
/// is reversed, or does not sit on character boundaries.
pub fn render(text: &str, spans: &dyn SpanSource) -> Result<String, ChromaError> {
    render_sources(text, &[spans])
}

/// Like [`render`], over several span sources at once. Identities are
/// assigned in source order, then span order.
pub fn render_sources(text: &str, sources: &[&dyn SpanSource]) -> Result<String, ChromaError> {
    let mut arena = StyleArena::default();
    let mut events = build_events(text, sources, &mut arena)?;
    if events.is_empty() {
        return Ok(text.to_string());
    }
    sort_events(&mut events);

    let mut out = SgrWriter::with_capacity(text.len() + events.len() * 8);
    let mut stack = ActiveStyleStack::default();
    let mut last_pos = 0;

    for event in &events {
        if event.pos > last_pos {
            out.write_text(&text[last_pos..event.pos]);
        }

        match event.kind {
            EventKind::Start => {
                stack.push(event.id);
                let style = arena.get(event.id).copied().unwrap_or_default();
                out.queue(style.sequence());
            }
            EventKind::End => {
                stack.kick(event.id);
                let style = arena.get(event.id).copied().unwrap_or_default();
                out.queue(style.reset_of().sequence());
                out.queue(stack.current(&arena).sequence());
            }
        }

        last_pos = event.pos;
    }

    if last_pos < text.len() {
        out.write_text(&text[last_pos..]);
    }

    Ok(out.finish())
}

/// Fail-open variant of [`render`]: any rendering failure yields the
/// original text.
pub fn colorize(text: &str, spans: &dyn SpanSource) -> String {
    match render(text, spans) {
        Ok(rendered) => rendered,
        Err(e) => {
            debug!("Falling back to uncolored output: {}", e);
            text.to_string()
        }
    }
}

fn build_events<'a>(
    text: &str,
    sources: &[&'a dyn SpanSource],
    arena: &mut StyleArena,
) -> Result<Vec<Event<'a>>, ChromaError> {
    let mut events = Vec::new();

    for source in sources {
        for i in 0..source.span_count() {
            let (start, end, raw) = source.span_at(i);
            if start == end {
                continue;
            }
            if start > end
                || end > text.len()
                || !text.is_char_boundary(start)
                || !text.is_char_boundary(end)
            {
                return Err(ChromaError::InvalidSpan { start, end, len: text.len() });
            }

            let id = arena.admit(Style::parse(raw));
            events.push(Event { pos: start, kind: EventKind::Start, id, raw });
            events.push(Event { pos: end, kind: EventKind::End, id, raw: "" });
        }
    }

    Ok(events)
}

/// Position first, starts before ends, then shorter raw codes first. The
/// sort is stable, so remaining ties keep admission order.
fn sort_events(events: &mut [Event<'_>]) {
    events.sort_by(|a, b| {
        a.pos
            .cmp(&b.pos)
            .then(a.kind.cmp(&b.kind))
            .then(a.raw.len().cmp(&b.raw.len()))
    });
}
