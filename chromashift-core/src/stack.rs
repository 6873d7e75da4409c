// chromashift-core/src/stack.rs
//! The active-style stack used while compositing one unit.
//!
//! Entries are span identities in the order their start events were seen.
//! Styles themselves live in an arena owned by the caller and indexed by the
//! same identity, so two spans with identical codes stay independently
//! closeable.
//!
//! License: MIT OR APACHE 2.0

use crate::style::Style;

/// Per-render identity of an admitted span.
pub type SpanId = usize;

/// Styles indexed by [`SpanId`], filled as spans are admitted.
#[derive(Debug, Default)]
pub struct StyleArena {
    styles: Vec<Style>,
}

impl StyleArena {
    /// Stores a style and returns its new identity. Identities are handed out
    /// in increasing order starting at zero.
    pub fn admit(&mut self, style: Style) -> SpanId {
        self.styles.push(style);
        self.styles.len() - 1
    }

    pub fn get(&self, id: SpanId) -> Option<&Style> {
        self.styles.get(id)
    }
}

#[derive(Debug, Default)]
pub struct ActiveStyleStack {
    layers: Vec<SpanId>,
}

impl ActiveStyleStack {
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn push(&mut self, id: SpanId) {
        self.layers.push(id);
    }

    /// Removes `id` wherever it sits, keeping the relative order of the rest.
    /// Returns false when the identity was not open.
    pub fn kick(&mut self, id: SpanId) -> bool {
        match self.layers.iter().rposition(|&layer| layer == id) {
            Some(pos) => {
                self.layers.remove(pos);
                true
            }
            None => false,
        }
    }

    /// The effective style: the most recently pushed entry still open, or a
    /// full reset when nothing is open.
    pub fn current(&self, arena: &StyleArena) -> Style {
        self.layers
            .last()
            .and_then(|&id| arena.get(id))
            .copied()
            .unwrap_or(Style::RESET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stack_is_hard_reset() {
        let arena = StyleArena::default();
        let stack = ActiveStyleStack::default();
        assert_eq!(stack.current(&arena), Style::RESET);
    }

    #[test]
    fn test_kick_from_middle_preserves_order() {
        let mut arena = StyleArena::default();
        let mut stack = ActiveStyleStack::default();
        let a = arena.admit(Style::parse("1"));
        let b = arena.admit(Style::parse("31"));
        let c = arena.admit(Style::parse("4"));
        stack.push(a);
        stack.push(b);
        stack.push(c);

        assert!(stack.kick(b));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.current(&arena), Style::parse("4"));
        assert!(stack.kick(c));
        assert_eq!(stack.current(&arena), Style::parse("1"));
        assert!(!stack.kick(b));
    }

    #[test]
    fn test_identical_styles_close_independently() {
        let mut arena = StyleArena::default();
        let mut stack = ActiveStyleStack::default();
        let first = arena.admit(Style::parse("31"));
        let second = arena.admit(Style::parse("31"));
        stack.push(first);
        stack.push(second);

        assert!(stack.kick(first));
        assert_eq!(stack.len(), 1);
        assert!(stack.kick(second));
        assert!(stack.is_empty());
    }
}
