use serde::{Deserialize, Serialize};

/// Half-open byte range into a syntax tree's source text.
///
/// Spans double as node identities inside a single tree: the semantic model
/// keys its binding tables by the span of the expression they describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Slice the span out of its source text, clamping out-of-range ends.
    pub fn slice<'a>(&self, src: &'a str) -> &'a str {
        let start = self.start.min(src.len());
        let end = self.end.min(src.len());
        &src[start..end]
    }

    /// Smallest span covering both `self` and `other`.
    pub fn join(&self, other: TextSpan) -> TextSpan {
        TextSpan {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_clamps_past_end() {
        let span = TextSpan::new(4, 99);
        assert_eq!(span.slice("abcdef"), "ef");
    }

    #[test]
    fn join_covers_both() {
        let a = TextSpan::new(2, 5);
        let b = TextSpan::new(9, 12);
        assert_eq!(a.join(b), TextSpan::new(2, 12));
    }
}
