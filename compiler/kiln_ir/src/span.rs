//! Byte ranges into the unit's source text.

use std::fmt;

/// Half-open byte range `start..end` of a token or list.
///
/// Nodes built without a reader (tests, synthesized forms) use
/// [`Span::DUMMY`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Smallest span covering both. Dummy spans are ignored.
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        match (self == Span::DUMMY, other == Span::DUMMY) {
            (true, _) => other,
            (_, true) => self,
            _ => Span {
                start: self.start.min(other.start),
                end: self.end.max(other.end),
            },
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(target_pointer_width = "64")]
crate::static_assert_size!(Span, 8);

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn merge_covers_both() {
        assert_eq!(Span::new(10, 20).merge(Span::new(15, 30)), Span::new(10, 30));
        assert_eq!(Span::new(4, 6).merge(Span::new(0, 2)), Span::new(0, 6));
    }

    #[test]
    fn merge_ignores_dummy() {
        assert_eq!(Span::DUMMY.merge(Span::new(3, 5)), Span::new(3, 5));
        assert_eq!(Span::new(3, 5).merge(Span::DUMMY), Span::new(3, 5));
    }

    #[test]
    fn length() {
        assert_eq!(Span::new(2, 9).len(), 7);
        assert!(Span::DUMMY.is_empty());
    }

    #[test]
    fn prints_as_range() {
        assert_eq!(format!("{:?}", Span::new(4, 9)), "4..9");
        assert_eq!(Span::new(4, 9).to_string(), "4..9");
    }
}
