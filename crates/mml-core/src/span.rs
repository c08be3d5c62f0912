use serde::Serialize;

/// Half-open byte range into either the MML source or the generated HTML.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn with_len(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::Span;

    #[test]
    fn with_len_is_half_open() {
        let span = Span::with_len(4, 3);
        assert_eq!(span, Span { start: 4, end: 7 });
        assert!(span.contains(4));
        assert!(span.contains(6));
        assert!(!span.contains(7));
        assert_eq!(span.len(), 3);
        assert!(Span::with_len(2, 0).is_empty());
    }
}
