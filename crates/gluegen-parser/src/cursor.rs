/// A cursor over a type expression that tracks its byte offset.
///
/// Provides low-level character access with peek/advance semantics.
pub struct Cursor<'src> {
    /// The full expression being scanned.
    source: &'src str,
    /// Remaining text (slice starting at current position).
    rest: &'src str,
    /// Current byte offset from start of source.
    offset: usize,
}

impl<'src> Cursor<'src> {
    /// Create a new cursor at the start of the source.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            rest: source,
            offset: 0,
        }
    }

    /// Get the full source text.
    #[inline]
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Current byte offset from start of source.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Check if we've reached the end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.rest.is_empty()
    }

    /// Peek at the current character without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Check if the current character satisfies a predicate.
    #[inline]
    pub fn check(&self, f: impl Fn(char) -> bool) -> bool {
        self.peek().is_some_and(f)
    }

    /// Check if the upcoming bytes match the given string.
    #[inline]
    pub fn check_str(&self, s: &str) -> bool {
        self.rest.starts_with(s)
    }

    /// Consume the current character and advance.
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        let len = ch.len_utf8();
        self.rest = &self.rest[len..];
        self.offset += len;
        Some(ch)
    }

    /// Consume `s` if the upcoming bytes match it.
    pub fn eat_str(&mut self, s: &str) -> bool {
        if self.check_str(s) {
            self.rest = &self.rest[s.len()..];
            self.offset += s.len();
            true
        } else {
            false
        }
    }

    /// Consume characters while the predicate holds and return the slice.
    pub fn eat_while(&mut self, f: impl Fn(char) -> bool) -> &'src str {
        let start = self.source.len() - self.rest.len();
        while self.check(&f) {
            self.advance();
        }
        let end = self.source.len() - self.rest.len();
        &self.source[start..end]
    }

    /// Skip whitespace.
    pub fn skip_whitespace(&mut self) {
        self.eat_while(char::is_whitespace);
    }

    /// Save the current position so it can be restored.
    pub fn checkpoint(&self) -> (usize, &'src str) {
        (self.offset, self.rest)
    }

    /// Restore a position saved by [`Cursor::checkpoint`].
    pub fn restore(&mut self, checkpoint: (usize, &'src str)) {
        self.offset = checkpoint.0;
        self.rest = checkpoint.1;
    }
}
