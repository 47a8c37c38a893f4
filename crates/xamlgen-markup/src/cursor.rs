/// A byte cursor over the scanned text.
///
/// All structural characters in markup are ASCII, so stepping byte by byte
/// only ever stops on char boundaries where it matters.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The text being scanned.
    pub s: &'a str,
    /// Current byte offset into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    pub fn pos(&self) -> usize {
        self.i
    }

    /// Peeks at the current byte without advancing.
    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    /// Checks if the remaining input starts with the given byte pattern.
    pub fn starts_with(&self, pat: &[u8]) -> bool {
        self.s.as_bytes().get(self.i..).is_some_and(|rest| rest.starts_with(pat))
    }

    /// Advances by one byte, returning the consumed byte.
    pub fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.i += 1;
        Some(b)
    }

    /// Advances by `n` bytes, stopping at the end of input.
    pub fn bump_n(&mut self, n: usize) {
        self.i = (self.i + n).min(self.s.len());
    }

    /// Advances while `pred` holds for the current byte.
    pub fn bump_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.i += 1;
        }
    }

    /// Moves past the next occurrence of `pat`, or to the end of input if there is none.
    pub fn skip_past(&mut self, pat: &str) {
        match self.s.get(self.i..).and_then(|rest| rest.find(pat)) {
            Some(offset) => self.i += offset + pat.len(),
            None => self.i = self.s.len(),
        }
    }

    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.s[start..self.i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cur = Cursor::new("<Grid>");
        assert_eq!(cur.pos(), 0);
        assert_eq!(cur.peek(), Some(b'<'));
        assert_eq!(cur.bump(), Some(b'<'));
        assert_eq!(cur.pos(), 1);
    }

    #[test]
    fn empty_string_input() {
        let cur = Cursor::new("");
        assert_eq!(cur.peek(), None);
        assert!(cur.starts_with(b""));
        assert!(!cur.starts_with(b"<"));
    }

    #[test]
    fn bump_at_eof_returns_none() {
        let mut cur = Cursor::new("x");
        assert_eq!(cur.bump(), Some(b'x'));
        assert_eq!(cur.bump(), None);
        assert_eq!(cur.bump(), None);
    }

    #[test]
    fn bump_n_is_clamped() {
        let mut cur = Cursor::new("hi");
        cur.bump_n(10);
        assert_eq!(cur.peek(), None);
        assert_eq!(cur.pos(), 2);
    }

    #[test]
    fn bump_while_and_slice() {
        let mut cur = Cursor::new("Grid.Row=\"1\"");
        cur.bump_while(|b| b.is_ascii_alphanumeric() || b == b'.');
        assert_eq!(cur.slice_from(0), "Grid.Row");
        assert_eq!(cur.peek(), Some(b'='));
    }

    #[test]
    fn skip_past_pattern() {
        let mut cur = Cursor::new("<!-- a --> <b/>");
        cur.skip_past("-->");
        assert_eq!(cur.pos(), 10);

        let mut cur = Cursor::new("<!-- never closed");
        cur.skip_past("-->");
        assert_eq!(cur.peek(), None);
    }
}
