/// Cursor over raw command line tokens with one token of lookahead.
///
/// The parser peeks at a token, classifies it and only then advances, so a
/// token that could not be handled is still the next one in line. A command
/// hands the same cursor to its nested parser, which resumes exactly where
/// the parent stopped and, if it gives up on a token, leaves it for the parent.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
}

impl<'a> Tokens<'a> {
    pub fn new<S: AsRef<str>>(tokens: &'a [S]) -> Self {
        Self::from_offset(tokens, 0)
    }

    /// Start at `offset`; an offset past the end yields an exhausted cursor.
    pub fn from_offset<S: AsRef<str>>(tokens: &'a [S], offset: usize) -> Self {
        let tokens: Vec<&'a str> = tokens.iter().map(AsRef::as_ref).collect();
        let pos = offset.min(tokens.len());
        Self { tokens, pos }
    }

    pub fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).copied()
    }

    pub fn has_next(&self) -> bool {
        self.pos < self.tokens.len()
    }

    /// Index of the next token within the original sequence.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Tokens not consumed yet.
    pub fn remaining(&self) -> &[&'a str] {
        &self.tokens[self.pos..]
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.tokens.len() - self.pos;
        (left, Some(left))
    }
}

#[cfg(test)]
mod tests {
    use super::Tokens;

    #[test]
    fn peek_does_not_advance() {
        let argv = vec!["a".to_string(), "b".to_string()];
        let mut tokens = Tokens::new(&argv);
        assert_eq!(tokens.peek(), Some("a"));
        assert_eq!(tokens.peek(), Some("a"));
        assert_eq!(tokens.next(), Some("a"));
        assert_eq!(tokens.position(), 1);
        assert_eq!(tokens.remaining(), &["b"]);
        assert_eq!(tokens.next(), Some("b"));
        assert!(!tokens.has_next());
        assert_eq!(tokens.peek(), None);
    }

    #[test]
    fn offset_past_end_is_exhausted() {
        let argv = ["prog", "x"];
        let tokens = Tokens::from_offset(&argv, 5);
        assert!(!tokens.has_next());
        assert_eq!(Tokens::from_offset(&argv, 1).peek(), Some("x"));
    }
}
