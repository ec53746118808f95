use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Function, constant or variable name.
    Identifier,
    /// Numeric literal.
    Literal,
    /// Single-character operator or bracket.
    Operator,
    /// Argument separator.
    Comma,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Byte offset of the first character in the source.
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }

    /// The operator symbol if this is an operator token.
    pub fn operator(&self) -> Option<char> {
        match self.kind {
            TokenKind::Operator => self.text.chars().next(),
            _ => None,
        }
    }

    pub fn is_operator(&self, symbol: char) -> bool {
        self.operator() == Some(symbol)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
