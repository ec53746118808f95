use crate::ast::operator::is_operator;
use crate::ast::{Token, TokenKind};
use crate::error::LexError;
use log::trace;
use std::iter::Peekable;
use std::str::CharIndices;

/// Splits `source` into tokens.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let tokens = Lexer::new(source).collect::<Result<Vec<_>, _>>()?;
    trace!("Tokens for {:?}: {:?}", source, tokens);
    Ok(tokens)
}

/// Streaming scanner over an expression source. Yields at most one error,
/// after which it is exhausted.
pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            failed: false,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|&(_, c)| is_whitespace(c)).is_some() {}
    }

    fn scan_literal(&mut self, start: usize) -> Token {
        let mut previous = '\0';
        let mut end = start;
        while let Some(&(index, c)) = self.chars.peek() {
            let exponent_sign = matches!(c, '+' | '-') && matches!(previous, 'e' | 'E');
            if !(is_literal_char(c) || exponent_sign) {
                break;
            }
            self.chars.next();
            previous = c;
            end = index + c.len_utf8();
        }
        let text = self.source[start..end].replace('_', "");
        Token::new(TokenKind::Literal, text, start)
    }

    fn scan_identifier(&mut self, start: usize) -> Token {
        let mut end = start;
        while let Some((index, c)) = self.chars.next_if(|&(_, c)| is_word_char(c)) {
            end = index + c.len_utf8();
        }
        Token::new(TokenKind::Identifier, &self.source[start..end], start)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.skip_whitespace();
        let &(start, c) = self.chars.peek()?;

        let token = if is_operator(c) {
            self.chars.next();
            Token::new(TokenKind::Operator, c.to_string(), start)
        } else if c.is_ascii_digit() {
            self.scan_literal(start)
        } else if c == ',' {
            self.chars.next();
            Token::new(TokenKind::Comma, ",", start)
        } else if is_identifier_start(c) {
            self.scan_identifier(start)
        } else {
            self.failed = true;
            return Some(Err(LexError::new(self.source, start, c)));
        };
        Some(Ok(token))
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r')
}

fn is_literal_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '_' | 'e' | 'E')
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '\'' | '$' | '#')
}

fn is_word_char(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit()
}

/// Whether `name` lexes as exactly one identifier token.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_identifier_start) && chars.all(is_word_char)
}
