use crate::ast::lexer::tokenize;
use crate::ast::operator::{lookup_operator, NO_PRECEDENCE};
use crate::ast::{ASTNode, Registry, Token, TokenKind};
use crate::config::EngineConfig;
use crate::error::{Error, ParseError, ParseErrorKind};
use log::debug;

type ParseResult<T> = Result<T, ParseError>;

/// Tokenizes and parses `source` against `registry`.
pub fn parse_expression(source: &str, registry: &Registry, max_depth: usize) -> Result<ASTNode, Error> {
    debug!("Parsing expression: {}", source);
    let tokens = tokenize(source)?;
    let ast = Parser::new(&tokens, source, registry)
        .with_max_depth(max_depth)
        .parse()?;
    debug!("Parse result: {:#?}", ast);
    Ok(ast)
}

/// A parsed subtree and the number of node levels it spans.
struct Parsed {
    node: ASTNode,
    height: usize,
}

impl Parsed {
    fn leaf(node: ASTNode) -> Self {
        Self { node, height: 1 }
    }
}

/// Recursive-descent parser with precedence climbing for binary operators.
///
/// Operators of equal precedence associate to the left, including `^`.
/// `max_depth` bounds both the parser's own nesting and the height of the
/// tree it builds, so a long flat chain like `1+1+...+1` fails the same way
/// deeply nested parentheses do.
pub struct Parser<'a> {
    tokens: &'a [Token],
    source: &'a str,
    registry: &'a Registry,
    position: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], source: &'a str, registry: &'a Registry) -> Self {
        Self {
            tokens,
            source,
            registry,
            position: 0,
            depth: 0,
            max_depth: EngineConfig::default().max_parse_depth,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn parse(mut self) -> ParseResult<ASTNode> {
        if self.tokens.is_empty() {
            return Err(self.error(ParseErrorKind::EmptyExpression, 0));
        }
        Ok(self.parse_expression()?.node)
    }

    fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn error(&self, kind: ParseErrorKind, offset: usize) -> ParseError {
        ParseError::new(kind, self.source, offset)
    }

    fn too_deep(&self, offset: usize) -> ParseError {
        self.error(ParseErrorKind::TooDeep { limit: self.max_depth }, offset)
    }

    fn end_of_input(&self) -> ParseError {
        self.error(ParseErrorKind::UnexpectedEnd, self.source.len())
    }

    fn expect_more(&self) -> ParseResult<&'a Token> {
        self.current().ok_or_else(|| self.end_of_input())
    }

    fn enter(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            let offset = self.current().map_or(self.source.len(), |token| token.offset);
            return Err(self.too_deep(offset));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Wraps a freshly built interior node, failing once the tree grows past `max_depth` levels.
    fn branch(&self, node: ASTNode, height: usize, offset: usize) -> ParseResult<Parsed> {
        if height > self.max_depth {
            return Err(self.too_deep(offset));
        }
        Ok(Parsed { node, height })
    }

    fn parse_expression(&mut self) -> ParseResult<Parsed> {
        self.enter()?;
        let lhs = self.parse_primary()?;
        let parsed = self.parse_binary_rhs(0, lhs)?;
        self.leave();

        if self.depth == 0 {
            if let Some(token) = self.current() {
                let kind = if token.is_operator(')') {
                    ParseErrorKind::UnmatchedParen
                } else {
                    ParseErrorKind::TrailingTokens(token.text.clone())
                };
                return Err(self.error(kind, token.offset));
            }
        }
        Ok(parsed)
    }

    fn parse_primary(&mut self) -> ParseResult<Parsed> {
        let token = self.expect_more()?;
        match token.kind {
            TokenKind::Identifier => self.parse_call_constant_or_variable(),
            TokenKind::Literal => self.parse_number(),
            TokenKind::Operator => self.parse_paren_or_unary_minus(),
            TokenKind::Comma => Err(self.error(
                ParseErrorKind::UnexpectedToken(token.text.clone()),
                token.offset,
            )),
        }
    }

    fn parse_number(&mut self) -> ParseResult<Parsed> {
        let token = self.expect_more()?;
        if token.kind != TokenKind::Literal {
            return Err(self.error(
                ParseErrorKind::UnexpectedToken(token.text.clone()),
                token.offset,
            ));
        }
        let value = token.text.parse::<f64>().map_err(|_| {
            self.error(ParseErrorKind::InvalidNumber(token.text.clone()), token.offset)
        })?;
        self.advance();
        Ok(Parsed::leaf(ASTNode::Number {
            value,
            rendering: token.text.clone(),
        }))
    }

    fn parse_call_constant_or_variable(&mut self) -> ParseResult<Parsed> {
        let token = self.expect_more()?;
        self.advance();

        if self.current().is_some_and(|next| next.is_operator('(')) {
            return self.parse_call(token);
        }

        let name = token.text.clone();
        Ok(Parsed::leaf(match self.registry.constant(&name) {
            Some(value) => ASTNode::Constant {
                rendering: name.clone(),
                name,
                value,
            },
            None => ASTNode::Variable(name),
        }))
    }

    fn parse_call(&mut self, name_token: &'a Token) -> ParseResult<Parsed> {
        let name = &name_token.text;
        let definition = self.registry.function(name).ok_or_else(|| {
            self.error(ParseErrorKind::UndefinedFunction(name.clone()), name_token.offset)
        })?;
        self.advance();

        let mut args = Vec::new();
        let mut height = 1;
        let closing = match self.current() {
            Some(token) if token.is_operator(')') => {
                self.advance();
                token
            }
            _ => loop {
                if self.current().is_none() {
                    return Err(self.error(ParseErrorKind::UnmatchedParen, self.source.len()));
                }
                let arg = self.parse_expression()?;
                height = height.max(arg.height + 1);
                args.push(arg.node);
                match self.current() {
                    Some(token) if token.kind == TokenKind::Comma => self.advance(),
                    Some(token) if token.is_operator(')') => {
                        self.advance();
                        break token;
                    }
                    Some(token) => {
                        return Err(self.error(
                            ParseErrorKind::UnexpectedToken(token.text.clone()),
                            token.offset,
                        ))
                    }
                    None => {
                        return Err(self.error(ParseErrorKind::UnmatchedParen, self.source.len()))
                    }
                }
            },
        };

        if !definition.accepts(args.len()) {
            return Err(self.error(
                ParseErrorKind::Arity {
                    name: name.clone(),
                    expected: definition.arity(),
                    found: args.len(),
                },
                closing.offset,
            ));
        }
        let call = ASTNode::FunctionCall {
            name: name.clone(),
            args,
        };
        self.branch(call, height, name_token.offset)
    }

    fn parse_paren_or_unary_minus(&mut self) -> ParseResult<Parsed> {
        let token = self.expect_more()?;
        if token.is_operator('(') {
            self.advance();
            self.expect_more()?;
            let inner = self.parse_expression()?;
            match self.current() {
                Some(closing) if closing.is_operator(')') => {
                    self.advance();
                    Ok(Parsed {
                        node: inner.node.grouped(),
                        height: inner.height,
                    })
                }
                Some(other) => Err(self.error(ParseErrorKind::UnmatchedParen, other.offset)),
                None => Err(self.error(ParseErrorKind::UnmatchedParen, self.source.len())),
            }
        } else if token.is_operator('-') {
            self.advance();
            self.expect_more()?;
            self.enter()?;
            let operand = self.parse_primary()?;
            self.leave();
            self.branch(ASTNode::negate(operand.node), operand.height + 1, token.offset)
        } else {
            self.parse_number()
        }
    }

    fn current_precedence(&self) -> i32 {
        self.current()
            .and_then(Token::operator)
            .and_then(lookup_operator)
            .map_or(NO_PRECEDENCE, |op| op.precedence)
    }

    fn parse_binary_rhs(&mut self, min_precedence: i32, lhs: Parsed) -> ParseResult<Parsed> {
        let mut lhs = lhs;
        loop {
            let precedence = self.current_precedence();
            if precedence < min_precedence {
                return Ok(lhs);
            }
            let (operator, offset) = match self.current() {
                Some(token) => match token.operator() {
                    Some(symbol) => (symbol, token.offset),
                    None => return Ok(lhs),
                },
                None => return Ok(lhs),
            };
            self.advance();
            self.expect_more()?;

            let mut rhs = self.parse_primary()?;
            if precedence < self.current_precedence() {
                rhs = self.parse_binary_rhs(precedence + 1, rhs)?;
            }
            let height = lhs.height.max(rhs.height) + 1;
            lhs = self.branch(ASTNode::binary(operator, lhs.node, rhs.node), height, offset)?;
        }
    }
}
