use thiserror::Error;

/// Renders a caret diagram pointing at `offset` (a byte offset) within `source`.
///
/// ```text
/// -----
/// 1 + @
///     ^
/// -----
/// ```
pub fn error_position(source: &str, offset: usize) -> String {
    let width = source.chars().count();
    let column = source
        .char_indices()
        .take_while(|(index, _)| *index < offset)
        .count();
    let rule = "-".repeat(width);
    format!("{rule}\n{source}\n{}^\n{rule}\n", " ".repeat(column))
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("unknown symbol '{found}' at offset {offset}\n{diagram}")]
pub struct LexError {
    pub offset: usize,
    pub found: char,
    pub diagram: String,
}

impl LexError {
    pub fn new(source: &str, offset: usize, found: char) -> Self {
        Self {
            offset,
            found,
            diagram: error_position(source, offset),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("empty expression")]
    EmptyExpression,
    #[error("want '(' or '0-9' but reached the end of the expression")]
    UnexpectedEnd,
    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),
    #[error("invalid numeric literal '{0}'")]
    InvalidNumber(String),
    #[error("unmatched parenthesis")]
    UnmatchedParen,
    #[error("function `{0}` is undefined")]
    UndefinedFunction(String),
    #[error("wrong way calling function `{name}`, parameters want {expected} but get {found}")]
    Arity {
        name: String,
        expected: i32,
        found: usize,
    },
    #[error("bad expression, unexpected '{0}' after a complete expression")]
    TrailingTokens(String),
    #[error("expression nested deeper than {limit} levels")]
    TooDeep { limit: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}\n{diagram}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
    pub diagram: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, source: &str, offset: usize) -> Self {
        Self {
            kind,
            offset,
            diagram: error_position(source, offset),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArithmeticError {
    #[error("division by zero [{lhs}/{rhs}]")]
    DivisionByZero { lhs: f64, rhs: f64 },
    #[error("modulo by zero [{lhs}%{rhs}]")]
    ModuloByZero { lhs: f64, rhs: f64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
    #[error("no parameter set supplied to resolve `{0}`")]
    MissingContext(String),
    #[error("no parameter value found for `{0}`")]
    UnboundVariable(String),
    #[error("binding for `{name}` is not a valid expression: {source}")]
    Substitution {
        name: String,
        #[source]
        source: Box<Error>,
    },
    #[error("binding for `{0}` refers back to itself")]
    CyclicSubstitution(String),
    #[error("substitution of `{name}` exceeds {limit} levels")]
    SubstitutionTooDeep { name: String, limit: usize },
    #[error("expression nests deeper than {limit} levels")]
    TooDeep { limit: usize },
    #[error("function `{0}` is not registered")]
    UnknownFunction(String),
    #[error("operator '{0}' is not in the operator table")]
    UnknownOperator(char),
    #[error("function `{name}` expects {expected} arguments, got {found}")]
    ArgumentCount {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("function `{name}` failed: {message}")]
    Function { name: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("registered name must not be empty")]
    EmptyName,
    #[error("`{0}` is not a valid identifier")]
    InvalidName(String),
    #[error("arity should be -1, 0, or a positive integer, got {0}")]
    InvalidArity(i32),
    #[error("function `{0}` is already registered")]
    DuplicateFunction(String),
    #[error("constant `{0}` is already registered")]
    DuplicateConstant(String),
    #[error("display form for `{0}` is already registered")]
    DuplicateDisplayForm(String),
}

/// Any failure of the one-shot parse-and-evaluate entry points.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl From<ArithmeticError> for Error {
    fn from(err: ArithmeticError) -> Self {
        Error::Eval(EvalError::Arithmetic(err))
    }
}
