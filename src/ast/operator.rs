use crate::error::ArithmeticError;
use dashu::rational::RBig;

/// Precedence reported for brackets: lower than every binary operator, so
/// precedence climbing always stops in front of one.
pub const NO_PRECEDENCE: i32 = -1;

pub type Reduce = fn(f64, f64) -> Result<f64, ArithmeticError>;
pub type Render = fn(&str, &str) -> String;

#[derive(Debug, Clone, Copy)]
pub struct OperatorDefinition {
    pub symbol: char,
    pub precedence: i32,
    pub reduce: Reduce,
    pub render: Render,
    pub latex: Render,
}

impl OperatorDefinition {
    pub fn is_bracket(&self) -> bool {
        self.precedence == NO_PRECEDENCE
    }

    pub fn apply(&self, left: f64, right: f64) -> Result<f64, ArithmeticError> {
        (self.reduce)(left, right)
    }
}

static OPERATORS: [OperatorDefinition; 8] = [
    OperatorDefinition {
        symbol: '(',
        precedence: NO_PRECEDENCE,
        reduce: bracket_reduce,
        render: bracket_render,
        latex: bracket_render,
    },
    OperatorDefinition {
        symbol: ')',
        precedence: NO_PRECEDENCE,
        reduce: bracket_reduce,
        render: bracket_render,
        latex: bracket_render,
    },
    OperatorDefinition {
        symbol: '+',
        precedence: 20,
        reduce: add,
        render: |a, b| format!("{a} + {b}"),
        latex: |a, b| format!("{a} + {b}"),
    },
    OperatorDefinition {
        symbol: '-',
        precedence: 20,
        reduce: subtract,
        render: render_minus,
        latex: render_minus,
    },
    OperatorDefinition {
        symbol: '*',
        precedence: 40,
        reduce: multiply,
        render: |a, b| format!("{a} * {b}"),
        latex: |a, b| format!("{a} \\times {b}"),
    },
    OperatorDefinition {
        symbol: '/',
        precedence: 40,
        reduce: divide,
        render: |a, b| format!("{a}/{b}"),
        latex: |a, b| format!("\\frac{{{a}}}{{{b}}}"),
    },
    OperatorDefinition {
        symbol: '^',
        precedence: 60,
        reduce: |a, b| Ok(a.powf(b)),
        render: |a, b| format!("{a}^{b}"),
        latex: |a, b| format!("{a}^{{{b}}}"),
    },
    OperatorDefinition {
        symbol: '%',
        precedence: 40,
        reduce: modulo,
        render: |a, b| format!("({a} % {b})"),
        latex: |a, b| format!("({a} \\bmod {b})"),
    },
];

pub fn lookup_operator(symbol: char) -> Option<&'static OperatorDefinition> {
    OPERATORS.iter().find(|op| op.symbol == symbol)
}

pub fn is_operator(symbol: char) -> bool {
    lookup_operator(symbol).is_some()
}

pub fn operators() -> &'static [OperatorDefinition] {
    &OPERATORS
}

fn bracket_reduce(_: f64, _: f64) -> Result<f64, ArithmeticError> {
    Ok(0.0)
}

fn bracket_render(_: &str, _: &str) -> String {
    String::new()
}

// A unary minus is stored as `0 - x` with an empty left rendering.
fn render_minus(a: &str, b: &str) -> String {
    if a.is_empty() {
        format!("-{b}")
    } else {
        format!("{a} - {b}")
    }
}

/// Computes `op` on the exact rational values of both operands and rounds the
/// result to `f64` once. Non-finite operands have no rational value and go
/// through plain IEEE arithmetic.
fn exact(lhs: f64, rhs: f64, op: fn(RBig, RBig) -> RBig, ieee: fn(f64, f64) -> f64) -> f64 {
    match (RBig::try_from(lhs), RBig::try_from(rhs)) {
        (Ok(a), Ok(b)) => op(a, b).to_f64().value(),
        _ => ieee(lhs, rhs),
    }
}

fn add(a: f64, b: f64) -> Result<f64, ArithmeticError> {
    Ok(exact(a, b, |x, y| x + y, |x, y| x + y))
}

fn subtract(a: f64, b: f64) -> Result<f64, ArithmeticError> {
    Ok(exact(a, b, |x, y| x - y, |x, y| x - y))
}

fn multiply(a: f64, b: f64) -> Result<f64, ArithmeticError> {
    Ok(exact(a, b, |x, y| x * y, |x, y| x * y))
}

fn divide(a: f64, b: f64) -> Result<f64, ArithmeticError> {
    if b == 0.0 {
        return Err(ArithmeticError::DivisionByZero { lhs: a, rhs: b });
    }
    Ok(exact(a, b, |x, y| x / y, |x, y| x / y))
}

fn modulo(a: f64, b: f64) -> Result<f64, ArithmeticError> {
    let (a, b) = (a.trunc(), b.trunc());
    if b == 0.0 {
        return Err(ArithmeticError::ModuloByZero { lhs: a, rhs: b });
    }
    Ok(a % b)
}
