use std::collections::BTreeSet;

mod cache;
mod context;
mod evaluator;
pub mod lexer;
pub mod operator;
mod parser;
mod printer;
mod registry;
mod token;

pub(crate) use cache::ParseCache;
pub use context::*;
pub use evaluator::*;
pub use lexer::tokenize;
pub use operator::{lookup_operator, OperatorDefinition, NO_PRECEDENCE};
pub use parser::*;
pub use printer::*;
pub use registry::*;
pub use token::*;

#[derive(Debug, Clone, PartialEq)]
pub enum ASTNode {
    /// A numeric literal together with the text it was written as.
    Number { value: f64, rendering: String },
    /// A registered constant, resolved when the expression was parsed.
    Constant {
        name: String,
        value: f64,
        rendering: String,
    },
    /// A free name, looked up in the parameter set at evaluation time.
    Variable(String),
    BinaryOperation {
        left: Box<ASTNode>,
        operator: char,
        right: Box<ASTNode>,
        /// The operation was written inside its own pair of parentheses.
        parenthesized: bool,
    },
    FunctionCall { name: String, args: Vec<ASTNode> },
}

impl ASTNode {
    pub fn number(value: f64) -> Self {
        ASTNode::Number {
            value,
            rendering: printer::format_number(value, RenderStyle::Infix),
        }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        ASTNode::Variable(name.into())
    }

    pub fn binary(operator: char, left: ASTNode, right: ASTNode) -> Self {
        ASTNode::BinaryOperation {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            parenthesized: false,
        }
    }

    /// `-operand`, stored as `0 - operand` with a placeholder that renders as nothing.
    pub fn negate(operand: ASTNode) -> Self {
        let zero = ASTNode::Number {
            value: 0.0,
            rendering: String::new(),
        };
        ASTNode::binary('-', zero, operand)
    }

    pub fn call(name: impl Into<String>, args: Vec<ASTNode>) -> Self {
        ASTNode::FunctionCall {
            name: name.into(),
            args,
        }
    }

    /// Marks a binary operation as explicitly parenthesized. Other nodes are returned as-is.
    pub fn grouped(self) -> Self {
        match self {
            ASTNode::BinaryOperation {
                left,
                operator,
                right,
                ..
            } => ASTNode::BinaryOperation {
                left,
                operator,
                right,
                parenthesized: true,
            },
            other => other,
        }
    }

    pub fn is_binary_operation(&self) -> bool {
        matches!(self, ASTNode::BinaryOperation { .. })
    }

    /// Whether this is a unary minus built by [`negate`](Self::negate) or parsed from `-x`.
    pub fn is_negation(&self) -> bool {
        match self {
            ASTNode::BinaryOperation { left, operator: '-', .. } => {
                matches!(left.as_ref(), ASTNode::Number { rendering, .. } if rendering.is_empty())
            }
            _ => false,
        }
    }

    /// Names of all variables referenced by the tree, sorted.
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        match self {
            ASTNode::Variable(name) => {
                names.insert(name.as_str());
            }
            ASTNode::BinaryOperation { left, right, .. } => {
                left.collect_variables(names);
                right.collect_variables(names);
            }
            ASTNode::FunctionCall { args, .. } => {
                for arg in args {
                    arg.collect_variables(names);
                }
            }
            ASTNode::Number { .. } | ASTNode::Constant { .. } => {}
        }
    }
}
