use crate::ast::operator::lookup_operator;
use crate::ast::context::Frame;
use crate::ast::{parse_expression, ASTNode, Binding, ParseCache, Parameters, Registry};
use crate::config::EngineConfig;
use crate::error::{Error, EvalError};
use log::{debug, trace};
use std::sync::Arc;

/// Reduces a tree to a number against a parameter set.
pub struct Evaluator<'a> {
    registry: &'a Registry,
    config: EngineConfig,
    cache: Option<&'a ParseCache>,
}

impl<'a> Evaluator<'a> {
    pub fn new(registry: &'a Registry, config: EngineConfig) -> Self {
        Self {
            registry,
            config,
            cache: None,
        }
    }

    pub(crate) fn with_cache(mut self, cache: Option<&'a ParseCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Evaluates `ast`. Variables fail with [`EvalError::MissingContext`] when
    /// `params` is `None`.
    pub fn evaluate(&self, ast: &ASTNode, params: Option<&Parameters>) -> Result<f64, EvalError> {
        self.eval(ast, Frame::new(params))
    }

    fn eval(&self, ast: &ASTNode, frame: Frame<'_>) -> Result<f64, EvalError> {
        if frame.depth >= self.config.max_eval_depth {
            return Err(EvalError::TooDeep {
                limit: self.config.max_eval_depth,
            });
        }
        let frame = frame.deeper();
        match ast {
            ASTNode::Number { value, .. } | ASTNode::Constant { value, .. } => Ok(*value),

            ASTNode::Variable(name) => self.resolve(name, frame),

            ASTNode::BinaryOperation {
                left,
                operator,
                right,
                ..
            } => {
                let op = lookup_operator(*operator).ok_or(EvalError::UnknownOperator(*operator))?;
                let left_value = self.eval(left, frame)?;
                let right_value = self.eval(right, frame)?;
                Ok(op.apply(left_value, right_value)?)
            }

            ASTNode::FunctionCall { name, args } => {
                let function = self
                    .registry
                    .function(name)
                    .ok_or_else(|| EvalError::UnknownFunction(name.clone()))?;
                trace!("Calling {} with {} argument(s)", name, args.len());
                let call = CallContext {
                    evaluator: self,
                    name,
                    frame,
                };
                function.evaluate(&call, args)
            }
        }
    }

    fn resolve(&self, name: &str, frame: Frame<'_>) -> Result<f64, EvalError> {
        let params = frame
            .params
            .ok_or_else(|| EvalError::MissingContext(name.to_string()))?;
        let binding = params
            .get(name)
            .ok_or_else(|| EvalError::UnboundVariable(name.to_string()))?;

        match binding {
            Binding::Int(value) => Ok(*value as f64),
            Binding::UInt(value) => Ok(*value as f64),
            Binding::Float(value) => Ok(*value),
            Binding::Source(source) => {
                let link = frame.enter(name, self.config.max_substitution_depth)?;
                debug!("Substituting `{}` with {:?}", name, source);
                let node = self.reparse(source).map_err(|err| EvalError::Substitution {
                    name: name.to_string(),
                    source: Box::new(err),
                })?;
                self.eval(&node, frame.nested(&link))
            }
            Binding::Node(node) => {
                let link = frame.enter(name, self.config.max_substitution_depth)?;
                trace!("Substituting `{}` with a prebuilt tree", name);
                self.eval(node, frame.nested(&link))
            }
        }
    }

    fn reparse(&self, source: &str) -> Result<Arc<ASTNode>, Error> {
        let parse = |source: &str| parse_expression(source, self.registry, self.config.max_parse_depth);
        match self.cache {
            Some(cache) => cache.get_or_parse(source, parse),
            None => parse(source).map(Arc::new),
        }
    }
}

/// Handed to a function's evaluator: evaluates argument subtrees on demand in
/// the caller's scope.
pub struct CallContext<'a> {
    evaluator: &'a Evaluator<'a>,
    name: &'a str,
    frame: Frame<'a>,
}

impl CallContext<'_> {
    /// Name the function was called by.
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn eval(&self, ast: &ASTNode) -> Result<f64, EvalError> {
        self.evaluator.eval(ast, self.frame)
    }

    /// Evaluates `ast` against `params` instead of the caller's parameters.
    pub fn eval_with(&self, ast: &ASTNode, params: &Parameters) -> Result<f64, EvalError> {
        self.evaluator.eval(ast, self.frame.with_params(params))
    }

    pub fn eval_all(&self, args: &[ASTNode]) -> Result<Vec<f64>, EvalError> {
        args.iter().map(|arg| self.eval(arg)).collect()
    }

    pub fn parameters(&self) -> Option<&Parameters> {
        self.frame.params
    }

    pub fn differentiation_names(&self) -> Vec<&str> {
        self.frame
            .params
            .map(|params| params.differentiation_names().collect())
            .unwrap_or_default()
    }

    pub fn registry(&self) -> &Registry {
        self.evaluator.registry
    }

    /// A failure attributed to this function.
    pub fn error(&self, message: impl Into<String>) -> EvalError {
        EvalError::Function {
            name: self.name.to_string(),
            message: message.into(),
        }
    }
}
