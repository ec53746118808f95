use crate::ast::lexer::is_identifier;
use crate::ast::{ASTNode, CallContext, RenderContext};
use crate::error::{EvalError, RegistryError};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Arity of a function accepting any number of arguments.
pub const VARIADIC: i32 = -1;

pub type EvaluateFn = Arc<dyn Fn(&CallContext<'_>, &[ASTNode]) -> Result<f64, EvalError> + Send + Sync>;
pub type RenderFn = Arc<dyn Fn(&RenderContext<'_>, &[ASTNode]) -> String + Send + Sync>;

/// A callable registered under a name. The evaluator receives the argument
/// subtrees unevaluated and decides itself when to evaluate them.
#[derive(Clone)]
pub struct FunctionDefinition {
    arity: i32,
    evaluate: EvaluateFn,
    render: Option<RenderFn>,
    latex: Option<RenderFn>,
}

impl FunctionDefinition {
    pub fn new<F>(arity: i32, evaluate: F) -> Self
    where
        F: Fn(&CallContext<'_>, &[ASTNode]) -> Result<f64, EvalError> + Send + Sync + 'static,
    {
        Self {
            arity,
            evaluate: Arc::new(evaluate),
            render: None,
            latex: None,
        }
    }

    /// Replaces the default `name(a, b)` infix rendering.
    pub fn with_render<R>(mut self, render: R) -> Self
    where
        R: Fn(&RenderContext<'_>, &[ASTNode]) -> String + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    /// Replaces the default `\operatorname{name}(a, b)` LaTeX rendering.
    pub fn with_latex<R>(mut self, latex: R) -> Self
    where
        R: Fn(&RenderContext<'_>, &[ASTNode]) -> String + Send + Sync + 'static,
    {
        self.latex = Some(Arc::new(latex));
        self
    }

    pub fn arity(&self) -> i32 {
        self.arity
    }

    pub fn is_variadic(&self) -> bool {
        self.arity == VARIADIC
    }

    pub fn accepts(&self, count: usize) -> bool {
        self.is_variadic() || usize::try_from(self.arity).is_ok_and(|arity| arity == count)
    }

    pub fn evaluate(&self, call: &CallContext<'_>, args: &[ASTNode]) -> Result<f64, EvalError> {
        (self.evaluate)(call, args)
    }

    pub fn render(&self) -> Option<&RenderFn> {
        self.render.as_ref()
    }

    pub fn latex(&self) -> Option<&RenderFn> {
        self.latex.as_ref()
    }
}

impl fmt::Debug for FunctionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDefinition")
            .field("arity", &self.arity)
            .field("render", &self.render.is_some())
            .field("latex", &self.latex.is_some())
            .finish()
    }
}

/// Functions, constants and constant display forms known to the parser and evaluator.
#[derive(Debug, Clone)]
pub struct Registry {
    functions: HashMap<String, FunctionDefinition>,
    constants: HashMap<String, f64>,
    display_forms: HashMap<String, String>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// A registry seeded with `pi`, `e` and `infty` and no functions.
    pub fn new() -> Self {
        let constants = HashMap::from([
            ("pi".to_string(), std::f64::consts::PI),
            ("e".to_string(), std::f64::consts::E),
            ("infty".to_string(), 0.0),
        ]);
        let display_forms = HashMap::from([
            ("pi".to_string(), "\\pi".to_string()),
            ("e".to_string(), "e".to_string()),
            ("infty".to_string(), "\\infty".to_string()),
        ]);
        Self {
            functions: HashMap::new(),
            constants,
            display_forms,
        }
    }

    pub fn register(&mut self, name: &str, definition: FunctionDefinition) -> Result<(), RegistryError> {
        check_name(name)?;
        if definition.arity < VARIADIC {
            return Err(RegistryError::InvalidArity(definition.arity));
        }
        if self.functions.contains_key(name) {
            return Err(RegistryError::DuplicateFunction(name.to_string()));
        }
        self.functions.insert(name.to_string(), definition);
        Ok(())
    }

    pub fn register_function<F, R>(
        &mut self,
        name: &str,
        arity: i32,
        evaluate: F,
        render: R,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&CallContext<'_>, &[ASTNode]) -> Result<f64, EvalError> + Send + Sync + 'static,
        R: Fn(&RenderContext<'_>, &[ASTNode]) -> String + Send + Sync + 'static,
    {
        self.register(name, FunctionDefinition::new(arity, evaluate).with_render(render))
    }

    pub fn register_constant(&mut self, name: &str, value: f64) -> Result<(), RegistryError> {
        check_name(name)?;
        if self.constants.contains_key(name) {
            return Err(RegistryError::DuplicateConstant(name.to_string()));
        }
        self.constants.insert(name.to_string(), value);
        Ok(())
    }

    /// Registers the LaTeX form a constant is rendered with.
    pub fn register_constant_display_form(&mut self, name: &str, rendered: &str) -> Result<(), RegistryError> {
        check_name(name)?;
        if self.display_forms.contains_key(name) {
            return Err(RegistryError::DuplicateDisplayForm(name.to_string()));
        }
        self.display_forms.insert(name.to_string(), rendered.to_string());
        Ok(())
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDefinition> {
        self.functions.get(name)
    }

    pub fn constant(&self, name: &str) -> Option<f64> {
        self.constants.get(name).copied()
    }

    pub fn display_form(&self, name: &str) -> Option<&str> {
        self.display_forms.get(name).map(String::as_str)
    }

    /// Registered function names, sorted.
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

// Names the lexer cannot produce could never be referenced from source.
fn check_name(name: &str) -> Result<(), RegistryError> {
    if name.is_empty() {
        return Err(RegistryError::EmptyName);
    }
    if !is_identifier(name) {
        return Err(RegistryError::InvalidName(name.to_string()));
    }
    Ok(())
}
