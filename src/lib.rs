extern crate self as mathast_rs;

pub mod ast;
pub mod config;
pub mod error;
pub mod functions;

use ast::{ASTNode, Evaluator, ParseCache, Parameters, Printer, Registry, RenderStyle};
use config::EngineConfig;
use error::{Error, EvalError, RegistryError};
use log::debug;
use rayon::prelude::*;

/// Parses, evaluates and renders expressions against one registry.
///
/// Registering needs `&mut Engine`; everything else works through `&Engine`,
/// so a registered engine can be shared across threads as-is.
pub struct Engine {
    registry: Registry,
    config: EngineConfig,
    cache: Option<ParseCache>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// An engine with the default constants and no functions.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_registry(Registry::new(), config)
    }

    pub fn with_registry(registry: Registry, config: EngineConfig) -> Self {
        Self {
            registry,
            config,
            cache: ParseCache::new(config.parse_cache_size),
        }
    }

    /// An engine with the standard function library registered.
    pub fn standard() -> Result<Self, RegistryError> {
        Ok(Self::with_registry(
            functions::standard_registry()?,
            EngineConfig::default(),
        ))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access for registering. Drops every cached parse, since a new
    /// function or constant can change how a binding string parses.
    pub fn registry_mut(&mut self) -> &mut Registry {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
        &mut self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(&self.registry, self.config).with_cache(self.cache.as_ref())
    }

    pub fn printer(&self, style: RenderStyle) -> Printer<'_> {
        Printer::new(&self.registry, self.config, style).with_cache(self.cache.as_ref())
    }

    pub fn parse_expression(&self, source: &str) -> Result<ASTNode, Error> {
        ast::parse_expression(source, &self.registry, self.config.max_parse_depth)
    }

    pub fn evaluate(&self, ast: &ASTNode, params: &Parameters) -> Result<f64, EvalError> {
        self.evaluator().evaluate(ast, Some(params))
    }

    /// Evaluates without any parameters; every variable is an error.
    pub fn evaluate_detached(&self, ast: &ASTNode) -> Result<f64, EvalError> {
        self.evaluator().evaluate(ast, None)
    }

    pub fn evaluate_expression(&self, source: &str, params: &Parameters) -> Result<f64, Error> {
        let ast = self.parse_expression(source)?;
        let result = self.evaluate(&ast, params)?;
        debug!("{} evaluated to {}", source, result);
        Ok(result)
    }

    /// Evaluates one tree against many parameter sets in parallel. Results
    /// come back in the order of `contexts`.
    pub fn evaluate_batch(&self, ast: &ASTNode, contexts: &[Parameters]) -> Vec<Result<f64, EvalError>> {
        debug!("Evaluating against {} parameter sets", contexts.len());
        contexts
            .par_iter()
            .map(|params| self.evaluate(ast, params))
            .collect()
    }

    /// Infix text that parses back to an equivalent tree.
    pub fn render(&self, ast: &ASTNode, params: Option<&Parameters>) -> String {
        self.printer(RenderStyle::Infix).render(ast, params)
    }

    pub fn render_latex(&self, ast: &ASTNode, params: Option<&Parameters>) -> String {
        self.printer(RenderStyle::Latex).render(ast, params)
    }
}

/// Parses and evaluates `expression` with the standard function library.
pub fn evaluate_expression(expression: &str, params: &Parameters) -> Result<f64, Error> {
    Engine::standard()?.evaluate_expression(expression, params)
}
