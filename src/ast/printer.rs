use crate::ast::context::Frame;
use crate::ast::operator::lookup_operator;
use crate::ast::{parse_expression, ASTNode, Binding, ParseCache, Parameters, Registry};
use crate::config::EngineConfig;
use log::debug;
use std::sync::Arc;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum RenderStyle {
    /// Linear infix text that parses back to an equivalent tree.
    #[default]
    Infix,
    Latex,
}

/// Renders a tree back to text. Never fails: names that cannot be resolved
/// are printed as written.
pub struct Printer<'a> {
    registry: &'a Registry,
    config: EngineConfig,
    cache: Option<&'a ParseCache>,
    style: RenderStyle,
}

impl<'a> Printer<'a> {
    pub fn new(registry: &'a Registry, config: EngineConfig, style: RenderStyle) -> Self {
        Self {
            registry,
            config,
            cache: None,
            style,
        }
    }

    pub(crate) fn with_cache(mut self, cache: Option<&'a ParseCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn style(&self) -> RenderStyle {
        self.style
    }

    pub fn render(&self, ast: &ASTNode, params: Option<&Parameters>) -> String {
        self.print(ast, Frame::new(params))
    }

    fn print(&self, ast: &ASTNode, frame: Frame<'_>) -> String {
        if frame.depth >= self.config.max_eval_depth {
            debug!("Tree deeper than {} levels, eliding the rest", self.config.max_eval_depth);
            return "...".to_string();
        }
        let frame = frame.deeper();
        match ast {
            ASTNode::Number { value, rendering } => {
                if self.style == RenderStyle::Latex && !value.is_finite() {
                    format_number(*value, self.style)
                } else {
                    rendering.clone()
                }
            }

            ASTNode::Constant { name, rendering, .. } => match self.style {
                RenderStyle::Infix => rendering.clone(),
                RenderStyle::Latex => self
                    .registry
                    .display_form(name)
                    .unwrap_or(rendering)
                    .to_string(),
            },

            ASTNode::Variable(name) => self.print_variable(name, frame),

            ASTNode::BinaryOperation {
                left: left_node,
                operator,
                right: right_node,
                parenthesized,
            } => {
                let left = self.print_operand(ast, left_node, Side::Left, frame);
                let right = self.print_operand(ast, right_node, Side::Right, frame);
                let text = match lookup_operator(*operator) {
                    Some(op) => match self.style {
                        RenderStyle::Infix => (op.render)(&left, &right),
                        RenderStyle::Latex => (op.latex)(&left, &right),
                    },
                    None => format!("{left} {operator} {right}"),
                };
                if *parenthesized {
                    self.wrap(&text)
                } else {
                    text
                }
            }

            ASTNode::FunctionCall { name, args } => {
                let definition = self.registry.function(name);
                let custom = definition.and_then(|definition| match self.style {
                    RenderStyle::Infix => definition.render(),
                    RenderStyle::Latex => definition.latex(),
                });
                match custom {
                    Some(render) => {
                        let context = RenderContext {
                            printer: self,
                            name,
                            frame,
                        };
                        render(&context, args)
                    }
                    None => {
                        let args: Vec<String> = args.iter().map(|arg| self.print(arg, frame)).collect();
                        default_call(self.style, name, &args)
                    }
                }
            }
        }
    }

    /// Prints one side of `parent`, adding the parentheses the parser needs to
    /// rebuild the same tree when the child's hint does not already supply them.
    fn print_operand(&self, parent: &ASTNode, child: &ASTNode, side: Side, frame: Frame<'_>) -> String {
        let text = self.print(child, frame);
        if self.needs_parens(parent, child, side) {
            self.wrap(&text)
        } else {
            text
        }
    }

    fn needs_parens(&self, parent: &ASTNode, child: &ASTNode, side: Side) -> bool {
        let ASTNode::BinaryOperation { operator: outer, .. } = parent else {
            return false;
        };
        let ASTNode::BinaryOperation {
            operator: inner,
            parenthesized: false,
            ..
        } = child
        else {
            return false;
        };
        // A negation reads as a single operand wherever it appears, and the
        // modulo renderers bracket themselves.
        if child.is_negation() || *inner == '%' {
            return false;
        }
        if parent.is_negation() {
            return true;
        }
        if self.style == RenderStyle::Latex && (*outer == '/' || (*outer == '^' && side == Side::Right)) {
            return false;
        }
        match (lookup_operator(*outer), lookup_operator(*inner)) {
            (Some(outer), Some(inner)) => {
                inner.precedence < outer.precedence
                    || (side == Side::Right && inner.precedence == outer.precedence)
            }
            _ => false,
        }
    }

    fn print_variable(&self, name: &str, frame: Frame<'_>) -> String {
        let Some(binding) = frame.params.and_then(|params| params.get(name)) else {
            return name.to_string();
        };

        let node = match binding {
            Binding::Int(value) => return value.to_string(),
            Binding::UInt(value) => return value.to_string(),
            Binding::Float(value) => return format_number(*value, self.style),
            Binding::Source(source) => match self.reparse(source) {
                Some(node) => node,
                None => {
                    debug!("Binding for `{}` does not parse, printing the name", name);
                    return name.to_string();
                }
            },
            Binding::Node(node) => Arc::clone(node),
        };

        let link = match frame.enter(name, self.config.max_substitution_depth) {
            Ok(link) => link,
            Err(err) => {
                debug!("Not substituting `{}`: {}", name, err);
                return name.to_string();
            }
        };
        let text = self.print(&node, frame.nested(&link));
        if matches!(*node, ASTNode::BinaryOperation { parenthesized: false, .. }) {
            self.wrap(&text)
        } else {
            text
        }
    }

    fn wrap(&self, text: &str) -> String {
        match self.style {
            RenderStyle::Infix => format!("({text})"),
            RenderStyle::Latex => format!("\\left({text}\\right)"),
        }
    }

    fn reparse(&self, source: &str) -> Option<Arc<ASTNode>> {
        let parse = |source: &str| parse_expression(source, self.registry, self.config.max_parse_depth);
        let parsed = match self.cache {
            Some(cache) => cache.get_or_parse(source, parse),
            None => parse(source).map(Arc::new),
        };
        parsed.ok()
    }
}

/// Text for `value`. In infix style it parses back to the same value: the
/// non-finite values have no literal, so they are written as expressions.
pub(crate) fn format_number(value: f64, style: RenderStyle) -> String {
    match style {
        RenderStyle::Infix if value.is_nan() => "((-1)^0.5)".to_string(),
        RenderStyle::Infix if value.is_infinite() => {
            if value > 0.0 { "1e999" } else { "-1e999" }.to_string()
        }
        RenderStyle::Latex if value.is_nan() => "\\mathrm{NaN}".to_string(),
        RenderStyle::Latex if value.is_infinite() => {
            if value > 0.0 { "\\infty" } else { "-\\infty" }.to_string()
        }
        _ => value.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

fn default_call(style: RenderStyle, name: &str, args: &[String]) -> String {
    let args = args.join(", ");
    match style {
        RenderStyle::Infix => format!("{name}({args})"),
        RenderStyle::Latex => format!("\\operatorname{{{name}}}\\left({args}\\right)"),
    }
}

/// Handed to a function's custom renderer.
pub struct RenderContext<'a> {
    printer: &'a Printer<'a>,
    name: &'a str,
    frame: Frame<'a>,
}

impl RenderContext<'_> {
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn style(&self) -> RenderStyle {
        self.printer.style
    }

    pub fn render(&self, ast: &ASTNode) -> String {
        self.printer.print(ast, self.frame)
    }

    pub fn render_all(&self, args: &[ASTNode]) -> Vec<String> {
        args.iter().map(|arg| self.render(arg)).collect()
    }

    /// The rendering used when a function has no renderer of its own.
    pub fn default_rendering(&self, args: &[ASTNode]) -> String {
        default_call(self.style(), self.name, &self.render_all(args))
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FunctionDefinition, VARIADIC};

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register("max", FunctionDefinition::new(VARIADIC, |_, _| Ok(0.0)))
            .unwrap();
        registry
            .register(
                "abs",
                FunctionDefinition::new(1, |_, _| Ok(0.0))
                    .with_latex(|ctx, args| format!("\\left|{}\\right|", ctx.render(&args[0]))),
            )
            .unwrap();
        registry
            .register_function("half", 1, |_, _| Ok(0.0), |ctx, args| {
                format!("{}/2", ctx.render(&args[0]))
            })
            .unwrap();
        registry
    }

    fn render_with(source: &str, params: Option<&Parameters>, style: RenderStyle) -> String {
        let registry = registry();
        let ast = parse_expression(source, &registry, 64).unwrap();
        Printer::new(&registry, EngineConfig::default(), style).render(&ast, params)
    }

    fn render(source: &str, params: Option<&Parameters>) -> String {
        render_with(source, params, RenderStyle::Infix)
    }

    #[test]
    fn test_infix_operators() {
        assert_eq!(render("1+2*3", None), "1 + 2 * 3");
        assert_eq!(render("a/b^2", None), "a/b^2");
        assert_eq!(render("7%3", None), "(7 % 3)");
        assert_eq!(render("x-y", None), "x - y");
    }

    #[test]
    fn test_parenthesized_hint_preserved() {
        assert_eq!(render("(1+2)*3", None), "(1 + 2) * 3");
        assert_eq!(render("((x))", None), "x");
        assert_eq!(render("1-(2-3)", None), "1 - (2 - 3)");
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(render("-5+2", None), "-5 + 2");
        assert_eq!(render("2*-x", None), "2 * -x");
        assert_eq!(render("-(1+x)", None), "-(1 + x)");
    }

    #[test]
    fn test_literals_keep_their_text() {
        assert_eq!(render("1_000.50 + 1e-5", None), "1000.50 + 1e-5");
    }

    #[test]
    fn test_constants() {
        assert_eq!(render("2*pi", None), "2 * pi");
        assert_eq!(render_with("2*pi", None, RenderStyle::Latex), "2 \\times \\pi");
    }

    #[test]
    fn test_unbound_variable_renders_name() {
        assert_eq!(render("y+1", Some(&Parameters::new())), "y + 1");
        assert_eq!(render("y+1", None), "y + 1");
    }

    #[test]
    fn test_bound_variables() {
        let params = Parameters::new().with("x", 5).with("r", 0.5).with("n", 7u32);
        assert_eq!(render("x+r*n", Some(&params)), "5 + 0.5 * 7");
    }

    #[test]
    fn test_string_binding_is_reparsed() {
        let params = Parameters::new().with("area", "w*h").with("w", 3);
        assert_eq!(render("area*2", Some(&params)), "(3 * h) * 2");
        let params = Parameters::new().with("side", "(a+b)");
        assert_eq!(render("side^2", Some(&params)), "(a + b)^2");
        let params = Parameters::new().with("k", "pi");
        assert_eq!(render("k", Some(&params)), "pi");
    }

    #[test]
    fn test_invalid_string_binding_falls_back_to_name() {
        let params = Parameters::new().with("x", "1 +");
        assert_eq!(render("x*2", Some(&params)), "x * 2");
    }

    #[test]
    fn test_cyclic_binding_falls_back_to_name() {
        let params = Parameters::new().with("x", "x+1");
        assert_eq!(render("x", Some(&params)), "(x + 1)");
    }

    #[test]
    fn test_node_binding() {
        let params = Parameters::new().with("t", ASTNode::negate(ASTNode::variable("s")));
        assert_eq!(render("t", Some(&params)), "(-s)");
    }

    #[test]
    fn test_built_trees_get_needed_parens() {
        let registry = registry();
        let printer = Printer::new(&registry, EngineConfig::default(), RenderStyle::Infix);
        let a = || ASTNode::variable("a");
        let one = || ASTNode::number(1.0);

        let sum_times = ASTNode::binary('*', ASTNode::binary('+', a(), one()), ASTNode::number(2.0));
        assert_eq!(printer.render(&sum_times, None), "(a + 1) * 2");

        let nested_minus = ASTNode::binary('-', a(), ASTNode::binary('-', one(), a()));
        assert_eq!(printer.render(&nested_minus, None), "a - (1 - a)");
        let left_minus = ASTNode::binary('-', ASTNode::binary('-', a(), one()), a());
        assert_eq!(printer.render(&left_minus, None), "a - 1 - a");

        let power = ASTNode::binary('^', a(), ASTNode::binary('*', one(), a()));
        assert_eq!(printer.render(&power, None), "a^(1 * a)");
        let negated = ASTNode::negate(ASTNode::binary('^', a(), ASTNode::number(2.0)));
        assert_eq!(printer.render(&negated, None), "-(a^2)");
        let modulo = ASTNode::binary('*', ASTNode::binary('%', a(), one()), a());
        assert_eq!(printer.render(&modulo, None), "(a % 1) * a");
    }

    #[test]
    fn test_node_binding_reparses_to_same_value() {
        let registry = registry();
        let inner = ASTNode::binary(
            '*',
            ASTNode::binary('+', ASTNode::variable("a"), ASTNode::number(1.0)),
            ASTNode::number(2.0),
        );
        let params = Parameters::new().with("b", inner).with("a", 3);
        let printer = Printer::new(&registry, EngineConfig::default(), RenderStyle::Infix);
        let text = printer.render(&ASTNode::variable("b"), Some(&params));
        assert_eq!(text, "((3 + 1) * 2)");

        let reparsed = parse_expression(&text, &registry, 64).unwrap();
        let evaluator = crate::ast::Evaluator::new(&registry, EngineConfig::default());
        assert_eq!(evaluator.evaluate(&reparsed, None), Ok(8.0));
    }

    #[test]
    fn test_latex_skips_parens_inside_fractions_and_exponents() {
        let registry = registry();
        let printer = Printer::new(&registry, EngineConfig::default(), RenderStyle::Latex);
        let sum = || ASTNode::binary('+', ASTNode::variable("a"), ASTNode::variable("b"));
        let ratio = ASTNode::binary('/', sum(), ASTNode::variable("c"));
        assert_eq!(printer.render(&ratio, None), "\\frac{a + b}{c}");
        let power = ASTNode::binary('^', ASTNode::variable("c"), sum());
        assert_eq!(printer.render(&power, None), "c^{a + b}");
        let product = ASTNode::binary('*', sum(), ASTNode::variable("c"));
        assert_eq!(printer.render(&product, None), "\\left(a + b\\right) \\times c");
    }

    #[test]
    fn test_non_finite_bindings() {
        let params = Parameters::new()
            .with("p", f64::INFINITY)
            .with("m", f64::NEG_INFINITY)
            .with("q", f64::NAN);
        assert_eq!(render("p + m", Some(&params)), "1e999 + -1e999");
        assert_eq!(render("2^q", Some(&params)), "2^((-1)^0.5)");
        assert_eq!(
            render_with("p - q", Some(&params), RenderStyle::Latex),
            "\\infty - \\mathrm{NaN}"
        );

        let registry = registry();
        let evaluator = crate::ast::Evaluator::new(&registry, EngineConfig::default());
        let back = |text: &str| evaluator.evaluate(&parse_expression(text, &registry, 64).unwrap(), None);
        assert_eq!(back(&render("p", Some(&params))), Ok(f64::INFINITY));
        assert_eq!(back(&render("m", Some(&params))), Ok(f64::NEG_INFINITY));
        assert!(back(&render("2^q", Some(&params))).unwrap().is_nan());
    }

    #[test]
    fn test_overly_deep_tree_is_elided() {
        let registry = registry();
        let config = EngineConfig::default().with_max_eval_depth(8);
        let printer = Printer::new(&registry, config, RenderStyle::Infix);
        let mut ast = ASTNode::number(1.0);
        for _ in 0..20 {
            ast = ASTNode::binary('+', ast, ASTNode::number(1.0));
        }
        let text = printer.render(&ast, None);
        assert!(text.starts_with("... + ... + 1"), "{text}");
        assert!(text.ends_with(" + 1 + 1"), "{text}");
    }

    #[test]
    fn test_function_rendering() {
        assert_eq!(render("max(1, x, 2+3)", None), "max(1, x, 2 + 3)");
        assert_eq!(render("half(x)", None), "x/2");
        assert_eq!(render("abs(x)", None), "abs(x)");
        assert_eq!(
            render_with("abs(x)", None, RenderStyle::Latex),
            "\\left|x\\right|"
        );
        assert_eq!(
            render_with("max(1, x)", None, RenderStyle::Latex),
            "\\operatorname{max}\\left(1, x\\right)"
        );
    }

    #[test]
    fn test_latex_operators() {
        assert_eq!(
            render_with("(a+b)/c*d^2", None, RenderStyle::Latex),
            "\\frac{\\left(a + b\\right)}{c} \\times d^{2}"
        );
        assert_eq!(render_with("a%b", None, RenderStyle::Latex), "(a \\bmod b)");
    }

    #[test]
    fn test_unregistered_function_and_operator() {
        let registry = Registry::new();
        let printer = Printer::new(&registry, EngineConfig::default(), RenderStyle::Infix);
        let ast = ASTNode::binary(
            '&',
            ASTNode::call("ghost", vec![ASTNode::number(1.0)]),
            ASTNode::number(2.0),
        );
        assert_eq!(printer.render(&ast, None), "ghost(1) & 2");
    }
}
