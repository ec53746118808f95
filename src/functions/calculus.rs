use super::joined;
use crate::ast::{ASTNode, CallContext, FunctionDefinition, Registry};
use crate::error::{EvalError, RegistryError};
use log::trace;

pub const DIFF_ARITY: i32 = 1;

pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(
        "diff",
        FunctionDefinition::new(DIFF_ARITY, diff).with_latex(|ctx, args| {
            match ctx.differentiation_names().as_slice() {
                [name] => format!("\\frac{{d}}{{d{}}}\\left({}\\right)", name, joined(ctx, args)),
                // Zero or several differentiation variables: plain call form.
                _ => ctx.default_rendering(args),
            }
        }),
    )?;
    Ok(())
}

/// Derivative of the argument with respect to the single differentiation
/// variable of the caller's parameters, by central difference.
pub fn diff(call: &CallContext<'_>, args: &[ASTNode]) -> Result<f64, EvalError> {
    let [expr] = args else {
        return Err(EvalError::ArgumentCount {
            name: call.name().to_string(),
            expected: 1,
            found: args.len(),
        });
    };
    let names = call.differentiation_names();
    let [name] = names.as_slice() else {
        return Err(call.error(format!(
            "needs exactly one differentiation variable, found {}",
            names.len()
        )));
    };
    let params = call
        .parameters()
        .ok_or_else(|| EvalError::MissingContext(name.to_string()))?;

    let x = call.eval(&ASTNode::variable(*name))?;
    let h = 1e-6 * x.abs().max(1.0);
    trace!("Differentiating at {} = {} with step {}", name, x, h);

    let ahead = call.eval_with(expr, &params.with_binding(name, x + h))?;
    let behind = call.eval_with(expr, &params.with_binding(name, x - h))?;
    Ok((ahead - behind) / (2.0 * h))
}
