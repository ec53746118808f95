use super::joined;
use crate::ast::{FunctionDefinition, Registry};
use crate::error::RegistryError;
use mathast_macros::expr_fn;

pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(
        "sqrt",
        FunctionDefinition::new(SQRT_ARITY, sqrt)
            .with_latex(|ctx, args| format!("\\sqrt{{{}}}", joined(ctx, args))),
    )?;
    registry.register(
        "abs",
        FunctionDefinition::new(ABS_ARITY, abs)
            .with_latex(|ctx, args| format!("\\left|{}\\right|", joined(ctx, args))),
    )?;
    registry.register(
        "exp",
        FunctionDefinition::new(EXP_ARITY, exp)
            .with_latex(|ctx, args| format!("e^{{{}}}", joined(ctx, args))),
    )?;
    registry.register(
        "ln",
        FunctionDefinition::new(LN_ARITY, ln)
            .with_latex(|ctx, args| format!("\\ln\\left({}\\right)", joined(ctx, args))),
    )?;
    registry.register(
        "log10",
        FunctionDefinition::new(LOG10_ARITY, log10)
            .with_latex(|ctx, args| format!("\\log_{{10}}\\left({}\\right)", joined(ctx, args))),
    )?;
    registry.register(
        "floor",
        FunctionDefinition::new(FLOOR_ARITY, floor)
            .with_latex(|ctx, args| format!("\\left\\lfloor {}\\right\\rfloor", joined(ctx, args))),
    )?;
    registry.register(
        "ceil",
        FunctionDefinition::new(CEIL_ARITY, ceil)
            .with_latex(|ctx, args| format!("\\left\\lceil {}\\right\\rceil", joined(ctx, args))),
    )?;
    registry.register("round", FunctionDefinition::new(ROUND_ARITY, round))?;
    Ok(())
}

// Out-of-domain inputs produce NaN, the same way `^` does.

#[expr_fn]
pub fn sqrt(x: f64) -> f64 {
    x.sqrt()
}

#[expr_fn]
pub fn abs(x: f64) -> f64 {
    x.abs()
}

#[expr_fn]
pub fn exp(x: f64) -> f64 {
    x.exp()
}

#[expr_fn]
pub fn ln(x: f64) -> f64 {
    x.ln()
}

#[expr_fn]
pub fn log10(x: f64) -> f64 {
    x.log10()
}

#[expr_fn]
pub fn floor(x: f64) -> f64 {
    x.floor()
}

#[expr_fn]
pub fn ceil(x: f64) -> f64 {
    x.ceil()
}

/// Rounds half away from zero.
#[expr_fn]
pub fn round(x: f64) -> f64 {
    x.round()
}
