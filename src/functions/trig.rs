use super::joined;
use crate::ast::{FunctionDefinition, Registry};
use crate::error::RegistryError;
use mathast_macros::expr_fn;

pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(
        "sin",
        FunctionDefinition::new(SIN_ARITY, sin)
            .with_latex(|ctx, args| format!("\\sin\\left({}\\right)", joined(ctx, args))),
    )?;
    registry.register(
        "cos",
        FunctionDefinition::new(COS_ARITY, cos)
            .with_latex(|ctx, args| format!("\\cos\\left({}\\right)", joined(ctx, args))),
    )?;
    registry.register(
        "tan",
        FunctionDefinition::new(TAN_ARITY, tan)
            .with_latex(|ctx, args| format!("\\tan\\left({}\\right)", joined(ctx, args))),
    )?;
    registry.register("atan2", FunctionDefinition::new(ATAN2_ARITY, atan2))?;
    registry.register("hypot", FunctionDefinition::new(HYPOT_ARITY, hypot))?;
    Ok(())
}

#[expr_fn]
pub fn sin(x: f64) -> f64 {
    x.sin()
}

#[expr_fn]
pub fn cos(x: f64) -> f64 {
    x.cos()
}

#[expr_fn]
pub fn tan(x: f64) -> f64 {
    x.tan()
}

/// Angle of the point `(x, y)`, in radians.
#[expr_fn]
pub fn atan2(y: f64, x: f64) -> f64 {
    y.atan2(x)
}

#[expr_fn]
pub fn hypot(x: f64, y: f64) -> f64 {
    x.hypot(y)
}
