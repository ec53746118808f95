pub mod aggregate;
pub mod calculus;
pub mod elementary;
pub mod trig;

use crate::ast::{Registry, RenderContext};
use crate::error::RegistryError;

/// Registers the standard function library into `registry`.
pub fn register_functions(registry: &mut Registry) -> Result<(), RegistryError> {
    elementary::register(registry)?;
    trig::register(registry)?;
    aggregate::register(registry)?;
    calculus::register(registry)?;
    Ok(())
}

/// A registry holding the standard library on top of the default constants.
pub fn standard_registry() -> Result<Registry, RegistryError> {
    let mut registry = Registry::new();
    register_functions(&mut registry)?;
    Ok(registry)
}

// Arguments rendered and joined, for renderers that wrap the whole list.
fn joined(ctx: &RenderContext<'_>, args: &[crate::ast::ASTNode]) -> String {
    ctx.render_all(args).join(", ")
}
