use crate::ast::{FunctionDefinition, Registry};
use crate::error::{EvalError, RegistryError};
use mathast_macros::expr_fn;

pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register("min", FunctionDefinition::new(MIN_ARITY, min))?;
    registry.register("max", FunctionDefinition::new(MAX_ARITY, max))?;
    registry.register("sum", FunctionDefinition::new(SUM_ARITY, sum))?;
    registry.register("avg", FunctionDefinition::new(AVG_ARITY, avg))?;
    Ok(())
}

fn no_values(name: &str) -> EvalError {
    EvalError::Function {
        name: name.to_string(),
        message: "needs at least one argument".to_string(),
    }
}

#[expr_fn]
pub fn min(values: Vec<f64>) -> Result<f64, EvalError> {
    values
        .into_iter()
        .reduce(f64::min)
        .ok_or_else(|| no_values("min"))
}

#[expr_fn]
pub fn max(values: Vec<f64>) -> Result<f64, EvalError> {
    values
        .into_iter()
        .reduce(f64::max)
        .ok_or_else(|| no_values("max"))
}

/// Zero for an empty argument list.
#[expr_fn]
pub fn sum(values: Vec<f64>) -> f64 {
    values.iter().sum()
}

#[expr_fn]
pub fn avg(values: Vec<f64>) -> Result<f64, EvalError> {
    if values.is_empty() {
        return Err(no_values("avg"));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use crate::ast::{Parameters, VARIADIC};
    use crate::error::{Error, EvalError};
    use crate::Engine;

    fn eval(source: &str) -> Result<f64, Error> {
        let params = Parameters::new().with("x", 10).with("y", -4);
        Engine::standard().unwrap().evaluate_expression(source, &params)
    }

    #[test]
    fn test_aggregates() {
        assert_eq!(eval("min(3, x, y)").unwrap(), -4.0);
        assert_eq!(eval("max(3, x, y)").unwrap(), 10.0);
        assert_eq!(eval("sum(1, 2, 3, x)").unwrap(), 16.0);
        assert_eq!(eval("avg(x, y)").unwrap(), 3.0);
        assert_eq!(eval("max(7)").unwrap(), 7.0);
    }

    #[test]
    fn test_empty_argument_lists() {
        assert_eq!(eval("sum()").unwrap(), 0.0);
        assert!(matches!(
            eval("min()"),
            Err(Error::Eval(EvalError::Function { ref name, .. })) if name == "min"
        ));
        assert!(eval("avg()").is_err());
    }

    #[test]
    fn test_variadic_arity() {
        assert_eq!(super::MIN_ARITY, VARIADIC);
        assert_eq!(super::SUM_ARITY, VARIADIC);
    }
}
