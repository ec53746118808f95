use log::debug;
use mathast_macros::expr_fn;
use mathast_rs::ast::{FunctionDefinition, Parameters};
use mathast_rs::error::EvalError;
use mathast_rs::Engine;

#[expr_fn]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[expr_fn]
fn safediv(a: f64, b: f64) -> Result<f64, EvalError> {
    if b == 0.0 {
        return Err(EvalError::Function {
            name: "safediv".to_string(),
            message: "denominator is zero".to_string(),
        });
    }
    Ok(a / b)
}

fn main() {
    pretty_env_logger::init();

    let mut engine = Engine::standard().expect("standard library registers");
    engine
        .registry_mut()
        .register("lerp", FunctionDefinition::new(LERP_ARITY, lerp))
        .expect("lerp is not registered yet");
    engine
        .registry_mut()
        .register_function("safediv", SAFEDIV_ARITY, safediv, |ctx, args| {
            ctx.render_all(args).join(" ÷ ")
        })
        .expect("safediv is not registered yet");

    let params = Parameters::new().with("x", 4).with("y", 0.5);

    let expression = "lerp(0, 10, y) + sqrt(x) * 2^3";
    let ast = engine.parse_expression(expression).expect("Failed to parse");
    debug!("ast: {ast:#?}");

    println!("{} = {:?}", engine.render(&ast, None), engine.evaluate(&ast, &params));
    println!("with values: {}", engine.render(&ast, Some(&params)));
    println!("latex: {}", engine.render_latex(&ast, None));

    match engine.evaluate_expression("safediv(x, y - 0.5)", &params) {
        Ok(result) => println!("Result: {}", result),
        Err(err) => println!("Error: {}", err),
    }

    if let Err(err) = engine.parse_expression("lerp(1, 2) + (3") {
        println!("{err}");
    }
}
