use mathast_rs::ast::{ASTNode, Parameters};
use mathast_rs::Engine;

fn main() {
    pretty_env_logger::init();

    let engine = Engine::standard().expect("standard library registers");

    // Built by hand: 2 * (w + h)
    let perimeter = ASTNode::binary(
        '*',
        ASTNode::number(2.0),
        ASTNode::binary('+', ASTNode::variable("w"), ASTNode::variable("h")).grouped(),
    );
    println!("perimeter = {}", engine.render(&perimeter, None));

    // Variables may be bound to other expressions, as source or as trees.
    let params = Parameters::new()
        .with("w", 3)
        .with("h", "w * 2")
        .with("p", perimeter.clone());

    match engine.evaluate(&perimeter, &params) {
        Ok(result) => println!("Result: {}", result),
        Err(err) => println!("Error: {}", err),
    }

    let area = engine.parse_expression("p^2/(4*pi)").expect("Failed to parse");
    println!("{} = {:?}", engine.render(&area, Some(&params)), engine.evaluate(&area, &params));

    let cyclic = Parameters::new().with("a", "b + 1").with("b", "a + 1");
    match engine.evaluate_expression("a", &cyclic) {
        Ok(result) => println!("Result: {}", result),
        Err(err) => println!("Error: {}", err),
    }
}
