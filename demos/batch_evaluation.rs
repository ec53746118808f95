use mathast_rs::ast::Parameters;
use mathast_rs::Engine;

fn main() {
    pretty_env_logger::init();

    let engine = Engine::standard().expect("standard library registers");
    let ast = engine
        .parse_expression("principal * (1 + rate/12)^months - principal")
        .expect("Failed to parse");

    let contexts: Vec<Parameters> = (1..=10)
        .map(|years| {
            Parameters::new()
                .with("principal", 10_000)
                .with("rate", 0.045)
                .with("months", years * 12)
        })
        .collect();

    for (i, result) in engine.evaluate_batch(&ast, &contexts).into_iter().enumerate() {
        match result {
            Ok(interest) => println!("Year {}: {:.2}", i + 1, interest),
            Err(err) => println!("Year {}: {}", i + 1, err),
        }
    }
}
