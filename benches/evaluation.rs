use criterion::{black_box, criterion_group, criterion_main, Criterion};
use evalexpr::*;
use mathast_rs::ast::Parameters;
use mathast_rs::Engine;

/// Benchmark simple arithmetic expressions
fn benchmark_simple_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("Simple arithmetic Expression Evaluation");

    let engine = Engine::new();
    let params = Parameters::new();

    let expr = "2 + 3 * 4";
    let parsed = engine.parse_expression(expr).unwrap();
    let precompiled_evalexpr = build_operator_tree::<DefaultNumericTypes>(expr).unwrap();

    group.bench_function("parsed_arithmetic", |b| {
        b.iter(|| engine.evaluate_expression(black_box(expr), black_box(&params)))
    });

    group.bench_function("preparsed_arithmetic", |b| {
        b.iter(|| engine.evaluate(black_box(&parsed), black_box(&params)))
    });

    group.bench_function("native_rust_arithmetic", |b| {
        b.iter(|| black_box(2.0 + 3.0 * 4.0))
    });

    group.bench_function("meval_arithmetic", |b| {
        b.iter(|| meval::eval_str(black_box(expr)).unwrap())
    });

    group.bench_function("evalexpr_arithmetic", |b| {
        b.iter(|| evalexpr::eval(black_box(expr)).unwrap())
    });

    group.bench_function("precompiled_evalexpr_arithmetic", |b| {
        b.iter(|| precompiled_evalexpr.eval().unwrap())
    });
}

/// Benchmark complex arithmetic expressions
fn benchmark_complex_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("Complex arithmetic Expression Evaluation");

    let engine = Engine::new();
    let params = Parameters::new();

    let expr = "(10 + 20) * 3 / (4 - 1) + 5";
    let parsed = engine.parse_expression(expr).unwrap();
    let precompiled_evalexpr = build_operator_tree::<DefaultNumericTypes>(expr).unwrap();

    group.bench_function("parsed_complex_arithmetic", |b| {
        b.iter(|| engine.evaluate_expression(black_box(expr), black_box(&params)))
    });

    group.bench_function("preparsed_complex_arithmetic", |b| {
        b.iter(|| engine.evaluate(black_box(&parsed), black_box(&params)))
    });

    group.bench_function("native_rust_complex_arithmetic", |b| {
        b.iter(|| black_box((10.0 + 20.0) * 3.0 / (4.0 - 1.0) + 5.0))
    });

    group.bench_function("meval_arithmetic", |b| {
        b.iter(|| meval::eval_str(black_box(expr)).unwrap())
    });

    group.bench_function("evalexpr_arithmetic", |b| {
        b.iter(|| evalexpr::eval(black_box(expr)).unwrap())
    });

    group.bench_function("precompiled_evalexpr_arithmetic", |b| {
        b.iter(|| precompiled_evalexpr.eval().unwrap())
    });
}

/// Benchmark variable substitution, plain and through string bindings
fn benchmark_variable_substitution(c: &mut Criterion) {
    let mut group = c.benchmark_group("Variable Substitution Evaluation");

    let engine = Engine::new();
    let expr = "x * x + y";
    let parsed = engine.parse_expression(expr).unwrap();

    let numbers = Parameters::new().with("x", 3).with("y", 1.5);
    let nested = Parameters::new()
        .with("x", "a + 1")
        .with("a", 2)
        .with("y", "x / 2");

    group.bench_function("numeric_bindings", |b| {
        b.iter(|| engine.evaluate(black_box(&parsed), black_box(&numbers)))
    });

    group.bench_function("expression_bindings", |b| {
        b.iter(|| engine.evaluate(black_box(&parsed), black_box(&nested)))
    });

    let contexts: Vec<Parameters> = (0..1_000).map(|i| numbers.with_binding("x", i)).collect();
    group.bench_function("batch_numeric_bindings", |b| {
        b.iter(|| engine.evaluate_batch(black_box(&parsed), black_box(&contexts)))
    });
}

/// Benchmark function calls
fn benchmark_function_calls(c: &mut Criterion) {
    let mut group = c.benchmark_group("Function Call Evaluation");

    let engine = Engine::standard().unwrap();
    let params = Parameters::new();

    let expr = "sqrt(16) + max(1, 2, 3)";
    let parsed = engine.parse_expression(expr).unwrap();

    group.bench_function("parsed_function_call", |b| {
        b.iter(|| engine.evaluate_expression(black_box(expr), black_box(&params)))
    });

    group.bench_function("preparsed_function_call", |b| {
        b.iter(|| engine.evaluate(black_box(&parsed), black_box(&params)))
    });

    group.bench_function("native_rust_function_call", |b| {
        b.iter(|| black_box(16.0f64.sqrt() + 3.0f64.max(2.0).max(1.0)))
    });

    group.bench_function("meval_function_call", |b| {
        b.iter(|| meval::eval_str(black_box("sqrt(16) + max(1, 2, 3)")).unwrap())
    });
}

/// Benchmark rendering
fn benchmark_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("Rendering");

    let engine = Engine::standard().unwrap();
    let parsed = engine
        .parse_expression("(a + b)/c * sqrt(d^2 + 1) % 7")
        .unwrap();

    group.bench_function("render_infix", |b| {
        b.iter(|| engine.render(black_box(&parsed), None))
    });

    group.bench_function("render_latex", |b| {
        b.iter(|| engine.render_latex(black_box(&parsed), None))
    });
}

/// Grouping benchmarks
criterion_group!(
    benches,
    benchmark_simple_arithmetic,
    benchmark_complex_arithmetic,
    benchmark_variable_substitution,
    benchmark_function_calls,
    benchmark_rendering,
);
criterion_main!(benches);
