//! Generation benchmarks over synthetic cost trees.
//!
//! Measures parsing, statement generation, lowering to C and the
//! generated-versus-reference cross-check for growing trees.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pwcet::eval::ParamValues;
use pwcet::ir::Param;
use pwcet::{evaluate_tree, generate_tree, lower_program, parse_source_silent, GenerateOptions};

/// `width` loops in sequence, each over a three-block body with an
/// alternative, alternating constant and parametric bounds.
fn synthetic_source(width: u32) -> String {
    let loops: Vec<String> = (0..width)
        .map(|i| {
            let bound = if i % 2 == 0 {
                format!("ConstantBound({})", 3 + i % 5)
            } else {
                format!("ParamBound(\"param_{} + {}\")", i % 4, i)
            };
            format!(
                "Loop(Seq([Constant({i}, [{a}, {b}]), Alt([Constant({i}, [{c}]), Constant({i}, [{d}, 1])]), Constant({i}, [5])]), {i}, {bound})",
                i = i,
                a = 40 + i,
                b = 20 + i % 7,
                c = 12 + i % 3,
                d = 9 + i % 11,
                bound = bound
            )
        })
        .collect();
    format!("Seq([Constant(TOP, [100]), {}])", loops.join(", "))
}

fn all_params(n: i64) -> ParamValues {
    ParamValues::new()
        .with(Param::P0, n)
        .with(Param::P1, n)
        .with(Param::P2, n)
        .with(Param::P3, n)
}

fn bench_parse(c: &mut Criterion) {
    let small = synthetic_source(8);
    let large = synthetic_source(128);

    let mut group = c.benchmark_group("parse");
    group.bench_function("8_loops", |b| b.iter(|| parse_source_silent(black_box(&small))));
    group.bench_function("128_loops", |b| b.iter(|| parse_source_silent(black_box(&large))));
    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    let small = parse_source_silent(&synthetic_source(8)).unwrap();
    let large = parse_source_silent(&synthetic_source(128)).unwrap();

    let mut group = c.benchmark_group("generate");
    group.bench_function("8_loops", |b| b.iter(|| generate_tree(black_box(&small))));
    group.bench_function("128_loops", |b| b.iter(|| generate_tree(black_box(&large))));
    group.finish();
}

fn bench_lower(c: &mut Criterion) {
    let tree = parse_source_silent(&synthetic_source(128)).unwrap();
    let program = generate_tree(&tree).unwrap();
    let c_target = GenerateOptions::default();
    let rust_target = GenerateOptions::for_target("rust");

    let mut group = c.benchmark_group("lower");
    group.bench_function("c", |b| b.iter(|| lower_program(black_box(&program), &c_target)));
    group.bench_function("rust", |b| b.iter(|| lower_program(black_box(&program), &rust_target)));
    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let tree = parse_source_silent(&synthetic_source(32)).unwrap();
    let params = all_params(6);

    c.bench_function("evaluate_32_loops", |b| {
        b.iter(|| evaluate_tree(black_box(&tree), &params))
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_generate,
    bench_lower,
    bench_evaluate
);
criterion_main!(benches);
