use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vidpipe_common::{Frame, StageRegistry};
use vidpipe_lexer::lex;
use vidpipe_parser::parse;

fn registry() -> StageRegistry {
    let mut registry = StageRegistry::new();
    registry.register_fn("src", true, false, || |_: Option<Frame>| None);
    registry.register_fn("xform", false, false, || |input: Option<Frame>| input);
    registry.register_fn("sink", false, true, || |input: Option<Frame>| input);
    registry
}

fn wide_fan_out_source(branches: usize) -> String {
    let joined = (0..branches)
        .map(|_| "xform")
        .collect::<Vec<_>>()
        .join(" &> ");
    format!("src -> {joined}")
}

fn bench_build_graph(c: &mut Criterion) {
    let registry = registry();

    c.bench_function("build_graph/linear_pipeline", |b| {
        let tree = parse(lex("src -> xform -> xform -> xform -> sink")).unwrap();
        b.iter(|| vidpipe_graph::build_graph(black_box(&tree), black_box(&registry)).unwrap());
    });

    c.bench_function("build_graph/wide_fan_out", |b| {
        let tree = parse(lex(&wide_fan_out_source(32))).unwrap();
        b.iter(|| vidpipe_graph::build_graph(black_box(&tree), black_box(&registry)).unwrap());
    });
}

criterion_group!(benches, bench_build_graph);
criterion_main!(benches);
