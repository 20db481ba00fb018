//! Throughput of each compile stage on a generated module.

use cobra_syntax::{compile, input::parse_tokens, tokenize};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

/// A module with `n` handler functions, each mixing calls, lambdas,
/// dict literals and an if chain.
fn generate_module(n: usize) -> String {
    let mut source = String::new();
    for i in 0..n {
        source.push_str(&format!(
            "def handler_{i}(event, opts):\n\
             \x20   target = event.target\n\
             \x20   if target is None:\n\
             \x20       return None\n\
             \x20   elif opts.mode == 'fast':\n\
             \x20       count = (opts.count + {i}) * 2\n\
             \x20   else:\n\
             \x20       count = {i}\n\
             \x20   target.on(\"click\", lambda e: send({{\"id\": {i}, \"count\": count}}))\n\
             \x20   return [target, count]\n\n"
        ));
    }
    source
}

fn bench_pipeline(c: &mut Criterion) {
    for size in [10, 200] {
        let source = generate_module(size);
        let tokens = tokenize(&source).expect("tokenize");

        c.bench_function(&format!("pipeline_tokenize_{size}"), |b| {
            b.iter(|| {
                let out = tokenize(black_box(&source)).expect("tokenize");
                black_box(out);
            })
        });

        c.bench_function(&format!("pipeline_parse_only_{size}"), |b| {
            b.iter(|| {
                let out = parse_tokens(black_box(&tokens)).expect("parse");
                black_box(out);
            })
        });

        c.bench_function(&format!("pipeline_compile_{size}"), |b| {
            b.iter(|| {
                let out = compile(black_box(&source)).expect("compile");
                black_box(out);
            })
        });
    }
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
