#![allow(
    clippy::tests_outside_test_module,
    clippy::unwrap_used,
    reason = "benchmark"
)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use tmpltree::{Render, parse, prune_comments, remove_comments};

mod utils;

fn comments_benchmark(c: &mut Criterion) {
    let template_content = include_str!("template_comments.tmpl");

    // Random prefixes often end inside an action, which only the parsing
    // strategy rejects.
    let prefixes = utils::generate_random_prefixes(template_content, 100);

    let mut group = c.benchmark_group("Comment Removal");
    group.sample_size(50);

    group.bench_function("remove_comments", |b| {
        b.iter(|| {
            for prefix in &prefixes {
                black_box(remove_comments(prefix));
            }
        });
    });

    group.bench_function("prune_comments", |b| {
        b.iter(|| {
            for prefix in &prefixes {
                let _ = black_box(prune_comments(prefix));
            }
        });
    });

    group.bench_function("parse_and_render", |b| {
        b.iter(|| {
            let tree = parse("bench.tmpl", template_content).unwrap();
            black_box(tree.render());
        });
    });

    group.finish();
}

criterion_group!(benches, comments_benchmark);
criterion_main!(benches);
