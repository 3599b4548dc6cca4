//! Benchmarks for the model-response normalization path.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use litscope::normalize;

const BARE: &str = r#"{
  "title": "Moby-Dick",
  "author": "Herman Melville",
  "characters": [
    {"name": "Ishmael", "importance": 0.8, "description": "Narrator",
     "moral_category": "observer",
     "relationships": [{"character": "Queequeg", "relationship": "friend"}]},
    {"name": "Ahab", "importance": 1.0, "description": "Monomaniacal captain",
     "moral_category": "antagonist",
     "relationships": [{"character": "Moby Dick", "relationship": "obsession"}]}
  ],
  "themes": ["obsession", "fate", "the sea"],
  "plot_summary": "A whaling voyage becomes a doomed pursuit.",
  "key_events": [
    {"event": "The Pequod sails", "significance": "Voyage begins",
     "characters_involved": ["Ishmael", "Ahab"]}
  ]
}"#;

fn bench_normalize(c: &mut Criterion) {
    let fenced = format!("```json\n{BARE}\n```");
    let prose = format!("Here is the analysis you asked for: {BARE} Let me know if you need more!");

    let mut group = c.benchmark_group("normalize");
    group.bench_function("bare_object", |b| {
        b.iter(|| normalize(black_box(BARE), 1000).unwrap())
    });
    group.bench_function("fenced", |b| {
        b.iter(|| normalize(black_box(&fenced), 1000).unwrap())
    });
    group.bench_function("prose_wrapped", |b| {
        b.iter(|| normalize(black_box(&prose), 1000).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
