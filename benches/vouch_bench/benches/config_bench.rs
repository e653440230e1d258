//! Rule configuration benchmarks
//!
//! Measures configuration parsing and configured runs.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use vouch::prelude::*;

const RULES: &str = r#"{
    "minimumLength": 1,
    "maximumLength": 8,
    "validProperties": ["id", "name", "tags"],
    "validValueTypes": ["number", "string", "object"],
    "name": "payload"
}"#;

fn bench_parse(c: &mut Criterion) {
    c.bench_function("config/parse", |b| {
        b.iter(|| Validator::from_json_str(black_box(RULES)))
    });

    c.bench_function("config/reject_unknown_key", |b| {
        b.iter(|| Validator::from_json_str(black_box(r#"{ "minimumLength": 1, "colour": "red" }"#)))
    });
}

fn bench_run(c: &mut Criterion) {
    let Ok(validator) = Validator::from_json_str(RULES) else {
        return;
    };
    let document = json!({ "id": 7, "name": "ada", "tags": ["a", "b"] });

    c.bench_function("config/run_object", |b| {
        b.iter(|| {
            validator
                .run(black_box(document.clone()), Domain::Object)
                .map(|chain| chain.confirm())
        })
    });
}

criterion_group!(benches, bench_parse, bench_run);
criterion_main!(benches);
