//! Fluent chain benchmarks
//!
//! Measures per-predicate cost of validation sessions over each domain.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use vouch::prelude::*;

fn bench_string_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("string_chain");

    group.bench_function("email_passing", |b| {
        b.iter(|| {
            let mut chain = validate(black_box("first.last@mail.example.org"));
            chain
                .is_string()
                .and_then(|s| s.with_maximum_length(64))
                .and_then(|s| s.that_is_an_email())
                .map(|s| s.confirm())
        })
    });

    group.bench_function("url_failing", |b| {
        b.iter(|| {
            let mut chain = validate(black_box("hello@world.com"));
            let _ = chain.is_string().and_then(|s| s.that_is_a_url());
            chain.report_as_text()
        })
    });

    group.finish();
}

fn bench_number_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("number_chain");

    for n in [97.0, 7919.0, 104_729.0] {
        group.bench_with_input(BenchmarkId::new("prime", n), &n, |b, &n| {
            b.iter(|| {
                let mut chain = validate(black_box(n));
                chain
                    .is_number()
                    .and_then(|c| c.that_is_a_prime_number())
                    .map(|c| c.confirm())
            })
        });
    }

    group.finish();
}

fn bench_array_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("array_chain");

    for size in [10usize, 100, 1000] {
        let numbers = Value::from((0..size).map(|i| i as f64).collect::<Vec<_>>());
        group.bench_with_input(BenchmarkId::new("of_numbers", size), &numbers, |b, numbers| {
            b.iter(|| {
                let mut chain = validate(numbers.clone());
                chain.is_array().and_then(|a| a.of_numbers()).map(|a| a.confirm())
            })
        });

        let mixed = Value::from(
            (0..size)
                .map(|i| if i % 2 == 0 { Value::from(i) } else { Value::from("x") })
                .collect::<Vec<_>>(),
        );
        group.bench_with_input(BenchmarkId::new("of_numbers_mixed", size), &mixed, |b, mixed| {
            b.iter(|| {
                let mut chain = validate(mixed.clone());
                let _ = chain.is_array().and_then(|a| a.of_numbers());
                chain.report().len()
            })
        });
    }

    group.finish();
}

fn bench_object_chain(c: &mut Criterion) {
    let subject = Value::from(json!({
        "id": 1,
        "name": "ada",
        "email": "ada@example.com",
        "roles": ["admin", "dev"],
    }));
    let properties = ["id", "name", "email", "roles"];
    let allowed = [ValueType::Number, ValueType::String, ValueType::Object];

    c.bench_function("object_chain/shape", |b| {
        b.iter(|| {
            let mut chain = validate(subject.clone());
            chain
                .is_object()
                .and_then(|o| o.that_must_have_properties(black_box(&properties)))
                .and_then(|o| o.that_must_have_sanctioned_value_types(&allowed))
                .map(|o| o.confirm())
        })
    });
}

criterion_group!(
    benches,
    bench_string_chain,
    bench_number_chain,
    bench_array_chain,
    bench_object_chain
);
criterion_main!(benches);
