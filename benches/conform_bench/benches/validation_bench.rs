//! Validation throughput benchmarks
//!
//! Measures the engine on representative attribute documents: single
//! rules, a signup form, wide documents and the concurrent path.

use conform::{AsyncValidateOptions, Constraints, OutputFormat, ValidateOptions};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Map, Value};

fn attrs(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

fn constraints(value: Value) -> Constraints {
    serde_json::from_value(value).unwrap()
}

fn signup_constraints() -> Constraints {
    constraints(json!({
        "username": { "presence": true, "length": { "minimum": 3, "maximum": 20 }, "format": "[a-z0-9_]+" },
        "email": { "presence": true, "email": true },
        "password": { "presence": true, "length": { "minimum": 8 } },
        "confirmation": { "equality": "password" },
        "age": { "numericality": { "onlyInteger": true, "greaterThanOrEqualTo": 18 } },
        "website": { "url": true },
        "plan": { "inclusion": ["free", "pro", "team"] },
        "birthday": { "date": { "latest": "2010-01-01" } }
    }))
}

/// Benchmark individual built-in validators
fn bench_single_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_rule");
    let options = ValidateOptions::default();

    let cases = [
        ("presence", json!({ "v": "x" }), json!({ "v": { "presence": true } })),
        ("email", json!({ "v": "ann@example.com" }), json!({ "v": { "email": true } })),
        ("length", json!({ "v": "hello world" }), json!({ "v": { "length": { "maximum": 20 } } })),
        ("numericality", json!({ "v": "42" }), json!({ "v": { "numericality": { "odd": false } } })),
        ("format", json!({ "v": "abc_123" }), json!({ "v": { "format": "[a-z0-9_]+" } })),
        ("url", json!({ "v": "https://example.com/path?q=1" }), json!({ "v": { "url": true } })),
        ("datetime", json!({ "v": "2020-01-01T10:00:00Z" }), json!({ "v": { "datetime": true } })),
    ];

    for (name, attributes, spec) in cases {
        let attributes = attrs(attributes);
        let spec = constraints(spec);
        group.bench_function(name, |b| {
            b.iter(|| conform::validate(black_box(&attributes), black_box(&spec), &options))
        });
    }

    group.finish();
}

/// Benchmark a full form, valid and invalid, in each report shape
fn bench_signup_form(c: &mut Criterion) {
    let mut group = c.benchmark_group("signup_form");
    let spec = signup_constraints();

    let valid = attrs(json!({
        "username": "ann_1",
        "email": "ann@example.com",
        "password": "correct horse",
        "confirmation": "correct horse",
        "age": 30,
        "website": "https://ann.example.com",
        "plan": "pro",
        "birthday": "1990-05-17"
    }));
    let invalid = attrs(json!({
        "username": "A!",
        "email": "nope",
        "password": "short",
        "confirmation": "other",
        "age": "17.5",
        "website": "ftp://localhost",
        "plan": "enterprise",
        "birthday": "2015-01-01"
    }));

    group.bench_function("valid", |b| {
        let options = ValidateOptions::default();
        b.iter(|| conform::validate(black_box(&valid), black_box(&spec), &options))
    });

    for format in [
        OutputFormat::Grouped,
        OutputFormat::Flat,
        OutputFormat::Detailed,
        OutputFormat::Constraint,
    ] {
        let options = ValidateOptions::default().format(format.clone());
        group.bench_with_input(BenchmarkId::new("invalid", format.name()), &options, |b, options| {
            b.iter(|| conform::validate(black_box(&invalid), black_box(&spec), options))
        });
    }

    group.finish();
}

/// Benchmark documents with many constrained attributes
fn bench_wide_documents(c: &mut Criterion) {
    let mut group = c.benchmark_group("wide_document");
    let options = ValidateOptions::default();

    for width in [10usize, 100, 1000] {
        let mut attributes = Map::new();
        let mut spec = Map::new();
        for i in 0..width {
            let key = format!("field_{i}");
            attributes.insert(key.clone(), json!(if i % 3 == 0 { "" } else { "value" }));
            spec.insert(key, json!({ "presence": true, "length": { "maximum": 10 } }));
        }
        let spec = constraints(Value::Object(spec));

        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, _| {
            b.iter(|| conform::validate(black_box(&attributes), black_box(&spec), &options))
        });
    }

    group.finish();
}

/// Benchmark the concurrent path with only synchronous validators
fn bench_async_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("async_path");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let spec = signup_constraints();
    let attributes = attrs(json!({ "username": "ann_1", "email": "ann@example.com", "extra": true }));
    let options = AsyncValidateOptions::default();

    group.bench_function("signup_partial", |b| {
        b.iter(|| {
            runtime.block_on(conform::validate_async(
                black_box(&attributes),
                black_box(&spec),
                &options,
            ))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_rules,
    bench_signup_form,
    bench_wide_documents,
    bench_async_overhead
);
criterion_main!(benches);
