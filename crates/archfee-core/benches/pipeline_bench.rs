//! Performance benchmarks for the calculation pipeline
//!
//! Targets:
//! - calculate(single project) → <50µs
//! - compute_hours_distribution(10k hours) → <5µs

use archfee_core::hours::compute_hours_distribution;
use archfee_core::{Calculator, ResolvedData};
use archfee_types::{HoursModel, ProjectInput};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn project(new_area: f64, existing_area: f64, model: HoursModel) -> ProjectInput {
    let mut input = ProjectInput::new("Custom Houses", new_area);
    input.existing_area_ft2 = existing_area;
    input.hours_model = model;
    input.scan.building = existing_area > 0.0;
    input.duration_months = Some(12.0);
    input
}

/// Benchmark 1: full pipeline on pre-resolved data
fn calculate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("calculate");
    let calculator = Calculator::default();

    for (name, input) in [
        ("new_only", project(5_000.0, 0.0, HoursModel::NonLinear)),
        ("mixed", project(5_000.0, 3_000.0, HoursModel::NonLinear)),
        ("linear", project(5_000.0, 3_000.0, HoursModel::Linear)),
    ] {
        let data = ResolvedData::embedded(&input);
        group.bench_with_input(BenchmarkId::new("project", name), &input, |b, input| {
            b.iter(|| black_box(calculator.calculate(input, &data)));
        });
    }

    group.finish();
}

/// Benchmark 2: embedded data resolution
fn resolve_benchmark(c: &mut Criterion) {
    let input = project(5_000.0, 0.0, HoursModel::NonLinear);
    let unknown = ProjectInput::new("Lighthouse", 2_000.0);

    c.bench_function("resolve_embedded_exact", |b| {
        b.iter(|| black_box(ResolvedData::embedded(&input)));
    });
    c.bench_function("resolve_embedded_fallback", |b| {
        b.iter(|| black_box(ResolvedData::embedded(&unknown)));
    });
}

/// Benchmark 3: phase and role distribution
fn hours_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("hours_distribution");

    for total in [100.0, 1_000.0, 10_000.0] {
        group.bench_with_input(BenchmarkId::new("hours", total), &total, |b, &total| {
            b.iter(|| black_box(compute_hours_distribution(total, Some(12.0))));
        });
    }

    group.finish();
}

criterion_group!(benches, calculate_benchmark, resolve_benchmark, hours_benchmark);
criterion_main!(benches);
