// ─────────────────────────────────────────────────────────────────────
// QQSS-ISLM Kernel — Driver Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks for the tension step, the closed-form solve,
//! and full driver runs.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use qqss_core::{constant_policy, solve_equilibrium, CurveGrid, ShockSchedule, SimulationDriver};
use qqss_dynamics::TensionStateMachine;
use qqss_types::{PolicyVector, StructuralParameters, TensionConfig};

// ── TensionStateMachine.step() ──────────────────────────────────────

fn bench_tension_step(c: &mut Criterion) {
    let mut machine = TensionStateMachine::default();
    c.bench_function("tension_step", |b| {
        b.iter(|| machine.step(black_box(0.5)))
    });
}

fn bench_effective_policy(c: &mut Criterion) {
    let mut machine = TensionStateMachine::default();
    machine.step(3.0);
    let nominal = PolicyVector::default();
    c.bench_function("effective_policy", |b| {
        b.iter(|| machine.effective_policy(black_box(&nominal)))
    });
}

// ── solve_equilibrium() ─────────────────────────────────────────────

fn bench_solve(c: &mut Criterion) {
    let params = StructuralParameters::default();
    let policy = PolicyVector::default();
    c.bench_function("solve_equilibrium", |b| {
        b.iter(|| solve_equilibrium(black_box(&policy), black_box(&params)))
    });
}

fn bench_curve_grid(c: &mut Criterion) {
    let params = StructuralParameters::default();
    let policy = PolicyVector::default();
    c.bench_function("curve_grid_200", |b| {
        b.iter(|| CurveGrid::around(black_box(&policy), &params, CurveGrid::DEFAULT_POINTS))
    });
}

// ── SimulationDriver.run() ──────────────────────────────────────────

fn bench_driver_reference(c: &mut Criterion) {
    let driver = SimulationDriver::analytic(StructuralParameters::default());
    let shocks = ShockSchedule::reference();
    let policies = constant_policy(PolicyVector::default(), shocks.len());
    let config = TensionConfig::default();
    c.bench_function("driver_run_20tick", |b| {
        b.iter(|| driver.run(black_box(&policies), black_box(&shocks), &config))
    });
}

fn bench_driver_long(c: &mut Criterion) {
    let driver = SimulationDriver::analytic(StructuralParameters::default());
    let shocks: Vec<f64> = (0..10_000).map(|i| (i as f64 * 0.01).sin() * 5.0).collect();
    let policies = constant_policy(PolicyVector::default(), shocks.len());
    let config = TensionConfig::default();
    c.bench_function("driver_run_10000tick", |b| {
        b.iter(|| driver.run(black_box(&policies), black_box(&shocks), &config))
    });
}

criterion_group!(
    benches,
    bench_tension_step,
    bench_effective_policy,
    bench_solve,
    bench_curve_grid,
    bench_driver_reference,
    bench_driver_long,
);
criterion_main!(benches);
