use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use odex::prelude::*;

/// Harmonic oscillator (2-state)
struct HarmonicOscillator {
    omega: f64,
}

impl ODE for HarmonicOscillator {
    fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
        dydx[0] = y[1];
        dydx[1] = -self.omega * self.omega * y[0];
    }
}

/// Two-body problem (4-state, planar)
struct Kepler;

impl ODE for Kepler {
    fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
        let r2 = y[0] * y[0] + y[1] * y[1];
        let r3 = r2 * r2.sqrt();
        dydx[0] = y[2];
        dydx[1] = y[3];
        dydx[2] = -y[0] / r3;
        dydx[3] = -y[1] / r3;
    }
}

fn bench_oscillator_tolerances(c: &mut Criterion) {
    let sys = HarmonicOscillator { omega: 1.0 };
    let y0 = [1.0, 0.0];
    let period = 2.0 * std::f64::consts::PI;

    let mut group = c.benchmark_group("harmonic_oscillator_10periods");
    for tol in [1e-6, 1e-9, 1e-12] {
        let solver = Odex::builder().n(2).rtol(tol).atol(tol).build();
        group.bench_with_input(BenchmarkId::from_parameter(tol), &solver, |b, solver| {
            b.iter(|| {
                solver
                    .integrate(&sys, 0.0, black_box(&y0), 10.0 * period)
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_eccentric_orbit(c: &mut Criterion) {
    // e = 0.6, perihelion at (0.4, 0)
    let e: f64 = 0.6;
    let y0 = [1.0 - e, 0.0, 0.0, ((1.0 + e) / (1.0 - e)).sqrt()];
    let solver = Odex::builder().n(4).rtol(1e-10).atol(1e-10).build();

    c.bench_function("kepler_e06_5orbits", |b| {
        b.iter(|| {
            solver
                .integrate(&Kepler, 0.0, black_box(&y0), 10.0 * std::f64::consts::PI)
                .unwrap()
        })
    });
}

fn bench_dense_grid(c: &mut Criterion) {
    let sys = HarmonicOscillator { omega: 1.0 };
    let y0 = [1.0, 0.0];
    let solver = Odex::builder()
        .n(2)
        .rtol(1e-9)
        .atol(1e-9)
        .dense_output(true)
        .build();

    c.bench_function("harmonic_oscillator_grid_0.01", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            let mut grid = solver.grid(0.01, |_x: f64, y: &[f64]| acc += y[0]).unwrap();
            solver
                .solve(&sys, 0.0, black_box(&y0), 20.0, Some(&mut grid))
                .unwrap();
            drop(grid);
            acc
        })
    });
}

criterion_group!(
    benches,
    bench_oscillator_tolerances,
    bench_eccentric_orbit,
    bench_dense_grid
);
criterion_main!(benches);
