use std::f64::consts::PI;

use approx::assert_abs_diff_eq;
use odex::prelude::*;

mod common;
use common::{Decay, Growth, SHO};

fn sho_error(tol: f64, xend: f64) -> f64 {
    let solver = Odex::builder().n(2).rtol(tol).atol(tol).build();
    let sol = solver.integrate(&SHO, 0.0, &[1.0, 0.0], xend).unwrap();
    assert!(sol.converged());
    (sol.y[0] - xend.cos()).abs().max((sol.y[1] + xend.sin()).abs())
}

#[test]
fn exponential_decay_with_defaults() {
    let sol = Odex::new(1).integrate(&Decay, 0.0, &[1.0], 1.0).unwrap();
    assert_eq!(sol.outcome, Outcome::Converged);
    assert_eq!(sol.x, 1.0);
    assert_abs_diff_eq!(sol.y[0], (-1.0f64).exp(), epsilon = 1e-4);
    assert!(sol.naccpt > 0);
    assert!(sol.nfev > sol.nstep);
}

#[test]
fn harmonic_oscillator_half_period() {
    let solver = Odex::builder().n(2).rtol(1e-10).atol(1e-10).build();
    let sol = solver.integrate(&SHO, 0.0, &[1.0, 0.0], PI).unwrap();
    assert!(sol.converged());
    assert_abs_diff_eq!(sol.y[0], -1.0, epsilon = 1e-8);
    assert_abs_diff_eq!(sol.y[1], 0.0, epsilon = 1e-8);
}

#[test]
fn exponential_growth_over_several_spans() {
    for &tol in &[1e-6, 1e-10] {
        for &xend in &[1.0, 5.0, 10.0] {
            let solver = Odex::builder().n(1).rtol(tol).atol(tol).build();
            let sol = solver.integrate(&Growth, 0.0, &[1.0], xend).unwrap();
            assert!(sol.converged());
            let exact = f64::exp(xend);
            let rel = (sol.y[0] - exact).abs() / exact;
            assert!(rel < 1e4 * tol, "tol {tol}, xend {xend}: relative error {rel}");
        }
    }
}

#[test]
fn tighter_tolerance_gives_smaller_error() {
    let loose = sho_error(1e-4, 10.0);
    let medium = sho_error(1e-8, 10.0);
    let tight = sho_error(1e-12, 10.0);
    assert!(medium < loose, "{medium} >= {loose}");
    assert!(tight < medium, "{tight} >= {medium}");
}

#[test]
fn per_component_tolerances() {
    let solver = Odex::builder()
        .n(2)
        .rtol([1e-10, 1e-10])
        .atol(vec![1e-10, 1e-10])
        .build();
    let sol = solver.integrate(&SHO, 0.0, &[1.0, 0.0], 2.0).unwrap();
    assert_abs_diff_eq!(sol.y[0], 2.0f64.cos(), epsilon = 1e-8);
    assert_abs_diff_eq!(sol.y[1], -2.0f64.sin(), epsilon = 1e-8);
}

#[test]
fn every_sequence_integrates_the_oscillator() {
    for selector in 1..=5 {
        let sequence = StepSizeSequence::try_from(selector).unwrap();
        let solver = Odex::builder()
            .n(2)
            .rtol(1e-9)
            .atol(1e-9)
            .step_size_sequence(sequence)
            .build();
        let sol = solver.integrate(&SHO, 0.0, &[1.0, 0.0], 5.0).unwrap();
        assert!(sol.converged(), "sequence {selector}");
        assert_abs_diff_eq!(sol.y[0], 5.0f64.cos(), epsilon = 1e-6);
        assert_abs_diff_eq!(sol.y[1], -5.0f64.sin(), epsilon = 1e-6);
    }
}

#[test]
fn few_extrapolation_columns() {
    let solver = Odex::builder()
        .n(2)
        .rtol(1e-8)
        .atol(1e-8)
        .max_extrapolation_columns(3)
        .build();
    let sol = solver.integrate(&SHO, 0.0, &[1.0, 0.0], 3.0).unwrap();
    assert!(sol.converged());
    assert_abs_diff_eq!(sol.y[0], 3.0f64.cos(), epsilon = 1e-6);
}

#[test]
fn closures_are_systems() {
    let k = 0.5;
    let f = move |_x: f64, y: &[f64], dydx: &mut [f64]| dydx[0] = -k * y[0];
    let solver = Odex::builder().n(1).rtol(1e-10).atol(1e-10).build();
    let sol = solver.integrate(&f, 0.0, &[2.0], 2.0).unwrap();
    assert_abs_diff_eq!(sol.y[0], 2.0 * (-1.0f64).exp(), epsilon = 1e-8);
}

#[test]
fn backward_integration() {
    let solver = Odex::builder().n(1).rtol(1e-10).atol(1e-10).build();
    let y1 = (-1.0f64).exp();
    let sol = solver.integrate(&Decay, 1.0, &[y1], 0.0).unwrap();
    assert!(sol.converged());
    assert_eq!(sol.x, 0.0);
    assert_abs_diff_eq!(sol.y[0], 1.0, epsilon = 1e-8);
    assert!(sol.h < 0.0);

    let solver = Odex::builder().n(2).rtol(1e-10).atol(1e-10).build();
    let sol = solver.integrate(&SHO, 2.0 * PI, &[1.0, 0.0], 0.0).unwrap();
    assert_abs_diff_eq!(sol.y[0], 1.0, epsilon = 1e-8);
    assert_abs_diff_eq!(sol.y[1], 0.0, epsilon = 1e-8);
}
