//! # Example: Poincaré section of a driven pendulum
//!
//! A pendulum whose pivot oscillates vertically as `a cos(omega t)`, in
//! Hamiltonian form with time carried as the first component so the system
//! is autonomous:
//!
//! t' = 1
//! theta' = (a l m omega sin(omega t) sin(theta) + p) / (l^2 m)
//! p' = -(a^2 l m omega^2 sin^2(omega t) cos(theta) sin(theta)
//!        + a omega sin(omega t) cos(theta) p + g l^2 m sin(theta)) / l
//!
//! The state is sampled once per driving period, which yields the
//! stroboscopic section (theta mod 2 pi, p).
//!

use odex::prelude::*;
use std::f64::consts::PI;

struct DrivenPendulum {
    m: f64,
    l: f64,
    omega: f64,
    a: f64,
    g: f64,
}

impl ODE for DrivenPendulum {
    fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
        let (t, theta, p) = (y[0], y[1], y[2]);
        let (m, l, omega, a, g) = (self.m, self.l, self.omega, self.a, self.g);
        let s = (omega * t).sin();
        let (sin_th, cos_th) = theta.sin_cos();
        dydx[0] = 1.0;
        dydx[1] = (s * sin_th * a * l * m * omega + p) / (l * l * m);
        dydx[2] = (-s * s * cos_th * sin_th * a * a * l * m * omega * omega
            - s * cos_th * a * omega * p
            - sin_th * g * l * l * m)
            / l;
    }
}

/// Angle reduced to [-pi, pi).
fn principal_value(x: f64) -> f64 {
    (x + PI).rem_euclid(2.0 * PI) - PI
}

fn main() {
    let pendulum = DrivenPendulum {
        m: 1.0,
        l: 1.0,
        omega: 2.0,
        a: 0.1,
        g: 9.8,
    };
    let period = 2.0 * PI / pendulum.omega;
    let solver = Odex::builder().n(3).atol(1e-8).dense_output(true).build();

    for theta0 in [0.5, 1.5, 2.5] {
        let mut section: Vec<(f64, f64)> = Vec::new();
        let mut grid = solver
            .grid(period, |_t: f64, y: &[f64]| {
                section.push((principal_value(y[1]), y[2]))
            })
            .expect("dense output is enabled");
        let sol = solver
            .solve(&pendulum, 0.0, &[0.0, theta0, 0.0], 200.0 * period, Some(&mut grid))
            .expect("invalid configuration");
        drop(grid);

        println!(
            "theta0 = {theta0}: {:?}, {} section points, {} steps",
            sol.outcome,
            section.len(),
            sol.naccpt
        );
        for (theta, p) in section.iter().step_by(40) {
            println!("  theta = {:>8.5}, p = {:>8.5}", theta, p);
        }
    }
}
