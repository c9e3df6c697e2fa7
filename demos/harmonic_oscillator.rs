//! Example: harmonic oscillator over one period, final state and statistics.

use odex::prelude::*;
use std::f64::consts::PI;

struct HarmonicOscillator;

impl ODE for HarmonicOscillator {
    fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
        dydx[0] = y[1];
        dydx[1] = -y[0];
    }
}

fn main() {
    let solver = Odex::builder().n(2).rtol(1e-10).atol(1e-10).build();

    match solver.integrate(&HarmonicOscillator, 0.0, &[1.0, 0.0], 2.0 * PI) {
        Ok(sol) => {
            println!("Outcome: {:?}", sol.outcome);
            println!("Final state: x = {:.5}, y = {:?}", sol.x, sol.y);
            println!("Error: {:e}", (sol.y[0] - 1.0).abs().max(sol.y[1].abs()));
            println!("Number of function evaluations: {}", sol.nfev);
            println!("Number of steps taken: {}", sol.nstep);
            println!("Number of accepted steps: {}", sol.naccpt);
            println!("Number of rejected steps: {}", sol.nrejct);
        }
        Err(errors) => eprintln!("Integration failed: {:?}", errors),
    }
}
