//! # Example: Van der Pol oscillator
//!
//! Equations:
//! dy0/dt = y1
//! dy1/dt = ((1 - y0^2) * y1 - y0) / eps
//!
//! Initial conditions: y0(0) = 1.0, y1(0) = 1.0, sampled every 0.1 up to 25.
//!

use odex::prelude::*;

struct VanDerPol {
    eps: f64,
}

impl ODE for VanDerPol {
    fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
        dydx[0] = y[1];
        dydx[1] = ((1.0 - y[0] * y[0]) * y[1] - y[0]) / self.eps;
    }
}

fn main() {
    let van_der_pol = VanDerPol { eps: 3.0 };
    let solver = Odex::builder()
        .n(2)
        .rtol(1e-8)
        .atol(1e-8)
        .dense_output(true)
        .build();

    let mut grid = match solver.grid(0.1, |x: f64, y: &[f64]| {
        println!("x = {:>8.4}, y = [{:>10.6}, {:>10.6}]", x, y[0], y[1]);
    }) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };

    match solver.solve(&van_der_pol, 0.0, &[1.0, 1.0], 25.0, Some(&mut grid)) {
        Ok(sol) => {
            println!("Outcome: {:?}", sol.outcome);
            println!("Number of function evaluations: {}", sol.nfev);
            println!("Number of accepted steps: {}", sol.naccpt);
            println!("Number of rejected steps: {}", sol.nrejct);
        }
        Err(errors) => eprintln!("Integration failed: {:?}", errors),
    }
}
