//! # Example: Lorenz attractor
//!
//! sigma = 10, rho = 28, beta = 8/3 from (1, 1, 1), sampled every 0.005 up
//! to x = 20. Prints the (y1, y2) projection every 200 samples.
//!

use odex::prelude::*;

struct Lorenz {
    sigma: f64,
    rho: f64,
    beta: f64,
}

impl ODE for Lorenz {
    fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
        dydx[0] = self.sigma * (y[1] - y[0]);
        dydx[1] = y[0] * (self.rho - y[2]) - y[1];
        dydx[2] = y[0] * y[1] - self.beta * y[2];
    }
}

fn main() {
    let lorenz = Lorenz {
        sigma: 10.0,
        rho: 28.0,
        beta: 8.0 / 3.0,
    };
    let solver = Odex::builder().n(3).dense_output(true).build();

    let mut points: Vec<(f64, f64)> = Vec::new();
    let mut grid = solver
        .grid(0.005, |_x: f64, y: &[f64]| points.push((y[1], y[2])))
        .expect("dense output is enabled");
    let sol = solver
        .solve(&lorenz, 0.0, &[1.0, 1.0, 1.0], 20.0, Some(&mut grid))
        .expect("invalid configuration");
    drop(grid);

    println!("Outcome: {:?}", sol.outcome);
    println!(
        "{} samples, {} function evaluations, {} accepted / {} rejected steps",
        points.len(),
        sol.nfev,
        sol.naccpt,
        sol.nrejct
    );
    for (i, (y1, y2)) in points.iter().enumerate().step_by(200) {
        println!("{:>5}: ({:>9.4}, {:>9.4})", i, y1, y2);
    }
}
