//! # Example: Airy equation
//!
//! y'' = x y written as y0' = y1, y1' = x y0, started at x = -15 with values
//! close to Ai(-15), Ai'(-15) and sampled every 0.05 up to x = 5. The
//! solution oscillates for negative x and, since the initial data is not
//! exact, eventually follows the growing Bi component.
//!

use odex::prelude::*;

fn main() {
    let airy = |x: f64, y: &[f64], dydx: &mut [f64]| {
        dydx[0] = y[1];
        dydx[1] = x * y[0];
    };
    let solver = Odex::builder().n(2).dense_output(true).build();

    let mut samples: Vec<(f64, f64, f64)> = Vec::new();
    let mut grid = solver
        .grid(0.05, |x: f64, y: &[f64]| samples.push((x, y[0], y[1])))
        .expect("dense output is enabled");
    let sol = solver
        .solve(&airy, -15.0, &[0.2782174909, 0.2723742043], 5.0, Some(&mut grid))
        .expect("invalid configuration");
    drop(grid);

    println!("Outcome: {:?}, {} samples", sol.outcome, samples.len());
    for (x, y, yp) in samples.iter().step_by(20) {
        println!("x = {:>7.2}, Ai = {:>10.6}, Ai' = {:>10.6}", x, y, yp);
    }
}
