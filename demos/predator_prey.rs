//! # Example: Lotka-Volterra predator-prey model
//!
//! y0' = a y0 - b y0 y1
//! y1' = c y0 y1 - d y1
//!
//! with a = 2/3, b = 4/3, c = d = 1 from (1, 1), sampled every 0.01 up to 25.
//! The quantity c y0 - d ln y0 + b y1 - a ln y1 is conserved.
//!

use odex::prelude::*;

struct LotkaVolterra {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

impl LotkaVolterra {
    fn invariant(&self, y: &[f64]) -> f64 {
        self.c * y[0] - self.d * y[0].ln() + self.b * y[1] - self.a * y[1].ln()
    }
}

impl ODE for LotkaVolterra {
    fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
        dydx[0] = self.a * y[0] - self.b * y[0] * y[1];
        dydx[1] = self.c * y[0] * y[1] - self.d * y[1];
    }
}

fn main() {
    let lv = LotkaVolterra {
        a: 2.0 / 3.0,
        b: 4.0 / 3.0,
        c: 1.0,
        d: 1.0,
    };
    let y0 = [1.0, 1.0];
    let v0 = lv.invariant(&y0);
    let solver = Odex::builder().n(2).dense_output(true).build();

    let mut drift: f64 = 0.0;
    let mut count = 0;
    let mut grid = solver
        .grid(0.01, |x: f64, y: &[f64]| {
            drift = drift.max((lv.invariant(y) - v0).abs());
            if count % 250 == 0 {
                println!("x = {:>6.2}, prey = {:>8.5}, predators = {:>8.5}", x, y[0], y[1]);
            }
            count += 1;
        })
        .expect("dense output is enabled");

    match solver.solve(&lv, 0.0, &y0, 25.0, Some(&mut grid)) {
        Ok(sol) => {
            drop(grid);
            println!("Outcome: {:?}", sol.outcome);
            println!("Samples: {}, max invariant drift: {:e}", count, drift);
        }
        Err(errors) => eprintln!("Integration failed: {:?}", errors),
    }
}
