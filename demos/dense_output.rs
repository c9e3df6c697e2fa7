//! Example: keep the dense output of every step and evaluate it afterwards

use odex::prelude::*;
use std::f64::consts::PI;

struct SHO;

impl ODE for SHO {
    fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
        // y' = [y1, -y0]
        dydx[0] = y[1];
        dydx[1] = -y[0];
    }
}

fn main() {
    let solver = Odex::builder()
        .n(2)
        .rtol(1e-9)
        .atol(1e-9)
        .dense_output(true)
        .build();

    let mut cont = ContinuousOutput::new();
    let sol = solver
        .solve(&SHO, 0.0, &[1.0, 0.0], 2.0 * PI, Some(&mut cont))
        .expect("invalid configuration");
    println!("Outcome: {:?}", sol.outcome);
    println!(
        "Steps: {} (accepted {} / rejected {})",
        sol.nstep, sol.naccpt, sol.nrejct
    );

    if let Some((t0, t1)) = cont.t_span() {
        let npts = 40;
        let ts: Vec<f64> = (0..=npts)
            .map(|i| t0 + (t1 - t0) * (i as f64) / (npts as f64))
            .collect();
        let ys = cont.evaluate_many(&ts);

        for (i, (t, y_opt)) in ts.iter().zip(ys.iter()).enumerate() {
            if i % 8 == 0 {
                if let Some(y) = y_opt {
                    println!(
                        "t = {:>7.4}, y = [{:>.6}, {:>.6}]  ref = [{:>.6}, {:>.6}]",
                        t,
                        y[0],
                        y[1],
                        t.cos(),
                        -t.sin()
                    );
                }
            }
        }
    }
}
