//! Midpoint sweeps and polynomial extrapolation of the table

use log::trace;

use crate::{
    Float,
    core::{ode::ODE, solout::SolOut},
};

use super::integrator::Integrator;

impl<F, S> Integrator<'_, F, S>
where
    F: ODE,
    S: SolOut,
{
    /// Compute column `j` of the extrapolation table.
    ///
    /// Runs the explicit midpoint rule with `n_j` substeps over the current
    /// step, extrapolates the new column against the previous ones and
    /// estimates the error and the optimal step size for order `j`. Sets
    /// `atov` and shrinks `h` when the sweep or the extrapolation turns
    /// unstable.
    pub(super) fn midex(&mut self, j: usize) {
        let n = self.n;
        let count = self.nj[j - 1];
        let hj = self.h / count as Float;
        let settings = self.settings;

        for i in 0..n {
            self.yh1[i] = self.y[i];
            self.yh2[i] = self.y[i] + hj * self.dz[i];
        }

        // Substeps around the midpoint whose derivatives feed the dense output.
        let mid = count / 2;
        let window = 2 * j - 1;

        for mm in 1..count {
            if mm == mid {
                if let Some(dense) = self.dense.as_mut() {
                    dense.save_midpoint(j, &self.yh2);
                }
            }
            self.f.ode(self.x + hj * mm as Float, &self.yh2, &mut self.dy);
            self.nfev += 1;
            if mm.abs_diff(mid) <= window {
                if let Some(dense) = self.dense.as_mut() {
                    dense.push_derivative(&self.dy);
                }
            }
            for i in 0..n {
                let ys = self.yh1[i];
                self.yh1[i] = self.yh2[i];
                self.yh2[i] = ys + 2.0 * hj * self.dy[i];
            }
            if mm <= settings.stability_check_count && j <= settings.stability_check_table_lines {
                let mut del1: Float = 0.0;
                let mut del2: Float = 0.0;
                for i in 0..n {
                    del1 += (self.dz[i] / self.scal[i]).powi(2);
                    del2 += ((self.dy[i] - self.dz[i]) / self.scal[i]).powi(2);
                }
                let quot = del2 / settings.uround.max(del1);
                if quot > 4.0 {
                    trace!("unstable midpoint sweep at x={} (column {}, quot={})", self.x, j, quot);
                    self.shrink_unstable();
                    return;
                }
            }
        }

        // Final smoothing step at the right end.
        self.f.ode(self.x + self.h, &self.yh2, &mut self.dy);
        self.nfev += 1;
        if mid <= window {
            if let Some(dense) = self.dense.as_mut() {
                dense.push_derivative(&self.dy);
            }
        }
        let row = &mut self.t[j - 1];
        for i in 0..n {
            row[i] = (self.yh1[i] + self.yh2[i] + hj * self.dy[i]) / 2.0;
        }

        if j == 1 {
            return;
        }

        extrapolate_rows(&mut self.t, &self.nj, 1, j);

        let mut err: Float = 0.0;
        for i in 0..n {
            let t1i = self.y[i].abs().max(self.t[0][i].abs());
            self.scal[i] = self.atol[i] + self.rtol[i] * t1i;
            err += ((self.t[0][i] - self.t[1][i]) / self.scal[i]).powi(2);
        }
        self.err = (err / n as Float).sqrt();

        if self.err * settings.uround >= 1.0 || (j > 2 && self.err >= self.err_old) {
            trace!("extrapolation error grew at x={} (column {}, err={})", self.x, j, self.err);
            self.shrink_unstable();
            return;
        }
        self.err_old = (4.0 * self.err).max(1.0);

        // Optimal step size for order j.
        let exp0 = 1.0 / (2 * j - 1) as Float;
        let fac_min = settings.step_size_fac1.powf(exp0);
        let fac = (settings.step_size_fac2 / fac_min).min(
            fac_min.max((self.err / settings.step_safety_factor1).powf(exp0) / settings.step_safety_factor2),
        );
        self.hh[j - 1] = (self.h.abs() / fac).min(self.hmax);
        self.w[j - 1] = self.a[j - 1] / self.hh[j - 1];
    }

    /// Give up on the current step size.
    fn shrink_unstable(&mut self) {
        self.atov = true;
        self.h *= self.settings.step_size_reduction_factor;
        self.reject = true;
    }
}

/// Aitken-Neville extrapolation after row `j - 1` was filled, in place.
/// Row `l - 1` holds the value computed with `nj[l - 1]` substeps; rows
/// `first - 1..j - 1` are updated, so with `first == 1` row 0 ends up with
/// the extrapolated value of order `j`.
pub(super) fn extrapolate_rows(rows: &mut [Vec<Float>], nj: &[usize], first: usize, j: usize) {
    let top = nj[j - 1] as Float;
    for l in (first + 1..=j).rev() {
        let fac = (top / nj[l - 2] as Float).powi(2) - 1.0;
        let (lower, upper) = rows.split_at_mut(l - 1);
        let prev = &mut lower[l - 2];
        let cur = &upper[0];
        for (p, c) in prev.iter_mut().zip(cur) {
            *p = c + (c - *p) / fac;
        }
    }
}
