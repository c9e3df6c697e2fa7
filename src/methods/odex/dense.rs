//! Dense output of the GBS method: Hermite interpolation at the step ends
//! corrected by extrapolated derivatives at the midpoint.

use log::trace;

use crate::{
    Float,
    core::{interpolate::Interpolate, ode::ODE, solout::SolOut},
    error::Error,
};

use super::{extrapolation::extrapolate_rows, integrator::Integrator, sequence::StepSizeSequence};

/// Interpolant of the solution over the last accepted step `[xold, xold + h]`.
///
/// Handed to [`crate::SolOut::solout`] after every accepted step when the
/// solver runs with `dense_output`. Only the components registered through
/// `dense_components` (all of them by default) can be evaluated. The value is
/// overwritten by the next step; clone it to keep it.
#[derive(Debug, Clone)]
pub struct DenseOutput {
    xold: Float,
    h: Float,
    /// Degree of the midpoint correction, negative for plain Hermite.
    imit: isize,
    /// Coefficient blocks of `nrd` entries each.
    dens: Vec<Float>,
    icom: Vec<usize>,
}

impl DenseOutput {
    fn new(icom: Vec<usize>, km: usize) -> Self {
        let nrd = icom.len();
        Self {
            xold: 0.0,
            h: 0.0,
            imit: -1,
            dens: vec![0.0; (2 * km + 5) * nrd],
            icom,
        }
    }

    /// Value of component `c` at `x`.
    ///
    /// `x` should lie in `[xold, x]` of the step; outside that interval the
    /// polynomial is extrapolated.
    ///
    /// # Errors
    /// [`Error::NoDenseOutput`] when `c` is not a dense component.
    pub fn component(&self, c: usize, x: Float) -> Result<Float, Error> {
        let slot = self
            .icom
            .iter()
            .position(|&k| k == c)
            .ok_or(Error::NoDenseOutput(c))?;
        Ok(self.eval_slot(slot, x))
    }

    /// Components this interpolant covers, in registration order.
    pub fn components(&self) -> &[usize] {
        &self.icom
    }

    /// Left end of the step.
    pub fn xold(&self) -> Float {
        self.xold
    }

    /// Right end of the step.
    pub fn x(&self) -> Float {
        self.xold + self.h
    }

    fn eval_slot(&self, i: usize, x: Float) -> Float {
        let nrd = self.icom.len();
        let d = &self.dens;
        let theta = (x - self.xold) / self.h;
        let theta1 = 1.0 - theta;
        let phthet = d[i]
            + theta * (d[nrd + i] + theta1 * (d[2 * nrd + i] * theta + d[3 * nrd + i] * theta1));
        if self.imit < 0 {
            return phthet;
        }
        let imit = self.imit as usize;
        let thetah = theta - 0.5;
        let mut ret = d[nrd * (imit + 4) + i];
        for im in (1..=imit).rev() {
            ret = d[nrd * (im + 3) + i] + ret * thetah / im as Float;
        }
        phthet + (theta * theta1).powi(2) * ret
    }
}

impl Interpolate for DenseOutput {
    /// Fill `yi` with the dense components at `xi`, in registration order.
    ///
    /// `yi` must hold at least [`DenseOutput::components`]`.len()` entries;
    /// entries past that are left untouched.
    fn interpolate(&self, xi: Float, yi: &mut [Float]) {
        debug_assert!(
            yi.len() >= self.icom.len(),
            "output holds {} entries but {} dense components are registered",
            yi.len(),
            self.icom.len()
        );
        for (slot, out) in yi.iter_mut().enumerate().take(self.icom.len()) {
            *out = self.eval_slot(slot, xi);
        }
    }
}

/// Buffers for building the dense output during a step.
pub(super) struct DenseWork {
    icom: Vec<usize>,
    /// Midpoint values per column.
    ysafe: Vec<Vec<Float>>,
    /// Derivatives around the midpoint, appended during each sweep.
    fsafe: Vec<Vec<Float>>,
    /// First `fsafe` row of every column.
    ipoint: Vec<usize>,
    errfac: Vec<Float>,
    /// Next free `fsafe` row.
    pub(super) ipt: usize,
    pub(super) output: DenseOutput,
}

impl DenseWork {
    pub(super) fn new(icom: Vec<usize>, km: usize, nj: &[usize]) -> Self {
        let nrd = icom.len();

        let mut ipoint = Vec::with_capacity(km + 1);
        ipoint.push(0);
        for i in 1..=km {
            let mut njadd = 4 * i - 2;
            if nj[i - 1] > njadd {
                njadd += 1;
            }
            ipoint.push(ipoint[i - 1] + njadd);
        }

        let errfac = (1..=2 * km)
            .map(|mu| {
                let errx = (mu as Float / (mu + 4) as Float).sqrt() * 0.5;
                let mut prod = (1.0 / (mu + 4) as Float).powi(2);
                for j in 1..=mu {
                    prod *= errx / j as Float;
                }
                prod
            })
            .collect();

        Self {
            ysafe: vec![vec![0.0; nrd]; km],
            fsafe: vec![vec![0.0; nrd]; 2 * km * km + km],
            ipoint,
            errfac,
            ipt: 0,
            output: DenseOutput::new(icom.clone(), km),
            icom,
        }
    }

    /// Keep the midpoint value of the sweep for column `j`.
    pub(super) fn save_midpoint(&mut self, j: usize, y: &[Float]) {
        for (dst, &c) in self.ysafe[j - 1].iter_mut().zip(&self.icom) {
            *dst = y[c];
        }
    }

    pub(super) fn push_derivative(&mut self, dy: &[Float]) {
        for (dst, &c) in self.fsafe[self.ipt].iter_mut().zip(&self.icom) {
            *dst = dy[c];
        }
        self.ipt += 1;
    }
}

/// `rows[l] -= rows[l - 2]`
fn subtract_two_back(rows: &mut [Vec<Float>], l: usize) {
    let (lower, upper) = rows.split_at_mut(l);
    for (dst, src) in upper[0].iter_mut().zip(&lower[l - 2]) {
        *dst -= src;
    }
}

impl<F, S> Integrator<'_, F, S>
where
    F: ODE,
    S: SolOut,
{
    /// Build the interpolant for the step just computed, with `x` already at
    /// the right end.
    ///
    /// Returns `false` when the interpolation error estimate rejects the
    /// step; `x` and `h` are then reset for a retry.
    pub(super) fn build_dense(&mut self) -> bool {
        let settings = self.settings;
        let kc = self.kc;
        let h = self.h;
        let fixup = self.sequence == StepSizeSequence::OddMultiple;
        let Some(dense) = self.dense.as_mut() else {
            return true;
        };
        let nrd = dense.icom.len();
        let kmit = 2 * kc as isize - settings.interpolation_formula_degree as isize + 1;

        let out = &mut dense.output;
        out.xold = self.xold;
        out.h = h;
        out.imit = kmit;
        let dens = &mut out.dens;

        for (i, &c) in dense.icom.iter().enumerate() {
            dens[i] = self.y[c];
            dens[nrd + i] = h * self.dz[c];
            dens[2 * nrd + i] = self.t[0][c];
        }

        // Extrapolated midpoint value.
        for j in 2..=kc {
            extrapolate_rows(&mut dense.ysafe, &self.nj, 1, j);
        }
        dens[4 * nrd..5 * nrd].copy_from_slice(&dense.ysafe[0]);

        self.yh1.copy_from_slice(&self.t[0]);
        self.f.ode(self.x, &self.yh1, &mut self.yh2);
        self.nfev += 1;
        for (i, &c) in dense.icom.iter().enumerate() {
            dens[3 * nrd + i] = self.yh2[c] * h;
        }

        // Extrapolated midpoint derivatives of increasing order, obtained by
        // central differences of the saved derivatives.
        let kmit_rows = kmit.max(0) as usize;
        for kmi in 1..=kmit_rows {
            let kbeg = (kmi + 1) / 2;
            for kk in kbeg..=kc {
                let facnj = (self.nj[kk - 1] as Float / 2.0).powi(kmi as i32 - 1);
                let row = dense.ipoint[kk] + kmi - 2 * kk - 1;
                for (dst, src) in dense.ysafe[kk - 1].iter_mut().zip(&dense.fsafe[row]) {
                    *dst = src * facnj;
                }
            }
            for j in kbeg + 1..=kc {
                extrapolate_rows(&mut dense.ysafe, &self.nj, kbeg, j);
            }
            let block = (kmi + 4) * nrd;
            for (dst, src) in dens[block..block + nrd].iter_mut().zip(&dense.ysafe[kbeg - 1]) {
                *dst = src * h;
            }
            if kmi == kmit_rows {
                continue;
            }

            let seeded = fixup && kmi == 1;
            for kk in (kmi + 2) / 2..=kc {
                let lbeg = dense.ipoint[kk] - 1;
                let mut lend = dense.ipoint[kk - 1] + kmi;
                if seeded {
                    lend += 2;
                }
                for l in (lend..=lbeg).rev().step_by(2) {
                    subtract_two_back(&mut dense.fsafe, l);
                }
                if seeded {
                    for (dst, &c) in dense.fsafe[lend - 2].iter_mut().zip(&dense.icom) {
                        *dst -= self.dz[c];
                    }
                }
            }
            for kk in (kmi + 2) / 2..=kc {
                let lbeg = dense.ipoint[kk] - 2;
                let lend = dense.ipoint[kk - 1] + kmi + 1;
                for l in (lend..=lbeg).rev().step_by(2) {
                    subtract_two_back(&mut dense.fsafe, l);
                }
            }
        }

        interp(dens, nrd, kmit);

        if settings.dense_output_error_estimator && kmit >= 1 && nrd > 0 {
            let m = kmit as usize;
            let mut errint: Float = 0.0;
            for (i, &c) in dense.icom.iter().enumerate() {
                errint += (dens[(m + 4) * nrd + i] / self.scal[c]).powi(2);
            }
            let errint = (errint / nrd as Float).sqrt() * dense.errfac[m - 1];
            self.hoptde = h / errint.powf(1.0 / (m + 4) as Float).max(0.01);
            if errint > 10.0 {
                trace!("interpolation error too large at x={} (errint={})", self.x, errint);
                self.h = self.hoptde;
                self.x = self.xold;
                self.nrejct += 1;
                self.reject = true;
                return false;
            }
        }

        self.dz.copy_from_slice(&self.yh2);
        true
    }
}

/// Turn the raw blocks `[y0, h y0', y1, h y1', y_mid, h^k y_mid^(k)...]` into
/// Hermite coefficients plus the midpoint correction of degree `imit`.
fn interp(y: &mut [Float], n: usize, imit: isize) {
    let mut a: Vec<Float> = vec![0.0; imit.max(0) as usize + 1];
    for i in 0..n {
        let y0 = y[i];
        let y1 = y[2 * n + i];
        let yp0 = y[n + i];
        let yp1 = y[3 * n + i];
        let ydiff = y1 - y0;
        let aspl = -yp1 + ydiff;
        let bspl = yp0 - ydiff;
        y[n + i] = ydiff;
        y[2 * n + i] = aspl;
        y[3 * n + i] = bspl;
        if imit < 0 {
            continue;
        }
        let imit = imit as usize;

        // Hermite polynomial and its derivatives at the midpoint.
        let ph0 = (y0 + y1) * 0.5 + 0.125 * (aspl + bspl);
        let ph1 = ydiff + (aspl - bspl) * 0.25;
        let ph2 = -(yp0 - yp1);
        let ph3 = 6.0 * (bspl - aspl);

        a[0] = 16.0 * (y[4 * n + i] - ph0);
        if imit >= 1 {
            a[1] = 16.0 * (y[5 * n + i] - ph1);
        }
        if imit >= 2 {
            a[2] = 16.0 * (y[6 * n + i] - ph2 + a[0]);
        }
        if imit >= 3 {
            a[3] = 16.0 * (y[7 * n + i] - ph3 + 3.0 * a[1]);
        }
        for im in 4..=imit {
            let fac1 = (im * (im - 1) / 2) as Float;
            let fac2 = (im * (im - 1) * (im - 2) * (im - 3)) as Float;
            a[im] = 16.0 * (y[(im + 4) * n + i] + fac1 * a[im - 2] - fac2 * a[im - 4]);
        }
        for im in 0..=imit {
            y[n * (im + 4) + i] = a[im];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(dens: Vec<Float>, imit: isize) -> DenseOutput {
        DenseOutput {
            xold: 0.0,
            h: 1.0,
            imit,
            dens,
            icom: vec![0],
        }
    }

    #[test]
    fn hermite_reproduces_cubic() {
        // p(t) = 1 + 2t - 3t^2 + t^3
        let p = |t: Float| 1.0 + 2.0 * t - 3.0 * t * t + t.powi(3);
        let mut dens = vec![1.0, 2.0, 1.0, -1.0, 0.0];
        interp(&mut dens, 1, -1);
        let out = snapshot(dens, -1);
        for &t in &[0.0, 0.25, 0.5, 0.8, 1.0] {
            assert!((out.component(0, t).unwrap() - p(t)).abs() < 1e-14);
        }
    }

    #[test]
    fn midpoint_correction_hits_midpoint_value() {
        let mut dens = vec![1.0, 2.0, 1.0, -1.0, 2.0];
        interp(&mut dens, 1, 0);
        let out = snapshot(dens, 0);
        assert!((out.component(0, 0.5).unwrap() - 2.0).abs() < 1e-14);
        assert!((out.component(0, 0.0).unwrap() - 1.0).abs() < 1e-14);
        assert!((out.component(0, 1.0).unwrap() - 1.0).abs() < 1e-14);
    }

    /// `d^m/dt^m p` at `t` for `p = sum c[k] t^k`.
    fn derivative(c: &[Float], m: usize, t: Float) -> Float {
        c.iter()
            .enumerate()
            .skip(m)
            .map(|(k, &ck)| {
                let falling: usize = (k - m + 1..=k).product();
                ck * falling as Float * t.powi((k - m) as i32)
            })
            .sum()
    }

    #[test]
    fn correction_reproduces_polynomials_of_matching_degree() {
        let coeffs = [0.3, -1.2, 2.5, 0.7, -3.1, 1.9, -0.8, 2.2, -1.4, 0.6, 1.1];
        for imit in 1..=6usize {
            // Degree imit + 4 is fixed by two values, two slopes and imit + 1
            // midpoint derivatives.
            let c = &coeffs[..imit + 5];
            let mut dens = vec![
                derivative(c, 0, 0.0),
                derivative(c, 1, 0.0),
                derivative(c, 0, 1.0),
                derivative(c, 1, 1.0),
            ];
            dens.extend((0..=imit).map(|m| derivative(c, m, 0.5)));
            interp(&mut dens, 1, imit as isize);
            let out = snapshot(dens, imit as isize);
            for &t in &[0.0, 0.1, 0.37, 0.5, 0.73, 1.0] {
                let got = out.component(0, t).unwrap();
                assert!(
                    (got - derivative(c, 0, t)).abs() < 1e-10,
                    "imit={imit} t={t}: {got} vs {}",
                    derivative(c, 0, t)
                );
            }
        }
    }

    #[test]
    fn interpolate_writes_only_dense_slots() {
        let mut dens = vec![1.0, 2.0, 1.0, -1.0, 0.0];
        interp(&mut dens, 1, -1);
        let out = snapshot(dens, -1);
        let mut yi = [0.0, 42.0];
        out.interpolate(0.5, &mut yi);
        assert!((yi[0] - out.component(0, 0.5).unwrap()).abs() < 1e-15);
        assert_eq!(yi[1], 42.0);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "dense components are registered")]
    fn interpolate_rejects_short_output() {
        let out = snapshot(vec![0.0; 5], -1);
        out.interpolate(0.5, &mut []);
    }

    #[test]
    fn unknown_component_is_an_error() {
        let out = snapshot(vec![0.0; 5], -1);
        assert_eq!(out.component(3, 0.5), Err(Error::NoDenseOutput(3)));
    }

    #[test]
    fn row_pointers_follow_saved_derivative_counts() {
        // Sequence 4: n_j = 2, 6, 10; sequence 5: n_j = 4, 8, 12.
        let work = DenseWork::new(vec![0], 3, &[2, 6, 10]);
        assert_eq!(work.ipoint, vec![0, 2, 8, 18]);
        let work = DenseWork::new(vec![0], 3, &[4, 8, 12]);
        assert_eq!(work.ipoint, vec![0, 3, 10, 21]);
        assert_eq!(work.errfac.len(), 6);
        assert!(work.errfac.windows(2).all(|w| w[1] < w[0]));
    }
}
