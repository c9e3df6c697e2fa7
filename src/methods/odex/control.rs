//! Step acceptance, order selection and step size proposal

use crate::{
    Float,
    core::{
        ode::ODE,
        solout::{ControlFlag, SolOut},
    },
};

use super::integrator::Integrator;

impl<F, S> Integrator<'_, F, S>
where
    F: ODE,
    S: SolOut,
{
    /// Commit the step just computed with `kc` columns, report it to the
    /// observer and choose order and step size for the next one.
    pub(super) fn accept_step(&mut self) -> ControlFlag {
        self.xold = self.x;
        // A step sized to land on xend ends there exactly.
        self.x = if self.h == self.xend - self.xold {
            self.xend
        } else {
            self.xold + self.h
        };

        if !self.build_dense() {
            return ControlFlag::Continue;
        }

        self.y.copy_from_slice(&self.t[0]);
        self.naccpt += 1;

        if let Some(solout) = self.solout.as_mut() {
            let dense = self.dense.as_ref().map(|d| &d.output);
            if solout.solout(self.naccpt + 1, self.xold, self.x, &self.y, dense)
                == ControlFlag::Interrupt
            {
                return ControlFlag::Interrupt;
            }
        }

        let settings = self.settings;
        let kopt = next_order(
            self.kc,
            self.k,
            self.km,
            self.reject,
            &self.w,
            settings.step_size_fac3,
            settings.step_size_fac4,
        );

        if self.reject {
            self.k = kopt.min(self.kc);
            self.h = self.posneg * self.h.abs().min(self.hh[self.k - 1].abs());
            self.reject = false;
            return ControlFlag::Continue;
        }

        let kc = self.kc;
        let h = if kopt <= kc {
            self.hh[kopt - 1]
        } else if kc < self.k && self.w[kc - 1] < self.w[kc - 2] * settings.step_size_fac4 {
            // Order increase, scaled by the work of the skipped column.
            self.hh[kc - 1] * self.a[kopt] / self.a[kc - 1]
        } else {
            self.hh[kc - 1] * self.a[kopt - 1] / self.a[kc - 1]
        };
        self.k = kopt;
        self.h = self.posneg * h.abs();
        ControlFlag::Continue
    }

    /// Lower the order if the work estimate favours it and retry with the
    /// step size proposed for that order.
    pub(super) fn reject_step(&mut self) {
        self.k = self.k.min(self.kc).min(self.km - 1);
        if self.k > 2 && self.w[self.k - 2] < self.w[self.k - 1] * self.settings.step_size_fac3 {
            self.k -= 1;
        }
        self.nrejct += 1;
        self.h = self.posneg * self.hh[self.k - 1];
        self.reject = true;
    }
}

/// Order for the next step from the work per unit step `w` (entry `j - 1`
/// for order `j`) after a step accepted with `kc` columns at order `k`.
pub(super) fn next_order(
    kc: usize,
    k: usize,
    km: usize,
    reject: bool,
    w: &[Float],
    fac3: Float,
    fac4: Float,
) -> usize {
    if kc == 2 {
        return if reject { 2 } else { 3.min(km - 1) };
    }
    // w_j is stored at w[j - 1].
    let wj = |j: usize| w[j - 1];
    if kc <= k {
        let mut kopt = kc;
        if wj(kc - 1) < wj(kc) * fac3 {
            kopt = kc - 1;
        }
        if wj(kc) < wj(kc - 1) * fac4 {
            kopt = (kc + 1).min(km - 1);
        }
        kopt
    } else {
        let mut kopt = kc - 1;
        if kc > 3 && wj(kc - 2) < wj(kc - 1) * fac3 {
            kopt = kc - 2;
        }
        if wj(kc) < wj(kopt) * fac4 {
            kopt = kc.min(km - 1);
        }
        kopt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAC3: Float = 0.8;
    const FAC4: Float = 0.9;

    #[test]
    fn second_column_moves_to_third_order() {
        let w = [0.0, 1.0, 1.0];
        assert_eq!(next_order(2, 2, 9, false, &w, FAC3, FAC4), 3);
        assert_eq!(next_order(2, 2, 9, true, &w, FAC3, FAC4), 2);
        assert_eq!(next_order(2, 2, 3, false, &w, FAC3, FAC4), 2);
    }

    #[test]
    fn cheaper_lower_order_is_preferred() {
        // w_3 much smaller than w_4
        let w = [0.0, 5.0, 1.0, 2.0];
        assert_eq!(next_order(4, 5, 9, false, &w, FAC3, FAC4), 3);
    }

    #[test]
    fn cheaper_current_order_raises_order() {
        let w = [0.0, 5.0, 4.0, 2.0];
        assert_eq!(next_order(4, 5, 9, false, &w, FAC3, FAC4), 5);
        // capped at km - 1
        assert_eq!(next_order(4, 5, 5, false, &w, FAC3, FAC4), 4);
    }

    #[test]
    fn balanced_work_keeps_order() {
        let w = [0.0, 3.0, 3.0, 3.0];
        assert_eq!(next_order(4, 4, 9, false, &w, FAC3, FAC4), 4);
    }

    #[test]
    fn after_hope_step_order_stays_below_kc() {
        // kc = k + 1, equal work: fall back to kc - 1.
        let w = [0.0, 3.0, 3.0, 3.0, 3.0];
        assert_eq!(next_order(5, 4, 9, false, &w, FAC3, FAC4), 4);
        // last column cheap enough: keep kc
        let w = [0.0, 3.0, 3.0, 3.0, 2.0];
        assert_eq!(next_order(5, 4, 9, false, &w, FAC3, FAC4), 5);
        // two columns back is clearly cheaper
        let w = [0.0, 3.0, 1.0, 3.0, 3.0];
        assert_eq!(next_order(5, 4, 9, false, &w, FAC3, FAC4), 3);
    }
}
