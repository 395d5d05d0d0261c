//! Dual frequency combinations
use crate::{
    constants::{MIN_DERIVED_OBSERVABLE, WIDE_LANE_WAVELENGTH_M},
    observation::{Observable, Observations},
    prelude::{Carrier, Derived, Record},
};

impl Observations {
    /// Returns L1 phase range (m)
    pub(crate) fn l1_phase_range(&self) -> Option<f64> {
        Some(self.get(Observable::L1)? * Carrier::L1.wavelength())
    }

    /// Returns L2 phase range (m)
    pub(crate) fn l2_phase_range(&self) -> Option<f64> {
        Some(self.get(Observable::L2)? * Carrier::L2.wavelength())
    }

    /// Code geometry free combination P4 = P2 - P1 (m),
    /// C1 substitutes for a missing P1.
    pub fn code_gf_combination(&self) -> Option<f64> {
        let p1 = self.l1_pseudo_range()?;
        let p2 = self.get(Observable::P2)?;
        Some(p2 - p1)
    }

    /// Phase geometry free combination L4 = L2 λ2 - L1 λ1 (m)
    pub fn phase_gf_combination(&self) -> Option<f64> {
        Some(self.l2_phase_range()? - self.l1_phase_range()?)
    }

    /// Phase wide lane combination (m)
    pub(crate) fn phase_wl_combination(&self) -> Option<f64> {
        let (f1, f2) = (Carrier::L1.frequency(), Carrier::L2.frequency());
        let l1 = self.l1_phase_range()?;
        let l2 = self.l2_phase_range()?;
        Some((f1 * l1 - f2 * l2) / (f1 - f2))
    }

    /// Code narrow lane combination (m)
    pub(crate) fn code_nl_combination(&self) -> Option<f64> {
        let (f1, f2) = (Carrier::L1.frequency(), Carrier::L2.frequency());
        let p1 = self.l1_pseudo_range()?;
        let p2 = self.get(Observable::P2)?;
        Some((f1 * p1 + f2 * p2) / (f1 + f2))
    }

    /// Melbourne-Wübbena combination, in wide lane cycles.
    /// Geometry, clocks and ionosphere cancel out: this is the wide lane
    /// ambiguity plus code noise.
    pub fn mw_combination(&self) -> Option<f64> {
        let wl = self.phase_wl_combination()?;
        let nl = self.code_nl_combination()?;
        Some((wl - nl) / WIDE_LANE_WAVELENGTH_M)
    }
}

impl Record {
    /// Stores P4, L4 (geometry free) and MW combinations.
    /// Insignificant geometry free combinations are stored as missing.
    pub(crate) fn update_combinations(&mut self) {
        let significant = |value: &f64| value.abs() >= MIN_DERIVED_OBSERVABLE;
        let p4 = self.observations.code_gf_combination().filter(significant);
        let l4 = self.observations.phase_gf_combination().filter(significant);
        let mw = self.observations.mw_combination();
        self.set_derived(Derived::P4, p4);
        self.set_derived(Derived::L4, l4);
        self.set_derived(Derived::MelbourneWubbena, mw);
    }
}
