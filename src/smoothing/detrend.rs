//! Polynomial detrending
use log::debug;
use polyfit_rs::polyfit_rs::polyfit;

use crate::{
    prelude::{Arc, Derived, ObsEpoch},
    smoothing::{series, store},
};

/// Evaluates a polynomial, coefficients in ascending order
pub(crate) fn eval_poly(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Fits a polynomial of given order to `derived` versus time (hours since
/// the start of the [Arc]) and stores the residual as [Derived::Detrended].
/// Returns the polynomial coefficients, in ascending order,
/// or None when the fit is not feasible.
pub fn polynomial(
    epochs: &mut [ObsEpoch],
    arc: &Arc,
    derived: Derived,
    order: usize,
) -> Option<Vec<f64>> {
    let t0 = epochs.get(arc.start)?.epoch;
    let values = series(epochs, arc, derived);

    let hours = arc
        .indices()
        .map(|i| (epochs[i].epoch - t0).to_seconds() / 3600.0)
        .collect::<Vec<_>>();

    let (x, y): (Vec<f64>, Vec<f64>) = hours
        .iter()
        .zip(values.iter())
        .filter_map(|(x, y)| y.map(|y| (*x, y)))
        .unzip();

    if x.len() <= order {
        debug!("{} - not enough samples to fit order {}", arc, order);
        return None;
    }

    let coeffs = match polyfit(&x, &y, order) {
        Ok(coeffs) => coeffs,
        Err(e) => {
            debug!("{} - polynomial fit failed: {}", arc, e);
            return None;
        },
    };

    let residuals = hours
        .iter()
        .zip(values.iter())
        .map(|(x, y)| y.map(|y| y - eval_poly(&coeffs, *x)))
        .collect::<Vec<_>>();

    store(epochs, arc, Derived::Detrended, &residuals);
    Some(coeffs)
}
