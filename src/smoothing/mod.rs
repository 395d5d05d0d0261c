//! Arc smoothing
//!
//! Every method reads and writes [Derived] observables of the
//! records of one [Arc], in place. Methods that need surrounding
//! samples return the reduced [Arc] on which their output is valid.
use crate::prelude::{Arc, Derived, ObsEpoch};

pub mod detrend;
pub mod hatch;
pub mod roti;
pub mod window;

/// Reads one [Derived] observable along this [Arc]
pub(crate) fn series(epochs: &[ObsEpoch], arc: &Arc, derived: Derived) -> Vec<Option<f64>> {
    arc.indices()
        .map(|i| {
            epochs
                .get(i)
                .and_then(|epoch| epoch.record(arc.sv))
                .and_then(|rec| rec.derived(derived))
        })
        .collect()
}

/// Writes one [Derived] observable along this [Arc]
pub(crate) fn store(epochs: &mut [ObsEpoch], arc: &Arc, derived: Derived, values: &[Option<f64>]) {
    for (i, value) in arc.indices().zip(values.iter()) {
        if let Some(rec) = epochs.get_mut(i).and_then(|epoch| epoch.record_mut(arc.sv)) {
            rec.set_derived(derived, *value);
        }
    }
}

/// Number of samples preceding and following the center of a window of this order
pub(crate) fn half_widths(order: usize) -> (usize, usize) {
    if order % 2 == 0 {
        (order / 2, (order / 2).saturating_sub(1))
    } else {
        ((order - 1) / 2, (order - 1) / 2)
    }
}
