//! Centered moving average
use crate::{
    averager::Averager,
    prelude::{Arc, Derived, Error, ObsEpoch},
    smoothing::{half_widths, series, store},
};

/// Replaces `derived` by its centered moving average of given order, absent samples
/// being skipped. The residual (raw minus average) is stored as [Derived::Detrended].
/// Returns the reduced [Arc] on which the average is defined: it loses one half
/// window on each side, or None when the [Arc] is too short.
pub fn moving_average(
    epochs: &mut [ObsEpoch],
    arc: &Arc,
    derived: Derived,
    order: usize,
) -> Result<Option<Arc>, Error> {
    if order < 2 {
        return Err(Error::InvalidWindowOrder(order));
    }

    let (left, right) = half_widths(order);
    let Some(reduced) = arc.shrink(left, right) else {
        return Ok(None);
    };

    let raw = series(epochs, arc, derived);
    let mut averaged = Vec::with_capacity(reduced.len());
    let mut residuals = Vec::with_capacity(reduced.len());

    for i in left..arc.len() - right {
        let mut averager = Averager::new();
        for value in raw[i - left..=i + right].iter().flatten() {
            averager.add(*value);
        }
        let mean = averager.value();
        averaged.push(mean);
        residuals.push(match (raw[i], mean) {
            (Some(raw), Some(mean)) => Some(raw - mean),
            _ => None,
        });
    }

    store(epochs, &reduced, derived, &averaged);
    store(epochs, &reduced, Derived::Detrended, &residuals);
    Ok(Some(reduced))
}
