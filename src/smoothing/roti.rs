//! Phase based ionospheric activity indices
use crate::{
    averager::Averager,
    constants::TECU_PER_METER_L4,
    prelude::{Arc, Derived, Error, ObsEpoch},
    smoothing::{half_widths, series, store},
};

/// Second order time difference of L4, in TECU, stored as [Derived::DoubleDifference].
/// Returns the [Arc] reduced by one epoch on each side.
pub fn double_difference(epochs: &mut [ObsEpoch], arc: &Arc) -> Option<Arc> {
    let reduced = arc.shrink(1, 1)?;
    let l4 = series(epochs, arc, Derived::L4);

    let dd = l4
        .windows(3)
        .map(|w| match (w[0], w[1], w[2]) {
            (Some(l0), Some(l1), Some(l2)) => Some(TECU_PER_METER_L4 * ((l2 - l1) - (l1 - l0))),
            _ => None,
        })
        .collect::<Vec<_>>();

    store(epochs, &reduced, Derived::DoubleDifference, &dd);
    Some(reduced)
}

/// Rate of TEC (TECU/min): first time difference of L4, stored as [Derived::Rot].
/// Returns the [Arc] reduced by its first epoch.
pub fn rate_of_tec(epochs: &mut [ObsEpoch], arc: &Arc) -> Option<Arc> {
    let reduced = arc.shrink(1, 0)?;
    let l4 = series(epochs, arc, Derived::L4);

    let rot = arc
        .indices()
        .zip(l4.iter())
        .collect::<Vec<_>>()
        .windows(2)
        .map(|w| {
            let ((i0, l0), (i1, l1)) = (w[0], w[1]);
            let minutes = (epochs[i1].epoch - epochs[i0].epoch).to_seconds() / 60.0;
            match (l0, l1) {
                (Some(l0), Some(l1)) if minutes > 0.0 => {
                    Some(TECU_PER_METER_L4 * (l1 - l0) / minutes)
                },
                _ => None,
            }
        })
        .collect::<Vec<_>>();

    store(epochs, &reduced, Derived::Rot, &rot);
    Some(reduced)
}

/// Rate of TEC index: standard deviation of the rate of TEC over a centered
/// window of given order, stored as [Derived::Roti]. Windows with less than
/// two valid samples have no index. Returns the [Arc] on which the index is defined.
pub fn roti(epochs: &mut [ObsEpoch], arc: &Arc, order: usize) -> Result<Option<Arc>, Error> {
    if order < 2 {
        return Err(Error::InvalidWindowOrder(order));
    }

    let Some(rot_arc) = rate_of_tec(epochs, arc) else {
        return Ok(None);
    };

    let (left, right) = half_widths(order);
    let Some(reduced) = rot_arc.shrink(left, right) else {
        return Ok(None);
    };

    let rot = series(epochs, &rot_arc, Derived::Rot);
    let mut indices = Vec::with_capacity(reduced.len());

    for i in left..rot.len() - right {
        let mut mean = Averager::new();
        let mut mean_sq = Averager::new();
        for value in rot[i - left..=i + right].iter().flatten() {
            mean.add(*value);
            mean_sq.add(value * value);
        }
        let index = if mean.count < 2 {
            None
        } else {
            Some((mean_sq.mean - mean.mean * mean.mean).max(0.0).sqrt())
        };
        indices.push(index);
    }

    store(epochs, &reduced, Derived::Roti, &indices);
    Ok(Some(reduced))
}
