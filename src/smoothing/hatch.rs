//! Phase smoothing of the code geometry free combination (Hatch filter)
use log::debug;

use crate::{
    averager::Averager,
    cfg::HatchOpts,
    prelude::{Arc, Derived, ObsEpoch},
    smoothing::{series, store},
};

/// Single pass Hatch smoothing. Since P4 + L4 only holds the (constant)
/// phase ambiguity and the code noise, its mean over the [Arc] levelled by L4
/// is the smoothed P4. Records lacking P4 or L4 are left without smoothed value.
pub fn mean(epochs: &mut [ObsEpoch], arc: &Arc) {
    let p4 = series(epochs, arc, Derived::P4);
    let l4 = series(epochs, arc, Derived::L4);

    let mut averager = Averager::new();
    for (p4, l4) in p4.iter().zip(l4.iter()) {
        if let (Some(p4), Some(l4)) = (p4, l4) {
            averager.add(p4 + l4);
        }
    }

    let Some(level) = averager.value() else {
        debug!("{} - no data to smooth", arc);
        store(epochs, arc, Derived::SmoothedP4, &vec![None; arc.len()]);
        return;
    };

    let smoothed = p4
        .iter()
        .zip(l4.iter())
        .map(|(p4, l4)| match (p4, l4) {
            (Some(_), Some(l4)) => Some(level - l4),
            _ => None,
        })
        .collect::<Vec<_>>();

    store(epochs, arc, Derived::SmoothedP4, &smoothed);
}

/// Recursive Hatch filter, in sample order. The code weight decreases
/// linearly down to its floor. Missing L4 restarts the filter, missing P4
/// only propagates the previous estimate.
pub(crate) fn recursive(
    p4: &[Option<f64>],
    l4: &[Option<f64>],
    opts: &HatchOpts,
) -> Vec<Option<f64>> {
    let mut smoothed = Vec::with_capacity(p4.len());
    let mut weight = 1.0_f64;
    let mut prev = Option::<(f64, f64)>::None;

    for (p4, l4) in p4.iter().zip(l4.iter()) {
        let Some(l4) = *l4 else {
            smoothed.push(None);
            prev = None;
            continue;
        };

        let estimate = match prev {
            None => {
                weight = 1.0;
                *p4
            },
            Some((prev_sp4, prev_l4)) => {
                weight = (weight - opts.weight_decrement).max(opts.min_weight);
                let projected = prev_sp4 - (l4 - prev_l4);
                match p4 {
                    Some(p4) => Some(weight * p4 + (1.0 - weight) * projected),
                    None => Some(projected),
                }
            },
        };

        prev = estimate.map(|sp4| (sp4, l4));
        smoothed.push(estimate);
    }

    smoothed
}

/// Bidirectional Hatch filter: the recursive filter runs forward and backward.
/// Both estimates are averaged inside the [Arc], while the first (resp. last)
/// edge epochs use the backward (resp. forward) pass that converged there.
/// Arcs shorter than two edges are split in their middle.
pub fn bidirectional(epochs: &mut [ObsEpoch], arc: &Arc, opts: &HatchOpts) {
    let p4 = series(epochs, arc, Derived::P4);
    let l4 = series(epochs, arc, Derived::L4);
    let n = arc.len();

    let forward = recursive(&p4, &l4, opts);

    let p4_rev = p4.iter().rev().copied().collect::<Vec<_>>();
    let l4_rev = l4.iter().rev().copied().collect::<Vec<_>>();
    let mut backward = recursive(&p4_rev, &l4_rev, opts);
    backward.reverse();

    let edge = opts.edge_epochs;
    let mid = n / 2;

    let smoothed = (0..n)
        .map(|i| {
            let (fwd, bwd) = (forward[i], backward[i]);
            if n > 2 * edge {
                if i < edge {
                    bwd.or(fwd)
                } else if i >= n - edge {
                    fwd.or(bwd)
                } else {
                    match (fwd, bwd) {
                        (Some(fwd), Some(bwd)) => Some((fwd + bwd) / 2.0),
                        _ => fwd.or(bwd),
                    }
                }
            } else if i < mid {
                bwd.or(fwd)
            } else {
                fwd.or(bwd)
            }
        })
        .collect::<Vec<_>>();

    store(epochs, arc, Derived::SmoothedP4, &smoothed);
}
