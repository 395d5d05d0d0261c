use log::{debug, info};

use crate::{
    averager::Averager,
    cfg::CycleSlipOpts,
    constants::WIDE_LANE_WAVELENGTH_M,
    observation::Observable,
    prelude::{Arc, Carrier, ObsEpoch, SV},
};

/// Kind of [Discontinuity]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscontinuityKind {
    /// Phase ambiguity changed
    CycleSlip,
    /// Isolated wide lane jump
    Outlier,
    /// Required observables are missing
    DataGap,
}

/// Discontinuity found while scanning an [Arc]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discontinuity {
    /// Epoch index of the offending record
    pub index: usize,
    /// [DiscontinuityKind]
    pub kind: DiscontinuityKind,
}

/// Melbourne-Wübbena based cycle slip detector, completed by
/// geometry free and loss of lock tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleSlipDetector {
    opts: CycleSlipOpts,
}

impl CycleSlipDetector {
    pub fn new(opts: CycleSlipOpts) -> Self {
        Self { opts }
    }

    /// A priori deviation of the wide lane ambiguity (cycles),
    /// propagated from code and phase noise.
    pub fn initial_deviation(&self) -> f64 {
        let (f1, f2) = (Carrier::L1.frequency(), Carrier::L2.frequency());
        let (f1_2, f2_2) = (f1 * f1, f2 * f2);
        let var_l = self.opts.phase_noise_m.powi(2);
        let var_p = self.opts.code_noise_m.powi(2);
        let var = (f1_2 * var_l + f2_2 * var_l) / (f1 - f2).powi(2)
            + (f1_2 * var_p + f2_2 * var_p) / (f1 + f2).powi(2);
        var.sqrt() / WIDE_LANE_WAVELENGTH_M
    }

    /// Scans this [Arc] and stops on the first [Discontinuity].
    /// The offending record is flagged (unless this is a data gap) and
    /// belongs to neither fragment: callers split with [Arc::exclude].
    pub fn detect(&self, epochs: &mut [ObsEpoch], arc: &Arc) -> Option<Discontinuity> {
        let sv = arc.sv;
        let n = arc.len();
        if n < 2 || arc.end >= epochs.len() {
            return None;
        }

        let Some(nw_0) = mw_at(epochs, sv, arc.start) else {
            return Some(gap(arc.start));
        };
        let Some(mut nw_cur) = mw_at(epochs, sv, arc.start + 1) else {
            return Some(gap(arc.start + 1));
        };

        let mut stats = Averager::seeded(nw_0, self.initial_deviation());
        let mut gf_prev = gf_at(epochs, sv, arc.start);

        for k in 1..n {
            let index = arc.start + k;

            let nw_next = if k + 1 < n {
                match mw_at(epochs, sv, index + 1) {
                    Some(nw) => Some(nw),
                    None => return Some(gap(index + 1)),
                }
            } else {
                None
            };

            let sigma = stats.std_dev();
            if (nw_cur - stats.mean).abs() > self.opts.mw_factor * sigma {
                let confirmed = nw_next
                    .map(|nw| (nw - nw_cur).abs() < self.opts.mw_confirm_cycles)
                    .unwrap_or(false);

                let kind = if confirmed {
                    DiscontinuityKind::CycleSlip
                } else {
                    DiscontinuityKind::Outlier
                };

                let rec = epochs[index].record_mut(sv)?;
                match kind {
                    DiscontinuityKind::CycleSlip => rec.cycle_slip = true,
                    _ => rec.outlier = true,
                }

                info!(
                    "{}({}) - {:?}: wide lane jump {:.3} cycles (sigma={:.3})",
                    epochs[index].epoch,
                    sv,
                    kind,
                    nw_cur - stats.mean,
                    sigma
                );
                return Some(Discontinuity { index, kind });
            }

            stats.add(nw_cur);

            let gf_cur = gf_at(epochs, sv, index);
            let rec = epochs[index].record_mut(sv)?;
            if !rec.is_flagged() {
                let gf_jump = match (gf_prev, gf_cur) {
                    (Some(prev), Some(cur)) => (cur - prev).abs() > self.opts.gf_threshold_m,
                    _ => false,
                };
                let lost_lock = rec.observations.loss_of_lock(Observable::L1)
                    || rec.observations.loss_of_lock(Observable::L2);

                if gf_jump || lost_lock {
                    rec.cycle_slip = true;
                    if gf_jump {
                        info!("{}({}) - geometry free cycle slip", epochs[index].epoch, sv);
                    } else {
                        info!("{}({}) - loss of lock", epochs[index].epoch, sv);
                    }
                    return Some(Discontinuity {
                        index,
                        kind: DiscontinuityKind::CycleSlip,
                    });
                }
            }

            gf_prev = gf_cur;
            if let Some(nw) = nw_next {
                nw_cur = nw;
            }
        }

        None
    }

    /// Runs the detection over all [Arc]s until no discontinuity remains.
    /// Fragments shorter than `min_len` are dropped.
    pub fn process(&self, epochs: &mut [ObsEpoch], arcs: Vec<Arc>, min_len: usize) -> Vec<Arc> {
        let mut clean = Vec::with_capacity(arcs.len());
        let mut stack = arcs;

        while let Some(arc) = stack.pop() {
            match self.detect(epochs, &arc) {
                None => clean.push(arc),
                Some(discontinuity) => {
                    let (before, after) = arc.exclude(discontinuity.index);
                    for fragment in [before, after].into_iter().flatten() {
                        if fragment.len() >= min_len {
                            stack.push(fragment);
                        } else {
                            debug!("{} - dropped fragment ({} epochs)", fragment, fragment.len());
                        }
                    }
                },
            }
        }

        clean.sort_by_key(|arc| arc.start);
        clean
    }
}

fn mw_at(epochs: &[ObsEpoch], sv: SV, index: usize) -> Option<f64> {
    epochs[index]
        .record(sv)
        .and_then(|rec| rec.observations.mw_combination())
}

fn gf_at(epochs: &[ObsEpoch], sv: SV, index: usize) -> Option<f64> {
    epochs[index]
        .record(sv)
        .and_then(|rec| rec.observations.phase_gf_combination())
}

fn gap(index: usize) -> Discontinuity {
    Discontinuity {
        index,
        kind: DiscontinuityKind::DataGap,
    }
}
