use log::{debug, info, warn};

use crate::{
    cfg::ClockJumpOpts,
    constants::SPEED_OF_LIGHT_M_S,
    epoch::ClockJumpKind,
    observation::Observable,
    prelude::{Carrier, ClockJump, Duration, ObsEpoch, SV},
    time::is_nominal_step,
};

/// Receiver clock jump detector and repairer.
/// Millisecond (resp. microsecond) jumps offset every pseudo range of
/// the receiver, while carrier phases continue smoothly: the code minus
/// phase variation of all satellites reveals the jump.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClockJumpDetector {
    opts: ClockJumpOpts,
}

/// Code minus phase variations of one epoch transition
#[derive(Debug, Default)]
struct Votes {
    valid: usize,
    millisecond: Vec<f64>,
    microsecond: Vec<f64>,
}

impl ClockJumpDetector {
    pub fn new(opts: ClockJumpOpts) -> Self {
        Self { opts }
    }

    /// Code minus phase variation (m) above which a satellite votes for a millisecond jump
    pub fn millisecond_threshold_m(&self) -> f64 {
        1.0E-3 * SPEED_OF_LIGHT_M_S - 3.0 * self.opts.code_noise_m
    }

    /// Code minus phase variation (m) above which a satellite votes for a microsecond jump
    pub fn microsecond_threshold_m(&self) -> f64 {
        self.opts.microsecond_threshold_m
    }

    fn votes(&self, prev: &ObsEpoch, cur: &ObsEpoch) -> Votes {
        let (lambda1, lambda2) = (Carrier::L1.wavelength(), Carrier::L2.wavelength());
        let ms_threshold = self.millisecond_threshold_m();
        let us_threshold = self.microsecond_threshold_m();

        let mut votes = Votes::default();

        for (sv, rec) in cur.records.iter() {
            let Some(prev_rec) = prev.record(*sv) else {
                continue;
            };
            let Some((p1, _, l1, l2)) = rec.observations.dual_frequency() else {
                continue;
            };
            let Some((prev_p1, _, prev_l1, prev_l2)) = prev_rec.observations.dual_frequency()
            else {
                continue;
            };

            let dp = p1 - prev_p1;
            let dl = (l1 - prev_l1) * lambda1;
            let dl4 = (l1 * lambda1 - l2 * lambda2) - (prev_l1 * lambda1 - prev_l2 * lambda2);

            if dl4.abs() > self.opts.gf_slip_threshold_m {
                debug!("{}({}) - suspected cycle slip, not voting", cur.epoch, sv);
                continue;
            }

            votes.valid += 1;

            let dx = dp - dl;
            if dx.abs() > ms_threshold {
                votes.millisecond.push(dx);
            } else if dx.abs() > us_threshold {
                votes.microsecond.push(dx);
            }
        }

        votes
    }

    /// Estimates the [ClockJump] from the unanimous votes, if any.
    fn estimate(&self, t: &ObsEpoch, votes: &Votes) -> Option<ClockJump> {
        if votes.valid == 0 {
            return None;
        }

        let (kind, values) = if votes.millisecond.len() == votes.valid {
            (ClockJumpKind::Millisecond, &votes.millisecond)
        } else if votes.microsecond.len() == votes.valid {
            (ClockJumpKind::Microsecond, &votes.microsecond)
        } else {
            if !votes.millisecond.is_empty() || !votes.microsecond.is_empty() {
                warn!(
                    "{} - ambiguous clock jump: {}/{} (ms) {}/{} (us) satellites",
                    t.epoch,
                    votes.millisecond.len(),
                    votes.valid,
                    votes.microsecond.len(),
                    votes.valid
                );
            }
            return None;
        };

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let units = mean / SPEED_OF_LIGHT_M_S / kind.seconds();
        let rounded = units.round();

        if rounded == 0.0 || (units - rounded).abs() > self.opts.rounding_tolerance {
            warn!(
                "{} - clock jump estimate {:.3} too far from integer value",
                t.epoch, units
            );
            return None;
        }

        Some(ClockJump {
            kind,
            magnitude: rounded as i64,
        })
    }

    /// Scans all epochs, repairs phase observations after each detected jump.
    /// Returns the epoch indices where jumps were repaired.
    pub fn process(&self, epochs: &mut [ObsEpoch], interval: Duration) -> Vec<usize> {
        let mut repaired = Vec::new();
        if !self.opts.enabled {
            return repaired;
        }

        for i in 1..epochs.len() {
            if !is_nominal_step(epochs[i - 1].epoch, epochs[i].epoch, interval) {
                continue;
            }

            let votes = self.votes(&epochs[i - 1], &epochs[i]);
            let Some(jump) = self.estimate(&epochs[i], &votes) else {
                continue;
            };

            info!("{} - receiver clock jump: {}", epochs[i].epoch, jump);
            epochs[i].clock_jump = Some(jump);
            repair(epochs, i, jump.seconds());
            repaired.push(i);
        }

        repaired
    }
}

/// Offsets the phases of every satellite present at `start`,
/// until each of them drops out.
fn repair(epochs: &mut [ObsEpoch], start: usize, seconds: f64) {
    let dl1 = seconds * SPEED_OF_LIGHT_M_S / Carrier::L1.wavelength();
    let dl2 = seconds * SPEED_OF_LIGHT_M_S / Carrier::L2.wavelength();

    let satellites = epochs[start].records.keys().copied().collect::<Vec<SV>>();

    for sv in satellites {
        for epoch in epochs[start..].iter_mut() {
            let Some(rec) = epoch.record_mut(sv) else {
                break;
            };
            rec.observations.offset(Observable::L1, dl1);
            rec.observations.offset(Observable::L2, dl2);
        }
    }
}
