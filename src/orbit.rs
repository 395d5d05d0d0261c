//! Satellite orbits
use std::collections::BTreeMap;

use log::{debug, warn};

use crate::{
    constants::TIME_TOLERANCE_S,
    prelude::{Duration, Epoch, Error, Vector3, SV},
};

/// Number of samples in the interpolation window
const LAGRANGE_WINDOW: usize = 10;

/// Samples preceding the target, in a centered window
const LAGRANGE_HALF_WINDOW: usize = 4;

/// Interpolation is not supported beyond this offset from the first sample (s).
const MAX_INTERPOLATION_SPAN_S: f64 = 86_400.0;

/// Any orbit provider should implement the [OrbitSource] trait to annotate
/// the observations. Both methods return None when the provider
/// has no support for this [Epoch] and [SV].
pub trait OrbitSource {
    /// Satellite position (ECEF, m) at requested [Epoch]
    fn position_at(&self, epoch: Epoch, sv: SV) -> Option<Vector3<f64>>;

    /// Satellite clock bias (s) at requested [Epoch]
    fn clock_at(&self, _epoch: Epoch, _sv: SV) -> Option<f64> {
        None
    }
}

/// One precise ephemeris entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EphemerisSample {
    /// Sampling [Epoch]
    pub epoch: Epoch,
    /// [SV]
    pub sv: SV,
    /// ECEF position (m)
    pub position: Vector3<f64>,
    /// Clock bias (s)
    pub clock: Option<f64>,
}

/// Precise ephemeris table, sampled at a fixed nominal interval
/// (typically 15 minutes). Positions are interpolated with a
/// 10 point Lagrange polynomial.
#[derive(Debug, Clone, Default)]
pub struct PreciseEphemeris {
    interval: Duration,
    epochs: Vec<Epoch>,
    table: Vec<BTreeMap<SV, (Vector3<f64>, Option<f64>)>>,
}

impl PreciseEphemeris {
    /// Builds [PreciseEphemeris] from time ordered samples.
    /// Samples sharing an [Epoch] must be contiguous.
    pub fn new(interval: Duration, samples: Vec<EphemerisSample>) -> Result<Self, Error> {
        let mut epochs = Vec::<Epoch>::new();
        let mut table = Vec::<BTreeMap<SV, (Vector3<f64>, Option<f64>)>>::new();

        for sample in samples {
            match epochs.last() {
                Some(last) if *last == sample.epoch => {},
                Some(last) if *last > sample.epoch => {
                    return Err(Error::UnorderedEphemeris(sample.epoch));
                },
                _ => {
                    epochs.push(sample.epoch);
                    table.push(BTreeMap::new());
                },
            }
            if let Some(entries) = table.last_mut() {
                entries.insert(sample.sv, (sample.position, sample.clock));
            }
        }

        if epochs.len() < LAGRANGE_WINDOW {
            warn!(
                "precise ephemeris: only {} samples, interpolation is not feasible",
                epochs.len()
            );
        }

        Ok(Self {
            interval,
            epochs,
            table,
        })
    }

    /// Nominal sampling interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of sampling epochs
    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    /// First sampling [Epoch]
    pub fn start(&self) -> Option<Epoch> {
        self.epochs.first().copied()
    }

    /// Index of the sample preceding `t`, when `t` is within the supported span.
    fn lower_index(&self, t: Epoch) -> Option<usize> {
        let start = self.start()?;
        let dt = (t - start).to_seconds();
        if dt + TIME_TOLERANCE_S < 0.0 || dt > MAX_INTERPOLATION_SPAN_S {
            warn!("{}: no precise ephemeris support", t);
            return None;
        }
        let interval = self.interval.to_seconds();
        if interval <= 0.0 {
            return None;
        }
        Some((dt / interval).floor().max(0.0) as usize)
    }

    /// Index of the sample coinciding with `t`, among `index` and `index + 1`
    fn coincident_index(&self, t: Epoch, index: usize) -> Option<usize> {
        [index, index + 1].into_iter().find(|i| {
            self.epochs
                .get(*i)
                .map(|ti| (t - *ti).abs().to_seconds() < TIME_TOLERANCE_S)
                .unwrap_or(false)
        })
    }

    /// First index of the interpolation window
    fn window_start(&self, index: usize) -> usize {
        let n = self.epochs.len();
        if index < LAGRANGE_HALF_WINDOW {
            0
        } else if index + LAGRANGE_WINDOW - LAGRANGE_HALF_WINDOW > n {
            n - LAGRANGE_WINDOW
        } else {
            index - LAGRANGE_HALF_WINDOW
        }
    }
}

/// Lagrange polynomial through (`nodes`, `values`), evaluated at `t`.
pub(crate) fn lagrange(nodes: &[f64], values: &[f64], t: f64) -> f64 {
    let mut sum = 0.0;
    for (i, (t_i, y_i)) in nodes.iter().zip(values.iter()).enumerate() {
        let mut l_i = 1.0;
        for (j, t_j) in nodes.iter().enumerate() {
            if i != j {
                l_i *= (t - t_j) / (t_i - t_j);
            }
        }
        sum += l_i * y_i;
    }
    sum
}

impl OrbitSource for PreciseEphemeris {
    fn position_at(&self, t: Epoch, sv: SV) -> Option<Vector3<f64>> {
        let index = self.lower_index(t)?;

        if let Some(exact) = self.coincident_index(t, index) {
            return self.table[exact].get(&sv).map(|(pos, _)| *pos);
        }

        if self.epochs.len() < LAGRANGE_WINDOW {
            return None;
        }

        let start = self.window_start(index);
        let mut nodes = [0.0_f64; LAGRANGE_WINDOW];
        let mut x = [0.0_f64; LAGRANGE_WINDOW];
        let mut y = [0.0_f64; LAGRANGE_WINDOW];
        let mut z = [0.0_f64; LAGRANGE_WINDOW];

        for i in 0..LAGRANGE_WINDOW {
            let k = start + i;
            let Some((pos, _)) = self.table[k].get(&sv) else {
                debug!("{}({}) - missing in ephemeris window", t, sv);
                return None;
            };
            nodes[i] = self.epochs[k].to_gpst_seconds();
            x[i] = pos[0];
            y[i] = pos[1];
            z[i] = pos[2];
        }

        let t_s = t.to_gpst_seconds();
        Some(Vector3::new(
            lagrange(&nodes, &x, t_s),
            lagrange(&nodes, &y, t_s),
            lagrange(&nodes, &z, t_s),
        ))
    }

    fn clock_at(&self, t: Epoch, sv: SV) -> Option<f64> {
        let index = self.lower_index(t)?;

        if let Some(exact) = self.coincident_index(t, index) {
            return self.table[exact].get(&sv).and_then(|(_, clk)| *clk);
        }

        let (t0, t1) = (self.epochs.get(index)?, self.epochs.get(index + 1)?);
        let c0 = self.table[index].get(&sv).and_then(|(_, clk)| *clk)?;
        let c1 = self.table[index + 1].get(&sv).and_then(|(_, clk)| *clk)?;

        let alpha = (t - *t0).to_seconds() / (*t1 - *t0).to_seconds();
        Some(c0 + alpha * (c1 - c0))
    }
}
