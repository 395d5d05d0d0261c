//! Observing station: epoch arena, arcs and processing pipeline
use std::collections::BTreeMap;

use itertools::Itertools;
use log::{debug, info, warn};

use crate::{
    arc,
    constants::TECU_PER_METER_L4,
    position::zenith_angle_at_shell,
    prelude::{
        Arc, Config, DayOfYear, Derived, Duration, Epoch, Error, ObsEpoch, OrbitSource,
        PiercePoint, Position, SmoothingMethod, Vector3, SV,
    },
    qc::{ClockJumpDetector, CycleSlipDetector, OutlierDetector},
    smoothing::{detrend, hatch, roti, window},
    time::contiguous_days,
};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Sampling intervals of the files of one station may differ by this much (s)
const MAX_INTERVAL_MISMATCH_S: f64 = 1.0E-3;

/// Observations of one station, as provided by a RINEX parser
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationFile {
    /// Nominal sampling interval
    pub interval: Duration,
    /// Approximate station position (ECEF, m), from the file header
    pub approx_position: Option<Vector3<f64>>,
    /// Observation epochs
    pub epochs: Vec<ObsEpoch>,
}

impl ObservationFile {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            approx_position: None,
            epochs: Vec::new(),
        }
    }

    /// Returns [ObservationFile] with this approximate position (ECEF, m)
    pub fn with_approx_position(mut self, ecef: Vector3<f64>) -> Self {
        self.approx_position = Some(ecef);
        self
    }

    /// Returns [ObservationFile] with these epochs
    pub fn with_epochs(mut self, epochs: Vec<ObsEpoch>) -> Self {
        self.epochs = epochs;
        self
    }

    /// First [Epoch]
    pub fn start(&self) -> Option<Epoch> {
        self.epochs.first().map(|e| e.epoch)
    }

    /// Last [Epoch]
    pub fn end(&self) -> Option<Epoch> {
        self.epochs.last().map(|e| e.epoch)
    }
}

/// TEC estimate of one satellite at one epoch, exported from a retained [Arc]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TecSample {
    /// [SV]
    pub sv: SV,
    /// [Epoch]
    pub epoch: Epoch,
    /// Phase smoothed P4 (m)
    pub smoothed_p4: f64,
    /// Slant TEC (TECU)
    pub stec: f64,
    /// Vertical TEC (TECU)
    pub vtec: Option<f64>,
    /// Vertical TEC residual (TECU), when averaging or detrending produced one
    pub detrended: Option<f64>,
    /// Elevation (degrees)
    pub elevation_deg: f64,
    /// Azimuth (degrees)
    pub azimuth_deg: Option<f64>,
    /// [PiercePoint]
    pub pierce_point: Option<PiercePoint>,
}

/// Observing [Station]. Owns the time ordered epochs and the arcs
/// retained for each satellite.
#[derive(Debug, Clone, Default)]
pub struct Station {
    interval: Duration,
    position: Option<Position>,
    epochs: Vec<ObsEpoch>,
    arcs: BTreeMap<SV, Vec<Arc>>,
}

impl Station {
    /// Builds a [Station] from strictly increasing epochs.
    pub fn new(
        interval: Duration,
        approx_position: Option<Vector3<f64>>,
        epochs: Vec<ObsEpoch>,
    ) -> Result<Self, Error> {
        if let Some((_, next)) = epochs
            .iter()
            .tuple_windows()
            .find(|(prev, next)| next.epoch <= prev.epoch)
        {
            return Err(Error::UnorderedEpochs(next.epoch));
        }

        let position = approx_position.and_then(Position::from_approx_ecef);
        if position.is_none() {
            warn!("no plausible approximate position: line of sight geometry disabled");
        }

        Ok(Self {
            interval,
            position,
            epochs,
            arcs: BTreeMap::new(),
        })
    }

    /// Concatenates the [ObservationFile]s of one station (typically, one per day).
    /// Files are sorted by start time. They must share the same sampling interval,
    /// must not overlap and must belong to the same year.
    /// The first plausible approximate position is adopted.
    pub fn from_files(mut files: Vec<ObservationFile>) -> Result<Self, Error> {
        files.retain(|file| !file.epochs.is_empty());
        files.sort_by_key(|file| file.start());

        let Some(first) = files.first() else {
            return Ok(Self::default());
        };

        let interval = first.interval;

        for file in files.iter().skip(1) {
            let (lhs, rhs) = (interval.to_seconds(), file.interval.to_seconds());
            if (lhs - rhs).abs() > MAX_INTERVAL_MISMATCH_S {
                return Err(Error::InconsistentSampling(lhs, rhs));
            }
        }

        for (prev, next) in files.iter().tuple_windows() {
            if let (Some(prev_end), Some(next_start)) = (prev.end(), next.start()) {
                if next_start <= prev_end {
                    return Err(Error::OverlappingObservations(next_start));
                }
            }
        }

        if let (Some(start), Some(end)) = (
            files.first().and_then(|f| f.start()),
            files.last().and_then(|f| f.end()),
        ) {
            if start.year() != end.year() {
                return Err(Error::CrossYear(start.year(), end.year()));
            }
        }

        let approx_position = files
            .iter()
            .filter_map(|file| file.approx_position)
            .find(|ecef| Position::from_approx_ecef(*ecef).is_some());

        let epochs = files
            .into_iter()
            .flat_map(|file| file.epochs.into_iter())
            .collect::<Vec<_>>();

        let station = Self::new(interval, approx_position, epochs)?;

        let days = station.days();
        if !contiguous_days(&days) {
            warn!(
                "observation days are not contiguous: {}",
                days.iter().join(", ")
            );
        }

        Ok(station)
    }

    /// Sampling interval of the observations
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Approximate [Position], when plausible
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Time ordered epochs
    pub fn epochs(&self) -> &[ObsEpoch] {
        &self.epochs
    }

    /// Retained [Arc]s, per [SV]
    pub fn arcs(&self) -> &BTreeMap<SV, Vec<Arc>> {
        &self.arcs
    }

    /// Iterates over all retained [Arc]s
    pub fn all_arcs(&self) -> impl Iterator<Item = &Arc> + '_ {
        self.arcs.values().flatten()
    }

    /// Days covered by the observations, in chronological order
    pub fn days(&self) -> Vec<DayOfYear> {
        self.epochs
            .iter()
            .map(|e| DayOfYear::from_epoch(e.epoch))
            .dedup()
            .collect()
    }

    /// Writes interpolated satellite position and clock into every record,
    /// and the line of sight geometry when the station position is known.
    pub fn annotate<O: OrbitSource>(&mut self, cfg: &Config, orbits: &O) {
        let position = self.position;
        let mut missing = 0;

        for epoch in self.epochs.iter_mut() {
            let t = epoch.epoch;
            for (sv, rec) in epoch.records.iter_mut() {
                rec.sv_position = orbits.position_at(t, *sv);
                rec.sv_clock = orbits.clock_at(t, *sv);

                let Some(sv_position) = rec.sv_position else {
                    missing += 1;
                    continue;
                };

                if let Some(position) = position {
                    let azel = position.azimuth_elevation(sv_position);
                    rec.azimuth_deg = Some(azel.azimuth);
                    rec.elevation_deg = Some(azel.elevation);
                    rec.pierce_point = Some(position.pierce_point(azel, cfg.shell_height_m));
                }
            }
        }

        if missing > 0 {
            warn!("{} records without orbital support", missing);
        }
    }

    /// Detects and repairs receiver clock jumps
    pub fn repair_clock_jumps(&mut self, cfg: &Config) -> Vec<usize> {
        ClockJumpDetector::new(cfg.clock_jump).process(&mut self.epochs, cfg.interval())
    }

    /// Flags pseudo range outliers, returns the number of flagged records
    pub fn mark_outliers(&mut self, cfg: &Config) -> usize {
        OutlierDetector::new(cfg.outliers).mark(&mut self.epochs)
    }

    /// (Re)builds the [Arc]s of every satellite
    pub fn detect_arcs(&mut self, cfg: &Config) -> &BTreeMap<SV, Vec<Arc>> {
        self.arcs = arc::detect(&self.epochs, cfg.interval(), cfg.min_arc_len);
        &self.arcs
    }

    /// Splits the [Arc]s on every cycle slip, drops fragments that became too short
    pub fn detect_cycle_slips(&mut self, cfg: &Config) {
        let detector = CycleSlipDetector::new(cfg.cycle_slip);
        let arcs = std::mem::take(&mut self.arcs);

        for (sv, arcs) in arcs {
            let clean = detector.process(&mut self.epochs, arcs, cfg.min_arc_len);
            if !clean.is_empty() {
                self.arcs.insert(sv, clean);
            }
        }
    }

    /// Computes P4, L4 and MW combinations of every record
    pub fn compute_combinations(&mut self) {
        for epoch in self.epochs.iter_mut() {
            for rec in epoch.records.values_mut() {
                rec.update_combinations();
            }
        }
    }

    /// Smoothes every [Arc] with selected [SmoothingMethod].
    /// Methods that need surrounding samples reduce the [Arc]s.
    pub fn smooth(&mut self, cfg: &Config) -> Result<(), Error> {
        let arcs = std::mem::take(&mut self.arcs);

        for (sv, arcs) in arcs {
            let mut smoothed = Vec::with_capacity(arcs.len());
            for arc in arcs {
                let reduced = match cfg.smoothing {
                    SmoothingMethod::BidirectionalHatch => {
                        hatch::bidirectional(&mut self.epochs, &arc, &cfg.hatch);
                        Some(arc)
                    },
                    SmoothingMethod::Hatch | SmoothingMethod::MovingAverage(_) => {
                        hatch::mean(&mut self.epochs, &arc);
                        Some(arc)
                    },
                    SmoothingMethod::DoubleDifference => {
                        hatch::mean(&mut self.epochs, &arc);
                        roti::double_difference(&mut self.epochs, &arc)
                    },
                    SmoothingMethod::Roti(order) => {
                        hatch::mean(&mut self.epochs, &arc);
                        roti::roti(&mut self.epochs, &arc, order)?
                    },
                };
                match reduced {
                    Some(reduced) => smoothed.push(reduced),
                    None => debug!("{} - too short for {} smoothing", arc, cfg.smoothing),
                }
            }
            if !smoothed.is_empty() {
                self.arcs.insert(sv, smoothed);
            }
        }
        Ok(())
    }

    /// Converts the smoothed P4 of the retained records to slant and vertical TEC
    pub fn compute_tec(&mut self, cfg: &Config) {
        for arc in self.arcs.values().flatten() {
            for i in arc.indices() {
                let Some(rec) = self.epochs.get_mut(i).and_then(|e| e.record_mut(arc.sv)) else {
                    continue;
                };
                let stec = rec.derived(Derived::SmoothedP4).map(|sp4| sp4 * TECU_PER_METER_L4);
                let vtec = match (stec, rec.elevation_deg) {
                    (Some(stec), Some(elev)) => {
                        let z = zenith_angle_at_shell(elev.to_radians(), cfg.shell_height_m);
                        Some(stec * z.cos())
                    },
                    _ => None,
                };
                rec.set_derived(Derived::Stec, stec);
                rec.set_derived(Derived::Vtec, vtec);
            }
        }
    }

    /// Replaces the vertical TEC by its centered moving average, the residual
    /// being stored as [Derived::Detrended]. [Arc]s lose one half window on each side.
    pub fn average_vtec(&mut self, order: usize) -> Result<(), Error> {
        let arcs = std::mem::take(&mut self.arcs);

        for (sv, arcs) in arcs {
            let mut averaged = Vec::with_capacity(arcs.len());
            for arc in arcs {
                match window::moving_average(&mut self.epochs, &arc, Derived::Vtec, order)? {
                    Some(reduced) => averaged.push(reduced),
                    None => debug!("{} - shorter than averaging window", arc),
                }
            }
            if !averaged.is_empty() {
                self.arcs.insert(sv, averaged);
            }
        }
        Ok(())
    }

    /// Removes a polynomial trend from the vertical TEC of every [Arc]
    pub fn detrend(&mut self, order: usize) {
        for arc in self.arcs.values().flatten() {
            if detrend::polynomial(&mut self.epochs, arc, Derived::Vtec, order).is_none() {
                debug!("{} - not detrended", arc);
            }
        }
    }

    /// Runs the complete pipeline: orbit annotation, clock jump repair,
    /// outlier flagging, arc detection, cycle slip detection, combinations,
    /// smoothing, TEC conversion, vertical TEC averaging and optional detrending.
    pub fn preprocess<O: OrbitSource>(&mut self, cfg: &Config, orbits: &O) -> Result<(), Error> {
        let nominal = cfg.interval().to_seconds();
        if (self.interval.to_seconds() - nominal).abs() > MAX_INTERVAL_MISMATCH_S {
            warn!(
                "station sampled every {} s, processed at {} s",
                self.interval.to_seconds(),
                nominal
            );
        }

        self.annotate(cfg, orbits);

        let jumps = self.repair_clock_jumps(cfg);
        let outliers = self.mark_outliers(cfg);

        self.detect_arcs(cfg);
        let detected = self.all_arcs().count();

        self.detect_cycle_slips(cfg);
        self.compute_combinations();
        self.smooth(cfg)?;
        self.compute_tec(cfg);

        if let SmoothingMethod::MovingAverage(order) = cfg.smoothing {
            self.average_vtec(order)?;
        }

        if let Some(order) = cfg.detrend_order {
            self.detrend(order);
        }

        info!(
            "{} epochs: {} clock jumps, {} outliers, {} arcs detected, {} retained",
            self.epochs.len(),
            jumps.len(),
            outliers,
            detected,
            self.all_arcs().count()
        );
        Ok(())
    }

    /// Exports a [TecSample] for each record of the retained [Arc]s that has a
    /// positive smoothed P4 and was observed above the elevation mask.
    pub fn tec_samples(&self, cfg: &Config) -> Vec<TecSample> {
        let mut samples = Vec::new();
        for arc in self.all_arcs() {
            for i in arc.indices() {
                let Some(epoch) = self.epochs.get(i) else {
                    continue;
                };
                let Some(rec) = epoch.record(arc.sv) else {
                    continue;
                };
                let (Some(smoothed_p4), Some(elevation_deg)) =
                    (rec.derived(Derived::SmoothedP4), rec.elevation_deg)
                else {
                    continue;
                };
                if smoothed_p4 <= 0.0 || elevation_deg < cfg.elevation_mask_deg {
                    continue;
                }
                samples.push(TecSample {
                    sv: arc.sv,
                    epoch: epoch.epoch,
                    smoothed_p4,
                    stec: smoothed_p4 * TECU_PER_METER_L4,
                    vtec: rec.derived(Derived::Vtec),
                    detrended: rec.derived(Derived::Detrended),
                    elevation_deg,
                    azimuth_deg: rec.azimuth_deg,
                    pierce_point: rec.pierce_point,
                });
            }
        }
        samples.sort_by(|a, b| (a.epoch, a.sv).cmp(&(b.epoch, b.sv)));
        samples
    }
}
