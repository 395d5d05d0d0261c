use log::debug;

use crate::{
    cfg::OutlierOpts,
    observation::{Observable, Observations},
    prelude::ObsEpoch,
};

/// Flags records whose pseudo ranges diverge.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlierDetector {
    opts: OutlierOpts,
}

impl OutlierDetector {
    pub fn new(opts: OutlierOpts) -> Self {
        Self { opts }
    }

    /// True if these [Observations] are an outlier: |P1 - P2| exceeds its threshold,
    /// or when P2 is missing, |P1 - C1| exceeds its threshold.
    pub fn is_outlier(&self, obs: &Observations) -> bool {
        let p1 = obs.get(Observable::P1);
        let p2 = obs.get(Observable::P2);
        let c1 = obs.get(Observable::C1);
        match (p1, p2, c1) {
            (Some(p1), Some(p2), _) => (p1 - p2).abs() > self.opts.p1p2_m,
            (Some(p1), None, Some(c1)) => (p1 - c1).abs() > self.opts.p1c1_m,
            _ => false,
        }
    }

    /// Flags all outliers, returns the number of records that were flagged.
    pub fn mark(&self, epochs: &mut [ObsEpoch]) -> usize {
        let mut flagged = 0;
        for epoch in epochs.iter_mut() {
            let t = epoch.epoch;
            for (sv, rec) in epoch.records.iter_mut() {
                if !rec.outlier && self.is_outlier(&rec.observations) {
                    debug!("{}({}) - pseudo range outlier", t, sv);
                    rec.outlier = true;
                    flagged += 1;
                }
            }
        }
        flagged
    }
}

#[cfg(test)]
mod test {
    use super::OutlierDetector;
    use crate::{
        cfg::OutlierOpts,
        observation::{Observable, Observations},
    };
    use rstest::rstest;

    #[rstest]
    #[case(Some(2.0E7), Some(2.0E7 + 29.0), None, false)]
    #[case(Some(2.0E7), Some(2.0E7 + 30.0), None, false)]
    #[case(Some(2.0E7), Some(2.0E7 + 30.5), None, true)]
    #[case(Some(2.0E7), Some(2.0E7 - 31.0), None, true)]
    #[case(Some(2.0E7), None, Some(2.0E7 + 10.0), false)]
    #[case(Some(2.0E7), None, Some(2.0E7 + 10.5), true)]
    #[case(None, Some(2.0E7), Some(2.0E7 + 100.0), false)]
    #[case(Some(2.0E7), Some(2.0E7 + 5.0), Some(2.0E7 + 50.0), false)]
    fn outlier_thresholds(
        #[case] p1: Option<f64>,
        #[case] p2: Option<f64>,
        #[case] c1: Option<f64>,
        #[case] expected: bool,
    ) {
        let mut obs = Observations::default();
        for (observable, value) in [
            (Observable::P1, p1),
            (Observable::P2, p2),
            (Observable::C1, c1),
        ] {
            if let Some(value) = value {
                obs.set(observable, value);
            }
        }
        let detector = OutlierDetector::new(OutlierOpts::default());
        assert_eq!(detector.is_outlier(&obs), expected);
    }
}
