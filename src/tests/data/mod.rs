mod orbits;
pub use orbits::{circular_ephemeris, circular_position, OverheadOrbits};

use rand::{rngs::SmallRng, Rng, SeedableRng};

use std::str::FromStr;

use crate::{
    observation::{Observable, Observations},
    prelude::{Carrier, Constellation, Duration, Epoch, ObsEpoch, Position, Record, Vector3, SV},
};

pub const G01: SV = SV {
    prn: 1,
    constellation: Constellation::GPS,
};
pub const G02: SV = SV {
    prn: 2,
    constellation: Constellation::GPS,
};
pub const G05: SV = SV {
    prn: 5,
    constellation: Constellation::GPS,
};
pub const G07: SV = SV {
    prn: 7,
    constellation: Constellation::GPS,
};
pub const G13: SV = SV {
    prn: 13,
    constellation: Constellation::GPS,
};
pub const G15: SV = SV {
    prn: 15,
    constellation: Constellation::GPS,
};
pub const G24: SV = SV {
    prn: 24,
    constellation: Constellation::GPS,
};
pub const G30: SV = SV {
    prn: 30,
    constellation: Constellation::GPS,
};

pub const GPS_SATELLITES: [SV; 8] = [G01, G02, G05, G07, G13, G15, G24, G30];

/// One day at 30 s
pub const EPOCHS_PER_DAY: usize = 2880;

pub fn t0() -> Epoch {
    Epoch::from_str("2020-06-25T00:00:00 GPST").unwrap()
}

pub fn interval() -> Duration {
    Duration::from_seconds(30.0)
}

/// Station used in all scenarios (Wuhan)
pub fn station_position() -> Position {
    Position::from_geo(Vector3::new(
        30.53_f64.to_radians(),
        114.36_f64.to_radians(),
        71.0,
    ))
}

/// L1 slant ionospheric delay (m) at epoch `k`
pub fn l1_slant_delay(sv: SV, k: usize) -> f64 {
    let phase = 2.0 * std::f64::consts::PI * k as f64 / EPOCHS_PER_DAY as f64;
    4.0 + 0.1 * sv.prn as f64 + 2.0 * (phase + sv.prn as f64).sin()
}

/// Ratio of the L2 and L1 ionospheric delays
pub fn l2_delay_ratio() -> f64 {
    (Carrier::L1.frequency() / Carrier::L2.frequency()).powi(2)
}

/// Noise free P4 (m) at epoch `k`
pub fn true_p4(sv: SV, k: usize) -> f64 {
    l1_slant_delay(sv, k) * (l2_delay_ratio() - 1.0)
}

/// Geometric range (m) at epoch `k`
pub fn geometric_range(sv: SV, k: usize) -> f64 {
    2.0E7 + 1.0E5 * sv.prn as f64 + 40.0 * k as f64
}

/// Integer ambiguities of each satellite
pub fn ambiguities(sv: SV) -> (f64, f64) {
    (1000.0 + 10.0 * sv.prn as f64, 800.0 + 7.0 * sv.prn as f64)
}

/// Dual frequency observations of `sv` at epoch `k`, with code errors
pub fn observations(sv: SV, k: usize, e1: f64, e2: f64) -> Observations {
    let rho = geometric_range(sv, k);
    let iono1 = l1_slant_delay(sv, k);
    let iono2 = iono1 * l2_delay_ratio();
    let (n1, n2) = ambiguities(sv);
    Observations::default()
        .with(Observable::P1, rho + iono1 + e1)
        .with(Observable::P2, rho + iono2 + e2)
        .with(Observable::L1, (rho - iono1) / Carrier::L1.wavelength() + n1)
        .with(Observable::L2, (rho - iono2) / Carrier::L2.wavelength() + n2)
}

/// Builds synthetic observation epochs
#[derive(Debug, Clone)]
pub struct EpochsBuilder {
    len: usize,
    satellites: Vec<SV>,
    code_noise_m: f64,
    seed: u64,
}

impl Default for EpochsBuilder {
    fn default() -> Self {
        Self {
            len: EPOCHS_PER_DAY,
            satellites: vec![G01],
            code_noise_m: 0.0,
            seed: 0,
        }
    }
}

impl EpochsBuilder {
    pub fn len(mut self, len: usize) -> Self {
        self.len = len;
        self
    }

    pub fn satellites(mut self, satellites: &[SV]) -> Self {
        self.satellites = satellites.to_vec();
        self
    }

    /// Uniform code noise of given standard deviation (m)
    pub fn code_noise(mut self, code_noise_m: f64, seed: u64) -> Self {
        self.code_noise_m = code_noise_m;
        self.seed = seed;
        self
    }

    pub fn build(&self) -> Vec<ObsEpoch> {
        self.build_from(t0())
    }

    pub fn build_from(&self, start: Epoch) -> Vec<ObsEpoch> {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let bound = self.code_noise_m * 3.0_f64.sqrt();

        (0..self.len)
            .map(|k| {
                let mut epoch = ObsEpoch::new(start + interval() * k as i64);
                for sv in self.satellites.iter() {
                    let (e1, e2) = if bound > 0.0 {
                        (
                            rng.random_range(-bound..bound),
                            rng.random_range(-bound..bound),
                        )
                    } else {
                        (0.0, 0.0)
                    };
                    epoch = epoch.with_record(Record::new(*sv, observations(*sv, k, e1, e2)));
                }
                epoch
            })
            .collect()
    }
}

/// Adds `cycles` to the `observable` phase of `sv`, from epoch `from` onward
pub fn plant_cycles(
    epochs: &mut [ObsEpoch],
    sv: SV,
    observable: Observable,
    from: usize,
    cycles: f64,
) {
    for epoch in epochs[from..].iter_mut() {
        if let Some(rec) = epoch.record_mut(sv) {
            rec.observations.offset(observable, cycles);
        }
    }
}

/// Adds `meters` to both pseudo ranges of `sv`, from epoch `from` onward
pub fn plant_code_offset(epochs: &mut [ObsEpoch], sv: SV, from: usize, meters: f64) {
    for epoch in epochs[from..].iter_mut() {
        if let Some(rec) = epoch.record_mut(sv) {
            rec.observations.offset(Observable::P1, meters);
            rec.observations.offset(Observable::P2, meters);
        }
    }
}
