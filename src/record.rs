//! Epoch-satellite record
use crate::{
    observation::{Observable, Observations},
    prelude::{Vector3, SV},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Observables derived by the processing stages, stored next to the raw [Observations].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Derived {
    /// Code geometry free combination P2 - P1 (m)
    P4,
    /// Phase geometry free combination L2 λ2 - L1 λ1 (m)
    L4,
    /// Melbourne-Wübbena combination (wide lane cycles)
    MelbourneWubbena,
    /// Phase smoothed P4 (m)
    SmoothedP4,
    /// Slant TEC (TECU)
    Stec,
    /// Vertical TEC (TECU)
    Vtec,
    /// Residual of a smoothed or fitted observable
    Detrended,
    /// Second order time difference of L4 (TECU)
    DoubleDifference,
    /// Rate of TEC (TECU/min)
    Rot,
    /// Rate of TEC index (TECU/min)
    Roti,
}

impl Derived {
    /// Number of [Derived] observables
    pub const COUNT: usize = 10;

    const fn index(&self) -> usize {
        match self {
            Self::P4 => 0,
            Self::L4 => 1,
            Self::MelbourneWubbena => 2,
            Self::SmoothedP4 => 3,
            Self::Stec => 4,
            Self::Vtec => 5,
            Self::Detrended => 6,
            Self::DoubleDifference => 7,
            Self::Rot => 8,
            Self::Roti => 9,
        }
    }
}

impl std::fmt::Display for Derived {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::P4 => write!(f, "P4"),
            Self::L4 => write!(f, "L4"),
            Self::MelbourneWubbena => write!(f, "MW"),
            Self::SmoothedP4 => write!(f, "SP4"),
            Self::Stec => write!(f, "STEC"),
            Self::Vtec => write!(f, "VTEC"),
            Self::Detrended => write!(f, "DTEC"),
            Self::DoubleDifference => write!(f, "DD"),
            Self::Rot => write!(f, "ROT"),
            Self::Roti => write!(f, "ROTI"),
        }
    }
}

/// Ionospheric pierce point
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PiercePoint {
    /// Latitude in degrees
    pub latitude_deg: f64,
    /// Longitude in degrees
    pub longitude_deg: f64,
}

/// One satellite observed at one epoch.
/// The [Epoch] is held by the parent epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// [SV]
    pub sv: SV,
    /// Raw [Observations]
    pub observations: Observations,
    /// Interpolated satellite position (ECEF, m)
    pub sv_position: Option<Vector3<f64>>,
    /// Interpolated satellite clock bias (s)
    pub sv_clock: Option<f64>,
    /// Elevation angle in degrees
    pub elevation_deg: Option<f64>,
    /// Azimuth angle in degrees
    pub azimuth_deg: Option<f64>,
    /// [PiercePoint]
    pub pierce_point: Option<PiercePoint>,
    /// Flagged as outlier
    pub outlier: bool,
    /// Flagged as cycle slip
    pub cycle_slip: bool,
    derived: [Option<f64>; Derived::COUNT],
}

impl Record {
    pub fn new(sv: SV, observations: Observations) -> Self {
        Self {
            sv,
            observations,
            outlier: false,
            cycle_slip: false,
            sv_clock: None,
            sv_position: None,
            azimuth_deg: None,
            elevation_deg: None,
            pierce_point: None,
            derived: Default::default(),
        }
    }

    /// Shortcut to a raw observation
    pub fn get(&self, observable: Observable) -> Option<f64> {
        self.observations.get(observable)
    }

    /// Returns a [Derived] value, if it exists
    pub fn derived(&self, derived: Derived) -> Option<f64> {
        self.derived[derived.index()]
    }

    /// Stores a [Derived] value, as computed
    pub fn set_derived(&mut self, derived: Derived, value: Option<f64>) {
        self.derived[derived.index()] = value;
    }

    /// True if this record was flagged by quality control
    pub fn is_flagged(&self) -> bool {
        self.outlier || self.cycle_slip
    }

    /// True if this record may belong to an arc
    pub fn is_arc_candidate(&self) -> bool {
        !self.is_flagged() && self.observations.is_dual_frequency()
    }
}
