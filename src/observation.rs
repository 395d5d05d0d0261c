//! Raw observables
use crate::{
    constants::MIN_RAW_OBSERVATION,
    prelude::{Carrier, Error},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Loss of lock indicator bit (RINEX LLI bit 0)
pub const LLI_LOSS_OF_LOCK: u8 = 0x01;

/// Observables we consume. Storage is array backed and indexed by [Observable].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Observable {
    /// C/A code pseudo range on L1 (m)
    C1,
    /// P code pseudo range on L1 (m)
    P1,
    /// P code pseudo range on L2 (m)
    P2,
    /// Phase range on L1 (cycles)
    L1,
    /// Phase range on L2 (cycles)
    L2,
}

impl Observable {
    /// Number of [Observable]s
    pub const COUNT: usize = 5;

    /// All [Observable]s
    pub const ALL: [Self; Self::COUNT] = [Self::C1, Self::P1, Self::P2, Self::L1, Self::L2];

    const fn index(&self) -> usize {
        match self {
            Self::C1 => 0,
            Self::P1 => 1,
            Self::P2 => 2,
            Self::L1 => 3,
            Self::L2 => 4,
        }
    }

    /// [Carrier] this [Observable] is sampled on
    pub const fn carrier(&self) -> Carrier {
        match self {
            Self::C1 | Self::P1 | Self::L1 => Carrier::L1,
            Self::P2 | Self::L2 => Carrier::L2,
        }
    }

    /// True for phase observables (expressed in cycles)
    pub const fn is_phase(&self) -> bool {
        matches!(self, Self::L1 | Self::L2)
    }
}

impl std::fmt::Display for Observable {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::C1 => write!(f, "C1"),
            Self::P1 => write!(f, "P1"),
            Self::P2 => write!(f, "P2"),
            Self::L1 => write!(f, "L1"),
            Self::L2 => write!(f, "L2"),
        }
    }
}

impl std::str::FromStr for Observable {
    type Err = Error;
    /// Parses RINEX V2 codes, and the RINEX V3 codes they map to.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "C1" | "C1C" => Ok(Self::C1),
            "P1" | "C1P" | "C1W" => Ok(Self::P1),
            "P2" | "C2P" | "C2W" => Ok(Self::P2),
            "L1" | "L1C" | "L1P" | "L1W" => Ok(Self::L1),
            "L2" | "L2P" | "L2W" => Ok(Self::L2),
            _ => Err(Error::UnknownObservable(s.to_string())),
        }
    }
}

/// Observed values of one satellite at one epoch, with
/// loss of lock (LLI) and signal strength (SSI) indicators.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observations {
    values: [Option<f64>; Observable::COUNT],
    lli: [Option<u8>; Observable::COUNT],
    ssi: [Option<u8>; Observable::COUNT],
}

impl Observations {
    /// Returns [Observations] with this value
    pub fn with(&self, observable: Observable, value: f64) -> Self {
        let mut s = self.clone();
        s.set(observable, value);
        s
    }

    /// Returns [Observations] with this loss of lock indicator
    pub fn with_lli(&self, observable: Observable, lli: u8) -> Self {
        let mut s = self.clone();
        s.lli[observable.index()] = Some(lli);
        s
    }

    /// Returns [Observations] with this signal strength indicator
    pub fn with_ssi(&self, observable: Observable, ssi: u8) -> Self {
        let mut s = self.clone();
        s.ssi[observable.index()] = Some(ssi);
        s
    }

    /// Stores a value. A (near) zero value is the "missing" sentinel.
    pub fn set(&mut self, observable: Observable, value: f64) {
        self.values[observable.index()] = if value.abs() < MIN_RAW_OBSERVATION {
            None
        } else {
            Some(value)
        };
    }

    /// Removes this observation
    pub fn remove(&mut self, observable: Observable) {
        self.values[observable.index()] = None;
    }

    /// Returns observed value, if present
    pub fn get(&self, observable: Observable) -> Option<f64> {
        self.values[observable.index()]
    }

    /// Adds `offset` to a present value. Missing values remain missing.
    pub(crate) fn offset(&mut self, observable: Observable, offset: f64) {
        if let Some(value) = self.values[observable.index()].as_mut() {
            *value += offset;
        }
    }

    /// Returns loss of lock indicator, if any
    pub fn lli(&self, observable: Observable) -> Option<u8> {
        self.lli[observable.index()]
    }

    /// Returns signal strength indicator, if any
    pub fn ssi(&self, observable: Observable) -> Option<u8> {
        self.ssi[observable.index()]
    }

    /// True if receiver reported a loss of lock on this observable
    pub fn loss_of_lock(&self, observable: Observable) -> bool {
        self.lli(observable)
            .map(|lli| lli & LLI_LOSS_OF_LOCK > 0)
            .unwrap_or(false)
    }

    /// Returns L1 pseudo range: P1, or C1 when P1 is missing.
    pub fn l1_pseudo_range(&self) -> Option<f64> {
        self.get(Observable::P1).or(self.get(Observable::C1))
    }

    /// Returns (P1 or C1, P2, L1, L2) when all of them are present
    pub fn dual_frequency(&self) -> Option<(f64, f64, f64, f64)> {
        let p1 = self.l1_pseudo_range()?;
        let p2 = self.get(Observable::P2)?;
        let l1 = self.get(Observable::L1)?;
        let l2 = self.get(Observable::L2)?;
        Some((p1, p2, l1, l2))
    }

    /// True when this satellite may contribute to an arc
    pub fn is_dual_frequency(&self) -> bool {
        self.dual_frequency().is_some()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn observable_parsing() {
        for obs in Observable::ALL {
            assert_eq!(Observable::from_str(&obs.to_string()).unwrap(), obs);
        }
        assert_eq!(Observable::from_str("c1w").unwrap(), Observable::P1);
        assert_eq!(Observable::from_str("L2W").unwrap(), Observable::L2);
        assert!(Observable::from_str("S1").is_err());
    }

    #[test]
    fn missing_sentinel() {
        let obs = Observations::default()
            .with(Observable::C1, 2.0E7)
            .with(Observable::P1, 0.0)
            .with(Observable::P2, 2.0E7 + 3.0)
            .with(Observable::L1, 1.0E8)
            .with(Observable::L2, 0.9E8);

        assert!(obs.get(Observable::P1).is_none());
        assert_eq!(obs.l1_pseudo_range(), Some(2.0E7));
        assert!(obs.is_dual_frequency());

        let obs = obs.with(Observable::L2, 1.0E-4);
        assert!(obs.get(Observable::L2).is_none());
        assert!(!obs.is_dual_frequency());
    }

    #[test]
    fn loss_of_lock() {
        let obs = Observations::default()
            .with(Observable::L1, 1.0E8)
            .with_lli(Observable::L1, 0x01)
            .with_lli(Observable::L2, 0x04);
        assert!(obs.loss_of_lock(Observable::L1));
        assert!(!obs.loss_of_lock(Observable::L2));
        assert!(!obs.loss_of_lock(Observable::P1));
    }
}
