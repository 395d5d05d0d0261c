//! Observation epochs
use std::collections::BTreeMap;

use crate::prelude::{Epoch, Record, SV};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Receiver epoch flag
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EpochFlag {
    /// Regular epoch
    #[default]
    Ok,
    /// Power failure reported since previous epoch
    PowerFailure,
    /// Any other special event. Such epochs do not contribute to arcs.
    Event(u8),
}

impl EpochFlag {
    /// Builds [EpochFlag] from RINEX epoch flag
    pub fn from_rinex(flag: u8) -> Self {
        match flag {
            0 => Self::Ok,
            1 => Self::PowerFailure,
            other => Self::Event(other),
        }
    }

    pub fn is_ok(&self) -> bool {
        *self == Self::Ok
    }
}

/// Unit of a receiver [ClockJump]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ClockJumpKind {
    Millisecond,
    Microsecond,
}

impl ClockJumpKind {
    /// Unit duration in seconds
    pub const fn seconds(&self) -> f64 {
        match self {
            Self::Millisecond => 1.0E-3,
            Self::Microsecond => 1.0E-6,
        }
    }
}

/// Receiver clock jump, detected and repaired at one epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockJump {
    /// [ClockJumpKind]
    pub kind: ClockJumpKind,
    /// Signed number of units
    pub magnitude: i64,
}

impl ClockJump {
    /// Jump expressed in seconds
    pub fn seconds(&self) -> f64 {
        self.magnitude as f64 * self.kind.seconds()
    }
}

impl std::fmt::Display for ClockJump {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.kind {
            ClockJumpKind::Millisecond => write!(f, "{} ms", self.magnitude),
            ClockJumpKind::Microsecond => write!(f, "{} us", self.magnitude),
        }
    }
}

/// All satellites observed at one [Epoch]
#[derive(Debug, Clone, PartialEq)]
pub struct ObsEpoch {
    /// Sampling [Epoch]
    pub epoch: Epoch,
    /// [EpochFlag]
    pub flag: EpochFlag,
    /// Receiver [ClockJump] repaired at this epoch
    pub clock_jump: Option<ClockJump>,
    /// [Record]s, per [SV]
    pub records: BTreeMap<SV, Record>,
}

impl ObsEpoch {
    pub fn new(epoch: Epoch) -> Self {
        Self {
            epoch,
            flag: EpochFlag::Ok,
            clock_jump: None,
            records: BTreeMap::new(),
        }
    }

    /// Returns [ObsEpoch] with this [EpochFlag]
    pub fn with_flag(mut self, flag: EpochFlag) -> Self {
        self.flag = flag;
        self
    }

    /// Returns [ObsEpoch] with this [Record]
    pub fn with_record(mut self, record: Record) -> Self {
        self.records.insert(record.sv, record);
        self
    }

    pub fn record(&self, sv: SV) -> Option<&Record> {
        self.records.get(&sv)
    }

    pub fn record_mut(&mut self, sv: SV) -> Option<&mut Record> {
        self.records.get_mut(&sv)
    }
}
