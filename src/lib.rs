#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

// private modules
mod arc;
mod averager;
mod carrier;
mod cfg;
mod combination;
mod constants;
mod epoch;
mod error;
mod observation;
mod orbit;
mod position;
mod record;
mod station;
mod time;

// public modules
pub mod qc;
pub mod smoothing;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::arc::Arc;
    pub use crate::carrier::Carrier;
    pub use crate::cfg::{
        ClockJumpOpts, Config, CycleSlipOpts, HatchOpts, OutlierOpts, SmoothingMethod,
    };
    pub use crate::epoch::{ClockJump, ClockJumpKind, EpochFlag, ObsEpoch};
    pub use crate::error::Error;
    pub use crate::observation::{Observable, Observations};
    pub use crate::orbit::{EphemerisSample, OrbitSource, PreciseEphemeris};
    pub use crate::position::{AzElDeg, Position};
    pub use crate::record::{Derived, PiercePoint, Record};
    pub use crate::station::{ObservationFile, Station, TecSample};
    pub use crate::time::DayOfYear;
    // re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale};
    pub use nalgebra::Vector3;
}

// pub export
pub use error::Error;
