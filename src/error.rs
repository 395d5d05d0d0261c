use thiserror::Error;

use crate::prelude::{Epoch, SV};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Observation files of one station must share the same sampling interval.
    #[error("inconsistent sampling interval: {0} s versus {1} s")]
    InconsistentSampling(f64, f64),

    /// Observation files of one station must not overlap in time.
    #[error("overlapping observations at {0}")]
    OverlappingObservations(Epoch),

    /// Observation files spanning several years are not processed.
    #[error("observations span several years ({0} and {1})")]
    CrossYear(i32, i32),

    /// Epochs (of one file, or of the concatenated station) are not strictly increasing.
    #[error("epochs are not in chronological order at {0}")]
    UnorderedEpochs(Epoch),

    /// Precise ephemeris samples are not strictly increasing.
    #[error("ephemeris samples are not in chronological order at {0}")]
    UnorderedEphemeris(Epoch),

    /// Split index must lie strictly inside the arc.
    #[error("{sv}: cannot split arc [{start}, {end}] at {index}")]
    InvalidArcSplit {
        sv: SV,
        start: usize,
        end: usize,
        index: usize,
    },

    #[error("unknown observable \"{0}\"")]
    UnknownObservable(String),

    #[error("unknown smoothing method \"{0}\"")]
    UnknownSmoothingMethod(String),

    /// Moving windows need at least two samples.
    #[error("invalid window order {0}")]
    InvalidWindowOrder(usize),
}
