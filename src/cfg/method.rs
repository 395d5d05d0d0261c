use crate::prelude::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default ROTI window order
pub(crate) const fn default_roti_order() -> usize {
    9
}

/// Smoothing method applied to each arc, once quality control completed.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SmoothingMethod {
    /// Single pass Hatch smoothing: the arc wide mean of P4+L4
    /// is levelled by L4 at every epoch. Very robust on long arcs,
    /// this is the default method.
    #[default]
    Hatch,

    /// Recursive Hatch filter, run forward and backward over the arc.
    /// Both passes are averaged inside the arc, while each edge uses the
    /// pass that already converged there.
    BidirectionalHatch,

    /// [SmoothingMethod::Hatch] followed by a centered moving average of the
    /// vertical TEC, of given window order. The residual is stored as
    /// the detrended observable and arcs lose one half window on each side.
    MovingAverage(usize),

    /// [SmoothingMethod::Hatch] plus the second order time difference of L4,
    /// expressed in TECU. Arcs lose one epoch on each side.
    DoubleDifference,

    /// [SmoothingMethod::Hatch] plus the Rate Of TEC (TECU/min) and its Index
    /// (ROTI) over a centered window of given order.
    Roti(usize),
}

impl std::fmt::Display for SmoothingMethod {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Hatch => write!(fmt, "hatch"),
            Self::BidirectionalHatch => write!(fmt, "bidirectional"),
            Self::MovingAverage(order) => write!(fmt, "moving-average:{}", order),
            Self::DoubleDifference => write!(fmt, "double-difference"),
            Self::Roti(order) => write!(fmt, "roti:{}", order),
        }
    }
}

impl std::str::FromStr for SmoothingMethod {
    type Err = Error;
    /// Parses "hatch", "bidirectional", "double-difference",
    /// "moving-average:N", "roti" or "roti:N".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let (name, order) = match lowered.split_once(':') {
            Some((name, order)) => {
                let order = order
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| Error::UnknownSmoothingMethod(s.to_string()))?;
                (name.trim().to_string(), Some(order))
            },
            None => (lowered, None),
        };

        match (name.as_str(), order) {
            ("hatch", None) => Ok(Self::Hatch),
            ("bidirectional", None) | ("bidirectional-hatch", None) => {
                Ok(Self::BidirectionalHatch)
            },
            ("double-difference", None) | ("dd", None) => Ok(Self::DoubleDifference),
            ("moving-average", Some(order)) | ("ma", Some(order)) => {
                if order < 2 {
                    Err(Error::InvalidWindowOrder(order))
                } else {
                    Ok(Self::MovingAverage(order))
                }
            },
            ("roti", order) => {
                let order = order.unwrap_or(default_roti_order());
                if order < 2 {
                    Err(Error::InvalidWindowOrder(order))
                } else {
                    Ok(Self::Roti(order))
                }
            },
            _ => Err(Error::UnknownSmoothingMethod(s.to_string())),
        }
    }
}
