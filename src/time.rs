use crate::{
    constants::TIME_TOLERANCE_S,
    prelude::{Duration, Epoch},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Returns true if this Gregorian year is a leap year
pub(crate) fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Calendar day, in the time scale of the [Epoch] it was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DayOfYear {
    /// Gregorian year
    pub year: i32,
    /// Day of year, starting at 1
    pub day: u16,
}

impl std::fmt::Display for DayOfYear {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:04}-{:03}", self.year, self.day)
    }
}

impl DayOfYear {
    pub fn new(year: i32, day: u16) -> Self {
        Self { year, day }
    }

    /// Returns [DayOfYear] containing this [Epoch]
    pub fn from_epoch(t: Epoch) -> Self {
        let year = t.year();
        let jan1 = Epoch::from_gregorian(year, 1, 1, 0, 0, 0, 0, t.time_scale);
        let days = ((t - jan1).to_seconds() / 86400.0).floor() as u16;
        Self {
            year,
            day: days + 1,
        }
    }

    /// Number of days in this year
    pub fn days_in_year(&self) -> u16 {
        if is_leap_year(self.year) {
            366
        } else {
            365
        }
    }

    /// Returns the following day
    pub fn next(&self) -> Self {
        if self.day >= self.days_in_year() {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.day + 1)
        }
    }

    /// True if `rhs` is the same day or the day after
    pub fn is_followed_by(&self, rhs: &Self) -> bool {
        rhs == self || *rhs == self.next()
    }
}

/// True if sorted days do not leave any gap
pub fn contiguous_days(days: &[DayOfYear]) -> bool {
    days.windows(2).all(|w| w[0].is_followed_by(&w[1]))
}

/// True if `t1` follows `t0` by exactly one nominal sampling interval
pub(crate) fn is_nominal_step(t0: Epoch, t1: Epoch, interval: Duration) -> bool {
    ((t1 - t0) - interval).abs().to_seconds() < TIME_TOLERANCE_S
}
