use crate::constants::{GPS_L1_FREQUENCY_HZ, GPS_L2_FREQUENCY_HZ, SPEED_OF_LIGHT_M_S};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// GPS carrier bands we work with
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Carrier {
    /// L1 (GPS)
    #[default]
    L1,
    /// L2 (GPS)
    L2,
}

impl std::fmt::Display for Carrier {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self {
            Self::L1 => write!(f, "L1"),
            Self::L2 => write!(f, "L2"),
        }
    }
}

impl Carrier {
    /// Carrier frequency in Hz
    pub const fn frequency(&self) -> f64 {
        match self {
            Self::L1 => GPS_L1_FREQUENCY_HZ,
            Self::L2 => GPS_L2_FREQUENCY_HZ,
        }
    }

    /// Carrier wavelength in meters
    pub fn wavelength(&self) -> f64 {
        SPEED_OF_LIGHT_M_S / self.frequency()
    }
}

#[cfg(test)]
mod test {
    use super::Carrier;
    use crate::constants::WIDE_LANE_WAVELENGTH_M;

    #[test]
    fn wavelengths() {
        assert!((Carrier::L1.wavelength() - 0.190_293_672).abs() < 1.0E-8);
        assert!((Carrier::L2.wavelength() - 0.244_210_213).abs() < 1.0E-8);
        assert!((WIDE_LANE_WAVELENGTH_M - 0.861_918_4).abs() < 1.0E-6);
    }
}
