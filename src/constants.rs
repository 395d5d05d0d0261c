/// Speed of light in m.s⁻¹
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// GPS L1 carrier frequency (Hz)
pub const GPS_L1_FREQUENCY_HZ: f64 = 1575.42E6;

/// GPS L2 carrier frequency (Hz)
pub const GPS_L2_FREQUENCY_HZ: f64 = 1227.60E6;

/// L1/L2 wide lane wavelength (m)
pub const WIDE_LANE_WAVELENGTH_M: f64 =
    SPEED_OF_LIGHT_M_S / (GPS_L1_FREQUENCY_HZ - GPS_L2_FREQUENCY_HZ);

/// Converts a L1/L2 geometry free delay (m) to TEC units:
/// f1² f2² / (40.3 (f1² - f2²)) / 1E16
pub const TECU_PER_METER_L4: f64 = 9.52437;

/// Mean Earth radius (m), used by the single layer ionosphere model
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_000.0;

/// Highest GPS PRN we scan for arcs
pub const GPS_MAX_PRN: u8 = 32;

/// Raw observations with a lower magnitude are considered missing
pub const MIN_RAW_OBSERVATION: f64 = 1.0E-3;

/// Geometry free combinations with a lower magnitude are considered missing
pub const MIN_DERIVED_OBSERVABLE: f64 = 1.0E-10;

/// Time tolerance when matching sampling instants (s)
pub const TIME_TOLERANCE_S: f64 = 1.0E-13;
