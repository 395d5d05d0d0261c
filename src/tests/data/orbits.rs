use crate::prelude::{
    Duration, EphemerisSample, Epoch, OrbitSource, Position, PreciseEphemeris, Vector3, SV,
};

/// GPS orbital radius (m)
const ORBIT_RADIUS_M: f64 = 26_560_000.0;

/// GPS orbital period (s)
const ORBIT_PERIOD_S: f64 = 43_082.0;

/// Circular orbit position (ECEF, m), `seconds` after the start of the day
pub fn circular_position(sv: SV, seconds: f64) -> Vector3<f64> {
    let inclination = 55.0_f64.to_radians();
    let node = (sv.prn as f64 * 60.0).to_radians();
    let u = 2.0 * std::f64::consts::PI * seconds / ORBIT_PERIOD_S + sv.prn as f64;

    let (x_orb, y_orb) = (ORBIT_RADIUS_M * u.cos(), ORBIT_RADIUS_M * u.sin());
    Vector3::new(
        x_orb * node.cos() - y_orb * inclination.cos() * node.sin(),
        x_orb * node.sin() + y_orb * inclination.cos() * node.cos(),
        y_orb * inclination.sin(),
    )
}

/// Precise ephemeris of these satellites, sampled every 15 minutes
/// with a linear clock drift.
pub fn circular_ephemeris(satellites: &[SV], start: Epoch, len: usize) -> PreciseEphemeris {
    let interval = Duration::from_seconds(900.0);
    let mut samples = Vec::new();
    for k in 0..len {
        let epoch = start + interval * k as i64;
        for sv in satellites {
            samples.push(EphemerisSample {
                epoch,
                sv: *sv,
                position: circular_position(*sv, 900.0 * k as f64),
                clock: Some(1.0E-4 + 1.0E-9 * k as f64),
            });
        }
    }
    PreciseEphemeris::new(interval, samples).unwrap()
}

/// Satellites hovering high above the station
pub struct OverheadOrbits {
    pub station: Position,
}

impl OrbitSource for OverheadOrbits {
    fn position_at(&self, _: Epoch, sv: SV) -> Option<Vector3<f64>> {
        let geo = self.station.geodetic();
        let offset = (sv.prn % 5) as f64;
        Some(
            Position::from_geo(Vector3::new(
                geo[0] + offset.to_radians(),
                geo[1] + offset.to_radians(),
                20_200_000.0,
            ))
            .ecef(),
        )
    }

    fn clock_at(&self, _: Epoch, sv: SV) -> Option<f64> {
        Some(1.0E-5 * sv.prn as f64)
    }
}
