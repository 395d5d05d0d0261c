//! Station coordinates and line of sight geometry
use crate::{
    constants::EARTH_MEAN_RADIUS_M,
    prelude::{PiercePoint, Vector3},
};
use map_3d::{ecef2geodetic, geodetic2ecef, Ellipsoid};

/// Approximate positions below this norm (m) are placeholders.
const MIN_PLAUSIBLE_NORM_M: f64 = 1.0E3;

/// Station [Position]
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// ECEF coordinates in meters
    pub(crate) ecef: Vector3<f64>,
    /// Geodetic coordinates in radians
    pub(crate) geodetic: Vector3<f64>,
}

/// Line of sight angles, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AzElDeg {
    pub azimuth: f64,
    pub elevation: f64,
}

impl Position {
    /// Builds new [Position] from ECEF coordinates expressed in meter.
    pub fn from_ecef(ecef: Vector3<f64>) -> Self {
        let (x, y, z) = (ecef[0], ecef[1], ecef[2]);
        let (lat, lon, h) = ecef2geodetic(x, y, z, Ellipsoid::WGS84);
        Self {
            ecef,
            geodetic: Vector3::new(lat, lon, h),
        }
    }

    /// Builds new [Position] from Geodetic coordinates
    /// - latitude [rad]
    /// - longitude [rad]
    /// - altitude above sea level [m]
    pub fn from_geo(geodetic: Vector3<f64>) -> Self {
        let (lat, lon, alt) = (geodetic[0], geodetic[1], geodetic[2]);
        let (x, y, z) = geodetic2ecef(lat, lon, alt, Ellipsoid::WGS84);
        Self {
            geodetic,
            ecef: Vector3::new(x, y, z),
        }
    }

    /// Builds [Position] from an approximate ECEF position,
    /// only if it is plausible (not a null placeholder).
    pub fn from_approx_ecef(ecef: Vector3<f64>) -> Option<Self> {
        if ecef.norm() > MIN_PLAUSIBLE_NORM_M {
            Some(Self::from_ecef(ecef))
        } else {
            None
        }
    }

    /// Returns ECEF coordinates.
    pub fn ecef(&self) -> Vector3<f64> {
        self.ecef
    }

    /// Returns Geodetic coordinates
    /// - latitude [rad]
    /// - longitude [rad]
    /// - altitude above sea level [m]
    pub fn geodetic(&self) -> Vector3<f64> {
        self.geodetic
    }

    /// Azimuth and elevation of `target` (ECEF, m) as seen from this [Position].
    pub fn azimuth_elevation(&self, target: Vector3<f64>) -> AzElDeg {
        let (lat, lon) = (self.geodetic[0], self.geodetic[1]);
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();

        let east = Vector3::new(-sin_lon, cos_lon, 0.0);
        let north = Vector3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
        let up = Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);

        let los = (target - self.ecef).normalize();
        let (e, n, u) = (los.dot(&east), los.dot(&north), los.dot(&up));

        let elevation = u.clamp(-1.0, 1.0).asin().to_degrees();
        let mut azimuth = e.atan2(n).to_degrees();
        if azimuth < 0.0 {
            azimuth += 360.0;
        }

        AzElDeg {
            azimuth,
            elevation,
        }
    }

    /// Single layer ionospheric [PiercePoint] along the line of sight,
    /// for a thin shell at `shell_height_m` above the mean Earth radius.
    pub fn pierce_point(&self, azel: AzElDeg, shell_height_m: f64) -> PiercePoint {
        let (lat, lon) = (self.geodetic[0], self.geodetic[1]);
        let elev = azel.elevation.to_radians();
        let azim = azel.azimuth.to_radians();

        let psi = std::f64::consts::FRAC_PI_2 - elev - zenith_angle_at_shell(elev, shell_height_m);

        let ipp_lat = (lat.sin() * psi.cos() + lat.cos() * psi.sin() * azim.cos()).asin();
        let ipp_lon = lon + (psi.sin() * azim.sin() / ipp_lat.cos()).asin();

        PiercePoint {
            latitude_deg: ipp_lat.to_degrees(),
            longitude_deg: ipp_lon.to_degrees(),
        }
    }
}

/// Zenith angle z' (rad) of the line of sight at the pierce point,
/// with sin(z') = R / (R + H) cos(E).
pub(crate) fn zenith_angle_at_shell(elevation_rad: f64, shell_height_m: f64) -> f64 {
    let ratio = EARTH_MEAN_RADIUS_M / (EARTH_MEAN_RADIUS_M + shell_height_m);
    (ratio * elevation_rad.cos()).asin()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn implausible_position() {
        assert!(Position::from_approx_ecef(Vector3::new(0.0, 0.0, 0.0)).is_none());
        assert!(Position::from_approx_ecef(Vector3::new(4_000_000.0, 0.0, 0.0)).is_some());
    }

    #[test]
    fn zenith_and_horizon() {
        // station on the equator, greenwich meridian
        let pos = Position::from_geo(Vector3::new(0.0, 0.0, 0.0));
        let ecef = pos.ecef();

        let zenith = ecef + Vector3::new(20_000_000.0, 0.0, 0.0);
        let azel = pos.azimuth_elevation(zenith);
        assert!((azel.elevation - 90.0).abs() < 1.0E-6);

        let north = ecef + Vector3::new(0.0, 0.0, 1_000.0);
        let azel = pos.azimuth_elevation(north);
        assert!(azel.elevation.abs() < 1.0E-6);
        assert!(azel.azimuth.abs() < 1.0E-6);

        let east = ecef + Vector3::new(0.0, 1_000.0, 0.0);
        let azel = pos.azimuth_elevation(east);
        assert!((azel.azimuth - 90.0).abs() < 1.0E-6);
    }

    #[test]
    fn pierce_point_at_zenith() {
        let pos = Position::from_geo(Vector3::new(30.0_f64.to_radians(), 114.0_f64.to_radians(), 0.0));
        let ipp = pos.pierce_point(
            AzElDeg {
                azimuth: 0.0,
                elevation: 90.0,
            },
            450.0E3,
        );
        assert!((ipp.latitude_deg - 30.0).abs() < 1.0E-9);
        assert!((ipp.longitude_deg - 114.0).abs() < 1.0E-9);

        // low elevation toward north moves the pierce point north
        let ipp = pos.pierce_point(
            AzElDeg {
                azimuth: 0.0,
                elevation: 20.0,
            },
            450.0E3,
        );
        assert!(ipp.latitude_deg > 30.0);
        assert!((ipp.longitude_deg - 114.0).abs() < 1.0E-9);
    }

    #[test]
    fn shell_zenith_angle() {
        assert!(zenith_angle_at_shell(std::f64::consts::FRAC_PI_2, 450.0E3).abs() < 1.0E-12);
        let z = zenith_angle_at_shell(0.0, 450.0E3);
        assert!((z.sin() - 6_371.0 / 6_821.0).abs() < 1.0E-12);
    }
}
