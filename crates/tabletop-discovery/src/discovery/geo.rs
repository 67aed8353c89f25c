use serde::{Deserialize, Serialize};

/// Mean Earth radius used for every proximity calculation on the platform.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds a pair only when both halves are present.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Self::new(latitude, longitude)),
            _ => None,
        }
    }

    /// Validates client-supplied halves: both or neither, and within WGS84 bounds.
    pub fn checked(
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Option<Self>, CoordinateError> {
        match (latitude, longitude) {
            (None, None) => Ok(None),
            (Some(latitude), Some(longitude)) => {
                let in_range = (-90.0..=90.0).contains(&latitude)
                    && (-180.0..=180.0).contains(&longitude);
                if in_range {
                    Ok(Some(Self::new(latitude, longitude)))
                } else {
                    Err(CoordinateError::OutOfRange {
                        latitude,
                        longitude,
                    })
                }
            }
            _ => Err(CoordinateError::Partial),
        }
    }

    pub fn distance_miles(&self, other: &Coordinates) -> f64 {
        haversine_miles(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("latitude and longitude must be supplied together")]
    Partial,
    #[error("coordinates ({latitude}, {longitude}) are out of range")]
    OutOfRange { latitude: f64, longitude: f64 },
}

/// Great-circle distance in miles between two points given in decimal degrees.
///
/// Non-finite input propagates as `NaN`; callers guard against missing coordinates.
pub fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // rounding can push `a` marginally past 1.0 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_MILES * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUSTIN: Coordinates = Coordinates::new(30.2672, -97.7431);
    const DALLAS: Coordinates = Coordinates::new(32.7767, -96.7970);

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(AUSTIN.distance_miles(&AUSTIN), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let there = AUSTIN.distance_miles(&DALLAS);
        let back = DALLAS.distance_miles(&AUSTIN);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn austin_to_dallas_is_roughly_182_miles() {
        let miles = haversine_miles(
            AUSTIN.latitude,
            AUSTIN.longitude,
            DALLAS.latitude,
            DALLAS.longitude,
        );
        assert!((miles - 182.0).abs() < 2.0, "unexpected distance {miles}");
    }

    #[test]
    fn one_degree_of_latitude_matches_radius() {
        let miles = haversine_miles(0.0, 0.0, 1.0, 0.0);
        let expected = EARTH_RADIUS_MILES * 1f64.to_radians();
        assert!((miles - expected).abs() < 1e-6);
    }

    #[test]
    fn antipodal_points_stay_finite() {
        let miles = haversine_miles(0.0, 0.0, 0.0, 180.0);
        assert!((miles - EARTH_RADIUS_MILES * std::f64::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn non_finite_input_yields_nan() {
        assert!(haversine_miles(f64::NAN, 0.0, 10.0, 10.0).is_nan());
    }

    #[test]
    fn checked_rejects_partial_and_out_of_range_pairs() {
        assert_eq!(Coordinates::checked(None, None), Ok(None));
        assert_eq!(
            Coordinates::checked(Some(30.0), None),
            Err(CoordinateError::Partial)
        );
        assert!(matches!(
            Coordinates::checked(Some(91.0), Some(0.0)),
            Err(CoordinateError::OutOfRange { .. })
        ));
        assert!(matches!(
            Coordinates::checked(Some(f64::NAN), Some(0.0)),
            Err(CoordinateError::OutOfRange { .. })
        ));
        assert_eq!(
            Coordinates::checked(Some(-33.9), Some(151.2)),
            Ok(Some(Coordinates::new(-33.9, 151.2)))
        );
    }

    #[test]
    fn from_parts_requires_both_halves() {
        assert!(Coordinates::from_parts(Some(1.0), None).is_none());
        assert!(Coordinates::from_parts(None, Some(1.0)).is_none());
        assert_eq!(
            Coordinates::from_parts(Some(1.0), Some(2.0)),
            Some(Coordinates::new(1.0, 2.0))
        );
    }
}
