//! Geographic coordinates and the presence rules for optional geotags.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A single latitude/longitude reading in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting non-finite or out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] when latitude is outside
    /// `[-90, 90]`, longitude is outside `[-180, 180]`, or either is NaN/inf.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        let invalid = |reason| CoreError::InvalidCoordinate {
            latitude,
            longitude,
            reason,
        };
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(invalid("coordinates must be finite"));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(invalid("latitude must be within [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid("longitude must be within [-180, 180]"));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Combine two optional halves of a geotag.
    ///
    /// Returns `None` unless both halves are present and form a valid
    /// coordinate. Zero is a legitimate value for either half.
    #[must_use]
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Self::new(lat, lon).ok(),
            _ => None,
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Anything that may carry a latitude/longitude pair.
pub trait Geotagged {
    fn latitude(&self) -> Option<f64>;
    fn longitude(&self) -> Option<f64>;

    /// The geotag, present only when both halves are usable.
    fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.latitude(), self.longitude())
    }
}

impl Geotagged for Coordinate {
    fn latitude(&self) -> Option<f64> {
        Some(self.latitude)
    }

    fn longitude(&self) -> Option<f64> {
        Some(self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_boundaries() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn new_rejects_out_of_range_latitude() {
        let err = Coordinate::new(90.5, 0.0).unwrap_err();
        assert!(
            err.to_string().contains("latitude"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn new_rejects_out_of_range_longitude() {
        let err = Coordinate::new(0.0, -180.01).unwrap_err();
        assert!(
            err.to_string().contains("longitude"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn new_rejects_nan() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn from_parts_requires_both_halves() {
        assert!(Coordinate::from_parts(Some(12.9), None).is_none());
        assert!(Coordinate::from_parts(None, Some(77.5)).is_none());
        assert!(Coordinate::from_parts(None, None).is_none());
        assert_eq!(
            Coordinate::from_parts(Some(12.9), Some(77.5)),
            Some(Coordinate {
                latitude: 12.9,
                longitude: 77.5
            })
        );
    }

    #[test]
    fn from_parts_keeps_zero() {
        let c = Coordinate::from_parts(Some(0.0), Some(0.0));
        assert!(c.is_some(), "the equator/meridian crossing is a real place");
    }

    #[test]
    fn from_parts_drops_invalid_pair() {
        assert!(Coordinate::from_parts(Some(123.0), Some(10.0)).is_none());
    }

    #[test]
    fn display_uses_four_decimals() {
        let c = Coordinate {
            latitude: 12.971_598,
            longitude: 77.594_566,
        };
        assert_eq!(c.to_string(), "12.9716, 77.5946");
    }
}
