//! Distance metric shared by node snapping, alpha-shape circumradii and fallback buffers

use geo::{Destination, Distance, Euclidean, Haversine, Point};
use serde::{Deserialize, Serialize};

/// How distances between coordinates are measured.
///
/// `Haversine` treats coordinates as longitude/latitude degrees and measures
/// great-circle meters. `Euclidean` treats them as already projected planar
/// coordinates and measures in coordinate units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    #[default]
    Haversine,
    Euclidean,
}

impl DistanceMetric {
    pub fn distance(self, a: Point<f64>, b: Point<f64>) -> f64 {
        match self {
            DistanceMetric::Haversine => Haversine.distance(a, b),
            DistanceMetric::Euclidean => Euclidean.distance(a, b),
        }
    }

    /// Point at `distance` from `origin` along `bearing` (degrees clockwise from north)
    pub fn offset(self, origin: Point<f64>, bearing: f64, distance: f64) -> Point<f64> {
        match self {
            DistanceMetric::Haversine => Haversine.destination(origin, bearing, distance),
            DistanceMetric::Euclidean => {
                let (sin, cos) = bearing.to_radians().sin_cos();
                Point::new(origin.x() + distance * sin, origin.y() + distance * cos)
            }
        }
    }

    /// Whether `(lat, lon)` is a usable coordinate under this metric
    pub fn is_valid_coordinate(self, lat: f64, lon: f64) -> bool {
        if !lat.is_finite() || !lon.is_finite() {
            return false;
        }
        match self {
            DistanceMetric::Haversine => {
                (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
            }
            DistanceMetric::Euclidean => true,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DistanceMetric::Haversine => "haversine",
            DistanceMetric::Euclidean => "euclidean",
        }
    }
}

impl std::str::FromStr for DistanceMetric {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "haversine" | "great_circle" => Ok(DistanceMetric::Haversine),
            "euclidean" | "projected" => Ok(DistanceMetric::Euclidean),
            other => Err(crate::Error::InvalidData(format!(
                "Unknown distance metric '{other}'"
            ))),
        }
    }
}
