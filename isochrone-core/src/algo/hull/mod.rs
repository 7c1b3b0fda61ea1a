//! Boundary polygons around reachable node sets.
//!
//! Two construction modes are available:
//!
//! - [`HullMode::Convex`]: the convex hull of the points.
//! - [`HullMode::Concave`]: an alpha shape. The points are Delaunay-triangulated and
//!   only triangles whose circumradius (measured with the graph metric) is at most
//!   `alpha` are kept. `alpha = +inf` is the convex hull.
//!
//! Degenerate inputs are handled the same way in both modes. Points are first
//! deduplicated. An empty set is an `InsufficientPoints` error. One or two distinct
//! points, or a collinear set, get a buffered outline: the convex hull of small
//! circles around every point. Disable [`HullConfig::degenerate_fallback`] to get
//! `InsufficientPoints` instead.
//!
//! An alpha shape is only accepted when its kept triangles form one edge-connected
//! piece without pinch vertices that covers every input point. Interior holes are
//! filled. A rejected shape is retried with a doubled alpha, and after
//! [`HullConfig::max_alpha_retries`] attempts the convex hull is used.

mod concave;
mod convex;
mod fallback;

use geo::{Area, Coord, LineString, Point, Polygon};
use serde::{Deserialize, Serialize};

use crate::{Error, model::DistanceMetric};

/// Coordinates closer than this on both axes are treated as one point
pub(crate) const COORD_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum HullMode {
    Convex,
    /// Alpha shape; `alpha` is the largest accepted triangle circumradius
    Concave { alpha: f64 },
}

impl HullMode {
    /// Build a mode from its name, as used by the server and the Python bindings
    pub fn parse(name: &str, alpha: Option<f64>) -> Result<Self, Error> {
        match (name.to_ascii_lowercase().as_str(), alpha) {
            ("convex", _) => Ok(HullMode::Convex),
            ("concave" | "alpha", Some(alpha)) => Ok(HullMode::Concave { alpha }),
            ("concave" | "alpha", None) => Err(Error::InvalidData(
                "Concave hull mode requires an alpha value".to_string(),
            )),
            (other, _) => Err(Error::InvalidData(format!("Unknown hull mode '{other}'"))),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        match *self {
            HullMode::Convex => Ok(()),
            // +inf is allowed: it is the convex-hull-equivalent parameter
            HullMode::Concave { alpha } if alpha.is_nan() || alpha <= 0.0 => {
                Err(Error::InvalidAlpha(alpha))
            }
            HullMode::Concave { .. } => Ok(()),
        }
    }
}

/// Which construction actually produced a hull
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HullKind {
    Convex,
    /// Alpha shape accepted at `alpha` (the requested value or a retry multiple)
    Concave { alpha: f64 },
    /// Every alpha shape attempt was rejected
    ConvexFallback { requested_alpha: f64 },
    /// Too few distinct or only collinear points
    Buffered,
}

impl HullKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HullKind::Convex => "convex",
            HullKind::Concave { .. } => "concave",
            HullKind::ConvexFallback { .. } => "convex_fallback",
            HullKind::Buffered => "buffered",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HullConfig {
    /// Buffer radius around degenerate point sets, in metric units
    pub fallback_buffer: f64,
    /// Vertices per buffer circle
    pub fallback_segments: usize,
    /// Buffer degenerate point sets instead of failing with `InsufficientPoints`
    pub degenerate_fallback: bool,
    /// Alpha doublings tried before falling back to the convex hull
    pub max_alpha_retries: u32,
}

impl Default for HullConfig {
    fn default() -> Self {
        Self {
            fallback_buffer: 25.0,
            fallback_segments: 16,
            degenerate_fallback: true,
            max_alpha_retries: 6,
        }
    }
}

impl HullConfig {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if !(self.fallback_buffer.is_finite() && self.fallback_buffer > 0.0) {
            return Err(Error::InvalidData(format!(
                "Fallback buffer must be positive, got {}",
                self.fallback_buffer
            )));
        }
        if self.fallback_segments < 3 {
            return Err(Error::InvalidData(format!(
                "Fallback buffer needs at least 3 segments, got {}",
                self.fallback_segments
            )));
        }
        Ok(())
    }
}

/// Boundary polygon and how it was built
#[derive(Debug, Clone, PartialEq)]
pub struct Hull {
    /// Closed, counter-clockwise exterior ring without interiors
    pub polygon: Polygon<f64>,
    pub kind: HullKind,
}

pub struct HullBuilder<'a> {
    metric: DistanceMetric,
    config: &'a HullConfig,
}

impl<'a> HullBuilder<'a> {
    pub fn new(metric: DistanceMetric, config: &'a HullConfig) -> Self {
        Self { metric, config }
    }

    /// Build the boundary polygon of `points`. Deterministic for a given input.
    ///
    /// # Errors
    ///
    /// `InvalidAlpha` for a non-positive alpha, `InsufficientPoints` (carrying the
    /// raw points) for an empty set, or for degenerate sets when the buffered
    /// fallback is disabled.
    pub fn build(&self, points: &[Point<f64>], mode: HullMode) -> Result<Hull, Error> {
        mode.validate()?;

        let unique = dedup_points(points);
        if unique.len() < 3 || is_collinear(&unique) {
            return self.degenerate(&unique, points);
        }

        match mode {
            HullMode::Convex => Ok(Hull {
                polygon: convex::convex_hull(&unique),
                kind: HullKind::Convex,
            }),
            HullMode::Concave { alpha } if alpha.is_infinite() => Ok(Hull {
                polygon: convex::convex_hull(&unique),
                kind: HullKind::Concave { alpha },
            }),
            HullMode::Concave { alpha } => self.alpha_shape(&unique, points, alpha),
        }
    }

    fn alpha_shape(
        &self,
        unique: &[Point<f64>],
        raw: &[Point<f64>],
        alpha: f64,
    ) -> Result<Hull, Error> {
        let Some(complex) = concave::AlphaComplex::new(unique, self.metric) else {
            return self.degenerate(unique, raw);
        };

        let mut current = alpha;
        for attempt in 0..=self.config.max_alpha_retries {
            match complex.shape(current) {
                Ok(polygon) => {
                    return Ok(Hull {
                        polygon,
                        kind: HullKind::Concave { alpha: current },
                    });
                }
                Err(rejection) => {
                    log::debug!(
                        "Alpha shape at alpha={current} rejected ({rejection}), attempt {attempt}"
                    );
                    current *= 2.0;
                }
            }
        }

        log::warn!(
            "Alpha shape for alpha={alpha} rejected after {} retries, using convex hull",
            self.config.max_alpha_retries
        );
        Ok(Hull {
            polygon: convex::convex_hull(unique),
            kind: HullKind::ConvexFallback {
                requested_alpha: alpha,
            },
        })
    }

    fn degenerate(&self, unique: &[Point<f64>], raw: &[Point<f64>]) -> Result<Hull, Error> {
        if unique.is_empty() || !self.config.degenerate_fallback {
            return Err(Error::InsufficientPoints {
                points: raw.iter().map(|p| Coord::from(*p)).collect(),
            });
        }

        Ok(Hull {
            polygon: fallback::buffered_hull(
                unique,
                self.metric,
                self.config.fallback_buffer,
                self.config.fallback_segments,
            ),
            kind: HullKind::Buffered,
        })
    }
}

/// Sort by coordinate and drop points within `COORD_EPSILON` of a kept point on
/// both axes. The match is not limited to the sorted neighbour.
pub(crate) fn dedup_points(points: &[Point<f64>]) -> Vec<Point<f64>> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x().total_cmp(&b.x()).then_with(|| a.y().total_cmp(&b.y())));

    let mut unique: Vec<Point<f64>> = Vec::with_capacity(sorted.len());
    for point in sorted {
        // Kept points are sorted by x, so only the tail can be within epsilon
        let duplicate = unique
            .iter()
            .rev()
            .take_while(|kept| point.x() - kept.x() <= COORD_EPSILON)
            .any(|kept| (point.y() - kept.y()).abs() <= COORD_EPSILON);
        if !duplicate {
            unique.push(point);
        }
    }
    unique
}

/// Whether all points lie on one line through the first two (distinct) points
fn is_collinear(points: &[Point<f64>]) -> bool {
    let [a, b, ..] = points else {
        return true;
    };
    let (dx, dy) = (b.x() - a.x(), b.y() - a.y());
    let base = dx.hypot(dy);

    points[2..].iter().all(|p| {
        let (px, py) = (p.x() - a.x(), p.y() - a.y());
        let cross = dx * py - dy * px;
        cross.abs() <= 1e-12 * base * px.hypot(py)
    })
}

/// Closed counter-clockwise polygon from a ring of coordinates
pub(crate) fn ccw_polygon(mut ring: Vec<Coord<f64>>) -> Polygon<f64> {
    let polygon = Polygon::new(LineString::new(ring.clone()), vec![]);
    if polygon.signed_area() >= 0.0 {
        return polygon;
    }
    ring.reverse();
    Polygon::new(LineString::new(ring), vec![])
}
