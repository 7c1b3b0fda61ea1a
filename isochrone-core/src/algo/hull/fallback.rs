use geo::{ConvexHull, MultiPoint, Point, Polygon};

use super::ccw_polygon;
use crate::model::DistanceMetric;

/// Convex hull of `segments`-gons of `radius` around every point: a disk for
/// one point, a rounded segment for a collinear set.
#[allow(clippy::cast_precision_loss)]
pub(super) fn buffered_hull(
    points: &[Point<f64>],
    metric: DistanceMetric,
    radius: f64,
    segments: usize,
) -> Polygon<f64> {
    let step = 360.0 / segments as f64;
    let outline: MultiPoint<f64> = points
        .iter()
        .flat_map(|&center| {
            (0..segments).map(move |i| metric.offset(center, step * i as f64, radius))
        })
        .collect();

    ccw_polygon(outline.convex_hull().exterior().0.clone())
}
