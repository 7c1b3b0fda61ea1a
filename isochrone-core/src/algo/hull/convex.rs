use geo::{ConvexHull, MultiPoint, Point, Polygon};

use super::ccw_polygon;

pub(super) fn convex_hull(points: &[Point<f64>]) -> Polygon<f64> {
    let points: MultiPoint<f64> = points.iter().copied().collect();
    let hull = points.convex_hull();
    ccw_polygon(hull.exterior().0.clone())
}
