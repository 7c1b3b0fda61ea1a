//! Alpha shapes over a Delaunay triangulation

use std::fmt;

use delaunator::{EMPTY, Point as DPoint, Triangulation, next_halfedge, triangulate};
use fixedbitset::FixedBitSet;
use geo::{Area, Coord, LineString, Point, Polygon};
use hashbrown::HashMap;

use super::ccw_polygon;
use crate::model::DistanceMetric;

/// Why an alpha shape candidate was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Rejection {
    NoTriangles,
    Disconnected { components: usize },
    Pinched { vertex: usize },
    Uncovered { points: usize },
    OpenBoundary,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NoTriangles => write!(f, "no triangle within alpha"),
            Rejection::Disconnected { components } => {
                write!(f, "{components} or more disconnected pieces")
            }
            Rejection::Pinched { vertex } => write!(f, "boundary pinched at vertex {vertex}"),
            Rejection::Uncovered { points } => write!(f, "{points} points left outside"),
            Rejection::OpenBoundary => write!(f, "boundary does not close"),
        }
    }
}

/// Delaunay triangulation with per-triangle circumradii, reused across alpha retries
pub(super) struct AlphaComplex<'a> {
    points: &'a [Point<f64>],
    triangulation: Triangulation,
    circumradii: Vec<f64>,
}

impl<'a> AlphaComplex<'a> {
    /// Triangulate deduplicated `points`; `None` when no triangle exists
    /// (collinear input)
    pub(super) fn new(points: &'a [Point<f64>], metric: DistanceMetric) -> Option<Self> {
        let d_points: Vec<DPoint> = points
            .iter()
            .map(|p| DPoint { x: p.x(), y: p.y() })
            .collect();
        let triangulation = triangulate(&d_points);
        if triangulation.triangles.is_empty() {
            return None;
        }

        let circumradii = triangulation
            .triangles
            .chunks_exact(3)
            .map(|t| circumradius(points[t[0]], points[t[1]], points[t[2]], metric))
            .collect();

        Some(Self {
            points,
            triangulation,
            circumradii,
        })
    }

    fn triangle_count(&self) -> usize {
        self.circumradii.len()
    }

    /// Union of triangles with circumradius ≤ `alpha`, as one outer ring
    pub(super) fn shape(&self, alpha: f64) -> Result<Polygon<f64>, Rejection> {
        let triangles = &self.triangulation.triangles;
        let halfedges = &self.triangulation.halfedges;

        let mut kept = FixedBitSet::with_capacity(self.triangle_count());
        for (t, radius) in self.circumradii.iter().enumerate() {
            kept.set(t, *radius <= alpha);
        }
        let kept_count = kept.count_ones(..);
        let Some(first) = kept.ones().next() else {
            return Err(Rejection::NoTriangles);
        };

        // Edge-connectivity of kept triangles
        let mut reached = FixedBitSet::with_capacity(self.triangle_count());
        reached.insert(first);
        let mut stack = vec![first];
        let mut reached_count = 1;
        while let Some(t) = stack.pop() {
            for e in 3 * t..3 * t + 3 {
                let twin = halfedges[e];
                if twin == EMPTY {
                    continue;
                }
                let neighbor = twin / 3;
                if kept.contains(neighbor) && !reached.put(neighbor) {
                    reached_count += 1;
                    stack.push(neighbor);
                }
            }
        }
        if reached_count < kept_count {
            return Err(Rejection::Disconnected { components: 2 });
        }

        let mut covered = FixedBitSet::with_capacity(self.points.len());
        for t in kept.ones() {
            for e in 3 * t..3 * t + 3 {
                covered.insert(triangles[e]);
            }
        }
        let uncovered = self.points.len() - covered.count_ones(..);
        if uncovered > 0 {
            return Err(Rejection::Uncovered { points: uncovered });
        }

        // Boundary half-edges: kept on one side, nothing (or dropped) on the other
        let mut boundary: HashMap<usize, usize> = HashMap::new();
        for t in kept.ones() {
            for e in 3 * t..3 * t + 3 {
                let twin = halfedges[e];
                if twin != EMPTY && kept.contains(twin / 3) {
                    continue;
                }
                let start = triangles[e];
                let end = triangles[next_halfedge(e)];
                if boundary.insert(start, end).is_some() {
                    return Err(Rejection::Pinched { vertex: start });
                }
            }
        }

        let rings = self.trace_rings(&boundary)?;
        // Holes are filled: only the loop enclosing the largest area is kept
        let outer = rings
            .into_iter()
            .map(|ring| {
                let area = Polygon::new(LineString::new(ring.clone()), vec![]).unsigned_area();
                (ring, area)
            })
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(ring, _)| ring)
            .ok_or(Rejection::OpenBoundary)?;

        Ok(ccw_polygon(outer))
    }

    /// Follow boundary edges into closed loops, starting from the lowest vertex index
    fn trace_rings(
        &self,
        boundary: &HashMap<usize, usize>,
    ) -> Result<Vec<Vec<Coord<f64>>>, Rejection> {
        let mut starts: Vec<usize> = boundary.keys().copied().collect();
        starts.sort_unstable();

        let mut visited = FixedBitSet::with_capacity(self.points.len());
        let mut rings = Vec::new();
        for start in starts {
            if visited.contains(start) {
                continue;
            }

            let mut ring = Vec::new();
            let mut current = start;
            loop {
                visited.insert(current);
                ring.push(Coord::from(self.points[current]));
                current = *boundary.get(&current).ok_or(Rejection::OpenBoundary)?;
                if current == start {
                    break;
                }
                if ring.len() > self.points.len() {
                    return Err(Rejection::OpenBoundary);
                }
            }
            rings.push(ring);
        }
        Ok(rings)
    }
}

/// Circumradius from metric side lengths (R = abc / 4K, K by Heron's formula).
/// Flat triangles have an infinite circumradius.
fn circumradius(a: Point<f64>, b: Point<f64>, c: Point<f64>, metric: DistanceMetric) -> f64 {
    let ab = metric.distance(a, b);
    let bc = metric.distance(b, c);
    let ca = metric.distance(c, a);

    let s = (ab + bc + ca) / 2.0;
    let area_squared = s * (s - ab) * (s - bc) * (s - ca);
    if area_squared <= 0.0 {
        return f64::INFINITY;
    }
    ab * bc * ca / (4.0 * area_squared.sqrt())
}
