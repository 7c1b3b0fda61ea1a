//! Public isochrone and shortest-path operations.
//!
//! Every operation validates its request, snaps the source, runs one bounded
//! search and derives its output from that search alone. Nothing is written back
//! into the graph, so any number of requests can share one [`RoadGraph`].

use std::{collections::BTreeMap, time::Instant};

use geo::{MultiPoint, Point, Polygon};
use itertools::Itertools;
use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use rstar::RTree;

use super::hull::{HullBuilder, HullKind, HullMode};
use crate::{
    Error, NodeId, TravelTime,
    model::{IndexedPoint, RoadGraph, streets::network::nearest_indexed},
    routing::{ShortestPath, ShortestPathTree, bounded_dijkstra_with_deadline, extract_path},
};

/// Node inside the isochrone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReachedNode {
    pub id: NodeId,
    pub geometry: Point<f64>,
    pub travel_time: TravelTime,
}

/// Isochrone around one source, immutable once returned
#[derive(Debug, Clone)]
pub struct IsochroneResult {
    /// Requested source coordinate (x = longitude, y = latitude)
    pub source: Point<f64>,
    /// Node the source was snapped to
    pub source_node: NodeId,
    pub max_time: TravelTime,
    pub polygon: Polygon<f64>,
    pub hull_kind: HullKind,
    /// Every node within the budget, ordered by travel time then id
    pub reachable: Vec<ReachedNode>,
    /// Search tree the reachable set was taken from
    pub tree: ShortestPathTree,
}

impl IsochroneResult {
    pub fn reachable_points(&self) -> MultiPoint<f64> {
        self.reachable.iter().map(|node| node.geometry).collect()
    }

    pub fn reachable_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.reachable.iter().map(|node| node.id)
    }
}

/// Compute the isochrone of `max_time` seconds around `(lat, lon)`.
///
/// # Errors
///
/// Validation errors (`InvalidBudget`, `InvalidCoordinate`, `InvalidAlpha`) before
/// any search, snapping errors (`OutOfNetwork`, `NoPointsFound`) and
/// `InsufficientPoints` when no hull can be built from the reachable set.
pub fn generate_isochrone(
    graph: &RoadGraph,
    lat: f64,
    lon: f64,
    max_time: TravelTime,
    mode: HullMode,
) -> Result<IsochroneResult, Error> {
    generate_isochrone_with_deadline(graph, lat, lon, max_time, mode, None)
}

/// [`generate_isochrone`] that fails with `DeadlineExceeded` once `deadline` passes
pub fn generate_isochrone_with_deadline(
    graph: &RoadGraph,
    lat: f64,
    lon: f64,
    max_time: TravelTime,
    mode: HullMode,
    deadline: Option<Instant>,
) -> Result<IsochroneResult, Error> {
    mode.validate()?;
    let (source, tree) = reachable_tree(graph, lat, lon, max_time, deadline)?;

    let mut reachable: Vec<ReachedNode> = tree
        .distances()
        .iter()
        .map(|(&idx, &travel_time)| {
            let node = &graph.graph[idx];
            ReachedNode {
                id: node.id,
                geometry: node.geometry,
                travel_time,
            }
        })
        .collect();
    reachable.sort_by(|a, b| {
        a.travel_time
            .total_cmp(&b.travel_time)
            .then_with(|| a.id.cmp(&b.id))
    });

    let points: Vec<Point<f64>> = reachable.iter().map(|node| node.geometry).collect();
    let hull = HullBuilder::new(graph.metric(), &graph.meta.config.hull).build(&points, mode)?;

    log::debug!(
        "Isochrone of {max_time}s from node {}: {} reachable nodes, {} hull",
        graph.graph[source].id,
        reachable.len(),
        hull.kind.as_str()
    );

    Ok(IsochroneResult {
        source: Point::new(lon, lat),
        source_node: graph.graph[source].id,
        max_time,
        polygon: hull.polygon,
        hull_kind: hull.kind,
        reachable,
        tree,
    })
}

/// Minimum-time paths from `(lat, lon)` to each destination within `max_time`.
///
/// Request-level failures (validation, snapping) fail the whole call; a
/// destination outside the budget only fails its own entry.
pub fn generate_shortest_paths(
    graph: &RoadGraph,
    lat: f64,
    lon: f64,
    max_time: TravelTime,
    destinations: &[NodeId],
) -> Result<BTreeMap<NodeId, Result<ShortestPath, Error>>, Error> {
    generate_shortest_paths_with_deadline(graph, lat, lon, max_time, destinations, None)
}

pub fn generate_shortest_paths_with_deadline(
    graph: &RoadGraph,
    lat: f64,
    lon: f64,
    max_time: TravelTime,
    destinations: &[NodeId],
    deadline: Option<Instant>,
) -> Result<BTreeMap<NodeId, Result<ShortestPath, Error>>, Error> {
    let (_, tree) = reachable_tree(graph, lat, lon, max_time, deadline)?;
    Ok(crate::routing::extract_paths(graph, &tree, destinations))
}

/// Shortest paths from the source to the isochrone boundary.
///
/// Every vertex of the polygon ring is matched to its nearest reachable node
/// (buffered and alpha hulls may place vertices off the network); each distinct
/// node gets one path, in ring order.
pub fn generate_frontier_paths(graph: &RoadGraph, result: &IsochroneResult) -> Vec<ShortestPath> {
    let reached: RTree<IndexedPoint> = RTree::bulk_load(
        result
            .tree
            .distances()
            .keys()
            .map(|&idx| {
                let geometry = graph.graph[idx].geometry;
                IndexedPoint::new([geometry.x(), geometry.y()], idx)
            })
            .collect(),
    );

    let ring = &result.polygon.exterior().0;
    // Closing coordinate repeats the first one
    let vertices = &ring[..ring.len().saturating_sub(1)];

    vertices
        .iter()
        .filter_map(|coord| {
            nearest_indexed(&reached, &Point::from(*coord), graph.metric(), |idx: NodeIndex| {
                graph.graph[idx].id
            })
        })
        .map(|(idx, _)| graph.graph[idx].id)
        .unique()
        .filter_map(|id| extract_path(graph, &result.tree, id).ok())
        .collect()
}

/// Isochrones for many sources in parallel over the shared graph
pub fn bulk_isochrones(
    graph: &RoadGraph,
    sources: &[(f64, f64)],
    max_time: TravelTime,
    mode: HullMode,
) -> Vec<Result<IsochroneResult, Error>> {
    sources
        .par_iter()
        .map(|&(lat, lon)| generate_isochrone(graph, lat, lon, max_time, mode))
        .collect()
}

fn validate_request(
    graph: &RoadGraph,
    lat: f64,
    lon: f64,
    max_time: TravelTime,
) -> Result<(), Error> {
    if !(max_time.is_finite() && max_time > 0.0) {
        return Err(Error::InvalidBudget(max_time));
    }
    if !graph.metric().is_valid_coordinate(lat, lon) {
        return Err(Error::InvalidCoordinate { lat, lon });
    }
    Ok(())
}

/// Validate, snap and search: the shared front half of every operation
fn reachable_tree(
    graph: &RoadGraph,
    lat: f64,
    lon: f64,
    max_time: TravelTime,
    deadline: Option<Instant>,
) -> Result<(NodeIndex, ShortestPathTree), Error> {
    validate_request(graph, lat, lon, max_time)?;
    let source = graph.locate(lat, lon)?;
    let tree = bounded_dijkstra_with_deadline(graph, source, Some(max_time), deadline)?;
    Ok((source, tree))
}
