//! Loaded road graph with its spatial index

use geo::Point;
use hashbrown::HashMap;
use petgraph::{
    Directed,
    graph::{DiGraph, Edges, NodeIndex},
};
use rstar::{RTree, primitives::GeomWithData};

use super::{RoadEdge, RoadNode};
use crate::{
    Error, NodeId, TravelTime,
    loading::RoadGraphConfig,
    model::{DistanceMetric, NetworkTypeProfile},
};

/// Node coordinate stored in the R-tree, tagged with its graph index
pub type IndexedPoint = GeomWithData<[f64; 2], NodeIndex>;

/// Planar R-tree candidates re-ranked under the configured metric when snapping
pub(crate) const SNAP_CANDIDATES: usize = 16;

/// Load-time facts about the graph
#[derive(Debug, Clone)]
pub struct RoadGraphMeta {
    pub config: RoadGraphConfig,
    /// Profile the edge costs were derived from
    pub profile: NetworkTypeProfile,
    /// Edges dropped as malformed while loading
    pub excluded_edges: usize,
}

/// Read-only road network: nodes, cost-annotated directed edges and a spatial index.
///
/// Built once by [`crate::create_road_graph`] and then shared by reference between
/// any number of concurrent queries.
#[derive(Debug, Clone)]
pub struct RoadGraph {
    pub graph: DiGraph<RoadNode, RoadEdge>,
    rtree: RTree<IndexedPoint>,
    id_index: HashMap<NodeId, NodeIndex>,
    pub meta: RoadGraphMeta,
}

impl RoadGraph {
    pub(crate) fn new(
        graph: DiGraph<RoadNode, RoadEdge>,
        id_index: HashMap<NodeId, NodeIndex>,
        meta: RoadGraphMeta,
    ) -> Self {
        let rtree = RTree::bulk_load(
            graph
                .node_indices()
                .map(|idx| {
                    let geometry = graph[idx].geometry;
                    IndexedPoint::new([geometry.x(), geometry.y()], idx)
                })
                .collect(),
        );

        Self {
            graph,
            rtree,
            id_index,
            meta,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn metric(&self) -> DistanceMetric {
        self.meta.config.metric
    }

    pub fn node(&self, node: NodeIndex) -> Option<&RoadNode> {
        self.graph.node_weight(node)
    }

    pub fn node_id(&self, node: NodeIndex) -> Option<NodeId> {
        self.graph.node_weight(node).map(|n| n.id)
    }

    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    /// Outgoing edges of `node`
    pub fn edges(&self, node: NodeIndex) -> Edges<'_, RoadEdge, Directed> {
        self.graph.edges(node)
    }

    /// Cheapest travel time over the edges `from -> to`, if any exists
    pub fn edge_cost(&self, from: NodeIndex, to: NodeIndex) -> Option<TravelTime> {
        self.graph
            .edges_connecting(from, to)
            .map(|edge| edge.weight().weight)
            .min_by(f64::total_cmp)
    }

    /// Nearest node to `point` under the configured metric, with its distance
    pub fn nearest_node(&self, point: &Point<f64>) -> Option<(NodeIndex, f64)> {
        nearest_indexed(&self.rtree, point, self.metric(), |idx| self.graph[idx].id)
    }

    /// Snap a query coordinate to the network.
    ///
    /// # Errors
    ///
    /// `NoPointsFound` for an empty graph, `OutOfNetwork` when the nearest node is
    /// further away than the configured maximum snap distance.
    pub fn locate(&self, lat: f64, lon: f64) -> Result<NodeIndex, Error> {
        let point = Point::new(lon, lat);
        let (node, distance) = self.nearest_node(&point).ok_or(Error::NoPointsFound)?;

        let max_distance = self.meta.config.max_snap_distance;
        if distance > max_distance {
            log::trace!(
                "Point ({lat}, {lon}) is {distance:.1} from node {} (max: {max_distance:.1})",
                self.graph[node].id
            );
            return Err(Error::OutOfNetwork {
                lat,
                lon,
                distance,
                max_distance,
            });
        }

        log::trace!(
            "Snapped ({lat}, {lon}) to node {} at {distance:.1}",
            self.graph[node].id
        );
        Ok(node)
    }
}

/// Nearest entry of `rtree` to `point` under `metric`.
///
/// The R-tree ranks candidates by planar distance in coordinate space, so the
/// closest few are re-ranked with the real metric. Equal distances resolve to
/// the smaller node id.
pub(crate) fn nearest_indexed(
    rtree: &RTree<IndexedPoint>,
    point: &Point<f64>,
    metric: DistanceMetric,
    id_of: impl Fn(NodeIndex) -> NodeId,
) -> Option<(NodeIndex, f64)> {
    rtree
        .nearest_neighbor_iter(&[point.x(), point.y()])
        .take(SNAP_CANDIDATES)
        .map(|candidate| {
            let [x, y] = *candidate.geom();
            (candidate.data, metric.distance(*point, Point::new(x, y)))
        })
        .min_by(|(a, a_distance), (b, b_distance)| {
            a_distance
                .total_cmp(b_distance)
                .then_with(|| id_of(*a).cmp(&id_of(*b)))
        })
}
