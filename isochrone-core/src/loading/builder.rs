use geo::Point;
use hashbrown::{HashMap, hash_map::Entry};
use log::{info, warn};
use petgraph::graph::{DiGraph, NodeIndex};

use super::{EdgeCostAssigner, MalformedEdge, RawEdge, RawNode, RoadGraphConfig};
use crate::{
    Error, NodeId,
    model::{RoadEdge, RoadGraph, RoadGraphMeta, RoadNode},
};

/// Creates a cost-annotated road graph from provider records.
///
/// Travel times are computed here, once; queries never recompute them. Edges
/// that cannot be costed are logged and left out rather than failing the load.
///
/// # Errors
///
/// Returns an error for an invalid configuration, duplicate node ids or nodes
/// with unusable coordinates.
pub fn create_road_graph<N, E>(
    nodes: N,
    edges: E,
    config: &RoadGraphConfig,
) -> Result<RoadGraph, Error>
where
    N: IntoIterator<Item = RawNode>,
    E: IntoIterator<Item = RawEdge>,
{
    config.validate()?;
    let profile = config.resolved_profile();

    let nodes = nodes.into_iter();
    let mut graph = DiGraph::with_capacity(nodes.size_hint().0, 0);
    let mut id_index = HashMap::with_capacity(nodes.size_hint().0);

    for node in nodes {
        if !config.metric.is_valid_coordinate(node.lat, node.lon) {
            return Err(Error::InvalidData(format!(
                "Node {} has unusable coordinates ({}, {})",
                node.id, node.lat, node.lon
            )));
        }

        match id_index.entry(node.id) {
            Entry::Occupied(_) => {
                return Err(Error::InvalidData(format!("Duplicate node id {}", node.id)));
            }
            Entry::Vacant(entry) => {
                let idx = graph.add_node(RoadNode {
                    id: node.id,
                    geometry: Point::new(node.lon, node.lat),
                });
                entry.insert(idx);
            }
        }
    }

    let assigner = EdgeCostAssigner::new(&profile, config.zero_length_policy);
    let mut excluded_edges = 0;

    for edge in edges {
        match cost_edge(&assigner, &id_index, &edge) {
            Ok((from, to, road_edge)) => {
                graph.add_edge(from, to, road_edge);
            }
            Err(issue) => {
                excluded_edges += 1;
                warn!("Excluding edge {} -> {}: {issue}", edge.from, edge.to);
            }
        }
    }

    info!(
        "Road graph loaded: {} nodes, {} edges ({} excluded as malformed), {} profile",
        graph.node_count(),
        graph.edge_count(),
        excluded_edges,
        config.network_type.as_str()
    );

    Ok(RoadGraph::new(
        graph,
        id_index,
        RoadGraphMeta {
            config: config.clone(),
            profile,
            excluded_edges,
        },
    ))
}

fn cost_edge(
    assigner: &EdgeCostAssigner<'_>,
    id_index: &HashMap<NodeId, NodeIndex>,
    edge: &RawEdge,
) -> Result<(NodeIndex, NodeIndex, RoadEdge), MalformedEdge> {
    let endpoint = |id| {
        id_index
            .get(&id)
            .copied()
            .ok_or(MalformedEdge::UnknownEndpoint(id))
    };
    let from = endpoint(edge.from)?;
    let to = endpoint(edge.to)?;

    Ok((from, to, assigner.assign(edge)?))
}
