//! Path reconstruction from a shortest-path tree

use std::collections::BTreeMap;

use geo::{Coord, LineString};

use crate::{Error, NodeId, TravelTime, model::RoadGraph, routing::ShortestPathTree};

/// Minimum-time path from the tree source to one destination
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    /// Node ids from source to destination, both included
    pub nodes: Vec<NodeId>,
    /// Node coordinates in the same order
    pub coordinates: Vec<Coord<f64>>,
    pub travel_time: TravelTime,
}

impl ShortestPath {
    pub fn source(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    pub fn to_line_string(&self) -> LineString<f64> {
        LineString::new(self.coordinates.clone())
    }
}

/// Walk predecessors from `destination` back to the tree source.
///
/// # Errors
///
/// `UnreachableNode` if `destination` is not in the distance map: outside the
/// budget, in another component, or not a node of the graph at all.
pub fn extract_path(
    graph: &RoadGraph,
    tree: &ShortestPathTree,
    destination: NodeId,
) -> Result<ShortestPath, Error> {
    let Some(target) = graph.index_of(destination) else {
        log::debug!("Destination {destination} is not part of the graph");
        return Err(Error::UnreachableNode(destination));
    };

    let travel_time = tree
        .travel_time(target)
        .ok_or(Error::UnreachableNode(destination))?;
    let path = tree
        .path_to(target)
        .ok_or(Error::UnreachableNode(destination))?;

    let (nodes, coordinates): (Vec<NodeId>, Vec<Coord<f64>>) = path
        .iter()
        .map(|&idx| {
            let node = &graph.graph[idx];
            (node.id, Coord::from(node.geometry))
        })
        .unzip();

    Ok(ShortestPath {
        nodes,
        coordinates,
        travel_time,
    })
}

/// [`extract_path`] for a batch of destinations; failures stay per destination
pub fn extract_paths(
    graph: &RoadGraph,
    tree: &ShortestPathTree,
    destinations: &[NodeId],
) -> BTreeMap<NodeId, Result<ShortestPath, Error>> {
    destinations
        .iter()
        .map(|&destination| (destination, extract_path(graph, tree, destination)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        DistanceMetric, RawEdge, RawNode, RoadGraphConfig, bounded_dijkstra, create_road_graph,
        model::NetworkTypeProfile,
    };

    fn graph() -> RoadGraph {
        let config = RoadGraphConfig {
            metric: DistanceMetric::Euclidean,
            profile: Some(NetworkTypeProfile::uniform(36.0)),
            ..RoadGraphConfig::default()
        };
        let nodes = vec![
            RawNode::new(1, 0.0, 0.0),
            RawNode::new(2, 0.0, 1.0),
            RawNode::new(3, 0.0, 2.0),
            RawNode::new(4, 5.0, 5.0),
        ];
        let edges = vec![RawEdge::new(1, 2, 50.0), RawEdge::new(2, 3, 50.0)];
        create_road_graph(nodes, edges, &config).unwrap()
    }

    #[test]
    fn path_runs_from_source_to_destination() {
        let graph = graph();
        let tree = bounded_dijkstra(&graph, graph.index_of(1).unwrap(), None).unwrap();
        let path = extract_path(&graph, &tree, 3).unwrap();

        assert_eq!(path.nodes, vec![1, 2, 3]);
        assert_eq!(path.travel_time, 10.0);
        assert_eq!(path.coordinates[2], Coord { x: 2.0, y: 0.0 });
        assert_eq!(path.to_line_string().0.len(), 3);
    }

    #[test]
    fn source_path_is_a_single_node() {
        let graph = graph();
        let tree = bounded_dijkstra(&graph, graph.index_of(1).unwrap(), None).unwrap();
        let path = extract_path(&graph, &tree, 1).unwrap();

        assert_eq!(path.nodes, vec![1]);
        assert_eq!(path.travel_time, 0.0);
    }

    #[test]
    fn failures_are_reported_per_destination() {
        let graph = graph();
        let tree = bounded_dijkstra(&graph, graph.index_of(1).unwrap(), Some(5.0)).unwrap();
        let paths = extract_paths(&graph, &tree, &[2, 3, 4, 42]);

        assert_eq!(paths[&2].as_ref().unwrap().nodes, vec![1, 2]);
        assert!(matches!(paths[&3], Err(Error::UnreachableNode(3))));
        assert!(matches!(paths[&4], Err(Error::UnreachableNode(4))));
        assert!(matches!(paths[&42], Err(Error::UnreachableNode(42))));
    }
}
