//! Road segments inside an isochrone

use geo::{Line, Point};
use petgraph::visit::EdgeRef;

use crate::{NodeId, TravelTime, model::RoadGraph, routing::ShortestPathTree};

/// Directed road segment fully traversable within the search budget
#[derive(Debug, Clone, PartialEq)]
pub struct ReachableEdge {
    pub from: NodeId,
    pub to: NodeId,
    /// Length in meters
    pub length: f64,
    pub travel_time: TravelTime,
    pub name: Option<String>,
    pub geometry: Line<f64>,
}

/// Edges whose tail is reached and whose head is reached by travelling the edge
/// itself within budget. Ordered by tail id, then head id.
pub fn reachable_road_network(graph: &RoadGraph, tree: &ShortestPathTree) -> Vec<ReachableEdge> {
    let mut edges: Vec<ReachableEdge> = tree
        .distances()
        .iter()
        .flat_map(|(&from, &from_time)| {
            graph.edges(from).filter_map(move |edge| {
                let to = edge.target();
                if !tree.contains(to) {
                    return None;
                }
                let arrival = from_time + edge.weight().travel_time();
                if tree.budget().is_some_and(|budget| arrival > budget) {
                    return None;
                }

                let tail = &graph.graph[from];
                let head = &graph.graph[to];
                Some(ReachableEdge {
                    from: tail.id,
                    to: head.id,
                    length: edge.weight().length,
                    travel_time: edge.weight().travel_time(),
                    name: edge.weight().name.clone(),
                    geometry: Line::new(tail.geometry, head.geometry),
                })
            })
        })
        .collect();

    edges.sort_by(|a, b| {
        a.from
            .cmp(&b.from)
            .then_with(|| a.to.cmp(&b.to))
            .then_with(|| a.travel_time.total_cmp(&b.travel_time))
    });
    edges
}

impl ReachableEdge {
    pub fn endpoints(&self) -> (Point<f64>, Point<f64>) {
        (self.geometry.start_point(), self.geometry.end_point())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        DistanceMetric, RawEdge, RawNode, RoadGraphConfig, bounded_dijkstra, create_road_graph,
        model::NetworkTypeProfile,
    };

    #[test]
    fn keeps_only_edges_travelled_within_budget() {
        let config = RoadGraphConfig {
            metric: DistanceMetric::Euclidean,
            profile: Some(NetworkTypeProfile::uniform(36.0)),
            ..RoadGraphConfig::default()
        };
        // Triangle 1-2-3 with a slow direct link 1 -> 3 and a tail 3 -> 4
        let nodes = (1..=4).map(|id| RawNode::new(id, id as f64, 0.0));
        let edges = vec![
            RawEdge::new(1, 2, 50.0).with_name("Mill Lane"),
            RawEdge::new(2, 3, 50.0),
            RawEdge::new(1, 3, 150.0),
            RawEdge::new(3, 4, 100.0),
        ];
        let graph = create_road_graph(nodes, edges, &config).unwrap();
        let tree = bounded_dijkstra(&graph, graph.index_of(1).unwrap(), Some(12.0)).unwrap();

        let network = reachable_road_network(&graph, &tree);
        let pairs: Vec<_> = network.iter().map(|e| (e.from, e.to)).collect();

        // 1 -> 3 directly takes 15 s and 3 -> 4 ends at 20 s: both over budget
        assert_eq!(pairs, vec![(1, 2), (2, 3)]);
        assert_eq!(network[0].travel_time, 5.0);
        assert_eq!(network[0].name.as_deref(), Some("Mill Lane"));
        assert_eq!(network[1].name, None);
        assert_eq!(network[1].endpoints().1, Point::new(0.0, 3.0));
    }
}
