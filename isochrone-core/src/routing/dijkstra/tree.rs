use hashbrown::HashMap;
use petgraph::graph::NodeIndex;

use crate::TravelTime;

/// Result of one bounded search: distance and predecessor maps rooted at `source`.
///
/// For every node `n` with predecessor `p`, `distances[n] == distances[p] + cost(p -> n)`,
/// `distances[source] == 0`, and when a budget was given every distance is within it.
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    pub(crate) source: NodeIndex,
    pub(crate) budget: Option<TravelTime>,
    pub(crate) distances: HashMap<NodeIndex, TravelTime>,
    pub(crate) predecessors: HashMap<NodeIndex, NodeIndex>,
}

impl ShortestPathTree {
    pub fn source(&self) -> NodeIndex {
        self.source
    }

    pub fn budget(&self) -> Option<TravelTime> {
        self.budget
    }

    pub fn distances(&self) -> &HashMap<NodeIndex, TravelTime> {
        &self.distances
    }

    pub fn predecessors(&self) -> &HashMap<NodeIndex, NodeIndex> {
        &self.predecessors
    }

    pub fn travel_time(&self, node: NodeIndex) -> Option<TravelTime> {
        self.distances.get(&node).copied()
    }

    pub fn predecessor(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.predecessors.get(&node).copied()
    }

    pub fn contains(&self, node: NodeIndex) -> bool {
        self.distances.contains_key(&node)
    }

    /// Number of reached nodes, the source included
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Node sequence from the source to `target`, or `None` if `target` was not reached
    pub fn path_to(&self, target: NodeIndex) -> Option<Vec<NodeIndex>> {
        if !self.contains(target) {
            return None;
        }

        let mut nodes = vec![target];
        let mut current = target;
        while current != self.source {
            current = self.predecessor(current)?;
            nodes.push(current);
            // Cycle guard
            if nodes.len() > self.distances.len() {
                return None;
            }
        }
        nodes.reverse(); // Now path is from start to target
        Some(nodes)
    }
}
