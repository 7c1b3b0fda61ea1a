use std::cmp::Ordering;

use petgraph::graph::NodeIndex;

use crate::{NodeId, TravelTime};

#[derive(Copy, Clone, PartialEq)]
pub(super) struct State {
    pub(super) cost: TravelTime,
    /// Provider id, breaks ties between equal costs
    pub(super) id: NodeId,
    pub(super) node: NodeIndex,
}

impl Eq for State {}

// Implement Ord for State to use in BinaryHeap
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by cost, then by node id (reversed from standard Rust BinaryHeap)
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
