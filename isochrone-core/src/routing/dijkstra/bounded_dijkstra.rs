use std::{collections::BinaryHeap, time::Instant};

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use petgraph::{graph::NodeIndex, visit::EdgeRef};

use super::{ShortestPathTree, state::State};
use crate::{Error, TravelTime, model::RoadGraph};

/// Settled nodes between two deadline checks
const DEADLINE_CHECK_INTERVAL: usize = 256;

/// Dijkstra's algorithm over the road network, bounded by `max_cost` seconds.
///
/// Nodes whose tentative travel time exceeds the budget are never recorded, so the
/// search only touches the reachable part of the network. Without a budget it
/// explores the whole component of `start`.
///
/// # Errors
///
/// `InvalidBudget` when `max_cost` is negative or not finite.
pub fn bounded_dijkstra(
    graph: &RoadGraph,
    start: NodeIndex,
    max_cost: Option<TravelTime>,
) -> Result<ShortestPathTree, Error> {
    check_budget(max_cost)?;
    search(graph, start, max_cost, None)
}

/// [`bounded_dijkstra`] that gives up once `deadline` has passed.
///
/// # Errors
///
/// `InvalidBudget` as for [`bounded_dijkstra`], and `DeadlineExceeded` when the
/// deadline passes before the queue runs empty.
pub fn bounded_dijkstra_with_deadline(
    graph: &RoadGraph,
    start: NodeIndex,
    max_cost: Option<TravelTime>,
    deadline: Option<Instant>,
) -> Result<ShortestPathTree, Error> {
    check_budget(max_cost)?;
    search(graph, start, max_cost, deadline)
}

/// A zero budget is valid and reaches only the start node
fn check_budget(max_cost: Option<TravelTime>) -> Result<(), Error> {
    match max_cost {
        Some(max) if !(max.is_finite() && max >= 0.0) => Err(Error::InvalidBudget(max)),
        _ => Ok(()),
    }
}

fn search(
    graph: &RoadGraph,
    start: NodeIndex,
    max_cost: Option<TravelTime>,
    deadline: Option<Instant>,
) -> Result<ShortestPathTree, Error> {
    // Estimate capacity based on graph size
    let estimated_nodes = graph.node_count().min(1000);
    let mut distances: HashMap<NodeIndex, TravelTime> = HashMap::with_capacity(estimated_nodes);
    let mut predecessors: HashMap<NodeIndex, NodeIndex> = HashMap::with_capacity(estimated_nodes);
    let mut settled = FixedBitSet::with_capacity(graph.node_count());
    let mut heap = BinaryHeap::with_capacity(estimated_nodes / 4);
    let mut settled_count = 0;

    // Start node has distance 0
    distances.insert(start, 0.0);
    heap.push(State {
        cost: 0.0,
        id: graph.graph[start].id,
        node: start,
    });

    while let Some(State { cost, node, .. }) = heap.pop() {
        // Stale queue entry, a cheaper one was already settled
        if settled.put(node.index()) {
            continue;
        }

        settled_count += 1;
        if let Some(deadline) = deadline
            && settled_count % DEADLINE_CHECK_INTERVAL == 0
            && Instant::now() >= deadline
        {
            return Err(Error::DeadlineExceeded {
                settled: settled_count,
            });
        }

        // Examine neighbors
        for edge in graph.edges(node) {
            let next = edge.target();
            if settled.contains(next.index()) {
                continue;
            }

            let next_cost = cost + edge.weight().travel_time();
            if max_cost.is_some_and(|max| next_cost > max) {
                continue;
            }

            // Add or update distance if better using Entry API
            match distances.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    predecessors.insert(next, node);
                    heap.push(State {
                        cost: next_cost,
                        id: graph.graph[next].id,
                        node: next,
                    });
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        predecessors.insert(next, node);
                        heap.push(State {
                            cost: next_cost,
                            id: graph.graph[next].id,
                            node: next,
                        });
                    }
                }
            }
        }
    }

    log::debug!(
        "Bounded search from node {} settled {settled_count} nodes",
        graph.graph[start].id
    );

    Ok(ShortestPathTree {
        source: start,
        budget: max_cost,
        distances,
        predecessors,
    })
}
