mod common;

use common::{GRID_ORIGIN, GRID_STEP, grid_id, haversine_grid, square_with_centre};
use isochrone_core::prelude::*;
use isochrone_core::{bounded_dijkstra, extract_path};

#[test]
fn square_scenario_reaches_exactly_two_hops() {
    let graph = square_with_centre();
    let result = generate_isochrone(&graph, 0.0, 0.0, 10.0, HullMode::Convex).unwrap();

    let reached: Vec<(NodeId, TravelTime)> = result
        .reachable
        .iter()
        .map(|node| (node.id, node.travel_time))
        .collect();
    assert_eq!(reached, vec![(1, 0.0), (2, 5.0), (3, 5.0), (4, 10.0)]);
    assert_eq!(result.source_node, 1);

    let centre = graph.index_of(5).unwrap();
    assert!(!result.tree.contains(centre));
    assert_eq!(result.tree.distances().len(), 4);
}

#[test]
fn unbounded_search_reaches_the_centre() {
    let graph = square_with_centre();
    let source = graph.index_of(1).unwrap();
    let tree = bounded_dijkstra(&graph, source, None).unwrap();

    assert_eq!(tree.len(), 5);
    assert_eq!(tree.travel_time(graph.index_of(5).unwrap()), Some(15.0));
}

#[test]
fn path_outside_budget_is_unreachable() {
    let graph = square_with_centre();
    let paths = generate_shortest_paths(&graph, 0.0, 0.0, 10.0, &[4, 5, 99]).unwrap();

    let to_corner = paths[&4].as_ref().unwrap();
    assert_eq!(to_corner.travel_time, 10.0);
    assert_eq!(to_corner.nodes.len(), 3);
    assert_eq!(to_corner.source(), Some(1));

    assert!(matches!(paths[&5], Err(Error::UnreachableNode(5))));
    assert!(matches!(paths[&99], Err(Error::UnreachableNode(99))));
}

#[test]
fn larger_budgets_never_lose_nodes() {
    let graph = haversine_grid(12);
    let (lat0, lon0) = GRID_ORIGIN;
    let (lat, lon) = (lat0 + 6.0 * GRID_STEP, lon0 + 6.0 * GRID_STEP);

    let mut previous: Option<IsochroneResult> = None;
    for budget in [15.0, 30.0, 60.0, 120.0, 240.0] {
        let current = generate_isochrone(&graph, lat, lon, budget, HullMode::Convex).unwrap();
        if let Some(previous) = &previous {
            for node in &previous.reachable {
                let idx = graph.index_of(node.id).unwrap();
                let time = current.tree.travel_time(idx).unwrap();
                assert!((time - node.travel_time).abs() < 1e-9);
            }
            assert!(current.reachable.len() >= previous.reachable.len());
            assert!(
                geo::Area::unsigned_area(&current.polygon)
                    >= geo::Area::unsigned_area(&previous.polygon)
            );
        }
        assert!(current.reachable.iter().all(|node| node.travel_time <= budget));
        previous = Some(current);
    }
}

#[test]
fn tree_distances_match_edge_costs() {
    let graph = haversine_grid(10);
    let source = graph.index_of(grid_id(3, 4, 10)).unwrap();
    let tree = bounded_dijkstra(&graph, source, Some(90.0)).unwrap();

    assert_eq!(tree.travel_time(source), Some(0.0));
    assert_eq!(tree.predecessor(source), None);
    for (&node, &time) in tree.distances() {
        if node == source {
            continue;
        }
        let parent = tree.predecessor(node).unwrap();
        let cost = graph.edge_cost(parent, node).unwrap();
        assert_eq!(time, tree.travel_time(parent).unwrap() + cost);
        assert!(time <= 90.0);
    }
}

#[test]
fn extracted_paths_sum_to_their_travel_time() {
    let graph = haversine_grid(8);
    let source = graph.index_of(0).unwrap();
    let tree = bounded_dijkstra(&graph, source, None).unwrap();

    let path = extract_path(&graph, &tree, grid_id(7, 7, 8)).unwrap();
    assert_eq!(path.nodes.len(), 15);
    assert_eq!(path.coordinates.len(), path.nodes.len());

    let total: f64 = path
        .nodes
        .windows(2)
        .map(|pair| {
            let from = graph.index_of(pair[0]).unwrap();
            let to = graph.index_of(pair[1]).unwrap();
            graph.edge_cost(from, to).unwrap()
        })
        .sum();
    assert!((total - path.travel_time).abs() < 1e-9);
}

#[test]
fn query_far_from_the_grid_is_rejected() {
    let graph = haversine_grid(4);
    let err = generate_isochrone(&graph, 52.0, -3.1, 60.0, HullMode::Convex).unwrap_err();
    match err {
        Error::OutOfNetwork {
            distance,
            max_distance,
            ..
        } => {
            assert!(distance > max_distance);
            assert_eq!(max_distance, 500.0);
        }
        other => panic!("expected OutOfNetwork, got {other:?}"),
    }
}
