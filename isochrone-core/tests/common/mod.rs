#![allow(dead_code)]

use isochrone_core::{
    DistanceMetric, NetworkTypeProfile, RawEdge, RawNode, RoadGraph, RoadGraphConfig,
    create_road_graph,
};

/// 36 km/h: every 10 m of edge length costs exactly one second
pub const TEST_SPEED_KMH: f64 = 36.0;

pub fn planar_config(max_snap_distance: f64) -> RoadGraphConfig {
    RoadGraphConfig {
        metric: DistanceMetric::Euclidean,
        max_snap_distance,
        profile: Some(NetworkTypeProfile::uniform(TEST_SPEED_KMH)),
        ..RoadGraphConfig::default()
    }
}

fn both_ways(from: i64, to: i64, length: f64) -> [RawEdge; 2] {
    let edge = RawEdge::new(from, to, length);
    [edge.reversed(), edge]
}

/// Unit square with a centre node hanging off its far corner.
///
/// Ids: 1 = (0,0), 2 = (0,1), 3 = (1,0), 4 = (1,1), 5 = (0.5,0.5) as (lat, lon).
/// Every edge costs 5 s; the sides run both ways and 5 is only linked to 4.
pub fn square_with_centre() -> RoadGraph {
    square_with_centre_using(&planar_config(0.1))
}

pub fn square_with_centre_using(config: &RoadGraphConfig) -> RoadGraph {
    let nodes = vec![
        RawNode::new(1, 0.0, 0.0),
        RawNode::new(2, 0.0, 1.0),
        RawNode::new(3, 1.0, 0.0),
        RawNode::new(4, 1.0, 1.0),
        RawNode::new(5, 0.5, 0.5),
    ];
    let edges: Vec<RawEdge> = [(1, 2), (2, 4), (4, 3), (3, 1), (4, 5)]
        .into_iter()
        .flat_map(|(from, to)| both_ways(from, to, 50.0))
        .collect();
    create_road_graph(nodes, edges, config).unwrap()
}

pub const GRID_ORIGIN: (f64, f64) = (51.0, -3.1);
pub const GRID_STEP: f64 = 0.001;

pub fn grid_id(row: usize, col: usize, size: usize) -> i64 {
    (row * size + col) as i64
}

/// `size` x `size` street grid near `GRID_ORIGIN`, haversine lengths, two-way streets
pub fn haversine_grid(size: usize) -> RoadGraph {
    let (lat0, lon0) = GRID_ORIGIN;
    let metric = DistanceMetric::Haversine;
    let mut nodes = Vec::with_capacity(size * size);
    for row in 0..size {
        for col in 0..size {
            nodes.push(RawNode::new(
                grid_id(row, col, size),
                lat0 + row as f64 * GRID_STEP,
                lon0 + col as f64 * GRID_STEP,
            ));
        }
    }

    let point = |node: &RawNode| geo::Point::new(node.lon, node.lat);
    let mut edges = Vec::new();
    for row in 0..size {
        for col in 0..size {
            let here = &nodes[row * size + col];
            if col + 1 < size {
                let east = &nodes[row * size + col + 1];
                edges.extend(both_ways(here.id, east.id, metric.distance(point(here), point(east))));
            }
            if row + 1 < size {
                let north = &nodes[(row + 1) * size + col];
                edges.extend(both_ways(here.id, north.id, metric.distance(point(here), point(north))));
            }
        }
    }

    let config = RoadGraphConfig {
        profile: Some(NetworkTypeProfile::uniform(TEST_SPEED_KMH)),
        ..RoadGraphConfig::default()
    };
    create_road_graph(nodes, edges, &config).unwrap()
}

/// Two planar 3 x 3 blocks ten units apart, joined by a straight road along y = 1
pub fn two_clusters() -> RoadGraph {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    for (block, offset) in [(0_i64, 0.0), (100, 10.0)] {
        for row in 0..3_i64 {
            for col in 0..3_i64 {
                let id = block + row * 3 + col;
                nodes.push(RawNode::new(id, row as f64, offset + col as f64));
                if col < 2 {
                    edges.extend(both_ways(id, id + 1, 10.0));
                }
                if row < 2 {
                    edges.extend(both_ways(id, id + 3, 10.0));
                }
            }
        }
    }
    // Connector from (1, 2) to (1, 10) through (1, 4), (1, 6), (1, 8)
    let mut previous = 5;
    for (i, x) in [4.0, 6.0, 8.0].into_iter().enumerate() {
        let id = 50 + i as i64;
        nodes.push(RawNode::new(id, 1.0, x));
        edges.extend(both_ways(previous, id, 20.0));
        previous = id;
    }
    edges.extend(both_ways(previous, 103, 20.0));

    create_road_graph(nodes, edges, &planar_config(0.5)).unwrap()
}
