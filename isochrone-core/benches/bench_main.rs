use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use isochrone_core::{
    DistanceMetric, HullMode, NetworkTypeProfile, RawEdge, RawNode, RoadGraph, RoadGraphConfig,
    bounded_dijkstra, create_road_graph, generate_isochrone,
};

const SIZE: usize = 100;
const STEP: f64 = 50.0;

/// Planar two-way grid with `STEP` meter blocks at walking speed
fn grid() -> RoadGraph {
    let id = |row: usize, col: usize| (row * SIZE + col) as i64;
    let mut nodes = Vec::with_capacity(SIZE * SIZE);
    let mut edges = Vec::new();
    for row in 0..SIZE {
        for col in 0..SIZE {
            nodes.push(RawNode::new(id(row, col), row as f64 * STEP, col as f64 * STEP));
            if col + 1 < SIZE {
                let edge = RawEdge::new(id(row, col), id(row, col + 1), STEP);
                edges.push(edge.reversed());
                edges.push(edge);
            }
            if row + 1 < SIZE {
                let edge = RawEdge::new(id(row, col), id(row + 1, col), STEP);
                edges.push(edge.reversed());
                edges.push(edge);
            }
        }
    }

    let config = RoadGraphConfig {
        metric: DistanceMetric::Euclidean,
        max_snap_distance: STEP,
        profile: Some(NetworkTypeProfile::uniform(5.0)),
        ..RoadGraphConfig::default()
    };
    create_road_graph(nodes, edges, &config).unwrap()
}

fn search_bench(c: &mut Criterion) {
    let graph = grid();
    let centre = (SIZE / 2 * SIZE + SIZE / 2) as i64;
    let source = graph.index_of(centre).unwrap();

    let mut group = c.benchmark_group("bounded_dijkstra");
    for budget in [300.0, 900.0, 1800.0] {
        group.bench_with_input(BenchmarkId::from_parameter(budget), &budget, |b, &budget| {
            b.iter(|| bounded_dijkstra(&graph, black_box(source), Some(budget)))
        });
    }
    group.finish();
}

fn hull_bench(c: &mut Criterion) {
    let graph = grid();
    let middle = (SIZE / 2) as f64 * STEP;

    let mut group = c.benchmark_group("isochrone");
    group.sample_size(20);
    for (name, mode) in [
        ("convex", HullMode::Convex),
        ("concave", HullMode::Concave { alpha: STEP }),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| generate_isochrone(&graph, middle, middle, black_box(900.0), mode).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, search_bench, hull_bench);
criterion_main!(benches);
