//! Time-bounded reachability over road networks.
//!
//! The crate takes an already loaded road network (nodes and directed edges with
//! lengths and optional speed attributes), derives travel-time costs once, and then
//! answers independent read-only queries against it:
//!
//! - [`generate_isochrone`] snaps a coordinate to the network, runs a budgeted
//!   Dijkstra search and wraps the reachable nodes in a convex hull or alpha shape;
//! - [`generate_shortest_paths`] extracts minimum-time paths from the same search tree.
//!
//! Fetching, reprojecting and serializing network data happens outside this crate.

pub mod algo;
pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use algo::cache::IsochroneCache;
pub use algo::hull::{Hull, HullBuilder, HullConfig, HullKind, HullMode};
pub use algo::isochrone::{
    IsochroneResult, ReachedNode, bulk_isochrones, generate_frontier_paths, generate_isochrone,
    generate_isochrone_with_deadline, generate_shortest_paths,
    generate_shortest_paths_with_deadline,
};
pub use algo::network::{ReachableEdge, reachable_road_network};
pub use error::Error;
pub use loading::{
    EdgeCostAssigner, MalformedEdge, RawEdge, RawNode, RoadGraphConfig, SpeedValue,
    ZeroLengthPolicy, create_road_graph,
};
pub use model::{DistanceMetric, NetworkType, NetworkTypeProfile, RoadGraph};
pub use routing::{ShortestPath, ShortestPathTree, bounded_dijkstra, extract_path, extract_paths};

/// Opaque node identifier, unique within one graph (OpenStreetMap ids fit)
pub type NodeId = i64;
/// Travel time in seconds
pub type TravelTime = f64;
