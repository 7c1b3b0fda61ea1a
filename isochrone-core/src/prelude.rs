// Re-export key components
pub use crate::algo::cache::IsochroneCache;
pub use crate::algo::hull::{Hull, HullBuilder, HullConfig, HullKind, HullMode};
pub use crate::algo::isochrone::{
    IsochroneResult, ReachedNode, bulk_isochrones, generate_frontier_paths, generate_isochrone,
    generate_isochrone_with_deadline, generate_shortest_paths,
    generate_shortest_paths_with_deadline,
};
pub use crate::algo::network::{ReachableEdge, reachable_road_network};
pub use crate::loading::{RawEdge, RawNode, RoadGraphConfig, SpeedValue, create_road_graph};
pub use crate::model::{DistanceMetric, NetworkType, NetworkTypeProfile, RoadGraph};
pub use crate::routing::{ShortestPath, ShortestPathTree};

pub use crate::Error;

// Core types for the road network
pub use crate::NodeId;
pub use crate::TravelTime; // seconds
