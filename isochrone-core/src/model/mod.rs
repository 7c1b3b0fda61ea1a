//! Data model for road network reachability
//!
//! Contains the loaded road graph, its node and edge payloads, the per-network
//! speed profiles and the distance metric shared by snapping and hull building.

pub mod metric;
pub mod profile;
pub mod streets;

pub use metric::DistanceMetric;
pub use profile::{NetworkType, NetworkTypeProfile};
pub use streets::{IndexedPoint, RoadEdge, RoadGraph, RoadGraphMeta, RoadNode};
