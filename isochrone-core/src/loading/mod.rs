//! This module turns the raw node and edge records handed over by a graph
//! provider into a cost-annotated, read-only road graph.

mod builder;
mod config;
mod costs;
mod raw_types;

pub use builder::create_road_graph;
pub use config::{RoadGraphConfig, ZeroLengthPolicy};
pub use costs::{EdgeCostAssigner, MalformedEdge, parse_speed_tag};
pub use raw_types::{RawEdge, RawNode, SpeedValue};
