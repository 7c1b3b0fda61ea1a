//! Road network components - nodes and edges

use geo::Point;

use crate::{NodeId, TravelTime};

/// Road graph node
#[derive(Debug, Clone, PartialEq)]
pub struct RoadNode {
    /// Provider id of the node
    pub id: NodeId,
    /// Node coordinates (x = longitude, y = latitude)
    pub geometry: Point<f64>,
}

/// Road graph edge (directed road segment)
#[derive(Debug, Clone, PartialEq)]
pub struct RoadEdge {
    /// Segment length in meters
    pub length: f64,
    /// Speed the cost was derived from, km/h
    pub speed: f64,
    /// Travel time in seconds, computed once at load time
    pub weight: TravelTime,
    /// Road category label (`highway` tag), if the provider supplied one
    pub category: Option<String>,
    pub name: Option<String>,
}

impl RoadEdge {
    pub fn travel_time(&self) -> TravelTime {
        self.weight
    }
}
