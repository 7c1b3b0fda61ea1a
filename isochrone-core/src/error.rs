use geo::Coord;
use thiserror::Error;

use crate::{NodeId, TravelTime};

#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "Query point ({lat}, {lon}) is {distance:.1} away from the nearest network node \
         (maximum snap distance {max_distance:.1})"
    )]
    OutOfNetwork {
        lat: f64,
        lon: f64,
        distance: f64,
        max_distance: f64,
    },
    #[error("No network nodes available for snapping")]
    NoPointsFound,
    #[error("Invalid time budget {0}: must be positive and finite")]
    InvalidBudget(TravelTime),
    #[error("Invalid source coordinate ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },
    #[error("Invalid alpha parameter {0}: must be positive")]
    InvalidAlpha(f64),
    #[error("Cannot build a hull from {} point(s)", points.len())]
    InsufficientPoints { points: Vec<Coord<f64>> },
    #[error("Node {0} is not reachable within the time budget")]
    UnreachableNode(NodeId),
    #[error("Search deadline exceeded after settling {settled} nodes")]
    DeadlineExceeded { settled: usize },
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Request validation failures, raised before any search runs
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidBudget(_)
                | Error::InvalidCoordinate { .. }
                | Error::InvalidAlpha(_)
                | Error::InvalidData(_)
        )
    }
}
