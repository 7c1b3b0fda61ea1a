use std::{fs::File, io::BufReader, path::Path};

use isochrone_core::{RawEdge, RawNode, RoadGraph, RoadGraphConfig, create_road_graph};
use serde::Deserialize;

use crate::error::ServerError;

/// Pre-fetched road network, `{ "nodes": [...], "edges": [...] }`
#[derive(Debug, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
}

impl GraphSnapshot {
    pub fn read(path: &Path) -> Result<Self, ServerError> {
        let file = File::open(path).map_err(|source| ServerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn into_graph(self, config: &RoadGraphConfig) -> Result<RoadGraph, ServerError> {
        Ok(create_road_graph(self.nodes, self.edges, config)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_accepts_speed_tags() {
        let snapshot: GraphSnapshot = serde_json::from_str(
            r#"{
                "nodes": [
                    {"id": 1, "lat": 51.0, "lon": -3.1},
                    {"id": 2, "lat": 51.001, "lon": -3.1}
                ],
                "edges": [
                    {"from": 1, "to": 2, "length": 111.0, "maxspeed": "20 mph"},
                    {"from": 2, "to": 1, "length": 111.0, "highway": "residential"}
                ]
            }"#,
        )
        .unwrap();

        let graph = snapshot.into_graph(&RoadGraphConfig::default()).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
    }
}
