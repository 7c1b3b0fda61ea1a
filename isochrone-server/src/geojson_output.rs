//! GeoJSON encoding of isochrone results

use geo::LineString;
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use isochrone_core::{IsochroneResult, ReachableEdge, ShortestPath};
use serde_json::json;

use crate::error::ApiError;

/// Polygon first, then reachable nodes, then the optional network edges and
/// frontier paths
pub fn isochrone_collection(
    result: &IsochroneResult,
    network: Option<&[ReachableEdge]>,
    frontier: Option<&[ShortestPath]>,
) -> Result<FeatureCollection, ApiError> {
    let mut features = Vec::with_capacity(1 + result.reachable.len());
    features.push(polygon_feature(result)?);

    for node in &result.reachable {
        features.push(to_feature(json!({
            "type": "Feature",
            "geometry": Geometry::new(GeoJsonValue::from(&node.geometry)),
            "properties": {
                "kind": "reachable_node",
                "node_id": node.id,
                "travel_time": node.travel_time,
            }
        }))?);
    }

    for edge in network.unwrap_or_default() {
        let line = LineString::new(vec![edge.geometry.start, edge.geometry.end]);
        features.push(to_feature(json!({
            "type": "Feature",
            "geometry": Geometry::new(GeoJsonValue::from(&line)),
            "properties": {
                "kind": "network_edge",
                "from": edge.from,
                "to": edge.to,
                "length": edge.length,
                "travel_time": edge.travel_time,
                "name": edge.name,
            }
        }))?);
    }

    for path in frontier.unwrap_or_default() {
        // The source itself has no line to draw
        if path.nodes.len() < 2 {
            continue;
        }
        features.push(to_feature(json!({
            "type": "Feature",
            "geometry": path_geometry(path),
            "properties": {
                "kind": "frontier_path",
                "destination": path.destination(),
                "travel_time": path.travel_time,
                "nodes": path.nodes,
            }
        }))?);
    }

    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

pub fn path_geometry(path: &ShortestPath) -> Geometry {
    Geometry::new(GeoJsonValue::from(&path.to_line_string()))
}

fn polygon_feature(result: &IsochroneResult) -> Result<Feature, ApiError> {
    to_feature(json!({
        "type": "Feature",
        "geometry": Geometry::new(GeoJsonValue::from(&result.polygon)),
        "properties": {
            "kind": "isochrone",
            "source_node": result.source_node,
            "source": [result.source.x(), result.source.y()],
            "max_time": result.max_time,
            "hull": result.hull_kind,
            "reachable_nodes": result.reachable.len(),
        }
    }))
}

fn to_feature(value: serde_json::Value) -> Result<Feature, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Encoding(e.to_string()))
}
