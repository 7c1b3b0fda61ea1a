use std::collections::BTreeMap;

use axum::{Json, extract::State};
use geojson::{FeatureCollection, Geometry};
use isochrone_core::{
    HullMode, NodeId, TravelTime, generate_frontier_paths, generate_shortest_paths_with_deadline,
    reachable_road_network,
};
use serde::{Deserialize, Serialize};

use crate::{app::AppState, error::ApiError, geojson_output};

#[derive(Debug, Deserialize)]
pub struct IsochroneRequest {
    pub lat: f64,
    pub lon: f64,
    pub max_time: TravelTime,
    #[serde(default = "default_mode")]
    pub mode: String,
    pub alpha: Option<f64>,
    #[serde(default)]
    pub include_network: bool,
    #[serde(default)]
    pub include_frontier_paths: bool,
}

fn default_mode() -> String {
    "convex".to_string()
}

#[derive(Debug, Deserialize)]
pub struct PathsRequest {
    pub lat: f64,
    pub lon: f64,
    pub max_time: TravelTime,
    pub destinations: Vec<NodeId>,
}

#[derive(Debug, Serialize)]
pub struct PathBody {
    pub nodes: Vec<NodeId>,
    pub travel_time: TravelTime,
    pub geometry: Geometry,
}

#[derive(Debug, Serialize)]
pub struct PathsResponse {
    pub paths: BTreeMap<NodeId, PathBody>,
    pub errors: BTreeMap<NodeId, String>,
}

#[derive(Debug, Serialize)]
pub struct GraphInfo {
    pub nodes: usize,
    pub edges: usize,
    pub excluded_edges: usize,
    pub metric: &'static str,
    pub network_type: &'static str,
}

pub async fn health() -> Json<&'static str> {
    Json("ok")
}

pub async fn graph_info(State(state): State<AppState>) -> Json<GraphInfo> {
    let graph = &state.graph;
    Json(GraphInfo {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        excluded_edges: graph.meta.excluded_edges,
        metric: graph.metric().as_str(),
        network_type: graph.meta.config.network_type.as_str(),
    })
}

pub async fn isochrone(
    State(state): State<AppState>,
    Json(request): Json<IsochroneRequest>,
) -> Result<Json<FeatureCollection>, ApiError> {
    let mode = HullMode::parse(&request.mode, request.alpha)?;

    let collection =
        tokio::task::spawn_blocking(move || isochrone_features(&state, &request, mode)).await??;

    Ok(Json(collection))
}

fn isochrone_features(
    state: &AppState,
    request: &IsochroneRequest,
    mode: HullMode,
) -> Result<FeatureCollection, ApiError> {
    let result = state.isochrone(request.lat, request.lon, request.max_time, mode)?;
    let network = request
        .include_network
        .then(|| reachable_road_network(&state.graph, &result.tree));
    let frontier = request
        .include_frontier_paths
        .then(|| generate_frontier_paths(&state.graph, &result));

    tracing::debug!(
        "Isochrone from node {} reached {} nodes",
        result.source_node,
        result.reachable.len()
    );
    geojson_output::isochrone_collection(&result, network.as_deref(), frontier.as_deref())
}

pub async fn paths(
    State(state): State<AppState>,
    Json(request): Json<PathsRequest>,
) -> Result<Json<PathsResponse>, ApiError> {
    let results = tokio::task::spawn_blocking(move || {
        generate_shortest_paths_with_deadline(
            &state.graph,
            request.lat,
            request.lon,
            request.max_time,
            &request.destinations,
            Some(state.deadline()),
        )
    })
    .await??;

    let mut response = PathsResponse {
        paths: BTreeMap::new(),
        errors: BTreeMap::new(),
    };
    for (id, result) in results {
        match result {
            Ok(path) => {
                response.paths.insert(
                    id,
                    PathBody {
                        geometry: geojson_output::path_geometry(&path),
                        nodes: path.nodes,
                        travel_time: path.travel_time,
                    },
                );
            }
            Err(err) => {
                response.errors.insert(id, err.to_string());
            }
        }
    }

    Ok(Json(response))
}
