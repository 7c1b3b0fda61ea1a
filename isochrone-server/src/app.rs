use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    http::StatusCode,
    routing::{get, post},
};
use isochrone_core::{
    Error, HullMode, IsochroneCache, IsochroneResult, RoadGraph, TravelTime,
    generate_isochrone_with_deadline,
};
use tower::{ServiceBuilder, limit::GlobalConcurrencyLimitLayer, timeout::TimeoutLayer};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{config::Config, routes};

/// Shared by every handler; the graph is never mutated after startup
#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<RoadGraph>,
    pub cache: Option<Arc<IsochroneCache>>,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(graph: RoadGraph, config: &Config) -> Self {
        Self {
            graph: Arc::new(graph),
            cache: config
                .cache
                .enabled
                .then(|| Arc::new(IsochroneCache::new(config.cache.capacity))),
            request_timeout: config.server.request_timeout(),
        }
    }

    /// Point after which a search started now is abandoned
    pub fn deadline(&self) -> Instant {
        Instant::now() + self.request_timeout
    }

    pub fn isochrone(
        &self,
        lat: f64,
        lon: f64,
        max_time: TravelTime,
        mode: HullMode,
    ) -> Result<Arc<IsochroneResult>, Error> {
        let deadline = Some(self.deadline());
        match &self.cache {
            Some(cache) => cache.get_or_generate(&self.graph, lat, lon, max_time, mode, deadline),
            None => generate_isochrone_with_deadline(&self.graph, lat, lon, max_time, mode, deadline)
                .map(Arc::new),
        }
    }
}

pub fn router(state: AppState, config: &Config) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_middleware_error))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(GlobalConcurrencyLimitLayer::new(
            config.server.max_concurrent_requests,
        ));

    Router::new()
        .route("/health", get(routes::health))
        .route("/graph", get(routes::graph_info))
        .route("/isochrone", post(routes::isochrone))
        .route("/paths", post(routes::paths))
        .layer(middleware)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn handle_middleware_error(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::GATEWAY_TIMEOUT, "Request timed out".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Unhandled internal error: {err}"),
        )
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, header},
    };
    use isochrone_core::{
        DistanceMetric, NetworkTypeProfile, RawEdge, RawNode, RoadGraphConfig, create_road_graph,
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    /// Unit square, two-way sides of 5 s each, with node 5 hanging off node 4
    fn app() -> Router {
        let road = RoadGraphConfig {
            metric: DistanceMetric::Euclidean,
            max_snap_distance: 0.1,
            profile: Some(NetworkTypeProfile::uniform(36.0)),
            ..RoadGraphConfig::default()
        };
        let nodes = vec![
            RawNode::new(1, 0.0, 0.0),
            RawNode::new(2, 0.0, 1.0),
            RawNode::new(3, 1.0, 0.0),
            RawNode::new(4, 1.0, 1.0),
            RawNode::new(5, 0.5, 0.5),
        ];
        let edges: Vec<RawEdge> = [(1, 2), (2, 4), (4, 3), (3, 1), (4, 5)]
            .into_iter()
            .flat_map(|(from, to)| {
                let edge = RawEdge::new(from, to, 50.0);
                [edge.reversed(), edge]
            })
            .collect();
        let graph = create_road_graph(nodes, edges, &road).unwrap();

        let config = Config::default();
        router(AppState::new(graph, &config), &config)
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn graph_info_reports_counts() {
        let (status, body) = send(app(), "GET", "/graph", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nodes"], 5);
        assert_eq!(body["edges"], 10);
        assert_eq!(body["excluded_edges"], 0);
        assert_eq!(body["metric"], "euclidean");
    }

    #[tokio::test]
    async fn isochrone_returns_polygon_and_reachable_nodes() {
        let request = json!({ "lat": 0.0, "lon": 0.0, "max_time": 10.0, "include_network": true });
        let (status, body) = send(app(), "POST", "/isochrone", Some(request)).await;

        assert_eq!(status, StatusCode::OK);
        let features = body["features"].as_array().unwrap();
        assert_eq!(features[0]["geometry"]["type"], "Polygon");
        assert_eq!(features[0]["properties"]["source_node"], 1);
        assert_eq!(features[0]["properties"]["hull"]["kind"], "convex");

        let kinds: Vec<&str> = features
            .iter()
            .filter_map(|f| f["properties"]["kind"].as_str())
            .collect();
        assert_eq!(kinds.iter().filter(|k| **k == "reachable_node").count(), 4);
        // Edges out of node 4 would end past the budget
        assert_eq!(kinds.iter().filter(|k| **k == "network_edge").count(), 6);
    }

    #[tokio::test]
    async fn errors_map_to_statuses() {
        let invalid = json!({ "lat": 0.0, "lon": 0.0, "max_time": -1.0 });
        let (status, body) = send(app(), "POST", "/isochrone", Some(invalid)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_budget");

        let far = json!({ "lat": 40.0, "lon": 40.0, "max_time": 10.0 });
        let (status, body) = send(app(), "POST", "/isochrone", Some(far)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "out_of_network");

        let no_alpha = json!({ "lat": 0.0, "lon": 0.0, "max_time": 10.0, "mode": "concave" });
        let (status, _) = send(app(), "POST", "/isochrone", Some(no_alpha)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn paths_split_results_and_errors() {
        let request = json!({ "lat": 0.0, "lon": 0.0, "max_time": 10.0, "destinations": [4, 5] });
        let (status, body) = send(app(), "POST", "/paths", Some(request)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["paths"]["4"]["travel_time"], 10.0);
        assert_eq!(body["paths"]["4"]["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(body["paths"]["4"]["geometry"]["type"], "LineString");
        assert!(body["errors"]["5"].is_string());
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = send(app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }
}
