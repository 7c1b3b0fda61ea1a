use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use isochrone_core::RoadGraphConfig;
use serde::Deserialize;

use crate::error::ServerError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerSection,
    pub graph: GraphSection,
    pub cache: CacheSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: SocketAddr,
    pub request_timeout_secs: u64,
    pub max_concurrent_requests: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            request_timeout_secs: 30,
            max_concurrent_requests: 64,
        }
    }
}

impl ServerSection {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GraphSection {
    /// JSON snapshot with `nodes` and `edges` arrays
    pub snapshot: Option<PathBuf>,
    #[serde(flatten)]
    pub road: RoadGraphConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    pub enabled: bool,
    pub capacity: usize,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 1024,
        }
    }
}

impl Config {
    /// Read a TOML config file; without a path every section takes its defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ServerError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ServerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ServerError> {
        let config: Config = toml::from_str(text)?;
        if config.server.max_concurrent_requests == 0 {
            return Err(ServerError::InvalidConfig(
                "max_concurrent_requests must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use isochrone_core::{DistanceMetric, NetworkType};

    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.server.bind.port(), 8080);
        assert_eq!(config.server.request_timeout(), Duration::from_secs(30));
        assert!(config.cache.enabled);
        assert!(config.graph.snapshot.is_none());
        assert_eq!(config.graph.road.max_snap_distance, 500.0);
    }

    #[test]
    fn graph_section_flattens_road_config() {
        let config = Config::from_toml(
            r#"
            [server]
            bind = "0.0.0.0:9000"
            request_timeout_secs = 5

            [graph]
            snapshot = "city.json"
            network_type = "walk"
            metric = "euclidean"
            max_snap_distance = 100.0

            [graph.hull]
            fallback_buffer = 10.0

            [cache]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind.port(), 9000);
        assert_eq!(config.server.max_concurrent_requests, 64);
        assert_eq!(config.graph.snapshot, Some(PathBuf::from("city.json")));
        assert_eq!(config.graph.road.network_type, NetworkType::Walk);
        assert_eq!(config.graph.road.metric, DistanceMetric::Euclidean);
        assert_eq!(config.graph.road.max_snap_distance, 100.0);
        assert_eq!(config.graph.road.hull.fallback_buffer, 10.0);
        assert_eq!(config.graph.road.hull.fallback_segments, 16);
        assert!(!config.cache.enabled);
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let err = Config::from_toml("[server]\nmax_concurrent_requests = 0").unwrap_err();
        assert!(matches!(err, ServerError::InvalidConfig(_)));
    }
}
