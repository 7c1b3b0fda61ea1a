use serde::{Deserialize, Serialize};

use crate::{
    Error,
    algo::hull::HullConfig,
    model::{DistanceMetric, NetworkType, NetworkTypeProfile},
};

/// Default maximum distance between a query point and the node it snaps to
/// (meters under the haversine metric)
pub const DEFAULT_MAX_SNAP_DISTANCE: f64 = 500.0;

/// What to do with edges whose length is missing or not positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroLengthPolicy {
    /// Drop the edge from the cost graph and log it
    #[default]
    Exclude,
    /// Keep the edge with zero travel time
    ZeroCost,
}

/// Load-time configuration of a road graph.
///
/// Everything here is fixed once the graph is built: the metric in particular is
/// used both for snapping query points and for measuring hull geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadGraphConfig {
    pub network_type: NetworkType,
    /// Overrides the built-in profile of `network_type`
    pub profile: Option<NetworkTypeProfile>,
    pub zero_length_policy: ZeroLengthPolicy,
    pub metric: DistanceMetric,
    pub max_snap_distance: f64,
    pub hull: HullConfig,
}

impl Default for RoadGraphConfig {
    fn default() -> Self {
        Self {
            network_type: NetworkType::default(),
            profile: None,
            zero_length_policy: ZeroLengthPolicy::default(),
            metric: DistanceMetric::default(),
            max_snap_distance: DEFAULT_MAX_SNAP_DISTANCE,
            hull: HullConfig::default(),
        }
    }
}

impl RoadGraphConfig {
    pub fn resolved_profile(&self) -> NetworkTypeProfile {
        self.profile
            .clone()
            .unwrap_or_else(|| self.network_type.profile())
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.max_snap_distance.is_nan() || self.max_snap_distance < 0.0 {
            return Err(Error::InvalidData(format!(
                "Maximum snap distance must be non-negative, got {}",
                self.max_snap_distance
            )));
        }
        self.resolved_profile().validate()?;
        self.hull.validate()
    }
}
