//! Default speeds per network type and road category

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Default speed for driving when nothing better is known (30 mph)
pub const DEFAULT_DRIVE_SPEED: f64 = 48.28;
pub const DEFAULT_WALK_SPEED: f64 = 5.0;
pub const DEFAULT_BIKE_SPEED: f64 = 15.0;

/// Kind of network the graph was extracted for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkType {
    #[default]
    Drive,
    Walk,
    Bike,
}

impl NetworkType {
    /// Built-in speed profile for this network type
    pub fn profile(self) -> NetworkTypeProfile {
        match self {
            NetworkType::Drive => NetworkTypeProfile {
                default_speed: DEFAULT_DRIVE_SPEED,
                use_posted_speed: true,
                category_speeds: [
                    ("motorway", 100.0),
                    ("trunk", 80.0),
                    ("primary", 65.0),
                    ("secondary", 55.0),
                    ("tertiary", 45.0),
                    ("unclassified", 40.0),
                    ("residential", 30.0),
                    ("service", 20.0),
                    ("living_street", 10.0),
                ]
                .into_iter()
                .map(|(category, speed)| (category.to_string(), speed))
                .collect(),
            },
            NetworkType::Walk => NetworkTypeProfile::uniform(DEFAULT_WALK_SPEED),
            NetworkType::Bike => NetworkTypeProfile::uniform(DEFAULT_BIKE_SPEED),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NetworkType::Drive => "drive",
            NetworkType::Walk => "walk",
            NetworkType::Bike => "bike",
        }
    }
}

impl FromStr for NetworkType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "drive" => Ok(NetworkType::Drive),
            "walk" => Ok(NetworkType::Walk),
            "bike" => Ok(NetworkType::Bike),
            other => Err(Error::InvalidData(format!("Unknown network type '{other}'"))),
        }
    }
}

/// Speed defaults used when an edge carries no usable speed attribute.
///
/// Resolution order for one edge:
/// 1. the posted speed, if `use_posted_speed` is set and the value parses;
/// 2. `category_speeds` for the edge's road category, then for the category
///    with a trailing `_link` removed;
/// 3. `default_speed`.
///
/// All speeds are km/h.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkTypeProfile {
    pub default_speed: f64,
    #[serde(default = "posted_speed_default")]
    pub use_posted_speed: bool,
    #[serde(default)]
    pub category_speeds: BTreeMap<String, f64>,
}

fn posted_speed_default() -> bool {
    true
}

impl NetworkTypeProfile {
    /// Profile that ignores posted speeds and categories
    pub fn uniform(speed: f64) -> Self {
        Self {
            default_speed: speed,
            use_posted_speed: false,
            category_speeds: BTreeMap::new(),
        }
    }

    pub fn category_speed(&self, category: &str) -> Option<f64> {
        self.category_speeds.get(category).copied().or_else(|| {
            category
                .strip_suffix("_link")
                .and_then(|base| self.category_speeds.get(base).copied())
        })
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        let usable = |speed: f64| speed.is_finite() && speed > 0.0;
        if !usable(self.default_speed) {
            return Err(Error::InvalidData(format!(
                "Default speed must be positive, got {}",
                self.default_speed
            )));
        }
        if let Some((category, speed)) = self
            .category_speeds
            .iter()
            .find(|(_, speed)| !usable(**speed))
        {
            return Err(Error::InvalidData(format!(
                "Speed for category '{category}' must be positive, got {speed}"
            )));
        }
        Ok(())
    }
}

impl Default for NetworkTypeProfile {
    fn default() -> Self {
        NetworkType::default().profile()
    }
}
