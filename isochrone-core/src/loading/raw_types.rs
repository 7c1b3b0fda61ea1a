//! Records produced by a graph provider (freshly fetched or read from a snapshot)

use serde::{Deserialize, Serialize};

use crate::NodeId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
}

impl RawNode {
    pub fn new(id: NodeId, lat: f64, lon: f64) -> Self {
        Self { id, lat, lon }
    }
}

/// One directed road segment.
///
/// Two-way roads must be handed over as two records; see [`RawEdge::reversed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEdge {
    pub from: NodeId,
    pub to: NodeId,
    /// Length in meters
    #[serde(default)]
    pub length: Option<f64>,
    /// Posted speed (`maxspeed` tag or numeric km/h)
    #[serde(default)]
    pub maxspeed: Option<SpeedValue>,
    /// Road category (`highway` tag)
    #[serde(default)]
    pub highway: Option<String>,
    /// Street name (`name` tag)
    #[serde(default)]
    pub name: Option<String>,
}

impl RawEdge {
    pub fn new(from: NodeId, to: NodeId, length: f64) -> Self {
        Self {
            from,
            to,
            length: Some(length),
            maxspeed: None,
            highway: None,
            name: None,
        }
    }

    #[must_use]
    pub fn with_maxspeed(mut self, maxspeed: impl Into<SpeedValue>) -> Self {
        self.maxspeed = Some(maxspeed.into());
        self
    }

    #[must_use]
    pub fn with_highway(mut self, highway: impl Into<String>) -> Self {
        self.highway = Some(highway.into());
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Same segment travelled in the opposite direction
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            ..self.clone()
        }
    }
}

/// Speed attribute as it appears in map data.
///
/// A bare number is km/h. Tags are strings such as `"50"`, `"50 km/h"`,
/// `"30 mph"` or `"none"`; OpenStreetMap sometimes carries several of them for
/// one way, either as a list or separated by `;`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpeedValue {
    Kmh(f64),
    Tag(String),
    Tags(Vec<String>),
}

impl From<f64> for SpeedValue {
    fn from(value: f64) -> Self {
        SpeedValue::Kmh(value)
    }
}

impl From<&str> for SpeedValue {
    fn from(value: &str) -> Self {
        SpeedValue::Tag(value.to_string())
    }
}

impl From<String> for SpeedValue {
    fn from(value: String) -> Self {
        SpeedValue::Tag(value)
    }
}

impl From<Vec<String>> for SpeedValue {
    fn from(value: Vec<String>) -> Self {
        SpeedValue::Tags(value)
    }
}
