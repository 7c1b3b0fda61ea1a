//! Travel-time cost derivation for road edges

use thiserror::Error;

use super::{RawEdge, SpeedValue, ZeroLengthPolicy};
use crate::{NodeId, model::NetworkTypeProfile, model::RoadEdge};

const MPH_TO_KMH: f64 = 1.609_344;
const KNOTS_TO_KMH: f64 = 1.852;

/// Reason an edge was left out of the cost graph. Logged, never raised.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MalformedEdge {
    #[error("edge has no length")]
    MissingLength,
    #[error("edge length {0} is not positive")]
    NonPositiveLength(f64),
    #[error("edge length is not finite")]
    NonFiniteLength,
    #[error("edge references unknown node {0}")]
    UnknownEndpoint(NodeId),
    #[error("resolved speed {0} km/h is not usable")]
    InvalidSpeed(f64),
}

/// Parse a single speed tag into km/h.
///
/// Accepts `"<number>"`, `"<number> km/h"` (also `kmh`, `kph`), `"<number> mph"`
/// and `"<number> knots"`. Returns `None` for `"none"`, empty tags, unknown units
/// and values that are not positive.
pub fn parse_speed_tag(tag: &str) -> Option<f64> {
    let tag = tag.trim().to_ascii_lowercase();
    if tag.is_empty() || tag == "none" {
        return None;
    }

    let (number, unit) = match tag.find(|c: char| !(c.is_ascii_digit() || c == '.')) {
        Some(pos) => (tag[..pos].trim(), tag[pos..].trim()),
        None => (tag.as_str(), ""),
    };
    let value: f64 = number.parse().ok()?;
    let factor = match unit {
        "" | "km/h" | "kmh" | "kph" => 1.0,
        "mph" => MPH_TO_KMH,
        "knots" => KNOTS_TO_KMH,
        _ => return None,
    };

    let kmh = value * factor;
    (kmh.is_finite() && kmh > 0.0).then_some(kmh)
}

impl SpeedValue {
    /// Speed in km/h, or `None` if nothing in the value is recognisable.
    /// Several tags resolve to the mean of the recognisable ones.
    pub fn to_kmh(&self) -> Option<f64> {
        match self {
            SpeedValue::Kmh(value) => (value.is_finite() && *value > 0.0).then_some(*value),
            SpeedValue::Tag(tag) if tag.contains(';') => mean_speed(tag.split(';')),
            SpeedValue::Tag(tag) => parse_speed_tag(tag),
            SpeedValue::Tags(tags) => mean_speed(tags.iter().flat_map(|tag| tag.split(';'))),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean_speed<'a>(tags: impl Iterator<Item = &'a str>) -> Option<f64> {
    let speeds: Vec<f64> = tags.filter_map(parse_speed_tag).collect();
    if speeds.is_empty() {
        None
    } else {
        Some(speeds.iter().sum::<f64>() / speeds.len() as f64)
    }
}

/// Derives edge travel times from length and speed, once per graph load
#[derive(Debug, Clone, Copy)]
pub struct EdgeCostAssigner<'a> {
    profile: &'a NetworkTypeProfile,
    zero_length_policy: ZeroLengthPolicy,
}

impl<'a> EdgeCostAssigner<'a> {
    pub fn new(profile: &'a NetworkTypeProfile, zero_length_policy: ZeroLengthPolicy) -> Self {
        Self {
            profile,
            zero_length_policy,
        }
    }

    /// Speed for `edge` in km/h following the profile's resolution order
    pub fn resolve_speed(&self, edge: &RawEdge) -> f64 {
        let posted = if self.profile.use_posted_speed {
            edge.maxspeed.as_ref().and_then(SpeedValue::to_kmh)
        } else {
            None
        };

        posted
            .or_else(|| {
                edge.highway
                    .as_deref()
                    .and_then(|category| self.profile.category_speed(category))
            })
            .unwrap_or(self.profile.default_speed)
    }

    /// Build the cost-annotated edge payload.
    ///
    /// # Errors
    ///
    /// The reason the edge has to be excluded from the cost graph.
    pub fn assign(&self, edge: &RawEdge) -> Result<RoadEdge, MalformedEdge> {
        let length = match edge.length {
            None => self.zero_length(MalformedEdge::MissingLength)?,
            Some(length) if !length.is_finite() => return Err(MalformedEdge::NonFiniteLength),
            Some(length) if length <= 0.0 => {
                self.zero_length(MalformedEdge::NonPositiveLength(length))?
            }
            Some(length) => length,
        };

        let speed = self.resolve_speed(edge);
        if !(speed.is_finite() && speed > 0.0) {
            return Err(MalformedEdge::InvalidSpeed(speed));
        }

        let meters_per_second = speed * 1000.0 / 3600.0;
        Ok(RoadEdge {
            length,
            speed,
            weight: length / meters_per_second,
            category: edge.highway.clone(),
            name: edge.name.clone(),
        })
    }

    fn zero_length(&self, issue: MalformedEdge) -> Result<f64, MalformedEdge> {
        match self.zero_length_policy {
            ZeroLengthPolicy::ZeroCost => Ok(0.0),
            ZeroLengthPolicy::Exclude => Err(issue),
        }
    }
}
