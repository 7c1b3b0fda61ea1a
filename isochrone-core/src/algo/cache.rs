//! Shared cache of recent isochrones

use std::{
    sync::{Arc, PoisonError, RwLock},
    time::Instant,
};

use hashbrown::{HashMap, hash_map::Entry};

use super::{
    hull::HullMode,
    isochrone::{IsochroneResult, generate_isochrone_with_deadline},
};
use crate::{Error, TravelTime, model::RoadGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    lat: u64,
    lon: u64,
    max_time: u64,
    /// `None` for the convex mode
    alpha: Option<u64>,
}

impl CacheKey {
    fn new(lat: f64, lon: f64, max_time: TravelTime, mode: HullMode) -> Self {
        Self {
            lat: lat.to_bits(),
            lon: lon.to_bits(),
            max_time: max_time.to_bits(),
            alpha: match mode {
                HullMode::Convex => None,
                HullMode::Concave { alpha } => Some(alpha.to_bits()),
            },
        }
    }
}

/// Isochrones keyed by (source, budget, mode, alpha) for one graph.
///
/// Readers share a read lock and see a consistent snapshot. Results are computed
/// outside any lock; the first writer for a key wins and later writers get the
/// stored value back, so each key is inserted at most once. Once `capacity`
/// entries are stored, new results are returned without being cached. Errors are
/// never cached.
#[derive(Debug)]
pub struct IsochroneCache {
    entries: RwLock<HashMap<CacheKey, Arc<IsochroneResult>>>,
    capacity: usize,
}

impl IsochroneCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::with_capacity(capacity.min(1024))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn get(
        &self,
        lat: f64,
        lon: f64,
        max_time: TravelTime,
        mode: HullMode,
    ) -> Option<Arc<IsochroneResult>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&CacheKey::new(lat, lon, max_time, mode))
            .cloned()
    }

    /// Cached isochrone for the request, computing and storing it on a miss.
    ///
    /// # Errors
    ///
    /// Whatever [`generate_isochrone_with_deadline`] fails with.
    pub fn get_or_generate(
        &self,
        graph: &RoadGraph,
        lat: f64,
        lon: f64,
        max_time: TravelTime,
        mode: HullMode,
        deadline: Option<Instant>,
    ) -> Result<Arc<IsochroneResult>, Error> {
        if let Some(hit) = self.get(lat, lon, max_time, mode) {
            log::trace!("Isochrone cache hit for ({lat}, {lon}) within {max_time}s");
            return Ok(hit);
        }

        let result = Arc::new(generate_isochrone_with_deadline(
            graph, lat, lon, max_time, mode, deadline,
        )?);

        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let len = entries.len();
        match entries.entry(CacheKey::new(lat, lon, max_time, mode)) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(_) if len >= self.capacity => Ok(result),
            Entry::Vacant(entry) => Ok(Arc::clone(entry.insert(result))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        DistanceMetric, RawEdge, RawNode, RoadGraphConfig, create_road_graph,
        model::NetworkTypeProfile,
    };

    fn graph() -> RoadGraph {
        let config = RoadGraphConfig {
            metric: DistanceMetric::Euclidean,
            max_snap_distance: 1.0,
            profile: Some(NetworkTypeProfile::uniform(36.0)),
            ..RoadGraphConfig::default()
        };
        let nodes = vec![
            RawNode::new(1, 0.0, 0.0),
            RawNode::new(2, 0.0, 5.0),
            RawNode::new(3, 5.0, 0.0),
        ];
        let edges = vec![RawEdge::new(1, 2, 50.0), RawEdge::new(1, 3, 50.0)];
        create_road_graph(nodes, edges, &config).unwrap()
    }

    #[test]
    fn repeated_requests_share_one_result() {
        let graph = graph();
        let cache = IsochroneCache::new(8);

        let first = cache
            .get_or_generate(&graph, 0.0, 0.0, 10.0, HullMode::Convex, None)
            .unwrap();
        let second = cache
            .get_or_generate(&graph, 0.0, 0.0, 10.0, HullMode::Convex, None)
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn mode_and_alpha_are_part_of_the_key() {
        let graph = graph();
        let cache = IsochroneCache::new(8);

        cache
            .get_or_generate(&graph, 0.0, 0.0, 10.0, HullMode::Convex, None)
            .unwrap();
        cache
            .get_or_generate(&graph, 0.0, 0.0, 10.0, HullMode::Concave { alpha: 10.0 }, None)
            .unwrap();
        cache
            .get_or_generate(&graph, 0.0, 0.0, 10.0, HullMode::Concave { alpha: 20.0 }, None)
            .unwrap();

        assert_eq!(cache.len(), 3);
        assert!(cache.get(0.0, 0.0, 10.0, HullMode::Concave { alpha: 20.0 }).is_some());
        assert!(cache.get(0.0, 0.0, 11.0, HullMode::Convex).is_none());
    }

    #[test]
    fn full_cache_still_answers_and_errors_are_not_stored() {
        let graph = graph();
        let cache = IsochroneCache::new(1);

        cache
            .get_or_generate(&graph, 0.0, 0.0, 10.0, HullMode::Convex, None)
            .unwrap();
        let uncached = cache
            .get_or_generate(&graph, 0.0, 0.0, 5.0, HullMode::Convex, None)
            .unwrap();
        assert_eq!(uncached.max_time, 5.0);
        assert_eq!(cache.len(), 1);

        assert!(
            cache
                .get_or_generate(&graph, 0.0, 0.0, -1.0, HullMode::Convex, None)
                .is_err()
        );
        assert_eq!(cache.len(), 1);
    }
}
