use isochrone_core::prelude::*;
use pyo3::{prelude::*, types::PyDict};

use crate::{model::PyRoadGraph, to_py_err};

/// Shortest paths from a coordinate to the given destination nodes
///
/// Parameters
/// ----------
/// graph : RoadGraph
/// lat, lon : float
///     Source coordinate
/// max_time : float
///     Travel-time budget in seconds; destinations beyond it are unreachable
/// destinations : list[int]
///     Node ids
///
/// Returns
/// -------
/// tuple[dict, dict]
///     ``paths`` maps each reached id to ``{"nodes": [...], "travel_time": float}``,
///     ``errors`` maps every other id to a message
#[cfg_attr(feature = "stubgen", pyo3_stub_gen::derive::gen_stub_pyfunction)]
#[pyfunction(name = "generate_shortest_paths")]
#[allow(clippy::needless_pass_by_value)]
pub fn py_generate_shortest_paths<'py>(
    py: Python<'py>,
    graph: &PyRoadGraph,
    lat: f64,
    lon: f64,
    max_time: f64,
    destinations: Vec<NodeId>,
) -> PyResult<(Bound<'py, PyDict>, Bound<'py, PyDict>)> {
    let results = py
        .detach(|| generate_shortest_paths(&graph.graph, lat, lon, max_time, &destinations))
        .map_err(to_py_err)?;

    let paths = PyDict::new(py);
    let errors = PyDict::new(py);
    for (id, result) in results {
        match result {
            Ok(path) => {
                let entry = PyDict::new(py);
                entry.set_item("nodes", path.nodes)?;
                entry.set_item("travel_time", path.travel_time)?;
                paths.set_item(id, entry)?;
            }
            Err(e) => errors.set_item(id, e.to_string())?,
        }
    }
    Ok((paths, errors))
}
