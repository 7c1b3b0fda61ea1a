use isochrone_core::prelude::*;
use pyo3::{prelude::*, types::PyDict};
use wkt::ToWkt;

use crate::{model::PyRoadGraph, to_py_err};

fn hull_mode(mode: &str, alpha: Option<f64>) -> PyResult<HullMode> {
    HullMode::parse(mode, alpha).map_err(to_py_err)
}

/// Calculate the isochrone around a coordinate
///
/// Parameters
/// ----------
/// graph : RoadGraph
/// lat, lon : float
///     Source coordinate; snapped to the nearest node of the graph
/// max_time : float
///     Travel-time budget in seconds
/// mode : str, default="convex"
///     ``"convex"`` or ``"concave"`` (alpha shape)
/// alpha : float, optional
///     Largest triangle circumradius kept by the alpha shape, required for
///     ``"concave"``
///
/// Returns
/// -------
/// dict
///     ``polygon`` (WKT), ``source_node``, ``max_time``, ``hull_kind`` and
///     ``reachable``, a list of ``(id, lat, lon, travel_time)`` sorted by time
///
/// Raises
/// ------
/// ValueError
///     For an invalid budget, coordinate or alpha
/// RuntimeError
///     When the source is too far from the network or no hull can be built
#[cfg_attr(feature = "stubgen", pyo3_stub_gen::derive::gen_stub_pyfunction)]
#[pyfunction(name = "generate_isochrone")]
#[pyo3(signature = (graph, lat, lon, max_time, mode = "convex", alpha = None))]
pub fn py_generate_isochrone<'py>(
    py: Python<'py>,
    graph: &PyRoadGraph,
    lat: f64,
    lon: f64,
    max_time: f64,
    mode: &str,
    alpha: Option<f64>,
) -> PyResult<Bound<'py, PyDict>> {
    let mode = hull_mode(mode, alpha)?;
    let result = py
        .detach(|| generate_isochrone(&graph.graph, lat, lon, max_time, mode))
        .map_err(to_py_err)?;

    let dict = PyDict::new(py);
    dict.set_item("polygon", result.polygon.to_wkt().to_string())?;
    dict.set_item("source_node", result.source_node)?;
    dict.set_item("max_time", result.max_time)?;
    dict.set_item("hull_kind", result.hull_kind.as_str())?;
    let reachable: Vec<(NodeId, f64, f64, TravelTime)> = result
        .reachable
        .iter()
        .map(|node| {
            (
                node.id,
                node.geometry.y(),
                node.geometry.x(),
                node.travel_time,
            )
        })
        .collect();
    dict.set_item("reachable", reachable)?;
    Ok(dict)
}

/// Calculate isochrones for many sources in parallel
///
/// Returns one WKT polygon per source, in input order, or ``None`` where that
/// source failed (the reason is logged).
#[cfg_attr(feature = "stubgen", pyo3_stub_gen::derive::gen_stub_pyfunction)]
#[pyfunction(name = "generate_bulk_isochrones")]
#[pyo3(signature = (graph, sources, max_time, mode = "convex", alpha = None))]
#[allow(clippy::needless_pass_by_value)]
pub fn py_generate_bulk_isochrones(
    py: Python<'_>,
    graph: &PyRoadGraph,
    sources: Vec<(f64, f64)>,
    max_time: f64,
    mode: &str,
    alpha: Option<f64>,
) -> PyResult<Vec<Option<String>>> {
    let mode = hull_mode(mode, alpha)?;
    py.detach(|| {
        let results = bulk_isochrones(&graph.graph, &sources, max_time, mode);
        Ok(results
            .into_iter()
            .zip(&sources)
            .map(|(result, (lat, lon))| match result {
                Ok(result) => Some(result.polygon.to_wkt().to_string()),
                Err(e) => {
                    log::warn!("Isochrone from ({lat}, {lon}) failed: {e}");
                    None
                }
            })
            .collect())
    })
}

/// Shortest paths from the source to the isochrone boundary
///
/// Every vertex of the isochrone polygon is matched to its nearest reachable
/// node; the result holds one list of node ids per distinct node, each starting
/// at the snapped source.
#[cfg_attr(feature = "stubgen", pyo3_stub_gen::derive::gen_stub_pyfunction)]
#[pyfunction(name = "generate_frontier_paths")]
#[pyo3(signature = (graph, lat, lon, max_time, mode = "convex", alpha = None))]
pub fn py_generate_frontier_paths(
    py: Python<'_>,
    graph: &PyRoadGraph,
    lat: f64,
    lon: f64,
    max_time: f64,
    mode: &str,
    alpha: Option<f64>,
) -> PyResult<Vec<Vec<NodeId>>> {
    let mode = hull_mode(mode, alpha)?;
    py.detach(|| {
        let result =
            generate_isochrone(&graph.graph, lat, lon, max_time, mode).map_err(to_py_err)?;
        Ok(generate_frontier_paths(&graph.graph, &result)
            .into_iter()
            .map(|path| path.nodes)
            .collect())
    })
}
