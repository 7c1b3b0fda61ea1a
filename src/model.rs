use isochrone_core::prelude::*;
use isochrone_core::NetworkType;
use pyo3::{exceptions::PyValueError, prelude::*};

use crate::to_py_err;

/// RoadGraph
///
/// A read-only road network with travel-time costs on every edge and a
/// spatial index over its nodes. Build it once with `create_road_graph` and
/// pass it to any number of isochrone or shortest-path calls.
///
/// Example:
///
/// .. code-block:: python
///
///     graph = create_road_graph(nodes, edges, network_type="walk")
///     result = generate_isochrone(graph, 51.48, -3.18, 600.0)
#[cfg_attr(feature = "stubgen", pyo3_stub_gen::derive::gen_stub_pyclass)]
#[pyclass(name = "RoadGraph", frozen)]
pub struct PyRoadGraph {
    pub(crate) graph: RoadGraph,
}

#[cfg_attr(feature = "stubgen", pyo3_stub_gen::derive::gen_stub_pymethods)]
#[pymethods]
impl PyRoadGraph {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Edges dropped as malformed while loading
    pub fn excluded_edges(&self) -> usize {
        self.graph.meta.excluded_edges
    }

    pub fn metric(&self) -> &'static str {
        self.graph.metric().as_str()
    }

    fn __repr__(&self) -> String {
        format!(
            "RoadGraph({} network, {} nodes, {} edges, {} metric)",
            self.graph.meta.config.network_type.as_str(),
            self.graph.node_count(),
            self.graph.edge_count(),
            self.graph.metric().as_str()
        )
    }

    fn __str__(&self) -> String {
        self.__repr__()
    }
}

/// `(from, to, length, maxspeed, highway)`; `maxspeed` may be a number (km/h),
/// a tag string or a list of tag strings
type EdgeTuple<'py> = (
    NodeId,
    NodeId,
    Option<f64>,
    Option<Bound<'py, PyAny>>,
    Option<String>,
);

fn speed_value(value: &Bound<'_, PyAny>) -> PyResult<SpeedValue> {
    if let Ok(kmh) = value.extract::<f64>() {
        return Ok(SpeedValue::Kmh(kmh));
    }
    if let Ok(tag) = value.extract::<String>() {
        return Ok(SpeedValue::Tag(tag));
    }
    if let Ok(tags) = value.extract::<Vec<String>>() {
        return Ok(SpeedValue::Tags(tags));
    }
    Err(PyValueError::new_err(format!(
        "Unsupported maxspeed value: {value}"
    )))
}

/// Create a road graph from node and edge tuples
///
/// Parameters
/// ----------
/// nodes : list[tuple[int, float, float]]
///     ``(id, lat, lon)`` for every node
/// edges : list[tuple]
///     ``(from, to, length, maxspeed, highway)`` for every directed edge; the last
///     three may be ``None``. Two-way roads need one tuple per direction.
/// network_type : str, default="drive"
///     ``"drive"``, ``"walk"`` or ``"bike"``; selects the default speeds
/// max_snap_distance : float, default=500.0
///     Furthest a query point may be from its nearest node
/// metric : str, default="haversine"
///     ``"haversine"`` for lon/lat degrees or ``"euclidean"`` for projected data
///
/// Raises
/// ------
/// ValueError
///     On invalid coordinates, duplicate node ids or unknown option names
///
/// Notes
/// -----
/// Malformed edges are skipped and reported through the ``logging`` module.
#[cfg_attr(feature = "stubgen", pyo3_stub_gen::derive::gen_stub_pyfunction)]
#[pyfunction(name = "create_road_graph")]
#[pyo3(signature = (nodes, edges, network_type = "drive", max_snap_distance = 500.0, metric = "haversine"))]
#[allow(clippy::needless_pass_by_value)]
pub fn py_create_road_graph<'py>(
    py: Python<'py>,
    nodes: Vec<(NodeId, f64, f64)>,
    edges: Vec<EdgeTuple<'py>>,
    network_type: &str,
    max_snap_distance: f64,
    metric: &str,
) -> PyResult<PyRoadGraph> {
    let config = RoadGraphConfig {
        network_type: network_type.parse::<NetworkType>().map_err(to_py_err)?,
        metric: metric.parse::<DistanceMetric>().map_err(to_py_err)?,
        max_snap_distance,
        ..RoadGraphConfig::default()
    };

    let raw_edges = edges
        .iter()
        .map(|(from, to, length, maxspeed, highway)| {
            Ok(RawEdge {
                from: *from,
                to: *to,
                length: *length,
                maxspeed: maxspeed.as_ref().map(speed_value).transpose()?,
                highway: highway.clone(),
                name: None,
            })
        })
        .collect::<PyResult<Vec<_>>>()?;
    let raw_nodes = nodes
        .into_iter()
        .map(|(id, lat, lon)| RawNode::new(id, lat, lon));

    py.detach(|| {
        let graph = create_road_graph(raw_nodes, raw_edges, &config).map_err(to_py_err)?;
        Ok(PyRoadGraph { graph })
    })
}
