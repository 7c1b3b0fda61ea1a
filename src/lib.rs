use pyo3::{
    exceptions::{PyRuntimeError, PyValueError},
    prelude::*,
};

use generate::{py_generate_bulk_isochrones, py_generate_frontier_paths, py_generate_isochrone};
use model::{PyRoadGraph, py_create_road_graph};
use paths::py_generate_shortest_paths;

pub mod generate;
pub mod model;
pub mod paths;

/// Validation failures become `ValueError`, everything else `RuntimeError`
pub(crate) fn to_py_err(err: isochrone_core::Error) -> PyErr {
    if err.is_validation() {
        PyValueError::new_err(err.to_string())
    } else {
        PyRuntimeError::new_err(err.to_string())
    }
}

/// A Python module implemented in Rust.
#[pymodule]
fn isochrone(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();

    m.add_class::<PyRoadGraph>()?;
    m.add_function(wrap_pyfunction!(py_create_road_graph, m)?)?;

    m.add_function(wrap_pyfunction!(py_generate_isochrone, m)?)?;
    m.add_function(wrap_pyfunction!(py_generate_bulk_isochrones, m)?)?;
    m.add_function(wrap_pyfunction!(py_generate_frontier_paths, m)?)?;
    m.add_function(wrap_pyfunction!(py_generate_shortest_paths, m)?)?;
    Ok(())
}

#[cfg(feature = "stubgen")]
pyo3_stub_gen::define_stub_info_gatherer!(stub_info);
