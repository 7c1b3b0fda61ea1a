//! Time-bounded shortest-path search and path reconstruction

pub mod dijkstra;
pub mod paths;

pub use dijkstra::{ShortestPathTree, bounded_dijkstra, bounded_dijkstra_with_deadline};
pub use paths::{ShortestPath, extract_path, extract_paths};
