pub mod bounded_dijkstra;
mod state;
pub mod tree;

pub use bounded_dijkstra::{bounded_dijkstra, bounded_dijkstra_with_deadline};
pub use tree::ShortestPathTree;
