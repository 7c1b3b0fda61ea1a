//! Isochrone construction on top of the routing primitives

pub mod cache;
pub mod hull;
pub mod isochrone;
pub mod network;
