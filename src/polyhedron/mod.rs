//! Boundary polyhedra converted for drawing.

pub mod cache;
pub mod drawable;

pub use cache::PolyhedronCache;
pub use drawable::{DrawStyle, DrawablePolyhedron};
