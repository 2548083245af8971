//! Interleaved vertex batches.
//!
//! Content is written into fixed vertex pages, one per attribute layout, and
//! split into [`DrawSegment`]s that carry the state changes to run around
//! their draws. The pages are concatenated into one [`InterleavedBuffer`].

pub mod array;
pub mod polysets;
pub mod vertex;

pub use array::{DrawRange, DrawSegment, InterleavedBuffer, VertexArray};
pub use polysets::PolysetBatch;
pub use vertex::{FlatVertex, LitVertex, PageId, PageVertex, VertexAttribute};
