use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the boundary store.
    pub struct EdgeId;
}

/// A straight boundary edge between two vertices.
#[derive(Debug, Clone)]
pub struct EdgeData {
    pub start: VertexId,
    pub end: VertexId,
    /// Whether the edge belongs to the point set.
    pub marked: bool,
}

impl EdgeData {
    /// Creates a marked edge.
    #[must_use]
    pub fn new(start: VertexId, end: VertexId) -> Self {
        Self {
            start,
            end,
            marked: true,
        }
    }
}
