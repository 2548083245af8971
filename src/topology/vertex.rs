use crate::math::Point3;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in the boundary store.
    pub struct VertexId;
}

/// Data associated with a boundary vertex.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// The 3D position of the vertex.
    pub point: Point3,
    /// Whether the vertex belongs to the point set.
    pub marked: bool,
}

impl VertexData {
    /// Creates a marked vertex at the given point.
    #[must_use]
    pub fn new(point: Point3) -> Self {
        Self {
            point,
            marked: true,
        }
    }
}
