use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for a facet in the boundary store.
    pub struct FacetId;
}

/// Data associated with a planar boundary facet.
///
/// A facet is bounded by one outer vertex cycle and optionally inner cycles
/// (holes). The outer cycle winds counter-clockwise around the outward normal.
#[derive(Debug, Clone)]
pub struct FacetData {
    /// The outer boundary cycle.
    pub outer: Vec<VertexId>,
    /// Inner boundary cycles (holes).
    pub holes: Vec<Vec<VertexId>>,
    /// Whether the facet belongs to the point set.
    pub marked: bool,
}

impl FacetData {
    /// Creates a marked facet without holes.
    #[must_use]
    pub fn new(outer: Vec<VertexId>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
            marked: true,
        }
    }

    /// All cycles, outer first.
    pub fn cycles(&self) -> impl Iterator<Item = &[VertexId]> {
        std::iter::once(self.outer.as_slice()).chain(self.holes.iter().map(Vec::as_slice))
    }
}
