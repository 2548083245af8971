pub mod edge;
pub mod facet;
pub mod vertex;

pub use edge::{EdgeData, EdgeId};
pub use facet::{FacetData, FacetId};
pub use vertex::{VertexData, VertexId};

use crate::error::KernelError;
use crate::math::Point3;
use slotmap::SlotMap;

/// Arena that owns the vertices, edges and facets of one boundary structure.
///
/// Entities reference each other via typed IDs (generational indices).
/// Iteration follows insertion order as long as nothing is removed.
#[derive(Debug, Clone, Default)]
pub struct BoundaryStore {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    facets: SlotMap<FacetId, FacetData>,
}

impl BoundaryStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, data: VertexData) -> VertexId {
        self.vertices.insert(data)
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, KernelError> {
        self.vertices
            .get(id)
            .ok_or(KernelError::EntityNotFound("vertex"))
    }

    /// Inserts an edge and returns its ID.
    pub fn add_edge(&mut self, data: EdgeData) -> EdgeId {
        self.edges.insert(data)
    }

    /// Inserts a facet and returns its ID.
    pub fn add_facet(&mut self, data: FacetData) -> FacetId {
        self.facets.insert(data)
    }

    /// Returns a reference to the facet data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn facet(&self, id: FacetId) -> Result<&FacetData, KernelError> {
        self.facets
            .get(id)
            .ok_or(KernelError::EntityNotFound("facet"))
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexData)> {
        self.vertices.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeData)> {
        self.edges.iter()
    }

    pub fn facets(&self) -> impl Iterator<Item = (FacetId, &FacetData)> {
        self.facets.iter()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn facet_count(&self) -> usize {
        self.facets.len()
    }

    /// Resolves every cycle of a facet to its points, outer cycle first.
    ///
    /// # Errors
    ///
    /// Returns an error if the facet or one of its vertices is missing, or if a
    /// cycle has fewer than three vertices.
    pub fn facet_cycles(&self, id: FacetId) -> Result<Vec<Vec<Point3>>, KernelError> {
        let facet = self.facet(id)?;
        facet
            .cycles()
            .map(|cycle| {
                if cycle.len() < 3 {
                    return Err(KernelError::InvalidBoundary(format!(
                        "facet cycle with {} vertices",
                        cycle.len()
                    )));
                }
                cycle
                    .iter()
                    .map(|&v| self.vertex(v).map(|data| data.point))
                    .collect()
            })
            .collect()
    }
}
