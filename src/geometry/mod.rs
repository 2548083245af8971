pub mod boundary;
pub mod polygon2d;
pub mod polyset;

use std::sync::Arc;

pub use boundary::BoundaryPolyhedron;
pub use polygon2d::{Outline2d, Polygon2d};
pub use polyset::{Dimension, PolySet, Polygon};

/// Shared, immutable handle to a geometry value produced by the kernel.
pub type GeometryHandle = Arc<Geometry>;

/// A geometry value handed to the renderer.
///
/// The renderer dispatches on the variant: polygon sets are tessellated and kept,
/// boundary polyhedra are kept for deferred conversion, lists are walked.
#[derive(Debug, Clone)]
pub enum Geometry {
    /// An ordered list of child geometries.
    Composite(GeometryList),
    /// A 3D polygon set whose faces may be concave.
    FaceSet3D(PolySet),
    /// A 2D region bounded by outlines.
    FaceSet2D(Polygon2d),
    /// A solid described by its boundary.
    Boundary(Arc<BoundaryPolyhedron>),
    /// A geometry kind the renderer has no drawing for.
    Unsupported(String),
}

impl Geometry {
    /// Short name of the variant, for logging.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Composite(_) => "composite",
            Self::FaceSet3D(_) => "face-set-3d",
            Self::FaceSet2D(_) => "face-set-2d",
            Self::Boundary(_) => "boundary-polyhedron",
            Self::Unsupported(kind) => kind,
        }
    }

    /// Wraps the value in a shared handle.
    #[must_use]
    pub fn into_handle(self) -> GeometryHandle {
        Arc::new(self)
    }
}

/// Ordered children of a composite geometry, each tagged with the key of the
/// node that produced it.
#[derive(Debug, Clone, Default)]
pub struct GeometryList {
    children: Vec<(String, GeometryHandle)>,
}

impl GeometryList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a child.
    pub fn push(&mut self, key: impl Into<String>, child: GeometryHandle) {
        self.children.push((key.into(), child));
    }

    /// Returns the list with `child` appended.
    #[must_use]
    pub fn with_child(mut self, key: impl Into<String>, child: GeometryHandle) -> Self {
        self.push(key, child);
        self
    }

    /// The children in insertion order.
    #[must_use]
    pub fn children(&self) -> &[(String, GeometryHandle)] {
        &self.children
    }
}
