use crate::error::Result;
use crate::math::{Aabb, Point2, Point3};
use crate::tessellation::{tessellate_outlines, TessellationParams};

use super::PolySet;

/// A closed 2D boundary loop.
#[derive(Debug, Clone)]
pub struct Outline2d {
    /// Loop vertices, without repeating the first one.
    pub vertices: Vec<Point2>,
    /// `true` for material outlines, `false` for holes.
    pub positive: bool,
}

impl Outline2d {
    /// Creates a material outline.
    #[must_use]
    pub fn new(vertices: Vec<Point2>) -> Self {
        Self {
            vertices,
            positive: true,
        }
    }

    /// Creates a hole outline.
    #[must_use]
    pub fn hole(vertices: Vec<Point2>) -> Self {
        Self {
            vertices,
            positive: false,
        }
    }
}

/// A 2D region described by non-intersecting outlines.
///
/// Outlines nest: a point is inside the region when an odd number of outlines
/// encloses it.
#[derive(Debug, Clone)]
pub struct Polygon2d {
    outlines: Vec<Outline2d>,
    convexity: u32,
}

impl Default for Polygon2d {
    fn default() -> Self {
        Self::new()
    }
}

impl Polygon2d {
    /// Creates a region with no outlines and convexity 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            outlines: Vec::new(),
            convexity: 1,
        }
    }

    pub fn add_outline(&mut self, outline: Outline2d) {
        self.outlines.push(outline);
    }

    /// Returns the region with `outline` added.
    #[must_use]
    pub fn with_outline(mut self, outline: Outline2d) -> Self {
        self.add_outline(outline);
        self
    }

    #[must_use]
    pub fn outlines(&self) -> &[Outline2d] {
        &self.outlines
    }

    #[must_use]
    pub fn convexity(&self) -> u32 {
        self.convexity
    }

    pub fn set_convexity(&mut self, convexity: u32) {
        self.convexity = convexity.max(1);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outlines.is_empty()
    }

    /// Bounds of all outline vertices, embedded at `z = 0`.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        let mut bbox = Aabb::empty();
        for v in self.outlines.iter().flat_map(|o| &o.vertices) {
            bbox.extend_point(&Point3::new(v.x, v.y, 0.0));
        }
        bbox
    }

    /// Triangulates the region into a 2D [`PolySet`] that keeps the outlines.
    ///
    /// # Errors
    ///
    /// Returns an error if the outlines intersect each other.
    pub fn tessellate(&self, params: &TessellationParams) -> Result<PolySet> {
        tessellate_outlines(self, params)
    }
}
