use crate::math::{Aabb, Point3};

/// Dimension tag of a polygon set or polyhedron.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Two,
    Three,
}

impl Dimension {
    /// The dimension as a number.
    #[must_use]
    pub fn get(self) -> u8 {
        match self {
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

/// One polygon of a [`PolySet`], as an ordered point loop.
///
/// 2D polygons keep their points at `z = 0`.
pub type Polygon = Vec<Point3>;

/// A flat collection of simple polygons.
#[derive(Debug, Clone)]
pub struct PolySet {
    dimension: Dimension,
    /// Ray-crossing hint carried through from the modelling layer.
    convexity: u32,
    /// Whether every polygon is known to be convex. `None` means unknown.
    convex: Option<bool>,
    polygons: Vec<Polygon>,
    /// Boundary loops of the 2D region this set was tessellated from.
    outlines: Vec<Polygon>,
}

impl PolySet {
    /// Creates an empty polygon set with convexity 1.
    #[must_use]
    pub fn new(dimension: Dimension, convex: Option<bool>) -> Self {
        Self {
            dimension,
            convexity: 1,
            convex,
            polygons: Vec::new(),
            outlines: Vec::new(),
        }
    }

    #[must_use]
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    #[must_use]
    pub fn convexity(&self) -> u32 {
        self.convexity
    }

    /// Sets the ray-crossing hint. Values below 1 are clamped to 1.
    pub fn set_convexity(&mut self, convexity: u32) {
        self.convexity = convexity.max(1);
    }

    /// Returns `Some(true)` if every polygon is known to be convex.
    #[must_use]
    pub fn convex(&self) -> Option<bool> {
        self.convex
    }

    /// Appends a polygon.
    pub fn append_polygon(&mut self, polygon: Polygon) {
        self.polygons.push(polygon);
    }

    /// Returns the set with `polygon` appended.
    #[must_use]
    pub fn with_polygon(mut self, polygon: Polygon) -> Self {
        self.append_polygon(polygon);
        self
    }

    #[must_use]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Boundary loops drawn as the edges of a 2D set. Empty for 3D sets.
    #[must_use]
    pub fn outlines(&self) -> &[Polygon] {
        &self.outlines
    }

    pub fn set_outlines(&mut self, outlines: Vec<Polygon>) {
        self.outlines = outlines;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Bounds of all polygon and outline points.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(self.polygons.iter().chain(&self.outlines).flatten())
    }
}
