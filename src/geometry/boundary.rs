use std::collections::{HashMap, HashSet};

use crate::math::{Aabb, Point3};
use crate::topology::{BoundaryStore, EdgeData, FacetData, VertexData, VertexId};

use super::{Dimension, PolySet};

/// A solid described by its boundary: planar facets, straight edges and vertices.
#[derive(Debug, Clone)]
pub struct BoundaryPolyhedron {
    dimension: Dimension,
    store: BoundaryStore,
}

impl BoundaryPolyhedron {
    /// Wraps a boundary store.
    #[must_use]
    pub fn new(dimension: Dimension, store: BoundaryStore) -> Self {
        Self { dimension, store }
    }

    /// The empty solid.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Dimension::Three, BoundaryStore::new())
    }

    /// Builds the boundary of an axis-aligned box from two corners.
    #[must_use]
    pub fn cuboid(min: Point3, max: Point3) -> Self {
        let corner = |x: bool, y: bool, z: bool| {
            Point3::new(
                if x { max.x } else { min.x },
                if y { max.y } else { min.y },
                if z { max.z } else { min.z },
            )
        };
        let (f, t) = (false, true);
        let loops = [
            [corner(f, f, f), corner(f, t, f), corner(t, t, f), corner(t, f, f)],
            [corner(f, f, t), corner(t, f, t), corner(t, t, t), corner(f, t, t)],
            [corner(f, f, f), corner(t, f, f), corner(t, f, t), corner(f, f, t)],
            [corner(f, t, f), corner(f, t, t), corner(t, t, t), corner(t, t, f)],
            [corner(f, f, f), corner(f, f, t), corner(f, t, t), corner(f, t, f)],
            [corner(t, f, f), corner(t, t, f), corner(t, t, t), corner(t, f, t)],
        ];
        Self::from_loops(loops.iter().map(|l| l.as_slice()))
    }

    /// Builds a boundary whose facets are the polygons of a 3D polygon set.
    ///
    /// Vertices with identical coordinates are shared, and every polygon side
    /// becomes one edge.
    #[must_use]
    pub fn from_polyset(ps: &PolySet) -> Self {
        Self::from_loops(ps.polygons().iter().map(Vec::as_slice))
    }

    fn from_loops<'a>(loops: impl IntoIterator<Item = &'a [Point3]>) -> Self {
        let mut store = BoundaryStore::new();
        let mut vertex_ids: HashMap<[u64; 3], VertexId> = HashMap::new();
        let mut edge_keys: HashSet<(VertexId, VertexId)> = HashSet::new();

        for points in loops {
            let cycle: Vec<VertexId> = points
                .iter()
                .map(|p| {
                    let key = [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()];
                    *vertex_ids
                        .entry(key)
                        .or_insert_with(|| store.add_vertex(VertexData::new(*p)))
                })
                .collect();
            for (i, &a) in cycle.iter().enumerate() {
                let b = cycle[(i + 1) % cycle.len()];
                if a == b || edge_keys.contains(&(b, a)) || !edge_keys.insert((a, b)) {
                    continue;
                }
                store.add_edge(EdgeData::new(a, b));
            }
            store.add_facet(FacetData::new(cycle));
        }

        Self::new(Dimension::Three, store)
    }

    #[must_use]
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Returns `true` if the boundary has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.vertex_count() == 0
    }

    /// The boundary structure.
    #[must_use]
    pub fn store(&self) -> &BoundaryStore {
        &self.store
    }

    /// Bounds of all boundary vertices.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(self.store.vertices().map(|(_, v)| &v.point))
    }
}
