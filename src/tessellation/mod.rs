mod cdt;

pub use cdt::triangulate_loops;

use crate::error::Result;
use crate::geometry::{Dimension, PolySet, Polygon, Polygon2d};
use crate::math::polygon::{is_convex, newell_normal, project_dominant};
use crate::math::Point3;

/// Parameters controlling tessellation output.
#[derive(Debug, Clone, Copy)]
pub struct TessellationParams {
    /// Triangles with a smaller area are dropped.
    pub tolerance: f64,
}

impl Default for TessellationParams {
    fn default() -> Self {
        Self { tolerance: 1e-12 }
    }
}

/// Splits one polygon into triangles, returned as index triples into `points`.
///
/// Polygons flagged or found convex are fanned from their first vertex; all
/// others go through a constrained Delaunay triangulation in their dominant
/// plane, which preserves the polygon's winding. Degenerate polygons yield no
/// triangles.
///
/// # Errors
///
/// Returns an error if the polygon boundary intersects itself.
pub fn triangulate_polygon(points: &[Point3], convex: bool) -> Result<Vec<[usize; 3]>> {
    match points.len() {
        0..=2 => Ok(Vec::new()),
        3 => Ok(vec![[0, 1, 2]]),
        n if convex || is_convex(points) => Ok((1..n - 1).map(|i| [0, i, i + 1]).collect()),
        _ => {
            let Some(normal) = newell_normal(points) else {
                return Ok(Vec::new());
            };
            triangulate_loops(&[project_dominant(points, &normal)])
        }
    }
}

/// Triangulates every face of a polygon set, keeping its dimension and convexity.
///
/// # Errors
///
/// Returns an error if a face boundary intersects itself.
pub fn tessellate_faces(ps: &PolySet, params: &TessellationParams) -> Result<PolySet> {
    let convex = ps.convex() == Some(true);
    let mut out = PolySet::new(ps.dimension(), Some(true));
    out.set_convexity(ps.convexity());

    for polygon in ps.polygons() {
        for [a, b, c] in triangulate_polygon(polygon, convex)? {
            push_triangle(&mut out, [polygon[a], polygon[b], polygon[c]], params);
        }
    }
    out.set_outlines(ps.outlines().to_vec());
    Ok(out)
}

/// Triangulates a 2D region into a 2D polygon set embedded at `z = 0`.
///
/// The outlines are carried over so they can be drawn as edges.
///
/// # Errors
///
/// Returns an error if two outlines cross.
pub fn tessellate_outlines(poly: &Polygon2d, params: &TessellationParams) -> Result<PolySet> {
    let loops: Vec<Vec<[f64; 2]>> = poly
        .outlines()
        .iter()
        .map(|o| o.vertices.iter().map(|v| [v.x, v.y]).collect())
        .collect();
    let flat: Vec<Point3> = loops
        .iter()
        .flatten()
        .map(|p| Point3::new(p[0], p[1], 0.0))
        .collect();

    let mut out = PolySet::new(Dimension::Two, Some(true));
    out.set_convexity(poly.convexity());
    for [a, b, c] in triangulate_loops(&loops)? {
        push_triangle(&mut out, [flat[a], flat[b], flat[c]], params);
    }

    let outlines: Vec<Polygon> = poly
        .outlines()
        .iter()
        .map(|o| o.vertices.iter().map(|v| Point3::new(v.x, v.y, 0.0)).collect())
        .collect();
    out.set_outlines(outlines);
    Ok(out)
}

fn push_triangle(out: &mut PolySet, tri: [Point3; 3], params: &TessellationParams) {
    let area = 0.5 * (tri[1] - tri[0]).cross(&(tri[2] - tri[0])).norm();
    if area >= params.tolerance {
        out.append_polygon(tri.to_vec());
    }
}
