use super::{Point3, Vector3, TOLERANCE};

/// Computes the unit normal of a closed polygon with Newell's method.
///
/// Returns `None` for degenerate polygons (fewer than three points or zero area).
#[must_use]
pub fn newell_normal(points: &[Point3]) -> Option<Vector3> {
    if points.len() < 3 {
        return None;
    }
    let mut n = Vector3::zeros();
    for (i, a) in points.iter().enumerate() {
        let b = &points[(i + 1) % points.len()];
        n.x += (a.y - b.y) * (a.z + b.z);
        n.y += (a.z - b.z) * (a.x + b.x);
        n.z += (a.x - b.x) * (a.y + b.y);
    }
    let len = n.norm();
    if len < TOLERANCE {
        None
    } else {
        Some(n / len)
    }
}

/// Projects polygon points onto the coordinate plane that best matches `normal`.
///
/// The dominant axis of `normal` is dropped and the remaining two are ordered so
/// that a polygon wound counter-clockwise around `normal` stays counter-clockwise
/// in the projection.
#[must_use]
pub fn project_dominant(points: &[Point3], normal: &Vector3) -> Vec<[f64; 2]> {
    let ax = normal.x.abs();
    let ay = normal.y.abs();
    let az = normal.z.abs();
    let (u, v, sign) = if az >= ax && az >= ay {
        (0, 1, normal.z)
    } else if ax >= ay {
        (1, 2, normal.x)
    } else {
        (2, 0, normal.y)
    };
    points
        .iter()
        .map(|p| {
            if sign >= 0.0 {
                [p[u], p[v]]
            } else {
                [p[v], p[u]]
            }
        })
        .collect()
}

/// Returns `true` if the polygon is convex (collinear runs are allowed).
#[must_use]
pub fn is_convex(points: &[Point3]) -> bool {
    let Some(normal) = newell_normal(points) else {
        return false;
    };
    let flat = project_dominant(points, &normal);
    let n = flat.len();
    for i in 0..n {
        let a = flat[i];
        let b = flat[(i + 1) % n];
        let c = flat[(i + 2) % n];
        let (ab, bc) = ([b[0] - a[0], b[1] - a[1]], [c[0] - b[0], c[1] - b[1]]);
        let cross = ab[0] * bc[1] - ab[1] * bc[0];
        // Relative to the edge lengths, so the test does not depend on scale.
        if cross < -TOLERANCE * ab[0].hypot(ab[1]) * bc[0].hypot(bc[1]) {
            return false;
        }
    }
    true
}
