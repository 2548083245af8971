use std::collections::{HashMap, HashSet, VecDeque};

use spade::handles::{FixedFaceHandle, InnerTag};
use spade::{
    ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation,
};

use crate::error::{Result, TessellationError};

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Triangulates the region enclosed by `loops` under the even-odd rule.
///
/// Points are addressed by their position in the concatenation of all loops.
/// Output triangles are counter-clockwise. Coincident input points collapse
/// onto the first occurrence.
///
/// # Errors
///
/// Returns an error if a point cannot be inserted or if two loop sides cross.
pub fn triangulate_loops(loops: &[Vec<[f64; 2]>]) -> Result<Vec<[usize; 3]>> {
    let mut cdt = Cdt::new();
    let mut input_index: HashMap<usize, usize> = HashMap::new();
    let mut next = 0;

    for points in loops {
        if points.len() < 3 {
            next += points.len();
            continue;
        }
        insert_constraint_loop(&mut cdt, points, next, &mut input_index)?;
        next += points.len();
    }

    let interior = classify_interior_faces(&cdt);

    let mut triangles = Vec::with_capacity(interior.len());
    for face in cdt.inner_faces() {
        if !interior.contains(&face.fix().index()) {
            continue;
        }
        let mut tri = [0usize; 3];
        for (slot, v) in tri.iter_mut().zip(face.vertices()) {
            *slot = *input_index.get(&v.fix().index()).ok_or_else(|| {
                TessellationError::Failed("triangulation vertex without input point".into())
            })?;
        }
        triangles.push(tri);
    }
    Ok(triangles)
}

/// Inserts a closed loop as constraint edges, recording which input point each
/// triangulation vertex came from.
fn insert_constraint_loop(
    cdt: &mut Cdt,
    points: &[[f64; 2]],
    first_index: usize,
    input_index: &mut HashMap<usize, usize>,
) -> Result<()> {
    let mut handles = Vec::with_capacity(points.len());
    for (offset, p) in points.iter().enumerate() {
        let h = cdt
            .insert(SpadePoint2::new(p[0], p[1]))
            .map_err(|e: InsertionError| TessellationError::Failed(format!("CDT insert: {e}")))?;
        input_index.entry(h.index()).or_insert(first_index + offset);
        handles.push(h);
    }

    for (i, &from) in handles.iter().enumerate() {
        let to = handles[(i + 1) % handles.len()];
        if from == to {
            continue;
        }
        if !cdt.can_add_constraint(from, to) {
            return Err(TessellationError::Failed("boundary loops intersect".into()).into());
        }
        cdt.add_constraint(from, to);
    }

    Ok(())
}

/// Marks inner faces that lie inside the constrained loops.
///
/// Flood-fills from the convex hull at depth 0; crossing a constraint edge
/// increments the depth, and odd depth is interior.
fn classify_interior_faces(cdt: &Cdt) -> HashSet<usize> {
    let mut interior = HashSet::new();
    let mut depth_map: HashMap<usize, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<InnerTag>, u32)> = VecDeque::new();

    let outer_fix = cdt.outer_face().fix();

    for edge in cdt.directed_edges() {
        if edge.face().fix() != outer_fix {
            continue;
        }
        let Some(inner) = edge.rev().face().as_inner() else {
            continue;
        };
        let idx = inner.fix().index();
        if depth_map.contains_key(&idx) {
            continue;
        }
        let depth = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
        depth_map.insert(idx, depth);
        if depth % 2 == 1 {
            interior.insert(idx);
        }
        queue.push_back((inner.fix(), depth));
    }

    while let Some((face_fix, depth)) = queue.pop_front() {
        for edge in cdt.face(face_fix).adjacent_edges() {
            let Some(neighbor) = edge.rev().face().as_inner() else {
                continue;
            };
            let n_idx = neighbor.fix().index();
            if depth_map.contains_key(&n_idx) {
                continue;
            }
            let crossed = cdt.is_constraint_edge(edge.as_undirected().fix());
            let new_depth = depth + u32::from(crossed);
            depth_map.insert(n_idx, new_depth);
            if new_depth % 2 == 1 {
                interior.insert(n_idx);
            }
            queue.push_back((neighbor.fix(), new_depth));
        }
    }

    interior
}
