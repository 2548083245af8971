use tracing::{debug, trace};

use crate::batch::{DrawSegment, FlatVertex, InterleavedBuffer, LitVertex, PageId, VertexArray};
use crate::color::{Color4f, ColorMode, ColorScheme};
use crate::config::RenderMode;
use crate::error::Result;
use crate::geometry::BoundaryPolyhedron;
use crate::gl::{BufferHandle, Capability, GraphicsBackend, Primitive, SavedState, StateAction};
use crate::math::polygon::{newell_normal, project_dominant};
use crate::math::{to_f32, vector_to_f32, Aabb, Point3};
use crate::tessellation::triangulate_loops;

/// Line width of polyhedron edges.
const EDGE_WIDTH: f32 = 5.0;
/// Point size of polyhedron vertices.
const POINT_SIZE: f32 = 10.0;

/// Which parts of a polyhedron are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrawStyle {
    /// Lit facets, plus edges and vertices when edges are requested.
    #[default]
    Boundary,
    /// Edges and vertices only.
    Skeleton,
}

impl DrawStyle {
    fn parts(self, show_edges: bool) -> &'static [Part] {
        match (self, show_edges) {
            (Self::Boundary, false) => &[Part::Facets],
            (Self::Boundary, true) => &[Part::Facets, Part::Edges, Part::Points],
            (Self::Skeleton, _) => &[Part::Edges, Part::Points],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Facets,
    Edges,
    Points,
}

impl Part {
    fn index(self) -> usize {
        match self {
            Self::Facets => 0,
            Self::Edges => 1,
            Self::Points => 2,
        }
    }

    fn pre_actions(self) -> Vec<StateAction> {
        match self {
            Self::Facets => vec![StateAction::Enable(Capability::Lighting)],
            Self::Edges => vec![
                StateAction::Disable(Capability::Lighting),
                StateAction::LineWidth(EDGE_WIDTH),
            ],
            Self::Points => vec![StateAction::PointSize(POINT_SIZE)],
        }
    }
}

#[derive(Debug, Clone)]
struct MeshFacet {
    color: Color4f,
    normal: [f32; 3],
    /// Triangle corners, three per triangle.
    corners: Vec<[f32; 3]>,
}

#[derive(Debug, Clone)]
struct MeshEdge {
    color: Color4f,
    ends: [[f32; 3]; 2],
}

#[derive(Debug, Clone)]
struct MeshPoint {
    color: Color4f,
    position: [f32; 3],
}

/// Triangulated and colored boundary, independent of the drawing strategy.
#[derive(Debug, Clone, Default)]
struct PolyhedronMesh {
    facets: Vec<MeshFacet>,
    edges: Vec<MeshEdge>,
    points: Vec<MeshPoint>,
}

impl PolyhedronMesh {
    fn build(poly: &BoundaryPolyhedron, scheme: &ColorScheme) -> Result<Self> {
        let store = poly.store();
        let pick = |marked: bool, on: ColorMode, off: ColorMode| {
            scheme.color_for(if marked { on } else { off })
        };

        let mut facets = Vec::with_capacity(store.facet_count());
        for (id, facet) in store.facets() {
            let cycles = store.facet_cycles(id)?;
            let Some(normal) = cycles.first().and_then(|outer| newell_normal(outer)) else {
                trace!(?id, "skipping degenerate facet");
                continue;
            };
            let loops: Vec<Vec<[f64; 2]>> = cycles.iter().map(|c| project_dominant(c, &normal)).collect();
            let points: Vec<Point3> = cycles.concat();
            let corners = triangulate_loops(&loops)?
                .into_iter()
                .flatten()
                .map(|i| to_f32(&points[i]))
                .collect();
            facets.push(MeshFacet {
                color: pick(facet.marked, ColorMode::MarkedFacet, ColorMode::UnmarkedFacet),
                normal: vector_to_f32(&normal),
                corners,
            });
        }

        let mut edges = Vec::with_capacity(store.edge_count());
        for (_, edge) in store.edges() {
            let start = store.vertex(edge.start)?;
            let end = store.vertex(edge.end)?;
            edges.push(MeshEdge {
                color: pick(edge.marked, ColorMode::MarkedEdge, ColorMode::UnmarkedEdge),
                ends: [to_f32(&start.point), to_f32(&end.point)],
            });
        }

        let points = store
            .vertices()
            .map(|(_, v)| MeshPoint {
                color: pick(v.marked, ColorMode::MarkedVertex, ColorMode::UnmarkedVertex),
                position: to_f32(&v.point),
            })
            .collect();

        Ok(Self {
            facets,
            edges,
            points,
        })
    }

    fn draw_immediate(&self, backend: &mut impl GraphicsBackend, part: Part) {
        match part {
            Part::Facets if !self.facets.is_empty() => {
                backend.begin(Primitive::Triangles);
                for facet in &self.facets {
                    backend.set_color(facet.color);
                    backend.normal(facet.normal);
                    for &corner in &facet.corners {
                        backend.vertex(corner);
                    }
                }
                backend.end();
            }
            Part::Edges if !self.edges.is_empty() => {
                backend.begin(Primitive::Lines);
                for edge in &self.edges {
                    backend.set_color(edge.color);
                    backend.vertex(edge.ends[0]);
                    backend.vertex(edge.ends[1]);
                }
                backend.end();
            }
            Part::Points if !self.points.is_empty() => {
                backend.begin(Primitive::Points);
                for point in &self.points {
                    backend.set_color(point.color);
                    backend.vertex(point.position);
                }
                backend.end();
            }
            _ => {}
        }
    }

    /// Packs the facets into the lit page and the edges and points into the
    /// flat page, one segment per part.
    fn pack(&self) -> (Vec<DrawSegment>, InterleavedBuffer) {
        let mut va = VertexArray::new();

        va.write_index(PageId::Lit);
        va.push_segment(Part::Facets.pre_actions(), Vec::new());
        let facet_vertices: Vec<LitVertex> = self
            .facets
            .iter()
            .flat_map(|f| {
                f.corners.iter().map(|&position| LitVertex {
                    position,
                    normal: f.normal,
                    color: f.color.to_array(),
                })
            })
            .collect();
        va.add_primitive(Primitive::Triangles, &facet_vertices);

        va.write_index(PageId::Flat);
        va.push_segment(Part::Edges.pre_actions(), Vec::new());
        let edge_vertices: Vec<FlatVertex> = self
            .edges
            .iter()
            .flat_map(|e| {
                e.ends.iter().map(|&position| FlatVertex {
                    position,
                    color: e.color.to_array(),
                })
            })
            .collect();
        va.add_primitive(Primitive::Lines, &edge_vertices);

        va.push_segment(Part::Points.pre_actions(), Vec::new());
        let point_vertices: Vec<FlatVertex> = self
            .points
            .iter()
            .map(|p| FlatVertex {
                position: p.position,
                color: p.color.to_array(),
            })
            .collect();
        va.add_primitive(Primitive::Points, &point_vertices);

        va.finish()
    }
}

#[derive(Debug)]
enum Strategy {
    Immediate(PolyhedronMesh),
    Buffered {
        segments: Vec<DrawSegment>,
        buffer: InterleavedBuffer,
        handle: Option<BufferHandle>,
    },
}

/// A boundary polyhedron converted for drawing under one render mode.
///
/// Colors are taken from the scheme at conversion time; a scheme change
/// requires a new conversion.
#[derive(Debug)]
pub struct DrawablePolyhedron {
    mode: RenderMode,
    style: DrawStyle,
    bounds: Aabb,
    strategy: Strategy,
}

impl DrawablePolyhedron {
    /// Converts `poly` with the colors of `scheme`.
    ///
    /// Legacy mode keeps the triangulated boundary for immediate drawing.
    /// Buffered mode packs it into an interleaved buffer that is uploaded on
    /// first draw.
    ///
    /// # Errors
    ///
    /// Returns an error if the boundary references missing entities or a
    /// facet cannot be triangulated.
    pub fn build(poly: &BoundaryPolyhedron, scheme: &ColorScheme, mode: RenderMode) -> Result<Self> {
        let mesh = PolyhedronMesh::build(poly, scheme)?;
        debug!(
            ?mode,
            facets = mesh.facets.len(),
            edges = mesh.edges.len(),
            vertices = mesh.points.len(),
            "converted polyhedron"
        );
        let strategy = match mode {
            RenderMode::Legacy => Strategy::Immediate(mesh),
            RenderMode::Buffered => {
                let (segments, buffer) = mesh.pack();
                Strategy::Buffered {
                    segments,
                    buffer,
                    handle: None,
                }
            }
        };
        Ok(Self {
            mode,
            style: DrawStyle::default(),
            bounds: poly.bounding_box(),
            strategy,
        })
    }

    /// The mode this drawable was built for.
    #[must_use]
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    #[must_use]
    pub fn style(&self) -> DrawStyle {
        self.style
    }

    pub fn set_style(&mut self, style: DrawStyle) {
        self.style = style;
    }

    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        self.bounds
    }

    /// The graphics buffer of a buffered drawable, once uploaded.
    #[must_use]
    pub fn buffer_handle(&self) -> Option<BufferHandle> {
        match &self.strategy {
            Strategy::Immediate(_) => None,
            Strategy::Buffered { handle, .. } => *handle,
        }
    }

    /// Uploads the vertex data of a buffered drawable. Does nothing if already
    /// uploaded or in legacy mode.
    pub fn init(&mut self, backend: &mut impl GraphicsBackend) {
        if let Strategy::Buffered { buffer, handle, .. } = &mut self.strategy {
            if handle.is_none() && !buffer.is_empty() {
                let h = backend.create_buffer();
                backend.upload_buffer(h, buffer.bytes());
                *handle = Some(h);
            }
        }
    }

    /// Draws the parts selected by the current style.
    ///
    /// Every part runs its state changes first: facets enable lighting, edges
    /// disable it and widen lines, vertices enlarge points.
    pub fn draw(&mut self, backend: &mut impl GraphicsBackend, show_edges: bool) {
        self.init(backend);
        let parts = self.style.parts(show_edges);
        trace!(style = ?self.style, show_edges, "draw polyhedron");
        match &self.strategy {
            Strategy::Immediate(mesh) => {
                for &part in parts {
                    for action in part.pre_actions() {
                        action.apply(backend);
                    }
                    mesh.draw_immediate(backend, part);
                }
            }
            Strategy::Buffered {
                segments,
                buffer,
                handle,
            } => {
                let saved = SavedState::capture(backend);
                backend.bind_buffer(*handle);
                for &part in parts {
                    segments[part.index()].draw(backend, buffer);
                }
                backend.bind_buffer(None);
                saved.restore_arrays(backend);
            }
        }
    }

    /// Deletes the graphics buffer of a buffered drawable.
    pub fn release(&mut self, backend: &mut impl GraphicsBackend) {
        if let Strategy::Buffered { handle, .. } = &mut self.strategy {
            if let Some(h) = handle.take() {
                backend.delete_buffer(h);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::gl::{GlCall, RecordingBackend};
    use crate::topology::{BoundaryStore, EdgeData, FacetData, VertexData};

    fn unit_cube() -> BoundaryPolyhedron {
        BoundaryPolyhedron::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
    }

    fn count(calls: &[GlCall], pred: impl Fn(&GlCall) -> bool) -> usize {
        calls.iter().filter(|c| pred(*c)).count()
    }

    #[test]
    fn legacy_boundary_draws_facets_only() {
        let cs = ColorScheme::cornfield();
        let mut d = DrawablePolyhedron::build(&unit_cube(), &cs, RenderMode::Legacy).unwrap();
        let mut gl = RecordingBackend::new();
        d.draw(&mut gl, false);
        let calls = gl.take_calls();
        assert_eq!(calls[0], GlCall::SetCapability(Capability::Lighting, true));
        assert_eq!(calls[1], GlCall::Begin(Primitive::Triangles));
        // 6 quads, 2 triangles each.
        assert_eq!(count(&calls, |c| matches!(c, GlCall::Vertex(_))), 36);
        assert_eq!(count(&calls, |c| matches!(c, GlCall::Normal(_))), 6);
        assert!(calls.contains(&GlCall::Color(cs.color_for(ColorMode::MarkedFacet))));
        assert!(!calls.contains(&GlCall::Begin(Primitive::Lines)));
    }

    #[test]
    fn legacy_boundary_with_edges() {
        let mut d = DrawablePolyhedron::build(&unit_cube(), &ColorScheme::cornfield(), RenderMode::Legacy).unwrap();
        let mut gl = RecordingBackend::new();
        d.draw(&mut gl, true);
        let calls = gl.take_calls();
        let lines = calls.iter().position(|c| *c == GlCall::Begin(Primitive::Lines)).unwrap();
        let points = calls.iter().position(|c| *c == GlCall::Begin(Primitive::Points)).unwrap();
        assert!(lines < points);
        assert_eq!(calls[lines - 2], GlCall::SetCapability(Capability::Lighting, false));
        assert_eq!(calls[lines - 1], GlCall::LineWidth(5.0));
        assert_eq!(calls[points - 1], GlCall::PointSize(10.0));
        assert_eq!(count(&calls, |c| matches!(c, GlCall::Vertex(_))), 36 + 24 + 8);
    }

    #[test]
    fn skeleton_skips_facets() {
        let mut d = DrawablePolyhedron::build(&unit_cube(), &ColorScheme::cornfield(), RenderMode::Legacy).unwrap();
        d.set_style(DrawStyle::Skeleton);
        let mut gl = RecordingBackend::new();
        d.draw(&mut gl, false);
        let calls = gl.take_calls();
        assert!(!calls.contains(&GlCall::Begin(Primitive::Triangles)));
        assert!(!calls.contains(&GlCall::SetCapability(Capability::Lighting, true)));
        assert_eq!(count(&calls, |c| matches!(c, GlCall::Vertex(_))), 24 + 8);
    }

    #[test]
    fn unmarked_entities_take_front_colors() {
        let mut store = BoundaryStore::new();
        let mut vertex = |x: f64, y: f64| {
            let mut data = VertexData::new(Point3::new(x, y, 0.0));
            data.marked = false;
            store.add_vertex(data)
        };
        let (a, b, c) = (vertex(0.0, 0.0), vertex(1.0, 0.0), vertex(0.0, 1.0));
        let mut edge = EdgeData::new(a, b);
        edge.marked = false;
        store.add_edge(edge);
        let mut facet = FacetData::new(vec![a, b, c]);
        facet.marked = false;
        store.add_facet(facet);
        let poly = BoundaryPolyhedron::new(crate::geometry::Dimension::Three, store);

        let cs = ColorScheme::cornfield();
        let mut d = DrawablePolyhedron::build(&poly, &cs, RenderMode::Legacy).unwrap();
        let mut gl = RecordingBackend::new();
        d.draw(&mut gl, true);
        let calls = gl.take_calls();
        assert!(calls.contains(&GlCall::Color(cs.color_for(ColorMode::UnmarkedFacet))));
        assert!(calls.contains(&GlCall::Color(cs.color_for(ColorMode::UnmarkedEdge))));
        assert!(calls.contains(&GlCall::Color(cs.color_for(ColorMode::UnmarkedVertex))));
        assert!(!calls.contains(&GlCall::Color(cs.color_for(ColorMode::MarkedFacet))));
    }

    #[test]
    fn facet_with_hole_is_triangulated_around_it() {
        let mut store = BoundaryStore::new();
        let mut ring = |pts: [(f64, f64); 4]| {
            pts.map(|(x, y)| store.add_vertex(VertexData::new(Point3::new(x, y, 0.0))))
                .to_vec()
        };
        let outer = ring([(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        let hole = ring([(1.0, 1.0), (1.0, 3.0), (3.0, 3.0), (3.0, 1.0)]);
        let mut facet = FacetData::new(outer);
        facet.holes.push(hole);
        store.add_facet(facet);
        let poly = BoundaryPolyhedron::new(crate::geometry::Dimension::Three, store);

        let d = DrawablePolyhedron::build(&poly, &ColorScheme::cornfield(), RenderMode::Legacy).unwrap();
        let Strategy::Immediate(mesh) = &d.strategy else {
            panic!("legacy drawable must be immediate");
        };
        // An annulus of 8 vertices triangulates into 8 triangles.
        assert_eq!(mesh.facets[0].corners.len(), 24);
        assert_eq!(mesh.facets[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn buffered_uploads_once_and_releases() {
        let mut d = DrawablePolyhedron::build(&unit_cube(), &ColorScheme::cornfield(), RenderMode::Buffered).unwrap();
        assert!(d.buffer_handle().is_none());
        let mut gl = RecordingBackend::new();
        d.draw(&mut gl, true);
        d.draw(&mut gl, true);
        let handle = d.buffer_handle().unwrap();
        let calls = gl.take_calls();
        assert_eq!(count(&calls, |c| matches!(c, GlCall::CreateBuffer(_))), 1);
        assert_eq!(
            gl.buffer_data(handle).unwrap().len(),
            36 * PageId::Lit.stride() + (24 + 8) * PageId::Flat.stride()
        );
        assert!(calls.contains(&GlCall::DrawArrays {
            primitive: Primitive::Triangles,
            first: 0,
            count: 36
        }));
        assert!(calls.contains(&GlCall::DrawArrays {
            primitive: Primitive::Points,
            first: 24,
            count: 8
        }));
        assert_eq!(gl.bound_buffer(), None);
        assert!(!gl.is_array_enabled(crate::gl::ClientArray::Normal));

        d.release(&mut gl);
        assert_eq!(gl.live_buffers(), 0);
        assert!(d.buffer_handle().is_none());
    }

    #[test]
    fn buffered_and_legacy_emit_same_state_changes() {
        let cs = ColorScheme::cornfield();
        let state = |mode| {
            let mut d = DrawablePolyhedron::build(&unit_cube(), &cs, mode).unwrap();
            let mut gl = RecordingBackend::new();
            d.draw(&mut gl, true);
            gl.take_calls()
                .into_iter()
                .filter(|c| matches!(c, GlCall::SetCapability(..) | GlCall::LineWidth(_) | GlCall::PointSize(_)))
                .collect::<Vec<_>>()
        };
        assert_eq!(state(RenderMode::Legacy), state(RenderMode::Buffered));
    }

    #[test]
    fn bounds_follow_polyhedron() {
        let d = DrawablePolyhedron::build(&unit_cube(), &ColorScheme::cornfield(), RenderMode::Legacy).unwrap();
        assert_eq!(d.bounding_box(), Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0)));
        assert_eq!(d.mode(), RenderMode::Legacy);
    }
}
