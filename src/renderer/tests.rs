use super::*;
use crate::batch::{FlatVertex, PageId};
use crate::color::ColorMode;
use crate::error::TessellationError;
use crate::geometry::{GeometryList, Outline2d, Polygon2d};
use crate::gl::{BufferHandle, Capability, ClientArray, GlCall, Primitive, RecordingBackend, SavedState};
use crate::math::{Point2, Point3};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn renderer(mode: RenderMode) -> BrepRenderer<RecordingBackend> {
    init_tracing();
    BrepRenderer::new(
        RecordingBackend::new(),
        RendererConfig::default().with_render_mode(mode),
    )
}

fn square(x: f64, y: f64) -> Outline2d {
    Outline2d::new(vec![
        Point2::new(x, y),
        Point2::new(x + 1.0, y),
        Point2::new(x + 1.0, y + 1.0),
        Point2::new(x, y + 1.0),
    ])
}

fn square_2d() -> GeometryHandle {
    Geometry::FaceSet2D(Polygon2d::new().with_outline(square(0.0, 0.0))).into_handle()
}

fn cuboid(x: f64) -> Arc<BoundaryPolyhedron> {
    Arc::new(BoundaryPolyhedron::cuboid(
        Point3::new(x, 0.0, 0.0),
        Point3::new(x + 1.0, 1.0, 1.0),
    ))
}

fn boundary(poly: &Arc<BoundaryPolyhedron>) -> GeometryHandle {
    Geometry::Boundary(Arc::clone(poly)).into_handle()
}

fn tetra_set() -> PolySet {
    let a = Point3::new(0.0, 0.0, 0.0);
    let b = Point3::new(2.0, 0.0, 0.0);
    let c = Point3::new(0.0, 3.0, 0.0);
    let d = Point3::new(0.0, 0.0, 4.0);
    PolySet::new(Dimension::Three, Some(true))
        .with_polygon(vec![a, c, b])
        .with_polygon(vec![a, b, d])
        .with_polygon(vec![a, d, c])
        .with_polygon(vec![b, c, d])
}

fn without_vertices(calls: &[GlCall]) -> Vec<GlCall> {
    calls
        .iter()
        .filter(|c| !matches!(c, GlCall::Vertex(_)))
        .cloned()
        .collect()
}

#[test]
fn composite_flattens_depth_first() {
    let first = cuboid(0.0);
    let second = cuboid(5.0);
    let inner = GeometryList::new()
        .with_child("first", boundary(&first))
        .with_child("tetra", Geometry::FaceSet3D(tetra_set()).into_handle());
    let root = GeometryList::new()
        .with_child("square", square_2d())
        .with_child(
            "nested",
            Geometry::Composite(GeometryList::new().with_child("inner", Geometry::Composite(inner).into_handle()))
                .into_handle(),
        )
        .with_child("second", boundary(&second))
        .with_child("text", Geometry::Unsupported("text".into()).into_handle());

    let mut r = renderer(RenderMode::Legacy);
    r.add_geometry(&Geometry::Composite(root).into_handle()).unwrap();

    let dims: Vec<Dimension> = r.polysets().iter().map(PolySet::dimension).collect();
    assert_eq!(dims, vec![Dimension::Two, Dimension::Three]);
    assert_eq!(r.polyhedra().len(), 2);
    assert!(Arc::ptr_eq(&r.polyhedra()[0], &first));
    assert!(Arc::ptr_eq(&r.polyhedra()[1], &second));
}

#[test]
fn empty_polyhedra_are_not_retained() {
    let mut r = renderer(RenderMode::Legacy);
    let empty = Arc::new(BoundaryPolyhedron::empty());
    r.add_geometry(&boundary(&empty)).unwrap();
    assert!(r.polyhedra().is_empty());
    assert!(r.drawables().unwrap().is_empty());
    assert_eq!(r.cache().builds(), 0);
}

#[test]
fn unsupported_geometry_is_skipped() {
    let mut r = renderer(RenderMode::Legacy);
    r.add_geometry(&Geometry::Unsupported("text".into()).into_handle())
        .unwrap();
    assert!(r.polysets().is_empty());
    assert!(r.polyhedra().is_empty());
}

#[test]
#[should_panic(expected = "three-dimensional")]
fn two_dimensional_face_set_3d_panics() {
    let mut r = renderer(RenderMode::Legacy);
    let flat = PolySet::new(Dimension::Two, Some(true));
    let _ = r.add_geometry(&Geometry::FaceSet3D(flat).into_handle());
}

#[test]
fn crossing_outlines_fail_to_tessellate() {
    let mut r = renderer(RenderMode::Legacy);
    let crossing = Polygon2d::new()
        .with_outline(square(0.0, 0.0))
        .with_outline(square(0.5, 0.5));
    let err = r
        .add_geometry(&Geometry::FaceSet2D(crossing).into_handle())
        .unwrap_err();
    assert!(matches!(err, RenderError::Tessellation(TessellationError::Failed(_))));
    assert!(r.polysets().is_empty());
}

#[test]
fn failing_child_keeps_earlier_siblings() {
    let crossing = Polygon2d::new()
        .with_outline(square(0.0, 0.0))
        .with_outline(square(0.5, 0.5));
    let list = GeometryList::new()
        .with_child("square", square_2d())
        .with_child("crossing", Geometry::FaceSet2D(crossing).into_handle())
        .with_child("cube", boundary(&cuboid(0.0)));

    let mut r = renderer(RenderMode::Legacy);
    assert!(r.add_geometry(&Geometry::Composite(list).into_handle()).is_err());
    assert_eq!(r.polysets().len(), 1);
    assert!(r.polyhedra().is_empty());
}

#[test]
fn drawables_are_cached() {
    let mut r = renderer(RenderMode::Legacy);
    r.add_geometry(&boundary(&cuboid(0.0))).unwrap();
    assert_eq!(r.drawables().unwrap().len(), 1);
    assert_eq!(r.drawables().unwrap().len(), 1);
    assert_eq!(r.cache().builds(), 1);
}

#[test]
fn mode_toggle_rebuilds_once() {
    let mut r = renderer(RenderMode::Legacy);
    r.add_geometry(&boundary(&cuboid(0.0))).unwrap();
    r.add_geometry(&boundary(&cuboid(3.0))).unwrap();
    r.drawables().unwrap();

    r.set_render_mode(RenderMode::Buffered);
    let drawables = r.drawables().unwrap();
    assert_eq!(drawables.len(), 2);
    assert!(drawables.iter().all(|d| d.mode() == RenderMode::Buffered));
    r.drawables().unwrap();
    assert_eq!(r.cache().builds(), 2);
}

#[test]
fn color_scheme_change_always_empties_cache() {
    let mut r = renderer(RenderMode::Legacy);
    r.add_geometry(&boundary(&cuboid(0.0))).unwrap();
    r.drawables().unwrap();
    assert!(!r.cache().is_empty());

    r.set_color_scheme(ColorScheme::cornfield());
    assert!(r.cache().is_empty());
    r.drawables().unwrap();
    assert_eq!(r.cache().builds(), 2);
}

#[test]
fn color_scheme_change_recolors_2d_edges() {
    let mut r = renderer(RenderMode::Legacy);
    r.add_geometry(&square_2d()).unwrap();
    let metallic = ColorScheme::metallic();
    let edge = metallic.color_for(ColorMode::Edge2d);
    let face = metallic.color_for(ColorMode::Face2d);
    r.set_color_scheme(metallic);
    r.draw(true, false).unwrap();
    let calls = r.backend_mut().take_calls();
    assert!(calls.contains(&GlCall::Color(face)));
    assert!(calls.contains(&GlCall::Color(edge)));
}

#[test]
fn segments_of_2d_set_with_two_outlines() {
    let mut r = renderer(RenderMode::Buffered);
    let region = Polygon2d::new()
        .with_outline(square(0.0, 0.0))
        .with_outline(square(3.0, 0.0));
    r.add_geometry(&Geometry::FaceSet2D(region).into_handle())
        .unwrap();
    r.draw(true, false).unwrap();

    let triangulated: usize = r.polysets()[0].polygons().iter().map(Vec::len).sum();
    let segments = r.segments().unwrap();
    assert_eq!(segments.len(), 4);
    assert_eq!(segments[1].vertex_count(), triangulated);
    assert_eq!(triangulated, 12);
    assert_eq!(segments[2].vertex_count(), 8);
    assert_eq!(segments[2].draws.len(), 2);
}

#[test]
fn bounding_box_of_empty_renderer_is_empty() {
    let mut r = renderer(RenderMode::Legacy);
    assert!(r.bounding_box().unwrap().is_empty());
}

#[test]
fn bounding_box_of_one_3d_set() {
    let mut r = renderer(RenderMode::Legacy);
    r.add_geometry(&Geometry::FaceSet3D(tetra_set()).into_handle())
        .unwrap();
    let bbox = r.bounding_box().unwrap();
    assert_eq!(bbox, tetra_set().bounding_box());
    assert_eq!(bbox.max, Point3::new(2.0, 3.0, 4.0));
}

#[test]
fn bounding_box_includes_polyhedra() {
    let mut r = renderer(RenderMode::Legacy);
    r.add_geometry(&square_2d()).unwrap();
    r.add_geometry(&boundary(&cuboid(4.0))).unwrap();
    let bbox = r.bounding_box().unwrap();
    assert_eq!(bbox.min, Point3::new(0.0, 0.0, 0.0));
    assert_eq!(bbox.max, Point3::new(5.0, 1.0, 1.0));
    assert_eq!(r.cache().builds(), 1);
}

#[test]
fn legacy_square_draw_sequence() {
    let mut r = renderer(RenderMode::Legacy);
    r.add_geometry(&square_2d()).unwrap();
    r.draw(true, true).unwrap();

    let cs = ColorScheme::cornfield();
    let calls = r.backend_mut().take_calls();
    assert_eq!(
        without_vertices(&calls),
        vec![
            GlCall::SetCapability(Capability::Lighting, false),
            GlCall::Color(cs.color_for(ColorMode::Face2d)),
            GlCall::Begin(Primitive::Polygon),
            GlCall::End,
            GlCall::Begin(Primitive::Polygon),
            GlCall::End,
            GlCall::SetCapability(Capability::DepthTest, false),
            GlCall::LineWidth(2.0),
            GlCall::Color(cs.color_for(ColorMode::Edge2d)),
            GlCall::Begin(Primitive::LineLoop),
            GlCall::End,
            GlCall::SetCapability(Capability::DepthTest, true),
        ]
    );

    let vertices: Vec<[f32; 3]> = calls
        .iter()
        .filter_map(|c| match c {
            GlCall::Vertex(v) => Some(*v),
            _ => None,
        })
        .collect();
    assert_eq!(vertices.len(), 10);
    assert_eq!(
        vertices[6..],
        [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]
    );
}

#[test]
fn buffered_square_draw_sequence() {
    let mut r = renderer(RenderMode::Buffered);
    r.add_geometry(&square_2d()).unwrap();
    r.draw(true, true).unwrap();

    let calls = r.backend_mut().take_calls();
    let bind = calls
        .iter()
        .position(|c| matches!(c, GlCall::BindBuffer(Some(_))))
        .unwrap();
    let unbind = calls
        .iter()
        .position(|c| *c == GlCall::BindBuffer(None))
        .unwrap();
    let state: Vec<GlCall> = calls[bind..unbind]
        .iter()
        .filter(|c| {
            matches!(
                c,
                GlCall::SetCapability(..) | GlCall::LineWidth(_) | GlCall::DrawArrays { .. }
            )
        })
        .cloned()
        .collect();
    assert_eq!(
        state,
        vec![
            GlCall::SetCapability(Capability::Lighting, false),
            GlCall::DrawArrays {
                primitive: Primitive::Triangles,
                first: 0,
                count: 6
            },
            GlCall::SetCapability(Capability::DepthTest, false),
            GlCall::LineWidth(2.0),
            GlCall::DrawArrays {
                primitive: Primitive::LineLoop,
                first: 6,
                count: 4
            },
            GlCall::SetCapability(Capability::DepthTest, true),
        ]
    );

    let cs = ColorScheme::cornfield();
    let data = r.backend().buffer_data(BufferHandle(1)).unwrap();
    let stride = PageId::Flat.stride();
    let vertex = |i: usize| -> FlatVertex { bytemuck::pod_read_unaligned(&data[i * stride..(i + 1) * stride]) };
    assert_eq!(vertex(0).color, cs.color_for(ColorMode::Face2d).to_array());
    assert_eq!(vertex(6).color, cs.color_for(ColorMode::Edge2d).to_array());
    assert_eq!(vertex(6).position, [0.0, 0.0, 0.0]);
    assert_eq!(vertex(8).position, [1.0, 1.0, 0.0]);
}

#[test]
fn buffered_draw_restores_state() {
    let mut r = renderer(RenderMode::Buffered);
    r.add_geometry(&square_2d()).unwrap();
    r.add_geometry(&Geometry::FaceSet3D(tetra_set()).into_handle())
        .unwrap();
    r.backend_mut().set_line_width(1.5);
    let before = SavedState::capture(r.backend());

    r.draw(true, false).unwrap();
    assert_eq!(SavedState::capture(r.backend()), before);
    assert_eq!(r.backend().bound_buffer(), None);
    assert_eq!(r.segments().unwrap().len(), 5);
}

#[test]
fn buffered_draw_restores_enabled_arrays() {
    let mut r = renderer(RenderMode::Buffered);
    r.add_geometry(&square_2d()).unwrap();
    r.backend_mut().set_array_enabled(ClientArray::Position, true);
    r.backend_mut().set_array_enabled(ClientArray::Normal, true);
    let before = SavedState::capture(r.backend());
    r.draw(true, false).unwrap();
    assert_eq!(SavedState::capture(r.backend()), before);

    r.add_geometry(&boundary(&cuboid(2.0))).unwrap();
    r.draw(true, true).unwrap();
    let after = SavedState::capture(r.backend());
    assert!(after.position_array);
    assert!(after.normal_array);
    assert!(!after.color_array);
}

#[test]
fn buffered_batch_is_built_once() {
    let mut r = renderer(RenderMode::Buffered);
    r.add_geometry(&square_2d()).unwrap();
    r.draw(true, true).unwrap();
    r.draw(true, true).unwrap();
    let creates = r
        .backend()
        .calls()
        .iter()
        .filter(|c| matches!(c, GlCall::CreateBuffer(_)))
        .count();
    assert_eq!(creates, 1);
}

#[test]
fn empty_buffered_draw_issues_nothing() {
    let mut r = renderer(RenderMode::Buffered);
    r.draw(true, true).unwrap();
    assert!(r.backend().calls().is_empty());
    assert_eq!(r.segments().map(<[_]>::len), Some(0));
}

#[test]
fn polyhedron_edges_toggle_without_rebuild() {
    let mut r = renderer(RenderMode::Legacy);
    r.add_geometry(&boundary(&cuboid(0.0))).unwrap();

    r.draw(true, false).unwrap();
    let faces_only = r.backend_mut().take_calls();
    assert!(faces_only.contains(&GlCall::Begin(Primitive::Triangles)));
    assert!(!faces_only.contains(&GlCall::Begin(Primitive::Lines)));

    r.draw(true, true).unwrap();
    let with_edges = r.backend_mut().take_calls();
    assert!(with_edges.contains(&GlCall::Begin(Primitive::Triangles)));
    assert!(with_edges.contains(&GlCall::Begin(Primitive::Lines)));
    assert!(with_edges.contains(&GlCall::Begin(Primitive::Points)));

    assert_eq!(r.cache().builds(), 1);
    assert_eq!(r.last_render_mode(), Some(RenderMode::Legacy));
}

#[test]
fn hidden_faces_draw_skeleton() {
    let mut r = renderer(RenderMode::Legacy);
    r.add_geometry(&boundary(&cuboid(0.0))).unwrap();
    r.draw(false, true).unwrap();
    let calls = r.backend_mut().take_calls();
    assert!(!calls.contains(&GlCall::Begin(Primitive::Triangles)));
    assert!(calls.contains(&GlCall::Begin(Primitive::Lines)));
    assert_eq!(r.drawables().unwrap()[0].style(), DrawStyle::Skeleton);
}

#[test]
fn mode_flip_between_draws_rebuilds_polyhedra() {
    let mut r = renderer(RenderMode::Legacy);
    r.add_geometry(&boundary(&cuboid(0.0))).unwrap();
    r.draw(true, true).unwrap();
    r.set_render_mode(RenderMode::Buffered);
    r.draw(true, true).unwrap();
    assert_eq!(r.cache().builds(), 2);
    assert_eq!(r.last_render_mode(), Some(RenderMode::Buffered));
    assert!(r
        .backend()
        .calls()
        .iter()
        .any(|c| matches!(c, GlCall::DrawArrays { primitive: Primitive::Triangles, .. })));
}

#[test]
fn adding_geometry_invalidates_batch_and_cache() {
    let mut r = renderer(RenderMode::Buffered);
    r.add_geometry(&square_2d()).unwrap();
    r.add_geometry(&boundary(&cuboid(2.0))).unwrap();
    r.draw(true, true).unwrap();
    assert_eq!(r.backend().live_buffers(), 2);

    r.add_geometry(&square_2d()).unwrap();
    assert!(r.segments().is_none());
    assert!(r.cache().is_empty());
    assert_eq!(r.backend().live_buffers(), 0);

    r.draw(true, true).unwrap();
    assert_eq!(r.segments().unwrap().len(), 8);
}

#[test]
fn drop_releases_buffers() {
    init_tracing();
    let mut gl = RecordingBackend::new();
    {
        let mut r = BrepRenderer::new(
            &mut gl,
            RendererConfig::default().with_render_mode(RenderMode::Buffered),
        );
        r.add_geometry(&square_2d()).unwrap();
        r.add_geometry(&boundary(&cuboid(0.0))).unwrap();
        r.draw(true, true).unwrap();
        assert_eq!(r.backend().live_buffers(), 2);
    }
    assert_eq!(gl.live_buffers(), 0);
}
