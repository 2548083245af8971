use tracing::{debug, trace};

use crate::color::{ColorMap, ColorMode};
use crate::error::Result;
use crate::geometry::{Dimension, PolySet};
use crate::gl::{BufferHandle, Capability, GraphicsBackend, Primitive, StateAction};
use crate::math::polygon::newell_normal;
use crate::math::{to_f32, vector_to_f32};
use crate::tessellation::triangulate_polygon;

use super::array::{DrawSegment, InterleavedBuffer, VertexArray};
use super::vertex::{FlatVertex, LitVertex, PageId};

/// Line width of 2D outlines.
pub(crate) const EDGE_2D_WIDTH: f32 = 2.0;

/// All retained polygon sets packed into one interleaved buffer.
#[derive(Debug, Default)]
pub struct PolysetBatch {
    segments: Vec<DrawSegment>,
    buffer: InterleavedBuffer,
    processed: usize,
    handle: Option<BufferHandle>,
}

impl PolysetBatch {
    /// Emits the segments for `polysets` in order.
    ///
    /// Each 2D set contributes four segments: one that disables lighting after
    /// it, the faces, the outlines drawn over everything at line width 2, and one
    /// that re-enables depth testing. Each 3D set contributes one lit face segment.
    ///
    /// # Errors
    ///
    /// Returns an error if a non-convex face cannot be triangulated.
    pub fn build(polysets: &[PolySet], colors: &ColorMap) -> Result<Self> {
        debug!(polysets = polysets.len(), "building polyset segments");
        let mut va = VertexArray::new();

        for ps in polysets {
            trace!(dimension = ps.dimension().get(), polygons = ps.polygons().len(), "batching polyset");
            match ps.dimension() {
                Dimension::Two => {
                    va.write_index(PageId::Flat);
                    va.push_segment(Vec::new(), vec![StateAction::Disable(Capability::Lighting)]);

                    va.push_segment(Vec::new(), Vec::new());
                    add_flat_faces(&mut va, ps, colors.get(ColorMode::Face2d).to_array())?;

                    va.push_segment(
                        vec![
                            StateAction::Disable(Capability::DepthTest),
                            StateAction::LineWidth(EDGE_2D_WIDTH),
                        ],
                        Vec::new(),
                    );
                    add_outlines(&mut va, ps, colors.get(ColorMode::Edge2d).to_array());

                    va.push_segment(vec![StateAction::Enable(Capability::DepthTest)], Vec::new());
                }
                Dimension::Three => {
                    va.write_index(PageId::Lit);
                    va.push_segment(Vec::new(), Vec::new());
                    add_lit_faces(&mut va, ps, colors.get(ColorMode::Material).to_array())?;
                }
            }
        }

        let (segments, buffer) = va.finish();
        debug!(segments = segments.len(), bytes = buffer.bytes().len(), "polyset segments built");
        Ok(Self {
            segments,
            buffer,
            processed: polysets.len(),
            handle: None,
        })
    }

    #[must_use]
    pub fn segments(&self) -> &[DrawSegment] {
        &self.segments
    }

    #[must_use]
    pub fn buffer(&self) -> &InterleavedBuffer {
        &self.buffer
    }

    /// The graphics buffer, once uploaded.
    #[must_use]
    pub fn handle(&self) -> Option<BufferHandle> {
        self.handle
    }

    /// Acquires a graphics buffer and uploads the vertex data.
    ///
    /// Does nothing when no polygon set was processed or the data is already
    /// uploaded.
    pub fn upload(&mut self, backend: &mut impl GraphicsBackend) {
        if self.processed == 0 || self.handle.is_some() {
            return;
        }
        let handle = backend.create_buffer();
        backend.upload_buffer(handle, self.buffer.bytes());
        self.handle = Some(handle);
    }

    /// Binds the buffer once and draws every segment in order.
    ///
    /// Without an uploaded buffer nothing is drawn.
    pub fn draw(&self, backend: &mut impl GraphicsBackend) {
        let Some(handle) = self.handle else {
            return;
        };
        backend.bind_buffer(Some(handle));
        for segment in &self.segments {
            segment.draw(backend, &self.buffer);
        }
        backend.bind_buffer(None);
    }

    /// Deletes the graphics buffer, if any.
    pub fn release(&mut self, backend: &mut impl GraphicsBackend) {
        if let Some(handle) = self.handle.take() {
            backend.delete_buffer(handle);
        }
    }
}

fn add_flat_faces(va: &mut VertexArray, ps: &PolySet, color: [f32; 4]) -> Result<()> {
    let convex = ps.convex() == Some(true);
    for polygon in ps.polygons() {
        let vertices: Vec<FlatVertex> = triangulate_polygon(polygon, convex)?
            .into_iter()
            .flatten()
            .map(|i| FlatVertex {
                position: to_f32(&polygon[i]),
                color,
            })
            .collect();
        va.add_primitive(Primitive::Triangles, &vertices);
    }
    Ok(())
}

fn add_outlines(va: &mut VertexArray, ps: &PolySet, color: [f32; 4]) {
    let loops = if ps.outlines().is_empty() {
        ps.polygons()
    } else {
        ps.outlines()
    };
    for outline in loops {
        let vertices: Vec<FlatVertex> = outline
            .iter()
            .map(|p| FlatVertex {
                position: to_f32(p),
                color,
            })
            .collect();
        va.add_primitive(Primitive::LineLoop, &vertices);
    }
}

fn add_lit_faces(va: &mut VertexArray, ps: &PolySet, color: [f32; 4]) -> Result<()> {
    let convex = ps.convex() == Some(true);
    for polygon in ps.polygons() {
        // One normal per face, repeated on each of its vertices.
        let Some(normal) = newell_normal(polygon) else {
            continue;
        };
        let normal = vector_to_f32(&normal);
        let vertices: Vec<LitVertex> = triangulate_polygon(polygon, convex)?
            .into_iter()
            .flatten()
            .map(|i| LitVertex {
                position: to_f32(&polygon[i]),
                normal,
                color,
            })
            .collect();
        va.add_primitive(Primitive::Triangles, &vertices);
    }
    Ok(())
}
