//! The renderer: classifies geometry, caches drawables and issues draws.

mod legacy;

use std::sync::Arc;

use tracing::{debug, trace};

use crate::batch::{DrawSegment, PolysetBatch};
use crate::color::{ColorMap, ColorScheme};
use crate::config::{RenderMode, RendererConfig};
use crate::error::{RenderError, Result};
use crate::geometry::{BoundaryPolyhedron, Dimension, Geometry, GeometryHandle, PolySet};
use crate::gl::{with_saved_state, GraphicsBackend};
use crate::math::Aabb;
use crate::polyhedron::{DrawStyle, DrawablePolyhedron, PolyhedronCache};
use crate::tessellation::tessellate_faces;

/// Draws polygon sets and boundary polyhedra through a [`GraphicsBackend`].
///
/// Polygon sets are tessellated when added. Boundary polyhedra are converted
/// lazily, once per render mode, and kept until the color scheme changes or
/// new geometry is added. In buffered mode all polygon sets share one
/// interleaved buffer built on the first draw.
///
/// Every graphics buffer the renderer acquired is released on drop.
#[derive(Debug)]
pub struct BrepRenderer<B: GraphicsBackend> {
    backend: B,
    config: RendererConfig,
    colors: ColorMap,
    polysets: Vec<PolySet>,
    polyhedra: Vec<Arc<BoundaryPolyhedron>>,
    cache: PolyhedronCache,
    batch: Option<PolysetBatch>,
    last_render_mode: Option<RenderMode>,
}

impl<B: GraphicsBackend> BrepRenderer<B> {
    /// Creates an empty renderer drawing through `backend`.
    #[must_use]
    pub fn new(backend: B, config: RendererConfig) -> Self {
        let colors = ColorMap::from_scheme(&config.color_scheme);
        Self {
            backend,
            config,
            colors,
            polysets: Vec::new(),
            polyhedra: Vec::new(),
            cache: PolyhedronCache::new(),
            batch: None,
            last_render_mode: None,
        }
    }

    /// Creates a renderer for `geometry`.
    ///
    /// # Errors
    ///
    /// Returns an error if a polygon set in `geometry` cannot be tessellated.
    pub fn with_geometry(backend: B, config: RendererConfig, geometry: &GeometryHandle) -> Result<Self> {
        let mut renderer = Self::new(backend, config);
        renderer.add_geometry(geometry)?;
        Ok(renderer)
    }

    /// Retains `geometry` for drawing.
    ///
    /// Composites are walked depth-first in child order. Polygon sets are
    /// tessellated and kept; non-empty boundary polyhedra are kept as shared
    /// references. Unsupported kinds are skipped. Anything retained drops the
    /// current segment batch and polyhedron cache.
    ///
    /// # Errors
    ///
    /// Returns an error if a polygon set cannot be tessellated. Geometry
    /// retained before the failure stays retained.
    ///
    /// # Panics
    ///
    /// Panics if a 3D face set or a boundary polyhedron is not three-dimensional.
    pub fn add_geometry(&mut self, geometry: &GeometryHandle) -> Result<()> {
        match geometry.as_ref() {
            Geometry::Composite(list) => {
                for (_, child) in list.children() {
                    self.add_geometry(child)?;
                }
            }
            Geometry::FaceSet3D(ps) => {
                assert_eq!(ps.dimension(), Dimension::Three, "3D face set must be three-dimensional");
                let retained = tessellate_faces(ps, &self.config.tessellation)?;
                self.polysets.push(retained);
                self.invalidate();
            }
            Geometry::FaceSet2D(poly) => {
                let retained = poly.tessellate(&self.config.tessellation)?;
                self.polysets.push(retained);
                self.invalidate();
            }
            Geometry::Boundary(poly) => {
                assert_eq!(poly.dimension(), Dimension::Three, "boundary polyhedron must be three-dimensional");
                if !poly.is_empty() {
                    self.polyhedra.push(Arc::clone(poly));
                    self.invalidate();
                }
            }
            Geometry::Unsupported(_) => {
                debug!(kind = geometry.kind(), "skipping unsupported geometry");
            }
        }
        Ok(())
    }

    fn invalidate(&mut self) {
        if let Some(mut batch) = self.batch.take() {
            batch.release(&mut self.backend);
        }
        self.cache.clear(&mut self.backend);
    }

    /// Selects the render mode used from the next operation on.
    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.config.render_mode = mode;
    }

    /// Switches color schemes.
    ///
    /// The polyhedron cache and segment batch are always dropped, even when
    /// `scheme` equals the active one.
    pub fn set_color_scheme(&mut self, scheme: ColorScheme) {
        debug!(scheme = scheme.name(), "color scheme changed");
        self.colors.refresh(&scheme);
        self.config.color_scheme = scheme;
        self.invalidate();
    }

    /// The drawable polyhedra, converting them first if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if a boundary polyhedron cannot be converted.
    pub fn drawables(&mut self) -> Result<&[DrawablePolyhedron]> {
        let drawables = self.cache.drawables(
            &self.polyhedra,
            &self.config.color_scheme,
            self.config.render_mode,
            &mut self.backend,
        )?;
        Ok(&*drawables)
    }

    /// Draws every retained polygon set, then every polyhedron.
    ///
    /// Polyhedra use the boundary style when `show_faces` is set and the
    /// skeleton style otherwise; their edges are drawn over the faces only when
    /// both flags are set. In buffered mode, point size, line width and client
    /// array state are restored after the polygon sets are drawn.
    ///
    /// # Errors
    ///
    /// Returns an error if a polygon set or polyhedron cannot be triangulated.
    pub fn draw(&mut self, show_faces: bool, show_edges: bool) -> Result<()> {
        let mode = self.config.render_mode;
        trace!(?mode, show_faces, show_edges, "draw");

        match mode {
            RenderMode::Legacy => {
                for ps in &self.polysets {
                    legacy::draw_polyset(&mut self.backend, ps, &self.colors);
                }
            }
            RenderMode::Buffered => {
                if self.batch.is_none() {
                    let mut batch = PolysetBatch::build(&self.polysets, &self.colors)?;
                    batch.upload(&mut self.backend);
                    self.batch = Some(batch);
                }
                if let Some(batch) = self.batch.as_ref().filter(|b| b.handle().is_some()) {
                    with_saved_state(&mut self.backend, |gl| {
                        batch.draw(gl);
                        Ok::<_, RenderError>(())
                    })?;
                }
            }
        }

        let style = if show_faces {
            DrawStyle::Boundary
        } else {
            DrawStyle::Skeleton
        };
        let drawables = self.cache.drawables(
            &self.polyhedra,
            &self.config.color_scheme,
            mode,
            &mut self.backend,
        )?;
        for drawable in drawables {
            drawable.set_style(style);
            drawable.draw(&mut self.backend, show_faces && show_edges);
            self.last_render_mode = Some(mode);
        }
        Ok(())
    }

    /// Union of the bounds of every polyhedron and polygon set.
    ///
    /// # Errors
    ///
    /// Returns an error if a boundary polyhedron cannot be converted.
    pub fn bounding_box(&mut self) -> Result<Aabb> {
        let mut bbox = Aabb::empty();
        for drawable in self.drawables()? {
            bbox.extend(&drawable.bounding_box());
        }
        for ps in &self.polysets {
            bbox.extend(&ps.bounding_box());
        }
        Ok(bbox)
    }

    /// Releases every graphics buffer held by the batch and the cache.
    ///
    /// They are rebuilt on the next draw.
    pub fn release(&mut self) {
        self.invalidate();
    }

    /// The tessellated polygon sets, in the order they were added.
    #[must_use]
    pub fn polysets(&self) -> &[PolySet] {
        &self.polysets
    }

    /// The retained boundary polyhedra, in the order they were added.
    #[must_use]
    pub fn polyhedra(&self) -> &[Arc<BoundaryPolyhedron>] {
        &self.polyhedra
    }

    /// The segments of the current buffered batch, if built.
    #[must_use]
    pub fn segments(&self) -> Option<&[DrawSegment]> {
        self.batch.as_ref().map(PolysetBatch::segments)
    }

    #[must_use]
    pub fn cache(&self) -> &PolyhedronCache {
        &self.cache
    }

    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Mode of the last polyhedron draw.
    #[must_use]
    pub fn last_render_mode(&self) -> Option<RenderMode> {
        self.last_render_mode
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: GraphicsBackend> Drop for BrepRenderer<B> {
    fn drop(&mut self) {
        self.invalidate();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;
