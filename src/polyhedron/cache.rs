use std::sync::Arc;

use tracing::debug;

use crate::color::ColorScheme;
use crate::config::RenderMode;
use crate::error::Result;
use crate::geometry::BoundaryPolyhedron;
use crate::gl::GraphicsBackend;

use super::DrawablePolyhedron;

#[derive(Debug, Default)]
enum CacheState {
    #[default]
    Empty,
    Built {
        mode: RenderMode,
        drawables: Vec<DrawablePolyhedron>,
    },
}

/// Lazily converted drawables, one per retained boundary polyhedron.
///
/// The cache is either empty or holds exactly one drawable per retained
/// polyhedron, all built under the same mode. A lookup under another mode
/// rebuilds it.
#[derive(Debug, Default)]
pub struct PolyhedronCache {
    state: CacheState,
    builds: usize,
}

impl PolyhedronCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the drawables for `retained`, converting them first if the cache
    /// is empty or was built under another mode.
    ///
    /// A rebuild releases the buffers of the previous drawables on `backend`.
    ///
    /// # Errors
    ///
    /// Returns an error if a polyhedron cannot be converted. The cache is left
    /// empty in that case.
    pub fn drawables(
        &mut self,
        retained: &[Arc<BoundaryPolyhedron>],
        scheme: &ColorScheme,
        mode: RenderMode,
        backend: &mut impl GraphicsBackend,
    ) -> Result<&mut [DrawablePolyhedron]> {
        let stale = match &self.state {
            CacheState::Empty => true,
            CacheState::Built { mode: built, .. } => *built != mode,
        };
        if !retained.is_empty() && stale {
            self.clear(backend);
            debug!(polyhedra = retained.len(), ?mode, "building polyhedron cache");
            let drawables = retained
                .iter()
                .map(|poly| DrawablePolyhedron::build(poly, scheme, mode))
                .collect::<Result<Vec<_>>>()?;
            self.builds += 1;
            self.state = CacheState::Built { mode, drawables };
        }
        Ok(match &mut self.state {
            CacheState::Empty => &mut [],
            CacheState::Built { drawables, .. } => drawables.as_mut_slice(),
        })
    }

    /// Drops every drawable and releases its buffers.
    pub fn clear(&mut self, backend: &mut impl GraphicsBackend) {
        if let CacheState::Built { drawables, .. } = &mut self.state {
            for drawable in drawables.iter_mut() {
                drawable.release(backend);
            }
        }
        self.state = CacheState::Empty;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self.state, CacheState::Empty)
    }

    /// The mode of the current drawables, if built.
    #[must_use]
    pub fn mode(&self) -> Option<RenderMode> {
        match &self.state {
            CacheState::Empty => None,
            CacheState::Built { mode, .. } => Some(*mode),
        }
    }

    /// Number of rebuilds since creation.
    #[must_use]
    pub fn builds(&self) -> usize {
        self.builds
    }
}
