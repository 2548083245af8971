use crate::color::ColorScheme;
use crate::tessellation::TessellationParams;

/// How polygon sets and polyhedra are sent to the graphics backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// Immediate-mode drawing, one call per vertex.
    #[default]
    Legacy,
    /// Interleaved vertex buffers drawn with array draws.
    Buffered,
}

/// Settings read by the renderer at the start of each operation.
#[derive(Debug, Clone, Default)]
pub struct RendererConfig {
    pub render_mode: RenderMode,
    pub color_scheme: ColorScheme,
    pub tessellation: TessellationParams,
}

impl RendererConfig {
    /// Returns the config with `mode` selected.
    #[must_use]
    pub fn with_render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = mode;
        self
    }

    /// Returns the config with `scheme` selected.
    #[must_use]
    pub fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.color_scheme = scheme;
        self
    }
}
