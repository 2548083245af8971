use tracing::trace;

use super::{Capability, ClientArray, GraphicsBackend};

/// A graphics-state change run before or after a draw segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateAction {
    Enable(Capability),
    Disable(Capability),
    LineWidth(f32),
    PointSize(f32),
}

impl StateAction {
    /// Issues the change on `backend`.
    pub fn apply(self, backend: &mut impl GraphicsBackend) {
        trace!(action = ?self, "state action");
        match self {
            Self::Enable(cap) => backend.set_capability(cap, true),
            Self::Disable(cap) => backend.set_capability(cap, false),
            Self::LineWidth(width) => backend.set_line_width(width),
            Self::PointSize(size) => backend.set_point_size(size),
        }
    }
}

/// Shared state a batch draw may change and must hand back unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavedState {
    pub point_size: f32,
    pub line_width: f32,
    pub position_array: bool,
    pub normal_array: bool,
    pub color_array: bool,
}

impl SavedState {
    /// Reads the current values from `backend`.
    pub fn capture(backend: &impl GraphicsBackend) -> Self {
        Self {
            point_size: backend.point_size(),
            line_width: backend.line_width(),
            position_array: backend.is_array_enabled(ClientArray::Position),
            normal_array: backend.is_array_enabled(ClientArray::Normal),
            color_array: backend.is_array_enabled(ClientArray::Color),
        }
    }

    /// Writes the captured values back.
    pub fn restore(&self, backend: &mut impl GraphicsBackend) {
        backend.set_point_size(self.point_size);
        backend.set_line_width(self.line_width);
        self.restore_arrays(backend);
    }

    /// Sets every client array back to its enablement at capture time.
    pub fn restore_arrays(&self, backend: &mut impl GraphicsBackend) {
        for (array, was_enabled) in [
            (ClientArray::Position, self.position_array),
            (ClientArray::Normal, self.normal_array),
            (ClientArray::Color, self.color_array),
        ] {
            backend.set_array_enabled(array, was_enabled);
        }
    }
}

/// Runs `f` and restores point size, line width and array enablement afterwards,
/// whether `f` succeeds or not.
pub fn with_saved_state<B, T, E>(
    backend: &mut B,
    f: impl FnOnce(&mut B) -> Result<T, E>,
) -> Result<T, E>
where
    B: GraphicsBackend,
{
    let saved = SavedState::capture(backend);
    let result = f(backend);
    saved.restore(backend);
    result
}
