//! Seam between the renderer and the graphics API.
//!
//! The renderer never talks to a graphics API directly. It issues state changes,
//! buffer operations and draw calls through [`GraphicsBackend`], in the order the
//! frame must be drawn.

pub mod recording;
pub mod state;

pub use recording::{GlCall, RecordingBackend};
pub use state::{with_saved_state, SavedState, StateAction};

use crate::color::Color4f;

/// Server-side capabilities the renderer toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Lighting,
    DepthTest,
}

/// Client-side vertex attribute arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientArray {
    Position,
    Normal,
    Color,
}

/// Primitive assembly modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Points,
    Lines,
    LineLoop,
    Triangles,
    Polygon,
}

/// Opaque name of a buffer object owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u32);

/// The graphics calls the renderer needs.
///
/// Implementations own the context; the renderer only decides what to emit.
/// Allocation failures are the implementation's concern.
pub trait GraphicsBackend {
    /// Enables or disables a capability.
    fn set_capability(&mut self, cap: Capability, enabled: bool);

    /// Current rasterized line width.
    fn line_width(&self) -> f32;

    fn set_line_width(&mut self, width: f32);

    /// Current rasterized point size.
    fn point_size(&self) -> f32;

    fn set_point_size(&mut self, size: f32);

    /// Returns `true` if the client array is enabled.
    fn is_array_enabled(&self, array: ClientArray) -> bool;

    fn set_array_enabled(&mut self, array: ClientArray, enabled: bool);

    /// Points an attribute array at the bound buffer.
    ///
    /// `stride` and `offset` are in bytes.
    fn attribute_pointer(&mut self, array: ClientArray, components: u8, stride: usize, offset: usize);

    /// Allocates a new buffer object.
    fn create_buffer(&mut self) -> BufferHandle;

    /// Replaces the contents of a buffer object.
    fn upload_buffer(&mut self, buffer: BufferHandle, data: &[u8]);

    /// Binds a buffer as the vertex source, or unbinds with `None`.
    fn bind_buffer(&mut self, buffer: Option<BufferHandle>);

    fn delete_buffer(&mut self, buffer: BufferHandle);

    /// Draws `count` vertices starting at vertex `first` of the current arrays.
    fn draw_arrays(&mut self, primitive: Primitive, first: usize, count: usize);

    /// Sets the current color for immediate drawing.
    fn set_color(&mut self, color: Color4f);

    /// Starts an immediate-mode primitive.
    fn begin(&mut self, primitive: Primitive);

    /// Sets the normal for the following immediate vertices.
    fn normal(&mut self, normal: [f32; 3]);

    /// Emits an immediate vertex.
    fn vertex(&mut self, position: [f32; 3]);

    /// Ends the current immediate-mode primitive.
    fn end(&mut self);
}

impl<B: GraphicsBackend + ?Sized> GraphicsBackend for &mut B {
    fn set_capability(&mut self, cap: Capability, enabled: bool) {
        (**self).set_capability(cap, enabled);
    }

    fn line_width(&self) -> f32 {
        (**self).line_width()
    }

    fn set_line_width(&mut self, width: f32) {
        (**self).set_line_width(width);
    }

    fn point_size(&self) -> f32 {
        (**self).point_size()
    }

    fn set_point_size(&mut self, size: f32) {
        (**self).set_point_size(size);
    }

    fn is_array_enabled(&self, array: ClientArray) -> bool {
        (**self).is_array_enabled(array)
    }

    fn set_array_enabled(&mut self, array: ClientArray, enabled: bool) {
        (**self).set_array_enabled(array, enabled);
    }

    fn attribute_pointer(&mut self, array: ClientArray, components: u8, stride: usize, offset: usize) {
        (**self).attribute_pointer(array, components, stride, offset);
    }

    fn create_buffer(&mut self) -> BufferHandle {
        (**self).create_buffer()
    }

    fn upload_buffer(&mut self, buffer: BufferHandle, data: &[u8]) {
        (**self).upload_buffer(buffer, data);
    }

    fn bind_buffer(&mut self, buffer: Option<BufferHandle>) {
        (**self).bind_buffer(buffer);
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        (**self).delete_buffer(buffer);
    }

    fn draw_arrays(&mut self, primitive: Primitive, first: usize, count: usize) {
        (**self).draw_arrays(primitive, first, count);
    }

    fn set_color(&mut self, color: Color4f) {
        (**self).set_color(color);
    }

    fn begin(&mut self, primitive: Primitive) {
        (**self).begin(primitive);
    }

    fn normal(&mut self, normal: [f32; 3]) {
        (**self).normal(normal);
    }

    fn vertex(&mut self, position: [f32; 3]) {
        (**self).vertex(position);
    }

    fn end(&mut self) {
        (**self).end();
    }
}
