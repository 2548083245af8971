use std::collections::{HashMap, HashSet};

use crate::color::Color4f;

use super::{BufferHandle, Capability, ClientArray, GraphicsBackend, Primitive};

/// One call received by a [`RecordingBackend`]. State queries are not recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    SetCapability(Capability, bool),
    LineWidth(f32),
    PointSize(f32),
    SetArrayEnabled(ClientArray, bool),
    AttributePointer {
        array: ClientArray,
        components: u8,
        stride: usize,
        offset: usize,
    },
    CreateBuffer(BufferHandle),
    UploadBuffer(BufferHandle, usize),
    BindBuffer(Option<BufferHandle>),
    DeleteBuffer(BufferHandle),
    DrawArrays {
        primitive: Primitive,
        first: usize,
        count: usize,
    },
    Color(Color4f),
    Begin(Primitive),
    Normal([f32; 3]),
    Vertex([f32; 3]),
    End,
}

/// A headless backend that tracks graphics state and logs every call.
///
/// Starts with lighting and depth testing enabled, unit line width and point
/// size, and all client arrays disabled.
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    calls: Vec<GlCall>,
    capabilities: HashMap<Capability, bool>,
    arrays: HashSet<ClientArray>,
    line_width: f32,
    point_size: f32,
    buffers: HashMap<BufferHandle, Vec<u8>>,
    next_buffer: u32,
    bound: Option<BufferHandle>,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            capabilities: HashMap::from([(Capability::Lighting, true), (Capability::DepthTest, true)]),
            arrays: HashSet::new(),
            line_width: 1.0,
            point_size: 1.0,
            buffers: HashMap::new(),
            next_buffer: 1,
            bound: None,
        }
    }

    /// All calls received so far, in order.
    #[must_use]
    pub fn calls(&self) -> &[GlCall] {
        &self.calls
    }

    /// Returns the recorded calls and clears the log. State is kept.
    pub fn take_calls(&mut self) -> Vec<GlCall> {
        std::mem::take(&mut self.calls)
    }

    #[must_use]
    pub fn is_enabled(&self, cap: Capability) -> bool {
        self.capabilities.get(&cap).copied().unwrap_or(false)
    }

    /// Contents of a live buffer.
    #[must_use]
    pub fn buffer_data(&self, buffer: BufferHandle) -> Option<&[u8]> {
        self.buffers.get(&buffer).map(Vec::as_slice)
    }

    /// Number of buffers created and not yet deleted.
    #[must_use]
    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    #[must_use]
    pub fn bound_buffer(&self) -> Option<BufferHandle> {
        self.bound
    }
}

impl GraphicsBackend for RecordingBackend {
    fn set_capability(&mut self, cap: Capability, enabled: bool) {
        self.capabilities.insert(cap, enabled);
        self.calls.push(GlCall::SetCapability(cap, enabled));
    }

    fn line_width(&self) -> f32 {
        self.line_width
    }

    fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
        self.calls.push(GlCall::LineWidth(width));
    }

    fn point_size(&self) -> f32 {
        self.point_size
    }

    fn set_point_size(&mut self, size: f32) {
        self.point_size = size;
        self.calls.push(GlCall::PointSize(size));
    }

    fn is_array_enabled(&self, array: ClientArray) -> bool {
        self.arrays.contains(&array)
    }

    fn set_array_enabled(&mut self, array: ClientArray, enabled: bool) {
        if enabled {
            self.arrays.insert(array);
        } else {
            self.arrays.remove(&array);
        }
        self.calls.push(GlCall::SetArrayEnabled(array, enabled));
    }

    fn attribute_pointer(&mut self, array: ClientArray, components: u8, stride: usize, offset: usize) {
        self.calls.push(GlCall::AttributePointer {
            array,
            components,
            stride,
            offset,
        });
    }

    fn create_buffer(&mut self) -> BufferHandle {
        let handle = BufferHandle(self.next_buffer);
        self.next_buffer += 1;
        self.buffers.insert(handle, Vec::new());
        self.calls.push(GlCall::CreateBuffer(handle));
        handle
    }

    fn upload_buffer(&mut self, buffer: BufferHandle, data: &[u8]) {
        self.buffers.insert(buffer, data.to_vec());
        self.calls.push(GlCall::UploadBuffer(buffer, data.len()));
    }

    fn bind_buffer(&mut self, buffer: Option<BufferHandle>) {
        self.bound = buffer;
        self.calls.push(GlCall::BindBuffer(buffer));
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        self.buffers.remove(&buffer);
        if self.bound == Some(buffer) {
            self.bound = None;
        }
        self.calls.push(GlCall::DeleteBuffer(buffer));
    }

    fn draw_arrays(&mut self, primitive: Primitive, first: usize, count: usize) {
        self.calls.push(GlCall::DrawArrays {
            primitive,
            first,
            count,
        });
    }

    fn set_color(&mut self, color: Color4f) {
        self.calls.push(GlCall::Color(color));
    }

    fn begin(&mut self, primitive: Primitive) {
        self.calls.push(GlCall::Begin(primitive));
    }

    fn normal(&mut self, normal: [f32; 3]) {
        self.calls.push(GlCall::Normal(normal));
    }

    fn vertex(&mut self, position: [f32; 3]) {
        self.calls.push(GlCall::Vertex(position));
    }

    fn end(&mut self) {
        self.calls.push(GlCall::End);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state() {
        let gl = RecordingBackend::new();
        assert!(gl.is_enabled(Capability::Lighting));
        assert!(gl.is_enabled(Capability::DepthTest));
        assert!(!gl.is_array_enabled(ClientArray::Position));
        assert!(gl.calls().is_empty());
    }

    #[test]
    fn buffer_lifecycle() {
        let mut gl = RecordingBackend::new();
        let buf = gl.create_buffer();
        gl.upload_buffer(buf, &[1, 2, 3]);
        gl.bind_buffer(Some(buf));
        assert_eq!(gl.buffer_data(buf), Some(&[1u8, 2, 3][..]));
        assert_eq!(gl.bound_buffer(), Some(buf));
        gl.delete_buffer(buf);
        assert_eq!(gl.live_buffers(), 0);
        assert_eq!(gl.bound_buffer(), None);
        assert_eq!(gl.take_calls().len(), 4);
        assert!(gl.calls().is_empty());
    }
}
