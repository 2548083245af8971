use tracing::trace;

use crate::gl::{ClientArray, GraphicsBackend, Primitive, StateAction};

use super::vertex::{PageId, PageVertex};

/// A run of vertices drawn with one primitive mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRange {
    pub primitive: Primitive,
    /// First vertex, counted within the segment's page.
    pub first: usize,
    pub count: usize,
}

/// One state-delimited run of same-layout vertex data.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawSegment {
    pub page: PageId,
    /// Actions run before the draws.
    pub pre: Vec<StateAction>,
    pub draws: Vec<DrawRange>,
    /// Actions run after the draws.
    pub post: Vec<StateAction>,
}

impl DrawSegment {
    /// Total vertices drawn by the segment.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.draws.iter().map(|d| d.count).sum()
    }

    /// Runs the pre-actions, the draws and the post-actions.
    ///
    /// The buffer holding `buffer`'s bytes must already be bound.
    pub fn draw(&self, backend: &mut impl GraphicsBackend, buffer: &InterleavedBuffer) {
        for action in &self.pre {
            action.apply(backend);
        }
        if !self.draws.is_empty() {
            bind_page_layout(backend, self.page, buffer.page_offset(self.page));
            for d in &self.draws {
                trace!(primitive = ?d.primitive, first = d.first, count = d.count, "draw arrays");
                backend.draw_arrays(d.primitive, d.first, d.count);
            }
        }
        for action in &self.post {
            action.apply(backend);
        }
    }
}

/// Enables the arrays of `page`, points them at `base` and disables the rest.
fn bind_page_layout(backend: &mut impl GraphicsBackend, page: PageId, base: usize) {
    let attributes = page.attributes();
    for array in [ClientArray::Position, ClientArray::Normal, ClientArray::Color] {
        match attributes.iter().find(|a| a.array == array) {
            Some(attr) => {
                backend.set_array_enabled(array, true);
                backend.attribute_pointer(array, attr.components, page.stride(), base + attr.offset);
            }
            None => backend.set_array_enabled(array, false),
        }
    }
}

/// Vertex bytes of every page, concatenated in page order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterleavedBuffer {
    data: Vec<u8>,
    page_offsets: [usize; 2],
}

impl InterleavedBuffer {
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Byte offset where `page` starts.
    #[must_use]
    pub fn page_offset(&self, page: PageId) -> usize {
        self.page_offsets[page.index()]
    }
}

/// Accumulates vertices into fixed pages and segments into draw order.
#[derive(Debug, Clone)]
pub struct VertexArray {
    pages: [Vec<u8>; 2],
    write_page: PageId,
    segments: Vec<DrawSegment>,
}

impl Default for VertexArray {
    fn default() -> Self {
        Self::new()
    }
}

impl VertexArray {
    /// Declares the flat and lit pages, writing to the flat page first.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pages: [Vec::new(), Vec::new()],
            write_page: PageId::Flat,
            segments: Vec::new(),
        }
    }

    /// Selects the page new segments write to.
    pub fn write_index(&mut self, page: PageId) {
        self.write_page = page;
    }

    /// Number of vertices written to `page`.
    #[must_use]
    pub fn vertex_count(&self, page: PageId) -> usize {
        self.pages[page.index()].len() / page.stride()
    }

    /// Starts a new segment on the current page.
    pub fn push_segment(&mut self, pre: Vec<StateAction>, post: Vec<StateAction>) {
        self.segments.push(DrawSegment {
            page: self.write_page,
            pre,
            draws: Vec::new(),
            post,
        });
    }

    /// Appends vertices to the last segment as one primitive.
    ///
    /// Consecutive triangle, line and point runs are merged into one draw.
    ///
    /// # Panics
    ///
    /// Panics if no segment was started or if `V` belongs to another page than
    /// the last segment.
    pub fn add_primitive<V: PageVertex>(&mut self, primitive: Primitive, vertices: &[V]) {
        if vertices.is_empty() {
            return;
        }
        let first = self.vertex_count(V::PAGE);
        self.pages[V::PAGE.index()].extend_from_slice(bytemuck::cast_slice(vertices));

        let Some(segment) = self.segments.last_mut() else {
            panic!("add_primitive called before push_segment");
        };
        assert_eq!(segment.page, V::PAGE, "vertex type does not match segment page");

        let mergeable = matches!(primitive, Primitive::Triangles | Primitive::Lines | Primitive::Points);
        match segment.draws.last_mut() {
            Some(last) if mergeable && last.primitive == primitive && last.first + last.count == first => {
                last.count += vertices.len();
            }
            _ => segment.draws.push(DrawRange {
                primitive,
                first,
                count: vertices.len(),
            }),
        }
    }

    #[must_use]
    pub fn segments(&self) -> &[DrawSegment] {
        &self.segments
    }

    /// Concatenates the pages into one buffer and hands out the segments.
    #[must_use]
    pub fn finish(self) -> (Vec<DrawSegment>, InterleavedBuffer) {
        let mut data = Vec::with_capacity(self.pages.iter().map(Vec::len).sum());
        let mut page_offsets = [0; 2];
        for page in PageId::ALL {
            page_offsets[page.index()] = data.len();
            data.extend_from_slice(&self.pages[page.index()]);
        }
        (self.segments, InterleavedBuffer { data, page_offsets })
    }
}
