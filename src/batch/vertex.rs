use std::mem::size_of;

use bytemuck::{Pod, Zeroable};

use crate::gl::ClientArray;

/// Vertex of unlit content: 2D faces, edges and points.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Zeroable, Pod)]
pub struct FlatVertex {
    /// Position [x, y, z]
    pub position: [f32; 3],
    /// Color [r, g, b, a]
    pub color: [f32; 4],
}

/// Vertex of lit 3D faces.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Zeroable, Pod)]
pub struct LitVertex {
    /// Position [x, y, z]
    pub position: [f32; 3],
    /// Face normal [x, y, z]
    pub normal: [f32; 3],
    /// Color [r, g, b, a]
    pub color: [f32; 4],
}

/// One attribute inside an interleaved vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub array: ClientArray,
    pub components: u8,
    /// Byte offset from the start of the vertex.
    pub offset: usize,
}

/// The fixed vertex pages of an interleaved buffer, in buffer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    /// Position and color.
    Flat,
    /// Position, normal and color.
    Lit,
}

impl PageId {
    /// All pages in the order they are laid out in the buffer.
    pub const ALL: [PageId; 2] = [PageId::Flat, PageId::Lit];

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Flat => 0,
            Self::Lit => 1,
        }
    }

    /// Attribute layout of the page's vertices.
    #[must_use]
    pub fn attributes(self) -> &'static [VertexAttribute] {
        match self {
            Self::Flat => FlatVertex::ATTRIBUTES,
            Self::Lit => LitVertex::ATTRIBUTES,
        }
    }

    /// Size of one vertex in bytes.
    #[must_use]
    pub fn stride(self) -> usize {
        match self {
            Self::Flat => size_of::<FlatVertex>(),
            Self::Lit => size_of::<LitVertex>(),
        }
    }
}

/// A vertex type stored in one of the fixed pages.
pub trait PageVertex: Pod {
    const PAGE: PageId;
    const ATTRIBUTES: &'static [VertexAttribute];
}

impl PageVertex for FlatVertex {
    const PAGE: PageId = PageId::Flat;
    const ATTRIBUTES: &'static [VertexAttribute] = &[
        VertexAttribute {
            array: ClientArray::Position,
            components: 3,
            offset: 0,
        },
        VertexAttribute {
            array: ClientArray::Color,
            components: 4,
            offset: size_of::<[f32; 3]>(),
        },
    ];
}

impl PageVertex for LitVertex {
    const PAGE: PageId = PageId::Lit;
    const ATTRIBUTES: &'static [VertexAttribute] = &[
        VertexAttribute {
            array: ClientArray::Position,
            components: 3,
            offset: 0,
        },
        VertexAttribute {
            array: ClientArray::Normal,
            components: 3,
            offset: size_of::<[f32; 3]>(),
        },
        VertexAttribute {
            array: ClientArray::Color,
            components: 4,
            offset: size_of::<[f32; 6]>(),
        },
    ];
}
