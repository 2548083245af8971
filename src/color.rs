use std::collections::HashMap;

/// An RGBA color with `f32` channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color4f {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color4f {
    /// Creates a color from float channels.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from 8-bit channels.
    #[must_use]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            1.0,
        )
    }

    /// Returns the channels as `[r, g, b, a]`.
    #[must_use]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Keys of a color scheme table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderColor {
    Background,
    /// Front face color of preview geometry, used as the material color.
    MaterialFront,
    MaterialBack,
    FaceFront,
    FaceBack,
    Face2d,
    EdgeFront,
    EdgeBack,
    Edge2d,
    VertexFront,
    VertexBack,
}

/// The colors the renderer selects by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// Flat material color for 3D polygon sets.
    Material,
    /// Fill color of 2D polygon sets.
    Face2d,
    /// Outline color of 2D polygon sets.
    Edge2d,
    MarkedFacet,
    UnmarkedFacet,
    MarkedEdge,
    UnmarkedEdge,
    MarkedVertex,
    UnmarkedVertex,
}

impl ColorMode {
    /// The scheme entry this mode is read from.
    ///
    /// Marked boundary elements take the back colors and unmarked ones the front colors.
    #[must_use]
    pub fn source(self) -> RenderColor {
        match self {
            Self::Material => RenderColor::MaterialFront,
            Self::Face2d => RenderColor::Face2d,
            Self::Edge2d => RenderColor::Edge2d,
            Self::MarkedFacet => RenderColor::FaceBack,
            Self::UnmarkedFacet => RenderColor::FaceFront,
            Self::MarkedEdge => RenderColor::EdgeBack,
            Self::UnmarkedEdge => RenderColor::EdgeFront,
            Self::MarkedVertex => RenderColor::VertexBack,
            Self::UnmarkedVertex => RenderColor::VertexFront,
        }
    }
}

/// A named key→color table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScheme {
    name: String,
    colors: HashMap<RenderColor, Color4f>,
}

/// Fallback for keys a scheme does not define.
const MISSING_COLOR: Color4f = Color4f::new(0.0, 0.0, 0.0, 1.0);

impl Default for ColorScheme {
    fn default() -> Self {
        Self::cornfield()
    }
}

impl ColorScheme {
    /// Creates an empty scheme. Every lookup falls back to opaque black.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            colors: HashMap::new(),
        }
    }

    /// The default yellow/green scheme.
    #[must_use]
    pub fn cornfield() -> Self {
        Self::new("Cornfield")
            .with_color(RenderColor::Background, Color4f::from_rgb8(0xff, 0xff, 0xe5))
            .with_color(RenderColor::MaterialFront, Color4f::from_rgb8(0xf9, 0xd7, 0x2c))
            .with_color(RenderColor::MaterialBack, Color4f::from_rgb8(0x9d, 0xcb, 0x51))
            .with_color(RenderColor::FaceFront, Color4f::from_rgb8(0xf9, 0xd7, 0x2c))
            .with_color(RenderColor::FaceBack, Color4f::from_rgb8(0x9d, 0xcb, 0x51))
            .with_color(RenderColor::Face2d, Color4f::from_rgb8(0x00, 0xbf, 0x63))
            .with_color(RenderColor::EdgeFront, Color4f::from_rgb8(0xff, 0xec, 0x5e))
            .with_color(RenderColor::EdgeBack, Color4f::from_rgb8(0xab, 0xd8, 0x56))
            .with_color(RenderColor::Edge2d, Color4f::from_rgb8(0xff, 0x00, 0x00))
            .with_color(RenderColor::VertexFront, Color4f::from_rgb8(0xff, 0xf6, 0x7c))
            .with_color(RenderColor::VertexBack, Color4f::from_rgb8(0xb7, 0xe8, 0x5c))
    }

    /// A cool grey/violet scheme.
    #[must_use]
    pub fn metallic() -> Self {
        Self::new("Metallic")
            .with_color(RenderColor::Background, Color4f::from_rgb8(0xaa, 0xaa, 0xff))
            .with_color(RenderColor::MaterialFront, Color4f::from_rgb8(0xdd, 0xdd, 0xff))
            .with_color(RenderColor::MaterialBack, Color4f::from_rgb8(0xdd, 0x22, 0xdd))
            .with_color(RenderColor::FaceFront, Color4f::from_rgb8(0xdd, 0xdd, 0xff))
            .with_color(RenderColor::FaceBack, Color4f::from_rgb8(0xdd, 0x22, 0xdd))
            .with_color(RenderColor::Face2d, Color4f::from_rgb8(0xbb, 0xbb, 0xbb))
            .with_color(RenderColor::EdgeFront, Color4f::from_rgb8(0xff, 0x00, 0x00))
            .with_color(RenderColor::EdgeBack, Color4f::from_rgb8(0xff, 0x00, 0x00))
            .with_color(RenderColor::Edge2d, Color4f::from_rgb8(0xff, 0x00, 0x00))
            .with_color(RenderColor::VertexFront, Color4f::from_rgb8(0xff, 0x44, 0x44))
            .with_color(RenderColor::VertexBack, Color4f::from_rgb8(0xff, 0x44, 0x44))
    }

    /// Returns the scheme with `key` set to `color`.
    #[must_use]
    pub fn with_color(mut self, key: RenderColor, color: Color4f) -> Self {
        self.colors.insert(key, color);
        self
    }

    /// The scheme's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up `key`, or `None` if the scheme does not define it.
    #[must_use]
    pub fn color(&self, key: RenderColor) -> Option<Color4f> {
        self.colors.get(&key).copied()
    }

    /// Looks up the color for a renderer role, falling back to opaque black.
    #[must_use]
    pub fn color_for(&self, mode: ColorMode) -> Color4f {
        self.color(mode.source()).unwrap_or(MISSING_COLOR)
    }
}

/// Colors resolved from the active scheme, keyed by role.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    colors: HashMap<ColorMode, Color4f>,
}

impl ColorMap {
    /// Resolves the renderer's polygon-set roles from `scheme`.
    #[must_use]
    pub fn from_scheme(scheme: &ColorScheme) -> Self {
        let mut map = Self::default();
        map.refresh(scheme);
        map
    }

    /// Re-reads the material, 2D face and 2D edge colors from `scheme`.
    pub fn refresh(&mut self, scheme: &ColorScheme) {
        for mode in [ColorMode::Material, ColorMode::Face2d, ColorMode::Edge2d] {
            self.colors.insert(mode, scheme.color_for(mode));
        }
    }

    /// The color for `mode`, or opaque black if it was never resolved.
    #[must_use]
    pub fn get(&self, mode: ColorMode) -> Color4f {
        self.colors.get(&mode).copied().unwrap_or(MISSING_COLOR)
    }
}
