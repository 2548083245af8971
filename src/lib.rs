pub mod batch;
pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod gl;
pub mod math;
pub mod polyhedron;
pub mod renderer;
pub mod tessellation;
pub mod topology;

pub use color::{Color4f, ColorScheme, RenderColor};
pub use config::{RenderMode, RendererConfig};
pub use error::{RenderError, Result};
pub use geometry::{Geometry, GeometryHandle};
pub use gl::{GraphicsBackend, RecordingBackend};
pub use renderer::BrepRenderer;
