use crate::batch::polysets::EDGE_2D_WIDTH;
use crate::color::{ColorMap, ColorMode};
use crate::geometry::{Dimension, PolySet};
use crate::gl::{Capability, GraphicsBackend, Primitive};
use crate::math::polygon::newell_normal;
use crate::math::{to_f32, vector_to_f32};

/// Draws one retained polygon set with immediate-mode calls.
pub(super) fn draw_polyset(backend: &mut impl GraphicsBackend, ps: &PolySet, colors: &ColorMap) {
    match ps.dimension() {
        Dimension::Two => {
            backend.set_capability(Capability::Lighting, false);
            backend.set_color(colors.get(ColorMode::Face2d));
            for polygon in ps.polygons() {
                backend.begin(Primitive::Polygon);
                for p in polygon {
                    backend.vertex(to_f32(p));
                }
                backend.end();
            }

            backend.set_capability(Capability::DepthTest, false);
            backend.set_line_width(EDGE_2D_WIDTH);
            backend.set_color(colors.get(ColorMode::Edge2d));
            let outlines = if ps.outlines().is_empty() {
                ps.polygons()
            } else {
                ps.outlines()
            };
            for outline in outlines {
                backend.begin(Primitive::LineLoop);
                for p in outline {
                    backend.vertex(to_f32(p));
                }
                backend.end();
            }
            backend.set_capability(Capability::DepthTest, true);
        }
        Dimension::Three => {
            backend.set_color(colors.get(ColorMode::Material));
            for polygon in ps.polygons() {
                let Some(normal) = newell_normal(polygon) else {
                    continue;
                };
                backend.begin(Primitive::Polygon);
                backend.normal(vector_to_f32(&normal));
                for p in polygon {
                    backend.vertex(to_f32(p));
                }
                backend.end();
            }
        }
    }
}
