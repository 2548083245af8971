pub mod aabb;
pub mod polygon;

pub use aabb::Aabb;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Narrows a kernel point to the `f32` triple stored in vertex buffers.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn to_f32(p: &Point3) -> [f32; 3] {
    [p.x as f32, p.y as f32, p.z as f32]
}

/// Narrows a kernel vector to the `f32` triple stored in vertex buffers.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn vector_to_f32(v: &Vector3) -> [f32; 3] {
    [v.x as f32, v.y as f32, v.z as f32]
}
