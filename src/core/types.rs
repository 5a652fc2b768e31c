//! Core type aliases and re-exports

pub use glam::{Mat4, Quat, Vec3};

/// Standard Result type for the generator
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;

/// Largest accepted linear dimension, in metres.
pub const MAX_EXTENT: f32 = 10_000.0;

/// A finite, positive length no larger than [`MAX_EXTENT`]. NaN fails.
pub fn is_valid_extent(value: f32) -> bool {
    value > 0.0 && value <= MAX_EXTENT
}
