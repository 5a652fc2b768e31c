//! Mesh generation for exported primitives

pub mod font;
pub mod mesh;

pub use font::{TextSpec, VerticalAlign};
pub use mesh::MeshData;
