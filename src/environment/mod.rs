//! Environment props placed around buildings.
//!
//! - `tree`: trunk cylinder plus a cluster of foliage spheres
//! - `road`: asphalt slab, lane markings and sidewalks
//!
//! Both follow the building layout split: a pure `layout_*` function returns
//! primitives in the prop's local frame, and `build_*` registers materials and
//! parents the primitives to a fresh assembly positioned in the world.

pub mod road;
pub mod tree;

pub use road::{build_road, layout_road, RoadMaterials, RoadSpec};
pub use tree::{build_tree, layout_tree, TreeMaterials, TreeSpec};
