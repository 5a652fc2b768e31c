//! Facade - procedural building and street scene generator

pub mod core;
pub mod math;
pub mod scene;
pub mod geometry;
pub mod building;
pub mod environment;
pub mod composer;
pub mod export;
