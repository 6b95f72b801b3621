// argus_core/src/geometry/mod.rs

pub mod bounds;

pub use bounds::bounds_intersect_ball;
