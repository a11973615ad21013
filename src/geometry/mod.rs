//! Geometry primitives
//!
//! Oriented boxes and rays. Only boolean overlap and first-hit ray distance
//! are needed; there is no contact manifold or penetration depth.

pub mod ray;
pub mod volume;

pub use ray::Ray;
pub use volume::Volume;
