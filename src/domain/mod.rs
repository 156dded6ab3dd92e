//! Domain logic and core data structures
//!
//! This module contains the pure geometry engine: points, boxes and
//! multi-box meshes. It is independent of Win32 APIs and of the docking
//! state kept by the application layer.

pub mod bounds;
pub mod core;
pub mod mesh;

pub use bounds::{Anchor, BoundingBox, Edge, GeometryError, Intersection};
pub use self::core::{Shape, Vector};
pub use mesh::CollisionMesh;
