//! Core domain types and operations
//!
//! This module defines the point type every other geometry type builds on,
//! and the `Shape` capability that lets predicates accept points, boxes,
//! meshes and monitors uniformly.

use crate::domain::bounds::BoundingBox;
use crate::domain::mesh::CollisionMesh;

/// Anything that can be projected onto a point, a box and a mesh
///
/// Every geometry type implements all three projections, so operations such as
/// `BoundingBox::is_touching` or `Vector::add` accept any of them.
pub trait Shape {
    /// Position of the shape (its top-left corner for boxes and meshes)
    fn to_vector(&self) -> Vector;

    /// Box enclosing the shape
    ///
    /// An empty mesh has no enclosing box and projects to `BoundingBox::NAN`,
    /// which no predicate ever matches.
    fn to_bounding_box(&self) -> BoundingBox;

    /// The shape as a collection of boxes
    fn to_collision_mesh(&self) -> CollisionMesh;
}

impl<T: Shape + ?Sized> Shape for &T {
    fn to_vector(&self) -> Vector {
        (**self).to_vector()
    }

    fn to_bounding_box(&self) -> BoundingBox {
        (**self).to_bounding_box()
    }

    fn to_collision_mesh(&self) -> CollisionMesh {
        (**self).to_collision_mesh()
    }
}

/// Point (or displacement) in desktop coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    pub left: f64,
    pub top: f64,
}

impl Vector {
    /// Creates a new vector
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    /// Copies the position of `other` into this vector
    pub fn set(&mut self, other: &impl Shape) -> &mut Self {
        let other = other.to_vector();
        self.left = other.left;
        self.top = other.top;
        self
    }

    /// Adds the position of `other` to this vector
    pub fn add(&mut self, other: &impl Shape) -> &mut Self {
        let other = other.to_vector();
        self.left += other.left;
        self.top += other.top;
        self
    }

    /// Subtracts the position of `other` from this vector
    pub fn subtract(&mut self, other: &impl Shape) -> &mut Self {
        let other = other.to_vector();
        self.left -= other.left;
        self.top -= other.top;
        self
    }

    /// Partially updates the vector; a `None` coordinate leaves that axis unchanged
    pub fn move_to(&mut self, left: Option<f64>, top: Option<f64>) -> &mut Self {
        if let Some(left) = left {
            self.left = left;
        }
        if let Some(top) = top {
            self.top = top;
        }
        self
    }

    /// Squared euclidean distance to the position of `other`
    pub fn distance_squared(&self, other: &impl Shape) -> f64 {
        let mut diff = other.to_vector();
        diff.subtract(self);
        diff.left * diff.left + diff.top * diff.top
    }

    /// Euclidean distance to the position of `other`
    pub fn distance(&self, other: &impl Shape) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

impl Shape for Vector {
    fn to_vector(&self) -> Vector {
        *self
    }

    fn to_bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.left, self.top, self.left, self.top)
    }

    fn to_collision_mesh(&self) -> CollisionMesh {
        CollisionMesh::new(vec![self.to_bounding_box()])
    }
}
