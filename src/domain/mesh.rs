//! Multi-rectangle regions
//!
//! A `CollisionMesh` is an ordered list of boxes standing for the union of a
//! window, its mesh-contributing children and (optionally) its docked peers.
//! The list is never simplified; duplicates and overlaps are legal.

use crate::domain::bounds::BoundingBox;
use crate::domain::core::{Shape, Vector};

/// Ordered collection of boxes representing a possibly disjoint region
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollisionMesh {
    boxes: Vec<BoundingBox>,
}

impl CollisionMesh {
    /// Creates a mesh from a list of boxes
    pub fn new(boxes: Vec<BoundingBox>) -> Self {
        Self { boxes }
    }

    /// Builds a mesh from any mix of shapes, flattening nested meshes
    pub fn from_shapes<I>(shapes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Shape,
    {
        let mut mesh = Self::default();
        for shape in shapes {
            mesh.extend_from(&shape);
        }
        mesh
    }

    /// Appends a single box
    pub fn push(&mut self, bounds: BoundingBox) {
        self.boxes.push(bounds);
    }

    /// Appends every box of `shape`
    pub fn extend_from(&mut self, shape: &impl Shape) {
        self.boxes.extend(shape.to_collision_mesh().boxes);
    }

    pub fn boxes(&self) -> &[BoundingBox] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Width of the enclosing box (0 for an empty mesh)
    pub fn width(&self) -> f64 {
        self.bounds().map_or(0.0, |b| b.right - b.left)
    }

    /// Height of the enclosing box (0 for an empty mesh)
    pub fn height(&self) -> f64 {
        self.bounds().map_or(0.0, |b| b.bottom - b.top)
    }

    pub fn size(&self) -> Vector {
        Vector::new(self.width(), self.height())
    }

    /// Top-left corner of the enclosing box
    pub fn position(&self) -> Option<Vector> {
        self.bounds().map(|b| b.position())
    }

    /// Minimal box enclosing every member box, `None` for an empty mesh
    pub fn bounds(&self) -> Option<BoundingBox> {
        let (first, rest) = self.boxes.split_first()?;
        Some(rest.iter().fold(*first, |acc, b| {
            BoundingBox::new(
                acc.left.min(b.left),
                acc.top.min(b.top),
                acc.right.max(b.right),
                acc.bottom.max(b.bottom),
            )
        }))
    }

    /// Translates every box by the position of `delta`
    pub fn move_by(&mut self, delta: &impl Shape) -> &mut Self {
        let delta = delta.to_vector();
        for b in &mut self.boxes {
            b.move_by(&delta);
        }
        self
    }

    /// Moves the mesh so its enclosing box starts at `position`
    ///
    /// Internal layout is preserved. An empty mesh is left untouched.
    pub fn move_to(&mut self, position: &impl Shape) -> &mut Self {
        if let Some(current) = self.position() {
            let mut delta = position.to_vector();
            delta.subtract(&current);
            self.move_by(&delta);
        }
        self
    }

    /// Returns true if any box of this mesh contains any box of `other`
    ///
    /// This does not check that the union of this mesh covers `other`; a single
    /// contained box is enough.
    pub fn is_contains(&self, other: &impl Shape) -> bool {
        let other = other.to_collision_mesh();
        self.boxes.iter().any(|b| b.some_contains(&other.boxes))
    }

    /// Same as `is_contains`, over a list of shapes
    pub fn some_contains<S: Shape>(&self, others: &[S]) -> bool {
        others.iter().any(|other| self.is_contains(other))
    }

    /// Returns true if any box of this mesh touches any box of `other`
    pub fn is_touching(&self, other: &impl Shape) -> bool {
        let other = other.to_collision_mesh();
        self.boxes.iter().any(|b| b.some_touching(&other.boxes))
    }

    pub fn some_touching<S: Shape>(&self, others: &[S]) -> bool {
        others.iter().any(|other| self.is_touching(other))
    }

    /// Returns true if any box of this mesh collides with any box of `other`
    pub fn is_colliding(&self, other: &impl Shape) -> bool {
        let other = other.to_collision_mesh();
        self.boxes.iter().any(|b| b.some_colliding(&other.boxes))
    }

    pub fn some_colliding<S: Shape>(&self, others: &[S]) -> bool {
        others.iter().any(|other| self.is_colliding(other))
    }

    /// First box of `other` colliding with this mesh
    pub fn colliding(&self, other: &impl Shape) -> Option<BoundingBox> {
        let other = other.to_collision_mesh();
        self.boxes
            .iter()
            .find_map(|b| b.colliding(&other.boxes).copied())
    }
}

impl Shape for CollisionMesh {
    fn to_vector(&self) -> Vector {
        self.to_bounding_box().position()
    }

    fn to_bounding_box(&self) -> BoundingBox {
        self.bounds().unwrap_or(BoundingBox::NAN)
    }

    fn to_collision_mesh(&self) -> CollisionMesh {
        self.clone()
    }
}

impl From<BoundingBox> for CollisionMesh {
    fn from(bounds: BoundingBox) -> Self {
        Self::new(vec![bounds])
    }
}

impl FromIterator<BoundingBox> for CollisionMesh {
    fn from_iter<I: IntoIterator<Item = BoundingBox>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Extend<BoundingBox> for CollisionMesh {
    fn extend<I: IntoIterator<Item = BoundingBox>>(&mut self, iter: I) {
        self.boxes.extend(iter);
    }
}
