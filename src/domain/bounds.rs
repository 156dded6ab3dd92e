//! Axis-aligned bounding boxes
//!
//! `BoundingBox` carries every positional predicate the docking code relies on.
//! Two predicates deserve care:
//! - `is_touching` means flush edges: an exact shared coordinate on one axis with
//!   overlapping (inclusive) projections on the other. It never means overlap.
//! - `is_colliding` means strictly positive overlapping area. Boxes that only
//!   touch do not collide.
//!
//! Boxes are expected to be normalized (`left <= right`, `top <= bottom`) but
//! this is not enforced.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::domain::core::{Shape, Vector};
use crate::domain::mesh::CollisionMesh;

/// Errors produced while interpreting geometry input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("Unknown resize anchor '{0}' (expected top-left, top-right, bottom-left or bottom-right)")]
    UnknownAnchor(String),
}

/// One of the four edges of a box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Left,
    Top,
    Right,
    Bottom,
}

impl Edge {
    /// All edges in enumeration order, which is also the tie-break order
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Top, Edge::Right, Edge::Bottom];

    pub fn as_str(self) -> &'static str {
        match self {
            Edge::Left => "left",
            Edge::Top => "top",
            Edge::Right => "right",
            Edge::Bottom => "bottom",
        }
    }

    /// The edge facing this one on an adjacent box
    pub fn opposite(self) -> Edge {
        match self {
            Edge::Left => Edge::Right,
            Edge::Top => Edge::Bottom,
            Edge::Right => Edge::Left,
            Edge::Bottom => Edge::Top,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed point used by `BoundingBox::resize_to`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Anchor {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// Arbitrary point, not necessarily inside the box
    Point(Vector),
}

impl Anchor {
    /// Resolves the anchor to a concrete point for the given box
    pub fn resolve(&self, bounds: &BoundingBox) -> Vector {
        let size = bounds.size();
        let mut point = bounds.position();
        match self {
            Anchor::TopLeft => {}
            Anchor::TopRight => point.left += size.left,
            Anchor::BottomLeft => point.top += size.top,
            Anchor::BottomRight => {
                point.left += size.left;
                point.top += size.top;
            }
            Anchor::Point(p) => point = *p,
        }
        point
    }
}

impl FromStr for Anchor {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top-left" => Ok(Anchor::TopLeft),
            "top-right" => Ok(Anchor::TopRight),
            "bottom-left" => Ok(Anchor::BottomLeft),
            "bottom-right" => Ok(Anchor::BottomRight),
            other => Err(GeometryError::UnknownAnchor(other.to_string())),
        }
    }
}

/// Result of intersecting two boxes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intersection {
    /// Overlap with positive extent on at least one axis (may be a zero-width strip)
    Area(BoundingBox),
    /// The boxes meet at a single corner point
    Point(Vector),
}

/// Rectangle in desktop coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl BoundingBox {
    /// Box that matches no predicate; the projection of an empty mesh
    pub const NAN: BoundingBox = BoundingBox {
        left: f64::NAN,
        top: f64::NAN,
        right: f64::NAN,
        bottom: f64::NAN,
    };

    /// Creates a new box from its four edges
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Copies the enclosing box of any shape
    pub fn from_shape(shape: &impl Shape) -> Self {
        shape.to_bounding_box()
    }

    /// Returns true if any coordinate is NaN
    pub fn is_nan(&self) -> bool {
        self.left.is_nan() || self.top.is_nan() || self.right.is_nan() || self.bottom.is_nan()
    }

    pub fn width(&self) -> f64 {
        (self.right - self.left).abs()
    }

    pub fn height(&self) -> f64 {
        (self.bottom - self.top).abs()
    }

    /// Width and height packed as a vector
    pub fn size(&self) -> Vector {
        Vector::new(self.width(), self.height())
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Top-left corner
    pub fn position(&self) -> Vector {
        Vector::new(self.left, self.top)
    }

    pub fn center_position(&self) -> Vector {
        Vector::new(
            self.left + self.width() / 2.0,
            self.top + self.height() / 2.0,
        )
    }

    /// Per-edge difference between this box and `other`
    pub fn difference(&self, other: &impl Shape) -> BoundingBox {
        let other = other.to_bounding_box();
        BoundingBox::new(
            self.left - other.left,
            self.top - other.top,
            self.right - other.right,
            self.bottom - other.bottom,
        )
    }

    /// Top-left position this box would need to be centered on `other`
    pub fn centered_on_position(&self, other: &impl Shape) -> Vector {
        let other = other.to_bounding_box();
        let mut offset = self.center_position();
        offset.subtract(&self.position());
        let mut position = other.center_position();
        position.subtract(&offset);
        position
    }

    /// Intersection of two boxes
    ///
    /// Boxes that only share an edge produce a zero-width (or zero-height) `Area`;
    /// boxes that only share a corner produce a `Point`.
    pub fn intersection(&self, other: &impl Shape) -> Option<Intersection> {
        let other = other.to_bounding_box();
        // f64::max/min skip NaN operands
        if self.is_nan() || other.is_nan() {
            return None;
        }
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);

        if (left < right && top <= bottom) || (left == right && top < bottom) {
            Some(Intersection::Area(BoundingBox::new(left, top, right, bottom)))
        } else if left == right && top == bottom {
            Some(Intersection::Point(Vector::new(left, top)))
        } else {
            None
        }
    }

    /// Squared distance from the box to a point (0 when the point is inside)
    pub fn distance_squared_to_point(&self, point: &impl Shape) -> f64 {
        let point = point.to_vector();
        let clamped = Vector::new(
            clamp_to(point.left, self.left, self.right),
            clamp_to(point.top, self.top, self.bottom),
        );
        clamped.distance_squared(&point)
    }

    pub fn distance_to_point(&self, point: &impl Shape) -> f64 {
        self.distance_squared_to_point(point).sqrt()
    }

    /// Copies the enclosing box of `other` into this box
    pub fn set(&mut self, other: &impl Shape) -> &mut Self {
        *self = other.to_bounding_box();
        self
    }

    /// Moves the top-left corner, keeping the size; `None` leaves that axis alone
    pub fn move_to(&mut self, left: Option<f64>, top: Option<f64>) -> &mut Self {
        if let Some(left) = left {
            self.right = left + (self.right - self.left);
            self.left = left;
        }
        if let Some(top) = top {
            self.bottom = top + (self.bottom - self.top);
            self.top = top;
        }
        self
    }

    /// Translates the box by the position of `delta`
    pub fn move_by(&mut self, delta: &impl Shape) -> &mut Self {
        let delta = delta.to_vector();
        self.left += delta.left;
        self.right += delta.left;
        self.top += delta.top;
        self.bottom += delta.top;
        self
    }

    /// Rescales the box around `anchor`
    ///
    /// A `None` or zero extent keeps the current extent on that axis. Each edge is
    /// mapped as `anchor + (edge - anchor) * new / old`; resizing an axis whose
    /// current extent is zero yields non-finite coordinates.
    pub fn resize_to(&mut self, width: Option<f64>, height: Option<f64>, anchor: Anchor) -> &mut Self {
        let current = self.size();
        let width = width.filter(|w| *w != 0.0).unwrap_or(current.left);
        let height = height.filter(|h| *h != 0.0).unwrap_or(current.top);
        let anchor = anchor.resolve(self);

        if width != current.left {
            let scale = width / current.left;
            self.left = anchor.left + (self.left - anchor.left) * scale;
            self.right = anchor.left + (self.right - anchor.left) * scale;
        }
        if height != current.top {
            let scale = height / current.top;
            self.top = anchor.top + (self.top - anchor.top) * scale;
            self.bottom = anchor.top + (self.bottom - anchor.top) * scale;
        }
        self
    }

    /// Returns true if `other` lies within this box or on its edges
    pub fn is_contains(&self, other: &impl Shape) -> bool {
        let other = other.to_bounding_box();
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    pub fn some_contains<S: Shape>(&self, others: &[S]) -> bool {
        others.iter().any(|other| self.is_contains(other))
    }

    /// Returns true if the boxes share an edge without overlapping
    pub fn is_touching(&self, other: &impl Shape) -> bool {
        let other = other.to_bounding_box();
        (self.overlaps_vertically(&other)
            && (self.left == other.right || self.right == other.left))
            || (self.overlaps_horizontally(&other)
                && (self.top == other.bottom || self.bottom == other.top))
    }

    pub fn some_touching<S: Shape>(&self, others: &[S]) -> bool {
        others.iter().any(|other| self.is_touching(other))
    }

    /// Edge of this box touching the first touching candidate
    pub fn edge_touching<S: Shape>(&self, others: &[S]) -> Option<Edge> {
        others.iter().find_map(|other| {
            let other = other.to_bounding_box();
            if self.overlaps_vertically(&other) {
                if self.left == other.right {
                    return Some(Edge::Left);
                }
                if self.right == other.left {
                    return Some(Edge::Right);
                }
            }
            if self.overlaps_horizontally(&other) {
                if self.top == other.bottom {
                    return Some(Edge::Top);
                }
                if self.bottom == other.top {
                    return Some(Edge::Bottom);
                }
            }
            None
        })
    }

    /// Edge of the first touching candidate that touches this box
    pub fn other_edge_touching<S: Shape>(&self, others: &[S]) -> Option<Edge> {
        self.edge_touching(others).map(Edge::opposite)
    }

    /// Edges of this box ranked by the distance from each edge midpoint to `other`
    ///
    /// Nearest first; ties keep the `Edge::ALL` order.
    pub fn edge_closest_order(&self, other: &impl Shape) -> [Edge; 4] {
        let other = other.to_bounding_box();
        let center = self.center_position();
        let mut ranked = [
            (Edge::Left, Vector::new(self.left, center.top)),
            (Edge::Top, Vector::new(center.left, self.top)),
            (Edge::Right, Vector::new(self.right, center.top)),
            (Edge::Bottom, Vector::new(center.left, self.bottom)),
        ]
        .map(|(edge, midpoint)| (edge, other.distance_squared_to_point(&midpoint)));

        ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        ranked.map(|(edge, _)| edge)
    }

    /// Edge of this box nearest to `other`
    pub fn edge_closest(&self, other: &impl Shape) -> Edge {
        self.edge_closest_order(other)[0]
    }

    /// Returns true if the boxes overlap with strictly positive area
    pub fn is_colliding(&self, other: &impl Shape) -> bool {
        let other = other.to_bounding_box();
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }

    pub fn some_colliding<S: Shape>(&self, others: &[S]) -> bool {
        others.iter().any(|other| self.is_colliding(other))
    }

    /// First candidate colliding with this box
    pub fn colliding<'a, S: Shape>(&self, others: &'a [S]) -> Option<&'a S> {
        others.iter().find(|other| self.is_colliding(*other))
    }

    /// Returns true if any edge coordinate is shared, regardless of projections
    pub fn is_touching_edge(&self, other: &impl Shape) -> bool {
        let other = other.to_bounding_box();
        self.left == other.right
            || self.right == other.left
            || self.top == other.bottom
            || self.bottom == other.top
    }

    fn overlaps_vertically(&self, other: &BoundingBox) -> bool {
        self.top <= other.bottom && self.bottom >= other.top
    }

    fn overlaps_horizontally(&self, other: &BoundingBox) -> bool {
        self.left <= other.right && self.right >= other.left
    }
}

impl Shape for BoundingBox {
    fn to_vector(&self) -> Vector {
        self.position()
    }

    fn to_bounding_box(&self) -> BoundingBox {
        *self
    }

    fn to_collision_mesh(&self) -> CollisionMesh {
        CollisionMesh::new(vec![*self])
    }
}

fn clamp_to(value: f64, low: f64, high: f64) -> f64 {
    if value <= low {
        low
    } else if value >= high {
        high
    } else {
        value
    }
}
