//! Geometric primitives for detection post-processing.
//!
//! Provides point and polygon types together with the area, perimeter and
//! axis-aligned extent computations used to score and expand text contours.

use imageproc::contours::Contour;
use serde::{Deserialize, Serialize};

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point {
    /// X-coordinate of the point.
    pub x: f32,
    /// Y-coordinate of the point.
    pub y: f32,
}

impl Point {
    /// Creates a new point with the given coordinates.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A bounding box represented by a collection of points.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    /// The points that define the bounding box, in contour order.
    pub points: Vec<Point>,
}

impl BoundingBox {
    /// Creates a new bounding box from a vector of points.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Creates an axis-aligned rectangle from its corners.
    pub fn from_coords(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::new(vec![
            Point::new(x1, y1),
            Point::new(x2, y1),
            Point::new(x2, y2),
            Point::new(x1, y2),
        ])
    }

    /// Creates a bounding box from a contour traced on a binary mask.
    pub fn from_contour(contour: &Contour<u32>) -> Self {
        Self::new(
            contour
                .points
                .iter()
                .map(|p| Point::new(p.x as f32, p.y as f32))
                .collect(),
        )
    }

    /// Polygon area by the shoelace formula.
    pub fn area(&self) -> f32 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let twice: f32 = (0..n)
            .map(|i| {
                let p = self.points[i];
                let q = self.points[(i + 1) % n];
                p.x * q.y - q.x * p.y
            })
            .sum();
        twice.abs() / 2.0
    }

    /// Length of the closed polygon outline.
    pub fn perimeter(&self) -> f32 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        (0..n)
            .map(|i| {
                let p = self.points[i];
                let q = self.points[(i + 1) % n];
                ((q.x - p.x).powi(2) + (q.y - p.y).powi(2)).sqrt()
            })
            .sum()
    }

    /// Smallest x-coordinate of the box.
    pub fn x_min(&self) -> f32 {
        self.points.iter().map(|p| p.x).fold(f32::INFINITY, f32::min)
    }

    /// Smallest y-coordinate of the box.
    pub fn y_min(&self) -> f32 {
        self.points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min)
    }

    /// Largest x-coordinate of the box.
    pub fn x_max(&self) -> f32 {
        self.points
            .iter()
            .map(|p| p.x)
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// Largest y-coordinate of the box.
    pub fn y_max(&self) -> f32 {
        self.points
            .iter()
            .map(|p| p.y)
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// Axis-aligned enclosing rectangle as `(xmin, ymin, xmax, ymax)`.
    pub fn aabb(&self) -> (f32, f32, f32, f32) {
        (self.x_min(), self.y_min(), self.x_max(), self.y_max())
    }
}
