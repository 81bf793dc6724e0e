//! Signed distance shapes
//!
//! Every shape answers two questions about a point: how far is the boundary
//! (negative inside), and which way is out. Leaf shapes live in a unit local
//! space; `Transform` and `Bloated` wrap an inner shape to place and grow it.

use serde::Serialize;

use crate::consts::NORMAL_EPS;
use crate::error::ShapeError;
use crate::{Rotate, Vec2D};

/// A signed distance field over the plane
pub trait Sdf {
    /// Signed distance to the boundary (negative inside)
    fn distance(&self, p: Vec2D) -> f64;

    /// Outward surface normal, estimated by central differences
    fn normal(&self, p: Vec2D) -> Vec2D {
        sdf_gradient(p, |q| self.distance(q))
    }
}

/// Compute SDF gradient (surface normal) using central differences
///
/// Returns the zero vector where the gradient vanishes (e.g. a circle's center).
pub fn sdf_gradient<F>(p: Vec2D, sdf: F) -> Vec2D
where
    F: Fn(Vec2D) -> f64,
{
    let dx = sdf(p + Vec2D::new(NORMAL_EPS, 0.0)) - sdf(p - Vec2D::new(NORMAL_EPS, 0.0));
    let dy = sdf(p + Vec2D::new(0.0, NORMAL_EPS)) - sdf(p - Vec2D::new(0.0, NORMAL_EPS));
    Vec2D::new(dx, dy).normalize_or_zero()
}

/// Unit circle at the origin
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Circle;

impl Sdf for Circle {
    #[inline]
    fn distance(&self, p: Vec2D) -> f64 {
        p.length() - 1.0
    }
}

/// Axis-aligned box centered at the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    /// Full width and height
    pub size: Vec2D,
}

impl Rect {
    pub fn new(size: Vec2D) -> Self {
        Self { size }
    }
}

impl Sdf for Rect {
    fn distance(&self, p: Vec2D) -> f64 {
        let diff = p.abs() - self.size * 0.5;
        let positive = diff.max(Vec2D::ZERO).length();
        let negative = diff.x.max(diff.y).min(0.0);
        positive + negative
    }
}

/// Uniform scale, then rotation, then translation of an inner shape
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transform {
    pub inner: Box<Shape>,
    scale: f64,
    /// Radians, counter-clockwise
    pub rotation: f64,
    pub translate: Vec2D,
}

impl Transform {
    pub fn new(
        inner: impl Into<Shape>,
        scale: f64,
        rotation: f64,
        translate: Vec2D,
    ) -> Result<Self, ShapeError> {
        check_scale(scale)?;
        Ok(Self {
            inner: Box::new(inner.into()),
            scale,
            rotation,
            translate,
        })
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) -> Result<(), ShapeError> {
        check_scale(scale)?;
        self.scale = scale;
        Ok(())
    }

    /// Map a local point into world space
    pub fn to_world(&self, p: Vec2D) -> Vec2D {
        (p * self.scale).rotated(self.rotation) + self.translate
    }

    /// Map a world point into local space
    pub fn to_local(&self, p: Vec2D) -> Vec2D {
        (p - self.translate).rotated(-self.rotation) / self.scale
    }
}

fn check_scale(scale: f64) -> Result<(), ShapeError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(ShapeError::InvalidScale(scale))
    }
}

impl Sdf for Transform {
    fn distance(&self, p: Vec2D) -> f64 {
        self.inner.distance(self.to_local(p)) * self.scale
    }

    // Only rotation needs undoing: the scale is uniform.
    fn normal(&self, p: Vec2D) -> Vec2D {
        self.inner.normal(self.to_local(p)).rotated(self.rotation)
    }
}

/// Inner shape grown outward by `radius` (Minkowski sum with a disk)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bloated {
    pub inner: Box<Shape>,
    pub radius: f64,
}

impl Bloated {
    pub fn new(inner: impl Into<Shape>, radius: f64) -> Self {
        Self {
            inner: Box::new(inner.into()),
            radius,
        }
    }
}

impl Sdf for Bloated {
    fn distance(&self, p: Vec2D) -> f64 {
        self.inner.distance(p) - self.radius
    }

    fn normal(&self, p: Vec2D) -> Vec2D {
        self.inner.normal(p)
    }
}

/// Any shape, leaf or composite
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Shape {
    Circle(Circle),
    Rect(Rect),
    Transform(Transform),
    Bloated(Bloated),
}

impl Shape {
    pub fn circle() -> Self {
        Shape::Circle(Circle)
    }

    pub fn rect(width: f64, height: f64) -> Self {
        Shape::Rect(Rect::new(Vec2D::new(width, height)))
    }
}

impl Sdf for Shape {
    fn distance(&self, p: Vec2D) -> f64 {
        match self {
            Shape::Circle(s) => s.distance(p),
            Shape::Rect(s) => s.distance(p),
            Shape::Transform(s) => s.distance(p),
            Shape::Bloated(s) => s.distance(p),
        }
    }

    fn normal(&self, p: Vec2D) -> Vec2D {
        match self {
            Shape::Circle(s) => s.normal(p),
            Shape::Rect(s) => s.normal(p),
            Shape::Transform(s) => s.normal(p),
            Shape::Bloated(s) => s.normal(p),
        }
    }
}

impl From<Circle> for Shape {
    fn from(s: Circle) -> Self {
        Shape::Circle(s)
    }
}

impl From<Rect> for Shape {
    fn from(s: Rect) -> Self {
        Shape::Rect(s)
    }
}

impl From<Transform> for Shape {
    fn from(s: Transform) -> Self {
        Shape::Transform(s)
    }
}

impl From<Bloated> for Shape {
    fn from(s: Bloated) -> Self {
        Shape::Bloated(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    fn v(x: f64, y: f64) -> Vec2D {
        Vec2D::new(x, y)
    }

    #[test]
    fn test_circle_sign_convention() {
        let c = Circle;
        assert_eq!(c.distance(v(0.0, 0.0)), -1.0);
        assert_eq!(c.distance(v(2.0, 0.0)), 1.0);
        assert_eq!(c.distance(v(1.0, 0.0)), 0.0);
    }

    #[test]
    fn test_rect_containment() {
        let r = Rect::new(v(30.0, 30.0));
        assert!(r.distance(v(0.0, 0.0)) < 0.0);
        assert!(r.distance(v(20.0, 0.0)) > 0.0);
        assert_eq!(r.distance(v(15.0, 0.0)), 0.0);
        // Outside a corner the distance is Euclidean
        assert!((r.distance(v(18.0, 19.0)) - 5.0).abs() < 1e-12);
        // Inside, the nearest face wins
        assert_eq!(r.distance(v(10.0, 2.0)), -5.0);
    }

    #[test]
    fn test_degenerate_rect_is_a_segment() {
        let r = Rect::new(v(48.0, 0.0));
        assert_eq!(r.distance(v(0.0, 3.0)), 3.0);
        assert_eq!(r.distance(v(27.0, 4.0)), 5.0);
    }

    #[test]
    fn test_transform_consistency() {
        let t = Transform::new(Circle, 5.0, 0.0, v(10.0, 10.0)).unwrap();
        assert_eq!(t.distance(v(10.0, 10.0)), -5.0);
        assert_eq!(t.distance(v(15.0, 10.0)), 0.0);
    }

    #[test]
    fn test_transform_rotation() {
        // 40x10 box rotated a quarter turn becomes 10x40
        let t = Transform::new(Rect::new(v(40.0, 10.0)), 1.0, FRAC_PI_2, v(0.0, 0.0)).unwrap();
        assert!((t.distance(v(0.0, 20.0))).abs() < 1e-9);
        assert!((t.distance(v(5.0, 0.0))).abs() < 1e-9);
        assert!(t.distance(v(20.0, 0.0)) > 0.0);
    }

    #[test]
    fn test_transform_round_trip() {
        let t = Transform::new(Circle, 2.5, 0.8, v(-3.0, 7.0)).unwrap();
        let p = v(4.0, -1.5);
        assert!((t.to_local(t.to_world(p)) - p).length() < 1e-12);
        assert!((t.to_world(t.to_local(p)) - p).length() < 1e-12);
    }

    #[test]
    fn test_transform_rejects_bad_scale() {
        assert_eq!(
            Transform::new(Circle, 0.0, 0.0, Vec2D::ZERO),
            Err(ShapeError::InvalidScale(0.0))
        );
        assert!(Transform::new(Circle, -1.0, 0.0, Vec2D::ZERO).is_err());
        assert!(Transform::new(Circle, f64::NAN, 0.0, Vec2D::ZERO).is_err());

        let mut t = Transform::new(Circle, 1.0, 0.0, Vec2D::ZERO).unwrap();
        assert!(t.set_scale(-2.0).is_err());
        assert_eq!(t.scale(), 1.0);
        t.set_scale(3.0).unwrap();
        assert_eq!(t.distance(Vec2D::ZERO), -3.0);
    }

    #[test]
    fn test_bloated_distance() {
        let b = Bloated::new(Rect::new(v(48.0, 0.0)), 5.0);
        assert_eq!(b.distance(v(0.0, 5.0)), 0.0);
        assert_eq!(b.distance(v(0.0, 0.0)), -5.0);
        assert_eq!(b.distance(v(0.0, 8.0)), 3.0);
    }

    #[test]
    fn test_circle_normal_points_outward() {
        let n = Circle.normal(v(3.0, 4.0));
        assert!((n - v(0.6, 0.8)).length() < 1e-6);
    }

    #[test]
    fn test_normal_at_singularity_is_zero() {
        assert_eq!(Circle.normal(Vec2D::ZERO), Vec2D::ZERO);
    }

    #[test]
    fn test_transform_normal_is_rotated_back() {
        let t = Transform::new(Rect::new(v(40.0, 10.0)), 2.0, FRAC_PI_4, v(5.0, 5.0)).unwrap();
        // Point above the long face in local space
        let p = t.to_world(v(0.0, 10.0));
        let n = t.normal(p);
        let expected = v(0.0, 1.0).rotated(FRAC_PI_4);
        assert!((n - expected).length() < 1e-6);
    }

    #[test]
    fn test_transform_normal_matches_world_differencing() {
        // Rotation-only normal correction holds because scale is uniform
        let t = Transform::new(
            Bloated::new(Rect::new(v(20.0, 6.0)), 1.5),
            3.0,
            0.6,
            v(-12.0, 4.0),
        )
        .unwrap();
        for p in [v(40.0, 30.0), v(-60.0, 10.0), v(0.0, -45.0), v(-12.0, 40.0)] {
            let composed = t.normal(p);
            let differenced = sdf_gradient(p, |q| t.distance(q));
            assert!((composed - differenced).length() < 1e-4, "at {p}");
        }
    }

    #[test]
    fn test_shape_dispatch() {
        let shape: Shape =
            Transform::new(Bloated::new(Shape::rect(10.0, 10.0), 2.0), 1.0, 0.0, v(1.0, 1.0))
                .unwrap()
                .into();
        assert_eq!(shape.distance(v(1.0, 8.0)), 0.0);
        assert!((shape.normal(v(1.0, 20.0)) - v(0.0, 1.0)).length() < 1e-9);
    }

    fn sample_shapes() -> Vec<Shape> {
        vec![
            Shape::circle(),
            Shape::rect(30.0, 12.0),
            Transform::new(Circle, 5.0, 0.3, v(10.0, -4.0)).unwrap().into(),
            Transform::new(Bloated::new(Shape::rect(48.0, 0.0), 5.0), 1.5, -1.1, v(-8.0, 2.0))
                .unwrap()
                .into(),
        ]
    }

    proptest! {
        #[test]
        fn prop_normal_is_unit_length(x in -100.0f64..100.0, y in -100.0f64..100.0) {
            let p = Vec2D::new(x, y);
            for shape in sample_shapes() {
                let n = shape.normal(p);
                // Zero only exactly on a singularity of the gradient
                if n != Vec2D::ZERO {
                    prop_assert!((n.length() - 1.0).abs() < 1e-9);
                }
            }
        }

        #[test]
        fn prop_distance_is_lipschitz(
            x in -100.0f64..100.0, y in -100.0f64..100.0,
            dx in -5.0f64..5.0, dy in -5.0f64..5.0,
        ) {
            let p = Vec2D::new(x, y);
            let q = p + Vec2D::new(dx, dy);
            for shape in sample_shapes() {
                let delta = (shape.distance(p) - shape.distance(q)).abs();
                prop_assert!(delta <= (p - q).length() + 1e-9);
            }
        }
    }
}
