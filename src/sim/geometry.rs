//! Geometry kernel: points, rects, segments and rays
//!
//! Screen coordinates: x grows right, y grows down. A point and a vector
//! share the same representation (`glam::Vec2`); `UP` is `(0, -1)`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub type Point = Vec2;
pub type Vector = Vec2;

pub const LEFT: Vector = Vec2::new(-1.0, 0.0);
pub const RIGHT: Vector = Vec2::new(1.0, 0.0);
pub const UP: Vector = Vec2::new(0.0, -1.0);
pub const DOWN: Vector = Vec2::new(0.0, 1.0);

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Point, b: Point) -> f32 {
    (b - a).length()
}

#[inline]
pub fn magnitude(p: Vector) -> f32 {
    p.length()
}

/// Unit vector in the direction of `p`, or zero when `p` has no length
#[inline]
pub fn normalize(p: Vector) -> Vector {
    let m = magnitude(p);
    if m == 0.0 { Vec2::ZERO } else { p / m }
}

/// Direction of `p` in radians, 0 for the zero vector
#[inline]
pub fn angle(p: Vector) -> f32 {
    let n = normalize(p);
    n.y.atan2(n.x)
}

#[inline]
pub fn from_angle_radians(radians: f32) -> Vector {
    Vec2::new(radians.cos(), radians.sin())
}

#[inline]
pub fn is_pointing_upward(v: Vector) -> bool {
    v.y < 0.0
}

#[inline]
pub fn is_pointing_downward(v: Vector) -> bool {
    v.y > 0.0
}

#[inline]
pub fn is_pointing_leftward(v: Vector) -> bool {
    v.x < 0.0
}

#[inline]
pub fn is_pointing_rightward(v: Vector) -> bool {
    v.x > 0.0
}

/// Intersection point of segments `a0-a1` and `b0-b1`
///
/// Returns `None` for zero-length segments, parallel segments, or when the
/// crossing lies outside either segment.
pub fn segment_intersection(a0: Point, a1: Point, b0: Point, b1: Point) -> Option<Point> {
    if a0 == a1 || b0 == b1 {
        return None;
    }

    let denominator = (b1.y - b0.y) * (a1.x - a0.x) - (b1.x - b0.x) * (a1.y - a0.y);
    if denominator == 0.0 {
        return None;
    }

    let ua = ((b1.x - b0.x) * (a0.y - b0.y) - (b1.y - b0.y) * (a0.x - b0.x)) / denominator;
    let ub = ((a1.x - a0.x) * (a0.y - b0.y) - (a1.y - a0.y) * (a0.x - b0.x)) / denominator;

    if !(0.0..=1.0).contains(&ua) || !(0.0..=1.0).contains(&ub) {
        return None;
    }

    Some(a0 + (a1 - a0) * ua)
}

/// Axis-aligned rectangle, `x,y` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rect of size `w`x`h` centered on `center`
    pub fn from_center(center: Point, w: f32, h: f32) -> Self {
        Self::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    /// Smallest rect containing every point (zero rect for no points)
    pub fn from_points(points: &[Point]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        let (min, max) = points
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    pub fn top_left(&self) -> Point {
        Vec2::new(self.left(), self.top())
    }

    pub fn top_center(&self) -> Point {
        Vec2::new(self.center_x(), self.top())
    }

    pub fn top_right(&self) -> Point {
        Vec2::new(self.right(), self.top())
    }

    pub fn bottom_left(&self) -> Point {
        Vec2::new(self.left(), self.bottom())
    }

    pub fn bottom_center(&self) -> Point {
        Vec2::new(self.center_x(), self.bottom())
    }

    pub fn bottom_right(&self) -> Point {
        Vec2::new(self.right(), self.bottom())
    }

    pub fn center(&self) -> Point {
        Vec2::new(self.center_x(), self.center_y())
    }

    pub fn center_left(&self) -> Point {
        Vec2::new(self.left(), self.center_y())
    }

    pub fn center_right(&self) -> Point {
        Vec2::new(self.right(), self.center_y())
    }

    /// Corners clockwise from the top-left
    pub fn corners(&self) -> [Point; 4] {
        [
            self.top_left(),
            self.top_right(),
            self.bottom_right(),
            self.bottom_left(),
        ]
    }

    /// Edges as segments: top, right, bottom, left
    pub fn edges(&self) -> [(Point, Point); 4] {
        let [tl, tr, br, bl] = self.corners();
        [(tl, tr), (tr, br), (br, bl), (bl, tl)]
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.top_left()
    }

    pub fn set_position(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }

    pub fn translate(&mut self, by: Vector) {
        self.x += by.x;
        self.y += by.y;
    }

    pub fn set_left(&mut self, left: f32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.w;
    }

    pub fn set_top(&mut self, top: f32) {
        self.y = top;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.h;
    }

    pub fn set_center(&mut self, center: Point) {
        self.x = center.x - self.w / 2.0;
        self.y = center.y - self.h / 2.0;
    }

    /// Grow by `amount` on every side
    pub fn expand(&self, amount: f32) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.w + amount * 2.0,
            self.h + amount * 2.0,
        )
    }

    pub fn shrink(&self, amount: f32) -> Self {
        self.expand(-amount)
    }

    /// Inclusive containment test on all four sides
    pub fn intersects_point(&self, p: Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// True if any corner of `other` lies inside `self`
    ///
    /// Corner test only: an `other` that straddles `self` without any of its
    /// corners inside reports no intersection. Collision timing relies on this.
    pub fn intersects_rect(&self, other: &Rect) -> bool {
        other.corners().iter().any(|c| self.intersects_point(*c))
    }

    /// Every crossing of segment `start-end` with the rect's edges
    pub fn intersects_line_at(&self, start: Point, end: Point) -> Option<Vec<Point>> {
        let hits: Vec<Point> = self
            .edges()
            .iter()
            .filter_map(|(e0, e1)| segment_intersection(start, end, *e0, *e1))
            .collect();

        (!hits.is_empty()).then_some(hits)
    }

    /// Nearest crossing of the ray `origin + direction * [0, length]`
    pub fn intersects_ray_at(&self, origin: Point, direction: Vector, length: f32) -> Option<Point> {
        let end = origin + direction * length;
        self.intersects_line_at(origin, end)?
            .into_iter()
            .min_by(|a, b| {
                distance(origin, *a)
                    .partial_cmp(&distance(origin, *b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    pub fn intersects_ray_distance(&self, origin: Point, direction: Vector, length: f32) -> Option<f32> {
        self.intersects_ray_at(origin, direction, length)
            .map(|p| distance(origin, p))
    }
}
