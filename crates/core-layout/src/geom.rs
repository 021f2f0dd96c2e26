//! Integer pixel geometry.

use std::ops::{Add, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Half-open rectangle `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub const fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub const fn from_size(size: Size) -> Self {
        Self {
            min: Point::new(0, 0),
            max: Point::new(size.width, size.height),
        }
    }

    pub fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> i32 {
        self.max.y - self.min.y
    }

    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// Largest rectangle contained in both; empty (zeroed) when disjoint.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let r = Rect {
            min: Point::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Point::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        };
        if r.is_empty() { Rect::default() } else { r }
    }

    pub fn translate(&self, by: Point) -> Rect {
        Rect {
            min: self.min + by,
            max: self.max + by,
        }
    }
}

/// Minimum and maximum size the host allows for the editor this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Constraints {
    pub min: Size,
    pub max: Size,
}

impl Constraints {
    pub const fn new(min: Size, max: Size) -> Self {
        Self { min, max }
    }

    /// Clamp `size` into `[min, max]` per axis.
    pub fn constrain(&self, size: Size) -> Size {
        Size::new(
            size.width.clamp(self.min.width, self.max.width.max(self.min.width)),
            size.height
                .clamp(self.min.height, self.max.height.max(self.min.height)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_overlapping_and_disjoint() {
        let a = Rect::new(Point::new(0, 0), Point::new(10, 10));
        let b = Rect::new(Point::new(5, -5), Point::new(20, 5));
        assert_eq!(a.intersect(&b), Rect::new(Point::new(5, 0), Point::new(10, 5)));
        let c = Rect::new(Point::new(11, 11), Point::new(12, 12));
        assert!(a.intersect(&c).is_empty());
    }

    #[test]
    fn translate_moves_both_corners() {
        let r = Rect::from_size(Size::new(4, 2)).translate(Point::new(-1, 3));
        assert_eq!(r, Rect::new(Point::new(-1, 3), Point::new(3, 5)));
        assert_eq!(r.width(), 4);
        assert_eq!(r.height(), 2);
    }

    #[test]
    fn constrain_clamps_each_axis() {
        let cs = Constraints::new(Size::new(10, 0), Size::new(100, 50));
        assert_eq!(cs.constrain(Size::new(5, 80)), Size::new(10, 50));
        assert_eq!(cs.constrain(Size::new(40, 20)), Size::new(40, 20));
    }
}
