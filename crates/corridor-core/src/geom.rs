//! Geometry primitives: [`Point`] and [`Range`].
//!
//! Points address grid cells. A contour vertex lives on the lattice between
//! cells, so the same type is used for both: the cell `(x, y)` spans the unit
//! square whose top-left lattice point is `(x, y)`.

use std::cmp::Ordering;
use std::fmt;

/// A 2D integer point. X grows right, Y grows down.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Self = Self::new(0, 0);

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The four cardinal neighbours: up, right, down, left.
    pub fn neighbors_4(self) -> [Point; 4] {
        let Point { x, y } = self;
        [
            Point::new(x, y - 1),
            Point::new(x + 1, y),
            Point::new(x, y + 1),
            Point::new(x - 1, y),
        ]
    }
}

/// Row-major: by `y`, then by `x`.
impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A half-open rectangle of cells: `min` inclusive, `max` exclusive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub min: Point,
    pub max: Point,
}

impl Range {
    /// The rectangle between two corners, in any order.
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0.min(x1), y0.min(y1)),
            max: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    /// The smallest range holding both cells `a` and `b`.
    pub fn spanning(a: Point, b: Point) -> Self {
        Self::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x) + 1, a.y.max(b.y) + 1)
    }

    #[inline]
    pub fn width(self) -> i32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(self) -> i32 {
        self.max.y - self.min.y
    }

    pub fn is_empty(self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Number of cells.
    pub fn len(self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.width() as usize * self.height() as usize
        }
    }

    pub fn contains(self, p: Point) -> bool {
        (self.min.x..self.max.x).contains(&p.x) && (self.min.y..self.max.y).contains(&p.y)
    }

    /// Cells in row-major order.
    pub fn iter(self) -> RangeIter {
        RangeIter {
            range: self,
            next: 0,
            len: self.len(),
        }
    }
}

impl IntoIterator for Range {
    type Item = Point;
    type IntoIter = RangeIter;

    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.min, self.max)
    }
}

/// Row-major iterator over the cells of a [`Range`].
#[derive(Clone, Debug)]
pub struct RangeIter {
    range: Range,
    next: usize,
    len: usize,
}

impl Iterator for RangeIter {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.next >= self.len {
            return None;
        }
        let w = self.range.width() as usize;
        let (dx, dy) = (self.next % w, self.next / w);
        self.next += 1;
        Some(Point::new(
            self.range.min.x + dx as i32,
            self.range.min.y + dy as i32,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.next;
        (n, Some(n))
    }
}

impl ExactSizeIterator for RangeIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_order() {
        let mut pts = vec![Point::new(2, 1), Point::new(0, 3), Point::new(1, 1)];
        pts.sort();
        assert_eq!(pts, vec![Point::new(1, 1), Point::new(2, 1), Point::new(0, 3)]);
        assert_eq!(Point::new(3, -1).to_string(), "(3, -1)");
    }

    #[test]
    fn neighbours() {
        let n = Point::new(5, 5).neighbors_4();
        assert_eq!(
            n,
            [
                Point::new(5, 4),
                Point::new(6, 5),
                Point::new(5, 6),
                Point::new(4, 5)
            ]
        );
    }

    #[test]
    fn corners_are_canonicalised() {
        let r = Range::new(3, 2, 0, 0);
        assert_eq!(r.min, Point::ZERO);
        assert_eq!(r.max, Point::new(3, 2));
        assert_eq!((r.width(), r.height(), r.len()), (3, 2, 6));
        assert!(r.contains(Point::new(2, 1)));
        assert!(!r.contains(Point::new(3, 0)));
        assert!(!r.contains(Point::new(0, 2)));
    }

    #[test]
    fn iteration() {
        let r = Range::new(1, 1, 4, 3);
        let pts: Vec<Point> = r.iter().collect();
        assert_eq!(r.iter().len(), 6);
        assert_eq!(pts.first(), Some(&Point::new(1, 1)));
        assert_eq!(pts[3], Point::new(1, 2));
        assert_eq!(pts.last(), Some(&Point::new(3, 2)));
        assert!(pts.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(Range::new(2, 2, 2, 5).iter().count(), 0);
    }

    #[test]
    fn spanning_is_inclusive() {
        let r = Range::spanning(Point::new(4, 1), Point::new(2, 3));
        assert_eq!(r, Range::new(2, 1, 5, 4));
        assert_eq!(r.len(), 9);
        assert_eq!(Range::spanning(Point::new(7, 7), Point::new(7, 7)).len(), 1);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn point_and_range_round_trip() {
        let p = Point::new(3, -7);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(serde_json::from_str::<Point>(&json).unwrap(), p);

        let r = Range::new(1, 2, 10, 20);
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(serde_json::from_str::<Range>(&json).unwrap(), r);
    }
}
