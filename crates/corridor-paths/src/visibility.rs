//! Occlusion oracle over a [`Grid`]: a summed-area table answering "does
//! this box contain a blocked cell" in constant time, plus the convex
//! obstacle corners that seed the visibility graph.

use corridor_core::{Grid, Point};

use crate::contour::{Winding, trace_contours};
use crate::orientation::orient_points;

/// Summed-area table and corner set of one grid. Built once, read-only after.
#[derive(Debug, Clone)]
pub(crate) struct VisibilityIndex {
    /// `table[y * width + x]` = blocked cells in `[0, x] × [0, y]`.
    table: Vec<u64>,
    width: i32,
    height: i32,
    corners: Vec<Point>,
}

impl VisibilityIndex {
    pub(crate) fn new(grid: &Grid) -> Self {
        let (w, h) = (grid.width(), grid.height());
        let wu = w as usize;
        let mut table = vec![0u64; wu * h as usize];
        for y in 0..h as usize {
            let mut row = 0u64;
            for x in 0..wu {
                row += u64::from(grid.is_blocked(Point::new(x as i32, y as i32)));
                let above = if y > 0 { table[(y - 1) * wu + x] } else { 0 };
                table[y * wu + x] = row + above;
            }
        }
        let corners = find_corners(grid);
        Self {
            table,
            width: w,
            height: h,
            corners,
        }
    }

    /// Convex obstacle corners, deduplicated and sorted by `(x, y)`.
    pub(crate) fn corners(&self) -> &[Point] {
        &self.corners
    }

    fn integrate(&self, x: i32, y: i32) -> u64 {
        if x < 0 || y < 0 {
            return 0;
        }
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        self.table[y * self.width as usize + x]
    }

    /// Whether the inclusive box spanned by `a` and `b` holds a blocked cell.
    /// The part of the box outside the grid is not counted.
    pub(crate) fn stab_box(&self, a: Point, b: Point) -> bool {
        let (lox, hix) = (a.x.min(b.x), a.x.max(b.x));
        let (loy, hiy) = (a.y.min(b.y), a.y.max(b.y));
        // Signed arithmetic: the partial terms may exceed the final sum.
        let s = self.integrate(hix, hiy) as i128 - self.integrate(lox - 1, hiy) as i128
            - self.integrate(hix, loy - 1) as i128
            + self.integrate(lox - 1, loy - 1) as i128;
        s > 0
    }

    /// Whether the horizontal run from `v` to column `x` is blocked.
    pub(crate) fn stab_ray(&self, v: Point, x: i32) -> bool {
        self.stab_box(v, Point::new(x, v.y))
    }

    pub(crate) fn stab_tile(&self, p: Point) -> bool {
        self.stab_box(p, p)
    }
}

/// Walk every contour loop and keep the free cell diagonally outside each
/// convex turn.
fn find_corners(grid: &Grid) -> Vec<Point> {
    let mut corners = Vec::new();
    for lp in trace_contours(grid, Winding::CounterClockwise) {
        let n = lp.len();
        for i in 0..n {
            let a = lp[(i + n - 1) % n];
            let b = lp[i];
            let c = lp[(i + 1) % n];
            if orient_points(a, b, c) <= 0.0 {
                continue;
            }
            let offset = |bj: i32, aj: i32, cj: i32| {
                let d = if bj - aj != 0 { bj - aj } else { bj - cj };
                bj + d.signum().min(0)
            };
            let p = Point::new(offset(b.x, a.x, c.x), offset(b.y, a.y, c.y));
            if grid.contains(p) && !grid.is_blocked(p) {
                corners.push(p);
            }
        }
    }
    corners.sort_by_key(|p| (p.x, p.y));
    corners.dedup();
    corners
}
