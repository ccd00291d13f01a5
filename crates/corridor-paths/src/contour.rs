//! Boundary tracing of the blocked regions of a [`Grid`].
//!
//! Boundaries live on the lattice between cells. Maximal horizontal and
//! vertical boundary runs are found by scanning rows and columns, their
//! endpoints are matched at shared lattice points, and the resulting chains
//! are unwound into closed loops of alternating horizontal/vertical legs.

use corridor_core::{Grid, Point};

/// Direction in which loops are walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Winding {
    Clockwise,
    #[default]
    CounterClockwise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone)]
struct Segment {
    start: i32,
    end: i32,
    axis: Axis,
    /// Fixed coordinate: y for horizontal runs, x for vertical ones.
    height: i32,
    visited: bool,
    next: Option<usize>,
    prev: Option<usize>,
}

impl Segment {
    fn new(start: usize, end: usize, axis: Axis, height: usize) -> Self {
        Self {
            start: start as i32,
            end: end as i32,
            axis,
            height: height as i32,
            visited: false,
            next: None,
            prev: None,
        }
    }

    fn endpoints(&self) -> [Point; 2] {
        match self.axis {
            Axis::Horizontal => [
                Point::new(self.start, self.height),
                Point::new(self.end, self.height),
            ],
            Axis::Vertical => [
                Point::new(self.height, self.start),
                Point::new(self.height, self.end),
            ],
        }
    }

    /// The lattice point a walk emits for this segment.
    fn emitted(&self) -> Point {
        match self.axis {
            Axis::Horizontal => Point::new(self.start, self.height),
            Axis::Vertical => Point::new(self.height, self.end),
        }
    }
}

/// Scan `rows × cols` cells (`blocked(row, col)`) for boundary runs parallel
/// to the rows, pushing them onto `out`.
fn parallel_segments(
    rows: usize,
    cols: usize,
    blocked: impl Fn(usize, usize) -> bool,
    axis: Axis,
    out: &mut Vec<Segment>,
) {
    // First row: runs bounded by the outside above.
    let mut a = false;
    let mut x0 = 0;
    for j in 0..cols {
        let b = blocked(0, j);
        if b == a {
            continue;
        }
        if a {
            out.push(Segment::new(x0, j, axis, 0));
        }
        if b {
            x0 = j;
        }
        a = b;
    }
    if a {
        out.push(Segment::new(x0, cols, axis, 0));
    }

    // Interior lines: compare each row with the one above it.
    for i in 1..rows {
        let (mut a, mut b) = (false, false);
        let mut x0 = 0;
        let emit = |a: bool, b: bool, x0: usize, j: usize, out: &mut Vec<Segment>| {
            if a != b {
                if a {
                    out.push(Segment::new(j, x0, axis, i));
                } else {
                    out.push(Segment::new(x0, j, axis, i));
                }
            }
        };
        for j in 0..cols {
            let c = blocked(i - 1, j);
            let d = blocked(i, j);
            if c == a && d == b {
                continue;
            }
            emit(a, b, x0, j, out);
            if c != d {
                x0 = j;
            }
            a = c;
            b = d;
        }
        emit(a, b, x0, cols, out);
    }

    // Last row: runs bounded by the outside below, walked backwards.
    let mut a = false;
    let mut x0 = 0;
    for j in 0..cols {
        let b = blocked(rows - 1, j);
        if b == a {
            continue;
        }
        if a {
            out.push(Segment::new(j, x0, axis, rows));
        }
        if b {
            x0 = j;
        }
        a = b;
    }
    if a {
        out.push(Segment::new(cols, x0, axis, rows));
    }
}

#[derive(Debug, Clone, Copy)]
struct Endpoint {
    pos: Point,
    segment: usize,
    is_end: bool,
}

fn sorted_endpoints(segments: &[Segment], range: std::ops::Range<usize>) -> Vec<Endpoint> {
    let mut out = Vec::with_capacity(range.len() * 2);
    for i in range {
        let [s, e] = segments[i].endpoints();
        out.push(Endpoint {
            pos: s,
            segment: i,
            is_end: false,
        });
        out.push(Endpoint {
            pos: e,
            segment: i,
            is_end: true,
        });
    }
    out.sort_by_key(|v| (v.pos.x, v.pos.y, v.is_end));
    out
}

/// Trace the boundary loops of every blocked region (and every hole inside
/// one). Each loop is a closed sequence of lattice points; consecutive points
/// differ in exactly one coordinate.
///
/// A grid with no blocked cell, or no free cell, has no loops.
pub fn trace_contours(grid: &Grid, winding: Winding) -> Vec<Vec<Point>> {
    let blocked = grid.blocked_count();
    if blocked == 0 || blocked == grid.bounds().len() {
        return Vec::new();
    }
    let (w, h) = (grid.width() as usize, grid.height() as usize);
    let cell = |x: usize, y: usize| grid.is_blocked(Point::new(x as i32, y as i32));

    let mut segments = Vec::new();
    parallel_segments(h, w, |i, j| cell(j, i), Axis::Horizontal, &mut segments);
    let nh = segments.len();
    parallel_segments(w, h, |i, j| cell(i, j), Axis::Vertical, &mut segments);

    let hverts = sorted_endpoints(&segments, 0..nh);
    let vverts = sorted_endpoints(&segments, nh..segments.len());
    for (hv, vv) in hverts.iter().zip(&vverts) {
        let (hs, vs) = (hv.segment, vv.segment);
        if hv.is_end {
            segments[hs].next = Some(vs);
            segments[vs].prev = Some(hs);
        } else {
            segments[hs].prev = Some(vs);
            segments[vs].next = Some(hs);
        }
    }

    let mut loops = Vec::new();
    for first in 0..nh {
        if segments[first].visited {
            continue;
        }
        let mut points = Vec::new();
        let mut cur = Some(first);
        while let Some(i) = cur {
            let seg = &mut segments[i];
            if seg.visited {
                break;
            }
            seg.visited = true;
            points.push(seg.emitted());
            cur = match winding {
                Winding::Clockwise => seg.next,
                Winding::CounterClockwise => seg.prev,
            };
        }
        loops.push(points);
    }
    loops
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(v: &[(i32, i32)]) -> Vec<Point> {
        v.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn assert_axis_aligned(lp: &[Point]) {
        for i in 0..lp.len() {
            let a = lp[i];
            let b = lp[(i + 1) % lp.len()];
            assert!(
                (a.x == b.x) != (a.y == b.y),
                "{a} -> {b} is not a single axis-aligned leg"
            );
        }
    }

    #[test]
    fn single_cell_both_windings() {
        let g = Grid::parse("...\n.#.\n...").unwrap();
        let ccw = trace_contours(&g, Winding::CounterClockwise);
        assert_eq!(ccw, vec![pts(&[(1, 1), (1, 2), (2, 2), (2, 1)])]);
        let cw = trace_contours(&g, Winding::Clockwise);
        assert_eq!(cw, vec![pts(&[(1, 1), (2, 1), (2, 2), (1, 2)])]);
    }

    #[test]
    fn empty_and_full_grids_have_no_loops() {
        let free = Grid::new(4, 3).unwrap();
        assert!(trace_contours(&free, Winding::default()).is_empty());
        let full = Grid::parse("##\n##").unwrap();
        assert!(trace_contours(&full, Winding::default()).is_empty());
    }

    #[test]
    fn separate_obstacles_give_separate_loops() {
        let g = Grid::parse(
            "\
            ......
            .##...
            ....#.
            ....#.",
        )
        .unwrap();
        let loops = trace_contours(&g, Winding::CounterClockwise);
        assert_eq!(loops.len(), 2);
        for lp in &loops {
            assert_eq!(lp.len(), 4);
            assert_axis_aligned(lp);
        }
    }

    #[test]
    fn ring_has_outer_loop_and_hole() {
        let g = Grid::parse(
            "\
            .....
            .###.
            .#.#.
            .###.
            .....",
        )
        .unwrap();
        let loops = trace_contours(&g, Winding::CounterClockwise);
        assert_eq!(loops.len(), 2);
        let mut sizes: Vec<usize> = loops.iter().map(Vec::len).collect();
        sizes.sort();
        assert_eq!(sizes, vec![4, 4]);
        for lp in &loops {
            assert_axis_aligned(lp);
        }
    }

    #[test]
    fn l_shape_has_six_turns() {
        let g = Grid::parse(
            "\
            ....
            .#..
            .##.
            ....",
        )
        .unwrap();
        let loops = trace_contours(&g, Winding::CounterClockwise);
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 6);
        assert_axis_aligned(&loops[0]);
    }

    #[test]
    fn obstacle_touching_the_border() {
        let g = Grid::parse("#..\n...").unwrap();
        let loops = trace_contours(&g, Winding::CounterClockwise);
        assert_eq!(loops, vec![pts(&[(0, 0), (0, 1), (1, 1), (1, 0)])]);
    }
}
