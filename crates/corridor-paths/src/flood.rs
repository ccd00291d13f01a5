use std::collections::VecDeque;

use corridor_core::{Grid, Point};

use crate::planner::UNREACHABLE;

/// A position with an associated cost, returned from [`Flood::bfs_map`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathNode {
    pub pos: Point,
    pub cost: i32,
}

/// Breadth-first distance maps over the free cells of a [`Grid`], moving in
/// the four cardinal directions.
///
/// Every cell is expanded, so this is much slower than a
/// [`Planner`](crate::Planner) on large maps. It is useful when a whole
/// distance field is wanted, or to cross-check planner results. Buffers are
/// kept between calls.
#[derive(Debug, Clone, Default)]
pub struct Flood {
    width: i32,
    height: i32,
    map: Vec<i32>,
    queue: VecDeque<usize>,
    results: Vec<PathNode>,
}

impl Flood {
    pub fn new() -> Self {
        Self::default()
    }

    fn idx(&self, p: Point) -> Option<usize> {
        if p.x < 0 || p.y < 0 || p.x >= self.width || p.y >= self.height {
            return None;
        }
        Some(p.y as usize * self.width as usize + p.x as usize)
    }

    fn point(&self, i: usize) -> Point {
        let w = self.width as usize;
        Point::new((i % w) as i32, (i / w) as i32)
    }

    /// Compute a multi-source distance map.
    ///
    /// Each step has cost 1. Sources on blocked cells or outside the grid
    /// are ignored. Expansion stops when the distance exceeds `max_dist`.
    /// Returns every reached cell, in the order reached.
    pub fn bfs_map(&mut self, grid: &Grid, sources: &[Point], max_dist: i32) -> &[PathNode] {
        self.width = grid.width();
        self.height = grid.height();
        self.map.clear();
        self.map.resize(grid.bounds().len(), UNREACHABLE);
        self.results.clear();
        self.queue.clear();

        for &src in sources {
            if grid.is_blocked(src) {
                continue;
            }
            let Some(si) = self.idx(src) else {
                continue;
            };
            if self.map[si] != UNREACHABLE {
                continue;
            }
            self.map[si] = 0;
            self.queue.push_back(si);
            self.results.push(PathNode { pos: src, cost: 0 });
        }

        while let Some(ci) = self.queue.pop_front() {
            let nd = self.map[ci] + 1;
            if nd > max_dist {
                continue;
            }
            for np in self.point(ci).neighbors_4() {
                if grid.is_blocked(np) {
                    continue;
                }
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                if self.map[ni] != UNREACHABLE {
                    continue;
                }
                self.map[ni] = nd;
                self.queue.push_back(ni);
                self.results.push(PathNode { pos: np, cost: nd });
            }
        }
        &self.results
    }

    /// Distance at `p` from the last [`bfs_map`](Self::bfs_map) call, or
    /// [`UNREACHABLE`].
    pub fn bfs_at(&self, p: Point) -> i32 {
        match self.idx(p) {
            Some(i) => self.map.get(i).copied().unwrap_or(UNREACHABLE),
            None => UNREACHABLE,
        }
    }

    /// Length of the shortest 4-connected walk from `from` to `to`, or
    /// [`UNREACHABLE`].
    pub fn distance(&mut self, grid: &Grid, from: Point, to: Point) -> i32 {
        self.bfs_map(grid, &[from], i32::MAX - 1);
        self.bfs_at(to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOM: &str = "\
        .....
        .###.
        ...#.
        .#...";

    #[test]
    fn bfs_distances() {
        let grid = Grid::parse(ROOM).unwrap();
        let mut flood = Flood::new();
        let nodes = flood.bfs_map(&grid, &[Point::new(0, 0)], i32::MAX - 1);
        assert_eq!(nodes.len(), 20 - grid.blocked_count());
        assert_eq!(nodes[0], PathNode {
            pos: Point::new(0, 0),
            cost: 0
        });
        assert_eq!(flood.bfs_at(Point::new(4, 0)), 4);
        assert_eq!(flood.bfs_at(Point::new(2, 2)), 4);
        assert_eq!(flood.bfs_at(Point::new(4, 3)), 7);
        assert_eq!(flood.bfs_at(Point::new(1, 1)), UNREACHABLE);
        assert_eq!(flood.bfs_at(Point::new(9, 9)), UNREACHABLE);
    }

    #[test]
    fn max_dist_limits_expansion() {
        let grid = Grid::new(10, 1).unwrap();
        let mut flood = Flood::new();
        let nodes = flood.bfs_map(&grid, &[Point::new(0, 0)], 3);
        assert_eq!(nodes.len(), 4);
        assert_eq!(flood.bfs_at(Point::new(4, 0)), UNREACHABLE);
    }

    #[test]
    fn multi_source_and_blocked_sources() {
        let grid = Grid::parse("..#..").unwrap();
        let mut flood = Flood::new();
        flood.bfs_map(
            &grid,
            &[Point::new(0, 0), Point::new(4, 0), Point::new(2, 0)],
            i32::MAX - 1,
        );
        assert_eq!(flood.bfs_at(Point::new(1, 0)), 1);
        assert_eq!(flood.bfs_at(Point::new(3, 0)), 1);
        assert_eq!(flood.bfs_at(Point::new(2, 0)), UNREACHABLE);
    }

    #[test]
    fn single_pair_distance() {
        let grid = Grid::parse(ROOM).unwrap();
        let mut flood = Flood::new();
        assert_eq!(flood.distance(&grid, Point::new(0, 3), Point::new(4, 3)), 6);
        assert_eq!(flood.distance(&grid, Point::new(0, 0), Point::new(1, 1)), UNREACHABLE);
        assert_eq!(flood.distance(&grid, Point::new(2, 2), Point::new(2, 2)), 0);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn path_node_round_trip() {
        let n = PathNode {
            pos: Point::new(4, 2),
            cost: 9,
        };
        let json = serde_json::to_string(&n).unwrap();
        assert_eq!(serde_json::from_str::<PathNode>(&json).unwrap(), n);
    }
}
