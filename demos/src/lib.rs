//! Grids and rendering shared by the `corridor` demo.

use corridor_core::{Grid, InvalidGrid, Point, Range};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

/// The bundled example, column-major: `EXAMPLE_COLUMNS[x][y]`, 1 = wall.
/// A zig-zag wall turns the 8×7 grid into a single winding corridor.
pub const EXAMPLE_COLUMNS: [[i32; 7]; 8] = [
    [0, 1, 0, 0, 0, 0, 0],
    [0, 1, 0, 1, 0, 0, 0],
    [0, 1, 0, 1, 1, 1, 0],
    [0, 1, 0, 1, 0, 0, 0],
    [0, 1, 0, 1, 0, 0, 0],
    [0, 1, 0, 1, 0, 0, 0],
    [0, 1, 0, 1, 0, 1, 1],
    [0, 0, 0, 1, 0, 0, 0],
];

pub const EXAMPLE_START: Point = Point::new(0, 0);
pub const EXAMPLE_TARGET: Point = Point::new(7, 6);

const PATH: char = '*';
const START: char = 'S';
const TARGET: char = 'T';

pub fn example_grid() -> Result<Grid, InvalidGrid> {
    Grid::from_columns(&EXAMPLE_COLUMNS)
}

/// Parameters for [`random_cave`].
#[derive(Debug, Clone)]
pub struct CaveRule {
    /// Chance in percent that a cell starts as a wall.
    pub wall_init_pct: u32,
    /// A cell becomes a wall with at least this many walls among its 8
    /// neighbours.
    pub wall_cutoff: i32,
    /// Smoothing passes.
    pub reps: usize,
}

impl Default for CaveRule {
    fn default() -> Self {
        Self {
            wall_init_pct: 42,
            wall_cutoff: 5,
            reps: 3,
        }
    }
}

/// A cellular-automata cave of the given size, reproducible from `seed`.
pub fn random_cave(
    width: i32,
    height: i32,
    seed: u64,
    rule: &CaveRule,
) -> Result<Grid, InvalidGrid> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut grid = Grid::new(width, height)?;
    let bounds = grid.bounds();
    for p in bounds {
        grid.set(p, rng.random_range(0..100) < rule.wall_init_pct);
    }
    for _ in 0..rule.reps {
        let next: Vec<bool> = bounds
            .iter()
            .map(|p| count_walls(&grid, p) >= rule.wall_cutoff)
            .collect();
        for (p, wall) in bounds.iter().zip(next) {
            grid.set(p, wall);
        }
    }
    Ok(grid)
}

/// Walls among the 8 neighbours of `p`; cells outside count as walls.
fn count_walls(grid: &Grid, p: Point) -> i32 {
    Range::new(p.x - 1, p.y - 1, p.x + 2, p.y + 2)
        .iter()
        .filter(|&q| q != p && grid.is_blocked(q))
        .count() as i32
}

/// Render `grid` with every cell covered by `path` marked.
pub fn render(grid: &Grid, path: &[Point]) -> String {
    let w = grid.width() as usize;
    let mut rows: Vec<Vec<char>> = grid.to_string().lines().map(|l| l.chars().collect()).collect();
    let mut mark = |p: Point, ch: char| {
        if grid.contains(p) {
            rows[p.y as usize][p.x as usize] = ch;
        }
    };
    for leg in path.windows(2) {
        for p in Range::spanning(leg[0], leg[1]) {
            mark(p, PATH);
        }
    }
    if let (Some(&s), Some(&t)) = (path.first(), path.last()) {
        mark(s, START);
        mark(t, TARGET);
    }
    let mut out = String::with_capacity(rows.len() * (w + 1));
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.extend(row.iter());
    }
    out
}

/// `(x, y) (x, y) ...`
pub fn format_path(path: &[Point]) -> String {
    path.iter()
        .map(Point::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use corridor_paths::Planner;

    #[test]
    fn example_has_a_31_step_corridor() {
        let grid = example_grid().unwrap();
        assert_eq!(grid.size(), Point::new(8, 7));
        let mut planner = Planner::new(&grid);
        let route = planner.search(EXAMPLE_START, EXAMPLE_TARGET);
        assert_eq!(route.distance, 31);
        let picture = render(&grid, &route.path);
        assert!(picture.starts_with('S'));
        assert!(picture.ends_with('T'));
        assert_eq!(picture.matches('*').count(), 30);
    }

    #[test]
    fn caves_are_reproducible() {
        let rule = CaveRule::default();
        let a = random_cave(30, 20, 7, &rule).unwrap();
        let b = random_cave(30, 20, 7, &rule).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.size(), Point::new(30, 20));
        assert!(random_cave(0, 5, 7, &rule).is_err());
    }

    #[test]
    fn render_marks_legs() {
        let grid = Grid::new(4, 2).unwrap();
        let path = [Point::new(0, 0), Point::new(3, 0), Point::new(3, 1)];
        assert_eq!(render(&grid, &path), "S***\n...T");
        assert_eq!(format_path(&path), "(0, 0) (3, 0) (3, 1)");
    }
}
