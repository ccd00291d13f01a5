//! The occupancy [`Grid`]: a rectangular array of free/blocked cells.
//!
//! A grid is built once, validated for rectangularity, and then handed to the
//! planner. Cells are stored row-major; `true` means blocked.

use std::fmt;

use crate::geom::{Point, Range};

/// Character used for blocked cells by [`Grid::parse`] and `Display`.
pub const BLOCKED: char = '#';
/// Character used for free cells by [`Grid::parse`] and `Display`.
pub const FREE: char = '.';

/// A W×H occupancy grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<bool>,
    width: i32,
    height: i32,
}

impl Grid {
    /// Create a grid of the given size with every cell free.
    pub fn new(width: i32, height: i32) -> Result<Self, InvalidGrid> {
        if width <= 0 || height <= 0 {
            return Err(InvalidGrid::Empty { width, height });
        }
        Ok(Self {
            cells: vec![false; width as usize * height as usize],
            width,
            height,
        })
    }

    /// Build a grid from rows: `rows[y][x]`, nonzero meaning blocked.
    ///
    /// Every row must have the same length.
    pub fn from_rows<R: AsRef<[i32]>>(rows: &[R]) -> Result<Self, InvalidGrid> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut grid = Self::new(width as i32, height as i32)?;
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(InvalidGrid::Ragged {
                    line: y,
                    expected: width,
                    found: row.len(),
                });
            }
            for (x, &v) in row.iter().enumerate() {
                grid.cells[y * width + x] = v != 0;
            }
        }
        Ok(grid)
    }

    /// Build a grid from columns: `cols[x][y]`, nonzero meaning blocked.
    pub fn from_columns<C: AsRef<[i32]>>(cols: &[C]) -> Result<Self, InvalidGrid> {
        let width = cols.len();
        let height = cols.first().map_or(0, |c| c.as_ref().len());
        let mut grid = Self::new(width as i32, height as i32)?;
        for (x, col) in cols.iter().enumerate() {
            let col = col.as_ref();
            if col.len() != height {
                return Err(InvalidGrid::Ragged {
                    line: x,
                    expected: height,
                    found: col.len(),
                });
            }
            for (y, &v) in col.iter().enumerate() {
                grid.cells[y * width + x] = v != 0;
            }
        }
        Ok(grid)
    }

    /// Parse an ASCII picture: one line per row, [`BLOCKED`] or [`FREE`] per
    /// cell. Leading/trailing whitespace of the whole string is trimmed, and
    /// each line is trimmed too so indented literals work.
    pub fn parse(s: &str) -> Result<Self, InvalidGrid> {
        let lines: Vec<&str> = s.trim().lines().map(str::trim).collect();
        let width = lines.first().map_or(0, |l| l.chars().count());
        let mut grid = Self::new(width as i32, lines.len() as i32)?;
        for (y, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(InvalidGrid::Ragged {
                    line: y,
                    expected: width,
                    found,
                });
            }
            for (x, ch) in line.chars().enumerate() {
                let blocked = match ch {
                    BLOCKED => true,
                    FREE => false,
                    _ => {
                        return Err(InvalidGrid::InvalidRune {
                            ch,
                            pos: Point::new(x as i32, y as i32),
                        });
                    }
                };
                grid.cells[y * width + x] = blocked;
            }
        }
        Ok(grid)
    }

    /// Width in cells.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in cells.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Size as a `Point` (width = x, height = y).
    #[inline]
    pub fn size(&self) -> Point {
        Point::new(self.width, self.height)
    }

    /// The range `[0, width) × [0, height)`.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.width, self.height)
    }

    /// Whether `p` is a cell of this grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    #[inline]
    fn index(&self, p: Point) -> usize {
        p.y as usize * self.width as usize + p.x as usize
    }

    /// Whether the cell at `p` is blocked. Cells outside the grid count as
    /// blocked.
    #[inline]
    pub fn is_blocked(&self, p: Point) -> bool {
        !self.contains(p) || self.cells[self.index(p)]
    }

    /// Mark the cell at `p` blocked or free. No-op if `p` is outside.
    pub fn set(&mut self, p: Point, blocked: bool) {
        if self.contains(p) {
            let i = self.index(p);
            self.cells[i] = blocked;
        }
    }

    /// Number of blocked cells.
    pub fn blocked_count(&self) -> usize {
        self.cells.iter().filter(|&&b| b).count()
    }

    /// Row-major iterator over `(Point, blocked)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, bool)> + '_ {
        self.bounds().iter().map(move |p| (p, self.cells[self.index(p)]))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let ch = if self.is_blocked(Point::new(x, y)) {
                    BLOCKED
                } else {
                    FREE
                };
                write!(f, "{ch}")?;
            }
            if y + 1 < self.height {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Errors that can occur when building a [`Grid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidGrid {
    /// A dimension is zero or negative.
    Empty { width: i32, height: i32 },
    /// A row (or column) has a different length than the first one.
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A character other than [`BLOCKED`] or [`FREE`] was found.
    InvalidRune { ch: char, pos: Point },
}

impl fmt::Display for InvalidGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { width, height } => {
                write!(f, "invalid grid: empty dimensions {width}x{height}")
            }
            Self::Ragged {
                line,
                expected,
                found,
            } => write!(
                f,
                "invalid grid: line {line} has {found} cells, expected {expected}"
            ),
            Self::InvalidRune { ch, pos } => {
                write!(f, "invalid grid: unexpected rune \u{201c}{ch}\u{201d} at {pos}")
            }
        }
    }
}

impl std::error::Error for InvalidGrid {}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOM: &str = "\
        ....
        .##.
        ....";

    #[test]
    fn parse_and_size() {
        let g = Grid::parse(ROOM).unwrap();
        assert_eq!(g.size(), Point::new(4, 3));
        assert!(g.is_blocked(Point::new(1, 1)));
        assert!(g.is_blocked(Point::new(2, 1)));
        assert!(!g.is_blocked(Point::new(0, 0)));
        assert_eq!(g.blocked_count(), 2);
    }

    #[test]
    fn outside_counts_as_blocked() {
        let g = Grid::new(2, 2).unwrap();
        assert!(!g.is_blocked(Point::new(1, 1)));
        assert!(g.is_blocked(Point::new(-1, 0)));
        assert!(g.is_blocked(Point::new(2, 0)));
        assert!(g.is_blocked(Point::new(0, 2)));
    }

    #[test]
    fn rows_and_columns_agree() {
        let rows = Grid::from_rows(&[vec![0, 1, 0], vec![0, 0, 1]]).unwrap();
        let cols = Grid::from_columns(&[vec![0, 0], vec![1, 0], vec![0, 1]]).unwrap();
        assert_eq!(rows, cols);
        assert_eq!(rows.to_string(), ".#.\n..#");
    }

    #[test]
    fn display_round_trips_through_parse() {
        let g = Grid::parse(ROOM).unwrap();
        assert_eq!(Grid::parse(&g.to_string()).unwrap(), g);
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = Grid::from_rows(&[vec![0, 0], vec![0]]).unwrap_err();
        assert_eq!(
            err,
            InvalidGrid::Ragged {
                line: 1,
                expected: 2,
                found: 1
            }
        );
        assert!(Grid::parse("..\n.").is_err());
    }

    #[test]
    fn empty_dimensions_rejected() {
        let empty: [Vec<i32>; 0] = [];
        assert!(matches!(
            Grid::from_rows(&empty),
            Err(InvalidGrid::Empty { .. })
        ));
        assert!(matches!(
            Grid::from_rows(&[Vec::<i32>::new()]),
            Err(InvalidGrid::Empty { .. })
        ));
        assert!(Grid::new(0, 3).is_err());
        assert!(Grid::parse("   ").is_err());
    }

    #[test]
    fn invalid_rune_reports_position() {
        let err = Grid::parse("..\n.x").unwrap_err();
        assert_eq!(
            err,
            InvalidGrid::InvalidRune {
                ch: 'x',
                pos: Point::new(1, 1)
            }
        );
        assert!(err.to_string().contains("(1, 1)"));
    }

    #[test]
    fn set_and_iter() {
        let mut g = Grid::new(3, 2).unwrap();
        g.set(Point::new(2, 1), true);
        g.set(Point::new(9, 9), true);
        let blocked: Vec<Point> = g.iter().filter(|&(_, b)| b).map(|(p, _)| p).collect();
        assert_eq!(blocked, vec![Point::new(2, 1)]);
        assert_eq!(g.iter().count(), 6);
    }
}
