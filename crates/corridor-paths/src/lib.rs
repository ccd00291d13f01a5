//! Shortest L1 (Manhattan) paths on grids with rectilinear obstacles.
//!
//! A [`Planner`] is built once per grid. It traces the obstacle boundaries,
//! keeps their convex corners and links every pair of corners that can see
//! each other through a partition tree, giving a visibility graph that is
//! usually far smaller than the grid. Queries connect both endpoints to that
//! graph and run A* with a landmark (ALT) heuristic.
//!
//! ```
//! use corridor_core::{Grid, Point};
//! use corridor_paths::Planner;
//!
//! let grid = Grid::parse(
//!     "\
//!     .....
//!     .###.
//!     .....",
//! )
//! .unwrap();
//! let mut planner = Planner::new(&grid);
//! let route = planner.search(Point::new(2, 0), Point::new(2, 2));
//! assert_eq!(route.distance, 6);
//! ```
//!
//! Building blocks are exported as well:
//!
//! - [`orient`], an exact orientation predicate.
//! - [`trace_contours`], the boundary loops of a grid's obstacles.
//! - [`Flood`], a plain breadth-first distance map.

mod build;
mod config;
mod contour;
mod distance;
mod flood;
mod graph;
mod heap;
mod landmarks;
mod orientation;
mod planner;
mod tree;
mod visibility;

pub use config::PlannerConfig;
pub use contour::{Winding, trace_contours};
pub use distance::manhattan;
pub use flood::{Flood, PathNode};
pub use graph::Graph;
pub use orientation::{orient, orient_points};
pub use planner::{Planner, Route, UNREACHABLE};
