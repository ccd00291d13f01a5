//! **corridor-core**: grid geometry and occupancy types.
//!
//! This crate provides the foundational types shared by the *corridor*
//! planner crates: integer points, half-open rectangles, and the validated
//! occupancy [`Grid`] that planners are built from.

pub mod geom;
pub mod grid;

pub use geom::{Point, Range};
pub use grid::{Grid, InvalidGrid};
