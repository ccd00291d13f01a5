use corridor_core::{Grid, InvalidGrid, Point};

use crate::build::BuildContext;
use crate::config::PlannerConfig;
use crate::distance::manhattan;
use crate::graph::Graph;
use crate::tree::{Node, Side};
use crate::visibility::VisibilityIndex;

/// Sentinel distance meaning "no path".
pub const UNREACHABLE: i32 = i32::MAX;

/// Result of a [`Planner::search`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// L1 length of the path, or [`UNREACHABLE`].
    pub distance: i32,
    /// Start, then every turn, then the target. Consecutive points differ in
    /// exactly one coordinate. Empty when unreachable.
    pub path: Vec<Point>,
}

impl Route {
    pub fn unreachable() -> Self {
        Self {
            distance: UNREACHABLE,
            path: Vec::new(),
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.distance != UNREACHABLE
    }
}

// ---------------------------------------------------------------------------
// Planner
// ---------------------------------------------------------------------------

/// Shortest L1 paths on a fixed grid.
///
/// Building a planner traces the obstacles, extracts their convex corners
/// and links them into a sparse visibility graph indexed by a partition
/// tree. Queries then touch only the vertices near the two endpoints and
/// whatever A* expands between them.
///
/// `search` takes `&mut self` because each vertex carries scratch state for
/// the running query; clone the planner to serve several callers at once.
#[derive(Debug, Clone)]
pub struct Planner {
    vis: VisibilityIndex,
    graph: Graph,
    root: Option<Box<Node>>,
    config: PlannerConfig,
    width: i32,
    height: i32,
}

impl Planner {
    /// Build a planner with the default [`PlannerConfig`].
    pub fn new(grid: &Grid) -> Self {
        Self::with_config(grid, PlannerConfig::default())
    }

    pub fn with_config(grid: &Grid, config: PlannerConfig) -> Self {
        let vis = VisibilityIndex::new(grid);
        let (graph, root) = BuildContext::new(&vis, config).build();
        log::debug!(
            "planner {}x{}: {} corners, {} vertices, {} edges, tree depth {}, {} components, {} landmarks",
            grid.width(),
            grid.height(),
            vis.corners().len(),
            graph.len(),
            graph.edge_count(),
            root.as_ref().map_or(0, |n| n.depth()),
            graph.component_count(),
            graph.landmarks().len(),
        );
        Self {
            vis,
            graph,
            root,
            config,
            width: grid.width(),
            height: grid.height(),
        }
    }

    /// Validate `rows[y][x]` (nonzero = blocked) and build a planner on it.
    pub fn from_rows<R: AsRef<[i32]>>(rows: &[R]) -> Result<Self, InvalidGrid> {
        let grid = Grid::from_rows(rows)?;
        Ok(Self::new(&grid))
    }

    fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    /// Shortest L1 route from `start` to `target`.
    ///
    /// Endpoints outside the grid or on a blocked cell give an unreachable
    /// route.
    pub fn search(&mut self, start: Point, target: Point) -> Route {
        if !self.contains(start) || !self.contains(target) {
            log::trace!("search {start} -> {target}: endpoint outside the grid");
            return Route::unreachable();
        }

        if start == target {
            if self.vis.stab_tile(start) {
                log::trace!("search {start} -> {target}: blocked cell");
                return Route::unreachable();
            }
            return Route {
                distance: 0,
                path: vec![start],
            };
        }

        if !self.vis.stab_box(start, target) {
            log::trace!("search {start} -> {target}: direct");
            let mut path = vec![start];
            if start.x != target.x && start.y != target.y {
                path.push(Point::new(start.x, target.y));
            }
            path.push(target);
            return Route {
                distance: manhattan(start, target),
                path,
            };
        }

        let Some(root) = self.root.as_deref() else {
            log::trace!("search {start} -> {target}: no visibility graph");
            return Route::unreachable();
        };
        self.graph.set_endpoints(start, target);
        let nt = root.connect(&self.vis, &mut self.graph, target, Side::Target);
        let ns = root.connect(&self.vis, &mut self.graph, start, Side::Source);
        log::trace!("search {start} -> {target}: {ns} source seeds, {nt} target seeds");
        match self.graph.search() {
            Some((distance, path)) => Route { distance, path },
            None => {
                log::trace!("search {start} -> {target}: unreachable");
                Route::unreachable()
            }
        }
    }

    /// The visibility graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Convex obstacle corners, sorted by `(x, y)`.
    pub fn corners(&self) -> &[Point] {
        self.vis.corners()
    }

    pub fn config(&self) -> PlannerConfig {
        self.config
    }
}
