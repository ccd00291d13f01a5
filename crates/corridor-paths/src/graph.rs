//! The visibility graph: corner and Steiner vertices, their edges, landmark
//! distances and the pooled per-query search state.

use corridor_core::Point;

use crate::distance::manhattan;
use crate::heap::PairingHeap;

/// Search-state flags.
pub(crate) const TARGET: u8 = 1;
pub(crate) const SOURCE: u8 = 2;
pub(crate) const CLOSED: u8 = 4;

#[derive(Debug, Clone)]
pub(crate) struct Vertex {
    pub(crate) pos: Point,
    pub(crate) component: usize,
    // Transient, reset after every query.
    pub(crate) state: u8,
    pub(crate) dist: f64,
    pub(crate) heuristic: f64,
    pub(crate) pred: Option<usize>,
}

impl Vertex {
    fn new(pos: Point) -> Self {
        Self {
            pos,
            component: 0,
            state: 0,
            dist: 0.0,
            heuristic: 0.0,
            pred: None,
        }
    }
}

/// Sparse graph over obstacle corners and Steiner points.
///
/// Topology, component labels and landmark distances are fixed once the
/// planner is built. Each vertex also carries a small block of search state
/// that a query fills in and then clears, so queries do not allocate per
/// vertex.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) adjacency: Vec<Vec<usize>>,
    pub(crate) edge_count: usize,
    pub(crate) component_count: usize,
    /// Landmark vertex ids, `landmarks_per_component` per component.
    pub(crate) landmarks: Vec<usize>,
    pub(crate) landmarks_per_component: usize,
    /// `landmark_dist[v * landmarks_per_component + k]`.
    pub(crate) landmark_dist: Vec<f64>,
    pub(crate) heap: PairingHeap,

    // Query scratch.
    pub(crate) touched: Vec<usize>,
    pub(crate) target_dist: Vec<f64>,
    pub(crate) src: Point,
    pub(crate) dst: Point,
    pub(crate) source_components: Vec<usize>,
    pub(crate) target_components: Vec<usize>,
}

impl Graph {
    pub(crate) fn add_vertex(&mut self, pos: Point) -> usize {
        self.vertices.push(Vertex::new(pos));
        self.adjacency.push(Vec::new());
        self.vertices.len() - 1
    }

    /// Add an undirected edge.
    pub(crate) fn link(&mut self, u: usize, v: usize) {
        self.adjacency[u].push(v);
        self.adjacency[v].push(u);
        self.edge_count += 1;
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Position of vertex `v`.
    pub fn position(&self, v: usize) -> Point {
        self.vertices[v].pos
    }

    /// Iterator over all vertex positions, in vertex-id order.
    pub fn positions(&self) -> impl Iterator<Item = Point> + '_ {
        self.vertices.iter().map(|v| v.pos)
    }

    /// Vertices adjacent to `v`.
    pub fn neighbors(&self, v: usize) -> &[usize] {
        &self.adjacency[v]
    }

    /// Connected-component label of `v`.
    pub fn component(&self, v: usize) -> usize {
        self.vertices[v].component
    }

    pub fn component_count(&self) -> usize {
        self.component_count
    }

    /// Landmark vertex ids, grouped by component.
    pub fn landmarks(&self) -> &[usize] {
        &self.landmarks
    }

    pub(crate) fn landmark_row(&self, v: usize) -> &[f64] {
        let k = self.landmarks_per_component;
        &self.landmark_dist[v * k..(v + 1) * k]
    }

    /// Prepare the query scratch for a search from `src` to `dst`.
    pub(crate) fn set_endpoints(&mut self, src: Point, dst: Point) {
        self.src = src;
        self.dst = dst;
    }

    fn touch(&mut self, v: usize) {
        if self.vertices[v].state == 0 {
            self.touched.push(v);
        }
    }

    /// Mark `v` as visible from the target. Must be called for every target
    /// seed before any source seed, since source heuristics read the target
    /// landmark bounds.
    pub(crate) fn add_target(&mut self, v: usize) {
        if self.vertices[v].state & TARGET != 0 {
            return;
        }
        self.touch(v);
        self.vertices[v].state |= TARGET;
        let d = manhattan(self.vertices[v].pos, self.dst) as f64;
        let k = self.landmarks_per_component;
        for i in 0..k {
            let via = self.landmark_dist[v * k + i] + d;
            if via < self.target_dist[i] {
                self.target_dist[i] = via;
            }
        }
        let c = self.vertices[v].component;
        if !self.target_components.contains(&c) {
            self.target_components.push(c);
        }
    }

    /// Mark `v` as visible from the source and open it.
    pub(crate) fn add_source(&mut self, v: usize) {
        if self.vertices[v].state & SOURCE != 0 {
            return;
        }
        self.touch(v);
        let h = self.heuristic(v);
        let dist = manhattan(self.src, self.vertices[v].pos) as f64;
        let vert = &mut self.vertices[v];
        vert.state |= SOURCE;
        vert.heuristic = h;
        vert.dist = dist;
        vert.pred = None;
        self.heap.push(v, dist + h);
        let c = vert.component;
        if !self.source_components.contains(&c) {
            self.source_components.push(c);
        }
    }

    /// Run A* over the seeded vertices. Returns the distance and the path in
    /// travel order, or `None` when the seeds cannot meet. The query scratch
    /// is cleared either way.
    pub(crate) fn search(&mut self) -> Option<(i32, Vec<Point>)> {
        let connected = self
            .source_components
            .iter()
            .any(|c| self.target_components.contains(c));
        let mut found = None;
        if connected {
            found = self.run_astar();
        }
        let result = found.map(|(dist, meet)| (dist, self.path_from(meet)));
        self.reset();
        result
    }

    fn run_astar(&mut self) -> Option<(i32, usize)> {
        while let Some(node) = self.heap.peek() {
            let d = self.vertices[node].dist;
            let npos = self.vertices[node].pos;
            if self.vertices[node].state == SOURCE | TARGET {
                let total = d + manhattan(npos, self.dst) as f64;
                return Some((total as i32, node));
            }
            self.vertices[node].state = CLOSED;
            self.heap.pop();

            for j in 0..self.adjacency[node].len() {
                let v = self.adjacency[node][j];
                let state = self.vertices[v].state;
                if state == CLOSED {
                    continue;
                }
                let vd = d + manhattan(npos, self.vertices[v].pos) as f64;
                if state < SOURCE {
                    self.touch(v);
                    let vh = self.heuristic(v);
                    let vert = &mut self.vertices[v];
                    vert.state |= SOURCE;
                    vert.heuristic = vh;
                    vert.dist = vd;
                    vert.pred = Some(node);
                    self.heap.push(v, vd + vh);
                } else {
                    let vw = vd + self.vertices[v].heuristic;
                    if vw < self.heap.weight(v) {
                        let vert = &mut self.vertices[v];
                        vert.dist = vd;
                        vert.pred = Some(node);
                        self.heap.decrease_key(v, vw);
                    }
                }
            }
        }
        None
    }

    /// Walk predecessors back from the meeting vertex, inserting an elbow
    /// wherever two consecutive points share no coordinate.
    fn path_from(&self, meet: usize) -> Vec<Point> {
        let mut path = vec![self.dst];
        let mut prev = self.dst;
        let mut head = Some(meet);
        while let Some(h) = head {
            let p = self.vertices[h].pos;
            push_leg(&mut path, prev, p);
            prev = p;
            head = self.vertices[h].pred;
        }
        push_leg(&mut path, prev, self.src);
        path.reverse();
        path
    }

    /// Clear everything the last query touched.
    fn reset(&mut self) {
        for &v in &self.touched {
            let vert = &mut self.vertices[v];
            vert.state = 0;
            vert.pred = None;
            self.heap.reset(v);
        }
        self.touched.clear();
        self.heap.clear_root();
        self.target_dist.fill(f64::INFINITY);
        self.source_components.clear();
        self.target_components.clear();
    }

    /// Whether every vertex's search state is idle.
    #[cfg(test)]
    pub(crate) fn is_idle(&self) -> bool {
        self.touched.is_empty()
            && self.heap.is_empty()
            && self.vertices.iter().all(|v| v.state == 0 && v.pred.is_none())
            && self.target_dist.iter().all(|d| d.is_infinite())
    }
}

/// Append `to` after `from`, with an elbow at `(to.x, from.y)` if needed.
fn push_leg(path: &mut Vec<Point>, from: Point, to: Point) {
    if from.x != to.x && from.y != to.y {
        path.push(Point::new(to.x, from.y));
    }
    if from != to {
        path.push(to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A square ring of four vertices: (0,0) (4,0) (4,4) (0,4).
    fn ring() -> Graph {
        let mut g = Graph::default();
        let a = g.add_vertex(Point::new(0, 0));
        let b = g.add_vertex(Point::new(4, 0));
        let c = g.add_vertex(Point::new(4, 4));
        let d = g.add_vertex(Point::new(0, 4));
        g.link(a, b);
        g.link(b, c);
        g.link(c, d);
        g.link(d, a);
        g.init(2);
        g
    }

    #[test]
    fn accessors() {
        let g = ring();
        assert_eq!(g.len(), 4);
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.component_count(), 1);
        assert_eq!(g.landmarks().len(), 2);
        assert_eq!(g.neighbors(0), &[1, 3]);
        assert_eq!(g.position(2), Point::new(4, 4));
    }

    #[test]
    fn search_between_seeds() {
        let mut g = ring();
        let src = Point::new(0, -1);
        let dst = Point::new(5, 4);
        g.set_endpoints(src, dst);
        g.add_target(2);
        g.add_source(0);
        let (dist, path) = g.search().unwrap();
        assert_eq!(dist, 10);
        assert_eq!(path.first(), Some(&src));
        assert_eq!(path.last(), Some(&dst));
        let len: i32 = path.windows(2).map(|w| manhattan(w[0], w[1])).sum();
        assert_eq!(len, dist);
        assert!(g.is_idle());
    }

    #[test]
    fn seeds_in_separate_components_do_not_search() {
        let mut g = Graph::default();
        let a = g.add_vertex(Point::new(0, 0));
        let b = g.add_vertex(Point::new(9, 9));
        g.init(1);
        assert_eq!(g.component_count(), 2);
        g.set_endpoints(Point::new(0, 1), Point::new(9, 8));
        g.add_target(b);
        g.add_source(a);
        assert!(g.search().is_none());
        assert!(g.is_idle());
    }

    #[test]
    fn meeting_on_a_shared_seed() {
        let mut g = ring();
        g.set_endpoints(Point::new(1, 0), Point::new(3, 0));
        g.add_target(1);
        g.add_source(1);
        let (dist, path) = g.search().unwrap();
        // Through (4, 0): 3 + 1.
        assert_eq!(dist, 4);
        assert_eq!(path, vec![Point::new(1, 0), Point::new(4, 0), Point::new(3, 0)]);
    }

    #[test]
    fn elbows_are_inserted() {
        let mut path = vec![Point::new(0, 0)];
        push_leg(&mut path, Point::new(0, 0), Point::new(3, 2));
        push_leg(&mut path, Point::new(3, 2), Point::new(3, 2));
        assert_eq!(path, vec![Point::new(0, 0), Point::new(3, 0), Point::new(3, 2)]);
    }
}
