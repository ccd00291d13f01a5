//! Connected components and landmark preprocessing for the ALT heuristic.

use crate::config::HEURISTIC_SCALE;
use crate::distance::manhattan;
use crate::graph::Graph;
use crate::heap::PairingHeap;

impl Graph {
    /// Label components and pick `count` landmarks in each of them by
    /// farthest-point sampling. Must run once after every edge is linked.
    pub(crate) fn init(&mut self, count: usize) {
        let n = self.vertices.len();
        self.landmarks_per_component = count;
        self.landmark_dist = vec![0.0; n * count];
        self.target_dist = vec![f64::INFINITY; count];
        self.heap = PairingHeap::new(n);
        self.landmarks.clear();

        let components = self.find_components();
        self.component_count = components.len();
        for mut component in components {
            self.find_landmarks(&mut component);
        }
    }

    /// Breadth-first labelling. Returns the vertex ids of every component.
    fn find_components(&mut self) -> Vec<Vec<usize>> {
        let n = self.vertices.len();
        let mut label = vec![usize::MAX; n];
        let mut components = Vec::new();
        for root in 0..n {
            if label[root] != usize::MAX {
                continue;
            }
            let id = components.len();
            label[root] = id;
            let mut members = vec![root];
            let mut ptr = 0;
            while ptr < members.len() {
                let v = members[ptr];
                ptr += 1;
                for &u in &self.adjacency[v] {
                    if label[u] == usize::MAX {
                        label[u] = id;
                        members.push(u);
                    }
                }
            }
            components.push(members);
        }
        for (v, vert) in self.vertices.iter_mut().enumerate() {
            vert.component = label[v];
        }
        components
    }

    fn find_landmarks(&mut self, component: &mut [usize]) {
        let count = self.landmarks_per_component;
        if count == 0 || component.is_empty() {
            return;
        }
        component.sort_by_key(|&v| (self.vertices[v].pos.x, self.vertices[v].pos.y));
        let mut seed = component[component.len() / 2];

        for k in 0..count {
            self.landmarks.push(seed);
            seed = self.sweep(seed);

            let mut farthest = 0.0;
            for &u in component.iter() {
                self.vertices[u].state = 0;
                self.heap.reset(u);
                let d = self.heap.weight(u);
                self.landmark_dist[u * count + k] = d;
                let s = self.landmark_row(u)[..=k]
                    .iter()
                    .copied()
                    .fold(f64::INFINITY, f64::min);
                if s > farthest {
                    seed = u;
                    farthest = s;
                }
            }
        }
    }

    /// Dijkstra from `from` over the whole component; distances are left as
    /// heap weights. Returns the last vertex settled.
    fn sweep(&mut self, from: usize) -> usize {
        const OPEN: u8 = 1;
        const DONE: u8 = 2;
        self.heap.push(from, 0.0);
        self.vertices[from].state = OPEN;
        let mut last = from;
        while let Some(v) = self.heap.pop() {
            last = v;
            self.vertices[v].state = DONE;
            let w = self.heap.weight(v);
            let pos = self.vertices[v].pos;
            for j in 0..self.adjacency[v].len() {
                let u = self.adjacency[v][j];
                let state = self.vertices[u].state;
                if state == DONE {
                    continue;
                }
                let d = w + manhattan(pos, self.vertices[u].pos) as f64;
                if state == 0 {
                    self.vertices[u].state = OPEN;
                    self.heap.push(u, d);
                } else if d < self.heap.weight(u) {
                    self.heap.decrease_key(u, d);
                }
            }
        }
        last
    }

    /// Lower bound on the remaining distance from `v` to the target, from
    /// the target's L1 distance and the landmark triangle inequality.
    pub(crate) fn heuristic(&self, v: usize) -> f64 {
        let mut pi = manhattan(self.vertices[v].pos, self.dst) as f64;
        for (t, l) in self.target_dist.iter().zip(self.landmark_row(v)) {
            let bound = t - l;
            if bound.is_finite() && bound > pi {
                pi = bound;
            }
        }
        HEURISTIC_SCALE * pi
    }
}
