//! One-time construction of the visibility graph and partition tree.

use std::collections::HashMap;

use corridor_core::Point;

use crate::config::PlannerConfig;
use crate::graph::Graph;
use crate::tree::{Bucket, Node};
use crate::visibility::VisibilityIndex;

/// State threaded through the recursive build: the vertex for every point
/// placed so far and the edges waiting to be linked.
pub(crate) struct BuildContext<'a> {
    vis: &'a VisibilityIndex,
    config: PlannerConfig,
    graph: Graph,
    vertex_of: HashMap<Point, usize>,
    edges: Vec<(Point, Point)>,
}

/// Corners of one node split around the line `x`.
struct Partition {
    left: Vec<Point>,
    right: Vec<Point>,
    /// Corners lying on the line.
    on: Vec<Point>,
    /// Per row: nearest visible corner on each side plus those on the line,
    /// ordered by `(y, x)`.
    visible: Vec<Point>,
}

/// Points of one bucket before they are turned into vertex ids.
struct BucketPoints {
    y0: i32,
    y1: i32,
    top: Option<Point>,
    bottom: Option<Point>,
    left: Vec<Point>,
    right: Vec<Point>,
    on: Vec<Point>,
}

impl<'a> BuildContext<'a> {
    pub(crate) fn new(vis: &'a VisibilityIndex, config: PlannerConfig) -> Self {
        Self {
            vis,
            config,
            graph: Graph::default(),
            vertex_of: HashMap::new(),
            edges: Vec::new(),
        }
    }

    /// Build the tree over every corner, link the collected edges and run
    /// landmark preprocessing.
    pub(crate) fn build(mut self) -> (Graph, Option<Box<Node>>) {
        let corners = self.vis.corners().to_vec();
        let root = self.make_tree(&corners);
        self.link_edges();
        self.graph.init(self.config.landmarks);
        (self.graph, root)
    }

    /// The vertex at `p`, created on first use.
    fn vertex(&mut self, p: Point) -> usize {
        if let Some(&v) = self.vertex_of.get(&p) {
            return v;
        }
        let v = self.graph.add_vertex(p);
        self.vertex_of.insert(p, v);
        v
    }

    fn visible(&self, a: Point, b: Point) -> bool {
        !self.vis.stab_box(a, b)
    }

    fn connect_if_visible(&mut self, a: Point, b: Point) {
        if self.visible(a, b) {
            self.edges.push((a, b));
        }
    }

    fn link_edges(&mut self) {
        let mut edges = std::mem::take(&mut self.edges);
        for e in edges.iter_mut() {
            if e.1 < e.0 {
                *e = (e.1, e.0);
            }
        }
        edges.sort();
        edges.dedup();
        for (a, b) in edges {
            if a == b {
                continue;
            }
            let (Some(&u), Some(&v)) = (self.vertex_of.get(&a), self.vertex_of.get(&b)) else {
                continue;
            };
            self.graph.link(u, v);
        }
    }

    /// `corners` is sorted by `(x, y)`.
    fn make_tree(&mut self, corners: &[Point]) -> Option<Box<Node>> {
        if corners.is_empty() {
            return None;
        }
        if corners.len() < self.config.leaf_cutoff {
            return Some(Box::new(self.make_leaf(corners)));
        }

        let x = corners[corners.len() / 2].x;
        let part = self.partition(x, corners);
        let left = self.make_tree(&part.left);
        let right = self.make_tree(&part.right);
        for &p in &part.on {
            self.vertex(p);
        }

        let visible = &part.visible;
        let size = self.config.bucket_len();
        let mut buckets = Vec::new();
        let mut last_steiner: Option<Point> = None;
        let mut i = 0;
        while i < visible.len() {
            let v0 = i;
            let mut v1 = (i + size - 1).min(visible.len() - 1);
            // Never split a row between two buckets.
            loop {
                v1 += 1;
                if v1 >= visible.len() || visible[v1 - 1].y != visible[v1].y {
                    break;
                }
            }
            i = v1;

            let bp = self.make_bucket(&visible[v0..v1], x);
            if let (Some(a), Some(b)) = (last_steiner, bp.top) {
                self.connect_if_visible(a, b);
            }
            last_steiner = bp.bottom;
            let bucket = Bucket {
                y0: bp.y0,
                y1: bp.y1,
                top: bp.top.map(|p| self.vertex(p)),
                bottom: bp.bottom.map(|p| self.vertex(p)),
                left: bp.left.iter().map(|&p| self.vertex(p)).collect(),
                right: bp.right.iter().map(|&p| self.vertex(p)).collect(),
                on: bp.on.iter().map(|&p| self.vertex(p)).collect(),
            };
            buckets.push(bucket);
        }

        Some(Box::new(Node::Internal {
            split_x: x,
            buckets,
            left,
            right,
        }))
    }

    fn make_leaf(&mut self, corners: &[Point]) -> Node {
        let mut vertices = Vec::with_capacity(corners.len());
        for (i, &u) in corners.iter().enumerate() {
            vertices.push(self.vertex(u));
            for &v in &corners[..i] {
                self.connect_if_visible(u, v);
            }
        }
        Node::Leaf { vertices }
    }

    fn partition(&self, x: i32, corners: &[Point]) -> Partition {
        let mut left = Vec::new();
        let mut right = Vec::new();
        let mut crossing = Vec::new();
        for &c in corners {
            if !self.vis.stab_ray(c, x) {
                crossing.push(c);
            }
            if c.x < x {
                left.push(c);
            } else if c.x > x {
                right.push(c);
            }
        }
        // Row-major: by y, then x.
        crossing.sort();

        let mut visible = Vec::new();
        let mut on = Vec::new();
        let n = crossing.len();
        let mut i = 0;
        while i < n {
            let y = crossing[i].y;
            let mut l = x;
            while i < n && crossing[i].y == y && crossing[i].x < x {
                l = crossing[i].x;
                i += 1;
            }
            if l < x {
                visible.push(Point::new(l, y));
            }
            while i < n && crossing[i].y == y && crossing[i].x == x {
                on.push(crossing[i]);
                visible.push(crossing[i]);
                i += 1;
            }
            let mut r = x;
            if i < n && crossing[i].y == y {
                r = crossing[i].x;
                i += 1;
                while i < n && crossing[i].y == y {
                    i += 1;
                }
            }
            if r > x {
                visible.push(Point::new(r, y));
            }
        }

        Partition {
            left,
            right,
            on,
            visible,
        }
    }

    /// Group one band of visible corners, adding Steiner points on the split
    /// line at the band's first and last rows, and collect the edges inside
    /// the band.
    fn make_bucket(&mut self, corners: &[Point], x: i32) -> BucketPoints {
        let mut left = Vec::new();
        let mut right = Vec::new();
        let mut on = Vec::new();
        for &c in corners {
            match c.x.cmp(&x) {
                std::cmp::Ordering::Less => left.push(c),
                std::cmp::Ordering::Greater => right.push(c),
                std::cmp::Ordering::Equal => on.push(c),
            }
        }

        let y0 = corners.first().map_or(0, |c| c.y);
        let y1 = corners.last().map_or(0, |c| c.y);
        let top = self.add_steiner(&mut on, Point::new(x, y0), true);
        let bottom = self.add_steiner(&mut on, Point::new(x, y1), false);

        for &u in &left {
            for &v in &right {
                self.connect_if_visible(u, v);
            }
        }
        for &u in &on {
            for &v in left.iter().chain(&right) {
                self.connect_if_visible(u, v);
            }
        }
        for w in on.windows(2) {
            self.connect_if_visible(w[0], w[1]);
        }

        BucketPoints {
            y0,
            y1,
            top,
            bottom,
            left,
            right,
            on,
        }
    }

    fn add_steiner(&mut self, on: &mut Vec<Point>, p: Point, first: bool) -> Option<Point> {
        if self.vis.stab_tile(p) {
            return None;
        }
        if on.contains(&p) {
            return Some(p);
        }
        if first {
            on.insert(0, p);
        } else {
            on.push(p);
        }
        self.vertex(p);
        Some(p)
    }
}
