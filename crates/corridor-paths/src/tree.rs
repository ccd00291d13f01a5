//! Spatial partition tree over obstacle corners.
//!
//! Each internal node splits its corners at a vertical line and keeps, for
//! bands of rows along that line, the vertices that can see across it.
//! Connecting a query point walks one root-to-leaf path.

use std::cmp::Ordering;

use corridor_core::Point;

use crate::graph::Graph;
use crate::visibility::VisibilityIndex;

/// A band of rows `[y0, y1]` along a node's split line.
#[derive(Debug, Clone, Default)]
pub(crate) struct Bucket {
    pub(crate) y0: i32,
    pub(crate) y1: i32,
    /// Vertex at `(split_x, y0)`, if that cell is free.
    pub(crate) top: Option<usize>,
    /// Vertex at `(split_x, y1)`, if that cell is free.
    pub(crate) bottom: Option<usize>,
    pub(crate) left: Vec<usize>,
    pub(crate) right: Vec<usize>,
    pub(crate) on: Vec<usize>,
}

#[derive(Debug, Clone)]
pub(crate) enum Node {
    Internal {
        split_x: i32,
        buckets: Vec<Bucket>,
        left: Option<Box<Node>>,
        right: Option<Box<Node>>,
    },
    Leaf {
        vertices: Vec<usize>,
    },
}

/// Which endpoint of a query is being connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Source,
    Target,
}

impl Node {
    pub(crate) fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => {
                let l = left.as_ref().map_or(0, |n| n.depth());
                let r = right.as_ref().map_or(0, |n| n.depth());
                1 + l.max(r)
            }
        }
    }

    /// Seed every vertex reachable in a straight box from `p` on `side`.
    /// Returns the number of vertices offered.
    pub(crate) fn connect(
        &self,
        vis: &VisibilityIndex,
        graph: &mut Graph,
        p: Point,
        side: Side,
    ) -> usize {
        let mut seeds = Seeder {
            vis,
            graph,
            p,
            side,
            count: 0,
        };
        let mut node = Some(self);
        while let Some(n) = node {
            match n {
                Node::Leaf { vertices } => {
                    seeds.all(vertices);
                    break;
                }
                Node::Internal {
                    split_x,
                    buckets,
                    left,
                    right,
                } => {
                    let split_x = *split_x;
                    let idx = buckets.partition_point(|b| b.y0 <= p.y);
                    if idx == 0 {
                        if let Some(first) = buckets.first() {
                            seeds.one(first.top);
                        }
                    } else {
                        let bb = &buckets[idx - 1];
                        if p.y <= bb.y1 {
                            if split_x >= p.x {
                                seeds.all(&bb.right);
                            }
                            if split_x <= p.x {
                                seeds.all(&bb.left);
                            }
                            seeds.all(&bb.on);
                        } else {
                            // Between two bands: go through their boundary
                            // vertices.
                            seeds.one(bb.bottom);
                            if let Some(next) = buckets.get(idx) {
                                seeds.one(next.top);
                            }
                        }
                    }
                    node = match split_x.cmp(&p.x) {
                        Ordering::Greater => left.as_deref(),
                        Ordering::Less => right.as_deref(),
                        Ordering::Equal => None,
                    };
                }
            }
        }
        seeds.count
    }
}

struct Seeder<'a> {
    vis: &'a VisibilityIndex,
    graph: &'a mut Graph,
    p: Point,
    side: Side,
    count: usize,
}

impl Seeder<'_> {
    fn one(&mut self, v: Option<usize>) {
        let Some(v) = v else {
            return;
        };
        if self.vis.stab_box(self.graph.position(v), self.p) {
            return;
        }
        self.count += 1;
        match self.side {
            Side::Source => self.graph.add_source(v),
            Side::Target => self.graph.add_target(v),
        }
    }

    fn all(&mut self, vs: &[usize]) {
        for &v in vs {
            self.one(Some(v));
        }
    }
}
