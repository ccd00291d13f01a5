//! Pairing heap over arena indices.
//!
//! Each slot carries its key and three links: `left` (first child), `right`
//! (next sibling) and `parent` (the parent for a first child, otherwise the
//! previous sibling). [`NIL`] stands for "no node" and compares below every
//! key. Slots are never freed; a search [`reset`](PairingHeap::reset)s the
//! ones it touched so the heap can be reused without reallocating.

pub(crate) const NIL: usize = usize::MAX;

#[derive(Debug, Clone, Copy)]
struct Slot {
    weight: f64,
    left: usize,
    right: usize,
    parent: usize,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            weight: 0.0,
            left: NIL,
            right: NIL,
            parent: NIL,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct PairingHeap {
    slots: Vec<Slot>,
    root: usize,
}

impl Default for PairingHeap {
    fn default() -> Self {
        Self::new(0)
    }
}

impl PairingHeap {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            slots: vec![Slot::default(); len],
            root: NIL,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.root == NIL
    }

    /// The minimum node, if any.
    pub(crate) fn peek(&self) -> Option<usize> {
        (self.root != NIL).then_some(self.root)
    }

    pub(crate) fn weight(&self, i: usize) -> f64 {
        self.slots[i].weight
    }

    fn key(&self, i: usize) -> f64 {
        if i == NIL {
            f64::NEG_INFINITY
        } else {
            self.slots[i].weight
        }
    }

    fn left(&self, i: usize) -> usize {
        if i == NIL { NIL } else { self.slots[i].left }
    }

    fn right(&self, i: usize) -> usize {
        if i == NIL { NIL } else { self.slots[i].right }
    }

    fn set_left(&mut self, i: usize, v: usize) {
        if i != NIL {
            self.slots[i].left = v;
        }
    }

    fn set_right(&mut self, i: usize, v: usize) {
        if i != NIL {
            self.slots[i].right = v;
        }
    }

    fn set_parent(&mut self, i: usize, v: usize) {
        if i != NIL {
            self.slots[i].parent = v;
        }
    }

    /// Make `b` the first child of `a`.
    fn link(&mut self, a: usize, b: usize) -> usize {
        let al = self.left(a);
        self.set_right(b, al);
        self.set_parent(al, b);
        self.set_parent(b, a);
        self.set_left(a, b);
        self.set_right(a, NIL);
        a
    }

    fn merge(&mut self, a: usize, b: usize) -> usize {
        if a == NIL {
            b
        } else if b == NIL {
            a
        } else if self.key(a) < self.key(b) {
            self.link(a, b)
        } else {
            self.link(b, a)
        }
    }

    /// Insert a detached node with the given key.
    pub(crate) fn push(&mut self, node: usize, weight: f64) {
        self.slots[node].weight = weight;
        let root = self.root;
        if root == NIL {
            self.root = node;
        } else if self.key(root) < weight {
            let l = self.left(root);
            self.set_right(node, l);
            self.set_parent(l, node);
            self.set_parent(node, root);
            self.set_left(root, node);
        } else {
            let l = self.left(node);
            self.set_right(root, l);
            self.set_parent(l, root);
            self.set_parent(root, node);
            self.set_left(node, root);
            self.root = node;
        }
    }

    /// Remove and return the minimum node.
    pub(crate) fn pop(&mut self) -> Option<usize> {
        let top = self.peek()?;
        let mut ret = self.left(top);
        self.set_left(top, NIL);

        // Repeated pairwise merging of the root's children.
        loop {
            let q = self.right(ret);
            if q == NIL {
                break;
            }
            let mut p = ret;
            let mut r = self.right(q);
            let mut s = self.merge(p, q);
            ret = s;
            loop {
                p = r;
                let q = self.right(r);
                if q == NIL {
                    break;
                }
                r = self.right(q);
                let m = self.merge(p, q);
                self.set_right(s, m);
                s = m;
            }
            self.set_right(s, NIL);
            if p != NIL {
                self.set_right(p, ret);
                ret = p;
            }
        }
        self.set_parent(ret, NIL);
        self.root = ret;
        Some(top)
    }

    /// Lower the key of a node already in the heap.
    pub(crate) fn decrease_key(&mut self, p: usize, weight: f64) {
        self.slots[p].weight = weight;
        let q = self.slots[p].parent;
        if q == NIL || self.key(q) < weight {
            return;
        }

        // Splice `p` (with its subtree) out of its sibling list.
        let r = self.right(p);
        self.set_parent(r, q);
        if self.left(q) == p {
            self.set_left(q, r);
        } else {
            self.set_right(q, r);
        }

        let root = self.root;
        if self.key(root) <= weight {
            let l = self.left(root);
            self.set_parent(l, p);
            self.set_right(p, l);
            self.set_left(root, p);
            self.set_parent(p, root);
        } else {
            let l = self.left(p);
            self.set_right(root, l);
            self.set_parent(l, root);
            self.set_left(p, root);
            self.set_parent(root, p);
            self.set_right(p, NIL);
            self.set_parent(p, NIL);
            self.root = p;
        }
    }

    /// Detach a node's links. Used when a search cleans up.
    pub(crate) fn reset(&mut self, i: usize) {
        let slot = &mut self.slots[i];
        slot.left = NIL;
        slot.right = NIL;
        slot.parent = NIL;
    }

    /// Forget the current root. Every node still linked must be
    /// [`reset`](Self::reset) before it is pushed again.
    pub(crate) fn clear_root(&mut self) {
        self.root = NIL;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngExt, SeedableRng};

    fn drain(h: &mut PairingHeap) -> Vec<f64> {
        let mut out = Vec::new();
        while let Some(i) = h.pop() {
            out.push(h.weight(i));
        }
        out
    }

    #[test]
    fn pops_in_order() {
        let mut h = PairingHeap::new(6);
        for (i, w) in [5.0, 1.0, 4.0, 3.0, 9.0, 2.0].into_iter().enumerate() {
            h.push(i, w);
        }
        assert_eq!(h.peek(), Some(1));
        assert_eq!(drain(&mut h), vec![1.0, 2.0, 3.0, 4.0, 5.0, 9.0]);
        assert!(h.is_empty());
        assert_eq!(h.pop(), None);
    }

    #[test]
    fn decrease_key_moves_node_up() {
        let mut h = PairingHeap::new(4);
        h.push(0, 10.0);
        h.push(1, 20.0);
        h.push(2, 30.0);
        h.push(3, 40.0);
        h.decrease_key(3, 5.0);
        assert_eq!(h.peek(), Some(3));
        h.decrease_key(2, 15.0);
        let order: Vec<usize> = std::iter::from_fn(|| h.pop()).collect();
        assert_eq!(order, vec![3, 0, 2, 1]);
    }

    #[test]
    fn decrease_key_on_root_is_noop_structurally() {
        let mut h = PairingHeap::new(2);
        h.push(0, 3.0);
        h.push(1, 4.0);
        h.decrease_key(0, 1.0);
        assert_eq!(drain(&mut h), vec![1.0, 4.0]);
    }

    #[test]
    fn random_operations_match_sorting() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = 300;
        let mut h = PairingHeap::new(n);
        let mut keys = vec![0.0; n];
        for (i, k) in keys.iter_mut().enumerate() {
            *k = rng.random_range(0..1000) as f64;
            h.push(i, *k);
        }
        for _ in 0..200 {
            let i = rng.random_range(0..n);
            let nk = keys[i] - rng.random_range(0..50) as f64;
            keys[i] = nk;
            h.decrease_key(i, nk);
        }
        keys.sort_by(f64::total_cmp);
        assert_eq!(drain(&mut h), keys);
    }

    #[test]
    fn reuse_after_reset() {
        let mut h = PairingHeap::new(3);
        h.push(0, 1.0);
        h.push(1, 2.0);
        h.push(2, 3.0);
        assert_eq!(h.pop(), Some(0));
        for i in 0..3 {
            h.reset(i);
        }
        h.clear_root();
        h.push(2, 0.5);
        h.push(0, 7.0);
        assert_eq!(drain(&mut h), vec![0.5, 7.0]);
    }
}
