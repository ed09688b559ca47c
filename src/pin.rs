//! Pin handles and the build-time disjoint-set used to join them into nodes.

use crate::node::NodeId;

/// A terminal of a component, once the owning [`crate::circuit::Circuit`]
/// has been built.
///
/// Pins are created with their owning component and share its lifetime;
/// each is bound to exactly one [`NodeId`] after `build()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinId(pub usize);

#[derive(Debug, Clone)]
pub struct Pin {
    pub id: PinId,
    pub node: NodeId,
}

/// Disjoint-set arena over build-time pin handles.
///
/// `connect(a, b)` unions the sets containing `a` and `b`; `ground(a)`
/// marks the whole set containing `a` as the ground set. Union-by-size
/// keeps `find` cheap even without path halving, though path compression
/// is applied anyway since pin counts can run into the thousands for
/// large-wire-approximation inputs (the scenario Line compression exists
/// to handle).
///
/// Each arena slot carries two bits that survive a union as the OR of
/// the merged sets': `has_real`, set for any pin that also attaches to
/// a non-virtual terminal (see `LineCompiler`'s break-point rule), and
/// `is_ground`, set by an explicit `ground()` call.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
    has_real: Vec<bool>,
    is_ground: Vec<bool>,
}

impl UnionFind {
    pub fn new() -> Self {
        UnionFind {
            parent: Vec::new(),
            size: Vec::new(),
            has_real: Vec::new(),
            is_ground: Vec::new(),
        }
    }

    /// Allocates a new singleton set and returns its index.
    pub fn push(&mut self, has_real: bool) -> usize {
        let idx = self.parent.len();
        self.parent.push(idx);
        self.size.push(1);
        self.has_real.push(has_real);
        self.is_ground.push(false);
        idx
    }

    pub fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            let root = self.find(self.parent[x]);
            self.parent[x] = root;
        }
        self.parent[x]
    }

    /// Unions the sets containing `a` and `b`; a no-op if already joined.
    pub fn union(&mut self, a: usize, b: usize) {
        let mut ra = self.find(a);
        let mut rb = self.find(b);
        if ra == rb {
            return;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
        self.has_real[ra] = self.has_real[ra] || self.has_real[rb];
        self.is_ground[ra] = self.is_ground[ra] || self.is_ground[rb];
    }

    pub fn mark_ground(&mut self, x: usize) {
        let root = self.find(x);
        self.is_ground[root] = true;
    }

    pub fn is_ground(&mut self, x: usize) -> bool {
        let root = self.find(x);
        self.is_ground[root]
    }

    pub fn has_real(&mut self, x: usize) -> bool {
        let root = self.find(x);
        self.has_real[root]
    }

    pub fn class_size(&mut self, x: usize) -> usize {
        let root = self.find(x);
        self.size[root]
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}

impl Default for UnionFind {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_merges_bits() {
        let mut uf = UnionFind::new();
        let a = uf.push(false);
        let b = uf.push(true);
        assert_ne!(uf.find(a), uf.find(b));
        uf.union(a, b);
        assert_eq!(uf.find(a), uf.find(b));
        assert!(uf.has_real(a));
        assert_eq!(uf.class_size(a), 2);
    }

    #[test]
    fn ground_mark_propagates_through_union() {
        let mut uf = UnionFind::new();
        let a = uf.push(false);
        let b = uf.push(false);
        uf.mark_ground(a);
        uf.union(b, a);
        assert!(uf.is_ground(b));
    }

    #[test]
    fn singleton_class_has_size_one() {
        let mut uf = UnionFind::new();
        let a = uf.push(false);
        assert_eq!(uf.class_size(a), 1);
    }
}
