//! Disjoint-set forest over chunk-local line indices.

use smallvec::SmallVec;

/// Members of one connected component, in ascending index order.
pub type Component = SmallVec<[usize; 4]>;

/// Union-find with path compression and union by rank.
///
/// Lives for one chunk of one clustering pass; indices are positions in that
/// chunk's line slice.
#[derive(Debug)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Joins the sets of `a` and `b`. Returns false if already joined.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let mut ra = self.find(a);
        let mut rb = self.find(b);
        if ra == rb {
            return false;
        }
        if self.rank[ra] < self.rank[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        if self.rank[ra] == self.rank[rb] {
            self.rank[ra] = self.rank[ra].saturating_add(1);
        }
        true
    }

    /// Connected components ordered by their smallest member.
    ///
    /// The order depends only on the indices, never on which element ended
    /// up as root.
    pub fn components(&mut self) -> Vec<Component> {
        let n = self.len();
        let mut slot_of_root: Vec<Option<usize>> = vec![None; n];
        let mut out: Vec<Component> = Vec::new();
        for i in 0..n {
            let root = self.find(i);
            match slot_of_root[root] {
                Some(slot) => out[slot].push(i),
                None => {
                    slot_of_root[root] = Some(out.len());
                    let mut c = Component::new();
                    c.push(i);
                    out.push(c);
                }
            }
        }
        out
    }
}
