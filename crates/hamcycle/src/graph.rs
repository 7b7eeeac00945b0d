//! Graph store: adjacency lists with reversible arc removal / re-insertion.
//!
//! Grounded in `original_source/Graph.c`: `insertArc`/`removeArc` preserve the
//! "head's `prev` points at the tail" convention so the extender can reach
//! the last arc of a list in O(1) (`L[x].prev`). Arcs live in a single arena
//! (`Vec<ArcRecord>`) addressed by `u32` index rather than raw pointers —
//! the re-architecture called for in `SPEC_FULL.md` §3.

use crate::error::{HcError, HcResult};

/// A graph vertex, `1..=vertex_count`. `0` is the "none" sentinel.
pub type Vertex = u32;

/// Index into the arc arena. `0` is the "none" sentinel; the arena's slot 0
/// is a placeholder record that is never a live arc.
pub type ArcId = u32;

pub const NO_VERTEX: Vertex = 0;
pub const NO_ARC: ArcId = 0;

/// Maximum vertex count the graph store supports (mirrors `GRAPH_MAX_POINTS`).
pub const MAX_POINTS: u32 = 100_000;
/// Maximum graph title length (mirrors `GRAPH_MAX_TITLE_LENGTH`).
pub const MAX_TITLE_LENGTH: usize = 120;

#[derive(Clone, Copy, Debug, Default)]
struct ArcRecord {
    target: Vertex,
    next: ArcId,
    prev: ArcId,
    cross: ArcId,
}

/// Adjacency lists, matrix, and residual degrees for a simple undirected
/// graph, with reversible arc mutation.
#[derive(Clone, Debug)]
pub struct GraphStore {
    name: String,
    vertex_count: u32,
    edge_count: u32,
    arena: Vec<ArcRecord>,
    heads: Vec<ArcId>,
    /// Flattened `(vertex_count+1) x (vertex_count+1)` adjacency matrix.
    matrix: Vec<bool>,
    degree: Vec<u32>,
}

/// A snapshot of adjacency-list order and degree, used to verify that a full
/// unwind restores the graph bit-for-bit (`SPEC_FULL.md` R1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphSnapshot {
    lists: Vec<Vec<Vertex>>,
    degree: Vec<u32>,
}

impl GraphStore {
    /// Allocate an empty graph store for `name` with `vertex_count` vertices.
    pub fn new(name: impl Into<String>, vertex_count: u32) -> HcResult<Self> {
        let name = name.into();
        if name.len() >= MAX_TITLE_LENGTH {
            return Err(HcError::InvalidName);
        }
        if vertex_count > MAX_POINTS {
            return Err(HcError::TooManyVertices);
        }
        let n = vertex_count as usize;
        Ok(Self {
            name,
            vertex_count,
            edge_count: 0,
            arena: vec![ArcRecord::default()],
            heads: vec![NO_ARC; n + 1],
            matrix: vec![false; (n + 1) * (n + 1)],
            degree: vec![0; n + 1],
        })
    }

    /// Build a graph store directly from an edge list (used by the readers).
    pub fn from_edges(
        name: impl Into<String>,
        vertex_count: u32,
        edges: &[(Vertex, Vertex)],
    ) -> HcResult<Self> {
        let mut g = Self::new(name, vertex_count)?;
        for &(x, y) in edges {
            if x == NO_VERTEX || y == NO_VERTEX || x > vertex_count || y > vertex_count || x == y {
                return Err(HcError::InvalidInput(format!(
                    "edge ({x}, {y}) references a vertex outside 1..={vertex_count}"
                )));
            }
            g.create_edge(x, y);
        }
        Ok(g)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn edge_count(&self) -> u32 {
        self.edge_count
    }

    pub fn degree(&self, x: Vertex) -> u32 {
        self.degree[x as usize]
    }

    pub fn set_degree(&mut self, x: Vertex, d: u32) {
        self.degree[x as usize] = d;
    }

    pub fn has_edge(&self, x: Vertex, y: Vertex) -> bool {
        self.matrix[self.idx(x, y)]
    }

    pub fn head(&self, x: Vertex) -> ArcId {
        self.heads[x as usize]
    }

    pub fn arc_target(&self, a: ArcId) -> Vertex {
        self.arena[a as usize].target
    }

    pub fn arc_next(&self, a: ArcId) -> ArcId {
        self.arena[a as usize].next
    }

    pub fn arc_prev(&self, a: ArcId) -> ArcId {
        self.arena[a as usize].prev
    }

    pub fn arc_cross(&self, a: ArcId) -> ArcId {
        self.arena[a as usize].cross
    }

    /// Overwrite an arc's `next` link directly. Used to thread a fully
    /// detached arc (removed from both its lists) onto the removed-edges
    /// stack, reusing the arena slot instead of a separate allocation.
    pub fn set_arc_next(&mut self, a: ArcId, next: ArcId) {
        self.arena[a as usize].next = next;
    }

    /// The tail of `L[x]`, available in O(1) via the head-prev-is-tail
    /// convention.
    pub fn tail(&self, x: Vertex) -> ArcId {
        let h = self.heads[x as usize];
        if h == NO_ARC {
            NO_ARC
        } else {
            self.arena[h as usize].prev
        }
    }

    fn idx(&self, x: Vertex, y: Vertex) -> usize {
        (x as usize) * (self.vertex_count as usize + 1) + y as usize
    }

    /// Detach `a` from `L[x]` without freeing the node. Maintains the
    /// head-prev-points-to-tail invariant.
    pub fn remove_arc(&mut self, x: Vertex, a: ArcId) {
        let n = self.arena[a as usize].next;
        let p = self.arena[a as usize].prev;
        if self.heads[x as usize] == a {
            self.heads[x as usize] = n;
            if n != NO_ARC {
                self.arena[n as usize].prev = p;
            }
        } else {
            self.arena[p as usize].next = n;
            if n != NO_ARC {
                self.arena[n as usize].prev = p;
            } else {
                let head = self.heads[x as usize];
                self.arena[head as usize].prev = p;
            }
        }
    }

    /// Attach `a` at the head of `L[x]`. Maintains the same invariant.
    pub fn insert_arc(&mut self, x: Vertex, a: ArcId) {
        let old_head = self.heads[x as usize];
        if old_head != NO_ARC {
            let tail = self.arena[old_head as usize].prev;
            self.arena[a as usize].prev = tail;
            self.arena[a as usize].next = old_head;
            self.arena[old_head as usize].prev = a;
        } else {
            self.arena[a as usize].next = NO_ARC;
            self.arena[a as usize].prev = a;
        }
        self.heads[x as usize] = a;
    }

    /// Create the undirected edge `{x, y}`. Duplicates are silently ignored.
    /// Returns `true` iff a new edge was created.
    pub fn create_edge(&mut self, x: Vertex, y: Vertex) -> bool {
        if x == y {
            return false;
        }
        if self.matrix[self.idx(x, y)] {
            return false;
        }

        let n1 = self.arena.len() as ArcId;
        self.arena.push(ArcRecord {
            target: y,
            next: NO_ARC,
            prev: NO_ARC,
            cross: n1 + 1,
        });
        let n2 = self.arena.len() as ArcId;
        self.arena.push(ArcRecord {
            target: x,
            next: NO_ARC,
            prev: NO_ARC,
            cross: n1,
        });

        self.insert_arc(y, n2);
        self.insert_arc(x, n1);

        let i = self.idx(x, y);
        let j = self.idx(y, x);
        self.matrix[i] = true;
        self.matrix[j] = true;

        self.edge_count += 1;
        self.degree[x as usize] += 1;
        self.degree[y as usize] += 1;

        true
    }

    /// Snapshot adjacency-list order and degree for later comparison.
    pub fn snapshot(&self) -> GraphSnapshot {
        let mut lists = Vec::with_capacity(self.vertex_count as usize + 1);
        lists.push(Vec::new());
        for x in 1..=self.vertex_count {
            let mut list = Vec::new();
            let mut a = self.heads[x as usize];
            while a != NO_ARC {
                list.push(self.arena[a as usize].target);
                a = self.arena[a as usize].next;
            }
            lists.push(list);
        }
        GraphSnapshot {
            lists,
            degree: self.degree.clone(),
        }
    }

    /// Panics if the current adjacency order/degree differ from `snapshot`.
    /// Used to validate `SPEC_FULL.md` R1 (full unwind restores the graph
    /// bit-for-bit).
    pub fn assert_matches_snapshot(&self, snapshot: &GraphSnapshot) {
        let now = self.snapshot();
        assert_eq!(
            now, *snapshot,
            "graph state diverged from its pristine snapshot after a full unwind"
        );
    }

    /// Debug-only variant of [`Self::assert_matches_snapshot`], compiled out
    /// of release builds. A search session can call this after every full
    /// unwind to continuously diff the residual graph against its pristine
    /// snapshot, rather than only at dedicated test boundaries.
    #[cfg(debug_assertions)]
    pub fn debug_assert_matches_pristine(&self, snapshot: &GraphSnapshot) {
        self.assert_matches_snapshot(snapshot);
    }

    #[cfg(not(debug_assertions))]
    pub fn debug_assert_matches_pristine(&self, _snapshot: &GraphSnapshot) {}

    /// Check universal invariants 1 and 2 from `SPEC_FULL.md` §8: cross-arc
    /// symmetry, and head.prev == tail for every non-empty list.
    pub fn assert_structural_invariants(&self) {
        for x in 1..=self.vertex_count {
            let head = self.heads[x as usize];
            if head == NO_ARC {
                continue;
            }
            let tail = self.arena[head as usize].prev;
            let mut a = head;
            let mut last;
            loop {
                let rec = self.arena[a as usize];
                assert_ne!(rec.cross, NO_ARC, "arc has no cross link");
                let cross = self.arena[rec.cross as usize];
                assert_eq!(cross.cross, a, "cross link is not involutive");
                assert_eq!(cross.target, x, "cross arc must target the tail of the original arc");
                last = a;
                if rec.next == NO_ARC {
                    break;
                }
                a = rec.next;
            }
            assert_eq!(last, tail, "head.prev must equal the tail of the list");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> GraphStore {
        let mut g = GraphStore::new("triangle", 3).unwrap();
        g.create_edge(1, 2);
        g.create_edge(2, 3);
        g.create_edge(3, 1);
        g
    }

    #[test]
    fn create_edge_is_symmetric() {
        let g = triangle();
        assert!(g.has_edge(1, 2) && g.has_edge(2, 1));
        assert_eq!(g.degree(1), 2);
        assert_eq!(g.edge_count(), 3);
        g.assert_structural_invariants();
    }

    #[test]
    fn create_edge_rejects_duplicates_and_self_loops() {
        let mut g = triangle();
        assert!(!g.create_edge(1, 2));
        assert!(!g.create_edge(1, 1));
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn remove_then_reinsert_restores_snapshot() {
        let mut g = triangle();
        let before = g.snapshot();

        let a = g.head(1);
        let x = 1;
        g.remove_arc(x, a);
        assert_eq!(g.degree(1), 1);

        g.insert_arc(x, a);
        g.set_degree(1, g.degree(1) + 1);
        g.assert_matches_snapshot(&before);
        g.assert_structural_invariants();
    }

    #[test]
    fn from_edges_builds_consistent_adjacency() {
        let g = GraphStore::from_edges("k4", 4, &[(1, 2), (1, 3), (1, 4), (2, 3), (2, 4), (3, 4)])
            .unwrap();
        assert_eq!(g.edge_count(), 6);
        for v in 1..=4 {
            assert_eq!(g.degree(v), 3);
        }
        g.assert_structural_invariants();
    }
}
