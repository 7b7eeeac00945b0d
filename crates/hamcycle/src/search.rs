//! Search driver: the reversible Turing-machine loop over the tape.
//!
//! Grounded in `original_source/HamiltonianCycle.c`'s `hc_state`/`HCStateRef`
//! and the `unwindSearchEdge` / `rotateAnchorPoint` / `restoreAnchorPoint` /
//! `ensureConsistent` / `pruneSearchSpace` / `runTuringMachine*` family.
//! `SearchSession` owns every piece of mutable state exclusively (the graph,
//! the tape, the residual degree/virtual-edge arrays, the pruning DFS scratch
//! buffers) so the whole machine runs without `unsafe` or interior
//! mutability — there is never a second live reference into any of it.

use crate::dfs::DfsAnalyzer;
use crate::error::{HcError, HcResult};
use crate::graph::{GraphStore, Vertex, NO_ARC, NO_VERTEX};
use crate::status::TapeStatus;
use crate::tape::Tape;

/// Tunable behavior for a search session.
#[derive(Clone, Copy, Debug)]
pub struct SearchCfg {
    /// Enable the cutpoint/bipartite-diff pruning oracle between pivots.
    /// Disabling this still finds every Hamiltonian cycle, just slower on
    /// graphs with a lot of dead search space.
    pub pruning: bool,
}

impl Default for SearchCfg {
    fn default() -> Self {
        Self { pruning: true }
    }
}

/// A single reversible search over one graph's Hamiltonian cycles.
///
/// Call [`SearchSession::first_cycle`] to find the first cycle (if any),
/// then [`SearchSession::next_cycle`] repeatedly to enumerate the rest. Each
/// call leaves the graph fully restored whenever no cycle is returned.
pub struct SearchSession {
    pub(crate) graph: GraphStore,
    pub(crate) cfg: SearchCfg,
    pub(crate) tape: Tape,
    /// Residual degree during search; starts as a copy of the graph's
    /// structural degree and is driven down as vertices fold into segments.
    pub(crate) degree: Vec<u32>,
    /// `e[x]`: the other endpoint of the segment `x` terminates, or 0.
    pub(crate) virtual_edge: Vec<Vertex>,
    /// `nv[x]`: the next vertex to visit in search order, or 0 at the end.
    pub(crate) vertex_order: Vec<Vertex>,
    /// Head of the most recent branch's removed-edges list, threaded
    /// through arc `next` fields once an arc is detached from the graph.
    pub(crate) removed_edges: crate::graph::ArcId,
    pub(crate) removed_edges_stack: Vec<crate::graph::ArcId>,
    pub(crate) deg2_stack: Vec<Vertex>,
    pub(crate) dfs: DfsAnalyzer,
    pub(crate) is_hamiltonian: bool,
    pub(crate) is_hamilton_cycle: bool,
}

impl SearchSession {
    /// Build a session over `graph`, visiting vertices in the order given
    /// by `order` (a permutation of `1..=graph.vertex_count()`).
    pub fn new(graph: GraphStore, order: &[Vertex], cfg: SearchCfg) -> HcResult<Self> {
        let n = graph.vertex_count();
        if order.len() != n as usize {
            return Err(HcError::InvalidInput(format!(
                "vertex order has {} entries, expected {}",
                order.len(),
                n
            )));
        }

        let mut vertex_order = vec![NO_VERTEX; n as usize + 1];
        if n > 0 {
            vertex_order[0] = order[0];
            for w in order.windows(2) {
                vertex_order[w[0] as usize] = w[1];
            }
            vertex_order[order[n as usize - 1] as usize] = NO_VERTEX;
        }

        let mut degree = vec![0u32; n as usize + 1];
        for x in 1..=n {
            degree[x as usize] = graph.degree(x);
        }

        let dfs = DfsAnalyzer::new(n);
        let tape = Tape::new(n);

        Ok(Self {
            graph,
            cfg,
            tape,
            degree,
            virtual_edge: vec![0; n as usize + 1],
            vertex_order,
            removed_edges: NO_ARC,
            removed_edges_stack: Vec::new(),
            deg2_stack: Vec::new(),
            dfs,
            is_hamiltonian: false,
            is_hamilton_cycle: false,
        })
    }

    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    pub fn cfg(&self) -> SearchCfg {
        self.cfg
    }

    /// Whether the graph has (or is currently positioned on) a Hamiltonian
    /// cycle, per `hc_flags.isHamiltonian`.
    pub fn is_hamiltonian(&self) -> bool {
        self.is_hamiltonian
    }

    /// Find the first Hamiltonian cycle, using the configured pruning mode.
    pub fn first_cycle(&mut self) -> bool {
        if self.cfg.pruning {
            self.first_hamiltonian_cycle_with_pruning()
        } else {
            self.first_hamiltonian_cycle()
        }
    }

    /// Find the next Hamiltonian cycle after the current one.
    pub fn next_cycle(&mut self) -> bool {
        if self.cfg.pruning {
            self.next_hamiltonian_cycle_with_pruning()
        } else {
            self.next_hamiltonian_cycle()
        }
    }

    pub fn first_hamiltonian_cycle(&mut self) -> bool {
        self.reset_state_and_restore_graph();
        if self.prime_tape() && !self.run_turing_machine() {
            return false;
        }
        self.is_hamiltonian = self.is_hamilton_cycle;
        self.is_hamilton_cycle
    }

    pub fn next_hamiltonian_cycle(&mut self) -> bool {
        self.run_turing_machine()
    }

    pub fn first_hamiltonian_cycle_with_pruning(&mut self) -> bool {
        self.reset_state_and_restore_graph();
        if self.prime_tape() && !self.run_turing_machine_with_pruning() {
            return false;
        }
        self.is_hamiltonian = self.is_hamilton_cycle;
        self.is_hamilton_cycle
    }

    pub fn next_hamiltonian_cycle_with_pruning(&mut self) -> bool {
        self.run_turing_machine_with_pruning()
    }

    /// Edges of the currently-positioned Hamiltonian cycle, grounded in
    /// `getCurrentHamiltonianCycleEdges`. Valid only right after a
    /// `first_cycle`/`next_cycle` call returned `true`.
    pub fn current_cycle_edges(&self) -> Vec<(Vertex, Vertex)> {
        self.tape
            .cycle_arcs(self.graph.vertex_count())
            .map(|a| {
                let x = self.graph.arc_target(a);
                let c = self.graph.arc_cross(a);
                let y = self.graph.arc_target(c);
                (x, y)
            })
            .collect()
    }

    /// The two cycle-neighbors of every vertex, indexed `1..=vertex_count`,
    /// grounded directly in `getCurrentHamiltonianCycle`'s `v`/`vn` pair of
    /// arrays. Valid only right after a `first_cycle`/`next_cycle` call
    /// returned `true`.
    pub fn current_cycle_neighbors(&self) -> (Vec<Vertex>, Vec<Vertex>) {
        let n = self.graph.vertex_count() as usize;
        let mut v = vec![0 as Vertex; n + 1];
        let mut vn = vec![0 as Vertex; n + 1];

        for (x, y) in self.current_cycle_edges() {
            if v[x as usize] == 0 {
                v[x as usize] = y;
            } else {
                vn[x as usize] = y;
            }
            if v[y as usize] == 0 {
                v[y as usize] = x;
            } else {
                vn[y as usize] = x;
            }
        }

        (v, vn)
    }

    /// The currently-positioned Hamiltonian cycle as an ordered tour
    /// starting at vertex 1, built by walking [`Self::current_cycle_neighbors`].
    /// Oriented so the smaller-labeled neighbor of 1 comes second, matching
    /// `print_cycle`'s listing convention (`SPEC_FULL.md` §6.3).
    pub fn current_cycle_vertices(&self) -> Vec<Vertex> {
        let n = self.graph.vertex_count() as usize;
        let (neighbor_a, neighbor_b) = self.current_cycle_neighbors();

        let mut tour = Vec::with_capacity(n);
        if n == 0 {
            return tour;
        }
        let mut prev: Vertex = 1;
        let mut cur: Vertex = neighbor_a[1].min(neighbor_b[1]);
        tour.push(1);
        for _ in 1..n {
            tour.push(cur);
            let next = if neighbor_a[cur as usize] != prev {
                neighbor_a[cur as usize]
            } else {
                neighbor_b[cur as usize]
            };
            prev = cur;
            cur = next;
        }
        tour
    }

    /// Consume the session and return the graph, restored to its pristine
    /// state, without waiting on drop ordering. `Drop` already restores the
    /// graph in place; this just hands the restored copy back to the
    /// caller instead of discarding it.
    pub fn into_graph(mut self) -> GraphStore {
        self.restore_graph();
        self.graph.clone()
    }

    fn restore_in_arcs_with_count(&mut self, a: crate::graph::ArcId) -> u32 {
        let mut count = 0u32;
        let mut p = self.graph.arc_prev(a);
        while p != a {
            let v = self.graph.arc_target(p);
            let pc = self.graph.arc_cross(p);
            self.graph.insert_arc(v, pc);
            self.degree[v as usize] += 1;
            p = self.graph.arc_prev(p);
            count += 1;
        }
        count
    }

    fn restore_edges(&mut self, mut a: crate::graph::ArcId) {
        while a != NO_ARC {
            let n = self.graph.arc_next(a);
            let u = self.graph.arc_target(a);
            let c = self.graph.arc_cross(a);
            let v = self.graph.arc_target(c);
            self.graph.insert_arc(u, c);
            self.graph.insert_arc(v, a);
            self.degree[u as usize] += 1;
            self.degree[v as usize] += 1;
            a = n;
        }
    }

    fn unroll_arc(&mut self, a: crate::graph::ArcId, k: TapeStatus) {
        if k.contains(TapeStatus::ENDPOINT) {
            let c = self.graph.arc_cross(a);
            let x = self.graph.arc_target(c);
            self.graph.insert_arc(x, a);
            self.virtual_edge[x as usize] = 0;
        } else if k.contains(TapeStatus::FORCED) {
            let c = self.graph.arc_cross(a);
            let x = self.graph.arc_target(c);
            let ex = self.virtual_edge[x as usize];
            self.virtual_edge[ex as usize] = x;
            self.degree[x as usize] = if k.contains(TapeStatus::FORCED_DEG2) {
                self.restore_in_arcs_with_count(a) + 2
            } else {
                2
            };
        }
    }

    fn unwind_search_edge(&mut self, mut hx: usize) -> usize {
        let mut k = self.tape.get(hx).status;

        while !(k.contains(TapeStatus::ANCHOR_POINT) || k.contains(TapeStatus::TERMINATE)) {
            let entry = self.tape.get(hx);
            let a = entry.arc;
            let x = self.graph.arc_target(a);

            self.unroll_arc(a, k);

            self.degree[x as usize] = 2;
            let ex = self.virtual_edge[x as usize];
            self.virtual_edge[ex as usize] = x;

            hx -= 1;
            k = self.tape.get(hx).status;
        }

        hx
    }

    fn rotate_anchor_point(&mut self, hx: usize) -> Vertex {
        // Re-base the degree-2 stack, mirroring `Vertex *d2 = s->deg2Stack;`:
        // a rotation always starts from empty, discarding whatever the dead
        // end we're backing out of left behind.
        self.deg2_stack.clear();

        let entry = self.tape.get(hx);
        let a = entry.arc;
        let k = entry.status;
        let x = self.graph.arc_target(a);
        let c = self.graph.arc_cross(a);
        let y = self.graph.arc_target(c);

        if k.contains(TapeStatus::ANCHOR_EXTEND) {
            self.unroll_arc(a, k);
            let ex = self.virtual_edge[x as usize];
            self.virtual_edge[ex as usize] = x;
            self.degree[x as usize] = 2 + self.restore_in_arcs_with_count(c);
            self.graph.remove_arc(x, c);
            self.graph.remove_arc(y, a);
        } else {
            self.virtual_edge[x as usize] = 0;
            self.virtual_edge[y as usize] = 0;
        }

        self.restore_edges(self.removed_edges);

        let prev_head = self.removed_edges_stack.pop().unwrap_or(NO_ARC);
        self.graph.set_arc_next(a, prev_head);
        self.removed_edges = a;

        self.degree[y as usize] -= 1;
        if self.degree[y as usize] == 2 {
            self.deg2_stack.push(y);
        }
        self.degree[x as usize] -= 1;
        if self.degree[x as usize] == 2 {
            self.deg2_stack.push(x);
        }

        self.tape.set_pos(hx - 1);

        if k.contains(TapeStatus::FLIP_SOURCE) {
            y
        } else {
            x
        }
    }

    fn restore_anchor_point(&mut self, hx: usize) {
        let entry = self.tape.get(hx);
        let k = entry.status;
        let a = entry.arc;
        let c = self.graph.arc_cross(a);
        let x = self.graph.arc_target(a);
        let y = self.graph.arc_target(c);

        if k.contains(TapeStatus::ANCHOR_EXTEND) {
            self.unroll_arc(a, k);
            let ex = self.virtual_edge[x as usize];
            self.virtual_edge[ex as usize] = x;
            self.degree[x as usize] = 2 + self.restore_in_arcs_with_count(c);
        } else {
            self.virtual_edge[x as usize] = 0;
            self.virtual_edge[y as usize] = 0;
            self.graph.insert_arc(x, c);
            self.graph.insert_arc(y, a);
        }

        self.restore_edges(self.removed_edges);
        self.removed_edges = self.removed_edges_stack.pop().unwrap_or(NO_ARC);
    }

    fn ensure_consistent(&mut self, x: Vertex) -> Vertex {
        let y = match self.deg2_stack.pop() {
            Some(v) => v,
            None => return x,
        };

        let mut ey = self.virtual_edge[y as usize];
        if ey != 0 {
            self.degree[y as usize] = 0;
        } else {
            ey = y;
        }

        let a = self.graph.head(y);
        if !self.extend_segments(a, ey, TapeStatus::empty()) {
            return 0;
        }

        let mut x = x;
        if self.degree[x as usize] == 0 {
            loop {
                x = self.vertex_order[x as usize];
                if self.degree[x as usize] != 0 {
                    break;
                }
            }
        }

        x
    }

    fn prune_search_space(&mut self, mut c: i32) -> usize {
        let mut stop = self.tape.pos();
        let mut k = self.tape.get(stop).status;

        while !k.contains(TapeStatus::TERMINATE) && c > 0 {
            if k.contains(TapeStatus::ANCHOR_TYPE1) {
                c -= 1;
            }
            if k.contains(TapeStatus::ANCHOR_POINT) {
                c -= 1;
            }
            if k.contains(TapeStatus::FORCED_DEG2) {
                c -= 1;
            }

            stop -= 1;
            k = self.tape.get(stop).status;
        }

        stop += 1;

        let mut hx = self.unwind_search_edge(self.tape.pos());
        while hx > stop {
            self.restore_anchor_point(hx);
            hx = self.unwind_search_edge(hx - 1);
        }

        hx
    }

    fn run_turing_machine(&mut self) -> bool {
        let mut hx = self.unwind_search_edge(self.tape.pos());
        self.is_hamilton_cycle = false;

        while !self.tape.get(hx).status.contains(TapeStatus::TERMINATE) {
            let x0 = self.rotate_anchor_point(hx);
            let mut x = self.ensure_consistent(x0);

            if x != 0 {
                while self.extend_anchor(x) {
                    loop {
                        x = self.vertex_order[x as usize];
                        if self.degree[x as usize] != 0 {
                            break;
                        }
                    }
                }
            }

            if self.is_hamilton_cycle {
                return true;
            }
            hx = self.unwind_search_edge(self.tape.pos());
        }

        self.tape.set_pos(hx);
        false
    }

    fn run_turing_machine_with_pruning(&mut self) -> bool {
        let low: usize = 0;
        let mut high: usize = low;
        let mut prune = false;

        let mut hx = self.unwind_search_edge(self.tape.pos());
        self.is_hamilton_cycle = false;

        while !self.tape.get(hx).status.contains(TapeStatus::TERMINATE) {
            let x1 = self.rotate_anchor_point(hx);
            let mut x = self.ensure_consistent(x1);

            if x != 0 {
                if prune {
                    if x != x1 {
                        let status = self.tape.get(hx).status;
                        self.tape.set_status(hx, status | TapeStatus::ANCHOR_TYPE1);
                    }
                    high = low;

                    let mut c: u32 = 1;
                    let mut v = x;
                    loop {
                        v = self.vertex_order[v as usize];
                        if v == 0 {
                            break;
                        }
                        if self.degree[v as usize] != 0 {
                            c += 1;
                        }
                    }

                    let (diff, infeasible) = self.dfs.get_component_diff(
                        &self.graph,
                        &self.virtual_edge,
                        &self.degree,
                        &self.vertex_order,
                        x,
                        c,
                        x == x1,
                    );
                    if infeasible {
                        hx = self.prune_search_space(diff as i32);
                        continue;
                    }
                    prune = false;
                }

                while self.extend_anchor(x) {
                    loop {
                        x = self.vertex_order[x as usize];
                        if self.degree[x as usize] != 0 {
                            break;
                        }
                    }
                }
            }

            if self.is_hamilton_cycle {
                return true;
            }
            hx = self.unwind_search_edge(self.tape.pos());

            if hx > high {
                high = hx;
            } else {
                prune = hx < high;
            }
        }

        self.tape.set_pos(hx);
        false
    }

    fn restore_graph(&mut self) {
        let mut hx = self.unwind_search_edge(self.tape.pos());

        while !self.tape.get(hx).status.contains(TapeStatus::TERMINATE) {
            self.restore_anchor_point(hx);
            hx = self.unwind_search_edge(hx - 1);
        }

        self.restore_edges(self.removed_edges);
    }

    fn reset_state_and_restore_graph(&mut self) {
        self.restore_graph();

        self.is_hamiltonian = false;
        self.is_hamilton_cycle = false;

        self.virtual_edge.iter_mut().for_each(|v| *v = 0);
        self.tape.reset();

        self.removed_edges = NO_ARC;
        self.removed_edges_stack.clear();
        self.deg2_stack.clear();
    }
}

impl Drop for SearchSession {
    /// Mirrors `releaseHCState`'s call to `restoreGraph` before freeing the
    /// state: dropping a session with a branch still open leaves the
    /// underlying graph fully restored rather than half-reduced.
    fn drop(&mut self) {
        self.restore_graph();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex_order::sort_vertices_degree_desc;

    fn complete_graph(n: u32) -> GraphStore {
        let mut g = GraphStore::new(format!("K{n}"), n).unwrap();
        for x in 1..=n {
            for y in (x + 1)..=n {
                g.create_edge(x, y);
            }
        }
        g
    }

    fn cycle_graph(n: u32) -> GraphStore {
        let mut g = GraphStore::new(format!("C{n}"), n).unwrap();
        for x in 1..n {
            g.create_edge(x, x + 1);
        }
        g.create_edge(n, 1);
        g
    }

    fn star_graph(n: u32) -> GraphStore {
        let mut g = GraphStore::new(format!("S{n}"), n).unwrap();
        for x in 2..=n {
            g.create_edge(1, x);
        }
        g
    }

    fn count_cycles(g: GraphStore, pruning: bool) -> u64 {
        let order = sort_vertices_degree_desc(&g);
        let mut session = SearchSession::new(g, &order, SearchCfg { pruning }).unwrap();
        let mut c = 0u64;
        if session.first_cycle() {
            c += 1;
            while session.next_cycle() {
                c += 1;
            }
        }
        c
    }

    #[test]
    fn cycle_graph_has_exactly_one_hamiltonian_cycle() {
        for n in [3u32, 4, 5, 6] {
            assert_eq!(count_cycles(cycle_graph(n), false), 1, "C{n}");
            assert_eq!(count_cycles(cycle_graph(n), true), 1, "C{n} (pruned)");
        }
    }

    #[test]
    fn star_graph_has_no_hamiltonian_cycle() {
        assert_eq!(count_cycles(star_graph(5), false), 0);
        assert_eq!(count_cycles(star_graph(5), true), 0);
    }

    #[test]
    fn complete_graph_cycle_count_matches_formula() {
        // Distinct undirected Hamiltonian cycles of K_n: (n-1)!/2.
        for (n, expected) in [(3u32, 1u64), (4, 3), (5, 12)] {
            assert_eq!(count_cycles(complete_graph(n), false), expected, "K{n}");
            assert_eq!(count_cycles(complete_graph(n), true), expected, "K{n} (pruned)");
        }
    }

    #[test]
    fn pruning_does_not_change_the_count_on_a_petersen_like_graph() {
        // A bipartite-ish graph with cutpoints: two triangles joined by a
        // bridge-adjacent path, small enough to enumerate fully.
        let mut g = GraphStore::new("bowtie-chain", 7).unwrap();
        for (x, y) in [
            (1, 2),
            (2, 3),
            (3, 1),
            (3, 4),
            (4, 5),
            (5, 6),
            (6, 7),
            (7, 4),
        ] {
            g.create_edge(x, y);
        }
        let without = count_cycles(g.clone(), false);
        let with = count_cycles(g, true);
        assert_eq!(without, with);
    }

    #[test]
    fn enumeration_fully_restores_the_graph() {
        let g = complete_graph(5);
        let snapshot = g.snapshot();
        let order = sort_vertices_degree_desc(&g);
        let mut session = SearchSession::new(g, &order, SearchCfg::default()).unwrap();

        if session.first_cycle() {
            while session.next_cycle() {}
        }
        let restored = session.into_graph();
        restored.assert_matches_snapshot(&snapshot);
    }

    #[test]
    fn current_cycle_edges_form_a_single_cycle_through_every_vertex() {
        let g = complete_graph(6);
        let order = sort_vertices_degree_desc(&g);
        let mut session = SearchSession::new(g, &order, SearchCfg::default()).unwrap();
        assert!(session.first_cycle());

        let tour = session.current_cycle_vertices();
        assert_eq!(tour.len(), 6);
        let mut seen: Vec<Vertex> = tour.clone();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 6, "tour must visit every vertex exactly once");
        assert_eq!(tour[0], 1, "tour starts at vertex 1");
    }

    proptest::proptest! {
        // Q1/Q2 (`SPEC_FULL.md` §8): the pruning oracle only ever cuts
        // branches that contain no Hamiltonian cycle, so it must never
        // change the reported count; and every graph the search completes
        // on must leave the graph bit-for-bit restored.
        #[test]
        fn pruning_never_changes_cycle_count(
            n in 3u32..8,
            extra in proptest::collection::vec((0u32..7, 0u32..7), 0..10),
        ) {
            let mut g = cycle_graph(n);
            for (x, y) in extra {
                let (x, y) = (x % n + 1, y % n + 1);
                if x != y {
                    g.create_edge(x, y);
                }
            }
            let without = count_cycles(g.clone(), false);
            let with = count_cycles(g, true);
            proptest::prop_assert_eq!(without, with);
        }

        #[test]
        fn enumeration_always_restores_the_graph(
            n in 3u32..7,
            extra in proptest::collection::vec((0u32..6, 0u32..6), 0..8),
        ) {
            let mut g = cycle_graph(n);
            for (x, y) in extra {
                let (x, y) = (x % n + 1, y % n + 1);
                if x != y {
                    g.create_edge(x, y);
                }
            }
            let snapshot = g.snapshot();
            let order = sort_vertices_degree_desc(&g);
            let mut session = SearchSession::new(g, &order, SearchCfg::default()).unwrap();
            if session.first_cycle() {
                while session.next_cycle() {}
            }
            let restored = session.into_graph();
            restored.assert_matches_snapshot(&snapshot);
        }
    }
}
