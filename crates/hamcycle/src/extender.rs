//! Segment extender: grows path segments by forcing degree-2 vertices onto
//! them until the graph returns to a consistent state (every remaining
//! vertex has degree >= 3) or a terminal condition is hit.
//!
//! Grounded line-for-line in `original_source/HamiltonianCycle.c`'s
//! `extendSegments`, `extendAnchor`, `primeTape`, `fixInArc` and
//! `removeForcedD2InArcs`. The original's goto-driven `extend_segment` /
//! `finish_segment` labels become an explicit two-state loop here — the
//! line-by-line logic inside each state is otherwise unchanged.

use crate::graph::{ArcId, Vertex, NO_ARC};
use crate::search::SearchSession;
use crate::status::TapeStatus;

enum Phase {
    Extend,
    Finish,
}

impl SearchSession {
    /// Clear the `ENDPOINT` bit at `pos` and restore the arc stored there to
    /// vertex `x`'s list, if it's still marked as a dangling endpoint.
    fn fix_in_arc(&mut self, pos: usize, x: Vertex) {
        let entry = self.tape.get(pos);
        if entry.status.contains(TapeStatus::ENDPOINT) {
            self.graph.insert_arc(x, entry.arc);
            self.tape
                .set_status(pos, entry.status.difference(TapeStatus::ENDPOINT));
        }
    }

    /// Remove all but one of the incoming arcs of `a`'s list, forcing that
    /// vertex down towards degree 2. Returns `true` if a degree-1 vertex
    /// was produced along the way (the caller must then abandon this
    /// branch); in that case every change made here is rolled back,
    /// including speculative degree-2 stack pushes.
    fn remove_forced_d2_in_arcs(&mut self, a: ArcId) -> bool {
        let checkpoint = self.deg2_stack.len();
        let mut p = self.graph.arc_prev(a);

        loop {
            let y = self.graph.arc_target(p);
            let mut dy = self.degree[y as usize];
            if dy == 2 {
                break;
            }
            dy -= 1;
            if dy == 2 {
                self.deg2_stack.push(y);
            }
            self.degree[y as usize] = dy;
            let pc = self.graph.arc_cross(p);
            self.graph.remove_arc(y, pc);
            p = self.graph.arc_prev(p);
            if a == p {
                break;
            }
        }

        if a != p {
            self.deg2_stack.truncate(checkpoint);

            let mut q = self.graph.arc_prev(a);
            while q != p {
                let y = self.graph.arc_target(q);
                self.degree[y as usize] += 1;
                let cross = self.graph.arc_cross(q);
                self.graph.insert_arc(y, cross);
                q = self.graph.arc_prev(q);
            }
            return true;
        }

        false
    }

    /// Remove all but one of the in-arcs of the vertex `a` belongs to,
    /// pushing any vertex reduced to degree 2 onto the degree-2 stack.
    fn remove_in_arcs(&mut self, a: ArcId) {
        let mut p = self.graph.arc_prev(a);
        while p != a {
            let x = self.graph.arc_target(p);
            self.degree[x as usize] -= 1;
            if self.degree[x as usize] == 2 {
                self.deg2_stack.push(x);
            }
            let pc = self.graph.arc_cross(p);
            self.graph.remove_arc(x, pc);
            p = self.graph.arc_prev(p);
        }
    }

    /// Extend a segment from both ends as far as the current graph state
    /// allows, following `a` towards `z` (the segment's other endpoint).
    /// Returns `false` when this state of the graph terminates the search
    /// (a degree-1 vertex, or a forced cycle); `true` when the degree-2
    /// stack runs dry with the graph left consistent.
    pub(crate) fn extend_segments(&mut self, mut a: ArcId, mut z: Vertex, mut k: TapeStatus) -> bool {
        let mut hz: Option<usize> = None;
        let mut hx: usize = self.tape.pos();
        let mut x: Vertex = 0;
        let mut phase = Phase::Extend;

        loop {
            match phase {
                Phase::Extend => {
                    let c = self.graph.arc_cross(a);
                    x = self.graph.arc_target(a);

                    hx += 1;
                    self.tape.set_arc(hx, c);

                    if x == z {
                        if let Some(hzp) = hz {
                            self.fix_in_arc(hzp, z);
                        }
                        let ct = self.graph.arc_target(c);
                        self.degree[ct as usize] = 2;
                        self.tape.set_pos(hx - 1);

                        hx += 1;
                        let accepted = self.tape.get(hx).status.contains(TapeStatus::HAMILTONIAN);
                        self.is_hamilton_cycle = accepted;
                        return false;
                    }

                    let ex = self.virtual_edge[x as usize];
                    if ex != 0 {
                        if self.degree[x as usize] > 2 {
                            if self.remove_forced_d2_in_arcs(c) {
                                if let Some(hzp) = hz {
                                    self.fix_in_arc(hzp, z);
                                }
                                self.tape.set_status(hx, k);
                                self.tape.set_pos(hx);
                                return false;
                            }
                            k |= TapeStatus::FORCED_DEG2;
                        }

                        self.tape.set_status(hx, k | TapeStatus::FORCED);
                        self.degree[x as usize] = 0;

                        if self.degree[ex as usize] != 2 {
                            if self.degree[z as usize] != 2 {
                                x = ex;
                                phase = Phase::Finish;
                                continue;
                            }

                            a = self.graph.tail(z);
                            self.degree[z as usize] = 0;
                            if let Some(hzp) = hz {
                                self.fix_in_arc(hzp, z);
                            }
                            z = ex;
                            hz = Some(hx);
                            k = TapeStatus::empty();
                            continue;
                        }

                        k = TapeStatus::empty();
                        self.degree[ex as usize] = 0;
                        a = self.graph.head(ex);
                        continue;
                    }

                    if self.degree[x as usize] == 2 {
                        self.tape.set_status(hx, k);
                        k = TapeStatus::empty();
                        self.degree[x as usize] = 0;
                        a = self.graph.arc_prev(c);
                        continue;
                    }

                    self.tape.set_status(hx, k | TapeStatus::ENDPOINT);
                    self.graph.remove_arc(x, c);

                    if self.degree[z as usize] != 2 {
                        phase = Phase::Finish;
                        continue;
                    }

                    a = self.graph.tail(z);
                    if let Some(hzp) = hz {
                        self.fix_in_arc(hzp, z);
                    }
                    self.degree[z as usize] = 0;
                    z = x;
                    hz = Some(hx);
                    k = TapeStatus::empty();
                }

                Phase::Finish => {
                    let mut found: ArcId;
                    if self.degree[z as usize] < self.degree[x as usize] {
                        found = self.graph.head(z);
                        while found != NO_ARC && self.graph.arc_target(found) != x {
                            found = self.graph.arc_next(found);
                        }
                    } else {
                        found = self.graph.head(x);
                        while found != NO_ARC && self.graph.arc_target(found) != z {
                            found = self.graph.arc_next(found);
                        }
                    }

                    if found != NO_ARC {
                        let c = self.graph.arc_cross(found);
                        let c_target = self.graph.arc_target(c);
                        let found_target = self.graph.arc_target(found);
                        self.graph.remove_arc(found_target, c);
                        self.graph.remove_arc(c_target, found);
                        self.graph.set_arc_next(found, self.removed_edges);
                        self.removed_edges = found;

                        self.degree[x as usize] -= 1;
                        if self.degree[x as usize] == 2 {
                            self.degree[z as usize] -= 1;
                            self.degree[x as usize] = 0;

                            a = self.graph.tail(x);
                            self.fix_in_arc(hx, x);
                            k = TapeStatus::empty();
                            phase = Phase::Extend;
                            continue;
                        }

                        self.degree[z as usize] -= 1;
                        if self.degree[z as usize] == 2 {
                            a = self.graph.tail(z);
                            if let Some(hzp) = hz {
                                self.fix_in_arc(hzp, z);
                            }
                            self.degree[z as usize] = 0;
                            hz = Some(hx);
                            z = x;
                            k = TapeStatus::empty();
                            phase = Phase::Extend;
                            continue;
                        }
                    }

                    self.virtual_edge[z as usize] = x;
                    self.virtual_edge[x as usize] = z;

                    let mut next_x: Vertex = 0;
                    while let Some(cand) = self.deg2_stack.pop() {
                        if self.degree[cand as usize] != 0 {
                            next_x = cand;
                            break;
                        }
                    }

                    if next_x != 0 {
                        x = next_x;
                        let ex = self.virtual_edge[x as usize];
                        if ex != 0 {
                            self.degree[x as usize] = 0;
                            z = ex;
                        } else {
                            z = x;
                        }
                        a = self.graph.head(x);
                        hz = None;
                        k = TapeStatus::empty();
                        phase = Phase::Extend;
                        continue;
                    }

                    self.tape.set_pos(hx);
                    return true;
                }
            }
        }
    }

    /// Extend or create a segment by folding vertex `x` out of the graph.
    /// Must only be called while the graph is in a consistent state (every
    /// remaining vertex has degree >= 3).
    pub(crate) fn extend_anchor(&mut self, x: Vertex) -> bool {
        let ex = self.virtual_edge[x as usize];
        if ex != 0 {
            self.removed_edges_stack.push(self.removed_edges);
            self.removed_edges = NO_ARC;

            let a = self.graph.head(x);
            self.degree[x as usize] = 0;
            self.remove_in_arcs(a);
            return self.extend_segments(a, ex, TapeStatus::anchor_extend());
        }

        let a0 = self.graph.head(x);
        let y = self.graph.arc_target(a0);
        let ey = self.virtual_edge[y as usize];

        if ey != 0 {
            let a = self.graph.arc_cross(a0);

            self.removed_edges_stack.push(self.removed_edges);
            self.removed_edges = NO_ARC;

            self.degree[y as usize] = 0;
            self.remove_in_arcs(a);
            if !self.extend_segments(a, ey, TapeStatus::anchor_extend_flip()) {
                return false;
            }

            if self.degree[x as usize] == 0 {
                return true;
            }

            self.removed_edges_stack.push(self.removed_edges);
            self.removed_edges = NO_ARC;

            let a2 = self.graph.head(x);
            self.degree[x as usize] = 0;
            let ex2 = self.virtual_edge[x as usize];
            self.remove_in_arcs(a2);
            return self.extend_segments(a2, ex2, TapeStatus::anchor_extend());
        }

        self.removed_edges_stack.push(self.removed_edges);

        let cross_a0 = self.graph.arc_cross(a0);
        self.graph.remove_arc(y, cross_a0);
        self.graph.remove_arc(x, a0);

        self.virtual_edge[x as usize] = y;
        self.virtual_edge[y as usize] = x;

        let pos = self.tape.push_arc(cross_a0);
        self.tape.set_status(pos, TapeStatus::anchor_point());

        self.removed_edges_stack.push(NO_ARC);
        self.removed_edges = NO_ARC;

        let a3 = self.graph.head(x);
        self.degree[x as usize] = 0;

        self.remove_in_arcs(a3);
        self.extend_segments(a3, y, TapeStatus::anchor_extend())
    }

    /// Force every degree-2 vertex onto a segment and place pivot points
    /// until the degree-2 stack runs dry. Returns `true` only if the
    /// turning machine should be entered next (no cycle was reported and no
    /// halting condition was hit during priming).
    pub(crate) fn prime_tape(&mut self) -> bool {
        let n = self.graph.vertex_count();

        for x in (1..=n).rev() {
            let dx = self.degree[x as usize];
            if dx < 2 {
                return false;
            }
            if dx == 2 {
                self.deg2_stack.push(x);
            }
        }

        if let Some(x) = self.deg2_stack.pop() {
            let mut ex = self.virtual_edge[x as usize];
            if ex != 0 {
                self.degree[x as usize] = 0;
            } else {
                ex = x;
            }

            let a = self.graph.head(x);
            if !self.extend_segments(a, ex, TapeStatus::empty()) {
                return !self.is_hamilton_cycle;
            }
        }

        let mut x: Vertex = 0;
        loop {
            loop {
                x = self.vertex_order[x as usize];
                if self.degree[x as usize] != 0 {
                    break;
                }
            }
            if !self.extend_anchor(x) {
                break;
            }
        }

        !self.is_hamilton_cycle
    }
}
