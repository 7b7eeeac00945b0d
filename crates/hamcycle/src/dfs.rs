//! DFS analyzer: the pruning oracle.
//!
//! A single iterative (non-recursive) depth-first traversal of the residual
//! graph that computes, in one pass, cutpoints, a per-cutpoint component
//! bound, and a bipartite 2-coloring difference. Grounded line-for-line in
//! `original_source/DFSAlgorithms.c` (`dfSeparatingSet`, `getComponentDiff`).
//! The traversal is kept iterative rather than recursive because a
//! call-stack-deep DFS would overflow on the 100k-vertex ceiling the graph
//! store supports (`SPEC_FULL.md` §4.B).

use crate::graph::{ArcId, GraphStore, Vertex, NO_ARC};

/// Scratch buffers for the pruning DFS, reused across calls so a search
/// session never allocates during pruning.
#[derive(Clone, Debug)]
pub struct DfsAnalyzer {
    visit: Vec<u32>,
    low: Vec<u32>,
    branches: Vec<u32>,
    components: Vec<u32>,
    colour: Vec<i32>,
    /// Saved "resume" arc per vertex while ascending back up the tree.
    iterator: Vec<ArcId>,
    /// Parent vertex in the DFS tree.
    previous: Vec<Vertex>,
}

impl DfsAnalyzer {
    pub fn new(vertex_count: u32) -> Self {
        let n = vertex_count as usize + 1;
        Self {
            visit: vec![0; n],
            low: vec![0; n],
            branches: vec![0; n],
            components: vec![0; n],
            colour: vec![0; n],
            iterator: vec![NO_ARC; n],
            previous: vec![0; n],
        }
    }

    /// Reset visit order tracking ahead of a fresh multi-component pass.
    pub fn init_separating_set(&mut self) {
        self.visit.iter_mut().for_each(|v| *v = 0);
    }

    /// Run the DFS from `x`, continuing the visit-order counter from `pos`.
    /// `e` is the current virtual-edge map (segments are traversed in one
    /// hop). Returns `(pos_after, diff, has_cutpoint)`.
    pub fn df_separating_set(
        &mut self,
        g: &GraphStore,
        e: &[Vertex],
        mut x: Vertex,
        mut pos: u32,
        x_in_sep: bool,
    ) -> (u32, u32, bool) {
        let p = &mut self.previous;
        let it = &mut self.iterator;
        let b = &mut self.branches;
        let c = &mut self.colour;
        let l = &mut self.low;
        let v = &mut self.visit;
        let cm = &mut self.components;

        let mut bp = true;
        let mut y = x;
        let mut a: ArcId = NO_ARC;
        let mut vy: u32 = 0;
        let mut cd: u32 = 0;
        let mut cp: u32 = 0;
        let mut bd: i32 = 0;
        let mut bx: u32 = 0;
        let mut cmx: u32 = 0;

        b[0] = 0;
        c[0] = 1;
        x = 0;
        let mut lx: u32 = 0;

        'outer: loop {
            while vy == 0 {
                // Descend into y.
                it[x as usize] = a;
                p[y as usize] = x;

                if bp {
                    let cx = -c[x as usize];
                    c[y as usize] = cx;
                    bd += cx;
                }

                x = y;
                a = g.head(x);
                b[x as usize] = 0;
                cm[x as usize] = 0;
                pos += 1;
                lx = pos;
                v[x as usize] = lx;
                l[x as usize] = lx;
                y = e[x as usize];

                if y == 0 {
                    y = g.arc_target(a);
                    a = g.arc_next(a);
                }

                vy = v[y as usize];
            }

            // Ensure that y iterates to an unvisited vertex.
            let mut px = p[x as usize];
            let cx = c[x as usize];
            loop {
                if px != y {
                    if lx > vy {
                        lx = vy;
                    }
                    if bp {
                        bp = cx != c[y as usize];
                    }
                }

                if a == NO_ARC {
                    y = 0;
                    break;
                }

                y = g.arc_target(a);
                a = g.arc_next(a);
                vy = v[y as usize];

                if vy == 0 {
                    break;
                }
            }

            l[x as usize] = lx;
            if y != 0 {
                continue 'outer;
            }

            // Ascend out of x.
            loop {
                y = px;
                cmx = cm[x as usize];
                bx = b[x as usize];

                if y == 0 {
                    break 'outer;
                }

                let mut ly = l[y as usize];
                vy = v[y as usize];

                if bx != 0 {
                    cp += 1;
                    if cmx > 1 {
                        cd += cmx - 1;
                    }
                }

                if lx == vy {
                    cm[y as usize] += 1;
                } else if lx > vy && cmx == 1 {
                    cm[y as usize] += 1;
                }

                if lx >= vy {
                    b[y as usize] += 1;
                } else if ly > lx {
                    ly = lx;
                    l[y as usize] = ly;
                }

                x = y;
                lx = ly;
                a = it[x as usize];
                px = p[x as usize];

                if a != NO_ARC {
                    break;
                }
            }

            y = g.arc_target(a);
            a = g.arc_next(a);
            vy = v[y as usize];
        }

        if bx > 1 {
            cp += 1;
        }
        if cmx > 1 {
            cd += cmx - 1;
        }

        let has_cut = cp > 0;

        if cp == 0 && !bp {
            return (pos, 0, has_cut);
        }

        if bp {
            if x_in_sep && bd < 0 {
                bd += 2;
            }
            if bd < 0 {
                bd = -bd;
            }
        } else {
            bd = 0;
        }

        let diff = (bd as u32).max(cd);

        (pos, diff, has_cut)
    }

    /// Compute the pruning-relevant difference over possibly several
    /// components, restarting the DFS from an unvisited live vertex (walked
    /// via `nv`) whenever one pass doesn't cover all `pts` live vertices.
    /// Returns `(diff, is_infeasible)` where `is_infeasible` is the
    /// pruning-positive verdict from `SPEC_FULL.md` §4.B.
    pub fn get_component_diff(
        &mut self,
        g: &GraphStore,
        e: &[Vertex],
        d: &[u32],
        nv: &[Vertex],
        mut x: Vertex,
        pts: u32,
        in_sep_set: bool,
    ) -> (u32, bool) {
        self.init_separating_set();

        let (mut p, mut diff, mut cp) = self.df_separating_set(g, e, x, 0, in_sep_set);
        let mut tdiff;

        if p < pts {
            while self.visit[x as usize] != 0 || d[x as usize] == 0 {
                x = nv[x as usize];
            }
            loop {
                let (p2, td, cp2) = self.df_separating_set(g, e, x, p, false);
                p = p2;
                tdiff = td;
                cp = cp2;
                if p >= pts {
                    break;
                }
                diff += if tdiff > 0 { tdiff } else { 1 };
                while self.visit[x as usize] != 0 || d[x as usize] == 0 {
                    x = nv[x as usize];
                }
            }
            diff += if tdiff > 0 { tdiff } else { 1 };
            cp = true;
        }

        (diff, cp || diff > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(n: u32) -> GraphStore {
        let mut g = GraphStore::new("cycle", n).unwrap();
        for x in 1..n {
            g.create_edge(x, x + 1);
        }
        g.create_edge(n, 1);
        g
    }

    #[test]
    fn c4_has_no_cutpoint() {
        let g = cycle(4);
        let e = vec![0u32; 5];
        let mut dfs = DfsAnalyzer::new(4);
        let (_pos, diff, has_cut) = dfs.df_separating_set(&g, &e, 1, 0, false);
        assert!(!has_cut);
        assert_eq!(diff, 0);
    }
}
