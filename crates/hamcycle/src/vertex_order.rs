//! Vertex visitation order.
//!
//! Grounded in `original_source/VertexOrder.c`. The original's
//! `sortVerticesDegreeAsc`/`sortVerticesDegreeDesc` run a hand-rolled shell
//! sort (its comment explains this was only to dodge `qsort_r`'s
//! inconsistent signature across platforms, not an algorithmic choice worth
//! preserving) over a pre-populated array of `1..=vertex_count`. That's
//! exactly what `slice::sort_by_key` already is, so we call it directly.

use crate::graph::{GraphStore, Vertex};

fn identity_order(g: &GraphStore) -> Vec<Vertex> {
    (1..=g.vertex_count()).collect()
}

/// Vertices `1..=vertex_count`, sorted by degree descending. Ties keep their
/// original (ascending) relative order, since `sort_by_key` is stable. This
/// is the default visitation order `SearchSession::new` expects when the
/// caller has no other preference.
pub fn sort_vertices_degree_desc(g: &GraphStore) -> Vec<Vertex> {
    let mut order = identity_order(g);
    order.sort_by_key(|&x| std::cmp::Reverse(g.degree(x)));
    order
}

/// Vertices `1..=vertex_count`, sorted by degree ascending. Ties keep their
/// original relative order.
pub fn sort_vertices_degree_asc(g: &GraphStore) -> Vec<Vertex> {
    let mut order = identity_order(g);
    order.sort_by_key(|&x| g.degree(x));
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star(n: u32) -> GraphStore {
        let mut g = GraphStore::new("star", n).unwrap();
        for x in 2..=n {
            g.create_edge(1, x);
        }
        g
    }

    #[test]
    fn desc_puts_hub_first() {
        let g = star(5);
        let order = sort_vertices_degree_desc(&g);
        assert_eq!(order[0], 1);
    }

    #[test]
    fn asc_puts_hub_last() {
        let g = star(5);
        let order = sort_vertices_degree_asc(&g);
        assert_eq!(order[order.len() - 1], 1);
    }

    #[test]
    fn ties_preserve_original_order() {
        let mut g = GraphStore::new("path", 4).unwrap();
        g.create_edge(1, 2);
        g.create_edge(2, 3);
        g.create_edge(3, 4);
        // degrees: 1,2,2,1 -> desc stable sort keeps 2 before 3 among ties
        let order = sort_vertices_degree_desc(&g);
        let pos2 = order.iter().position(|&x| x == 2).unwrap();
        let pos3 = order.iter().position(|&x| x == 3).unwrap();
        assert!(pos2 < pos3);
    }
}
