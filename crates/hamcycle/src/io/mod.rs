//! Graph readers: external collaborators that turn a byte stream into a
//! [`GraphStore`](crate::graph::GraphStore), grounded in
//! `original_source/GraphIO.c` / `ArchIO.c`.
//!
//! Parsing is the one place in this crate doing real fallible I/O; failures
//! are ordinary `Result`s (see `crate::error`), never panics.

pub mod binary;
pub mod text;

use crate::error::{HcError, HcResult};
use crate::graph::{GraphStore, Vertex};

/// A parsed graph, not yet realized into the search core's arena-backed
/// representation. Kept separate from [`GraphStore`] so a reader never has
/// to know about arcs, arenas, or the reversible-search machinery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedGraph {
    pub name: String,
    pub vertex_count: u32,
    pub edges: Vec<(Vertex, Vertex)>,
}

impl OwnedGraph {
    /// Realize this parsed graph into the core arena-backed [`GraphStore`].
    pub fn into_graph_store(self) -> HcResult<GraphStore> {
        GraphStore::from_edges(self.name, self.vertex_count, &self.edges)
    }
}

/// Peek the first two bytes of `bytes` and report whether they look like the
/// legacy binary format's `-1` marker, mirroring `isGnGFile`.
pub fn looks_like_binary(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && i16::from_le_bytes([bytes[0], bytes[1]]) == -1
}

/// Read every graph out of `path`, dispatching to the binary or text reader
/// based on the file's leading bytes, matching `loadNextGraph`'s automatic
/// format detection.
pub fn read_graphs_from_path(path: &std::path::Path) -> HcResult<Vec<OwnedGraph>> {
    let bytes = std::fs::read(path).map_err(|e| HcError::FileReadError(e.to_string()))?;

    if looks_like_binary(&bytes) {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed graph".to_string());
        return Ok(vec![binary::read_graph(std::io::Cursor::new(bytes), name)?]);
    }

    let mut reader = text::GraphReader::new(std::io::BufReader::new(std::io::Cursor::new(bytes)));
    let mut graphs = Vec::new();
    while let Some(g) = reader.next_graph()? {
        graphs.push(g);
    }
    Ok(graphs)
}
