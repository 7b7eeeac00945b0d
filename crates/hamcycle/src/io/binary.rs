//! Legacy binary graph format reader ("GnG" files), grounded in
//! `original_source/GraphIO.c`'s `readGnGFile`/`isGnGFile`.
//!
//! Layout: a leading `i16` equal to `-1` (the format marker, checked by the
//! caller via [`super::looks_like_binary`] before this reader is invoked),
//! a single byte that must be `0x01` (graph record type), 3 reserved bytes,
//! a little-endian `u16` vertex count, 14 ignored bytes (window geometry /
//! edge count / UI data the original skips with `fseek`), then a signed
//! 16-bit adjacency stream identical in grammar to the text format except
//! each target is followed by a 16-bit multiplicity field that is read and
//! discarded.

use std::io::Read;

use super::OwnedGraph;
use crate::error::{HcError, HcResult};

const RESERVED_HEADER_BYTES: usize = 3;
const IGNORED_BLOCK_BYTES: usize = 14;

fn read_i16<R: Read>(r: &mut R) -> HcResult<i16> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)
        .map_err(|e| HcError::FileReadError(e.to_string()))?;
    Ok(i16::from_le_bytes(buf))
}

fn skip<R: Read>(r: &mut R, n: usize) -> HcResult<()> {
    let mut buf = vec![0u8; n];
    r.read_exact(&mut buf)
        .map_err(|e| HcError::FileReadError(e.to_string()))?;
    Ok(())
}

/// Parse exactly one graph out of a legacy binary source. Unlike the text
/// reader this format holds a single graph per stream, matching the
/// original's one-graph-per-`.gng`-file convention.
pub fn read_graph<R: Read>(mut r: R, name: impl Into<String>) -> HcResult<OwnedGraph> {
    let marker = read_i16(&mut r)?;
    if marker != -1 {
        return Err(HcError::InvalidInput("missing binary graph format marker".into()));
    }

    let mut kind = [0u8; 1];
    r.read_exact(&mut kind)
        .map_err(|e| HcError::FileReadError(e.to_string()))?;
    if kind[0] != 1 {
        return Err(HcError::InvalidInput("binary record is not a graph".into()));
    }

    skip(&mut r, RESERVED_HEADER_BYTES)?;

    let vertex_count = read_i16(&mut r)?;
    if vertex_count < 0 {
        return Err(HcError::InvalidInput("vertex count must not be negative".into()));
    }
    let vertex_count = vertex_count as u32;

    skip(&mut r, IGNORED_BLOCK_BYTES)?;

    let mut edges = Vec::new();
    let mut x = read_i16(&mut r)? as i64;

    while x < 0 {
        let u = (-x) as u32;
        x = read_i16(&mut r)? as i64;
        while x > 0 {
            edges.push((u, x as u32));
            skip(&mut r, 2)?; // edge multiplicity, unused
            x = read_i16(&mut r)? as i64;
        }
    }

    Ok(OwnedGraph {
        name: name.into(),
        vertex_count,
        edges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn le16(v: i16) -> [u8; 2] {
        v.to_le_bytes()
    }

    #[test]
    fn parses_minimal_binary_graph() {
        let mut bytes = Vec::new();
        bytes.extend(le16(-1)); // marker
        bytes.push(1); // record type: graph
        bytes.extend([0u8; RESERVED_HEADER_BYTES]);
        bytes.extend(le16(3)); // vertex count
        bytes.extend([0u8; IGNORED_BLOCK_BYTES]);
        // adjacency: -1 2 (mult 0) 3 (mult 0) -2 3 (mult 0) 0
        bytes.extend(le16(-1));
        bytes.extend(le16(2));
        bytes.extend(le16(0));
        bytes.extend(le16(3));
        bytes.extend(le16(0));
        bytes.extend(le16(-2));
        bytes.extend(le16(3));
        bytes.extend(le16(0));
        bytes.extend(le16(0));

        let g = read_graph(Cursor::new(bytes), "triangle").unwrap();
        assert_eq!(g.vertex_count, 3);
        assert_eq!(g.edges, vec![(1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn rejects_missing_marker() {
        let bytes = vec![0u8, 0u8];
        assert!(read_graph(Cursor::new(bytes), "bad").is_err());
    }
}
