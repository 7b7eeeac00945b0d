//! Text graph format reader.
//!
//! Grounded in `original_source/GraphIO.c`'s `loadNextGraph`/`parseGraph`
//! family: a `$`-prefixed start marker, an `&Graph` header line, a title
//! line (truncated to [`crate::graph::MAX_TITLE_LENGTH`]), a vertex count,
//! then a signed-integer adjacency stream. A negative token `-u` opens
//! vertex `u`'s adjacency list; the positive tokens that follow are its
//! neighbors; the list ends at the next non-positive token. A file may hold
//! several `$&Graph` blocks back to back — call [`GraphReader::next_graph`]
//! repeatedly until it returns `Ok(None)`.
//!
//! The original hand-rolls its own line-ending detection (`determineEOfLn`)
//! because C89 has no portable "give me a line" primitive; `BufRead::lines`
//! already normalizes `\n`, `\r\n`, and bare `\r` is simply not something
//! the standard library line reader needs help with, so there is nothing
//! here for that logic to earn its keep.

use std::collections::VecDeque;
use std::io::BufRead;

use super::OwnedGraph;
use crate::error::{HcError, HcResult};
use crate::graph::MAX_TITLE_LENGTH;

const STARTING_LINE: &str = "$";
const HEADER_LINE: &str = "&Graph";

/// Streams zero or more [`OwnedGraph`]s out of a text-format source.
pub struct GraphReader<R> {
    lines: std::io::Lines<R>,
    pending: VecDeque<String>,
}

impl<R: BufRead> GraphReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            pending: VecDeque::new(),
        }
    }

    fn next_line(&mut self) -> HcResult<Option<String>> {
        match self.lines.next() {
            None => Ok(None),
            Some(line) => Ok(Some(line.map_err(|e| HcError::FileReadError(e.to_string()))?)),
        }
    }

    fn next_token(&mut self) -> HcResult<Option<i64>> {
        loop {
            if let Some(tok) = self.pending.pop_front() {
                let n = tok
                    .parse::<i64>()
                    .map_err(|_| HcError::InvalidInput(format!("expected an integer token, found {tok:?}")))?;
                return Ok(Some(n));
            }
            match self.next_line()? {
                None => return Ok(None),
                Some(line) => self.pending.extend(line.split_whitespace().map(str::to_string)),
            }
        }
    }

    /// Scan forward to the next `$`/`&Graph` block and parse one graph out
    /// of it. Returns `Ok(None)` once the source is exhausted.
    pub fn next_graph(&mut self) -> HcResult<Option<OwnedGraph>> {
        self.pending.clear();

        loop {
            let line = match self.next_line()? {
                Some(l) => l,
                None => return Ok(None),
            };
            if line.trim() != STARTING_LINE {
                continue;
            }
            let header = match self.next_line()? {
                Some(l) => l,
                None => return Ok(None),
            };
            if header.trim() == HEADER_LINE {
                break;
            }
        }

        let mut title = self
            .next_line()?
            .ok_or(HcError::MissingToken)?
            .trim()
            .to_string();
        if title.len() >= MAX_TITLE_LENGTH {
            let mut end = MAX_TITLE_LENGTH - 1;
            while !title.is_char_boundary(end) {
                end -= 1;
            }
            title.truncate(end);
        }

        let raw_count = self.next_token()?.ok_or(HcError::MissingToken)?;
        if raw_count < 0 {
            return Err(HcError::InvalidInput("vertex count must not be negative".into()));
        }
        let vertex_count = raw_count as u32;

        let mut edges = Vec::new();
        let mut x = self.next_token()?.ok_or(HcError::MissingToken)?;
        if x == 0 {
            x = -(vertex_count as i64);
        }

        while x < 0 {
            let u = (-x) as u32;
            x = self.next_token()?.ok_or(HcError::MissingToken)?;
            while x > 0 {
                edges.push((u, x as u32));
                x = self.next_token()?.ok_or(HcError::MissingToken)?;
            }
        }

        Ok(Some(OwnedGraph {
            name: title,
            vertex_count,
            edges,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_single_graph() {
        let text = "$\n&Graph\ntriangle\n3\n-1 2 3 -2 3 0\n";
        let mut r = GraphReader::new(Cursor::new(text));
        let g = r.next_graph().unwrap().unwrap();
        assert_eq!(g.name, "triangle");
        assert_eq!(g.vertex_count, 3);
        assert_eq!(g.edges, vec![(1, 2), (1, 3), (2, 3)]);
        assert!(r.next_graph().unwrap().is_none());
    }

    #[test]
    fn parses_multiple_graphs_back_to_back() {
        let text = "$\n&Graph\na\n2\n-1 2 0\n0\n$\n&Graph\nb\n2\n-1 2 0\n0\n";
        let mut r = GraphReader::new(Cursor::new(text));
        let first = r.next_graph().unwrap().unwrap();
        let second = r.next_graph().unwrap().unwrap();
        assert_eq!(first.name, "a");
        assert_eq!(second.name, "b");
        assert!(r.next_graph().unwrap().is_none());
    }

    #[test]
    fn zero_first_token_means_source_is_the_last_vertex() {
        let text = "$\n&Graph\nzero-start\n2\n0\n1 0\n";
        let mut r = GraphReader::new(Cursor::new(text));
        let g = r.next_graph().unwrap().unwrap();
        assert_eq!(g.edges, vec![(2, 1)]);
    }
}
