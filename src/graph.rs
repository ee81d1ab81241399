//! Undirected graph storage and the adjacency-matrix file format.
//!
//! A [`Graph`] is a row-major N×N byte matrix over at most 254 vertices;
//! IDs stay within a byte with 255 reserved as the neighbor-row sentinel.
//! The text format is a block of `'0'`/`'1'` rows separated by newlines,
//! optionally terminated by a `'-'` character after which everything is
//! ignored.

use crate::error::SolverError;
use std::fs;
use std::path::Path;

/// Largest supported vertex count; 255 is reserved as the row sentinel.
pub const MAX_VERTICES: usize = 254;

/// Sentinel byte terminating under-filled neighbor rows.
pub const NO_VERTEX: u8 = 255;

// ============================================================================
// Graph
// ============================================================================

/// An undirected graph on `n` vertices backed by a flat byte matrix.
///
/// The matrix is symmetric with a zero diagonal as stored; the self-loop
/// every player is allowed ("stay put") is an augmentation applied by the
/// adjacency layer, not recorded here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graph {
    n: usize,
    /// Row-major `n * n` matrix of 0/1 bytes.
    bits: Vec<u8>,
}

impl Graph {
    /// Creates an edge-free graph on `n` vertices.
    ///
    /// # Errors
    /// Fails with [`SolverError::GraphTooLarge`] when `n` exceeds
    /// [`MAX_VERTICES`].
    pub fn empty(n: usize) -> Result<Self, SolverError> {
        if n > MAX_VERTICES {
            return Err(SolverError::GraphTooLarge { n });
        }
        Ok(Self {
            n,
            bits: vec![0u8; n * n],
        })
    }

    /// Builds a graph from an explicit edge list (undirected; self-loops
    /// and duplicates are rejected by debug assertions).
    ///
    /// # Errors
    /// Fails when `n` exceeds [`MAX_VERTICES`].
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Result<Self, SolverError> {
        let mut g = Self::empty(n)?;
        for &(u, v) in edges {
            debug_assert!(u < n && v < n, "edge ({u},{v}) out of range");
            debug_assert_ne!(u, v, "self-loop ({u},{u}) not allowed");
            g.bits[u * n + v] = 1;
            g.bits[v * n + u] = 1;
        }
        Ok(g)
    }

    /// The path graph P_n: `0 - 1 - … - n-1`.
    ///
    /// # Errors
    /// Fails when `n` exceeds [`MAX_VERTICES`].
    pub fn path(n: usize) -> Result<Self, SolverError> {
        let edges: Vec<(usize, usize)> = (1..n).map(|v| (v - 1, v)).collect();
        Self::from_edges(n, &edges)
    }

    /// The cycle graph C_n (requires `n >= 3`).
    ///
    /// # Errors
    /// Fails when `n` exceeds [`MAX_VERTICES`].
    pub fn cycle(n: usize) -> Result<Self, SolverError> {
        debug_assert!(n >= 3, "C_n needs at least 3 vertices");
        let mut edges: Vec<(usize, usize)> = (1..n).map(|v| (v - 1, v)).collect();
        edges.push((n - 1, 0));
        Self::from_edges(n, &edges)
    }

    /// The complete graph K_n.
    ///
    /// # Errors
    /// Fails when `n` exceeds [`MAX_VERTICES`].
    pub fn complete(n: usize) -> Result<Self, SolverError> {
        let mut g = Self::empty(n)?;
        for u in 0..n {
            for v in 0..n {
                if u != v {
                    g.bits[u * n + v] = 1;
                }
            }
        }
        Ok(g)
    }

    /// Number of vertices.
    #[inline(always)]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Returns whether the edge `(u, v)` exists.
    #[inline(always)]
    pub fn edge(&self, u: usize, v: usize) -> bool {
        debug_assert!(u < self.n && v < self.n);
        self.bits[u * self.n + v] != 0
    }

    /// Degree of vertex `v` (self-loops are never stored, so this is the
    /// plain neighbor count).
    #[inline]
    pub fn degree(&self, v: usize) -> usize {
        debug_assert!(v < self.n);
        self.bits[v * self.n..(v + 1) * self.n]
            .iter()
            .filter(|&&b| b != 0)
            .count()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.bits.iter().filter(|&&b| b != 0).count() / 2
    }

    /// Loads a graph from a matrix file.
    ///
    /// # Errors
    /// [`SolverError::GraphIo`] when the file is missing, unreadable or
    /// empty; [`SolverError::MalformedGraph`] / [`SolverError::GraphTooLarge`]
    /// as for [`parse_matrix`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SolverError> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .map_err(|e| SolverError::GraphIo(format!("{}: {e}", path.display())))?;
        if bytes.is_empty() {
            return Err(SolverError::GraphIo(format!(
                "{}: file is empty",
                path.display()
            )));
        }
        parse_matrix(&bytes)
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parses an adjacency matrix from raw bytes in one bounded pass.
///
/// Grammar: rows of `'0'`/`'1'` characters separated by `'\n'` (a
/// preceding `'\r'` is ignored); the first non-empty row fixes N; a `'-'`
/// anywhere ends the matrix and the remaining bytes are ignored. Blank
/// rows are skipped. The matrix must be square, symmetric, and zero on
/// the diagonal.
///
/// # Errors
/// [`SolverError::MalformedGraph`] on grammar or shape violations,
/// [`SolverError::GraphTooLarge`] past 254 vertices.
pub fn parse_matrix(bytes: &[u8]) -> Result<Graph, SolverError> {
    let mut rows: Vec<Vec<u8>> = Vec::new();
    let mut row: Vec<u8> = Vec::new();
    let mut n: Option<usize> = None;

    fn close_row(
        row: &mut Vec<u8>,
        rows: &mut Vec<Vec<u8>>,
        n: &mut Option<usize>,
    ) -> Result<(), SolverError> {
        if row.is_empty() {
            return Ok(());
        }
        let width = match *n {
            Some(w) => w,
            None => {
                let w = row.len();
                if w > MAX_VERTICES {
                    return Err(SolverError::GraphTooLarge { n: w });
                }
                *n = Some(w);
                w
            }
        };
        if row.len() != width {
            return Err(SolverError::MalformedGraph {
                detail: format!(
                    "row {} has length {}, expected {width}",
                    rows.len(),
                    row.len()
                ),
            });
        }
        rows.push(std::mem::take(row));
        Ok(())
    }

    'scan: for (pos, &b) in bytes.iter().enumerate() {
        match b {
            b'0' => row.push(0),
            b'1' => row.push(1),
            b'\n' => close_row(&mut row, &mut rows, &mut n)?,
            b'\r' => {}
            b'-' => {
                close_row(&mut row, &mut rows, &mut n)?;
                break 'scan;
            }
            _ => {
                return Err(SolverError::MalformedGraph {
                    detail: format!(
                        "unexpected byte {:?} at offset {pos} (alphabet: '0' '1' '\\n' '\\r' '-')",
                        b as char
                    ),
                })
            }
        }
    }
    close_row(&mut row, &mut rows, &mut n)?;

    let n = match n {
        Some(n) => n,
        None => {
            return Err(SolverError::MalformedGraph {
                detail: "no matrix rows found".into(),
            })
        }
    };
    if rows.len() != n {
        return Err(SolverError::MalformedGraph {
            detail: format!("matrix has {} rows of width {n}", rows.len()),
        });
    }

    let mut bits = Vec::with_capacity(n * n);
    for r in rows {
        bits.extend_from_slice(&r);
    }

    // Shape checks: zero diagonal, symmetric.
    for v in 0..n {
        if bits[v * n + v] != 0 {
            return Err(SolverError::MalformedGraph {
                detail: format!("self-loop on the diagonal at vertex {v}"),
            });
        }
    }
    for u in 0..n {
        for v in (u + 1)..n {
            if bits[u * n + v] != bits[v * n + u] {
                return Err(SolverError::MalformedGraph {
                    detail: format!("matrix not symmetric at ({u},{v})"),
                });
            }
        }
    }

    Ok(Graph { n, bits })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Graph, SolverError> {
        parse_matrix(text.as_bytes())
    }

    // -------------------------------------------------------------------------
    // Parser: well-formed inputs
    // -------------------------------------------------------------------------

    #[test]
    fn parses_triangle() {
        let g = parse("011\n101\n110\n").unwrap();
        assert_eq!(g.n(), 3);
        assert!(g.edge(0, 1) && g.edge(1, 2) && g.edge(0, 2));
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn parses_without_trailing_newline() {
        let g = parse("01\n10").unwrap();
        assert_eq!(g.n(), 2);
        assert!(g.edge(0, 1));
    }

    #[test]
    fn dash_terminates_and_trailing_content_is_ignored() {
        let g = parse("0101\n1010\n0101\n1010\n-\nanything goes here !!").unwrap();
        assert_eq!(g.n(), 4);
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn dash_directly_after_last_row() {
        let g = parse("01\n10-junk").unwrap();
        assert_eq!(g.n(), 2);
    }

    #[test]
    fn carriage_returns_are_ignored() {
        let g = parse("011\r\n101\r\n110\r\n").unwrap();
        assert_eq!(g.n(), 3);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let g = parse("\n01\n\n10\n\n").unwrap();
        assert_eq!(g.n(), 2);
    }

    #[test]
    fn single_vertex_graph() {
        let g = parse("0\n").unwrap();
        assert_eq!(g.n(), 1);
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.degree(0), 0);
    }

    // -------------------------------------------------------------------------
    // Parser: rejected inputs
    // -------------------------------------------------------------------------

    #[test]
    fn rejects_ragged_rows() {
        let err = parse("010\n10\n010\n").unwrap_err();
        assert!(matches!(err, SolverError::MalformedGraph { .. }));
    }

    #[test]
    fn rejects_truncated_matrix() {
        let err = parse("010\n101\n").unwrap_err();
        assert!(matches!(err, SolverError::MalformedGraph { .. }));
    }

    #[test]
    fn rejects_foreign_characters() {
        let err = parse("01\n1x\n").unwrap_err();
        assert!(matches!(err, SolverError::MalformedGraph { .. }));
    }

    #[test]
    fn rejects_inner_whitespace() {
        let err = parse("0 1\n1 0\n").unwrap_err();
        assert!(matches!(err, SolverError::MalformedGraph { .. }));
    }

    #[test]
    fn rejects_empty_input() {
        let err = parse("").unwrap_err();
        assert!(matches!(err, SolverError::MalformedGraph { .. }));
        let err = parse("-\n0110").unwrap_err();
        assert!(matches!(err, SolverError::MalformedGraph { .. }));
    }

    #[test]
    fn rejects_diagonal_entry() {
        let err = parse("10\n00\n").unwrap_err();
        assert!(matches!(err, SolverError::MalformedGraph { .. }));
    }

    #[test]
    fn rejects_asymmetry() {
        let err = parse("01\n00\n").unwrap_err();
        assert!(matches!(err, SolverError::MalformedGraph { .. }));
    }

    #[test]
    fn rejects_oversized_matrix() {
        let row: String = "0".repeat(255);
        let err = parse(&format!("{row}\n")).unwrap_err();
        assert!(matches!(err, SolverError::GraphTooLarge { n: 255 }));
    }

    // -------------------------------------------------------------------------
    // Constructors
    // -------------------------------------------------------------------------

    #[test]
    fn path_graph_shape() {
        let g = Graph::path(4).unwrap();
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.degree(0), 1);
        assert_eq!(g.degree(1), 2);
        assert!(g.edge(2, 3) && !g.edge(0, 3));
    }

    #[test]
    fn cycle_graph_is_two_regular() {
        let g = Graph::cycle(5).unwrap();
        assert_eq!(g.edge_count(), 5);
        for v in 0..5 {
            assert_eq!(g.degree(v), 2);
        }
        assert!(g.edge(4, 0));
    }

    #[test]
    fn complete_graph_degrees() {
        let g = Graph::complete(6).unwrap();
        assert_eq!(g.edge_count(), 15);
        for v in 0..6 {
            assert_eq!(g.degree(v), 5);
        }
    }

    #[test]
    fn constructors_reject_oversized_orders() {
        assert!(Graph::empty(255).is_err());
        assert!(Graph::empty(MAX_VERTICES).is_ok());
    }

    #[test]
    fn handshaking_lemma_holds() {
        let g = Graph::from_edges(7, &[(0, 1), (1, 2), (2, 3), (3, 0), (4, 5)]).unwrap();
        let sum: usize = (0..7).map(|v| g.degree(v)).sum();
        assert_eq!(sum, 2 * g.edge_count());
    }

    // -------------------------------------------------------------------------
    // File loading
    // -------------------------------------------------------------------------

    #[test]
    fn load_roundtrip_through_temp_file() {
        let path = std::env::temp_dir().join("pursuit_load_roundtrip.txt");
        std::fs::write(&path, "0101\n1010\n0101\n1010\n").unwrap();
        let g = Graph::load(&path).unwrap();
        assert_eq!(g.n(), 4);
        assert_eq!(g, Graph::cycle(4).unwrap());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = Graph::load("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, SolverError::GraphIo(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn load_empty_file_is_io_error() {
        let path = std::env::temp_dir().join("pursuit_empty_graph.txt");
        std::fs::write(&path, "").unwrap();
        let err = Graph::load(&path).unwrap_err();
        assert!(matches!(err, SolverError::GraphIo(_)));
        std::fs::remove_file(&path).ok();
    }
}
