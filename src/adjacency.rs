//! Compact fixed-stride neighbor table.
//!
//! Row `v` holds `v` itself (the "stay put" self-loop, always first) then
//! every neighbor of `v`, padded to the stride with the sentinel 255.
//! One row fits the move options of one vertex, so the solver answers
//! "where can this piece go" with a single indexed slice.

use crate::error::SolverError;
use crate::graph::{Graph, NO_VERTEX};

/// Largest supported per-vertex option count (degree + self-loop); the
/// packed per-state safe-moves counter is 7 bits wide.
pub const MAX_OPTIONS: usize = 127;

/// Row-major neighbor table with a fixed stride of `max_options` bytes.
#[derive(Clone, Debug)]
pub struct AdjacencyList {
    n: usize,
    stride: usize,
    /// `n * stride` bytes; under-filled rows are 255-terminated.
    rows: Box<[u8]>,
    /// Per-vertex option counts (degree + 1 for the self-loop).
    counts: Box<[u8]>,
}

impl AdjacencyList {
    /// Builds the table from a graph, augmenting every vertex with its
    /// self-loop.
    ///
    /// # Errors
    /// [`SolverError::GraphTooDense`] when any vertex has more than
    /// [`MAX_OPTIONS`] move options.
    pub fn build(g: &Graph) -> Result<Self, SolverError> {
        let n = g.n();

        let mut counts = vec![0u8; n];
        let mut stride = 1; // every vertex has at least the self-loop
        for v in 0..n {
            let options = g.degree(v) + 1;
            if options > MAX_OPTIONS {
                return Err(SolverError::GraphTooDense { vertex: v, options });
            }
            counts[v] = options as u8;
            stride = stride.max(options);
        }

        let mut rows = vec![NO_VERTEX; n * stride];
        for v in 0..n {
            let row = &mut rows[v * stride..(v + 1) * stride];
            row[0] = v as u8;
            let mut slot = 1;
            for u in 0..n {
                if g.edge(v, u) {
                    row[slot] = u as u8;
                    slot += 1;
                }
            }
            debug_assert_eq!(slot, counts[v] as usize);
        }

        Ok(Self {
            n,
            stride,
            rows: rows.into_boxed_slice(),
            counts: counts.into_boxed_slice(),
        })
    }

    /// Number of vertices.
    #[inline(always)]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Fixed row stride (the maximum option count over all vertices).
    #[inline(always)]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Move options of `v`: `v` itself first, then its neighbors. Never
    /// contains the sentinel.
    #[inline(always)]
    pub fn options(&self, v: usize) -> &[u8] {
        debug_assert!(v < self.n);
        &self.rows[v * self.stride..v * self.stride + self.counts[v] as usize]
    }

    /// Option count of `v` (degree + 1). This is the initial value of the
    /// robber's safe-moves counter.
    #[inline(always)]
    pub fn option_count(&self, v: usize) -> usize {
        debug_assert!(v < self.n);
        self.counts[v] as usize
    }
}

// ============================================================================
// Tests
// ============================================================================
