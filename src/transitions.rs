//! Precomputed team-move successor table in CSR form.
//!
//! `heads[c]..heads[c + 1]` indexes the distinct successors of
//! configuration `c` inside `edges`. Entries are stored pre-multiplied by
//! N (as state-ID bases), so the retrograde loop forms a state ID with
//! one addition.

use crate::adjacency::AdjacencyList;
use crate::configs::ConfigTable;
use crate::moves::TeamMoves;
use std::thread;

/// CSR successor table over the configuration space.
#[derive(Clone, Debug)]
pub struct Transitions {
    /// `M + 1` offsets into `edges`.
    heads: Box<[usize]>,
    /// Successor state-ID bases (`next_c_id * N`), sorted per row.
    edges: Box<[u64]>,
}

impl Transitions {
    /// Builds the table with `threads` workers.
    ///
    /// The configuration range is chunked across workers; each worker
    /// fills a private successor buffer and its own cells of the shared
    /// per-configuration count array (`chunks_mut` keeps the cells
    /// disjoint). A serial prefix sum then fixes the heads, and the
    /// private buffers are concatenated in chunk order. No locks.
    pub fn build(configs: &ConfigTable, adj: &AdjacencyList, threads: usize) -> Self {
        let m = configs.len();
        let n = configs.n() as u64;
        let threads = threads.max(1);
        let chunk = m.div_ceil(threads);

        let mut counts = vec![0usize; m];
        let locals: Vec<Vec<u64>> = thread::scope(|s| {
            let handles: Vec<_> = counts
                .chunks_mut(chunk)
                .enumerate()
                .map(|(t, count_cells)| {
                    let start = t * chunk;
                    s.spawn(move || {
                        let mut moves = TeamMoves::new(configs.k(), adj.stride());
                        let mut row: Vec<usize> = Vec::with_capacity(256);
                        let mut local: Vec<u64> = Vec::with_capacity(count_cells.len() * 12);
                        for (i, cell) in count_cells.iter_mut().enumerate() {
                            moves.successors(configs, adj, start + i, &mut row);
                            *cell = row.len();
                            local.extend(row.iter().map(|&c| c as u64 * n));
                        }
                        local
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("transition worker panicked"))
                .collect()
        });

        let mut heads = Vec::with_capacity(m + 1);
        let mut total = 0usize;
        for &c in &counts {
            heads.push(total);
            total += c;
        }
        heads.push(total);

        let mut edges = Vec::with_capacity(total);
        for local in locals {
            edges.extend_from_slice(&local);
        }
        debug_assert_eq!(edges.len(), total);

        Self {
            heads: heads.into_boxed_slice(),
            edges: edges.into_boxed_slice(),
        }
    }

    /// Successor state-ID bases of configuration `c_id` (each is
    /// `next_c_id * N`), sorted ascending and distinct.
    #[inline(always)]
    pub fn successor_bases(&self, c_id: usize) -> &[u64] {
        &self.edges[self.heads[c_id]..self.heads[c_id + 1]]
    }

    /// Total number of stored successor entries.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
