//! Team-move generation.
//!
//! One team move lets every cop independently stay or step to a
//! neighbor. [`TeamMoves`] walks the Cartesian product of the per-cop
//! option rows with an iterative odometer (no recursion, bounded stack
//! for any k), sorts each outcome tuple, and resolves it to a
//! configuration ID by binary search.

use crate::adjacency::AdjacencyList;
use crate::configs::ConfigTable;

/// Reusable scratch for enumerating the team moves of a configuration.
///
/// All buffers are allocated once and reused across calls, so the hot
/// loops (CSR build, on-the-fly propagation) never allocate.
#[derive(Clone, Debug)]
pub struct TeamMoves {
    k: usize,
    stride: usize,
    /// Per-cop option lists, row-major `k * stride` (copied per call).
    options: Vec<u8>,
    /// Option count per cop for the current configuration.
    counts: Vec<usize>,
    /// Current product position per cop.
    odometer: Vec<usize>,
    /// The assembled (then sorted) outcome tuple.
    move_buf: Vec<u8>,
}

impl TeamMoves {
    /// Creates scratch sized for `k` cops over rows of the given stride.
    pub fn new(k: usize, stride: usize) -> Self {
        Self {
            k,
            stride,
            options: vec![0u8; k * stride],
            counts: vec![0usize; k],
            odometer: vec![0usize; k],
            move_buf: vec![0u8; k],
        }
    }

    /// Invokes `f` with the configuration ID of every team successor of
    /// `c_id`, in product order. Duplicate IDs are passed through; the
    /// caller dedupes if it needs to.
    ///
    /// # Panics
    /// Panics if an outcome tuple has no table entry: the product only
    /// produces valid vertex multisets, so a miss is a programmer error.
    pub fn for_each_successor(
        &mut self,
        configs: &ConfigTable,
        adj: &AdjacencyList,
        c_id: usize,
        mut f: impl FnMut(usize),
    ) {
        let k = self.k;
        debug_assert_eq!(k, configs.k());

        let cops = configs.get(c_id);
        for (i, &v) in cops.iter().enumerate() {
            let opts = adj.options(v as usize);
            self.options[i * self.stride..i * self.stride + opts.len()].copy_from_slice(opts);
            self.counts[i] = opts.len();
            self.odometer[i] = 0;
        }

        loop {
            for i in 0..k {
                self.move_buf[i] = self.options[i * self.stride + self.odometer[i]];
            }
            sort_small(&mut self.move_buf);

            let next = configs.find(&self.move_buf).unwrap_or_else(|| {
                panic!(
                    "team move {:?} from configuration {c_id} has no table entry",
                    self.move_buf
                )
            });
            f(next);

            // Advance the odometer, least significant cop last.
            let mut p = k;
            loop {
                if p == 0 {
                    return;
                }
                p -= 1;
                self.odometer[p] += 1;
                if self.odometer[p] < self.counts[p] {
                    break;
                }
                self.odometer[p] = 0;
            }
        }
    }

    /// Collects the distinct successors of `c_id`, sorted ascending.
    pub fn successors(
        &mut self,
        configs: &ConfigTable,
        adj: &AdjacencyList,
        c_id: usize,
        out: &mut Vec<usize>,
    ) {
        out.clear();
        self.for_each_successor(configs, adj, c_id, |next| out.push(next));
        out.sort_unstable();
        out.dedup();
    }
}

/// Insertion sort; beats the general sorts for the tuple widths in play
/// (k is rarely above a handful).
#[inline]
fn sort_small(buf: &mut [u8]) {
    for i in 1..buf.len() {
        let v = buf[i];
        let mut j = i;
        while j > 0 && buf[j - 1] > v {
            buf[j] = buf[j - 1];
            j -= 1;
        }
        buf[j] = v;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;
    use std::collections::BTreeSet;

    fn setup(g: &Graph, k: usize) -> (ConfigTable, AdjacencyList, TeamMoves) {
        let adj = AdjacencyList::build(g).unwrap();
        let configs = ConfigTable::generate(g.n(), k).unwrap();
        let moves = TeamMoves::new(k, adj.stride());
        (configs, adj, moves)
    }

    fn succ_set(
        moves: &mut TeamMoves,
        configs: &ConfigTable,
        adj: &AdjacencyList,
        c_id: usize,
    ) -> Vec<usize> {
        let mut out = Vec::new();
        moves.successors(configs, adj, c_id, &mut out);
        out
    }

    #[test]
    fn sort_small_sorts() {
        let mut buf = [5u8, 1, 4, 1, 9, 0];
        sort_small(&mut buf);
        assert_eq!(buf, [0, 1, 1, 4, 5, 9]);
        let mut single = [7u8];
        sort_small(&mut single);
        assert_eq!(single, [7]);
    }

    #[test]
    fn single_cop_successors_are_the_closed_neighborhood() {
        let g = Graph::path(4).unwrap();
        let (configs, adj, mut moves) = setup(&g, 1);
        // Cop on vertex 1 of P4 can stay or step to 0 or 2.
        let c = configs.find(&[1]).unwrap();
        let succ = succ_set(&mut moves, &configs, &adj, c);
        let tuples: Vec<&[u8]> = succ.iter().map(|&s| configs.get(s)).collect();
        assert_eq!(tuples, vec![&[0u8][..], &[1u8][..], &[2u8][..]]);
    }

    #[test]
    fn successors_are_sorted_and_distinct() {
        let g = Graph::cycle(6).unwrap();
        let (configs, adj, mut moves) = setup(&g, 2);
        for c in 0..configs.len() {
            let succ = succ_set(&mut moves, &configs, &adj, c);
            for w in succ.windows(2) {
                assert!(w[0] < w[1]);
            }
        }
    }

    #[test]
    fn two_cops_on_triangle_reach_everything() {
        // K3 is one hop from anywhere, so any pair reaches all 6 pairs.
        let g = Graph::complete(3).unwrap();
        let (configs, adj, mut moves) = setup(&g, 2);
        for c in 0..configs.len() {
            let succ = succ_set(&mut moves, &configs, &adj, c);
            assert_eq!(succ.len(), configs.len());
        }
    }

    #[test]
    fn every_successor_is_an_option_assignment() {
        // Cross-check against an independent per-cop reachability test:
        // a sorted successor tuple must admit a perfect matching between
        // its entries and the cops' option sets. For k = 2 we can check
        // both assignments directly.
        let mut rng = XorShiftRng::seed_from_u64(0xBEEF);
        for _ in 0..10 {
            let mut edges = Vec::new();
            for u in 0..8usize {
                for v in (u + 1)..8 {
                    if rng.random_bool(0.4) {
                        edges.push((u, v));
                    }
                }
            }
            let g = Graph::from_edges(8, &edges).unwrap();
            let (configs, adj, mut moves) = setup(&g, 2);

            for c in 0..configs.len() {
                let cops = configs.get(c).to_vec();
                let reach = |from: u8, to: u8| adj.options(from as usize).contains(&to);
                for s in succ_set(&mut moves, &configs, &adj, c) {
                    let t = configs.get(s);
                    let direct = reach(cops[0], t[0]) && reach(cops[1], t[1]);
                    let crossed = reach(cops[0], t[1]) && reach(cops[1], t[0]);
                    assert!(
                        direct || crossed,
                        "successor {t:?} unreachable from {cops:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn successor_relation_is_symmetric() {
        // Stay options plus undirected edges make succ its own inverse.
        let mut rng = XorShiftRng::seed_from_u64(0xFACE);
        for _ in 0..5 {
            let mut edges = Vec::new();
            for u in 0..7usize {
                for v in (u + 1)..7 {
                    if rng.random_bool(0.35) {
                        edges.push((u, v));
                    }
                }
            }
            let g = Graph::from_edges(7, &edges).unwrap();
            let (configs, adj, mut moves) = setup(&g, 2);

            let all: Vec<BTreeSet<usize>> = (0..configs.len())
                .map(|c| succ_set(&mut moves, &configs, &adj, c).into_iter().collect())
                .collect();
            for c in 0..configs.len() {
                for &s in &all[c] {
                    assert!(all[s].contains(&c), "{s} in succ({c}) but not vice versa");
                }
            }
        }
    }

    #[test]
    fn every_configuration_reaches_itself() {
        // All cops staying put reproduces the configuration.
        let g = Graph::cycle(5).unwrap();
        let (configs, adj, mut moves) = setup(&g, 3);
        for c in 0..configs.len() {
            assert!(succ_set(&mut moves, &configs, &adj, c).contains(&c));
        }
    }

    #[test]
    fn product_order_passes_duplicates_through() {
        // Two cops on adjacent vertices can swap, landing on the same
        // sorted tuple via two distinct product choices.
        let g = Graph::path(2).unwrap();
        let (configs, adj, mut moves) = setup(&g, 2);
        let c = configs.find(&[0, 1]).unwrap();
        let mut raw = Vec::new();
        moves.for_each_successor(&configs, &adj, c, |next| raw.push(next));
        assert_eq!(raw.len(), 4); // 2 options each
        let distinct: BTreeSet<usize> = raw.iter().copied().collect();
        assert!(distinct.len() < raw.len());
    }
}
