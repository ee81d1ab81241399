//! Level-synchronous parallel retrograde solver.
//!
//! Winning labels propagate backward from the capture states until a
//! fixed point:
//!
//! - a robber-turn win makes every cop move *into* it a cop-turn win;
//!   because every cop may stay and the edge relation is symmetric, the
//!   successor relation is its own inverse, so the forward table
//!   enumerates exactly the predecessors;
//! - a cop-turn win removes one escape option from every robber-turn
//!   state whose robber could have moved into it; the state whose counter
//!   hits zero is lost for the robber.
//!
//! Each wave processes the whole current frontier in parallel: workers
//! pull fixed-size batches from a shared atomic cursor, collect newly won
//! states into private buffers, and the buffers are concatenated after
//! the join barrier. The `fetch_or` / `fetch_sub` contracts of
//! [`StateStore`] guarantee every state enters a frontier at most once
//! per turn phase, bounding total work by two visits per state.

use crate::adjacency::AdjacencyList;
use crate::configs::{ConfigTable, MAX_COPS};
use crate::error::SolverError;
use crate::graph::Graph;
use crate::moves::TeamMoves;
use crate::state::{StateStore, ROBBER_TURN_BIT, STATE_ID_MASK};
use crate::transitions::Transitions;
use crossbeam::utils::CachePadded;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Frontier entries claimed per `fetch_add` on the wave cursor.
pub const BATCH_SIZE: usize = 4096;

/// Worker count when hardware concurrency cannot be queried.
pub const FALLBACK_THREADS: usize = 8;

// ============================================================================
// Options
// ============================================================================

/// How the solver obtains team-move successors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionMode {
    /// Build the CSR successor table up front (fastest; the table is the
    /// largest allocation after the state store).
    Precomputed,
    /// Regenerate successor sets during propagation. Trades CPU for
    /// memory when the configuration space is large.
    OnTheFly,
}

/// Solver knobs.
#[derive(Clone, Debug)]
pub struct SolveOptions {
    /// Worker threads; `None` queries hardware concurrency (fallback
    /// [`FALLBACK_THREADS`]).
    pub threads: Option<usize>,
    /// Maintain the rounds-to-capture table (required for best-start
    /// selection and path extraction).
    pub track_rounds: bool,
    /// Successor strategy.
    pub mode: TransitionMode,
    /// Print advisory progress to stdout.
    pub verbose: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            threads: None,
            track_rounds: false,
            mode: TransitionMode::Precomputed,
            verbose: false,
        }
    }
}

fn detect_threads() -> usize {
    thread::available_parallelism()
        .map(std::num::NonZero::get)
        .unwrap_or(FALLBACK_THREADS)
}

// ============================================================================
// Solution
// ============================================================================

/// Run statistics.
#[derive(Clone, Debug)]
pub struct SolveStats {
    /// Number of cop configurations (M).
    pub configurations: usize,
    /// Number of states (M · N).
    pub states: usize,
    /// Capture states found during initialization.
    pub initial_captures: usize,
    /// Propagation waves until the fixed point.
    pub waves: usize,
    /// CSR entries, when the table was built.
    pub transition_edges: Option<usize>,
    /// Wall-clock time of the whole solve.
    pub elapsed: Duration,
}

/// The solved game: every input table plus the final scoreboard.
#[derive(Debug)]
pub struct Solution {
    /// Cops per configuration.
    pub k: usize,
    /// The input graph.
    pub graph: Graph,
    /// Neighbor table (self-loop first).
    pub adjacency: AdjacencyList,
    /// Lex-ordered configuration table.
    pub configs: ConfigTable,
    /// CSR successor table (absent in on-the-fly mode).
    pub transitions: Option<Transitions>,
    /// Per-state win flags, counters and optional rounds.
    pub states: StateStore,
    /// Run statistics.
    pub stats: SolveStats,
}

impl Solution {
    /// Flat state ID of (configuration, robber position).
    #[inline(always)]
    pub fn state_id(&self, c_id: usize, r: usize) -> usize {
        c_id * self.graph.n() + r
    }

    /// Whether the cops win moving from (c_id, r).
    #[inline(always)]
    pub fn cop_win(&self, c_id: usize, r: usize) -> bool {
        self.states.cop_win(self.state_id(c_id, r))
    }

    /// Rounds to capture from (c_id, r); `-1` when unwon or untracked.
    #[inline(always)]
    pub fn rounds(&self, c_id: usize, r: usize) -> i32 {
        self.states.rounds(self.state_id(c_id, r))
    }

    /// Distinct successor configuration IDs of `c_id`, sorted ascending,
    /// from the CSR table or regenerated through `scratch`.
    pub fn successor_ids(&self, c_id: usize, scratch: &mut TeamMoves, out: &mut Vec<usize>) {
        match &self.transitions {
            Some(t) => {
                let n = self.graph.n() as u64;
                out.clear();
                out.extend(t.successor_bases(c_id).iter().map(|&base| (base / n) as usize));
            }
            None => scratch.successors(&self.configs, &self.adjacency, c_id, out),
        }
    }
}

// ============================================================================
// Parallel retrograde solve
// ============================================================================

/// Solves the pursuit game on `graph` with `k` cops.
///
/// Stages: adjacency → configuration table → (optional) CSR transitions
/// → capture seeding → wavefront loop. Each stage only reads finalized
/// outputs of earlier stages.
///
/// # Errors
/// Any of the construction errors: [`SolverError::CopCountOutOfRange`],
/// [`SolverError::GraphTooDense`], [`SolverError::ConfigurationOverflow`],
/// [`SolverError::GraphTooLarge`].
pub fn solve(graph: Graph, k: usize, options: &SolveOptions) -> Result<Solution, SolverError> {
    let start = Instant::now();
    let n = graph.n();
    if n == 0 {
        return Err(SolverError::MalformedGraph {
            detail: "graph has no vertices".into(),
        });
    }
    if k < 1 || k > MAX_COPS {
        return Err(SolverError::CopCountOutOfRange { k });
    }
    let threads = options.threads.unwrap_or_else(detect_threads).max(1);

    let adjacency = AdjacencyList::build(&graph)?;
    let configs = ConfigTable::generate(n, k)?;
    let m = configs.len();
    let num_states = m
        .checked_mul(n)
        .ok_or(SolverError::GraphTooLarge { n })?;
    if num_states as u64 > STATE_ID_MASK {
        return Err(SolverError::GraphTooLarge { n });
    }

    if options.verbose {
        println!(
            "Graph: {n} vertices, {} edges | cops: {k} | workers: {threads}",
            graph.edge_count()
        );
        println!(
            "Configurations: {m} ({:.1} MB) | states: {num_states}",
            (m * k) as f64 / (1024.0 * 1024.0)
        );
    }

    let transitions = match options.mode {
        TransitionMode::Precomputed => {
            let t = Transitions::build(&configs, &adjacency, threads);
            if options.verbose {
                println!("Transition table ready: {} successor entries.", t.edge_count());
            }
            Some(t)
        }
        TransitionMode::OnTheFly => None,
    };

    let states = StateStore::new(num_states, options.track_rounds);
    let mut frontier = states.seed_captures(&configs, &adjacency);
    let initial_captures = frontier.len() / 2;
    if options.verbose {
        println!("Initialized {initial_captures} capture states.");
        println!("Starting level-synchronous retrograde sweep...");
    }

    let mut waves = 0usize;
    while !frontier.is_empty() {
        waves += 1;
        let frontier_size = frontier.len();
        // All cop-turn states first won during this wave share the same
        // minimax depth; the wave index determines it exactly.
        let cop_rounds = ((waves + 1) / 2) as i32;
        let cursor: CachePadded<AtomicUsize> = CachePadded::new(AtomicUsize::new(0));

        let locals: Vec<Vec<u64>> = thread::scope(|s| {
            let handles: Vec<_> = (0..threads)
                .map(|_| {
                    let frontier = &frontier;
                    let cursor = &cursor;
                    let states = &states;
                    let adjacency = &adjacency;
                    let configs = &configs;
                    let transitions = transitions.as_ref();
                    s.spawn(move || {
                        let mut next: Vec<u64> =
                            Vec::with_capacity(frontier_size / threads * 2 + 16);
                        let mut regen = transitions
                            .is_none()
                            .then(|| TeamMoves::new(k, adjacency.stride()));

                        loop {
                            let begin = cursor.fetch_add(BATCH_SIZE, Ordering::Relaxed);
                            if begin >= frontier_size {
                                break;
                            }
                            let end = (begin + BATCH_SIZE).min(frontier_size);

                            for &word in &frontier[begin..end] {
                                let state = (word & STATE_ID_MASK) as usize;
                                let c_id = state / n;
                                let r = state % n;

                                if word & ROBBER_TURN_BIT != 0 {
                                    // Cop-turn predecessors: every c' the team
                                    // could have moved from. succ is its own
                                    // inverse, so the forward row is exact.
                                    let mut visit = |prev: usize| {
                                        if states.mark_cop_win(prev) {
                                            states.set_rounds(prev, cop_rounds);
                                            next.push(prev as u64);
                                        }
                                    };
                                    match transitions {
                                        Some(t) => {
                                            for &base in t.successor_bases(c_id) {
                                                visit(base as usize + r);
                                            }
                                        }
                                        None => {
                                            let regen =
                                                regen.as_mut().expect("regen scratch present");
                                            regen.for_each_successor(
                                                configs,
                                                adjacency,
                                                c_id,
                                                |c_next| visit(c_next * n + r),
                                            );
                                        }
                                    }
                                } else {
                                    // Robber-turn predecessors: the robber could
                                    // have stood anywhere in N[r] ∪ {r}; each
                                    // loses the escape option into r.
                                    let base = c_id * n;
                                    for &r_prev in adjacency.options(r) {
                                        let prev = base + r_prev as usize;
                                        if states.cut_escape(prev) {
                                            next.push(prev as u64 | ROBBER_TURN_BIT);
                                        }
                                    }
                                }
                            }
                        }
                        next
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("solver worker panicked"))
                .collect()
        });

        let total: usize = locals.iter().map(Vec::len).sum();
        let mut merged = Vec::with_capacity(total);
        for mut local in locals {
            merged.append(&mut local);
        }
        if options.verbose {
            println!("Wave {waves}: {frontier_size} propagated, {total} newly won.");
        }
        frontier = merged;
    }

    let elapsed = start.elapsed();
    if options.verbose {
        println!("Fixed point after {waves} waves in {:.3}s.", elapsed.as_secs_f64());
    }

    Ok(Solution {
        k,
        graph,
        adjacency,
        configs,
        states,
        stats: SolveStats {
            configurations: m,
            states: num_states,
            initial_captures,
            waves,
            transition_edges: transitions.as_ref().map(Transitions::edge_count),
            elapsed,
        },
        transitions,
    })
}

// ============================================================================
// Serial reference solver
// ============================================================================

/// Result of the straightforward full-sweep induction.
pub struct Reference {
    /// Lex-ordered configuration table.
    pub configs: ConfigTable,
    n: usize,
    /// Cop-turn win flags, indexed by state ID.
    pub cop_wins: Vec<bool>,
    /// Robber-turn win flags (for the cops), indexed by state ID.
    pub robber_wins: Vec<bool>,
    /// Full sweeps until no label changed.
    pub passes: usize,
}

impl Reference {
    /// Whether the cops win moving from (c_id, r).
    #[inline]
    pub fn cop_win(&self, c_id: usize, r: usize) -> bool {
        self.cop_wins[c_id * self.n + r]
    }

    /// First configuration winning against every robber start, if any.
    pub fn winning_start(&self) -> Option<usize> {
        (0..self.configs.len()).find(|&c| (0..self.n).all(|r| self.cop_win(c, r)))
    }
}

/// Solves by repeated full sweeps over all states until no label changes.
///
/// Quadratic in the worst case and single-threaded; exists as the
/// ground-truth oracle the wavefront solver is validated against, and as
/// a debugging aid on small instances.
///
/// # Errors
/// Same construction errors as [`solve`].
pub fn solve_reference(graph: &Graph, k: usize) -> Result<Reference, SolverError> {
    let n = graph.n();
    if n == 0 {
        return Err(SolverError::MalformedGraph {
            detail: "graph has no vertices".into(),
        });
    }
    let adj = AdjacencyList::build(graph)?;
    let configs = ConfigTable::generate(n, k)?;
    let m = configs.len();

    let mut moves = TeamMoves::new(k, adj.stride());
    let mut succ: Vec<Vec<usize>> = vec![Vec::new(); m];
    for (c, row) in succ.iter_mut().enumerate() {
        moves.successors(&configs, &adj, c, row);
    }

    let num_states = m.checked_mul(n).ok_or(SolverError::GraphTooLarge { n })?;
    let mut cop_wins = vec![false; num_states];
    let mut robber_wins = vec![false; num_states];

    for c in 0..m {
        for r in 0..n {
            if configs.occupies(c, r as u8) {
                cop_wins[c * n + r] = true;
                robber_wins[c * n + r] = true;
            }
        }
    }

    let mut passes = 0usize;
    let mut changed = true;
    while changed {
        changed = false;
        passes += 1;
        for c in 0..m {
            let base = c * n;
            for r in 0..n {
                let state = base + r;
                if cop_wins[state] && robber_wins[state] {
                    continue;
                }
                if !robber_wins[state] {
                    let trapped = adj
                        .options(r)
                        .iter()
                        .all(|&r_next| cop_wins[base + r_next as usize]);
                    if trapped {
                        robber_wins[state] = true;
                        changed = true;
                    }
                }
                if !cop_wins[state] {
                    let can_win = succ[c].iter().any(|&c_next| robber_wins[c_next * n + r]);
                    if can_win {
                        cop_wins[state] = true;
                        changed = true;
                    }
                }
            }
        }
    }

    Ok(Reference {
        configs,
        n,
        cop_wins,
        robber_wins,
        passes,
    })
}

// ============================================================================
// Tests
// ============================================================================
