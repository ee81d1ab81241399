//! Packed per-state scoreboard.
//!
//! One atomic byte per (configuration, robber) state:
//!
//! - bit 0: the cop-turn win flag (cops to move from here force capture);
//! - bits 1..7: the robber's safe-moves counter, initialized to
//!   degree + 1 (neighbors plus stay) and decremented once per cop-win
//!   discovery among the robber's options. Zero means the robber-turn
//!   state is lost for the robber.
//!
//! The two RMW contracts the retrograde loop relies on:
//!
//! - [`StateStore::mark_cop_win`] uses `fetch_or`; exactly one caller
//!   across all threads observes the 0→1 transition.
//! - [`StateStore::cut_escape`] uses `fetch_sub` on the counter field;
//!   exactly one caller observes the lethal decrement (old count 1).
//!
//! Relaxed ordering everywhere: flags only rise, counters only fall, and
//! the wave barrier supplies all required happens-before edges.

use crate::adjacency::AdjacencyList;
use crate::configs::ConfigTable;
use rayon::prelude::*;
use std::sync::atomic::{AtomicI32, AtomicU8, Ordering};

/// Cop-turn win flag (bit 0 of the state byte).
pub const COP_WIN_BIT: u8 = 1;
/// Shift of the safe-moves counter within the state byte.
pub const SAFE_MOVES_SHIFT: u8 = 1;
/// Mask of the safe-moves counter within the state byte.
pub const SAFE_MOVES_MASK: u8 = 0xFE;

/// High bit of a frontier word: set when the entry is a robber-turn win.
pub const ROBBER_TURN_BIT: u64 = 1 << 63;
/// Frontier-word mask extracting the state ID.
pub const STATE_ID_MASK: u64 = !ROBBER_TURN_BIT;

// ============================================================================
// StateStore
// ============================================================================

/// Flat atomic scoreboard over all `M * N` states, with an optional
/// rounds-to-capture table for minimax path extraction.
#[derive(Debug)]
pub struct StateStore {
    cells: Box<[AtomicU8]>,
    /// `-1` until the state's first cop-win transition stamps it.
    rounds: Option<Box<[AtomicI32]>>,
}

impl StateStore {
    /// Allocates a zeroed scoreboard for `num_states` states.
    pub fn new(num_states: usize, track_rounds: bool) -> Self {
        let cells: Vec<AtomicU8> = (0..num_states).map(|_| AtomicU8::new(0)).collect();
        let rounds = track_rounds
            .then(|| (0..num_states).map(|_| AtomicI32::new(-1)).collect::<Vec<_>>());
        Self {
            cells: cells.into_boxed_slice(),
            rounds: rounds.map(Vec::into_boxed_slice),
        }
    }

    /// Number of states tracked.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when the store tracks no states.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether the rounds table is maintained.
    #[inline(always)]
    pub fn tracks_rounds(&self) -> bool {
        self.rounds.is_some()
    }

    /// Sets the cop-turn win flag; returns `true` iff this call performed
    /// the 0→1 transition (and therefore owns the enqueue).
    #[inline(always)]
    pub fn mark_cop_win(&self, state: usize) -> bool {
        let old = self.cells[state].fetch_or(COP_WIN_BIT, Ordering::Relaxed);
        old & COP_WIN_BIT == 0
    }

    /// Removes one safe move from the robber-turn state; returns `true`
    /// iff this was the lethal decrement (old count 1), which makes the
    /// caller the unique owner of the robber-turn-win enqueue.
    ///
    /// Subtracting in the counter field never touches bit 0, so the cop
    /// flag survives any wrap on already-won states.
    #[inline(always)]
    pub fn cut_escape(&self, state: usize) -> bool {
        let old = self.cells[state].fetch_sub(1 << SAFE_MOVES_SHIFT, Ordering::Relaxed);
        (old & SAFE_MOVES_MASK) >> SAFE_MOVES_SHIFT == 1
    }

    /// Whether the cop-turn state is a forced win for the cops.
    #[inline(always)]
    pub fn cop_win(&self, state: usize) -> bool {
        self.cells[state].load(Ordering::Relaxed) & COP_WIN_BIT != 0
    }

    /// Current safe-moves count of the robber-turn state.
    #[inline(always)]
    pub fn safe_moves(&self, state: usize) -> u8 {
        (self.cells[state].load(Ordering::Relaxed) & SAFE_MOVES_MASK) >> SAFE_MOVES_SHIFT
    }

    /// Stamps the rounds-to-capture value of a freshly won cop-turn
    /// state. No-op when tracking is off.
    #[inline(always)]
    pub fn set_rounds(&self, state: usize, rounds: i32) {
        if let Some(table) = &self.rounds {
            table[state].store(rounds, Ordering::Relaxed);
        }
    }

    /// Rounds to capture from the cop-turn state (`-1`: not won, or
    /// tracking disabled).
    #[inline(always)]
    pub fn rounds(&self, state: usize) -> i32 {
        match &self.rounds {
            Some(table) => table[state].load(Ordering::Relaxed),
            None => -1,
        }
    }

    /// Initialization pass: marks every capture state (robber standing on
    /// a cop) as a win for both turn phases and seeds the counter of
    /// every other state with the robber's option count.
    ///
    /// Returns the initial frontier: each capture state once bare
    /// (cop-turn win) and once with [`ROBBER_TURN_BIT`] set.
    pub fn seed_captures(&self, configs: &ConfigTable, adj: &AdjacencyList) -> Vec<u64> {
        let n = adj.n();
        debug_assert_eq!(self.len(), configs.len() * n);

        (0..configs.len())
            .into_par_iter()
            .fold(Vec::new, |mut acc: Vec<u64>, c_id| {
                let base = c_id * n;
                for r in 0..n {
                    let state = base + r;
                    if configs.occupies(c_id, r as u8) {
                        self.cells[state].store(COP_WIN_BIT, Ordering::Relaxed);
                        self.set_rounds(state, 0);
                        acc.push(state as u64);
                        acc.push(state as u64 | ROBBER_TURN_BIT);
                    } else {
                        let count = (adj.option_count(r) as u8) << SAFE_MOVES_SHIFT;
                        self.cells[state].store(count, Ordering::Relaxed);
                    }
                }
                acc
            })
            .reduce(Vec::new, |mut a, mut b| {
                a.append(&mut b);
                a
            })
    }
}

// ============================================================================
// Tests
// ============================================================================
