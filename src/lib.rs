//! # Pursuit: an Exact Cops-and-Robbers Solver
//!
//! Decides, for a finite undirected graph G and a cop count k, whether k
//! cops can guarantee capture of the robber in the classical
//! cops-and-robbers pursuit game, and optionally extracts the
//! minimax-perfect play.
//!
//! The engine is a retrograde (backward-induction) sweep over the full
//! product space of all sorted k-cop placements and robber positions:
//! capture states are wins by definition, and winning labels propagate
//! backward in level-synchronous waves until a fixed point. Two atomic
//! tricks make the waves lock-free: a `fetch_or` on the cop-win flag
//! hands exactly one worker the first 0→1 transition, and a `fetch_sub`
//! on the robber's escape counter hands exactly one worker the lethal
//! decrement.
//!
//! ## Quick Start
//!
//! ```
//! use pursuit::extract::{verdict, Verdict};
//! use pursuit::graph::Graph;
//! use pursuit::solver::{solve, SolveOptions};
//!
//! // Two cops corner the robber on a 4-cycle.
//! let sol = solve(Graph::cycle(4)?, 2, &SolveOptions::default())?;
//! assert!(matches!(verdict(&sol), Verdict::Win { .. }));
//! # Ok::<(), pursuit::error::SolverError>(())
//! ```
//!
//! ## Minimax play
//!
//! ```
//! use pursuit::extract::{extract_path, verdict, Verdict};
//! use pursuit::graph::Graph;
//! use pursuit::solver::{solve, SolveOptions};
//!
//! let options = SolveOptions { track_rounds: true, ..SolveOptions::default() };
//! let sol = solve(Graph::path(3)?, 1, &options)?;
//! if let Verdict::Win { c_id, .. } = verdict(&sol) {
//!     let play = extract_path(&sol, c_id);
//!     assert!(play.last().unwrap().cops.contains(&play.last().unwrap().robber));
//! }
//! # Ok::<(), pursuit::error::SolverError>(())
//! ```
//!
//! ## Modules
//!
//! - [`graph`]: byte-matrix graph and the `'-'`-terminated file format.
//! - [`adjacency`]: fixed-stride neighbor table with the self-loop first.
//! - [`configs`]: lex-ordered enumeration of sorted cop placements.
//! - [`moves`]: team-move Cartesian product with odometer iteration.
//! - [`transitions`]: parallel CSR successor table.
//! - [`state`]: packed atomic per-state scoreboard.
//! - [`solver`]: the wavefront loop, its low-memory variant, and the
//!   serial reference solver.
//! - [`extract`]: verdict scan, path extraction, text exports.
//! - [`known`]: bundled graphs with known cop numbers.
//!
//! ## Performance Notes
//!
//! - Vertex IDs are bytes (N ≤ 254; 255 is the row sentinel), and each
//!   game state costs a single byte.
//! - CSR successors are stored pre-multiplied by N, so propagation forms
//!   a state ID with one addition.
//! - Relaxed atomics throughout: flags only rise, counters only fall,
//!   and the per-wave join barrier supplies all required ordering.
//! - For maximum throughput compile with
//!   `RUSTFLAGS="-C target-cpu=native" cargo build --release`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::inline_always)] // Intentional for hot-path code
#![allow(clippy::many_single_char_names)] // Mathematical variable names
#![allow(clippy::needless_range_loop)] // Often clearer for matrix indexing
#![allow(clippy::multiple_crate_versions)] // Cargo.lock management is external

pub mod adjacency;
pub mod configs;
pub mod error;
pub mod extract;
pub mod graph;
pub mod known;
pub mod moves;
pub mod solver;
pub mod state;
pub mod transitions;

/// Re-export commonly used types for convenience.
pub mod prelude {
    pub use crate::error::SolverError;
    pub use crate::extract::{extract_path, verdict, Verdict};
    pub use crate::graph::Graph;
    pub use crate::solver::{solve, solve_reference, SolveOptions, Solution, TransitionMode};
}
