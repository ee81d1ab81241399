//! Verdict scan, minimax path extraction, and the text exports.
//!
//! A configuration is a winning start iff the cops win from it against
//! every robber position. Path extraction walks the solved table:
//! the cops pick the move minimizing the robber's best remaining
//! survival time, the robber picks the move maximizing it.

use crate::error::SolverError;
use crate::moves::TeamMoves;
use crate::solver::Solution;
use rayon::prelude::*;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// ============================================================================
// Verdict
// ============================================================================

/// Outcome of the analysis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Some start configuration forces capture against every robber
    /// start.
    Win {
        /// ID of the reported start configuration.
        c_id: usize,
        /// Its sorted cop tuple.
        cops: Vec<u8>,
        /// Worst-case rounds over all robber starts (only when the
        /// rounds table was maintained).
        worst_case_rounds: Option<i32>,
    },
    /// The robber evades forever against every start.
    Loss,
}

/// Scans all configurations for a universally winning start.
///
/// Without rounds tracking this returns the first winner in lex order;
/// with rounds tracking it returns the winner minimizing the worst-case
/// capture time (ties broken by lowest ID).
pub fn verdict(sol: &Solution) -> Verdict {
    let n = sol.graph.n();
    let m = sol.configs.len();

    if sol.states.tracks_rounds() {
        let best = (0..m)
            .into_par_iter()
            .filter_map(|c| {
                let mut worst = 0i32;
                for r in 0..n {
                    let rounds = sol.rounds(c, r);
                    if rounds < 0 {
                        return None;
                    }
                    worst = worst.max(rounds);
                }
                Some((worst, c))
            })
            .min();
        match best {
            Some((worst, c_id)) => Verdict::Win {
                c_id,
                cops: sol.configs.get(c_id).to_vec(),
                worst_case_rounds: Some(worst),
            },
            None => Verdict::Loss,
        }
    } else {
        let first = (0..m)
            .into_par_iter()
            .filter(|&c| (0..n).all(|r| sol.cop_win(c, r)))
            .min();
        match first {
            Some(c_id) => Verdict::Win {
                c_id,
                cops: sol.configs.get(c_id).to_vec(),
                worst_case_rounds: None,
            },
            None => Verdict::Loss,
        }
    }
}

// ============================================================================
// Path extraction
// ============================================================================

/// Whose move it is at a recorded position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Cops to move.
    CopTurn,
    /// Robber to move.
    RobberTurn,
    /// Cops and robber share a vertex; the game is over.
    Captured,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::CopTurn => write!(f, "Cop's Turn"),
            Phase::RobberTurn => write!(f, "Robber's Turn"),
            Phase::Captured => write!(f, "Game Over - Captured!"),
        }
    }
}

/// One position of the extracted game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathStep {
    /// Sorted cop tuple.
    pub cops: Vec<u8>,
    /// Robber vertex.
    pub robber: u8,
    /// Whose move it is.
    pub phase: Phase,
}

/// Walks the minimax-perfect game from the winning start `start_c`
/// against the robber's best initial position.
///
/// Cop moves minimize the robber's worst-case response (instant capture
/// counts as zero; moves letting the robber reach an unwon state are
/// discarded); robber moves maximize the remaining capture time. Ties go
/// to the lowest ID on both sides. The walk ends at capture.
///
/// # Panics
/// Panics when called on a solution without the rounds table, or with a
/// `start_c` that is not universally winning; both are programmer errors.
pub fn extract_path(sol: &Solution, start_c: usize) -> Vec<PathStep> {
    assert!(
        sol.states.tracks_rounds(),
        "path extraction requires rounds tracking"
    );
    let n = sol.graph.n();

    // Robber's best start: maximize capture time (first maximum wins,
    // which is the lowest vertex).
    let mut robber = 0usize;
    let mut best = -1i32;
    for r in 0..n {
        let rounds = sol.rounds(start_c, r);
        assert!(rounds >= 0, "start {start_c} does not win against robber at {r}");
        if rounds > best {
            best = rounds;
            robber = r;
        }
    }

    let mut scratch = TeamMoves::new(sol.k, sol.adjacency.stride());
    let mut succ: Vec<usize> = Vec::new();
    let mut path = Vec::new();
    let mut c_id = start_c;

    // Rounds strictly shrink every full round, so the walk is bounded by
    // the state count; exceeding it means the table is inconsistent.
    let mut fuel = 2 * sol.states.len() + 4;

    loop {
        fuel -= 1;
        assert!(fuel > 0, "path walk does not terminate; table inconsistent");

        let caught = sol.configs.occupies(c_id, robber as u8);
        path.push(PathStep {
            cops: sol.configs.get(c_id).to_vec(),
            robber: robber as u8,
            phase: if caught { Phase::Captured } else { Phase::CopTurn },
        });
        if caught {
            break;
        }

        // Cop move: minimize the robber's best response.
        sol.successor_ids(c_id, &mut scratch, &mut succ);
        let mut best_c: Option<usize> = None;
        let mut best_worst = i32::MAX;
        for &c_next in &succ {
            let worst = if sol.configs.occupies(c_next, robber as u8) {
                0
            } else {
                let mut worst = -1i32;
                let mut escapes = false;
                for &r_next in sol.adjacency.options(robber) {
                    if !sol.cop_win(c_next, r_next as usize) {
                        escapes = true;
                        break;
                    }
                    worst = worst.max(sol.rounds(c_next, r_next as usize));
                }
                if escapes {
                    continue;
                }
                worst
            };
            // succ is ascending, so strict < keeps the lowest ID on ties.
            if worst < best_worst {
                best_worst = worst;
                best_c = Some(c_next);
            }
        }
        c_id = best_c.expect("winning state must have a non-losing cop move");

        if sol.configs.occupies(c_id, robber as u8) {
            path.push(PathStep {
                cops: sol.configs.get(c_id).to_vec(),
                robber: robber as u8,
                phase: Phase::Captured,
            });
            break;
        }
        path.push(PathStep {
            cops: sol.configs.get(c_id).to_vec(),
            robber: robber as u8,
            phase: Phase::RobberTurn,
        });

        // Robber move: maximize remaining capture time, lowest vertex on
        // ties.
        let mut best_r = robber;
        let mut best_rounds = -1i32;
        for &r_next in sol.adjacency.options(robber) {
            let r_next = r_next as usize;
            if !sol.cop_win(c_id, r_next) {
                continue;
            }
            let rounds = sol.rounds(c_id, r_next);
            if rounds > best_rounds || (rounds == best_rounds && r_next < best_r) {
                best_rounds = rounds;
                best_r = r_next;
            }
        }
        debug_assert!(best_rounds >= 0, "robber-turn state on a winning path is lost");
        robber = best_r;
    }

    path
}

// ============================================================================
// Text exports
// ============================================================================

fn write_tuple(out: &mut impl Write, cops: &[u8]) -> std::io::Result<()> {
    for (i, &c) in cops.iter().enumerate() {
        if i > 0 {
            write!(out, ",")?;
        }
        write!(out, "{c}")?;
    }
    Ok(())
}

fn io_err(path: &Path, e: std::io::Error) -> SolverError {
    SolverError::GraphIo(format!("{}: {e}", path.display()))
}

/// Writes the full DP table, one `c0,c1,…|r|steps` line per state
/// (`steps` is -1 where the robber survives).
///
/// # Errors
/// [`SolverError::GraphIo`] on any write failure.
pub fn write_dp_table(sol: &Solution, path: impl AsRef<Path>) -> Result<(), SolverError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| io_err(path, e))?;
    let mut out = BufWriter::new(file);
    dp_lines(sol, &mut out).map_err(|e| io_err(path, e))
}

fn dp_lines(sol: &Solution, out: &mut impl Write) -> std::io::Result<()> {
    let n = sol.graph.n();
    for c in 0..sol.configs.len() {
        for r in 0..n {
            write_tuple(out, sol.configs.get(c))?;
            writeln!(out, "|{r}|{}", sol.rounds(c, r))?;
        }
    }
    out.flush()
}

/// Writes the extracted game, one `c0,…|r|phase` line per step.
///
/// # Errors
/// [`SolverError::GraphIo`] on any write failure.
pub fn write_path_file(steps: &[PathStep], path: impl AsRef<Path>) -> Result<(), SolverError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| io_err(path, e))?;
    let mut out = BufWriter::new(file);
    path_lines(steps, &mut out).map_err(|e| io_err(path, e))
}

fn path_lines(steps: &[PathStep], out: &mut impl Write) -> std::io::Result<()> {
    for step in steps {
        write_tuple(out, &step.cops)?;
        writeln!(out, "|{}|{}", step.robber, step.phase)?;
    }
    out.flush()
}

// ============================================================================
// Tests
// ============================================================================
