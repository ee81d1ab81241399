//! Fatal error kinds for the solver pipeline.
//!
//! Every failure aborts the current run; the driver maps each kind to a
//! distinct process exit code. There are no recoverable errors in the hot
//! path; predicate failures there are programmer errors and panic with a
//! diagnostic instead.

use std::fmt;

/// Errors surfaced by graph ingestion, configuration enumeration and the
/// solver pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolverError {
    /// Command line was structurally wrong (wrong arity, non-integer k,
    /// unknown flag).
    InvalidArguments(String),
    /// Requested cop count outside the supported `1..=256` range.
    CopCountOutOfRange {
        /// The rejected cop count.
        k: usize,
    },
    /// The graph file was missing, unreadable, or empty.
    GraphIo(String),
    /// The matrix text violated the `'0'/'1'` row grammar.
    MalformedGraph {
        /// Human-readable description of the first violation.
        detail: String,
    },
    /// More than 254 vertices (IDs must fit a byte with 255 reserved as
    /// the row sentinel), or the state count overflows address arithmetic.
    GraphTooLarge {
        /// Offending vertex count.
        n: usize,
    },
    /// A vertex has degree + 1 exceeding the 7-bit safe-moves counter.
    GraphTooDense {
        /// Vertex whose neighborhood is too large.
        vertex: usize,
        /// Its degree including the self-loop.
        options: usize,
    },
    /// `C(N+k-1, k)` (or a derived product) overflowed 64-bit arithmetic.
    ConfigurationOverflow {
        /// Vertex count of the offending instance.
        n: usize,
        /// Cop count of the offending instance.
        k: usize,
    },
}

impl SolverError {
    /// Process exit code for the CLI driver: 1 for bad arguments, 2 for
    /// I/O and parse failures, 3 for graphs too dense for the packed
    /// encoding.
    pub fn exit_code(&self) -> i32 {
        match self {
            SolverError::InvalidArguments(_) | SolverError::CopCountOutOfRange { .. } => 1,
            SolverError::GraphIo(_)
            | SolverError::MalformedGraph { .. }
            | SolverError::GraphTooLarge { .. }
            | SolverError::ConfigurationOverflow { .. } => 2,
            SolverError::GraphTooDense { .. } => 3,
        }
    }
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::InvalidArguments(msg) => write!(f, "invalid arguments: {msg}"),
            SolverError::CopCountOutOfRange { k } => {
                write!(f, "cop count {k} out of range (supported: 1..=256)")
            }
            SolverError::GraphIo(msg) => write!(f, "graph I/O error: {msg}"),
            SolverError::MalformedGraph { detail } => {
                write!(f, "malformed graph matrix: {detail}")
            }
            SolverError::GraphTooLarge { n } => {
                write!(f, "graph has {n} vertices; vertex IDs must fit a byte (max 254)")
            }
            SolverError::GraphTooDense { vertex, options } => write!(
                f,
                "vertex {vertex} has {options} move options; the packed safe-moves counter holds at most 127"
            ),
            SolverError::ConfigurationOverflow { n, k } => write!(
                f,
                "C({} + {k} - 1, {k}) overflows 64-bit state arithmetic",
                n
            ),
        }
    }
}

impl std::error::Error for SolverError {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_match_driver_contract() {
        assert_eq!(SolverError::InvalidArguments("x".into()).exit_code(), 1);
        assert_eq!(SolverError::CopCountOutOfRange { k: 0 }.exit_code(), 1);
        assert_eq!(SolverError::GraphIo("missing".into()).exit_code(), 2);
        assert_eq!(
            SolverError::MalformedGraph { detail: "row".into() }.exit_code(),
            2
        );
        assert_eq!(SolverError::GraphTooLarge { n: 500 }.exit_code(), 2);
        assert_eq!(
            SolverError::ConfigurationOverflow { n: 254, k: 200 }.exit_code(),
            2
        );
        assert_eq!(
            SolverError::GraphTooDense { vertex: 3, options: 200 }.exit_code(),
            3
        );
    }

    #[test]
    fn display_mentions_the_offending_quantity() {
        let e = SolverError::GraphTooDense { vertex: 7, options: 130 };
        let msg = e.to_string();
        assert!(msg.contains('7') && msg.contains("130"));

        let e = SolverError::CopCountOutOfRange { k: 300 };
        assert!(e.to_string().contains("300"));
    }
}
