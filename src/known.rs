//! Deterministic verification against bundled graphs with known cop
//! numbers.

use crate::extract::{verdict, Verdict};
use crate::graph::parse_matrix;
use crate::solver::{solve, SolveOptions};

/// A bundled graph together with its known cop number.
struct KnownGraph {
    name: &'static str,
    text: &'static str,
    cop_number: usize,
}

const KNOWN: &[KnownGraph] = &[
    KnownGraph {
        name: "p3.txt",
        text: include_str!("../graphs/p3.txt"),
        cop_number: 1,
    },
    KnownGraph {
        name: "k3.txt",
        text: include_str!("../graphs/k3.txt"),
        cop_number: 1,
    },
    KnownGraph {
        name: "c4.txt",
        text: include_str!("../graphs/c4.txt"),
        cop_number: 2,
    },
    KnownGraph {
        name: "c5.txt",
        text: include_str!("../graphs/c5.txt"),
        cop_number: 2,
    },
    KnownGraph {
        name: "petersen.txt",
        text: include_str!("../graphs/petersen.txt"),
        cop_number: 3,
    },
];

/// Solves every bundled graph at its cop number (expecting WIN) and one
/// below it (expecting LOSS).
///
/// # Errors
/// Returns a message naming the first graph whose verdict disagrees with
/// its known cop number.
pub fn verify_known_graphs() -> Result<(), String> {
    for case in KNOWN {
        verify_case(case)?;
    }
    Ok(())
}

fn verify_case(case: &KnownGraph) -> Result<(), String> {
    let options = SolveOptions::default();

    let graph = parse_matrix(case.text.as_bytes()).map_err(|e| format!("{}: {e}", case.name))?;
    let sol = solve(graph.clone(), case.cop_number, &options)
        .map_err(|e| format!("{}: {e}", case.name))?;
    if verdict(&sol) == Verdict::Loss {
        return Err(format!(
            "{}: expected a win with {} cop(s), got a loss",
            case.name, case.cop_number
        ));
    }

    if case.cop_number > 1 {
        let sol = solve(graph, case.cop_number - 1, &options)
            .map_err(|e| format!("{}: {e}", case.name))?;
        if verdict(&sol) != Verdict::Loss {
            return Err(format!(
                "{}: expected a loss with {} cop(s), got a win",
                case.name,
                case.cop_number - 1
            ));
        }
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_graphs_have_their_known_cop_numbers() {
        verify_known_graphs().unwrap();
    }

    #[test]
    fn bundled_petersen_is_the_petersen_graph() {
        let g = parse_matrix(KNOWN[4].text.as_bytes()).unwrap();
        assert_eq!(g.n(), 10);
        assert_eq!(g.edge_count(), 15);
        for v in 0..10 {
            assert_eq!(g.degree(v), 3, "Petersen is 3-regular");
        }
    }

    #[test]
    fn bundled_cycles_parse_to_cycles() {
        use crate::graph::Graph;
        let c4 = parse_matrix(KNOWN[2].text.as_bytes()).unwrap();
        assert_eq!(c4, Graph::cycle(4).unwrap());
        let c5 = parse_matrix(KNOWN[3].text.as_bytes()).unwrap();
        assert_eq!(c5, Graph::cycle(5).unwrap());
    }
}
