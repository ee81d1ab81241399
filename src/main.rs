use pursuit::error::SolverError;
use pursuit::extract::{extract_path, verdict, write_dp_table, write_path_file, Verdict};
use pursuit::graph::Graph;
use pursuit::solver::{solve, SolveOptions, TransitionMode};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut graph_file: Option<String> = None;
    let mut k_arg: Option<String> = None;
    let mut options = SolveOptions {
        verbose: true,
        ..SolveOptions::default()
    };
    let mut export_prefix: Option<String> = None;
    let mut verify_only = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--verify" | "--test" => {
                verify_only = true;
                i += 1;
            }
            "--threads" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(1));
                options.threads = Some(v.parse().unwrap_or_else(|_| usage_and_exit(1)));
                i += 2;
            }
            "--low-memory" => {
                options.mode = TransitionMode::OnTheFly;
                i += 1;
            }
            "--rounds" => {
                options.track_rounds = true;
                i += 1;
            }
            "--export" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(1));
                export_prefix = Some(v.clone());
                options.track_rounds = true;
                i += 2;
            }
            "--quiet" => {
                options.verbose = false;
                i += 1;
            }
            "--help" | "-h" => usage_and_exit(0),
            arg if arg.starts_with("--") => usage_and_exit(1),
            _ => {
                if graph_file.is_none() {
                    graph_file = Some(args[i].clone());
                } else if k_arg.is_none() {
                    k_arg = Some(args[i].clone());
                } else {
                    usage_and_exit(1);
                }
                i += 1;
            }
        }
    }

    if verify_only {
        match pursuit::known::verify_known_graphs() {
            Ok(()) => {
                println!("Verification OK: bundled graphs match their known cop numbers.");
                return;
            }
            Err(e) => {
                eprintln!("Verification FAILED: {e}");
                std::process::exit(1);
            }
        }
    }

    let (graph_file, k_arg) = match (graph_file, k_arg) {
        (Some(g), Some(k)) => (g, k),
        _ => usage_and_exit(1),
    };
    let k: usize = match k_arg.parse() {
        Ok(k) => k,
        Err(_) => fail(&SolverError::InvalidArguments(format!(
            "cop count must be an integer, got {k_arg:?}"
        ))),
    };

    if let Err(e) = analyze(&graph_file, k, &options, export_prefix.as_deref()) {
        fail(&e);
    }
}

fn analyze(
    graph_file: &str,
    k: usize,
    options: &SolveOptions,
    export_prefix: Option<&str>,
) -> Result<(), SolverError> {
    let graph = Graph::load(graph_file)?;
    let sol = solve(graph, k, options)?;
    let result = verdict(&sol);

    println!("\n--- FINAL VERDICT ---");
    match &result {
        Verdict::Win {
            cops,
            worst_case_rounds,
            ..
        } => {
            println!("RESULT: WIN. {k} Cop(s) CAN win this graph.");
            let tuple: Vec<String> = cops.iter().map(u8::to_string).collect();
            println!("Optimal Cop Start Positions: ({})", tuple.join(", "));
            if let Some(rounds) = worst_case_rounds {
                println!("Capture Time: {rounds} rounds.");
            }
        }
        Verdict::Loss => {
            println!("RESULT: LOSS. {k} Cop(s) CANNOT guarantee a win.");
            println!("(The Robber has a strategy to survive indefinitely against any start).");
        }
    }

    if let Some(prefix) = export_prefix {
        let dp_file = format!("{prefix}_dp.txt");
        write_dp_table(&sol, &dp_file)?;
        println!("DP table written to {dp_file}");

        if let Verdict::Win { c_id, .. } = result {
            let steps = extract_path(&sol, c_id);
            let path_file = format!("{prefix}_path.txt");
            write_path_file(&steps, &path_file)?;
            println!("Perfect game ({} positions) written to {path_file}", steps.len());
        }
    }

    Ok(())
}

fn fail(e: &SolverError) -> ! {
    eprintln!("Error: {e}");
    std::process::exit(e.exit_code())
}

fn usage_and_exit(code: i32) -> ! {
    eprintln!(
        "Usage:\n  solver <graph_file> <k> [options]\n  solver --verify\n\nOptions:\n  --threads N     Worker threads (default: hardware concurrency, fallback 8)\n  --low-memory    Regenerate team moves on the fly instead of precomputing CSR\n  --rounds        Track rounds-to-capture (slower, enables best-start selection)\n  --export PREFIX Write PREFIX_dp.txt and, on a win, PREFIX_path.txt (implies --rounds)\n  --quiet         Suppress progress output\n  --verify/--test Solve the bundled graphs with known cop numbers and check them\n"
    );
    std::process::exit(code)
}
