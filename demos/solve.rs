//! Solve one deal given on the command line.
//!
//!   cargo run --release --example solve -- "Ac Ad Ah As Kc Kd Kh 2c 3d 4h 5s 6c 7d 8h 9s 10c Jd"
//!   cargo run --release --example solve -- "W Ac ..." --config solver.yaml
//!   RUST_LOG=debug cargo run --example solve -- "..." --table data/win_probability.csv
//!
//! Wild slots are written W (or *, or the joker glyph).

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use pyramid_arrange::{Deal, Position, Solver, SolverConfig};

fn usage() -> ExitCode {
    eprintln!("usage: solve \"CARDS\" [--config FILE] [--table FILE]");
    ExitCode::from(2)
}

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(cards) = args.next() else { return usage() };
    let mut config_path: Option<PathBuf> = None;
    let mut table_path: Option<PathBuf> = None;
    while let Some(flag) = args.next() {
        match (flag.as_str(), args.next()) {
            ("--config", Some(v)) => config_path = Some(v.into()),
            ("--table", Some(v)) => table_path = Some(v.into()),
            _ => return usage(),
        }
    }

    let mut config = match config_path {
        Some(p) => match SolverConfig::load(&p) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("config: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => SolverConfig::default(),
    };
    if table_path.is_some() {
        config.table_path = table_path;
    }

    let model = match config.load_model() {
        Ok(m) => m,
        Err(e) => {
            eprintln!("table: {e}");
            return ExitCode::FAILURE;
        }
    };
    let Deal(deal) = match cards.parse::<Deal>() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let solver = match Solver::new(Arc::new(model), config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("config: {e}");
            return ExitCode::FAILURE;
        }
    };
    let solution = match solver.solve(&deal) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let stats = &solution.outcome.statistics;
    let Some(arr) = &solution.outcome.arrangement else {
        eprintln!("no legal arrangement ({} nodes explored)", stats.explored_nodes);
        return ExitCode::FAILURE;
    };

    for p in Position::ALL {
        let h = arr.hand(p);
        println!("{:<7} {:<40} {:?} {}  {:.4}", p.name(), h.to_string(), h.category, h.rank, arr.breakdown[p.idx()]);
    }
    if !arr.leftover.is_empty() {
        let left: Vec<String> = arr.leftover.iter().map(|c| c.to_string()).collect();
        println!("unused  {}", left.join(" "));
    }
    if !solution.substitutions.is_empty() {
        let subs: Vec<String> = solution.substitutions.iter().map(|c| format!("#{}={c}", c.id)).collect();
        println!("wilds   {}", subs.join(" "));
    }
    println!("score   {:.4}", arr.score);
    println!(
        "search  {} candidate(s), {} explored, {} pruned, {} rejected, {:.2} ms{}",
        solution.candidates_evaluated,
        stats.explored_nodes,
        stats.pruned_nodes,
        stats.rejected,
        stats.search_time_ms,
        if stats.terminated_early { " (early exit)" } else { "" }
    );
    ExitCode::SUCCESS
}
