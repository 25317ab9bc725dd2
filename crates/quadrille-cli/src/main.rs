//! Command-line batch solver.
//!
//! Reads puzzles from a file (one per line, `~` also accepted as a
//! separator) or from an inline argument, solves them sequentially, in
//! parallel, or under a wall-clock budget, validates every solution against
//! its puzzle, and prints timing.
//!
//! ```sh
//! quadrille --puzzle "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79"
//! quadrille puzzles.txt --parallel --show-solutions
//! quadrille puzzles.txt --timeout 5000
//! ```

use std::{
    fs,
    path::PathBuf,
    process::ExitCode,
    time::{Duration, Instant},
};

use clap::Parser;
use quadrille_core::{Board, PuzzleGrid};
use quadrille_solver::{
    BatchOutcome, solve_all, solve_all_parallel, solve_all_within, validate_solutions,
};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// File of puzzles, one per line, `.` or `0` for unknown cells.
    #[arg(value_name = "FILE", required_unless_present = "puzzle")]
    file: Option<PathBuf>,

    /// Solve a single puzzle given inline instead of reading a file.
    #[arg(short, long, value_name = "PUZZLE", conflicts_with = "file")]
    puzzle: Option<String>,

    /// Solve the batch across all CPU cores.
    #[arg(long)]
    parallel: bool,

    /// Wall-clock budget for the whole batch, in milliseconds. Implies
    /// parallel solving; unfinished entries are reported as timed out.
    #[arg(long, value_name = "MILLIS", conflicts_with = "parallel")]
    timeout: Option<u64>,

    /// Print every solution grid, not just the summary.
    #[arg(long)]
    show_solutions: bool,
}

fn main() -> ExitCode {
    better_panic::install();
    env_logger::init();

    let args = Args::parse();
    let text = match read_input(&args) {
        Ok(text) => text,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let puzzles = match PuzzleGrid::parse_batch(&text) {
        Ok(puzzles) if puzzles.is_empty() => {
            eprintln!("no puzzles found in input");
            return ExitCode::FAILURE;
        }
        Ok(puzzles) => puzzles,
        Err(err) => {
            eprintln!("not a valid puzzle: {err}");
            return ExitCode::FAILURE;
        }
    };

    log::info!("solving {} puzzles", puzzles.len());
    let start = Instant::now();
    let outcomes: Vec<BatchOutcome> = if let Some(millis) = args.timeout {
        solve_all_within(puzzles.clone(), Duration::from_millis(millis))
    } else if args.parallel {
        solve_all_parallel(&puzzles)
            .into_iter()
            .map(Into::into)
            .collect()
    } else {
        solve_all(&puzzles).into_iter().map(Into::into).collect()
    };
    let elapsed = start.elapsed();

    let mut solved_pairs: Vec<(PuzzleGrid, Board)> = Vec::new();
    let mut failures = 0;
    for (index, (puzzle, outcome)) in puzzles.iter().zip(outcomes).enumerate() {
        match outcome {
            BatchOutcome::Solved(board) => {
                if args.show_solutions {
                    println!("puzzle {index}:\n{}", board.to_grid().to_pretty_string());
                }
                solved_pairs.push((puzzle.clone(), board));
            }
            BatchOutcome::NoSolution => {
                failures += 1;
                println!("puzzle {index}: no solution found");
            }
            BatchOutcome::TimedOut => {
                failures += 1;
                println!("puzzle {index}: timed out");
            }
        }
    }

    let (solved_puzzles, boards): (Vec<_>, Vec<_>) = solved_pairs.into_iter().unzip();
    if let Err(err) = validate_solutions(&solved_puzzles, &boards) {
        eprintln!("solution validation failed: {err}");
        return ExitCode::FAILURE;
    }

    let total_ms = elapsed.as_secs_f64() * 1000.0;
    #[expect(clippy::cast_precision_loss)]
    let per_puzzle = total_ms / puzzles.len() as f64;
    println!(
        "Done. Solving {} puzzles took {total_ms:.1} ms ({per_puzzle:.2} ms per puzzle), {failures} failed.",
        puzzles.len()
    );

    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn read_input(args: &Args) -> Result<String, String> {
    if let Some(puzzle) = &args.puzzle {
        return Ok(puzzle.clone());
    }
    let Some(path) = &args.file else {
        return Err("either a puzzle file or --puzzle is required".to_owned());
    };
    fs::read_to_string(path).map_err(|err| format!("cannot read {}: {err}", path.display()))
}
