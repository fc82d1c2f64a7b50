use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use match3_engine::engine::{Board, TileCatalog};
use match3_engine::solver::{best_move, find_moves};
use match3_engine::utils::board_from_rows;

#[derive(Parser, Debug)]
#[clap(author, version, about = "List the swaps that make a match", long_about = None)]
struct Args {
    /// Only print the best move
    #[clap(short, long)]
    best: bool,

    /// Path to the board file (one row per line, top row first, '.' for empty)
    board_file: PathBuf,
}

fn read_board_file(path: &Path, catalog: &TileCatalog) -> Result<Board> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read board file {}", path.display()))?;

    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if lines.is_empty() {
        bail!("board file {} contains no rows", path.display());
    }

    board_from_rows(&lines, catalog)
        .with_context(|| format!("invalid board in {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let catalog = TileCatalog::standard();

    let board = read_board_file(&args.board_file, &catalog)?;
    println!("Loaded board from {}\n", args.board_file.display());
    println!("{}\n", board.to_string_with_highlight(&catalog, None));

    if !args.best {
        let moves = find_moves(&board);
        println!("Productive swaps ({}):", moves.len());
        for (i, m) in moves.iter().enumerate() {
            let kinds: Vec<char> = m.runs.iter().map(|r| catalog.symbol(r.kind())).collect();
            println!(
                "  Move {}: ({}, {}) <-> ({}, {}) clears {} tiles in {} run(s) {:?}",
                i + 1,
                m.start.0,
                m.start.1,
                m.end.0,
                m.end.1,
                m.cleared_count(),
                m.runs.len(),
                kinds
            );
        }
        println!();
    }

    match best_move(&board) {
        Some(m) => {
            println!(
                "Best move: ({}, {}) <-> ({}, {}) clears {} tiles",
                m.start.0,
                m.start.1,
                m.end.0,
                m.end.1,
                m.cleared_count()
            );
            println!(
                "{}",
                board.to_string_with_highlight(&catalog, Some(m.start))
            );
        }
        None => println!("No swap makes a match."),
    }
    Ok(())
}
