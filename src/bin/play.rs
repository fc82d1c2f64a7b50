use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use match3_engine::config::EngineConfig;
use match3_engine::controller::{Event, Match3};
use match3_engine::engine::{Board, TileCatalog};
use match3_engine::level::{level_files, Level, Progress};
use match3_engine::snapshot::BoardSnapshot;
use match3_engine::solver::best_move;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play match-3 in the terminal", long_about = None)]
struct Args {
    /// Level file (JSON). Without one a random board is generated.
    #[clap(short, long, conflicts_with = "levels")]
    level: Option<PathBuf>,

    /// Directory of level files (JSON), played in file name order
    #[clap(long)]
    levels: Option<PathBuf>,

    /// Progress file for --levels; defaults to the save file with a `.progress.json` extension
    #[clap(long, requires = "levels")]
    progress: Option<PathBuf>,

    /// Width of a generated board
    #[clap(long, default_value_t = 8)]
    width: usize,

    /// Height of a generated board
    #[clap(long, default_value_t = 8)]
    height: usize,

    /// Seed for a generated board
    #[clap(short, long, default_value_t = 514514)]
    seed: u64,

    /// Engine configuration (TOML)
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Save file; resumed from when present and rewritten after every move
    #[clap(long)]
    save: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => EngineConfig::load_or_default(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let mut game = Match3::new(TileCatalog::standard(), config);
    let mut campaign = match &args.levels {
        Some(dir) => Some(Campaign::open(dir, &args)?),
        None => None,
    };
    if !resume(&mut game, args.save.as_deref())? {
        load_new(&mut game, &args, campaign.as_ref())?;
    }

    println!("Welcome to Match-3!");
    let mut complete = report(&mut game, args.save.as_deref())?;
    loop {
        if complete {
            let Some(campaign) = campaign.as_mut() else {
                break;
            };
            campaign.advance()?;
            load_new(&mut game, &args, Some(&*campaign))?;
            complete = report(&mut game, args.save.as_deref())?;
            continue;
        }

        println!("---------------------");
        if let Some(campaign) = &campaign {
            println!("Level {} of {}", campaign.progress.current_level_index + 1, campaign.levels.len());
        }
        println!("Tiles left: {}", game.active_count());
        println!("{}", game.board().to_string_with_highlight(game.catalog(), None));

        print!("Enter a swap (x1 y1 x2 y2), 'h' for a hint, 'q' to quit: ");
        io::stdout().flush().context("failed to flush stdout")?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input).context("failed to read input")? == 0 {
            break;
        }

        match input.trim() {
            "q" => {
                println!("Thanks for playing!");
                break;
            }
            "h" => hint(game.board()),
            command => {
                let coords: Vec<i32> = command
                    .split_whitespace()
                    .map(str::parse::<i32>)
                    .collect::<Result<_, _>>()
                    .unwrap_or_default();
                let &[x1, y1, x2, y2] = coords.as_slice() else {
                    println!("Invalid input format. Use 'x1 y1 x2 y2', 'h', or 'q'.");
                    continue;
                };
                if !game.try_swap(x1, y1, x2, y2) {
                    println!("Cannot swap ({}, {}) with ({}, {}).", x1, y1, x2, y2);
                    continue;
                }
                complete = report(&mut game, args.save.as_deref())?;
            }
        }
    }
    Ok(())
}

// An ordered list of level files and how far the player has got through them.
struct Campaign {
    levels: Vec<PathBuf>,
    progress: Progress,
    progress_path: Option<PathBuf>,
}

impl Campaign {
    fn open(dir: &Path, args: &Args) -> Result<Self> {
        let levels = level_files(dir)?;
        if levels.is_empty() {
            bail!("no level files found in {}", dir.display());
        }

        let progress_path = args
            .progress
            .clone()
            .or_else(|| args.save.as_ref().map(|s| s.with_extension("progress.json")));
        let mut progress = match &progress_path {
            Some(path) => Progress::load_or_default(path)
                .with_context(|| format!("failed to load progress {}", path.display()))?,
            None => Progress::default(),
        };
        if progress.current_level_index >= levels.len() {
            warn!(index = progress.current_level_index, "saved progress is past the last level, restarting");
            progress = Progress::default();
        }

        Ok(Campaign {
            levels,
            progress,
            progress_path,
        })
    }

    fn current(&self) -> &Path {
        &self.levels[self.progress.current_level_index]
    }

    fn advance(&mut self) -> Result<()> {
        self.progress.advance(self.levels.len());
        info!(index = self.progress.current_level_index, "moving to the next level");
        if let Some(path) = &self.progress_path {
            self.progress
                .save(path)
                .with_context(|| format!("failed to save progress {}", path.display()))?;
        }
        Ok(())
    }
}

// Returns true when the save file existed and held a usable board.
fn resume(game: &mut Match3, save: Option<&Path>) -> Result<bool> {
    let Some(path) = save.filter(|p| p.exists()) else {
        return Ok(false);
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read save file {}", path.display()))?;

    match BoardSnapshot::from_json(&json).and_then(|s| game.load_from_snapshot(&s)) {
        Ok(()) => {
            info!(path = %path.display(), "resumed saved board");
            Ok(true)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unusable save file");
            Ok(false)
        }
    }
}

fn load_new(game: &mut Match3, args: &Args, campaign: Option<&Campaign>) -> Result<()> {
    let level_path = campaign.map(Campaign::current).or(args.level.as_deref());
    match level_path {
        Some(path) => {
            let level = Level::load(path)
                .with_context(|| format!("failed to load level {}", path.display()))?;
            level
                .validate(game.catalog())
                .with_context(|| format!("invalid level {}", path.display()))?;
            game.load_fresh(&level);
        }
        None => {
            let board = Board::random_with_seed(args.width, args.height, game.catalog(), args.seed);
            game.load_with(args.width, args.height, |x, y| board.kind_at(x, y));
        }
    }
    Ok(())
}

fn hint(board: &Board) {
    match best_move(board) {
        Some(m) => println!(
            "Try swapping ({}, {}) with ({}, {}) to clear {} tiles.",
            m.start.0,
            m.start.1,
            m.end.0,
            m.end.1,
            m.cleared_count()
        ),
        None => println!("No swap makes a match."),
    }
}

// Prints the queued events, saving after each cascade. Returns true on level completion.
fn report(game: &mut Match3, save: Option<&Path>) -> Result<bool> {
    let mut complete = false;
    for event in game.drain_events() {
        match event {
            Event::CascadeFinished { cleared } => {
                if cleared > 0 {
                    println!("Cleared {} tiles.", cleared);
                }
                if let Some(path) = save {
                    let json = game.snapshot().to_json()?;
                    std::fs::write(path, json)
                        .with_context(|| format!("failed to write save file {}", path.display()))?;
                }
            }
            Event::LevelComplete => complete = true,
            _ => {}
        }
    }

    if complete {
        println!("---------------------");
        println!("🎉 LEVEL COMPLETE! 🎉");
        println!("---------------------");
        if let Some(path) = save {
            std::fs::remove_file(path)
                .with_context(|| format!("failed to remove save file {}", path.display()))?;
        }
    }
    Ok(complete)
}
