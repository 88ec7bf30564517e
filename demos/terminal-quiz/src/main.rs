//! Terminal front end for the multiplication quiz.
//!
//! ```text
//! terminal-quiz                      # menu, stats saved in the current directory
//! terminal-quiz --difficulty hard    # straight into a game
//! terminal-quiz --seed 7 --no-save   # repeatable questions, nothing written
//! RUST_LOG=debug terminal-quiz 2>quiz.log
//! ```

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use timestable::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "terminal-quiz", version, about = "Timed multiplication quiz for the terminal")]
struct Args {
    /// Skip the menu and start at this difficulty (easy, medium, hard).
    #[arg(long, short)]
    difficulty: Option<DifficultyId>,

    /// Seed for the question generator. Same seed, same questions.
    #[arg(long)]
    seed: Option<u64>,

    /// Directory holding the best-score file.
    #[arg(long, value_name = "DIR", default_value = ".")]
    stats_dir: PathBuf,

    /// Keep stats in memory only.
    #[arg(long)]
    no_save: bool,

    /// Pause after a correct answer, in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 1500)]
    advance_delay_ms: u64,

    /// Do not ring the terminal bell on answers.
    #[arg(long)]
    no_bell: bool,
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn build_engine(args: &Args) -> RoundEngine<IntervalClock> {
    let config = EngineConfig {
        advance_delay: Duration::from_millis(args.advance_delay_ms),
        ..EngineConfig::default()
    };
    let progress_target = config.progress_target;

    let mut engine = match args.seed {
        Some(seed) => RoundEngine::with_seed(config, IntervalClock::default(), seed),
        None => RoundEngine::new(config, IntervalClock::default()),
    };
    engine.subscribe(Box::new(TerminalPresenter::new(io::stdout(), progress_target)));
    engine.subscribe(Box::new(MotivationBanner::new(io::stdout())));
    if !args.no_bell {
        engine.subscribe(Box::new(BellCue::new(io::stdout())));
    }
    engine
}

async fn play<S: StatsStore>(
    engine: RoundEngine<IntervalClock>,
    store: S,
    difficulty: Option<DifficultyId>,
) -> Result<(), TimestableError> {
    let mut session = QuizSession::new(engine, store, io::stdout());
    if let Some(difficulty) = difficulty {
        session.start(difficulty);
    }
    session.run(tokio::io::BufReader::new(tokio::io::stdin())).await?;

    let stats = session.stats();
    info!(best_score = stats.best_score, games_played = stats.games_played, "session over");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing();

    let engine = build_engine(&args);
    if args.no_save {
        play(engine, MemoryStore::new(), args.difficulty).await?;
    } else {
        let store = JsonFileStore::new(&args.stats_dir);
        info!(path = %store.path().display(), "stats file");
        play(engine, store, args.difficulty).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["terminal-quiz"]);
        assert_eq!(args.difficulty, None);
        assert_eq!(args.advance_delay_ms, 1500);
        assert_eq!(args.stats_dir, PathBuf::from("."));
        assert!(!args.no_save);
        assert!(!args.no_bell);
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "terminal-quiz",
            "--difficulty",
            "HARD",
            "--seed",
            "9",
            "--no-save",
            "--no-bell",
            "--advance-delay-ms",
            "200",
        ]);
        assert_eq!(args.difficulty, Some(DifficultyId::Hard));
        assert_eq!(args.seed, Some(9));
        assert!(args.no_save);
        assert!(args.no_bell);
        assert_eq!(args.advance_delay_ms, 200);
    }

    #[test]
    fn test_unknown_difficulty_rejected() {
        assert!(Args::try_parse_from(["terminal-quiz", "-d", "impossible"]).is_err());
    }

    #[test]
    fn test_engine_subscribes_without_starting() {
        let args = Args::parse_from(["terminal-quiz", "--seed", "1", "--no-bell"]);
        let engine = build_engine(&args);
        assert!(engine.state().is_none());
        assert_eq!(engine.config().advance_delay, Duration::from_millis(1500));
    }
}
