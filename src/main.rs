//! Headless autoplay runner (default binary).
//!
//! Plays one level, or the whole progression, by always taking the first
//! hinted pair. The session clock is simulated in fixed frames, so a run is
//! fully determined by its seed and level list.

mod cli;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use onet::core::{GameEvent, GameState, LevelDatabase, RandomSource, SimpleRng};
use onet::types::LevelConfig;

use cli::Cli;

/// Simulated frame length (about 60 FPS)
const FRAME_MS: u32 = 16;

/// Outcome of playing one level
#[derive(Debug, Default)]
struct LevelReport {
    matches: u32,
    reshuffles: u32,
    regenerations: u32,
    elapsed_ms: u64,
    cleared: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let levels = match &cli.levels {
        Some(path) => LevelDatabase::from_path(path)
            .with_context(|| format!("failed to load levels from {}", path.display()))?,
        None => LevelDatabase::default(),
    };

    let range = if cli.all {
        0..levels.max_level()
    } else {
        cli.level..cli.level + 1
    };

    let mut rng = SimpleRng::new(cli.seed);
    let mut cleared = 0;
    let mut played = 0;
    for level in range {
        let config = *levels.get(level);
        let report = play_level(level, config, &mut rng, &cli)
            .with_context(|| format!("level {level} failed"))?;

        played += 1;
        if report.cleared {
            cleared += 1;
        }
        if !cli.json {
            println!(
                "level {level}: {} after {} matches, {} reshuffles, {} regenerations, {}ms simulated",
                if report.cleared { "cleared" } else { "stopped" },
                report.matches,
                report.reshuffles,
                report.regenerations,
                report.elapsed_ms,
            );
        }
    }

    if !cli.json {
        println!("{cleared}/{played} levels cleared (seed {})", cli.seed);
    }
    Ok(())
}

fn play_level<R: RandomSource>(
    level: usize,
    config: LevelConfig,
    rng: R,
    cli: &Cli,
) -> Result<LevelReport> {
    let mut game = GameState::new(config, rng)
        .with_context(|| format!("could not generate a {}x{} board", config.width, config.height))?;
    info!(level, width = config.width, height = config.height, mode = config.shift_mode.as_str(), "level started");

    if !cli.json {
        println!(
            "level {level}: {}x{}, {} symbols, shift {}",
            config.width,
            config.height,
            config.symbol_count,
            config.shift_mode.as_str()
        );
        print!("{}", game.grid());
    }

    let mut report = LevelReport::default();
    while !game.is_board_cleared() && report.matches < cli.max_moves {
        let hint = match game.hint() {
            Some(hint) => hint,
            None => {
                ensure!(game.shuffle(), "board has no match and could not be shuffled");
                report.elapsed_ms += settle(&mut game);
                tally(&mut game, &mut report);
                continue;
            }
        };

        let result = game.request_match(hint.a, hint.b);
        ensure!(
            result.accepted,
            "hinted pair {} - {} was refused",
            hint.a,
            hint.b
        );
        debug!(a = %hint.a, b = %hint.b, turns = hint.path.turns(), "autoplay match");
        report.matches += 1;
        report.elapsed_ms += settle(&mut game);
        tally(&mut game, &mut report);

        if cli.json {
            println!("{}", serde_json::to_string(&game.snapshot())?);
        }
    }

    report.cleared = game.is_board_cleared();
    report.reshuffles = game.reshuffles();
    if !cli.json && !report.cleared {
        print!("{}", game.grid());
    }
    info!(level, matches = report.matches, cleared = report.cleared, "level finished");
    Ok(report)
}

/// Run frames until the session takes input again (or the board is empty).
fn settle<R: RandomSource>(game: &mut GameState<R>) -> u64 {
    let mut elapsed = 0;
    while !game.can_select() && !game.is_board_cleared() {
        game.tick(FRAME_MS);
        elapsed += FRAME_MS as u64;
    }
    elapsed
}

fn tally<R: RandomSource>(game: &mut GameState<R>, report: &mut LevelReport) {
    for event in game.drain_events() {
        if event == GameEvent::Regenerated {
            report.regenerations += 1;
        }
    }
}
