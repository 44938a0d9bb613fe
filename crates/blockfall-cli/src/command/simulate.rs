use std::{path::PathBuf, time::Duration};

use blockfall_engine::{Game, GameConfig, GameOver, GameStats, PieceSeed};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Piece seed as 32 hex digits (random if omitted)
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Seed for the random input feed (random if omitted)
    #[arg(long)]
    input_seed: Option<u64>,
    /// Game config JSON file (defaults if omitted)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Maximum number of frames to run
    #[arg(long, default_value_t = 20_000)]
    frames: u64,
    /// Milliseconds elapsed per frame
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Probability of an input event on each frame
    #[arg(long, default_value_t = 0.2)]
    input_rate: f64,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Default for SimulateArg {
    fn default() -> Self {
        Self {
            seed: None,
            input_seed: None,
            config: None,
            frames: 20_000,
            frame_ms: 16,
            input_rate: 0.2,
            output: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    seed: PieceSeed,
    input_seed: u64,
    config: GameConfig,
    frames: u64,
    elapsed_ms: u64,
    stats: GameStats,
    game_over: Option<GameOver>,
    /// Final field, top row first. `#` is a locked block, a letter the falling piece.
    board: Vec<String>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        seed,
        input_seed,
        config,
        frames,
        frame_ms,
        input_rate,
        output,
    } = arg;

    anyhow::ensure!(
        (0.0..=1.0).contains(input_rate),
        "input rate must be within 0..=1, got {input_rate}"
    );
    let config = match config {
        Some(path) => util::read_config_file(path)?,
        None => GameConfig::default(),
    };
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let input_seed = input_seed.unwrap_or_else(|| rand::rng().random());
    log::info!("simulating with piece seed {seed}, input seed {input_seed}");

    let mut game = Game::new(config.clone(), seed)?;
    let mut rng = Pcg32::seed_from_u64(input_seed);
    let delta = Duration::from_millis(*frame_ms);

    let mut frames_run = 0;
    let mut game_over = None;
    while frames_run < *frames {
        frames_run += 1;
        if rng.random_bool(*input_rate) {
            game.handle_input(rng.random());
        }
        if let Some(over) = game.update(delta) {
            game_over = Some(over);
            break;
        }
    }
    log::info!(
        "finished after {frames_run} frames: score {}, level {}, {} lines",
        game.score(),
        game.level(),
        game.stats().total_cleared_lines()
    );

    let report = SimulationReport {
        seed,
        input_seed,
        config,
        frames: frames_run,
        elapsed_ms: u64::try_from(game.elapsed().as_millis()).unwrap_or(u64::MAX),
        stats: game.stats().clone(),
        game_over,
        board: render_board(&game),
    };
    Output::save_json(&report, output.as_deref())
}

fn render_board(game: &Game) -> Vec<String> {
    let playfield = game.playfield();
    let piece = game.active_piece().kind().as_char();
    let active: Vec<_> = game.active_cells().collect();
    (0..playfield.height())
        .map(|y| {
            (0..playfield.width())
                .map(|x| {
                    if active.iter().any(|c| c.x == x && c.y == y) {
                        piece
                    } else if game.is_block_solid(x, y) {
                        '#'
                    } else {
                        '.'
                    }
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_board_shows_falling_piece() {
        let seed: PieceSeed = "00112233445566778899aabbccddeeff".parse().unwrap();
        let mut game = Game::new(GameConfig::default(), seed).unwrap();
        game.update(Duration::from_millis(1));

        let board = render_board(&game);
        assert_eq!(board.len(), 20);
        assert!(board.iter().all(|row| row.len() == 10));

        let piece = game.active_piece().kind().as_char();
        let count: usize = board
            .iter()
            .map(|row| row.chars().filter(|&c| c == piece).count())
            .sum();
        assert_eq!(count, 4);
        assert!(!board.iter().any(|row| row.contains('#')));
    }
}
