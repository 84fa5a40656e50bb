//! Interstellar Escort headless runner
//!
//! Plays one session on autopilot and records the result:
//! `interstellar-escort [settings.json] [highscores.json] [--max-ticks N]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use interstellar_escort::sim::{GameEvent, GameState, TickInput};
    use interstellar_escort::{HighScores, Settings};

    #[derive(Parser)]
    #[command(name = "interstellar-escort")]
    #[command(about = "Run an autopilot Interstellar Escort session and record the score")]
    pub struct Args {
        /// Settings JSON file (defaults when omitted)
        pub settings: Option<PathBuf>,
        /// High score file, created if missing
        #[arg(default_value = "highscores.json")]
        pub high_scores: PathBuf,
        /// Stop a session that nobody manages to lose (default: ten minutes at 60 Hz)
        #[arg(long, default_value_t = 36_000)]
        pub max_ticks: u64,
    }

    pub fn run(args: Args) -> Result<()> {
        let settings = match &args.settings {
            Some(path) => Settings::load(path)
                .with_context(|| format!("failed loading settings {}", path.display()))?,
            None => Settings::default(),
        };

        let mut state = GameState::new(settings).context("invalid settings")?;
        state.start();

        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        while !state.is_game_over() && state.current_tick() < args.max_ticks {
            for event in state.tick(&input) {
                log_event(&event);
            }
        }

        let score = state.current_score();
        let ticks = state.current_tick();
        let seconds = ticks as f64 / state.settings().tick_rate_hz as f64;
        if state.is_game_over() {
            println!("Mothership lost after {seconds:.1}s. Score: {score}");
        } else {
            println!("Mothership survived {seconds:.1}s. Score: {score}");
        }

        let scores_path = &args.high_scores;
        let mut board = HighScores::load(scores_path)
            .with_context(|| format!("failed reading high scores {}", scores_path.display()))?;
        if let Some(rank) = board.add_score(score, ticks) {
            board
                .save(scores_path)
                .with_context(|| format!("failed writing high scores {}", scores_path.display()))?;
            println!("New high score, rank #{rank}");
        }

        println!("\nHIGH SCORES");
        for (i, entry) in board.entries.iter().enumerate() {
            println!("{:>2}. {:>6}", i + 1, entry.score);
        }
        Ok(())
    }

    fn log_event(event: &GameEvent) {
        match event {
            GameEvent::Explosion {
                asteroid_id,
                method,
                score_delta,
                ..
            } => log::debug!("Asteroid {asteroid_id} gone ({method:?}, +{score_delta})"),
            GameEvent::HealthRestored { amount } => log::info!("Mothership repaired by {amount}"),
            GameEvent::EffectActivated { kind } => log::info!("{} active", kind.as_str()),
            GameEvent::EffectExpired { kind } => log::info!("{} over", kind.as_str()),
            GameEvent::GameOver { final_score, ticks } => {
                log::info!("Game over at tick {ticks}, score {final_score}")
            }
            GameEvent::ShotFired { .. }
            | GameEvent::AsteroidSpawned { .. }
            | GameEvent::PowerUpSpawned { .. } => {}
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    log::info!("Interstellar Escort (headless) starting...");

    native::run(native::Args::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is a library on wasm; embedders drive it directly
}
