//! Session bookkeeping across successive games
//!
//! Scores live only for the lifetime of the session; nothing is persisted.

use tracing::info;

use crate::config::EngineConfig;
use crate::game_state::GameState;

#[derive(Debug, Clone)]
pub struct Session {
    config: EngineConfig,
    game: Option<GameState>,
    games_played: u32,
    last_score: Option<u32>,
    best_score: u32,
}

impl Session {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            game: None,
            games_played: 0,
            last_score: None,
            best_score: 0,
        }
    }

    /// Begin a new game, abandoning any game in progress without recording it
    ///
    /// With a fixed seed, game `n` of the session uses `seed + n` so games
    /// differ but replay identically.
    pub fn start_game(&mut self) -> &mut GameState {
        let config = EngineConfig {
            seed: self.config.seed.map(|s| s.wrapping_add(self.games_played)),
            ..self.config.clone()
        };
        self.game.insert(GameState::with_config(config))
    }

    /// Record the active game's score and drop it
    ///
    /// Returns the recorded score, or `None` when no game is active.
    pub fn finish_game(&mut self) -> Option<u32> {
        let game = self.game.take()?;
        let score = game.score();
        self.games_played += 1;
        self.last_score = Some(score);
        self.best_score = self.best_score.max(score);
        info!(
            score,
            best = self.best_score,
            games = self.games_played,
            "game recorded"
        );
        Some(score)
    }

    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    pub fn game_mut(&mut self) -> Option<&mut GameState> {
        self.game.as_mut()
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    /// Final score of the most recently recorded game
    pub fn last_score(&self) -> Option<u32> {
        self.last_score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }
}
