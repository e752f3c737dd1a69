//! Game state module - the spawn → fall → lock → clear → loss state machine
//!
//! A [`GameState`] exclusively owns the board, the falling piece, and the
//! pre-generated next piece. It is advanced by two calls:
//!
//! - [`GameState::handle_command`] applies one player command immediately.
//! - [`GameState::tick`] advances the fall timer and resolves any pending lock.
//!
//! [`GameState::step`] bundles one frame: queued commands in submission
//! order, then the tick. Locking and Clearing are resolved inside the tick
//! that reaches them, so they are only observable between a `HardDrop`
//! command and the next tick.

use std::sync::Arc;

use arrayvec::ArrayVec;
use tracing::{debug, error, info, warn};

use crate::board::Board;
use crate::catalog::{PieceCells, ShapeCatalog};
use crate::config::EngineConfig;
use crate::piece::Piece;
use crate::rng::SimpleRng;
use crate::scoring::{apply_clear, fall_interval_ms, ScoringRules};
use crate::snapshot::GameSnapshot;
use crate::types::{Command, GameEvent, Phase, ShapeId, LOSS_ROW};
use crate::validator::{is_valid, SpawnColumns};

/// Events produced by one tick
pub type TickEvents = ArrayVec<GameEvent, 4>;

/// Start a game with the default configuration and a clock-derived seed
pub fn new_game() -> GameState {
    GameState::with_config(EngineConfig::default())
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    catalog: Arc<ShapeCatalog>,
    config: EngineConfig,
    rules: ScoringRules,
    rng: SimpleRng,
    seed: u32,
    board: Board,
    current: Option<Piece>,
    next: Option<Piece>,
    phase: Phase,
    score: u32,
    fall_interval: f64,
    fall_timer_ms: u32,
    /// Set when the last locked piece still had cells above the top row
    overflowed: bool,
    pieces_locked: u32,
    rows_cleared: u32,
}

impl GameState {
    /// Create a new game with the given RNG seed and default rules
    pub fn new(seed: u32) -> Self {
        Self::with_config(EngineConfig::seeded(seed))
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_catalog(config, ShapeCatalog::standard())
    }

    /// Create a new game with an explicit catalog
    ///
    /// An invalid configuration is replaced by the defaults (keeping its seed).
    pub fn with_catalog(config: EngineConfig, catalog: Arc<ShapeCatalog>) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                warn!(error = %err, "invalid engine config, falling back to defaults");
                EngineConfig {
                    seed: config.seed,
                    ..EngineConfig::default()
                }
            }
        };
        let seed = config.seed.unwrap_or_else(SimpleRng::time_seed);

        Self {
            catalog,
            rules: config.scoring_rules(),
            fall_interval: config.initial_fall_interval,
            config,
            rng: SimpleRng::new(seed),
            seed,
            board: Board::new(),
            current: None,
            next: None,
            phase: Phase::Spawning,
            score: 0,
            fall_timer_ms: 0,
            overflowed: false,
            pieces_locked: 0,
            rows_cleared: 0,
        }
    }

    /// Replace the board, e.g. to start from a prepared position
    pub fn with_board(mut self, board: Board) -> Self {
        self.board = board;
        self
    }

    /// Leave the Spawning phase: generate the current and next pieces
    pub fn start(&mut self) {
        if self.phase != Phase::Spawning {
            return;
        }
        let current = Piece::spawn(self.catalog.random_shape(&mut self.rng));
        let next = Piece::spawn(self.catalog.random_shape(&mut self.rng));
        debug!(current = ?current.shape, next = ?next.shape, seed = self.seed, "game started");

        self.current = Some(current);
        self.next = Some(next);
        self.fall_timer_ms = 0;
        self.phase = Phase::Falling;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Seconds between automatic descents
    pub fn fall_interval(&self) -> f64 {
        self.fall_interval
    }

    /// Milliseconds accumulated toward the next automatic descent
    pub fn fall_timer_ms(&self) -> u32 {
        self.fall_timer_ms
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    /// Total rows cleared this game
    pub fn rows_cleared(&self) -> u32 {
        self.rows_cleared
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ShapeCatalog {
        &self.catalog
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access for preparing positions before play
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn current(&self) -> Option<Piece> {
        self.current
    }

    pub fn next(&self) -> Option<Piece> {
        self.next
    }

    /// Absolute cells of the falling piece
    pub fn current_cells(&self) -> Option<PieceCells> {
        self.current.map(|p| p.cells(&self.catalog))
    }

    /// Absolute cells of the next piece at its spawn anchor
    pub fn next_cells(&self) -> Option<PieceCells> {
        self.next.map(|p| p.cells(&self.catalog))
    }

    /// Replace the falling piece with a fresh spawn of `shape`
    ///
    /// Starts the game first if it is still spawning. Returns false once the
    /// game is over or if the fresh piece would not be a valid placement.
    pub fn set_current_shape(&mut self, shape: ShapeId) -> bool {
        self.start();
        if self.phase != Phase::Falling {
            return false;
        }
        let piece = Piece::spawn(shape);
        if !self.is_valid(&piece) {
            return false;
        }
        self.current = Some(piece);
        true
    }

    /// Replace the preview piece with a fresh spawn of `shape`
    pub fn set_next_shape(&mut self, shape: ShapeId) -> bool {
        self.start();
        if self.is_terminal() {
            return false;
        }
        self.next = Some(Piece::spawn(shape));
        true
    }

    /// Check `piece` against the current board and column policy
    pub fn is_valid(&self, piece: &Piece) -> bool {
        is_valid(piece, &self.board, &self.catalog, self.spawn_columns())
    }

    fn spawn_columns(&self) -> SpawnColumns {
        self.config.spawn_columns
    }

    /// Commit `piece` shifted by (dx, dy) if that is a valid placement
    fn try_move(&mut self, piece: Piece, dx: i8, dy: i8) -> bool {
        match piece.moved(dx, dy) {
            Some(candidate) => self.try_commit(candidate),
            None => false,
        }
    }

    /// Commit `candidate` as the falling piece if it is a valid placement
    fn try_commit(&mut self, candidate: Piece) -> bool {
        if self.is_valid(&candidate) {
            self.current = Some(candidate);
            true
        } else {
            false
        }
    }

    /// Apply a player command
    ///
    /// Only acts while Falling. Returns whether the piece changed; a rejected
    /// move leaves the state untouched.
    pub fn handle_command(&mut self, command: Command) -> bool {
        if self.phase != Phase::Falling {
            return false;
        }
        let Some(piece) = self.current else {
            return false;
        };

        match command {
            Command::MoveLeft => self.try_move(piece, -1, 0),
            Command::MoveRight => self.try_move(piece, 1, 0),
            Command::SoftDrop => self.try_move(piece, 0, 1),
            Command::Rotate => self.try_commit(piece.rotated(&self.catalog, 1)),
            Command::HardDrop => {
                let target = piece.hard_drop_target(&self.board, &self.catalog, self.spawn_columns());
                self.current = Some(target);
                self.phase = Phase::Locking;
                true
            }
        }
    }

    /// Advance the game by `elapsed_ms`
    ///
    /// Resolves a pending lock first, then runs the fall timer. When the timer
    /// reaches the fall interval the piece moves down one row, or locks if it
    /// cannot.
    pub fn tick(&mut self, elapsed_ms: u32) -> TickEvents {
        let mut events = TickEvents::new();

        match self.phase {
            Phase::GameOver => return events,
            Phase::Spawning => self.start(),
            _ => {}
        }

        self.settle(&mut events);
        if self.phase != Phase::Falling {
            return events;
        }

        self.fall_timer_ms = self.fall_timer_ms.saturating_add(elapsed_ms);
        if self.fall_timer_ms >= fall_interval_ms(self.fall_interval) {
            self.fall_timer_ms = 0;
            let moved = match self.current {
                Some(piece) => self.try_move(piece, 0, 1),
                None => false,
            };
            if !moved {
                self.phase = Phase::Locking;
                self.settle(&mut events);
            }
        }

        events
    }

    /// One frame: start if needed, apply `commands` in order, then tick
    pub fn step(&mut self, elapsed_ms: u32, commands: &[Command]) -> TickEvents {
        self.start();
        for &command in commands {
            self.handle_command(command);
        }
        self.tick(elapsed_ms)
    }

    /// Run Locking and Clearing until the game is Falling again or over
    fn settle(&mut self, events: &mut TickEvents) {
        loop {
            match self.phase {
                Phase::Locking => self.lock_current(),
                Phase::Clearing => self.clear_rows(events),
                _ => return,
            }
        }
    }

    /// Merge the falling piece into the board and promote the next piece
    fn lock_current(&mut self) {
        if let Some(piece) = self.current.take() {
            let cells = piece.cells(&self.catalog);
            match self.board.lock(&cells, piece.color) {
                Ok(report) => {
                    self.overflowed = report.above_top > 0;
                    self.pieces_locked += 1;
                    debug!(
                        shape = ?piece.shape,
                        x = piece.x,
                        y = piece.y,
                        above_top = report.above_top,
                        "piece locked"
                    );
                }
                Err(err) => {
                    error!(error = %err, shape = ?piece.shape, x = piece.x, y = piece.y, "lock failed");
                    panic!("board invariant violated while locking {:?}: {}", piece, err);
                }
            }
        }

        self.current = self.next.take();
        self.next = Some(Piece::spawn(self.catalog.random_shape(&mut self.rng)));
        self.fall_timer_ms = 0;
        self.phase = Phase::Clearing;
    }

    /// Clear full rows, score them, and decide between Falling and GameOver
    fn clear_rows(&mut self, events: &mut TickEvents) {
        let cleared = self.board.clear_full_rows();
        let result = apply_clear(&self.rules, self.score, self.fall_interval, cleared);
        self.score = result.score;
        self.fall_interval = result.fall_interval;

        if cleared > 0 {
            self.rows_cleared += cleared as u32;
            info!(rows = cleared, score = self.score, "rows cleared");
            events.push(GameEvent::RowsCleared { rows: cleared as u8 });
        }
        if result.sped_up {
            debug!(fall_interval = self.fall_interval, "fall interval reduced");
        }

        let topped_out = self.board.top_locked_row().is_some_and(|row| row < LOSS_ROW);
        if self.overflowed || topped_out {
            info!(final_score = self.score, "game over");
            self.phase = Phase::GameOver;
            events.push(GameEvent::GameOver {
                final_score: self.score,
            });
        } else {
            self.phase = Phase::Falling;
        }
    }

    /// Immutable view for renderers
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, BOARD_WIDTH};

    fn falling(seed: u32, shape: ShapeId) -> GameState {
        let mut state = GameState::new(seed);
        assert!(state.set_current_shape(shape));
        state
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(12345);

        assert_eq!(state.phase(), Phase::Spawning);
        assert!(!state.is_terminal());
        assert_eq!(state.score(), 0);
        assert_eq!(state.fall_interval(), 0.30);
        assert!(state.current().is_none());
        assert!(state.next().is_none());
        assert_eq!(state.board().locked_count(), 0);
    }

    #[test]
    fn test_first_tick_spawns_both_pieces() {
        let mut state = GameState::new(12345);
        let events = state.tick(0);

        assert!(events.is_empty());
        assert_eq!(state.phase(), Phase::Falling);
        let current = state.current().unwrap();
        assert_eq!((current.x, current.y, current.rotation), (5, 0, 0));
        assert!(state.next().is_some());
    }

    #[test]
    fn test_commands_ignored_while_spawning() {
        let mut state = GameState::new(12345);
        assert!(!state.handle_command(Command::MoveLeft));
        assert_eq!(state.phase(), Phase::Spawning);
    }

    #[test]
    fn test_same_seed_same_pieces() {
        let mut a = GameState::new(777);
        let mut b = GameState::new(777);
        for _ in 0..20 {
            a.step(0, &[Command::HardDrop]);
            b.step(0, &[Command::HardDrop]);
            assert_eq!(a.current().map(|p| p.shape), b.current().map(|p| p.shape));
            assert_eq!(a.next().map(|p| p.shape), b.next().map(|p| p.shape));
        }
    }

    #[test]
    fn test_fall_timer_moves_piece_at_interval() {
        let mut state = falling(1, ShapeId::T);

        state.tick(299);
        assert_eq!(state.current().unwrap().y, 0);
        assert_eq!(state.fall_timer_ms(), 299);

        state.tick(1);
        assert_eq!(state.current().unwrap().y, 1);
        assert_eq!(state.fall_timer_ms(), 0);
    }

    #[test]
    fn test_rejected_move_leaves_piece() {
        let mut state = falling(1, ShapeId::I);
        state.board_mut().set(4, 0, Some(Color::RED));
        for _ in 0..4 {
            assert!(state.handle_command(Command::SoftDrop));
        }
        let before = state.current().unwrap();
        // Column 4 is blocked at row 0, which the I now reaches.
        assert!(!state.handle_command(Command::MoveLeft));
        assert_eq!(state.current().unwrap(), before);
    }

    #[test]
    fn test_sideways_moves_above_top_are_bounded() {
        let mut state = falling(1, ShapeId::O);
        let mut applied = 0;
        for _ in 0..300 {
            if state.handle_command(Command::MoveLeft) {
                applied += 1;
            }
        }
        assert!(applied < 300);
        assert_eq!(state.phase(), Phase::Falling);
        let far_left = state.current().unwrap();
        assert!(!state.handle_command(Command::MoveLeft));
        assert_eq!(state.current().unwrap(), far_left);

        for _ in 0..300 {
            state.handle_command(Command::MoveRight);
        }
        assert!(state.current().unwrap().x >= BOARD_WIDTH as i8);

        // Off the board the piece can never descend into row 0, so it locks
        // above the top and the game ends.
        let events = state.tick(300);
        assert_eq!(events.as_slice(), &[GameEvent::GameOver { final_score: 0 }]);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_timer_lock_promotes_next_piece() {
        let mut state = falling(1, ShapeId::O);
        assert!(state.set_next_shape(ShapeId::L));
        while state.handle_command(Command::SoftDrop) {}
        assert_eq!(state.current().unwrap().y, 20);

        let events = state.tick(300);
        assert!(events.is_empty());
        assert_eq!(state.phase(), Phase::Falling);
        assert_eq!(state.board().locked_count(), 4);
        assert_eq!(state.pieces_locked(), 1);
        let current = state.current().unwrap();
        assert_eq!(current.shape, ShapeId::L);
        assert_eq!((current.x, current.y), (5, 0));
        assert!(state.next().is_some());
    }

    #[test]
    fn test_hard_drop_waits_in_locking_until_tick() {
        let mut state = falling(1, ShapeId::O);
        assert!(state.handle_command(Command::HardDrop));
        assert_eq!(state.phase(), Phase::Locking);
        assert!(!state.handle_command(Command::MoveLeft));

        state.tick(0);
        assert_eq!(state.phase(), Phase::Falling);
        assert_eq!(state.board().locked_count(), 4);
    }

    #[test]
    fn test_locking_above_top_is_game_over() {
        let mut state = falling(1, ShapeId::O);
        for y in 1..20 {
            state.board_mut().set(5, y, Some(Color::GRAY));
        }

        let events = state.step(0, &[Command::HardDrop]);
        assert_eq!(state.phase(), Phase::GameOver);
        assert!(state.is_terminal());
        assert_eq!(events.as_slice(), &[GameEvent::GameOver { final_score: 0 }]);

        // Terminal: nothing else happens.
        assert!(state.tick(1000).is_empty());
        assert!(!state.handle_command(Command::MoveLeft));
    }

    #[test]
    fn test_speedup_after_milestone() {
        let config = EngineConfig {
            points_per_row: 25,
            ..EngineConfig::seeded(3)
        };
        let mut state = GameState::with_config(config);
        for y in 16..20 {
            for x in 0..9 {
                state.board_mut().set(x, y, Some(Color::GRAY));
            }
        }
        assert!(state.set_current_shape(ShapeId::I));
        for _ in 0..4 {
            assert!(state.handle_command(Command::MoveRight));
        }

        let events = state.step(0, &[Command::HardDrop]);
        assert_eq!(events.as_slice(), &[GameEvent::RowsCleared { rows: 4 }]);
        assert_eq!(state.score(), 100);
        assert_eq!(state.rows_cleared(), 4);
        assert!((state.fall_interval() - 0.29).abs() < 1e-9);
        assert_eq!(state.board().locked_count(), 0);
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let config = EngineConfig {
            min_fall_interval: 1.0,
            ..EngineConfig::seeded(9)
        };
        let state = GameState::with_config(config);
        assert_eq!(state.seed(), 9);
        assert_eq!(state.config().min_fall_interval, 0.15);
    }
}
