//! Shared data types and constants
//!
//! Plain data used by the engine, the runner, and any external renderer.
//! Nothing here knows about game rules; it only names things.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//! - **Spawn anchor**: (5, 0) for every shape
//!
//! Piece cells may sit at negative rows while a piece is entering the board.
//! Locked cells never do.
//!
//! # Default Timing and Scoring
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_FALL_INTERVAL_SECS` | 0.30 | Seconds between automatic descents at game start |
//! | `MIN_FALL_INTERVAL_SECS` | 0.15 | Fall interval never drops below this |
//! | `FALL_INTERVAL_STEP_SECS` | 0.01 | Speed-up applied on each score milestone |
//! | `POINTS_PER_ROW` | 10 | Score per cleared row |
//! | `SPEEDUP_SCORE_STEP` | 50 | Score milestone that triggers a speed-up |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Command, ShapeId, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(ShapeId::from_str("t"), Some(ShapeId::T));
//! assert_eq!(Command::from_str("hardDrop"), Some(Command::HardDrop));
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Side length of a rotation mask
pub const MASK_SIZE: usize = 5;

/// Occupied cells per tetromino
pub const CELLS_PER_PIECE: usize = 4;

/// Mask column that lines up with the anchor column
pub const MASK_ORIGIN_X: i8 = 2;

/// Mask row that lines up with the anchor row
pub const MASK_ORIGIN_Y: i8 = 4;

/// Spawn anchor (x, y) for new pieces
pub const SPAWN_ANCHOR: (i8, i8) = (5, 0);

/// Locked cells above this row end the game
pub const LOSS_ROW: i8 = 1;

/// Fall interval at the start of a game
pub const DEFAULT_FALL_INTERVAL_SECS: f64 = 0.30;

/// Lower bound of the fall interval
pub const MIN_FALL_INTERVAL_SECS: f64 = 0.15;

/// Amount the fall interval shrinks on each score milestone
pub const FALL_INTERVAL_STEP_SECS: f64 = 0.01;

/// Points per cleared row
pub const POINTS_PER_ROW: u32 = 10;

/// Score multiple that triggers a speed-up
pub const SPEEDUP_SCORE_STEP: u32 = 50;

/// The seven tetromino shapes, in catalog order
///
/// The discriminant is the shape's catalog index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeId {
    S,
    Z,
    I,
    O,
    T,
    J,
    L,
}

impl ShapeId {
    /// All shapes in catalog order
    pub const ALL: [ShapeId; 7] = [
        ShapeId::S,
        ShapeId::Z,
        ShapeId::I,
        ShapeId::O,
        ShapeId::T,
        ShapeId::J,
        ShapeId::L,
    ];

    /// Catalog index of this shape (0..7)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Shape at a catalog index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Number of distinct rotation states this shape must define
    ///
    /// ```
    /// use blockfall_types::ShapeId;
    ///
    /// assert_eq!(ShapeId::O.rotation_count(), 1);
    /// assert_eq!(ShapeId::I.rotation_count(), 2);
    /// assert_eq!(ShapeId::T.rotation_count(), 4);
    /// ```
    pub fn rotation_count(self) -> usize {
        match self {
            ShapeId::O => 1,
            ShapeId::S | ShapeId::Z | ShapeId::I => 2,
            ShapeId::T | ShapeId::J | ShapeId::L => 4,
        }
    }

    /// Color every piece of this shape is drawn and locked with
    pub fn color(self) -> Color {
        match self {
            ShapeId::S => Color::GREEN,
            ShapeId::Z => Color::RED,
            ShapeId::I => Color::CYAN,
            ShapeId::O => Color::YELLOW,
            ShapeId::T => Color::MAGENTA,
            ShapeId::J => Color::BLUE,
            ShapeId::L => Color::ORANGE,
        }
    }

    /// Parse shape id from string (case-insensitive)
    ///
    /// ```
    /// use blockfall_types::ShapeId;
    ///
    /// assert_eq!(ShapeId::from_str("O"), Some(ShapeId::O));
    /// assert_eq!(ShapeId::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "s" => Some(ShapeId::S),
            "z" => Some(ShapeId::Z),
            "i" => Some(ShapeId::I),
            "o" => Some(ShapeId::O),
            "t" => Some(ShapeId::T),
            "j" => Some(ShapeId::J),
            "l" => Some(ShapeId::L),
            _ => None,
        }
    }

    /// Lowercase single-letter name
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeId::S => "s",
            ShapeId::Z => "z",
            ShapeId::I => "i",
            ShapeId::O => "o",
            ShapeId::T => "t",
            ShapeId::J => "j",
            ShapeId::L => "l",
        }
    }
}

/// RGB color of a settled or falling cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A cell on the board
///
/// - `None`: empty
/// - `Some(Color)`: locked with the given color
pub type Cell = Option<Color>;

/// Abstract player commands consumed by the engine
///
/// Device mapping happens outside the engine; only these five exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    /// Move piece one column left
    MoveLeft,
    /// Move piece one column right
    MoveRight,
    /// Move piece one row down
    SoftDrop,
    /// Advance to the next rotation state
    Rotate,
    /// Drop to the lowest valid row and lock
    HardDrop,
}

impl Command {
    /// Parse command from string (case-insensitive)
    ///
    /// Accepts the camelCase names plus short aliases used by the runner.
    ///
    /// ```
    /// use blockfall_types::Command;
    ///
    /// assert_eq!(Command::from_str("moveLeft"), Some(Command::MoveLeft));
    /// assert_eq!(Command::from_str("LEFT"), Some(Command::MoveLeft));
    /// assert_eq!(Command::from_str("drop"), Some(Command::HardDrop));
    /// assert_eq!(Command::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "moveleft" | "left" | "l" => Some(Command::MoveLeft),
            "moveright" | "right" | "r" => Some(Command::MoveRight),
            "softdrop" | "down" | "d" => Some(Command::SoftDrop),
            "rotate" | "up" | "u" => Some(Command::Rotate),
            "harddrop" | "drop" | "space" => Some(Command::HardDrop),
            _ => None,
        }
    }

    /// camelCase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::SoftDrop => "softDrop",
            Command::Rotate => "rotate",
            Command::HardDrop => "hardDrop",
        }
    }
}

/// Lifecycle phase of a game
///
/// `Spawning → Falling ⇄ commands → Locking → Clearing → Falling | GameOver`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Spawning,
    Falling,
    Locking,
    Clearing,
    GameOver,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::GameOver)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Spawning => "spawning",
            Phase::Falling => "falling",
            Phase::Locking => "locking",
            Phase::Clearing => "clearing",
            Phase::GameOver => "gameOver",
        }
    }
}

/// Events reported by a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum GameEvent {
    /// One lock cleared this many rows (always > 0)
    RowsCleared { rows: u8 },
    /// The game reached its terminal phase
    GameOver { final_score: u32 },
}
