//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the workspace.
//! Everything here is plain data with no game logic, so it can be shared by the
//! rules core, observers and any presentation layer.
//!
//! # Coordinates
//!
//! Boards are addressed with `(x, y)` where `x` grows to the right and `y`
//! grows downward (row 0 is the top row):
//!
//! - [`Direction::Up`] is `y - 1`, [`Direction::Down`] is `y + 1`
//! - [`Direction::Left`] is `x - 1`, [`Direction::Right`] is `x + 1`
//!
//! A [`Position`] may point one cell outside the board on any side. Only path
//! geometry uses such positions: a connecting path may route through the
//! ring of space surrounding the board, but no tile ever lives there.
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_DISAPPEAR_MS` | 300 | Connector shown before a matched pair is removed |
//! | `DEFAULT_SHUFFLE_MS` | 300 | Duration of a reshuffle animation |
//! | `DEFAULT_SHIFT_MS` | 200 | Settle delay between staged compaction passes |
//!
//! # Examples
//!
//! ```
//! use onet_types::{Direction, Position, ShiftMode};
//!
//! let p = Position::new(2, 3);
//! assert_eq!(p.offset(Direction::Up), Position::new(2, 2));
//!
//! let mode = ShiftMode::from_str("upLeft").unwrap();
//! assert_eq!(mode, ShiftMode::UpLeft);
//! assert_eq!(mode.as_str(), "upLeft");
//! ```

use arrayvec::ArrayVec;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Connector display time before the matched pair is removed (300ms)
pub const DEFAULT_DISAPPEAR_MS: u32 = 300;

/// Reshuffle animation time (300ms)
pub const DEFAULT_SHUFFLE_MS: u32 = 300;

/// Settle delay between two staged compaction passes (200ms)
pub const DEFAULT_SHIFT_MS: u32 = 200;

/// After the last compaction pass the board settles for this many shift
/// intervals before the solvability check runs.
pub const SETTLE_SHIFT_MULTIPLIER: u32 = 2;

/// Upper bound on reshuffle attempts before the board is regenerated.
pub const MAX_RESHUFFLE_ATTEMPTS: u32 = 256;

/// Number of distinct tile icons in the default catalog.
pub const DEFAULT_AVAILABLE_SYMBOLS: u16 = 36;

/// Largest supported board side.
pub const MAX_BOARD_SIDE: u8 = u8::MAX;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_timing_defaults() {
        assert_eq!(DEFAULT_DISAPPEAR_MS, 300);
        assert_eq!(DEFAULT_SHUFFLE_MS, 300);
        assert_eq!(DEFAULT_SHIFT_MS, 200);
        assert_eq!(Timing::default().settle_ms(), 400);
    }

    #[test]
    fn shift_mode_parse_round_trip() {
        for mode in ShiftMode::ALL {
            assert_eq!(ShiftMode::from_str(mode.as_str()), Some(mode));
        }
        assert_eq!(ShiftMode::from_str("down_right"), Some(ShiftMode::DownRight));
        assert_eq!(ShiftMode::from_str("CENTER"), Some(ShiftMode::Center));
        assert_eq!(ShiftMode::from_str("sideways"), None);
    }

    #[test]
    fn shift_mode_passes() {
        assert_eq!(ShiftMode::None.passes(), (None, None));
        assert_eq!(
            ShiftMode::Up.passes(),
            (Some(ShiftPass::Slide(Direction::Up)), None)
        );
        assert_eq!(
            ShiftMode::DownLeft.passes(),
            (
                Some(ShiftPass::Slide(Direction::Down)),
                Some(ShiftPass::Slide(Direction::Left))
            )
        );
        assert_eq!(
            ShiftMode::Center.passes(),
            (
                Some(ShiftPass::CenterVertical),
                Some(ShiftPass::CenterHorizontal)
            )
        );
    }

    #[test]
    fn path_collapses_duplicates() {
        let a = Position::new(0, 0);
        let b = Position::new(0, 2);
        let path = Path::through(a, a, b, b);
        assert_eq!(path.points(), &[a, b]);
        assert_eq!(path.length(), 2);
        assert_eq!(path.turns(), 0);

        let straight = Path::through(a, Position::new(0, 1), Position::new(0, 1), b);
        assert_eq!(straight.points(), &[a, b]);
    }

    #[test]
    fn path_length_and_turns() {
        let path = Path::through(
            Position::new(0, 0),
            Position::new(0, -1),
            Position::new(3, -1),
            Position::new(3, 0),
        );
        assert_eq!(path.len(), 4);
        assert_eq!(path.length(), 5);
        assert_eq!(path.turns(), 2);
        assert_eq!(path.reversed().start(), Position::new(3, 0));
    }

    #[test]
    fn level_config_validation() {
        assert!(LevelConfig::new(4, 4, 8, ShiftMode::Up).validate().is_ok());
        assert_eq!(
            LevelConfig::new(3, 3, 2, ShiftMode::None).validate(),
            Err(ConfigError::UnevenBoard {
                area: 9,
                symbol_count: 2
            })
        );
        assert_eq!(
            LevelConfig::new(3, 2, 2, ShiftMode::None).validate(),
            Err(ConfigError::OddSymbolCopies { copies: 3 })
        );
        assert!(matches!(
            LevelConfig::new(0, 4, 2, ShiftMode::None).validate(),
            Err(ConfigError::InvalidSize { .. })
        ));

        let mut greedy = LevelConfig::new(4, 4, 8, ShiftMode::None);
        greedy.available_symbols = 4;
        assert_eq!(
            greedy.validate(),
            Err(ConfigError::NotEnoughSymbols {
                requested: 8,
                available: 4
            })
        );
    }

    #[test]
    fn level_config_deserializes_with_defaults() {
        let json = r#"{"width": 6, "height": 4, "symbol_count": 6, "shift_mode": "downRight"}"#;
        let config: LevelConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.shift_mode, ShiftMode::DownRight);
        assert_eq!(config.available_symbols, DEFAULT_AVAILABLE_SYMBOLS);
        assert_eq!(config.timing, Timing::default());
    }
}

/// Board coordinate `(x, y)`.
///
/// Signed so that the ring of cells just outside the board (`-1` and
/// `width`/`height`) can be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

impl Position {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// The neighbouring position one step in `direction`.
    pub fn offset(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// The position one step against `direction`.
    pub fn back(self, direction: Direction) -> Self {
        self.offset(direction.opposite())
    }

    /// Manhattan distance to `other`.
    pub fn manhattan(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) as u32 + self.y.abs_diff(other.y) as u32
    }

    /// Whether `other` shares a row or a column with this position.
    pub fn is_colinear(self, other: Position) -> bool {
        self.x == other.x || self.y == other.y
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The four cardinal directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Unit step `(dx, dy)` for this direction
    ///
    /// # Examples
    ///
    /// ```
    /// use onet_types::Direction;
    ///
    /// assert_eq!(Direction::Up.delta(), (0, -1));
    /// assert_eq!(Direction::Right.delta(), (1, 0));
    /// ```
    pub fn delta(&self) -> (i16, i16) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    pub fn axis(&self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Vertical,
            Direction::Left | Direction::Right => Axis::Horizontal,
        }
    }
}

/// Board axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl Axis {
    /// Walking directions along the axis, positive coordinate first.
    pub fn directions(&self) -> [Direction; 2] {
        match self {
            Axis::Vertical => [Direction::Down, Direction::Up],
            Axis::Horizontal => [Direction::Right, Direction::Left],
        }
    }
}

/// Compaction policy applied after every cleared pair
///
/// - **None**: tiles stay where they are
/// - **Up / Right / Down / Left**: tiles slide toward that edge
/// - **UpRight / DownRight / DownLeft / UpLeft**: vertical slide, then horizontal slide
/// - **Center**: tiles slide toward the middle row, then toward the middle column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShiftMode {
    #[default]
    None,
    Up,
    Right,
    Down,
    Left,
    UpRight,
    DownRight,
    DownLeft,
    UpLeft,
    Center,
}

impl ShiftMode {
    /// Every mode, in declaration order
    pub const ALL: [ShiftMode; 10] = [
        ShiftMode::None,
        ShiftMode::Up,
        ShiftMode::Right,
        ShiftMode::Down,
        ShiftMode::Left,
        ShiftMode::UpRight,
        ShiftMode::DownRight,
        ShiftMode::DownLeft,
        ShiftMode::UpLeft,
        ShiftMode::Center,
    ];

    /// Parse shift mode from string (case-insensitive, `_` and `-` ignored)
    ///
    /// # Examples
    ///
    /// ```
    /// use onet_types::ShiftMode;
    ///
    /// assert_eq!(ShiftMode::from_str("up"), Some(ShiftMode::Up));
    /// assert_eq!(ShiftMode::from_str("Down-Left"), Some(ShiftMode::DownLeft));
    /// assert_eq!(ShiftMode::from_str("diagonal"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "none" => Some(ShiftMode::None),
            "up" => Some(ShiftMode::Up),
            "right" => Some(ShiftMode::Right),
            "down" => Some(ShiftMode::Down),
            "left" => Some(ShiftMode::Left),
            "upright" => Some(ShiftMode::UpRight),
            "downright" => Some(ShiftMode::DownRight),
            "downleft" => Some(ShiftMode::DownLeft),
            "upleft" => Some(ShiftMode::UpLeft),
            "center" | "centre" => Some(ShiftMode::Center),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftMode::None => "none",
            ShiftMode::Up => "up",
            ShiftMode::Right => "right",
            ShiftMode::Down => "down",
            ShiftMode::Left => "left",
            ShiftMode::UpRight => "upRight",
            ShiftMode::DownRight => "downRight",
            ShiftMode::DownLeft => "downLeft",
            ShiftMode::UpLeft => "upLeft",
            ShiftMode::Center => "center",
        }
    }

    /// The compaction passes this mode runs, in order.
    ///
    /// The second pass, when present, must only start after the first one
    /// has been committed.
    pub fn passes(&self) -> (Option<ShiftPass>, Option<ShiftPass>) {
        use Direction::*;
        use ShiftPass::*;
        match self {
            ShiftMode::None => (None, None),
            ShiftMode::Up => (Some(Slide(Up)), None),
            ShiftMode::Right => (Some(Slide(Right)), None),
            ShiftMode::Down => (Some(Slide(Down)), None),
            ShiftMode::Left => (Some(Slide(Left)), None),
            ShiftMode::UpRight => (Some(Slide(Up)), Some(Slide(Right))),
            ShiftMode::DownRight => (Some(Slide(Down)), Some(Slide(Right))),
            ShiftMode::DownLeft => (Some(Slide(Down)), Some(Slide(Left))),
            ShiftMode::UpLeft => (Some(Slide(Up)), Some(Slide(Left))),
            ShiftMode::Center => (Some(CenterVertical), Some(CenterHorizontal)),
        }
    }
}

/// A single full-board compaction pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShiftPass {
    /// Every tile slides toward one edge
    Slide(Direction),
    /// Tiles slide toward the middle row from both sides
    CenterVertical,
    /// Tiles slide toward the middle column from both sides
    CenterHorizontal,
}

/// Symbol (icon) carried by a tile
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SymbolId(pub u16);

/// Identity of a tile for the lifetime of a board
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

/// A live board occupant.
///
/// Its position is the cell holding it; the board is the only registry of
/// tile locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Tile {
    pub id: TileId,
    pub symbol: SymbolId,
}

impl Tile {
    pub fn new(id: TileId, symbol: SymbolId) -> Self {
        Self { id, symbol }
    }
}

/// A cell on the board
///
/// - `None`: empty cell
/// - `Some(Tile)`: occupied cell
pub type Cell = Option<Tile>;

/// Connector polyline between two matched tiles
///
/// Two to four points: tile A, up to two turning points, tile B. Segments are
/// axis-aligned and no point repeats.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Path {
    points: ArrayVec<Position, 4>,
}

impl Path {
    /// Build `from → p1 → p2 → to`, skipping any point already on the path
    /// and any vertex the line passes straight through.
    pub fn through(from: Position, p1: Position, p2: Position, to: Position) -> Self {
        let mut points: ArrayVec<Position, 4> = ArrayVec::new();
        for point in [from, p1, p2, to] {
            if !points.contains(&point) {
                points.push(point);
            }
        }

        let mut i = 1;
        while i + 1 < points.len() {
            let (prev, cur, next) = (points[i - 1], points[i], points[i + 1]);
            let straight = (prev.x == cur.x && cur.x == next.x) || (prev.y == cur.y && cur.y == next.y);
            if straight {
                points.remove(i);
            } else {
                i += 1;
            }
        }
        Self { points }
    }

    pub fn points(&self) -> &[Position] {
        &self.points
    }

    pub fn start(&self) -> Position {
        self.points[0]
    }

    pub fn end(&self) -> Position {
        self.points[self.points.len() - 1]
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total polyline length in cells
    pub fn length(&self) -> u32 {
        self.points
            .windows(2)
            .map(|pair| pair[0].manhattan(pair[1]))
            .sum()
    }

    /// Number of right-angle turns along the path
    pub fn turns(&self) -> usize {
        self.points.len().saturating_sub(2)
    }

    /// Interior vertices (excluding both endpoints)
    pub fn corners(&self) -> &[Position] {
        let n = self.points.len();
        if n <= 2 { &[] } else { &self.points[1..n - 1] }
    }

    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }
}

/// Presentation timings of a level, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub disappear_ms: u32,
    pub shuffle_ms: u32,
    pub shift_ms: u32,
}

impl Timing {
    /// Time the board settles after the final compaction pass.
    pub fn settle_ms(&self) -> u32 {
        self.shift_ms * SETTLE_SHIFT_MULTIPLIER
    }

    /// Zero delays; every phase completes on the next tick.
    pub fn instant() -> Self {
        Self {
            disappear_ms: 0,
            shuffle_ms: 0,
            shift_ms: 0,
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            disappear_ms: DEFAULT_DISAPPEAR_MS,
            shuffle_ms: DEFAULT_SHUFFLE_MS,
            shift_ms: DEFAULT_SHIFT_MS,
        }
    }
}

/// Configuration of a single level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelConfig {
    pub width: u8,
    pub height: u8,
    /// Distinct symbols on the board
    pub symbol_count: u16,
    /// Size of the icon catalog symbols are drawn from
    #[serde(default = "default_available_symbols")]
    pub available_symbols: u16,
    #[serde(default)]
    pub shift_mode: ShiftMode,
    #[serde(default)]
    pub timing: Timing,
}

fn default_available_symbols() -> u16 {
    DEFAULT_AVAILABLE_SYMBOLS
}

impl LevelConfig {
    pub fn new(width: u8, height: u8, symbol_count: u16, shift_mode: ShiftMode) -> Self {
        Self {
            width,
            height,
            symbol_count,
            available_symbols: DEFAULT_AVAILABLE_SYMBOLS,
            shift_mode,
            timing: Timing::default(),
        }
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Tiles of each symbol on a freshly populated board
    pub fn copies_per_symbol(&self) -> usize {
        match self.symbol_count {
            0 => 0,
            n => self.area() / n as usize,
        }
    }

    /// Check that a board can be populated from this config and cleared in pairs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        if self.symbol_count == 0 {
            return Err(ConfigError::NoSymbols);
        }
        if self.symbol_count > self.available_symbols {
            return Err(ConfigError::NotEnoughSymbols {
                requested: self.symbol_count,
                available: self.available_symbols,
            });
        }
        let area = self.area();
        if area % self.symbol_count as usize != 0 {
            return Err(ConfigError::UnevenBoard {
                area,
                symbol_count: self.symbol_count,
            });
        }
        let copies = self.copies_per_symbol();
        if copies % 2 != 0 {
            return Err(ConfigError::OddSymbolCopies { copies });
        }
        Ok(())
    }
}

/// Rejected level configuration
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ConfigError {
    #[display("board size {width}x{height} is empty")]
    InvalidSize { width: u8, height: u8 },
    #[display("level has no symbols")]
    NoSymbols,
    #[display("level asks for {requested} symbols but only {available} are available")]
    NotEnoughSymbols { requested: u16, available: u16 },
    #[display("board area {area} is not a multiple of {symbol_count} symbols")]
    UnevenBoard { area: usize, symbol_count: u16 },
    #[display("each symbol would appear {copies} times; pairs need an even count")]
    OddSymbolCopies { copies: usize },
}
