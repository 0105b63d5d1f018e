//! Compaction module - closes holes after a pair is cleared
//!
//! Each [`ShiftMode`] maps to at most two full-board passes (see
//! [`ShiftMode::passes`]). Single-direction modes run one pass. Diagonal
//! modes and `Center` run a vertical pass, let the board settle for
//! `shift_ms`, then run a horizontal pass over the committed result of the
//! first one.
//!
//! The delay is not a sleep: [`CompactionEngine`] keeps a
//! [`Stage::PendingSecondPass`] and is advanced by the caller's clock
//! ([`CompactionEngine::advance`]) or flushed explicitly
//! ([`CompactionEngine::finish`]).
//!
//! Visiting order matters: tiles closest to the destination edge are moved
//! first, so every tile slides onto an already-settled neighbour.

use tracing::debug;

use crate::grid::Grid;
use crate::types::{Axis, Direction, LevelConfig, Position, ShiftMode, ShiftPass, Tile};

/// One tile relocation performed by a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileMove {
    pub tile: Tile,
    pub from: Position,
    pub to: Position,
}

/// Progress of a staged compaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    /// No pass outstanding
    #[default]
    Idle,
    /// First pass committed; `pass` runs once `remaining_ms` elapses
    PendingSecondPass { pass: ShiftPass, remaining_ms: u32 },
}

/// Runs the configured shift mode against a grid
#[derive(Debug, Clone)]
pub struct CompactionEngine {
    mode: ShiftMode,
    shift_ms: u32,
    stage: Stage,
}

impl CompactionEngine {
    pub fn new(mode: ShiftMode, shift_ms: u32) -> Self {
        Self {
            mode,
            shift_ms,
            stage: Stage::Idle,
        }
    }

    pub fn from_config(config: &LevelConfig) -> Self {
        Self::new(config.shift_mode, config.timing.shift_ms)
    }

    pub fn mode(&self) -> ShiftMode {
        self.mode
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_idle(&self) -> bool {
        self.stage == Stage::Idle
    }

    /// Run the first pass and schedule the second one, if the mode has one.
    ///
    /// A second pass still pending from an earlier call is committed first so
    /// passes never interleave.
    pub fn begin(&mut self, grid: &mut Grid) -> Vec<TileMove> {
        let mut moves = self.finish(grid).unwrap_or_default();

        let (first, second) = self.mode.passes();
        if let Some(pass) = first {
            moves.extend(apply_pass(grid, pass));
        }
        if let Some(pass) = second {
            self.stage = Stage::PendingSecondPass {
                pass,
                remaining_ms: self.shift_ms,
            };
        }
        moves
    }

    /// Advance the settle timer. Returns the second pass's moves once it runs.
    pub fn advance(&mut self, grid: &mut Grid, elapsed_ms: u32) -> Option<Vec<TileMove>> {
        let Stage::PendingSecondPass { pass, remaining_ms } = self.stage else {
            return None;
        };

        let remaining_ms = remaining_ms.saturating_sub(elapsed_ms);
        if remaining_ms > 0 {
            self.stage = Stage::PendingSecondPass { pass, remaining_ms };
            return None;
        }

        self.stage = Stage::Idle;
        Some(apply_pass(grid, pass))
    }

    /// Run the pending second pass now, skipping the rest of the delay.
    pub fn finish(&mut self, grid: &mut Grid) -> Option<Vec<TileMove>> {
        let Stage::PendingSecondPass { pass, .. } = self.stage else {
            return None;
        };
        self.stage = Stage::Idle;
        Some(apply_pass(grid, pass))
    }

    /// Run every pass of the mode back to back.
    pub fn compact(&mut self, grid: &mut Grid) -> Vec<TileMove> {
        let mut moves = self.begin(grid);
        if let Some(second) = self.finish(grid) {
            moves.extend(second);
        }
        moves
    }
}

/// Run a single full-board pass.
pub fn apply_pass(grid: &mut Grid, pass: ShiftPass) -> Vec<TileMove> {
    let moves = match pass {
        ShiftPass::Slide(direction) => slide(grid, direction),
        ShiftPass::CenterVertical => slide_to_center(grid, Axis::Vertical),
        ShiftPass::CenterHorizontal => slide_to_center(grid, Axis::Horizontal),
    };
    debug!(?pass, moved = moves.len(), "compaction pass");
    moves
}

fn slide(grid: &mut Grid, direction: Direction) -> Vec<TileMove> {
    let width = grid.width() as i16;
    let height = grid.height() as i16;
    let mut moves = Vec::new();

    match direction {
        Direction::Up | Direction::Down => {
            let rows: Vec<i16> = if direction == Direction::Up {
                (0..height).collect()
            } else {
                (0..height).rev().collect()
            };
            for y in rows {
                for x in 0..width {
                    let from = Position::new(x, y);
                    let to = find_empty(grid, from, direction);
                    relocate(grid, from, to, &mut moves);
                }
            }
        }
        Direction::Left | Direction::Right => {
            let columns: Vec<i16> = if direction == Direction::Left {
                (0..width).collect()
            } else {
                (0..width).rev().collect()
            };
            for x in columns {
                for y in 0..height {
                    let from = Position::new(x, y);
                    let to = find_empty(grid, from, direction);
                    relocate(grid, from, to, &mut moves);
                }
            }
        }
    }

    moves
}

/// Pull tiles from both sides toward the middle line of `axis`.
///
/// The middle line is `height / 2` (vertical) or `width / 2` (horizontal).
/// Tiles on the middle line stay put; tiles on either side may land on it
/// but never pass it.
fn slide_to_center(grid: &mut Grid, axis: Axis) -> Vec<TileMove> {
    let (lines, span) = match axis {
        Axis::Vertical => (grid.width() as i16, grid.height() as i16),
        Axis::Horizontal => (grid.height() as i16, grid.width() as i16),
    };
    let center = span / 2;
    let [toward_high, toward_low] = axis.directions();
    let at = |line: i16, offset: i16| match axis {
        Axis::Vertical => Position::new(line, offset),
        Axis::Horizontal => Position::new(offset, line),
    };

    let mut moves = Vec::new();
    for line in 0..lines {
        for offset in (0..center).rev() {
            let from = at(line, offset);
            let to = find_empty_toward_center(grid, from, toward_high, center);
            relocate(grid, from, to, &mut moves);
        }
        for offset in center + 1..span {
            let from = at(line, offset);
            let to = find_empty_toward_center(grid, from, toward_low, center);
            relocate(grid, from, to, &mut moves);
        }
    }
    moves
}

fn relocate(grid: &mut Grid, from: Position, to: Position, moves: &mut Vec<TileMove>) {
    if from == to {
        return;
    }
    let Some(tile) = grid.get(from) else {
        return;
    };
    let moved = grid.move_tile(from, to);
    debug_assert!(moved, "compaction target {to} is not free");
    if moved {
        moves.push(TileMove { tile, from, to });
    }
}

/// Farthest reachable empty cell from `from` in `direction`, stopping before
/// an occupied cell or at the board edge.
fn find_empty(grid: &Grid, from: Position, direction: Direction) -> Position {
    let mut check = from.offset(direction);
    while grid.in_bounds(check) {
        if grid.is_occupied(check) {
            return check.back(direction);
        }
        check = check.offset(direction);
    }
    check.back(direction)
}

/// Like [`find_empty`] but the middle line is the boundary: the walk ends on
/// it if it is free, or just before it otherwise.
fn find_empty_toward_center(
    grid: &Grid,
    from: Position,
    direction: Direction,
    center: i16,
) -> Position {
    let coordinate = |pos: Position| match direction.axis() {
        Axis::Vertical => pos.y,
        Axis::Horizontal => pos.x,
    };

    let mut check = from.offset(direction);
    loop {
        debug_assert!(grid.in_bounds(check), "center walk left the board at {check}");
        if grid.is_occupied(check) || !grid.in_bounds(check) {
            return check.back(direction);
        }
        if coordinate(check) == center {
            return check;
        }
        check = check.offset(direction);
    }
}
