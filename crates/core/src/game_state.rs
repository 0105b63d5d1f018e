//! Game state module - one board's play session
//!
//! Ties together the grid, the board generator and the compaction engine, and
//! sequences a match the way the presentation expects:
//!
//! ```text
//! Ready --request_match--> Connecting --disappear_ms--> (tiles removed)
//!   -> Shifting --shift_ms--> Settling --2 * shift_ms--> solvability check
//!   -> Ready, or Shuffling --shuffle_ms--> Ready
//! ```
//!
//! Removing the last pair goes straight to `Cleared`. Match requests are only
//! accepted in `Ready`, so a pair can never be matched while the board is
//! still moving.
//!
//! Time only advances through [`GameState::tick`]; schedulers that drive their
//! own animations can skip the wait with [`GameState::complete_phase`].

use std::mem;

use tracing::{debug, instrument, trace, warn};

use crate::compaction::{CompactionEngine, Stage, TileMove};
use crate::connect::{find_any_match, has_any_match, try_connect, Hint};
use crate::generator::{BoardGenerator, GenerateError};
use crate::grid::Grid;
use crate::rng::RandomSource;
use crate::snapshot::{GameSnapshot, PhaseKind};
use crate::types::{LevelConfig, Path, Position, Tile};

/// Where the session is in the match sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for input
    Ready,
    /// Connector on display; the pair is removed when the timer runs out
    Connecting {
        a: Position,
        b: Position,
        path: Path,
        remaining_ms: u32,
    },
    /// Staged compaction has a pass outstanding
    Shifting,
    /// Board settling before the solvability check
    Settling { remaining_ms: u32 },
    /// Reshuffle animation running
    Shuffling { remaining_ms: u32 },
    /// Every tile is gone
    Cleared,
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Ready => PhaseKind::Ready,
            Phase::Connecting { .. } => PhaseKind::Connecting,
            Phase::Shifting => PhaseKind::Shifting,
            Phase::Settling { .. } => PhaseKind::Settling,
            Phase::Shuffling { .. } => PhaseKind::Shuffling,
            Phase::Cleared => PhaseKind::Cleared,
        }
    }
}

/// Answer to a match request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchResult {
    pub accepted: bool,
    /// Connector to draw; present iff accepted
    pub path: Option<Path>,
}

/// What a tap on a board cell did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapOutcome {
    /// Nothing happened
    Ignored,
    /// The tile is now held
    Selected(Position),
    /// The held tile was released
    Deselected,
    /// The held tile and the tapped one are being cleared
    Matched(Path),
    /// The tapped tile could not be matched with the held one; both released
    Mismatched,
}

/// Changes a presentation layer animates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Connected {
        a: Position,
        b: Position,
        path: Path,
    },
    Removed {
        a: Tile,
        b: Tile,
    },
    Shifted {
        moves: Vec<TileMove>,
    },
    Reshuffled {
        moves: Vec<TileMove>,
        attempts: u32,
    },
    /// The board was replaced by a freshly generated one
    Regenerated,
    BoardCleared,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState<R: RandomSource> {
    grid: Grid,
    generator: BoardGenerator<R>,
    compaction: CompactionEngine,
    phase: Phase,
    /// Tile held by the tap controller
    selected: Option<Position>,
    /// Pending presentation events (drained by observers)
    events: Vec<GameEvent>,
    matches: u32,
    reshuffles: u32,
}

impl<R: RandomSource> GameState<R> {
    /// Start a session on a freshly populated board
    #[instrument(level = "debug", skip(rng))]
    pub fn new(config: LevelConfig, rng: R) -> Result<Self, GenerateError> {
        let mut generator = BoardGenerator::new(config, rng)?;
        let grid = generator.populate()?;
        Ok(Self::assemble(grid, generator))
    }

    /// Start a session on a prepared board, as is
    ///
    /// The board is not checked for solvability until the first settle, or
    /// an explicit [`GameState::shuffle`].
    pub fn from_grid(config: LevelConfig, rng: R, grid: Grid) -> Result<Self, GenerateError> {
        let generator = BoardGenerator::new(config, rng)?;
        Ok(Self::assemble(grid, generator))
    }

    fn assemble(grid: Grid, generator: BoardGenerator<R>) -> Self {
        Self {
            grid,
            compaction: CompactionEngine::from_config(generator.config()),
            generator,
            phase: Phase::Ready,
            selected: None,
            events: Vec::new(),
            matches: 0,
            reshuffles: 0,
        }
    }

    /// Replace the board with a new one for `config`
    #[instrument(level = "debug", skip(self))]
    pub fn load_level(&mut self, config: LevelConfig) -> Result<(), GenerateError> {
        self.generator.set_config(config)?;
        self.grid = self.generator.populate()?;
        self.compaction = CompactionEngine::from_config(&config);
        self.phase = Phase::Ready;
        self.selected = None;
        self.events.clear();
        self.matches = 0;
        self.reshuffles = 0;
        Ok(())
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &LevelConfig {
        self.generator.config()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    /// Pairs removed so far on this board
    pub fn matches(&self) -> u32 {
        self.matches
    }

    /// Successful reshuffles so far on this board
    pub fn reshuffles(&self) -> u32 {
        self.reshuffles
    }

    pub fn is_board_cleared(&self) -> bool {
        self.grid.is_cleared()
    }

    /// Input is only taken while nothing is moving
    pub fn can_select(&self) -> bool {
        self.phase == Phase::Ready
    }

    /// Ask to clear the tiles at `a` and `b`.
    ///
    /// Rejected, without any change, unless the session is `Ready` and the
    /// two cells hold distinct same-symbol tiles joined by a path with at
    /// most two turns.
    pub fn request_match(&mut self, a: Position, b: Position) -> MatchResult {
        if !self.can_select() {
            trace!(%a, %b, phase = ?self.phase.kind(), "match rejected, board busy");
            return MatchResult::default();
        }
        let Some(path) = try_connect(&self.grid, a, b) else {
            trace!(%a, %b, "match rejected");
            return MatchResult::default();
        };

        debug!(%a, %b, length = path.length(), turns = path.turns(), "match accepted");
        self.selected = None;
        self.events.push(GameEvent::Connected {
            a,
            b,
            path: path.clone(),
        });
        self.phase = Phase::Connecting {
            a,
            b,
            path: path.clone(),
            remaining_ms: self.config().timing.disappear_ms,
        };

        MatchResult {
            accepted: true,
            path: Some(path),
        }
    }

    /// Advance the phase timers by `elapsed_ms`.
    ///
    /// Time left over when a phase ends carries into the next one, so a large
    /// step may run the whole sequence.
    pub fn tick(&mut self, elapsed_ms: u32) {
        let mut budget = elapsed_ms;
        while !matches!(self.phase, Phase::Ready | Phase::Cleared) {
            let remaining = self.remaining_ms();
            if remaining > budget {
                self.consume(budget);
                return;
            }
            budget -= remaining;
            self.complete_phase();
        }
    }

    /// End the current phase now, whatever its timer says
    pub fn complete_phase(&mut self) {
        match mem::replace(&mut self.phase, Phase::Ready) {
            Phase::Connecting { a, b, .. } => self.remove_pair(a, b),
            Phase::Shifting => {
                if let Some(moves) = self.compaction.finish(&mut self.grid) {
                    self.record_shift(moves);
                }
                self.enter_settling();
            }
            Phase::Settling { .. } => self.ensure_solvable(),
            Phase::Shuffling { .. } | Phase::Ready => {}
            Phase::Cleared => self.phase = Phase::Cleared,
        }
    }

    /// Continue after a pair has been removed: compact the board, or finish
    /// it if nothing is left.
    pub fn on_clear_completed(&mut self) {
        if self.grid.is_cleared() {
            debug!(matches = self.matches, "board cleared");
            self.phase = Phase::Cleared;
            self.events.push(GameEvent::BoardCleared);
            return;
        }

        let moves = self.compaction.begin(&mut self.grid);
        self.record_shift(moves);
        if self.compaction.is_idle() {
            self.enter_settling();
        } else {
            self.phase = Phase::Shifting;
        }
    }

    /// Tap on a board cell, as the touch controller sees it.
    ///
    /// Empty cell releases the held tile. Tapping the held tile releases it.
    /// With nothing held the tile is picked up. Otherwise the two tiles are
    /// matched if possible, and released either way.
    pub fn tap(&mut self, pos: Position) -> TapOutcome {
        if !self.can_select() {
            return TapOutcome::Ignored;
        }
        if !self.grid.is_occupied(pos) {
            return self.tap_outside();
        }

        let Some(held) = self.selected else {
            self.selected = Some(pos);
            return TapOutcome::Selected(pos);
        };
        self.selected = None;
        if held == pos {
            return TapOutcome::Deselected;
        }

        match self.request_match(held, pos).path {
            Some(path) => TapOutcome::Matched(path),
            None => TapOutcome::Mismatched,
        }
    }

    /// Tap off the tiles; releases the held tile if any
    pub fn tap_outside(&mut self) -> TapOutcome {
        match self.selected.take() {
            Some(_) => TapOutcome::Deselected,
            None => TapOutcome::Ignored,
        }
    }

    /// A pair the player could clear right now
    pub fn hint(&self) -> Option<Hint> {
        find_any_match(&self.grid)
    }

    /// Rearrange the remaining tiles on request.
    ///
    /// Returns false when the board is busy.
    pub fn shuffle(&mut self) -> bool {
        if !self.can_select() {
            return false;
        }
        self.reshuffle_board()
    }

    /// Take every event produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.width = self.grid.width();
        out.height = self.grid.height();
        out.cells.clear();
        out.cells.extend(
            self.grid
                .cells()
                .iter()
                .map(|cell| cell.map(|tile| tile.symbol.0)),
        );
        out.phase = self.phase.kind();
        out.remaining_ms = self.remaining_ms();
        out.selected = self.selected;
        out.connector.clear();
        if let Phase::Connecting { path, .. } = &self.phase {
            out.connector.extend_from_slice(path.points());
        }
        out.shift_mode = self.config().shift_mode;
        out.tiles_left = self.grid.tile_count() as u32;
        out.matches = self.matches;
        out.reshuffles = self.reshuffles;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut snapshot = GameSnapshot::default();
        self.snapshot_into(&mut snapshot);
        snapshot
    }

    fn remaining_ms(&self) -> u32 {
        match &self.phase {
            Phase::Ready | Phase::Cleared => 0,
            Phase::Connecting { remaining_ms, .. }
            | Phase::Settling { remaining_ms }
            | Phase::Shuffling { remaining_ms } => *remaining_ms,
            Phase::Shifting => match self.compaction.stage() {
                Stage::PendingSecondPass { remaining_ms, .. } => remaining_ms,
                Stage::Idle => 0,
            },
        }
    }

    /// Spend time that does not finish the current phase
    fn consume(&mut self, elapsed_ms: u32) {
        match &mut self.phase {
            Phase::Connecting { remaining_ms, .. }
            | Phase::Settling { remaining_ms }
            | Phase::Shuffling { remaining_ms } => {
                *remaining_ms = remaining_ms.saturating_sub(elapsed_ms);
            }
            Phase::Shifting => {
                if let Some(moves) = self.compaction.advance(&mut self.grid, elapsed_ms) {
                    self.events.push(GameEvent::Shifted { moves });
                }
            }
            Phase::Ready | Phase::Cleared => {}
        }
    }

    fn remove_pair(&mut self, a: Position, b: Position) {
        let tile_a = self.grid.take(a);
        let tile_b = self.grid.take(b);
        debug_assert!(
            tile_a.is_some() && tile_b.is_some(),
            "matched cells {a} and {b} emptied before removal"
        );
        if let (Some(a), Some(b)) = (tile_a, tile_b) {
            self.events.push(GameEvent::Removed { a, b });
        }
        self.matches += 1;
        self.on_clear_completed();
    }

    fn record_shift(&mut self, moves: Vec<TileMove>) {
        if !moves.is_empty() {
            self.events.push(GameEvent::Shifted { moves });
        }
    }

    fn enter_settling(&mut self) {
        self.phase = Phase::Settling {
            remaining_ms: self.config().timing.settle_ms(),
        };
    }

    fn ensure_solvable(&mut self) {
        if has_any_match(&self.grid) {
            self.phase = Phase::Ready;
        } else {
            debug!(tiles = self.grid.tile_count(), "no match left");
            self.reshuffle_board();
        }
    }

    fn reshuffle_board(&mut self) -> bool {
        match self.generator.reshuffle(&mut self.grid) {
            Ok(outcome) => {
                self.reshuffles += 1;
                debug!(
                    attempts = outcome.attempts,
                    moved = outcome.moves.len(),
                    "board reshuffled"
                );
                self.events.push(GameEvent::Reshuffled {
                    moves: outcome.moves,
                    attempts: outcome.attempts,
                });
                self.start_shuffling();
                true
            }
            Err(err) => {
                warn!(%err, "reshuffle failed, regenerating board");
                self.regenerate()
            }
        }
    }

    fn regenerate(&mut self) -> bool {
        match self.generator.populate() {
            Ok(grid) => {
                self.grid = grid;
                self.compaction = CompactionEngine::from_config(self.generator.config());
                self.events.push(GameEvent::Regenerated);
                self.start_shuffling();
                true
            }
            Err(err) => {
                warn!(%err, "board regeneration failed");
                self.phase = Phase::Ready;
                false
            }
        }
    }

    fn start_shuffling(&mut self) {
        self.selected = None;
        self.phase = Phase::Shuffling {
            remaining_ms: self.config().timing.shuffle_ms,
        };
    }
}
