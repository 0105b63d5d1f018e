//! Generator module - board population and solvability-preserving reshuffles
//!
//! A level starts from a symbol multiset: `symbol_count` distinct icons drawn
//! without replacement from the catalog, each repeated
//! `width * height / symbol_count` times. The multiset is shuffled and laid
//! out in scan order (row by row from the top-left).
//!
//! Whenever the board has no linkable pair, the live tiles are permuted among
//! the cells they currently occupy (holes stay holes) until one appears.
//! Reshuffling is bounded by [`MAX_RESHUFFLE_ATTEMPTS`]; callers fall back to
//! a fresh board when it is exhausted.

use std::collections::HashMap;

use derive_more::{Display, Error};
use tracing::{debug, instrument, warn};

use crate::compaction::TileMove;
use crate::connect::has_any_match;
use crate::grid::Grid;
use crate::rng::RandomSource;
use crate::types::{ConfigError, LevelConfig, SymbolId, Tile, TileId, MAX_RESHUFFLE_ATTEMPTS};

/// Why a board could not be produced or rearranged
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum GenerateError {
    #[display("invalid level configuration: {source}")]
    InvalidConfig { source: ConfigError },
    #[display("no symbol has two live tiles left")]
    NoPairsLeft,
    #[display("no linkable arrangement after {attempts} attempts")]
    ReshuffleExhausted { attempts: u32 },
}

impl From<ConfigError> for GenerateError {
    fn from(source: ConfigError) -> Self {
        Self::InvalidConfig { source }
    }
}

/// Result of a successful reshuffle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShuffleOutcome {
    /// Tiles whose cell changed
    pub moves: Vec<TileMove>,
    /// Permutations tried, including the accepted one
    pub attempts: u32,
}

/// Populates and reshuffles boards for one level
#[derive(Debug, Clone)]
pub struct BoardGenerator<R: RandomSource> {
    config: LevelConfig,
    rng: R,
    next_tile_id: u32,
    max_attempts: u32,
}

impl<R: RandomSource> BoardGenerator<R> {
    /// Create a generator; rejects configs that cannot be cleared in pairs.
    pub fn new(config: LevelConfig, rng: R) -> Result<Self, GenerateError> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            next_tile_id: 0,
            max_attempts: MAX_RESHUFFLE_ATTEMPTS,
        })
    }

    /// Override the reshuffle bound (at least one attempt is always made).
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// Switch to another level, keeping the random stream and tile ids.
    pub fn set_config(&mut self, config: LevelConfig) -> Result<(), GenerateError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Shuffled symbols for a full board, in layout order.
    pub fn symbol_multiset(&mut self) -> Vec<SymbolId> {
        let chosen = self.rng.sample_distinct(
            self.config.available_symbols as u32,
            self.config.symbol_count as usize,
        );

        let copies = self.config.copies_per_symbol();
        let mut symbols = Vec::with_capacity(chosen.len() * copies);
        for _ in 0..copies {
            symbols.extend(chosen.iter().map(|&id| SymbolId(id as u16)));
        }
        self.rng.shuffle(&mut symbols);
        symbols
    }

    /// Fill a fresh grid from a new symbol multiset without checking solvability.
    pub fn lay_out(&mut self) -> Grid {
        let mut grid = Grid::new(self.config.width, self.config.height);
        let symbols = self.symbol_multiset();
        for (idx, symbol) in symbols.into_iter().enumerate() {
            let tile = Tile::new(self.fresh_id(), symbol);
            grid.set(grid.position_of(idx), Some(tile));
        }
        grid
    }

    /// Build a board with at least one linkable pair.
    ///
    /// Reshuffles an unsolvable layout; if reshuffling is exhausted a new
    /// layout is drawn, up to the same attempt bound.
    #[instrument(level = "debug", skip(self), fields(
        width = self.config.width,
        height = self.config.height,
        symbols = self.config.symbol_count,
    ))]
    pub fn populate(&mut self) -> Result<Grid, GenerateError> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let mut grid = self.lay_out();
            if has_any_match(&grid) {
                return Ok(grid);
            }

            match self.reshuffle(&mut grid) {
                Ok(_) => return Ok(grid),
                Err(GenerateError::ReshuffleExhausted { .. }) if attempts < self.max_attempts => {
                    warn!(attempts, "layout could not be reshuffled into a match, redrawing");
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Permute the live tiles among the occupied cells until a match exists.
    ///
    /// Always moves tiles at least once, even if the board already had a
    /// match. Holes are never filled.
    #[instrument(level = "debug", skip(self, grid), fields(tiles = grid.tile_count()))]
    pub fn reshuffle(&mut self, grid: &mut Grid) -> Result<ShuffleOutcome, GenerateError> {
        if !has_pair(grid) {
            return Err(GenerateError::NoPairsLeft);
        }

        let positions = grid.occupied_positions();
        let original: HashMap<TileId, _> = grid.tiles().map(|(pos, tile)| (tile.id, pos)).collect();
        let mut tiles: Vec<Tile> = grid.tiles().map(|(_, tile)| tile).collect();

        for attempt in 1..=self.max_attempts {
            self.rng.shuffle(&mut tiles);
            for (&pos, &tile) in positions.iter().zip(&tiles) {
                grid.set(pos, Some(tile));
            }

            if has_any_match(grid) {
                debug!(attempt, "reshuffle found a match");
                let moves = positions
                    .iter()
                    .zip(&tiles)
                    .filter_map(|(&to, &tile)| {
                        let from = original[&tile.id];
                        (from != to).then_some(TileMove { tile, from, to })
                    })
                    .collect();
                return Ok(ShuffleOutcome {
                    moves,
                    attempts: attempt,
                });
            }
        }

        warn!(attempts = self.max_attempts, "reshuffle exhausted");
        Err(GenerateError::ReshuffleExhausted {
            attempts: self.max_attempts,
        })
    }

    fn fresh_id(&mut self) -> TileId {
        let id = TileId(self.next_tile_id);
        self.next_tile_id = self.next_tile_id.wrapping_add(1);
        id
    }
}

/// Whether some symbol still has two live tiles
fn has_pair(grid: &Grid) -> bool {
    let mut counts: HashMap<SymbolId, u32> = HashMap::new();
    grid.tiles().any(|(_, tile)| {
        let count = counts.entry(tile.symbol).or_insert(0);
        *count += 1;
        *count >= 2
    })
}
