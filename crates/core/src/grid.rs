//! Grid module - owns cell occupancy
//!
//! The grid is a `width x height` board where each cell is empty or holds one
//! tile. Uses a flat vector in row-major order (`y * width + x`).
//! Coordinates: `x` ranges `0..width` (left to right), `y` ranges
//! `0..height` (top to bottom).
//!
//! The grid is the only place tile locations are recorded. There is no
//! parallel tile list to keep in sync: a tile's position is the cell that
//! holds it, and a tile that no cell holds is gone.

use std::fmt;

use crate::types::{Cell, Position, SymbolId, Tile, TileId};

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a new empty grid
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    /// Get width of the grid
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Get height of the grid
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Number of cells
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    /// Calculate flat index from a position
    /// Returns None if out of bounds
    #[inline]
    pub fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// Inverse of [`Grid::index`]
    #[inline]
    pub fn position_of(&self, index: usize) -> Position {
        let width = self.width.max(1) as usize;
        Position::new((index % width) as i16, (index / width) as i16)
    }

    /// Check if position is inside the board
    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width as i16 && pos.y < self.height as i16
    }

    /// Get the tile at a position
    /// Returns None if the cell is empty or out of bounds
    pub fn get(&self, pos: Position) -> Option<Tile> {
        self.index(pos).and_then(|idx| self.cells[idx])
    }

    /// Set cell at a position
    /// Returns false (and changes nothing) if out of bounds
    pub fn set(&mut self, pos: Position, cell: Cell) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is within bounds and filled
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.get(pos).is_some()
    }

    /// Check if position is within bounds and empty
    pub fn is_empty_at(&self, pos: Position) -> bool {
        matches!(self.index(pos), Some(idx) if self.cells[idx].is_none())
    }

    /// Remove and return the tile at a position
    pub fn take(&mut self, pos: Position) -> Option<Tile> {
        let idx = self.index(pos)?;
        self.cells[idx].take()
    }

    /// Move the tile at `from` into the empty cell `to`.
    /// Returns false (and changes nothing) unless `from` is occupied and `to` is
    /// an empty in-bounds cell.
    pub fn move_tile(&mut self, from: Position, to: Position) -> bool {
        let (Some(src), Some(dst)) = (self.index(from), self.index(to)) else {
            return false;
        };
        if src == dst || self.cells[src].is_none() || self.cells[dst].is_some() {
            return false;
        }
        self.cells[dst] = self.cells[src].take();
        true
    }

    /// All positions in scan order (row by row from the top-left)
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(|idx| self.position_of(idx))
    }

    /// Live tiles with their positions, in scan order
    pub fn tiles(&self) -> impl Iterator<Item = (Position, Tile)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(idx, cell)| cell.map(|tile| (self.position_of(idx), tile)))
    }

    /// Positions currently holding a tile, in scan order
    pub fn occupied_positions(&self) -> Vec<Position> {
        self.tiles().map(|(pos, _)| pos).collect()
    }

    /// Number of live tiles
    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// True when no tile is left
    pub fn is_cleared(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_none())
    }

    /// Find where a tile currently lives
    pub fn locate(&self, id: TileId) -> Option<Position> {
        self.tiles()
            .find(|(_, tile)| tile.id == id)
            .map(|(pos, _)| pos)
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire grid
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Build a grid from row-major symbols. Tile ids follow scan order.
    ///
    /// Returns None if `symbols` does not have exactly `width * height` entries.
    pub fn from_symbols(width: u8, height: u8, symbols: &[Option<u16>]) -> Option<Self> {
        if symbols.len() != width as usize * height as usize {
            return None;
        }
        let cells = symbols
            .iter()
            .enumerate()
            .map(|(idx, symbol)| symbol.map(|s| Tile::new(TileId(idx as u32), SymbolId(s))))
            .collect();
        Some(Self {
            width,
            height,
            cells,
        })
    }

    /// Row-major symbols (inverse of [`Grid::from_symbols`])
    pub fn to_symbols(&self) -> Vec<Option<u16>> {
        self.cells
            .iter()
            .map(|cell| cell.map(|tile| tile.symbol.0))
            .collect()
    }

    /// Parse a grid from text, one line per row.
    ///
    /// `.` is an empty cell, `A`-`Z` are symbols 0-25 and `a`-`z` are 26-51.
    /// Whitespace around lines is ignored; blank lines are skipped.
    /// Returns None for ragged rows, unknown characters or oversized boards.
    ///
    /// # Examples
    ///
    /// ```
    /// use onet_core::grid::Grid;
    /// use onet_core::types::Position;
    ///
    /// let grid = Grid::parse("A.A\nBCB").unwrap();
    /// assert_eq!(grid.width(), 3);
    /// assert_eq!(grid.height(), 2);
    /// assert!(grid.get(Position::new(1, 0)).is_none());
    /// assert_eq!(grid.to_string(), "A.A\nBCB\n");
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let height = u8::try_from(rows.len()).ok()?;
        let width = u8::try_from(rows.first().map_or(0, |row| row.chars().count())).ok()?;

        let mut symbols = Vec::with_capacity(width as usize * height as usize);
        for row in &rows {
            if row.chars().count() != width as usize {
                return None;
            }
            for ch in row.chars() {
                symbols.push(match ch {
                    '.' => None,
                    _ => Some(symbol_from_char(ch)?),
                });
            }
        }
        Self::from_symbols(width, height, &symbols)
    }
}

/// Display character for a symbol (`#` when it has none)
pub fn symbol_char(symbol: SymbolId) -> char {
    match symbol.0 {
        s @ 0..=25 => (b'A' + s as u8) as char,
        s @ 26..=51 => (b'a' + (s - 26) as u8) as char,
        _ => '#',
    }
}

fn symbol_from_char(ch: char) -> Option<u16> {
    match ch {
        'A'..='Z' => Some(ch as u16 - 'A' as u16),
        'a'..='z' => Some(ch as u16 - 'a' as u16 + 26),
        _ => None,
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1) as usize) {
            for cell in row {
                let ch = match cell {
                    Some(tile) => symbol_char(tile.symbol),
                    None => '.',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
