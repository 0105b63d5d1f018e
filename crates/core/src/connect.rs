//! Connect module - decides whether two tiles can be linked
//!
//! Two same-symbol tiles link when a polyline with at most two right-angle
//! turns joins them without crossing another tile. The router is built from
//! three straight segments:
//!
//! 1. From tile A along its **open line** (the empty run of cells reaching out
//!    from A on one axis) to a point `p1`.
//! 2. A straight **bridge** from `p1` to a point `p2` on B's open line of the
//!    same axis, perpendicular to it.
//! 3. From `p2` back along B's open line to B.
//!
//! Open lines stop before the first occupied cell but run one cell past the
//! board edge, so a bridge can travel through the empty ring around the
//! board. The shortest candidate wins; among equal lengths the first one found
//! is kept (vertical bridges before horizontal ones, open-line order from
//! each tile outward).
//!
//! Everything here is read-only with respect to the grid.

use std::collections::BTreeMap;

use crate::grid::Grid;
use crate::types::{Axis, Path, Position, SymbolId};

/// A linkable pair found on the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    pub a: Position,
    pub b: Position,
    pub path: Path,
}

/// Find the shortest connecting path between the tiles at `a` and `b`.
///
/// Returns None when either cell is empty or out of range, when `a == b`,
/// when the symbols differ, or when no route with at most two turns exists.
///
/// # Examples
///
/// ```
/// use onet_core::connect::try_connect;
/// use onet_core::grid::Grid;
/// use onet_core::types::Position;
///
/// let grid = Grid::parse("A.A").unwrap();
/// let path = try_connect(&grid, Position::new(0, 0), Position::new(2, 0)).unwrap();
/// assert_eq!(path.length(), 2);
/// ```
pub fn try_connect(grid: &Grid, a: Position, b: Position) -> Option<Path> {
    if a == b {
        return None;
    }
    let tile_a = grid.get(a)?;
    let tile_b = grid.get(b)?;
    if tile_a.symbol != tile_b.symbol {
        return None;
    }
    shortest_route(grid, a, b)
}

/// True iff some pair of same-symbol tiles can currently be linked.
pub fn has_any_match(grid: &Grid) -> bool {
    find_any_match(grid).is_some()
}

/// First linkable pair, scanning symbols in ascending order and pairs in
/// board scan order. Stops at the first success.
pub fn find_any_match(grid: &Grid) -> Option<Hint> {
    for positions in group_by_symbol(grid).values() {
        for (i, &a) in positions.iter().enumerate() {
            for &b in &positions[i + 1..] {
                if let Some(path) = shortest_route(grid, a, b) {
                    return Some(Hint { a, b, path });
                }
            }
        }
    }
    None
}

/// Every linkable pair on the board.
pub fn all_matches(grid: &Grid) -> Vec<Hint> {
    let mut hints = Vec::new();
    for positions in group_by_symbol(grid).values() {
        for (i, &a) in positions.iter().enumerate() {
            for &b in &positions[i + 1..] {
                if let Some(path) = shortest_route(grid, a, b) {
                    hints.push(Hint { a, b, path });
                }
            }
        }
    }
    hints
}

fn group_by_symbol(grid: &Grid) -> BTreeMap<SymbolId, Vec<Position>> {
    let mut groups: BTreeMap<SymbolId, Vec<Position>> = BTreeMap::new();
    for (pos, tile) in grid.tiles() {
        groups.entry(tile.symbol).or_default().push(pos);
    }
    groups
}

/// Router core; the caller has already checked that `a` and `b` are distinct
/// tiles of the same symbol.
fn shortest_route(grid: &Grid, a: Position, b: Position) -> Option<Path> {
    let mut best: Option<Path> = None;
    let mut best_length = u32::MAX;

    for axis in [Axis::Vertical, Axis::Horizontal] {
        let line_a = open_line(grid, a, axis);
        let line_b = open_line(grid, b, axis);

        for &p1 in &line_a {
            for &p2 in &line_b {
                // The bridge runs across the axis of the open lines.
                let aligned = match axis {
                    Axis::Vertical => p1.y == p2.y,
                    Axis::Horizontal => p1.x == p2.x,
                };
                if !aligned || !can_connect(grid, p1, p2) {
                    continue;
                }

                let path = Path::through(a, p1, p2, b);
                let length = path.length();
                if length < best_length {
                    best_length = length;
                    best = Some(path);
                }
            }
        }
    }

    best
}

/// The open line of the cell at `origin` along `axis`.
///
/// Starts with `origin` itself, then walks the positive direction and then
/// the negative one. Each walk collects empty cells, stops before an
/// occupied cell, and stops after including the first position off the board.
pub fn open_line(grid: &Grid, origin: Position, axis: Axis) -> Vec<Position> {
    let span = grid.width().max(grid.height()) as usize;
    let mut line = Vec::with_capacity(span + 3);
    line.push(origin);

    for direction in axis.directions() {
        let mut pos = origin;
        loop {
            pos = pos.offset(direction);
            if !grid.in_bounds(pos) {
                line.push(pos);
                break;
            }
            if grid.is_occupied(pos) {
                break;
            }
            line.push(pos);
        }
    }

    line
}

/// Check that `p` and `q` share a row or column and nothing blocks the
/// straight run between them.
///
/// Adjacent or identical points are always clear. Cells off the board count
/// as empty. Calling this with points that are not colinear is a bug in the
/// caller.
pub fn can_connect(grid: &Grid, p: Position, q: Position) -> bool {
    debug_assert!(
        p.is_colinear(q),
        "{p} and {q} are not on the same row or column"
    );
    if !p.is_colinear(q) {
        return false;
    }

    let distance = p.manhattan(q);
    if distance <= 1 {
        return true;
    }

    let dx = (q.x - p.x).signum();
    let dy = (q.y - p.y).signum();
    (1..distance as i16).all(|step| {
        let cell = Position::new(p.x + dx * step, p.y + dy * step);
        !grid.is_occupied(cell)
    })
}
