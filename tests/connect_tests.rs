//! Connect tests - path finding between tiles

use onet::core::{
    all_matches, has_any_match, try_connect, BoardGenerator, Grid, LevelDatabase, SimpleRng,
};
use onet::types::{Path, Position};

fn pos(x: i16, y: i16) -> Position {
    Position::new(x, y)
}

fn populated(level: usize, seed: u32) -> Grid {
    let config = *LevelDatabase::default().get(level);
    BoardGenerator::new(config, SimpleRng::new(seed))
        .unwrap()
        .populate()
        .unwrap()
}

/// Knock out every third tile so paths have room to bend.
fn with_holes(mut grid: Grid) -> Grid {
    let positions = grid.occupied_positions();
    for pos in positions.into_iter().step_by(3) {
        grid.take(pos);
    }
    grid
}

fn assert_valid_path(grid: &Grid, a: Position, b: Position, path: &Path) {
    let points = path.points();
    assert!(points.len() >= 2 && points.len() <= 4, "bad vertex count {points:?}");
    assert_eq!(path.start(), a);
    assert_eq!(path.end(), b);

    let (w, h) = (grid.width() as i16, grid.height() as i16);
    for point in points {
        assert!(
            point.x >= -1 && point.x <= w && point.y >= -1 && point.y <= h,
            "vertex {point} outside the ring"
        );
    }

    for segment in points.windows(2) {
        let (p, q) = (segment[0], segment[1]);
        assert!(p.is_colinear(q), "segment {p} -> {q} is not axis-aligned");

        let dx = (q.x - p.x).signum();
        let dy = (q.y - p.y).signum();
        let mut cell = p;
        while cell != q {
            cell = Position::new(cell.x + dx, cell.y + dy);
            if cell != a && cell != b {
                assert!(grid.get(cell).is_none(), "path crosses tile at {cell}");
            }
        }
    }
}

#[test]
fn test_connectivity_is_symmetric() {
    for seed in 1..6 {
        let grid = with_holes(populated(3, seed));
        let tiles: Vec<_> = grid.tiles().collect();
        for (i, &(a, tile_a)) in tiles.iter().enumerate() {
            for &(b, tile_b) in &tiles[i + 1..] {
                if tile_a.symbol != tile_b.symbol {
                    continue;
                }
                let forward = try_connect(&grid, a, b).map(|path| path.length());
                let backward = try_connect(&grid, b, a).map(|path| path.length());
                assert_eq!(forward, backward, "asymmetric result for {a} and {b}");
            }
        }
    }
}

#[test]
fn test_different_symbols_never_connect() {
    let grid = with_holes(populated(1, 7));
    let tiles: Vec<_> = grid.tiles().collect();
    for &(a, tile_a) in &tiles {
        for &(b, tile_b) in &tiles {
            if tile_a.symbol != tile_b.symbol {
                assert!(try_connect(&grid, a, b).is_none());
            }
        }
    }
}

#[test]
fn test_every_found_path_is_valid() {
    for seed in [3, 11, 29] {
        let grid = with_holes(populated(5, seed));
        for hint in all_matches(&grid) {
            assert_valid_path(&grid, hint.a, hint.b, &hint.path);
            assert!(hint.path.turns() <= 2);
        }
    }
}

#[test]
fn test_border_detour_uses_outer_ring() {
    let grid = Grid::parse(
        "
        ABA
        BAB
        ",
    )
    .unwrap();

    let path = try_connect(&grid, pos(0, 0), pos(2, 0)).unwrap();
    assert_eq!(path.points(), &[pos(0, 0), pos(0, -1), pos(2, -1), pos(2, 0)]);
    assert!(path.corners().iter().all(|corner| corner.y == -1));
    assert_eq!(path.length(), 4);
    assert_valid_path(&grid, pos(0, 0), pos(2, 0), &path);
}

#[test]
fn test_column_with_cleared_middle_links_straight() {
    let grid = Grid::parse("A\n.\nA").unwrap();
    let path = try_connect(&grid, pos(0, 0), pos(0, 2)).unwrap();
    assert_eq!(path.points(), &[pos(0, 0), pos(0, 2)]);
    assert_eq!(path.length(), 2);
    assert_eq!(path.turns(), 0);
}

#[test]
fn test_blocked_last_pair_is_not_a_clear_board() {
    // The only pair sits on a diagonal with two unrelated tiles between.
    let grid = Grid::parse(
        "
        AB
        CA
        ",
    )
    .unwrap();

    assert!(try_connect(&grid, pos(0, 0), pos(1, 1)).is_none());
    assert!(!has_any_match(&grid));
    assert!(!grid.is_cleared());
}

#[test]
fn test_enclosed_tile_cannot_link() {
    let grid = Grid::parse(
        "
        BCD
        EAF
        GHA
        ",
    )
    .unwrap();
    assert!(try_connect(&grid, pos(1, 1), pos(2, 2)).is_none());
    assert!(!has_any_match(&grid));
}

#[test]
fn test_prefers_shorter_route() {
    // Straight through the gap in the bottom row beats any detour.
    let grid = Grid::parse(
        "
        ABCA
        A..A
        ",
    )
    .unwrap();
    let path = try_connect(&grid, pos(0, 1), pos(3, 1)).unwrap();
    assert_eq!(path.length(), 3);
    assert_eq!(path.points(), &[pos(0, 1), pos(3, 1)]);

    let top = try_connect(&grid, pos(0, 0), pos(3, 0)).unwrap();
    assert_eq!(top.length(), 5);
}
