//! Compaction tests - shift modes after a cleared pair

use std::collections::HashMap;

use onet::core::compaction::apply_pass;
use onet::core::{BoardGenerator, CompactionEngine, GameState, Grid, Phase, SimpleRng};
use onet::types::{LevelConfig, Position, ShiftMode, ShiftPass, TileId, Timing};

fn full_board(seed: u32) -> Grid {
    let config = LevelConfig::new(8, 6, 12, ShiftMode::None);
    BoardGenerator::new(config, SimpleRng::new(seed))
        .unwrap()
        .populate()
        .unwrap()
}

fn holed_board(seed: u32) -> Grid {
    let mut grid = full_board(seed);
    let positions = grid.occupied_positions();
    for (i, pos) in positions.into_iter().enumerate() {
        if (i * 7 + seed as usize) % 5 < 2 {
            grid.take(pos);
        }
    }
    grid
}

#[test]
fn test_full_board_never_moves() {
    let grid = full_board(5);
    for mode in ShiftMode::ALL {
        let mut compacted = grid.clone();
        let moves = CompactionEngine::new(mode, 0).compact(&mut compacted);
        assert!(moves.is_empty(), "{mode:?} moved tiles on a full board");
        assert_eq!(compacted, grid);
    }
}

#[test]
fn test_edge_modes_are_idempotent() {
    let modes = [
        ShiftMode::Up,
        ShiftMode::Right,
        ShiftMode::Down,
        ShiftMode::Left,
        ShiftMode::UpRight,
        ShiftMode::DownRight,
        ShiftMode::DownLeft,
        ShiftMode::UpLeft,
    ];
    for seed in 1..4 {
        for mode in modes {
            let mut grid = holed_board(seed);
            let mut engine = CompactionEngine::new(mode, 0);
            engine.compact(&mut grid);
            let settled = grid.clone();
            assert!(engine.compact(&mut grid).is_empty(), "{mode:?} not settled");
            assert_eq!(grid, settled);
        }
    }
}

#[test]
fn test_compaction_keeps_every_tile() {
    for mode in ShiftMode::ALL {
        let mut grid = holed_board(2);
        let mut before: Vec<TileId> = grid.tiles().map(|(_, tile)| tile.id).collect();
        CompactionEngine::new(mode, 0).compact(&mut grid);
        let mut after: Vec<TileId> = grid.tiles().map(|(_, tile)| tile.id).collect();
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after, "{mode:?} lost or duplicated tiles");
    }
}

#[test]
fn test_center_passes_never_cross_the_middle() {
    for seed in 1..6 {
        let mut grid = holed_board(seed);
        let center_row = grid.height() as i16 / 2;
        for step in apply_pass(&mut grid, ShiftPass::CenterVertical) {
            assert_eq!(step.from.x, step.to.x);
            if step.from.y < center_row {
                assert!(step.to.y > step.from.y && step.to.y <= center_row);
            } else {
                assert!(step.from.y > center_row);
                assert!(step.to.y < step.from.y && step.to.y >= center_row);
            }
        }

        let center_column = grid.width() as i16 / 2;
        for step in apply_pass(&mut grid, ShiftPass::CenterHorizontal) {
            assert_eq!(step.from.y, step.to.y);
            if step.from.x < center_column {
                assert!(step.to.x > step.from.x && step.to.x <= center_column);
            } else {
                assert!(step.from.x > center_column);
                assert!(step.to.x < step.from.x && step.to.x >= center_column);
            }
        }
    }
}

#[test]
fn test_up_mode_closes_the_cleared_column() {
    // 4x4, 8 symbols, two of each.
    let config = LevelConfig::new(4, 4, 8, ShiftMode::Up).with_timing(Timing::instant());
    let mut game = GameState::new(config, SimpleRng::new(808)).unwrap();

    let hint = game.hint().unwrap();
    let before: HashMap<TileId, Position> = game
        .grid()
        .tiles()
        .map(|(pos, tile)| (tile.id, pos))
        .collect();

    assert!(game.request_match(hint.a, hint.b).accepted);
    game.complete_phase();
    assert!(matches!(game.phase(), Phase::Settling { .. }));

    let grid = game.grid();
    for x in [hint.a.x, hint.b.x] {
        // No hole above any tile in the column
        let column: Vec<bool> = (0..4).map(|y| grid.is_occupied(Position::new(x, y))).collect();
        let filled = column.iter().take_while(|occupied| **occupied).count();
        assert!(column[filled..].iter().all(|occupied| !occupied));

        for y in 0..4 {
            let Some(tile) = grid.get(Position::new(x, y)) else {
                continue;
            };
            let from = before[&tile.id];
            let removed_above = [hint.a, hint.b]
                .iter()
                .filter(|cleared| cleared.x == x && cleared.y < from.y)
                .count() as i16;
            assert_eq!(from.x, x);
            assert_eq!(y, from.y - removed_above);
            if removed_above > 0 {
                assert!(y < from.y, "tile {} did not move up", tile.id);
            }
        }
    }
}
