use serde::{Deserialize, Serialize};

use crate::types::{Position, ShiftMode};

/// Serializable name of a session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PhaseKind {
    #[default]
    Ready,
    Connecting,
    Shifting,
    Settling,
    Shuffling,
    Cleared,
}

/// Read-only view of a session for renderers and observers
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub width: u8,
    pub height: u8,
    /// Row-major symbols, `None` for empty cells
    pub cells: Vec<Option<u16>>,
    pub phase: PhaseKind,
    /// Time left in the current phase
    pub remaining_ms: u32,
    pub selected: Option<Position>,
    /// Connector polyline while a matched pair is on display
    pub connector: Vec<Position>,
    pub shift_mode: ShiftMode,
    pub tiles_left: u32,
    pub matches: u32,
    pub reshuffles: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.cells.clear();
        self.phase = PhaseKind::Ready;
        self.remaining_ms = 0;
        self.selected = None;
        self.connector.clear();
        self.shift_mode = ShiftMode::None;
        self.tiles_left = 0;
        self.matches = 0;
        self.reshuffles = 0;
    }

    /// Symbol at a board position
    pub fn cell(&self, pos: Position) -> Option<u16> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width as i16 || pos.y >= self.height as i16 {
            return None;
        }
        let idx = pos.y as usize * self.width as usize + pos.x as usize;
        self.cells.get(idx).copied().flatten()
    }

    pub fn playable(&self) -> bool {
        self.phase == PhaseKind::Ready
    }
}
