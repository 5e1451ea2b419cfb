use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::GameConfig;

/// Seat identifier of a player at the table.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Turn and phase metadata shared by moves, triggers, and plugins.
///
/// The runtime never persists plugin capabilities in here; those are layered
/// on top by projection when a move is about to run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ctx {
    pub num_players: u32,

    /// Turn counter, starting at 1.
    pub turn: u32,

    pub current_player: PlayerId,

    /// Seating order cycled by [`Ctx::end_turn`].
    pub play_order: Vec<PlayerId>,

    /// Index of `current_player` within `play_order`.
    pub play_order_pos: usize,

    /// Active phase, if the game uses phases.
    pub phase: Option<String>,

    /// Set once the game has ended; carries the game-defined result.
    pub gameover: Option<Value>,
}

impl Ctx {
    pub fn new(num_players: u32) -> Self {
        let play_order: Vec<PlayerId> = (0..num_players).map(PlayerId).collect();
        Self {
            num_players,
            turn: 1,
            current_player: play_order.first().copied().unwrap_or_default(),
            play_order,
            play_order_pos: 0,
            phase: None,
            gameover: None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.gameover.is_some()
    }

    /// Passes the turn to the next seat in `play_order`.
    pub fn end_turn(&mut self) {
        self.turn += 1;
        if self.play_order.is_empty() {
            return;
        }
        self.play_order_pos = (self.play_order_pos + 1) % self.play_order.len();
        self.current_player = self.play_order[self.play_order_pos];
    }
}

impl Default for Ctx {
    fn default() -> Self {
        Self::new(GameConfig::DEFAULT_NUM_PLAYERS)
    }
}
