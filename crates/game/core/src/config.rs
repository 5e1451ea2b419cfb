use serde::{Deserialize, Serialize};

/// Static description of the game handed to every plugin hook as `game`.
///
/// Hooks treat this as read-only configuration. It never changes over the
/// lifetime of a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Human-readable game name. Also feeds seed derivation when `seed` is unset.
    pub name: String,

    /// Explicit seed for deterministic randomness.
    pub seed: Option<u64>,

    /// Number of seats at the table.
    pub num_players: u32,
}

impl GameConfig {
    pub const DEFAULT_NAME: &'static str = "default";
    pub const DEFAULT_NUM_PLAYERS: u32 = 2;

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            seed: None,
            num_players: Self::DEFAULT_NUM_PLAYERS,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_num_players(mut self, num_players: u32) -> Self {
        self.num_players = num_players;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME)
    }
}
