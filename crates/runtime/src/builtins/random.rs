//! Seeded randomness for moves.
//!
//! Persistent data is the seed plus the position reached in a ChaCha20
//! stream. Each step rebuilds the generator at that position, and flush
//! records how far the step advanced it, so a replay from the same state
//! draws the same numbers. Drawing anything marks the state as client-unsafe:
//! the master alone decides random outcomes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::plugin::PluginDefinition;

pub const NAME: &str = "random";

/// Persistent generator state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrngState {
    pub seed: u64,
    /// Number of 32-bit words already consumed from the stream.
    pub word_pos: u128,
}

/// Capability object exposed to moves under [`NAME`].
#[derive(Debug)]
pub struct RandomApi {
    seed: u64,
    rng: Mutex<ChaCha20Rng>,
    used: AtomicBool,
}

impl RandomApi {
    pub fn from_state(state: PrngState) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(state.seed);
        rng.set_word_pos(state.word_pos);
        Self {
            seed: state.seed,
            rng: Mutex::new(rng),
            used: AtomicBool::new(false),
        }
    }

    fn draw(&self) -> MutexGuard<'_, ChaCha20Rng> {
        self.used.store(true, Ordering::Relaxed);
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Uniform float in `[0, 1)`.
    pub fn number(&self) -> f64 {
        self.draw().gen_range(0.0..1.0)
    }

    /// Rolls a die with `sides` faces, returning `1..=sides`.
    pub fn die(&self, sides: u32) -> u32 {
        self.draw().gen_range(1..=sides.max(1))
    }

    pub fn d4(&self) -> u32 {
        self.die(4)
    }

    pub fn d6(&self) -> u32 {
        self.die(6)
    }

    pub fn d8(&self) -> u32 {
        self.die(8)
    }

    pub fn d10(&self) -> u32 {
        self.die(10)
    }

    pub fn d12(&self) -> u32 {
        self.die(12)
    }

    pub fn d20(&self) -> u32 {
        self.die(20)
    }

    pub fn shuffle<T>(&self, items: &mut [T]) {
        items.shuffle(&mut *self.draw());
    }

    /// Returns true once anything has been drawn this step.
    pub fn is_used(&self) -> bool {
        self.used.load(Ordering::Relaxed)
    }

    /// Current position in the stream, ready to persist.
    pub fn state(&self) -> PrngState {
        let rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        PrngState {
            seed: self.seed,
            word_pos: rng.get_word_pos(),
        }
    }
}

/// Derives a stable seed from the game name.
pub fn derive_seed(name: &str) -> u64 {
    let digest = Sha256::digest(name.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

pub fn plugin<G: 'static>() -> PluginDefinition<G> {
    PluginDefinition::builder::<PrngState, RandomApi>(NAME)
        .setup(|args| {
            let seed = match args.game.seed {
                Some(seed) => seed,
                None => {
                    let seed = derive_seed(&args.game.name);
                    debug!(
                        target: "runtime::plugins::builtin",
                        game = %args.game.name,
                        seed,
                        "No seed configured, derived one from game name"
                    );
                    seed
                }
            };
            Ok(PrngState { seed, word_pos: 0 })
        })
        .api(|args| Ok(RandomApi::from_state(*args.data)))
        .flush(|args| Ok(args.api.map(RandomApi::state).unwrap_or(*args.data)))
        .no_client(|args| Ok(args.api.is_some_and(RandomApi::is_used)))
        .build()
}

#[cfg(test)]
mod tests {
    use game_core::{Ctx, GameConfig, GameState};

    use super::*;
    use crate::config::RuntimeConfig;
    use crate::lifecycle;
    use crate::plugin::PluginRegistry;

    fn registry() -> PluginRegistry<()> {
        PluginRegistry::from_plugins(vec![plugin()], &RuntimeConfig::default()).unwrap()
    }

    fn seeded(game: &GameConfig) -> GameState<()> {
        lifecycle::setup(&GameState::new((), Ctx::default()), &registry(), game).unwrap()
    }

    #[test]
    fn explicit_seed_is_used() {
        let state = seeded(&GameConfig::new("dice").with_seed(42));

        assert_eq!(
            state.data_as::<PrngState>(NAME),
            Some(&PrngState {
                seed: 42,
                word_pos: 0
            })
        );
    }

    #[test]
    fn missing_seed_is_derived_from_name() {
        let a = seeded(&GameConfig::new("dice"));
        let b = seeded(&GameConfig::new("dice"));
        let c = seeded(&GameConfig::new("cards"));

        let seed = |s: &GameState<()>| s.data_as::<PrngState>(NAME).unwrap().seed;
        assert_eq!(seed(&a), derive_seed("dice"));
        assert_eq!(seed(&a), seed(&b));
        assert_ne!(seed(&a), seed(&c));
    }

    #[test]
    fn same_state_draws_same_numbers() {
        let state = PrngState {
            seed: 9,
            word_pos: 0,
        };
        let first = RandomApi::from_state(state);
        let second = RandomApi::from_state(state);

        let rolls_a: Vec<u32> = (0..10).map(|_| first.d20()).collect();
        let rolls_b: Vec<u32> = (0..10).map(|_| second.d20()).collect();
        assert_eq!(rolls_a, rolls_b);
        assert!(rolls_a.iter().all(|roll| (1..=20).contains(roll)));
    }

    #[test]
    fn flush_persists_stream_position() {
        let game = GameConfig::new("dice").with_seed(3);
        let registry = registry();
        let state = seeded(&game);

        let enhanced = lifecycle::enhance(&state, &registry, &game).unwrap();
        let api = enhanced.api_as::<RandomApi>(NAME).unwrap();
        let first_step: Vec<u32> = (0..4).map(|_| api.d6()).collect();
        let flushed = lifecycle::flush(&enhanced, &registry, &game, &RuntimeConfig::default())
            .unwrap();

        let persisted = flushed.data_as::<PrngState>(NAME).unwrap();
        assert!(persisted.word_pos > 0);

        // Continuing from the flushed state must match one uninterrupted stream.
        let next = lifecycle::enhance(&flushed, &registry, &game).unwrap();
        let second_step: Vec<u32> = (0..4)
            .map(|_| next.api_as::<RandomApi>(NAME).unwrap().d6())
            .collect();
        let reference = RandomApi::from_state(PrngState {
            seed: 3,
            word_pos: 0,
        });
        let uninterrupted: Vec<u32> = (0..8).map(|_| reference.d6()).collect();
        assert_eq!([first_step, second_step].concat(), uninterrupted);
    }

    #[test]
    fn no_client_only_after_drawing() {
        let game = GameConfig::new("dice").with_seed(1);
        let registry = registry();
        let enhanced = lifecycle::enhance(&seeded(&game), &registry, &game).unwrap();

        assert!(!lifecycle::no_client(&enhanced, &registry, &game).unwrap());

        let mut deck = vec![1, 2, 3, 4, 5];
        enhanced.api_as::<RandomApi>(NAME).unwrap().shuffle(&mut deck);
        assert!(lifecycle::no_client(&enhanced, &registry, &game).unwrap());

        deck.sort();
        assert_eq!(deck, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn zero_sided_die_rolls_one() {
        let api = RandomApi::from_state(PrngState::default());

        assert_eq!(api.die(0), 1);
        assert!(api.number() < 1.0);
    }
}
