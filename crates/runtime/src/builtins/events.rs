//! Turn and phase transitions requested from inside a move.
//!
//! Moves only queue events; nothing touches `ctx` until flush, where the
//! queue is replayed in order against the whole state.

use std::sync::{Mutex, PoisonError};

use game_core::{Ctx, GameState};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display};
use tracing::{debug, trace};

use crate::plugin::PluginDefinition;

pub const NAME: &str = "events";

/// A transition requested by a move.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GameEvent {
    EndTurn,
    /// Leaves the current phase without entering another.
    EndPhase,
    SetPhase(String),
    EndGame(Value),
}

impl GameEvent {
    /// Applies the event to `ctx`.
    pub fn apply(&self, ctx: &mut Ctx) {
        match self {
            GameEvent::EndTurn => ctx.end_turn(),
            GameEvent::EndPhase => ctx.phase = None,
            GameEvent::SetPhase(phase) => ctx.phase = Some(phase.clone()),
            GameEvent::EndGame(result) => ctx.gameover = Some(result.clone()),
        }
    }
}

/// Capability object exposed to moves under [`NAME`].
#[derive(Debug, Default)]
pub struct EventsApi {
    queue: Mutex<Vec<GameEvent>>,
}

impl EventsApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: GameEvent) {
        trace!(target: "runtime::plugins::builtin", event = %event, "Event queued");
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    pub fn end_turn(&self) {
        self.push(GameEvent::EndTurn);
    }

    pub fn end_phase(&self) {
        self.push(GameEvent::EndPhase);
    }

    pub fn set_phase(&self, phase: impl Into<String>) {
        self.push(GameEvent::SetPhase(phase.into()));
    }

    pub fn end_game(&self, result: Value) {
        self.push(GameEvent::EndGame(result));
    }

    /// Snapshot of the queued events, oldest first.
    pub fn pending(&self) -> Vec<GameEvent> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Replays `events` against `state.ctx`, stopping once the game is over.
pub fn apply_events<G>(mut state: GameState<G>, events: &[GameEvent]) -> GameState<G> {
    let mut applied = 0usize;
    for event in events {
        if state.ctx.is_over() {
            debug!(
                target: "runtime::plugins::builtin",
                ignored = events.len() - applied,
                "Game over, dropping remaining events"
            );
            break;
        }
        event.apply(&mut state.ctx);
        applied += 1;
    }
    state
}

pub fn plugin<G: 'static>() -> PluginDefinition<G> {
    PluginDefinition::builder::<(), EventsApi>(NAME)
        .api(|_| Ok(EventsApi::new()))
        .flush_raw(|args| {
            let events = args.api.map(EventsApi::pending).unwrap_or_default();
            Ok(apply_events(args.state, &events))
        })
        .build()
}
