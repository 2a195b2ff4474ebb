use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::{Deserialize, Serialize};

use crate::action::{Action, Bid};
use crate::resolve::RoundResolution;

/// A seat and its dice count at the start of a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatDice {
    /// Player name
    pub name: String,
    /// Dice held going into the round
    pub dice_remaining: u32,
}

/// Something that happened at the table, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// Fresh dice were rolled for every active player
    RoundStarted {
        /// Round number, starting at 1
        round: u32,
        /// Dice in play this round
        total_dice: u32,
        /// Every seat in turn order
        players: Vec<SeatDice>,
    },
    /// A bid was accepted, whether chosen or forced
    BidPlaced {
        /// Round the bid belongs to
        round: u32,
        /// Bidding player
        player: String,
        /// The new standing bid
        bid: Bid,
    },
    /// The player's own choice was unusable and `action` was played instead
    FallbackForced {
        /// Round the turn belongs to
        round: u32,
        /// Player whose choice was replaced
        player: String,
        /// Fault tag: `illegal_action`, `timeout`, `agent_error`, `panicked` or `cancelled`
        reason: String,
        /// The action played on the player's behalf
        action: Action,
    },
    /// A challenge or exact call was settled
    RoundResolved {
        /// Full outcome including the revealed dice
        resolution: RoundResolution,
    },
    /// A player lost their last die
    PlayerEliminated {
        /// Round in which the last die was lost
        round: u32,
        /// Eliminated player
        player: String,
    },
    /// One player is left holding dice
    GameFinished {
        /// The surviving player
        winner: String,
        /// Rounds played in the game
        rounds: u32,
    },
}

pub type EventListener = Box<dyn Fn(&GameEvent) + Send + Sync>;

/// Fan-out of events to registered listeners. A panicking listener is
/// reported and skipped.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<EventListener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: EventListener) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &GameEvent) {
        for (i, listener) in self.listeners.iter().enumerate() {
            if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                tracing::warn!(listener = i, "event listener panicked");
            }
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn panicking_listener_does_not_stop_others() {
        let seen = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();
        bus.subscribe(Box::new(|_| panic!("boom")));
        let counter = Arc::clone(&seen);
        bus.subscribe(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        bus.emit(&GameEvent::GameFinished {
            winner: "ana".into(),
            rounds: 3,
        });
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn events_serialize_with_snake_case_tag() {
        let json = serde_json::to_value(GameEvent::PlayerEliminated {
            round: 4,
            player: "bo".into(),
        })
        .unwrap();
        assert_eq!(json["event"], "player_eliminated");
        assert_eq!(json["player"], "bo");
    }
}
