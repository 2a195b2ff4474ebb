use serde::{Deserialize, Serialize};

use crate::action::{Bid, CallKind};
use crate::config::EngineConfig;
use crate::player::PlayerState;
use crate::resolve::{BidRecord, RoundResolution};
use crate::rules::RuleContext;

/// Where the driver's state machine currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting on the player at `seat` to bid or call
    AwaitingAction { seat: usize },
    /// A call was made; cups are about to be lifted
    RoundResolving { caller: usize, call: CallKind },
    /// One player has dice left
    GameOver { winner: usize },
}

/// Authoritative state of one game, mutated only by the engine between turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seats in turn order; eliminated players stay with zero dice
    pub(crate) players: Vec<PlayerState>,
    pub(crate) current_bid: Option<Bid>,
    pub(crate) round_number: u32,
    /// Every bid of the game, append-only
    pub(crate) bid_history: Vec<BidRecord>,
    /// Every resolved round, append-only
    pub(crate) resolution_history: Vec<RoundResolution>,
    pub(crate) config: EngineConfig,
    pub(crate) phase: Phase,
}

impl GameState {
    pub fn new(names: &[String], config: EngineConfig) -> Self {
        let players = names
            .iter()
            .map(|n| PlayerState::new(n.clone(), config.starting_dice))
            .collect();
        Self {
            players,
            current_bid: None,
            round_number: 1,
            bid_history: Vec::new(),
            resolution_history: Vec::new(),
            config,
            phase: Phase::AwaitingAction { seat: 0 },
        }
    }

    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }
    pub fn current_bid(&self) -> Option<Bid> {
        self.current_bid
    }
    pub fn round_number(&self) -> u32 {
        self.round_number
    }
    pub fn bid_history(&self) -> &[BidRecord] {
        &self.bid_history
    }
    pub fn resolution_history(&self) -> &[RoundResolution] {
        &self.resolution_history
    }
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn total_dice_in_play(&self) -> u32 {
        self.players.iter().map(|p| p.dice_count()).sum()
    }

    pub fn active_seats(&self) -> impl Iterator<Item = usize> + '_ {
        self.players
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_eliminated())
            .map(|(i, _)| i)
    }

    /// Bids placed in the round still being played.
    pub fn round_bids(&self) -> &[BidRecord] {
        let start = self
            .bid_history
            .iter()
            .rposition(|b| b.round_number != self.round_number)
            .map_or(0, |i| i + 1);
        &self.bid_history[start..]
    }

    /// First seat after `seat` (wrapping) that still has dice.
    pub fn next_active_seat(&self, seat: usize) -> Option<usize> {
        let n = self.players.len();
        (1..=n)
            .map(|step| (seat + step) % n)
            .find(|&i| !self.players[i].is_eliminated())
    }

    /// `seat` itself if it still has dice, otherwise the next one that does.
    pub fn seat_or_next_active(&self, seat: usize) -> Option<usize> {
        if self.players.get(seat).is_some_and(|p| !p.is_eliminated()) {
            Some(seat)
        } else {
            self.next_active_seat(seat)
        }
    }

    pub fn seat_of(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name() == name)
    }

    /// The single seat left with dice, once the game is decided.
    pub fn sole_survivor(&self) -> Option<usize> {
        let mut active = self.active_seats();
        match (active.next(), active.next()) {
            (Some(seat), None) => Some(seat),
            _ => None,
        }
    }

    pub fn rule_context(&self) -> RuleContext {
        RuleContext {
            current_bid: self.current_bid,
            faces: self.config.faces,
            wild_ones: self.config.wild_ones,
            exact_call_enabled: self.config.exact_call_enabled,
            total_dice: self.total_dice_in_play(),
        }
    }

    /// Panics if dice totals ever exceed what the table started with.
    pub(crate) fn assert_dice_invariants(&self) {
        let cap = self.config.starting_dice * self.players.len() as u32;
        assert!(
            self.total_dice_in_play() <= cap,
            "dice in play {} exceed starting total {}",
            self.total_dice_in_play(),
            cap
        );
        for p in &self.players {
            assert!(
                p.dice_count() <= self.config.starting_dice,
                "{} holds {} dice, above the starting {}",
                p.name(),
                p.dice_count(),
                self.config.starting_dice
            );
        }
    }
}
