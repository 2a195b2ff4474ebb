//! What an agent is allowed to see.

use serde::{Deserialize, Serialize};

use crate::action::Bid;
use crate::game::GameState;
use crate::resolve::{BidRecord, RoundResolution};

/// What everyone at the table can see about one seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    /// Player name, unique at the table
    pub name: String,
    /// Dice still held; zero once eliminated
    pub dice_remaining: u32,
    /// True for the viewing player's own seat
    pub is_me: bool,
}

/// Read-only projection of [`GameState`] for one viewing player.
///
/// Holds the viewer's own dice and nothing else hidden. Past rounds carry the
/// dice revealed when they were resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicState {
    /// Every seat in turn order, eliminated players included
    pub players: Vec<PlayerSummary>,
    /// Standing bid; `None` when the viewer opens the round
    pub current_bid: Option<Bid>,
    /// Current round, starting at 1
    pub round_number: u32,
    /// Number of faces on each die
    pub faces: u8,
    /// Ones count toward every other face
    pub wild_ones: bool,
    /// Exact calls are allowed
    pub exact_call_enabled: bool,
    /// Dice each player started with; also the exact-call cap
    pub starting_dice: u32,
    /// The viewer's own dice for this round
    pub my_dice: Vec<u8>,
    /// Bids placed so far this round, oldest first
    pub round_bids: Vec<BidRecord>,
    /// Resolved rounds with the dice revealed at the time
    pub round_resolutions: Vec<RoundResolution>,
}

impl PublicState {
    pub fn me(&self) -> Option<&PlayerSummary> {
        self.players.iter().find(|p| p.is_me)
    }

    pub fn total_dice(&self) -> u32 {
        self.players.iter().map(|p| p.dice_remaining).sum()
    }

    /// Dice held by everyone except the viewer.
    pub fn opponent_dice(&self) -> u32 {
        self.players
            .iter()
            .filter(|p| !p.is_me)
            .map(|p| p.dice_remaining)
            .sum()
    }
}

/// Builds the view of `state` for the player at seat `viewer`.
pub fn project(state: &GameState, viewer: usize) -> PublicState {
    let players = state
        .players()
        .iter()
        .enumerate()
        .map(|(i, p)| PlayerSummary {
            name: p.name().to_string(),
            dice_remaining: p.dice_count(),
            is_me: i == viewer,
        })
        .collect();
    let my_dice = state
        .players()
        .get(viewer)
        .map(|p| p.dice().to_vec())
        .unwrap_or_default();
    let config = state.config();

    PublicState {
        players,
        current_bid: state.current_bid(),
        round_number: state.round_number(),
        faces: config.faces,
        wild_ones: config.wild_ones,
        exact_call_enabled: config.exact_call_enabled,
        starting_dice: config.starting_dice,
        my_dice,
        round_bids: state.round_bids().to_vec(),
        round_resolutions: state.resolution_history().to_vec(),
    }
}
