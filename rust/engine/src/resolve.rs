use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::action::{Bid, CallKind};

/// One bid as it happened at the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidRecord {
    pub player: String,
    pub bid: Bid,
    pub round_number: u32,
}

/// Outcome of a round, frozen at the moment the cups were lifted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResolution {
    pub round_number: u32,
    /// Every bid placed during the round, in order
    pub bids: Vec<BidRecord>,
    pub final_bid: Bid,
    pub resolution_type: CallKind,
    /// Player who challenged or called exact
    pub resolver: String,
    /// Player who placed `final_bid`
    pub bidder: String,
    pub winner: String,
    pub loser: String,
    /// Dice matching `final_bid.face`, wild ones included
    pub actual_count: u32,
    /// Every hand in the round, keyed by player name
    pub revealed_dice: BTreeMap<String, Vec<u8>>,
}

impl RoundResolution {
    pub fn resolver_won(&self) -> bool {
        self.winner == self.resolver
    }

    /// A correct exact call earns the caller a die back.
    pub fn resolver_gains_die(&self) -> bool {
        self.resolution_type == CallKind::Exact && self.resolver_won()
    }
}

/// The terminal call that ends a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundCall<'a> {
    pub kind: CallKind,
    pub final_bid: Bid,
    pub caller: &'a str,
    pub bidder: &'a str,
}

/// Counts dice showing `face`; with wild ones, ones also count for any
/// other face. Ones are never counted twice.
///
/// ```
/// use dudo_engine::resolve::count_matching;
///
/// let dice = [1, 1, 4, 4, 6];
/// assert_eq!(count_matching(dice.iter(), 4, true), 4);
/// assert_eq!(count_matching(dice.iter(), 1, true), 2);
/// assert_eq!(count_matching(dice.iter(), 4, false), 2);
/// ```
pub fn count_matching<'a>(dice: impl IntoIterator<Item = &'a u8>, face: u8, wild_ones: bool) -> u32 {
    let wild = wild_ones && face != 1;
    dice.into_iter()
        .filter(|&&d| d == face || (wild && d == 1))
        .count() as u32
}

/// Reveals the round and decides who won the call.
///
/// - Challenge: the bidder wins when at least `quantity` dice match.
/// - Exact: the caller wins only when exactly `quantity` dice match.
///
/// The loser always loses one die; applying that (and the exact bonus) is
/// left to the driver.
pub fn resolve(
    round_number: u32,
    bids: Vec<BidRecord>,
    revealed_dice: BTreeMap<String, Vec<u8>>,
    call: &RoundCall<'_>,
    wild_ones: bool,
) -> RoundResolution {
    let actual_count = count_matching(revealed_dice.values().flatten(), call.final_bid.face, wild_ones);

    let caller_wins = match call.kind {
        CallKind::Challenge => actual_count < call.final_bid.quantity,
        CallKind::Exact => actual_count == call.final_bid.quantity,
    };
    let (winner, loser) = if caller_wins {
        (call.caller, call.bidder)
    } else {
        (call.bidder, call.caller)
    };

    RoundResolution {
        round_number,
        bids,
        final_bid: call.final_bid,
        resolution_type: call.kind,
        resolver: call.caller.to_string(),
        bidder: call.bidder.to_string(),
        winner: winner.to_string(),
        loser: loser.to_string(),
        actual_count,
        revealed_dice,
    }
}
