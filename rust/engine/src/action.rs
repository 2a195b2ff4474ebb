use std::fmt;

use serde::{Deserialize, Serialize};

/// A claim that at least `quantity` dice across all cups show `face`.
///
/// Bids are compared with [`crate::rules::is_legal_bid`], never with `Ord`:
/// under wild ones the raise relation is directed, not a total order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Bid {
    /// How many dice are claimed
    pub quantity: u32,
    /// Face value claimed, 1-based
    pub face: u8,
}

impl Bid {
    pub const fn new(quantity: u32, face: u8) -> Self {
        Self { quantity, face }
    }

    pub fn is_on_ones(&self) -> bool {
        self.face == 1
    }
}

impl fmt::Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}s", self.quantity, self.face)
    }
}

/// The two ways of ending a round.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    /// Dudo: the current bid is too high
    Challenge,
    /// Calza: the current bid is exactly right
    Exact,
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallKind::Challenge => f.write_str("challenge"),
            CallKind::Exact => f.write_str("exact"),
        }
    }
}

/// What a player does on their turn.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Action {
    /// Raise the standing bid (or open the round)
    Bid(Bid),
    /// Dispute the standing bid
    Challenge,
    /// Claim the standing bid is exact
    Exact,
}

impl Action {
    pub fn bid(quantity: u32, face: u8) -> Self {
        Action::Bid(Bid::new(quantity, face))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Bid(b) => write!(f, "Bid({})", b),
            Action::Challenge => f.write_str("Challenge"),
            Action::Exact => f.write_str("Exact"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_table_talk() {
        assert_eq!(Bid::new(3, 4).to_string(), "3 x 4s");
        assert_eq!(Action::bid(2, 6).to_string(), "Bid(2 x 6s)");
        assert_eq!(Action::Exact.to_string(), "Exact");
    }

    #[test]
    fn action_serializes_with_kind_tag() {
        let json = serde_json::to_string(&Action::bid(4, 3)).unwrap();
        assert_eq!(json, r#"{"kind":"bid","quantity":4,"face":3}"#);
        let back: Action = serde_json::from_str(r#"{"kind":"challenge"}"#).unwrap();
        assert_eq!(back, Action::Challenge);
    }
}
