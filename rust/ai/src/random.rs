//! Random bidder.
//!
//! Bids a random legal bid most of the time and otherwise calls the standing
//! bid. Seeded instances make the same choices for the same views, which
//! keeps seeded games reproducible.

use std::sync::Mutex;

use dudo_engine::action::Action;
use dudo_engine::agent::{Agent, AgentError};
use dudo_engine::rules::minimum_opening_bid;
use dudo_engine::view::PublicState;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::bids_for;

const BID_PROBABILITY: f64 = 0.7;
const EXACT_PROBABILITY: f64 = 0.25;

#[derive(Debug)]
pub struct RandomAgent {
    name: String,
    rng: Mutex<ChaCha20Rng>,
}

impl RandomAgent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rng: Mutex::new(ChaCha20Rng::from_os_rng()),
        }
    }

    /// Creates an agent whose choices are fully determined by `seed`.
    ///
    /// ```rust
    /// use dudo_ai::RandomAgent;
    /// use dudo_engine::agent::Agent;
    ///
    /// let ai = RandomAgent::with_seed("rita", 7);
    /// assert_eq!(ai.name(), "rita");
    /// ```
    pub fn with_seed(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&self, view: &PublicState) -> Result<Action, AgentError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| AgentError::Internal("rng lock poisoned".into()))?;
        let bids = bids_for(view);

        if view.current_bid.is_none() {
            let opening = bids.choose(&mut *rng).copied().unwrap_or(minimum_opening_bid());
            return Ok(Action::Bid(opening));
        }

        if rng.random_bool(BID_PROBABILITY) {
            if let Some(bid) = bids.choose(&mut *rng) {
                return Ok(Action::Bid(*bid));
            }
        }
        if view.exact_call_enabled && rng.random_bool(EXACT_PROBABILITY) {
            return Ok(Action::Exact);
        }
        Ok(Action::Challenge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dudo_engine::action::Bid;
    use dudo_engine::view::PlayerSummary;

    fn view(current_bid: Option<Bid>, total: u32) -> PublicState {
        PublicState {
            players: vec![
                PlayerSummary {
                    name: "me".into(),
                    dice_remaining: total / 2,
                    is_me: true,
                },
                PlayerSummary {
                    name: "you".into(),
                    dice_remaining: total - total / 2,
                    is_me: false,
                },
            ],
            current_bid,
            round_number: 1,
            faces: 6,
            wild_ones: true,
            exact_call_enabled: false,
            starting_dice: 5,
            my_dice: vec![3; (total / 2) as usize],
            round_bids: vec![],
            round_resolutions: vec![],
        }
    }

    #[test]
    fn always_opens_with_a_bid() {
        let ai = RandomAgent::with_seed("r", 1);
        for _ in 0..50 {
            assert!(matches!(ai.decide(&view(None, 10)).unwrap(), Action::Bid(_)));
        }
    }

    #[test]
    fn challenges_when_nothing_higher_fits() {
        let ai = RandomAgent::with_seed("r", 1);
        // 2 x 1s with two dice in play admits no raise
        let action = ai.decide(&view(Some(Bid::new(2, 1)), 2)).unwrap();
        assert_eq!(action, Action::Challenge);
    }

    #[test]
    fn same_seed_same_choices() {
        let a = RandomAgent::with_seed("a", 99);
        let b = RandomAgent::with_seed("b", 99);
        let v = view(Some(Bid::new(2, 4)), 10);
        for _ in 0..20 {
            assert_eq!(a.decide(&v).unwrap(), b.decide(&v).unwrap());
        }
    }
}
