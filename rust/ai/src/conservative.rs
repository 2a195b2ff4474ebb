//! Conservative agent: trusts its own cup and the odds, nothing else.
//!
//! The agent estimates how many dice match the standing bid as its own
//! matching dice plus the expected number among everyone else's hidden dice.
//! It challenges any bid above that estimate. Otherwise it makes the cheapest
//! legal bid on the face it holds most of.

use dudo_engine::action::{Action, Bid};
use dudo_engine::agent::{Agent, AgentError};
use dudo_engine::resolve::count_matching;
use dudo_engine::rules::minimum_opening_bid;
use dudo_engine::view::PublicState;

use crate::bids_for;

#[derive(Debug, Clone)]
pub struct ConservativeAgent {
    name: String,
}

impl ConservativeAgent {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Expected number of dice showing `face` (wilds included) across the
    /// table, given the viewer's own cup.
    fn expected_matches(view: &PublicState, face: u8) -> f64 {
        let mine = count_matching(&view.my_dice, face, view.wild_ones) as f64;
        let hits_per_die = if view.wild_ones && face != 1 { 2.0 } else { 1.0 };
        let p = hits_per_die / f64::from(view.faces);
        mine + f64::from(view.opponent_dice()) * p
    }

    /// Face with the most matches in the viewer's cup. Ties go to the higher face.
    fn favourite_face(view: &PublicState) -> u8 {
        (1..=view.faces)
            .max_by_key(|&f| count_matching(&view.my_dice, f, view.wild_ones))
            .unwrap_or(1)
    }

    fn choose_bid(view: &PublicState) -> Option<Bid> {
        let bids = bids_for(view);
        let favourite = Self::favourite_face(view);
        bids.iter()
            .find(|b| b.face == favourite)
            .or_else(|| bids.first())
            .copied()
    }
}

impl Agent for ConservativeAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&self, view: &PublicState) -> Result<Action, AgentError> {
        let Some(current) = view.current_bid else {
            let opening = Self::choose_bid(view).unwrap_or(minimum_opening_bid());
            return Ok(Action::Bid(opening));
        };

        if f64::from(current.quantity) > Self::expected_matches(view, current.face) {
            return Ok(Action::Challenge);
        }
        Ok(Self::choose_bid(view).map_or(Action::Challenge, Action::Bid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dudo_engine::view::PlayerSummary;

    fn view(my_dice: Vec<u8>, opponents: u32, current_bid: Option<Bid>) -> PublicState {
        PublicState {
            players: vec![
                PlayerSummary {
                    name: "me".into(),
                    dice_remaining: my_dice.len() as u32,
                    is_me: true,
                },
                PlayerSummary {
                    name: "you".into(),
                    dice_remaining: opponents,
                    is_me: false,
                },
            ],
            current_bid,
            round_number: 1,
            faces: 6,
            wild_ones: true,
            exact_call_enabled: false,
            starting_dice: 5,
            my_dice,
            round_bids: vec![],
            round_resolutions: vec![],
        }
    }

    #[test]
    fn opens_on_the_face_it_holds_most() {
        let ai = ConservativeAgent::new("c");
        let action = ai.decide(&view(vec![5, 5, 2, 3, 1], 5, None)).unwrap();
        assert_eq!(action, Action::bid(1, 5));
    }

    #[test]
    fn challenges_an_implausible_bid() {
        let ai = ConservativeAgent::new("c");
        // one matching 4 of mine plus 5 * 1/3 expected elsewhere is well under 6
        let action = ai
            .decide(&view(vec![4, 2, 3, 5, 6], 5, Some(Bid::new(6, 4))))
            .unwrap();
        assert_eq!(action, Action::Challenge);
    }

    #[test]
    fn raises_a_plausible_bid_on_its_favourite_face() {
        let ai = ConservativeAgent::new("c");
        // two 4s and a wild: 3 + 5/3 expected, so 3 x 4s stands;
        // 6s tie with 4s and the higher face wins
        let action = ai
            .decide(&view(vec![6, 6, 4, 1, 4], 5, Some(Bid::new(3, 4))))
            .unwrap();
        assert_eq!(action, Action::bid(3, 6));
    }

    #[test]
    fn ones_are_counted_without_wilds() {
        let v = view(vec![1, 1, 3], 6, None);
        assert!((ConservativeAgent::expected_matches(&v, 1) - 3.0).abs() < 1e-9);
        assert!((ConservativeAgent::expected_matches(&v, 3) - 5.0).abs() < 1e-9);
    }
}
