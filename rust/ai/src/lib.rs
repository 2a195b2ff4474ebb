//! # dudo-ai: Reference Agents for Liar's Dice
//!
//! Simple opponents that play through the [`Agent`] contract of
//! `dudo-engine`. They see only the [`PublicState`] handed to them and always
//! answer with a legal action, so they are useful for exercising the engine
//! end to end and as sparring partners for real strategies.
//!
//! ## Core Components
//!
//! - [`random`] - Random bidder, seedable for reproducible games
//! - [`conservative`] - Counts its own dice and challenges unlikely bids
//! - [`create_agent`] - Factory by kind name
//!
//! ## Quick Start
//!
//! ```rust
//! use dudo_ai::create_agent;
//!
//! let ai = create_agent("conservative", "carla").unwrap();
//! assert_eq!(ai.name(), "carla");
//! assert!(create_agent("oracle", "x").is_err());
//! ```
//!
//! [`Agent`]: dudo_engine::agent::Agent
//! [`PublicState`]: dudo_engine::view::PublicState

use std::sync::Arc;

use dudo_engine::action::Bid;
use dudo_engine::agent::Agent;
use dudo_engine::rules::legal_bids;
use dudo_engine::view::PublicState;
use thiserror::Error;

pub mod conservative;
pub mod random;

pub use conservative::ConservativeAgent;
pub use random::RandomAgent;

const KINDS: [&str; 2] = ["random", "conservative"];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown agent kind '{kind}' (available: {})", KINDS.join(", "))]
pub struct UnknownAgent {
    pub kind: String,
}

/// Kinds accepted by [`create_agent`].
pub fn available_agents() -> &'static [&'static str] {
    &KINDS
}

/// Builds a reference agent by kind name.
///
/// Random agents created here draw their seed from the OS; use
/// [`RandomAgent::with_seed`] for reproducible play.
///
/// # Errors
///
/// [`UnknownAgent`] when `kind` is not one of [`available_agents`].
pub fn create_agent(kind: &str, name: &str) -> Result<Arc<dyn Agent>, UnknownAgent> {
    match kind {
        "random" => Ok(Arc::new(RandomAgent::new(name))),
        "conservative" => Ok(Arc::new(ConservativeAgent::new(name))),
        other => Err(UnknownAgent {
            kind: other.to_string(),
        }),
    }
}

/// Legal bids for the viewer, capped at the dice in play.
pub(crate) fn bids_for(view: &PublicState) -> Vec<Bid> {
    legal_bids(view.current_bid, view.wild_ones, view.faces, view.total_dice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_knows_every_listed_kind() {
        for kind in available_agents() {
            let agent = create_agent(kind, "p1").unwrap();
            assert_eq!(agent.name(), "p1");
        }
    }

    #[test]
    fn unknown_kind_lists_alternatives() {
        let err = create_agent("baseline", "p1").err().unwrap();
        assert_eq!(err.kind, "baseline");
        let msg = err.to_string();
        assert!(msg.contains("random") && msg.contains("conservative"));
    }
}
