//! # dudo-engine: Liar's Dice Rules Engine
//!
//! Authoritative rules engine for Liar's Dice (Perudo) with any number of
//! players. Keeps every cup hidden, shows each agent only its own dice, checks
//! bids under the optional wild-ones rule, resolves challenges and exact calls,
//! and eliminates players until one is left.
//!
//! ## Core Modules
//!
//! - [`action`] - Bid and action value types
//! - [`rules`] - Bid legality (wild-ones arithmetic) and fallback moves
//! - [`resolve`] - Counting revealed dice and deciding a call
//! - [`view`] - Per-player public projection of the hidden state
//! - [`game`] - Authoritative game state and driver phases
//! - [`engine`] - Turn/round/game driver with bounded agent calls
//! - [`agent`] - The agent contract
//! - [`dice`] - Seeded and scripted dice rolling
//! - [`config`] - Engine configuration (defaults, TOML, environment)
//! - [`events`] / [`logger`] - Game events and their JSONL sink
//! - [`errors`] - Error types
//!
//! ## Quick Start
//!
//! ```rust
//! use dudo_engine::action::Bid;
//! use dudo_engine::rules::is_legal_bid;
//! use dudo_engine::resolve::count_matching;
//!
//! // Moving onto ones halves the quantity (rounded up)
//! assert!(is_legal_bid(Some(Bid::new(5, 3)), Bid::new(3, 1), true, 6));
//!
//! // Ones are wild for every other face
//! assert_eq!(count_matching([1, 1, 4, 4, 6].iter(), 4, true), 4);
//! ```
//!
//! ## Deterministic Gameplay
//!
//! Dice come from a seeded ChaCha20 generator when `EngineConfig::seed` is
//! set, so a game between deterministic agents replays exactly.

pub mod action;
pub mod agent;
pub mod config;
pub mod dice;
pub mod engine;
pub mod errors;
pub mod events;
pub mod game;
pub mod logger;
pub mod player;
pub mod resolve;
pub mod rules;
pub mod view;
