use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::action::{Action, CallKind};
use crate::agent::{self, Agent};
use crate::config::EngineConfig;
use crate::dice::{DiceCup, DiceRoller};
use crate::errors::{ConfigError, DecisionFault, GameError};
use crate::events::{EventBus, GameEvent, SeatDice};
use crate::game::{GameState, Phase};
use crate::resolve::{self, BidRecord, RoundCall, RoundResolution};
use crate::rules;
use crate::view;

/// Narration: `info` when the caller asked for a verbose game, `debug` otherwise.
macro_rules! narrate {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+);
        } else {
            tracing::debug!($($arg)+);
        }
    };
}

/// Result of a completed game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub winner: String,
    pub rounds_played: u32,
    pub resolutions: Vec<RoundResolution>,
    /// RFC3339 time the last round was resolved
    pub finished_at: String,
}

/// Drives a game of Liar's Dice between registered agents.
///
/// Owns the hidden [`GameState`]; agents only see [`view::PublicState`]
/// projections. Every agent call is bounded by the configured time limit and
/// any unusable answer is replaced by [`rules::fallback_action`].
///
/// Agent calls run on their own threads and are awaited with tokio timers, so
/// the game must be played inside a tokio runtime with time enabled.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use dudo_engine::action::Action;
/// use dudo_engine::agent::{Agent, AgentError};
/// use dudo_engine::config::EngineConfig;
/// use dudo_engine::engine::Engine;
/// use dudo_engine::view::PublicState;
///
/// struct Opener(&'static str);
///
/// impl Agent for Opener {
///     fn name(&self) -> &str {
///         self.0
///     }
///     fn decide(&self, view: &PublicState) -> Result<Action, AgentError> {
///         Ok(match view.current_bid {
///             None => Action::bid(1, 6),
///             Some(_) => Action::Challenge,
///         })
///     }
/// }
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let config = EngineConfig { starting_dice: 2, seed: Some(3), ..EngineConfig::default() };
/// let mut engine = Engine::new(config).unwrap();
/// engine.add_players(vec![Arc::new(Opener("ana")), Arc::new(Opener("bo"))]);
/// let outcome = engine.play_game(false).await.unwrap();
/// assert!(outcome.winner == "ana" || outcome.winner == "bo");
/// # });
/// ```
pub struct Engine {
    config: EngineConfig,
    turn_budget: Duration,
    hook_budget: Duration,
    roller: Box<dyn DiceRoller>,
    agents: Vec<Arc<dyn Agent>>,
    state: Option<GameState>,
    events: EventBus,
}

impl Engine {
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] if the configuration is unusable.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let (turn_budget, hook_budget) = config.budgets()?;
        let roller = Box::new(DiceCup::new(config.seed));
        Ok(Self {
            config,
            turn_budget,
            hook_budget,
            roller,
            agents: Vec::new(),
            state: None,
            events: EventBus::new(),
        })
    }

    /// Replaces the dice source, e.g. with [`crate::dice::ScriptedDice`].
    pub fn with_roller(mut self, roller: Box<dyn DiceRoller>) -> Self {
        self.roller = roller;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Seats the agents in turn order, replacing any earlier table.
    pub fn add_players(&mut self, agents: Vec<Arc<dyn Agent>>) {
        self.agents = agents;
        self.state = None;
    }

    pub fn register_listener<F>(&mut self, listener: F)
    where
        F: Fn(&GameEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(Box::new(listener));
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Resets the table: everyone gets `starting_dice`, round 1, seat 0 opens.
    ///
    /// # Errors
    ///
    /// [`GameError::NotEnoughPlayers`] or [`GameError::DuplicatePlayer`].
    pub fn start_new_game(&mut self) -> Result<(), GameError> {
        if self.agents.len() < 2 {
            return Err(GameError::NotEnoughPlayers {
                count: self.agents.len(),
            });
        }
        let mut seen = HashSet::new();
        let names: Vec<String> = self.agents.iter().map(|a| a.name().to_string()).collect();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(GameError::DuplicatePlayer(name.clone()));
            }
        }
        self.state = Some(GameState::new(&names, self.config.clone()));
        Ok(())
    }

    /// Plays until one player has dice left, then runs every post-game hook.
    pub async fn play_game(&mut self, verbose: bool) -> Result<GameOutcome, GameError> {
        self.start_new_game()?;
        loop {
            self.play_round(verbose).await?;
            if let Some(Phase::GameOver { .. }) = self.state.as_ref().map(GameState::phase) {
                break;
            }
        }

        let state = self.state.as_ref().ok_or(GameError::NoGameInProgress)?;
        let Phase::GameOver { winner } = state.phase() else {
            return Err(GameError::NoGameInProgress);
        };
        let winner = state.players()[winner].name().to_string();
        let resolutions = state.resolution_history().to_vec();
        let rounds_played = resolutions.len() as u32;

        narrate!(verbose, winner = %winner, rounds = rounds_played, "game over");
        self.events.emit(&GameEvent::GameFinished {
            winner: winner.clone(),
            rounds: rounds_played,
        });
        self.notify_agents(&winner, &resolutions).await;

        Ok(GameOutcome {
            winner,
            rounds_played,
            resolutions,
            finished_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        })
    }

    /// Rolls fresh dice and plays turns until a call ends the round.
    ///
    /// # Errors
    ///
    /// [`GameError::NoGameInProgress`] before [`Engine::start_new_game`],
    /// [`GameError::GameAlreadyOver`] once a winner is known.
    pub async fn play_round(&mut self, verbose: bool) -> Result<RoundResolution, GameError> {
        self.begin_round(verbose)?;
        loop {
            let state = self.state.as_ref().ok_or(GameError::NoGameInProgress)?;
            match state.phase() {
                Phase::AwaitingAction { seat } => self.take_turn(seat, verbose).await?,
                Phase::RoundResolving { caller, call } => {
                    return self.finish_round(caller, call, verbose);
                }
                Phase::GameOver { .. } => return Err(GameError::GameAlreadyOver),
            }
        }
    }

    fn state_mut(&mut self) -> Result<&mut GameState, GameError> {
        self.state.as_mut().ok_or(GameError::NoGameInProgress)
    }

    fn begin_round(&mut self, verbose: bool) -> Result<(), GameError> {
        let faces = self.config.faces;
        let state = self.state.as_mut().ok_or(GameError::NoGameInProgress)?;
        if let Phase::GameOver { .. } = state.phase {
            return Err(GameError::GameAlreadyOver);
        }
        let counts: Vec<u32> = state.players.iter().map(|p| p.dice_count()).collect();
        let hands = self.roller.roll_round(&counts, faces);
        for (player, hand) in state.players.iter_mut().zip(hands) {
            player.set_dice(hand);
        }
        state.current_bid = None;

        let players: Vec<SeatDice> = state
            .players
            .iter()
            .map(|p| SeatDice {
                name: p.name().to_string(),
                dice_remaining: p.dice_count(),
            })
            .collect();
        let total_dice = state.total_dice_in_play();
        let round = state.round_number;
        narrate!(verbose, round, total_dice, "round started");
        self.events.emit(&GameEvent::RoundStarted {
            round,
            total_dice,
            players,
        });
        Ok(())
    }

    async fn take_turn(&mut self, seat: usize, verbose: bool) -> Result<(), GameError> {
        let (view, ctx, round, name) = {
            let state = self.state.as_ref().ok_or(GameError::NoGameInProgress)?;
            (
                view::project(state, seat),
                state.rule_context(),
                state.round_number(),
                state.players()[seat].name().to_string(),
            )
        };
        let agent = Arc::clone(&self.agents[seat]);

        let proposed = agent::decide_within(agent, view, self.turn_budget).await;
        let action = match proposed.and_then(|a| {
            rules::check_action(&ctx, &a)
                .map(|()| a)
                .map_err(DecisionFault::Illegal)
        }) {
            Ok(action) => action,
            Err(fault) => {
                let action = rules::fallback_action(ctx.current_bid);
                tracing::warn!(
                    player = %name,
                    round,
                    reason = %fault,
                    fallback = %action,
                    "forcing fallback action"
                );
                self.events.emit(&GameEvent::FallbackForced {
                    round,
                    player: name.clone(),
                    reason: fault.kind().to_string(),
                    action,
                });
                action
            }
        };
        assert!(
            rules::check_action(&ctx, &action).is_ok(),
            "fallback {action} must be legal"
        );

        let state = self.state_mut()?;
        match action {
            Action::Bid(bid) => {
                state.current_bid = Some(bid);
                state.bid_history.push(BidRecord {
                    player: name.clone(),
                    bid,
                    round_number: round,
                });
                let next = state
                    .next_active_seat(seat)
                    .ok_or(GameError::NoGameInProgress)?;
                state.phase = Phase::AwaitingAction { seat: next };
                narrate!(verbose, player = %name, bid = %bid, "bid");
                self.events.emit(&GameEvent::BidPlaced {
                    round,
                    player: name,
                    bid,
                });
            }
            Action::Challenge => Self::enter_call(state, seat, CallKind::Challenge, &name, verbose),
            Action::Exact => Self::enter_call(state, seat, CallKind::Exact, &name, verbose),
        }
        Ok(())
    }

    fn enter_call(state: &mut GameState, seat: usize, call: CallKind, name: &str, verbose: bool) {
        narrate!(verbose, player = %name, call = %call, "call");
        state.phase = Phase::RoundResolving { caller: seat, call };
    }

    fn finish_round(
        &mut self,
        caller: usize,
        call: CallKind,
        verbose: bool,
    ) -> Result<RoundResolution, GameError> {
        let state = self.state.as_mut().ok_or(GameError::NoGameInProgress)?;
        let round_bids = state.round_bids().to_vec();
        let last = round_bids.last().ok_or(GameError::NoGameInProgress)?;
        let final_bid = last.bid;
        let bidder_name = last.player.clone();
        let caller_name = state.players[caller].name().to_string();
        let revealed: BTreeMap<String, Vec<u8>> = state
            .players
            .iter()
            .filter(|p| !p.is_eliminated())
            .map(|p| (p.name().to_string(), p.dice().to_vec()))
            .collect();

        let resolution = resolve::resolve(
            state.round_number,
            round_bids,
            revealed,
            &RoundCall {
                kind: call,
                final_bid,
                caller: &caller_name,
                bidder: &bidder_name,
            },
            state.config.wild_ones,
        );

        let loser = state
            .seat_of(&resolution.loser)
            .ok_or(GameError::NoGameInProgress)?;
        state.players[loser].lose_die();
        if resolution.resolver_gains_die() {
            let cap = state.config.starting_dice;
            state.players[caller].gain_die(cap);
        }
        state.assert_dice_invariants();
        state.resolution_history.push(resolution.clone());
        state.current_bid = None;
        state.round_number += 1;

        narrate!(
            verbose,
            round = resolution.round_number,
            bid = %resolution.final_bid,
            actual = resolution.actual_count,
            winner = %resolution.winner,
            loser = %resolution.loser,
            "round resolved"
        );
        let eliminated = state.players[loser].is_eliminated();
        state.phase = match state.sole_survivor() {
            Some(winner) => Phase::GameOver { winner },
            None => Phase::AwaitingAction {
                seat: state
                    .seat_or_next_active(loser)
                    .ok_or(GameError::NoGameInProgress)?,
            },
        };

        self.events.emit(&GameEvent::RoundResolved {
            resolution: resolution.clone(),
        });
        if eliminated {
            narrate!(verbose, player = %resolution.loser, "player eliminated");
            self.events.emit(&GameEvent::PlayerEliminated {
                round: resolution.round_number,
                player: resolution.loser.clone(),
            });
        }
        Ok(resolution)
    }

    async fn notify_agents(&self, winner: &str, history: &[RoundResolution]) {
        let history: Arc<[RoundResolution]> = history.into();
        let budget = self.hook_budget;
        for agent in &self.agents {
            let name = agent.name().to_string();
            let result = agent::notify_finished_within(
                Arc::clone(agent),
                winner.to_string(),
                Arc::clone(&history),
                budget,
            )
            .await;
            if let Err(fault) = result {
                tracing::warn!(player = %name, reason = %fault, "post-game hook failed");
            }
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("players", &self.agents.len())
            .field("state", &self.state)
            .field("events", &self.events)
            .finish()
    }
}
