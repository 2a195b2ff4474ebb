//! The contract between the engine and decision-making agents.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::oneshot;

use crate::action::Action;
use crate::errors::DecisionFault;
use crate::resolve::RoundResolution;
use crate::view::PublicState;

/// Failure reported by an agent implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentError {
    #[error("internal error: {0}")]
    Internal(String),
    #[error("no decision available")]
    NoDecision,
}

/// A player at the table.
///
/// Implementations only ever see a [`PublicState`]. They may be slow, fail or
/// panic; the engine bounds every call and substitutes a legal fallback.
///
/// # Example Implementation
///
/// ```rust
/// use dudo_engine::action::Action;
/// use dudo_engine::agent::{Agent, AgentError};
/// use dudo_engine::view::PublicState;
///
/// struct AlwaysChallenge;
///
/// impl Agent for AlwaysChallenge {
///     fn name(&self) -> &str {
///         "always-challenge"
///     }
///
///     fn decide(&self, view: &PublicState) -> Result<Action, AgentError> {
///         Ok(match view.current_bid {
///             Some(_) => Action::Challenge,
///             None => Action::bid(1, 2),
///         })
///     }
/// }
/// ```
pub trait Agent: Send + Sync {
    /// Unique name at the table.
    fn name(&self) -> &str;

    /// Choose the next action.
    fn decide(&self, view: &PublicState) -> Result<Action, AgentError>;

    /// Called once when the game ends. Best effort: errors are logged only.
    fn on_game_finished(
        &self,
        _winner: &str,
        _history: &[RoundResolution],
    ) -> Result<(), AgentError> {
        Ok(())
    }
}

/// Runs `decide` on a detached thread under `budget`.
///
/// A result arriving after the budget is discarded. The thread cannot be
/// interrupted; it finishes on its own and nothing waits for it, so a stuck
/// agent never holds up the game or the runtime's shutdown.
pub async fn decide_within(
    agent: Arc<dyn Agent>,
    view: PublicState,
    budget: Duration,
) -> Result<Action, DecisionFault> {
    run_bounded(budget, move || agent.decide(&view))
        .await?
        .map_err(DecisionFault::Agent)
}

/// Runs the post-game hook the same way as [`decide_within`].
pub async fn notify_finished_within(
    agent: Arc<dyn Agent>,
    winner: String,
    history: Arc<[RoundResolution]>,
    budget: Duration,
) -> Result<(), DecisionFault> {
    run_bounded(budget, move || agent.on_game_finished(&winner, &history))
        .await?
        .map_err(DecisionFault::Agent)
}

async fn run_bounded<T, F>(budget: Duration, call: F) -> Result<T, DecisionFault>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    thread::Builder::new()
        .name("dudo-agent".into())
        .spawn(move || {
            // the receiver is gone once the budget has passed
            let _ = tx.send(catch_unwind(AssertUnwindSafe(call)));
        })
        .map_err(|err| {
            tracing::warn!(error = %err, "could not start agent thread");
            DecisionFault::Cancelled
        })?;

    match tokio::time::timeout(budget, rx).await {
        Err(_) => Err(DecisionFault::Timeout(budget)),
        Ok(Err(_)) => Err(DecisionFault::Cancelled),
        Ok(Ok(Err(_))) => Err(DecisionFault::Panicked),
        Ok(Ok(Ok(value))) => Ok(value),
    }
}
