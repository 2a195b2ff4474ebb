use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dudo_engine::action::Action;
use dudo_engine::agent::{Agent, AgentError};
use dudo_engine::config::EngineConfig;
use dudo_engine::dice::ScriptedDice;
use dudo_engine::engine::Engine;
use dudo_engine::resolve::RoundResolution;
use dudo_engine::view::PublicState;

/// Plays a fixed list of actions, then challenges (or opens with 1 x 2s).
/// Remembers every view it was shown and the post-game notification.
#[allow(dead_code)]
pub struct ScriptedAgent {
    name: String,
    script: Mutex<VecDeque<Action>>,
    pub views: Mutex<Vec<PublicState>>,
    pub finished: Mutex<Option<(String, usize)>>,
}

#[allow(dead_code)]
impl ScriptedAgent {
    pub fn new(name: &str, script: Vec<Action>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            script: Mutex::new(script.into()),
            views: Mutex::new(Vec::new()),
            finished: Mutex::new(None),
        })
    }

    pub fn views(&self) -> Vec<PublicState> {
        self.views.lock().unwrap().clone()
    }

    pub fn finished(&self) -> Option<(String, usize)> {
        self.finished.lock().unwrap().clone()
    }
}

impl Agent for ScriptedAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&self, view: &PublicState) -> Result<Action, AgentError> {
        self.views.lock().unwrap().push(view.clone());
        let next = self.script.lock().unwrap().pop_front();
        Ok(next.unwrap_or(match view.current_bid {
            Some(_) => Action::Challenge,
            None => Action::bid(1, 2),
        }))
    }

    fn on_game_finished(
        &self,
        winner: &str,
        history: &[RoundResolution],
    ) -> Result<(), AgentError> {
        *self.finished.lock().unwrap() = Some((winner.to_string(), history.len()));
        Ok(())
    }
}

/// Sleeps past any reasonable budget before answering.
#[allow(dead_code)]
pub struct SlowAgent {
    pub name: String,
    pub delay: Duration,
    pub answer: Action,
}

impl Agent for SlowAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&self, _view: &PublicState) -> Result<Action, AgentError> {
        std::thread::sleep(self.delay);
        Ok(self.answer)
    }
}

/// Fails every decision in a configurable way.
#[allow(dead_code)]
pub enum Broken {
    Errors,
    Panics,
}

#[allow(dead_code)]
pub struct BrokenAgent {
    pub name: String,
    pub mode: Broken,
}

impl Agent for BrokenAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&self, _view: &PublicState) -> Result<Action, AgentError> {
        match self.mode {
            Broken::Errors => Err(AgentError::Internal("no strategy".into())),
            Broken::Panics => panic!("agent blew up"),
        }
    }

    fn on_game_finished(&self, _winner: &str, _history: &[RoundResolution]) -> Result<(), AgentError> {
        Err(AgentError::Internal("cannot learn".into()))
    }
}

#[allow(dead_code)]
pub fn config(starting_dice: u32, wild_ones: bool, exact: bool) -> EngineConfig {
    EngineConfig {
        starting_dice,
        wild_ones,
        exact_call_enabled: exact,
        time_limit_seconds: 0.5,
        seed: Some(11),
        ..EngineConfig::default()
    }
}

/// Engine seating `agents` and rolling the given hands, one entry per round.
#[allow(dead_code)]
pub fn scripted_engine(
    cfg: EngineConfig,
    agents: Vec<Arc<dyn Agent>>,
    rounds: Vec<Vec<Vec<u8>>>,
) -> Engine {
    let mut engine = Engine::new(cfg)
        .expect("valid config")
        .with_roller(Box::new(ScriptedDice::new(rounds)));
    engine.add_players(agents);
    engine
}
