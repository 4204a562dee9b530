use std::cell::RefCell;
use std::rc::Rc;

use log::info;

use super::{
    GameContext, HistoryStore, LeaderboardEngine, MysteryRewardEngine, ReflexCounterEngine,
    RewardTimer, SequenceMemoryEngine,
};
use crate::auth::AuthService;
use crate::destroyable::Destroyable;
use crate::events::{Channel, EventEmitter, EventObserver};
use crate::model::{GameCommand, GameId, GamePhase, GameSessionEvent};
use crate::scheduler::Scheduler;
use crate::storage::KeyValueStore;

enum SessionEngine {
    ReflexCounter(Rc<RefCell<ReflexCounterEngine>>),
    SequenceMemory(Rc<RefCell<SequenceMemoryEngine>>),
    MysteryReward(Rc<RefCell<MysteryRewardEngine>>),
}

/// One live play session: the engine plus its command/event channels. Dropping
/// a session is not enough to silence it (the engine holds its own command
/// subscription); call `destroy` on navigation away.
pub struct GameSession {
    pub game: GameId,
    pub commands: EventEmitter<GameCommand>,
    pub events: EventObserver<GameSessionEvent>,
    engine: SessionEngine,
}

impl Destroyable for GameSession {
    fn destroy(&mut self) {
        match &self.engine {
            SessionEngine::ReflexCounter(engine) => engine.borrow_mut().destroy(),
            SessionEngine::SequenceMemory(engine) => engine.borrow_mut().destroy(),
            SessionEngine::MysteryReward(engine) => engine.borrow_mut().destroy(),
        }
    }
}

impl GameSession {
    pub fn send(&self, command: GameCommand) {
        self.commands.emit(&command);
    }

    pub fn phase(&self) -> GamePhase {
        match &self.engine {
            SessionEngine::ReflexCounter(engine) => engine.borrow().phase(),
            SessionEngine::SequenceMemory(engine) => engine.borrow().phase(),
            SessionEngine::MysteryReward(engine) => engine.borrow().phase(),
        }
    }

    pub fn score(&self) -> u32 {
        match &self.engine {
            SessionEngine::ReflexCounter(engine) => engine.borrow().taps(),
            SessionEngine::SequenceMemory(engine) => engine.borrow().score(),
            SessionEngine::MysteryReward(engine) => engine.borrow().score(),
        }
    }

    pub fn best_score(&self) -> u32 {
        match &self.engine {
            SessionEngine::ReflexCounter(engine) => engine.borrow().best_score(),
            SessionEngine::SequenceMemory(engine) => engine.borrow().best_score(),
            SessionEngine::MysteryReward(engine) => engine.borrow().best_score(),
        }
    }
}

/// Wires the whole hub over one key-value store: auth, history, leaderboard,
/// reward timer, and a session factory for the three games.
pub struct GameHub {
    ctx: GameContext,
    leaderboard: LeaderboardEngine,
    reward_timer: RewardTimer,
}

impl GameHub {
    pub fn new(store: Rc<dyn KeyValueStore>, scheduler: Scheduler) -> Self {
        let history = Rc::new(HistoryStore::new(store.clone()));
        let auth = Rc::new(AuthService::new(store.clone()));
        auth.ensure_demo_user();
        let leaderboard = LeaderboardEngine::new(history.clone(), GameHub::seed_from_env());
        let reward_timer = RewardTimer::new(store);
        Self {
            ctx: GameContext {
                history,
                auth,
                scheduler,
            },
            leaderboard,
            reward_timer,
        }
    }

    pub fn seed_from_env() -> Option<u64> {
        std::env::var("SEED").ok().and_then(|v| v.parse::<u64>().ok())
    }

    pub fn history(&self) -> &Rc<HistoryStore> {
        &self.ctx.history
    }

    pub fn auth(&self) -> &Rc<AuthService> {
        &self.ctx.auth
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.ctx.scheduler
    }

    pub fn leaderboard(&self) -> &LeaderboardEngine {
        &self.leaderboard
    }

    pub fn reward_timer(&self) -> &RewardTimer {
        &self.reward_timer
    }

    /// Builds a fresh session for `game`. `seed` falls back to the `SEED`
    /// environment variable, then to entropy.
    pub fn start_session(&self, game: GameId, seed: Option<u64>) -> GameSession {
        info!(target: "hub", "Starting {} session", game.slug());
        let seed = seed.or_else(GameHub::seed_from_env);
        let (commands, command_observer) = Channel::new();
        let (event_emitter, events) = Channel::new();
        let engine = match game {
            GameId::ReflexCounter => SessionEngine::ReflexCounter(ReflexCounterEngine::new(
                self.ctx.clone(),
                command_observer,
                event_emitter,
            )),
            GameId::SequenceMemory => SessionEngine::SequenceMemory(SequenceMemoryEngine::new(
                self.ctx.clone(),
                command_observer,
                event_emitter,
                seed,
            )),
            GameId::MysteryReward => SessionEngine::MysteryReward(MysteryRewardEngine::new(
                self.ctx.clone(),
                command_observer,
                event_emitter,
                seed,
            )),
        };
        GameSession {
            game,
            commands,
            events,
            engine,
        }
    }
}
