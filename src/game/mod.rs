pub mod history_store;
pub mod hub;
pub mod leaderboard;
pub mod mystery_reward;
pub mod reflex_counter;
pub mod reward_timer;
pub mod sequence_memory;

pub use history_store::{HistorySort, HistoryStore};
pub use hub::{GameHub, GameSession};
pub use leaderboard::LeaderboardEngine;
pub use mystery_reward::MysteryRewardEngine;
pub use reflex_counter::ReflexCounterEngine;
pub use reward_timer::{RewardCheck, RewardTimer};
pub use sequence_memory::SequenceMemoryEngine;

use std::rc::Rc;

use crate::auth::AuthService;
use crate::scheduler::Scheduler;

/// Shared collaborators handed to every engine at construction; no engine
/// reaches for ambient globals.
#[derive(Clone)]
pub struct GameContext {
    pub history: Rc<HistoryStore>,
    pub auth: Rc<AuthService>,
    pub scheduler: Scheduler,
}
