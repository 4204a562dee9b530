//! Well-known keys in the backing store. Names keep the localStorage spelling
//! of earlier hub builds so existing data remains readable.

pub const USERS_KEY: &str = "gameHub_users";
pub const SESSION_USER_KEY: &str = "gameHub_user";
pub const HISTORY_KEY: &str = "gameHub_history";
pub const REWARD_TIMER_KEY: &str = "gameHub_rewardTimer";
pub const BEST_SCORES_KEY: &str = "gameHub_bestScores";
