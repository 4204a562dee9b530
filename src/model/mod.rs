mod game_command;
mod game_id;
mod game_phase;
mod game_session_event;
mod history_stats;
mod leaderboard_entry;
mod play_record;
mod prize;
mod symbol;
mod user;

pub use game_command::GameCommand;
pub use game_id::GameId;
pub use game_phase::GamePhase;
pub use game_session_event::GameSessionEvent;
pub use history_stats::HistoryStats;
pub use leaderboard_entry::LeaderboardEntry;
pub use play_record::{GameOutcome, PlayRecord};
pub use prize::{Prize, Rarity, PRIZE_TABLE};
pub use symbol::Symbol;
pub use user::User;
