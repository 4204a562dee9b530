use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, TimestampMilliSeconds};

use crate::storage::keys::REWARD_TIMER_KEY;
use crate::storage::{read_json, write_json, KeyValueStore};

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RewardTimerState {
    #[serde_as(as = "TimestampMilliSeconds<i64>")]
    last_granted: DateTime<Utc>,
}

/// Outcome of one availability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardCheck {
    pub granted: bool,
    /// Time until the next grant, for display. Zero only at the instant of a
    /// grant boundary; a fresh grant restarts the full interval.
    pub remaining: Duration,
    pub next_available_at: DateTime<Utc>,
}

/// Recurring once-per-interval availability window, independent of game
/// outcomes. Only the last-granted timestamp is persisted; a missing or
/// corrupt entry reads as "never granted".
pub struct RewardTimer {
    store: Rc<dyn KeyValueStore>,
}

impl RewardTimer {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn last_granted(&self) -> Option<DateTime<Utc>> {
        read_json::<RewardTimerState>(self.store.as_ref(), REWARD_TIMER_KEY)
            .map(|state| state.last_granted)
    }

    /// Grants when a full interval has elapsed since the last grant (or when
    /// none was ever recorded), persisting `now` as the new anchor. Repeated
    /// checks within one interval never grant twice.
    pub fn check_availability(&self, now: DateTime<Utc>, interval: Duration) -> RewardCheck {
        let due = match self.last_granted() {
            Some(last) => match (now - last).to_std() {
                Ok(elapsed) => elapsed >= interval,
                // a future-dated anchor means the clock moved; hold the grant
                Err(_) => false,
            },
            None => true,
        };

        if due {
            write_json(
                self.store.as_ref(),
                REWARD_TIMER_KEY,
                &RewardTimerState { last_granted: now },
            );
            info!(target: "reward_timer", "Reward granted at {}", now);
            return RewardCheck {
                granted: true,
                remaining: interval,
                next_available_at: now + interval,
            };
        }

        // due == false implies last_granted is present
        let last = self.last_granted().unwrap_or(now);
        let next_available_at = last + interval;
        let remaining = (next_available_at - now).to_std().unwrap_or_default();
        RewardCheck {
            granted: false,
            remaining,
            next_available_at,
        }
    }
}
