use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use log::trace;

/// Returned by a repeating timer callback to keep or drop the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerFlow {
    Continue,
    Break,
}

type TimerCallback = Box<dyn FnMut() -> TimerFlow>;

struct Entry {
    id: u64,
    due: Duration,
    interval: Duration,
    callback: TimerCallback,
}

struct SchedulerInner {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry>,
    // id of the entry whose callback is currently running, so a cancel from
    // inside the callback is honored instead of being resurrected on reinsert
    running: Option<u64>,
    running_canceled: bool,
}

/// Cooperative timer queue for the single logical thread the whole hub runs
/// on. Nothing fires on its own: the host loop calls `advance` with elapsed
/// wall time (or a test steps it), and due callbacks run in due order.
pub struct Scheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl Clone for Scheduler {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Handle for a scheduled callback; `cancel` guarantees the callback will not
/// fire afterwards.
pub struct TimerHandle {
    id: u64,
    inner: Weak<RefCell<SchedulerInner>>,
}

impl TimerHandle {
    pub fn cancel(&self) {
        if let Some(inner) = self.inner.upgrade() {
            let mut inner = inner.borrow_mut();
            if inner.running == Some(self.id) {
                inner.running_canceled = true;
            } else {
                let id = self.id;
                inner.entries.retain(|entry| entry.id != id);
            }
        }
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                now: Duration::ZERO,
                next_id: 0,
                entries: Vec::new(),
                running: None,
                running_canceled: false,
            })),
        }
    }

    /// Time observed so far, as accumulated by `advance`.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Schedules `callback` every `interval`, first firing one interval from
    /// now, until it returns `TimerFlow::Break` or the handle is canceled.
    pub fn timeout_add<F>(&self, interval: Duration, callback: F) -> TimerHandle
    where
        F: FnMut() -> TimerFlow + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let due = inner.now + interval;
        inner.entries.push(Entry {
            id,
            due,
            interval,
            callback: Box::new(callback),
        });
        trace!(target: "scheduler", "Scheduled timer {} due at {:?}", id, due);
        TimerHandle {
            id,
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// One-shot variant of `timeout_add`.
    pub fn timeout_add_once<F>(&self, delay: Duration, callback: F) -> TimerHandle
    where
        F: FnOnce() + 'static,
    {
        let mut callback = Some(callback);
        self.timeout_add(delay, move || {
            if let Some(callback) = callback.take() {
                callback();
            }
            TimerFlow::Break
        })
    }

    /// Moves time forward by `elapsed`, firing every due callback in due
    /// order. Callbacks may schedule or cancel timers; a callback scheduling
    /// from within fire time sees `now` as its own due instant.
    pub fn advance(&self, elapsed: Duration) {
        let target = self.inner.borrow().now + elapsed;
        loop {
            let next = {
                let mut inner = self.inner.borrow_mut();
                let position = inner
                    .entries
                    .iter()
                    .enumerate()
                    .filter(|(_, entry)| entry.due <= target)
                    .min_by_key(|(_, entry)| (entry.due, entry.id))
                    .map(|(position, _)| position);
                match position {
                    Some(position) => {
                        let entry = inner.entries.remove(position);
                        inner.now = inner.now.max(entry.due);
                        inner.running = Some(entry.id);
                        inner.running_canceled = false;
                        Some(entry)
                    }
                    None => None,
                }
            };
            let Some(mut entry) = next else {
                break;
            };
            let flow = (entry.callback)();
            let mut inner = self.inner.borrow_mut();
            let canceled = inner.running_canceled;
            inner.running = None;
            inner.running_canceled = false;
            let repeats = flow == TimerFlow::Continue && entry.interval > Duration::ZERO;
            if repeats && !canceled {
                entry.due += entry.interval;
                inner.entries.push(entry);
            }
        }
        self.inner.borrow_mut().now = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_one_shot_fires_once_at_delay() {
        let scheduler = Scheduler::new();
        let fired = Rc::new(Cell::new(0));
        let fired_clone = fired.clone();
        let _handle = scheduler.timeout_add_once(Duration::from_secs(2), move || {
            fired_clone.set(fired_clone.get() + 1);
        });

        scheduler.advance(Duration::from_secs(1));
        assert_eq!(fired.get(), 0);
        scheduler.advance(Duration::from_secs(1));
        assert_eq!(fired.get(), 1);
        scheduler.advance(Duration::from_secs(10));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_repeating_until_break() {
        let scheduler = Scheduler::new();
        let ticks = Rc::new(Cell::new(0));
        let ticks_clone = ticks.clone();
        let _handle = scheduler.timeout_add(Duration::from_secs(1), move || {
            ticks_clone.set(ticks_clone.get() + 1);
            if ticks_clone.get() >= 3 {
                TimerFlow::Break
            } else {
                TimerFlow::Continue
            }
        });

        scheduler.advance(Duration::from_secs(10));
        assert_eq!(ticks.get(), 3);
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let scheduler = Scheduler::new();
        let fired = Rc::new(Cell::new(false));
        let fired_clone = fired.clone();
        let handle = scheduler.timeout_add_once(Duration::from_secs(1), move || {
            fired_clone.set(true);
        });

        handle.cancel();
        scheduler.advance(Duration::from_secs(5));
        assert!(!fired.get());
    }

    #[test]
    fn test_fires_in_due_order() {
        let scheduler = Scheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let order_clone = order.clone();
        let _late = scheduler.timeout_add_once(Duration::from_secs(3), move || {
            order_clone.borrow_mut().push("late");
        });
        let order_clone = order.clone();
        let _early = scheduler.timeout_add_once(Duration::from_secs(1), move || {
            order_clone.borrow_mut().push("early");
        });

        scheduler.advance(Duration::from_secs(5));
        assert_eq!(*order.borrow(), vec!["early", "late"]);
    }

    #[test]
    fn test_callback_may_schedule_followup() {
        let scheduler = Scheduler::new();
        let fired = Rc::new(Cell::new(0));

        let fired_clone = fired.clone();
        let scheduler_clone = scheduler.clone();
        let _handle = scheduler.timeout_add_once(Duration::from_secs(1), move || {
            fired_clone.set(fired_clone.get() + 1);
            let fired_inner = fired_clone.clone();
            scheduler_clone.timeout_add_once(Duration::from_secs(1), move || {
                fired_inner.set(fired_inner.get() + 1);
            });
        });

        // the follow-up is due at t=2, within the same advance window
        scheduler.advance(Duration::from_secs(2));
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn test_cancel_from_own_callback_stops_repeat() {
        let scheduler = Scheduler::new();
        let ticks = Rc::new(Cell::new(0));
        let handle: Rc<RefCell<Option<TimerHandle>>> = Rc::new(RefCell::new(None));

        let ticks_clone = ticks.clone();
        let handle_clone = handle.clone();
        let timer = scheduler.timeout_add(Duration::from_secs(1), move || {
            ticks_clone.set(ticks_clone.get() + 1);
            if let Some(handle) = handle_clone.borrow().as_ref() {
                handle.cancel();
            }
            // Continue would normally re-arm; the cancel must win
            TimerFlow::Continue
        });
        *handle.borrow_mut() = Some(timer);

        scheduler.advance(Duration::from_secs(10));
        assert_eq!(ticks.get(), 1);
    }

    #[test]
    fn test_now_tracks_advance() {
        let scheduler = Scheduler::new();
        assert_eq!(scheduler.now(), Duration::ZERO);
        scheduler.advance(Duration::from_millis(1500));
        assert_eq!(scheduler.now(), Duration::from_millis(1500));
    }
}
