use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use log::trace;

use super::GameContext;
use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::model::{GameCommand, GameId, GameOutcome, GamePhase, GameSessionEvent, PlayRecord};
use crate::scheduler::{TimerFlow, TimerHandle};

pub const COUNTDOWN_SECS: u32 = 10;

/// Time-boxed tap counting: `ready → playing → finished`, one point per tap
/// for ten seconds. The countdown tick and tap input share the single logical
/// thread, so the final score is exactly the tap count at the zero tick.
pub struct ReflexCounterEngine {
    phase: GamePhase,
    taps: u32,
    time_left: u32,
    best_score: u32,
    // bumped on reset/destroy; scheduled callbacks from older sessions bail out
    generation: u64,
    countdown: Option<TimerHandle>,
    ctx: GameContext,
    events: EventEmitter<GameSessionEvent>,
    subscription: Option<Unsubscriber<GameCommand>>,
    weak_self: Weak<RefCell<Self>>,
}

impl Destroyable for ReflexCounterEngine {
    fn destroy(&mut self) {
        self.generation += 1;
        if let Some(countdown) = self.countdown.take() {
            countdown.cancel();
        }
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl ReflexCounterEngine {
    pub fn new(
        ctx: GameContext,
        command_observer: EventObserver<GameCommand>,
        events: EventEmitter<GameSessionEvent>,
    ) -> Rc<RefCell<Self>> {
        let best_score = ctx.history.best_score(GameId::ReflexCounter);
        let engine = Rc::new(RefCell::new(Self {
            phase: GamePhase::Ready,
            taps: 0,
            time_left: COUNTDOWN_SECS,
            best_score,
            generation: 0,
            countdown: None,
            ctx,
            events,
            subscription: None,
            weak_self: Weak::new(),
        }));
        engine.borrow_mut().weak_self = Rc::downgrade(&engine);
        ReflexCounterEngine::wire_subscription(engine.clone(), command_observer);
        engine
    }

    fn wire_subscription(
        engine: Rc<RefCell<Self>>,
        command_observer: EventObserver<GameCommand>,
    ) {
        let handler = engine.clone();
        let subscription = command_observer.subscribe(move |command| {
            handler.borrow_mut().handle_command(*command);
        });
        engine.borrow_mut().subscription = Some(subscription);
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn taps(&self) -> u32 {
        self.taps
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    fn handle_command(&mut self, command: GameCommand) {
        trace!(target: "reflex_counter", "Handling command: {:?}", command);
        match command {
            GameCommand::Start => self.start(),
            GameCommand::Tap => self.tap(),
            GameCommand::Reset => self.reset(),
            // no per-index input or early exit in this game
            GameCommand::Select(_) | GameCommand::FinishEarly => (),
        }
    }

    fn start(&mut self) {
        if self.phase != GamePhase::Ready {
            return;
        }
        self.taps = 0;
        self.time_left = COUNTDOWN_SECS;
        self.set_phase(GamePhase::Playing);
        self.events.emit(&GameSessionEvent::ScoreChanged(0));
        self.events
            .emit(&GameSessionEvent::CountdownTick(self.time_left));

        let weak = self.weak_self.clone();
        let generation = self.generation;
        let handle = self.ctx.scheduler.timeout_add(Duration::from_secs(1), move || {
            let Some(engine) = weak.upgrade() else {
                return TimerFlow::Break;
            };
            let mut engine = engine.borrow_mut();
            if engine.generation != generation {
                return TimerFlow::Break;
            }
            engine.countdown_tick()
        });
        self.countdown = Some(handle);
    }

    fn countdown_tick(&mut self) -> TimerFlow {
        if self.phase != GamePhase::Playing {
            return TimerFlow::Break;
        }
        self.time_left = self.time_left.saturating_sub(1);
        self.events
            .emit(&GameSessionEvent::CountdownTick(self.time_left));
        if self.time_left == 0 {
            self.finish();
            TimerFlow::Break
        } else {
            TimerFlow::Continue
        }
    }

    fn tap(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.taps += 1;
        self.events.emit(&GameSessionEvent::ScoreChanged(self.taps));
    }

    fn finish(&mut self) {
        if self.phase == GamePhase::Finished {
            return;
        }
        self.set_phase(GamePhase::Finished);
        if let Some(countdown) = self.countdown.take() {
            countdown.cancel();
        }

        let record = PlayRecord::new(
            GameOutcome::ReflexCounter,
            self.taps,
            self.ctx.auth.user_id(),
        );
        self.ctx.history.append(&record);
        if self.taps > self.best_score {
            self.best_score = self.taps;
            self.events
                .emit(&GameSessionEvent::BestScoreChanged(self.best_score));
        }
        self.events.emit(&GameSessionEvent::Finished(record));
    }

    fn reset(&mut self) {
        self.generation += 1;
        if let Some(countdown) = self.countdown.take() {
            countdown.cancel();
        }
        self.taps = 0;
        self.time_left = COUNTDOWN_SECS;
        self.set_phase(GamePhase::Ready);
        self.events.emit(&GameSessionEvent::ScoreChanged(0));
    }

    fn set_phase(&mut self, phase: GamePhase) {
        self.phase = phase;
        self.events.emit(&GameSessionEvent::PhaseChanged(phase));
    }
}
