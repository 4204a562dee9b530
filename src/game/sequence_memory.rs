use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use super::GameContext;
use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::model::{
    GameCommand, GameId, GameOutcome, GamePhase, GameSessionEvent, PlayRecord, Symbol,
};
use crate::scheduler::TimerHandle;

pub const MAX_LEVEL: u8 = 5;

const SHOW_LEAD_IN: Duration = Duration::from_millis(1000);
const SHOW_ON: Duration = Duration::from_millis(1000);
const SHOW_GAP: Duration = Duration::from_millis(500);

fn sequence_len_for(level: u8) -> usize {
    2 + level as usize
}

/// Escalating simon-says: `ready → showing ⇄ playing → finished` across up to
/// five levels. The engine owns the authoritative sequence; playback timers
/// chain through the scheduler and are invalidated by generation on any exit.
pub struct SequenceMemoryEngine {
    phase: GamePhase,
    level: u8,
    sequence: Vec<Symbol>,
    input: Vec<Symbol>,
    score: u32,
    best_score: u32,
    // two exit paths (mismatch, finish-early) share this emission guard
    finished: bool,
    generation: u64,
    playback: Option<TimerHandle>,
    rng: StdRng,
    ctx: GameContext,
    events: EventEmitter<GameSessionEvent>,
    subscription: Option<Unsubscriber<GameCommand>>,
    weak_self: Weak<RefCell<Self>>,
}

impl Destroyable for SequenceMemoryEngine {
    fn destroy(&mut self) {
        self.generation += 1;
        if let Some(playback) = self.playback.take() {
            playback.cancel();
        }
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl SequenceMemoryEngine {
    pub fn new(
        ctx: GameContext,
        command_observer: EventObserver<GameCommand>,
        events: EventEmitter<GameSessionEvent>,
        seed: Option<u64>,
    ) -> Rc<RefCell<Self>> {
        let best_score = ctx.history.best_score(GameId::SequenceMemory);
        let seed = seed.unwrap_or(rand::rng().next_u64());
        let engine = Rc::new(RefCell::new(Self {
            phase: GamePhase::Ready,
            level: 1,
            sequence: Vec::new(),
            input: Vec::new(),
            score: 0,
            best_score,
            finished: false,
            generation: 0,
            playback: None,
            rng: StdRng::seed_from_u64(seed),
            ctx,
            events,
            subscription: None,
            weak_self: Weak::new(),
        }));
        engine.borrow_mut().weak_self = Rc::downgrade(&engine);
        SequenceMemoryEngine::wire_subscription(engine.clone(), command_observer);
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

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    /// The authoritative target sequence for the current level.
    pub fn sequence(&self) -> &[Symbol] {
        &self.sequence
    }

    /// Player progress within the current level.
    pub fn input_len(&self) -> usize {
        self.input.len()
    }

    fn handle_command(&mut self, command: GameCommand) {
        trace!(target: "sequence_memory", "Handling command: {:?}", command);
        match command {
            GameCommand::Start => self.start(),
            GameCommand::Select(index) => self.select(index),
            GameCommand::FinishEarly => self.finish_early(),
            GameCommand::Reset => self.reset(),
            GameCommand::Tap => (),
        }
    }

    fn start(&mut self) {
        if self.phase != GamePhase::Ready {
            return;
        }
        self.level = 1;
        self.score = 0;
        self.input.clear();
        self.finished = false;
        self.sequence = self.generate_sequence(sequence_len_for(1));
        self.events.emit(&GameSessionEvent::ScoreChanged(0));
        self.events.emit(&GameSessionEvent::LevelChanged(1));
        self.begin_showing();
    }

    fn generate_sequence(&mut self, len: usize) -> Vec<Symbol> {
        (0..len)
            .map(|_| Symbol::ALL[self.rng.random_range(0..Symbol::ALL.len())])
            .collect()
    }

    fn begin_showing(&mut self) {
        self.set_phase(GamePhase::Showing);
        self.schedule_step(0, SHOW_LEAD_IN);
    }

    fn schedule_step(&mut self, step: usize, delay: Duration) {
        let weak = self.weak_self.clone();
        let generation = self.generation;
        let handle = self.ctx.scheduler.timeout_add_once(delay, move || {
            let Some(engine) = weak.upgrade() else {
                return;
            };
            let mut engine = engine.borrow_mut();
            if engine.generation != generation {
                return;
            }
            engine.playback_step(step);
        });
        self.playback = Some(handle);
    }

    // steps alternate highlight-on (even, element step/2) and highlight-off
    // (odd); one past the last off-step hands control to the player
    fn playback_step(&mut self, step: usize) {
        if self.phase != GamePhase::Showing {
            return;
        }
        let element = step / 2;
        if element >= self.sequence.len() {
            self.playback = None;
            self.set_phase(GamePhase::Playing);
            return;
        }
        if step % 2 == 0 {
            self.events
                .emit(&GameSessionEvent::SequenceStep(Some(self.sequence[element])));
            self.schedule_step(step + 1, SHOW_ON);
        } else {
            self.events.emit(&GameSessionEvent::SequenceStep(None));
            self.schedule_step(step + 1, SHOW_GAP);
        }
    }

    fn select(&mut self, index: usize) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let Some(symbol) = Symbol::from_index(index) else {
            return;
        };
        let position = self.input.len();
        self.input.push(symbol);

        if self.sequence[position] != symbol {
            // the partial level earns nothing
            self.finish();
            return;
        }

        if self.input.len() == self.sequence.len() {
            self.score += u32::from(self.level) * 10 + self.sequence.len() as u32 * 5;
            self.events.emit(&GameSessionEvent::ScoreChanged(self.score));
            self.level += 1;
            if self.level > MAX_LEVEL {
                self.finish();
            } else {
                self.events.emit(&GameSessionEvent::LevelChanged(self.level));
                self.sequence = self.generate_sequence(sequence_len_for(self.level));
                self.input.clear();
                self.begin_showing();
            }
        }
    }

    fn finish_early(&mut self) {
        if self.phase == GamePhase::Playing || self.phase == GamePhase::Showing {
            self.finish();
        }
    }

    fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.generation += 1;
        if let Some(playback) = self.playback.take() {
            playback.cancel();
        }
        self.set_phase(GamePhase::Finished);

        let level_reached = self.level.min(MAX_LEVEL);
        let record = PlayRecord::new(
            GameOutcome::SequenceMemory {
                level: level_reached,
            },
            self.score,
            self.ctx.auth.user_id(),
        );
        self.ctx.history.append(&record);
        if self.score > self.best_score {
            self.best_score = self.score;
            self.events
                .emit(&GameSessionEvent::BestScoreChanged(self.best_score));
        }
        self.events.emit(&GameSessionEvent::Finished(record));
    }

    fn reset(&mut self) {
        self.generation += 1;
        if let Some(playback) = self.playback.take() {
            playback.cancel();
        }
        self.finished = false;
        self.level = 1;
        self.score = 0;
        self.sequence.clear();
        self.input.clear();
        self.set_phase(GamePhase::Ready);
        self.events.emit(&GameSessionEvent::ScoreChanged(0));
    }

    fn set_phase(&mut self, phase: GamePhase) {
        self.phase = phase;
        self.events.emit(&GameSessionEvent::PhaseChanged(phase));
    }
}
