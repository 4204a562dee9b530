use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use log::trace;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};

use super::GameContext;
use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::model::{
    GameCommand, GameId, GameOutcome, GamePhase, GameSessionEvent, PlayRecord, Prize, PRIZE_TABLE,
};
use crate::scheduler::TimerHandle;

pub const MAX_ROUNDS: u8 = 5;
pub const BOXES_PER_ROUND: usize = 3;

const REVEAL: Duration = Duration::from_millis(1500);
const NEXT_ROUND: Duration = Duration::from_millis(2000);

/// Fixed-round prize draw: `ready → revealing → ready` looping for five
/// rounds, then `finished`. Each round binds three prizes drawn without
/// replacement from the full table; the deck resets between rounds, so the
/// same prize can recur across rounds.
pub struct MysteryRewardEngine {
    phase: GamePhase,
    round: u8,
    score: u32,
    best_score: u32,
    boxes: Vec<Prize>,
    generation: u64,
    reveal: Option<TimerHandle>,
    rng: StdRng,
    ctx: GameContext,
    events: EventEmitter<GameSessionEvent>,
    subscription: Option<Unsubscriber<GameCommand>>,
    weak_self: Weak<RefCell<Self>>,
}

impl Destroyable for MysteryRewardEngine {
    fn destroy(&mut self) {
        self.generation += 1;
        if let Some(reveal) = self.reveal.take() {
            reveal.cancel();
        }
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl MysteryRewardEngine {
    pub fn new(
        ctx: GameContext,
        command_observer: EventObserver<GameCommand>,
        events: EventEmitter<GameSessionEvent>,
        seed: Option<u64>,
    ) -> Rc<RefCell<Self>> {
        let best_score = ctx.history.best_score(GameId::MysteryReward);
        let seed = seed.unwrap_or(rand::rng().next_u64());
        let engine = Rc::new(RefCell::new(Self {
            phase: GamePhase::Ready,
            round: 0,
            score: 0,
            best_score,
            boxes: Vec::new(),
            generation: 0,
            reveal: None,
            rng: StdRng::seed_from_u64(seed),
            ctx,
            events,
            subscription: None,
            weak_self: Weak::new(),
        }));
        let mut inner = engine.borrow_mut();
        inner.weak_self = Rc::downgrade(&engine);
        inner.boxes = inner.draw_boxes();
        drop(inner);
        MysteryRewardEngine::wire_subscription(engine.clone(), command_observer);
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

    /// Rounds already played (selections made), 0..=5.
    pub fn round(&self) -> u8 {
        self.round
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    /// The secret prize-per-box binding for the current round.
    pub fn boxes(&self) -> &[Prize] {
        &self.boxes
    }

    fn handle_command(&mut self, command: GameCommand) {
        trace!(target: "mystery_reward", "Handling command: {:?}", command);
        match command {
            GameCommand::Select(index) => self.select(index),
            GameCommand::Reset => self.reset(),
            // the draw has no start gate, tap input, or early exit
            GameCommand::Start | GameCommand::Tap | GameCommand::FinishEarly => (),
        }
    }

    fn draw_boxes(&mut self) -> Vec<Prize> {
        let mut deck = PRIZE_TABLE.to_vec();
        deck.shuffle(&mut self.rng);
        deck.truncate(BOXES_PER_ROUND);
        deck
    }

    fn select(&mut self, index: usize) {
        // a reveal in flight (or a finished session) gates all input
        if self.phase != GamePhase::Ready {
            return;
        }
        let Some(prize) = self.boxes.get(index).copied() else {
            return;
        };

        self.round += 1;
        self.score += prize.points;
        self.set_phase(GamePhase::Revealing);
        self.events
            .emit(&GameSessionEvent::BoxRevealed { index, prize });
        self.events.emit(&GameSessionEvent::ScoreChanged(self.score));

        let delay = if self.round >= MAX_ROUNDS {
            REVEAL
        } else {
            REVEAL + NEXT_ROUND
        };
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
            engine.end_reveal();
        });
        self.reveal = Some(handle);
    }

    fn end_reveal(&mut self) {
        self.reveal = None;
        if self.round >= MAX_ROUNDS {
            self.finish();
        } else {
            self.boxes = self.draw_boxes();
            self.set_phase(GamePhase::Ready);
            self.events
                .emit(&GameSessionEvent::RoundStarted(self.round + 1));
        }
    }

    fn finish(&mut self) {
        if self.phase == GamePhase::Finished {
            return;
        }
        self.set_phase(GamePhase::Finished);

        let record = PlayRecord::new(
            GameOutcome::MysteryReward { rounds: self.round },
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
        if let Some(reveal) = self.reveal.take() {
            reveal.cancel();
        }
        self.round = 0;
        self.score = 0;
        self.boxes = self.draw_boxes();
        self.set_phase(GamePhase::Ready);
        self.events.emit(&GameSessionEvent::ScoreChanged(0));
        self.events.emit(&GameSessionEvent::RoundStarted(1));
    }

    fn set_phase(&mut self, phase: GamePhase) {
        self.phase = phase;
        self.events.emit(&GameSessionEvent::PhaseChanged(phase));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::Harness;

    fn build(harness: &Harness) -> Rc<RefCell<MysteryRewardEngine>> {
        MysteryRewardEngine::new(
            harness.ctx.clone(),
            harness.command_observer.clone(),
            harness.events.clone(),
            Some(11),
        )
    }

    fn full_cycle(harness: &Harness) {
        harness.ctx.scheduler.advance(REVEAL + NEXT_ROUND);
    }

    #[test]
    fn test_boxes_drawn_without_replacement_within_round() {
        let harness = Harness::new();
        let engine = build(&harness);

        let boxes = engine.borrow().boxes().to_vec();
        assert_eq!(boxes.len(), BOXES_PER_ROUND);
        for (i, a) in boxes.iter().enumerate() {
            for b in &boxes[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn test_five_rounds_then_one_record() {
        let harness = Harness::new();
        let engine = build(&harness);

        let mut expected = 0;
        for _ in 0..MAX_ROUNDS {
            expected += engine.borrow().boxes()[0].points;
            harness.commands.emit(&GameCommand::Select(0));
            full_cycle(&harness);
        }

        assert_eq!(engine.borrow().phase(), GamePhase::Finished);
        let log = harness.ctx.history.all();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].score, expected);
        assert_eq!(log[0].rounds(), Some(MAX_ROUNDS));

        // further input cannot produce a sixth round
        harness.commands.emit(&GameCommand::Select(1));
        harness.ctx.scheduler.advance(Duration::from_secs(30));
        assert_eq!(harness.ctx.history.all().len(), 1);
        assert_eq!(engine.borrow().round(), MAX_ROUNDS);
    }

    #[test]
    fn test_selection_blocked_while_revealing() {
        let harness = Harness::new();
        let engine = build(&harness);

        harness.commands.emit(&GameCommand::Select(0));
        assert_eq!(engine.borrow().phase(), GamePhase::Revealing);
        let score_after_first = engine.borrow().score();

        // mashing boxes mid-reveal changes nothing
        harness.commands.emit(&GameCommand::Select(1));
        harness.commands.emit(&GameCommand::Select(2));
        assert_eq!(engine.borrow().round(), 1);
        assert_eq!(engine.borrow().score(), score_after_first);

        full_cycle(&harness);
        assert_eq!(engine.borrow().phase(), GamePhase::Ready);
        assert_eq!(engine.borrow().round(), 1);
    }

    #[test]
    fn test_out_of_range_selection_ignored() {
        let harness = Harness::new();
        let engine = build(&harness);

        harness.commands.emit(&GameCommand::Select(99));
        assert_eq!(engine.borrow().phase(), GamePhase::Ready);
        assert_eq!(engine.borrow().round(), 0);
    }

    #[test]
    fn test_reset_redraws_and_clears_counters() {
        let harness = Harness::new();
        let engine = build(&harness);

        harness.commands.emit(&GameCommand::Select(0));
        harness.commands.emit(&GameCommand::Reset);

        assert_eq!(engine.borrow().phase(), GamePhase::Ready);
        assert_eq!(engine.borrow().round(), 0);
        assert_eq!(engine.borrow().score(), 0);

        // the superseded reveal callback must not advance the fresh session
        harness.ctx.scheduler.advance(Duration::from_secs(30));
        assert_eq!(engine.borrow().round(), 0);
        assert!(harness.ctx.history.all().is_empty());
    }

    #[test]
    fn test_same_seed_draws_same_boxes() {
        let first = Harness::new();
        let second = Harness::new();
        let a = build(&first);
        let b = build(&second);

        let names_a: Vec<_> = a.borrow().boxes().iter().map(|p| p.name).collect();
        let names_b: Vec<_> = b.borrow().boxes().iter().map(|p| p.name).collect();
        assert_eq!(names_a, names_b);
    }
}
