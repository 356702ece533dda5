//! A single game from the opening tiles to game over.

use std::{collections::VecDeque, time::Duration};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tile_merge_core::{Command, Event, GameStatus, Input};
use tile_merge_rendering::{BoardFrame, TransitionTracker};
use tile_merge_system_spawning::Spawning;
use tile_merge_system_turn::{InputOutcome, TurnController};
use tile_merge_world::{self as world, query, World};

use crate::settings::Settings;

/// Owns the world, the turn controller and the transition clock of one game.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    controller: TurnController<ChaCha8Rng>,
    tracker: TransitionTracker,
}

impl Session {
    /// Configures the grid and places the opening tiles.
    pub(crate) fn new(settings: &Settings, seed: u64) -> Self {
        let spawning = Spawning::new(settings.spawning, ChaCha8Rng::seed_from_u64(seed));
        let mut session = Self {
            world: World::new(),
            controller: TurnController::new(spawning),
            tracker: TransitionTracker::new(settings.timings),
        };
        session.pump(vec![Command::ConfigureGrid {
            size: settings.size,
        }]);

        let mut commands = Vec::new();
        session.controller.start(&session.world, &mut commands);
        session.pump(commands);
        session
    }

    pub(crate) fn submit(&mut self, input: Input) -> InputOutcome {
        let mut commands = Vec::new();
        let outcome = self.controller.submit(input, &self.world, &mut commands);
        self.pump(commands);
        outcome
    }

    /// Lets `dt` elapse on the transition clock.
    pub(crate) fn advance(&mut self, dt: Duration) {
        let mut commands = Vec::new();
        self.tracker.advance(dt, &mut commands);
        self.pump(commands);
    }

    /// Completes every transition, including those started by the completions.
    pub(crate) fn finish_transitions(&mut self) {
        while !self.tracker.is_idle() {
            let mut commands = Vec::new();
            self.tracker.finish_all(&mut commands);
            self.pump(commands);
        }
    }

    /// Time until the next running transition completes.
    pub(crate) fn next_completion(&self) -> Option<Duration> {
        self.tracker.next_completion()
    }

    pub(crate) fn is_over(&self) -> bool {
        query::status(&self.world) == GameStatus::Over
    }

    pub(crate) fn frame(&self) -> BoardFrame {
        BoardFrame::capture(&self.world)
    }

    fn pump(&mut self, commands: Vec<Command>) {
        let mut queue: VecDeque<Command> = commands.into();
        while let Some(command) = queue.pop_front() {
            let mut events: Vec<Event> = Vec::new();
            world::apply(&mut self.world, command, &mut events);
            self.tracker.observe(&events);

            let mut next = Vec::new();
            self.controller.handle(&events, &self.world, &mut next);
            queue.extend(next);
        }
    }
}
