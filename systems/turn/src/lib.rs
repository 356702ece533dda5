#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn controller that sequences input, slides, merges and spawns.
//!
//! The controller is a pure system: it reads the world through
//! [`tile_merge_world::query`], consumes the events produced by applying its
//! previous commands, and answers with the next commands of the turn. A turn
//! runs through the following phases:
//!
//! 1. [`TurnPhase::Idle`] accepts a direction and checks its legality.
//! 2. [`TurnPhase::Resolving`] waits for the slide to be applied.
//! 3. [`TurnPhase::Settling`] waits for every move transition to complete.
//! 4. [`TurnPhase::Spawning`] folds merges and places a new tile.
//! 5. The controller returns to Idle, or enters [`TurnPhase::Terminal`] when
//!    no direction remains legal.
//!
//! Input arriving outside Idle is dropped rather than queued, which keeps
//! keyboard and gesture sources behind a single gate.

use std::collections::BTreeSet;

use log::{debug, warn};
use rand::Rng;
use tile_merge_core::{Command, Direction, Event, Input, TileId};
use tile_merge_system_spawning::Spawning;
use tile_merge_world::{query, World};

/// Number of tiles placed before the first input is accepted.
pub const OPENING_TILES: usize = 2;

/// Phase of the turn state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    /// Opening tiles are being placed.
    Starting,
    /// Awaiting a direction from the player.
    Idle,
    /// A slide was requested and is being applied.
    Resolving,
    /// Waiting for every sliding tile to finish its move transition.
    Settling,
    /// Merges are being folded and a new tile placed.
    Spawning,
    /// No legal move remains.
    Terminal,
}

/// Result of submitting input to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputOutcome {
    /// The input started a new turn.
    Dispatched,
    /// The input was inert or illegal; the controller stays idle.
    Ignored,
    /// A turn is in flight or the game ended; the input was discarded.
    Dropped,
}

/// Pure system orchestrating one turn at a time.
#[derive(Debug)]
pub struct TurnController<R> {
    phase: TurnPhase,
    spawning: Spawning<R>,
    awaiting: BTreeSet<TileId>,
    opening_remaining: usize,
    spawned: Option<TileId>,
    game_over_declared: bool,
}

impl<R: Rng> TurnController<R> {
    /// Creates a controller that places tiles using the provided spawning system.
    #[must_use]
    pub fn new(spawning: Spawning<R>) -> Self {
        Self {
            phase: TurnPhase::Starting,
            spawning,
            awaiting: BTreeSet::new(),
            opening_remaining: OPENING_TILES,
            spawned: None,
            game_over_declared: false,
        }
    }

    /// Current phase of the state machine.
    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Reports whether input would currently be considered.
    #[must_use]
    pub fn accepts_input(&self) -> bool {
        self.phase == TurnPhase::Idle
    }

    /// Tiles whose move transitions the current turn still waits for.
    pub fn awaiting(&self) -> impl Iterator<Item = TileId> + '_ {
        self.awaiting.iter().copied()
    }

    /// Begins a game by requesting the first opening tile.
    pub fn start(&mut self, world: &World, out: &mut Vec<Command>) {
        self.opening_remaining = OPENING_TILES;
        self.awaiting.clear();
        self.spawned = None;
        self.game_over_declared = false;
        self.enter(TurnPhase::Starting);
        self.spawning.spawn(query::grid(world), out);
    }

    /// Offers player input to the controller.
    pub fn submit(&mut self, input: Input, world: &World, out: &mut Vec<Command>) -> InputOutcome {
        if !self.accepts_input() {
            debug!("dropped {input:?} during {:?}", self.phase);
            return InputOutcome::Dropped;
        }

        let Input::Direction(direction) = input else {
            return InputOutcome::Ignored;
        };
        if !query::can_move(world, direction) {
            debug!("ignored illegal move {direction:?}");
            return InputOutcome::Ignored;
        }

        self.enter(TurnPhase::Resolving);
        out.push(Command::Slide { direction });
        InputOutcome::Dispatched
    }

    /// Consumes world events and emits the next commands of the turn.
    pub fn handle(&mut self, events: &[Event], world: &World, out: &mut Vec<Command>) {
        for event in events {
            match (self.phase, event) {
                (TurnPhase::Resolving, Event::TileSlid { tile, .. }) => {
                    let _ = self.awaiting.insert(*tile);
                }
                (TurnPhase::Resolving, Event::SlideRejected { direction }) => {
                    self.reject_slide(*direction);
                }
                (TurnPhase::Settling, Event::TransitionCompleted { tile, .. }) => {
                    let _ = self.awaiting.remove(tile);
                }
                (TurnPhase::Spawning, Event::MergesFolded { merged }) => {
                    debug!("folded {merged} merges");
                    self.spawning.spawn(query::grid(world), out);
                }
                (TurnPhase::Starting | TurnPhase::Spawning, Event::TileSpawned { tile, .. }) => {
                    self.tile_spawned(*tile, world, out);
                }
                (_, Event::SpawnRejected { cell, reason }) => {
                    warn!("spawn at {cell:?} rejected during {:?}: {reason:?}", self.phase);
                }
                (TurnPhase::Terminal, Event::TransitionCompleted { tile, .. })
                    if self.spawned == Some(*tile) =>
                {
                    self.declare_game_over(out);
                }
                _ => {}
            }
        }

        if self.phase == TurnPhase::Resolving && !self.awaiting.is_empty() {
            self.enter(TurnPhase::Settling);
        }
        if self.phase == TurnPhase::Settling && self.awaiting.is_empty() {
            self.enter(TurnPhase::Spawning);
            out.push(Command::FoldMerges);
        }
    }

    fn reject_slide(&mut self, direction: Direction) {
        warn!("slide {direction:?} rejected after legality check");
        self.awaiting.clear();
        self.enter(TurnPhase::Idle);
    }

    fn tile_spawned(&mut self, tile: TileId, world: &World, out: &mut Vec<Command>) {
        if self.phase == TurnPhase::Starting {
            self.opening_remaining = self.opening_remaining.saturating_sub(1);
            if self.opening_remaining > 0 {
                self.spawning.spawn(query::grid(world), out);
                return;
            }
        }

        if query::has_legal_move(world) {
            self.spawned = None;
            self.enter(TurnPhase::Idle);
            return;
        }

        self.spawned = Some(tile);
        self.enter(TurnPhase::Terminal);
        if query::pending_transition(world, tile).is_none() {
            self.declare_game_over(out);
        }
    }

    fn declare_game_over(&mut self, out: &mut Vec<Command>) {
        if self.game_over_declared {
            return;
        }
        self.game_over_declared = true;
        out.push(Command::DeclareGameOver);
    }

    fn enter(&mut self, phase: TurnPhase) {
        if self.phase != phase {
            debug!("turn phase {:?} -> {phase:?}", self.phase);
        }
        self.phase = phase;
    }
}
