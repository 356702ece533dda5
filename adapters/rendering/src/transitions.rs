//! Timed completion of tile transitions.

use std::{collections::BTreeMap, time::Duration};

use tile_merge_core::{Command, Event, TileId, TransitionKind};

/// Durations applied to each kind of transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionTimings {
    /// Time a tile takes to appear.
    pub pop: Duration,
    /// Time a tile takes to slide between cells.
    pub movement: Duration,
}

impl TransitionTimings {
    /// Timings that complete every transition on the next advance.
    pub const INSTANT: TransitionTimings = TransitionTimings {
        pop: Duration::ZERO,
        movement: Duration::ZERO,
    };

    fn duration(&self, kind: TransitionKind) -> Duration {
        match kind {
            TransitionKind::Pop => self.pop,
            TransitionKind::Move => self.movement,
        }
    }
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            pop: Duration::from_millis(200),
            movement: Duration::from_millis(100),
        }
    }
}

/// Tracks running transitions and reports them complete once they elapse.
///
/// Each tile has at most one running transition; a newer one replaces it.
#[derive(Clone, Debug, Default)]
pub struct TransitionTracker {
    timings: TransitionTimings,
    running: BTreeMap<TileId, Duration>,
}

impl TransitionTracker {
    /// Creates a tracker using the provided timings.
    #[must_use]
    pub fn new(timings: TransitionTimings) -> Self {
        Self {
            timings,
            running: BTreeMap::new(),
        }
    }

    /// Records transitions started or cancelled by the provided events.
    pub fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TransitionStarted { tile, kind } => {
                    let _ = self.running.insert(*tile, self.timings.duration(*kind));
                }
                Event::TilesMerged { consumed, .. } => {
                    let _ = self.running.remove(consumed);
                }
                Event::GridConfigured { .. } => self.running.clear(),
                _ => {}
            }
        }
    }

    /// Advances every running transition and emits completion commands for
    /// those that finished, ordered by tile identifier.
    pub fn advance(&mut self, dt: Duration, out: &mut Vec<Command>) {
        let mut finished = Vec::new();
        for (tile, remaining) in &mut self.running {
            *remaining = remaining.saturating_sub(dt);
            if remaining.is_zero() {
                finished.push(*tile);
            }
        }
        for tile in finished {
            let _ = self.running.remove(&tile);
            out.push(Command::CompleteTransition { tile });
        }
    }

    /// Completes every running transition immediately.
    pub fn finish_all(&mut self, out: &mut Vec<Command>) {
        out.extend(
            std::mem::take(&mut self.running)
                .into_keys()
                .map(|tile| Command::CompleteTransition { tile }),
        );
    }

    /// Time until the earliest running transition completes, if any runs.
    #[must_use]
    pub fn next_completion(&self) -> Option<Duration> {
        self.running.values().copied().min()
    }

    /// Reports whether no transition is running.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }
}
