#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid state management for Tile Merge.

mod grid;
pub mod moves;

use std::collections::BTreeMap;

use log::debug;
use tile_merge_core::{
    Command, Event, GameStatus, GridSize, SpawnError, TileId, TransitionKind,
};

pub use grid::{Cell, Grid, Tile};

/// Represents the authoritative Tile Merge world state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    transitions: TransitionLedger,
    status: GameStatus,
    next_tile_id: u32,
}

impl World {
    /// Creates a world holding an empty grid of the default size.
    #[must_use]
    pub fn new() -> Self {
        Self::with_size(GridSize::default())
    }

    /// Creates a world holding an empty grid of the provided size.
    #[must_use]
    pub fn with_size(size: GridSize) -> Self {
        Self {
            grid: Grid::new(size),
            transitions: TransitionLedger::default(),
            status: GameStatus::Playing,
            next_tile_id: 0,
        }
    }

    fn allocate_tile_id(&mut self) -> TileId {
        let id = TileId::new(self.next_tile_id);
        self.next_tile_id = self.next_tile_id.wrapping_add(1);
        id
    }

    fn start_transition(&mut self, tile: TileId, kind: TransitionKind, out_events: &mut Vec<Event>) {
        self.transitions.start(tile, kind);
        out_events.push(Event::TransitionStarted { tile, kind });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { size } => {
            world.grid = Grid::new(size);
            world.transitions.clear();
            world.status = GameStatus::Playing;
            out_events.push(Event::GridConfigured { size });
        }
        Command::SpawnTile { cell, value } => {
            let rejection = match world.grid.cell(cell) {
                None => Some(SpawnError::OutOfBounds),
                Some(target) if target.tile().is_some() => Some(SpawnError::Occupied),
                Some(_) => None,
            };
            if let Some(reason) = rejection {
                debug!("rejected spawn at {cell:?}: {reason:?}");
                out_events.push(Event::SpawnRejected { cell, reason });
                return;
            }

            let id = world.allocate_tile_id();
            if let Some(target) = world.grid.cell_mut(cell) {
                target.place(Tile::new(id, value, cell));
            }
            out_events.push(Event::TileSpawned {
                tile: id,
                cell,
                value,
            });
            world.start_transition(id, TransitionKind::Pop, out_events);
        }
        Command::Slide { direction } => {
            if !moves::can_move(&world.grid, direction) {
                debug!("rejected slide {direction:?}: no tile can move");
                out_events.push(Event::SlideRejected { direction });
                return;
            }

            let groups = world.grid.groups(direction);
            let slides = moves::slide_tiles(&mut world.grid, &groups);
            debug!("slide {direction:?} moved {} tiles", slides.len());
            for slide in slides {
                out_events.push(Event::TileSlid {
                    tile: slide.tile,
                    from: slide.from,
                    to: slide.to,
                    merging: slide.merging,
                });
                world.start_transition(slide.tile, TransitionKind::Move, out_events);
            }
        }
        Command::FoldMerges => {
            let merges: Vec<_> = world
                .grid
                .cells_mut()
                .filter_map(|cell| cell.merge_tiles())
                .collect();

            let merged = merges.len();
            for merge in merges {
                world.transitions.discard(merge.consumed);
                out_events.push(Event::TilesMerged {
                    survivor: merge.survivor,
                    consumed: merge.consumed,
                    cell: merge.cell,
                    value: merge.value,
                });
                world.start_transition(merge.survivor, TransitionKind::Pop, out_events);
            }
            out_events.push(Event::MergesFolded { merged });
        }
        Command::CompleteTransition { tile } => {
            if let Some(kind) = world.transitions.complete(tile) {
                out_events.push(Event::TransitionCompleted { tile, kind });
            }
        }
        Command::DeclareGameOver => {
            if world.status == GameStatus::Playing {
                world.status = GameStatus::Over;
                out_events.push(Event::GameOver);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use tile_merge_core::{Direction, GameStatus, TileId, TransitionKind};

    use super::{moves, Grid, World};

    /// Provides read-only access to the world's grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Reports whether sliding toward the provided direction would move a tile.
    #[must_use]
    pub fn can_move(world: &World, direction: Direction) -> bool {
        moves::can_move(&world.grid, direction)
    }

    /// Enumerates every direction that currently yields a legal move.
    #[must_use]
    pub fn legal_directions(world: &World) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|direction| can_move(world, *direction))
            .collect()
    }

    /// Reports whether any direction yields a legal move.
    #[must_use]
    pub fn has_legal_move(world: &World) -> bool {
        Direction::ALL
            .into_iter()
            .any(|direction| can_move(world, direction))
    }

    /// Current lifecycle status of the game.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.status
    }

    /// Transition still pending for the provided tile, if any.
    #[must_use]
    pub fn pending_transition(world: &World, tile: TileId) -> Option<TransitionKind> {
        world.transitions.pending(tile)
    }

    /// Number of transitions that have started but not yet completed.
    #[must_use]
    pub fn pending_transition_count(world: &World) -> usize {
        world.transitions.len()
    }
}

/// Tracks the single outstanding transition of each tile.
#[derive(Debug, Default)]
struct TransitionLedger {
    pending: BTreeMap<TileId, TransitionKind>,
}

impl TransitionLedger {
    fn start(&mut self, tile: TileId, kind: TransitionKind) {
        if let Some(previous) = self.pending.insert(tile, kind) {
            debug!(
                "tile {} transition {previous:?} superseded by {kind:?}",
                tile.get()
            );
        }
    }

    fn complete(&mut self, tile: TileId) -> Option<TransitionKind> {
        self.pending.remove(&tile)
    }

    fn discard(&mut self, tile: TileId) {
        let _ = self.pending.remove(&tile);
    }

    fn pending(&self, tile: TileId) -> Option<TransitionKind> {
        self.pending.get(&tile).copied()
    }

    fn len(&self) -> usize {
        self.pending.len()
    }

    fn clear(&mut self) {
        self.pending.clear();
    }
}
