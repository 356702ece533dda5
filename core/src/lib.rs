#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tile Merge engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems and adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that systems react to deterministically. Systems consume event streams,
//! query immutable world state, and respond exclusively with new commands.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Side length of the grid used by a standard game.
pub const DEFAULT_GRID_SIZE: u32 = 4;

/// Describes the lifecycle of the game as seen by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// Moves may still be requested.
    Playing,
    /// No direction yields a legal move; the game has ended.
    Over,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Rebuilds the grid from scratch with the provided side length.
    ConfigureGrid {
        /// Number of cells along each edge of the square grid.
        size: GridSize,
    },
    /// Places a freshly created tile into an empty cell.
    SpawnTile {
        /// Cell that receives the new tile.
        cell: CellCoord,
        /// Value carried by the new tile.
        value: TileValue,
    },
    /// Slides every row or column toward the provided direction.
    Slide {
        /// Direction of travel for the slide.
        direction: Direction,
    },
    /// Folds every pending merge into its destination tile.
    FoldMerges,
    /// Reports that the visual transition of a tile has finished.
    CompleteTransition {
        /// Tile whose transition completed.
        tile: TileId,
    },
    /// Marks the game as finished because no direction is legal.
    DeclareGameOver,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the grid was rebuilt and is now empty.
    GridConfigured {
        /// Number of cells along each edge of the grid.
        size: GridSize,
    },
    /// Confirms that a new tile was placed into the grid.
    TileSpawned {
        /// Identifier allocated to the tile by the world.
        tile: TileId,
        /// Cell the tile occupies.
        cell: CellCoord,
        /// Value carried by the tile.
        value: TileValue,
    },
    /// Reports that a spawn request was rejected.
    SpawnRejected {
        /// Cell provided in the spawn request.
        cell: CellCoord,
        /// Specific reason the spawn failed.
        reason: SpawnError,
    },
    /// Confirms that a tile slid between two cells.
    TileSlid {
        /// Identifier of the tile that moved.
        tile: TileId,
        /// Cell the tile occupied before sliding.
        from: CellCoord,
        /// Cell the tile occupies after sliding.
        to: CellCoord,
        /// Whether the tile is now waiting to merge into the destination's tile.
        merging: bool,
    },
    /// Reports that a slide request was ignored because nothing could move.
    SlideRejected {
        /// Direction provided in the slide request.
        direction: Direction,
    },
    /// Confirms that two tiles were folded into one.
    TilesMerged {
        /// Tile that remains in the cell with the doubled value.
        survivor: TileId,
        /// Tile that was consumed by the merge and no longer exists.
        consumed: TileId,
        /// Cell that hosts the merged tile.
        cell: CellCoord,
        /// Value of the surviving tile after the merge.
        value: TileValue,
    },
    /// Confirms that all pending merges were folded.
    MergesFolded {
        /// Number of merges that were resolved.
        merged: usize,
    },
    /// Announces that a tile began a visual transition.
    TransitionStarted {
        /// Tile that is transitioning.
        tile: TileId,
        /// Kind of transition the tile performs.
        kind: TransitionKind,
    },
    /// Announces that a pending transition finished.
    TransitionCompleted {
        /// Tile whose transition finished.
        tile: TileId,
        /// Kind of transition that finished.
        kind: TransitionKind,
    },
    /// Announces that the game has ended.
    GameOver,
}

/// Input delivered by an input source, already translated from raw keys or
/// gestures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Input {
    /// Requests a slide in the provided direction.
    Direction(Direction),
    /// Input that carries no gameplay meaning.
    Inert,
}

/// Directions in which tiles may slide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Travel toward decreasing row indices.
    Up,
    /// Travel toward increasing row indices.
    Down,
    /// Travel toward decreasing column indices.
    Left,
    /// Travel toward increasing column indices.
    Right,
}

impl Direction {
    /// All directions in a stable order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// Visual transition a tile performs after a world mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionKind {
    /// A tile appears, either freshly spawned or just merged.
    Pop,
    /// A tile slides between cells.
    Move,
}

/// Unique identifier assigned to a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(u32);

impl TileId {
    /// Creates a new tile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Number carried by a tile.
///
/// Values produced by the engine are always positive powers of two: spawns
/// start at 2 or 4 and merges only ever combine equal values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileValue(u32);

impl TileValue {
    /// Value of the most common spawned tile.
    pub const TWO: TileValue = TileValue(2);
    /// Value of the rarer spawned tile.
    pub const FOUR: TileValue = TileValue(4);

    /// Creates a tile value wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying number.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Largest value a tile can carry; merges beyond it stay pinned here.
    pub const MAX: TileValue = TileValue(1 << 31);

    /// Value produced when two tiles of this value merge.
    ///
    /// Doubling stops at [`TileValue::MAX`] so the result stays a power of two.
    #[must_use]
    pub const fn doubled(self) -> Self {
        if self.0 >= Self::MAX.0 {
            return Self::MAX;
        }
        Self(self.0 * 2)
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Side length of a square grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct GridSize(u32);

impl GridSize {
    /// Smallest grid on which a slide can happen.
    pub const MIN: u32 = 2;

    /// Largest grid the world will allocate.
    pub const MAX: u32 = 16;

    /// Validates and wraps a grid side length.
    pub fn new(size: u32) -> Result<Self, GridSizeError> {
        if size < Self::MIN {
            return Err(GridSizeError::TooSmall { size });
        }
        if size > Self::MAX {
            return Err(GridSizeError::TooLarge { size });
        }
        Ok(Self(size))
    }

    /// Retrieves the side length.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Number of cells contained in a grid of this size.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        (self.0 as usize) * (self.0 as usize)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self(DEFAULT_GRID_SIZE)
    }
}

impl TryFrom<u32> for GridSize {
    type Error = GridSizeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GridSize> for u32 {
    fn from(size: GridSize) -> Self {
        size.0
    }
}

/// Errors raised when validating a grid size.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GridSizeError {
    /// The grid must have at least two cells along each edge.
    #[error("grid size must be at least {min} (received {size})", min = GridSize::MIN)]
    TooSmall {
        /// Size that failed validation.
        size: u32,
    },
    /// The grid exceeds the largest supported side length.
    #[error("grid size must be at most {max} (received {size})", max = GridSize::MAX)]
    TooLarge {
        /// Size that failed validation.
        size: u32,
    },
}

/// Reasons a spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnError {
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// The requested cell already holds a tile.
    Occupied,
}
