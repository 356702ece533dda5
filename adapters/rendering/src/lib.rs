#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering and input contracts for Tile Merge adapters.

mod input;
mod transitions;

use anyhow::Result as AnyResult;
use tile_merge_core::{CellCoord, GameStatus, GridSize, TileId, TileValue};
use tile_merge_world::{query, World};

pub use input::{Key, Swipe, SWIPE_THRESHOLD};
pub use transitions::{TransitionTimings, TransitionTracker};

/// RGB color used when presenting tiles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    /// Creates a color from hue in degrees and saturation/lightness in 0.0..=1.0.
    #[must_use]
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let saturation = saturation.clamp(0.0, 1.0);
        let lightness = lightness.clamp(0.0, 1.0);
        let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let sector = hue.rem_euclid(360.0) / 60.0;
        let secondary = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
        let (red, green, blue) = match sector as u32 {
            0 => (chroma, secondary, 0.0),
            1 => (secondary, chroma, 0.0),
            2 => (0.0, chroma, secondary),
            3 => (0.0, secondary, chroma),
            4 => (secondary, 0.0, chroma),
            _ => (chroma, 0.0, secondary),
        };
        let offset = lightness - chroma / 2.0;
        Self::new(red + offset, green + offset, blue + offset)
    }

    /// Channels quantised to bytes.
    #[must_use]
    pub fn to_rgb_u8(self) -> (u8, u8, u8) {
        (
            quantise_channel(self.red),
            quantise_channel(self.green),
            quantise_channel(self.blue),
        )
    }
}

fn quantise_channel(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

const TILE_HUE: f32 = 200.0;
const TILE_SATURATION: f32 = 0.5;

/// Background and text colors used to draw a tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileStyle {
    /// Fill color of the tile.
    pub background: Color,
    /// Color of the number drawn on the tile.
    pub text: Color,
}

impl TileStyle {
    /// Derives the style for a tile value.
    ///
    /// Every doubling darkens the background by nine percentage points; text
    /// flips to light once the background reaches half lightness.
    #[must_use]
    pub fn for_value(value: TileValue) -> Self {
        let power = value.get().max(1).ilog2() as f32;
        let lightness = (100.0 - power * 9.0).max(0.0);
        let text_lightness = if lightness <= 50.0 { 90.0 } else { 10.0 };
        Self {
            background: Color::from_hsl(TILE_HUE, TILE_SATURATION, lightness / 100.0),
            text: Color::from_hsl(TILE_HUE, TILE_SATURATION, text_lightness / 100.0),
        }
    }
}

/// Immutable snapshot of a single tile prepared for presentation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePresentation {
    /// Identifier allocated to the tile by the world.
    pub id: TileId,
    /// Value displayed on the tile.
    pub value: TileValue,
    /// Cell the tile occupies.
    pub cell: CellCoord,
    /// Colors used to draw the tile.
    pub style: TileStyle,
}

/// Row-major snapshot of the grid prepared for presentation.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardFrame {
    /// Side length of the grid.
    pub size: GridSize,
    /// Rows from top to bottom, each listing cells from left to right.
    pub rows: Vec<Vec<Option<TilePresentation>>>,
    /// Lifecycle status of the game at capture time.
    pub status: GameStatus,
}

impl BoardFrame {
    /// Captures the settled tiles of the world in row-major order.
    #[must_use]
    pub fn capture(world: &World) -> Self {
        let grid = query::grid(world);
        let rows = grid
            .cells_by_row()
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| {
                        cell.tile().map(|tile| TilePresentation {
                            id: tile.id(),
                            value: tile.value(),
                            cell: cell.coord(),
                            style: TileStyle::for_value(tile.value()),
                        })
                    })
                    .collect()
            })
            .collect();

        Self {
            size: grid.size(),
            rows,
            status: query::status(world),
        }
    }

    /// Iterator over every tile in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &TilePresentation> {
        self.rows.iter().flatten().flatten()
    }

    /// Largest value displayed on the board, if any tile is present.
    #[must_use]
    pub fn highest_value(&self) -> Option<TileValue> {
        self.tiles().map(|tile| tile.value).max()
    }
}

/// Choice offered to the player once no legal move remains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TerminalChoice {
    /// Start a fresh game on a new grid.
    Restart,
    /// Leave the game.
    Quit,
}

/// Surface that displays frames produced by the engine.
pub trait RenderingBackend {
    /// Presents the provided frame to the player.
    fn present(&mut self, frame: &BoardFrame) -> AnyResult<()>;
}

/// Collaborator informed when the game reaches a terminal state.
pub trait TerminalNotifier {
    /// Announces the end of the game and asks whether to play again.
    fn game_over(&mut self, frame: &BoardFrame) -> AnyResult<TerminalChoice>;
}
