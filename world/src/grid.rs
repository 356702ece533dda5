//! Square grid of cells and the tiles they own.

use rand::Rng;
use tile_merge_core::{CellCoord, Direction, GridSize, TileId, TileValue};

/// Numbered game piece owned by a single cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    id: TileId,
    value: TileValue,
    position: CellCoord,
}

impl Tile {
    pub(crate) const fn new(id: TileId, value: TileValue, position: CellCoord) -> Self {
        Self {
            id,
            value,
            position,
        }
    }

    /// Identifier allocated to the tile by the world.
    #[must_use]
    pub const fn id(&self) -> TileId {
        self.id
    }

    /// Value currently carried by the tile.
    #[must_use]
    pub const fn value(&self) -> TileValue {
        self.value
    }

    /// Logical position of the tile within the grid.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }
}

/// Outcome of folding a pending merge into a cell's settled tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Merge {
    pub(crate) survivor: TileId,
    pub(crate) consumed: TileId,
    pub(crate) cell: CellCoord,
    pub(crate) value: TileValue,
}

/// Single grid slot holding at most one settled tile and one incoming merge.
#[derive(Clone, Debug)]
pub struct Cell {
    coord: CellCoord,
    tile: Option<Tile>,
    merge_tile: Option<Tile>,
}

impl Cell {
    const fn empty(coord: CellCoord) -> Self {
        Self {
            coord,
            tile: None,
            merge_tile: None,
        }
    }

    /// Coordinate identifying the cell.
    #[must_use]
    pub const fn coord(&self) -> CellCoord {
        self.coord
    }

    /// Settled tile occupying the cell, if any.
    #[must_use]
    pub fn tile(&self) -> Option<&Tile> {
        self.tile.as_ref()
    }

    /// Tile waiting to be folded into the settled tile, if any.
    #[must_use]
    pub fn merge_tile(&self) -> Option<&Tile> {
        self.merge_tile.as_ref()
    }

    /// Reports whether an incoming tile may slide into this cell.
    ///
    /// Empty cells accept any tile. An occupied cell accepts a tile of equal
    /// value, but only once per turn: after a merge tile has been parked here
    /// the cell refuses further merges until it is folded.
    #[must_use]
    pub fn can_accept(&self, incoming: &Tile) -> bool {
        match &self.tile {
            None => true,
            Some(tile) => self.merge_tile.is_none() && tile.value == incoming.value,
        }
    }

    pub(crate) fn take_tile(&mut self) -> Option<Tile> {
        self.tile.take()
    }

    /// Stores a newly created tile. The caller guarantees the cell is empty.
    pub(crate) fn place(&mut self, mut tile: Tile) {
        debug_assert!(self.tile.is_none(), "place requires an empty cell");
        tile.position = self.coord;
        self.tile = Some(tile);
    }

    /// Accepts a sliding tile, returning `true` when it was parked as a merge.
    pub(crate) fn receive(&mut self, mut tile: Tile) -> bool {
        tile.position = self.coord;
        if self.tile.is_some() {
            debug_assert!(self.merge_tile.is_none(), "cell already accepted a merge");
            self.merge_tile = Some(tile);
            true
        } else {
            self.tile = Some(tile);
            false
        }
    }

    /// Folds the pending merge tile into the settled tile.
    ///
    /// Returns `None` without touching the cell when no merge is pending.
    pub(crate) fn merge_tiles(&mut self) -> Option<Merge> {
        let tile = self.tile.as_mut()?;
        let consumed = self.merge_tile.take()?;
        tile.value = tile.value.doubled();
        Some(Merge {
            survivor: tile.id,
            consumed: consumed.id,
            cell: self.coord,
            value: tile.value,
        })
    }
}

/// Fixed square collection of cells with cached row and column views.
#[derive(Clone, Debug)]
pub struct Grid {
    size: GridSize,
    cells: Vec<Cell>,
    rows: Vec<Vec<usize>>,
    columns: Vec<Vec<usize>>,
}

impl Grid {
    /// Creates an empty grid with the provided side length.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        let side = size.get();
        let mut cells = Vec::with_capacity(size.cell_count());
        for row in 0..side {
            for column in 0..side {
                cells.push(Cell::empty(CellCoord::new(column, row)));
            }
        }

        let width = side as usize;
        let rows: Vec<Vec<usize>> = (0..width)
            .map(|row| (0..width).map(|column| row * width + column).collect())
            .collect();
        let columns: Vec<Vec<usize>> = (0..width)
            .map(|column| (0..width).map(|row| row * width + column).collect())
            .collect();

        Self {
            size,
            cells,
            rows,
            columns,
        }
    }

    /// Side length of the grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns the cell at the provided coordinate, if it lies inside the grid.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.index(coord).map(|index| &self.cells[index])
    }

    pub(crate) fn cell_mut(&mut self, coord: CellCoord) -> Option<&mut Cell> {
        self.index(coord).map(move |index| &mut self.cells[index])
    }

    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    pub(crate) fn cell_at(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    pub(crate) fn cell_at_mut(&mut self, index: usize) -> &mut Cell {
        &mut self.cells[index]
    }

    /// Rows of cells, top to bottom, each ordered by ascending column.
    #[must_use]
    pub fn cells_by_row(&self) -> Vec<Vec<&Cell>> {
        self.resolve(&self.rows)
    }

    /// Columns of cells, left to right, each ordered by ascending row.
    #[must_use]
    pub fn cells_by_column(&self) -> Vec<Vec<&Cell>> {
        self.resolve(&self.columns)
    }

    /// Cell index groups ordered in the direction of travel.
    ///
    /// The first index of every group is the cell tiles slide toward.
    pub(crate) fn groups(&self, direction: Direction) -> Vec<Vec<usize>> {
        let (views, reversed) = match direction {
            Direction::Up => (&self.columns, false),
            Direction::Down => (&self.columns, true),
            Direction::Left => (&self.rows, false),
            Direction::Right => (&self.rows, true),
        };

        views
            .iter()
            .map(|group| {
                let mut group = group.clone();
                if reversed {
                    group.reverse();
                }
                group
            })
            .collect()
    }

    /// Coordinates of every cell without a settled tile, in row-major order.
    #[must_use]
    pub fn empty_cells(&self) -> Vec<CellCoord> {
        self.cells
            .iter()
            .filter(|cell| cell.tile.is_none())
            .map(Cell::coord)
            .collect()
    }

    /// Picks a cell uniformly among those without a settled tile.
    ///
    /// # Panics
    ///
    /// Panics when every cell is occupied. Spawns only follow legal moves,
    /// so a full grid here means an invariant was broken upstream.
    pub fn random_empty_cell<R>(&self, rng: &mut R) -> &Cell
    where
        R: Rng + ?Sized,
    {
        let empty: Vec<&Cell> = self.cells.iter().filter(|cell| cell.tile.is_none()).collect();
        assert!(
            !empty.is_empty(),
            "random_empty_cell requires at least one empty cell"
        );
        empty[rng.gen_range(0..empty.len())]
    }

    /// Sum of every tile value in the grid, pending merge tiles included.
    #[must_use]
    pub fn total_value(&self) -> u64 {
        self.cells
            .iter()
            .flat_map(|cell| cell.tile.iter().chain(cell.merge_tile.iter()))
            .map(|tile| u64::from(tile.value.get()))
            .sum()
    }

    fn resolve(&self, views: &[Vec<usize>]) -> Vec<Vec<&Cell>> {
        views
            .iter()
            .map(|group| group.iter().map(|&index| &self.cells[index]).collect())
            .collect()
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        let side = self.size.get();
        if coord.column() < side && coord.row() < side {
            let width = usize::try_from(side).ok()?;
            let row = usize::try_from(coord.row()).ok()?;
            let column = usize::try_from(coord.column()).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn tile(id: u32, value: u32) -> Tile {
        Tile::new(TileId::new(id), TileValue::new(value), CellCoord::new(0, 0))
    }

    fn grid(size: u32) -> Grid {
        Grid::new(GridSize::new(size).expect("valid size"))
    }

    #[test]
    fn empty_cell_accepts_any_tile() {
        let cell = Cell::empty(CellCoord::new(1, 1));
        assert!(cell.can_accept(&tile(0, 2)));
        assert!(cell.can_accept(&tile(1, 1024)));
    }

    #[test]
    fn occupied_cell_accepts_single_matching_merge() {
        let mut cell = Cell::empty(CellCoord::new(0, 0));
        cell.place(tile(0, 4));

        assert!(!cell.can_accept(&tile(1, 2)), "different values never merge");
        assert!(cell.can_accept(&tile(1, 4)));

        assert!(cell.receive(tile(1, 4)), "second tile parks as merge tile");
        assert!(
            !cell.can_accept(&tile(2, 4)),
            "a cell merges at most once per turn"
        );
    }

    #[test]
    fn merge_tiles_doubles_survivor_and_drops_consumed() {
        let mut cell = Cell::empty(CellCoord::new(2, 3));
        cell.place(tile(7, 8));
        assert!(cell.receive(tile(9, 8)));
        assert_eq!(
            cell.merge_tile().map(Tile::position),
            Some(CellCoord::new(2, 3))
        );

        let merge = cell.merge_tiles().expect("pending merge");

        assert_eq!(merge.survivor, TileId::new(7));
        assert_eq!(merge.consumed, TileId::new(9));
        assert_eq!(merge.value, TileValue::new(16));
        assert_eq!(cell.tile().map(Tile::value), Some(TileValue::new(16)));
        assert!(cell.merge_tile().is_none());
        assert!(cell.can_accept(&tile(3, 16)), "cell accepts merges again");
    }

    #[test]
    fn merge_tiles_without_pending_merge_is_noop() {
        let mut cell = Cell::empty(CellCoord::new(0, 0));
        assert!(cell.merge_tiles().is_none());

        cell.place(tile(0, 2));
        assert!(cell.merge_tiles().is_none());
        assert!(cell.merge_tiles().is_none());
        assert_eq!(cell.tile(), Some(&tile(0, 2)));
    }

    #[test]
    fn row_and_column_views_are_transposes() {
        let grid = grid(4);
        let rows = grid.cells_by_row();
        let columns = grid.cells_by_column();

        assert_eq!(rows.len(), 4);
        for (row_index, row) in rows.iter().enumerate() {
            for (column_index, cell) in row.iter().enumerate() {
                assert_eq!(cell.coord().row() as usize, row_index);
                assert_eq!(cell.coord().column() as usize, column_index);
                assert_eq!(columns[column_index][row_index].coord(), cell.coord());
            }
        }
    }

    #[test]
    fn groups_follow_direction_of_travel() {
        let grid = grid(3);

        assert_eq!(grid.groups(Direction::Left)[1], vec![3, 4, 5]);
        assert_eq!(grid.groups(Direction::Right)[1], vec![5, 4, 3]);
        assert_eq!(grid.groups(Direction::Up)[2], vec![2, 5, 8]);
        assert_eq!(grid.groups(Direction::Down)[2], vec![8, 5, 2]);
    }

    #[test]
    fn random_empty_cell_only_selects_empty_cells() {
        let mut grid = grid(2);
        for coord in [
            CellCoord::new(0, 0),
            CellCoord::new(1, 0),
            CellCoord::new(0, 1),
        ] {
            grid.cell_mut(coord).expect("inside grid").place(tile(0, 2));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..32 {
            assert_eq!(grid.random_empty_cell(&mut rng).coord(), CellCoord::new(1, 1));
        }
    }

    #[test]
    fn random_empty_cell_covers_every_empty_cell() {
        let grid = grid(4);
        let mut rng = ChaCha8Rng::seed_from_u64(0x2048);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..512 {
            let _ = seen.insert(grid.random_empty_cell(&mut rng).coord());
        }
        assert_eq!(seen.len(), 16);
    }

    #[test]
    #[should_panic(expected = "random_empty_cell requires at least one empty cell")]
    fn random_empty_cell_panics_on_full_grid() {
        let mut grid = grid(2);
        for (index, cell) in grid.cells_mut().enumerate() {
            cell.place(tile(index as u32, 2));
        }
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let _ = grid.random_empty_cell(&mut rng);
    }

    #[test]
    fn out_of_bounds_coordinates_have_no_cell() {
        let grid = grid(4);
        assert!(grid.cell(CellCoord::new(4, 0)).is_none());
        assert!(grid.cell(CellCoord::new(0, 4)).is_none());
        assert!(grid.cell(CellCoord::new(3, 3)).is_some());
    }
}
