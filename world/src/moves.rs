//! Slide and merge resolution for whole rows and columns.

use log::trace;
use tile_merge_core::{CellCoord, Direction, TileId};

use crate::grid::Grid;

/// Tile displacement produced by a slide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Slide {
    pub(crate) tile: TileId,
    pub(crate) from: CellCoord,
    pub(crate) to: CellCoord,
    pub(crate) merging: bool,
}

/// Reports whether sliding toward `direction` would move at least one tile.
///
/// A move is legal when some tile has an immediate predecessor, in travel
/// order, that would accept it. The probe never mutates the grid.
#[must_use]
pub fn can_move(grid: &Grid, direction: Direction) -> bool {
    grid.groups(direction).iter().any(|group| {
        group.windows(2).any(|pair| {
            let destination = grid.cell_at(pair[0]);
            grid.cell_at(pair[1])
                .tile()
                .map_or(false, |tile| destination.can_accept(tile))
        })
    })
}

/// Slides every tile of every group toward the front of its group.
///
/// Groups are resolved independently. Within a group, cells are visited in
/// travel order and each tile takes the farthest cell reachable through an
/// unbroken run of accepting cells. Visiting the front first is what turns
/// `[2, 2, 2, _]` into `[4, 2, _, _]` rather than folding all three.
pub(crate) fn slide_tiles(grid: &mut Grid, groups: &[Vec<usize>]) -> Vec<Slide> {
    let mut slides = Vec::new();

    for group in groups {
        for (position, &source) in group.iter().enumerate() {
            let Some(destination) = farthest_destination(grid, &group[..position], source) else {
                continue;
            };
            let Some(tile) = grid.cell_at_mut(source).take_tile() else {
                continue;
            };

            let id = tile.id();
            let from = grid.cell_at(source).coord();
            let target = grid.cell_at_mut(destination);
            let to = target.coord();
            let merging = target.receive(tile);
            trace!(
                "tile {} slid from {from:?} to {to:?} (merging: {merging})",
                id.get()
            );
            slides.push(Slide {
                tile: id,
                from,
                to,
                merging,
            });
        }
    }

    slides
}

fn farthest_destination(grid: &Grid, preceding: &[usize], source: usize) -> Option<usize> {
    let tile = grid.cell_at(source).tile()?;
    let mut destination = None;
    for &candidate in preceding.iter().rev() {
        if !grid.cell_at(candidate).can_accept(tile) {
            break;
        }
        destination = Some(candidate);
    }
    destination
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Tile;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use tile_merge_core::{GridSize, TileValue};

    fn grid_from_rows(rows: &[&[u32]]) -> Grid {
        let size = GridSize::new(rows.len() as u32).expect("valid size");
        let mut grid = Grid::new(size);
        let mut next_id = 0;
        for (row, values) in rows.iter().enumerate() {
            for (column, &value) in values.iter().enumerate() {
                if value == 0 {
                    continue;
                }
                let coord = CellCoord::new(column as u32, row as u32);
                let tile = Tile::new(TileId::new(next_id), TileValue::new(value), coord);
                next_id += 1;
                grid.cell_mut(coord).expect("inside grid").place(tile);
            }
        }
        grid
    }

    fn settled_rows(grid: &Grid) -> Vec<Vec<u32>> {
        grid.cells_by_row()
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| cell.tile().map_or(0, |tile| tile.value().get()))
                    .collect()
            })
            .collect()
    }

    fn slide_and_fold(grid: &mut Grid, direction: Direction) -> Vec<Slide> {
        let groups = grid.groups(direction);
        let slides = slide_tiles(grid, &groups);
        for cell in grid.cells_mut() {
            let _ = cell.merge_tiles();
        }
        slides
    }

    #[test]
    fn cascade_merges_front_pair_only() {
        let mut grid = grid_from_rows(&[&[2, 2, 2, 0], &[0; 4], &[0; 4], &[0; 4]]);

        let slides = slide_and_fold(&mut grid, Direction::Left);

        assert_eq!(settled_rows(&grid)[0], vec![4, 2, 0, 0]);
        assert_eq!(slides.len(), 2);
        assert!(slides[0].merging);
        assert!(!slides[1].merging);
    }

    #[test]
    fn two_pairs_merge_independently() {
        let mut grid = grid_from_rows(&[&[2, 2, 2, 2], &[4, 0, 4, 8], &[0; 4], &[0; 4]]);

        let _ = slide_and_fold(&mut grid, Direction::Left);

        assert_eq!(settled_rows(&grid)[0], vec![4, 4, 0, 0]);
        assert_eq!(settled_rows(&grid)[1], vec![8, 8, 0, 0]);
    }

    #[test]
    fn right_slide_merges_toward_right_edge() {
        let mut grid = grid_from_rows(&[&[2, 2, 2, 0], &[0; 4], &[0; 4], &[0; 4]]);

        let _ = slide_and_fold(&mut grid, Direction::Right);

        assert_eq!(settled_rows(&grid)[0], vec![0, 0, 2, 4]);
    }

    #[test]
    fn vertical_slides_use_columns() {
        let mut grid = grid_from_rows(&[&[2, 0, 0, 0], &[0, 0, 0, 0], &[2, 0, 0, 0], &[4, 0, 0, 0]]);

        let _ = slide_and_fold(&mut grid, Direction::Down);
        let rows = settled_rows(&grid);
        assert_eq!(
            rows.iter().map(|row| row[0]).collect::<Vec<_>>(),
            vec![0, 0, 4, 4]
        );

        let _ = slide_and_fold(&mut grid, Direction::Up);
        let rows = settled_rows(&grid);
        assert_eq!(
            rows.iter().map(|row| row[0]).collect::<Vec<_>>(),
            vec![8, 0, 0, 0]
        );
    }

    #[test]
    fn packed_distinct_row_is_illegal_and_untouched() {
        let mut grid = grid_from_rows(&[&[2, 4, 8, 16], &[0; 4], &[0; 4], &[0; 4]]);
        let before = settled_rows(&grid);

        assert!(!can_move(&grid, Direction::Left));
        assert!(!can_move(&grid, Direction::Right));
        let slides = slide_and_fold(&mut grid, Direction::Left);

        assert!(slides.is_empty());
        assert_eq!(settled_rows(&grid), before);
    }

    #[test]
    fn checkerboard_two_by_two_has_no_legal_move() {
        let grid = grid_from_rows(&[&[2, 4], &[4, 2]]);

        for direction in Direction::ALL {
            assert!(!can_move(&grid, direction), "{direction:?} should be illegal");
        }
    }

    #[test]
    fn slide_updates_tile_positions() {
        let mut grid = grid_from_rows(&[&[0, 0, 0, 8], &[0; 4], &[0; 4], &[0; 4]]);

        let slides = slide_and_fold(&mut grid, Direction::Left);

        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].from, CellCoord::new(3, 0));
        assert_eq!(slides[0].to, CellCoord::new(0, 0));
        let tile = grid
            .cell(CellCoord::new(0, 0))
            .and_then(|cell| cell.tile())
            .expect("tile moved");
        assert_eq!(tile.position(), CellCoord::new(0, 0));
    }

    #[test]
    fn slides_conserve_value_until_folded() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let mut grid = random_grid(&mut rng);
            let direction = Direction::ALL[rng.gen_range(0..4)];
            let settled_before = settled_total(&grid);

            let groups = grid.groups(direction);
            let slides = slide_tiles(&mut grid, &groups);
            assert_eq!(grid.total_value(), settled_before);
            let settled_after_slide = settled_total(&grid);

            let mut expected_gain = 0;
            for slide in slides.iter().filter(|slide| slide.merging) {
                expected_gain += grid
                    .cell(slide.to)
                    .and_then(|cell| cell.tile())
                    .map_or(0, |tile| u64::from(tile.value().get()));
            }
            for cell in grid.cells_mut() {
                let _ = cell.merge_tiles();
            }

            assert_eq!(settled_total(&grid), settled_after_slide + expected_gain);
            assert_eq!(settled_total(&grid), settled_before);
        }
    }

    #[test]
    fn legality_matches_slide_outcome() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x2048);
        for _ in 0..500 {
            let grid = random_grid(&mut rng);
            for direction in Direction::ALL {
                let mut probe = grid.clone();
                let legal = can_move(&probe, direction);
                let groups = probe.groups(direction);
                let slides = slide_tiles(&mut probe, &groups);
                assert_eq!(
                    legal,
                    !slides.is_empty(),
                    "legality diverged for {direction:?} on {:?}",
                    settled_rows(&grid)
                );
            }
        }
    }

    #[test]
    fn every_merge_destination_receives_one_merge() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..200 {
            let mut grid = random_grid(&mut rng);
            let direction = Direction::ALL[rng.gen_range(0..4)];
            let groups = grid.groups(direction);
            let slides = slide_tiles(&mut grid, &groups);

            let mut destinations: Vec<_> = slides
                .iter()
                .filter(|slide| slide.merging)
                .map(|slide| slide.to)
                .collect();
            let total = destinations.len();
            destinations.sort();
            destinations.dedup();
            assert_eq!(destinations.len(), total);
        }
    }

    fn random_grid(rng: &mut ChaCha8Rng) -> Grid {
        let values: Vec<Vec<u32>> = (0..4)
            .map(|_| {
                (0..4)
                    .map(|_| match rng.gen_range(0..5) {
                        0 | 1 => 0,
                        exponent => 1 << exponent,
                    })
                    .collect()
            })
            .collect();
        let rows: Vec<&[u32]> = values.iter().map(Vec::as_slice).collect();
        grid_from_rows(&rows)
    }

    fn settled_total(grid: &Grid) -> u64 {
        grid.cells()
            .iter()
            .filter_map(|cell| cell.tile())
            .map(|tile| u64::from(tile.value().get()))
            .sum()
    }
}
