//! Column-at-a-time construction of the piece grid.
//!
//! Columns are the unit of backtracking: a column that leaves the path no
//! way to continue rightward is thrown away whole and rebuilt. Slots are
//! never repaired individually.

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use super::solver::{possible_pieces, PieceGrid, SlotDiagnostic};
use crate::pieces::PieceCatalog;
use crate::shared::*;

/// Fill `column` of `grid`, retrying until some piece opens to the right
/// (the last column only has to meet its left neighbor).
///
/// Returns how many attempts the column took.
pub fn build_column(
    catalog: &PieceCatalog,
    grid: &mut PieceGrid,
    column: usize,
    max_attempts: Option<u32>,
    rng: &mut impl Rng,
) -> Result<u32, MapGenError> {
    let last_column = column + 1 == grid.width();
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let mut opens_right = false;

        for row in 0..grid.height() {
            let candidates = possible_pieces(catalog, grid, column, row);
            let Some(&choice) = candidates.choose(rng) else {
                SlotDiagnostic::capture(grid, column, row).log(catalog);
                return Err(MapGenError::SolverExhausted {
                    column,
                    row,
                    class: PieceClass::for_column(column, grid.width()).label(),
                });
            };
            opens_right |= catalog.get(choice).has_opening(Direction::Right);
            grid.set(column, row, choice);
        }

        if last_column || opens_right {
            return Ok(attempts);
        }

        grid.clear_column(column);
        if let Some(limit) = max_attempts {
            if attempts >= limit {
                error!(
                    "[MapGen] Column {} never opened to the right in {} attempts",
                    column, attempts
                );
                return Err(MapGenError::ColumnRetriesExhausted { column, attempts });
            }
        }
    }
}

/// Build every column left to right into a fresh piece grid.
pub fn build_piece_grid(
    catalog: &PieceCatalog,
    width_in_pieces: usize,
    height_in_pieces: usize,
    max_attempts: Option<u32>,
    rng: &mut impl Rng,
) -> Result<PieceGrid, MapGenError> {
    let mut grid = PieceGrid::new(width_in_pieces, height_in_pieces);
    let mut retries = 0;
    for column in 0..width_in_pieces {
        retries += build_column(catalog, &mut grid, column, max_attempts, rng)? - 1;
    }
    debug!(
        "[MapGen] Solved {}x{} piece grid with {} column retries",
        width_in_pieces, height_in_pieces, retries
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::pieces::standard_catalog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Scans every internal boundary of a solved grid.
    fn assert_edges_match(catalog: &PieceCatalog, grid: &PieceGrid) {
        for column in 0..grid.width() {
            for row in 0..grid.height() {
                let id = grid.get(column, row).expect("grid should be complete");
                for direction in Direction::ALL {
                    let neighbor = grid.neighbor(column, row, direction);
                    assert!(
                        catalog.compatibility(id, neighbor, direction),
                        "column {column} row {row}: {:?} edge mismatch",
                        direction
                    );
                }
            }
        }
    }

    #[test]
    fn every_non_terminal_column_opens_right() {
        let catalog = standard_catalog().unwrap();
        for seed in 0_u64..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let grid = build_piece_grid(&catalog, 10, 5, Some(10_000), &mut rng).unwrap();
            assert!(grid.is_complete());
            for column in 0..grid.width() - 1 {
                let opens = grid
                    .column(column)
                    .iter()
                    .flatten()
                    .any(|&id| catalog.get(id).has_opening(Direction::Right));
                assert!(opens, "seed {seed}: column {column} has no right opening");
            }
        }
    }

    #[test]
    fn solved_grids_have_matching_edges() {
        let catalog = standard_catalog().unwrap();
        for seed in 0_u64..120 {
            let mut rng = StdRng::seed_from_u64(seed);
            let width = 3 + (seed as usize % 8);
            let height = 1 + (seed as usize % 6);
            let grid = build_piece_grid(&catalog, width, height, None, &mut rng).unwrap();
            assert_edges_match(&catalog, &grid);
        }
    }

    #[test]
    fn outer_rows_never_open_off_the_map() {
        let catalog = standard_catalog().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let grid = build_piece_grid(&catalog, 10, 5, None, &mut rng).unwrap();
        for column in 0..grid.width() {
            let top = grid.get(column, 0).unwrap();
            let bottom = grid.get(column, grid.height() - 1).unwrap();
            assert!(!catalog.get(top).has_opening(Direction::Up));
            assert!(!catalog.get(bottom).has_opening(Direction::Down));
        }
    }

    #[test]
    fn retry_ceiling_turns_dead_end_into_error() {
        // The only LEFT piece is blank, so column 0 can never open right.
        let mut catalog = PieceCatalog::new(3);
        catalog.register(&[0; 9], PieceClass::LEFT).unwrap();
        catalog
            .register(&[0, 0, 0, 1, 1, 1, 0, 0, 0], PieceClass::MIDDLE | PieceClass::RIGHT)
            .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let err = build_piece_grid(&catalog, 3, 2, Some(25), &mut rng).unwrap_err();
        assert!(matches!(
            err,
            MapGenError::ColumnRetriesExhausted { column: 0, attempts: 25 }
        ));
    }

    #[test]
    fn missing_candidates_abort_the_build() {
        // No MIDDLE piece at all.
        let mut catalog = PieceCatalog::new(3);
        catalog
            .register(&[0, 0, 0, 0, 1, 1, 0, 0, 0], PieceClass::LEFT)
            .unwrap();
        catalog.register(&[0; 9], PieceClass::RIGHT).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let err = build_piece_grid(&catalog, 3, 1, Some(10), &mut rng).unwrap_err();
        assert!(matches!(
            err,
            MapGenError::SolverExhausted { column: 1, row: 0, .. }
        ));
    }

    #[test]
    fn same_seed_same_grid() {
        let catalog = standard_catalog().unwrap();
        let a = build_piece_grid(&catalog, 10, 5, None, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = build_piece_grid(&catalog, 10, 5, None, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }
}
