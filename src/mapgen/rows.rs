//! Vertical padding cleanup.
//!
//! After this pass the map has exactly one blank row above and below the
//! path, and no interior gap of blank rows longer than the configured
//! maximum. Blank rows carry no path cells, so removing them never cuts a
//! vertical connection.

use bevy::prelude::*;

use crate::shared::*;

/// Normalize blank rows of `tiles` in place. Returns how many rows were removed.
pub fn normalize_blank_rows(tiles: &mut TileGrid, max_consecutive_blank_rows: usize) -> usize {
    let starting_height = tiles.height;

    while tiles.height > 0 && tiles.is_row_blank(0) {
        tiles.remove_row(0);
    }
    while tiles.height > 0 && tiles.is_row_blank(tiles.height - 1) {
        tiles.remove_row(tiles.height - 1);
    }

    let mut y = 0;
    while y < tiles.height {
        if !tiles.is_row_blank(y) {
            y += 1;
            continue;
        }
        let start = y;
        while y < tiles.height && tiles.is_row_blank(y) {
            y += 1;
        }
        let run = y - start;
        if run > max_consecutive_blank_rows {
            for _ in 0..run {
                tiles.remove_row(start);
            }
            y = start;
        }
    }

    let removed = starting_height - tiles.height;

    tiles.insert_blank_row(0);
    tiles.insert_blank_row(tiles.height);

    debug!(
        "[MapGen] Row normalization removed {} rows, height now {}",
        removed, tiles.height
    );
    removed
}

/// Every maximal run of blank rows as `(first_row, length)`, top to bottom.
pub fn blank_runs(tiles: &TileGrid) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut y = 0;
    while y < tiles.height {
        if tiles.is_row_blank(y) {
            let start = y;
            while y < tiles.height && tiles.is_row_blank(y) {
                y += 1;
            }
            runs.push((start, y - start));
        } else {
            y += 1;
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One column wide: `1` rows carry a path cell, `0` rows are blank.
    fn column(rows: &[u8]) -> TileGrid {
        TileGrid {
            width: 1,
            height: rows.len(),
            cells: rows.iter().map(|&b| PathCell::from_bit(b).unwrap()).collect(),
        }
    }

    fn rows_of(tiles: &TileGrid) -> Vec<u8> {
        tiles.cells.iter().map(|c| c.is_path() as u8).collect()
    }

    #[test]
    fn outer_padding_becomes_a_single_blank_row() {
        let mut tiles = column(&[0, 0, 0, 1, 0, 1, 0, 0]);
        normalize_blank_rows(&mut tiles, 5);
        assert_eq!(rows_of(&tiles), vec![0, 1, 0, 1, 0]);
        assert_eq!(tiles.cells.len(), tiles.width * tiles.height);
    }

    #[test]
    fn long_interior_gaps_are_removed_entirely() {
        let mut tiles = column(&[1, 0, 0, 0, 1, 0, 0, 1]);
        let removed = normalize_blank_rows(&mut tiles, 2);
        assert_eq!(rows_of(&tiles), vec![0, 1, 1, 0, 0, 1, 0]);
        assert_eq!(removed, 3);
    }

    #[test]
    fn gaps_at_the_maximum_survive() {
        let mut tiles = column(&[1, 0, 0, 1]);
        normalize_blank_rows(&mut tiles, 2);
        assert_eq!(rows_of(&tiles), vec![0, 1, 0, 0, 1, 0]);
    }

    #[test]
    fn wide_rows_are_blank_only_without_any_path_cell() {
        let mut tiles = TileGrid::blank(3, 4);
        tiles.set(2, 1, PathCell::Path);
        tiles.set(0, 2, PathCell::Path);
        normalize_blank_rows(&mut tiles, 1);
        assert_eq!(tiles.height, 4);
        assert!(tiles.is_row_blank(0));
        assert!(!tiles.is_row_blank(1));
        assert!(!tiles.is_row_blank(2));
        assert!(tiles.is_row_blank(3));
    }

    #[test]
    fn all_blank_grid_collapses_to_two_rows() {
        let mut tiles = TileGrid::blank(4, 6);
        normalize_blank_rows(&mut tiles, 3);
        assert_eq!(tiles.height, 2);
        assert_eq!(tiles.cells.len(), 8);
    }

    #[test]
    fn blank_runs_reports_every_gap() {
        let tiles = column(&[0, 1, 0, 0, 1, 0]);
        assert_eq!(blank_runs(&tiles), vec![(0, 1), (2, 2), (5, 1)]);
    }
}
