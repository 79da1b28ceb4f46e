//! Candidate search for a single slot of the piece grid.

use bevy::prelude::*;

use super::debug::format_piece;
use crate::pieces::{PieceCatalog, PieceId};
use crate::shared::*;

/// Piece layout owned by one build.
///
/// Slots are stored column-major: slot (column, row) lives at
/// `column * height + row`, matching the order columns are generated in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceGrid {
    width: usize,
    height: usize,
    slots: Vec<Option<PieceId>>,
}

impl PieceGrid {
    pub fn new(width_in_pieces: usize, height_in_pieces: usize) -> Self {
        Self {
            width: width_in_pieces,
            height: height_in_pieces,
            slots: vec![None; width_in_pieces * height_in_pieces],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, column: usize, row: usize) -> Option<PieceId> {
        if column < self.width && row < self.height {
            self.slots[column * self.height + row]
        } else {
            None
        }
    }

    pub fn set(&mut self, column: usize, row: usize, piece: PieceId) {
        if column < self.width && row < self.height {
            self.slots[column * self.height + row] = Some(piece);
        }
    }

    /// The slots of one column, top to bottom.
    pub fn column(&self, column: usize) -> &[Option<PieceId>] {
        let start = column * self.height;
        &self.slots[start..start + self.height]
    }

    pub fn clear_column(&mut self, column: usize) {
        let start = column * self.height;
        for slot in &mut self.slots[start..start + self.height] {
            *slot = None;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// The piece next to (column, row) in `direction`, or `None` at the map
    /// boundary or when that slot is still empty.
    pub fn neighbor(&self, column: usize, row: usize, direction: Direction) -> Option<PieceId> {
        match direction {
            Direction::Up => row.checked_sub(1).and_then(|r| self.get(column, r)),
            Direction::Down => self.get(column, row + 1),
            Direction::Left => column.checked_sub(1).and_then(|c| self.get(c, row)),
            Direction::Right => self.get(column + 1, row),
        }
    }
}

/// Every catalog piece that may legally occupy (column, row), in catalog order.
///
/// An empty result is a normal outcome; the caller decides whether it is fatal.
pub fn possible_pieces(
    catalog: &PieceCatalog,
    grid: &PieceGrid,
    column: usize,
    row: usize,
) -> Vec<PieceId> {
    let class = PieceClass::for_column(column, grid.width());
    let top_row = row == 0;
    let bottom_row = row + 1 == grid.height();
    let neighbors = Direction::ALL.map(|d| (d, grid.neighbor(column, row, d)));
    let left = grid
        .neighbor(column, row, Direction::Left)
        .map(|id| catalog.get(id));

    catalog
        .iter()
        .filter(|(id, piece)| {
            if !piece.class().contains(class) {
                return false;
            }
            if !neighbors
                .iter()
                .all(|&(d, n)| catalog.compatibility(*id, n, d))
            {
                return false;
            }
            if (top_row && piece.has_opening(Direction::Up))
                || (bottom_row && piece.has_opening(Direction::Down))
            {
                return false;
            }
            // A middle piece must not push a path stub into a solid neighbor.
            if class == PieceClass::MIDDLE {
                if let Some(left) = left {
                    if !left.has_opening(Direction::Right) && piece.has_opening(Direction::Left) {
                        return false;
                    }
                }
            }
            true
        })
        .map(|(id, _)| id)
        .collect()
}

/// Everything the solver knew about a slot it could not fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDiagnostic {
    pub column: usize,
    pub row: usize,
    pub class: PieceClass,
    pub up: Option<PieceId>,
    pub right: Option<PieceId>,
    pub down: Option<PieceId>,
    pub left: Option<PieceId>,
    pub top_row: bool,
    pub bottom_row: bool,
}

impl SlotDiagnostic {
    pub fn capture(grid: &PieceGrid, column: usize, row: usize) -> Self {
        Self {
            column,
            row,
            class: PieceClass::for_column(column, grid.width()),
            up: grid.neighbor(column, row, Direction::Up),
            right: grid.neighbor(column, row, Direction::Right),
            down: grid.neighbor(column, row, Direction::Down),
            left: grid.neighbor(column, row, Direction::Left),
            top_row: row == 0,
            bottom_row: row + 1 == grid.height(),
        }
    }

    /// Dumps the neighbors and constraint flags for whoever edits the catalog next.
    pub fn log(&self, catalog: &PieceCatalog) {
        for (label, neighbor) in [
            ("Up", self.up),
            ("Right", self.right),
            ("Down", self.down),
            ("Left", self.left),
        ] {
            if let Some(id) = neighbor {
                error!(
                    "[MapGen] {} piece ({:?}):\n{}",
                    label,
                    id,
                    format_piece(catalog.get(id))
                );
            }
        }
        error!(
            "[MapGen] Fatal error: couldn't place piece at column {} row {} (class {})",
            self.column,
            self.row,
            self.class.label()
        );
        if self.top_row {
            error!("[MapGen] This piece can't have top openings.");
        }
        if self.bottom_row {
            error!("[MapGen] This piece can't have bottom openings.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::pieces::standard_catalog;

    fn ids_with(catalog: &PieceCatalog, f: impl Fn(&crate::pieces::PuzzlePiece) -> bool) -> Vec<PieceId> {
        catalog.iter().filter(|(_, p)| f(*p)).map(|(id, _)| id).collect()
    }

    #[test]
    fn neighbor_lookup_respects_boundaries() {
        let mut grid = PieceGrid::new(3, 2);
        grid.set(0, 0, PieceId(4));
        grid.set(1, 1, PieceId(7));
        assert_eq!(grid.neighbor(0, 1, Direction::Up), Some(PieceId(4)));
        assert_eq!(grid.neighbor(0, 0, Direction::Up), None);
        assert_eq!(grid.neighbor(0, 0, Direction::Left), None);
        assert_eq!(grid.neighbor(0, 1, Direction::Right), Some(PieceId(7)));
        assert_eq!(grid.neighbor(2, 1, Direction::Right), None);
        assert_eq!(grid.neighbor(1, 1, Direction::Down), None);
    }

    #[test]
    fn first_column_only_offers_left_pieces_without_vertical_openings() {
        let catalog = standard_catalog().unwrap();
        let grid = PieceGrid::new(4, 3);
        let candidates = possible_pieces(&catalog, &grid, 0, 0);
        assert!(!candidates.is_empty());
        for id in candidates {
            let piece = catalog.get(id);
            assert!(piece.class().contains(PieceClass::LEFT));
            assert!(!piece.has_opening(Direction::Up));
        }
    }

    #[test]
    fn last_column_only_offers_right_pieces() {
        let catalog = standard_catalog().unwrap();
        let grid = PieceGrid::new(4, 3);
        for id in possible_pieces(&catalog, &grid, 3, 1) {
            assert!(catalog.get(id).class().contains(PieceClass::RIGHT));
        }
    }

    #[test]
    fn closed_left_neighbor_excludes_left_openings() {
        let catalog = standard_catalog().unwrap();
        let blank = ids_with(&catalog, |p| p.cells().iter().all(|c| !c.is_path()))[0];
        let mut grid = PieceGrid::new(4, 1);
        grid.set(0, 0, blank);
        let candidates = possible_pieces(&catalog, &grid, 1, 0);
        assert!(candidates.contains(&blank));
        for id in candidates {
            assert!(
                !catalog.get(id).has_opening(Direction::Left),
                "piece {:?} opens into a blank neighbor",
                id
            );
        }
    }

    #[test]
    fn open_left_neighbor_forces_matching_edge() {
        let catalog = standard_catalog().unwrap();
        let stub = ids_with(&catalog, |p| p.class() == PieceClass::LEFT)[0];
        let mut grid = PieceGrid::new(4, 1);
        grid.set(0, 0, stub);
        let candidates = possible_pieces(&catalog, &grid, 1, 0);
        assert!(!candidates.is_empty());
        for id in candidates {
            assert!(catalog.compatibility(id, Some(stub), Direction::Left));
            // single-row map: no vertical openings anywhere
            assert!(!catalog.get(id).has_opening(Direction::Up));
            assert!(!catalog.get(id).has_opening(Direction::Down));
        }
    }

    #[test]
    fn bottom_row_rejects_bottom_openings() {
        let catalog = standard_catalog().unwrap();
        let grid = PieceGrid::new(5, 2);
        for id in possible_pieces(&catalog, &grid, 2, 1) {
            assert!(!catalog.get(id).has_opening(Direction::Down));
        }
    }

    #[test]
    fn empty_candidate_list_is_not_an_error() {
        // A catalog whose only middle piece opens upward can't fill a top-row slot.
        let mut catalog = PieceCatalog::new(3);
        catalog
            .register(&[0, 1, 0, 0, 1, 0, 0, 0, 0], PieceClass::MIDDLE)
            .unwrap();
        let grid = PieceGrid::new(3, 1);
        assert!(possible_pieces(&catalog, &grid, 1, 0).is_empty());

        let diagnostic = SlotDiagnostic::capture(&grid, 1, 0);
        assert_eq!(diagnostic.class, PieceClass::MIDDLE);
        assert!(diagnostic.top_row && diagnostic.bottom_row);
        assert_eq!(diagnostic.left, None);
    }
}
