//! A single puzzle piece: a square path pattern with precomputed edge openings.

use crate::shared::*;

/// Per-edge flags: does the pattern have a path cell touching that edge?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Openings {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Openings {
    pub fn get(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.top,
            Direction::Right => self.right,
            Direction::Down => self.bottom,
            Direction::Left => self.left,
        }
    }
}

/// Immutable template fragment. Built once when the catalog is populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzlePiece {
    size: usize,
    cells: Vec<PathCell>,
    class: PieceClass,
    openings: Openings,
}

impl PuzzlePiece {
    /// Builds a piece from a row-major `0`/`1` pattern of `size * size` cells.
    pub fn new(size: usize, pattern: &[u8], class: PieceClass) -> Result<Self, MapGenError> {
        if size == 0 {
            return Err(MapGenError::MalformedPiece("piece size must be positive".into()));
        }
        if pattern.len() != size * size {
            return Err(MapGenError::MalformedPiece(format!(
                "pattern has {} cells, expected {}",
                pattern.len(),
                size * size
            )));
        }
        if class.is_empty() {
            return Err(MapGenError::MalformedPiece(
                "piece has no position class".into(),
            ));
        }
        let cells = pattern
            .iter()
            .enumerate()
            .map(|(i, &bit)| {
                PathCell::from_bit(bit).ok_or_else(|| {
                    MapGenError::MalformedPiece(format!("cell {} has value {}", i, bit))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let openings = derive_openings(size, &cells);

        Ok(Self {
            size,
            cells,
            class,
            openings,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn class(&self) -> PieceClass {
        self.class
    }

    pub fn openings(&self) -> Openings {
        self.openings
    }

    pub fn has_opening(&self, direction: Direction) -> bool {
        self.openings.get(direction)
    }

    pub fn cell(&self, x: usize, y: usize) -> PathCell {
        self.cells[y * self.size + x]
    }

    pub fn cells(&self) -> &[PathCell] {
        &self.cells
    }

    /// Cells along the edge facing `direction`, left-to-right for horizontal
    /// edges and top-to-bottom for vertical ones.
    pub fn edge(&self, direction: Direction) -> Vec<PathCell> {
        edge_cells(self.size, &self.cells, direction)
    }

    /// Whether this piece can sit with `neighbor` on its `direction` side.
    ///
    /// Edges match when every aligned cell pair agrees. A missing neighbor
    /// (map boundary or unfilled slot) is always compatible; boundary openings
    /// are policed by the solver instead.
    pub fn fits_against(&self, neighbor: Option<&PuzzlePiece>, direction: Direction) -> bool {
        match neighbor {
            None => true,
            Some(other) => {
                other.size == self.size
                    && self.edge(direction) == other.edge(direction.opposite())
            }
        }
    }
}

fn edge_cells(size: usize, cells: &[PathCell], direction: Direction) -> Vec<PathCell> {
    match direction {
        Direction::Up => (0..size).map(|x| cells[x]).collect(),
        Direction::Down => (0..size).map(|x| cells[(size - 1) * size + x]).collect(),
        Direction::Left => (0..size).map(|y| cells[y * size]).collect(),
        Direction::Right => (0..size).map(|y| cells[y * size + size - 1]).collect(),
    }
}

fn derive_openings(size: usize, cells: &[PathCell]) -> Openings {
    let open = |direction| edge_cells(size, cells, direction).iter().any(|c| c.is_path());
    Openings {
        top: open(Direction::Up),
        right: open(Direction::Right),
        bottom: open(Direction::Down),
        left: open(Direction::Left),
    }
}
