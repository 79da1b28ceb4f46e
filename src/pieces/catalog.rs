//! The piece catalog: every fragment the solver may place, indexed by `PieceId`.

use bevy::prelude::*;

use super::piece::PuzzlePiece;
use crate::shared::*;

/// Index of a piece inside its catalog. Slots hold these rather than owning pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub usize);

/// Read-only once populated by the data layer.
#[derive(Resource, Debug, Clone)]
pub struct PieceCatalog {
    piece_size: usize,
    pieces: Vec<PuzzlePiece>,
}

impl Default for PieceCatalog {
    fn default() -> Self {
        Self::new(PUZZLE_PIECE_SIZE)
    }
}

impl PieceCatalog {
    pub fn new(piece_size: usize) -> Self {
        Self {
            piece_size,
            pieces: Vec::new(),
        }
    }

    pub fn piece_size(&self) -> usize {
        self.piece_size
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Adds one piece. Fails only on an authoring mistake in `pattern`.
    pub fn register(&mut self, pattern: &[u8], class: PieceClass) -> Result<PieceId, MapGenError> {
        let piece = PuzzlePiece::new(self.piece_size, pattern, class)?;
        self.pieces.push(piece);
        Ok(PieceId(self.pieces.len() - 1))
    }

    pub fn get(&self, id: PieceId) -> &PuzzlePiece {
        &self.pieces[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PieceId, &PuzzlePiece)> {
        self.pieces.iter().enumerate().map(|(i, p)| (PieceId(i), p))
    }

    /// Whether `piece` can have `neighbor` on its `direction` side.
    pub fn compatibility(&self, piece: PieceId, neighbor: Option<PieceId>, direction: Direction) -> bool {
        self.get(piece)
            .fits_against(neighbor.map(|n| self.get(n)), direction)
    }

    /// Startup check: every position class is covered by at least one piece.
    /// Openings need no check here; `PuzzlePiece::new` derives them.
    pub fn validate(&self) -> Result<(), MapGenError> {
        if self.pieces.is_empty() {
            return Err(MapGenError::IncompleteCatalog("catalog has no pieces".into()));
        }
        for class in [PieceClass::LEFT, PieceClass::MIDDLE, PieceClass::RIGHT] {
            if !self.pieces.iter().any(|p| p.class().contains(class)) {
                return Err(MapGenError::IncompleteCatalog(format!(
                    "no piece may occupy a {} column",
                    class.label()
                )));
            }
        }
        Ok(())
    }
}
