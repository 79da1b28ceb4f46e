//! Puzzle pieces and the catalog they live in.
//!
//! A piece is a fixed-size square of path / non-path cells tagged with the
//! columns it may occupy. Its four edge openings are derived once when the
//! piece is registered; compatibility between two pieces is a pure
//! comparison of their facing edges.

mod catalog;
mod piece;

pub use catalog::{PieceCatalog, PieceId};
pub use piece::{Openings, PuzzlePiece};
