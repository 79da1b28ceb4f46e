//! Flattening the piece grid into tiles, and skinning tiles with a tileset.

use crate::pieces::PieceCatalog;
use crate::shared::*;

use super::solver::PieceGrid;

/// Copy every placed piece into a marker grid at tile resolution.
///
/// Empty slots stay blank; a complete grid has none.
pub fn assemble_tiles(catalog: &PieceCatalog, pieces: &PieceGrid) -> TileGrid {
    let size = catalog.piece_size();
    let mut tiles = TileGrid::blank(pieces.width() * size, pieces.height() * size);

    for column in 0..pieces.width() {
        for row in 0..pieces.height() {
            let Some(id) = pieces.get(column, row) else {
                continue;
            };
            let piece = catalog.get(id);
            for y in 0..size {
                for x in 0..size {
                    tiles.set(column * size + x, row * size + y, piece.cell(x, y));
                }
            }
        }
    }
    tiles
}

/// Replace every marker with the tileset's ground graphic.
pub fn apply_tileset(tiles: &TileGrid, tileset: &Tileset) -> Vec<u32> {
    tiles.cells.iter().map(|&cell| tileset.graphic_for(cell)).collect()
}
