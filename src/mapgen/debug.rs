//! Plain-text dumps of pieces, columns and maps for logs and the CLI.
//!
//! `#` is a path tile, `.` is background, `*` is background under a doodad.

use crate::pieces::{PieceCatalog, PuzzlePiece};
use crate::shared::*;

use super::solver::PieceGrid;

fn cell_char(cell: PathCell) -> char {
    if cell.is_path() {
        '#'
    } else {
        '.'
    }
}

pub fn format_piece(piece: &PuzzlePiece) -> String {
    let size = piece.size();
    let mut out = String::with_capacity(size * (size + 1));
    for y in 0..size {
        if y > 0 {
            out.push('\n');
        }
        for x in 0..size {
            out.push(cell_char(piece.cell(x, y)));
        }
    }
    out
}

/// Every piece of one column, top to bottom, separated by blank lines.
pub fn format_column(catalog: &PieceCatalog, grid: &PieceGrid, column: usize) -> String {
    grid.column(column)
        .iter()
        .map(|slot| match slot {
            Some(id) => format_piece(catalog.get(*id)),
            None => "(empty)".to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn format_tiles(tiles: &TileGrid) -> String {
    (0..tiles.height)
        .map(|y| tiles.row(y).iter().map(|&c| cell_char(c)).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders a finished map, marking doodad-covered tiles.
pub fn format_map(map: &CampaignMap, tileset: &Tileset) -> String {
    let mut lines = Vec::with_capacity(map.height);
    for y in 0..map.height {
        let mut line = String::with_capacity(map.width);
        for x in 0..map.width {
            let idx = y * map.width + x;
            let ch = if map.tiles[idx] == tileset.walkable_tile_graphic {
                '#'
            } else if map.doodads[idx].is_some() {
                '*'
            } else {
                '.'
            };
            line.push(ch);
        }
        lines.push(line);
    }
    lines.join("\n")
}
