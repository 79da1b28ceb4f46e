//! Scenery overlay placement.
//!
//! Each doodad is tried at random anchors a fixed number of times; an anchor
//! is accepted only if none of the doodad's on-map cells is a path tile or
//! already decorated. Big doodads go first so small ones can't fragment the
//! free space they need.
//!
//! Anchors may hang off the map by up to `width - 1` / `height - 1` tiles so
//! that partial doodads show along the edges. Off-map cells are neither
//! checked nor written.

use rand::Rng;

use crate::shared::*;

/// One accepted placement: which tileset doodad went where (top-left anchor).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoodadPlacement {
    pub doodad: usize,
    pub x: i32,
    pub y: i32,
}

/// Decoration layer parallel to the tile grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoodadLayer {
    pub cells: Vec<Option<u32>>,
    pub placements: Vec<DoodadPlacement>,
}

/// On-map cells covered by `doodad` anchored at (x, y), as
/// `(flat tile index, graphic index)`.
pub fn footprint<'a>(
    doodad: &'a Doodad,
    x: i32,
    y: i32,
    grid_width: usize,
    grid_height: usize,
) -> impl Iterator<Item = (usize, u32)> + 'a {
    doodad
        .graphic_indices
        .iter()
        .enumerate()
        .filter_map(move |(i, &graphic)| {
            let tx = x + (i % doodad.width) as i32;
            let ty = y + (i / doodad.width) as i32;
            if tx < 0 || ty < 0 || tx >= grid_width as i32 || ty >= grid_height as i32 {
                None
            } else {
                Some((ty as usize * grid_width + tx as usize, graphic))
            }
        })
}

/// Whether `doodad` anchored at (x, y) touches no path tile and no decoration.
pub fn can_place(tiles: &TileGrid, cells: &[Option<u32>], doodad: &Doodad, x: i32, y: i32) -> bool {
    footprint(doodad, x, y, tiles.width, tiles.height)
        .all(|(idx, _)| !tiles.cells[idx].is_path() && cells[idx].is_none())
}

/// How many anchors to try for `doodad`.
///
/// The map's share of doodads (`tiles / density / kinds`) is scaled by the
/// doodad's footprint, capped, then divided by its rarity.
pub fn attempt_budget(
    doodad: &Doodad,
    grid_width: usize,
    grid_height: usize,
    doodad_kinds: usize,
    settings: &MapGenSettings,
) -> u32 {
    if doodad_kinds == 0 {
        return 0;
    }
    let per_square =
        (grid_width * grid_height) as f64 / settings.doodad_density / doodad_kinds as f64;
    let attempts = (doodad.area() as f64 * per_square).min(settings.max_doodad_attempts) / doodad.rarity;
    attempts.ceil().max(0.0) as u32
}

/// Scatter the tileset's doodads over the non-path tiles of `tiles`.
pub fn place_doodads(
    tiles: &TileGrid,
    tileset: &Tileset,
    settings: &MapGenSettings,
    rng: &mut impl Rng,
) -> DoodadLayer {
    let mut layer = DoodadLayer {
        cells: vec![None; tiles.cells.len()],
        placements: Vec::new(),
    };
    if tiles.width == 0 || tiles.height == 0 {
        return layer;
    }

    // Stable sort, so equal-area doodads keep their tileset order.
    let mut order: Vec<usize> = (0..tileset.doodads.len()).collect();
    order.sort_by(|&a, &b| tileset.doodads[b].area().cmp(&tileset.doodads[a].area()));

    for index in order {
        let doodad = &tileset.doodads[index];
        if doodad.width == 0 || doodad.height == 0 {
            continue;
        }
        let attempts = attempt_budget(
            doodad,
            tiles.width,
            tiles.height,
            tileset.doodads.len(),
            settings,
        );
        for _ in 0..attempts {
            let x = rng.gen_range(1 - doodad.width as i32..tiles.width as i32);
            let y = rng.gen_range(1 - doodad.height as i32..tiles.height as i32);
            if !can_place(tiles, &layer.cells, doodad, x, y) {
                continue;
            }
            for (idx, graphic) in footprint(doodad, x, y, tiles.width, tiles.height) {
                layer.cells[idx] = Some(graphic);
            }
            layer.placements.push(DoodadPlacement { doodad: index, x, y });
        }
    }
    layer
}
