//! Map generation plugin for Trailforge.
//!
//! Provides:
//! - Slot candidate search against the piece catalog (solver)
//! - Column-by-column piece placement with whole-column retry (columns)
//! - Flattening pieces into tiles and skinning them with a tileset (assemble)
//! - Blank-row trimming (rows)
//! - Doodad scattering (doodads)
//! - Text dumps for logs and the CLI (debug)
//!
//! A build owns all of its intermediate state and hands back a finished
//! `CampaignMap`. The plugin serves `GenerateMapEvent`s once the data layer
//! has reached `GenState::Ready`.

pub mod assemble;
pub mod columns;
pub mod debug;
pub mod doodads;
pub mod rows;
pub mod solver;

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::pieces::PieceCatalog;
use crate::shared::*;

pub use doodads::{DoodadLayer, DoodadPlacement};
pub use solver::{PieceGrid, SlotDiagnostic};

pub struct MapGenPlugin;

impl Plugin for MapGenPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            handle_generate_requests.run_if(in_state(GenState::Ready)),
        );
    }
}

/// Everything one build produced, for callers that need more than the map.
#[derive(Debug, Clone)]
pub struct MapBuild {
    pub pieces: PieceGrid,
    pub tiles: TileGrid,
    pub doodads: DoodadLayer,
    pub map: CampaignMap,
}

/// Runs the full pipeline and keeps the intermediate layers.
///
/// Order: pick tileset → solve columns → flatten → trim blank rows →
/// scatter doodads → apply tileset graphics.
pub fn build_map(
    request: MapRequest,
    catalog: &PieceCatalog,
    tilesets: &TilesetRegistry,
    settings: &MapGenSettings,
    rng: &mut impl Rng,
) -> Result<MapBuild, MapGenError> {
    request.validate()?;
    settings.validate()?;
    catalog.validate()?;
    if catalog.piece_size() != PUZZLE_PIECE_SIZE {
        return Err(MapGenError::IncompleteCatalog(format!(
            "catalog pieces are {} tiles wide, maps are cut into {}",
            catalog.piece_size(),
            PUZZLE_PIECE_SIZE
        )));
    }

    let tileset = tilesets.tilesets.choose(rng).ok_or(MapGenError::NoTilesets)?;
    tileset.validate()?;

    let pieces = columns::build_piece_grid(
        catalog,
        request.width_in_pieces(),
        request.height_in_pieces(),
        settings.max_column_attempts,
        rng,
    )?;

    let mut tiles = assemble::assemble_tiles(catalog, &pieces);
    let removed = rows::normalize_blank_rows(&mut tiles, settings.max_consecutive_blank_rows);
    debug!(
        "[MapGen] {} blank rows trimmed, markers:\n{}",
        removed,
        debug::format_tiles(&tiles)
    );

    let doodads = doodads::place_doodads(&tiles, tileset, settings, rng);

    let map = CampaignMap {
        width: tiles.width,
        height: tiles.height,
        tiles: assemble::apply_tileset(&tiles, tileset),
        doodads: doodads.cells.clone(),
        tileset_id: tileset.id,
        difficulty: request.difficulty,
    };

    Ok(MapBuild {
        pieces,
        tiles,
        doodads,
        map,
    })
}

/// Generate a random map of `request.width` by `request.height` tiles.
///
/// The returned height differs from the requested one once blank rows are
/// trimmed and the two border rows are added.
pub fn generate_random_map(
    request: MapRequest,
    catalog: &PieceCatalog,
    tilesets: &TilesetRegistry,
    settings: &MapGenSettings,
    rng: &mut impl Rng,
) -> Result<CampaignMap, MapGenError> {
    build_map(request, catalog, tilesets, settings, rng).map(|build| build.map)
}

/// System: build a map for every pending request and publish the newest one.
pub fn handle_generate_requests(
    mut requests: EventReader<GenerateMapEvent>,
    catalog: Res<PieceCatalog>,
    tilesets: Res<TilesetRegistry>,
    settings: Res<MapGenSettings>,
    mut current: ResMut<CurrentMap>,
    mut generated: EventWriter<MapGeneratedEvent>,
    mut failed: EventWriter<MapGenFailedEvent>,
) {
    for event in requests.read() {
        let mut rng = match event.seed.or(settings.seed) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        match generate_random_map(event.request, &catalog, &tilesets, &settings, &mut rng) {
            Ok(map) => {
                info!(
                    "[MapGen] Generated {}x{} map (tileset {}, difficulty {})",
                    map.width, map.height, map.tileset_id, map.difficulty
                );
                generated.send(MapGeneratedEvent {
                    width: map.width,
                    height: map.height,
                    tileset_id: map.tileset_id,
                    difficulty: map.difficulty,
                });
                current.0 = Some(map);
            }
            Err(e) => {
                error!(
                    "[MapGen] Fatal map generation error for {}x{}: {}",
                    event.request.width, event.request.height, e
                );
                failed.send(MapGenFailedEvent {
                    reason: e.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::pieces::standard_catalog;
    use crate::data::tilesets::populate_tilesets;

    fn registries() -> (PieceCatalog, TilesetRegistry) {
        let mut tilesets = TilesetRegistry::default();
        populate_tilesets(&mut tilesets);
        (standard_catalog().unwrap(), tilesets)
    }

    fn request(width: usize, height: usize) -> MapRequest {
        MapRequest {
            width,
            height,
            difficulty: 1,
        }
    }

    #[test]
    fn campaign_size_map_builds() {
        let (catalog, tilesets) = registries();
        let settings = MapGenSettings::default();
        let mut rng = StdRng::seed_from_u64(2024);
        let map = generate_random_map(request(50, 25), &catalog, &tilesets, &settings, &mut rng)
            .unwrap();
        assert_eq!(map.width, 50);
        assert_eq!(map.tiles.len(), map.width * map.height);
        assert_eq!(map.doodads.len(), map.tiles.len());
        // trimming only ever shrinks the grid below the requested height
        assert!(map.height >= 3 && map.height <= 25, "height {}", map.height);
        assert_eq!(map.difficulty, 1);
        assert!(tilesets.get(map.tileset_id).is_some());
    }

    #[test]
    fn finished_maps_hold_every_invariant() {
        let (catalog, tilesets) = registries();
        let settings = MapGenSettings::default();
        let max_run = settings.max_consecutive_blank_rows;

        for seed in 0_u64..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let width = 15 + 5 * (seed as usize % 8);
            let height = 5 + 5 * (seed as usize % 6);
            let build = build_map(request(width, height), &catalog, &tilesets, &settings, &mut rng)
                .unwrap_or_else(|e| panic!("seed {seed} ({width}x{height}) failed: {e}"));
            let tiles = &build.tiles;
            let map = &build.map;

            assert_eq!(map.tiles.len(), map.width * map.height);
            assert_eq!(tiles.cells.len(), map.tiles.len());

            // exactly one blank row at each end
            assert!(tiles.is_row_blank(0));
            assert!(tiles.is_row_blank(tiles.height - 1));
            assert!(!tiles.is_row_blank(1), "seed {seed}: two blank rows on top");
            assert!(!tiles.is_row_blank(tiles.height - 2), "seed {seed}: two blank rows at bottom");

            for (start, len) in rows::blank_runs(tiles) {
                assert!(
                    len <= max_run,
                    "seed {seed}: blank run of {len} rows at {start}"
                );
            }

            // path tiles never carry a doodad
            for (cell, doodad) in tiles.cells.iter().zip(&map.doodads) {
                assert!(!(cell.is_path() && doodad.is_some()), "seed {seed}: doodad on path");
            }

            let tileset = tilesets.get(map.tileset_id).unwrap();
            for (cell, &graphic) in tiles.cells.iter().zip(&map.tiles) {
                assert_eq!(graphic, tileset.graphic_for(*cell));
            }
        }
    }

    #[test]
    fn path_reaches_both_side_edges() {
        let (catalog, tilesets) = registries();
        let settings = MapGenSettings::default();
        for seed in 0_u64..20 {
            let build = build_map(
                request(50, 25),
                &catalog,
                &tilesets,
                &settings,
                &mut StdRng::seed_from_u64(seed),
            )
            .unwrap();
            let tiles = &build.tiles;
            let any_path_in_column = |x: usize| (0..tiles.height).any(|y| tiles.cells[tiles.index(x, y)].is_path());
            // start stub begins two tiles in; end stub stops two tiles short
            assert!(any_path_in_column(2), "seed {seed}: no path near left edge");
            assert!(any_path_in_column(tiles.width - 3), "seed {seed}: no path near right edge");
        }
    }

    #[test]
    fn same_seed_same_map() {
        let (catalog, tilesets) = registries();
        let settings = MapGenSettings::default();
        let a = generate_random_map(request(50, 25), &catalog, &tilesets, &settings, &mut StdRng::seed_from_u64(5)).unwrap();
        let b = generate_random_map(request(50, 25), &catalog, &tilesets, &settings, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn configuration_errors_stop_before_generation() {
        let (catalog, tilesets) = registries();
        let settings = MapGenSettings::default();
        let mut rng = StdRng::seed_from_u64(0);

        let bad = MapRequest {
            width: 50,
            height: 25,
            difficulty: 9,
        };
        assert!(matches!(
            generate_random_map(bad, &catalog, &tilesets, &settings, &mut rng),
            Err(MapGenError::InvalidDifficulty { .. })
        ));

        let empty = TilesetRegistry::default();
        assert!(matches!(
            generate_random_map(request(50, 25), &catalog, &empty, &settings, &mut rng),
            Err(MapGenError::NoTilesets)
        ));

        let zero_gap = MapGenSettings {
            max_consecutive_blank_rows: 0,
            ..MapGenSettings::default()
        };
        assert!(matches!(
            generate_random_map(request(50, 25), &catalog, &tilesets, &zero_gap, &mut rng),
            Err(MapGenError::InvalidSettings(_))
        ));
    }
}
