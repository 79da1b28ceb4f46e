//! Data layer: populates the generator's registries at startup.
//!
//! This plugin runs in OnEnter(GenState::Loading), fills the PieceCatalog
//! and TilesetRegistry from the hard-coded design data defined in
//! submodules, validates both, then transitions to GenState::Ready.
//!
//! A validation failure leaves the app in Loading, so no map request is
//! ever served against a broken catalog.

pub mod pieces;
pub mod tilesets;

use bevy::prelude::*;

use crate::pieces::PieceCatalog;
use crate::shared::*;

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GenState::Loading), load_all_data);
    }
}

/// Single system that populates every registry and then transitions to Ready.
fn load_all_data(
    mut catalog: ResMut<PieceCatalog>,
    mut registry: ResMut<TilesetRegistry>,
    mut next_state: ResMut<NextState<GenState>>,
) {
    info!("[Data] populating registries…");

    let mut fresh = PieceCatalog::new(PUZZLE_PIECE_SIZE);
    if let Err(e) = pieces::populate_pieces(&mut fresh).and_then(|_| fresh.validate()) {
        error!("[Data] piece catalog rejected: {}", e);
        return;
    }
    *catalog = fresh;
    info!("  Puzzle pieces loaded: {}", catalog.len());

    tilesets::populate_tilesets(&mut registry);
    if let Some((tileset, e)) = registry
        .tilesets
        .iter()
        .find_map(|t| t.validate().err().map(|e| (t.name.clone(), e)))
    {
        error!("[Data] tileset '{}' rejected: {}", tileset, e);
        return;
    }
    let doodad_count: usize = registry.tilesets.iter().map(|t| t.doodads.len()).sum();
    info!(
        "  Tilesets loaded: {} with {} doodads",
        registry.tilesets.len(),
        doodad_count
    );

    next_state.set(GenState::Ready);
}
