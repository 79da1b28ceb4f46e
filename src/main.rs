use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use trailforge::data::DataPlugin;
use trailforge::mapgen::debug::format_map;
use trailforge::mapgen::MapGenPlugin;
use trailforge::pieces::PieceCatalog;
use trailforge::shared::*;

/// Frames to wait for the data layer before giving up.
const LOADING_FRAME_LIMIT: u32 = 10;

/// Generates one campaign map and prints it.
#[derive(Parser, Resource, Debug, Clone)]
#[command(name = "trailforge", version, about = "Procedural side-scroller campaign maps")]
struct CliOptions {
    /// Map width in tiles; a multiple of the piece size, at least three pieces.
    #[arg(long, default_value_t = 50)]
    width: usize,
    /// Map height in tiles; a multiple of the piece size.
    #[arg(long, default_value_t = 25)]
    height: usize,
    #[arg(
        long,
        default_value_t = MIN_DIFFICULTY,
        value_parser = clap::value_parser!(u8).range(MIN_DIFFICULTY as i64..=MAX_DIFFICULTY as i64)
    )]
    difficulty: u8,
    /// Fixed RNG seed. Overrides the seed in the settings file.
    #[arg(long)]
    seed: Option<u64>,
    /// RON settings file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Also write the map as pretty JSON.
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,
}

impl CliOptions {
    fn request(&self) -> MapRequest {
        MapRequest {
            width: self.width,
            height: self.height,
            difficulty: self.difficulty,
        }
    }
}

fn main() -> AppExit {
    let options = CliOptions::parse();

    let settings = match &options.config {
        Some(path) => match MapGenSettings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("could not load {}: {}", path.display(), e);
                return AppExit::from_code(2);
            }
        },
        None => MapGenSettings::default(),
    };

    App::new()
        .add_plugins((MinimalPlugins, StatesPlugin, LogPlugin::default()))
        // Gen state
        .init_state::<GenState>()
        // Shared resources
        .insert_resource(settings)
        .insert_resource(options)
        .init_resource::<PieceCatalog>()
        .init_resource::<TilesetRegistry>()
        .init_resource::<CurrentMap>()
        // Events
        .add_event::<GenerateMapEvent>()
        .add_event::<MapGeneratedEvent>()
        .add_event::<MapGenFailedEvent>()
        // Plugins
        .add_plugins(DataPlugin)
        .add_plugins(MapGenPlugin)
        // Driver
        .add_systems(OnEnter(GenState::Ready), request_map)
        .add_systems(Update, give_up_loading.run_if(in_state(GenState::Loading)))
        .add_systems(Update, report_result.run_if(in_state(GenState::Ready)))
        .run()
}

fn request_map(options: Res<CliOptions>, mut requests: EventWriter<GenerateMapEvent>) {
    requests.send(GenerateMapEvent {
        request: options.request(),
        seed: options.seed,
    });
}

fn give_up_loading(mut frames: Local<u32>, mut exit: EventWriter<AppExit>) {
    *frames += 1;
    if *frames > LOADING_FRAME_LIMIT {
        error!("[Data] registries never finished loading");
        exit.send(AppExit::from_code(1));
    }
}

fn report_result(
    options: Res<CliOptions>,
    current: Res<CurrentMap>,
    tilesets: Res<TilesetRegistry>,
    mut generated: EventReader<MapGeneratedEvent>,
    mut failed: EventReader<MapGenFailedEvent>,
    mut exit: EventWriter<AppExit>,
) {
    if let Some(failure) = failed.read().last() {
        error!("[MapGen] {}", failure.reason);
        exit.send(AppExit::from_code(1));
        return;
    }
    if generated.read().last().is_none() {
        return;
    }
    let Some(map) = current.0.as_ref() else {
        return;
    };

    if let Some(tileset) = tilesets.get(map.tileset_id) {
        println!("{} ({}x{}, difficulty {})", tileset.name, map.width, map.height, map.difficulty);
        println!("{}", format_map(map, tileset));
    }

    if let Some(path) = &options.json {
        if let Err(e) = write_json(map, path) {
            error!("[MapGen] could not write {}: {}", path.display(), e);
            exit.send(AppExit::from_code(1));
            return;
        }
        info!("[MapGen] wrote {}", path.display());
    }

    exit.send(AppExit::Success);
}

fn write_json(map: &CampaignMap, path: &Path) -> Result<(), MapGenError> {
    fs::write(path, map.to_json()?)?;
    Ok(())
}
