//! Shared types, resources, events, and states for Trailforge.
//!
//! This is the type contract. Every plugin imports from here.
//! No plugin imports from any other plugin directly, except through the
//! pure generation functions re-exported by `mapgen`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::BitOr;
use std::path::Path;

// ═══════════════════════════════════════════════════════════════════════
// GEN STATE: registries must be loaded before any map is built
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GenState {
    #[default]
    Loading,
    Ready,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

/// Edge length, in tiles, of every puzzle piece.
pub const PUZZLE_PIECE_SIZE: usize = 5;

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 4;

/// Narrowest map (in pieces) that still has a LEFT, a MIDDLE and a RIGHT column.
pub const MIN_WIDTH_IN_PIECES: usize = 3;

// ═══════════════════════════════════════════════════════════════════════
// TILE MARKERS
// ═══════════════════════════════════════════════════════════════════════

/// Walkability marker for a single tile before the tileset is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PathCell {
    #[default]
    Blank,
    Path,
}

impl PathCell {
    /// Converts an authored `0`/`1` cell. Anything else is malformed.
    pub fn from_bit(bit: u8) -> Option<Self> {
        match bit {
            0 => Some(PathCell::Blank),
            1 => Some(PathCell::Path),
            _ => None,
        }
    }

    pub fn is_path(self) -> bool {
        self == PathCell::Path
    }
}

/// Row-major marker grid: `cells[y * width + x]`.
///
/// Every row operation keeps `cells.len() == width * height`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<PathCell>,
}

impl TileGrid {
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![PathCell::Blank; width * height],
        }
    }

    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Bounds-checked lookup; off-grid coordinates return `None`.
    pub fn get(&self, x: i32, y: i32) -> Option<PathCell> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            None
        } else {
            Some(self.cells[self.index(x as usize, y as usize)])
        }
    }

    pub fn set(&mut self, x: usize, y: usize, cell: PathCell) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.cells[idx] = cell;
        }
    }

    pub fn row(&self, y: usize) -> &[PathCell] {
        let start = y * self.width;
        &self.cells[start..start + self.width]
    }

    /// A row is blank when none of its cells is a path cell.
    pub fn is_row_blank(&self, y: usize) -> bool {
        self.row(y).iter().all(|cell| !cell.is_path())
    }

    pub fn remove_row(&mut self, y: usize) {
        if y >= self.height {
            return;
        }
        let start = y * self.width;
        self.cells.drain(start..start + self.width);
        self.height -= 1;
    }

    /// Inserts a blank row so that it becomes row `y`. `y == height` appends.
    pub fn insert_blank_row(&mut self, y: usize) {
        let y = y.min(self.height);
        let start = y * self.width;
        self.cells.splice(
            start..start,
            std::iter::repeat(PathCell::Blank).take(self.width),
        );
        self.height += 1;
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PIECE EDGES
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }
}

/// Which columns of the map a piece may occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PieceClass(pub u8);

impl PieceClass {
    pub const NONE: PieceClass = PieceClass(0);
    pub const LEFT: PieceClass = PieceClass(0b001);
    pub const MIDDLE: PieceClass = PieceClass(0b010);
    pub const RIGHT: PieceClass = PieceClass(0b100);
    pub const ANY: PieceClass = PieceClass(0b111);

    pub fn contains(self, other: PieceClass) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 & Self::ANY.0 == 0
    }

    /// Class required for a slot in `column` of a map `width_in_pieces` wide.
    pub fn for_column(column: usize, width_in_pieces: usize) -> Self {
        if column == 0 {
            PieceClass::LEFT
        } else if column + 1 == width_in_pieces {
            PieceClass::RIGHT
        } else {
            PieceClass::MIDDLE
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PieceClass::LEFT => "LEFT",
            PieceClass::MIDDLE => "MIDDLE",
            PieceClass::RIGHT => "RIGHT",
            PieceClass::NONE => "NONE",
            _ => "MIXED",
        }
    }
}

impl BitOr for PieceClass {
    type Output = PieceClass;

    fn bitor(self, rhs: PieceClass) -> PieceClass {
        PieceClass(self.0 | rhs.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// TILESETS
// ═══════════════════════════════════════════════════════════════════════

/// Decorative overlay stamped onto non-path tiles after the path is final.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doodad {
    pub name: String,
    pub width: usize,
    pub height: usize,
    /// Row-major graphic indices, `width * height` long.
    pub graphic_indices: Vec<u32>,
    /// Placement attempts are divided by this, so larger values are rarer.
    pub rarity: f64,
}

impl Doodad {
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tileset {
    pub id: u32,
    pub name: String,
    pub walkable_tile_graphic: u32,
    pub nonwalkable_tile_graphic: u32,
    pub doodads: Vec<Doodad>,
}

impl Tileset {
    pub fn graphic_for(&self, cell: PathCell) -> u32 {
        match cell {
            PathCell::Blank => self.nonwalkable_tile_graphic,
            PathCell::Path => self.walkable_tile_graphic,
        }
    }

    pub fn validate(&self) -> Result<(), MapGenError> {
        if self.walkable_tile_graphic == self.nonwalkable_tile_graphic {
            return Err(MapGenError::InvalidTileset {
                id: self.id,
                reason: "walkable and non-walkable graphics are identical".into(),
            });
        }
        for doodad in &self.doodads {
            if doodad.width == 0 || doodad.height == 0 {
                return Err(MapGenError::InvalidTileset {
                    id: self.id,
                    reason: format!("doodad '{}' has an empty footprint", doodad.name),
                });
            }
            if doodad.graphic_indices.len() != doodad.area() {
                return Err(MapGenError::InvalidTileset {
                    id: self.id,
                    reason: format!(
                        "doodad '{}' is {}x{} but has {} graphic indices",
                        doodad.name,
                        doodad.width,
                        doodad.height,
                        doodad.graphic_indices.len()
                    ),
                });
            }
            if !(doodad.rarity > 0.0) {
                return Err(MapGenError::InvalidTileset {
                    id: self.id,
                    reason: format!("doodad '{}' has non-positive rarity", doodad.name),
                });
            }
        }
        Ok(())
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct TilesetRegistry {
    pub tilesets: Vec<Tileset>,
}

impl TilesetRegistry {
    pub fn get(&self, id: u32) -> Option<&Tileset> {
        self.tilesets.iter().find(|t| t.id == id)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SETTINGS
// ═══════════════════════════════════════════════════════════════════════

/// Tunables for the generator. Missing RON fields fall back to defaults.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapGenSettings {
    /// Longest interior run of blank rows that survives normalization.
    pub max_consecutive_blank_rows: usize,
    /// Roughly one doodad every this many tiles.
    pub doodad_density: f64,
    /// Upper bound on placement attempts per doodad before rarity is applied.
    pub max_doodad_attempts: f64,
    /// Safety ceiling on whole-column retries. `None` retries forever.
    pub max_column_attempts: Option<u32>,
    /// Fixed seed for every build; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for MapGenSettings {
    fn default() -> Self {
        Self {
            max_consecutive_blank_rows: 5,
            doodad_density: 5.0,
            max_doodad_attempts: 250.0,
            max_column_attempts: Some(10_000),
            seed: None,
        }
    }
}

impl MapGenSettings {
    pub fn from_ron(text: &str) -> Result<Self, MapGenError> {
        let settings: MapGenSettings = ron::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, MapGenError> {
        let text = fs::read_to_string(path)?;
        Self::from_ron(&text)
    }

    pub fn validate(&self) -> Result<(), MapGenError> {
        // Zero would strip every interior blank row, including the ones
        // separating vertically stacked path segments.
        if self.max_consecutive_blank_rows == 0 {
            return Err(MapGenError::InvalidSettings(
                "max_consecutive_blank_rows must be at least 1".into(),
            ));
        }
        if !(self.doodad_density > 0.0) {
            return Err(MapGenError::InvalidSettings(
                "doodad_density must be positive".into(),
            ));
        }
        if self.max_doodad_attempts < 0.0 || self.max_doodad_attempts.is_nan() {
            return Err(MapGenError::InvalidSettings(
                "max_doodad_attempts must not be negative".into(),
            ));
        }
        if self.max_column_attempts == Some(0) {
            return Err(MapGenError::InvalidSettings(
                "max_column_attempts must allow at least one attempt".into(),
            ));
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// REQUESTS AND RESULTS
// ═══════════════════════════════════════════════════════════════════════

/// Size and difficulty of a map to build, in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapRequest {
    pub width: usize,
    pub height: usize,
    pub difficulty: u8,
}

impl MapRequest {
    pub fn width_in_pieces(&self) -> usize {
        self.width / PUZZLE_PIECE_SIZE
    }

    pub fn height_in_pieces(&self) -> usize {
        self.height / PUZZLE_PIECE_SIZE
    }

    /// Rejects requests before any generation work starts.
    pub fn validate(&self) -> Result<(), MapGenError> {
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty) {
            return Err(MapGenError::InvalidDifficulty {
                difficulty: self.difficulty,
            });
        }
        if self.width % PUZZLE_PIECE_SIZE != 0 || self.height % PUZZLE_PIECE_SIZE != 0 {
            return Err(MapGenError::SizeNotMultiple {
                width: self.width,
                height: self.height,
                piece_size: PUZZLE_PIECE_SIZE,
            });
        }
        if self.width < MIN_WIDTH_IN_PIECES * PUZZLE_PIECE_SIZE {
            return Err(MapGenError::TooNarrow {
                width: self.width,
                min: MIN_WIDTH_IN_PIECES * PUZZLE_PIECE_SIZE,
            });
        }
        if self.height == 0 {
            return Err(MapGenError::TooShort {
                height: self.height,
                min: PUZZLE_PIECE_SIZE,
            });
        }
        Ok(())
    }
}

/// Finished map handed to the rendering/overworld side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignMap {
    pub width: usize,
    pub height: usize,
    /// Row-major tileset graphic ids.
    pub tiles: Vec<u32>,
    /// Parallel to `tiles`; `None` where no doodad was stamped.
    pub doodads: Vec<Option<u32>>,
    pub tileset_id: u32,
    pub difficulty: u8,
}

impl CampaignMap {
    pub fn tile(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.tiles[y * self.width + x])
        } else {
            None
        }
    }

    pub fn doodad(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            self.doodads[y * self.width + x]
        } else {
            None
        }
    }

    pub fn to_json(&self) -> Result<String, MapGenError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, MapGenError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// The most recently generated map, if any.
#[derive(Resource, Debug, Clone, Default)]
pub struct CurrentMap(pub Option<CampaignMap>);

// ═══════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Event, Debug, Clone)]
pub struct GenerateMapEvent {
    pub request: MapRequest,
    /// Overrides `MapGenSettings::seed` for this build only.
    pub seed: Option<u64>,
}

#[derive(Event, Debug, Clone)]
pub struct MapGeneratedEvent {
    pub width: usize,
    pub height: usize,
    pub tileset_id: u32,
    pub difficulty: u8,
}

#[derive(Event, Debug, Clone)]
pub struct MapGenFailedEvent {
    pub reason: String,
}

// ═══════════════════════════════════════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════════════════════════════════════

#[derive(thiserror::Error, Debug)]
pub enum MapGenError {
    #[error("difficulty {difficulty} is outside {}..={}", MIN_DIFFICULTY, MAX_DIFFICULTY)]
    InvalidDifficulty { difficulty: u8 },
    #[error("map size {width}x{height} is not a multiple of the {piece_size}-tile piece size")]
    SizeNotMultiple {
        width: usize,
        height: usize,
        piece_size: usize,
    },
    #[error("map width {width} is narrower than the minimum of {min} tiles")]
    TooNarrow { width: usize, min: usize },
    #[error("map height {height} is shorter than the minimum of {min} tiles")]
    TooShort { height: usize, min: usize },
    #[error("invalid generator settings: {0}")]
    InvalidSettings(String),
    #[error("no tilesets are registered")]
    NoTilesets,
    #[error("tileset {id} is invalid: {reason}")]
    InvalidTileset { id: u32, reason: String },
    #[error("malformed puzzle piece: {0}")]
    MalformedPiece(String),
    #[error("piece catalog is incomplete: {0}")]
    IncompleteCatalog(String),
    #[error("no puzzle piece fits column {column}, row {row} ({class} slot)")]
    SolverExhausted {
        column: usize,
        row: usize,
        class: &'static str,
    },
    #[error("column {column} had no right opening after {attempts} attempts")]
    ColumnRetriesExhausted { column: usize, attempts: u32 },
    #[error("could not parse settings: {0}")]
    SettingsParse(#[from] ron::error::SpannedError),
    #[error("map export failed: {0}")]
    Export(#[from] serde_json::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
