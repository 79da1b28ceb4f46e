use crate::shared::*;

fn doodad(name: &str, width: usize, height: usize, first_graphic: u32, rarity: f64) -> Doodad {
    Doodad {
        name: name.into(),
        width,
        height,
        graphic_indices: (first_graphic..first_graphic + (width * height) as u32).collect(),
        rarity,
    }
}

/// Populate the TilesetRegistry with every map theme.
///
/// Graphic ids index the shared environment sheet. Each theme owns a block
/// of 64 ids: the walkable and non-walkable ground tiles come first, doodad
/// graphics follow in row-major order.
///
/// Tilesets:
///   0 Grassland: trees, boulders, flowers
///   1 Desert: mesas, cacti, bones
///   2 Snowfield: pines, ice blocks, drifts
pub fn populate_tilesets(registry: &mut TilesetRegistry) {
    registry.tilesets = vec![
        Tileset {
            id: 0,
            name: "Grassland".into(),
            walkable_tile_graphic: 0,
            nonwalkable_tile_graphic: 1,
            doodads: vec![
                doodad("oak tree", 2, 3, 2, 1.0),
                doodad("boulder", 2, 2, 8, 1.5),
                doodad("shrub", 1, 1, 12, 1.0),
                doodad("flowers", 1, 1, 13, 1.0),
                doodad("tall grass", 1, 2, 14, 2.0),
            ],
        },
        Tileset {
            id: 1,
            name: "Desert".into(),
            walkable_tile_graphic: 64,
            nonwalkable_tile_graphic: 65,
            doodads: vec![
                doodad("mesa", 3, 2, 66, 3.0),
                doodad("cactus", 1, 2, 72, 1.0),
                doodad("dune", 2, 1, 74, 1.0),
                doodad("bones", 1, 1, 76, 4.0),
            ],
        },
        Tileset {
            id: 2,
            name: "Snowfield".into(),
            walkable_tile_graphic: 128,
            nonwalkable_tile_graphic: 129,
            doodads: vec![
                doodad("pine", 1, 3, 130, 1.0),
                doodad("ice block", 2, 2, 133, 2.0),
                doodad("drift", 2, 1, 137, 1.0),
                doodad("snowman", 1, 2, 139, 8.0),
            ],
        },
    ];
}
