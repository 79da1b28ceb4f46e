use crate::pieces::PieceCatalog;
use crate::shared::*;

/// Populate the catalog with the standard 5x5 side-scroller pieces.
///
/// Every piece keeps its horizontal path on row 2 where it meets a
/// neighbor, so any right opening lines up with any left opening. Vertical
/// openings come in two widths (the single centre cell, and the three
/// centre cells) and each top shape has a matching bottom shape.
///
/// Pieces:
///   blank: any column
///   start stub: LEFT only, path leaves through the right edge
///   corridor: straight through
///   dip: straight through with a loop hanging off the bottom
///   drop-in: enters from the top, leaves right
///   crossing: enters from the top, runs both ways
///   climb-out: enters wide from the top, narrows, leaves right and down
///   arch: enters wide from the top, runs both ways
///   landing: enters wide from the top, leaves right
///   end stub: RIGHT only, path arrives from the left
pub fn populate_pieces(catalog: &mut PieceCatalog) -> Result<(), MapGenError> {
    #[rustfmt::skip]
    let pieces: [([u8; 25], PieceClass); 10] = [
        // blank
        ([0,0,0,0,0,
          0,0,0,0,0,
          0,0,0,0,0,
          0,0,0,0,0,
          0,0,0,0,0], PieceClass::LEFT | PieceClass::MIDDLE | PieceClass::RIGHT),
        // start stub
        ([0,0,0,0,0,
          0,0,0,0,0,
          0,0,1,1,1,
          0,0,0,0,0,
          0,0,0,0,0], PieceClass::LEFT),
        // corridor
        ([0,0,0,0,0,
          0,0,0,0,0,
          1,1,1,1,1,
          0,0,0,0,0,
          0,0,0,0,0], PieceClass::MIDDLE),
        // dip
        ([0,0,0,0,0,
          0,0,0,0,0,
          1,1,0,1,1,
          0,1,0,1,0,
          0,1,1,1,0], PieceClass::MIDDLE),
        // drop-in
        ([0,0,1,0,0,
          0,0,1,0,0,
          0,0,1,1,1,
          0,0,0,0,0,
          0,0,0,0,0], PieceClass::MIDDLE),
        // crossing
        ([0,0,1,0,0,
          0,0,1,0,0,
          1,1,1,1,1,
          0,0,0,0,0,
          0,0,0,0,0], PieceClass::MIDDLE),
        // climb-out
        ([0,1,1,1,0,
          0,1,0,1,0,
          0,1,0,1,1,
          0,1,1,0,0,
          0,0,1,0,0], PieceClass::MIDDLE),
        // arch
        ([0,1,1,1,0,
          0,1,0,1,0,
          1,1,0,1,1,
          0,0,0,0,0,
          0,0,0,0,0], PieceClass::MIDDLE),
        // landing
        ([0,1,1,1,0,
          0,1,0,1,0,
          0,1,1,1,1,
          0,0,1,1,0,
          0,0,0,0,0], PieceClass::MIDDLE),
        // end stub
        ([0,0,0,0,0,
          0,0,0,0,0,
          1,1,1,0,0,
          0,0,0,0,0,
          0,0,0,0,0], PieceClass::RIGHT),
    ];

    for (pattern, class) in pieces.iter() {
        catalog.register(pattern, *class)?;
    }
    Ok(())
}

/// Builds and validates a fresh standard catalog outside of the ECS.
pub fn standard_catalog() -> Result<PieceCatalog, MapGenError> {
    let mut catalog = PieceCatalog::new(PUZZLE_PIECE_SIZE);
    populate_pieces(&mut catalog)?;
    catalog.validate()?;
    Ok(catalog)
}
