//! Shape catalog tests - rotation cycles and mask validation

use blockfall::core::catalog::standard_masks;
use blockfall::core::{CatalogError, Piece, ShapeCatalog, ShapeDefinition};
use blockfall::types::{ShapeId, SPAWN_ANCHOR};

#[test]
fn test_rotating_full_cycle_restores_piece() {
    let catalog = ShapeCatalog::standard();
    for shape in ShapeId::ALL {
        let start = Piece::spawn(shape);
        let mut piece = start;
        for _ in 0..catalog.rotation_count(shape) {
            piece = piece.rotated(&catalog, 1);
        }
        assert_eq!(piece.rotation, start.rotation, "{:?}", shape);
        assert_eq!(piece.cells(&catalog), start.cells(&catalog), "{:?}", shape);
    }
}

#[test]
fn test_each_rotation_state_is_distinct() {
    let catalog = ShapeCatalog::standard();
    for shape in ShapeId::ALL {
        let count = catalog.rotation_count(shape);
        for a in 0..count {
            for b in (a + 1)..count {
                assert_ne!(
                    catalog.cells_for(shape, a),
                    catalog.cells_for(shape, b),
                    "{:?} rotations {} and {}",
                    shape,
                    a,
                    b
                );
            }
        }
    }
}

#[test]
fn test_rotation_counts() {
    let catalog = ShapeCatalog::standard();
    let counts: Vec<usize> = ShapeId::ALL
        .iter()
        .map(|&s| catalog.rotation_count(s))
        .collect();
    assert_eq!(counts, vec![2, 2, 2, 1, 4, 4, 4]);
}

#[test]
fn test_spawned_pieces_sit_above_the_top() {
    let catalog = ShapeCatalog::standard();
    for shape in ShapeId::ALL {
        let piece = Piece::spawn(shape);
        assert_eq!((piece.x, piece.y), SPAWN_ANCHOR);
        assert_eq!(piece.color, shape.color());
        assert!(piece.cells(&catalog).iter().all(|&(_, y)| y < 0), "{:?}", shape);
    }
}

#[test]
fn test_malformed_mask_is_rejected() {
    let short: &[&[&str]] = &[&[".....", ".....", "..00.", ".00.."]];
    assert!(matches!(
        ShapeDefinition::parse(ShapeId::S, short),
        Err(CatalogError::MaskHeight { .. })
    ));

    let three_cells: &[&[&str]] = &[&[".....", ".....", ".00..", ".0...", "....."]];
    assert!(matches!(
        ShapeDefinition::parse(ShapeId::O, three_cells),
        Err(CatalogError::CellCount { .. })
    ));
}

#[test]
fn test_catalog_requires_every_shape() {
    let defs: Vec<ShapeDefinition> = ShapeId::ALL
        .into_iter()
        .filter(|&s| s != ShapeId::L)
        .map(|s| ShapeDefinition::parse(s, standard_masks(s)).unwrap())
        .collect();
    assert_eq!(
        ShapeCatalog::from_definitions(defs).unwrap_err(),
        CatalogError::Missing(ShapeId::L)
    );
}
