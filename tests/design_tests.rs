//! Tests for design matrices and their reconciliation.

use corr_reshape::{reconcile, DesignMatrix, ReshapeError};

fn es_abc() -> DesignMatrix {
    DesignMatrix::from_lower_triangle(&["A", "B", "C"], &[Some("r_ab"), Some("r_ac"), Some("r_bc")])
        .unwrap()
}

fn other_abd() -> DesignMatrix {
    DesignMatrix::new(
        &["D", "B", "A"],
        &["mean", "sd"],
        vec![
            vec![Some("mean_d"), Some("sd_d")],
            vec![Some("mean_b"), None],
            vec![Some("mean_a"), Some("sd_a")],
        ],
    )
    .unwrap()
}

#[test]
fn reconcile_pads_both_designs_to_the_union() {
    let (es, other) = reconcile(&es_abc(), &other_abd()).unwrap();

    assert_eq!(es.row_names(), &["A", "B", "C", "D"]);
    assert_eq!(es.col_names(), &["A", "B", "C", "D"]);
    assert_eq!(other.row_names(), &["A", "B", "C", "D"]);
    assert_eq!(other.col_names(), &["mean", "sd"]);

    // Existing cells survive
    assert_eq!(es.get_named("C", "B"), Some("r_bc"));
    assert_eq!(other.get_named("D", "sd"), Some("sd_d"));
    assert_eq!(other.get_named("B", "sd"), None);

    // New cells are NA
    assert!((0..4).all(|j| es.get(3, j).is_none()));
    assert!((0..4).all(|i| es.get(i, 3).is_none()));
    assert!(other.row_entries(2).next().is_none());
}

#[test]
fn reconcile_is_a_no_op_for_matching_names() {
    let other = DesignMatrix::new(
        &["A", "B", "C"],
        &["rel"],
        vec![vec![Some("rel_a")], vec![None], vec![Some("rel_c")]],
    )
    .unwrap();
    let (es, reconciled) = reconcile(&es_abc(), &other).unwrap();

    assert_eq!(es, es_abc());
    assert_eq!(reconciled, other);
}

#[test]
fn referenced_columns_skip_na_cells() {
    let design = other_abd();
    let refs: Vec<&str> = design.referenced_columns().collect();
    assert_eq!(refs, vec!["mean_d", "mean_b", "mean_a", "sd_d", "sd_a"]);
}

#[test]
fn square_validation() {
    assert!(es_abc().validate_square("es_design").is_ok());

    let err = other_abd().validate_square("es_design").unwrap_err();
    assert!(matches!(err, ReshapeError::Shape(_)));

    let mismatched = DesignMatrix::new(
        &["A", "B"],
        &["A", "C"],
        vec![vec![None, None], vec![Some("r"), None]],
    )
    .unwrap();
    assert!(!mismatched.is_symmetric_design());
    assert!(mismatched.validate_square("es_design").is_err());
}

#[test]
fn duplicate_names_are_rejected() {
    let err = DesignMatrix::from_lower_triangle(&["A", "A"], &[Some("r")]).unwrap_err();
    assert!(matches!(err, ReshapeError::Shape(_)));
}

#[test]
fn lower_triangle_cell_count_is_checked() {
    let err = DesignMatrix::from_lower_triangle(&["A", "B", "C"], &[Some("r")]).unwrap_err();
    assert!(matches!(err, ReshapeError::Shape(_)));
}
