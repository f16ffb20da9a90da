use jobdag::table::{Table, merge};
use jobdag_test_utils::fixtures::table;

#[test]
fn test_disjoint_columns_are_juxtaposed() {
    let left = table(&["a"], &[&["1"], &["2"]]);
    let right = table(&["b", "c"], &[&["x", "y"]]);

    let (merged, common) = merge(&left, &right);

    assert!(common.is_empty());
    assert_eq!(merged, table(&["a", "b", "c"], &[&["1", "x", "y"], &["2", "", ""]]));
}

#[test]
fn test_juxtaposition_pads_shorter_left_side() {
    let left = table(&["a"], &[&["1"]]);
    let right = table(&["b"], &[&["x"], &["y"], &["z"]]);

    let (merged, _) = merge(&left, &right);

    assert_eq!(merged.height(), 3);
    assert_eq!(merged.column("a").unwrap(), vec![Some("1".to_string()), None, None]);
}

#[test]
fn test_merge_into_empty_table_yields_other_side() {
    let right = table(&["id", "v"], &[&["1", "a"], &["2", "b"]]);

    let (merged, common) = merge(&Table::empty(), &right);

    assert!(common.is_empty());
    assert_eq!(merged, right);
}

#[test]
fn test_shared_column_is_full_outer_join() {
    let left = table(&["id", "x"], &[&["1", "x1"], &["2", "x2"]]);
    let right = table(&["id", "y"], &[&["2", "y2"], &["3", "y3"]]);

    let (merged, common) = merge(&left, &right);

    assert_eq!(common, vec!["id".to_string()]);
    assert_eq!(
        merged,
        table(
            &["id", "x", "y"],
            &[&["1", "x1", ""], &["2", "x2", "y2"], &["3", "", "y3"]]
        )
    );
}

#[test]
fn test_join_on_multiple_shared_columns() {
    let left = table(&["k1", "k2", "l"], &[&["a", "1", "L1"], &["a", "2", "L2"]]);
    let right = table(&["r", "k2", "k1"], &[&["R1", "1", "a"], &["R3", "3", "a"]]);

    let (merged, common) = merge(&left, &right);

    // Reported in left column order.
    assert_eq!(common, vec!["k1".to_string(), "k2".to_string()]);
    assert_eq!(merged.columns, vec!["k1", "k2", "l", "r"]);
    assert_eq!(
        merged.rows,
        table(
            &["k1", "k2", "l", "r"],
            &[
                &["a", "1", "L1", "R1"],
                &["a", "2", "L2", ""],
                &["a", "3", "", "R3"],
            ]
        )
        .rows
    );
}

#[test]
fn test_join_repeats_rows_for_duplicate_keys() {
    let left = table(&["id", "x"], &[&["1", "a"]]);
    let right = table(&["id", "y"], &[&["1", "p"], &["1", "q"]]);

    let (merged, _) = merge(&left, &right);

    assert_eq!(
        merged,
        table(&["id", "x", "y"], &[&["1", "a", "p"], &["1", "a", "q"]])
    );
}

#[test]
fn test_missing_keys_match_each_other() {
    let left = table(&["id", "x"], &[&["", "a"]]);
    let right = table(&["id", "y"], &[&["", "b"]]);

    let (merged, _) = merge(&left, &right);

    assert_eq!(merged, table(&["id", "x", "y"], &[&["", "a", "b"]]));
}

#[test]
fn test_identical_columns_join_to_union_of_rows() {
    let left = table(&["id"], &[&["1"], &["2"]]);
    let right = table(&["id"], &[&["2"], &["3"]]);

    let (merged, common) = merge(&left, &right);

    assert_eq!(common, vec!["id".to_string()]);
    assert_eq!(merged, table(&["id"], &[&["1"], &["2"], &["3"]]));
}
