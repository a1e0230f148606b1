// tests/tables_and_columns.rs
//! Composite layouts: tables built from their rows, columns laid side by side.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[tokio::test]
async fn test_table_from_rows() {
    let source = MemorySource::new().with_children(
        1,
        vec![table_row(2, &["A", "B"]), table_row(3, &["1", "2"])],
    );
    let converter = offline_converter(Arc::new(source));

    let out = converter.convert(&[table(1, 2)]).await.unwrap();
    assert_eq!(out, "| A | B | \n| ---- | ---- | \n| 1 | 2 | \n\n");
}

#[tokio::test]
async fn test_table_rows_keep_order_under_delays() {
    let rows: Vec<_> = (0..10u32)
        .map(|i| table_row(10 + i, &[&format!("r{}", i), "x"]))
        .collect();
    let source = MemorySource::new()
        .with_random_delays(5)
        .with_children(1, rows);
    let converter = offline_converter(Arc::new(source));

    let mut expected = String::from("| r0 | x | \n| ---- | ---- | \n");
    for i in 1..10 {
        expected.push_str(&format!("| r{} | x | \n", i));
    }
    expected.push('\n');

    for _ in 0..3 {
        assert_eq!(converter.convert(&[table(1, 2)]).await.unwrap(), expected);
    }
}

#[tokio::test]
async fn test_malformed_row_is_dropped_from_table() {
    let source = MemorySource::new().with_children(
        1,
        vec![
            table_row(2, &["A", "B"]),
            malformed(3, "table_row"),
            table_row(4, &["1", "2"]),
        ],
    );
    let converter = offline_converter(Arc::new(source));

    let out = converter.convert(&[table(1, 2)]).await.unwrap();
    assert_eq!(out, "| A | B | \n| ---- | ---- | \n| 1 | 2 | \n\n");
    assert!(!out.contains("not supported"));
}

#[tokio::test]
async fn test_malformed_header_promotes_next_row() {
    let source = MemorySource::new().with_children(
        1,
        vec![malformed(2, "table_row"), table_row(3, &["h"]), table_row(4, &["v"])],
    );
    let converter = offline_converter(Arc::new(source));

    let out = converter.convert(&[table(1, 1)]).await.unwrap();
    assert_eq!(out, "| h | \n| ---- | \n| v | \n\n");
}

#[tokio::test]
async fn test_empty_table_renders_nothing() {
    let converter = offline_converter(Arc::new(MemorySource::new()));
    let out = converter
        .convert(&[table(1, 2), paragraph(2, "after")])
        .await
        .unwrap();
    assert_eq!(out, "after\n\n");
}

#[tokio::test]
async fn test_table_nested_under_toggle() {
    let source = MemorySource::new()
        .with_children(1, vec![table(2, 1)])
        .with_children(2, vec![table_row(3, &["h"]), table_row(4, &["v"])]);
    let converter = offline_converter(Arc::new(source));

    let out = converter.convert(&[toggle(1, "Data")]).await.unwrap();
    assert_eq!(out, "- Data\n\n\t| h | \n| ---- | \n| v | \n\n");
}

#[tokio::test]
async fn test_columns_side_by_side() {
    let source = MemorySource::new()
        .with_children(1, vec![column(2, true), column(3, true)])
        .with_children(2, vec![paragraph(4, "left a"), paragraph(5, "left b")])
        .with_children(3, vec![paragraph(6, "right")]);
    let converter = offline_converter(Arc::new(source));

    let out = converter.convert(&[column_list(1)]).await.unwrap();
    assert_eq!(
        out,
        "| left a<br/>left b<br/> | right<br/> |\n| ---- | ---- |\n\n"
    );
}

#[tokio::test]
async fn test_empty_column_keeps_its_cell() {
    let source = MemorySource::new()
        .with_children(1, vec![column(2, true), column(3, false)])
        .with_children(2, vec![paragraph(4, "only")]);
    let converter = offline_converter(Arc::new(source));

    let out = converter.convert(&[column_list(1)]).await.unwrap();
    assert_eq!(out, "| only<br/> |  |\n| ---- | ---- |\n\n");
}

#[tokio::test]
async fn test_failed_column_contains_the_layout() {
    let source = MemorySource::new()
        .with_children(1, vec![column(2, true), column(3, true)])
        .with_children(2, vec![paragraph(4, "left")])
        .failing(3);
    let converter = offline_converter(Arc::new(source));

    let out = converter
        .convert(&[column_list(1), paragraph(9, "after")])
        .await
        .unwrap();
    assert_eq!(out, "after\n\n");
}
