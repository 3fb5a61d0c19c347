#![expect(clippy::unwrap_used, clippy::indexing_slicing)]
use super::*;
use anyhow::Result;
use polars::df;
use polars::prelude::{
    CategoricalOrdering, DataType, Float64Chunked, NewChunkedArray as _, StringChunked,
};

mod analysis;

pub(super) fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

pub(super) fn sales() -> Result<ClassifiedFrame> {
    Ok(ClassifiedFrame::new(df![
        "region" => [Some("north"), Some("south"), None, Some("north")],
        "units" => [Some(3i64), None, Some(5), Some(8)],
        "price" => [1.5f64, 2.0, 2.5, 4.0],
        "promo" => [true, false, false, true],
    ]?))
}

#[test]
fn test_classification_by_dtype() -> Result<()> {
    let frame = sales()?;
    let classes = frame.classification();
    assert_eq!(classes.numeric, vec!["units", "price"]);
    assert_eq!(classes.categorical, vec!["region"]);
    assert_eq!(classes.other, vec!["promo"]);
    assert_eq!(classes.class_of("promo"), Some(ColumnClass::Other));
    assert_eq!(classes.class_of("missing"), None);
    Ok(())
}

#[test]
fn test_classification_is_total_and_disjoint() -> Result<()> {
    let df = df![
        "i8" => [1i8, 2],
        "u32" => [1u32, 2],
        "f32" => [1.0f32, 2.0],
        "text" => ["1", "2"],
        "flag" => [true, false],
    ]?;
    let classes = classify(&df);
    let mut seen: Vec<&String> = classes
        .numeric
        .iter()
        .chain(&classes.categorical)
        .chain(&classes.other)
        .collect();
    assert_eq!(seen.len(), df.width());
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), df.width());

    // Numeric-looking strings stay categorical
    assert_eq!(classes.categorical, vec!["text"]);
    assert_eq!(classes.numeric, vec!["i8", "u32", "f32"]);
    Ok(())
}

#[test]
fn test_categorical_dtype_is_categorical() -> Result<()> {
    let mut df = df!["grade" => ["b", "a", "b"], "score" => [1i64, 2, 3]]?;
    let grade = df
        .column("grade")?
        .as_materialized_series()
        .cast(&DataType::Categorical(None, CategoricalOrdering::Physical))?;
    df.with_column(grade)?;

    let frame = ClassifiedFrame::new(df);
    assert_eq!(frame.classification().categorical, vec!["grade"]);
    assert_eq!(
        profiling::value_counts(&frame.categorical_values("grade")?),
        vec![("b".to_owned(), 2), ("a".to_owned(), 1)]
    );
    Ok(())
}

#[test]
fn test_typed_accessors_reject_wrong_class() -> Result<()> {
    let frame = sales()?;
    assert!(matches!(
        frame.numeric_values("region"),
        Err(crate::error::ExplorerError::ColumnKindMismatch { .. })
    ));
    assert!(matches!(
        frame.categorical_values("units"),
        Err(crate::error::ExplorerError::ColumnKindMismatch { .. })
    ));
    assert!(matches!(
        frame.numeric_values("nope"),
        Err(crate::error::ExplorerError::UnknownColumn(_))
    ));

    let units = frame.numeric_values("units")?;
    assert_eq!(units.null_count(), 1);
    assert_eq!(units.get(3), Some(8.0));
    Ok(())
}

#[test]
fn test_numeric_stats_single_value_has_no_std() -> Result<()> {
    let ca = Float64Chunked::from_slice("x".into(), &[4.0]);
    let stats = profiling::numeric_stats(&ca)?;
    assert_eq!(stats.count, 1);
    assert_eq!(stats.std_dev, None);
    assert_eq!(stats.median, Some(4.0));
    Ok(())
}

#[test]
fn test_value_counts_ties_keep_first_seen_order() {
    let ca = StringChunked::from_slice_options(
        "c".into(),
        &[Some("b"), Some("a"), None, Some("b"), Some("c"), Some("a")],
    );
    let counts = profiling::value_counts(&ca);
    assert_eq!(
        counts,
        vec![
            ("b".to_owned(), 2),
            ("a".to_owned(), 2),
            ("c".to_owned(), 1)
        ]
    );
    assert_eq!(counts[0].0, "b");
}
