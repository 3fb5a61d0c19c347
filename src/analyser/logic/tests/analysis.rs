use super::{approx, sales};
use crate::analyser::logic::*;
use crate::error::ExplorerError;
use anyhow::Result;
use polars::df;

#[test]
fn test_describe_numeric_columns() -> Result<()> {
    let frame = ClassifiedFrame::new(df![
        "a" => [1.0f64, 2.0, 3.0, 4.0],
        "label" => ["w", "x", "y", "z"],
    ]?);
    let described = describe(&frame)?;

    assert_eq!(described.get_column_names_str(), vec!["statistic", "a"]);
    let labels: Vec<_> = described
        .column("statistic")?
        .str()?
        .into_iter()
        .flatten()
        .collect();
    assert_eq!(labels, NumericStats::LABELS);

    let values: Vec<f64> = described.column("a")?.f64()?.into_iter().flatten().collect();
    let expected = [4.0, 2.5, 1.290_994_448_735_805_6, 1.0, 1.75, 2.5, 3.25, 4.0];
    for (got, want) in values.iter().zip(expected) {
        assert!(approx(*got, want), "{got} != {want}");
    }
    Ok(())
}

#[test]
fn test_describe_keeps_column_named_statistic() -> Result<()> {
    let frame = ClassifiedFrame::new(df![
        "statistic" => [1.0f64, 2.0, 3.0],
        "other" => [4.0f64, 5.0, 6.0],
    ]?);
    let described = describe(&frame)?;

    assert_eq!(
        described.get_column_names_str(),
        vec!["_statistic", "statistic", "other"]
    );
    let labels: Vec<_> = described
        .column("_statistic")?
        .str()?
        .into_iter()
        .flatten()
        .collect();
    assert_eq!(labels, NumericStats::LABELS);
    let means: Vec<f64> = described
        .column("statistic")?
        .f64()?
        .into_iter()
        .flatten()
        .collect();
    assert!(approx(means[1], 2.0));
    Ok(())
}

#[test]
fn test_describe_without_numeric_columns() -> Result<()> {
    let frame = ClassifiedFrame::new(df!["label" => ["a", "b", "a"]]?);
    assert_eq!(describe(&frame)?.width(), 1);

    let categorical = describe_categorical(&frame)?;
    assert_eq!(
        categorical,
        vec![CategoricalStats {
            column: "label".to_owned(),
            count: 3,
            unique: 2,
            top: Some("a".to_owned()),
            freq: 2,
        }]
    );
    Ok(())
}

#[test]
fn test_describe_skips_nulls() -> Result<()> {
    let summaries = numeric_summaries(&sales()?)?;
    let (name, units) = &summaries[0];
    assert_eq!(name, "units");
    assert_eq!(units.count, 3);
    assert_eq!(units.min, Some(3.0));
    assert_eq!(units.max, Some(8.0));
    Ok(())
}

#[test]
fn test_head_and_tail() -> Result<()> {
    let df = df!["n" => (0..12i64).collect::<Vec<_>>()]?;

    let first = head(&df, DEFAULT_PREVIEW_ROWS);
    assert_eq!(first.height(), 5);
    assert_eq!(first.column("n")?.i64()?.get(0), Some(0));

    let last = tail(&df, DEFAULT_PREVIEW_ROWS);
    assert_eq!(last.height(), 5);
    assert_eq!(last.column("n")?.i64()?.get(4), Some(11));

    let short = df.head(Some(3));
    assert_eq!(head(&short, 5).height(), 3);
    assert_eq!(tail(&short, 5).height(), 3);
    Ok(())
}

#[test]
fn test_null_counts_per_column() -> Result<()> {
    let df = df![
        "X" => [Some(1i64), None, Some(3)],
        "Y" => [Some("a"), Some("b"), None],
        "Z" => [1.0f64, 2.0, 3.0],
    ]?;
    let counts = null_counts(&df);

    assert_eq!(counts.get("X"), Some(1));
    assert_eq!(counts.get("Y"), Some(1));
    assert_eq!(counts.get("Z"), Some(0));
    assert_eq!(counts.total(), 2);
    assert_eq!(counts.iter().count(), 3);
    Ok(())
}

#[test]
fn test_correlation_perfect_line() -> Result<()> {
    let frame = ClassifiedFrame::new(df![
        "a" => [1.0f64, 2.0, 3.0],
        "b" => [2i64, 4, 6],
        "c" => [3.0f64, 2.0, 1.0],
    ]?);
    let matrix = correlation(&frame)?;

    assert_eq!(matrix.columns, vec!["a", "b", "c"]);
    assert!(approx(matrix.get("a", "b").unwrap(), 1.0));
    assert!(approx(matrix.get("a", "c").unwrap(), -1.0));
    assert!(approx(matrix.get("b", "b").unwrap(), 1.0));
    assert_eq!(matrix.get("a", "b"), matrix.get("b", "a"));
    Ok(())
}

#[test]
fn test_correlation_requires_two_numeric_columns() -> Result<()> {
    let frame = ClassifiedFrame::new(df!["a" => [1.0f64, 2.0], "s" => ["x", "y"]]?);
    let err = correlation(&frame).unwrap_err();
    assert!(matches!(err, ExplorerError::InsufficientColumns { .. }));
    assert!(err.is_recoverable());
    Ok(())
}

#[test]
fn test_correlation_constant_column_is_nan() -> Result<()> {
    let frame = ClassifiedFrame::new(df![
        "a" => [1.0f64, 2.0, 3.0],
        "flat" => [7.0f64, 7.0, 7.0],
    ]?);
    let matrix = correlation(&frame)?;
    assert!(matrix.get("a", "flat").unwrap().is_nan());
    assert!(matrix.get("flat", "flat").unwrap().is_nan());
    Ok(())
}

#[test]
fn test_correlation_uses_pairwise_complete_rows() -> Result<()> {
    let frame = ClassifiedFrame::new(df![
        "a" => [Some(1.0f64), Some(2.0), Some(3.0), None],
        "b" => [Some(10.0f64), Some(20.0), Some(30.0), Some(-100.0)],
    ]?);
    let matrix = correlation(&frame)?;
    assert!(approx(matrix.get("a", "b").unwrap(), 1.0));
    Ok(())
}

#[test]
fn test_info_reports_shape_and_classes() -> Result<()> {
    let info = info(&sales()?);
    assert_eq!(info.rows, 4);
    assert_eq!(info.columns.len(), 4);

    let region = &info.columns[0];
    assert_eq!(region.name, "region");
    assert_eq!(region.non_null, 3);
    assert_eq!(region.class, ColumnClass::Categorical);
    assert_eq!(info.columns[3].class, ColumnClass::Other);
    Ok(())
}

#[test]
fn test_preview_keeps_nulls() -> Result<()> {
    let frame = sales()?;
    let table = preview(&head(frame.df(), 2));
    assert_eq!(table.columns, vec!["region", "units", "price", "promo"]);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0][0].as_deref(), Some("north"));
    assert_eq!(table.rows[1][1], None);
    Ok(())
}
