use super::classify::ClassifiedFrame;
use super::profiling;
use super::types::{
    CategoricalStats, ColumnInfo, CorrelationMatrix, NullCount, NullCounts, NumericStats,
    TableInfo, TablePreview,
};
use crate::error::{ExplorerError, Result, ResultExt as _};
use polars::prelude::*;

/// Rows shown by `head`/`tail` when the caller has no preference.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Descriptive statistics of every numeric column: one label column (count,
/// mean, std, min, 25%, 50%, 75%, max) followed by one column per numeric
/// input column. Non-numeric columns are left out.
///
/// The label column is called `statistic`, with leading underscores added
/// until the name is free in the input table.
pub fn describe(frame: &ClassifiedFrame) -> Result<DataFrame> {
    let mut columns = vec![Column::from(Series::new(
        label_column_name(frame.df()).into(),
        NumericStats::LABELS.to_vec(),
    ))];

    for (name, stats) in numeric_summaries(frame)? {
        columns.push(Column::from(Series::new(
            name.as_str().into(),
            stats.describe_values().to_vec(),
        )));
    }

    Ok(DataFrame::new(columns)?)
}

fn label_column_name(df: &DataFrame) -> String {
    let taken = df.get_column_names_str();
    let mut name = "statistic".to_owned();
    while taken.contains(&name.as_str()) {
        name.insert(0, '_');
    }
    name
}

/// Typed per-column statistics behind [`describe`].
pub fn numeric_summaries(frame: &ClassifiedFrame) -> Result<Vec<(String, NumericStats)>> {
    frame
        .classification()
        .numeric
        .iter()
        .map(|name| -> Result<(String, NumericStats)> {
            let ca = frame.numeric_values(name)?;
            let stats = profiling::numeric_stats(&ca)
                .with_context(|| format!("Describe failed for numeric column '{name}'"))?;
            Ok((name.clone(), stats))
        })
        .collect()
}

/// Count, distinct values, top value and its frequency per categorical column.
pub fn describe_categorical(frame: &ClassifiedFrame) -> Result<Vec<CategoricalStats>> {
    frame
        .classification()
        .categorical
        .iter()
        .map(|name| -> Result<CategoricalStats> {
            let ca = frame.categorical_values(name)?;
            let counts = profiling::value_counts(&ca);
            let (top, freq) = counts
                .first()
                .map_or((None, 0), |(val, n)| (Some(val.clone()), *n));
            Ok(CategoricalStats {
                column: name.clone(),
                count: ca.len() - ca.null_count(),
                unique: counts.len(),
                top,
                freq,
            })
        })
        .collect()
}

/// First `n` rows; fewer when the table is shorter.
pub fn head(df: &DataFrame, n: usize) -> DataFrame {
    df.head(Some(n))
}

/// Last `n` rows; fewer when the table is shorter.
pub fn tail(df: &DataFrame, n: usize) -> DataFrame {
    df.tail(Some(n))
}

pub fn null_counts(df: &DataFrame) -> NullCounts {
    NullCounts(
        df.get_columns()
            .iter()
            .map(|col| NullCount {
                column: col.name().to_string(),
                nulls: col.null_count(),
            })
            .collect(),
    )
}

pub fn info(frame: &ClassifiedFrame) -> TableInfo {
    let df = frame.df();
    let columns = df
        .get_columns()
        .iter()
        .map(|col| {
            let name = col.name().to_string();
            let class = super::classify::classify_dtype(col.dtype());
            ColumnInfo {
                non_null: col.len() - col.null_count(),
                dtype: col.dtype().to_string(),
                name,
                class,
            }
        })
        .collect();

    TableInfo {
        rows: df.height(),
        columns,
    }
}

/// Pearson correlation between every pair of numeric columns, computed over
/// the rows where both values are present. Pairs involving a column without
/// variance report `NaN`.
pub fn correlation(frame: &ClassifiedFrame) -> Result<CorrelationMatrix> {
    let numeric = &frame.classification().numeric;
    if numeric.len() < 2 {
        return Err(ExplorerError::InsufficientColumns {
            operation: "a correlation matrix",
            requirement: "at least two numeric columns",
        });
    }

    let values = numeric
        .iter()
        .map(|name| frame.numeric_values(name))
        .collect::<Result<Vec<_>>>()?;

    let mut matrix = Vec::with_capacity(values.len());
    for (i, a) in values.iter().enumerate() {
        let mut row = Vec::with_capacity(values.len());
        for (j, b) in values.iter().enumerate() {
            if i == j {
                row.push(if has_variance(a) { 1.0 } else { f64::NAN });
            } else {
                row.push(pearson(a, b));
            }
        }
        matrix.push(row);
    }

    Ok(CorrelationMatrix {
        columns: numeric.clone(),
        data: matrix,
    })
}

fn has_variance(ca: &Float64Chunked) -> bool {
    ca.len() - ca.null_count() > 1 && ca.std(1).is_some_and(|s| s > 0.0)
}

fn pearson(a: &Float64Chunked, b: &Float64Chunked) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .into_iter()
        .zip(b)
        .filter_map(|(x, y)| Some((x?, y?)))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let (dx, dy) = (x - mean_x, y - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0)
}

/// Renders a table to display strings. Nulls stay `None`.
pub fn preview(df: &DataFrame) -> TablePreview {
    let mut rows = vec![Vec::with_capacity(df.width()); df.height()];
    for col in df.get_columns() {
        let series = col.as_materialized_series();
        let cells: Vec<Option<String>> = match series.cast(&DataType::String) {
            Ok(s) => s
                .str()
                .map(|ca| ca.into_iter().map(|v| v.map(ToOwned::to_owned)).collect())
                .unwrap_or_default(),
            Err(_) => series
                .iter()
                .map(|v| match v {
                    AnyValue::Null => None,
                    other => Some(other.to_string()),
                })
                .collect(),
        };
        for (row, cell) in rows.iter_mut().zip(cells) {
            row.push(cell);
        }
    }

    TablePreview {
        columns: df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect(),
        dtypes: df.dtypes().iter().map(ToString::to_string).collect(),
        rows,
    }
}
