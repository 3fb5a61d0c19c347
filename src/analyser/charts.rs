//! Chart projections.
//!
//! Each function turns a [`ClassifiedFrame`] plus explicit column selections
//! into plain data a renderer can draw. Selections are never inferred here;
//! see [`default_requests`] for the selections the basic visualization page
//! starts from. A selected column of the wrong class is rejected with
//! [`ExplorerError::ColumnKindMismatch`].

use super::logic::classify::ClassifiedFrame;
use super::logic::profiling::{self, BoxStats, HistogramBin};
use super::logic::types::{BinLimits, ColumnClass, CorrelationMatrix};
use crate::error::{ExplorerError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub column: String,
    pub bin_width: f64,
    pub bins: Vec<HistogramBin>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    pub fraction: f64,
}

/// Values of one column keyed by row position. Missing values stay in place
/// as gaps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub column: String,
    pub points: Vec<(usize, Option<f64>)>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scatter {
    pub x_column: String,
    pub y_column: String,
    pub points: Vec<(f64, f64)>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViolinGroup {
    pub category: String,
    pub values: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Violin {
    pub numeric_column: String,
    pub categorical_column: String,
    pub groups: Vec<ViolinGroup>,
}

pub fn histogram(frame: &ClassifiedFrame, column: &str, limits: BinLimits) -> Result<Histogram> {
    let ca = frame.numeric_values(column)?;
    let (bin_width, bins) = profiling::calculate_histogram(&ca, limits)?;
    Ok(Histogram {
        column: column.to_owned(),
        bin_width,
        bins,
    })
}

/// Frequencies of a categorical column, most frequent first; ties keep
/// first-appearance order. Missing values are not counted as a category.
pub fn category_counts(frame: &ClassifiedFrame, column: &str) -> Result<Vec<CategoryCount>> {
    let ca = frame.categorical_values(column)?;
    Ok(profiling::value_counts(&ca)
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect())
}

pub fn pie(frame: &ClassifiedFrame, column: &str) -> Result<Vec<PieSlice>> {
    let counts = category_counts(frame, column)?;
    let total: usize = counts.iter().map(|c| c.count).sum();
    Ok(counts
        .into_iter()
        .map(|c| PieSlice {
            fraction: if total == 0 {
                0.0
            } else {
                c.count as f64 / total as f64
            },
            label: c.category,
            count: c.count,
        })
        .collect())
}

pub fn line_series(frame: &ClassifiedFrame, column: &str) -> Result<LineSeries> {
    let ca = frame.numeric_values(column)?;
    Ok(LineSeries {
        column: column.to_owned(),
        points: ca.into_iter().enumerate().collect(),
    })
}

/// Pairs of the two columns for rows where both are present. Picking the same
/// column twice is allowed and puts every point on the diagonal.
pub fn scatter(frame: &ClassifiedFrame, x_column: &str, y_column: &str) -> Result<Scatter> {
    let xs = frame.numeric_values(x_column)?;
    let ys = frame.numeric_values(y_column)?;
    let points = xs
        .into_iter()
        .zip(&ys)
        .filter_map(|(x, y)| Some((x?, y?)))
        .collect();
    Ok(Scatter {
        x_column: x_column.to_owned(),
        y_column: y_column.to_owned(),
        points,
    })
}

pub fn box_stats(frame: &ClassifiedFrame, column: &str) -> Result<BoxStats> {
    let ca = frame.numeric_values(column)?;
    profiling::box_stats(&ca)
}

pub fn heatmap(frame: &ClassifiedFrame) -> Result<CorrelationMatrix> {
    super::logic::analysis::correlation(frame).map_err(|e| match e {
        ExplorerError::InsufficientColumns { requirement, .. } => {
            ExplorerError::InsufficientColumns {
                operation: "a heatmap",
                requirement,
            }
        }
        other => other,
    })
}

/// Numeric values grouped by category, groups in first-appearance order and
/// values in row order. Rows missing either value are skipped.
pub fn violin(
    frame: &ClassifiedFrame,
    numeric_column: &str,
    categorical_column: &str,
) -> Result<Violin> {
    let classes = frame.classification();
    if classes.numeric.is_empty() || classes.categorical.is_empty() {
        return Err(ExplorerError::InsufficientColumns {
            operation: "a violin plot",
            requirement: "one numeric and one categorical column",
        });
    }

    let values = frame.numeric_values(numeric_column)?;
    let categories = frame.categorical_values(categorical_column)?;

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<ViolinGroup> = Vec::new();
    for (category, value) in categories.into_iter().zip(&values) {
        let (Some(category), Some(value)) = (category, value) else {
            continue;
        };
        let slot = *index.entry(category).or_insert_with(|| {
            groups.push(ViolinGroup {
                category: category.to_owned(),
                values: Vec::new(),
            });
            groups.len() - 1
        });
        if let Some(group) = groups.get_mut(slot) {
            group.values.push(value);
        }
    }

    Ok(Violin {
        numeric_column: numeric_column.to_owned(),
        categorical_column: categorical_column.to_owned(),
        groups,
    })
}

/// Chart type of a user-built graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomKind {
    Scatter,
    Line,
    Bar,
}

impl std::str::FromStr for CustomKind {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "scatter" => Ok(Self::Scatter),
            "line" => Ok(Self::Line),
            "bar" => Ok(Self::Bar),
            other => Err(ExplorerError::Other(format!(
                "Unknown graph type '{other}' (expected scatter, line or bar)"
            ))),
        }
    }
}

/// A cell of an arbitrary column: numbers stay numeric, everything else is
/// shown as text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlotValue {
    Number(f64),
    Text(String),
}

impl PlotValue {
    fn group_key(&self) -> String {
        match self {
            // -0.0 and 0.0 are one group
            Self::Number(n) if *n == 0.0 => "n:0".to_owned(),
            Self::Number(n) => format!("n:{n}"),
            Self::Text(t) => format!("t:{t}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: PlotValue,
    pub y: PlotValue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarAggregation {
    /// Numeric `y`: sum of the values in each group
    Sum,
    /// Non-numeric `y`: number of present values in each group
    Count,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub x: PlotValue,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CustomChart {
    Scatter {
        x_column: String,
        y_column: String,
        points: Vec<Point>,
    },
    Line {
        x_column: String,
        y_column: String,
        points: Vec<Point>,
    },
    Bar {
        x_column: String,
        y_column: String,
        aggregation: BarAggregation,
        bars: Vec<Bar>,
    },
}

/// A graph over any two columns. Scatter and line keep the rows where both
/// values are present, in row order. Bar groups rows by `x` in
/// first-appearance order and sums `y` when it is numeric, otherwise counts
/// the present `y` values.
pub fn custom(
    frame: &ClassifiedFrame,
    x_column: &str,
    y_column: &str,
    kind: CustomKind,
) -> Result<CustomChart> {
    let xs = plot_values(frame, x_column)?;
    let ys = plot_values(frame, y_column)?;
    let (x_column, y_column) = (x_column.to_owned(), y_column.to_owned());

    match kind {
        CustomKind::Scatter | CustomKind::Line => {
            let points = xs
                .into_iter()
                .zip(ys)
                .filter_map(|(x, y)| Some(Point { x: x?, y: y? }))
                .collect();
            Ok(if kind == CustomKind::Scatter {
                CustomChart::Scatter {
                    x_column,
                    y_column,
                    points,
                }
            } else {
                CustomChart::Line {
                    x_column,
                    y_column,
                    points,
                }
            })
        }
        CustomKind::Bar => {
            let aggregation = if frame.classification().is_numeric(&y_column) {
                BarAggregation::Sum
            } else {
                BarAggregation::Count
            };

            let mut index: HashMap<String, usize> = HashMap::new();
            let mut bars: Vec<Bar> = Vec::new();
            for (x, y) in xs.into_iter().zip(ys) {
                let Some(x) = x else { continue };
                let slot = *index.entry(x.group_key()).or_insert_with(|| {
                    bars.push(Bar {
                        x: x.clone(),
                        value: 0.0,
                    });
                    bars.len() - 1
                });
                let increment = match (&y, aggregation) {
                    (Some(PlotValue::Number(v)), BarAggregation::Sum) => *v,
                    (Some(_), BarAggregation::Count) => 1.0,
                    _ => 0.0,
                };
                if let Some(bar) = bars.get_mut(slot) {
                    bar.value += increment;
                }
            }

            Ok(CustomChart::Bar {
                x_column,
                y_column,
                aggregation,
                bars,
            })
        }
    }
}

fn plot_values(frame: &ClassifiedFrame, column: &str) -> Result<Vec<Option<PlotValue>>> {
    let class = frame
        .classification()
        .class_of(column)
        .ok_or_else(|| ExplorerError::UnknownColumn(column.to_owned()))?;

    match class {
        ColumnClass::Numeric => Ok(frame
            .numeric_values(column)?
            .into_iter()
            .map(|v| v.map(PlotValue::Number))
            .collect()),
        ColumnClass::Categorical => Ok(frame
            .categorical_values(column)?
            .into_iter()
            .map(|v| v.map(|s| PlotValue::Text(s.to_owned())))
            .collect()),
        ColumnClass::Other => {
            let series = frame.column(column)?.as_materialized_series();
            let text = series.cast(&DataType::String)?;
            Ok(text
                .str()?
                .into_iter()
                .map(|v| v.map(|s| PlotValue::Text(s.to_owned())))
                .collect())
        }
    }
}

/// One chart of the basic visualization page, with its column selections.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "chart", rename_all = "lowercase")]
pub enum ChartRequest {
    Histogram { column: String },
    Bar { column: String },
    Pie { column: String },
    Line { column: String },
    Scatter { x: String, y: String },
    Box { column: String },
    Heatmap,
    Violin { numeric: String, categorical: String },
}

/// Chart-ready data for a [`ChartRequest`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "chart", content = "data", rename_all = "lowercase")]
pub enum Chart {
    Histogram(Histogram),
    Bar(Vec<CategoryCount>),
    Pie(Vec<PieSlice>),
    Line(LineSeries),
    Scatter(Scatter),
    Box(BoxStats),
    Heatmap(CorrelationMatrix),
    Violin(Violin),
}

impl ChartRequest {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Histogram { .. } => "histogram",
            Self::Bar { .. } => "bar",
            Self::Pie { .. } => "pie",
            Self::Line { .. } => "line",
            Self::Scatter { .. } => "scatter",
            Self::Box { .. } => "box",
            Self::Heatmap => "heatmap",
            Self::Violin { .. } => "violin",
        }
    }

    pub fn project(&self, frame: &ClassifiedFrame, limits: BinLimits) -> Result<Chart> {
        Ok(match self {
            Self::Histogram { column } => Chart::Histogram(histogram(frame, column, limits)?),
            Self::Bar { column } => Chart::Bar(category_counts(frame, column)?),
            Self::Pie { column } => Chart::Pie(pie(frame, column)?),
            Self::Line { column } => Chart::Line(line_series(frame, column)?),
            Self::Scatter { x, y } => Chart::Scatter(scatter(frame, x, y)?),
            Self::Box { column } => Chart::Box(box_stats(frame, column)?),
            Self::Heatmap => Chart::Heatmap(heatmap(frame)?),
            Self::Violin {
                numeric,
                categorical,
            } => Chart::Violin(violin(frame, numeric, categorical)?),
        })
    }
}

/// The charts of the basic visualization page with their initial selections:
/// the first numeric column for histogram, line and box; the first
/// categorical column for bar and pie; the first two numeric columns for
/// scatter (the first one twice when it is alone). A chart whose column class
/// is missing comes back as an error describing what it needs.
pub fn default_requests(frame: &ClassifiedFrame) -> Vec<(&'static str, Result<ChartRequest>)> {
    let classes = frame.classification();
    let first_numeric = classes.numeric.first().cloned();
    let second_numeric = classes.numeric.get(1).cloned().or_else(|| first_numeric.clone());
    let first_categorical = classes.categorical.first().cloned();

    let needs_numeric = |operation: &'static str| ExplorerError::InsufficientColumns {
        operation,
        requirement: "a numeric column",
    };
    let needs_categorical = |operation: &'static str| ExplorerError::InsufficientColumns {
        operation,
        requirement: "a categorical column",
    };

    vec![
        (
            "histogram",
            first_numeric
                .clone()
                .map(|column| ChartRequest::Histogram { column })
                .ok_or_else(|| needs_numeric("a histogram")),
        ),
        (
            "bar",
            first_categorical
                .clone()
                .map(|column| ChartRequest::Bar { column })
                .ok_or_else(|| needs_categorical("a bar chart")),
        ),
        (
            "pie",
            first_categorical
                .clone()
                .map(|column| ChartRequest::Pie { column })
                .ok_or_else(|| needs_categorical("a pie chart")),
        ),
        (
            "line",
            first_numeric
                .clone()
                .map(|column| ChartRequest::Line { column })
                .ok_or_else(|| needs_numeric("a line chart")),
        ),
        (
            "scatter",
            first_numeric
                .clone()
                .zip(second_numeric)
                .map(|(x, y)| ChartRequest::Scatter { x, y })
                .ok_or_else(|| needs_numeric("a scatter plot")),
        ),
        (
            "box",
            first_numeric
                .clone()
                .map(|column| ChartRequest::Box { column })
                .ok_or_else(|| needs_numeric("a box plot")),
        ),
        ("heatmap", Ok(ChartRequest::Heatmap)),
        (
            "violin",
            first_numeric
                .zip(first_categorical)
                .map(|(numeric, categorical)| ChartRequest::Violin {
                    numeric,
                    categorical,
                })
                .ok_or(ExplorerError::InsufficientColumns {
                    operation: "a violin plot",
                    requirement: "one numeric and one categorical column",
                }),
        ),
    ]
}
