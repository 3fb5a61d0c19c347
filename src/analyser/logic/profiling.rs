//! Statistical building blocks shared by the analysis engine and the chart
//! projector: descriptive statistics, histogram binning, box-plot summaries
//! and ordered value counts.

use super::types::{BinLimits, NumericStats};
use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub fn numeric_stats(ca: &Float64Chunked) -> Result<NumericStats> {
    let count = ca.len() - ca.null_count();

    // A single observation has no sample deviation
    let std_dev = if count > 1 { ca.std(1) } else { None };

    Ok(NumericStats {
        count,
        mean: ca.mean(),
        std_dev,
        min: ca.min(),
        q1: ca.quantile(0.25, QuantileMethod::Linear)?,
        median: ca.quantile(0.5, QuantileMethod::Linear)?,
        q3: ca.quantile(0.75, QuantileMethod::Linear)?,
        max: ca.max(),
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Bins a numeric column using the Freedman-Diaconis width, falling back to
/// the square-root rule when the IQR collapses. The bin count is clamped to
/// `limits`. Nulls, NaN and infinities are left out; a constant column yields
/// one unit-wide bin.
pub fn calculate_histogram(
    ca: &Float64Chunked,
    limits: BinLimits,
) -> Result<(f64, Vec<HistogramBin>)> {
    let finite: Vec<f64> = ca.into_iter().flatten().filter(|v| v.is_finite()).collect();
    let Some((min_v, max_v)) = finite.iter().fold(None, |acc: Option<(f64, f64)>, &v| {
        Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
    }) else {
        return Ok((0.0, Vec::new()));
    };
    let n = finite.len();

    if (max_v - min_v).abs() < f64::EPSILON {
        let bin = HistogramBin {
            start: min_v - 0.5,
            end: min_v + 0.5,
            count: n,
        };
        return Ok((1.0, vec![bin]));
    }

    let finite = Float64Chunked::from_vec("finite".into(), finite);
    let q1 = finite.quantile(0.25, QuantileMethod::Linear)?;
    let q3 = finite.quantile(0.75, QuantileMethod::Linear)?;
    let iqr = q3.unwrap_or(max_v) - q1.unwrap_or(min_v);

    let h = if iqr > 0.0 {
        2.0 * iqr / (n as f64).cbrt()
    } else {
        (max_v - min_v) / (n as f64).sqrt()
    };

    let num_bins = ((max_v - min_v) / h).ceil() as usize;
    let num_bins = num_bins.clamp(limits.min.max(1), limits.max.max(limits.min.max(1)));
    let bin_width = (max_v - min_v) / num_bins as f64;

    let mut counts = vec![0usize; num_bins];
    for val in finite.into_iter().flatten() {
        // The maximum sits on the closing edge of the last bin
        let idx = (((val - min_v) / bin_width).floor() as usize).min(num_bins - 1);
        if let Some(slot) = counts.get_mut(idx) {
            *slot += 1;
        }
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min_v + i as f64 * bin_width,
            end: min_v + (i + 1) as f64 * bin_width,
            count,
        })
        .collect();
    Ok((bin_width, bins))
}

/// Five-number summary plus Tukey whiskers and outliers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
    /// Smallest value inside `q1 - 1.5 * IQR`
    pub lower_whisker: Option<f64>,
    /// Largest value inside `q3 + 1.5 * IQR`
    pub upper_whisker: Option<f64>,
    /// Values beyond the fences, in row order
    pub outliers: Vec<f64>,
}

pub fn box_stats(ca: &Float64Chunked) -> Result<BoxStats> {
    let stats = numeric_stats(ca)?;
    let (Some(q1), Some(q3), Some(iqr)) = (stats.q1, stats.q3, stats.iqr()) else {
        return Ok(BoxStats::default());
    };

    let lower_fence = q1 - 1.5 * iqr;
    let upper_fence = q3 + 1.5 * iqr;

    let mut lower_whisker: Option<f64> = None;
    let mut upper_whisker: Option<f64> = None;
    let mut outliers = Vec::new();
    for val in ca.into_iter().flatten() {
        if val < lower_fence || val > upper_fence {
            outliers.push(val);
        } else {
            lower_whisker = Some(lower_whisker.map_or(val, |w| w.min(val)));
            upper_whisker = Some(upper_whisker.map_or(val, |w| w.max(val)));
        }
    }

    Ok(BoxStats {
        min: stats.min,
        q1: stats.q1,
        median: stats.median,
        q3: stats.q3,
        max: stats.max,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

/// Non-null values of a string column with their frequencies, most frequent
/// first. Ties keep the order in which values first appear.
pub fn value_counts(ca: &StringChunked) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for val in ca.into_iter().flatten() {
        match index.get(val) {
            Some(&i) => {
                if let Some(entry) = counts.get_mut(i) {
                    entry.1 += 1;
                }
            }
            None => {
                index.insert(val, counts.len());
                counts.push((val, 1));
            }
        }
    }
    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .map(|(val, count)| (val.to_owned(), count))
        .collect()
}
