//! Exploration views.
//!
//! The presentation layer asks for one [`View`] of a dataset at a time and
//! receives an [`Exploration`] to render. Failures a user can act on (missing
//! column classes, wrong selections) are reported inline as
//! [`Outcome::Unavailable`] so the rest of the page still renders.

use super::charts::{self, Chart, ChartRequest, CustomChart, CustomKind};
use super::logic::analysis;
use super::logic::classify::ClassifiedFrame;
use super::logic::types::{
    CategoricalStats, Classification, CorrelationMatrix, NullCounts, TableInfo, TablePreview,
};
use crate::config::AppConfig;
use crate::error::Result;
use crate::storage::DatasetMeta;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    /// Statistics, previews and correlation
    Info,
    /// The basic chart page. Empty `charts` means the default selections.
    Visualize { charts: Vec<ChartRequest> },
    /// A user-built graph over any two columns
    CustomGraph {
        x: String,
        y: String,
        kind: CustomKind,
    },
    /// Missing values per column
    Quality,
}

/// Either a result or the user-facing reason it could not be produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    Ready { value: T },
    Unavailable { message: String },
}

impl<T> Outcome<T> {
    /// Folds recoverable errors into `Unavailable`; anything else is passed on.
    pub fn capture(result: Result<T>) -> Result<Self> {
        match result {
            Ok(value) => Ok(Self::Ready { value }),
            Err(e) if e.is_recoverable() => Ok(Self::Unavailable {
                message: e.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready { value } => Some(value),
            Self::Unavailable { .. } => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InfoView {
    pub info: TableInfo,
    pub classification: Classification,
    pub describe: TablePreview,
    pub categorical: Vec<CategoricalStats>,
    pub head: TablePreview,
    pub tail: TablePreview,
    pub correlation: Outcome<CorrelationMatrix>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartPanel {
    pub chart: String,
    pub outcome: Outcome<Chart>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualityView {
    pub rows: usize,
    pub null_counts: NullCounts,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewResult {
    Info(InfoView),
    Visualize { charts: Vec<ChartPanel> },
    CustomGraph(Outcome<CustomChart>),
    Quality(QualityView),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Exploration {
    pub dataset: DatasetMeta,
    pub result: ViewResult,
}

pub fn explore_frame(
    dataset: DatasetMeta,
    frame: &ClassifiedFrame,
    view: &View,
    config: &AppConfig,
) -> Result<Exploration> {
    let result = match view {
        View::Info => ViewResult::Info(info_view(frame, config.preview_rows)?),
        View::Visualize { charts } => ViewResult::Visualize {
            charts: visualize(frame, charts, config)?,
        },
        View::CustomGraph { x, y, kind } => {
            ViewResult::CustomGraph(Outcome::capture(charts::custom(frame, x, y, *kind))?)
        }
        View::Quality => ViewResult::Quality(QualityView {
            rows: frame.height(),
            null_counts: analysis::null_counts(frame.df()),
        }),
    };
    Ok(Exploration { dataset, result })
}

pub fn info_view(frame: &ClassifiedFrame, preview_rows: usize) -> Result<InfoView> {
    let df = frame.df();
    Ok(InfoView {
        info: analysis::info(frame),
        classification: frame.classification().clone(),
        describe: analysis::preview(&analysis::describe(frame)?),
        categorical: analysis::describe_categorical(frame)?,
        head: analysis::preview(&analysis::head(df, preview_rows)),
        tail: analysis::preview(&analysis::tail(df, preview_rows)),
        correlation: Outcome::capture(analysis::correlation(frame))?,
    })
}

fn visualize(
    frame: &ClassifiedFrame,
    requests: &[ChartRequest],
    config: &AppConfig,
) -> Result<Vec<ChartPanel>> {
    let limits = config.histogram_bins();
    let requests: Vec<(&'static str, Result<ChartRequest>)> = if requests.is_empty() {
        charts::default_requests(frame)
    } else {
        requests.iter().map(|r| (r.name(), Ok(r.clone()))).collect()
    };

    let panels = requests
        .into_iter()
        .map(|(name, request)| -> Result<ChartPanel> {
            let projected = request.and_then(|r| r.project(frame, limits));
            Ok(ChartPanel {
                chart: name.to_owned(),
                outcome: Outcome::capture(projected)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        "Projected {} of {} charts",
        panels.iter().filter(|p| p.outcome.ready().is_some()).count(),
        panels.len()
    );
    Ok(panels)
}
