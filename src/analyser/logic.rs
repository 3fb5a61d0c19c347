pub mod analysis;
pub mod classify;
pub mod io;
pub mod profiling;
pub mod types;

pub use analysis::{
    DEFAULT_PREVIEW_ROWS, correlation, describe, describe_categorical, head, info, null_counts,
    numeric_summaries, preview, tail,
};
pub use classify::{ClassifiedFrame, classify, classify_dtype};
pub use io::load_df;
pub use profiling::{BoxStats, HistogramBin};
pub use types::{
    BinLimits, CategoricalStats, Classification, ColumnClass, ColumnInfo, CorrelationMatrix,
    NullCount, NullCounts, NumericStats, TableInfo, TablePreview,
};

#[cfg(test)]
mod tests;
