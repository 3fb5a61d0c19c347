use serde::{Deserialize, Serialize};

/// Semantic class of a column, derived from its declared dtype only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnClass {
    /// Integer or floating-point dtype
    Numeric,
    /// String dtype
    Categorical,
    /// Boolean, temporal, nested and everything else
    Other,
}

/// Partition of a table's columns into numeric and categorical sets, in column
/// order. Columns of any other dtype land in `other`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
    pub other: Vec<String>,
}

impl Classification {
    pub fn class_of(&self, column: &str) -> Option<ColumnClass> {
        if self.numeric.iter().any(|c| c == column) {
            Some(ColumnClass::Numeric)
        } else if self.categorical.iter().any(|c| c == column) {
            Some(ColumnClass::Categorical)
        } else if self.other.iter().any(|c| c == column) {
            Some(ColumnClass::Other)
        } else {
            None
        }
    }

    pub fn is_numeric(&self, column: &str) -> bool {
        self.class_of(column) == Some(ColumnClass::Numeric)
    }
}

/// Descriptive statistics of one numeric column. Quartiles use linear
/// interpolation and `std_dev` is the sample standard deviation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

impl NumericStats {
    /// Row labels of the `describe` table, in order.
    pub const LABELS: [&'static str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    pub fn describe_values(&self) -> [Option<f64>; 8] {
        [
            Some(self.count as f64),
            self.mean,
            self.std_dev,
            self.min,
            self.q1,
            self.median,
            self.q3,
            self.max,
        ]
    }

    pub fn iqr(&self) -> Option<f64> {
        Some(self.q3? - self.q1?)
    }
}

/// Summary of one categorical column: non-null count, distinct values, most
/// frequent value and its frequency.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalStats {
    pub column: String,
    pub count: usize,
    pub unique: usize,
    pub top: Option<String>,
    pub freq: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NullCount {
    pub column: String,
    pub nulls: usize,
}

/// Missing values per column, in column order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NullCounts(pub Vec<NullCount>);

impl NullCounts {
    pub fn get(&self, column: &str) -> Option<usize> {
        self.0.iter().find(|c| c.column == column).map(|c| c.nulls)
    }

    pub fn total(&self) -> usize {
        self.0.iter().map(|c| c.nulls).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NullCount> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a NullCounts {
    type Item = &'a NullCount;
    type IntoIter = std::slice::Iter<'a, NullCount>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: String,
    pub non_null: usize,
    pub class: ColumnClass,
}

/// Shape and per-column overview of a table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub rows: usize,
    pub columns: Vec<ColumnInfo>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub data: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.data.get(i)?.get(j).copied()
    }
}

/// A table rendered to display strings, for previews that leave the crate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub dtypes: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// Clamp range for automatic histogram binning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BinLimits {
    pub min: usize,
    pub max: usize,
}

impl Default for BinLimits {
    fn default() -> Self {
        Self { min: 5, max: 50 }
    }
}
