//! Column classification.
//!
//! A table is classified once, right after it is decoded, and the resulting
//! [`Classification`] travels with the frame as a [`ClassifiedFrame`]. Every
//! analysis and chart function reads column classes from there instead of
//! inspecting dtypes on its own.

use super::types::{Classification, ColumnClass};
use crate::error::{ExplorerError, Result};
use polars::prelude::*;

/// Class of a single dtype. Only the declared dtype matters: a string column of
/// numeric-looking values is still categorical, and so are polars
/// `Categorical` and `Enum` columns.
pub fn classify_dtype(dtype: &DataType) -> ColumnClass {
    if dtype.is_integer() || dtype.is_float() {
        ColumnClass::Numeric
    } else if matches!(
        dtype,
        DataType::String | DataType::Categorical(..) | DataType::Enum(..)
    ) {
        ColumnClass::Categorical
    } else {
        ColumnClass::Other
    }
}

pub fn classify(df: &DataFrame) -> Classification {
    let mut classification = Classification::default();
    for col in df.get_columns() {
        let name = col.name().to_string();
        match classify_dtype(col.dtype()) {
            ColumnClass::Numeric => classification.numeric.push(name),
            ColumnClass::Categorical => classification.categorical.push(name),
            ColumnClass::Other => classification.other.push(name),
        }
    }
    classification
}

/// A decoded table together with its column classification.
#[derive(Clone, Debug)]
pub struct ClassifiedFrame {
    df: DataFrame,
    classification: Classification,
}

impl ClassifiedFrame {
    pub fn new(df: DataFrame) -> Self {
        let classification = classify(&df);
        Self { df, classification }
    }

    pub fn df(&self) -> &DataFrame {
        &self.df
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.df
            .column(name)
            .map_err(|_| ExplorerError::UnknownColumn(name.to_owned()))
    }

    /// Values of a numeric column as `f64`, nulls preserved.
    pub fn numeric_values(&self, name: &str) -> Result<Float64Chunked> {
        let col = self.column_of_class(name, ColumnClass::Numeric, "numeric")?;
        let series = col.as_materialized_series().cast(&DataType::Float64)?;
        Ok(series.f64()?.clone())
    }

    /// Values of a categorical column as strings, nulls preserved.
    pub fn categorical_values(&self, name: &str) -> Result<StringChunked> {
        let col = self.column_of_class(name, ColumnClass::Categorical, "categorical")?;
        let series = col.as_materialized_series().cast(&DataType::String)?;
        Ok(series.str()?.clone())
    }

    fn column_of_class(
        &self,
        name: &str,
        class: ColumnClass,
        expected: &'static str,
    ) -> Result<&Column> {
        let col = self.column(name)?;
        if self.classification.class_of(name) == Some(class) {
            Ok(col)
        } else {
            Err(ExplorerError::ColumnKindMismatch {
                column: name.to_owned(),
                expected,
            })
        }
    }
}

impl From<DataFrame> for ClassifiedFrame {
    fn from(df: DataFrame) -> Self {
        Self::new(df)
    }
}
