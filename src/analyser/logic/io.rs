use crate::error::{ExplorerError, Result, ResultExt as _};
use calamine::{Data, Range, Reader as _, open_workbook_auto};
use polars::prelude::*;

/// Reads an uploaded file into a table, picking the reader from the extension.
/// Supports CSV (header row, schema inferred from the first 10k rows), Excel
/// workbooks (first sheet, header row), Parquet and JSON.
pub fn load_df(path: &std::path::Path) -> Result<DataFrame> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    let df = match ext.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_has_header(true)
            .finish()
            .context("Failed to scan CSV")?
            .collect()
            .context("Failed to read CSV")?,
        "xlsx" | "xls" => load_workbook(path)?,
        "parquet" => ParquetReader::new(std::fs::File::open(path)?)
            .finish()
            .context("Failed to read Parquet")?,
        "json" => JsonReader::new(std::fs::File::open(path)?)
            .finish()
            .context("Failed to read JSON")?,
        _ => {
            return Err(ExplorerError::DataProcessing(format!(
                "Unsupported file extension: {ext}"
            )));
        }
    };

    tracing::debug!(
        "Loaded {} ({} rows x {} columns)",
        path.display(),
        df.height(),
        df.width()
    );
    Ok(df)
}

fn load_workbook(path: &std::path::Path) -> Result<DataFrame> {
    let spreadsheet_error =
        |e: calamine::Error| ExplorerError::DataProcessing(format!("Failed to read workbook: {e}"));

    let mut workbook = open_workbook_auto(path).map_err(spreadsheet_error)?;
    let Some(sheet) = workbook.sheet_names().first().cloned() else {
        return Err(ExplorerError::DataProcessing(
            "Workbook has no sheets".to_owned(),
        ));
    };
    let range = workbook.worksheet_range(&sheet).map_err(spreadsheet_error)?;
    sheet_to_df(&range)
}

static EMPTY_CELL: Data = Data::Empty;

/// Builds a table from a sheet whose first row holds the column names.
/// A column whose cells are all integers becomes `Int64`, all numbers
/// `Float64`, all booleans `Boolean`; anything else is kept as text. Empty
/// cells are nulls.
pub(crate) fn sheet_to_df(range: &Range<Data>) -> Result<DataFrame> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };
    let body: Vec<&[Data]> = rows.collect();

    let columns = header
        .iter()
        .enumerate()
        .map(|(i, title)| {
            let name = match title {
                Data::Empty => format!("column_{}", i + 1),
                other => other.to_string(),
            };
            let cells: Vec<&Data> = body
                .iter()
                .map(|row| row.get(i).unwrap_or(&EMPTY_CELL))
                .collect();
            Column::from(sheet_column(name, &cells))
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}

fn sheet_column(name: String, cells: &[&Data]) -> Series {
    let present = || cells.iter().filter(|c| !matches!(c, Data::Empty));
    let name = PlSmallStr::from(name);

    if present().all(|c| matches!(c, Data::Int(_))) && present().next().is_some() {
        let values: Vec<Option<i64>> = cells
            .iter()
            .map(|c| match c {
                Data::Int(v) => Some(*v),
                _ => None,
            })
            .collect();
        Series::new(name, values)
    } else if present().all(|c| matches!(c, Data::Int(_) | Data::Float(_)))
        && present().next().is_some()
    {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|c| match c {
                Data::Int(v) => Some(*v as f64),
                Data::Float(v) => Some(*v),
                _ => None,
            })
            .collect();
        Series::new(name, values)
    } else if present().all(|c| matches!(c, Data::Bool(_))) && present().next().is_some() {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|c| match c {
                Data::Bool(v) => Some(*v),
                _ => None,
            })
            .collect();
        Series::new(name, values)
    } else {
        let values: Vec<Option<String>> = cells
            .iter()
            .map(|c| match c {
                Data::Empty => None,
                other => Some(other.to_string()),
            })
            .collect();
        Series::new(name, values)
    }
}
