//! Data Processor Module
//! Column validation and lazy row iteration shared by the chart builders.

use super::LoaderError;
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Data format error: {0}")]
    DataFormat(String),
    #[error("Missing node: {0}")]
    MissingNode(String),
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Fail with a `DataFormat` error naming the first absent column.
pub fn require_columns<S: AsRef<str>>(df: &DataFrame, names: &[S]) -> Result<(), BuildError> {
    for name in names {
        let name = name.as_ref();
        if df.column(name).is_err() {
            return Err(BuildError::DataFormat(format!(
                "missing required column '{}'",
                name
            )));
        }
    }
    Ok(())
}

/// Read a column as non-null strings.
pub fn text_column(df: &DataFrame, name: &str) -> Result<Vec<String>, BuildError> {
    require_columns(df, &[name])?;
    let column = df.column(name)?.cast(&DataType::String)?;
    let ca = column.str()?;

    ca.into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.map(|s| s.to_string()).ok_or_else(|| {
                BuildError::DataFormat(format!("column '{}' is empty at row {}", name, row))
            })
        })
        .collect()
}

/// Cast a column to f64. Nulls stay null; text that does not parse is an error.
pub fn numeric_column(df: &DataFrame, name: &str) -> Result<Float64Chunked, BuildError> {
    require_columns(df, &[name])?;
    let column = df.column(name)?;
    let cast = column.cast(&DataType::Float64)?;

    if cast.null_count() > column.null_count() {
        return Err(BuildError::DataFormat(format!(
            "column '{}' contains non-numeric values",
            name
        )));
    }

    Ok(cast.f64()?.clone())
}

/// One table record: a label plus the requested numeric cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

impl Row {
    /// Cell value if strictly positive.
    pub fn positive(&self, idx: usize) -> Option<f64> {
        self.values
            .get(idx)
            .copied()
            .flatten()
            .filter(|v| *v > 0.0)
    }
}

/// Restartable row view over a label column and a set of numeric columns.
///
/// Columns are validated and cast once; `rows()` then yields records lazily
/// and can be called any number of times.
pub struct RowCursor {
    labels: Vec<String>,
    columns: Vec<String>,
    values: Vec<Float64Chunked>,
}

impl RowCursor {
    pub fn new<S: AsRef<str>>(
        df: &DataFrame,
        label_col: &str,
        value_cols: &[S],
    ) -> Result<Self, BuildError> {
        require_columns(df, &[label_col])?;
        require_columns(df, value_cols)?;

        let labels = text_column(df, label_col)?;
        let values = value_cols
            .iter()
            .map(|name| numeric_column(df, name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            labels,
            columns: value_cols.iter().map(|s| s.as_ref().to_string()).collect(),
            values,
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Numeric column names, in the order of `Row::values`.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn rows(&self) -> impl Iterator<Item = Row> + '_ {
        self.labels.iter().enumerate().map(move |(i, label)| Row {
            label: label.clone(),
            values: self.values.iter().map(|ca| ca.get(i)).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df!(
            "LABEL" => &["X", "Y"],
            "A" => &[Some(1i64), None],
            "B" => &[0.5f64, 2.0],
        )
        .unwrap()
    }

    #[test]
    fn rows_are_restartable() {
        let cursor = RowCursor::new(&sample(), "LABEL", &["A", "B"]).unwrap();
        let first: Vec<Row> = cursor.rows().collect();
        let second: Vec<Row> = cursor.rows().collect();

        assert_eq!(first, second);
        assert_eq!(cursor.len(), 2);
        assert_eq!(first[0].label, "X");
        assert_eq!(first[0].values, vec![Some(1.0), Some(0.5)]);
        assert_eq!(first[1].values, vec![None, Some(2.0)]);
    }

    #[test]
    fn positive_skips_null_zero_and_negative() {
        let row = Row {
            label: "X".to_string(),
            values: vec![None, Some(0.0), Some(-1.0), Some(3.0)],
        };
        assert_eq!(row.positive(0), None);
        assert_eq!(row.positive(1), None);
        assert_eq!(row.positive(2), None);
        assert_eq!(row.positive(3), Some(3.0));
        assert_eq!(row.positive(9), None);
    }

    #[test]
    fn missing_column_is_data_format() {
        let err = RowCursor::new(&sample(), "LABEL", &["A", "C"]).err().unwrap();
        assert!(matches!(err, BuildError::DataFormat(msg) if msg.contains("'C'")));
    }

    #[test]
    fn null_label_is_data_format() {
        let df = df!("LABEL" => &[Some("X"), None], "A" => &[1i64, 2]).unwrap();
        let err = text_column(&df, "LABEL").unwrap_err();
        assert!(matches!(err, BuildError::DataFormat(_)));
    }

    #[test]
    fn non_numeric_text_is_data_format() {
        let df = df!("LABEL" => &["X"], "A" => &["lots"]).unwrap();
        let err = numeric_column(&df, "A").unwrap_err();
        assert!(matches!(err, BuildError::DataFormat(_)));
    }
}
