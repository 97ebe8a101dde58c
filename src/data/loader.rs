//! CSV Data Loader Module
//! Handles CSV file loading using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("CSV file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("No data loaded")]
    NoData,
}

/// Read a whole CSV file with a header row into a DataFrame.
pub fn read_csv(file_path: &Path) -> Result<DataFrame, LoaderError> {
    if !file_path.is_file() {
        return Err(LoaderError::NotFound(file_path.to_path_buf()));
    }

    let df = LazyCsvReader::new(file_path)
        .with_has_header(true)
        .with_infer_schema_length(Some(10000))
        .finish()?
        .collect()?;

    info!(
        path = %file_path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded CSV"
    );
    Ok(df)
}

/// Holds the most recently loaded source table.
#[derive(Default)]
pub struct DataLoader {
    df: Option<DataFrame>,
}

impl DataLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a CSV file, replacing any previously loaded table.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        self.df = None;

        let df = read_csv(file_path)?;
        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_columns_and_rows() {
        let file = write_csv("LABEL,COUNT\nA,0\nA,1\nB,1\n");
        let mut loader = DataLoader::new();
        let df = loader.load_csv(file.path()).unwrap();

        assert_eq!(df.height(), 3);
        let names: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["LABEL", "COUNT"]);
        assert_eq!(loader.get_row_count(), 3);
    }

    #[test]
    fn missing_file_is_reported() {
        let mut loader = DataLoader::new();
        let err = loader
            .load_csv(Path::new("/definitely/not/here.csv"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
        assert_eq!(loader.get_row_count(), 0);
    }
}
