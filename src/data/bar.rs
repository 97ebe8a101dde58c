//! Bar Chart Builder
//! Counts 0/1 answers per label and lays them out as stacked "No"/"Yes" segments.

use super::processor::{numeric_column, text_column, BuildError};
use crate::config::BarConfig;
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

/// Recoded value of the COUNT column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Answer {
    No,
    Yes,
}

impl Answer {
    /// Recode a raw COUNT cell; only 0 and 1 are accepted.
    pub fn from_count(value: f64) -> Option<Self> {
        if value == 0.0 {
            Some(Answer::No)
        } else if value == 1.0 {
            Some(Answer::Yes)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Answer::No => "No",
            Answer::Yes => "Yes",
        }
    }
}

/// Count label placed in the middle of a segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentAnnotation {
    pub answer: Answer,
    /// Bar index (y position).
    pub row: usize,
    /// Segment center along the value axis.
    pub x: f64,
    pub text: String,
}

/// Stacked horizontal bars, one per label, in lexical label order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarChartData {
    pub labels: Vec<String>,
    pub no_counts: Vec<u32>,
    pub yes_counts: Vec<u32>,
}

impl BarChartData {
    pub const TITLE: &'static str = "Count of Yes/No per Label";

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Longest bar, used to size the value axis.
    pub fn max_total(&self) -> u32 {
        self.no_counts
            .iter()
            .zip(&self.yes_counts)
            .map(|(no, yes)| no + yes)
            .max()
            .unwrap_or(0)
    }

    /// Annotations for every non-zero segment, "No" segments first.
    pub fn annotations(&self) -> Vec<SegmentAnnotation> {
        let no = self
            .no_counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(row, &count)| SegmentAnnotation {
                answer: Answer::No,
                row,
                x: count as f64 / 2.0,
                text: count.to_string(),
            });

        let yes = self
            .yes_counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(row, &count)| SegmentAnnotation {
                answer: Answer::Yes,
                row,
                x: self.no_counts[row] as f64 + count as f64 / 2.0,
                text: count.to_string(),
            });

        no.chain(yes).collect()
    }
}

pub struct BarChartBuilder;

impl BarChartBuilder {
    pub fn build(df: &DataFrame, config: &BarConfig) -> Result<BarChartData, BuildError> {
        let labels = text_column(df, &config.label_column)?;
        let counts = numeric_column(df, &config.count_column)?;

        let mut grouped: BTreeMap<String, [u32; 2]> = BTreeMap::new();
        for (row, (label, value)) in labels.into_iter().zip(&counts).enumerate() {
            let answer = value.and_then(Answer::from_count).ok_or_else(|| {
                BuildError::DataFormat(format!(
                    "column '{}' at row {} must be 0 or 1, found {}",
                    config.count_column,
                    row,
                    value.map_or_else(|| "null".to_string(), |v| v.to_string())
                ))
            })?;
            grouped.entry(label).or_default()[answer as usize] += 1;
        }

        let mut data = BarChartData::default();
        for (label, [no, yes]) in grouped {
            data.labels.push(label);
            data.no_counts.push(no);
            data.yes_counts.push(yes);
        }

        debug!(labels = data.labels.len(), "built bar chart");
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(labels: &[&str], counts: &[i64]) -> Result<BarChartData, BuildError> {
        let df = df!("LABEL" => labels, "COUNT" => counts).unwrap();
        BarChartBuilder::build(&df, &BarConfig::default())
    }

    #[test]
    fn counts_per_label() {
        let data = build(&["A", "A", "A", "B"], &[0, 1, 1, 0]).unwrap();

        assert_eq!(data.labels, vec!["A", "B"]);
        assert_eq!(data.no_counts, vec![1, 1]);
        assert_eq!(data.yes_counts, vec![2, 0]);
        assert_eq!(data.max_total(), 3);
    }

    #[test]
    fn annotations_skip_empty_segments() {
        let data = build(&["A", "A", "A", "B"], &[0, 1, 1, 0]).unwrap();
        let notes = data.annotations();

        assert_eq!(notes.len(), 3);
        assert_eq!(notes[0].answer, Answer::No);
        assert_eq!((notes[0].row, notes[0].x, notes[0].text.as_str()), (0, 0.5, "1"));
        assert_eq!((notes[1].row, notes[1].x, notes[1].text.as_str()), (1, 0.5, "1"));
        assert_eq!(notes[2].answer, Answer::Yes);
        assert_eq!((notes[2].row, notes[2].x, notes[2].text.as_str()), (0, 2.0, "2"));
    }

    #[test]
    fn labels_sorted_lexically() {
        let data = build(&["b", "C", "a"], &[1, 0, 1]).unwrap();
        assert_eq!(data.labels, vec!["C", "a", "b"]);
    }

    #[test]
    fn segment_totals_match_row_counts() {
        let labels = ["P", "Q", "P", "R", "Q", "P"];
        let data = build(&labels, &[1, 1, 0, 0, 1, 1]).unwrap();

        for (i, label) in data.labels.iter().enumerate() {
            let rows = labels.iter().filter(|l| **l == label.as_str()).count() as u32;
            assert_eq!(data.no_counts[i] + data.yes_counts[i], rows);
        }
    }

    #[test]
    fn out_of_range_count_rejected() {
        let err = build(&["A", "B"], &[1, 2]).unwrap_err();
        assert!(matches!(err, BuildError::DataFormat(msg) if msg.contains("found 2")));
    }

    #[test]
    fn null_count_rejected() {
        let df = df!("LABEL" => &["A"], "COUNT" => &[None::<i64>]).unwrap();
        let err = BarChartBuilder::build(&df, &BarConfig::default()).unwrap_err();
        assert!(matches!(err, BuildError::DataFormat(_)));
    }

    #[test]
    fn missing_column_rejected() {
        let df = df!("LABEL" => &["A"], "VALUE" => &[1i64]).unwrap();
        let err = BarChartBuilder::build(&df, &BarConfig::default()).unwrap_err();
        assert!(matches!(err, BuildError::DataFormat(msg) if msg.contains("COUNT")));
    }

    #[test]
    fn empty_input_gives_empty_chart() {
        let data = build(&[], &[]).unwrap();
        assert!(data.is_empty());
        assert!(data.annotations().is_empty());
        assert_eq!(data.max_total(), 0);
    }

    #[test]
    fn recoding() {
        assert_eq!(Answer::from_count(0.0), Some(Answer::No));
        assert_eq!(Answer::from_count(1.0), Some(Answer::Yes));
        assert_eq!(Answer::from_count(0.5), None);
        assert_eq!(Answer::from_count(-1.0), None);
        assert_eq!(Answer::Yes.as_str(), "Yes");
    }
}
