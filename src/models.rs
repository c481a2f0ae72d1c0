use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One named series (condition) of a wide dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Build a series with no missing values.
    pub fn from_values(name: impl Into<String>, values: &[f64]) -> Self {
        Self::new(name, values.iter().copied().map(Some).collect())
    }

    /// Finite observations only; `None` and NaN are skipped.
    pub fn finite_values(&self) -> Vec<f64> {
        self.values
            .iter()
            .filter_map(|v| *v)
            .filter(|v| v.is_finite())
            .collect()
    }
}

/// Wide dataset: one column per series, rows are replicates.
///
/// Columns shorter than the longest one are padded with `None`, so every
/// column has `rows()` entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WideFrame {
    columns: Vec<Series>,
}

impl WideFrame {
    pub fn new(mut columns: Vec<Series>) -> Self {
        let rows = columns.iter().map(|c| c.values.len()).max().unwrap_or(0);
        for c in columns.iter_mut() {
            c.values.resize(rows, None);
        }
        Self { columns }
    }

    pub fn columns(&self) -> &[Series] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Number of rows (the longest series, missing values included).
    pub fn rows(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, name: &str) -> Option<&Series> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Suggested figure width in inches for this many series.
    pub fn suggested_width(&self) -> f64 {
        crate::layout::width_from_column_count(self.n_columns())
    }
}

/// Categorical series identifier with an explicit level order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Categorical {
    levels: Vec<String>,
    codes: Vec<usize>,
}

impl Categorical {
    /// Encode `values` against explicit `levels`.
    pub fn with_levels<S: AsRef<str>>(values: &[S], levels: Vec<String>) -> Result<Self> {
        let codes = values
            .iter()
            .map(|v| {
                let v = v.as_ref();
                levels
                    .iter()
                    .position(|l| l == v)
                    .ok_or_else(|| Error::UnknownLevel(v.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { levels, codes })
    }

    /// Encode `values` with levels sorted lexically (the default categorical order).
    pub fn from_values<S: AsRef<str>>(values: &[S]) -> Self {
        let levels: Vec<String> = values
            .iter()
            .map(|v| v.as_ref().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let codes = values
            .iter()
            .map(|v| {
                levels
                    .binary_search_by(|l| l.as_str().cmp(v.as_ref()))
                    .unwrap_or_default()
            })
            .collect();
        Self { levels, codes }
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn codes(&self) -> &[usize] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Tidy (long-form) dataset: one row per observation, tagged by series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TidyFrame {
    series: Categorical,
    values: Vec<Option<f64>>,
}

impl TidyFrame {
    /// Pair a categorical series column with its value column.
    ///
    /// Both columns must have the same length.
    pub fn new(series: Categorical, values: Vec<Option<f64>>) -> Result<Self> {
        if series.len() != values.len() {
            return Err(Error::LengthMismatch {
                series: series.len(),
                values: values.len(),
            });
        }
        Ok(Self { series, values })
    }

    pub fn series(&self) -> &Categorical {
        &self.series
    }

    pub fn levels(&self) -> &[String] {
        self.series.levels()
    }

    pub fn rows(&self) -> usize {
        self.values.len()
    }

    /// Finite observations tagged with the level at `idx`.
    pub fn values_for_level(&self, idx: usize) -> Vec<f64> {
        self.series
            .codes()
            .iter()
            .zip(self.values.iter())
            .filter(|(code, _)| **code == idx)
            .filter_map(|(_, v)| *v)
            .filter(|v| v.is_finite())
            .collect()
    }

    /// Reshape into a wide frame, one column per level, in level order.
    pub fn to_wide(&self) -> WideFrame {
        let columns = self
            .levels()
            .iter()
            .enumerate()
            .map(|(i, name)| {
                Series::new(
                    name.clone(),
                    self.values_for_level(i).into_iter().map(Some).collect(),
                )
            })
            .collect();
        WideFrame::new(columns)
    }
}
