use std::fmt;

use serde::{Deserialize, Serialize};

use super::dictionary::SparseRow;

/// Trailing non-numeric column of an emitted row.
///
/// Distant-supervision outputs carry a class label; word-level outputs carry
/// the word itself for inspection. Application batches may carry neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowAnnotation {
    None,
    Class(String),
    Word(String),
}

impl RowAnnotation {
    pub fn class(&self) -> Option<&str> {
        match self {
            RowAnnotation::Class(label) => Some(label),
            _ => None,
        }
    }

    pub fn word(&self) -> Option<&str> {
        match self {
            RowAnnotation::Word(word) => Some(word),
            _ => None,
        }
    }
}

/// One output instance: mapped feature values plus the trailing annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRow {
    pub values: SparseRow,
    pub annotation: RowAnnotation,
}

impl InstanceRow {
    pub fn new(values: SparseRow, annotation: RowAnnotation) -> Self {
        Self { values, annotation }
    }
}

/// Fixed-width numeric output matrix.
///
/// Columns are the frozen attribute dictionary in column order; rows are
/// whatever the producing model emitted (documents, words, partitions or
/// synthetic instances).
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    pub columns: Vec<String>,
    pub rows: Vec<InstanceRow>,
}

impl FeatureMatrix {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: InstanceRow) -> &mut Self {
        self.rows.push(row);
        self
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Materialize the dense numeric matrix (annotations are not included).
    pub fn to_dense(&self) -> Vec<Vec<f64>> {
        self.rows
            .iter()
            .map(|row| row.values.to_dense(self.columns.len()))
            .collect()
    }
}

impl fmt::Debug for FeatureMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "FeatureMatrix {} x {} [", self.n_rows(), self.n_cols())?;
            for row in &self.rows {
                writeln!(f, "    {:?} {:?}", row.values, row.annotation)?;
            }
            write!(f, "]")
        } else {
            f.debug_struct("FeatureMatrix")
                .field("n_rows", &self.n_rows())
                .field("n_cols", &self.n_cols())
                .finish()
        }
    }
}
