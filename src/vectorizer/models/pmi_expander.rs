use std::fmt;

use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::InputRow;
use crate::tokenize::Tokenizer;
use crate::vectorizer::matrix::{FeatureMatrix, InstanceRow, RowAnnotation};
use crate::vectorizer::pmi::PmiCalculator;
use crate::vectorizer::dictionary::SparseRow;

use super::TwoPhaseVectorizer;

/// Name of the single orientation column.
pub const SO_COLUMN: &str = "PMI-SO";

/// Expands a seed of class-labelled documents into a word -> orientation
/// table via the PMI calculator.
///
/// `expanded_lexicon` emits one row per surviving word (orientation value
/// plus the word itself in the trailing column). The application pass scores
/// held-out documents with the mean orientation of their distinct
/// in-vocabulary tokens; a document with no known token scores 0.
pub struct PmiExpander {
    tokenizer: Box<dyn Tokenizer>,
    positive_class: String,
    negative_class: String,
    min_freq: u64,
}

impl fmt::Debug for PmiExpander {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PmiExpander")
            .field("positive_class", &self.positive_class)
            .field("negative_class", &self.negative_class)
            .field("min_freq", &self.min_freq)
            .finish()
    }
}

impl PmiExpander {
    pub fn new(tokenizer: Box<dyn Tokenizer>) -> Self {
        Self {
            tokenizer,
            positive_class: "positive".to_string(),
            negative_class: "negative".to_string(),
            min_freq: 0,
        }
    }

    pub fn with_class_values(
        mut self,
        positive: impl Into<String>,
        negative: impl Into<String>,
    ) -> Self {
        self.positive_class = positive.into();
        self.negative_class = negative.into();
        self
    }

    pub fn with_min_freq(mut self, min_freq: u64) -> Self {
        self.min_freq = min_freq;
        self
    }

    /// One row per word, lexicographically ordered.
    pub fn expanded_lexicon(&self, state: &PmiState) -> FeatureMatrix {
        let mut matrix = FeatureMatrix::new(vec![SO_COLUMN.to_string()]);
        for (word, orientation) in &state.orientations {
            matrix.push(InstanceRow::new(
                SparseRow::from_entries(vec![(0, *orientation)]),
                RowAnnotation::Word(word.clone()),
            ));
        }
        matrix
    }
}

/// Frozen word -> orientation table, lexicographically ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PmiState {
    #[serde(with = "indexmap::map::serde_seq")]
    pub orientations: IndexMap<String, f64>,
}

impl TwoPhaseVectorizer for PmiExpander {
    type State = PmiState;

    fn train(&self, rows: &[InputRow]) -> Result<PmiState> {
        let mut calculator = PmiCalculator::new()
            .with_class_values(self.positive_class.clone(), self.negative_class.clone())
            .with_min_freq(self.min_freq);
        for row in rows {
            if let Some(class) = &row.class {
                let tokens = self.tokenizer.tokenize(&row.text);
                calculator.observe(&tokens, class);
            }
        }
        let orientations: IndexMap<String, f64> = calculator.scores().into_iter().collect();
        log::debug!(
            "pmi training pass done: {} scored words from {} positive / {} negative documents",
            orientations.len(),
            calculator.pos_docs() - 1,
            calculator.neg_docs() - 1
        );
        Ok(PmiState { orientations })
    }

    fn apply(&self, rows: &[InputRow], state: &PmiState) -> Result<FeatureMatrix> {
        let mapped: Vec<InstanceRow> = rows
            .par_iter()
            .map(|row| {
                let tokens = self.tokenizer.tokenize(&row.text);
                let distinct: IndexSet<&str> = tokens.iter().map(|t| t.as_str()).collect();
                let scores: Vec<f64> = distinct
                    .iter()
                    .filter_map(|t| state.orientations.get(*t).copied())
                    .collect();
                let mean = if scores.is_empty() {
                    0.0
                } else {
                    scores.iter().sum::<f64>() / scores.len() as f64
                };
                let annotation = match &row.class {
                    Some(class) => RowAnnotation::Class(class.clone()),
                    None => RowAnnotation::None,
                };
                InstanceRow::new(SparseRow::from_entries(vec![(0, mean)]), annotation)
            })
            .collect();
        let mut matrix = FeatureMatrix::new(vec![SO_COLUMN.to_string()]);
        matrix.rows = mapped;
        Ok(matrix)
    }
}
