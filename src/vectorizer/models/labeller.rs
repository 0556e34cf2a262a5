use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::InputRow;
use crate::tokenize::Tokenizer;
use crate::vectorizer::dictionary::{AttributeCounts, AttributeDictionary};
use crate::vectorizer::features::FeatureExtractor;
use crate::vectorizer::lexicon::{DocumentPolarity, Lexicon, PolarityLexicon};
use crate::vectorizer::matrix::{FeatureMatrix, InstanceRow, RowAnnotation};

use super::TwoPhaseVectorizer;

/// Distant labelling without synthesis: each document gets the class its
/// lexicon words imply.
///
/// Documents whose distinct tokens hit only positive lexicon entries are
/// labelled positive, only negative entries negative. A document hitting
/// both polarities is emitted under *both* labels unless `exclusive_sets`
/// is on; a document hitting neither is dropped.
pub struct LexiconLabeller {
    tokenizer: Box<dyn Tokenizer>,
    extractor: FeatureExtractor,
    lexicon: PolarityLexicon,
    exclusive_sets: bool,
    min_att_docs: u64,
}

impl fmt::Debug for LexiconLabeller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LexiconLabeller")
            .field("extractor", &self.extractor)
            .field("lexicon_words", &self.lexicon.len())
            .field("exclusive_sets", &self.exclusive_sets)
            .field("min_att_docs", &self.min_att_docs)
            .finish()
    }
}

impl LexiconLabeller {
    pub fn new(
        tokenizer: Box<dyn Tokenizer>,
        extractor: FeatureExtractor,
        lexicon: PolarityLexicon,
    ) -> Self {
        Self {
            tokenizer,
            extractor,
            lexicon,
            exclusive_sets: false,
            min_att_docs: 0,
        }
    }

    pub fn with_exclusive_sets(mut self, on: bool) -> Self {
        self.exclusive_sets = on;
        self
    }

    pub fn with_min_att_docs(mut self, n: u64) -> Self {
        self.min_att_docs = n;
        self
    }
}

/// Frozen result of a labeller training pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabellerState {
    pub dictionary: AttributeDictionary,
}

impl TwoPhaseVectorizer for LexiconLabeller {
    type State = LabellerState;

    fn train(&self, rows: &[InputRow]) -> Result<LabellerState> {
        let mut counts = AttributeCounts::new();
        for row in rows {
            let tokens = self.tokenizer.tokenize(&row.text);
            counts.observe(&self.extractor.vectorize(&tokens));
        }
        let dictionary = AttributeDictionary::build(&counts, self.min_att_docs);
        log::debug!(
            "labeller training pass done: {} attributes",
            dictionary.len()
        );
        Ok(LabellerState { dictionary })
    }

    fn apply(&self, rows: &[InputRow], state: &LabellerState) -> Result<FeatureMatrix> {
        let mut matrix = FeatureMatrix::new(state.dictionary.column_names());
        for row in rows {
            let tokens = self.tokenizer.tokenize(&row.text);
            let vector = self.extractor.vectorize(&tokens);
            let mapped = state.dictionary.map(&vector);
            match self.lexicon.classify_document(&tokens) {
                DocumentPolarity::HasPositive => {
                    matrix.push(InstanceRow::new(
                        mapped,
                        RowAnnotation::Class(self.lexicon.positive_value().to_string()),
                    ));
                }
                DocumentPolarity::HasNegative => {
                    matrix.push(InstanceRow::new(
                        mapped,
                        RowAnnotation::Class(self.lexicon.negative_value().to_string()),
                    ));
                }
                DocumentPolarity::Both => {
                    if !self.exclusive_sets {
                        matrix.push(InstanceRow::new(
                            mapped.clone(),
                            RowAnnotation::Class(self.lexicon.positive_value().to_string()),
                        ));
                        matrix.push(InstanceRow::new(
                            mapped,
                            RowAnnotation::Class(self.lexicon.negative_value().to_string()),
                        ));
                    }
                }
                DocumentPolarity::Neither => {}
            }
        }
        Ok(matrix)
    }
}
