use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::InputRow;
use crate::tokenize::Tokenizer;
use crate::vectorizer::dictionary::{AttributeCounts, AttributeDictionary};
use crate::vectorizer::features::{distinct_tokens, FeatureExtractor};
use crate::vectorizer::index::{CentroidIndex, WordRecord};
use crate::vectorizer::matrix::{FeatureMatrix, InstanceRow, RowAnnotation};

use super::{map_rows, metadata_vector, TwoPhaseVectorizer};

/// Word-level distributional representations by aggregate averaging.
///
/// Training streams the corpus once: each document vector is summed into the
/// aggregate of every distinct word it contains, and the attribute
/// dictionary is frozen at the end of the pass. `word_vectors` then emits
/// one centroid per surviving word; the trailing column carries the word
/// itself for inspection rather than classification.
pub struct TweetCentroidModel {
    tokenizer: Box<dyn Tokenizer>,
    extractor: FeatureExtractor,
    min_att_docs: u64,
    min_inst_docs: u64,
}

impl fmt::Debug for TweetCentroidModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TweetCentroidModel")
            .field("extractor", &self.extractor)
            .field("min_att_docs", &self.min_att_docs)
            .field("min_inst_docs", &self.min_inst_docs)
            .finish()
    }
}

impl TweetCentroidModel {
    pub fn new(tokenizer: Box<dyn Tokenizer>, extractor: FeatureExtractor) -> Self {
        Self {
            tokenizer,
            extractor,
            min_att_docs: 0,
            min_inst_docs: 0,
        }
    }

    /// Prune features seen in fewer than `n` documents.
    pub fn with_min_att_docs(mut self, n: u64) -> Self {
        self.min_att_docs = n;
        self
    }

    /// Drop words seen in fewer than `n` documents from the output.
    pub fn with_min_inst_docs(mut self, n: u64) -> Self {
        self.min_inst_docs = n;
        self
    }

    /// One averaged vector per surviving word, in first-appearance order.
    pub fn word_vectors(&self, state: &CentroidState) -> FeatureMatrix {
        let mut matrix = FeatureMatrix::new(state.dictionary.column_names());
        for (word, record) in &state.words {
            if record.doc_count() < self.min_inst_docs {
                continue;
            }
            let mut centroid = record.centroid();
            centroid.merge_sum(&record.metadata_mean());
            matrix.push(InstanceRow::new(
                state.dictionary.map(&centroid),
                RowAnnotation::Word(word.clone()),
            ));
        }
        matrix
    }
}

/// Frozen result of a centroid training pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentroidState {
    pub dictionary: AttributeDictionary,
    #[serde(with = "indexmap::map::serde_seq")]
    pub words: IndexMap<String, WordRecord>,
}

impl TwoPhaseVectorizer for TweetCentroidModel {
    type State = CentroidState;

    fn train(&self, rows: &[InputRow]) -> Result<CentroidState> {
        let mut counts = AttributeCounts::new();
        let mut index = CentroidIndex::new();
        let mut reserved: Vec<String> = Vec::new();
        for row in rows {
            let tokens = self.tokenizer.tokenize(&row.text);
            let doc = self.extractor.vectorize(&tokens);
            counts.observe(&doc);
            for (name, _) in &row.metadata {
                if !reserved.contains(name) {
                    reserved.push(name.clone());
                }
            }
            let metadata = metadata_vector(row);
            let metadata = (!metadata.is_empty()).then_some(&metadata);
            for word in distinct_tokens(&tokens) {
                index.add_document_with_metadata(word, &doc, metadata);
            }
        }
        let dictionary =
            AttributeDictionary::build_with_reserved(&counts, self.min_att_docs, &reserved);
        log::debug!(
            "centroid training pass done: {} words, {} attributes",
            index.len(),
            dictionary.len()
        );
        Ok(CentroidState {
            dictionary,
            words: index.into_words(),
        })
    }

    fn apply(&self, rows: &[InputRow], state: &CentroidState) -> Result<FeatureMatrix> {
        Ok(map_rows(
            rows,
            self.tokenizer.as_ref(),
            &self.extractor,
            &state.dictionary,
        ))
    }
}
