use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::InputRow;
use crate::tokenize::Tokenizer;
use crate::vectorizer::dictionary::{AttributeCounts, AttributeDictionary};
use crate::vectorizer::features::{distinct_tokens, FeatureExtractor};
use crate::vectorizer::index::{PostingIndex, PostingRecord};
use crate::vectorizer::lexicon::{Lexicon, PolarityLexicon, WordPolarity};
use crate::vectorizer::matrix::{FeatureMatrix, InstanceRow, RowAnnotation};
use crate::vectorizer::partition::{centroid, partitions};

use super::{map_rows, metadata_vector, TwoPhaseVectorizer};

/// Partitioned tweet centroids: one lexicon word yields several labelled
/// training instances instead of one.
///
/// Only words the seed lexicon can classify are tracked, and the full
/// posting list is kept per word because partitioning needs the original
/// per-document vectors. `labelled_instances` splits each posting list into
/// fixed-size partitions and averages every partition into one instance
/// labelled with the word's polarity.
pub struct PartitionedCentroidModel {
    tokenizer: Box<dyn Tokenizer>,
    extractor: FeatureExtractor,
    lexicon: PolarityLexicon,
    min_att_docs: u64,
    min_inst_docs: u64,
    partition_size: usize,
}

impl fmt::Debug for PartitionedCentroidModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartitionedCentroidModel")
            .field("extractor", &self.extractor)
            .field("lexicon_words", &self.lexicon.len())
            .field("min_att_docs", &self.min_att_docs)
            .field("min_inst_docs", &self.min_inst_docs)
            .field("partition_size", &self.partition_size)
            .finish()
    }
}

impl PartitionedCentroidModel {
    pub fn new(
        tokenizer: Box<dyn Tokenizer>,
        extractor: FeatureExtractor,
        lexicon: PolarityLexicon,
    ) -> Self {
        Self {
            tokenizer,
            extractor,
            lexicon,
            min_att_docs: 0,
            min_inst_docs: 0,
            partition_size: 0,
        }
    }

    pub fn with_min_att_docs(mut self, n: u64) -> Self {
        self.min_att_docs = n;
        self
    }

    /// Exclude words with fewer than `n` postings before partitioning.
    pub fn with_min_inst_docs(mut self, n: u64) -> Self {
        self.min_inst_docs = n;
        self
    }

    /// Partition size; 0 keeps each posting list whole (plain centroids).
    pub fn with_partition_size(mut self, size: usize) -> Self {
        self.partition_size = size;
        self
    }

    /// One instance per partition, labelled with the word's polarity.
    pub fn labelled_instances(&self, state: &PartitionedState) -> FeatureMatrix {
        let mut matrix = FeatureMatrix::new(state.dictionary.column_names());
        for (word, record) in &state.words {
            if record.doc_count() < self.min_inst_docs {
                continue;
            }
            let label = match self.lexicon.classify(word) {
                WordPolarity::Positive => self.lexicon.positive_value(),
                WordPolarity::Negative => self.lexicon.negative_value(),
                WordPolarity::Unknown => continue,
            };
            for partition in partitions(record.postings(), self.partition_size) {
                matrix.push(InstanceRow::new(
                    state.dictionary.map(&centroid(partition)),
                    RowAnnotation::Class(label.to_string()),
                ));
            }
        }
        matrix
    }
}

/// Frozen result of a partitioned training pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionedState {
    pub dictionary: AttributeDictionary,
    #[serde(with = "indexmap::map::serde_seq")]
    pub words: IndexMap<String, PostingRecord>,
}

impl TwoPhaseVectorizer for PartitionedCentroidModel {
    type State = PartitionedState;

    fn train(&self, rows: &[InputRow]) -> Result<PartitionedState> {
        let mut counts = AttributeCounts::new();
        let mut index = PostingIndex::with_filter(self.lexicon.clone());
        for row in rows {
            let tokens = self.tokenizer.tokenize(&row.text);
            let doc = self.extractor.vectorize(&tokens);
            counts.observe(&doc);
            let metadata = metadata_vector(row);
            let metadata = (!metadata.is_empty()).then_some(&metadata);
            for word in distinct_tokens(&tokens) {
                index.add_document_with_metadata(word, &doc, metadata);
            }
        }
        let dictionary = AttributeDictionary::build(&counts, self.min_att_docs);
        log::debug!(
            "partitioned training pass done: {} lexicon words, {} attributes",
            index.len(),
            dictionary.len()
        );
        Ok(PartitionedState {
            dictionary,
            words: index.into_words(),
        })
    }

    fn apply(&self, rows: &[InputRow], state: &PartitionedState) -> Result<FeatureMatrix> {
        Ok(map_rows(
            rows,
            self.tokenizer.as_ref(),
            &self.extractor,
            &state.dictionary,
        ))
    }
}
