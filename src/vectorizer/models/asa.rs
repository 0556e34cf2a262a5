use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::InputRow;
use crate::tokenize::Tokenizer;
use crate::vectorizer::dictionary::{AttributeCounts, AttributeDictionary};
use crate::vectorizer::features::FeatureExtractor;
use crate::vectorizer::lexicon::{Lexicon, PolarityLexicon};
use crate::vectorizer::matrix::FeatureMatrix;
use crate::vectorizer::sampler::{synthesize, PolarityPools};

use super::{map_rows, TwoPhaseVectorizer};

/// Annotate-sample-average: synthetic labelled instances from unlabelled
/// text and a seed lexicon.
///
/// Training annotates every document with the oracle, fills the polarity
/// pools and freezes the dictionary. `generate` then draws
/// `tweets_per_centroid` documents with replacement per synthetic instance
/// and averages them; the seeded generator makes a run reproducible.
pub struct AsaModel {
    tokenizer: Box<dyn Tokenizer>,
    extractor: FeatureExtractor,
    lexicon: PolarityLexicon,
    exclusive_sets: bool,
    min_att_docs: u64,
    tweets_per_centroid: usize,
    num_pos_instances: usize,
    num_neg_instances: usize,
    random_seed: u64,
}

impl fmt::Debug for AsaModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsaModel")
            .field("extractor", &self.extractor)
            .field("lexicon_words", &self.lexicon.len())
            .field("exclusive_sets", &self.exclusive_sets)
            .field("min_att_docs", &self.min_att_docs)
            .field("tweets_per_centroid", &self.tweets_per_centroid)
            .field("num_pos_instances", &self.num_pos_instances)
            .field("num_neg_instances", &self.num_neg_instances)
            .field("random_seed", &self.random_seed)
            .finish()
    }
}

impl AsaModel {
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
            tweets_per_centroid: 10,
            num_pos_instances: 100,
            num_neg_instances: 100,
            random_seed: 1,
        }
    }

    /// Drop documents containing both polarities instead of pooling them
    /// twice.
    pub fn with_exclusive_sets(mut self, on: bool) -> Self {
        self.exclusive_sets = on;
        self
    }

    pub fn with_min_att_docs(mut self, n: u64) -> Self {
        self.min_att_docs = n;
        self
    }

    /// Number of documents averaged into one synthetic instance.
    pub fn with_tweets_per_centroid(mut self, k: usize) -> Self {
        self.tweets_per_centroid = k;
        self
    }

    pub fn with_num_instances(mut self, positive: usize, negative: usize) -> Self {
        self.num_pos_instances = positive;
        self.num_neg_instances = negative;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Synthesize the configured number of labelled instances.
    pub fn generate(&self, state: &AsaState) -> Result<FeatureMatrix> {
        self.generate_seeded(state, self.random_seed)
    }

    /// Like [`generate`](Self::generate) with an explicit seed.
    pub fn generate_seeded(&self, state: &AsaState, seed: u64) -> Result<FeatureMatrix> {
        synthesize(
            &state.pools,
            &state.dictionary,
            self.num_pos_instances,
            self.num_neg_instances,
            self.tweets_per_centroid,
            seed,
            self.lexicon.positive_value(),
            self.lexicon.negative_value(),
        )
    }
}

/// Frozen result of an ASA training pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsaState {
    pub dictionary: AttributeDictionary,
    pub pools: PolarityPools,
}

impl TwoPhaseVectorizer for AsaModel {
    type State = AsaState;

    fn train(&self, rows: &[InputRow]) -> Result<AsaState> {
        let mut counts = AttributeCounts::new();
        let mut pools = PolarityPools::new();
        for row in rows {
            let tokens = self.tokenizer.tokenize(&row.text);
            let doc = self.extractor.vectorize(&tokens);
            counts.observe(&doc);
            let polarity = self.lexicon.classify_document(&tokens);
            pools.push(polarity, doc, self.exclusive_sets);
        }
        let dictionary = AttributeDictionary::build(&counts, self.min_att_docs);
        log::debug!(
            "asa training pass done: {} positive / {} negative pooled, {} attributes",
            pools.positive().len(),
            pools.negative().len(),
            dictionary.len()
        );
        Ok(AsaState { dictionary, pools })
    }

    fn apply(&self, rows: &[InputRow], state: &AsaState) -> Result<FeatureMatrix> {
        Ok(map_rows(
            rows,
            self.tokenizer.as_ref(),
            &self.extractor,
            &state.dictionary,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::tokenize::TweetTokenizer;
    use crate::vectorizer::lexicon::WordPolarity;

    fn lexicon() -> PolarityLexicon {
        let mut lexicon = PolarityLexicon::new();
        lexicon
            .insert_polarity("good", WordPolarity::Positive)
            .insert_polarity("bad", WordPolarity::Negative);
        lexicon
    }

    fn model() -> AsaModel {
        AsaModel::new(
            Box::new(TweetTokenizer::new()),
            FeatureExtractor::new(),
            lexicon(),
        )
    }

    fn rows(texts: &[&str]) -> Vec<InputRow> {
        texts.iter().map(|t| InputRow::new(*t)).collect()
    }

    #[test]
    fn pools_follow_the_oracle() {
        let inclusive = model();
        let state = inclusive
            .train(&rows(&[
                "good morning",
                "such a bad day",
                "good and bad at once",
                "nothing to see",
            ]))
            .unwrap();
        // inclusive default: the mixed document lands in both pools
        assert_eq!(state.pools.positive().len(), 2);
        assert_eq!(state.pools.negative().len(), 2);

        let exclusive = model().with_exclusive_sets(true);
        let state = exclusive
            .train(&rows(&["good morning", "good and bad at once"]))
            .unwrap();
        assert_eq!(state.pools.positive().len(), 1);
        assert_eq!(state.pools.negative().len(), 0);
    }

    #[test]
    fn generation_is_reproducible_per_seed() {
        let model = model()
            .with_num_instances(6, 6)
            .with_tweets_per_centroid(3)
            .with_random_seed(7);
        let state = model
            .train(&rows(&[
                "good morning",
                "good vibes",
                "bad day",
                "really bad luck",
            ]))
            .unwrap();
        let a = model.generate(&state).unwrap();
        let b = model.generate(&state).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.n_rows(), 12);
        let other = model.generate_seeded(&state, 8).unwrap();
        assert_ne!(a, other);
    }

    #[test]
    fn empty_pool_fails_loudly() {
        let model = model().with_num_instances(1, 1);
        let state = model.train(&rows(&["good only here"])).unwrap();
        assert!(matches!(
            model.generate(&state).unwrap_err(),
            Error::EmptyPool {
                polarity: "negative"
            }
        ));
    }

    #[test]
    fn synthetic_labels_use_the_lexicon_values() {
        let model = model().with_num_instances(2, 1).with_tweets_per_centroid(2);
        let state = model.train(&rows(&["good stuff", "bad stuff"])).unwrap();
        let matrix = model.generate(&state).unwrap();
        let labels: Vec<_> = matrix
            .rows
            .iter()
            .map(|r| r.annotation.class().unwrap().to_string())
            .collect();
        assert_eq!(labels, vec!["positive", "positive", "negative"]);
    }
}
