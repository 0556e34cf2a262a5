use std::fmt;

use indexmap::{IndexMap, IndexSet};
use num::Num;
use serde::{Deserialize, Serialize};

use crate::resources::WordClusters;
use crate::tokenize::PosTagger;

/// Prefix for word unigram features.
pub const WORD_PREFIX: &str = "WORD-";
/// Prefix for word-cluster features.
pub const CLUSTER_PREFIX: &str = "CLUST-";
/// Prefix for part-of-speech features.
pub const POS_PREFIX: &str = "POS-";

/// Sparse feature vector: feature name -> value.
///
/// Entries keep insertion order, so iterating a vector is deterministic for a
/// given build sequence. Values are generic over `num::Num`; the pipeline
/// uses the `f64` instantiation throughout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "N: Serialize", deserialize = "N: Deserialize<'de>"))]
pub struct SparseVector<N = f64>
where
    N: Num + Copy,
{
    #[serde(with = "indexmap::map::serde_seq")]
    entries: IndexMap<String, N>,
}

impl<N> Default for SparseVector<N>
where
    N: Num + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N> SparseVector<N>
where
    N: Num + Copy,
{
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn get(&self, feature: &str) -> Option<N> {
        self.entries.get(feature).copied()
    }

    /// Overwrite the value of `feature`.
    #[inline]
    pub fn set(&mut self, feature: impl Into<String>, value: N) -> &mut Self {
        self.entries.insert(feature.into(), value);
        self
    }

    /// Add `amount` to the value of `feature`, inserting it at zero first.
    #[inline]
    pub fn add(&mut self, feature: &str, amount: N) -> &mut Self {
        match self.entries.get_mut(feature) {
            Some(value) => *value = *value + amount,
            None => {
                self.entries.insert(feature.to_string(), amount);
            }
        }
        self
    }

    /// Feature-wise sum of `other` into `self`.
    pub fn merge_sum(&mut self, other: &Self) -> &mut Self {
        for (feature, value) in other.iter() {
            self.add(feature, value);
        }
        self
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, N)> + '_ {
        self.entries.iter().map(|(f, v)| (f.as_str(), *v))
    }

    #[inline]
    pub fn features(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(|f| f.as_str())
    }
}

impl SparseVector<f64> {
    /// Multiply every value by `factor`.
    pub fn scale(&mut self, factor: f64) -> &mut Self {
        for value in self.entries.values_mut() {
            *value *= factor;
        }
        self
    }

    /// Element-wise mean of a set of vectors. Features absent from a vector
    /// contribute zero to that vector's share. Empty input -> empty vector.
    pub fn mean_of(vectors: &[SparseVector<f64>]) -> SparseVector<f64> {
        let mut mean = SparseVector::new();
        if vectors.is_empty() {
            return mean;
        }
        for vector in vectors {
            mean.merge_sum(vector);
        }
        mean.scale(1.0 / vectors.len() as f64);
        mean
    }
}

impl<N> FromIterator<(String, N)> for SparseVector<N>
where
    N: Num + Copy,
{
    fn from_iter<T: IntoIterator<Item = (String, N)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Turns a token sequence into a sparse document vector.
///
/// Feature families are toggled independently; each family carries its own
/// name prefix so families never collide in one vector. With frequency
/// weighting off every present feature gets value 1.
pub struct FeatureExtractor {
    word_atts: bool,
    cluster_atts: bool,
    freq_weights: bool,
    clusters: Option<WordClusters>,
    tagger: Option<Box<dyn PosTagger>>,
}

impl fmt::Debug for FeatureExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureExtractor")
            .field("word_atts", &self.word_atts)
            .field("cluster_atts", &self.cluster_atts)
            .field("freq_weights", &self.freq_weights)
            .field("clusters", &self.clusters.as_ref().map(|c| c.len()))
            .field("tagger", &self.tagger.is_some())
            .finish()
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor {
    /// Word unigrams on, frequency weighting on, no clusters, no tagger.
    pub fn new() -> Self {
        Self {
            word_atts: true,
            cluster_atts: false,
            freq_weights: true,
            clusters: None,
            tagger: None,
        }
    }

    pub fn with_word_atts(mut self, on: bool) -> Self {
        self.word_atts = on;
        self
    }

    /// Enable cluster features backed by the given dictionary.
    pub fn with_clusters(mut self, clusters: WordClusters) -> Self {
        self.cluster_atts = true;
        self.clusters = Some(clusters);
        self
    }

    /// Enable cluster features from a file, or keep the family disabled with
    /// a warning when the file cannot be loaded.
    pub fn with_clusters_from_path(self, path: impl AsRef<std::path::Path>) -> Self {
        match WordClusters::from_path(path.as_ref()) {
            Ok(clusters) => self.with_clusters(clusters),
            Err(err) => {
                log::warn!(
                    "cluster file {} unusable ({err}); cluster attributes disabled",
                    path.as_ref().display()
                );
                self
            }
        }
    }

    /// Enable POS features contributed by an external tagger.
    pub fn with_pos_tagger(mut self, tagger: Box<dyn PosTagger>) -> Self {
        self.tagger = Some(tagger);
        self
    }

    pub fn with_freq_weights(mut self, on: bool) -> Self {
        self.freq_weights = on;
        self
    }

    /// Vectorize one token sequence. An empty sequence yields an empty
    /// vector; the same tokens and flags always yield the same vector.
    pub fn vectorize(&self, tokens: &[String]) -> SparseVector<f64> {
        let mut vector = SparseVector::new();
        if self.word_atts {
            self.count_family(tokens.iter().map(|t| t.as_str()), WORD_PREFIX, &mut vector);
        }
        if self.cluster_atts {
            if let Some(clusters) = &self.clusters {
                // tokens without a cluster entry are dropped
                let ids = tokens.iter().filter_map(|t| clusters.cluster_of(t));
                self.count_family(ids, CLUSTER_PREFIX, &mut vector);
            }
        }
        if let Some(tagger) = &self.tagger {
            let tags = tagger.tag(tokens);
            self.count_family(tags.iter().map(|t| t.as_str()), POS_PREFIX, &mut vector);
        }
        vector
    }

    fn count_family<'a>(
        &self,
        items: impl Iterator<Item = &'a str>,
        prefix: &str,
        out: &mut SparseVector<f64>,
    ) {
        let mut name = String::new();
        for item in items {
            name.clear();
            name.push_str(prefix);
            name.push_str(item);
            if self.freq_weights {
                out.add(&name, 1.0);
            } else {
                out.set(name.clone(), 1.0);
            }
        }
    }
}

/// Distinct tokens in first-appearance order.
pub(crate) fn distinct_tokens(tokens: &[String]) -> IndexSet<&str> {
    tokens.iter().map(|t| t.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn word_counts_follow_frequency() {
        let extractor = FeatureExtractor::new();
        let vector = extractor.vectorize(&toks(&["good", "good", "bad"]));
        assert_eq!(vector.get("WORD-good"), Some(2.0));
        assert_eq!(vector.get("WORD-bad"), Some(1.0));
        assert_eq!(vector.len(), 2);
    }

    #[test]
    fn boolean_weighting_caps_at_one() {
        let extractor = FeatureExtractor::new().with_freq_weights(false);
        let vector = extractor.vectorize(&toks(&["good", "good", "good"]));
        assert_eq!(vector.get("WORD-good"), Some(1.0));
    }

    #[test]
    fn vectorize_is_referentially_transparent() {
        let extractor = FeatureExtractor::new();
        let tokens = toks(&["a", "b", "a", "c"]);
        assert_eq!(extractor.vectorize(&tokens), extractor.vectorize(&tokens));
    }

    #[test]
    fn cluster_features_drop_unknown_tokens() {
        let mut clusters = WordClusters::new();
        clusters.insert("good", "0101").insert("great", "0101");
        let extractor = FeatureExtractor::new()
            .with_word_atts(false)
            .with_clusters(clusters);
        let vector = extractor.vectorize(&toks(&["good", "great", "mystery"]));
        assert_eq!(vector.get("CLUST-0101"), Some(2.0));
        assert_eq!(vector.len(), 1);
    }

    #[test]
    fn families_do_not_collide() {
        let mut clusters = WordClusters::new();
        clusters.insert("good", "good");
        let extractor = FeatureExtractor::new().with_clusters(clusters);
        let vector = extractor.vectorize(&toks(&["good"]));
        assert_eq!(vector.get("WORD-good"), Some(1.0));
        assert_eq!(vector.get("CLUST-good"), Some(1.0));
    }

    #[test]
    fn pos_family_uses_tagger_output() {
        struct StubTagger;
        impl crate::tokenize::PosTagger for StubTagger {
            fn tag(&self, tokens: &[String]) -> Vec<String> {
                tokens.iter().map(|_| "N".to_string()).collect()
            }
        }
        let extractor = FeatureExtractor::new()
            .with_word_atts(false)
            .with_pos_tagger(Box::new(StubTagger));
        let vector = extractor.vectorize(&toks(&["one", "two"]));
        assert_eq!(vector.get("POS-N"), Some(2.0));
    }

    #[test]
    fn empty_tokens_yield_empty_vector() {
        let extractor = FeatureExtractor::new();
        assert!(extractor.vectorize(&[]).is_empty());
    }

    #[test]
    fn merge_sum_is_feature_wise() {
        let mut a: SparseVector<f64> = SparseVector::new();
        a.add("x", 1.0).add("y", 2.0);
        let mut b = SparseVector::new();
        b.add("y", 3.0).add("z", 1.0);
        a.merge_sum(&b);
        assert_eq!(a.get("x"), Some(1.0));
        assert_eq!(a.get("y"), Some(5.0));
        assert_eq!(a.get("z"), Some(1.0));
    }

    #[test]
    fn mean_of_averages_over_all_vectors() {
        let mut a = SparseVector::new();
        a.add("x", 2.0);
        let mut b = SparseVector::new();
        b.add("x", 4.0).add("y", 1.0);
        let mean = SparseVector::mean_of(&[a, b]);
        assert_eq!(mean.get("x"), Some(3.0));
        assert_eq!(mean.get("y"), Some(0.5));
        assert!(SparseVector::mean_of(&[]).is_empty());
    }
}
