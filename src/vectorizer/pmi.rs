use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Per-word class counters, Laplace-initialized to 1 so the PMI logarithms
/// are always defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct WordCounts {
    pos: u64,
    neg: u64,
}

impl Default for WordCounts {
    fn default() -> Self {
        Self { pos: 1, neg: 1 }
    }
}

/// Semantic-orientation calculator over a class-labelled corpus.
///
/// For every word the calculator tracks how many positive and negative
/// documents contained it; the orientation is the pointwise-mutual-
/// information difference
///
/// ```text
/// SO(w) = log2(pos_count / pos_docs) - log2(neg_count / neg_docs)
/// ```
///
/// with all counters Laplace-initialized to 1. Documents whose class label
/// matches neither configured value are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PmiCalculator {
    positive_value: String,
    negative_value: String,
    min_freq: u64,
    pos_docs: u64,
    neg_docs: u64,
    #[serde(with = "indexmap::map::serde_seq")]
    words: IndexMap<String, WordCounts>,
}

impl Default for PmiCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl PmiCalculator {
    pub fn new() -> Self {
        Self {
            positive_value: "positive".to_string(),
            negative_value: "negative".to_string(),
            min_freq: 0,
            pos_docs: 1,
            neg_docs: 1,
            words: IndexMap::new(),
        }
    }

    pub fn with_class_values(
        mut self,
        positive: impl Into<String>,
        negative: impl Into<String>,
    ) -> Self {
        self.positive_value = positive.into();
        self.negative_value = negative.into();
        self
    }

    /// Drop words whose combined counters stay below `min_freq`.
    pub fn with_min_freq(mut self, min_freq: u64) -> Self {
        self.min_freq = min_freq;
        self
    }

    /// Count one labelled document. Every distinct token is attributed to
    /// the document's class once.
    pub fn observe(&mut self, tokens: &[String], class: &str) -> &mut Self {
        let positive = if class == self.positive_value {
            true
        } else if class == self.negative_value {
            false
        } else {
            return self;
        };
        if positive {
            self.pos_docs += 1;
        } else {
            self.neg_docs += 1;
        }
        let distinct: IndexSet<&str> = tokens.iter().map(|t| t.as_str()).collect();
        for token in distinct {
            let counts = self.words.entry(token.to_string()).or_default();
            if positive {
                counts.pos += 1;
            } else {
                counts.neg += 1;
            }
        }
        self
    }

    /// Number of positive documents counted (including the Laplace seed).
    pub fn pos_docs(&self) -> u64 {
        self.pos_docs
    }

    /// Number of negative documents counted (including the Laplace seed).
    pub fn neg_docs(&self) -> u64 {
        self.neg_docs
    }

    /// Orientation of one word, or None when the word was never seen or
    /// falls under the frequency threshold.
    pub fn orientation(&self, word: &str) -> Option<f64> {
        let counts = self.words.get(word)?;
        if counts.pos + counts.neg < self.min_freq {
            return None;
        }
        Some(self.so(counts))
    }

    /// Orientations of every surviving word, lexicographically sorted.
    pub fn scores(&self) -> Vec<(String, f64)> {
        let mut scores: Vec<(String, f64)> = self
            .words
            .iter()
            .filter(|(_, counts)| counts.pos + counts.neg >= self.min_freq)
            .map(|(word, counts)| (word.clone(), self.so(counts)))
            .collect();
        scores.sort_by(|a, b| a.0.cmp(&b.0));
        scores
    }

    #[inline]
    fn so(&self, counts: &WordCounts) -> f64 {
        (counts.pos as f64 / self.pos_docs as f64).log2()
            - (counts.neg as f64 / self.neg_docs as f64).log2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn positive_only_word_scores_positive() {
        let mut calc = PmiCalculator::new();
        calc.observe(&toks(&["great", "day"]), "positive")
            .observe(&toks(&["great", "time"]), "positive")
            .observe(&toks(&["sad", "day"]), "negative");
        assert!(calc.orientation("great").unwrap() > 0.0);
        assert!(calc.orientation("sad").unwrap() < 0.0);
    }

    #[test]
    fn unrelated_class_labels_are_ignored() {
        let mut calc = PmiCalculator::new();
        calc.observe(&toks(&["great"]), "neutral");
        assert_eq!(calc.orientation("great"), None);
        assert_eq!(calc.pos_docs(), 1);
        assert_eq!(calc.neg_docs(), 1);
    }

    #[test]
    fn min_freq_drops_rare_words() {
        let mut calc = PmiCalculator::new().with_min_freq(10);
        calc.observe(&toks(&["rare"]), "positive");
        assert_eq!(calc.orientation("rare"), None);
        assert!(calc.scores().is_empty());
    }

    #[test]
    fn scores_come_out_lexicographically_sorted() {
        let mut calc = PmiCalculator::new();
        calc.observe(&toks(&["zebra", "apple", "mango"]), "positive");
        let scores = calc.scores();
        let words: Vec<&str> = scores.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(words, vec!["apple", "mango", "zebra"]);
    }

    #[test]
    fn distinct_tokens_count_once_per_document() {
        let mut calc = PmiCalculator::new();
        calc.observe(&toks(&["good", "good", "good"]), "positive");
        let mut other = PmiCalculator::new();
        other.observe(&toks(&["good"]), "positive");
        assert_eq!(calc.orientation("good"), other.orientation("good"));
    }

    #[test]
    fn good_bad_corpus_end_to_end() {
        let mut calc = PmiCalculator::new().with_min_freq(1);
        calc.observe(&toks(&["good", "good"]), "positive")
            .observe(&toks(&["bad"]), "negative")
            .observe(&toks(&["good", "bad"]), "positive");
        assert!(calc.orientation("good").unwrap() > 0.0);
        assert!(calc.orientation("bad").unwrap() < 0.0);
    }
}
