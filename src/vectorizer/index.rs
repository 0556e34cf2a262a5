use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::features::SparseVector;

/// Inclusion predicate deciding which words an index tracks.
///
/// Distant-supervision models only describe lexicon words distributionally;
/// tracking the whole vocabulary there would waste the posting-list memory
/// budget. [`AdmitAll`] is the unrestricted variant.
pub trait WordFilter {
    fn admits(&self, word: &str) -> bool;
}

/// Admits every word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmitAll;

impl WordFilter for AdmitAll {
    #[inline]
    fn admits(&self, _word: &str) -> bool {
        true
    }
}

/// Aggregate record of the tweet-centroid index variant.
///
/// Holds the feature-wise sum of every document vector the word appeared in;
/// the posting list itself is not retained. A parallel metadata vector is
/// summed the same way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    doc_count: u64,
    aggregate: SparseVector<f64>,
    metadata: SparseVector<f64>,
}

impl WordRecord {
    #[inline]
    pub fn doc_count(&self) -> u64 {
        self.doc_count
    }

    pub fn aggregate(&self) -> &SparseVector<f64> {
        &self.aggregate
    }

    pub fn metadata(&self) -> &SparseVector<f64> {
        &self.metadata
    }

    /// Aggregate averaged over the word's document count.
    pub fn centroid(&self) -> SparseVector<f64> {
        let mut centroid = self.aggregate.clone();
        if self.doc_count > 0 {
            centroid.scale(1.0 / self.doc_count as f64);
        }
        centroid
    }

    /// Metadata averaged over the word's document count.
    pub fn metadata_mean(&self) -> SparseVector<f64> {
        let mut mean = self.metadata.clone();
        if self.doc_count > 0 {
            mean.scale(1.0 / self.doc_count as f64);
        }
        mean
    }
}

/// Word index of the aggregate (tweet-centroid) variant.
///
/// `add_document` sums the document vector into the word's aggregate; the
/// word's document count always equals the number of accepted calls.
#[derive(Debug, Clone)]
pub struct CentroidIndex<F = AdmitAll>
where
    F: WordFilter,
{
    words: IndexMap<String, WordRecord>,
    filter: F,
}

impl CentroidIndex<AdmitAll> {
    pub fn new() -> Self {
        Self::with_filter(AdmitAll)
    }
}

impl Default for CentroidIndex<AdmitAll> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> CentroidIndex<F>
where
    F: WordFilter,
{
    pub fn with_filter(filter: F) -> Self {
        Self {
            words: IndexMap::new(),
            filter,
        }
    }

    /// Record one document occurrence of `word`. Returns false when the
    /// filter rejects the word.
    pub fn add_document(&mut self, word: &str, doc: &SparseVector<f64>) -> bool {
        self.add_document_with_metadata(word, doc, None)
    }

    /// Like [`add_document`](Self::add_document), optionally merging a
    /// parallel numeric metadata vector.
    pub fn add_document_with_metadata(
        &mut self,
        word: &str,
        doc: &SparseVector<f64>,
        metadata: Option<&SparseVector<f64>>,
    ) -> bool {
        if !self.filter.admits(word) {
            return false;
        }
        let record = self.words.entry(word.to_string()).or_default();
        record.doc_count += 1;
        record.aggregate.merge_sum(doc);
        if let Some(metadata) = metadata {
            record.metadata.merge_sum(metadata);
        }
        true
    }

    pub fn get(&self, word: &str) -> Option<&WordRecord> {
        self.words.get(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WordRecord)> + '_ {
        self.words.iter().map(|(w, r)| (w.as_str(), r))
    }

    /// Detach the accumulated records, dropping the filter. This is the
    /// freeze step at the end of a training pass.
    pub fn into_words(self) -> IndexMap<String, WordRecord> {
        self.words
    }
}

/// Posting-list record of the partitioned variant.
///
/// Keeps every individual document vector because partitioning needs the
/// originals, not their sum. Memory is O(lexicon-document-occurrences) for
/// the duration of the training pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostingRecord {
    postings: Vec<SparseVector<f64>>,
    metadata: SparseVector<f64>,
}

impl PostingRecord {
    #[inline]
    pub fn doc_count(&self) -> u64 {
        self.postings.len() as u64
    }

    pub fn postings(&self) -> &[SparseVector<f64>] {
        &self.postings
    }

    pub fn metadata(&self) -> &SparseVector<f64> {
        &self.metadata
    }

    pub fn metadata_mean(&self) -> SparseVector<f64> {
        let mut mean = self.metadata.clone();
        if !self.postings.is_empty() {
            mean.scale(1.0 / self.postings.len() as f64);
        }
        mean
    }
}

/// Word index of the posting-list (partitioned) variant.
#[derive(Debug, Clone)]
pub struct PostingIndex<F = AdmitAll>
where
    F: WordFilter,
{
    words: IndexMap<String, PostingRecord>,
    filter: F,
}

impl PostingIndex<AdmitAll> {
    pub fn new() -> Self {
        Self::with_filter(AdmitAll)
    }
}

impl Default for PostingIndex<AdmitAll> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> PostingIndex<F>
where
    F: WordFilter,
{
    pub fn with_filter(filter: F) -> Self {
        Self {
            words: IndexMap::new(),
            filter,
        }
    }

    pub fn add_document(&mut self, word: &str, doc: &SparseVector<f64>) -> bool {
        self.add_document_with_metadata(word, doc, None)
    }

    pub fn add_document_with_metadata(
        &mut self,
        word: &str,
        doc: &SparseVector<f64>,
        metadata: Option<&SparseVector<f64>>,
    ) -> bool {
        if !self.filter.admits(word) {
            return false;
        }
        let record = self.words.entry(word.to_string()).or_default();
        record.postings.push(doc.clone());
        if let Some(metadata) = metadata {
            record.metadata.merge_sum(metadata);
        }
        true
    }

    pub fn get(&self, word: &str) -> Option<&PostingRecord> {
        self.words.get(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PostingRecord)> + '_ {
        self.words.iter().map(|(w, r)| (w.as_str(), r))
    }

    pub fn into_words(self) -> IndexMap<String, PostingRecord> {
        self.words
    }
}
