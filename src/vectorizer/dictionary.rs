use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::features::SparseVector;

/// Feature -> distinct-document count, accumulated during the training pass.
///
/// `observe` is called once per document; every feature present in the
/// document counts once regardless of its value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeCounts {
    #[serde(with = "indexmap::map::serde_seq")]
    counts: IndexMap<String, u64>,
}

impl AttributeCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, vector: &SparseVector<f64>) -> &mut Self {
        for feature in vector.features() {
            match self.counts.get_mut(feature) {
                Some(count) => *count += 1,
                None => {
                    self.counts.insert(feature.to_string(), 1);
                }
            }
        }
        self
    }

    #[inline]
    pub fn count(&self, feature: &str) -> u64 {
        self.counts.get(feature).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counts.iter().map(|(f, c)| (f.as_str(), *c))
    }
}

/// Frozen feature -> column mapping.
///
/// Built exactly once per training pass; insertion order is the column order
/// of every emitted row, and indices `0..len` are each used exactly once.
/// There is no mutation API: once built, the layout cannot change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDictionary {
    #[serde(with = "indexmap::map::serde_seq")]
    columns: IndexMap<String, usize>,
}

impl AttributeDictionary {
    /// Keep features seen in at least `min_doc_freq` documents, assigning
    /// dense indices in the count table's natural order.
    pub fn build(counts: &AttributeCounts, min_doc_freq: u64) -> Self {
        Self::build_with_reserved(counts, min_doc_freq, &[])
    }

    /// Like [`build`](Self::build), but first reserves leading columns for
    /// externally supplied numeric attributes (word metadata). Reserved names
    /// bypass the frequency cut.
    pub fn build_with_reserved(
        counts: &AttributeCounts,
        min_doc_freq: u64,
        reserved: &[String],
    ) -> Self {
        let mut columns = IndexMap::new();
        for name in reserved {
            let next = columns.len();
            columns.entry(name.clone()).or_insert(next);
        }
        for (feature, count) in counts.iter() {
            if count >= min_doc_freq && !columns.contains_key(feature) {
                let next = columns.len();
                columns.insert(feature.to_string(), next);
            }
        }
        Self { columns }
    }

    #[inline]
    pub fn index_of(&self, feature: &str) -> Option<usize> {
        self.columns.get(feature).copied()
    }

    #[inline]
    pub fn contains(&self, feature: &str) -> bool {
        self.columns.contains_key(feature)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in column order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.keys().cloned().collect()
    }

    /// Project a document vector onto the dictionary columns. Features
    /// outside the dictionary are dropped; this is the expected behavior for
    /// out-of-vocabulary features at application time, not an error.
    pub fn map(&self, vector: &SparseVector<f64>) -> SparseRow {
        let mut entries: Vec<(usize, f64)> = vector
            .iter()
            .filter_map(|(feature, value)| self.index_of(feature).map(|col| (col, value)))
            .collect();
        entries.sort_unstable_by_key(|(col, _)| *col);
        SparseRow { entries }
    }
}

/// One mapped row: `(column, value)` pairs sorted by column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseRow {
    entries: Vec<(usize, f64)>,
}

impl SparseRow {
    /// Build a row directly from `(column, value)` pairs.
    pub fn from_entries(mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_unstable_by_key(|(col, _)| *col);
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn get(&self, column: usize) -> Option<f64> {
        self.entries
            .binary_search_by_key(&column, |(col, _)| *col)
            .ok()
            .map(|i| self.entries[i].1)
    }

    /// Materialize as a dense row of `width` columns.
    pub fn to_dense(&self, width: usize) -> Vec<f64> {
        let mut dense = vec![0.0; width];
        for (col, value) in self.iter() {
            if col < width {
                dense[col] = value;
            }
        }
        dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(pairs: &[(&str, f64)]) -> SparseVector<f64> {
        let mut v = SparseVector::new();
        for (f, x) in pairs {
            v.add(f, *x);
        }
        v
    }

    #[test]
    fn counts_are_per_document_not_per_value() {
        let mut counts = AttributeCounts::new();
        counts.observe(&vector(&[("WORD-a", 5.0), ("WORD-b", 1.0)]));
        counts.observe(&vector(&[("WORD-a", 1.0)]));
        assert_eq!(counts.count("WORD-a"), 2);
        assert_eq!(counts.count("WORD-b"), 1);
        assert_eq!(counts.count("WORD-c"), 0);
    }

    #[test]
    fn build_prunes_rare_features_and_packs_indices() {
        let mut counts = AttributeCounts::new();
        counts.observe(&vector(&[("WORD-a", 1.0), ("WORD-b", 1.0)]));
        counts.observe(&vector(&[("WORD-a", 1.0), ("WORD-c", 1.0)]));
        let dict = AttributeDictionary::build(&counts, 2);
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.index_of("WORD-a"), Some(0));
        assert_eq!(dict.index_of("WORD-b"), None);

        let all = AttributeDictionary::build(&counts, 1);
        let names = all.column_names();
        assert_eq!(names.len(), 3);
        for (col, name) in names.iter().enumerate() {
            assert_eq!(all.index_of(name), Some(col));
        }
    }

    #[test]
    fn reserved_columns_lead_the_layout() {
        let mut counts = AttributeCounts::new();
        counts.observe(&vector(&[("WORD-a", 1.0)]));
        let dict = AttributeDictionary::build_with_reserved(
            &counts,
            1,
            &["followers".to_string(), "retweets".to_string()],
        );
        assert_eq!(dict.index_of("followers"), Some(0));
        assert_eq!(dict.index_of("retweets"), Some(1));
        assert_eq!(dict.index_of("WORD-a"), Some(2));
    }

    #[test]
    fn map_drops_out_of_dictionary_features() {
        let mut counts = AttributeCounts::new();
        counts.observe(&vector(&[("WORD-a", 1.0), ("WORD-b", 1.0)]));
        let dict = AttributeDictionary::build(&counts, 1);
        let row = dict.map(&vector(&[("WORD-b", 2.0), ("WORD-oov", 9.0)]));
        assert_eq!(row.len(), 1);
        assert_eq!(row.get(dict.index_of("WORD-b").unwrap()), Some(2.0));
    }

    #[test]
    fn mapping_twice_yields_identical_rows() {
        let mut counts = AttributeCounts::new();
        counts.observe(&vector(&[("WORD-a", 1.0), ("WORD-b", 1.0)]));
        let dict = AttributeDictionary::build(&counts, 1);
        let doc = vector(&[("WORD-a", 3.0), ("WORD-b", 1.0)]);
        assert_eq!(dict.map(&doc), dict.map(&doc));
    }

    #[test]
    fn dense_projection_respects_column_order() {
        let mut counts = AttributeCounts::new();
        counts.observe(&vector(&[("WORD-a", 1.0), ("WORD-b", 1.0)]));
        let dict = AttributeDictionary::build(&counts, 1);
        let row = dict.map(&vector(&[("WORD-b", 4.0)]));
        let dense = row.to_dense(dict.len());
        assert_eq!(dense, vec![0.0, 4.0]);
    }
}
