use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::dictionary::AttributeDictionary;
use super::features::SparseVector;
use super::lexicon::DocumentPolarity;
use super::matrix::{FeatureMatrix, InstanceRow, RowAnnotation};

/// Document pools partitioned by lexicon polarity.
///
/// A document classified `Both` is excluded from both pools under the
/// exclusive-sets policy, and pushed into *both* pools otherwise. The
/// inclusive default inflates apparent pool sizes; downstream behavior
/// depends on it, so it is kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolarityPools {
    positive: Vec<SparseVector<f64>>,
    negative: Vec<SparseVector<f64>>,
}

impl PolarityPools {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route one classified document into the pools.
    pub fn push(
        &mut self,
        polarity: DocumentPolarity,
        vector: SparseVector<f64>,
        exclusive_sets: bool,
    ) -> &mut Self {
        match polarity {
            DocumentPolarity::HasPositive => self.positive.push(vector),
            DocumentPolarity::HasNegative => self.negative.push(vector),
            DocumentPolarity::Both => {
                if !exclusive_sets {
                    self.positive.push(vector.clone());
                    self.negative.push(vector);
                }
            }
            DocumentPolarity::Neither => {}
        }
        self
    }

    pub fn positive(&self) -> &[SparseVector<f64>] {
        &self.positive
    }

    pub fn negative(&self) -> &[SparseVector<f64>] {
        &self.negative
    }
}

/// Synthesize labelled training instances by annotate-sample-average.
///
/// For each instance, `k` documents are drawn uniformly **with replacement**
/// from the instance's polarity pool and averaged feature-wise (a feature
/// absent from a draw contributes zero to that draw's share). The positive
/// instances are drawn first, then the negative ones.
///
/// Randomness comes from `rand`'s `StdRng` seeded with `seed` via
/// `seed_from_u64`, so a given seed reproduces the exact same matrix on
/// every run of the same build. Features outside `dictionary` are dropped.
///
/// Sampling `n > 0` instances from an empty pool is a configuration error.
#[allow(clippy::too_many_arguments)]
pub fn synthesize(
    pools: &PolarityPools,
    dictionary: &AttributeDictionary,
    n_pos: usize,
    n_neg: usize,
    k: usize,
    seed: u64,
    positive_label: &str,
    negative_label: &str,
) -> Result<FeatureMatrix> {
    if n_pos > 0 && pools.positive.is_empty() {
        return Err(Error::EmptyPool {
            polarity: "positive",
        });
    }
    if n_neg > 0 && pools.negative.is_empty() {
        return Err(Error::EmptyPool {
            polarity: "negative",
        });
    }
    let k = k.max(1);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut matrix = FeatureMatrix::new(dictionary.column_names());
    for _ in 0..n_pos {
        let row = draw_instance(&mut rng, pools.positive(), k, dictionary, positive_label);
        matrix.push(row);
    }
    for _ in 0..n_neg {
        let row = draw_instance(&mut rng, pools.negative(), k, dictionary, negative_label);
        matrix.push(row);
    }
    Ok(matrix)
}

fn draw_instance(
    rng: &mut StdRng,
    pool: &[SparseVector<f64>],
    k: usize,
    dictionary: &AttributeDictionary,
    label: &str,
) -> InstanceRow {
    let share = 1.0 / k as f64;
    let mut accumulated = SparseVector::new();
    for _ in 0..k {
        let doc = &pool[rng.gen_range(0..pool.len())];
        for (feature, value) in doc.iter() {
            accumulated.add(feature, value * share);
        }
    }
    InstanceRow::new(
        dictionary.map(&accumulated),
        RowAnnotation::Class(label.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::dictionary::AttributeCounts;

    fn vector(pairs: &[(&str, f64)]) -> SparseVector<f64> {
        let mut v = SparseVector::new();
        for (f, x) in pairs {
            v.add(f, *x);
        }
        v
    }

    fn dictionary_over(vectors: &[SparseVector<f64>]) -> AttributeDictionary {
        let mut counts = AttributeCounts::new();
        for v in vectors {
            counts.observe(v);
        }
        AttributeDictionary::build(&counts, 1)
    }

    #[test]
    fn both_documents_land_in_both_pools_by_default() {
        let mut pools = PolarityPools::new();
        pools.push(DocumentPolarity::Both, vector(&[("WORD-x", 1.0)]), false);
        assert_eq!(pools.positive().len(), 1);
        assert_eq!(pools.negative().len(), 1);
    }

    #[test]
    fn exclusive_sets_drop_both_documents() {
        let mut pools = PolarityPools::new();
        pools.push(DocumentPolarity::Both, vector(&[("WORD-x", 1.0)]), true);
        pools.push(DocumentPolarity::Neither, vector(&[("WORD-y", 1.0)]), true);
        assert!(pools.positive().is_empty());
        assert!(pools.negative().is_empty());
    }

    #[test]
    fn same_seed_reproduces_the_matrix_exactly() {
        let docs = [
            vector(&[("WORD-good", 2.0)]),
            vector(&[("WORD-great", 1.0)]),
            vector(&[("WORD-bad", 1.0)]),
        ];
        let dict = dictionary_over(&docs);
        let mut pools = PolarityPools::new();
        pools.push(DocumentPolarity::HasPositive, docs[0].clone(), true);
        pools.push(DocumentPolarity::HasPositive, docs[1].clone(), true);
        pools.push(DocumentPolarity::HasNegative, docs[2].clone(), true);

        let a = synthesize(&pools, &dict, 5, 5, 3, 42, "positive", "negative").unwrap();
        let b = synthesize(&pools, &dict, 5, 5, 3, 42, "positive", "negative").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_usually_differ() {
        let docs: Vec<SparseVector<f64>> = (0..16)
            .map(|i| vector(&[(format!("WORD-w{i}").as_str(), 1.0)]))
            .collect();
        let dict = dictionary_over(&docs);
        let mut pools = PolarityPools::new();
        for doc in &docs {
            pools.push(DocumentPolarity::HasPositive, doc.clone(), true);
        }
        let a = synthesize(&pools, &dict, 8, 0, 4, 1, "positive", "negative").unwrap();
        let b = synthesize(&pools, &dict, 8, 0, 4, 2, "positive", "negative").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn singleton_pool_gives_exact_means() {
        // with one document every draw is that document, so the averaged
        // instance equals it regardless of the RNG stream
        let doc = vector(&[("WORD-good", 2.0), ("WORD-great", 1.0)]);
        let dict = dictionary_over(std::slice::from_ref(&doc));
        let mut pools = PolarityPools::new();
        pools.push(DocumentPolarity::HasPositive, doc.clone(), true);

        let matrix = synthesize(&pools, &dict, 2, 0, 7, 9, "positive", "negative").unwrap();
        assert_eq!(matrix.n_rows(), 2);
        for row in &matrix.rows {
            let dense = row.values.to_dense(dict.len());
            let good = dict.index_of("WORD-good").unwrap();
            let great = dict.index_of("WORD-great").unwrap();
            assert!((dense[good] - 2.0).abs() < 1e-9);
            assert!((dense[great] - 1.0).abs() < 1e-9);
            assert_eq!(row.annotation.class(), Some("positive"));
        }
    }

    #[test]
    fn oov_features_are_dropped_from_synthetic_instances() {
        let known = vector(&[("WORD-known", 1.0)]);
        let dict = dictionary_over(std::slice::from_ref(&known));
        let mut pools = PolarityPools::new();
        pools.push(
            DocumentPolarity::HasPositive,
            vector(&[("WORD-known", 1.0), ("WORD-unknown", 4.0)]),
            true,
        );
        let matrix = synthesize(&pools, &dict, 1, 0, 2, 0, "positive", "negative").unwrap();
        assert_eq!(matrix.rows[0].values.len(), 1);
    }

    #[test]
    fn empty_pool_is_a_fatal_configuration_error() {
        let dict = dictionary_over(&[]);
        let pools = PolarityPools::new();
        let err = synthesize(&pools, &dict, 1, 0, 2, 0, "positive", "negative").unwrap_err();
        assert!(matches!(
            err,
            Error::EmptyPool {
                polarity: "positive"
            }
        ));
        // nothing requested, nothing drawn, no error
        assert!(synthesize(&pools, &dict, 0, 0, 2, 0, "positive", "negative").is_ok());
    }
}
