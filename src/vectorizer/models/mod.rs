pub mod asa;
pub mod centroid;
pub mod labeller;
pub mod partitioned;
pub mod pmi_expander;

use rayon::prelude::*;

use crate::error::Result;
use crate::input::InputRow;
use crate::tokenize::Tokenizer;

use super::dictionary::AttributeDictionary;
use super::features::{FeatureExtractor, SparseVector};
use super::matrix::{FeatureMatrix, InstanceRow, RowAnnotation};

pub use asa::{AsaModel, AsaState};
pub use centroid::{CentroidState, TweetCentroidModel};
pub use labeller::{LabellerState, LexiconLabeller};
pub use partitioned::{PartitionedCentroidModel, PartitionedState};
pub use pmi_expander::{PmiExpander, PmiState};

/// Two-phase batch protocol shared by every concrete algorithm.
///
/// The training pass streams the first batch once, building vocabulary,
/// lexicon-derived pools and the attribute dictionary, and freezes them into
/// the returned state. The application pass maps further batches through
/// that state without learning anything new. Freezing is enforced by
/// ownership: `train` hands back an immutable value and `apply` borrows it
/// shared, so application-time mutation of the dictionary does not
/// typecheck.
pub trait TwoPhaseVectorizer {
    type State;

    fn train(&self, rows: &[InputRow]) -> Result<Self::State>;

    fn apply(&self, rows: &[InputRow], state: &Self::State) -> Result<FeatureMatrix>;
}

/// Map rows through a frozen dictionary. Every row only reads frozen state,
/// so the batch is mapped in parallel.
pub(crate) fn map_rows(
    rows: &[InputRow],
    tokenizer: &dyn Tokenizer,
    extractor: &FeatureExtractor,
    dictionary: &AttributeDictionary,
) -> FeatureMatrix {
    let mapped: Vec<InstanceRow> = rows
        .par_iter()
        .map(|row| {
            let tokens = tokenizer.tokenize(&row.text);
            let vector = extractor.vectorize(&tokens);
            let annotation = match &row.class {
                Some(class) => RowAnnotation::Class(class.clone()),
                None => RowAnnotation::None,
            };
            InstanceRow::new(dictionary.map(&vector), annotation)
        })
        .collect();
    let mut matrix = FeatureMatrix::new(dictionary.column_names());
    matrix.rows = mapped;
    matrix
}

/// Numeric side-channel fields of a row as a sparse vector.
pub(crate) fn metadata_vector(row: &InputRow) -> SparseVector<f64> {
    let mut vector = SparseVector::new();
    for (name, value) in &row.metadata {
        vector.add(name, *value);
    }
    vector
}
