pub mod dictionary;
pub mod features;
pub mod index;
pub mod lexicon;
pub mod matrix;
pub mod models;
pub mod partition;
pub mod pmi;
pub mod sampler;
pub mod snapshot;

pub use dictionary::{AttributeCounts, AttributeDictionary, SparseRow};
pub use features::{FeatureExtractor, SparseVector, CLUSTER_PREFIX, POS_PREFIX, WORD_PREFIX};
pub use index::{AdmitAll, CentroidIndex, PostingIndex, PostingRecord, WordFilter, WordRecord};
pub use lexicon::{DocumentPolarity, Lexicon, LexiconEntry, PolarityLexicon, WordPolarity};
pub use matrix::{FeatureMatrix, InstanceRow, RowAnnotation};
pub use models::{
    AsaModel, AsaState, CentroidState, LabellerState, LexiconLabeller, PartitionedCentroidModel,
    PartitionedState, PmiExpander, PmiState, TweetCentroidModel, TwoPhaseVectorizer,
};
pub use pmi::PmiCalculator;
pub use sampler::{synthesize, PolarityPools};
