/// This crate turns short-text messages into numeric feature vectors for
/// downstream classifiers using lexical resources instead of labelled
/// training data.
pub mod vectorizer;

pub mod error;
pub mod input;
pub mod resources;
pub mod tokenize;

/// Tweet Centroid Model
/// Builds word-level distributional representations by summing the sparse
/// vectors of every document a word occurs in and averaging at emission
/// time.
///
/// Training streams the first batch once and freezes the attribute
/// dictionary; `word_vectors` emits one centroid per surviving word with
/// the word itself in the trailing column, and `apply` maps held-out
/// batches through the frozen dictionary.
pub use vectorizer::models::TweetCentroidModel;

/// Partitioned Tweet Centroid Model
/// Keeps the full posting list per lexicon word and splits it into
/// fixed-size partitions, so one word yields several labelled training
/// instances instead of one.
pub use vectorizer::models::PartitionedCentroidModel;

/// Annotate-Sample-Average Model
/// Synthesizes labelled training instances by drawing documents with
/// replacement from lexicon-annotated polarity pools and averaging them.
///
/// Sampling uses a seeded generator (`StdRng`), so a run is exactly
/// reproducible for a given seed.
pub use vectorizer::models::AsaModel;

/// PMI Lexicon Expander
/// Derives a word -> semantic-orientation table from a class-labelled
/// corpus via a pointwise-mutual-information difference with Laplace
/// smoothing.
pub use vectorizer::models::PmiExpander;

/// Lexicon-based Labeller
/// Labels each document with the class its lexicon words imply and maps it
/// through the frozen attribute dictionary.
pub use vectorizer::models::LexiconLabeller;

/// Two-Phase Batch Protocol
/// Shared by every concrete model: `train` builds and freezes all state
/// from the first batch, `apply` maps further batches through it read-only.
pub use vectorizer::models::TwoPhaseVectorizer;

/// Sparse Document Vector
/// Feature name -> value map with deterministic iteration order. Feature
/// names carry a family prefix (`WORD-`, `CLUST-`, `POS-`) so families
/// never collide.
pub use vectorizer::features::SparseVector;

/// Feature Extractor
/// Turns a token sequence into a sparse document vector; word, cluster and
/// POS families toggle independently, and frequency weighting can be
/// replaced by boolean presence.
pub use vectorizer::features::FeatureExtractor;

/// Attribute Dictionary
/// Frozen feature -> column mapping built once per training pass;
/// insertion order is the column order of every emitted row.
pub use vectorizer::dictionary::AttributeDictionary;

/// Output Matrix
/// Fixed-width numeric matrix over the frozen dictionary columns, each row
/// optionally annotated with a trailing class or word-name column.
pub use vectorizer::matrix::FeatureMatrix;

/// Polarity Lexicon
/// Word table with one designated nominal polarity attribute and optional
/// numeric scores, behind the `Lexicon` capability interface.
pub use vectorizer::lexicon::{Lexicon, PolarityLexicon};

/// Tweet Tokenizer
/// Default whitespace tokenizer with lower-casing, repeated-letter
/// squashing and URL/mention normalization. Any `Tokenizer` implementation
/// can replace it.
pub use tokenize::{PosTagger, Tokenizer, TweetTokenizer};

/// Word Clusters
/// Word -> cluster-id dictionary loaded from tab-separated pairs, backing
/// the `CLUST-` feature family.
pub use resources::WordClusters;

pub use error::{Error, Result};
pub use input::{ColumnIndex, InputRow};
