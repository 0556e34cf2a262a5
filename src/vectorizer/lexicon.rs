use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::index::WordFilter;

/// Polarity of one word under a lexicon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WordPolarity {
    Positive,
    Negative,
    Unknown,
}

/// Aggregate polarity of one document's distinct tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentPolarity {
    HasPositive,
    HasNegative,
    Both,
    Neither,
}

/// Capability interface every lexicon variant exposes.
///
/// `classify` answers the nominal polarity question; `score` surfaces a
/// numeric strength where the underlying lexicon carries one.
pub trait Lexicon {
    fn classify(&self, word: &str) -> WordPolarity;

    fn score(&self, word: &str) -> Option<f64>;

    /// Classify every distinct token and aggregate.
    fn classify_document(&self, tokens: &[String]) -> DocumentPolarity {
        let distinct: IndexSet<&str> = tokens.iter().map(|t| t.as_str()).collect();
        let mut has_pos = false;
        let mut has_neg = false;
        for token in distinct {
            match self.classify(token) {
                WordPolarity::Positive => has_pos = true,
                WordPolarity::Negative => has_neg = true,
                WordPolarity::Unknown => {}
            }
        }
        match (has_pos, has_neg) {
            (true, true) => DocumentPolarity::Both,
            (true, false) => DocumentPolarity::HasPositive,
            (false, true) => DocumentPolarity::HasNegative,
            (false, false) => DocumentPolarity::Neither,
        }
    }
}

/// Attribute bag of one lexicon word: nominal values plus numeric scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LexiconEntry {
    #[serde(with = "indexmap::map::serde_seq")]
    nominal: IndexMap<String, String>,
    #[serde(with = "indexmap::map::serde_seq")]
    numeric: IndexMap<String, f64>,
}

impl LexiconEntry {
    pub fn nominal(&self, attribute: &str) -> Option<&str> {
        self.nominal.get(attribute).map(|v| v.as_str())
    }

    pub fn numeric(&self, attribute: &str) -> Option<f64> {
        self.numeric.get(attribute).copied()
    }
}

/// Word table with one designated nominal polarity attribute.
///
/// The attribute name and the strings denoting each polarity are
/// configurable; words whose value matches neither string classify as
/// Unknown, as do words absent from the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolarityLexicon {
    #[serde(with = "indexmap::map::serde_seq")]
    entries: IndexMap<String, LexiconEntry>,
    polarity_attribute: String,
    positive_value: String,
    negative_value: String,
    score_attribute: Option<String>,
}

impl Default for PolarityLexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityLexicon {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            polarity_attribute: "polarity".to_string(),
            positive_value: "positive".to_string(),
            negative_value: "negative".to_string(),
            score_attribute: None,
        }
    }

    pub fn with_polarity_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.polarity_attribute = attribute.into();
        self
    }

    pub fn with_polarity_values(
        mut self,
        positive: impl Into<String>,
        negative: impl Into<String>,
    ) -> Self {
        self.positive_value = positive.into();
        self.negative_value = negative.into();
        self
    }

    /// Numeric attribute `score` should read. When unset, the first numeric
    /// attribute of an entry is used.
    pub fn with_score_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.score_attribute = Some(attribute.into());
        self
    }

    pub fn positive_value(&self) -> &str {
        &self.positive_value
    }

    pub fn negative_value(&self) -> &str {
        &self.negative_value
    }

    pub fn insert_nominal(
        &mut self,
        word: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.entries
            .entry(word.into())
            .or_default()
            .nominal
            .insert(attribute.into(), value.into());
        self
    }

    pub fn insert_numeric(
        &mut self,
        word: impl Into<String>,
        attribute: impl Into<String>,
        value: f64,
    ) -> &mut Self {
        self.entries
            .entry(word.into())
            .or_default()
            .numeric
            .insert(attribute.into(), value);
        self
    }

    /// Shorthand for seeding the designated polarity attribute.
    pub fn insert_polarity(&mut self, word: impl Into<String>, polarity: WordPolarity) -> &mut Self {
        let value = match polarity {
            WordPolarity::Positive => self.positive_value.clone(),
            WordPolarity::Negative => self.negative_value.clone(),
            WordPolarity::Unknown => return self,
        };
        let attribute = self.polarity_attribute.clone();
        self.insert_nominal(word, attribute, value)
    }

    pub fn entry(&self, word: &str) -> Option<&LexiconEntry> {
        self.entries.get(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load from a tab-separated table. The first header column names the
    /// word key; each further header names an attribute. Values that parse
    /// as numbers become numeric attributes, anything else nominal.
    pub fn from_tsv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Resource {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file), path)
    }

    /// Load from a file, or fall back to an empty lexicon with a warning.
    /// Every word then classifies Unknown, which disables distant
    /// supervision instead of aborting the pipeline.
    pub fn from_tsv_path_or_empty(path: impl AsRef<Path>) -> Self {
        match Self::from_tsv_path(path.as_ref()) {
            Ok(lexicon) => lexicon,
            Err(err) => {
                log::warn!(
                    "lexicon file {} unusable ({err}); continuing with an empty lexicon",
                    path.as_ref().display()
                );
                Self::new()
            }
        }
    }

    fn from_reader<R: BufRead>(reader: R, path: &Path) -> Result<Self> {
        let mut lines = reader.lines().enumerate();
        let header = match lines.next() {
            Some((_, line)) => line.map_err(|source| Error::Resource {
                path: path.to_path_buf(),
                source,
            })?,
            None => {
                return Err(Error::MalformedResource {
                    path: path.to_path_buf(),
                    line: 1,
                })
            }
        };
        let attributes: Vec<String> = header.split('\t').skip(1).map(|a| a.to_string()).collect();

        let mut lexicon = Self::new();
        for (number, line) in lines {
            let line = line.map_err(|source| Error::Resource {
                path: path.to_path_buf(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split('\t');
            let word = match fields.next() {
                Some(word) if !word.is_empty() => word.to_string(),
                _ => {
                    return Err(Error::MalformedResource {
                        path: path.to_path_buf(),
                        line: number + 1,
                    })
                }
            };
            for (attribute, value) in attributes.iter().zip(fields) {
                match value.parse::<f64>() {
                    Ok(numeric) => {
                        lexicon.insert_numeric(word.clone(), attribute.clone(), numeric);
                    }
                    Err(_) => {
                        lexicon.insert_nominal(word.clone(), attribute.clone(), value);
                    }
                }
            }
        }
        Ok(lexicon)
    }
}

impl Lexicon for PolarityLexicon {
    fn classify(&self, word: &str) -> WordPolarity {
        match self
            .entries
            .get(word)
            .and_then(|entry| entry.nominal(&self.polarity_attribute))
        {
            Some(value) if value == self.positive_value => WordPolarity::Positive,
            Some(value) if value == self.negative_value => WordPolarity::Negative,
            _ => WordPolarity::Unknown,
        }
    }

    fn score(&self, word: &str) -> Option<f64> {
        let entry = self.entries.get(word)?;
        match &self.score_attribute {
            Some(attribute) => entry.numeric(attribute),
            None => entry.numeric.values().next().copied(),
        }
    }
}

/// A polarity lexicon admits exactly the words it can classify.
impl WordFilter for PolarityLexicon {
    fn admits(&self, word: &str) -> bool {
        self.classify(word) != WordPolarity::Unknown
    }
}
