use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Word -> cluster-id dictionary (e.g. Brown clusters).
///
/// The file format is one pair per line, `cluster_id \t word`; anything after
/// a second tab (occurrence counts in the usual cluster dumps) is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordClusters {
    #[serde(with = "indexmap::map::serde_seq")]
    map: IndexMap<String, String>,
}

impl WordClusters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, word: impl Into<String>, cluster: impl Into<String>) -> &mut Self {
        self.map.insert(word.into(), cluster.into());
        self
    }

    /// Cluster id for `word`, if the word is covered.
    #[inline]
    pub fn cluster_of(&self, word: &str) -> Option<&str> {
        self.map.get(word).map(|c| c.as_str())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Resource {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file), path)
    }

    fn from_reader<R: BufRead>(reader: R, path: &Path) -> Result<Self> {
        let mut clusters = Self::new();
        for (number, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| Error::Resource {
                path: path.to_path_buf(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split('\t');
            let cluster = fields.next();
            let word = fields.next();
            match (cluster, word) {
                (Some(cluster), Some(word)) if !word.is_empty() => {
                    clusters.insert(word, cluster);
                }
                _ => {
                    return Err(Error::MalformedResource {
                        path: path.to_path_buf(),
                        line: number + 1,
                    })
                }
            }
        }
        Ok(clusters)
    }
}
