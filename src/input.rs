use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One training or application row.
///
/// The crate does not own a tabular format; whatever loads the dataset hands
/// rows over in this shape. `metadata` carries side-channel numeric fields
/// that may be folded into word records and reserved dictionary columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRow {
    pub text: String,
    pub class: Option<String>,
    pub metadata: Vec<(String, f64)>,
}

impl InputRow {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            class: None,
            metadata: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_metadata(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metadata.push((name.into(), value));
        self
    }

    /// Build a row from raw tabular fields using configurable column specs.
    pub fn from_fields(
        fields: &[&str],
        text_column: ColumnIndex,
        class_column: Option<ColumnIndex>,
    ) -> Result<Self> {
        let text = fields[text_column.resolve(fields.len())?].to_string();
        let class = match class_column {
            Some(col) => Some(fields[col.resolve(fields.len())?].to_string()),
            None => None,
        };
        Ok(Self {
            text,
            class,
            metadata: Vec::new(),
        })
    }
}

/// Column selector for tabular input: `first`, `last` or a 1-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnIndex {
    First,
    Last,
    Nth(usize),
}

impl ColumnIndex {
    /// Resolve to a 0-based offset for a row of `width` fields.
    pub fn resolve(self, width: usize) -> Result<usize> {
        if width == 0 {
            return Err(Error::ColumnOutOfRange { index: 0, width });
        }
        match self {
            ColumnIndex::First => Ok(0),
            ColumnIndex::Last => Ok(width - 1),
            ColumnIndex::Nth(n) => {
                if n == 0 || n > width {
                    Err(Error::ColumnOutOfRange { index: n, width })
                } else {
                    Ok(n - 1)
                }
            }
        }
    }
}

impl FromStr for ColumnIndex {
    type Err = Error;

    fn from_str(spec: &str) -> Result<Self> {
        match spec {
            "first" => Ok(ColumnIndex::First),
            "last" => Ok(ColumnIndex::Last),
            other => other
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .map(ColumnIndex::Nth)
                .ok_or_else(|| Error::InvalidColumnSpec(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_spec_parsing() {
        assert_eq!("first".parse::<ColumnIndex>().unwrap(), ColumnIndex::First);
        assert_eq!("last".parse::<ColumnIndex>().unwrap(), ColumnIndex::Last);
        assert_eq!("3".parse::<ColumnIndex>().unwrap(), ColumnIndex::Nth(3));
        assert!("0".parse::<ColumnIndex>().is_err());
        assert!("middle".parse::<ColumnIndex>().is_err());
    }

    #[test]
    fn column_resolution_is_one_based() {
        assert_eq!(ColumnIndex::First.resolve(4).unwrap(), 0);
        assert_eq!(ColumnIndex::Last.resolve(4).unwrap(), 3);
        assert_eq!(ColumnIndex::Nth(2).resolve(4).unwrap(), 1);
        assert!(ColumnIndex::Nth(5).resolve(4).is_err());
        assert!(ColumnIndex::First.resolve(0).is_err());
    }

    #[test]
    fn row_from_fields_picks_configured_columns() {
        let fields = ["positive", "some tweet text"];
        let row =
            InputRow::from_fields(&fields, ColumnIndex::Last, Some(ColumnIndex::First)).unwrap();
        assert_eq!(row.text, "some tweet text");
        assert_eq!(row.class.as_deref(), Some("positive"));
    }
}
