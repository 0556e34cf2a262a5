use serde::{Deserialize, Serialize};

/// Token produced for any URL when web-token normalization is on.
pub const URL_TOKEN: &str = "http://www.url.com";
/// Token produced for any @-mention when web-token normalization is on.
pub const USER_TOKEN: &str = "@user";

/// Splits raw text into tokens.
///
/// The pipeline treats tokenization as a pluggable collaborator; any
/// implementation can be boxed into an extractor or model.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Tags a token sequence, one tag per token.
///
/// No tagging algorithm ships with this crate; the trait is the seam an
/// external tagger plugs into to contribute `POS-` features.
pub trait PosTagger: Send + Sync {
    fn tag(&self, tokens: &[String]) -> Vec<String>;
}

/// Whitespace tokenizer with the usual tweet normalizations: lower-casing,
/// squashing of 3+ repeated letters down to 2 ("yeeees" -> "yees"),
/// and replacement of URLs and @-mentions with generic
/// tokens so they share one dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweetTokenizer {
    lowercase: bool,
    squash_repeats: bool,
    normalize_web: bool,
}

impl Default for TweetTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TweetTokenizer {
    pub fn new() -> Self {
        Self {
            lowercase: true,
            squash_repeats: true,
            normalize_web: true,
        }
    }

    pub fn with_lowercase(mut self, on: bool) -> Self {
        self.lowercase = on;
        self
    }

    pub fn with_squash_repeats(mut self, on: bool) -> Self {
        self.squash_repeats = on;
        self
    }

    pub fn with_normalize_web(mut self, on: bool) -> Self {
        self.normalize_web = on;
        self
    }

    fn normalize(&self, raw: &str) -> String {
        if self.normalize_web {
            if raw.starts_with("http://") || raw.starts_with("https://") || raw.starts_with("www.")
            {
                return URL_TOKEN.to_string();
            }
            if raw.len() > 1 && raw.starts_with('@') {
                return USER_TOKEN.to_string();
            }
        }
        let mut token = if self.lowercase {
            raw.to_lowercase()
        } else {
            raw.to_string()
        };
        if self.squash_repeats {
            token = squash_repeats(&token);
        }
        token
    }
}

impl Tokenizer for TweetTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|raw| self.normalize(raw))
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Collapse runs of 3 or more identical chars to exactly 2.
fn squash_repeats(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut last: Option<char> = None;
    let mut run = 0usize;
    for c in token.chars() {
        if Some(c) == last {
            run += 1;
        } else {
            last = Some(c);
            run = 1;
        }
        if run <= 2 {
            out.push(c);
        }
    }
    out
}
