//! Output types of the segmenter.
//!
//! Tokens borrow from the caller's input; the engine keeps nothing.
use std::fmt;

use serde::{Deserialize, Serialize};

/// A word with its byte range in the original input.
///
/// `&input[token.start..token.end] == token.word` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Token<'a> {
    pub word: &'a str,
    pub start: usize,
    pub end: usize,
}

/// A word with its part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Tag<'a> {
    pub word: &'a str,
    pub tag: String,
}

impl fmt::Display for Tag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.word, self.tag)
    }
}

/// Segmentation used by [`crate::Jieba::tokenize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizeMode {
    /// Same tokens as `cut`.
    #[default]
    Default,
    /// Same tokens as `cut_for_search`.
    Search,
}

/// A ranked keyword.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyword {
    pub keyword: String,
    pub weight: f64,
}
