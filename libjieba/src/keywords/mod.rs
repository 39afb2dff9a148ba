//! Keyword extraction.
//!
//! Both extractors share the same candidate pipeline: segment with the HMM
//! enabled, optionally keep only tokens whose POS tag is allowed, then drop
//! whitespace, stop words and tokens shorter than the configured minimum.

use std::sync::Arc;

use libjieba_core::StopWords;

use crate::token::Keyword;
use crate::Jieba;

pub mod textrank;
pub mod tfidf;

pub use textrank::TextRank;
pub use tfidf::TfIdf;

/// A keyword ranking over one input text.
pub trait KeywordExtract {
    /// Rank the keywords of `text`.
    ///
    /// `top_k == 0` returns every candidate. A non-empty `allowed_pos`
    /// restricts candidates to tokens tagged with one of those tags.
    fn extract_keywords(
        &self,
        jieba: &Jieba,
        text: &str,
        top_k: usize,
        allowed_pos: &[&str],
    ) -> Vec<Keyword>;
}

/// Token filter shared by the extractors.
#[derive(Debug, Clone)]
pub(crate) struct CandidateFilter {
    stop_words: Arc<StopWords>,
    min_len: usize,
}

impl CandidateFilter {
    pub(crate) fn new(stop_words: Arc<StopWords>, min_len: usize) -> Self {
        Self {
            stop_words,
            min_len,
        }
    }

    fn accepts(&self, word: &str) -> bool {
        !word.trim().is_empty()
            && word.chars().count() >= self.min_len
            && !self.stop_words.contains(word)
    }

    /// Surviving tokens of `text`, in input order.
    pub(crate) fn candidates<'a>(
        &self,
        jieba: &Jieba,
        text: &'a str,
        allowed_pos: &[&str],
    ) -> Vec<&'a str> {
        if allowed_pos.is_empty() {
            jieba
                .cut(text, true)
                .into_iter()
                .filter(|w| self.accepts(w))
                .collect()
        } else {
            jieba
                .tag(text)
                .into_iter()
                .filter(|t| allowed_pos.contains(&t.tag.as_str()) && self.accepts(t.word))
                .map(|t| t.word)
                .collect()
        }
    }
}

/// Sort by descending weight, keeping input order among equal weights, and
/// keep the first `top_k` (all when `top_k` is 0).
pub(crate) fn rank(mut keywords: Vec<Keyword>, top_k: usize) -> Vec<Keyword> {
    keywords.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    if top_k > 0 {
        keywords.truncate(top_k);
    }
    keywords
}
