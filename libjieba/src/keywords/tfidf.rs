//! TF-IDF keyword ranking.

use std::sync::Arc;

use ahash::AHashMap;
use libjieba_core::{IdfTable, StopWords};
use tracing::trace;

use super::{rank, CandidateFilter, KeywordExtract};
use crate::token::Keyword;
use crate::Jieba;

#[derive(Debug, Clone)]
pub struct TfIdf {
    idf: Arc<IdfTable>,
    filter: CandidateFilter,
}

impl TfIdf {
    pub fn new(idf: Arc<IdfTable>, stop_words: Arc<StopWords>, min_keyword_len: usize) -> Self {
        Self {
            idf,
            filter: CandidateFilter::new(stop_words, min_keyword_len),
        }
    }

    pub fn idf(&self) -> &IdfTable {
        &self.idf
    }

    /// Score distinct words in first-occurrence order.
    fn weigh(&self, words: &[&str]) -> Vec<Keyword> {
        let mut index: AHashMap<&str, usize> = AHashMap::new();
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for &w in words {
            match index.get(w) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(w, counts.len());
                    counts.push((w, 1));
                }
            }
        }
        let total = words.len() as f64;
        counts
            .into_iter()
            .map(|(w, n)| Keyword {
                keyword: w.to_string(),
                weight: n as f64 / total * self.idf.idf(w),
            })
            .collect()
    }
}

impl KeywordExtract for TfIdf {
    fn extract_keywords(
        &self,
        jieba: &Jieba,
        text: &str,
        top_k: usize,
        allowed_pos: &[&str],
    ) -> Vec<Keyword> {
        let words = self.filter.candidates(jieba, text, allowed_pos);
        trace!(candidates = words.len(), "tf-idf candidates");
        rank(self.weigh(&words), top_k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tfidf(idf: &str) -> TfIdf {
        TfIdf::new(
            Arc::new(IdfTable::parse(idf.as_bytes()).unwrap()),
            Arc::new(StopWords::default()),
            2,
        )
    }

    #[test]
    fn weight_is_tf_times_idf() {
        let t = tfidf("北京 2.0\n大学 4.0\n");
        let kws = t.weigh(&["北京", "大学", "北京", "北京"]);
        assert_eq!(kws.len(), 2);
        assert_eq!(kws[0].keyword, "北京");
        assert!((kws[0].weight - 0.75 * 2.0).abs() < 1e-12);
        assert!((kws[1].weight - 0.25 * 4.0).abs() < 1e-12);
    }

    #[test]
    fn unknown_words_use_default_idf() {
        let t = tfidf("北京 2.0\n大学 4.0\n");
        let kws = t.weigh(&["清华"]);
        assert!((kws[0].weight - 3.0).abs() < 1e-12);
    }

    #[test]
    fn no_candidates_no_keywords() {
        assert!(tfidf("").weigh(&[]).is_empty());
    }
}
