//! TextRank keyword ranking over a co-occurrence graph.

use std::collections::BTreeMap;
use std::sync::Arc;

use ahash::AHashMap;
use libjieba_core::StopWords;
use tracing::trace;

use super::{rank, CandidateFilter, KeywordExtract};
use crate::config::JiebaConfig;
use crate::token::Keyword;
use crate::Jieba;

/// Undirected weighted graph, nodes numbered in first-occurrence order.
#[derive(Debug, Default)]
struct CooccurrenceGraph<'a> {
    words: Vec<&'a str>,
    ids: AHashMap<&'a str, usize>,
    /// Neighbor id -> accumulated weight. Ordered so float sums are stable.
    edges: Vec<BTreeMap<usize, f64>>,
}

impl<'a> CooccurrenceGraph<'a> {
    /// Link every pair of tokens fewer than `span` positions apart.
    fn build(tokens: &[&'a str], span: usize) -> Self {
        let mut graph = Self::default();
        let ids: Vec<usize> = tokens.iter().map(|w| graph.node(w)).collect();
        for i in 0..ids.len() {
            for j in (i + 1)..ids.len().min(i + span) {
                graph.increment_edge(ids[i], ids[j]);
            }
        }
        graph
    }

    fn node(&mut self, word: &'a str) -> usize {
        if let Some(&id) = self.ids.get(word) {
            return id;
        }
        let id = self.words.len();
        self.ids.insert(word, id);
        self.words.push(word);
        self.edges.push(BTreeMap::new());
        id
    }

    fn increment_edge(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        *self.edges[a].entry(b).or_insert(0.0) += 1.0;
        *self.edges[b].entry(a).or_insert(0.0) += 1.0;
    }

    fn len(&self) -> usize {
        self.words.len()
    }
}

#[derive(Debug, Clone)]
pub struct TextRank {
    filter: CandidateFilter,
    span: usize,
    damping: f64,
    iterations: usize,
    tolerance: f64,
}

impl TextRank {
    pub fn new(stop_words: Arc<StopWords>, config: &JiebaConfig) -> Self {
        Self {
            filter: CandidateFilter::new(stop_words, config.min_keyword_len),
            span: config.textrank_span,
            damping: config.textrank_damping,
            iterations: config.textrank_iterations,
            tolerance: config.textrank_tolerance,
        }
    }

    /// Scores per node, normalized so the best node scores 1.0.
    fn scores(&self, graph: &CooccurrenceGraph<'_>) -> Vec<f64> {
        let n = graph.len();
        if n == 0 {
            return Vec::new();
        }
        let out_weight: Vec<f64> = graph.edges.iter().map(|e| e.values().sum()).collect();
        let mut scores = vec![1.0 / n as f64; n];
        for round in 0..self.iterations {
            let next: Vec<f64> = graph
                .edges
                .iter()
                .map(|neighbors| {
                    let inflow: f64 = neighbors
                        .iter()
                        .map(|(&u, &w)| w / out_weight[u] * scores[u])
                        .sum();
                    (1.0 - self.damping) + self.damping * inflow
                })
                .collect();
            let delta = next
                .iter()
                .zip(&scores)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max);
            scores = next;
            if delta < self.tolerance {
                trace!(round, "textrank converged");
                break;
            }
        }
        let max = scores.iter().copied().fold(0.0, f64::max);
        if max > 0.0 {
            for s in &mut scores {
                *s /= max;
            }
        }
        scores
    }

    fn weigh(&self, tokens: &[&str]) -> Vec<Keyword> {
        let graph = CooccurrenceGraph::build(tokens, self.span);
        let scores = self.scores(&graph);
        graph
            .words
            .iter()
            .zip(scores)
            .map(|(w, weight)| Keyword {
                keyword: w.to_string(),
                weight,
            })
            .collect()
    }
}

impl KeywordExtract for TextRank {
    fn extract_keywords(
        &self,
        jieba: &Jieba,
        text: &str,
        top_k: usize,
        allowed_pos: &[&str],
    ) -> Vec<Keyword> {
        let tokens = self.filter.candidates(jieba, text, allowed_pos);
        trace!(candidates = tokens.len(), "textrank candidates");
        rank(self.weigh(&tokens), top_k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textrank() -> TextRank {
        TextRank::new(Arc::new(StopWords::default()), &JiebaConfig::default())
    }

    #[test]
    fn graph_links_within_span_only() {
        let g = CooccurrenceGraph::build(&["a", "b", "c", "a"], 2);
        assert_eq!(g.len(), 3);
        assert_eq!(g.edges[0].get(&1), Some(&1.0));
        assert_eq!(g.edges[0].get(&2), Some(&1.0));
        assert_eq!(g.edges[1].get(&2), Some(&1.0));
        assert_eq!(g.edges[0].get(&0), None);
    }

    #[test]
    fn repeated_pairs_accumulate() {
        let g = CooccurrenceGraph::build(&["a", "b", "a", "b"], 5);
        assert_eq!(g.len(), 2);
        assert_eq!(g.edges[0].get(&1), Some(&4.0));
    }

    #[test]
    fn hub_word_ranks_first() {
        let kws = textrank().weigh(&["中心", "甲方", "中心", "乙方", "中心", "丙方"]);
        assert_eq!(kws.len(), 4);
        let ranked = rank(kws, 0);
        assert_eq!(ranked[0].keyword, "中心");
        assert_eq!(ranked[0].weight, 1.0);
        assert!(ranked.windows(2).all(|w| w[0].weight >= w[1].weight));
    }

    #[test]
    fn isolated_words_share_base_score() {
        let kws = textrank().weigh(&["独一"]);
        assert_eq!(kws.len(), 1);
        assert_eq!(kws[0].weight, 1.0);
        assert!(textrank().weigh(&[]).is_empty());
    }
}
