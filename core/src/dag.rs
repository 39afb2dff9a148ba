//! Word DAG and max-probability route search.
//!
//! For a block of `n` codepoints the DAG lists, for every start position,
//! the end positions of dictionary words starting there. The trivial edge
//! `(i, i + 1)` is always present so every position stays reachable.

use crate::lexicon::Lexicon;

/// One DAG edge out of a start position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Exclusive end position.
    pub end: usize,
    pub log_prob: f64,
    /// False for the fallback single-codepoint edge.
    pub known: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Dag {
    edges: Vec<Vec<Edge>>,
}

impl Dag {
    /// Build the DAG of `input` against `lexicon`.
    pub fn build(lexicon: &Lexicon, input: &[char]) -> Self {
        Self::build_with_limit(lexicon, input, usize::MAX)
    }

    /// Build the DAG keeping only words of at most `max_len` codepoints.
    pub fn build_with_limit(lexicon: &Lexicon, input: &[char], max_len: usize) -> Self {
        let max_len = max_len.max(1);
        let edges = (0..input.len())
            .map(|start| {
                let mut out: Vec<Edge> = lexicon
                    .prefixes(input, start)
                    .take_while(|(end, _)| end - start <= max_len)
                    .map(|(end, entry)| Edge {
                        end,
                        log_prob: lexicon.entry_log_prob(entry),
                        known: true,
                    })
                    .collect();
                if out.first().map_or(true, |e| e.end != start + 1) {
                    out.insert(
                        0,
                        Edge {
                            end: start + 1,
                            log_prob: lexicon.floor_log_prob(),
                            known: false,
                        },
                    );
                }
                out
            })
            .collect();
        Self { edges }
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Edges out of `start`, ascending by end.
    pub fn edges(&self, start: usize) -> &[Edge] {
        self.edges.get(start).map_or(&[], Vec::as_slice)
    }

    /// Run the backward dynamic program over the DAG.
    ///
    /// An edge replaces the current best only when strictly better, and
    /// edges are scanned shortest first, so ties keep the shorter word.
    pub fn route(&self) -> Route {
        let n = self.edges.len();
        let mut best = vec![(0.0f64, n); n + 1];
        for start in (0..n).rev() {
            let mut choice = (f64::NEG_INFINITY, start + 1);
            for edge in &self.edges[start] {
                let score = edge.log_prob + best[edge.end].0;
                if score > choice.0 {
                    choice = (score, edge.end);
                }
            }
            best[start] = choice;
        }
        Route { best }
    }
}

/// Path score table produced by [`Dag::route`].
#[derive(Debug, Clone)]
pub struct Route {
    best: Vec<(f64, usize)>,
}

impl Route {
    /// Total log-probability of the best segmentation.
    pub fn score(&self) -> f64 {
        self.best.first().map_or(0.0, |b| b.0)
    }

    /// Chosen next position after `start`.
    pub fn next(&self, start: usize) -> Option<usize> {
        let n = self.best.len().checked_sub(1)?;
        (start < n).then(|| self.best[start].1)
    }

    /// The best segmentation as `(start, end)` codepoint ranges.
    pub fn segments(&self) -> Vec<(usize, usize)> {
        let n = self.best.len() - 1;
        let mut out = Vec::new();
        let mut start = 0;
        while start < n {
            let end = self.best[start].1;
            out.push((start, end));
            start = end;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon(dict: &str) -> Lexicon {
        Lexicon::from_dict(dict.as_bytes()).unwrap()
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn dag_always_has_single_edges() {
        let lx = lexicon("北京 100\n大学 80\n");
        let input = chars("北京大学");
        let dag = Dag::build(&lx, &input);
        assert_eq!(dag.len(), 4);
        let ends: Vec<usize> = dag.edges(0).iter().map(|e| e.end).collect();
        assert_eq!(ends, vec![1, 2]);
        assert!(!dag.edges(0)[0].known);
        assert!(dag.edges(0)[1].known);
        let ends: Vec<usize> = dag.edges(1).iter().map(|e| e.end).collect();
        assert_eq!(ends, vec![2]);
        assert!(dag.edges(9).is_empty());
    }

    #[test]
    fn route_prefers_dictionary_words() {
        let lx = lexicon("北京 100\n大学 80\n");
        let input = chars("北京大学");
        let route = Dag::build(&lx, &input).route();
        assert_eq!(route.segments(), vec![(0, 2), (2, 4)]);
        let expected = (100.0f64 / 180.0).ln() + (80.0f64 / 180.0).ln();
        assert!((route.score() - expected).abs() < 1e-12);
    }

    #[test]
    fn route_picks_max_probability_split() {
        let lx = lexicon("研究 50\n研究生 5\n生命 40\n命 2\n");
        let input = chars("研究生命");
        let route = Dag::build(&lx, &input).route();
        assert_eq!(route.segments(), vec![(0, 2), (2, 4)]);
        assert_eq!(route.next(0), Some(2));
        assert_eq!(route.next(4), None);
    }

    #[test]
    fn ties_prefer_shorter_word() {
        // 甲/乙甲 and 甲乙/甲 sum the same two log-probabilities.
        let lx = lexicon("甲 10\n甲乙 20\n乙甲 20\n");
        let input = chars("甲乙甲");
        let route = Dag::build(&lx, &input).route();
        assert_eq!(route.segments(), vec![(0, 1), (1, 3)]);
    }

    #[test]
    fn limit_drops_long_words() {
        let lx = lexicon("北京大学 100\n北京 10\n大学 10\n");
        let input = chars("北京大学");
        assert_eq!(Dag::build(&lx, &input).route().segments(), vec![(0, 4)]);
        let small = Dag::build_with_limit(&lx, &input, 2).route();
        assert_eq!(small.segments(), vec![(0, 2), (2, 4)]);
    }

    #[test]
    fn empty_input_has_empty_route() {
        let lx = lexicon("北京 1\n");
        let dag = Dag::build(&lx, &[]);
        assert!(dag.is_empty());
        assert!(dag.route().segments().is_empty());
    }
}
