//! Hidden Markov model tables and Viterbi decoding.
//!
//! The same structure serves the B/M/E/S segmentation model and the
//! position-and-tag model used for POS tagging of unknown words; the only
//! difference is the state alphabet.
//!
//! Serialized layout (text, `#` and blank lines ignored):
//!
//! ```text
//! B E M S                      # optional state line, legacy default
//! -0.26 -3.14e+100 ...         # initial, one per state
//! ...                          # |S| transition rows of |S| values
//! 中:-8.4,国:-9.1,...          # |S| emission rows
//! ```
//!
//! A model without a state line uses the legacy `B E M S` order.

use std::fmt;
use std::str::FromStr;

use ahash::AHashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{Error, Result};

static RE_HAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\u{3400}-\u{4DBF}\u{4E00}-\u{9FFF}\u{F900}-\u{FAFF}\u{20000}-\u{2A6DF}]+").unwrap()
});
static RE_SKIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zA-Z0-9]+(?:\.\d+)?%?").unwrap());

/// Position of a codepoint inside a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Begin,
    Middle,
    End,
    Single,
}

impl Position {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'B' => Some(Self::Begin),
            'M' => Some(Self::Middle),
            'E' => Some(Self::End),
            'S' => Some(Self::Single),
            _ => None,
        }
    }

    /// True if a word ends on this position.
    pub fn closes_word(self) -> bool {
        matches!(self, Self::End | Self::Single)
    }

    /// True if a word starts on this position.
    pub fn opens_word(self) -> bool {
        matches!(self, Self::Begin | Self::Single)
    }
}

/// A hidden state: a word position, optionally paired with a POS tag.
///
/// Written as `B`, `M`, `E`, `S`, or `B-n`, `S-vn`, ... for tagged states.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct State {
    pub position: Position,
    pub tag: Option<String>,
}

impl FromStr for State {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut chars = s.chars();
        let position = chars
            .next()
            .and_then(Position::from_char)
            .ok_or_else(|| format!("bad state label `{s}`"))?;
        let rest = chars.as_str();
        let tag = match rest.strip_prefix('-') {
            Some(tag) if !tag.is_empty() => Some(tag.to_string()),
            None if rest.is_empty() => None,
            _ => return Err(format!("bad state label `{s}`")),
        };
        Ok(Self { position, tag })
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = match self.position {
            Position::Begin => 'B',
            Position::Middle => 'M',
            Position::End => 'E',
            Position::Single => 'S',
        };
        match &self.tag {
            Some(tag) => write!(f, "{p}-{tag}"),
            None => write!(f, "{p}"),
        }
    }
}

/// Immutable HMM parameter set.
#[derive(Debug, Clone)]
pub struct HmmModel {
    states: Vec<State>,
    initial: Vec<f64>,
    /// Row-major `|S| x |S|`, `transition[from * n + to]`.
    transition: Vec<f64>,
    emission: Vec<AHashMap<char, f64>>,
    default_emission: f64,
    /// States a decode may finish in.
    finals: Vec<usize>,
}

impl HmmModel {
    /// Parse a serialized model. `resource` names it in errors and logs.
    pub fn parse(data: &[u8], resource: &'static str, default_emission: f64) -> Result<Self> {
        let text = std::str::from_utf8(data)
            .map_err(|e| Error::construction(resource, format!("not UTF-8: {e}")))?;
        let mut lines = text
            .lines()
            .map(|l| l.trim_start_matches('\u{feff}').trim())
            .filter(|l| !l.is_empty() && !l.starts_with('#'));

        let first = lines
            .next()
            .ok_or_else(|| Error::construction(resource, "empty model"))?;
        let (states, initial_line) = if first.split_whitespace().all(|t| t.parse::<f64>().is_ok()) {
            let states = ["B", "E", "M", "S"]
                .iter()
                .map(|s| s.parse::<State>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| Error::construction(resource, e))?;
            (states, first)
        } else {
            let states = first
                .split_whitespace()
                .map(str::parse::<State>)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| Error::construction(resource, e))?;
            let initial = lines
                .next()
                .ok_or_else(|| Error::construction(resource, "missing initial probabilities"))?;
            (states, initial)
        };
        let n = states.len();

        let initial = parse_row(initial_line, n, resource, "initial")?;
        let mut transition = Vec::with_capacity(n * n);
        for row in 0..n {
            let line = lines.next().ok_or_else(|| {
                Error::construction(resource, format!("missing transition row {row}"))
            })?;
            transition.extend(parse_row(line, n, resource, "transition")?);
        }

        let mut emission = Vec::with_capacity(n);
        for row in 0..n {
            let line = lines.next().ok_or_else(|| {
                Error::construction(resource, format!("missing emission row {row}"))
            })?;
            emission.push(parse_emission(line, resource, row));
        }

        let mut finals: Vec<usize> = (0..n)
            .filter(|&s| states[s].position.closes_word())
            .collect();
        if finals.is_empty() {
            finals = (0..n).collect();
        }

        debug!(resource, states = n, "loaded HMM model");
        Ok(Self {
            states,
            initial,
            transition,
            emission,
            default_emission,
            finals,
        })
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// True if any state carries a POS tag.
    pub fn is_tagged(&self) -> bool {
        self.states.iter().any(|s| s.tag.is_some())
    }

    /// Emission log-probability, falling back to the default emission.
    pub fn emission(&self, state: usize, ch: char) -> f64 {
        self.emission[state]
            .get(&ch)
            .copied()
            .unwrap_or(self.default_emission)
    }

    /// Most likely state sequence for `obs`, as state indices.
    ///
    /// The last state is restricted to word-closing states. Ties keep the
    /// lower state index.
    pub fn viterbi(&self, obs: &[char]) -> Vec<usize> {
        let n = self.states.len();
        if obs.is_empty() || n == 0 {
            return Vec::new();
        }
        let mut delta = vec![f64::NEG_INFINITY; obs.len() * n];
        let mut back = vec![0usize; obs.len() * n];

        for s in 0..n {
            delta[s] = self.initial[s] + self.emission(s, obs[0]);
        }
        for t in 1..obs.len() {
            let (prev, cur) = delta.split_at_mut(t * n);
            let prev = &prev[(t - 1) * n..];
            for s in 0..n {
                let mut best = f64::NEG_INFINITY;
                let mut arg = 0;
                for (p, score) in prev.iter().enumerate() {
                    let v = score + self.transition[p * n + s];
                    if v > best {
                        best = v;
                        arg = p;
                    }
                }
                cur[s] = best + self.emission(s, obs[t]);
                back[t * n + s] = arg;
            }
        }

        let last = (obs.len() - 1) * n;
        let mut state = self.finals[0];
        for &s in &self.finals[1..] {
            if delta[last + s] > delta[last + state] {
                state = s;
            }
        }

        let mut path = vec![0usize; obs.len()];
        for t in (0..obs.len()).rev() {
            path[t] = state;
            state = back[t * n + state];
        }
        path
    }

    /// Decode `obs` and split it into words, as codepoint ranges.
    pub fn cut_chars(&self, obs: &[char]) -> Vec<(usize, usize)> {
        let positions: Vec<Position> = self
            .viterbi(obs)
            .into_iter()
            .map(|s| self.states[s].position)
            .collect();
        word_spans(&positions)
    }

    /// Segment `text` with the model alone, as byte ranges.
    ///
    /// Han runs are decoded; ASCII alphanumeric runs (with an optional
    /// decimal part and `%`) stay whole; anything else is one token per
    /// codepoint.
    pub fn cut_spans(&self, text: &str) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        let mut last = 0;
        for m in RE_HAN.find_iter(text) {
            split_other(text, last, m.start(), &mut out);
            let offsets: Vec<usize> = m.as_str().char_indices().map(|(i, _)| m.start() + i).collect();
            let chars: Vec<char> = m.as_str().chars().collect();
            for (b, e) in self.cut_chars(&chars) {
                let end = offsets.get(e).copied().unwrap_or(m.end());
                out.push((offsets[b], end));
            }
            last = m.end();
        }
        split_other(text, last, text.len(), &mut out);
        out
    }

    /// Segment `text` with the model alone.
    pub fn cut<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.cut_spans(text)
            .into_iter()
            .map(|(b, e)| &text[b..e])
            .collect()
    }

    /// POS tag the model assigns to `word`: the tag of its first state.
    pub fn decode_tag(&self, word: &str) -> Option<&str> {
        let chars: Vec<char> = word.chars().collect();
        let first = *self.viterbi(&chars).first()?;
        self.states[first].tag.as_deref()
    }
}

/// Turn a position sequence into word ranges.
///
/// A word closes after `E`/`S` and a new one opens on `B`/`S`, so malformed
/// sequences such as `B B` or `M S` still cover every codepoint.
fn word_spans(positions: &[Position]) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut begin = 0;
    for (i, pos) in positions.iter().enumerate() {
        if i > begin && pos.opens_word() {
            out.push((begin, i));
            begin = i;
        }
        if pos.closes_word() {
            out.push((begin, i + 1));
            begin = i + 1;
        }
    }
    if begin < positions.len() {
        out.push((begin, positions.len()));
    }
    out
}

/// Split the non-Han byte range `[start, end)` of `text`.
fn split_other(text: &str, start: usize, end: usize, out: &mut Vec<(usize, usize)>) {
    if start >= end {
        return;
    }
    let gap = &text[start..end];
    let mut last = 0;
    for m in RE_SKIP.find_iter(gap) {
        push_chars(gap, start, last, m.start(), out);
        out.push((start + m.start(), start + m.end()));
        last = m.end();
    }
    push_chars(gap, start, last, gap.len(), out);
}

fn push_chars(gap: &str, base: usize, from: usize, to: usize, out: &mut Vec<(usize, usize)>) {
    for (i, ch) in gap[from..to].char_indices() {
        let b = base + from + i;
        out.push((b, b + ch.len_utf8()));
    }
}

fn parse_row(line: &str, n: usize, resource: &'static str, what: &str) -> Result<Vec<f64>> {
    let row = line
        .split_whitespace()
        .map(str::parse::<f64>)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::construction(resource, format!("{what} row: {e}")))?;
    if row.len() != n {
        return Err(Error::construction(
            resource,
            format!("{what} row has {} values, expected {n}", row.len()),
        ));
    }
    Ok(row)
}

fn parse_emission(line: &str, resource: &'static str, row: usize) -> AHashMap<char, f64> {
    let mut map = AHashMap::new();
    for item in line.split(',') {
        let mut chars = item.trim().chars();
        let parsed = chars.next().and_then(|ch| {
            let prob = chars.as_str().strip_prefix(':')?.trim().parse::<f64>().ok()?;
            Some((ch, prob))
        });
        match parsed {
            Some((ch, prob)) => {
                map.insert(ch, prob);
            }
            None => warn!(resource, row, item, "skipping malformed emission"),
        }
    }
    map
}
