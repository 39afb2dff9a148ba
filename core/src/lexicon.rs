//! Lexicon store for libjieba-core
//!
//! Maps words (codepoint sequences) to a frequency and an optional
//! part-of-speech tag, on top of the arena [`Trie`]. The store keeps the
//! aggregate frequency used to turn counts into log-probabilities and the
//! longest word length that bounds DAG edge generation.
//!
//! Dictionary text is line oriented:
//! - main dictionary: `word frequency [tag]`
//! - user dictionary: `word`, `word tag`, `word frequency` or
//!   `word frequency tag`
//!
//! Lines that do not parse are skipped and logged; they never fail a load.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::UserWordWeight;
use crate::error::{Error, Result};
use crate::trie::{PrefixWalk, Trie};

/// Where an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WordSource {
    Main,
    User,
}

/// A single lexicon entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    /// Occurrence count, always at least 1.
    pub freq: u64,
    pub tag: Option<String>,
    pub source: WordSource,
}

impl WordEntry {
    pub fn new(freq: u64, tag: Option<String>, source: WordSource) -> Self {
        Self {
            freq: freq.max(1),
            tag,
            source,
        }
    }
}

/// Outcome of loading one dictionary buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub loaded: usize,
    pub skipped: usize,
}

/// Frequency reference points of the main dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct FreqStats {
    min: u64,
    median: u64,
    max: u64,
}

impl Default for FreqStats {
    fn default() -> Self {
        Self {
            min: 1,
            median: 1,
            max: 1,
        }
    }
}

/// Word → entry store with probability helpers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lexicon {
    trie: Trie<WordEntry>,
    total_freq: u64,
    max_word_len: usize,
    stats: FreqStats,
}

impl Lexicon {
    /// Create an empty lexicon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a lexicon from a main dictionary buffer.
    ///
    /// Fails only when no line yields a valid entry.
    pub fn from_dict(data: &[u8]) -> Result<Self> {
        let mut lexicon = Self::new();
        let stats = lexicon.load_dict(data);
        if stats.loaded == 0 {
            return Err(Error::construction(
                "main dictionary",
                format!("no valid entries ({} lines skipped)", stats.skipped),
            ));
        }
        lexicon.refresh_stats();
        debug!(
            entries = lexicon.len(),
            skipped = stats.skipped,
            total_freq = lexicon.total_freq,
            "loaded main dictionary"
        );
        Ok(lexicon)
    }

    /// Load `word frequency [tag]` lines as main dictionary entries.
    ///
    /// Call [`Lexicon::refresh_stats`] afterwards so the fallback and user
    /// weights reflect the new entries.
    pub fn load_dict(&mut self, data: &[u8]) -> LoadStats {
        let mut stats = LoadStats::default();
        for (lineno, line) in lines(data) {
            let Some(line) = line else {
                warn!(resource = "main dictionary", line = lineno, "line is not valid UTF-8");
                stats.skipped += 1;
                continue;
            };
            let mut parts = line.split_whitespace();
            let (Some(word), Some(freq)) = (parts.next(), parts.next()) else {
                warn!(resource = "main dictionary", line = lineno, "expected `word frequency [tag]`");
                stats.skipped += 1;
                continue;
            };
            match freq.parse::<u64>() {
                Ok(freq) if freq > 0 => {
                    let tag = parts.next().map(str::to_string);
                    self.insert(word, freq, tag, WordSource::Main);
                    stats.loaded += 1;
                }
                _ => {
                    warn!(resource = "main dictionary", line = lineno, freq, "invalid frequency");
                    stats.skipped += 1;
                }
            }
        }
        stats
    }

    /// Load user dictionary lines, overriding existing entries.
    pub fn load_user_dict(&mut self, data: &[u8], weight: UserWordWeight) -> LoadStats {
        let mut stats = LoadStats::default();
        for (lineno, line) in lines(data) {
            let Some(line) = line else {
                warn!(resource = "user dictionary", line = lineno, "line is not valid UTF-8");
                stats.skipped += 1;
                continue;
            };
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else {
                continue;
            };
            let (freq, tag) = match (parts.next(), parts.next()) {
                (None, _) => (None, None),
                (Some(second), third) => match second.parse::<u64>() {
                    Ok(freq) => (Some(freq), third),
                    Err(_) if third.is_none() => (None, Some(second)),
                    Err(_) => {
                        warn!(resource = "user dictionary", line = lineno, "invalid frequency");
                        stats.skipped += 1;
                        continue;
                    }
                },
            };
            self.add_user_word(word, freq, tag.map(str::to_string), weight);
            stats.loaded += 1;
        }
        debug!(loaded = stats.loaded, skipped = stats.skipped, "loaded user dictionary");
        stats
    }

    /// Recompute the frequency reference points from the main entries.
    pub fn refresh_stats(&mut self) {
        let mut freqs: Vec<u64> = self
            .trie
            .values()
            .filter(|e| e.source == WordSource::Main)
            .map(|e| e.freq)
            .collect();
        if freqs.is_empty() {
            self.stats = FreqStats::default();
            return;
        }
        freqs.sort_unstable();
        self.stats = FreqStats {
            min: freqs[0],
            median: freqs[freqs.len() / 2],
            max: freqs[freqs.len() - 1],
        };
    }

    /// Insert or overwrite an entry, keeping the total frequency in sync.
    ///
    /// Returns the replaced entry. Empty words are ignored.
    pub fn insert(
        &mut self,
        word: &str,
        freq: u64,
        tag: Option<String>,
        source: WordSource,
    ) -> Option<WordEntry> {
        if word.is_empty() {
            return None;
        }
        let entry = WordEntry::new(freq, tag, source);
        self.total_freq = self.total_freq.saturating_add(entry.freq);
        let previous = self.trie.insert(word, entry);
        if let Some(prev) = &previous {
            self.total_freq = self.total_freq.saturating_sub(prev.freq);
        }
        self.max_word_len = self.max_word_len.max(word.chars().count());
        previous
    }

    /// Insert a user word, picking a frequency from `weight` when absent.
    pub fn add_user_word(
        &mut self,
        word: &str,
        freq: Option<u64>,
        tag: Option<String>,
        weight: UserWordWeight,
    ) -> Option<WordEntry> {
        let freq = freq.unwrap_or_else(|| self.user_word_freq(weight));
        self.insert(word, freq, tag, WordSource::User)
    }

    /// Remove an entry. Removing an absent word is a no-op.
    ///
    /// Dropping a main entry refreshes the frequency stats. The longest word
    /// length is kept as an upper bound.
    pub fn remove(&mut self, word: &str) -> Option<WordEntry> {
        let removed = self.trie.remove(word)?;
        self.total_freq = self.total_freq.saturating_sub(removed.freq);
        if removed.source == WordSource::Main {
            self.refresh_stats();
        }
        Some(removed)
    }

    pub fn lookup(&self, word: &str) -> Option<&WordEntry> {
        self.trie.get(word)
    }

    pub fn lookup_chars(&self, word: &[char]) -> Option<&WordEntry> {
        self.trie.get_chars(word)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.trie.contains_word(word)
    }

    /// Longest word ever inserted, in codepoints.
    pub fn max_word_len(&self) -> usize {
        self.max_word_len
    }

    pub fn total_freq(&self) -> u64 {
        self.total_freq
    }

    pub fn len(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    /// Frequency a user word receives under `weight`.
    pub fn user_word_freq(&self, weight: UserWordWeight) -> u64 {
        match weight {
            UserWordWeight::Min => self.stats.min,
            UserWordWeight::Median => self.stats.median,
            UserWordWeight::Max => self.stats.max,
        }
    }

    /// `ln(freq / total)` for an entry of this lexicon.
    pub fn entry_log_prob(&self, entry: &WordEntry) -> f64 {
        (entry.freq as f64 / self.total_freq.max(1) as f64).ln()
    }

    /// Log-probability of a single codepoint the dictionary does not know.
    pub fn floor_log_prob(&self) -> f64 {
        (self.stats.min as f64 / self.total_freq.max(1) as f64).ln()
    }

    /// Log-probability of `word`.
    ///
    /// Unknown single codepoints get [`Lexicon::floor_log_prob`]; other
    /// unknown words have no probability.
    pub fn log_prob(&self, word: &str) -> Option<f64> {
        match self.lookup(word) {
            Some(entry) => Some(self.entry_log_prob(entry)),
            None if word.chars().count() == 1 => Some(self.floor_log_prob()),
            None => None,
        }
    }

    /// Every entry starting at `input[start]`, shortest first, bounded by
    /// [`Lexicon::max_word_len`].
    pub fn prefixes<'t, 'i>(&'t self, input: &'i [char], start: usize) -> PrefixWalk<'t, 'i, WordEntry> {
        self.trie.walk_prefixes(input, start, self.max_word_len)
    }

    /// Serialize the whole store with bincode.
    pub fn to_bincode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Restore a store produced by [`Lexicon::to_bincode`].
    pub fn from_bincode(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Split a buffer into numbered lines, decoding each on its own.
///
/// Blank lines and `#` comments are dropped; a leading BOM is stripped.
fn lines(data: &[u8]) -> impl Iterator<Item = (usize, Option<&str>)> {
    data.split(|b| *b == b'\n')
        .enumerate()
        .filter_map(|(idx, raw)| {
            let lineno = idx + 1;
            match std::str::from_utf8(raw) {
                Ok(line) => {
                    let line = line.trim_start_matches('\u{feff}').trim();
                    if line.is_empty() || line.starts_with('#') {
                        None
                    } else {
                        Some((lineno, Some(line)))
                    }
                }
                Err(_) => Some((lineno, None)),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DICT: &str = "北京 100 ns\n大学 80 n\n北京大学 20 nt\n学 10\n";

    #[test]
    fn load_and_lookup() {
        let lx = Lexicon::from_dict(DICT.as_bytes()).unwrap();
        assert_eq!(lx.len(), 4);
        assert_eq!(lx.total_freq(), 210);
        assert_eq!(lx.max_word_len(), 4);
        let e = lx.lookup("北京").unwrap();
        assert_eq!(e.freq, 100);
        assert_eq!(e.tag.as_deref(), Some("ns"));
        assert_eq!(lx.lookup("学").unwrap().tag, None);
        assert!(lx.lookup("北").is_none());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let data = b"ok 3 n\nnofreq\nbad x n\nzero 0\n\xff\xfe 4\n# comment\n\nfine 2\n";
        let mut lx = Lexicon::new();
        let stats = lx.load_dict(data);
        assert_eq!(stats, LoadStats { loaded: 2, skipped: 4 });
        assert!(lx.contains("ok"));
        assert!(lx.contains("fine"));
    }

    #[test]
    fn empty_main_dictionary_fails() {
        let err = Lexicon::from_dict(b"# nothing here\n").unwrap_err();
        assert!(matches!(err, Error::Construction { resource: "main dictionary", .. }));
    }

    #[test]
    fn insert_overwrite_and_remove_track_total() {
        let mut lx = Lexicon::from_dict(DICT.as_bytes()).unwrap();
        lx.insert("北京", 40, None, WordSource::User);
        assert_eq!(lx.total_freq(), 150);
        assert_eq!(lx.remove("北京").unwrap().freq, 40);
        assert_eq!(lx.total_freq(), 110);
        assert!(lx.remove("北京").is_none());
        assert_eq!(lx.total_freq(), 110);
    }

    #[test]
    fn log_prob_and_floor() {
        let lx = Lexicon::from_dict(DICT.as_bytes()).unwrap();
        let p = lx.log_prob("北京").unwrap();
        assert!((p - (100.0f64 / 210.0).ln()).abs() < 1e-12);
        let floor = lx.log_prob("京").unwrap();
        assert!((floor - (10.0f64 / 210.0).ln()).abs() < 1e-12);
        assert_eq!(lx.log_prob("京大"), None);
    }

    #[test]
    fn user_dict_line_shapes() {
        let mut lx = Lexicon::from_dict(DICT.as_bytes()).unwrap();
        let stats = lx.load_user_dict(
            "云计算\n蓝翔 nz\n创新办 3 i\n韩玉赏鉴 7\n坏 x y\n".as_bytes(),
            UserWordWeight::Max,
        );
        assert_eq!(stats, LoadStats { loaded: 4, skipped: 1 });
        assert_eq!(lx.lookup("云计算").unwrap().freq, 100);
        assert_eq!(lx.lookup("蓝翔").unwrap().tag.as_deref(), Some("nz"));
        let e = lx.lookup("创新办").unwrap();
        assert_eq!((e.freq, e.tag.as_deref()), (3, Some("i")));
        assert_eq!(lx.lookup("韩玉赏鉴").unwrap().source, WordSource::User);
    }

    #[test]
    fn user_word_weight_policies() {
        let lx = Lexicon::from_dict(DICT.as_bytes()).unwrap();
        assert_eq!(lx.user_word_freq(UserWordWeight::Min), 10);
        assert_eq!(lx.user_word_freq(UserWordWeight::Median), 80);
        assert_eq!(lx.user_word_freq(UserWordWeight::Max), 100);
    }

    #[test]
    fn removing_main_words_refreshes_stats() {
        let mut lx = Lexicon::from_dict(DICT.as_bytes()).unwrap();
        assert_eq!(lx.user_word_freq(UserWordWeight::Min), 10);
        lx.remove("学");
        assert_eq!(lx.user_word_freq(UserWordWeight::Min), 20);
        assert_eq!(lx.user_word_freq(UserWordWeight::Median), 80);
        assert!((lx.floor_log_prob() - (20.0f64 / 200.0).ln()).abs() < 1e-12);

        lx.add_user_word("甲乙", Some(1), None, UserWordWeight::Median);
        lx.remove("甲乙");
        assert_eq!(lx.user_word_freq(UserWordWeight::Min), 20);
    }

    #[test]
    fn bincode_snapshot_restores_state() {
        let lx = Lexicon::from_dict(DICT.as_bytes()).unwrap();
        let bytes = lx.to_bincode().unwrap();
        let back = Lexicon::from_bincode(&bytes).unwrap();
        assert_eq!(back.total_freq(), lx.total_freq());
        assert_eq!(back.lookup("大学"), lx.lookup("大学"));
        assert_eq!(back.user_word_freq(UserWordWeight::Median), 80);
        assert!(Lexicon::from_bincode(&[1, 2, 3]).is_err());
    }
}
