//! Inverse document frequency table.
//!
//! Weights are stored in an `fst::Map` keyed by the UTF-8 word, with the
//! `f64` bit pattern as the value. The table is immutable once built.
use std::collections::BTreeMap;

use fst::Map;
use tracing::{debug, warn};

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct IdfTable {
    map: Map<Vec<u8>>,
    default_idf: f64,
}

impl Default for IdfTable {
    fn default() -> Self {
        Self {
            map: Map::default(),
            default_idf: 0.0,
        }
    }
}

impl IdfTable {
    /// Parse `word idf` lines. Later duplicates win; bad lines are skipped.
    ///
    /// The default weight for unseen words is the mean of all weights.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut weights: BTreeMap<String, f64> = BTreeMap::new();
        let mut skipped = 0usize;
        for (idx, raw) in data.split(|b| *b == b'\n').enumerate() {
            let Ok(line) = std::str::from_utf8(raw) else {
                warn!(resource = "idf table", line = idx + 1, "line is not valid UTF-8");
                skipped += 1;
                continue;
            };
            let line = line.trim_start_matches('\u{feff}').trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next().map(str::parse::<f64>)) {
                (Some(word), Some(Ok(idf))) if idf.is_finite() => {
                    weights.insert(word.to_string(), idf);
                }
                _ => {
                    warn!(resource = "idf table", line = idx + 1, "expected `word idf`");
                    skipped += 1;
                }
            }
        }

        let default_idf = if weights.is_empty() {
            0.0
        } else {
            weights.values().sum::<f64>() / weights.len() as f64
        };
        let map = Map::from_iter(weights.iter().map(|(w, idf)| (w.as_bytes(), idf.to_bits())))?;
        debug!(entries = map.len(), skipped, default_idf, "loaded idf table");
        Ok(Self { map, default_idf })
    }

    /// Weight of `word`, if listed.
    pub fn get(&self, word: &str) -> Option<f64> {
        self.map.get(word).map(f64::from_bits)
    }

    /// Weight of `word`, or the default weight.
    pub fn idf(&self, word: &str) -> f64 {
        self.get(word).unwrap_or(self.default_idf)
    }

    pub fn default_idf(&self) -> f64 {
        self.default_idf
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_lookup() {
        let t = IdfTable::parse("北京 4.0\n大学 2.0\n坏行\n学生 x\n".as_bytes()).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.get("北京"), Some(4.0));
        assert_eq!(t.get("清华"), None);
        assert_eq!(t.default_idf(), 3.0);
        assert_eq!(t.idf("清华"), 3.0);
    }

    #[test]
    fn duplicates_keep_last() {
        let t = IdfTable::parse(b"a 1.0\na 5.0\n").unwrap();
        assert_eq!(t.get("a"), Some(5.0));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn empty_table_defaults_to_zero() {
        let t = IdfTable::parse(b"").unwrap();
        assert!(t.is_empty());
        assert_eq!(t.idf("anything"), 0.0);
        assert!(IdfTable::default().is_empty());
    }
}
