//! Stop-word set backed by an `fst::Set`.
use std::collections::BTreeSet;

use fst::Set;
use tracing::{debug, warn};

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct StopWords {
    set: Set<Vec<u8>>,
}

impl Default for StopWords {
    fn default() -> Self {
        Self {
            set: Set::default(),
        }
    }
}

impl StopWords {
    /// One word per line, trimmed; blank lines are ignored and undecodable
    /// ones skipped.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut words: BTreeSet<&str> = BTreeSet::new();
        let mut skipped = 0usize;
        for (idx, raw) in data.split(|b| *b == b'\n').enumerate() {
            let Ok(line) = std::str::from_utf8(raw) else {
                warn!(resource = "stop words", line = idx + 1, "line is not valid UTF-8");
                skipped += 1;
                continue;
            };
            let line = line.trim_start_matches('\u{feff}').trim();
            if !line.is_empty() {
                words.insert(line);
            }
        }
        let set = Set::from_iter(words)?;
        debug!(entries = set.len(), skipped, "loaded stop words");
        Ok(Self { set })
    }

    pub fn contains(&self, word: &str) -> bool {
        self.set.contains(word)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}
