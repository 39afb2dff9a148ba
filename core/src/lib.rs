//! libjieba-core
//!
//! Dictionary, route search and model logic shared by the `libjieba`
//! segmenter and keyword extractors.
//!
//! Everything here works on caller supplied buffers; nothing touches the
//! file system.
//!
//! Public API:
//! - `Lexicon` - word → frequency/tag store on an arena `Trie`
//! - `Dag` / `Route` - per-input word graph and max-probability path
//! - `HmmModel` - B/M/E/S (optionally tagged) HMM with Viterbi decoding
//! - `IdfTable`, `StopWords` - immutable keyword extraction tables
//! - `Config` - core configuration
//! - `Error` - construction and decode errors

pub mod config;
pub use config::{Config, UserWordWeight, DEFAULT_EMISSION};

pub mod error;
pub use error::{decode, Error, Result};

pub mod trie;
pub use trie::Trie;

pub mod lexicon;
pub use lexicon::{Lexicon, LoadStats, WordEntry, WordSource};

pub mod dag;
pub use dag::{Dag, Edge, Route};

pub mod hmm;
pub use hmm::{HmmModel, Position, State};

pub mod idf;
pub use idf::IdfTable;

pub mod stopwords;
pub use stopwords::StopWords;
