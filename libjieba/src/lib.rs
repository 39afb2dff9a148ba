//! libjieba crate root
//!
//! Chinese word segmentation on top of the shared `libjieba-core` model
//! types: dictionary route search with HMM fallback for unknown words,
//! part-of-speech tagging and keyword extraction.
//!
//! Public API exported here:
//! - `Jieba` and `DictSources` - the engine and its construction inputs
//! - `Token`, `Tag`, `Keyword`, `TokenizeMode` from `token`
//! - `JiebaConfig` from `config`
//! - `TfIdf`, `TextRank` and the `KeywordExtract` trait from `keywords`
//!
//! ```rust
//! use libjieba::{DictSources, Jieba};
//!
//! let dict = "北京 100 ns\n大学 80 n\n";
//! let hmm = "-0.7 -3.14e100 -3.14e100 -0.7\n\
//!            -3.14e100 -0.5 -0.9 -3.14e100\n\
//!            -0.7 -3.14e100 -3.14e100 -0.7\n\
//!            -3.14e100 -0.3 -1.3 -3.14e100\n\
//!            -0.7 -3.14e100 -3.14e100 -0.7\n\
//!            北:-1.0\n京:-1.0\n中:-1.0\n去:-1.0\n";
//! let jieba = Jieba::new(DictSources::new(dict.as_bytes(), hmm.as_bytes())).unwrap();
//! assert_eq!(jieba.cut("北京大学", false), vec!["北京", "大学"]);
//! ```

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use libjieba_core::{HmmModel, IdfTable, Lexicon, StopWords};
use tracing::{debug, trace, warn};

pub mod config;
pub mod keywords;
mod segment;
mod tagger;
pub mod token;

pub use config::{ConfigError, JiebaConfig};
pub use keywords::{KeywordExtract, TextRank, TfIdf};
pub use libjieba_core::{Error, Result};
pub use token::{Keyword, Tag, Token, TokenizeMode};

use segment::{HmmCache, Segmenter, Span};

/// Construction inputs, as raw byte buffers.
///
/// Only the main dictionary and the segmentation HMM are required; missing
/// optional inputs mean no user overrides, no IDF weights, no stop words
/// and rule-based tagging of unknown words.
#[derive(Debug, Clone, Copy)]
pub struct DictSources<'a> {
    pub dict: &'a [u8],
    pub hmm: &'a [u8],
    pub user_dict: Option<&'a [u8]>,
    pub idf: Option<&'a [u8]>,
    pub stop_words: Option<&'a [u8]>,
    pub pos_hmm: Option<&'a [u8]>,
}

impl<'a> DictSources<'a> {
    pub fn new(dict: &'a [u8], hmm: &'a [u8]) -> Self {
        Self {
            dict,
            hmm,
            user_dict: None,
            idf: None,
            stop_words: None,
            pos_hmm: None,
        }
    }

    pub fn with_user_dict(mut self, data: &'a [u8]) -> Self {
        self.user_dict = Some(data);
        self
    }

    pub fn with_idf(mut self, data: &'a [u8]) -> Self {
        self.idf = Some(data);
        self
    }

    pub fn with_stop_words(mut self, data: &'a [u8]) -> Self {
        self.stop_words = Some(data);
        self
    }

    pub fn with_pos_hmm(mut self, data: &'a [u8]) -> Self {
        self.pos_hmm = Some(data);
        self
    }
}

/// Segmentation engine.
///
/// Reads (segmentation, tagging, extraction) share the lexicon through a
/// read lock; `add_word*` and `remove_word` take the write lock. The engine
/// is `Send + Sync` and can be shared behind an `Arc`.
pub struct Jieba {
    lexicon: RwLock<Lexicon>,
    hmm: HmmModel,
    pos: Option<HmmModel>,
    idf: Arc<IdfTable>,
    stop_words: Arc<StopWords>,
    cache: HmmCache,
    config: JiebaConfig,
}

impl Jieba {
    /// Build an engine with the default configuration.
    pub fn new(sources: DictSources<'_>) -> Result<Self> {
        Self::with_config(sources, JiebaConfig::default())
    }

    /// Build an engine from `sources`.
    ///
    /// Fails if the configuration is invalid or a required input does not
    /// parse. Optional inputs that fail to parse are logged and skipped.
    pub fn with_config(sources: DictSources<'_>, config: JiebaConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| Error::construction("configuration", e.to_string()))?;

        let mut lexicon = Lexicon::from_dict(sources.dict)?;
        if let Some(data) = sources.user_dict {
            lexicon.load_user_dict(data, config.base.user_word_weight);
        }
        let hmm = HmmModel::parse(sources.hmm, "HMM model", config.base.default_emission)?;

        let pos = sources.pos_hmm.and_then(|data| {
            HmmModel::parse(data, "POS model", config.base.default_emission)
                .map_err(|e| warn!(error = %e, "ignoring POS model"))
                .ok()
        });
        let idf = sources
            .idf
            .and_then(|data| {
                IdfTable::parse(data)
                    .map_err(|e| warn!(error = %e, "ignoring idf table"))
                    .ok()
            })
            .unwrap_or_default();
        let stop_words = sources
            .stop_words
            .and_then(|data| {
                StopWords::parse(data)
                    .map_err(|e| warn!(error = %e, "ignoring stop words"))
                    .ok()
            })
            .unwrap_or_default();

        let jieba = Self::from_parts(lexicon, hmm, config)
            .with_idf(idf)
            .with_stop_words(stop_words);
        Ok(match pos {
            Some(model) => jieba.with_pos_model(model),
            None => jieba,
        })
    }

    /// Assemble an engine from already built parts.
    pub fn from_parts(lexicon: Lexicon, hmm: HmmModel, config: JiebaConfig) -> Self {
        debug!(
            words = lexicon.len(),
            total_freq = lexicon.total_freq(),
            cache = config.hmm_cache_size,
            "jieba engine ready"
        );
        Self {
            lexicon: RwLock::new(lexicon),
            hmm,
            pos: None,
            idf: Arc::new(IdfTable::default()),
            stop_words: Arc::new(StopWords::default()),
            cache: HmmCache::new(config.hmm_cache_size),
            config,
        }
    }

    pub fn with_pos_model(mut self, model: HmmModel) -> Self {
        self.pos = Some(model);
        self
    }

    pub fn with_idf(mut self, idf: IdfTable) -> Self {
        self.idf = Arc::new(idf);
        self
    }

    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = Arc::new(stop_words);
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, Lexicon> {
        self.lexicon.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Lexicon> {
        self.lexicon.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn segment<'a>(&self, text: &'a str, f: impl FnOnce(&Segmenter<'_>, &'a str) -> Vec<Span>) -> Vec<Span> {
        let lexicon = self.read();
        let seg = Segmenter {
            lexicon: &lexicon,
            hmm: &self.hmm,
            cache: &self.cache,
        };
        let spans = f(&seg, text);
        trace!(bytes = text.len(), tokens = spans.len(), "segmented");
        spans
    }

    /// Default mode segmentation.
    pub fn cut<'a>(&self, text: &'a str, hmm: bool) -> Vec<&'a str> {
        words(text, self.segment(text, |s, t| s.cut(t, hmm)))
    }

    /// Every dictionary word found anywhere in `text`, overlapping.
    pub fn cut_all<'a>(&self, text: &'a str) -> Vec<&'a str> {
        words(text, self.segment(text, |s, t| s.cut_all(t)))
    }

    /// Default mode plus the dictionary 2- and 3-codepoint sub-words of
    /// longer tokens, emitted before the token itself.
    pub fn cut_for_search<'a>(&self, text: &'a str, hmm: bool) -> Vec<&'a str> {
        words(text, self.segment(text, |s, t| s.cut_for_search(t, hmm)))
    }

    /// Segment with the HMM alone, ignoring the dictionary.
    pub fn cut_hmm<'a>(&self, text: &'a str) -> Vec<&'a str> {
        words(text, self.segment(text, |s, t| s.cut_hmm(t)))
    }

    /// Dictionary route search using only words of at most `max_len`
    /// codepoints. No HMM.
    pub fn cut_small<'a>(&self, text: &'a str, max_len: usize) -> Vec<&'a str> {
        words(text, self.segment(text, |s, t| s.cut_small(t, max_len)))
    }

    /// Default mode segmentation (HMM on) with a POS tag per token.
    pub fn tag<'a>(&self, text: &'a str) -> Vec<Tag<'a>> {
        let lexicon = self.read();
        let seg = Segmenter {
            lexicon: &lexicon,
            hmm: &self.hmm,
            cache: &self.cache,
        };
        seg.cut(text, true)
            .into_iter()
            .map(|(s, e)| {
                let word = &text[s..e];
                Tag {
                    word,
                    tag: tagger::tag_word(&lexicon, self.pos.as_ref(), word),
                }
            })
            .collect()
    }

    /// Tokens with byte offsets into `text`.
    pub fn tokenize<'a>(&self, text: &'a str, mode: TokenizeMode, hmm: bool) -> Vec<Token<'a>> {
        let spans = match mode {
            TokenizeMode::Default => self.segment(text, |s, t| s.cut(t, hmm)),
            TokenizeMode::Search => self.segment(text, |s, t| s.cut_for_search(t, hmm)),
        };
        spans
            .into_iter()
            .map(|(start, end)| Token {
                word: &text[start..end],
                start,
                end,
            })
            .collect()
    }

    /// [`Jieba::cut`] over raw bytes that must be valid UTF-8.
    pub fn cut_bytes<'a>(&self, bytes: &'a [u8], hmm: bool) -> Result<Vec<&'a str>> {
        Ok(self.cut(libjieba_core::decode(bytes)?, hmm))
    }

    /// [`Jieba::tokenize`] over raw bytes; offsets index into `bytes`.
    pub fn tokenize_bytes<'a>(
        &self,
        bytes: &'a [u8],
        mode: TokenizeMode,
        hmm: bool,
    ) -> Result<Vec<Token<'a>>> {
        Ok(self.tokenize(libjieba_core::decode(bytes)?, mode, hmm))
    }

    /// Add a user word weighted by the configured user word policy.
    pub fn add_word(&self, word: &str) {
        let weight = self.config.base.user_word_weight;
        self.write().add_user_word(word, None, None, weight);
        trace!(word, "added user word");
    }

    /// Add or overwrite a word. An empty `tag` means untagged.
    pub fn add_word_with_freq_and_tag(&self, word: &str, freq: u64, tag: &str) {
        let tag = (!tag.is_empty()).then(|| tag.to_string());
        let weight = self.config.base.user_word_weight;
        self.write().add_user_word(word, Some(freq), tag, weight);
        trace!(word, freq, "added user word");
    }

    /// Delete a word. Returns false if it was not present.
    pub fn remove_word(&self, word: &str) -> bool {
        let removed = self.write().remove(word).is_some();
        trace!(word, removed, "removed word");
        removed
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.read().contains(word)
    }

    /// Dictionary tag of `word`, if it is a tagged entry.
    pub fn lookup_tag(&self, word: &str) -> Option<String> {
        self.read().lookup(word).and_then(|e| e.tag.clone())
    }

    /// TF-IDF extractor over this engine's tables.
    pub fn tfidf(&self) -> TfIdf {
        TfIdf::new(
            Arc::clone(&self.idf),
            Arc::clone(&self.stop_words),
            self.config.min_keyword_len,
        )
    }

    /// TextRank extractor over this engine's stop words.
    pub fn textrank(&self) -> TextRank {
        TextRank::new(Arc::clone(&self.stop_words), &self.config)
    }

    /// Top TF-IDF keywords, best first.
    pub fn extract_keywords(&self, text: &str, top_k: usize) -> Vec<String> {
        self.extract_keywords_with_weight(text, top_k)
            .into_iter()
            .map(|k| k.keyword)
            .collect()
    }

    /// Top TF-IDF keywords with their scores, best first.
    pub fn extract_keywords_with_weight(&self, text: &str, top_k: usize) -> Vec<Keyword> {
        self.tfidf().extract_keywords(self, text, top_k, &[])
    }

    /// Top TextRank keywords with their normalized scores, best first.
    pub fn extract_keywords_textrank(&self, text: &str, top_k: usize) -> Vec<Keyword> {
        self.textrank().extract_keywords(self, text, top_k, &[])
    }

    /// Serialize the current lexicon, user words included.
    pub fn lexicon_snapshot(&self) -> Result<Vec<u8>> {
        self.read().to_bincode()
    }

    pub fn config(&self) -> &JiebaConfig {
        &self.config
    }

    pub fn hmm_model(&self) -> &HmmModel {
        &self.hmm
    }

    pub fn pos_model(&self) -> Option<&HmmModel> {
        self.pos.as_ref()
    }

    pub fn idf_table(&self) -> &IdfTable {
        &self.idf
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }
}

fn words(text: &str, spans: Vec<Span>) -> Vec<&str> {
    spans.into_iter().map(|(s, e)| &text[s..e]).collect()
}
