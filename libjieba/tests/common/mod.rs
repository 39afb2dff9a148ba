// Shared fixtures for the libjieba integration tests.
#![allow(dead_code)]

use libjieba::{DictSources, Jieba, JiebaConfig};

pub const DICT: &[u8] = include_bytes!("../data/dict.txt");
pub const HMM: &[u8] = include_bytes!("../data/hmm_model.txt");
pub const POS_HMM: &[u8] = include_bytes!("../data/pos_model.txt");
pub const USER_DICT: &[u8] = include_bytes!("../data/user_dict.txt");
pub const IDF: &[u8] = include_bytes!("../data/idf.txt");
pub const STOP_WORDS: &[u8] = include_bytes!("../data/stop_words.txt");

pub fn full_sources() -> DictSources<'static> {
    DictSources::new(DICT, HMM)
        .with_user_dict(USER_DICT)
        .with_idf(IDF)
        .with_stop_words(STOP_WORDS)
        .with_pos_hmm(POS_HMM)
}

/// Engine with every fixture loaded.
pub fn jieba() -> Jieba {
    Jieba::new(full_sources()).expect("fixtures load")
}

pub fn jieba_with(config: JiebaConfig) -> Jieba {
    Jieba::with_config(full_sources(), config).expect("fixtures load")
}

/// Engine with only the required inputs.
pub fn minimal_jieba() -> Jieba {
    Jieba::new(DictSources::new(DICT, HMM)).expect("fixtures load")
}
