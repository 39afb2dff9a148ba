// libjieba/tests/segmentation.rs
//
// Integration tests for the segmentation modes, tagging and dictionary
// edits, run against the fixtures under tests/data.

mod common;

use std::sync::Arc;

use libjieba::{DictSources, Error, Jieba, JiebaConfig, Token, TokenizeMode};
use libjieba_core::Lexicon;

#[test]
fn known_words_beat_single_codepoints() {
    let jieba = common::minimal_jieba();
    assert_eq!(jieba.cut("北京大学", false), vec!["北京", "大学"]);
}

#[test]
fn added_word_becomes_one_token() {
    let jieba = common::minimal_jieba();
    jieba.add_word_with_freq_and_tag("北京大学", 100_000, "nt");
    assert_eq!(jieba.cut("北京大学", false), vec!["北京大学"]);
    assert_eq!(jieba.lookup_tag("北京大学").as_deref(), Some("nt"));
}

#[test]
fn added_word_with_default_weight() {
    let jieba = common::minimal_jieba();
    jieba.add_word("北京大学");
    assert_eq!(jieba.cut("北京大学", false), vec!["北京大学"]);
    assert_eq!(jieba.lookup_tag("北京大学"), None);
}

#[test]
fn longest_probable_route() {
    let jieba = common::jieba();
    assert_eq!(
        jieba.cut("我来到北京清华大学", true),
        vec!["我", "来到", "北京", "清华大学"]
    );
}

#[test]
fn hmm_discovers_unknown_words() {
    let jieba = common::jieba();
    let text = "北京小明去杭州";
    assert_eq!(jieba.cut(text, true), vec!["北京", "小明", "去", "杭州"]);
    assert_eq!(
        jieba.cut(text, false),
        vec!["北京", "小", "明", "去", "杭", "州"]
    );
    assert_eq!(jieba.cut_hmm("小明去杭州"), vec!["小明", "去", "杭州"]);
}

#[test]
fn empty_input_is_empty_everywhere() {
    let jieba = common::jieba();
    assert!(jieba.cut("", true).is_empty());
    assert!(jieba.cut("", false).is_empty());
    assert!(jieba.cut_all("").is_empty());
    assert!(jieba.cut_for_search("", true).is_empty());
    assert!(jieba.cut_small("", 2).is_empty());
    assert!(jieba.tag("").is_empty());
    assert!(jieba.tokenize("", TokenizeMode::Search, true).is_empty());
    assert!(jieba.extract_keywords("", 5).is_empty());
    assert!(jieba.extract_keywords_textrank("", 5).is_empty());
}

#[test]
fn cut_all_lists_overlapping_words() {
    let jieba = common::jieba();
    assert_eq!(jieba.cut_all("北京大学"), vec!["北京", "大", "大学"]);
    assert_eq!(
        jieba.cut_all("清华大学"),
        vec!["清华", "清华大学", "华大", "大", "大学"]
    );
}

#[test]
fn search_mode_adds_sub_words_first() {
    let jieba = common::jieba();
    assert_eq!(
        jieba.cut_for_search("我来到清华大学", true),
        vec!["我", "来到", "清华", "华大", "大学", "清华大学"]
    );
}

#[test]
fn cut_small_caps_word_length() {
    let jieba = common::jieba();
    assert_eq!(jieba.cut_small("清华大学", 2), vec!["清华", "大学"]);
}

#[test]
fn punctuation_and_ascii() {
    let jieba = common::jieba();
    assert_eq!(
        jieba.cut("北京，Rust和中国。", true),
        vec!["北京", "，", "Rust", "和", "中国", "。"]
    );
}

#[test]
fn tokenize_reports_byte_offsets() {
    let jieba = common::jieba();
    let text = "我来到北京清华大学";
    let tokens = jieba.tokenize(text, TokenizeMode::Default, true);
    assert_eq!(
        tokens,
        vec![
            Token { word: "我", start: 0, end: 3 },
            Token { word: "来到", start: 3, end: 9 },
            Token { word: "北京", start: 9, end: 15 },
            Token { word: "清华大学", start: 15, end: 27 },
        ]
    );

    let mixed = "Rust和北京";
    let tokens = jieba.tokenize(mixed, TokenizeMode::Default, true);
    let spans: Vec<(usize, usize)> = tokens.iter().map(|t| (t.start, t.end)).collect();
    assert_eq!(spans, vec![(0, 4), (4, 7), (7, 13)]);
    for t in &tokens {
        assert_eq!(&mixed[t.start..t.end], t.word);
    }
}

#[test]
fn tokenize_search_mode_overlaps() {
    let jieba = common::jieba();
    let tokens = jieba.tokenize("清华大学", TokenizeMode::Search, false);
    let spans: Vec<(&str, usize, usize)> =
        tokens.iter().map(|t| (t.word, t.start, t.end)).collect();
    assert_eq!(
        spans,
        vec![
            ("清华", 0, 6),
            ("华大", 3, 9),
            ("大学", 6, 12),
            ("清华大学", 0, 12),
        ]
    );
}

#[test]
fn byte_input_must_be_utf8() {
    let jieba = common::jieba();
    let err = jieba.cut_bytes(&[0xe5, 0x8c], true).unwrap_err();
    assert!(matches!(err, Error::Decode { valid_up_to: 0, .. }));

    let mut bytes = "北京".as_bytes().to_vec();
    bytes.push(0xff);
    let err = jieba
        .tokenize_bytes(&bytes, TokenizeMode::Default, true)
        .unwrap_err();
    assert!(matches!(err, Error::Decode { valid_up_to: 6, .. }));

    let ok = jieba.cut_bytes("北京大学".as_bytes(), false).unwrap();
    assert_eq!(ok, vec!["北京", "大学"]);
}

#[test]
fn tag_uses_dictionary_then_pos_model() {
    let jieba = common::jieba();
    let tags: Vec<String> = jieba
        .tag("北京小明去杭州")
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(tags, vec!["北京/ns", "小明/nr", "去/v", "杭州/ns"]);
}

#[test]
fn tag_without_pos_model_falls_back_to_rules() {
    let jieba = common::minimal_jieba();
    let tags: Vec<String> = jieba
        .tag("小明去2024 Rust")
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(tags, vec!["小明/x", "去/x", "2024/m", " /x", "Rust/eng"]);
}

#[test]
fn user_dictionary_entries() {
    let jieba = common::jieba();
    assert!(jieba.contains_word("云计算"));
    assert_eq!(jieba.lookup_tag("云计算").as_deref(), Some("n"));
    assert_eq!(jieba.lookup_tag("创新办").as_deref(), Some("i"));
    assert_eq!(jieba.lookup_tag("蓝翔"), None);
    assert!(jieba.contains_word("蓝翔"));
    assert_eq!(jieba.cut("云计算", true), vec!["云计算"]);
}

#[test]
fn add_then_remove_restores_output() {
    let jieba = common::jieba();
    let texts = ["北京大学", "我来到北京清华大学", "北京小明去杭州", "清华大学的学生"];
    let before: Vec<Vec<&str>> = texts.iter().map(|t| jieba.cut(t, true)).collect();

    jieba.add_word("京大");
    assert!(jieba.contains_word("京大"));
    assert!(jieba.remove_word("京大"));

    let after: Vec<Vec<&str>> = texts.iter().map(|t| jieba.cut(t, true)).collect();
    assert_eq!(before, after);
    assert!(!jieba.remove_word("京大"));
}

#[test]
fn remove_main_word() {
    let jieba = common::jieba();
    assert!(jieba.remove_word("清华大学"));
    assert_eq!(jieba.cut("清华大学", false), vec!["清华", "大学"]);
}

#[test]
fn repeated_calls_are_identical() {
    let jieba = common::jieba();
    let text = "我来到北京清华大学，北京小明去杭州研究生命的起源";
    let first = (jieba.cut(text, true), jieba.tag(text), jieba.extract_keywords_with_weight(text, 0));
    for _ in 0..5 {
        assert_eq!(jieba.cut(text, true), first.0);
        assert_eq!(jieba.tag(text), first.1);
        assert_eq!(jieba.extract_keywords_with_weight(text, 0), first.2);
    }
}

#[test]
fn concurrent_reads_and_writes() {
    let jieba = Arc::new(common::jieba());
    std::thread::scope(|s| {
        for _ in 0..4 {
            let jieba = Arc::clone(&jieba);
            s.spawn(move || {
                for _ in 0..50 {
                    assert_eq!(jieba.cut("北京小明去杭州", true), vec!["北京", "小明", "去", "杭州"]);
                }
            });
        }
        let writer = Arc::clone(&jieba);
        s.spawn(move || {
            for i in 0..50 {
                let word = format!("临时词{i}");
                writer.add_word(&word);
                writer.remove_word(&word);
            }
        });
    });
}

#[test]
fn snapshot_keeps_user_words() {
    let jieba = common::jieba();
    jieba.add_word_with_freq_and_tag("区块链", 12, "n");
    let bytes = jieba.lexicon_snapshot().unwrap();
    let lexicon = Lexicon::from_bincode(&bytes).unwrap();
    assert_eq!(lexicon.lookup("区块链").map(|e| e.freq), Some(12));
    assert!(lexicon.contains("北京"));
}

#[test]
fn construction_errors() {
    let err = Jieba::new(DictSources::new(b"# empty\n", common::HMM)).err().unwrap();
    assert!(matches!(err, Error::Construction { resource: "main dictionary", .. }));

    let err = Jieba::new(DictSources::new(common::DICT, b"-0.1 -0.2\n")).err().unwrap();
    assert!(matches!(err, Error::Construction { resource: "HMM model", .. }));

    let mut config = JiebaConfig::default();
    config.textrank_span = 1;
    let err = Jieba::with_config(DictSources::new(common::DICT, common::HMM), config)
        .err()
        .unwrap();
    assert!(matches!(err, Error::Construction { resource: "configuration", .. }));
}

#[test]
fn broken_optional_inputs_are_skipped() {
    let sources = DictSources::new(common::DICT, common::HMM)
        .with_pos_hmm(b"not a model")
        .with_user_dict(b"\xff\xfe\n")
        .with_idf(b"garbage\n");
    let jieba = Jieba::new(sources).unwrap();
    assert!(jieba.pos_model().is_none());
    assert!(jieba.idf_table().is_empty());
    assert_eq!(jieba.cut("北京大学", false), vec!["北京", "大学"]);
}

#[test]
fn disabled_hmm_cache_gives_same_tokens() {
    let mut config = JiebaConfig::default();
    config.hmm_cache_size = 0;
    let jieba = common::jieba_with(config);
    assert_eq!(jieba.cut("北京小明去杭州", true), vec!["北京", "小明", "去", "杭州"]);
}
