//! Part-of-speech assignment for segmented tokens.
//!
//! Order of precedence:
//! 1. the dictionary tag of the token, if it has one
//! 2. the POS model's tag, for Han tokens when a model is loaded
//! 3. `m` for numbers, `eng` for other ASCII alphanumeric tokens
//! 4. `x`

use libjieba_core::{HmmModel, Lexicon};
use once_cell::sync::Lazy;
use regex::Regex;

static RE_HAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\u{3400}-\u{4DBF}\u{4E00}-\u{9FFF}\u{F900}-\u{FAFF}\u{20000}-\u{2A6DF}]+$").unwrap()
});
static RE_NUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9.%]*[0-9][0-9.%]*$").unwrap());
static RE_ENG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());

pub(crate) const UNKNOWN_TAG: &str = "x";

/// Tag of `word`, which must be a token produced by segmentation.
pub(crate) fn tag_word(lexicon: &Lexicon, pos: Option<&HmmModel>, word: &str) -> String {
    if let Some(tag) = lexicon.lookup(word).and_then(|e| e.tag.as_deref()) {
        return tag.to_string();
    }
    if let Some(model) = pos {
        if RE_HAN.is_match(word) {
            if let Some(tag) = model.decode_tag(word) {
                return tag.to_string();
            }
        }
    }
    if RE_NUM.is_match(word) {
        "m".to_string()
    } else if RE_ENG.is_match(word) {
        "eng".to_string()
    } else {
        UNKNOWN_TAG.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POS: &str = "\
B-nr E-nr S-v
-0.5 -3.14e100 -0.9
-3.14e100 -0.1 -3.14e100
-0.5 -3.14e100 -0.9
-0.5 -3.14e100 -0.9
王:-0.5
明:-0.5
走:-0.5
";

    fn lexicon() -> Lexicon {
        Lexicon::from_dict("北京 100 ns\n的 50\n".as_bytes()).unwrap()
    }

    #[test]
    fn dictionary_tag_wins() {
        let lx = lexicon();
        assert_eq!(tag_word(&lx, None, "北京"), "ns");
    }

    #[test]
    fn ascii_rules() {
        let lx = lexicon();
        assert_eq!(tag_word(&lx, None, "2024"), "m");
        assert_eq!(tag_word(&lx, None, "3.5%"), "m");
        assert_eq!(tag_word(&lx, None, "rust2"), "eng");
        assert_eq!(tag_word(&lx, None, "，"), "x");
        assert_eq!(tag_word(&lx, None, "."), "x");
    }

    #[test]
    fn untagged_han_words_use_pos_model() {
        let lx = lexicon();
        let pos = HmmModel::parse(POS.as_bytes(), "POS model", -3.14e100).unwrap();
        assert_eq!(tag_word(&lx, Some(&pos), "王明"), "nr");
        assert_eq!(tag_word(&lx, Some(&pos), "走"), "v");
        assert_eq!(tag_word(&lx, None, "王明"), "x");
        assert_eq!(tag_word(&lx, Some(&pos), "ok"), "eng");
    }
}
