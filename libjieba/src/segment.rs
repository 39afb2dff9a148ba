// libjieba/src/segment.rs
//
// Segmentation modes over a borrowed lexicon and HMM.
// - text is split into word blocks and separators first
// - word blocks go through the DAG route (and the HMM for unknown runs)
// - every mode returns byte ranges into the input, in order

use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};

use libjieba_core::{Dag, HmmModel, Lexicon, WordSource};
use lru::LruCache;
use once_cell::sync::Lazy;
use regex::Regex;

/// Byte range `[start, end)` into the input.
pub(crate) type Span = (usize, usize);

const HAN: &str = r"\u{3400}-\u{4DBF}\u{4E00}-\u{9FFF}\u{F900}-\u{FAFF}\u{20000}-\u{2A6DF}";

static RE_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(&format!(r"[{HAN}a-zA-Z0-9+#&\._%\-]+")).unwrap());
static RE_SKIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\s").unwrap());

/// LRU cache of HMM decodes keyed by the decoded run.
///
/// HMM output depends only on the run text and the fixed model, so entries
/// stay valid across lexicon edits.
pub(crate) struct HmmCache {
    inner: Option<Mutex<LruCache<String, Vec<Span>>>>,
}

impl HmmCache {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            inner: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
        }
    }

    /// Spans of `run` relative to its start.
    fn cut(&self, hmm: &HmmModel, run: &str) -> Vec<Span> {
        let Some(cache) = &self.inner else {
            return hmm.cut_spans(run);
        };
        if let Some(hit) = cache.lock().unwrap_or_else(PoisonError::into_inner).get(run) {
            return hit.clone();
        }
        let spans = hmm.cut_spans(run);
        cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(run.to_string(), spans.clone());
        spans
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, |c| {
            c.lock().unwrap_or_else(PoisonError::into_inner).len()
        })
    }
}

/// A block's codepoints and their absolute byte offsets.
///
/// `offsets` has one extra entry: the block's end.
struct Chars {
    chars: Vec<char>,
    offsets: Vec<usize>,
}

impl Chars {
    fn new(text: &str, start: usize, end: usize) -> Self {
        let block = &text[start..end];
        let mut chars = Vec::with_capacity(block.len());
        let mut offsets = Vec::with_capacity(block.len() + 1);
        for (i, ch) in block.char_indices() {
            chars.push(ch);
            offsets.push(start + i);
        }
        offsets.push(end);
        Self { chars, offsets }
    }

    fn span(&self, b: usize, e: usize) -> Span {
        (self.offsets[b], self.offsets[e])
    }
}

enum Block {
    Word(usize, usize),
    Other(usize, usize),
}

fn blocks(text: &str, re: &Regex) -> Vec<Block> {
    let mut out = Vec::new();
    let mut last = 0;
    for m in re.find_iter(text) {
        if m.start() > last {
            out.push(Block::Other(last, m.start()));
        }
        out.push(Block::Word(m.start(), m.end()));
        last = m.end();
    }
    if last < text.len() {
        out.push(Block::Other(last, text.len()));
    }
    out
}

/// Separators: `\r\n` and each whitespace codepoint stand alone, every
/// other codepoint is its own token.
fn push_separators(text: &str, start: usize, end: usize, out: &mut Vec<Span>) {
    let gap = &text[start..end];
    let mut last = 0;
    for m in RE_SKIP.find_iter(gap) {
        push_codepoints(gap, start, last, m.start(), out);
        out.push((start + m.start(), start + m.end()));
        last = m.end();
    }
    push_codepoints(gap, start, last, gap.len(), out);
}

fn push_codepoints(gap: &str, base: usize, from: usize, to: usize, out: &mut Vec<Span>) {
    for (i, ch) in gap[from..to].char_indices() {
        let b = base + from + i;
        out.push((b, b + ch.len_utf8()));
    }
}

/// Borrowed view of the engine state a segmentation call needs.
pub(crate) struct Segmenter<'j> {
    pub(crate) lexicon: &'j Lexicon,
    pub(crate) hmm: &'j HmmModel,
    pub(crate) cache: &'j HmmCache,
}

impl<'j> Segmenter<'j> {
    /// Default mode: route search, with HMM for runs of unknown codepoints.
    pub(crate) fn cut(&self, text: &str, hmm: bool) -> Vec<Span> {
        let mut out = Vec::new();
        for block in blocks(text, &RE_BLOCK) {
            match block {
                Block::Word(s, e) if hmm => self.cut_block_hmm(text, s, e, &mut out),
                Block::Word(s, e) => self.cut_block(text, s, e, usize::MAX, &mut out),
                Block::Other(s, e) => push_separators(text, s, e, &mut out),
            }
        }
        out
    }

    /// Route search restricted to words of at most `max_len` codepoints.
    pub(crate) fn cut_small(&self, text: &str, max_len: usize) -> Vec<Span> {
        let mut out = Vec::new();
        for block in blocks(text, &RE_BLOCK) {
            match block {
                Block::Word(s, e) => self.cut_block(text, s, e, max_len, &mut out),
                Block::Other(s, e) => push_separators(text, s, e, &mut out),
            }
        }
        out
    }

    /// Every dictionary word of every position.
    pub(crate) fn cut_all(&self, text: &str) -> Vec<Span> {
        let mut out = Vec::new();
        for block in blocks(text, &RE_BLOCK) {
            match block {
                Block::Word(s, e) => self.cut_all_block(text, s, e, &mut out),
                Block::Other(s, e) => push_separators(text, s, e, &mut out),
            }
        }
        out
    }

    /// `cut`, plus dictionary sub-words of long tokens.
    pub(crate) fn cut_for_search(&self, text: &str, hmm: bool) -> Vec<Span> {
        let mut out = Vec::new();
        for span in self.cut(text, hmm) {
            self.push_search_spans(text, span, &mut out);
        }
        out
    }

    /// HMM only, no dictionary. Whole inputs bypass the decode cache.
    pub(crate) fn cut_hmm(&self, text: &str) -> Vec<Span> {
        self.hmm.cut_spans(text)
    }

    fn cut_block(&self, text: &str, start: usize, end: usize, max_len: usize, out: &mut Vec<Span>) {
        let block = Chars::new(text, start, end);
        let route = Dag::build_with_limit(self.lexicon, &block.chars, max_len).route();
        out.extend(route.segments().into_iter().map(|(b, e)| block.span(b, e)));
    }

    fn cut_block_hmm(&self, text: &str, start: usize, end: usize, out: &mut Vec<Span>) {
        let block = Chars::new(text, start, end);
        let route = Dag::build(self.lexicon, &block.chars).route();
        let mut run: Option<usize> = None;
        for (b, e) in route.segments() {
            if e - b == 1 && !self.is_user_single(block.chars[b]) {
                run.get_or_insert(b);
                continue;
            }
            if let Some(rb) = run.take() {
                self.flush_run(text, &block, rb, b, out);
            }
            out.push(block.span(b, e));
        }
        if let Some(rb) = run {
            self.flush_run(text, &block, rb, block.chars.len(), out);
        }
    }

    /// Emit the single-codepoint run `[b, e)` of `block`.
    fn flush_run(&self, text: &str, block: &Chars, b: usize, e: usize, out: &mut Vec<Span>) {
        if e - b == 1 {
            out.push(block.span(b, e));
            return;
        }
        if self.lexicon.lookup_chars(&block.chars[b..e]).is_some() {
            out.extend((b..e).map(|i| block.span(i, i + 1)));
            return;
        }
        let (rs, re) = block.span(b, e);
        out.extend(
            self.cache
                .cut(self.hmm, &text[rs..re])
                .into_iter()
                .map(|(s, t)| (rs + s, rs + t)),
        );
    }

    fn is_user_single(&self, ch: char) -> bool {
        self.lexicon
            .lookup_chars(&[ch])
            .is_some_and(|e| e.source == WordSource::User)
    }

    fn cut_all_block(&self, text: &str, start: usize, end: usize, out: &mut Vec<Span>) {
        let block = Chars::new(text, start, end);
        let dag = Dag::build(self.lexicon, &block.chars);
        let has_known = |i: usize| dag.edges(i).iter().any(|e| e.known);
        let mut covered = 0;
        for i in 0..dag.len() {
            let mut known = dag.edges(i).iter().filter(|e| e.known).peekable();
            if known.peek().is_none() {
                if i >= covered {
                    // uncovered ASCII letters and digits stay together
                    let mut end = i + 1;
                    if block.chars[i].is_ascii_alphanumeric() {
                        while end < dag.len() && block.chars[end].is_ascii_alphanumeric() && !has_known(end) {
                            end += 1;
                        }
                    }
                    out.push(block.span(i, end));
                    covered = end;
                }
                continue;
            }
            for edge in known {
                out.push(block.span(i, edge.end));
                covered = covered.max(edge.end);
            }
        }
    }

    fn push_search_spans(&self, text: &str, (start, end): Span, out: &mut Vec<Span>) {
        let word = Chars::new(text, start, end);
        let n = word.chars.len();
        if n >= 3 {
            let mut seen: Vec<&str> = Vec::new();
            for width in [2, 3] {
                if width >= n {
                    continue;
                }
                for i in 0..=n - width {
                    if self.lexicon.lookup_chars(&word.chars[i..i + width]).is_none() {
                        continue;
                    }
                    let (s, e) = word.span(i, i + width);
                    let sub = &text[s..e];
                    if !seen.contains(&sub) {
                        seen.push(sub);
                        out.push((s, e));
                    }
                }
            }
        }
        out.push((start, end));
    }
}
