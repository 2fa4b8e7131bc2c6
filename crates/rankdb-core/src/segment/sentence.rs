//! Sentence-grouping segmentation.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;
use crate::traits::Segmenter;
use crate::types::{Document, Fragment};

use super::fragment;

// terminal punctuation, whitespace, then an upper-case letter or digit
static BOUNDARY: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[.!?]\s+[A-Z0-9]").ok());

/// Splits text into sentences and packs consecutive sentences into fragments
/// of at most `max_chars` characters. A fragment is only closed once it holds
/// `min_sentences`, so a single long sentence may exceed the budget.
#[derive(Debug, Clone)]
pub struct SentenceSegmenter {
    max_chars: usize,
    min_sentences: usize,
}

impl SentenceSegmenter {
    /// `max_chars` is raised to at least 64 and `min_sentences` to at least 1.
    pub fn new(max_chars: usize, min_sentences: usize) -> Self {
        Self { max_chars: max_chars.max(64), min_sentences: min_sentences.max(1) }
    }
}

impl Default for SentenceSegmenter {
    fn default() -> Self { Self::new(800, 1) }
}

pub fn split_sentences(text: &str) -> Vec<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let Some(boundary) = BOUNDARY.as_ref() else { return vec![collapsed] };
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in boundary.find_iter(&collapsed) {
        // keep the punctuation, start the next sentence at the capital
        sentences.push(collapsed[start..m.start() + 1].trim().to_string());
        start = m.end() - 1;
    }
    sentences.push(collapsed[start..].trim().to_string());
    sentences.retain(|s| !s.is_empty());
    sentences
}

impl Segmenter for SentenceSegmenter {
    fn segment(&self, doc: &Document) -> Result<Vec<Fragment>> {
        let mut fragments = Vec::new();
        let mut buf: Vec<String> = Vec::new();
        let mut len = 0;
        for sentence in split_sentences(&doc.text) {
            let chars = sentence.chars().count();
            if len + chars + 1 > self.max_chars && buf.len() >= self.min_sentences {
                fragments.push(fragment(doc, "s", fragments.len(), buf.join(" ")));
                buf.clear();
                len = 0;
            }
            len += chars + 1;
            buf.push(sentence);
        }
        if !buf.is_empty() { fragments.push(fragment(doc, "s", fragments.len(), buf.join(" "))); }
        if fragments.is_empty() { fragments.push(fragment(doc, "s", 0, doc.text.clone())); }
        Ok(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminal_punctuation_before_capitals() {
        let sentences = split_sentences("Fire needs air.  Water boils at 100 C! Is it safe? yes, mostly. 3 cups.");
        assert_eq!(sentences, vec!["Fire needs air.", "Water boils at 100 C!", "Is it safe? yes, mostly.", "3 cups."]);
    }

    #[test]
    fn packs_sentences_up_to_the_char_budget() {
        let sentence = format!("{}.", "word ".repeat(9).trim());
        let text = std::iter::repeat(sentence.as_str()).take(5).collect::<Vec<_>>().join(" ");
        let frags = SentenceSegmenter::new(64, 1).segment(&Document::new("d", text)).unwrap();
        // 45 chars per sentence: one per fragment under a 64 char budget
        assert_eq!(frags.len(), 5);
        assert_eq!(frags[0].id, "d::s0");
        assert_eq!(frags[4].id, "d::s4");
        assert!(frags.iter().all(|f| f.text == sentence));
    }

    #[test]
    fn short_sentences_share_a_fragment() {
        let text = "One is here. Two is here. Three is here.";
        let frags = SentenceSegmenter::new(800, 1).segment(&Document::new("d", text)).unwrap();
        assert_eq!(frags.len(), 1);
        assert_eq!(frags[0].text, text);
    }

    #[test]
    fn empty_document_yields_single_fragment() {
        let frags = SentenceSegmenter::default().segment(&Document::new("e", "  ")).unwrap();
        assert_eq!(frags.len(), 1);
        assert_eq!(frags[0].id, "e::s0");
    }
}
