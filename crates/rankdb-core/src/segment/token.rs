//! Overlapping word-window segmentation.

use crate::config::SegmentSettings;
use crate::error::{Error, Result};
use crate::traits::Segmenter;
use crate::types::{Document, Fragment};

use super::fragment;

#[derive(Debug, Clone)]
pub struct TokenSegmenter {
    max_tokens: usize,
    overlap: usize,
}

impl TokenSegmenter {
    /// `overlap` is clamped below `max_tokens` so every window advances.
    pub fn new(max_tokens: usize, overlap: usize) -> Result<Self> {
        if max_tokens == 0 {
            return Err(Error::Segmentation("max_tokens must be at least 1".to_string()));
        }
        Ok(Self { max_tokens, overlap: overlap.min(max_tokens - 1) })
    }

    pub fn from_settings(settings: &SegmentSettings) -> Result<Self> {
        Self::new(settings.max_tokens, settings.overlap)
    }
}

impl Default for TokenSegmenter {
    fn default() -> Self { Self { max_tokens: 200, overlap: 20 } }
}

impl Segmenter for TokenSegmenter {
    fn segment(&self, doc: &Document) -> Result<Vec<Fragment>> {
        let words: Vec<&str> = doc.text.split_whitespace().collect();
        if words.is_empty() {
            return Ok(vec![fragment(doc, "", 0, doc.text.clone())]);
        }
        let step = self.max_tokens - self.overlap;
        let mut fragments = Vec::new();
        let mut start = 0;
        while start < words.len() {
            let end = (start + self.max_tokens).min(words.len());
            fragments.push(fragment(doc, "", fragments.len(), words[start..end].join(" ")));
            if end >= words.len() { break; }
            start += step;
        }
        Ok(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_overlap_and_cover_all_words() {
        let seg = TokenSegmenter::new(4, 1).unwrap();
        let doc = Document::new("d", "a b c d e f g");
        let frags = seg.segment(&doc).unwrap();
        let texts: Vec<&str> = frags.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["a b c d", "d e f g"]);
        assert_eq!(frags[1].id, "d::1");
        assert!(frags.iter().all(|f| f.source_id == "d"));
    }

    #[test]
    fn empty_document_yields_single_fragment() {
        let seg = TokenSegmenter::default();
        let frags = seg.segment(&Document::new("e", "   ")).unwrap();
        assert_eq!(frags.len(), 1);
        assert_eq!(frags[0].id, "e::0");
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(TokenSegmenter::new(0, 0).is_err());
    }
}
