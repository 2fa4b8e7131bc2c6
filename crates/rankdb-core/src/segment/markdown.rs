//! Heading-bounded segmentation for Markdown.

use crate::error::Result;
use crate::traits::Segmenter;
use crate::types::{Document, Fragment};

use super::fragment;

/// Starts a new section at every ATX heading (`#` to `######` followed by
/// whitespace) and cuts sections longer than `max_section_tokens` words into
/// consecutive, non-overlapping pieces.
#[derive(Debug, Clone)]
pub struct MarkdownSegmenter {
    max_section_tokens: usize,
}

impl MarkdownSegmenter {
    pub fn new(max_section_tokens: usize) -> Self { Self { max_section_tokens: max_section_tokens.max(1) } }
}

impl Default for MarkdownSegmenter {
    fn default() -> Self { Self::new(400) }
}

fn is_heading(line: &str) -> bool {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    (1..=6).contains(&hashes) && line[hashes..].starts_with(char::is_whitespace)
}

pub fn split_sections(markdown: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in markdown.lines() {
        if is_heading(line) && !current.is_empty() {
            sections.push(current.join("\n"));
            current.clear();
        }
        current.push(line);
    }
    if !current.is_empty() { sections.push(current.join("\n")); }
    sections
}

impl Segmenter for MarkdownSegmenter {
    fn segment(&self, doc: &Document) -> Result<Vec<Fragment>> {
        let mut fragments = Vec::new();
        for section in split_sections(&doc.text) {
            let words: Vec<&str> = section.split_whitespace().collect();
            for piece in words.chunks(self.max_section_tokens) {
                fragments.push(fragment(doc, "m", fragments.len(), piece.join(" ")));
            }
        }
        if fragments.is_empty() { fragments.push(fragment(doc, "m", 0, doc.text.clone())); }
        Ok(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_start_new_sections() {
        let md = "intro line\n# H1\nline1\nline2\n## H2\nline3\n#hashtag stays\n";
        let sections = split_sections(md);
        assert_eq!(sections, vec!["intro line", "# H1\nline1\nline2", "## H2\nline3\n#hashtag stays"]);
    }

    #[test]
    fn long_sections_are_cut_by_word_budget() {
        let md = "# H1\nline1\nline2\n## H2\nline3\n";
        let frags = MarkdownSegmenter::new(3).segment(&Document::new("m", md).with_meta("category", "notes")).unwrap();
        let texts: Vec<&str> = frags.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["# H1 line1", "line2", "## H2 line3"]);
        assert_eq!(frags[0].id, "m::m0");
        assert_eq!(frags[2].id, "m::m2");
        assert!(frags.iter().all(|f| f.metadata["category"] == "notes"));
    }

    #[test]
    fn blank_markdown_yields_single_fragment() {
        let frags = MarkdownSegmenter::default().segment(&Document::new("b", "\n\n")).unwrap();
        assert_eq!(frags.len(), 1);
        assert_eq!(frags[0].id, "b::m0");
    }
}
