//! Segmentation collaborators: split a `Document` into independently indexed
//! `Fragment`s. Every segmenter copies the document metadata onto its fragments
//! and yields one fragment with the raw text when nothing else qualifies.

pub mod html;
pub mod markdown;
pub mod sentence;
pub mod token;

pub use html::HtmlSegmenter;
pub use markdown::MarkdownSegmenter;
pub use sentence::SentenceSegmenter;
pub use token::TokenSegmenter;

use crate::config::{SegmentSettings, SegmenterKind};
use crate::error::Result;
use crate::traits::Segmenter;
use crate::types::{Document, Fragment};

/// Fragment ids are `"{doc_id}::{tag}{index}"`; the token segmenter uses an empty tag.
fn fragment(doc: &Document, tag: &str, index: usize, text: String) -> Fragment {
    Fragment {
        id: format!("{}::{}{}", doc.id, tag, index),
        source_id: doc.id.clone(),
        text,
        metadata: doc.metadata.clone(),
    }
}

pub fn segmenter_from_settings(settings: &SegmentSettings) -> Result<Box<dyn Segmenter>> {
    let segmenter: Box<dyn Segmenter> = match settings.kind {
        SegmenterKind::Token => Box::new(TokenSegmenter::from_settings(settings)?),
        SegmenterKind::Sentence => Box::new(SentenceSegmenter::new(settings.max_chars, settings.min_sentences)),
        SegmenterKind::Markdown => Box::new(MarkdownSegmenter::new(settings.max_section_tokens)),
        SegmenterKind::Html => Box::new(HtmlSegmenter::new(TokenSegmenter::from_settings(settings)?)),
    };
    Ok(segmenter)
}
