//! HTML cleanup in front of word-window segmentation.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::Result;
use crate::traits::Segmenter;
use crate::types::{Document, Fragment};

use super::token::TokenSegmenter;

static SCRIPT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script>").ok());
static STYLE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style>").ok());
static TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"</?[^>]+>").ok());
static ENTITY: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?i)&(nbsp|amp|lt|gt|quot|#39);").ok());

fn replace_all(re: &LazyLock<Option<Regex>>, text: String) -> String {
    match re.as_ref() {
        Some(re) => re.replace_all(&text, " ").into_owned(),
        None => text,
    }
}

/// Strips tags (and by default whole `<script>`/`<style>` blocks), decodes the
/// common entities and collapses whitespace. Suited to well-formed fragments
/// and e-mail bodies, not to arbitrary markup.
pub fn clean_html(html: &str, strip_scripts: bool, strip_styles: bool) -> String {
    let mut s = html.to_string();
    if strip_scripts { s = replace_all(&SCRIPT, s); }
    if strip_styles { s = replace_all(&STYLE, s); }
    s = replace_all(&TAG, s);
    if let Some(entity) = ENTITY.as_ref() {
        s = entity
            .replace_all(&s, |caps: &Captures| match caps[1].to_ascii_lowercase().as_str() {
                "amp" => "&",
                "lt" => "<",
                "gt" => ">",
                "quot" => "\"",
                "#39" => "'",
                _ => " ",
            })
            .into_owned();
    }
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cleans the document body with [`clean_html`], then delegates to a
/// [`TokenSegmenter`]. Fragment ids follow the token segmenter's.
#[derive(Debug, Clone)]
pub struct HtmlSegmenter {
    tokens: TokenSegmenter,
    strip_scripts: bool,
    strip_styles: bool,
}

impl HtmlSegmenter {
    pub fn new(tokens: TokenSegmenter) -> Self { Self { tokens, strip_scripts: true, strip_styles: true } }

    pub fn keep_scripts(mut self) -> Self { self.strip_scripts = false; self }
    pub fn keep_styles(mut self) -> Self { self.strip_styles = false; self }
}

impl Default for HtmlSegmenter {
    fn default() -> Self { Self::new(TokenSegmenter::default()) }
}

impl Segmenter for HtmlSegmenter {
    fn segment(&self, doc: &Document) -> Result<Vec<Fragment>> {
        let cleaned = Document { text: clean_html(&doc.text, self.strip_scripts, self.strip_styles), ..doc.clone() };
        self.tokens.segment(&cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
      <html><head><style>.a{}</style><script>var x=1;</script></head>
      <body><h1>Hello</h1><p>World &amp; Co.</p><P>a &LT;b&gt;&nbsp;c</P></body></html>
    "#;

    #[test]
    fn strips_tags_blocks_and_entities() {
        assert_eq!(clean_html(PAGE, true, true), "Hello World & Co. a <b> c");
    }

    #[test]
    fn kept_script_text_survives_tag_removal() {
        assert!(clean_html(PAGE, false, true).contains("var x=1;"));
        assert!(!clean_html(PAGE, true, true).contains("var x"));
    }

    #[test]
    fn segments_cleaned_text_with_token_windows() {
        let seg = HtmlSegmenter::new(TokenSegmenter::new(3, 0).unwrap());
        let frags = seg.segment(&Document::new("d", PAGE)).unwrap();
        let texts: Vec<&str> = frags.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello World &", "Co. a <b>", "c"]);
        assert_eq!(frags[0].id, "d::0");

        let scripted = HtmlSegmenter::default().keep_scripts().segment(&Document::new("d", PAGE)).unwrap();
        assert!(scripted[0].text.starts_with("var x=1;"));
        let styled = HtmlSegmenter::default().keep_styles().segment(&Document::new("d", PAGE)).unwrap();
        assert!(styled[0].text.starts_with(".a{} Hello"));
    }
}
