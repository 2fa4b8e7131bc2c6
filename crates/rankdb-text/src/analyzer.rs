use tantivy::tokenizer::{LowerCaser, SimpleTokenizer, StopWordFilter, TextAnalyzer, TokenStream};

/// Built-in stop words removed from indexed text, queries and feedback terms.
pub const STOP_WORDS: &[&str] = &[
	"the","a","an","and","or","but","if","then","else","of","to","in","on","for","with","as","by","is","are","was","were","be","this","that","it","at","from",
];

/// Case-folding tokenizer that splits on non-alphanumeric characters and drops stop words.
#[derive(Clone)]
pub struct Analyzer {
	inner: TextAnalyzer,
}

impl Analyzer {
	pub fn new() -> Self { Self::with_stop_words(STOP_WORDS.iter().copied()) }

	pub fn with_stop_words<I, S>(stop_words: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let inner = TextAnalyzer::builder(SimpleTokenizer::default())
			.filter(LowerCaser)
			.filter(StopWordFilter::remove(stop_words.into_iter().map(Into::into)))
			.build();
		Self { inner }
	}

	pub fn tokenize(&self, text: &str) -> Vec<String> {
		// token_stream needs &mut; the analyzer is a cheap boxed clone
		let mut analyzer = self.inner.clone();
		let mut stream = analyzer.token_stream(text);
		let mut tokens = Vec::new();
		while stream.advance() { tokens.push(stream.token().text.clone()); }
		tokens
	}
}

impl Default for Analyzer {
	fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn folds_case_splits_and_drops_stop_words() {
		let tokens = Analyzer::new().tokenize("The BM25-ranking of IR_systems, v2!");
		assert_eq!(tokens, vec!["bm25", "ranking", "ir", "systems", "v2"]);
	}

	#[test]
	fn empty_text_has_no_tokens() {
		assert!(Analyzer::new().tokenize("  ,;  ").is_empty());
		assert!(Analyzer::new().tokenize("the and of").is_empty());
	}
}
