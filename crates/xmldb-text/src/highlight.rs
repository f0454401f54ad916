//! Marks query terms inside a stored field value.

use std::ops::Range;

use tantivy::query::{BooleanQuery, Occur, PhraseQuery, Query, TermQuery};
use tantivy::schema::Field;
use tantivy::snippet::SnippetGenerator;
use tantivy::tokenizer::{TextAnalyzer, TokenStream};
use tantivy::{Index, Searcher, Term};

use xmldb_core::HighlightSettings;

use crate::error::Result;

/// Which part of the stored value gets rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragmenter {
	/// The whole value, untruncated. Only the markers are added.
	Null,
	/// The best-scoring fragment of at most `max_chars` characters.
	Span { max_chars: usize },
}

impl Fragmenter {
	pub fn from_settings(settings: &HighlightSettings) -> Self {
		match settings.fragment_chars {
			None => Fragmenter::Null,
			Some(max_chars) => Fragmenter::Span { max_chars },
		}
	}
}

/// Highlighter bound to one parsed query and one field.
pub struct Highlighter {
	mode: Mode,
	pre_tag: String,
	post_tag: String,
}

enum Mode {
	/// Each pattern is a run of terms that must appear as consecutive
	/// tokens; single terms are runs of length one.
	Whole { analyzer: TextAnalyzer, patterns: Vec<Vec<String>> },
	Span(SnippetGenerator),
}

impl Highlighter {
	pub fn new(index: &Index, searcher: &Searcher, query: &dyn Query, field: Field, settings: &HighlightSettings) -> Result<Self> {
		let mode = match Fragmenter::from_settings(settings) {
			Fragmenter::Null => {
				let mut patterns = Vec::new();
				collect_patterns(query, field, &mut patterns);
				Mode::Whole { analyzer: index.tokenizer_for_field(field)?, patterns }
			}
			Fragmenter::Span { max_chars } => {
				let mut generator = SnippetGenerator::create(searcher, query, field)?;
				generator.set_max_num_chars(max_chars);
				Mode::Span(generator)
			}
		};
		Ok(Self { mode, pre_tag: settings.pre_tag.clone(), post_tag: settings.post_tag.clone() })
	}

	/// Returns `text` (or its best fragment) with every matched token
	/// wrapped in the configured tags.
	pub fn highlight(&mut self, text: &str) -> String {
		match &mut self.mode {
			Mode::Whole { analyzer, patterns } => {
				let mut tokens = Vec::new();
				if !patterns.is_empty() {
					let mut stream = analyzer.token_stream(text);
					while stream.advance() {
						let token = stream.token();
						tokens.push((token.text.clone(), token.offset_from..token.offset_to));
					}
				}
				let ranges = matched_ranges(&tokens, patterns);
				mark(text, &ranges, &self.pre_tag, &self.post_tag)
			}
			Mode::Span(generator) => {
				let snippet = generator.snippet(text);
				mark(snippet.fragment(), snippet.highlighted(), &self.pre_tag, &self.post_tag)
			}
		}
	}
}

fn term_text(term: &Term) -> Option<String> {
	term.value().as_str().map(str::to_string)
}

/// Walks the query tree and records what can match on `field`: a phrase
/// becomes one run, a term a run of one. Prohibited clauses never match.
fn collect_patterns(query: &dyn Query, field: Field, patterns: &mut Vec<Vec<String>>) {
	if let Some(phrase) = query.downcast_ref::<PhraseQuery>() {
		if phrase.field() == field {
			let run: Vec<String> = phrase.phrase_terms().iter().filter_map(term_text).collect();
			if !run.is_empty() {
				patterns.push(run);
			}
		}
	} else if let Some(term_query) = query.downcast_ref::<TermQuery>() {
		if term_query.term().field() == field {
			patterns.extend(term_text(term_query.term()).map(|t| vec![t]));
		}
	} else if let Some(boolean) = query.downcast_ref::<BooleanQuery>() {
		for (occur, clause) in boolean.clauses() {
			if *occur != Occur::MustNot {
				collect_patterns(clause.as_ref(), field, patterns);
			}
		}
	} else {
		query.query_terms(&mut |term, _| {
			if term.field() == field {
				patterns.extend(term_text(term).map(|t| vec![t]));
			}
		});
	}
}

/// Offsets of every token that is part of a consecutive run equal to one
/// of `patterns`, in text order.
fn matched_ranges(tokens: &[(String, Range<usize>)], patterns: &[Vec<String>]) -> Vec<Range<usize>> {
	let mut matched = vec![false; tokens.len()];
	for pattern in patterns {
		if pattern.is_empty() || pattern.len() > tokens.len() {
			continue;
		}
		for start in 0..=tokens.len() - pattern.len() {
			let window = &tokens[start..start + pattern.len()];
			if window.iter().zip(pattern).all(|((text, _), term)| text == term) {
				matched[start..start + pattern.len()].fill(true);
			}
		}
	}
	tokens.iter().zip(matched).filter(|(_, hit)| *hit).map(|((_, range), _)| range.clone()).collect()
}

/// Wraps each range of `text` in `pre`/`post`, copying everything else
/// verbatim. Ranges must be sorted and must not overlap.
pub fn mark(text: &str, ranges: &[Range<usize>], pre: &str, post: &str) -> String {
	let mut out = String::with_capacity(text.len() + ranges.len() * (pre.len() + post.len()));
	let mut cursor = 0;
	for range in ranges {
		if range.start < cursor || range.end > text.len() {
			continue;
		}
		out.push_str(&text[cursor..range.start]);
		out.push_str(pre);
		out.push_str(&text[range.clone()]);
		out.push_str(post);
		cursor = range.end;
	}
	out.push_str(&text[cursor..]);
	out
}

#[cfg(test)]
mod tests {
	use super::{mark, matched_ranges};

	fn tokens(words: &[(&str, usize)]) -> Vec<(String, std::ops::Range<usize>)> {
		words.iter().map(|(w, at)| (w.to_string(), *at..*at + w.len())).collect()
	}

	#[test]
	fn phrase_marks_only_the_consecutive_run() {
		let toks = tokens(&[("to", 0), ("be", 3), ("or", 6), ("not", 9), ("to", 13), ("be", 16)]);
		let phrase = vec![vec!["not".to_string(), "to".to_string()]];
		assert_eq!(matched_ranges(&toks, &phrase), vec![9..12, 13..15]);
	}

	#[test]
	fn single_terms_mark_every_occurrence() {
		let toks = tokens(&[("to", 0), ("be", 3), ("to", 6)]);
		assert_eq!(matched_ranges(&toks, &[vec!["to".to_string()]]), vec![0..2, 6..8]);
	}

	#[test]
	fn mark_keeps_unmatched_text_verbatim() {
		let text = "  to be, or not to be!  ";
		let marked = mark(text, &[2..4, 16..18], "<B>", "</B>");
		assert_eq!(marked, "  <B>to</B> be, or not <B>to</B> be!  ");
		assert_eq!(marked.replace("<B>", "").replace("</B>", ""), text);
	}

	#[test]
	fn mark_without_ranges_is_identity() {
		assert_eq!(mark("hello", &[], "[", "]"), "hello");
	}
}
