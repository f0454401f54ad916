use std::fmt;
use std::path::Path;

use tantivy::collector::{Count, TopDocs};
use tantivy::query::QueryParser;
use tantivy::schema::{Field, Value};
use tantivy::{Index, IndexReader, ReloadPolicy, TantivyDocument};
use tracing::debug;

use xmldb_core::{FieldSchema, Settings, Store, DEFAULT_FIELD, FILE_NAME_FIELD};

use crate::error::{Error, Result};
use crate::highlight::Highlighter;
use crate::tantivy_utils::register_analyzer;

/// One ranked hit, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedHit {
	/// 1-based position in the result page.
	pub rank: usize,
	pub score: f32,
	pub file_name: String,
	/// Stored schema fields other than the default field, in schema order.
	pub stored: Vec<(String, String)>,
	/// Stored value of the default field.
	pub default_value: String,
	/// Default field with matched terms marked.
	pub highlighted: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
	/// Matching documents in the whole index, not only this page.
	pub total_hits: usize,
	pub default_field: String,
	pub hits: Vec<RenderedHit>,
}

/// Read side of the index: parses user queries against the default field,
/// collects the top hits and highlights them.
///
/// The reader is opened once and reused for every query.
pub struct XmlSearcher {
	index: Index,
	reader: IndexReader,
	query_parser: QueryParser,
	file_name_field: Field,
	default_field: Field,
	stored_fields: Vec<(String, Field)>,
	settings: Settings,
}

impl XmlSearcher {
	pub fn open(index_dir: &Path, schema: &FieldSchema, settings: &Settings) -> Result<Self> {
		let index = Index::open_in_dir(index_dir)?;
		register_analyzer(&index, &settings.stop_words);
		let reader = index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into()?;

		let index_schema = index.schema();
		let lookup = |name: &str| index_schema.get_field(name).map_err(|_| Error::MissingField(name.to_string()));
		let file_name_field = lookup(FILE_NAME_FIELD)?;
		let default_field = lookup(DEFAULT_FIELD)?;
		let stored_fields = schema
			.iter()
			.filter(|def| def.store() == Store::Yes && def.name() != DEFAULT_FIELD)
			.map(|def| -> Result<(String, Field)> { Ok((def.name().to_string(), lookup(def.name())?)) })
			.collect::<Result<Vec<_>>>()?;

		let query_parser = QueryParser::for_index(&index, vec![default_field]);
		Ok(Self { index, reader, query_parser, file_name_field, default_field, stored_fields, settings: settings.clone() })
	}

	/// Live documents visible to this searcher.
	pub fn num_docs(&self) -> u64 {
		self.reader.searcher().num_docs()
	}

	/// Parses `query_text`, runs it and renders at most `max_hits` hits in
	/// descending score order. Ties keep index order.
	pub fn run_query(&self, query_text: &str) -> Result<SearchResults> {
		let query = self
			.query_parser
			.parse_query(query_text)
			.map_err(|source| Error::BadQuery { query: query_text.to_string(), source })?;

		let searcher = self.reader.searcher();
		let (mut top_docs, total_hits) = searcher.search(&query, &(TopDocs::with_limit(self.settings.max_hits), Count))?;
		top_docs.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
		debug!(query = query_text, total_hits, "query executed");

		let mut highlighter = Highlighter::new(&self.index, &searcher, &*query, self.default_field, &self.settings.highlight)?;
		let mut hits = Vec::with_capacity(top_docs.len());
		for (i, (score, doc_address)) in top_docs.into_iter().enumerate() {
			let doc: TantivyDocument = searcher.doc(doc_address)?;
			let default_value = stored_text(&doc, self.default_field);
			let stored = self.stored_fields.iter().map(|(name, field)| (name.clone(), stored_text(&doc, *field))).collect();
			hits.push(RenderedHit {
				rank: i + 1,
				score,
				file_name: stored_text(&doc, self.file_name_field),
				stored,
				highlighted: highlighter.highlight(&default_value),
				default_value,
			});
		}
		Ok(SearchResults { total_hits, default_field: DEFAULT_FIELD.to_string(), hits })
	}
}

fn stored_text(doc: &TantivyDocument, field: Field) -> String {
	doc.get_first(field).and_then(|v| v.as_str()).unwrap_or("").to_string()
}

fn label(name: &str) -> String {
	let mut chars = name.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

impl fmt::Display for SearchResults {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Found {} hits.", self.total_hits)?;
		writeln!(f)?;
		for hit in &self.hits {
			writeln!(f, "<Hit {}, score {:.4}>", hit.rank, hit.score)?;
			writeln!(f, "Filename: {}", hit.file_name)?;
			for (name, value) in &hit.stored {
				writeln!(f, "{}: {}", label(name), value)?;
			}
			writeln!(f, "{}: {}", label(&self.default_field), hit.default_value)?;
			writeln!(f, "Highlighted query terms in {}: {}", self.default_field, hit.highlighted)?;
			writeln!(f)?;
		}
		Ok(())
	}
}
