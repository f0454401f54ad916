use tantivy::schema::{IndexRecordOption, Schema, TextFieldIndexing, TextOptions};
use tantivy::tokenizer::{LowerCaser, RemoveLongFilter, SimpleTokenizer, StopWordFilter, TextAnalyzer};
use tantivy::Index;

use xmldb_core::{FieldSchema, IndexPolicy, Store, FILE_NAME_FIELD};

/// Analyzer used for every analyzed field, at index and at query time.
pub const ANALYZER_NAME: &str = "standard";

const RAW_TOKENIZER: &str = "raw";

pub fn build_schema(fields: &FieldSchema) -> Schema {
	let mut schema_builder = Schema::builder();
	schema_builder.add_text_field(FILE_NAME_FIELD, text_options(Store::Yes, IndexPolicy::NotAnalyzedNoNorms));
	for def in fields {
		schema_builder.add_text_field(def.name(), text_options(def.store(), def.index()));
	}
	schema_builder.build()
}

fn text_options(store: Store, index: IndexPolicy) -> TextOptions {
	let options = match index {
		IndexPolicy::Analyzed => TextOptions::default().set_indexing_options(
			TextFieldIndexing::default().set_tokenizer(ANALYZER_NAME).set_index_option(IndexRecordOption::WithFreqsAndPositions),
		),
		IndexPolicy::NotAnalyzedNoNorms => TextOptions::default().set_indexing_options(
			TextFieldIndexing::default().set_tokenizer(RAW_TOKENIZER).set_index_option(IndexRecordOption::Basic).set_fieldnorms(false),
		),
		IndexPolicy::NoIndex => TextOptions::default(),
	};
	match store {
		Store::Yes => options.set_stored(),
		Store::No => options,
	}
}

/// Custom analyzers are not persisted with the index, so this runs every
/// time an index is opened.
pub fn register_analyzer(index: &Index, stop_words: &[String]) {
	let analyzer = TextAnalyzer::builder(SimpleTokenizer::default())
		.filter(RemoveLongFilter::limit(40))
		.filter(LowerCaser)
		.filter(StopWordFilter::remove(stop_words.iter().cloned()))
		.build();
	index.tokenizers().register(ANALYZER_NAME, analyzer);
}
