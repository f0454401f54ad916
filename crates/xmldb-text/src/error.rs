use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error(transparent)]
	Core(#[from] xmldb_core::Error),

	#[error("Bad query '{query}': {source}")]
	BadQuery {
		query: String,
		#[source]
		source: tantivy::query::QueryParserError,
	},

	#[error("Index engine failure: {0}")]
	Engine(#[from] tantivy::TantivyError),

	#[error("Field '{0}' is not part of the index schema")]
	MissingField(String),
}

pub type Result<T> = std::result::Result<T, Error>;
