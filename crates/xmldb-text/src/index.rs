use std::path::{Path, PathBuf};

use tracing::{info, warn};

use xmldb_core::{index_batch, DocumentMapper, FieldSchema, Settings};

use crate::error::Result;
use crate::session::{IndexSession, OpenMode};

/// Outcome of one indexing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexReport {
	/// Files mapped and upserted in this run.
	pub indexed_files: usize,
	/// Live documents in the index after the run.
	pub total_docs: u64,
}

/// Drives XML files through the [`DocumentMapper`] into a tantivy index,
/// keeping one document per source file name across runs.
pub struct XmlIndexer<'a> {
	schema: &'a FieldSchema,
	settings: &'a Settings,
	mode: OpenMode,
}

impl<'a> XmlIndexer<'a> {
	pub fn new(schema: &'a FieldSchema, settings: &'a Settings) -> Self {
		Self { schema, settings, mode: OpenMode::CreateOrAppend }
	}

	pub fn with_open_mode(mut self, mode: OpenMode) -> Self {
		self.mode = mode;
		self
	}

	/// Upserts every file, reclaims replaced documents and closes the writer.
	///
	/// On a mapping or upsert failure the writer is still closed, so files
	/// upserted before the failing one stay in the index, and the error is
	/// returned.
	pub fn index_files_in_directory(&self, index_dir: &Path, files: &[PathBuf]) -> Result<IndexReport> {
		let mut session = IndexSession::open(index_dir, self.schema, self.mode, self.settings)?;
		let mapper = DocumentMapper::new(self.schema);

		let indexed_files = match index_batch(&mapper, &mut session, files) {
			Ok(count) => count,
			Err(err) => {
				if let Err(close_err) = session.close() {
					warn!(error = %close_err, "failed to close index writer after indexing error");
				}
				return Err(err);
			}
		};

		session.commit()?;
		session.force_merge_deletes()?;
		let total_docs = session.num_docs()?;
		session.close()?;
		info!(indexed_files, total_docs, "indexing finished");
		Ok(IndexReport { indexed_files, total_docs })
	}
}
