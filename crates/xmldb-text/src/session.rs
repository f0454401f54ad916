use std::path::Path;

use tantivy::directory::MmapDirectory;
use tantivy::index::SegmentId;
use tantivy::{Index, IndexWriter, TantivyDocument, TantivyError, Term};
use tracing::{debug, info};

use xmldb_core::{DocumentSink, FieldSchema, IndexableDocument, Settings, FILE_NAME_FIELD};

use crate::error::{Error, Result};
use crate::tantivy_utils::{build_schema, register_analyzer};

/// How [`IndexSession::open`] treats what is already in the index directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
	/// Start from an empty index, dropping any existing documents.
	Create,
	/// Add to an existing index; fails when there is none.
	Append,
	/// Append when an index exists, create it otherwise.
	CreateOrAppend,
}

/// An open index writer. Holds the index write lock until it is closed or
/// dropped; dropping without [`close`](IndexSession::close) discards
/// uncommitted changes.
pub struct IndexSession {
	index: Index,
	writer: IndexWriter,
	file_name_field: tantivy::schema::Field,
}

impl IndexSession {
	pub fn open(index_dir: &Path, fields: &FieldSchema, mode: OpenMode, settings: &Settings) -> Result<Self> {
		let schema = build_schema(fields);
		let index = match mode {
			OpenMode::Append => Index::open_in_dir(index_dir)?,
			OpenMode::Create | OpenMode::CreateOrAppend => {
				let dir = MmapDirectory::open(index_dir).map_err(TantivyError::from)?;
				Index::open_or_create(dir, schema)?
			}
		};
		register_analyzer(&index, &settings.stop_words);
		let writer: IndexWriter = index.writer(settings.writer_memory_bytes)?;
		if mode == OpenMode::Create {
			writer.delete_all_documents()?;
		}
		let file_name_field = index.schema().get_field(FILE_NAME_FIELD).map_err(|_| Error::MissingField(FILE_NAME_FIELD.to_string()))?;
		info!(index_dir = %index_dir.display(), ?mode, "opened index writer");
		Ok(Self { index, writer, file_name_field })
	}

	pub fn commit(&mut self) -> Result<()> {
		self.writer.commit()?;
		Ok(())
	}

	/// Merges every committed segment that carries deleted documents, so
	/// replaced documents stop taking space. Call after [`commit`](Self::commit).
	pub fn force_merge_deletes(&mut self) -> Result<()> {
		let with_deletes: Vec<SegmentId> = self
			.index
			.searchable_segment_metas()?
			.into_iter()
			.filter(|meta| meta.has_deletes())
			.map(|meta| meta.id())
			.collect();
		if with_deletes.is_empty() {
			return Ok(());
		}
		debug!(segments = with_deletes.len(), "merging segments with deletes");
		self.writer.merge(&with_deletes).wait()?;
		Ok(())
	}

	/// Live documents in the committed index.
	pub fn num_docs(&self) -> Result<u64> {
		let metas = self.index.searchable_segment_metas()?;
		Ok(metas.iter().map(|meta| u64::from(meta.num_docs())).sum())
	}

	/// Commits pending changes, waits for merges and releases the lock.
	pub fn close(mut self) -> Result<()> {
		self.writer.commit()?;
		self.writer.wait_merging_threads()?;
		info!("closed index writer");
		Ok(())
	}

	fn to_tantivy_doc(&self, doc: &IndexableDocument) -> Result<TantivyDocument> {
		let schema = self.index.schema();
		let mut tantivy_doc = TantivyDocument::default();
		for field in doc.fields() {
			let target = schema.get_field(&field.name).map_err(|_| Error::MissingField(field.name.clone()))?;
			tantivy_doc.add_text(target, &field.value);
		}
		Ok(tantivy_doc)
	}
}

impl DocumentSink for IndexSession {
	type Error = Error;

	fn upsert(&mut self, doc: &IndexableDocument) -> Result<()> {
		let tantivy_doc = self.to_tantivy_doc(doc)?;
		self.writer.delete_term(Term::from_field_text(self.file_name_field, doc.file_name()));
		self.writer.add_document(tantivy_doc)?;
		debug!(file_name = doc.file_name(), "upserted");
		Ok(())
	}
}
