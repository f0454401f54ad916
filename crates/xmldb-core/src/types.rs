//! Domain types shared by the mapper, the indexer and the searcher.

/// Reserved identity field. Holds the basename of the source file and is
/// the upsert key of every indexed document.
pub const FILE_NAME_FIELD: &str = "fileName";

/// Whether the raw value is persisted for retrieval at search time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Store {
    Yes,
    No,
}

/// Whether and how a value is tokenized for search.
///
/// Orthogonal to [`Store`]: a field can be stored-not-indexed,
/// indexed-not-stored, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexPolicy {
    /// Tokenized by the analyzer and searchable by its terms.
    Analyzed,
    /// Indexed as a single exact term, without length norms.
    NotAnalyzedNoNorms,
    /// Not searchable at all.
    NoIndex,
}

/// One `(name, value, store, index)` tuple of an [`IndexableDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedField {
    pub name: String,
    pub value: String,
    pub store: Store,
    pub index: IndexPolicy,
}

/// The indexable form of one source file.
///
/// Always starts with the [`FILE_NAME_FIELD`] identity tuple, followed by
/// the schema fields in schema order. Field names are unique; the
/// [`FieldSchema`](crate::schema::FieldSchema) guarantees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexableDocument {
    fields: Vec<IndexedField>,
}

impl IndexableDocument {
    pub(crate) fn new(file_name: String) -> Self {
        let identity = IndexedField {
            name: FILE_NAME_FIELD.to_string(),
            value: file_name,
            store: Store::Yes,
            index: IndexPolicy::NotAnalyzedNoNorms,
        };
        Self { fields: vec![identity] }
    }

    pub(crate) fn push(&mut self, field: IndexedField) {
        debug_assert!(self.get(&field.name).is_none(), "duplicate field {}", field.name);
        self.fields.push(field);
    }

    pub fn file_name(&self) -> &str {
        &self.fields[0].value
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.value.as_str())
    }

    pub fn fields(&self) -> &[IndexedField] {
        &self.fields
    }
}
