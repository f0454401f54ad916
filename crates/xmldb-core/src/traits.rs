use crate::error::Error;
use crate::types::IndexableDocument;

/// Destination of mapped documents.
///
/// `upsert` replaces any document carrying the same
/// [`file_name`](IndexableDocument::file_name), otherwise inserts.
pub trait DocumentSink {
    type Error: From<Error>;

    fn upsert(&mut self, doc: &IndexableDocument) -> Result<(), Self::Error>;
}
