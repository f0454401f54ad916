use std::path::PathBuf;

use tracing::info;

use crate::mapper::DocumentMapper;
use crate::traits::DocumentSink;

/// Maps every file and upserts it into `sink`, in the order given.
///
/// Stops at the first failure. Documents upserted before it stay in the
/// sink; closing the sink is the caller's business.
pub fn index_batch<S: DocumentSink>(mapper: &DocumentMapper<'_>, sink: &mut S, files: &[PathBuf]) -> Result<usize, S::Error> {
    let mut indexed = 0;
    for file in files {
        info!(file = %file.display(), "indexing");
        let doc = mapper.map(file)?;
        sink.upsert(&doc)?;
        indexed += 1;
    }
    Ok(indexed)
}
