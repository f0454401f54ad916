//! xmldb-text
//!
//! Tantivy binding for xmldb: schema translation, the upserting indexer and
//! the highlighting searcher.
pub mod error;
pub mod highlight;
pub mod index;
pub mod search;
pub mod session;
pub mod tantivy_utils;

pub use error::{Error, Result};
pub use highlight::{Fragmenter, Highlighter};
pub use index::{IndexReport, XmlIndexer};
pub use search::{RenderedHit, SearchResults, XmlSearcher};
pub use session::{IndexSession, OpenMode};
