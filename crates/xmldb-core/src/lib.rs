#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod batch;
pub mod config;
pub mod error;
pub mod files;
pub mod mapper;
pub mod schema;
pub mod traits;
pub mod types;

pub use batch::index_batch;
pub use config::{HighlightSettings, Settings};
pub use error::{Error, Result};
pub use files::list_xml_files;
pub use mapper::DocumentMapper;
pub use schema::{FieldDef, FieldSchema, DEFAULT_FIELD};
pub use traits::DocumentSink;
pub use types::{IndexPolicy, IndexableDocument, IndexedField, Store, FILE_NAME_FIELD};
