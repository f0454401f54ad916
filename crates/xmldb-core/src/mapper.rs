//! XML source file -> [`IndexableDocument`].

use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use sxd_document::parser;
use sxd_xpath::Context;

use crate::error::{Error, Result};
use crate::schema::FieldSchema;
use crate::types::{IndexableDocument, IndexedField};

/// Extracts the schema fields of one XML document.
///
/// Every [`FieldDef`](crate::schema::FieldDef) is evaluated as an XPath
/// string: the string-value of the first selected node, or `""` when nothing
/// matches. Absence and empty content are therefore indistinguishable.
#[derive(Debug, Clone, Copy)]
pub struct DocumentMapper<'s> {
    schema: &'s FieldSchema,
}

impl<'s> DocumentMapper<'s> {
    pub fn new(schema: &'s FieldSchema) -> Self {
        Self { schema }
    }

    /// Parses `file` and maps it. The identity field is the basename of
    /// `file`, never the full path.
    pub fn map(&self, file: &Path) -> Result<IndexableDocument> {
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::MalformedSource { path: file.to_path_buf(), reason: "path has no file name".to_string() })?;
        let bytes = fs::read(file)?;
        let xml = decode(&bytes).map_err(|reason| Error::MalformedSource { path: file.to_path_buf(), reason })?;
        self.map_source(file, file_name, &xml)
    }

    /// Maps XML text that is already in memory; `file_name` doubles as the
    /// path in error reports.
    pub fn map_str(&self, file_name: &str, xml: &str) -> Result<IndexableDocument> {
        self.map_source(Path::new(file_name), file_name.to_string(), xml)
    }

    fn map_source(&self, path: &Path, file_name: String, xml: &str) -> Result<IndexableDocument> {
        let xml = xml.strip_prefix('\u{FEFF}').unwrap_or(xml);
        let package = parser::parse(xml).map_err(|e| Error::MalformedSource { path: path.to_path_buf(), reason: format!("{:?}", e) })?;
        let document = package.as_document();
        let context = Context::new();

        let mut doc = IndexableDocument::new(file_name);
        for def in self.schema {
            let value = def
                .xpath()
                .evaluate(&context, document.root())
                .map_err(|e| Error::ExtractionFailed { field: def.name().to_string(), path: path.to_path_buf(), reason: e.to_string() })?
                .string();
            doc.push(IndexedField { name: def.name().to_string(), value, store: def.store(), index: def.index() });
        }
        Ok(doc)
    }
}

/// Decodes raw file bytes: a byte order mark wins, then the `encoding` of
/// the XML declaration, then UTF-8.
fn decode(bytes: &[u8]) -> std::result::Result<String, String> {
    let (encoding, bom_len) = match Encoding::for_bom(bytes) {
        Some(found) => found,
        None => match declared_encoding(bytes) {
            Some(label) => {
                let encoding = Encoding::for_label(label).ok_or_else(|| format!("unsupported encoding '{}'", String::from_utf8_lossy(label)))?;
                (encoding, 0)
            }
            None => (UTF_8, 0),
        },
    };
    let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
    if had_errors {
        return Err(format!("not valid {}", encoding.name()));
    }
    Ok(text.into_owned())
}

/// Label of `encoding="..."` in a leading `<?xml ...?>` declaration.
fn declared_encoding(bytes: &[u8]) -> Option<&[u8]> {
    let decl = bytes.strip_prefix(b"<?xml")?;
    let decl = &decl[..decl.windows(2).position(|w| w == b"?>")?];
    let at = decl.windows(8).position(|w| w == b"encoding")?;
    let rest = decl[at + 8..].trim_ascii_start().strip_prefix(b"=")?.trim_ascii_start();
    let (&quote, rest) = rest.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let end = rest.iter().position(|&b| b == quote)?;
    Some(&rest[..end])
}
