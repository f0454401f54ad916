//! The field schema: which XPath feeds which indexed field.

use std::collections::HashSet;
use std::fmt;

use sxd_xpath::{Factory, XPath};

use crate::error::{Error, Result};
use crate::types::{IndexPolicy, Store, FILE_NAME_FIELD};

/// Field searched when a query names no field explicitly.
pub const DEFAULT_FIELD: &str = "phrase";

/// Binds an indexed field to the XPath expression that produces its value.
///
/// The expression is compiled once in [`FieldDef::new`]; evaluation happens
/// per document in [`DocumentMapper`](crate::mapper::DocumentMapper).
pub struct FieldDef {
    name: String,
    store: Store,
    index: IndexPolicy,
    source: String,
    xpath: XPath,
}

impl FieldDef {
    pub fn new(name: &str, store: Store, index: IndexPolicy, xpath: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidXPath { xpath: xpath.to_string(), reason };
        let compiled = Factory::new()
            .build(xpath)
            .map_err(|e| invalid(e.to_string()))?
            .ok_or_else(|| invalid("expression is empty".to_string()))?;
        Ok(Self {
            name: name.to_string(),
            store,
            index,
            source: xpath.to_string(),
            xpath: compiled,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store(&self) -> Store {
        self.store
    }

    pub fn index(&self) -> IndexPolicy {
        self.index
    }

    /// The XPath text this field was compiled from.
    pub fn xpath_source(&self) -> &str {
        &self.source
    }

    pub(crate) fn xpath(&self) -> &XPath {
        &self.xpath
    }
}

impl fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("store", &self.store)
            .field("index", &self.index)
            .field("xpath", &self.source)
            .finish()
    }
}

/// Immutable, ordered list of [`FieldDef`]s.
///
/// Built once at startup and shared by reference between the indexer and
/// the searcher so field names cannot drift between the two.
#[derive(Debug)]
pub struct FieldSchema {
    defs: Vec<FieldDef>,
}

impl FieldSchema {
    /// Names must be unique and must not shadow [`FILE_NAME_FIELD`].
    pub fn new(defs: Vec<FieldDef>) -> Result<Self> {
        let mut seen = HashSet::new();
        for def in &defs {
            if def.name.is_empty() {
                return Err(Error::InvalidSchema("field name must not be empty".to_string()));
            }
            if def.name == FILE_NAME_FIELD {
                return Err(Error::InvalidSchema(format!("'{}' is reserved for the source file name", FILE_NAME_FIELD)));
            }
            if !seen.insert(def.name.as_str()) {
                return Err(Error::InvalidSchema(format!("duplicate field '{}'", def.name)));
            }
        }
        Ok(Self { defs })
    }

    /// Schema of the quotations collection: `<quote><phrase/><author/></quote>`.
    pub fn quotes() -> Result<Self> {
        Self::new(vec![
            FieldDef::new(DEFAULT_FIELD, Store::Yes, IndexPolicy::Analyzed, "/quote/phrase")?,
            FieldDef::new("author", Store::Yes, IndexPolicy::Analyzed, "/quote/author")?,
        ])
    }

    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.defs.iter().find(|d| d.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDef> {
        self.defs.iter()
    }
}

impl<'a> IntoIterator for &'a FieldSchema {
    type Item = &'a FieldDef;
    type IntoIter = std::slice::Iter<'a, FieldDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.defs.iter()
    }
}
