//! Entry point and interactive shell of the `xmldb` binary.

pub mod invocation;
pub mod shell;

use std::io::{BufRead, Write};

use tracing::info;
use xmldb_core::{list_xml_files, FieldSchema, Settings};
use xmldb_text::{XmlIndexer, XmlSearcher};

pub use invocation::{Invocation, USAGE};
pub use shell::run_shell;

/// Indexes every xml file of the data directory, then serves queries read
/// from `input` until a blank line.
pub fn run<R: BufRead, W: Write>(invocation: &Invocation, schema: &FieldSchema, settings: &Settings, input: R, mut output: W) -> anyhow::Result<()> {
    let files = list_xml_files(&invocation.data_dir)?;
    info!(data_dir = %invocation.data_dir.display(), files = files.len(), "found xml files");

    let report = XmlIndexer::new(schema, settings).index_files_in_directory(&invocation.index_dir, &files)?;
    writeln!(output, "Total number of indexed documents: {}", report.total_docs)?;

    let searcher = XmlSearcher::open(&invocation.index_dir, schema, settings)?;
    run_shell(&searcher, input, output)
}
