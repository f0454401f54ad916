use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use xmldb_core::{list_xml_files, FieldSchema, Settings};
use xmldb_text::{Error, IndexSession, OpenMode, XmlIndexer, XmlSearcher};

fn quote(phrase: &str, author: &str) -> String {
    format!("<quote><phrase>{}</phrase><author>{}</author></quote>", phrase, author)
}

struct Fixture {
    _tmp: TempDir,
    data_dir: PathBuf,
    index_dir: PathBuf,
    schema: FieldSchema,
    settings: Settings,
}

impl Fixture {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let data_dir = tmp.path().join("data");
        let index_dir = tmp.path().join("index");
        fs::create_dir_all(&data_dir).unwrap();
        fs::create_dir_all(&index_dir).unwrap();
        Self { _tmp: tmp, data_dir, index_dir, schema: FieldSchema::quotes().unwrap(), settings: Settings::default() }
    }

    fn write(&self, name: &str, xml: &str) -> PathBuf {
        let path = self.data_dir.join(name);
        fs::write(&path, xml).unwrap();
        path
    }

    fn index_all(&self) -> xmldb_text::IndexReport {
        let files = list_xml_files(&self.data_dir).unwrap();
        XmlIndexer::new(&self.schema, &self.settings).index_files_in_directory(&self.index_dir, &files).expect("index")
    }

    fn searcher(&self) -> XmlSearcher {
        XmlSearcher::open(&self.index_dir, &self.schema, &self.settings).expect("searcher")
    }
}

fn strip(marked: &str) -> String {
    marked.replace("<B>", "").replace("</B>", "")
}

#[test]
fn single_quote_single_query() {
    let fx = Fixture::new();
    fx.write("q1.xml", &quote("to be or not to be", "Shakespeare"));
    let report = fx.index_all();
    assert_eq!(report.indexed_files, 1);
    assert_eq!(report.total_docs, 1);

    let results = fx.searcher().run_query("to").unwrap();
    assert_eq!(results.total_hits, 1);
    let hit = &results.hits[0];
    assert_eq!(hit.rank, 1);
    assert_eq!(hit.file_name, "q1.xml");
    assert_eq!(hit.stored, vec![("author".to_string(), "Shakespeare".to_string())]);
    assert_eq!(hit.default_value, "to be or not to be");
    assert_eq!(hit.highlighted, "<B>to</B> be or not <B>to</B> be");

    let rendered = results.to_string();
    assert!(rendered.starts_with("Found 1 hits.\n"));
    assert!(rendered.contains("Filename: q1.xml\n"));
    assert!(rendered.contains("Author: Shakespeare\n"));
    assert!(rendered.contains("Phrase: to be or not to be\n"));
    assert!(rendered.contains("Highlighted query terms in phrase: <B>to</B> be or not <B>to</B> be\n"));
}

#[test]
fn phrase_query_highlights_only_the_matching_run() {
    let fx = Fixture::new();
    fx.write("q1.xml", &quote("to be or not to be", "Shakespeare"));
    fx.index_all();

    let results = fx.searcher().run_query("\"not to\"").unwrap();
    assert_eq!(results.total_hits, 1);
    assert_eq!(results.hits[0].highlighted, "to be or <B>not</B> <B>to</B> be");

    let results = fx.searcher().run_query("\"or not\" be").unwrap();
    assert_eq!(results.hits[0].highlighted, "to <B>be</B> <B>or</B> <B>not</B> to <B>be</B>");
}

#[test]
fn field_qualified_query() {
    let fx = Fixture::new();
    fx.write("q1.xml", &quote("to be or not to be", "Shakespeare"));
    fx.write("q2.xml", &quote("a cage went in search of a bird", "Kafka"));
    fx.index_all();

    let results = fx.searcher().run_query("author:Kafka").unwrap();
    assert_eq!(results.hits.len(), 1);
    assert_eq!(results.hits[0].file_name, "q2.xml");
    assert_eq!(results.hits[0].highlighted, "a cage went in search of a bird");
}

#[test]
fn reindex_replaces_document_by_file_name() {
    let fx = Fixture::new();
    fx.write("q1.xml", &quote("to be or not to be", "Shakespeare"));
    fx.write("q2.xml", &quote("a cage went in search of a bird", "Kafka"));
    fx.index_all();

    fx.write("q1.xml", &quote("to sleep perchance to dream", "Shakespeare"));
    let report = fx.index_all();
    assert_eq!(report.total_docs, 2);

    let searcher = fx.searcher();
    assert_eq!(searcher.num_docs(), 2);
    let sleep = searcher.run_query("sleep").unwrap();
    assert_eq!(sleep.hits.len(), 1);
    assert_eq!(sleep.hits[0].default_value, "to sleep perchance to dream");
    assert_eq!(searcher.run_query("be").unwrap().total_hits, 0);
}

#[test]
fn reindexing_unchanged_files_is_idempotent() {
    let fx = Fixture::new();
    fx.write("q1.xml", &quote("to be or not to be", "Shakespeare"));
    fx.write("q2.xml", &quote("a cage went in search of a bird", "Kafka"));
    let first = fx.index_all();
    let second = fx.index_all();
    assert_eq!(first.total_docs, 2);
    assert_eq!(second.total_docs, 2);

    let results = fx.searcher().run_query("fileName:q2.xml").unwrap();
    assert_eq!(results.total_hits, 1);
    assert_eq!(results.hits[0].stored[0].1, "Kafka");
}

#[test]
fn missing_author_is_stored_as_empty() {
    let fx = Fixture::new();
    fx.write("q3.xml", "<quote><phrase>hello</phrase></quote>");
    fx.index_all();

    let results = fx.searcher().run_query("hello").unwrap();
    assert_eq!(results.hits.len(), 1);
    assert_eq!(results.hits[0].file_name, "q3.xml");
    assert_eq!(results.hits[0].stored[0], ("author".to_string(), String::new()));
    assert!(results.to_string().contains("Author: \n"));
}

#[test]
fn page_is_capped_and_sorted_by_score() {
    let fx = Fixture::new();
    for i in 0..12 {
        let filler = "word ".repeat(i);
        fx.write(&format!("q{:02}.xml", i), &quote(&format!("alpha {}", filler), "Anon"));
    }
    fx.index_all();

    let results = fx.searcher().run_query("alpha").unwrap();
    assert_eq!(results.total_hits, 12);
    assert_eq!(results.hits.len(), 10);
    for pair in results.hits.windows(2) {
        assert!(pair[0].score >= pair[1].score);
        assert_eq!(pair[0].rank + 1, pair[1].rank);
    }
}

#[test]
fn highlighting_preserves_stored_phrase() {
    let fx = Fixture::new();
    let phrase = "  Hello, World! Hello again...  ";
    fx.write("q.xml", &quote(phrase, "Anon"));
    fx.index_all();

    let results = fx.searcher().run_query("hello").unwrap();
    let hit = &results.hits[0];
    assert_eq!(hit.default_value, phrase);
    assert_eq!(hit.highlighted, "  <B>Hello</B>, World! <B>Hello</B> again...  ");
    assert_eq!(strip(&hit.highlighted), phrase);
}

#[test]
fn span_fragmenter_is_opt_in_and_truncates() {
    let mut fx = Fixture::new();
    let phrase = format!("{} needle {}", "hay ".repeat(40), "hay ".repeat(40));
    fx.write("q.xml", &quote(&phrase, "Anon"));
    fx.index_all();

    fx.settings.highlight.fragment_chars = Some(30);
    let results = fx.searcher().run_query("needle").unwrap();
    let highlighted = &results.hits[0].highlighted;
    assert!(highlighted.contains("<B>needle</B>"));
    assert!(strip(highlighted).len() <= 30);
}

#[test]
fn bad_query_is_reported() {
    let fx = Fixture::new();
    fx.write("q1.xml", &quote("to be or not to be", "Shakespeare"));
    fx.index_all();

    let searcher = fx.searcher();
    assert!(matches!(searcher.run_query("nosuchfield:foo"), Err(Error::BadQuery { .. })));
    assert_eq!(searcher.run_query("to").unwrap().total_hits, 1);
}

#[test]
fn failure_mid_batch_keeps_earlier_docs_and_releases_lock() {
    let fx = Fixture::new();
    let good = fx.write("a.xml", &quote("first quote", "One"));
    let bad = fx.write("b.xml", "<quote><phrase>broken");
    let later = fx.write("c.xml", &quote("third quote", "Three"));

    let err = XmlIndexer::new(&fx.schema, &fx.settings)
        .index_files_in_directory(&fx.index_dir, &[good, bad, later])
        .unwrap_err();
    assert!(matches!(err, Error::Core(xmldb_core::Error::MalformedSource { .. })));

    let results = fx.searcher().run_query("quote").unwrap();
    assert_eq!(results.total_hits, 1);
    assert_eq!(results.hits[0].file_name, "a.xml");

    // a second writer can take the lock
    let session = IndexSession::open(&fx.index_dir, &fx.schema, OpenMode::Append, &fx.settings).unwrap();
    session.close().unwrap();
}

#[test]
fn open_modes() {
    let fx = Fixture::new();
    let append_on_empty = IndexSession::open(&fx.index_dir, &fx.schema, OpenMode::Append, &fx.settings);
    assert!(matches!(append_on_empty, Err(Error::Engine(_))));

    fx.write("q1.xml", &quote("to be or not to be", "Shakespeare"));
    fx.index_all();

    let fresh = fx.data_dir.join("q2.xml");
    fs::write(&fresh, quote("a cage went in search of a bird", "Kafka")).unwrap();
    let report = XmlIndexer::new(&fx.schema, &fx.settings)
        .with_open_mode(OpenMode::Create)
        .index_files_in_directory(&fx.index_dir, &[fresh])
        .unwrap();
    assert_eq!(report.total_docs, 1);
    assert_eq!(fx.searcher().run_query("to").unwrap().total_hits, 0);
}

#[test]
fn empty_batch_still_creates_searchable_index() {
    let fx = Fixture::new();
    let report = XmlIndexer::new(&fx.schema, &fx.settings).index_files_in_directory(&fx.index_dir, &[]).unwrap();
    assert_eq!(report.total_docs, 0);
    assert!(Path::new(&fx.index_dir).join("meta.json").exists());
    assert_eq!(fx.searcher().run_query("anything").unwrap().hits.len(), 0);
}
