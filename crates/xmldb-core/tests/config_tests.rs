use figment::{
    providers::{Format, Serialized, Toml},
    Figment, Jail,
};

use xmldb_core::{Error, Settings};

#[test]
fn defaults_use_null_fragmenter_and_ten_hits() {
    let settings = Settings::default();
    assert_eq!(settings.max_hits, 10);
    assert_eq!(settings.highlight.fragment_chars, None);
    assert_eq!(settings.highlight.pre_tag, "<B>");
    assert!(settings.stop_words.is_empty());
}

#[test]
fn toml_overrides_nested_keys() {
    let figment = Figment::from(Serialized::defaults(Settings::default()))
        .merge(Toml::string("max_hits = 3\n[highlight]\npre_tag = \"[\"\npost_tag = \"]\"\n"));
    let settings = Settings::from_figment(&figment).unwrap();
    assert_eq!(settings.max_hits, 3);
    assert_eq!(settings.highlight.pre_tag, "[");
    assert_eq!(settings.highlight.post_tag, "]");
    assert_eq!(settings.writer_memory_bytes, 50_000_000);
}

#[test]
fn zero_max_hits_is_rejected() {
    let figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::string("max_hits = 0"));
    assert!(matches!(Settings::from_figment(&figment), Err(Error::Config(_))));
}

#[test]
fn load_layers_file_then_environment() {
    Jail::expect_with(|jail| {
        jail.create_file("xmldb.toml", "max_hits = 4\nstop_words = [\"the\"]")?;
        jail.set_env("XMLDB_HIGHLIGHT__FRAGMENT_CHARS", "80");
        jail.set_env("XMLDB_MAX_HITS", "7");

        let settings = Settings::load().map_err(|e| e.to_string())?;
        assert_eq!(settings.max_hits, 7);
        assert_eq!(settings.stop_words, ["the"]);
        assert_eq!(settings.highlight.fragment_chars, Some(80));
        Ok(())
    });
}
