use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{Error, Result};

/// Highlight markup and fragment policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightSettings {
    pub pre_tag: String,
    pub post_tag: String,
    /// `None` renders the whole stored value (null fragmenter). `Some(n)`
    /// renders the best fragment of at most `n` characters.
    pub fragment_chars: Option<usize>,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self { pre_tag: "<B>".to_string(), post_tag: "</B>".to_string(), fragment_chars: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub max_hits: usize,
    pub writer_memory_bytes: usize,
    pub stop_words: Vec<String>,
    pub highlight: HighlightSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_hits: 10,
            writer_memory_bytes: 50_000_000,
            stop_words: Vec::new(),
            highlight: HighlightSettings::default(),
        }
    }
}

impl Settings {
    /// Merges defaults, `xmldb.toml`, `xmldb.<env>.toml` and `XMLDB_*`
    /// variables, later layers winning. Missing files are skipped.
    pub fn load() -> Result<Self> {
        let env_name = env::var("XMLDB_ENV").unwrap_or_else(|_| "dev".to_string());

        let figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("xmldb.toml"))
            .merge(Toml::file(format!("xmldb.{}.toml", env_name)))
            .merge(Env::prefixed("XMLDB_").ignore(&["ENV"]).split("__"));
        Self::from_figment(&figment)
    }

    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let settings: Settings = figment.extract().map_err(|e| Error::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.max_hits == 0 {
            return Err(Error::Config("max_hits must be at least 1".to_string()));
        }
        if self.highlight.fragment_chars == Some(0) {
            return Err(Error::Config("highlight.fragment_chars must be at least 1".to_string()));
        }
        Ok(())
    }
}
