use crate::error::{Result, VersemarkError};
use crate::resolver::ResolverConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_NOTE_EXT: &str = ".md";

/// Configuration for versemark, stored as config.json in the corpus
/// directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VersemarkConfig {
    /// File extension for note files (e.g. ".md", ".txt")
    #[serde(default = "default_note_ext")]
    pub note_ext: String,

    /// Whether the resolver emits topical links
    #[serde(default = "default_include_topical")]
    pub include_topical: bool,

    /// Per-kind cap on resolved links
    #[serde(default = "default_max_links_per_kind")]
    pub max_links_per_kind: usize,

    /// Minimum confidence for a resolved link to survive
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
}

fn default_note_ext() -> String {
    DEFAULT_NOTE_EXT.to_string()
}

fn default_include_topical() -> bool {
    true
}

fn default_max_links_per_kind() -> usize {
    5
}

fn default_min_confidence() -> f64 {
    0.25
}

impl Default for VersemarkConfig {
    fn default() -> Self {
        Self {
            note_ext: default_note_ext(),
            include_topical: default_include_topical(),
            max_links_per_kind: default_max_links_per_kind(),
            min_confidence: default_min_confidence(),
        }
    }
}

impl VersemarkConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(VersemarkError::Io)?;
        let config: VersemarkConfig =
            serde_json::from_str(&content).map_err(VersemarkError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(VersemarkError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(VersemarkError::Serialization)?;
        fs::write(config_path, content).map_err(VersemarkError::Io)?;
        Ok(())
    }

    /// Set the note extension (normalizes to start with a dot)
    pub fn set_note_ext(&mut self, ext: &str) {
        if ext.starts_with('.') {
            self.note_ext = ext.to_string();
        } else {
            self.note_ext = format!(".{}", ext);
        }
    }

    pub fn resolver(&self) -> ResolverConfig {
        ResolverConfig {
            include_topical: self.include_topical,
            max_links_per_kind: self.max_links_per_kind,
            min_confidence: self.min_confidence,
        }
    }
}
