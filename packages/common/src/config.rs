use std::path::PathBuf;

use serde::Deserialize;

/// Synonym lookup configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct SynonymConfig {
    /// Whether entries are enriched with synonym tags. Default: true.
    #[serde(default = "default_synonyms_enabled")]
    pub enabled: bool,
    /// Base URL of the word-association API. Default: "https://api.datamuse.com".
    #[serde(default = "default_synonyms_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds. Default: 10.
    #[serde(default = "default_synonyms_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_synonyms_enabled() -> bool {
    true
}
fn default_synonyms_base_url() -> String {
    "https://api.datamuse.com".into()
}
fn default_synonyms_timeout_secs() -> u64 {
    10
}

impl Default for SynonymConfig {
    fn default() -> Self {
        Self {
            enabled: default_synonyms_enabled(),
            base_url: default_synonyms_base_url(),
            timeout_secs: default_synonyms_timeout_secs(),
        }
    }
}

/// Where uploaded archives are written and extracted.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Root directory for uploads. Default: "./uploads".
    #[serde(default = "default_upload_root")]
    pub upload_root: PathBuf,
}

fn default_upload_root() -> PathBuf {
    PathBuf::from("./uploads")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_root: default_upload_root(),
        }
    }
}
